//! Client configuration: API and search endpoints, polling cadence, and request timeouts.
//!
//! Values are assembled through [`ClientConfigBuilder`], which validates every URL before a
//! [`ClientConfig`] exists, or read from the process environment with
//! [`ClientConfig::from_env`].

// std
use std::env;
// self
use crate::{_prelude::*, error::ConfigError};

/// Environment variable overriding the API base URL.
pub const API_URL_ENV: &str = "EVENTHUB_API_URL";
/// Environment variable overriding the search index base URL.
pub const SEARCH_URL_ENV: &str = "EVENTHUB_SEARCH_URL";
/// Environment variable overriding the poll interval, in whole seconds.
pub const POLL_INTERVAL_ENV: &str = "EVENTHUB_POLL_INTERVAL_SECS";

const DEFAULT_API_BASE: &str = "http://localhost:3000";
const DEFAULT_SEARCH_BASE: &str = "http://localhost:9200";
const DEFAULT_POLL_INTERVAL: Duration = Duration::seconds(30);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::seconds(15);

/// Errors raised while constructing or validating a [`ClientConfig`].
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum ClientConfigError {
	/// A URL could not be parsed.
	#[error("The {endpoint} URL is invalid: {value}.")]
	InvalidUrl {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Raw value that failed to parse.
		value: String,
	},
	/// Base URLs must use HTTP(S).
	#[error("The {endpoint} URL must use http or https: {url}.")]
	UnsupportedScheme {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// URL that failed validation.
		url: String,
	},
	/// Base URLs must be able to carry a path.
	#[error("The {endpoint} URL cannot be used as a base: {url}.")]
	NotABase {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// URL that failed validation.
		url: String,
	},
	/// Durations must be strictly positive.
	#[error("The {setting} must be positive.")]
	NonPositiveDuration {
		/// Setting that failed validation.
		setting: &'static str,
	},
	/// An environment variable held a value that is not a whole number of seconds.
	#[error("Environment variable {name} must be a whole number of seconds.")]
	InvalidSeconds {
		/// Variable name.
		name: &'static str,
	},
}

/// Immutable, validated client configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
	/// Base URL of the EventHub REST API (`/api/...` paths are joined onto it).
	pub api_base: Url,
	/// Base URL of the full-text search index.
	pub search_base: Url,
	/// Interval between poller refreshes.
	pub poll_interval: Duration,
	/// Per-request timeout applied by transports built from this config.
	pub request_timeout: Duration,
}
impl ClientConfig {
	/// Creates a builder seeded with local-development defaults.
	pub fn builder() -> ClientConfigBuilder {
		ClientConfigBuilder::default()
	}

	/// Reads overrides from the process environment, falling back to the defaults.
	pub fn from_env() -> Result<Self, ClientConfigError> {
		Self::from_lookup(|name| env::var(name).ok())
	}

	/// Builds a config from an arbitrary variable lookup (the process environment in
	/// [`ClientConfig::from_env`]).
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ClientConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let mut builder = Self::builder();

		if let Some(raw) = lookup(API_URL_ENV) {
			builder = builder.api_base(parse_url("api", &raw)?);
		}
		if let Some(raw) = lookup(SEARCH_URL_ENV) {
			builder = builder.search_base(parse_url("search", &raw)?);
		}
		if let Some(raw) = lookup(POLL_INTERVAL_ENV) {
			let secs = raw
				.trim()
				.parse::<i64>()
				.map_err(|_| ClientConfigError::InvalidSeconds { name: POLL_INTERVAL_ENV })?;

			builder = builder.poll_interval(Duration::seconds(secs));
		}

		builder.build()
	}

	/// Resolves an absolute API endpoint for `path` (e.g. `api/events/7`).
	pub fn api_url(&self, path: &str) -> Result<Url> {
		join(&self.api_base, path)
	}

	/// Resolves an absolute search endpoint for `path` (e.g. `events/_search`).
	pub fn search_url(&self, path: &str) -> Result<Url> {
		join(&self.search_base, path)
	}
}
impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			api_base: default_url(DEFAULT_API_BASE),
			search_base: default_url(DEFAULT_SEARCH_BASE),
			poll_interval: DEFAULT_POLL_INTERVAL,
			request_timeout: DEFAULT_REQUEST_TIMEOUT,
		}
	}
}

/// Builder for [`ClientConfig`] values.
#[derive(Debug)]
pub struct ClientConfigBuilder {
	/// API base URL.
	pub api_base: Url,
	/// Search index base URL.
	pub search_base: Url,
	/// Poller interval.
	pub poll_interval: Duration,
	/// Request timeout.
	pub request_timeout: Duration,
}
impl ClientConfigBuilder {
	/// Sets the API base URL.
	pub fn api_base(mut self, url: Url) -> Self {
		self.api_base = url;

		self
	}

	/// Sets the search index base URL.
	pub fn search_base(mut self, url: Url) -> Self {
		self.search_base = url;

		self
	}

	/// Overrides the poll interval (defaults to 30 seconds).
	pub fn poll_interval(mut self, interval: Duration) -> Self {
		self.poll_interval = interval;

		self
	}

	/// Overrides the request timeout (defaults to 15 seconds).
	pub fn request_timeout(mut self, timeout: Duration) -> Self {
		self.request_timeout = timeout;

		self
	}

	/// Consumes the builder and validates the resulting config.
	pub fn build(self) -> Result<ClientConfig, ClientConfigError> {
		let config = ClientConfig {
			api_base: self.api_base,
			search_base: self.search_base,
			poll_interval: self.poll_interval,
			request_timeout: self.request_timeout,
		};

		config.validate()?;

		Ok(config)
	}
}
impl Default for ClientConfigBuilder {
	fn default() -> Self {
		let ClientConfig { api_base, search_base, poll_interval, request_timeout } =
			ClientConfig::default();

		Self { api_base, search_base, poll_interval, request_timeout }
	}
}

impl ClientConfig {
	fn validate(&self) -> Result<(), ClientConfigError> {
		validate_base("api", &self.api_base)?;
		validate_base("search", &self.search_base)?;

		if !self.poll_interval.is_positive() {
			return Err(ClientConfigError::NonPositiveDuration { setting: "poll interval" });
		}
		if !self.request_timeout.is_positive() {
			return Err(ClientConfigError::NonPositiveDuration { setting: "request timeout" });
		}

		Ok(())
	}
}

fn validate_base(endpoint: &'static str, url: &Url) -> Result<(), ClientConfigError> {
	if !matches!(url.scheme(), "http" | "https") {
		return Err(ClientConfigError::UnsupportedScheme { endpoint, url: url.to_string() });
	}
	if url.cannot_be_a_base() {
		return Err(ClientConfigError::NotABase { endpoint, url: url.to_string() });
	}

	Ok(())
}

fn parse_url(endpoint: &'static str, raw: &str) -> Result<Url, ClientConfigError> {
	Url::parse(raw.trim())
		.map_err(|_| ClientConfigError::InvalidUrl { endpoint, value: raw.to_owned() })
}

fn default_url(raw: &'static str) -> Url {
	match Url::parse(raw) {
		Ok(url) => url,
		Err(e) => unreachable!("default URL {raw} must parse: {e}"),
	}
}

// Joins relative to the base's full path, so `http://host/prefix` + `api/x` keeps `prefix`.
pub(crate) fn join(base: &Url, path: &str) -> Result<Url> {
	let mut base = base.clone();

	if !base.path().ends_with('/') {
		let with_slash = format!("{}/", base.path());

		base.set_path(&with_slash);
	}

	base.join(path.trim_start_matches('/')).map_err(|source| {
		ConfigError::InvalidEndpoint { path: path.to_owned(), source }.into()
	})
}
