//! Client-level error types shared across the session, transport, and API layers.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Temporary upstream failure; retry with backoff.
	#[error(transparent)]
	Transient(#[from] TransientError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// No access token is stored; the caller must sign in before calling the API.
	#[error("No access token is stored; sign in first.")]
	Unauthenticated,
	/// Token refresh failed and the stored credentials were cleared.
	///
	/// The leader of a failed refresh carries the underlying cause; callers that were
	/// waiting on the same refresh receive `None`.
	#[error("Session expired; stored credentials were cleared.")]
	SessionExpired {
		/// Failure that ended the session, when this caller performed the refresh.
		#[source]
		cause: Option<Box<Error>>,
	},
	/// The API still rejected the credentials after a refresh.
	#[error("API rejected the credentials: {message}.")]
	Unauthorized {
		/// Server-supplied message.
		message: String,
	},
	/// The refresh endpoint answered with a non-success status.
	#[error("Refresh endpoint rejected the refresh token with status {status}.")]
	RefreshRejected {
		/// HTTP status code returned by the refresh endpoint.
		status: u16,
		/// Server-supplied message, if any.
		message: Option<String>,
	},
	/// Requested resource does not exist.
	#[error("Resource not found: {message}.")]
	NotFound {
		/// Server-supplied message.
		message: String,
	},
	/// The API refused the request with a user-facing message (4xx other than 401/404).
	#[error("API rejected the request with status {status}: {message}.")]
	Rejected {
		/// HTTP status code.
		status: u16,
		/// Server-supplied message.
		message: String,
	},
	/// Local validation failed before any request was sent.
	#[error("Invalid input: {reason}.")]
	InvalidInput {
		/// Which constraint was violated.
		reason: String,
	},
}
impl Error {
	/// Returns `true` when the user has to sign in again before retrying.
	pub fn requires_sign_in(&self) -> bool {
		matches!(self, Self::Unauthenticated | Self::SessionExpired { .. } | Self::Unauthorized { .. })
	}

	pub(crate) fn invalid_input(reason: impl Into<String>) -> Self {
		Self::InvalidInput { reason: reason.into() }
	}
}

/// Configuration and request-construction failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] ::http::Error),
	/// Endpoint path could not be joined onto the configured base URL.
	#[error("Endpoint `{path}` cannot be joined onto the base URL.")]
	InvalidEndpoint {
		/// Relative path that failed to join.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Client configuration failed validation.
	#[error(transparent)]
	Client(#[from] crate::config::ClientConfigError),
	/// Request body could not be serialized.
	#[error("Request body could not be serialized.")]
	RequestBody(#[source] serde_json::Error),
	/// Refresh was attempted without a stored refresh token.
	#[error("No refresh token is stored.")]
	MissingRefreshToken,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Temporary failure variants (safe to retry).
#[derive(Debug, ThisError)]
pub enum TransientError {
	/// API returned a server-side failure.
	#[error("API returned an unexpected response: {message}.")]
	Api {
		/// Server- or client-supplied message summarizing the failure.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// API responded with JSON that does not match the expected shape.
	#[error("API returned malformed JSON.")]
	ResponseParse {
		/// Structured parsing failure, including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the EventHub API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the EventHub API.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
