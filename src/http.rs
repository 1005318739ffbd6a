//! Transport primitives for EventHub API calls.
//!
//! The module exposes [`ApiHttpClient`] alongside [`ResponseMetadata`] so downstream
//! crates can plug in custom HTTP stacks (mock transports, platform networking) without
//! losing the client's status classification. Requests and responses use the `http`
//! crate's types with owned byte bodies, which keeps implementations free of any
//! particular client library.

// std
use std::ops::Deref;
// crates.io
use ::http::{HeaderMap, Request, Response, header::RETRY_AFTER};
use time::format_description::well_known::Rfc2822;
// self
use crate::_prelude::*;

/// Outbound request handed to an [`ApiHttpClient`].
pub type ApiRequest = Request<Vec<u8>>;
/// Fully buffered response returned by an [`ApiHttpClient`].
pub type ApiResponse = Response<Vec<u8>>;
/// Boxed future returned by [`ApiHttpClient::execute`].
pub type HttpFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing EventHub API calls.
///
/// The trait is the client's only dependency on an HTTP stack. Implementations must be
/// `Send + Sync + 'static` so one transport can be shared by the API client and the
/// search client, and the returned futures must be `Send` so calls can hop executors.
/// A transport reports every HTTP response it receives, including 4xx/5xx statuses, as
/// `Ok`; only failures that prevent a response (DNS, TLS, reset connections) are errors.
pub trait ApiHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Sends `request` and buffers the full response body.
	fn execute(&self, request: ApiRequest) -> HttpFuture<'_, ApiResponse, Self::TransportError>;
}

/// Status information extracted from an API response for error classification.
///
/// Additional metadata fields may be added in future releases, so downstream code
/// should construct values using field names instead of struct update syntax.
#[derive(Clone, Debug, Default)]
pub struct ResponseMetadata {
	/// HTTP status code returned by the API.
	pub status: Option<u16>,
	/// Retry-After hint expressed as a relative duration.
	pub retry_after: Option<Duration>,
}
impl ResponseMetadata {
	/// Captures the status and Retry-After hint of `response`.
	pub fn from_response(response: &ApiResponse) -> Self {
		Self {
			status: Some(response.status().as_u16()),
			retry_after: parse_retry_after(response.headers()),
		}
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a reqwest client honoring the configured request timeout.
	pub fn from_config(config: &crate::config::ClientConfig) -> Result<Self> {
		let timeout = std::time::Duration::try_from(config.request_timeout)
			.map_err(crate::error::ConfigError::http_client_build)?;
		let client = ReqwestClient::builder()
			.timeout(timeout)
			.build()
			.map_err(crate::error::ConfigError::from)?;

		Ok(Self(client))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiHttpClient for ReqwestHttpClient {
	type TransportError = ReqwestError;

	fn execute(&self, request: ApiRequest) -> HttpFuture<'_, ApiResponse, Self::TransportError> {
		let client = self.0.clone();

		Box::pin(async move {
			let request = reqwest::Request::try_from(request)?;
			let response = client.execute(request).await?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let mut buffered = Response::new(response.bytes().await?.to_vec());

			*buffered.status_mut() = status;
			*buffered.headers_mut() = headers;

			Ok(buffered)
		})
	}
}

fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let value = headers.get(RETRY_AFTER)?;
	let raw = value.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<u64>() {
		return Some(Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX)));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}

#[cfg(test)]
mod tests {
	// crates.io
	use ::http::{HeaderValue, StatusCode};
	// self
	use super::*;

	fn response(status: StatusCode, retry_after: Option<&'static str>) -> ApiResponse {
		let mut response = Response::new(Vec::new());

		*response.status_mut() = status;

		if let Some(value) = retry_after {
			response.headers_mut().insert(RETRY_AFTER, HeaderValue::from_static(value));
		}

		response
	}

	#[test]
	fn metadata_reads_status_and_delta_seconds() {
		let meta =
			ResponseMetadata::from_response(&response(StatusCode::SERVICE_UNAVAILABLE, Some("7")));

		assert_eq!(meta.status, Some(503));
		assert_eq!(meta.retry_after, Some(Duration::seconds(7)));
	}

	#[test]
	fn metadata_ignores_past_or_garbled_retry_after() {
		let past = ResponseMetadata::from_response(&response(
			StatusCode::TOO_MANY_REQUESTS,
			Some("Wed, 21 Oct 2015 07:28:00 GMT"),
		));

		assert_eq!(past.retry_after, None);

		let garbled =
			ResponseMetadata::from_response(&response(StatusCode::BAD_GATEWAY, Some("soon")));

		assert_eq!(garbled.retry_after, None);
	}
}
