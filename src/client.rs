//! Bearer-authenticated request helper shared by every typed API call.
//!
//! [`EventHubClient::send`] attaches the stored access token, and when the API answers
//! `401` it renews the token through the session's single-flight gate and replays the
//! request once. The replayed response is returned as-is, even if it is another `401`.

pub mod refresh;
pub mod response;

// crates.io
use ::http::{
	HeaderMap, HeaderName, HeaderValue, Method, Request, StatusCode,
	header::{AUTHORIZATION, CONTENT_TYPE},
};
// self
use crate::{
	_prelude::*,
	auth::{Session, TokenSecret},
	config::ClientConfig,
	error::{ConfigError, TransportError},
	http::{ApiHttpClient, ApiRequest, ApiResponse},
	obs::{self, CallKind, CallOutcome, CallSpan},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

/// Method, headers, and body of a request sent through [`EventHubClient::send`].
///
/// Options are reusable: the helper rebuilds the request from them when it retries.
#[derive(Clone, Debug)]
pub struct RequestOptions {
	/// HTTP method.
	pub method: Method,
	/// Caller headers; `Authorization` and `Content-Type` are always overwritten.
	pub headers: HeaderMap,
	/// Request body.
	pub body: Vec<u8>,
}
impl RequestOptions {
	/// Creates options for `method` with no headers and an empty body.
	pub fn new(method: Method) -> Self {
		Self { method, headers: HeaderMap::new(), body: Vec::new() }
	}

	/// `GET` request options.
	pub fn get() -> Self {
		Self::new(Method::GET)
	}

	/// `POST` request options.
	pub fn post() -> Self {
		Self::new(Method::POST)
	}

	/// `PUT` request options.
	pub fn put() -> Self {
		Self::new(Method::PUT)
	}

	/// `DELETE` request options.
	pub fn delete() -> Self {
		Self::new(Method::DELETE)
	}

	/// Adds a caller header.
	pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
		self.headers.insert(name, value);

		self
	}

	/// Sets a raw body.
	pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
		self.body = body.into();

		self
	}

	/// Serializes `value` as the JSON body.
	pub fn json<T>(mut self, value: &T) -> Result<Self>
	where
		T: ?Sized + Serialize,
	{
		self.body = serde_json::to_vec(value).map_err(ConfigError::RequestBody)?;

		Ok(self)
	}

	pub(crate) fn build(&self, url: &Url, token: Option<&TokenSecret>) -> Result<ApiRequest> {
		let mut request = Request::builder()
			.method(self.method.clone())
			.uri(url.as_str())
			.body(self.body.clone())
			.map_err(ConfigError::from)?;
		let headers = request.headers_mut();

		headers.extend(self.headers.clone());

		if let Some(token) = token {
			headers.insert(AUTHORIZATION, token.bearer_header()?);
		}

		headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

		Ok(request)
	}
}

/// Entry point for talking to the EventHub API on behalf of one [`Session`].
pub struct EventHubClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// HTTP transport shared by every call.
	pub http_client: Arc<C>,
	/// Session holding the credentials used for bearer authentication.
	pub session: Arc<Session>,
	/// Endpoint and timing configuration.
	pub config: ClientConfig,
}
impl<C> EventHubClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_http_client(
		config: ClientConfig,
		session: Arc<Session>,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self { http_client: http_client.into(), session, config }
	}

	/// Sends a bearer-authenticated request, renewing the token once on `401`.
	///
	/// Fails with [`Error::Unauthenticated`] before touching the network when no access
	/// token is stored. A failed renewal surfaces as [`Error::SessionExpired`]; non-2xx
	/// responses are otherwise returned to the caller untouched.
	pub async fn send(&self, url: Url, options: RequestOptions) -> Result<ApiResponse> {
		const KIND: CallKind = CallKind::Api;

		let span = CallSpan::new(KIND, "send");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				let token = self.session.access_token().await?;
				let response = self.execute(options.build(&url, Some(&token))?).await?;

				if response.status() != StatusCode::UNAUTHORIZED {
					return Ok(response);
				}

				let renewed = self
					.session
					.renew(&token, |refresh| self.exchange_refresh_token(refresh))
					.await?;

				self.execute(options.build(&url, Some(&renewed))?).await
			})
			.await;

		obs::record_result(KIND, &result);

		result
	}

	pub(crate) async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
		self.http_client.execute(request).await.map_err(|e| TransportError::network(e).into())
	}
}
#[cfg(feature = "reqwest")]
impl EventHubClient<ReqwestHttpClient> {
	/// Creates a client with its own reqwest transport honoring the configured timeout.
	pub fn new(config: ClientConfig, session: Arc<Session>) -> Result<Self> {
		let http_client = ReqwestHttpClient::from_config(&config)?;

		Ok(Self::with_http_client(config, session, http_client))
	}
}
impl<C> Clone for EventHubClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			session: self.session.clone(),
			config: self.config.clone(),
		}
	}
}
impl<C> Debug for EventHubClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("EventHubClient")
			.field("session", &self.session)
			.field("config", &self.config)
			.finish_non_exhaustive()
	}
}
