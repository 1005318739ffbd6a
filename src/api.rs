//! Typed EventHub endpoints layered on [`EventHubClient::send`].
//!
//! Every authenticated call goes through the request helper, then through
//! [`response::ensure_success`] so statuses map onto [`Error`] variants consistently.
//! Public endpoints (login, registration) skip the helper and carry no bearer token.

pub mod auth;
pub mod events;
pub mod notifications;
pub mod organizations;
pub mod users;

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	client::{EventHubClient, RequestOptions, response},
	http::{ApiHttpClient, ApiResponse},
	obs::{CallKind, CallSpan},
};

impl<C> EventHubClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Sends an authenticated request to `path` and requires a 2xx answer.
	pub(crate) async fn call(
		&self,
		stage: &'static str,
		path: &str,
		options: RequestOptions,
	) -> Result<ApiResponse> {
		let span = CallSpan::new(CallKind::Api, stage);

		span.instrument(async move {
			let url = self.config.api_url(path)?;

			response::ensure_success(self.send(url, options).await?)
		})
		.await
	}

	/// Same as [`EventHubClient::call`], decoding the JSON body as `T`.
	pub(crate) async fn call_json<T>(
		&self,
		stage: &'static str,
		path: &str,
		options: RequestOptions,
	) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let response = self.call(stage, path, options).await?;

		response::decode_json(&response)
	}
}
