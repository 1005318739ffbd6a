//! Refresh-token exchange against `/api/refresh`.

// self
use crate::{
	_prelude::*,
	auth::{RefreshGrant, TokenSecret},
	client::{EventHubClient, RequestOptions, response},
	http::ApiHttpClient,
};

#[derive(Serialize)]
struct RefreshRequest<'a> {
	refresh_token: &'a str,
}

impl<C> EventHubClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Exchanges `refresh` for a new access token without a bearer header.
	///
	/// Any non-2xx answer becomes [`Error::RefreshRejected`]; callers normally reach this
	/// through [`Session::renew`](crate::auth::Session::renew) rather than directly.
	pub async fn exchange_refresh_token(&self, refresh: TokenSecret) -> Result<RefreshGrant> {
		let url = self.config.api_url("api/refresh")?;
		let request = RequestOptions::post()
			.json(&RefreshRequest { refresh_token: refresh.expose() })?
			.build(&url, None)?;
		let response = self.execute(request).await?;

		if !response.status().is_success() {
			return Err(Error::RefreshRejected {
				status: response.status().as_u16(),
				message: response::error_message(&response),
			});
		}

		response::decode_json(&response)
	}
}
