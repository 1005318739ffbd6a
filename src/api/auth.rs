//! Login, registration, and logout.

// self
use crate::{
	_prelude::*,
	auth::TokenPair,
	client::{EventHubClient, RequestOptions, response},
	http::ApiHttpClient,
	model::Registration,
	obs::{self, CallKind, CallOutcome, CallSpan},
};

#[derive(Serialize)]
struct Credentials<'a> {
	username: &'a str,
	password: &'a str,
}

impl<C> EventHubClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Exchanges credentials for a token pair and signs the session in.
	///
	/// Empty fields fail with [`Error::InvalidInput`] before any request is sent.
	pub async fn login(&self, username: &str, password: &str) -> Result<()> {
		const KIND: CallKind = CallKind::SignIn;

		if username.trim().is_empty() || password.is_empty() {
			return Err(Error::invalid_input("username and password are required"));
		}

		let span = CallSpan::new(KIND, "login");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				let url = self.config.api_url("api/login")?;
				let request = RequestOptions::post()
					.json(&Credentials { username: username.trim(), password })?
					.build(&url, None)?;
				let response = response::ensure_success(self.execute(request).await?)?;
				let pair: TokenPair = response::decode_json(&response)?;

				self.session.sign_in(pair).await
			})
			.await;

		obs::record_result(KIND, &result);

		result
	}

	/// Creates an account, then logs in with the same credentials.
	///
	/// The registration endpoint only answers with a confirmation message, so the token
	/// pair comes from the follow-up login. Names and username are sent trimmed, the same
	/// way [`login`](Self::login) sends the username.
	pub async fn register(&self, registration: &Registration) -> Result<()> {
		const KIND: CallKind = CallKind::SignIn;

		let trimmed = registration.trimmed();
		let registration = &trimmed;

		registration.validate()?;

		let span = CallSpan::new(KIND, "register");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				let url = self.config.api_url("api/register")?;
				let request = RequestOptions::post().json(registration)?.build(&url, None)?;

				response::ensure_success(self.execute(request).await?)?;

				Ok(())
			})
			.await;

		obs::record_result(KIND, &result);
		result?;

		self.login(&registration.username, &registration.password).await
	}

	/// Signs the session out; no request is sent.
	pub async fn logout(&self) -> Result<()> {
		self.session.sign_out().await
	}
}
