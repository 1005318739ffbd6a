//! User profiles.

// self
use crate::{
	_prelude::*,
	client::{EventHubClient, RequestOptions},
	http::ApiHttpClient,
	model::{Member, UserId},
};

#[derive(Deserialize)]
struct UserEnvelope {
	user: Member,
}

impl<C> EventHubClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Profile of the signed-in user.
	pub async fn profile(&self) -> Result<Member> {
		let body: UserEnvelope =
			self.call_json("profile", "api/users/profile", RequestOptions::get()).await?;

		Ok(body.user)
	}

	/// Public profile of another user.
	pub async fn user(&self, id: UserId) -> Result<Member> {
		let body: UserEnvelope =
			self.call_json("user", &format!("api/users/{id}"), RequestOptions::get()).await?;

		Ok(body.user)
	}
}
