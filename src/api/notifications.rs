//! Notification inbox.

// self
use crate::{
	_prelude::*,
	client::{EventHubClient, RequestOptions},
	http::ApiHttpClient,
	model::{self, Notification},
};

#[derive(Deserialize)]
struct Inbox {
	#[serde(default, deserialize_with = "model::null_as_empty")]
	notifications: Vec<Notification>,
}

impl<C> EventHubClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Notifications addressed to the user, newest first as sent by the server.
	pub async fn notifications(&self) -> Result<Vec<Notification>> {
		let inbox: Inbox =
			self.call_json("notifications", "api/notifications", RequestOptions::get()).await?;

		Ok(inbox.notifications)
	}
}
