//! Event feed, details, participation, and creator-only mutations.

// crates.io
use ::http::StatusCode;
// self
use crate::{
	_prelude::*,
	client::{EventHubClient, RequestOptions, response},
	http::ApiHttpClient,
	model::{EventDetail, EventDraft, EventFeed, EventId, Member, OrganizationId},
	obs::{CallKind, CallSpan},
};

#[derive(Deserialize)]
struct Participants {
	#[serde(default, deserialize_with = "crate::model::null_as_empty")]
	participants: Vec<Member>,
}

impl<C> EventHubClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Home feed; a `404` is treated as "no events yet".
	pub async fn events(&self) -> Result<EventFeed> {
		CallSpan::new(CallKind::Api, "events")
			.instrument(async move {
				let url = self.config.api_url("api/events")?;
				let response = self.send(url, RequestOptions::get()).await?;

				if response.status() == StatusCode::NOT_FOUND {
					return Ok(EventFeed::default());
				}

				response::decode_json(&response::ensure_success(response)?)
			})
			.await
	}

	/// One event with the caller's creator/participant flags.
	pub async fn event(&self, id: EventId) -> Result<EventDetail> {
		self.call_json("event", &format!("api/events/{id}"), RequestOptions::get()).await
	}

	/// Users that joined the event.
	pub async fn event_participants(&self, id: EventId) -> Result<Vec<Member>> {
		let body: Participants = self
			.call_json(
				"event_participants",
				&format!("api/events/{id}/participants"),
				RequestOptions::get(),
			)
			.await?;

		Ok(body.participants)
	}

	/// Joins the event.
	pub async fn join_event(&self, id: EventId) -> Result<()> {
		self.call("join_event", &format!("api/events/{id}/join"), RequestOptions::post()).await?;

		Ok(())
	}

	/// Leaves the event.
	pub async fn quit_event(&self, id: EventId) -> Result<()> {
		self.call("quit_event", &format!("api/events/{id}/quit"), RequestOptions::delete()).await?;

		Ok(())
	}

	/// Deletes the event (creator only).
	pub async fn delete_event(&self, id: EventId) -> Result<()> {
		self.call("delete_event", &format!("api/events/{id}/delete"), RequestOptions::delete())
			.await?;

		Ok(())
	}

	/// Creates an event in `organization` (founder only).
	pub async fn create_event(
		&self,
		organization: OrganizationId,
		draft: &EventDraft,
	) -> Result<()> {
		draft.validate()?;

		let options = RequestOptions::post().json(draft)?;

		self.call("create_event", &format!("api/organizations/{organization}/events"), options)
			.await?;

		Ok(())
	}

	/// Replaces the editable fields of an existing event (founder only).
	pub async fn update_event(
		&self,
		organization: OrganizationId,
		event: EventId,
		draft: &EventDraft,
	) -> Result<()> {
		draft.validate()?;

		let options = RequestOptions::put().json(draft)?;

		self.call(
			"update_event",
			&format!("api/organizations/{organization}/events/{event}/update"),
			options,
		)
		.await?;

		Ok(())
	}
}
