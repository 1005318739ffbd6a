//! Event records, feeds, and the create/update payload.

// crates.io
use time::{Date, Time};
// self
use crate::{
	_prelude::*,
	model::{self, EventId, OrganizationId, UserId},
};

time::serde::format_description!(clock_time, Time, "[hour]:[minute]:[second]");

/// Lifecycle state reported by the API.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventStatus {
	/// Upcoming or running.
	Active,
	/// Finished.
	Completed,
	/// Removed by its creator.
	Deleted,
	/// Any status this client does not know about, preserved verbatim.
	Other(String),
}
impl EventStatus {
	/// Returns the wire label.
	pub fn as_str(&self) -> &str {
		match self {
			Self::Active => "active",
			Self::Completed => "completed",
			Self::Deleted => "deleted",
			Self::Other(raw) => raw,
		}
	}
}
impl From<String> for EventStatus {
	fn from(value: String) -> Self {
		match value.as_str() {
			"active" => Self::Active,
			"completed" => Self::Completed,
			"deleted" => Self::Deleted,
			_ => Self::Other(value),
		}
	}
}
impl From<EventStatus> for String {
	fn from(value: EventStatus) -> Self {
		match value {
			EventStatus::Other(raw) => raw,
			known => known.as_str().to_owned(),
		}
	}
}
impl Display for EventStatus {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Event as rendered by lists and detail views.
///
/// Date and time fields are passed through exactly as the server formats them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
	/// Event identifier.
	pub id: EventId,
	/// Title.
	pub title: String,
	/// Free-form description.
	#[serde(default)]
	pub description: String,
	/// Category label.
	#[serde(default)]
	pub category: String,
	/// Whether users outside the organization can join.
	#[serde(default)]
	pub is_public: bool,
	/// Lifecycle state.
	pub status: EventStatus,
	/// Calendar date.
	#[serde(default)]
	pub date: String,
	/// Start time.
	#[serde(default)]
	pub start_time: String,
	/// End time.
	#[serde(default)]
	pub end_time: String,
	/// Venue.
	#[serde(default)]
	pub location: String,
	/// User that created the event.
	#[serde(default)]
	pub creator_id: UserId,
	/// Organization hosting the event; search documents spell the key `organization_d`.
	#[serde(default, alias = "organization_d")]
	pub organization_id: OrganizationId,
}

/// Home feed returned by `GET /api/events`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFeed {
	/// Events the user joined.
	#[serde(default, deserialize_with = "model::null_as_empty")]
	pub joined_events: Vec<Event>,
	/// Public events open to everyone.
	#[serde(default, deserialize_with = "model::null_as_empty")]
	pub open_events: Vec<Event>,
	/// Events of the organizations the user belongs to.
	#[serde(default, deserialize_with = "model::null_as_empty")]
	pub organizations_events: Vec<Event>,
}
impl EventFeed {
	/// Returns `true` when every list is empty.
	pub fn is_empty(&self) -> bool {
		self.joined_events.is_empty()
			&& self.open_events.is_empty()
			&& self.organizations_events.is_empty()
	}
}

/// Single event plus the caller's relationship to it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDetail {
	/// The event.
	pub event: Event,
	/// Whether the caller created the event.
	#[serde(default)]
	pub is_creator: bool,
	/// Whether the caller joined the event.
	#[serde(default)]
	pub is_joined: bool,
}

/// Payload for creating or updating an event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
	/// Title.
	pub title: String,
	/// Description.
	pub description: String,
	/// Category label.
	pub category: String,
	/// Whether users outside the organization can join.
	pub is_public: bool,
	/// Venue.
	pub location: String,
	/// Calendar date, sent as an RFC 3339 timestamp at midnight UTC.
	#[serde(with = "time::serde::rfc3339")]
	pub date: OffsetDateTime,
	/// Start time, sent as `HH:MM:SS`.
	#[serde(with = "clock_time")]
	pub start_time: Time,
	/// End time, sent as `HH:MM:SS`.
	#[serde(with = "clock_time")]
	pub end_time: Time,
}
impl EventDraft {
	/// Creates a private draft on `date` between `start_time` and `end_time`.
	pub fn new(title: impl Into<String>, date: Date, start_time: Time, end_time: Time) -> Self {
		Self {
			title: title.into(),
			description: String::new(),
			category: String::new(),
			is_public: false,
			location: String::new(),
			date: date.midnight().assume_utc(),
			start_time,
			end_time,
		}
	}

	/// Sets the description.
	pub fn description(mut self, description: impl Into<String>) -> Self {
		self.description = description.into();

		self
	}

	/// Sets the category label.
	pub fn category(mut self, category: impl Into<String>) -> Self {
		self.category = category.into();

		self
	}

	/// Sets the venue.
	pub fn location(mut self, location: impl Into<String>) -> Self {
		self.location = location.into();

		self
	}

	/// Marks the event as public or private.
	pub fn public(mut self, is_public: bool) -> Self {
		self.is_public = is_public;

		self
	}

	/// Checks that every text field the API requires is filled in.
	pub fn validate(&self) -> Result<()> {
		let required = [
			("title", &self.title),
			("description", &self.description),
			("category", &self.category),
			("location", &self.location),
		];

		for (field, value) in required {
			if value.trim().is_empty() {
				return Err(Error::invalid_input(format!("event {field} is required")));
			}
		}

		Ok(())
	}
}
