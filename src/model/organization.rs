//! Organization records.

// self
use crate::{
	_prelude::*,
	model::{self, Event, InviteCode, OrganizationId, UserId},
};

/// Organization as listed and shown in detail views.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
	/// Organization identifier.
	pub id: OrganizationId,
	/// Unique display name.
	pub name: String,
	/// User that founded the organization.
	#[serde(default)]
	pub founder_id: UserId,
	/// Code other users enter to join; empty when the server withholds it.
	#[serde(default)]
	pub invite_code: String,
}
impl Organization {
	/// Parses the invite code, if the server sent a valid one.
	pub fn invite(&self) -> Option<InviteCode> {
		InviteCode::new(&self.invite_code).ok()
	}
}

/// Organizations returned by `GET /api/organizations`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationList {
	/// Organizations the user is a member of.
	#[serde(default, deserialize_with = "model::null_as_empty")]
	pub joined: Vec<Organization>,
	/// Organizations the user founded.
	#[serde(default, deserialize_with = "model::null_as_empty")]
	pub founded: Vec<Organization>,
}

/// Single organization plus the caller's relationship to it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationDetail {
	/// The organization.
	pub organization: Organization,
	/// Whether the caller founded it.
	#[serde(default)]
	pub is_creator: bool,
}

/// Events hosted by one organization, split by lifecycle.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationEvents {
	/// Upcoming or running events.
	#[serde(default, deserialize_with = "model::null_as_empty")]
	pub active: Vec<Event>,
	/// Finished events.
	#[serde(default, deserialize_with = "model::null_as_empty")]
	pub completed: Vec<Event>,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn list_decodes_with_null_and_parses_codes() {
		let list: OrganizationList = serde_json::from_str(
			r#"{"joined":null,"founded":[{"id":5,"name":"Chess club","founder_id":9,"invite_code":"ab12"}]}"#,
		)
		.expect("Organization list should decode.");

		assert!(list.joined.is_empty());
		assert_eq!(list.founded[0].id, OrganizationId::new(5));
		assert_eq!(list.founded[0].invite().map(String::from).as_deref(), Some("AB12"));
	}
}
