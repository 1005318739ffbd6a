//! Notification records.

// self
use crate::_prelude::*;

/// In-app notification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
	/// Notification identifier, when the server sends one.
	#[serde(default)]
	pub id: Option<u64>,
	/// Headline.
	pub message: String,
	/// Body text.
	#[serde(default)]
	pub info: String,
	/// Creation timestamp as formatted by the server.
	#[serde(default)]
	pub created_at: Option<String>,
}
