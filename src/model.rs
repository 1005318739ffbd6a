//! Records exchanged with the EventHub API.

pub mod event;
pub mod id;
pub mod notification;
pub mod organization;
pub mod user;

pub use event::*;
pub use id::*;
pub use notification::*;
pub use organization::*;
pub use user::*;

// self
use crate::_prelude::*;

/// Decodes a JSON list that the API may send as `null`.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
	D: serde::Deserializer<'de>,
	T: Deserialize<'de>,
{
	Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
