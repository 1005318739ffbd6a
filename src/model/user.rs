//! User records and registration input.

// self
use crate::{_prelude::*, model::UserId};

const MIN_PASSWORD_LEN: usize = 6;

/// Public view of a user (profile, member lists, participant lists).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
	/// User identifier.
	pub id: UserId,
	/// Given name.
	#[serde(default)]
	pub first_name: String,
	/// Family name.
	#[serde(default)]
	pub last_name: String,
	/// Unique login name.
	pub username: String,
}
impl Member {
	/// Returns `"first last"`, skipping empty parts.
	pub fn full_name(&self) -> String {
		[self.first_name.trim(), self.last_name.trim()]
			.into_iter()
			.filter(|part| !part.is_empty())
			.collect::<Vec<_>>()
			.join(" ")
	}
}

/// Sign-up form sent to `/api/register`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
	/// Given name.
	pub first_name: String,
	/// Family name.
	pub last_name: String,
	/// Desired login name.
	pub username: String,
	/// Plain-text password; never logged.
	pub password: String,
}
impl Registration {
	/// Collects the registration fields.
	pub fn new(
		first_name: impl Into<String>,
		last_name: impl Into<String>,
		username: impl Into<String>,
		password: impl Into<String>,
	) -> Self {
		Self {
			first_name: first_name.into(),
			last_name: last_name.into(),
			username: username.into(),
			password: password.into(),
		}
	}

	/// Copy with surrounding whitespace removed from the names and username.
	///
	/// The password is kept verbatim.
	pub fn trimmed(&self) -> Self {
		Self {
			first_name: self.first_name.trim().to_owned(),
			last_name: self.last_name.trim().to_owned(),
			username: self.username.trim().to_owned(),
			password: self.password.clone(),
		}
	}

	/// Rejects empty fields and passwords shorter than six characters.
	pub fn validate(&self) -> Result<()> {
		let required = [
			("first name", &self.first_name),
			("last name", &self.last_name),
			("username", &self.username),
			("password", &self.password),
		];

		for (field, value) in required {
			if value.trim().is_empty() {
				return Err(Error::invalid_input(format!("{field} is required")));
			}
		}

		if self.password.chars().count() < MIN_PASSWORD_LEN {
			return Err(Error::invalid_input(format!(
				"password must be at least {MIN_PASSWORD_LEN} characters"
			)));
		}

		Ok(())
	}
}
impl Debug for Registration {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Registration")
			.field("first_name", &self.first_name)
			.field("last_name", &self.last_name)
			.field("username", &self.username)
			.field("password", &"<redacted>")
			.finish()
	}
}
