//! Strongly typed identifiers used across the API surface.

// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(u64);
		impl $name {
			/// Wraps a raw numeric identifier.
			pub const fn new(value: u64) -> Self {
				Self(value)
			}

			/// Returns the raw numeric identifier.
			pub const fn get(self) -> u64 {
				self.0
			}
		}
		impl From<u64> for $name {
			fn from(value: u64) -> Self {
				Self(value)
			}
		}
		impl From<$name> for u64 {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				Display::fmt(&self.0, f)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				if s.is_empty() {
					return Err(IdentifierError::Empty { kind: $kind });
				}

				s.parse::<u64>()
					.map(Self)
					.map_err(|_| IdentifierError::NotNumeric { kind: $kind, value: s.to_owned() })
			}
		}
	};
}

const INVITE_CODE_MAX_LEN: usize = 32;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty or whitespace.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (event, organization, user, invite code).
		kind: &'static str,
	},
	/// A numeric identifier could not be parsed.
	#[error("{kind} identifier `{value}` is not a number.")]
	NotNumeric {
		/// Kind of identifier.
		kind: &'static str,
		/// Rejected input.
		value: String,
	},
	/// The identifier contains characters outside the accepted alphabet.
	#[error("{kind} identifier may only contain ASCII letters and digits.")]
	InvalidCharacter {
		/// Kind of identifier.
		kind: &'static str,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier.
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
}
impl From<IdentifierError> for Error {
	fn from(e: IdentifierError) -> Self {
		Error::invalid_input(e.to_string())
	}
}

def_id! { EventId, "Numeric identifier of an event.", "Event" }
def_id! { OrganizationId, "Numeric identifier of an organization.", "Organization" }
def_id! { UserId, "Numeric identifier of a user.", "User" }

/// Organization invite code, normalized to upper case.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InviteCode(String);
impl InviteCode {
	/// Validates `value` (surrounding whitespace is ignored) and upper-cases it.
	pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
		const KIND: &str = "Invite code";

		let view = value.as_ref().trim();

		if view.is_empty() {
			return Err(IdentifierError::Empty { kind: KIND });
		}
		if !view.chars().all(|c| c.is_ascii_alphanumeric()) {
			return Err(IdentifierError::InvalidCharacter { kind: KIND });
		}
		if view.len() > INVITE_CODE_MAX_LEN {
			return Err(IdentifierError::TooLong { kind: KIND, max: INVITE_CODE_MAX_LEN });
		}

		Ok(Self(view.to_ascii_uppercase()))
	}
}
impl AsRef<str> for InviteCode {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl From<InviteCode> for String {
	fn from(value: InviteCode) -> Self {
		value.0
	}
}
impl TryFrom<String> for InviteCode {
	type Error = IdentifierError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}
impl Debug for InviteCode {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "InviteCode({})", self.0)
	}
}
impl Display for InviteCode {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl FromStr for InviteCode {
	type Err = IdentifierError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}
