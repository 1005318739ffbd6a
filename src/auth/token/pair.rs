//! Access/refresh token pairs issued by the login and refresh endpoints.

// self
use crate::{_prelude::*, auth::token::secret::TokenSecret};

/// Access + refresh credentials issued by `/api/login`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
	/// Short-lived bearer credential.
	pub access_token: TokenSecret,
	/// Long-lived credential exchanged for new access tokens.
	pub refresh_token: TokenSecret,
}
impl TokenPair {
	/// Creates a pair from raw token strings.
	pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
		Self {
			access_token: TokenSecret::new(access_token),
			refresh_token: TokenSecret::new(refresh_token),
		}
	}
}

/// Payload returned by `/api/refresh`.
///
/// The server may rotate the refresh token; when it does not, the stored refresh token
/// stays in place.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshGrant {
	/// Replacement access token.
	pub access_token: TokenSecret,
	/// Rotated refresh token, if issued.
	#[serde(default)]
	pub refresh_token: Option<TokenSecret>,
}
impl RefreshGrant {
	/// Resolves the pair that should replace the stored credentials.
	pub fn into_pair(self, current_refresh: TokenSecret) -> TokenPair {
		TokenPair {
			access_token: self.access_token,
			refresh_token: self.refresh_token.unwrap_or(current_refresh),
		}
	}
}
