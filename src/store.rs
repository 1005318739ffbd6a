//! Storage contracts and built-in backends for the persisted session tokens.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	auth::{TokenPair, TokenSecret},
};

/// Boxed future returned by [`SessionStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Fixed keys under which the session tokens are persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageKey {
	/// Short-lived bearer credential.
	#[serde(rename = "accessToken")]
	AccessToken,
	/// Long-lived refresh credential.
	#[serde(rename = "refreshToken")]
	RefreshToken,
}
impl StorageKey {
	/// Every key the session writes.
	pub const ALL: [Self; 2] = [Self::AccessToken, Self::RefreshToken];

	/// Returns the persisted key name.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::AccessToken => "accessToken",
			Self::RefreshToken => "refreshToken",
		}
	}
}
impl Display for StorageKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Key/value persistence contract for the session tokens.
///
/// `get`/`set`/`remove` mirror a device key/value store. The pair-level operations have
/// default implementations built on them; backends that can update both keys at once
/// should override them.
pub trait SessionStore
where
	Self: Send + Sync,
{
	/// Reads the value stored under `key`.
	fn get(&self, key: StorageKey) -> StoreFuture<'_, Option<TokenSecret>>;

	/// Stores `value` under `key`, replacing any previous value.
	fn set(&self, key: StorageKey, value: TokenSecret) -> StoreFuture<'_, ()>;

	/// Deletes `key`; deleting an absent key is not an error.
	fn remove(&self, key: StorageKey) -> StoreFuture<'_, ()>;

	/// Persists both tokens of `pair`.
	fn save_pair(&self, pair: TokenPair) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			self.set(StorageKey::AccessToken, pair.access_token).await?;
			self.set(StorageKey::RefreshToken, pair.refresh_token).await
		})
	}

	/// Deletes both tokens.
	fn clear(&self) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			for key in StorageKey::ALL {
				self.remove(key).await?;
			}

			Ok(())
		})
	}

	/// Replaces both tokens only if the stored refresh token still equals `expected_refresh`.
	fn compare_and_swap_refresh<'a>(
		&'a self,
		expected_refresh: &'a str,
		replacement: TokenPair,
	) -> StoreFuture<'a, CompareAndSwapOutcome>;
}

/// Result of a refresh-token compare-and-swap attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareAndSwapOutcome {
	/// The refresh token matched the expected value and the pair was replaced.
	Updated,
	/// A different refresh token is stored (the user signed in again meanwhile).
	RefreshMismatch,
	/// No refresh token is stored (the user signed out meanwhile).
	Missing,
}

/// Error type produced by [`SessionStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

pub(crate) fn cas_on_map(
	map: &mut HashMap<StorageKey, TokenSecret>,
	expected_refresh: &str,
	replacement: TokenPair,
) -> CompareAndSwapOutcome {
	let outcome = match map.get(&StorageKey::RefreshToken) {
		Some(current) if current.expose() == expected_refresh => CompareAndSwapOutcome::Updated,
		Some(_) => CompareAndSwapOutcome::RefreshMismatch,
		None => CompareAndSwapOutcome::Missing,
	};

	if matches!(outcome, CompareAndSwapOutcome::Updated) {
		map.insert(StorageKey::AccessToken, replacement.access_token);
		map.insert(StorageKey::RefreshToken, replacement.refresh_token);
	}

	outcome
}
