//! Thread-safe in-memory [`SessionStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::{TokenPair, TokenSecret},
	store::{self, CompareAndSwapOutcome, SessionStore, StorageKey, StoreError, StoreFuture},
};

type StoreMap = Arc<RwLock<HashMap<StorageKey, TokenSecret>>>;

/// Thread-safe storage backend that keeps the tokens in-process for tests and demos.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreMap);
impl MemoryStore {
	/// Synchronously seeds both tokens; handy for fixtures.
	pub fn seed(&self, pair: TokenPair) {
		Self::save_pair_now(&self.0, pair);
	}

	/// Returns the value currently stored under `key` without going through a future.
	pub fn peek(&self, key: StorageKey) -> Option<TokenSecret> {
		self.0.read().get(&key).cloned()
	}

	fn save_pair_now(map: &StoreMap, pair: TokenPair) {
		let mut guard = map.write();

		guard.insert(StorageKey::AccessToken, pair.access_token);
		guard.insert(StorageKey::RefreshToken, pair.refresh_token);
	}
}
impl SessionStore for MemoryStore {
	fn get(&self, key: StorageKey) -> StoreFuture<'_, Option<TokenSecret>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(map.read().get(&key).cloned()) })
	}

	fn set(&self, key: StorageKey, value: TokenSecret) -> StoreFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move {
			map.write().insert(key, value);

			Ok(())
		})
	}

	fn remove(&self, key: StorageKey) -> StoreFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move {
			map.write().remove(&key);

			Ok(())
		})
	}

	fn save_pair(&self, pair: TokenPair) -> StoreFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move {
			Self::save_pair_now(&map, pair);

			Ok::<_, StoreError>(())
		})
	}

	fn clear(&self) -> StoreFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move {
			map.write().clear();

			Ok(())
		})
	}

	fn compare_and_swap_refresh<'a>(
		&'a self,
		expected_refresh: &'a str,
		replacement: TokenPair,
	) -> StoreFuture<'a, CompareAndSwapOutcome> {
		let map = self.0.clone();

		Box::pin(async move {
			let mut guard = map.write();

			Ok(store::cas_on_map(&mut guard, expected_refresh, replacement))
		})
	}
}
