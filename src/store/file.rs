//! Simple file-backed [`SessionStore`] for desktop shells and command-line tools.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	auth::{TokenPair, TokenSecret},
	store::{self, CompareAndSwapOutcome, SessionStore, StorageKey, StoreError, StoreFuture},
};

/// Persists the session tokens to a JSON object after each mutation.
#[derive(Clone, Debug)]
pub struct FileStore {
	path: PathBuf,
	inner: Arc<RwLock<HashMap<StorageKey, TokenSecret>>>,
}
impl FileStore {
	/// Opens (or creates) a store at the provided path, eagerly loading existing data.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let snapshot = Self::load_snapshot(&path)?;

		Ok(Self { path, inner: Arc::new(RwLock::new(snapshot)) })
	}

	/// Location of the backing JSON file.
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn load_snapshot(path: &Path) -> Result<HashMap<StorageKey, TokenSecret>, StoreError> {
		if !path.exists() {
			return Ok(HashMap::new());
		}

		let bytes = fs::read(path).map_err(|e| StoreError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;

		if bytes.iter().all(u8::is_ascii_whitespace) {
			return Ok(HashMap::new());
		}

		serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization {
			message: format!("Failed to parse {}: {e}", path.display()),
		})
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create store directory {}: {e}", parent.display()),
			})?;
		}

		Ok(())
	}

	fn persist_locked(&self, contents: &HashMap<StorageKey, TokenSecret>) -> Result<(), StoreError> {
		Self::ensure_parent_exists(&self.path)?;

		let serialized =
			serde_json::to_vec_pretty(contents).map_err(|e| StoreError::Serialization {
				message: format!("Failed to serialize session snapshot: {e}"),
			})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| StoreError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StoreError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}

	fn mutate<F, T>(&self, f: F) -> Result<T, StoreError>
	where
		F: FnOnce(&mut HashMap<StorageKey, TokenSecret>) -> (T, bool),
	{
		let mut guard = self.inner.write();
		let mut next = guard.clone();
		let (value, changed) = f(&mut next);

		// Memory only moves once the snapshot is on disk.
		if changed {
			self.persist_locked(&next)?;

			*guard = next;
		}

		Ok(value)
	}
}
impl SessionStore for FileStore {
	fn get(&self, key: StorageKey) -> StoreFuture<'_, Option<TokenSecret>> {
		Box::pin(async move { Ok(self.inner.read().get(&key).cloned()) })
	}

	fn set(&self, key: StorageKey, value: TokenSecret) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			self.mutate(|map| {
				map.insert(key, value);

				((), true)
			})
		})
	}

	fn remove(&self, key: StorageKey) -> StoreFuture<'_, ()> {
		Box::pin(async move { self.mutate(|map| ((), map.remove(&key).is_some())) })
	}

	fn save_pair(&self, pair: TokenPair) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			self.mutate(|map| {
				map.insert(StorageKey::AccessToken, pair.access_token);
				map.insert(StorageKey::RefreshToken, pair.refresh_token);

				((), true)
			})
		})
	}

	fn clear(&self) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			self.mutate(|map| {
				let changed = !map.is_empty();

				map.clear();

				((), changed)
			})
		})
	}

	fn compare_and_swap_refresh<'a>(
		&'a self,
		expected_refresh: &'a str,
		replacement: TokenPair,
	) -> StoreFuture<'a, CompareAndSwapOutcome> {
		Box::pin(async move {
			self.mutate(|map| {
				let outcome = store::cas_on_map(map, expected_refresh, replacement);

				(outcome, matches!(outcome, CompareAndSwapOutcome::Updated))
			})
		})
	}
}
