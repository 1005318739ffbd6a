//! Session lifecycle over a [`SessionStore`]: restore, sign-in, sign-out, and listeners.

// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::{
	_prelude::*,
	auth::{RefreshMetrics, TokenPair, TokenSecret},
	store::{SessionStore, StorageKey},
};

type Listener = Arc<dyn Fn(&SessionEvent) + Send + Sync>;

/// Whether persisted credentials were found at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
	/// Both tokens are present.
	SignedIn,
	/// At least one token is missing.
	SignedOut,
}

/// Lifecycle notifications delivered to [`Session::subscribe`] listeners.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
	/// A token pair was stored after login or registration.
	SignedIn,
	/// The access token was replaced by a refresh.
	Refreshed,
	/// The user signed out explicitly.
	SignedOut,
	/// A refresh failed and the stored tokens were cleared.
	Expired,
}

/// Handle returned by [`Session::subscribe`]; pass it to [`Session::unsubscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Owns the persisted credentials and serializes token renewal.
pub struct Session {
	pub(super) store: Arc<dyn SessionStore>,
	pub(super) refresh_guard: AsyncMutex<()>,
	/// Counters for refresh exchanges performed through this session.
	pub refresh_metrics: Arc<RefreshMetrics>,
	listeners: RwLock<Vec<(SubscriptionId, Listener)>>,
	next_subscription: AtomicU64,
	refreshed_at: Mutex<Option<OffsetDateTime>>,
}
impl Session {
	/// Creates a session over `store`; nothing is read until [`Session::restore`].
	pub fn new(store: Arc<dyn SessionStore>) -> Self {
		Self {
			store,
			refresh_guard: AsyncMutex::new(()),
			refresh_metrics: Default::default(),
			listeners: RwLock::new(Vec::new()),
			next_subscription: AtomicU64::new(0),
			refreshed_at: Mutex::new(None),
		}
	}

	/// Reports whether a complete token pair survived from a previous run.
	pub async fn restore(&self) -> Result<SessionStatus> {
		let access = self.store.get(StorageKey::AccessToken).await?;
		let refresh = self.store.get(StorageKey::RefreshToken).await?;

		Ok(match (access, refresh) {
			(Some(_), Some(_)) => SessionStatus::SignedIn,
			_ => SessionStatus::SignedOut,
		})
	}

	/// Persists `pair` and notifies listeners.
	pub async fn sign_in(&self, pair: TokenPair) -> Result<()> {
		self.store.save_pair(pair).await?;
		self.emit(SessionEvent::SignedIn);

		Ok(())
	}

	/// Deletes both tokens and notifies listeners.
	pub async fn sign_out(&self) -> Result<()> {
		self.store.clear().await?;
		*self.refreshed_at.lock() = None;
		self.emit(SessionEvent::SignedOut);

		Ok(())
	}

	/// Returns the stored access token, or [`Error::Unauthenticated`] when none is stored.
	pub async fn access_token(&self) -> Result<TokenSecret> {
		self.store.get(StorageKey::AccessToken).await?.ok_or(Error::Unauthenticated)
	}

	/// Time of the last successful refresh performed by this session.
	pub fn last_refreshed_at(&self) -> Option<OffsetDateTime> {
		*self.refreshed_at.lock()
	}

	/// Registers `listener` for lifecycle events.
	///
	/// Listeners run synchronously on the task that caused the event and must not block.
	pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
	where
		F: 'static + Fn(&SessionEvent) + Send + Sync,
	{
		let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));

		self.listeners.write().push((id, Arc::new(listener)));

		id
	}

	/// Removes a listener; returns `false` when `id` was not registered.
	pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
		let mut listeners = self.listeners.write();
		let before = listeners.len();

		listeners.retain(|(registered, _)| *registered != id);

		listeners.len() != before
	}

	pub(super) fn emit(&self, event: SessionEvent) {
		let listeners =
			self.listeners.read().iter().map(|(_, listener)| listener.clone()).collect::<Vec<_>>();

		for listener in listeners {
			listener(&event);
		}
	}

	pub(super) fn mark_refreshed(&self) {
		*self.refreshed_at.lock() = Some(OffsetDateTime::now_utc());
	}
}
impl Debug for Session {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Session")
			.field("refresh_metrics", &self.refresh_metrics)
			.field("listeners", &self.listeners.read().len())
			.field("refreshed_at", &self.last_refreshed_at())
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::store::MemoryStore;

	fn session_with(backend: &Arc<MemoryStore>) -> Session {
		let store: Arc<dyn SessionStore> = backend.clone();

		Session::new(store)
	}

	#[tokio::test]
	async fn restore_requires_both_tokens() {
		let backend = Arc::new(MemoryStore::default());
		let session = session_with(&backend);

		assert_eq!(
			session.restore().await.expect("Restoring an empty store should succeed."),
			SessionStatus::SignedOut
		);

		backend
			.set(StorageKey::AccessToken, TokenSecret::new("A1"))
			.await
			.expect("Seeding the access token should succeed.");

		assert_eq!(
			session.restore().await.expect("Restoring a partial store should succeed."),
			SessionStatus::SignedOut
		);

		backend.seed(TokenPair::new("A1", "R1"));

		assert_eq!(
			session.restore().await.expect("Restoring a full store should succeed."),
			SessionStatus::SignedIn
		);
	}

	#[tokio::test]
	async fn sign_in_and_sign_out_notify_listeners() {
		let backend = Arc::new(MemoryStore::default());
		let session = session_with(&backend);
		let seen = Arc::new(Mutex::new(Vec::new()));
		let sink = seen.clone();
		let id = session.subscribe(move |event| sink.lock().push(*event));

		session.sign_in(TokenPair::new("A1", "R1")).await.expect("Sign-in should succeed.");

		assert_eq!(
			session
				.access_token()
				.await
				.expect("Access token should be stored after sign-in.")
				.expose(),
			"A1"
		);

		session.sign_out().await.expect("Sign-out should succeed.");

		assert!(backend.peek(StorageKey::AccessToken).is_none());
		assert!(backend.peek(StorageKey::RefreshToken).is_none());
		assert!(matches!(session.access_token().await, Err(Error::Unauthenticated)));
		assert_eq!(*seen.lock(), vec![SessionEvent::SignedIn, SessionEvent::SignedOut]);
		assert!(session.unsubscribe(id));
		assert!(!session.unsubscribe(id));

		session.sign_in(TokenPair::new("A2", "R2")).await.expect("Sign-in should succeed.");

		assert_eq!(seen.lock().len(), 2);
	}
}
