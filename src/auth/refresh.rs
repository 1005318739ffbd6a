//! Single-flight access-token renewal.
//!
//! [`Session::renew`] is called by request helpers after the API answered `401`. Callers
//! are serialized on one guard; the first caller that still sees the rejected token in the
//! store performs the exchange, while every later caller observes the outcome through the
//! store (a newer token, or an empty store after the session expired) and never issues a
//! second exchange. Successful exchanges rotate the pair via
//! [`SessionStore::compare_and_swap_refresh`](crate::store::SessionStore::compare_and_swap_refresh)
//! so a sign-out or re-login that raced the exchange is never overwritten.

mod metrics;

pub use metrics::RefreshMetrics;

// self
use crate::{
	_prelude::*,
	auth::{RefreshGrant, Session, SessionEvent, TokenSecret},
	error::ConfigError,
	obs::{self, CallKind, CallOutcome, CallSpan},
	store::{CompareAndSwapOutcome, StorageKey},
};

enum Renewal {
	Stored(TokenSecret),
	SignedOutMeanwhile,
}

impl Session {
	/// Obtains a replacement for the `rejected` access token.
	///
	/// `exchange` receives the stored refresh token and performs the network call. It runs at
	/// most once per rejected token no matter how many callers race here. When the exchange
	/// fails for any reason the stored tokens are cleared, listeners receive
	/// [`SessionEvent::Expired`], and every caller gets [`Error::SessionExpired`].
	pub async fn renew<F, Fut>(&self, rejected: &TokenSecret, exchange: F) -> Result<TokenSecret>
	where
		F: FnOnce(TokenSecret) -> Fut,
		Fut: Future<Output = Result<RefreshGrant>>,
	{
		const KIND: CallKind = CallKind::Refresh;

		let span = CallSpan::new(KIND, "renew");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				let _singleflight = self.refresh_guard.lock().await;

				match self.store.get(StorageKey::AccessToken).await? {
					Some(current) if &current != rejected => {
						self.refresh_metrics.record_coalesced();

						return Ok(current);
					},
					None => {
						self.refresh_metrics.record_coalesced();

						return Err(Error::SessionExpired { cause: None });
					},
					Some(_) => {},
				}

				self.refresh_metrics.record_attempt();

				match self.exchange_locked(exchange).await {
					Ok(Renewal::Stored(token)) => {
						self.refresh_metrics.record_success();
						self.mark_refreshed();
						self.emit(SessionEvent::Refreshed);

						Ok(token)
					},
					Ok(Renewal::SignedOutMeanwhile) => {
						self.refresh_metrics.record_failure();

						Err(Error::Unauthenticated)
					},
					Err(err) => {
						self.refresh_metrics.record_failure();

						obs::trace_event!(warn, error = %err, "Token refresh failed; ending session.");

						self.expire().await;

						Err(Error::SessionExpired { cause: Some(Box::new(err)) })
					},
				}
			})
			.await;

		obs::record_result(KIND, &result);

		result
	}

	async fn exchange_locked<F, Fut>(&self, exchange: F) -> Result<Renewal>
	where
		F: FnOnce(TokenSecret) -> Fut,
		Fut: Future<Output = Result<RefreshGrant>>,
	{
		let expected_refresh = self
			.store
			.get(StorageKey::RefreshToken)
			.await?
			.ok_or(ConfigError::MissingRefreshToken)?;
		let grant = exchange(expected_refresh.clone()).await?;
		let pair = grant.into_pair(expected_refresh.clone());
		let access = pair.access_token.clone();

		match self.store.compare_and_swap_refresh(expected_refresh.expose(), pair).await? {
			CompareAndSwapOutcome::Updated => Ok(Renewal::Stored(access)),
			CompareAndSwapOutcome::RefreshMismatch => Ok(self
				.store
				.get(StorageKey::AccessToken)
				.await?
				.map_or(Renewal::SignedOutMeanwhile, Renewal::Stored)),
			CompareAndSwapOutcome::Missing => Ok(Renewal::SignedOutMeanwhile),
		}
	}

	async fn expire(&self) {
		if let Err(err) = self.store.clear().await {
			obs::trace_event!(warn, error = %err, "Failed to clear expired session tokens.");

			let _ = err;
		}

		self.emit(SessionEvent::Expired);
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::atomic::{AtomicUsize, Ordering};
	// self
	use super::*;
	use crate::{
		auth::TokenPair,
		error::TransientError,
		store::{MemoryStore, SessionStore},
	};

	fn seeded_session(access: &str, refresh: &str) -> (Arc<Session>, Arc<MemoryStore>) {
		let backend = Arc::new(MemoryStore::default());

		backend.seed(TokenPair::new(access, refresh));

		let store: Arc<dyn SessionStore> = backend.clone();

		(Arc::new(Session::new(store)), backend)
	}

	fn grant(access: &str) -> RefreshGrant {
		RefreshGrant { access_token: TokenSecret::new(access), refresh_token: None }
	}

	#[tokio::test]
	async fn leader_stores_new_access_token() {
		let (session, store) = seeded_session("A1", "R1");
		let token = session
			.renew(&TokenSecret::new("A1"), |refresh| async move {
				assert_eq!(refresh.expose(), "R1");

				Ok(grant("A2"))
			})
			.await
			.expect("Refresh with a valid refresh token should succeed.");

		assert_eq!(token.expose(), "A2");
		assert_eq!(
			store.peek(StorageKey::AccessToken).expect("Access token should be stored.").expose(),
			"A2"
		);
		assert_eq!(
			store.peek(StorageKey::RefreshToken).expect("Refresh token should be kept.").expose(),
			"R1"
		);
		assert_eq!(session.refresh_metrics.attempts(), 1);
		assert_eq!(session.refresh_metrics.successes(), 1);
		assert!(session.last_refreshed_at().is_some());
	}

	#[tokio::test]
	async fn stale_rejection_reuses_stored_token_without_exchange() {
		let (session, _) = seeded_session("A2", "R1");
		let token = session
			.renew(&TokenSecret::new("A1"), |_| async {
				panic!("Exchange must not run when a newer token is already stored.")
			})
			.await
			.expect("Stale rejection should reuse the stored token.");

		assert_eq!(token.expose(), "A2");
		assert_eq!(session.refresh_metrics.attempts(), 0);
		assert_eq!(session.refresh_metrics.coalesced(), 1);
	}

	#[tokio::test]
	async fn failed_exchange_clears_tokens_and_notifies() {
		let (session, store) = seeded_session("A1", "R1");
		let expired = Arc::new(AtomicUsize::new(0));
		let expired_seen = expired.clone();

		session.subscribe(move |event| {
			if *event == SessionEvent::Expired {
				expired_seen.fetch_add(1, Ordering::SeqCst);
			}
		});

		let err = session
			.renew(&TokenSecret::new("A1"), |_| async {
				Err(TransientError::Api {
					message: "upstream down".into(),
					status: Some(503),
					retry_after: None,
				}
				.into())
			})
			.await
			.expect_err("Failed exchange should end the session.");

		assert!(matches!(err, Error::SessionExpired { cause: Some(_) }));
		assert!(store.peek(StorageKey::AccessToken).is_none());
		assert!(store.peek(StorageKey::RefreshToken).is_none());
		assert_eq!(expired.load(Ordering::SeqCst), 1);
		assert_eq!(session.refresh_metrics.failures(), 1);

		let waiter = session
			.renew(&TokenSecret::new("A1"), |_| async {
				panic!("Exchange must not run after the session expired.")
			})
			.await
			.expect_err("Later callers should observe the expired session.");

		assert!(matches!(waiter, Error::SessionExpired { cause: None }));
	}

	#[tokio::test]
	async fn missing_refresh_token_expires_session() {
		let backend = Arc::new(MemoryStore::default());
		let store: Arc<dyn SessionStore> = backend.clone();

		store
			.set(StorageKey::AccessToken, TokenSecret::new("A1"))
			.await
			.expect("Seeding the access token should succeed.");

		let session = Session::new(store);
		let err = session
			.renew(&TokenSecret::new("A1"), |_| async {
				panic!("Exchange must not run without a refresh token.")
			})
			.await
			.expect_err("Renewal without a refresh token should fail.");

		match err {
			Error::SessionExpired { cause: Some(cause) } =>
				assert!(matches!(*cause, Error::Config(ConfigError::MissingRefreshToken))),
			other => panic!("Unexpected error: {other:?}"),
		}

		assert!(backend.peek(StorageKey::AccessToken).is_none());
	}

	#[tokio::test]
	async fn concurrent_callers_share_one_exchange() {
		let (session, _) = seeded_session("A1", "R1");
		let exchanges = Arc::new(AtomicUsize::new(0));
		let mut tasks = Vec::new();

		for _ in 0..8 {
			let session = session.clone();
			let exchanges = exchanges.clone();

			tasks.push(tokio::spawn(async move {
				session
					.renew(&TokenSecret::new("A1"), |_| async move {
						exchanges.fetch_add(1, Ordering::SeqCst);
						tokio::time::sleep(std::time::Duration::from_millis(20)).await;

						Ok(grant("A2"))
					})
					.await
			}));
		}

		for task in tasks {
			let token = task
				.await
				.expect("Renew task should not panic.")
				.expect("Every caller should receive the refreshed token.");

			assert_eq!(token.expose(), "A2");
		}

		assert_eq!(exchanges.load(Ordering::SeqCst), 1);
		assert_eq!(session.refresh_metrics.coalesced(), 7);
	}

	#[tokio::test]
	async fn sign_out_during_exchange_is_not_overwritten() {
		let (session, store) = seeded_session("A1", "R1");
		let err = session
			.renew(&TokenSecret::new("A1"), |_| {
				let store = store.clone();

				async move {
					store.clear().await?;

					Ok(grant("A2"))
				}
			})
			.await
			.expect_err("Renewal should not resurrect a signed-out session.");

		assert!(matches!(err, Error::Unauthenticated));
		assert!(store.peek(StorageKey::AccessToken).is_none());
	}
}
