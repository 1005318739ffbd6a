//! Periodic refetching bound to the lifetime of a view.
//!
//! A [`PollHandle`] owns the background task. Results are applied only while the handle
//! is live: `apply` runs under a shared lock on the liveness flag and
//! [`PollHandle::cancel`] takes the exclusive lock to clear it, so once `cancel` returns
//! no late response can be applied.

// crates.io
use tokio::{
	runtime::Handle,
	task::JoinHandle,
	time::{self, MissedTickBehavior},
};
// self
use crate::{_prelude::*, config::ClientConfig, obs};

/// Spawns periodic fetch/apply loops on the current Tokio runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Poller {
	interval: std::time::Duration,
}
impl Poller {
	/// Creates a poller ticking every `interval`; the interval must be positive.
	pub fn new(interval: Duration) -> Result<Self> {
		let interval = std::time::Duration::try_from(interval)
			.ok()
			.filter(|interval| !interval.is_zero())
			.ok_or_else(|| Error::invalid_input("poll interval must be positive"))?;

		Ok(Self { interval })
	}

	/// Creates a poller using [`ClientConfig::poll_interval`].
	pub fn from_config(config: &ClientConfig) -> Result<Self> {
		Self::new(config.poll_interval)
	}

	/// Runs `fetch` immediately and then on every tick, passing successes to `apply`.
	///
	/// Fetch errors are logged and the loop waits for the next tick. Ticks missed while a
	/// fetch is running are delayed, never bunched. `apply` must not cancel its own handle.
	/// Fails when called outside a Tokio runtime.
	pub fn spawn<F, Fut, T, A>(&self, mut fetch: F, mut apply: A) -> Result<PollHandle>
	where
		F: 'static + Send + FnMut() -> Fut,
		Fut: 'static + Send + Future<Output = Result<T>>,
		T: 'static + Send,
		A: 'static + Send + FnMut(T),
	{
		let runtime = Handle::try_current()
			.map_err(|_| Error::invalid_input("poller must be spawned inside a Tokio runtime"))?;
		let live = Arc::new(RwLock::new(true));
		let task_live = live.clone();
		let period = self.interval;
		let task = runtime.spawn(async move {
			let mut ticker = time::interval(period);

			ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

			loop {
				ticker.tick().await;

				match fetch().await {
					Ok(value) => {
						let live = task_live.read();

						if !*live {
							break;
						}

						apply(value);
					},
					Err(err) => {
						obs::trace_event!(warn, error = %err, "Poll fetch failed; retrying on the next tick.");

						let _ = err;
					},
				}
			}
		});

		Ok(PollHandle { live, task })
	}
}

/// Owner of a running poll loop; dropping it cancels the loop.
#[derive(Debug)]
pub struct PollHandle {
	live: Arc<RwLock<bool>>,
	task: JoinHandle<()>,
}
impl PollHandle {
	/// Stops the loop. After this returns, `apply` is never invoked again.
	pub fn cancel(&self) {
		*self.live.write() = false;

		self.task.abort();
	}

	/// Returns `true` until [`PollHandle::cancel`] is called.
	pub fn is_live(&self) -> bool {
		*self.live.read()
	}
}
impl Drop for PollHandle {
	fn drop(&mut self) {
		self.cancel();
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::atomic::{AtomicUsize, Ordering};
	// self
	use super::*;
	use crate::error::TransientError;

	fn counter() -> Arc<AtomicUsize> {
		Arc::new(AtomicUsize::new(0))
	}

	#[tokio::test(start_paused = true)]
	async fn fetches_immediately_then_every_interval() {
		let applied = counter();
		let sink = applied.clone();
		let handle = Poller::new(Duration::seconds(10))
			.expect("Positive interval should be accepted.")
			.spawn(|| async { Ok(1_usize) }, move |n| {
				sink.fetch_add(n, Ordering::SeqCst);
			})
			.expect("Poller should spawn inside a runtime.");

		time::sleep(std::time::Duration::from_secs(25)).await;

		assert_eq!(applied.load(Ordering::SeqCst), 3);
		assert!(handle.is_live());
	}

	#[tokio::test(start_paused = true)]
	async fn cancel_discards_in_flight_results() {
		let applied = counter();
		let sink = applied.clone();
		let handle = Poller::new(Duration::seconds(10))
			.expect("Positive interval should be accepted.")
			.spawn(
				|| async {
					time::sleep(std::time::Duration::from_secs(5)).await;

					Ok(())
				},
				move |()| {
					sink.fetch_add(1, Ordering::SeqCst);
				},
			)
			.expect("Poller should spawn inside a runtime.");

		time::sleep(std::time::Duration::from_secs(1)).await;
		handle.cancel();
		time::sleep(std::time::Duration::from_secs(30)).await;

		assert_eq!(applied.load(Ordering::SeqCst), 0);
		assert!(!handle.is_live());
	}

	#[tokio::test(start_paused = true)]
	async fn fetch_errors_do_not_stop_the_loop() {
		let fetches = counter();
		let applied = counter();
		let fetch_count = fetches.clone();
		let sink = applied.clone();
		let _handle = Poller::new(Duration::seconds(10))
			.expect("Positive interval should be accepted.")
			.spawn(
				move || {
					let attempt = fetch_count.fetch_add(1, Ordering::SeqCst);

					async move {
						if attempt == 0 {
							Err(TransientError::Api {
								message: "busy".into(),
								status: Some(503),
								retry_after: None,
							}
							.into())
						} else {
							Ok(attempt)
						}
					}
				},
				move |_| {
					sink.fetch_add(1, Ordering::SeqCst);
				},
			)
			.expect("Poller should spawn inside a runtime.");

		time::sleep(std::time::Duration::from_secs(15)).await;

		assert_eq!(fetches.load(Ordering::SeqCst), 2);
		assert_eq!(applied.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn rejects_non_positive_interval_and_missing_runtime() {
		assert!(Poller::new(Duration::ZERO).is_err());
		assert!(Poller::new(Duration::seconds(-1)).is_err());

		let spawned = Poller::new(Duration::seconds(1))
			.expect("Positive interval should be accepted.")
			.spawn(|| async { Ok(()) }, |()| {});

		assert!(matches!(spawned, Err(Error::InvalidInput { .. })));
	}
}
