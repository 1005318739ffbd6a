//! Restores a persisted session, signs in when needed, and polls the event feed.
//!
//! 1. Build a [`ClientConfig`] from `EVENTHUB_API_URL` / `EVENTHUB_POLL_INTERVAL_SECS`.
//! 2. Open a [`FileStore`] so tokens survive restarts, and restore the [`Session`].
//! 3. Sign in with `EVENTHUB_USERNAME` / `EVENTHUB_PASSWORD` when no session is stored.
//! 4. Poll `/api/events` for three intervals, then cancel the poller.

// std
use std::{env, sync::Arc};
// crates.io
use color_eyre::{Result, eyre::eyre};
// self
use eventhub_client::{
	auth::{Session, SessionStatus},
	client::EventHubClient,
	config::ClientConfig,
	poll::Poller,
	store::{FileStore, SessionStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let config = ClientConfig::from_env()?;
	let store: Arc<dyn SessionStore> =
		Arc::new(FileStore::open(env::temp_dir().join("eventhub-demo-session.json"))?);
	let session = Arc::new(Session::new(store));

	session.subscribe(|event| println!("Session event: {event:?}."));

	let client = EventHubClient::new(config.clone(), session.clone())?;

	if session.restore().await? == SessionStatus::SignedOut {
		let username = env::var("EVENTHUB_USERNAME")
			.map_err(|_| eyre!("Set EVENTHUB_USERNAME to sign in."))?;
		let password = env::var("EVENTHUB_PASSWORD")
			.map_err(|_| eyre!("Set EVENTHUB_PASSWORD to sign in."))?;

		client.login(&username, &password).await?;
	}

	let fetcher = client.clone();
	let handle = Poller::from_config(&config)?.spawn(
		move || {
			let client = fetcher.clone();

			async move { client.events().await }
		},
		|feed| {
			println!(
				"Feed: {} joined, {} open, {} from organizations.",
				feed.joined_events.len(),
				feed.open_events.len(),
				feed.organizations_events.len()
			);
		},
	)?;
	let wait = std::time::Duration::try_from(config.poll_interval * 3)?;

	tokio::time::sleep(wait).await;
	handle.cancel();

	println!("Poller stopped after {wait:?}.");

	Ok(())
}
