//! Headless client for the EventHub event-organizing API.
//!
//! [`client::EventHubClient`] sends bearer-authenticated requests and renews expired access
//! tokens through the [`auth::Session`] it shares with the rest of the app. Typed endpoints
//! live in [`api`], and the `poller` feature ties periodic refetching to a view's lifetime.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod model;
pub mod obs;
#[cfg(feature = "poller")] pub mod poll;
pub mod search;
pub mod store;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
#[doc(hidden)]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::{Session, TokenPair},
		client::EventHubClient,
		config::ClientConfig,
		http::ReqwestHttpClient,
		search::SearchClient,
		store::{MemoryStore, SessionStore},
	};

	/// Client type alias used by reqwest-backed integration tests.
	pub type ReqwestTestClient = EventHubClient<ReqwestHttpClient>;

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Builds a config whose API and search endpoints both point at `base`.
	pub fn test_config(base: &str) -> ClientConfig {
		let url = Url::parse(base).expect("Mock server URL should parse.");

		ClientConfig::builder()
			.api_base(url.clone())
			.search_base(url)
			.build()
			.expect("Mock server config should be valid.")
	}

	/// Constructs an [`EventHubClient`] backed by an in-memory store and the reqwest transport
	/// used across integration tests.
	pub fn build_reqwest_test_client(base: &str) -> (ReqwestTestClient, Arc<MemoryStore>) {
		let store_backend = Arc::new(MemoryStore::default());
		let store: Arc<dyn SessionStore> = store_backend.clone();
		let session = Arc::new(Session::new(store));
		let client =
			EventHubClient::with_http_client(test_config(base), session, test_reqwest_http_client());

		(client, store_backend)
	}

	/// Same as [`build_reqwest_test_client`] but with the store seeded with `access`/`refresh`.
	pub fn build_signed_in_test_client(
		base: &str,
		access: &str,
		refresh: &str,
	) -> (ReqwestTestClient, Arc<MemoryStore>) {
		let (client, store) = build_reqwest_test_client(base);

		store.seed(TokenPair::new(access, refresh));

		(client, store)
	}

	/// Builds a search client pointing at `base`.
	pub fn build_test_search_client(base: &str) -> SearchClient<ReqwestHttpClient> {
		SearchClient::with_http_client(&test_config(base), test_reqwest_http_client())
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
