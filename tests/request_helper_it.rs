#![cfg(all(feature = "test", feature = "reqwest"))]

// std
use std::{
	io,
	sync::atomic::{AtomicUsize, Ordering},
};
// crates.io
use http::Response;
use httpmock::prelude::*;
// self
use eventhub_client::{
	_preludet::*,
	auth::{Session, SessionEvent, TokenPair, TokenSecret},
	client::{EventHubClient, RequestOptions},
	error::{ConfigError, TransportError},
	http::{ApiHttpClient, ApiRequest, ApiResponse, HttpFuture},
	store::{MemoryStore, SessionStore, StorageKey},
};

const FEED: &str = r#"{"joined_events":[],"open_events":[],"organizations_events":[]}"#;

#[tokio::test]
async fn expired_token_is_refreshed_and_request_replayed() {
	let server = MockServer::start_async().await;
	let (client, store) = build_signed_in_test_client(&server.base_url(), "A1", "R1");
	let rejected = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/events").header("authorization", "Bearer A1");
			then.status(401)
				.header("content-type", "application/json")
				.body(r#"{"message":"expired"}"#);
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/refresh")
				.header("content-type", "application/json")
				.json_body(serde_json::json!({ "refresh_token": "R1" }));
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"access_token":"A2","refresh_token":"R2"}"#);
		})
		.await;
	let accepted = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/events").header("authorization", "Bearer A2");
			then.status(200).header("content-type", "application/json").body(FEED);
		})
		.await;
	let url = client.config.api_url("api/events").expect("Endpoint should join.");
	let response =
		client.send(url, RequestOptions::get()).await.expect("Replayed request should succeed.");

	assert_eq!(response.status(), 200);

	rejected.assert_calls_async(1).await;
	refresh.assert_calls_async(1).await;
	accepted.assert_calls_async(1).await;

	assert_eq!(
		store.peek(StorageKey::AccessToken).expect("Access token should be stored.").expose(),
		"A2"
	);
	assert_eq!(
		store.peek(StorageKey::RefreshToken).expect("Refresh token should be stored.").expose(),
		"R2"
	);
	assert_eq!(client.session.refresh_metrics.successes(), 1);
}

#[tokio::test]
async fn failed_refresh_clears_tokens_without_retrying() {
	let server = MockServer::start_async().await;
	let (client, store) = build_signed_in_test_client(&server.base_url(), "A1", "R1");
	let expired = Arc::new(Mutex::new(Vec::new()));
	let sink = expired.clone();

	client.session.subscribe(move |event| sink.lock().push(*event));

	let rejected = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/events");
			then.status(401);
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/refresh");
			then.status(401)
				.header("content-type", "application/json")
				.body(r#"{"message":"refresh token revoked"}"#);
		})
		.await;
	let err = client.events().await.expect_err("Revoked refresh token should end the session.");

	match &err {
		Error::SessionExpired { cause: Some(cause) } => match cause.as_ref() {
			Error::RefreshRejected { status, message } => {
				assert_eq!(*status, 401);
				assert_eq!(message.as_deref(), Some("refresh token revoked"));
			},
			other => panic!("Unexpected refresh cause: {other:?}"),
		},
		other => panic!("Unexpected error: {other:?}"),
	}

	assert!(err.requires_sign_in());

	rejected.assert_calls_async(1).await;
	refresh.assert_calls_async(1).await;

	assert!(store.peek(StorageKey::AccessToken).is_none());
	assert!(store.peek(StorageKey::RefreshToken).is_none());
	assert_eq!(*expired.lock(), vec![SessionEvent::Expired]);
}

#[tokio::test]
async fn missing_access_token_fails_without_network() {
	let server = MockServer::start_async().await;
	let (client, _) = build_reqwest_test_client(&server.base_url());
	let any = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/events");
			then.status(200).body(FEED);
		})
		.await;
	let err = client.events().await.expect_err("Unauthenticated call should fail.");

	assert!(matches!(err, Error::Unauthenticated));

	any.assert_calls_async(0).await;
}

#[tokio::test]
async fn missing_refresh_token_ends_session() {
	let server = MockServer::start_async().await;
	let (client, store) = build_reqwest_test_client(&server.base_url());

	store
		.set(StorageKey::AccessToken, TokenSecret::new("A1"))
		.await
		.expect("Seeding the access token should succeed.");

	let rejected = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/notifications");
			then.status(401);
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/refresh");
			then.status(200).body(r#"{"access_token":"A2"}"#);
		})
		.await;
	let err =
		client.notifications().await.expect_err("Refresh without a refresh token should fail.");

	match err {
		Error::SessionExpired { cause: Some(cause) } =>
			assert!(matches!(*cause, Error::Config(ConfigError::MissingRefreshToken))),
		other => panic!("Unexpected error: {other:?}"),
	}

	rejected.assert_calls_async(1).await;
	refresh.assert_calls_async(0).await;

	assert!(store.peek(StorageKey::AccessToken).is_none());
	assert!(store.peek(StorageKey::RefreshToken).is_none());
}

#[tokio::test]
async fn concurrent_rejections_share_one_refresh() {
	let server = MockServer::start_async().await;
	let (client, store) = build_signed_in_test_client(&server.base_url(), "A1", "R1");
	let rejected = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/events").header("authorization", "Bearer A1");
			then.status(401);
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/refresh");
			then.status(200)
				.delay(std::time::Duration::from_millis(100))
				.header("content-type", "application/json")
				.body(r#"{"access_token":"A2"}"#);
		})
		.await;
	let accepted = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/events").header("authorization", "Bearer A2");
			then.status(200).header("content-type", "application/json").body(FEED);
		})
		.await;
	let (first, second) = tokio::join!(client.events(), client.events());

	first.expect("First caller should receive the feed after the refresh.");
	second.expect("Second caller should receive the feed after the refresh.");

	rejected.assert_calls_async(2).await;
	refresh.assert_calls_async(1).await;
	accepted.assert_calls_async(2).await;

	assert_eq!(
		store.peek(StorageKey::RefreshToken).expect("Refresh token should be kept.").expose(),
		"R1"
	);
	assert_eq!(client.session.refresh_metrics.attempts(), 1);
	assert_eq!(client.session.refresh_metrics.coalesced(), 1);
}

#[tokio::test]
async fn second_rejection_is_returned_as_is() {
	let server = MockServer::start_async().await;
	let (client, store) = build_signed_in_test_client(&server.base_url(), "A1", "R1");
	let rejected = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/users/profile");
			then.status(401).body(r#"{"message":"account disabled"}"#);
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/refresh");
			then.status(200).body(r#"{"access_token":"A2"}"#);
		})
		.await;
	let url = client.config.api_url("api/users/profile").expect("Endpoint should join.");
	let response = client
		.send(url, RequestOptions::get())
		.await
		.expect("A replayed 401 is still a response.");

	assert_eq!(response.status(), 401);

	rejected.assert_calls_async(2).await;
	refresh.assert_calls_async(1).await;

	let err = client.profile().await.expect_err("Typed calls should map the final 401.");

	assert!(matches!(err, Error::Unauthorized { ref message } if message == "account disabled"));
	assert!(store.peek(StorageKey::AccessToken).is_some());
}

#[tokio::test]
async fn network_failure_on_normal_request_is_transport_error() {
	let (client, store) = build_signed_in_test_client("http://127.0.0.1:9", "A1", "R1");
	let err = client.events().await.expect_err("Unreachable API should fail.");

	assert!(matches!(err, Error::Transport(_)));
	assert!(store.peek(StorageKey::AccessToken).is_some());
}

/// Answers every API call with `401` and drops the connection on `/api/refresh`.
#[derive(Default)]
struct ResetOnRefresh {
	refresh_calls: AtomicUsize,
}
impl ApiHttpClient for ResetOnRefresh {
	type TransportError = io::Error;

	fn execute(&self, request: ApiRequest) -> HttpFuture<'_, ApiResponse, Self::TransportError> {
		Box::pin(async move {
			if request.uri().path().ends_with("/api/refresh") {
				self.refresh_calls.fetch_add(1, Ordering::SeqCst);

				return Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset"));
			}

			Ok(Response::builder()
				.status(401)
				.body(br#"{"message":"token expired"}"#.to_vec())
				.expect("Static 401 response should build."))
		})
	}
}

#[tokio::test]
async fn network_failure_during_refresh_expires_the_session() {
	let store = Arc::new(MemoryStore::default());

	store.seed(TokenPair::new("A1", "R1"));

	let session = Arc::new(Session::new(store.clone()));
	let events = Arc::new(Mutex::new(Vec::new()));
	let sink = events.clone();

	session.subscribe(move |event| sink.lock().push(*event));

	let transport = Arc::new(ResetOnRefresh::default());
	let client = EventHubClient::<ResetOnRefresh>::with_http_client(
		test_config("http://eventhub.test"),
		session,
		transport.clone(),
	);
	let err = client.events().await.expect_err("A refresh that cannot connect should fail.");

	match err {
		Error::SessionExpired { cause: Some(cause) } =>
			assert!(matches!(*cause, Error::Transport(TransportError::Network { .. }))),
		other => panic!("Unexpected error: {other:?}"),
	}

	assert_eq!(transport.refresh_calls.load(Ordering::SeqCst), 1);
	assert!(store.peek(StorageKey::AccessToken).is_none());
	assert!(store.peek(StorageKey::RefreshToken).is_none());
	assert_eq!(events.lock().as_slice(), [SessionEvent::Expired]);
}
