#![cfg(all(feature = "test", feature = "reqwest"))]

// crates.io
use httpmock::prelude::*;
// self
use eventhub_client::{_preludet::*, model::{EventId, OrganizationId}};

#[tokio::test]
async fn short_queries_skip_the_index() {
	let server = MockServer::start_async().await;
	let search = build_test_search_client(&server.base_url());
	let index = server
		.mock_async(|when, then| {
			when.method(POST).path("/events/_search");
			then.status(200).body(r#"{"hits":{"hits":[]}}"#);
		})
		.await;

	assert!(search.search("").await.expect("Empty query should succeed.").is_empty());
	assert!(search.search("  a ").await.expect("One-letter query should succeed.").is_empty());

	index.assert_calls_async(0).await;
}

#[tokio::test]
async fn search_posts_multi_match_and_decodes_hits() {
	let server = MockServer::start_async().await;
	let (client, _) = build_signed_in_test_client(&server.base_url(), "A1", "R1");
	let search = client.search_client();
	let index = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/events/_search")
				.header("content-type", "application/json")
				.json_body(serde_json::json!({
					"query": {
						"multi_match": {
							"query": "chess",
							"type": "best_fields",
							"fields": ["title^3", "category^2", "description"],
							"fuzziness": "AUTO",
							"operator": "and"
						}
					}
				}));
			then.status(200).header("content-type", "application/json").body(
				r#"{"took":2,"hits":{"total":{"value":1},"hits":[{"_id":"7","_score":3.5,"_source":{"id":7,"title":"Chess night","status":"active","organization_d":2}}]}}"#,
			);
		})
		.await;
	let authorized = server
		.mock_async(|when, then| {
			when.method(POST).path("/events/_search").header_exists("authorization");
			then.status(500);
		})
		.await;
	let hits = search.search(" chess ").await.expect("Search should decode hits.");

	index.assert_async().await;
	authorized.assert_calls_async(0).await;

	assert_eq!(hits.len(), 1);
	assert_eq!(hits[0].id, "7");
	assert_eq!(hits[0].score, Some(3.5));
	assert_eq!(hits[0].event.id, EventId::new(7));
	assert_eq!(hits[0].event.organization_id, OrganizationId::new(2));
}

#[tokio::test]
async fn index_failures_surface_as_errors() {
	let server = MockServer::start_async().await;
	let search = build_test_search_client(&server.base_url());
	let _index = server
		.mock_async(|when, then| {
			when.method(POST).path("/events/_search");
			then.status(503).body("index unavailable");
		})
		.await;
	let err = search.search("chess").await.expect_err("Index outage should fail.");

	assert!(matches!(err, Error::Transient(_)));
}
