//! Full-text event search against the search index.
//!
//! The index is queried directly with a `multi_match` query; these requests never carry
//! the session's bearer token and never trigger a refresh.

// self
use crate::{
	_prelude::*,
	client::{EventHubClient, RequestOptions, response},
	config::{self, ClientConfig},
	error::TransportError,
	http::ApiHttpClient,
	model::Event,
	obs::{self, CallKind, CallOutcome, CallSpan},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

/// Queries shorter than this (after trimming) return no hits without a request.
pub const MIN_QUERY_CHARS: usize = 2;

const SEARCH_PATH: &str = "events/_search";

/// One ranked search result.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SearchHit {
	/// Index document identifier.
	#[serde(rename = "_id")]
	pub id: String,
	/// Relevance score, when the index reports one.
	#[serde(rename = "_score", default)]
	pub score: Option<f64>,
	/// Indexed event.
	#[serde(rename = "_source")]
	pub event: Event,
}

#[derive(Deserialize)]
struct SearchResponse {
	#[serde(default)]
	hits: HitList,
}

#[derive(Default, Deserialize)]
struct HitList {
	#[serde(default, deserialize_with = "crate::model::null_as_empty")]
	hits: Vec<SearchHit>,
}

/// Client for the event search index.
pub struct SearchClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// HTTP transport used for index queries.
	pub http_client: Arc<C>,
	search_base: Url,
}
impl<C> SearchClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Creates a search client that reuses the caller-provided transport.
	pub fn with_http_client(config: &ClientConfig, http_client: impl Into<Arc<C>>) -> Self {
		Self { http_client: http_client.into(), search_base: config.search_base.clone() }
	}

	/// Searches event titles, categories, and descriptions for `text`.
	pub async fn search(&self, text: &str) -> Result<Vec<SearchHit>> {
		const KIND: CallKind = CallKind::Search;

		let text = text.trim();

		if text.chars().count() < MIN_QUERY_CHARS {
			return Ok(Vec::new());
		}

		let span = CallSpan::new(KIND, "search");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				let url = config::join(&self.search_base, SEARCH_PATH)?;
				let request = RequestOptions::post().json(&query_body(text))?.build(&url, None)?;
				let response = self
					.http_client
					.execute(request)
					.await
					.map_err(TransportError::network)?;
				let body: SearchResponse =
					response::decode_json(&response::ensure_success(response)?)?;

				Ok(body.hits.hits)
			})
			.await;

		obs::record_result(KIND, &result);

		result
	}
}
#[cfg(feature = "reqwest")]
impl SearchClient<ReqwestHttpClient> {
	/// Creates a search client with its own reqwest transport.
	pub fn new(config: &ClientConfig) -> Result<Self> {
		Ok(Self::with_http_client(config, ReqwestHttpClient::from_config(config)?))
	}
}
impl<C> Debug for SearchClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SearchClient").field("search_base", &self.search_base.as_str()).finish()
	}
}

impl<C> EventHubClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Returns a search client sharing this client's transport and configuration.
	pub fn search_client(&self) -> SearchClient<C> {
		SearchClient::with_http_client(&self.config, self.http_client.clone())
	}
}

fn query_body(text: &str) -> serde_json::Value {
	serde_json::json!({
		"query": {
			"multi_match": {
				"query": text,
				"type": "best_fields",
				"fields": ["title^3", "category^2", "description"],
				"fuzziness": "AUTO",
				"operator": "and"
			}
		}
	})
}
