//! Browse API client that authorizes every call through the shared [`TokenProvider`].

pub mod query;

pub use query::*;

// crates.io
use oauth2::{
	HttpRequest,
	http::{
		Method,
		header::{AUTHORIZATION, CONTENT_TYPE},
	},
};
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	error::{ConfigError, MarketplaceError, MarketplaceOperation},
	http::{self, HttpResponse, HttpTransport},
	obs::{self, CallKind, CallOutcome, CallSpan},
	token::TokenProvider,
};

/// Header naming the marketplace a Browse API call targets.
pub const MARKETPLACE_HEADER: &str = "X-EBAY-C-MARKETPLACE-ID";

const SEARCH_PATH: &str = "/buy/browse/v1/item_summary/search";
const ITEM_PATH: &str = "/buy/browse/v1/item";

/// Upstream error payload; only the first message is surfaced.
#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
	#[serde(default)]
	errors: Vec<ErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct ErrorEntry {
	message: Option<String>,
}

/// Issues search and item-detail calls against the Browse API.
#[derive(Clone)]
pub struct MarketplaceClient {
	tokens: TokenProvider,
	transport: Arc<dyn HttpTransport>,
	api_base: Url,
	marketplace_id: String,
}
impl MarketplaceClient {
	/// Creates a client that shares `transport` with the token provider.
	pub fn new(
		tokens: TokenProvider,
		transport: Arc<dyn HttpTransport>,
		api_base: Url,
		marketplace_id: impl Into<String>,
	) -> Self {
		Self { tokens, transport, api_base, marketplace_id: marketplace_id.into() }
	}

	/// Marketplace identifier used when a query does not name one.
	pub fn marketplace_id(&self) -> &str {
		&self.marketplace_id
	}

	/// Searches item summaries and returns the upstream JSON untouched.
	pub async fn search(&self, query: &SearchQuery) -> Result<Value> {
		const KIND: CallKind = CallKind::Search;

		let span = CallSpan::new(KIND, "search");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span
			.instrument(async {
				let token = self.tokens.acquire_token().await?;
				let mut url = self
					.api_base
					.join(SEARCH_PATH)
					.map_err(|_| ConfigError::InvalidEndpoint { endpoint: "search" })?;

				url.query_pairs_mut().extend_pairs(query.to_params());

				let marketplace = query.marketplace.as_deref().unwrap_or(&self.marketplace_id);
				let request = build_get(&url, token.secret(), marketplace)?;
				let response = self.transport.execute(request).await?;

				read_json(MarketplaceOperation::Search, response)
			})
			.await;

		record_result(KIND, &result);

		result
	}

	/// Fetches full details for one item and returns the upstream JSON untouched.
	pub async fn item(&self, item_id: &str) -> Result<Value> {
		const KIND: CallKind = CallKind::Item;

		let span = CallSpan::new(KIND, "item");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span
			.instrument(async {
				let token = self.tokens.acquire_token().await?;
				let url = item_url(&self.api_base, item_id)?;
				let request = build_get(&url, token.secret(), &self.marketplace_id)?;
				let response = self.transport.execute(request).await?;

				read_json(MarketplaceOperation::ItemDetails, response)
			})
			.await;

		record_result(KIND, &result);

		result
	}
}
impl Debug for MarketplaceClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("MarketplaceClient")
			.field("tokens", &self.tokens)
			.field("api_base", &self.api_base.as_str())
			.field("marketplace_id", &self.marketplace_id)
			.finish()
	}
}

fn item_url(api_base: &Url, item_id: &str) -> Result<Url, ConfigError> {
	let mut url =
		api_base.join(ITEM_PATH).map_err(|_| ConfigError::InvalidEndpoint { endpoint: "item" })?;

	url.path_segments_mut()
		.map_err(|_| ConfigError::InvalidEndpoint { endpoint: "item" })?
		.push(item_id);

	Ok(url)
}

fn build_get(url: &Url, token: &str, marketplace: &str) -> Result<HttpRequest, ConfigError> {
	Ok(oauth2::http::Request::builder()
		.method(Method::GET)
		.uri(url.as_str())
		.header(AUTHORIZATION, format!("Bearer {token}"))
		.header(MARKETPLACE_HEADER, marketplace)
		.header(CONTENT_TYPE, "application/json")
		.body(Vec::new())?)
}

fn read_json(operation: MarketplaceOperation, response: HttpResponse) -> Result<Value> {
	let status = response.status();

	if !http::is_success(&response) {
		let envelope = serde_json::from_slice::<ErrorEnvelope>(response.body()).unwrap_or_default();
		let message = envelope
			.errors
			.into_iter()
			.next()
			.and_then(|entry| entry.message)
			.unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_owned());

		return Err(MarketplaceError { operation, message, status: Some(status.as_u16()) }.into());
	}

	serde_json::from_slice(response.body()).map_err(|e| {
		MarketplaceError {
			operation,
			message: format!("marketplace returned malformed JSON ({e})"),
			status: Some(status.as_u16()),
		}
		.into()
	})
}

fn record_result<T>(kind: CallKind, result: &Result<T>) {
	match result {
		Ok(_) => obs::record_call_outcome(kind, CallOutcome::Success),
		Err(_) => obs::record_call_outcome(kind, CallOutcome::Failure),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		_preludet::ScriptedTransport, clock::ManualClock, config::CredentialConfig,
		error::UpstreamAuthError,
	};

	const API_BASE: &str = "https://api.example.com";
	const TOKEN_BODY: &str = r#"{"access_token":"bearer-1","expires_in":7200}"#;

	fn client(transport: &ScriptedTransport) -> MarketplaceClient {
		let api_base = Url::parse(API_BASE).expect("API base fixture should parse.");
		let transport: Arc<dyn HttpTransport> = Arc::new(transport.clone());
		let tokens = TokenProvider::new(
			CredentialConfig::new("id", "secret", "scope"),
			crate::config::token_endpoint(&api_base).expect("Token endpoint should resolve."),
			transport.clone(),
		)
		.with_clock(Arc::new(ManualClock::new(OffsetDateTime::UNIX_EPOCH)));

		MarketplaceClient::new(tokens, transport, api_base, "EBAY_US")
	}

	#[test]
	fn item_ids_are_encoded_as_one_segment() {
		let base = Url::parse(API_BASE).expect("API base fixture should parse.");
		let url = item_url(&base, "abc def/ghi").expect("Item URL should build.");

		assert_eq!(url.as_str(), "https://api.example.com/buy/browse/v1/item/abc%20def%2Fghi");
	}

	#[tokio::test]
	async fn search_sends_bearer_token_and_marketplace_header() {
		let transport = ScriptedTransport::default();
		let client = client(&transport);

		transport.respond(200, TOKEN_BODY).respond(200, r#"{"total":1,"itemSummaries":[]}"#);

		let query = SearchQuery {
			q: "gpu".into(),
			sort: Some("price".into()),
			marketplace: Some("EBAY_GB".into()),
			..SearchQuery::new("gpu")
		};
		let data = client.search(&query).await.expect("Search should succeed.");

		assert_eq!(data["total"], 1);

		let requests = transport.requests();
		let search = &requests[1];

		assert_eq!(search.method, "GET");
		assert_eq!(
			search.uri,
			"https://api.example.com/buy/browse/v1/item_summary/search?q=gpu&limit=20&offset=0&fieldgroups=EXTENDED&sort=price"
		);
		assert_eq!(search.header("authorization"), Some("Bearer bearer-1"));
		assert_eq!(search.header("x-ebay-c-marketplace-id"), Some("EBAY_GB"));
	}

	#[tokio::test]
	async fn calls_reuse_the_cached_token() {
		let transport = ScriptedTransport::default();
		let client = client(&transport);

		transport
			.respond(200, TOKEN_BODY)
			.respond(200, r#"{"itemId":"1"}"#)
			.respond(200, r#"{"itemId":"2"}"#);
		client.item("1").await.expect("First lookup should succeed.");
		client.item("2").await.expect("Second lookup should succeed.");

		let requests = transport.requests();

		assert_eq!(requests.len(), 3);
		assert!(requests[0].uri.ends_with("/identity/v1/oauth2/token"));
		assert_eq!(requests[2].header("x-ebay-c-marketplace-id"), Some("EBAY_US"));
	}

	#[tokio::test]
	async fn upstream_error_message_is_surfaced() {
		let transport = ScriptedTransport::default();
		let client = client(&transport);

		transport
			.respond(200, TOKEN_BODY)
			.respond(404, r#"{"errors":[{"errorId":11001,"message":"The specified item Id was not found."}]}"#);

		let err = client.item("missing").await.expect_err("404 responses should fail.");

		assert_eq!(err.to_string(), "Item details failed: The specified item Id was not found.");
		assert!(matches!(
			err,
			Error::Marketplace(MarketplaceError { status: Some(404), .. })
		));
	}

	#[tokio::test]
	async fn reason_phrase_is_used_without_error_entries() {
		let transport = ScriptedTransport::default();
		let client = client(&transport);

		transport.respond(200, TOKEN_BODY).respond(502, "bad gateway");

		let err = client
			.search(&SearchQuery::new("gpu"))
			.await
			.expect_err("502 responses should fail.");

		assert_eq!(err.to_string(), "Search failed: Bad Gateway");
	}

	#[tokio::test]
	async fn token_failures_skip_the_marketplace_call() {
		let transport = ScriptedTransport::default();
		let client = client(&transport);

		transport.respond(400, r#"{"error":"invalid_scope"}"#);

		let err = client.search(&SearchQuery::new("gpu")).await.expect_err("Token failure should fail.");

		assert!(matches!(err, Error::UpstreamAuth(UpstreamAuthError { status: Some(400), .. })));
		assert_eq!(transport.calls(), 1);
	}
}
