// crates.io
use httpmock::prelude::*;
// self
use marketplace_proxy::{
	_preludet::*,
	clock::ManualClock,
	config::{self, CredentialConfig, DEFAULT_SCOPE},
	error::{MarketplaceError, MarketplaceOperation},
	http::{HttpTransport, ReqwestHttpClient},
	marketplace::{MarketplaceClient, SearchQuery},
	token::TokenProvider,
};

const TOKEN_PATH: &str = "/identity/v1/oauth2/token";
const SEARCH_PATH: &str = "/buy/browse/v1/item_summary/search";

fn build_client(server: &MockServer) -> MarketplaceClient {
	let api_base = Url::parse(&server.base_url()).expect("Mock server base URL should parse.");
	let transport: Arc<dyn HttpTransport> =
		Arc::new(ReqwestHttpClient::new().expect("Reqwest client should build."));
	let tokens = TokenProvider::new(
		CredentialConfig::new("proxy-id", "proxy-secret", DEFAULT_SCOPE),
		config::token_endpoint(&api_base).expect("Token endpoint should resolve."),
		transport.clone(),
	)
	.with_clock(Arc::new(ManualClock::new(OffsetDateTime::UNIX_EPOCH)));

	MarketplaceClient::new(tokens, transport, api_base, "EBAY_US")
}

async fn mock_token(server: &MockServer) -> httpmock::Mock<'_> {
	server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"access_token":"bearer-xyz","expires_in":7200}"#);
		})
		.await
}

#[tokio::test]
async fn search_forwards_query_and_headers() {
	let server = MockServer::start_async().await;
	let token_mock = mock_token(&server).await;
	let search_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path(SEARCH_PATH)
				.query_param("q", "camera")
				.query_param("limit", "5")
				.query_param("offset", "10")
				.query_param("fieldgroups", "EXTENDED")
				.query_param("sort", "-price")
				.header("authorization", "Bearer bearer-xyz")
				.header("x-ebay-c-marketplace-id", "EBAY_US");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"total":42,"itemSummaries":[{"itemId":"v1|1|0"}]}"#);
		})
		.await;
	let client = build_client(&server);
	let query = SearchQuery {
		limit: 5,
		offset: 10,
		sort: Some("-price".into()),
		..SearchQuery::new("camera")
	};
	let first = client.search(&query).await.expect("Search should succeed.");
	let second = client.search(&query).await.expect("Repeated search should succeed.");

	assert_eq!(first["total"], 42);
	assert_eq!(first, second);

	token_mock.assert_calls_async(1).await;
	search_mock.assert_calls_async(2).await;
}

#[tokio::test]
async fn item_lookup_targets_the_item_path() {
	let server = MockServer::start_async().await;
	let _token_mock = mock_token(&server).await;
	let item_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/buy/browse/v1/item/v1-1234-0")
				.header("authorization", "Bearer bearer-xyz");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"itemId":"v1-1234-0","title":"Camera"}"#);
		})
		.await;
	let client = build_client(&server);
	let data = client.item("v1-1234-0").await.expect("Item lookup should succeed.");

	assert_eq!(data["title"], "Camera");

	item_mock.assert_async().await;
}

#[tokio::test]
async fn item_failure_carries_the_upstream_message() {
	let server = MockServer::start_async().await;
	let _token_mock = mock_token(&server).await;
	let _item_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/buy/browse/v1/item/missing");
			then.status(404)
				.header("content-type", "application/json")
				.body(r#"{"errors":[{"errorId":11001,"message":"The specified item Id was not found."}]}"#);
		})
		.await;
	let client = build_client(&server);
	let err = client.item("missing").await.expect_err("Missing items should fail.");

	assert!(matches!(
		err,
		Error::Marketplace(MarketplaceError {
			operation: MarketplaceOperation::ItemDetails,
			status: Some(404),
			..
		})
	));
	assert_eq!(err.to_string(), "Item details failed: The specified item Id was not found.");
}
