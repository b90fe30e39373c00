//! HTTP surface: an axum router that proxies search and item-detail requests.
//!
//! Every response carries permissive CORS headers and `OPTIONS` answers `200` with an empty body.
//! Methods other than `GET` answer `405`. Failures are wrapped in the JSON envelope produced by
//! [`ApiError`].

pub mod handlers;
pub mod response;

pub use response::*;

// std
use std::convert::Infallible;
// crates.io
use axum::{
	Router,
	http::{
		HeaderValue, Method,
		header::{ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, CONTENT_TYPE},
	},
	routing::{MethodRouter, get},
};
use tower_http::{
	cors::{AllowMethods, Any, CorsLayer},
	set_header::SetResponseHeaderLayer,
	trace::TraceLayer,
};
// self
use crate::{_prelude::*, marketplace::MarketplaceClient};

/// Route serving item summary searches.
pub const SEARCH_ROUTE: &str = "/api/ebay-search";
/// Route serving single item lookups.
pub const ITEM_ROUTE: &str = "/api/ebay-item";

/// State shared by every handler.
#[derive(Clone, Debug)]
pub struct AppState {
	/// Marketplace client; owns the token provider and its cache.
	pub marketplace: Arc<MarketplaceClient>,
}
impl AppState {
	/// Wraps a marketplace client for sharing across handlers.
	pub fn new(marketplace: MarketplaceClient) -> Self {
		Self { marketplace: Arc::new(marketplace) }
	}
}

/// Builds the proxy router.
pub fn router(state: AppState) -> Router {
	Router::new()
		.route(SEARCH_ROUTE, endpoint(get(handlers::search), "GET, POST, OPTIONS"))
		.route(ITEM_ROUTE, endpoint(get(handlers::item), "GET, OPTIONS"))
		.layer(TraceLayer::new_for_http())
		.with_state(state)
}

// `CorsLayer` answers every `OPTIONS` itself and only lists methods and headers on preflights,
// so the same values are stamped onto every other response as well.
fn endpoint(route: MethodRouter<AppState>, allow: &'static str) -> MethodRouter<AppState> {
	let cors = CorsLayer::new()
		.allow_origin(Any)
		.allow_methods(AllowMethods::list(allow.split(", ").filter_map(|m| m.parse::<Method>().ok())))
		.allow_headers([CONTENT_TYPE]);

	route
		.head(handlers::method_not_allowed)
		.fallback(handlers::method_not_allowed)
		.layer::<_, Infallible>(cors)
		.layer::<_, Infallible>(SetResponseHeaderLayer::if_not_present(
			ACCESS_CONTROL_ALLOW_METHODS,
			HeaderValue::from_static(allow),
		))
		.layer(SetResponseHeaderLayer::if_not_present(
			ACCESS_CONTROL_ALLOW_HEADERS,
			HeaderValue::from_static("Content-Type"),
		))
}
