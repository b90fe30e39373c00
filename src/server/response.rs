//! JSON envelopes returned by the proxy endpoints.

// crates.io
use axum::{
	Json,
	extract::rejection::QueryRejection,
	http::StatusCode,
	response::{IntoResponse, Response},
};
use serde_json::{Value, json};
// self
use crate::{_prelude::*, marketplace::SearchQuery};

/// Successful search response.
#[derive(Debug, Serialize)]
pub struct SearchEnvelope {
	/// Always `true`.
	pub success: bool,
	/// Upstream payload, untouched.
	pub data: Value,
	/// Effective query parameters.
	pub query: QueryEcho,
}

/// Query parameters echoed back to the caller.
#[derive(Debug, Serialize)]
pub struct QueryEcho {
	/// Search keywords.
	pub q: String,
	/// Page size.
	pub limit: u32,
	/// Page offset.
	pub offset: u32,
	/// Sort expression, omitted when absent.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub sort: Option<String>,
	/// Marketplace the search ran against.
	pub marketplace: String,
}
impl QueryEcho {
	/// Echoes `query`, resolving the marketplace against `default_marketplace`.
	pub fn new(query: &SearchQuery, default_marketplace: &str) -> Self {
		Self {
			q: query.q.clone(),
			limit: query.limit,
			offset: query.offset,
			sort: query.sort.clone(),
			marketplace: query.marketplace.clone().unwrap_or_else(|| default_marketplace.to_owned()),
		}
	}
}

/// Successful item-detail response.
#[derive(Debug, Serialize)]
pub struct ItemEnvelope {
	/// Always `true`.
	pub success: bool,
	/// Upstream payload, untouched.
	pub data: Value,
}

/// Failures rendered by the proxy endpoints.
#[derive(Debug)]
pub enum ApiError {
	/// Caller sent unusable parameters (`400`).
	BadRequest(String),
	/// Caller used an unsupported method (`405`).
	MethodNotAllowed,
	/// Token acquisition or the marketplace call failed (`500`).
	Upstream(Error),
}
impl From<QueryRejection> for ApiError {
	fn from(rejection: QueryRejection) -> Self {
		Self::BadRequest(rejection.body_text())
	}
}
impl From<Error> for ApiError {
	fn from(e: Error) -> Self {
		Self::Upstream(e)
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		match self {
			Self::BadRequest(message) =>
				(StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response(),
			Self::MethodNotAllowed =>
				(StatusCode::METHOD_NOT_ALLOWED, Json(json!({ "error": "Method not allowed" })))
					.into_response(),
			Self::Upstream(e) => (
				StatusCode::INTERNAL_SERVER_ERROR,
				Json(json!({ "success": false, "error": e.to_string() })),
			)
				.into_response(),
		}
	}
}
