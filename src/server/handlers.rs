//! Request handlers for the proxy routes.

// crates.io
use axum::{
	Json,
	extract::{Query, State, rejection::QueryRejection},
};
// self
use crate::{
	_prelude::*,
	marketplace::SearchQuery,
	server::{ApiError, AppState, ItemEnvelope, QueryEcho, SearchEnvelope},
};

/// Raw search parameters as sent by the caller.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
	/// Search keywords; required.
	pub q: Option<String>,
	/// Page size.
	pub limit: Option<String>,
	/// Page offset.
	pub offset: Option<String>,
	/// Sort expression.
	pub sort: Option<String>,
	/// Category identifiers.
	pub category_ids: Option<String>,
	/// Filter expression.
	pub filter: Option<String>,
	/// Marketplace override.
	pub marketplace: Option<String>,
}
impl SearchParams {
	/// Validates the raw parameters into a [`SearchQuery`].
	pub fn into_query(self) -> Result<SearchQuery, ApiError> {
		let q = self
			.q
			.filter(|q| !q.trim().is_empty())
			.ok_or_else(|| ApiError::BadRequest("Query parameter \"q\" is required".into()))?;
		let mut query = SearchQuery::new(q);

		// Zero is not a usable page size upstream.
		if let Some(limit) = parse_count("limit", self.limit)?.filter(|limit| *limit > 0) {
			query.limit = limit;
		}
		if let Some(offset) = parse_count("offset", self.offset)? {
			query.offset = offset;
		}

		query.sort = non_blank(self.sort);
		query.category_ids = non_blank(self.category_ids);
		query.filter = non_blank(self.filter);
		query.marketplace = non_blank(self.marketplace);

		Ok(query)
	}
}

/// Raw item-detail parameters as sent by the caller.
#[derive(Debug, Default, Deserialize)]
pub struct ItemParams {
	/// Marketplace item identifier; required.
	#[serde(rename = "itemId")]
	pub item_id: Option<String>,
}

/// `GET /api/ebay-search`.
pub async fn search(
	State(state): State<AppState>,
	params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchEnvelope>, ApiError> {
	let Query(params) = params?;
	let query = params.into_query()?;
	let data = state.marketplace.search(&query).await.inspect_err(|e| {
		tracing::error!(error = %e, q = %query.q, "search request failed");
	})?;
	let query = QueryEcho::new(&query, state.marketplace.marketplace_id());

	Ok(Json(SearchEnvelope { success: true, data, query }))
}

/// `GET /api/ebay-item`.
pub async fn item(
	State(state): State<AppState>,
	params: Result<Query<ItemParams>, QueryRejection>,
) -> Result<Json<ItemEnvelope>, ApiError> {
	let Query(params) = params?;
	let item_id = params
		.item_id
		.filter(|id| !id.is_empty())
		.ok_or_else(|| ApiError::BadRequest("Item ID is required".into()))?;
	let data = state.marketplace.item(&item_id).await.inspect_err(|e| {
		tracing::error!(error = %e, item_id = %item_id, "item request failed");
	})?;

	Ok(Json(ItemEnvelope { success: true, data }))
}

/// Any method the route does not serve.
pub async fn method_not_allowed() -> ApiError {
	ApiError::MethodNotAllowed
}

fn non_blank(value: Option<String>) -> Option<String> {
	value.filter(|value| !value.trim().is_empty())
}

fn parse_count(name: &str, raw: Option<String>) -> Result<Option<u32>, ApiError> {
	match raw.as_deref().map(str::trim).filter(|value| !value.is_empty()) {
		None => Ok(None),
		Some(value) => value.parse::<u32>().map(Some).map_err(|_| {
			ApiError::BadRequest(format!(
				"Query parameter \"{name}\" must be a non-negative integer"
			))
		}),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn params(q: Option<&str>) -> SearchParams {
		SearchParams { q: q.map(Into::into), ..SearchParams::default() }
	}

	#[test]
	fn blank_keywords_are_rejected() {
		for q in [None, Some(""), Some("   ")] {
			let err = params(q).into_query().expect_err("Blank keywords should be rejected.");

			assert!(matches!(err, ApiError::BadRequest(message) if message.contains("\"q\"")));
		}
	}

	#[test]
	fn paging_defaults_and_overrides() {
		let query = params(Some("lego")).into_query().expect("Keywords alone should be valid.");

		assert_eq!((query.limit, query.offset), (20, 0));

		let query = SearchParams {
			limit: Some("50".into()),
			offset: Some(" 100 ".into()),
			marketplace: Some("EBAY_DE".into()),
			..params(Some("lego"))
		}
		.into_query()
		.expect("Numeric paging should be valid.");

		assert_eq!((query.limit, query.offset), (50, 100));
		assert_eq!(query.marketplace.as_deref(), Some("EBAY_DE"));
	}

	#[test]
	fn zero_limit_uses_the_default_page_size() {
		let query = SearchParams { limit: Some("0".into()), ..params(Some("lego")) }
			.into_query()
			.expect("Zero should be accepted.");

		assert_eq!(query.limit, SearchQuery::DEFAULT_LIMIT);
	}

	#[test]
	fn empty_optional_filters_are_not_forwarded() {
		let query = SearchParams {
			sort: Some(String::new()),
			category_ids: Some(" ".into()),
			filter: Some(String::new()),
			..params(Some("lego"))
		}
		.into_query()
		.expect("Empty optional filters should be accepted.");
		let keys = query.to_params().into_iter().map(|(key, _)| key).collect::<Vec<_>>();

		assert_eq!(keys, ["q", "limit", "offset", "fieldgroups"]);
	}

	#[test]
	fn non_numeric_paging_is_rejected() {
		let err = SearchParams { offset: Some("-1".into()), ..params(Some("lego")) }
			.into_query()
			.expect_err("Negative offsets should be rejected.");

		assert!(matches!(err, ApiError::BadRequest(message) if message.contains("\"offset\"")));
	}
}
