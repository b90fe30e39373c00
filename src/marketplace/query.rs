//! Search parameters accepted by [`MarketplaceClient::search`](crate::marketplace::MarketplaceClient::search).

// self
use crate::_prelude::*;

/// Item summary search request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
	/// Free-text keywords.
	pub q: String,
	/// Maximum number of items to return.
	pub limit: u32,
	/// Number of items to skip.
	pub offset: u32,
	/// Upstream sort expression, e.g. `price` or `-price`.
	pub sort: Option<String>,
	/// Comma-separated category identifiers.
	pub category_ids: Option<String>,
	/// Upstream filter expression.
	pub filter: Option<String>,
	/// Marketplace override; the client default applies when absent.
	pub marketplace: Option<String>,
}
impl SearchQuery {
	/// Page size used when the caller does not pass one.
	pub const DEFAULT_LIMIT: u32 = 20;

	/// Creates a query for `q` with default paging and no optional filters.
	pub fn new(q: impl Into<String>) -> Self {
		Self {
			q: q.into(),
			limit: Self::DEFAULT_LIMIT,
			offset: 0,
			sort: None,
			category_ids: None,
			filter: None,
			marketplace: None,
		}
	}

	/// Upstream query parameters in the order they are sent.
	///
	/// Always requests the `EXTENDED` field group so summaries carry shipping and buying options.
	pub fn to_params(&self) -> Vec<(&'static str, String)> {
		let mut params = vec![
			("q", self.q.clone()),
			("limit", self.limit.to_string()),
			("offset", self.offset.to_string()),
			("fieldgroups", "EXTENDED".to_owned()),
		];

		for (key, value) in
			[("sort", &self.sort), ("category_ids", &self.category_ids), ("filter", &self.filter)]
		{
			if let Some(value) = value {
				params.push((key, value.clone()));
			}
		}

		params
	}
}
