//! Optional observability helpers for token and marketplace calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `marketplace_proxy.call` with the `call`
//!   (token/search/item) and `stage` (call site) fields.
//! - Enable `metrics` to increment the `marketplace_proxy_call_total` counter for every
//!   attempt/cache hit/success/failure, labeled by `call` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Call kinds observed by the proxy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallKind {
	/// Token acquisition through the client-credentials grant.
	Token,
	/// Browse API item summary search.
	Search,
	/// Browse API single item lookup.
	Item,
}
impl CallKind {
	/// Value of the `call` field.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallKind::Token => "token",
			CallKind::Search => "search",
			CallKind::Item => "item",
		}
	}
}
impl Display for CallKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// Entry to a call.
	Attempt,
	/// Served from the token cache without contacting upstream.
	CacheHit,
	/// Call returned a value.
	Success,
	/// Call returned an error.
	Failure,
}
impl CallOutcome {
	/// Value of the `outcome` label.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallOutcome::Attempt => "attempt",
			CallOutcome::CacheHit => "cache_hit",
			CallOutcome::Success => "success",
			CallOutcome::Failure => "failure",
		}
	}
}
impl Display for CallOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
