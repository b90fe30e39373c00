//! Crate-level error types shared by the token provider, marketplace client, and server.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Token acquisition failed.
	#[error(transparent)]
	UpstreamAuth(#[from] UpstreamAuthError),
	/// Marketplace API rejected or garbled a call.
	#[error(transparent)]
	Marketplace(#[from] MarketplaceError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
}

/// The single failure kind surfaced by the token provider.
///
/// Raised when the token endpoint answers with a non-success status, returns a body that cannot
/// be parsed, or cannot be reached at all. The cache is never modified when this is returned.
#[derive(Debug, ThisError)]
#[error("Token request failed: {description}")]
pub struct UpstreamAuthError {
	/// Upstream-provided `error_description`, or the best available fallback.
	pub description: String,
	/// HTTP status code, when a response was received.
	pub status: Option<u16>,
	/// Underlying failure, if any.
	#[source]
	pub source: Option<BoxError>,
}
impl UpstreamAuthError {
	/// Creates an error carrying only a description.
	pub fn new(description: impl Into<String>) -> Self {
		Self { description: description.into(), status: None, source: None }
	}

	/// Attaches the HTTP status returned by the token endpoint.
	pub fn with_status(mut self, status: u16) -> Self {
		self.status = Some(status);

		self
	}

	/// Attaches the underlying failure.
	pub fn with_source(mut self, src: impl 'static + Send + Sync + std::error::Error) -> Self {
		self.source = Some(Box::new(src));

		self
	}
}

/// Marketplace operations that can fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarketplaceOperation {
	/// Item summary search.
	Search,
	/// Single item lookup.
	ItemDetails,
}
impl MarketplaceOperation {
	/// Returns the label used in error messages.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Search => "Search",
			Self::ItemDetails => "Item details",
		}
	}
}
impl Display for MarketplaceOperation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Marketplace API failure.
#[derive(Debug, ThisError)]
#[error("{operation} failed: {message}")]
pub struct MarketplaceError {
	/// Operation that failed.
	pub operation: MarketplaceOperation,
	/// First upstream error message, or the HTTP reason phrase.
	pub message: String,
	/// HTTP status code returned by the marketplace.
	pub status: Option<u16>,
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// A required environment variable is not set.
	#[error("Environment variable `{name}` is required.")]
	MissingVar {
		/// Variable name.
		name: &'static str,
	},
	/// An environment variable holds an unusable value.
	#[error("Environment variable `{name}` is invalid: {reason}.")]
	InvalidVar {
		/// Variable name.
		name: &'static str,
		/// Why the value was rejected.
		reason: String,
	},
	/// A URL could not be derived from the configured API base.
	#[error("Cannot build the {endpoint} URL from the configured API base.")]
	InvalidEndpoint {
		/// Endpoint label.
		endpoint: &'static str,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Failure to obtain any response from upstream.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the marketplace.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
