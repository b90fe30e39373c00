//! Startup configuration: client credentials, marketplace endpoints, and listener address.
//!
//! Values come from environment variables. [`ProxyConfig::from_lookup`] takes the lookup as a
//! closure so callers (and tests) can supply variables without touching the process
//! environment; [`ProxyConfig::from_env`] reads `std::env`.

// std
use std::net::SocketAddr;
// crates.io
use oauth2::{ClientId, ClientSecret, Scope};
// self
use crate::{_prelude::*, error::ConfigError};

/// Default OAuth scope granting public Browse API access.
pub const DEFAULT_SCOPE: &str = "https://api.ebay.com/oauth/api_scope";
/// Default API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.ebay.com";
/// Default marketplace identifier sent with every Browse API call.
pub const DEFAULT_MARKETPLACE_ID: &str = "EBAY_US";
/// Default listener address for the proxy server.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";

/// Credential pair and scope used for the client-credentials exchange.
#[derive(Clone, Debug)]
pub struct CredentialConfig {
	/// Identity half of the credential pair.
	pub client_id: ClientId,
	/// Secret half of the credential pair.
	pub client_secret: ClientSecret,
	/// OAuth scope requested with every token.
	pub scope: Scope,
}
impl CredentialConfig {
	/// Creates a credential set from raw strings.
	pub fn new(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		scope: impl Into<String>,
	) -> Self {
		Self {
			client_id: ClientId::new(client_id.into()),
			client_secret: ClientSecret::new(client_secret.into()),
			scope: Scope::new(scope.into()),
		}
	}
}

/// Full proxy configuration.
#[derive(Clone, Debug)]
pub struct ProxyConfig {
	/// Client credentials for the token endpoint.
	pub credentials: CredentialConfig,
	/// Base URL for both the token endpoint and the Browse API.
	pub api_base: Url,
	/// Marketplace identifier used when a request does not name one.
	pub marketplace_id: String,
	/// Address the proxy server binds to.
	pub listen_addr: SocketAddr,
}
impl ProxyConfig {
	/// Loads configuration from the process environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	/// Loads configuration through `lookup`, which maps variable names to values.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
		let client_id =
			var("MARKETPLACE_CLIENT_ID").ok_or(ConfigError::MissingVar { name: "MARKETPLACE_CLIENT_ID" })?;
		let client_secret = var("MARKETPLACE_CLIENT_SECRET")
			.ok_or(ConfigError::MissingVar { name: "MARKETPLACE_CLIENT_SECRET" })?;
		let scope = var("MARKETPLACE_SCOPE").unwrap_or_else(|| DEFAULT_SCOPE.into());
		let api_base = var("MARKETPLACE_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.into());
		let api_base = Url::parse(&api_base).map_err(|e| ConfigError::InvalidVar {
			name: "MARKETPLACE_API_BASE",
			reason: e.to_string(),
		})?;

		if api_base.cannot_be_a_base() {
			return Err(ConfigError::InvalidVar {
				name: "MARKETPLACE_API_BASE",
				reason: "URL cannot be used as a base".into(),
			});
		}

		let marketplace_id = var("MARKETPLACE_ID").unwrap_or_else(|| DEFAULT_MARKETPLACE_ID.into());
		let listen_addr = var("PROXY_LISTEN_ADDR")
			.unwrap_or_else(|| DEFAULT_LISTEN_ADDR.into())
			.parse::<SocketAddr>()
			.map_err(|e| ConfigError::InvalidVar {
				name: "PROXY_LISTEN_ADDR",
				reason: e.to_string(),
			})?;

		Ok(Self {
			credentials: CredentialConfig::new(client_id, client_secret, scope),
			api_base,
			marketplace_id,
			listen_addr,
		})
	}

	/// OAuth2 token endpoint under the API base.
	pub fn token_endpoint(&self) -> Result<Url, ConfigError> {
		token_endpoint(&self.api_base)
	}
}

/// Resolves the token endpoint for an API base URL.
pub fn token_endpoint(api_base: &Url) -> Result<Url, ConfigError> {
	api_base
		.join("/identity/v1/oauth2/token")
		.map_err(|_| ConfigError::InvalidEndpoint { endpoint: "token" })
}
