//! Client-credentials token acquisition with caching + singleflight guard.
//!
//! Cache hits never touch the refresh lock. On a miss the caller takes the lock, re-checks the
//! cache (another caller may have refreshed it meanwhile), and only then contacts the token
//! endpoint, so concurrent misses collapse into a single upstream request.

// crates.io
use base64::{Engine, prelude::BASE64_STANDARD};
use oauth2::{
	AccessToken, HttpRequest,
	http::{
		Method,
		header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
	},
};
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	clock::{Clock, SystemClock},
	config::CredentialConfig,
	error::UpstreamAuthError,
	http::{self, HttpTransport},
	obs::{self, CallKind, CallOutcome, CallSpan},
	token::{CachedCredential, CredentialCache},
};

/// Successful token endpoint payload. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
struct TokenGrant {
	access_token: String,
	expires_in: u64,
}

/// OAuth error payload returned alongside non-success statuses.
#[derive(Debug, Default, Deserialize)]
struct TokenErrorBody {
	error: Option<String>,
	error_description: Option<String>,
}

/// Obtains and memoizes a bearer credential for the marketplace API.
#[derive(Clone)]
pub struct TokenProvider {
	transport: Arc<dyn HttpTransport>,
	credentials: CredentialConfig,
	token_endpoint: Url,
	cache: CredentialCache,
	clock: Arc<dyn Clock>,
	refresh_guard: Arc<AsyncMutex<()>>,
}
impl TokenProvider {
	/// Time subtracted from `expires_in` before a token stops being served from cache.
	pub const SAFETY_MARGIN: Duration = Duration::seconds(60);

	/// Creates a provider with an empty cache and the system clock.
	pub fn new(
		credentials: CredentialConfig,
		token_endpoint: Url,
		transport: Arc<dyn HttpTransport>,
	) -> Self {
		Self {
			transport,
			credentials,
			token_endpoint,
			cache: CredentialCache::default(),
			clock: Arc::new(SystemClock),
			refresh_guard: Default::default(),
		}
	}

	/// Replaces the time source used for freshness checks and expiry computation.
	pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.clock = clock;

		self
	}

	/// Replaces the credential cache, e.g. to share or pre-seed it.
	pub fn with_cache(mut self, cache: CredentialCache) -> Self {
		self.cache = cache;

		self
	}

	/// Credential cache owned by this provider.
	pub fn cache(&self) -> &CredentialCache {
		&self.cache
	}

	/// Token endpoint contacted on cache misses.
	pub fn token_endpoint(&self) -> &Url {
		&self.token_endpoint
	}

	/// Returns a valid access token, fetching a new one when the cache is empty or expired.
	///
	/// On failure the cache is left exactly as it was.
	pub async fn acquire_token(&self) -> Result<AccessToken, UpstreamAuthError> {
		const KIND: CallKind = CallKind::Token;

		if let Some(token) = self.cache.valid_at(self.clock.now()) {
			obs::record_call_outcome(KIND, CallOutcome::CacheHit);

			return Ok(token);
		}

		let span = CallSpan::new(KIND, "acquire_token");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span
			.instrument(async {
				let _singleflight = self.refresh_guard.lock().await;

				if let Some(token) = self.cache.valid_at(self.clock.now()) {
					obs::trace_event(KIND, "token refreshed by a concurrent caller");

					return Ok(token);
				}

				let grant = self.request_token().await?;
				let credential = self.issue(grant)?;
				let token = credential.token.clone();

				self.cache.store(credential);
				obs::trace_event(KIND, "fetched and cached a new access token");

				Ok(token)
			})
			.await;

		match &result {
			Ok(_) => obs::record_call_outcome(KIND, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(KIND, CallOutcome::Failure),
		}

		result
	}

	fn issue(&self, grant: TokenGrant) -> Result<CachedCredential, UpstreamAuthError> {
		let lifetime = i64::try_from(grant.expires_in)
			.ok()
			.and_then(|secs| Duration::seconds(secs).checked_sub(Self::SAFETY_MARGIN))
			.ok_or_else(|| UpstreamAuthError::new("expires_in exceeds the supported range"))?;
		let expires_at = self
			.clock
			.now()
			.checked_add(lifetime)
			.ok_or_else(|| UpstreamAuthError::new("expires_in exceeds the supported range"))?;

		Ok(CachedCredential { token: AccessToken::new(grant.access_token), expires_at })
	}

	async fn request_token(&self) -> Result<TokenGrant, UpstreamAuthError> {
		let request = self.build_request()?;
		let response = self.transport.execute(request).await.map_err(|e| {
			UpstreamAuthError::new("the token endpoint could not be reached").with_source(e)
		})?;
		let status = response.status();

		if !http::is_success(&response) {
			let body = serde_json::from_slice::<TokenErrorBody>(response.body()).unwrap_or_default();
			let description = body.error_description.or(body.error).unwrap_or_else(|| {
				format!(
					"token endpoint returned HTTP {} {}",
					status.as_u16(),
					status.canonical_reason().unwrap_or("error")
				)
			});

			return Err(UpstreamAuthError::new(description).with_status(status.as_u16()));
		}

		let mut de = serde_json::Deserializer::from_slice(response.body());

		serde_path_to_error::deserialize(&mut de).map_err(|e| {
			UpstreamAuthError::new(format!("token endpoint returned malformed JSON at `{}`", e.path()))
				.with_status(status.as_u16())
				.with_source(e)
		})
	}

	fn build_request(&self) -> Result<HttpRequest, UpstreamAuthError> {
		let basic = BASE64_STANDARD.encode(format!(
			"{}:{}",
			self.credentials.client_id.as_str(),
			self.credentials.client_secret.secret()
		));
		let body = form_urlencoded::Serializer::new(String::new())
			.append_pair("grant_type", "client_credentials")
			.append_pair("scope", self.credentials.scope.as_str())
			.finish();

		oauth2::http::Request::builder()
			.method(Method::POST)
			.uri(self.token_endpoint.as_str())
			.header(CONTENT_TYPE, "application/x-www-form-urlencoded")
			.header(ACCEPT, "application/json")
			.header(AUTHORIZATION, format!("Basic {basic}"))
			.body(body.into_bytes())
			.map_err(|e| UpstreamAuthError::new("token request could not be built").with_source(e))
	}
}
impl Debug for TokenProvider {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenProvider")
			.field("token_endpoint", &self.token_endpoint.as_str())
			.field("client_id", &self.credentials.client_id.as_str())
			.field("scope", &self.credentials.scope.as_str())
			.finish()
	}
}
