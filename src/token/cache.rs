//! Single-entry credential cache owned by a [`TokenProvider`](crate::token::TokenProvider).

// crates.io
use oauth2::AccessToken;
// self
use crate::_prelude::*;

/// Cached access token together with the instant after which it must not be served.
#[derive(Clone, Debug)]
pub struct CachedCredential {
	/// Access token; its `Debug` output is redacted.
	pub token: AccessToken,
	/// Instant at which the token stops being served from cache.
	pub expires_at: OffsetDateTime,
}
impl CachedCredential {
	/// Returns `true` while `now` is strictly before the expiry instant.
	pub fn is_valid_at(&self, now: OffsetDateTime) -> bool {
		now < self.expires_at
	}
}

/// Lifecycle state of a [`CredentialCache`] at a given instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheState {
	/// Nothing cached yet, or the cached token passed its expiry.
	EmptyOrExpired,
	/// A token is cached and may be served.
	Valid,
}

/// Thread-safe slot holding at most one [`CachedCredential`].
///
/// Clones share the same slot. Expiry is evaluated lazily on read; nothing is evicted.
#[derive(Clone, Debug, Default)]
pub struct CredentialCache(Arc<RwLock<Option<CachedCredential>>>);
impl CredentialCache {
	/// Returns the cached token if it is still valid at `now`.
	pub fn valid_at(&self, now: OffsetDateTime) -> Option<AccessToken> {
		self.0
			.read()
			.as_ref()
			.filter(|credential| credential.is_valid_at(now))
			.map(|credential| credential.token.clone())
	}

	/// Computes the lifecycle state at `now`.
	pub fn state_at(&self, now: OffsetDateTime) -> CacheState {
		if self.valid_at(now).is_some() { CacheState::Valid } else { CacheState::EmptyOrExpired }
	}

	/// Returns a copy of the cached credential, expired or not.
	pub fn snapshot(&self) -> Option<CachedCredential> {
		self.0.read().clone()
	}

	/// Replaces the cached credential. The last writer wins.
	pub fn store(&self, credential: CachedCredential) {
		*self.0.write() = Some(credential);
	}

	/// Empties the cache.
	pub fn reset(&self) {
		self.0.write().take();
	}
}
