//! OAuth 2.0 client-credentials token provider with a single-entry credential cache.
//!
//! [`TokenProvider::acquire_token`] serves the cached access token while the clock is strictly
//! before its computed expiry and otherwise performs one client-credentials exchange. Expiry is
//! the upstream `expires_in` minus a fixed one-minute safety margin so a cached token is never
//! handed out during its final minute of validity.

pub mod cache;
pub mod provider;

pub use cache::*;
pub use provider::*;
