//! Marketplace API proxy with a cached OAuth 2.0 client-credentials token provider.
//!
//! Search and item-detail calls share one bearer token, refreshed a minute before it expires.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod clock;
pub mod config;
pub mod error;
pub mod http;
pub mod marketplace;
pub mod obs;
#[cfg(feature = "server")] pub mod server;
pub mod token;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Re-exports and fakes shared by unit and integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// std
	use std::collections::VecDeque;
	// crates.io
	use oauth2::{
		HttpRequest, HttpResponse,
		http::{HeaderMap, StatusCode},
	};
	// self
	use crate::{
		error::TransportError,
		http::{HttpTransport, TransportFuture},
	};

	/// Request captured by [`ScriptedTransport`].
	#[derive(Clone, Debug)]
	pub struct RecordedRequest {
		/// HTTP method.
		pub method: String,
		/// Full request URI.
		pub uri: String,
		/// Request headers.
		pub headers: HeaderMap,
		/// Raw request body.
		pub body: Vec<u8>,
	}
	impl RecordedRequest {
		/// Returns a header value as a string, if present and valid UTF-8.
		pub fn header(&self, name: &str) -> Option<&str> {
			self.headers.get(name).and_then(|value| value.to_str().ok())
		}

		/// Returns the body as UTF-8 text.
		pub fn body_text(&self) -> String {
			String::from_utf8_lossy(&self.body).into_owned()
		}
	}

	enum Scripted {
		Respond { status: u16, body: String },
		Fail(String),
	}

	/// Fake [`HttpTransport`] that replays queued responses and records every request.
	///
	/// Once the queue is drained every further call fails with a transport error, so tests can
	/// assert the exact number of upstream calls.
	#[derive(Clone, Default)]
	pub struct ScriptedTransport {
		queue: Arc<Mutex<VecDeque<Scripted>>>,
		requests: Arc<Mutex<Vec<RecordedRequest>>>,
	}
	impl ScriptedTransport {
		/// Queues a response with the given status and JSON body.
		pub fn respond(&self, status: u16, body: impl Into<String>) -> &Self {
			self.queue.lock().push_back(Scripted::Respond { status, body: body.into() });

			self
		}

		/// Queues a transport-level failure.
		pub fn fail(&self, message: impl Into<String>) -> &Self {
			self.queue.lock().push_back(Scripted::Fail(message.into()));

			self
		}

		/// Number of requests executed so far.
		pub fn calls(&self) -> usize {
			self.requests.lock().len()
		}

		/// Snapshot of every request executed so far.
		pub fn requests(&self) -> Vec<RecordedRequest> {
			self.requests.lock().clone()
		}
	}
	impl HttpTransport for ScriptedTransport {
		fn execute(&self, request: HttpRequest) -> TransportFuture<'_> {
			let (parts, body) = request.into_parts();

			self.requests.lock().push(RecordedRequest {
				method: parts.method.to_string(),
				uri: parts.uri.to_string(),
				headers: parts.headers,
				body,
			});

			let next = self.queue.lock().pop_front();

			Box::pin(async move {
				match next {
					Some(Scripted::Respond { status, body }) => {
						let mut response = HttpResponse::new(body.into_bytes());

						*response.status_mut() =
							StatusCode::from_u16(status).map_err(TransportError::network)?;

						Ok(response)
					},
					Some(Scripted::Fail(message)) =>
						Err(TransportError::network(std::io::Error::other(message))),
					None => Err(TransportError::network(std::io::Error::other(
						"No scripted response left for this request.",
					))),
				}
			})
		}
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "server")] use {color_eyre as _, dotenv as _, tokio as _, tracing_subscriber as _};
#[cfg(test)] use {httpmock as _, tower as _};

pub use oauth2;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
