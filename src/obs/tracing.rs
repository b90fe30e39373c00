// self
use crate::{_prelude::*, obs::CallKind};

/// Future returned by [`CallSpan::instrument`].
#[cfg(feature = "tracing")]
pub type InstrumentedCall<F> = tracing::instrument::Instrumented<F>;
/// Future returned by [`CallSpan::instrument`]; calls run uninstrumented.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedCall<F> = F;

/// `marketplace_proxy.call` span; zero-sized without the `tracing` feature.
#[derive(Clone, Debug)]
pub struct CallSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl CallSpan {
	/// Opens an info span carrying `call` and `stage`.
	pub fn new(kind: CallKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("marketplace_proxy.call", call = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Runs `fut` inside this span, entering it on every poll.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedCall<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a debug-level event inside the current span (when tracing is enabled).
pub fn trace_event(kind: CallKind, message: &'static str) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(call = kind.as_str(), "{message}");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (kind, message);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn instrumented_calls_keep_their_result() {
		let span = CallSpan::new(CallKind::Item, "item");
		let result = span
			.instrument(async {
				trace_event(CallKind::Item, "inside the call span");

				Err::<(), _>("upstream said no")
			})
			.await;

		assert_eq!(result, Err("upstream said no"));
	}
}
