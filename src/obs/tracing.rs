// self
use crate::{_prelude::*, obs::OperationKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedRequest<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedRequest<F> = F;

/// A span builder used by client operations.
#[derive(Clone, Debug)]
pub struct RequestSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl RequestSpan {
	/// Creates a new span tagged with the provided operation + stage.
	pub fn new(kind: OperationKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span =
				tracing::info_span!("akadone_client.request", operation = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedRequest<Fut>
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

/// Emits a warning that `url` answered 401 and the session was dropped.
pub fn session_expired_event(url: &Url, login_route: &str) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(%url, login_route, "session expired; redirecting to login");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (url, login_route);
	}
}

/// Emits a warning that clearing the session store failed during expiry handling.
pub fn session_clear_failed_event(error: &crate::store::StoreError) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(%error, "failed to clear expired session");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = error;
	}
}
