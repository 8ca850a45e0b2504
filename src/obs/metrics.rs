// self
use crate::obs::{OperationKind, RequestOutcome};

/// Records an operation outcome via the global metrics recorder (when enabled).
pub fn record_request_outcome(kind: OperationKind, outcome: RequestOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"akadone_client_request_total",
			"operation" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}
