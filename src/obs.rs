//! Optional observability helpers for client operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `akadone_client.request` with the
//!   `operation` and `stage` (call site) fields, plus a warning event whenever a session expires.
//! - Enable `metrics` to increment the `akadone_client_request_total` counter for every
//!   attempt/response/expiry/failure, labeled by `operation` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Client operations observed by the instrumentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
	/// Raw guarded request.
	Fetch,
	/// Login form exchange.
	Login,
	/// Explicit logout.
	Logout,
	/// Paginated entity listing.
	List,
	/// Entity creation.
	Create,
	/// Entity update.
	Update,
	/// Entity deletion.
	Delete,
	/// Combo-box lookup.
	Combo,
}
impl OperationKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationKind::Fetch => "fetch",
			OperationKind::Login => "login",
			OperationKind::Logout => "logout",
			OperationKind::List => "list",
			OperationKind::Create => "create",
			OperationKind::Update => "update",
			OperationKind::Delete => "delete",
			OperationKind::Combo => "combo",
		}
	}
}
impl Display for OperationKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestOutcome {
	/// Entry to a client operation.
	Attempt,
	/// A response other than 401 was returned to the caller.
	Response,
	/// The backend reported the session invalid; the caller was redirected.
	SessionExpired,
	/// Failure propagated back to the caller.
	Failure,
}
impl RequestOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RequestOutcome::Attempt => "attempt",
			RequestOutcome::Response => "response",
			RequestOutcome::SessionExpired => "session_expired",
			RequestOutcome::Failure => "failure",
		}
	}
}
impl Display for RequestOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
