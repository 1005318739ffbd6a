//! Optional observability helpers for client calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` (default) to emit structured spans named `eventhub_client.call` with the
//!   `call` (operation family) and `stage` (call site) fields, plus warning events for
//!   refresh failures and poll errors.
//! - Enable `metrics` to increment the `eventhub_client_call_total` counter for every
//!   attempt/success/failure, labeled by `call` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

pub(crate) use tracing::trace_event;

// self
use crate::_prelude::*;

/// Call families observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallKind {
	/// Bearer-authenticated API request.
	Api,
	/// Single-flight token refresh.
	Refresh,
	/// Login or registration against the public endpoints.
	SignIn,
	/// Full-text search index query.
	Search,
}
impl CallKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallKind::Api => "api",
			CallKind::Refresh => "refresh",
			CallKind::SignIn => "sign_in",
			CallKind::Search => "search",
		}
	}
}
impl Display for CallKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// Entry to a client helper.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl CallOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallOutcome::Attempt => "attempt",
			CallOutcome::Success => "success",
			CallOutcome::Failure => "failure",
		}
	}
}
impl Display for CallOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Records the terminal outcome of `result` for `kind`.
pub(crate) fn record_result<T>(kind: CallKind, result: &Result<T>) {
	match result {
		Ok(_) => record_call_outcome(kind, CallOutcome::Success),
		Err(_) => record_call_outcome(kind, CallOutcome::Failure),
	}
}
