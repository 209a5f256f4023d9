//! Port for structured attempt logging.
//!
//! Every executor call the orchestrator makes, failed ones included, is
//! handed to an [`AttemptLogger`]. This is separate from `tracing`
//! diagnostics: the logger keeps a machine-readable history (JSONL in the
//! infrastructure adapter).

use router_domain::{ExecutionAttempt, SessionId};

/// Records execution attempts.
///
/// `record` is synchronous and infallible so a broken log never interrupts
/// a session. Implementations swallow their own I/O errors.
pub trait AttemptLogger: Send + Sync {
    fn record(&self, session: &SessionId, attempt: &ExecutionAttempt);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoAttemptLogger;

impl AttemptLogger for NoAttemptLogger {
    fn record(&self, _session: &SessionId, _attempt: &ExecutionAttempt) {}
}
