//! Progress notification port
//!
//! Defines the interface for reporting progress during orchestration.

use router_domain::{
    EvaluationVerdict, ExecutionAttempt, FailureClass, SessionId, SessionState,
};
use std::time::Duration;

/// Callback for progress updates during an orchestration run
///
/// Every method has a no-op default so implementations only override what
/// they display.
pub trait OrchestrationProgress: Send + Sync {
    /// Called after every state transition
    fn on_state_change(&self, _session: &SessionId, _from: SessionState, _to: SessionState) {}

    /// Called when an executor call finishes, successful or not
    fn on_attempt(&self, _attempt: &ExecutionAttempt) {}

    /// Called before a retry within the same cycle
    fn on_retry(&self, _cycle: u32, _class: FailureClass, _backoff: Duration) {}

    /// Called when the evaluator returns a verdict
    fn on_verdict(&self, _cycle: u32, _verdict: &EvaluationVerdict) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl OrchestrationProgress for NoProgress {}
