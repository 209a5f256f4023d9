//! Execute → Evaluate orchestration
//!
//! Domain side of the orchestrator: the session state machine, the attempt
//! history and evaluator verdicts. The async loop that drives collaborators
//! lives in the application layer.

pub mod attempt;
pub mod session;
pub mod state;
pub mod verdict;

pub use attempt::{AttemptStatus, ExecutionAttempt, FailureClass, MAX_RETRIES_PER_CYCLE};
pub use session::{
    MAX_CYCLES, NextStep, OrchestrationReport, OrchestrationSession, SessionId, SessionOutcome,
};
pub use state::SessionState;
pub use verdict::{Checklist, EvaluationVerdict, VerdictDecision};
