//! Orchestration session states
//!
//! # State Transitions
//!
//! ```text
//! Init ──> Executing ──> Evaluating ──> Accepted
//!              ^  │           │   └───> Escalated
//!              │  │           v
//!              │  │   AwaitingClarification
//!              └──┼───────────┘
//!                 ├──> Escalated
//!                 └──> Failed
//! ```
//!
//! Every non-terminal state may also move to `Failed` (collaborator
//! unreachable or cancelled).

use serde::{Deserialize, Serialize};

/// State of an orchestration session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Init,
    Executing,
    Evaluating,
    AwaitingClarification,
    Accepted,
    Escalated,
    Failed,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Init => "init",
            SessionState::Executing => "executing",
            SessionState::Evaluating => "evaluating",
            SessionState::AwaitingClarification => "awaiting_clarification",
            SessionState::Accepted => "accepted",
            SessionState::Escalated => "escalated",
            SessionState::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionState::Accepted | SessionState::Escalated | SessionState::Failed
        )
    }

    /// Whether moving to `next` is a legal transition
    pub fn can_transition_to(&self, next: SessionState) -> bool {
        use SessionState::*;
        if self.is_terminal() {
            return false;
        }
        match (self, next) {
            (_, Failed) => true,
            (Init, Executing) => true,
            (Executing, Evaluating) | (Executing, Escalated) => true,
            (Evaluating, Accepted)
            | (Evaluating, Escalated)
            | (Evaluating, AwaitingClarification) => true,
            (AwaitingClarification, Executing) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
