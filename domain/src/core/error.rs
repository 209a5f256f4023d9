//! Domain error types

use crate::classification::{Complexity, TaskType};
use crate::orchestration::SessionState;
use thiserror::Error;

/// Domain-level errors
///
/// Classification never fails (a weak match degrades to the `open_qa`
/// fallback instead), so every variant here comes from input validation,
/// agent selection or session bookkeeping.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Task description cannot be empty")]
    EmptyTask,

    #[error("No agent available for {task_type} ({complexity}): {reasoning}")]
    NoAgentAvailable {
        task_type: TaskType,
        complexity: Complexity,
        reasoning: String,
    },

    #[error("Unknown agent: {0}")]
    UnknownAgent(String),

    #[error("Invalid capability matrix: {0}")]
    InvalidMatrix(String),

    #[error("Invalid session transition: {from} -> {to}")]
    InvalidTransition { from: SessionState, to: SessionState },

    #[error("Cycle limit reached ({0} cycles)")]
    CycleLimitReached(u32),

    #[error("Operation cancelled")]
    Cancelled,
}

impl DomainError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DomainError::Cancelled)
    }

    /// Check if this error means selection ran out of candidates
    pub fn is_no_agent(&self) -> bool {
        matches!(self, DomainError::NoAgentAvailable { .. })
    }
}
