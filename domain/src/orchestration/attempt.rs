//! Execution attempts and failure classes

use crate::routing::AgentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of a single executor call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptStatus {
    Ok,
    TransientError,
    FatalError,
    MalformedInvocation,
}

impl AttemptStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttemptStatus::Ok => "ok",
            AttemptStatus::TransientError => "transient_error",
            AttemptStatus::FatalError => "fatal_error",
            AttemptStatus::MalformedInvocation => "malformed_invocation",
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, AttemptStatus::Ok)
    }
}

impl std::fmt::Display for AttemptStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How the orchestrator reacts to a failed executor call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureClass {
    /// Network trouble or timeout: retry once after a backoff
    Transient,
    /// Authentication failure or missing tool: escalate immediately
    Fatal,
    /// Fixable invocation problem: correct the flags and retry once
    Malformed,
    /// The executor layer itself is unreachable: the session fails
    Unreachable,
}

/// Retries allowed per cycle for retryable failures
pub const MAX_RETRIES_PER_CYCLE: u32 = 1;

impl FailureClass {
    /// Status recorded on the attempt that hit this failure
    pub fn attempt_status(&self) -> AttemptStatus {
        match self {
            FailureClass::Transient => AttemptStatus::TransientError,
            FailureClass::Malformed => AttemptStatus::MalformedInvocation,
            FailureClass::Fatal | FailureClass::Unreachable => AttemptStatus::FatalError,
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, FailureClass::Transient | FailureClass::Malformed)
    }
}

/// One executor call within a session (never modified once recorded)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionAttempt {
    /// Cycle the attempt belongs to (1-indexed)
    pub cycle: u32,
    /// 0 for the first call of a cycle, 1 for its retry
    pub retry: u32,
    pub agent: AgentId,
    pub prompt: String,
    /// Response text (empty when the call failed)
    pub response: String,
    pub status: AttemptStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ExecutionAttempt {
    pub fn succeeded(
        cycle: u32,
        retry: u32,
        agent: AgentId,
        prompt: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        Self {
            cycle,
            retry,
            agent,
            prompt: prompt.into(),
            response: response.into(),
            status: AttemptStatus::Ok,
            error: None,
            timestamp: Utc::now(),
        }
    }

    pub fn failed(
        cycle: u32,
        retry: u32,
        agent: AgentId,
        prompt: impl Into<String>,
        status: AttemptStatus,
        error: impl Into<String>,
    ) -> Self {
        Self {
            cycle,
            retry,
            agent,
            prompt: prompt.into(),
            response: String::new(),
            status,
            error: Some(error.into()),
            timestamp: Utc::now(),
        }
    }

    pub fn is_retry(&self) -> bool {
        self.retry > 0
    }
}
