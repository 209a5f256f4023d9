//! Executor port
//!
//! Defines the interface for invoking a backend coding agent. Adapters that
//! launch real agents live outside this crate; tests use scripted doubles.

use async_trait::async_trait;
use router_domain::{AgentId, FailureClass};
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

/// Flags kept when an invocation is corrected without a named offender
pub const ESSENTIAL_FLAGS: &[&str] = &["mode"];

/// Errors an executor can report for a single invocation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExecutorError {
    #[error("Invocation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Agent tool not installed: {0}")]
    ToolMissing(String),

    #[error("Malformed invocation: {message}")]
    MalformedInvocation {
        /// Flag the agent rejected, when it said which one
        offending_flag: Option<String>,
        message: String,
    },

    #[error("Executor unavailable: {0}")]
    Unavailable(String),
}

impl ExecutorError {
    /// How the orchestrator should react to this error
    pub fn class(&self) -> FailureClass {
        match self {
            ExecutorError::Timeout(_) | ExecutorError::Network(_) => FailureClass::Transient,
            ExecutorError::Auth(_) | ExecutorError::ToolMissing(_) => FailureClass::Fatal,
            ExecutorError::MalformedInvocation { .. } => FailureClass::Malformed,
            ExecutorError::Unavailable(_) => FailureClass::Unreachable,
        }
    }
}

/// A single call to a backend agent
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationRequest {
    pub agent: AgentId,
    pub prompt: String,
    /// Handle returned by an earlier call in the same session
    pub context_handle: Option<String>,
    pub flags: BTreeMap<String, String>,
}

impl InvocationRequest {
    pub fn new(agent: AgentId, prompt: impl Into<String>) -> Self {
        Self {
            agent,
            prompt: prompt.into(),
            context_handle: None,
            flags: BTreeMap::new(),
        }
    }

    pub fn with_context_handle(mut self, handle: Option<String>) -> Self {
        self.context_handle = handle;
        self
    }

    pub fn with_flags(mut self, flags: BTreeMap<String, String>) -> Self {
        self.flags = flags;
        self
    }

    /// Correct the invocation after a malformed-invocation error.
    ///
    /// Drops the named flag, or every flag outside [`ESSENTIAL_FLAGS`] when
    /// the agent did not name one. Returns `false` when nothing changed, in
    /// which case a retry cannot help.
    pub fn correct(&mut self, offending_flag: Option<&str>) -> bool {
        let before = self.flags.len();
        match offending_flag {
            Some(flag) => {
                let flag = flag.trim_start_matches('-');
                self.flags.remove(flag);
            }
            None => self
                .flags
                .retain(|key, _| ESSENTIAL_FLAGS.contains(&key.as_str())),
        }
        self.flags.len() != before
    }
}

/// What an agent sent back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationResponse {
    pub text: String,
    /// Handle for continuing the same conversation on later calls
    pub context_handle: Option<String>,
}

impl InvocationResponse {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            context_handle: None,
        }
    }

    pub fn with_context_handle(mut self, handle: impl Into<String>) -> Self {
        self.context_handle = Some(handle.into());
        self
    }
}

/// Port for invoking a backend agent
///
/// Implementations must be safe to share across sessions.
#[async_trait]
pub trait Executor: Send + Sync {
    async fn invoke(&self, request: &InvocationRequest) -> Result<InvocationResponse, ExecutorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> InvocationRequest {
        let flags = BTreeMap::from([
            ("model".to_string(), "gpt-4o".to_string()),
            ("mode".to_string(), "ask".to_string()),
            ("output-format".to_string(), "text".to_string()),
        ]);
        InvocationRequest::new(AgentId::from("cursor"), "explain this").with_flags(flags)
    }

    #[test]
    fn test_error_classes() {
        assert_eq!(
            ExecutorError::Timeout(Duration::from_secs(1)).class(),
            FailureClass::Transient
        );
        assert_eq!(
            ExecutorError::Network("reset".into()).class(),
            FailureClass::Transient
        );
        assert_eq!(ExecutorError::Auth("401".into()).class(), FailureClass::Fatal);
        assert_eq!(
            ExecutorError::ToolMissing("agent".into()).class(),
            FailureClass::Fatal
        );
        assert_eq!(
            ExecutorError::MalformedInvocation {
                offending_flag: None,
                message: "bad".into()
            }
            .class(),
            FailureClass::Malformed
        );
        assert_eq!(
            ExecutorError::Unavailable("down".into()).class(),
            FailureClass::Unreachable
        );
    }

    #[test]
    fn test_correct_drops_named_flag() {
        let mut request = request();
        assert!(request.correct(Some("--model")));
        assert!(!request.flags.contains_key("model"));
        assert!(request.flags.contains_key("output-format"));
    }

    #[test]
    fn test_correct_without_name_keeps_essential_flags() {
        let mut request = request();
        assert!(request.correct(None));
        assert_eq!(request.flags.len(), 1);
        assert_eq!(request.flags.get("mode").map(String::as_str), Some("ask"));
    }

    #[test]
    fn test_correct_reports_no_change() {
        let mut request = request();
        assert!(!request.correct(Some("unknown")));
        let mut bare = InvocationRequest::new(AgentId::from("codex"), "x");
        assert!(!bare.correct(None));
    }
}
