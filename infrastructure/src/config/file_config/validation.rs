//! Configuration issues reported by [`FileConfig::validate`](super::FileConfig::validate)

use thiserror::Error;

/// Problems found in a loaded configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("orchestration.invocation_timeout_secs cannot be 0")]
    InvalidTimeout,

    #[error("compression.max_tokens cannot be 0")]
    InvalidTokenBudget,

    #[error("orchestration.max_cycles = {0} is outside 1..=3 and will be clamped")]
    CycleCapOutOfRange(u32),

    #[error("{field}: unknown agent '{agent}'")]
    UnknownAgent { field: String, agent: String },
}

/// How serious an issue is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The value is adjusted or ignored; loading continues
    Warning,
    /// The configuration cannot be used
    Error,
}

/// A single validation finding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub error: ConfigValidationError,
}

impl ConfigIssue {
    pub fn warning(error: ConfigValidationError) -> Self {
        Self {
            severity: Severity::Warning,
            error,
        }
    }

    pub fn error(error: ConfigValidationError) -> Self {
        Self {
            severity: Severity::Error,
            error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.severity {
            Severity::Warning => write!(f, "warning: {}", self.error),
            Severity::Error => write!(f, "error: {}", self.error),
        }
    }
}
