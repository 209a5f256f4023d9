//! Infrastructure layer for agent-router
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod availability;
pub mod config;
pub mod evaluation;
pub mod logging;

// Re-export commonly used types
pub use availability::PathAgentAvailability;
pub use config::{
    ConfigIssue, ConfigLoader, ConfigValidationError, FileAgentConfig, FileCompressionConfig,
    FileConfig, FileOrchestrationConfig, FileRoutingConfig, Severity,
};
pub use evaluation::{HeuristicEvaluator, TemplateClarifier};
pub use logging::JsonlAttemptLogger;
