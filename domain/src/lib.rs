//! Domain layer for agent-router
//!
//! This crate contains the routing and orchestration rules, free of I/O.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Routing
//!
//! - **Classification**: free text becomes a [`TaskProfile`] (task type,
//!   complexity, confidence and the signals behind them)
//! - **Selection**: the [`CapabilityMatrix`] ranks agents per task type and
//!   complexity; the [`Selector`] applies caller preferences and explains
//!   its pick in a [`RoutingDecision`]
//!
//! ## Orchestration
//!
//! An [`OrchestrationSession`] runs Execute → Evaluate cycles against one
//! agent, capped at [`MAX_CYCLES`], and ends `Accepted`, `Escalated` or
//! `Failed`.
//!
//! ## Compression
//!
//! [`compress`] shortens agent output to fit a token budget.

pub mod classification;
pub mod compression;
pub mod core;
pub mod orchestration;
pub mod routing;

// Re-export commonly used types
pub use classification::{
    CLASSIFIER_VARIANT, ClassificationRule, Classifier, Complexity, ComplexityEstimate, Pattern,
    RULES, TaskProfile, TaskType,
};
pub use compression::{
    CHARS_PER_TOKEN, CompressionLevel, CompressionResult, TRUNCATION_MARKER, compress,
};
pub use core::{error::DomainError, task::TaskDescription};
pub use orchestration::{
    AttemptStatus, Checklist, EvaluationVerdict, ExecutionAttempt, FailureClass, MAX_CYCLES,
    MAX_RETRIES_PER_CYCLE, NextStep, OrchestrationReport, OrchestrationSession, SessionId,
    SessionOutcome, SessionState, VerdictDecision,
};
pub use routing::{
    AgentId, AgentProfile, Alternative, CapabilityMatrix, CostTier, PickRule, RoutingDecision,
    RoutingPreferences, SPECIALIZED_TASKS, Selector, SpecializedMatch, SpecializedTask, SpeedTier,
    detect_specialized,
};
