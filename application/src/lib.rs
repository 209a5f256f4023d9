//! Application layer for agent-router
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{CompressionDefaults, OrchestrationParams, RoutingDefaults};
pub use ports::{
    agent_availability::{AgentAvailability, AssumeAvailable},
    attempt_logger::{AttemptLogger, NoAttemptLogger},
    evaluator::{Clarifier, CollaboratorError, Evaluator},
    executor::{ESSENTIAL_FLAGS, Executor, ExecutorError, InvocationRequest, InvocationResponse},
    progress::{NoProgress, OrchestrationProgress},
};
pub use use_cases::orchestrate::{OrchestrateInput, OrchestrateUseCase};
pub use use_cases::route_task::{
    AgentStatus, HealthStatus, RouteTaskError, RouteTaskInput, RouteTaskOutput, RouteTaskUseCase,
};
