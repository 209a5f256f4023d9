//! Port definitions (interfaces for external adapters)

pub mod agent_availability;
pub mod attempt_logger;
pub mod evaluator;
pub mod executor;
pub mod progress;
