//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave:
//!
//! - [`OrchestrationParams`]: cycle cap, retry backoff, invocation timeout
//! - [`RoutingDefaults`]: preferences applied to every route request
//! - [`CompressionDefaults`]: level and token budget for output compression

pub mod orchestration_params;
pub mod routing_defaults;

pub use orchestration_params::OrchestrationParams;
pub use routing_defaults::{CompressionDefaults, RoutingDefaults};
