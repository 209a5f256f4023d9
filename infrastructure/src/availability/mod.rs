//! Agent availability detection
//!
//! Provides [`PathAgentAvailability`], which implements the
//! [`AgentAvailability`](router_application::AgentAvailability) port by
//! looking agent commands up on `PATH`.

mod path_probe;

pub use path_probe::PathAgentAvailability;
