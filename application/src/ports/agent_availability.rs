//! Agent availability port
//!
//! Routing can skip agents whose CLI is not installed on this machine.

use router_domain::AgentProfile;

/// Reports whether an agent can be invoked locally
pub trait AgentAvailability: Send + Sync {
    fn is_available(&self, agent: &AgentProfile) -> bool;
}

/// Treats every agent as installed (used when probing is disabled)
pub struct AssumeAvailable;

impl AgentAvailability for AssumeAvailable {
    fn is_available(&self, _agent: &AgentProfile) -> bool {
        true
    }
}
