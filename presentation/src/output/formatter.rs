//! Output formatter trait

use router_application::{AgentStatus, HealthStatus};
use router_domain::{CompressionResult, RoutingDecision, TaskProfile};

/// Trait for rendering the results of each CLI mode
pub trait OutputFormatter {
    /// Format a full routing decision
    fn decision(&self, decision: &RoutingDecision) -> String;

    /// Format a classification (`--classify-only`)
    fn profile(&self, profile: &TaskProfile) -> String;

    /// Format a compression result (`--compress`)
    fn compression(&self, result: &CompressionResult) -> String;

    /// Format classifier health (`--health`)
    fn health(&self, health: &HealthStatus) -> String;

    /// Format the agent listing (`--list-agents`)
    fn agents(&self, agents: &[AgentStatus]) -> String;
}
