//! Caller preferences for agent selection

use super::agent::AgentId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Knobs a caller can turn when asking for a routing decision
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingPreferences {
    /// Favor faster agents among the matrix candidates
    #[serde(default)]
    pub prefer_speed: bool,
    /// Favor cheaper agents among the matrix candidates
    #[serde(default)]
    pub prefer_cost: bool,
    /// Agents that must not be selected
    #[serde(default)]
    pub exclude: BTreeSet<AgentId>,
    /// Agent to use regardless of ranking and exclusions
    #[serde(default)]
    pub forced_agent: Option<AgentId>,
}

impl RoutingPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefer_speed(mut self, prefer_speed: bool) -> Self {
        self.prefer_speed = prefer_speed;
        self
    }

    pub fn with_prefer_cost(mut self, prefer_cost: bool) -> Self {
        self.prefer_cost = prefer_cost;
        self
    }

    pub fn with_exclusion(mut self, agent: impl Into<AgentId>) -> Self {
        self.exclude.insert(agent.into());
        self
    }

    pub fn with_exclusions<I, A>(mut self, agents: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<AgentId>,
    {
        self.exclude.extend(agents.into_iter().map(Into::into));
        self
    }

    pub fn with_forced_agent(mut self, agent: impl Into<AgentId>) -> Self {
        self.forced_agent = Some(agent.into());
        self
    }

    pub fn is_excluded(&self, agent: &AgentId) -> bool {
        self.exclude.contains(agent)
    }

    /// Whether any preference reorders candidates
    pub fn reorders(&self) -> bool {
        self.prefer_speed || self.prefer_cost
    }
}
