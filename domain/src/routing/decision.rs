//! Routing decision value objects

use super::agent::AgentId;
use crate::classification::TaskProfile;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which rule determined the selected agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickRule {
    /// First viable agent in matrix order
    MatrixRank,
    /// A faster agent was moved ahead of the matrix leader
    SpeedPreference,
    /// A cheaper agent was moved ahead of the matrix leader
    CostPreference,
    /// Higher-ranked agents were excluded
    FallbackPastExclusions,
    /// The caller forced the agent
    ForcedOverride,
}

impl PickRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            PickRule::MatrixRank => "matrix rank",
            PickRule::SpeedPreference => "speed preference",
            PickRule::CostPreference => "cost preference",
            PickRule::FallbackPastExclusions => "fallback past exclusions",
            PickRule::ForcedOverride => "forced override",
        }
    }
}

impl std::fmt::Display for PickRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A ranked runner-up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    pub agent: AgentId,
    pub score: f64,
}

/// The selector's verdict for one task (immutable once produced)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub selected_agent: AgentId,
    pub confidence: f64,
    pub reasoning: String,
    pub pick_rule: PickRule,
    pub alternatives: Vec<Alternative>,
    /// Option name to value, e.g. `model`, `mode`, plus the agent's defaults
    pub recommended_flags: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialized_task: Option<String>,
    pub task_profile: TaskProfile,
}

impl RoutingDecision {
    pub fn model(&self) -> Option<&str> {
        self.recommended_flags.get("model").map(String::as_str)
    }

    pub fn mode(&self) -> Option<&str> {
        self.recommended_flags.get("mode").map(String::as_str)
    }

    pub fn is_forced(&self) -> bool {
        self.pick_rule == PickRule::ForcedOverride
    }
}
