//! Capability matrix
//!
//! Maps every `(task type, complexity)` pair to an ordered list of agents and
//! holds the profile of each agent. A matrix is built once (usually from
//! [`CapabilityMatrix::builtin`] plus configuration) and shared read-only.

use super::agent::{AgentId, AgentProfile, CostTier, SpeedTier};
use crate::classification::{Complexity, TaskType};
use crate::core::error::DomainError;
use std::collections::BTreeMap;
use Complexity::{Complex, Moderate, Simple};
use TaskType::*;

/// Immutable routing table
#[derive(Debug, Clone, PartialEq)]
pub struct CapabilityMatrix {
    agents: BTreeMap<AgentId, AgentProfile>,
    routes: BTreeMap<(TaskType, Complexity), Vec<AgentId>>,
}

impl CapabilityMatrix {
    /// Build a matrix, checking that every routed agent has a profile and
    /// every mode an agent refers to is declared.
    pub fn new(
        agents: impl IntoIterator<Item = AgentProfile>,
        routes: BTreeMap<(TaskType, Complexity), Vec<AgentId>>,
    ) -> Result<Self, DomainError> {
        let agents: BTreeMap<AgentId, AgentProfile> =
            agents.into_iter().map(|a| (a.id.clone(), a)).collect();

        for ((task_type, complexity), ids) in &routes {
            for id in ids {
                if !agents.contains_key(id) {
                    return Err(DomainError::InvalidMatrix(format!(
                        "route {}/{} names unknown agent '{}'",
                        task_type, complexity, id
                    )));
                }
            }
        }
        for agent in agents.values() {
            if let Some(mode) = agent.referenced_modes().find(|m| !agent.supports_mode(m)) {
                return Err(DomainError::InvalidMatrix(format!(
                    "agent '{}' refers to undeclared mode '{}'",
                    agent.id, mode
                )));
            }
        }

        Ok(Self { agents, routes })
    }

    /// The default agents: codex, cursor, gemini and copilot
    pub fn builtin() -> Self {
        let agents = builtin_agents();
        let mut routes = BTreeMap::new();
        for (task_type, complexity, ids) in BUILTIN_ROUTES {
            routes.insert(
                (*task_type, *complexity),
                ids.iter().map(|id| AgentId::from(*id)).collect(),
            );
        }
        // The built-in table only names built-in agents and declared modes
        Self { agents, routes }
    }

    /// Ordered candidates for a task type and complexity (empty when the
    /// matrix has no entry)
    pub fn candidates(&self, task_type: TaskType, complexity: Complexity) -> &[AgentId] {
        self.routes
            .get(&(task_type, complexity))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn agent(&self, id: &AgentId) -> Option<&AgentProfile> {
        self.agents.get(id)
    }

    pub fn contains(&self, id: &AgentId) -> bool {
        self.agents.contains_key(id)
    }

    /// All agent profiles, ordered by id
    pub fn agents(&self) -> impl Iterator<Item = &AgentProfile> {
        self.agents.values()
    }

    pub fn agent_ids(&self) -> impl Iterator<Item = &AgentId> {
        self.agents.keys()
    }

    /// Replace the candidate list of one cell
    pub fn with_route(
        mut self,
        task_type: TaskType,
        complexity: Complexity,
        ids: Vec<AgentId>,
    ) -> Result<Self, DomainError> {
        if let Some(id) = ids.iter().find(|id| !self.agents.contains_key(*id)) {
            return Err(DomainError::UnknownAgent(id.to_string()));
        }
        self.routes.insert((task_type, complexity), ids);
        Ok(self)
    }

    /// Remove an agent from every route (its profile stays known so it can
    /// still be forced)
    pub fn without_routes_to(mut self, id: &AgentId) -> Self {
        for ids in self.routes.values_mut() {
            ids.retain(|candidate| candidate != id);
        }
        self
    }

    /// Merge flags over an agent's default flags
    pub fn with_agent_flags(
        mut self,
        id: &AgentId,
        flags: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Self, DomainError> {
        let agent = self
            .agents
            .get_mut(id)
            .ok_or_else(|| DomainError::UnknownAgent(id.to_string()))?;
        agent.default_flags.extend(flags);
        Ok(self)
    }
}

impl Default for CapabilityMatrix {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_agents() -> BTreeMap<AgentId, AgentProfile> {
    let codex = AgentProfile::new(
        "codex",
        "codex",
        "OpenAI Codex CLI - versatile for misc coding tasks with adjustable reasoning",
    )
    .with_speed(SpeedTier::Medium)
    .with_cost(CostTier::Medium)
    .with_mode("default", None)
    .with_mode("medium_reasoning", Some("--reasoning medium"))
    .with_mode("high_reasoning", Some("--reasoning high"))
    .with_complexity_mode(Simple, "medium_reasoning")
    .with_complexity_mode(Moderate, "medium_reasoning")
    .with_complexity_mode(Complex, "high_reasoning")
    .with_task_mode(Math, "high_reasoning")
    .with_model("gpt-5.2-codex")
    .with_affinity(Math, 1.0)
    .with_affinity(CodeGeneration, 0.7)
    .with_affinity(CodeDebugging, 0.6)
    .with_affinity(Rewrite, 0.5)
    .with_affinity(CodeReview, 0.4)
    .with_affinity(CodeExplanation, 0.5)
    .with_affinity(Summarization, 0.3)
    .with_affinity(OpenQa, 0.4);

    let cursor = AgentProfile::new(
        "cursor",
        "agent",
        "Cursor AI - best for planning, architecture, debugging, and repo-aware refactoring",
    )
    .with_speed(SpeedTier::Medium)
    .with_cost(CostTier::Medium)
    .with_mode("plan", Some("--mode plan"))
    .with_mode("agent", Some("--mode agent"))
    .with_mode("ask", Some("--mode ask"))
    .with_task_mode(CodeReview, "ask")
    .with_task_mode(CodeExplanation, "ask")
    .with_task_mode(OpenQa, "ask")
    .with_task_mode(Summarization, "ask")
    .with_default_mode("agent")
    .with_model_for(Simple, "gpt-4o")
    .with_model_for(Moderate, "claude-sonnet-4.5")
    .with_model_for(Complex, "claude-opus-4.5")
    .with_affinity(CodeDebugging, 1.0)
    .with_affinity(CodeReview, 1.0)
    .with_affinity(Rewrite, 1.0)
    .with_affinity(CodeExplanation, 0.7)
    .with_affinity(CodeGeneration, 0.6)
    .with_affinity(Summarization, 0.4)
    .with_affinity(Math, 0.4)
    .with_affinity(OpenQa, 0.4);

    let gemini = AgentProfile::new(
        "gemini",
        "gemini",
        "Gemini CLI - primary for code generation, research, documentation, and analysis",
    )
    .with_speed(SpeedTier::Fast)
    .with_cost(CostTier::Low)
    .with_mode("read", None)
    .with_mode("edit", Some("--yolo"))
    .with_task_mode(CodeGeneration, "edit")
    .with_task_mode(Rewrite, "edit")
    .with_default_mode("read")
    .with_model("gemini-3-pro")
    .with_affinity(CodeGeneration, 1.0)
    .with_affinity(CodeExplanation, 1.0)
    .with_affinity(Summarization, 1.0)
    .with_affinity(OpenQa, 1.0)
    .with_affinity(Rewrite, 0.6)
    .with_affinity(Math, 0.6)
    .with_affinity(CodeDebugging, 0.5)
    .with_affinity(CodeReview, 0.5);

    let copilot = AgentProfile::new(
        "copilot",
        "copilot",
        "GitHub Copilot CLI - Opus specialist for complex reasoning and deep analysis",
    )
    .with_speed(SpeedTier::Slow)
    .with_cost(CostTier::High)
    .with_mode("default", None)
    .with_mode("edit", Some("--allow-all-paths"))
    .with_task_mode(CodeGeneration, "edit")
    .with_task_mode(Rewrite, "edit")
    .with_default_mode("default")
    .with_model("claude-opus-4.5")
    .with_affinity(CodeReview, 0.9)
    .with_affinity(CodeDebugging, 0.8)
    .with_affinity(Math, 0.8)
    .with_affinity(CodeExplanation, 0.7)
    .with_affinity(Rewrite, 0.7)
    .with_affinity(CodeGeneration, 0.6)
    .with_affinity(OpenQa, 0.6)
    .with_affinity(Summarization, 0.5);

    [codex, cursor, gemini, copilot]
        .into_iter()
        .map(|a| (a.id.clone(), a))
        .collect()
}

type RouteRow = (TaskType, Complexity, &'static [&'static str]);

const BUILTIN_ROUTES: &[RouteRow] = &[
    (CodeDebugging, Simple, &["cursor", "codex", "gemini"]),
    (CodeDebugging, Moderate, &["cursor", "codex", "copilot"]),
    (CodeDebugging, Complex, &["cursor", "copilot", "codex"]),
    (CodeReview, Simple, &["cursor", "codex", "gemini"]),
    (CodeReview, Moderate, &["cursor", "copilot", "codex"]),
    (CodeReview, Complex, &["copilot", "cursor", "codex"]),
    (CodeExplanation, Simple, &["gemini", "cursor", "codex"]),
    (CodeExplanation, Moderate, &["gemini", "cursor", "codex"]),
    (CodeExplanation, Complex, &["gemini", "cursor", "copilot"]),
    (CodeGeneration, Simple, &["gemini", "codex", "cursor"]),
    (CodeGeneration, Moderate, &["gemini", "codex", "cursor"]),
    (CodeGeneration, Complex, &["gemini", "cursor", "copilot"]),
    (Rewrite, Simple, &["cursor", "gemini", "codex"]),
    (Rewrite, Moderate, &["cursor", "gemini", "codex"]),
    (Rewrite, Complex, &["cursor", "copilot", "gemini"]),
    (Summarization, Simple, &["gemini", "cursor"]),
    (Summarization, Moderate, &["gemini", "cursor"]),
    (Summarization, Complex, &["gemini", "copilot"]),
    (Math, Simple, &["codex", "gemini", "copilot"]),
    (Math, Moderate, &["codex", "gemini", "copilot"]),
    (Math, Complex, &["codex", "copilot", "gemini"]),
    (OpenQa, Simple, &["gemini", "codex", "cursor"]),
    (OpenQa, Moderate, &["gemini", "cursor", "codex"]),
    (OpenQa, Complex, &["gemini", "copilot", "cursor"]),
];
