//! Agent profiles
//!
//! An agent is an external coding assistant the router can hand a task to.
//! Its profile describes what it is good at and how to invoke it; profiles
//! are part of the immutable [`CapabilityMatrix`](super::CapabilityMatrix).

use crate::classification::{Complexity, TaskType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Agent identifier (e.g. "cursor", "gemini")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(String);

impl AgentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into().trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AgentId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AgentId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// How quickly an agent usually answers (lower is faster)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum SpeedTier {
    Fast,
    #[default]
    Medium,
    Slow,
}

impl SpeedTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpeedTier::Fast => "fast",
            SpeedTier::Medium => "medium",
            SpeedTier::Slow => "slow",
        }
    }
}

impl std::fmt::Display for SpeedTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Relative cost of running an agent (lower is cheaper)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum CostTier {
    Low,
    #[default]
    Medium,
    High,
}

impl CostTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            CostTier::Low => "low",
            CostTier::Medium => "medium",
            CostTier::High => "high",
        }
    }
}

impl std::fmt::Display for CostTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Capabilities and invocation metadata of a single agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentProfile {
    pub id: AgentId,
    pub description: String,
    /// Executable probed for availability
    pub command: String,
    /// Per-task-type affinity in [0, 1]
    #[serde(default)]
    pub affinity: BTreeMap<TaskType, f64>,
    #[serde(default)]
    pub speed: SpeedTier,
    #[serde(default)]
    pub cost: CostTier,
    /// Flags recommended on every invocation
    #[serde(default)]
    pub default_flags: BTreeMap<String, String>,
    /// Named modes and the command-line flag each one maps to (`None` when
    /// the mode is the tool's default behavior)
    #[serde(default)]
    pub modes: BTreeMap<String, Option<String>>,
    /// Model to request per complexity bucket
    #[serde(default)]
    pub models: BTreeMap<Complexity, String>,
    /// Mode used for a given task type
    #[serde(default)]
    pub task_modes: BTreeMap<TaskType, String>,
    /// Mode used for a given complexity when no task mode applies
    #[serde(default)]
    pub complexity_modes: BTreeMap<Complexity, String>,
    /// Mode used when nothing more specific applies
    #[serde(default)]
    pub default_mode: Option<String>,
}

impl AgentProfile {
    pub fn new(
        id: impl Into<AgentId>,
        command: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            command: command.into(),
            affinity: BTreeMap::new(),
            speed: SpeedTier::default(),
            cost: CostTier::default(),
            default_flags: BTreeMap::new(),
            modes: BTreeMap::new(),
            models: BTreeMap::new(),
            task_modes: BTreeMap::new(),
            complexity_modes: BTreeMap::new(),
            default_mode: None,
        }
    }

    pub fn with_speed(mut self, speed: SpeedTier) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_cost(mut self, cost: CostTier) -> Self {
        self.cost = cost;
        self
    }

    pub fn with_affinity(mut self, task_type: TaskType, affinity: f64) -> Self {
        self.affinity.insert(task_type, affinity.clamp(0.0, 1.0));
        self
    }

    pub fn with_mode(mut self, name: impl Into<String>, flag: Option<&str>) -> Self {
        self.modes.insert(name.into(), flag.map(str::to_string));
        self
    }

    /// Use the same model for every complexity
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        let model = model.into();
        for complexity in Complexity::ALL {
            self.models.insert(complexity, model.clone());
        }
        self
    }

    pub fn with_model_for(mut self, complexity: Complexity, model: impl Into<String>) -> Self {
        self.models.insert(complexity, model.into());
        self
    }

    pub fn with_task_mode(mut self, task_type: TaskType, mode: impl Into<String>) -> Self {
        self.task_modes.insert(task_type, mode.into());
        self
    }

    pub fn with_complexity_mode(mut self, complexity: Complexity, mode: impl Into<String>) -> Self {
        self.complexity_modes.insert(complexity, mode.into());
        self
    }

    pub fn with_default_mode(mut self, mode: impl Into<String>) -> Self {
        self.default_mode = Some(mode.into());
        self
    }

    pub fn with_default_flag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_flags.insert(key.into(), value.into());
        self
    }

    /// Affinity for a task type (0 when unspecified)
    pub fn affinity_for(&self, task_type: TaskType) -> f64 {
        self.affinity.get(&task_type).copied().unwrap_or(0.0)
    }

    pub fn model_for(&self, complexity: Complexity) -> Option<&str> {
        self.models.get(&complexity).map(String::as_str)
    }

    pub fn supports_mode(&self, mode: &str) -> bool {
        self.modes.contains_key(mode)
    }

    /// Command-line flag for a mode, if the mode has one
    pub fn mode_flag(&self, mode: &str) -> Option<&str> {
        self.modes.get(mode).and_then(|flag| flag.as_deref())
    }

    /// Mode derived from the task: task-type rule, then complexity rule,
    /// then the agent's default
    pub fn mode_for(&self, task_type: TaskType, complexity: Complexity) -> Option<&str> {
        self.task_modes
            .get(&task_type)
            .or_else(|| self.complexity_modes.get(&complexity))
            .or(self.default_mode.as_ref())
            .map(String::as_str)
    }

    /// Every mode name this profile refers to, for validation
    pub(crate) fn referenced_modes(&self) -> impl Iterator<Item = &str> {
        self.task_modes
            .values()
            .chain(self.complexity_modes.values())
            .chain(self.default_mode.iter())
            .map(String::as_str)
    }
}
