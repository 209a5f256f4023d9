//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod agents;
mod compression;
mod orchestration;
mod routing;
mod validation;

pub use agents::FileAgentConfig;
pub use compression::FileCompressionConfig;
pub use orchestration::FileOrchestrationConfig;
pub use routing::FileRoutingConfig;
pub use validation::{ConfigIssue, ConfigValidationError, Severity};

use router_application::{CompressionDefaults, OrchestrationParams, RoutingDefaults};
use router_domain::{AgentId, CapabilityMatrix, DomainError, MAX_CYCLES};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Routing preferences applied to every request
    pub routing: FileRoutingConfig,
    /// Execute → Evaluate loop settings
    pub orchestration: FileOrchestrationConfig,
    /// Output compression defaults
    pub compression: FileCompressionConfig,
    /// Per-agent overrides keyed by agent id
    pub agents: BTreeMap<String, FileAgentConfig>,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Agent ids are checked against the built-in capability matrix.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.orchestration.invocation_timeout_secs == 0 {
            issues.push(ConfigIssue::error(ConfigValidationError::InvalidTimeout));
        }
        if self.compression.max_tokens == 0 {
            issues.push(ConfigIssue::error(ConfigValidationError::InvalidTokenBudget));
        }
        if !(1..=MAX_CYCLES).contains(&self.orchestration.max_cycles) {
            issues.push(ConfigIssue::warning(
                ConfigValidationError::CycleCapOutOfRange(self.orchestration.max_cycles),
            ));
        }

        let matrix = CapabilityMatrix::builtin();
        let unknown = |field: &str, agent: &str| {
            ConfigIssue::warning(ConfigValidationError::UnknownAgent {
                field: field.to_string(),
                agent: agent.to_string(),
            })
        };
        for agent in &self.routing.exclude {
            if !matrix.contains(&AgentId::new(agent.as_str())) {
                issues.push(unknown("routing.exclude", agent));
            }
        }
        for agent in self.agents.keys() {
            if !matrix.contains(&AgentId::new(agent.as_str())) {
                issues.push(unknown("agents", agent));
            }
        }

        issues
    }

    /// Routing defaults, with disabled agents folded into the exclusions
    pub fn routing_defaults(&self) -> RoutingDefaults {
        let mut defaults = self.routing.to_routing_defaults();
        for (id, agent) in &self.agents {
            let id = AgentId::new(id.as_str());
            if agent.disabled && !defaults.exclude.contains(&id) {
                defaults.exclude.push(id);
            }
        }
        defaults
    }

    pub fn orchestration_params(&self) -> OrchestrationParams {
        self.orchestration.to_params()
    }

    pub fn compression_defaults(&self) -> CompressionDefaults {
        self.compression.to_compression_defaults()
    }

    /// The built-in matrix with per-agent overrides applied.
    ///
    /// Unknown agent ids are skipped (validation already reports them).
    pub fn capability_matrix(&self) -> Result<CapabilityMatrix, DomainError> {
        let mut matrix = CapabilityMatrix::builtin();
        for (id, agent) in &self.agents {
            let id = AgentId::new(id.as_str());
            if !matrix.contains(&id) {
                warn!("Ignoring overrides for unknown agent {}", id);
                continue;
            }
            if agent.disabled {
                matrix = matrix.without_routes_to(&id);
            }
            if !agent.flags.is_empty() {
                matrix = matrix.with_agent_flags(&id, agent.flags.clone())?;
            }
        }
        Ok(matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use router_domain::{CompressionLevel, Complexity, TaskType};
    use std::time::Duration;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[routing]
prefer_speed = true
exclude = ["copilot"]
only_available = false

[orchestration]
max_cycles = 2
retry_backoff_ms = 100
invocation_timeout_secs = 30

[compression]
level = "aggressive"
max_tokens = 500

[agents.gemini]
flags = { output-format = "json" }

[agents.codex]
disabled = true
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(config.routing.prefer_speed);
        assert!(!config.routing.only_available);
        assert_eq!(config.orchestration.max_cycles, 2);
        assert_eq!(config.compression.level, CompressionLevel::Aggressive);
        assert_eq!(config.compression.max_tokens, 500);
        assert!(config.agents["codex"].disabled);
        assert!(config.validate().is_empty());

        let params = config.orchestration_params();
        assert_eq!(params.max_cycles, 2);
        assert_eq!(params.invocation_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config, FileConfig::default());
        assert!(config.routing.only_available);
        assert_eq!(config.orchestration.max_cycles, 3);
        assert_eq!(config.compression.level, CompressionLevel::Moderate);
        assert_eq!(config.compression.max_tokens, 2000);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_reports_every_issue() {
        let mut config = FileConfig::default();
        config.orchestration.invocation_timeout_secs = 0;
        config.orchestration.max_cycles = 5;
        config.compression.max_tokens = 0;
        config.routing.exclude = vec!["emacs".to_string()];
        config
            .agents
            .insert("vim".to_string(), FileAgentConfig::default());

        let issues = config.validate();
        assert_eq!(issues.len(), 5);
        assert_eq!(issues.iter().filter(|i| i.is_error()).count(), 2);
        assert!(issues.contains(&ConfigIssue::error(ConfigValidationError::InvalidTimeout)));
        assert!(issues.contains(&ConfigIssue::warning(
            ConfigValidationError::UnknownAgent {
                field: "routing.exclude".to_string(),
                agent: "emacs".to_string(),
            }
        )));
    }

    #[test]
    fn test_disabled_agent_leaves_routes_but_stays_forceable() {
        let mut config = FileConfig::default();
        config.agents.insert(
            "cursor".to_string(),
            FileAgentConfig {
                disabled: true,
                ..FileAgentConfig::default()
            },
        );

        let matrix = config.capability_matrix().unwrap();
        let cursor = AgentId::from("cursor");
        assert!(matrix.contains(&cursor));
        assert!(
            !matrix
                .candidates(TaskType::CodeDebugging, Complexity::Simple)
                .contains(&cursor)
        );
        assert!(config.routing_defaults().exclude.contains(&cursor));
    }

    #[test]
    fn test_agent_flags_merge_over_defaults() {
        let mut config = FileConfig::default();
        config.agents.insert(
            "gemini".to_string(),
            FileAgentConfig {
                flags: BTreeMap::from([("output-format".to_string(), "json".to_string())]),
                ..FileAgentConfig::default()
            },
        );
        config
            .agents
            .insert("unknown".to_string(), FileAgentConfig::default());

        let matrix = config.capability_matrix().unwrap();
        let gemini = matrix.agent(&AgentId::from("gemini")).unwrap();
        assert_eq!(
            gemini.default_flags.get("output-format").map(String::as_str),
            Some("json")
        );
    }
}
