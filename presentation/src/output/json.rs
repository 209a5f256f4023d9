//! JSON output

use crate::output::formatter::OutputFormatter;
use router_application::{AgentStatus, HealthStatus};
use router_domain::{CompressionResult, RoutingDecision, TaskProfile};
use serde::Serialize;

/// Serializes results as pretty or single-line JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter {
    compact: bool,
}

impl JsonFormatter {
    pub fn new(compact: bool) -> Self {
        Self { compact }
    }

    pub fn render<T: Serialize + ?Sized>(&self, value: &T) -> String {
        let rendered = if self.compact {
            serde_json::to_string(value)
        } else {
            serde_json::to_string_pretty(value)
        };
        rendered.unwrap_or_else(|_| "{}".to_string())
    }
}

impl OutputFormatter for JsonFormatter {
    fn decision(&self, decision: &RoutingDecision) -> String {
        self.render(decision)
    }

    fn profile(&self, profile: &TaskProfile) -> String {
        self.render(profile)
    }

    fn compression(&self, result: &CompressionResult) -> String {
        self.render(result)
    }

    fn health(&self, health: &HealthStatus) -> String {
        self.render(health)
    }

    fn agents(&self, agents: &[AgentStatus]) -> String {
        self.render(agents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use router_domain::{Complexity, CompressionLevel, TaskType, compress};

    #[test]
    fn test_compact_is_single_line() {
        let profile = TaskProfile::new(TaskType::OpenQa, Complexity::Simple);
        let compact = JsonFormatter::new(true).profile(&profile);
        let pretty = JsonFormatter::new(false).profile(&profile);

        assert!(!compact.contains('\n'));
        assert!(pretty.contains('\n'));
        let parsed: serde_json::Value = serde_json::from_str(&compact).unwrap();
        assert_eq!(parsed["task_type"], "open_qa");
        assert_eq!(parsed["complexity"], "simple");
    }

    #[test]
    fn test_compression_result_fields() {
        let result = compress("Error: config.json not found", CompressionLevel::Minimal, 100);
        let json = JsonFormatter::new(true).compression(&result);
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["level"], "minimal");
        assert_eq!(parsed["truncated"], false);
    }

    #[test]
    fn test_health_json() {
        let health = HealthStatus {
            classifier_variant: "rule_based_v3",
            status: "healthy",
            agents: 4,
        };
        let parsed: serde_json::Value =
            serde_json::from_str(&JsonFormatter::new(false).health(&health)).unwrap();
        assert_eq!(parsed["classifier_variant"], "rule_based_v3");
        assert_eq!(parsed["status"], "healthy");
    }
}
