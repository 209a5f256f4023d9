//! Routing and compression defaults applied when the caller does not say
//! otherwise.

use router_domain::{AgentId, CompressionLevel, RoutingPreferences};
use serde::{Deserialize, Serialize};

/// Default routing preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingDefaults {
    pub prefer_speed: bool,
    pub prefer_cost: bool,
    pub exclude: Vec<AgentId>,
    /// Skip agents whose CLI is not installed
    pub only_available: bool,
}

impl Default for RoutingDefaults {
    fn default() -> Self {
        Self {
            prefer_speed: false,
            prefer_cost: false,
            exclude: Vec::new(),
            only_available: true,
        }
    }
}

impl RoutingDefaults {
    /// Preferences seeded from these defaults
    pub fn preferences(&self) -> RoutingPreferences {
        RoutingPreferences::new()
            .with_prefer_speed(self.prefer_speed)
            .with_prefer_cost(self.prefer_cost)
            .with_exclusions(self.exclude.iter().cloned())
    }
}

/// Default output compression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressionDefaults {
    pub level: CompressionLevel,
    pub max_tokens: usize,
}

impl Default for CompressionDefaults {
    fn default() -> Self {
        Self {
            level: CompressionLevel::Moderate,
            max_tokens: 2000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preferences_from_defaults() {
        let defaults = RoutingDefaults {
            prefer_speed: true,
            exclude: vec![AgentId::from("copilot")],
            ..RoutingDefaults::default()
        };
        let prefs = defaults.preferences();
        assert!(prefs.prefer_speed);
        assert!(!prefs.prefer_cost);
        assert!(prefs.is_excluded(&AgentId::from("copilot")));
        assert!(prefs.forced_agent.is_none());
    }

    #[test]
    fn test_compression_defaults() {
        let defaults = CompressionDefaults::default();
        assert_eq!(defaults.level, CompressionLevel::Moderate);
        assert_eq!(defaults.max_tokens, 2000);
    }
}
