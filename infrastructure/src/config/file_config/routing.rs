//! Routing configuration from TOML (`[routing]` section)

use router_application::RoutingDefaults;
use router_domain::AgentId;
use serde::{Deserialize, Serialize};

/// Raw routing configuration from TOML
///
/// # Example
///
/// ```toml
/// [routing]
/// prefer_speed = false
/// prefer_cost = true
/// exclude = ["copilot"]
/// only_available = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRoutingConfig {
    pub prefer_speed: bool,
    pub prefer_cost: bool,
    /// Agent ids never selected unless forced
    pub exclude: Vec<String>,
    /// Skip agents whose CLI is not on PATH
    pub only_available: bool,
}

impl Default for FileRoutingConfig {
    fn default() -> Self {
        Self {
            prefer_speed: false,
            prefer_cost: false,
            exclude: Vec::new(),
            only_available: true,
        }
    }
}

impl FileRoutingConfig {
    pub fn to_routing_defaults(&self) -> RoutingDefaults {
        RoutingDefaults {
            prefer_speed: self.prefer_speed,
            prefer_cost: self.prefer_cost,
            exclude: self.exclude.iter().map(AgentId::new).collect(),
            only_available: self.only_available,
        }
    }
}
