//! Per-agent overrides from TOML (`[agents.<id>]` tables)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw per-agent configuration
///
/// # Example
///
/// ```toml
/// [agents.copilot]
/// disabled = true
///
/// [agents.gemini]
/// flags = { output-format = "json" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    /// Remove the agent from every route (it can still be forced)
    pub disabled: bool,
    /// Merged over the agent's default flags
    pub flags: BTreeMap<String, String>,
}
