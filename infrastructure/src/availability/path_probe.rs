//! `PATH` lookup for agent commands, cached per command.

use router_application::AgentAvailability;
use router_domain::AgentProfile;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

/// Reports an agent as available when its command resolves on `PATH`.
///
/// Lookups are cached for the lifetime of the probe; a fresh probe picks up
/// newly installed tools.
pub struct PathAgentAvailability {
    cache: Mutex<HashMap<String, bool>>,
}

impl PathAgentAvailability {
    pub fn new() -> Self {
        Self {
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Check if a CLI command is available
    pub fn is_command_available(&self, command: &str) -> bool {
        if let Ok(cache) = self.cache.lock()
            && let Some(found) = cache.get(command)
        {
            return *found;
        }

        let found = which::which(command).is_ok();
        debug!("Probed {} on PATH: {}", command, found);
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(command.to_string(), found);
        }
        found
    }
}

impl Default for PathAgentAvailability {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentAvailability for PathAgentAvailability {
    fn is_available(&self, agent: &AgentProfile) -> bool {
        self.is_command_available(&agent.command)
    }
}
