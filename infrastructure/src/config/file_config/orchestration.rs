//! Orchestration configuration from TOML (`[orchestration]` section)

use router_application::OrchestrationParams;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw orchestration configuration from TOML
///
/// # Example
///
/// ```toml
/// [orchestration]
/// max_cycles = 3               # clamped to 1..=3
/// retry_backoff_ms = 500
/// invocation_timeout_secs = 300
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOrchestrationConfig {
    pub max_cycles: u32,
    pub retry_backoff_ms: u64,
    pub invocation_timeout_secs: u64,
}

impl Default for FileOrchestrationConfig {
    fn default() -> Self {
        Self {
            max_cycles: 3,
            retry_backoff_ms: 500,
            invocation_timeout_secs: 300,
        }
    }
}

impl FileOrchestrationConfig {
    pub fn to_params(&self) -> OrchestrationParams {
        OrchestrationParams::default()
            .with_max_cycles(self.max_cycles)
            .with_retry_backoff(Duration::from_millis(self.retry_backoff_ms))
            .with_invocation_timeout(Duration::from_secs(self.invocation_timeout_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_params_clamps_cycles() {
        let config = FileOrchestrationConfig {
            max_cycles: 7,
            retry_backoff_ms: 250,
            invocation_timeout_secs: 60,
        };
        let params = config.to_params();
        assert_eq!(params.max_cycles, 3);
        assert_eq!(params.retry_backoff, Duration::from_millis(250));
        assert_eq!(params.invocation_timeout, Duration::from_secs(60));
    }
}
