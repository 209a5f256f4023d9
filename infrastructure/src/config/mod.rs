//! Configuration file loading for agent-router
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `AGENT_ROUTER_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./agent-router.toml` or `./.agent-router.toml`
//! 4. Global: `$XDG_CONFIG_HOME/agent-router/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigIssue, ConfigValidationError, FileAgentConfig, FileCompressionConfig, FileConfig,
    FileOrchestrationConfig, FileRoutingConfig, Severity,
};
pub use loader::{ConfigLoader, ENV_PREFIX};
