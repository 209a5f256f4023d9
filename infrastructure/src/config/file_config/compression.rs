//! Compression configuration from TOML (`[compression]` section)

use router_application::CompressionDefaults;
use router_domain::CompressionLevel;
use serde::{Deserialize, Serialize};

/// Raw compression configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCompressionConfig {
    /// "minimal", "moderate" or "aggressive"
    pub level: CompressionLevel,
    pub max_tokens: usize,
}

impl Default for FileCompressionConfig {
    fn default() -> Self {
        let defaults = CompressionDefaults::default();
        Self {
            level: defaults.level,
            max_tokens: defaults.max_tokens,
        }
    }
}

impl FileCompressionConfig {
    pub fn to_compression_defaults(&self) -> CompressionDefaults {
        CompressionDefaults {
            level: self.level,
            max_tokens: self.max_tokens,
        }
    }
}
