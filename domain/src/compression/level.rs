//! Compression level value object

use serde::{Deserialize, Serialize};

/// How aggressively output is shortened
///
/// Each level starts from the previous level's output, so a more aggressive
/// level never returns more text than a gentler one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CompressionLevel {
    /// Whitespace and formatting cleanup only
    Minimal,
    /// Drop narrative prose; keep code, errors, paths and outcomes
    #[default]
    Moderate,
    /// Keep only code, errors, paths and one-line outcomes
    Aggressive,
}

impl CompressionLevel {
    pub const ALL: [CompressionLevel; 3] = [
        CompressionLevel::Minimal,
        CompressionLevel::Moderate,
        CompressionLevel::Aggressive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CompressionLevel::Minimal => "minimal",
            CompressionLevel::Moderate => "moderate",
            CompressionLevel::Aggressive => "aggressive",
        }
    }
}

impl std::fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CompressionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "minimal" => Ok(CompressionLevel::Minimal),
            "moderate" => Ok(CompressionLevel::Moderate),
            "aggressive" => Ok(CompressionLevel::Aggressive),
            _ => Err(format!(
                "Unknown compression level: {}. Valid: minimal, moderate, aggressive",
                s
            )),
        }
    }
}
