//! Agent output compression

pub mod compressor;
pub mod level;

pub use compressor::{CHARS_PER_TOKEN, CompressionResult, TRUNCATION_MARKER, compress};
pub use level::CompressionLevel;
