//! Logging infrastructure for structured attempt records.
//!
//! Provides [`JsonlAttemptLogger`], a JSONL file writer that implements
//! the [`AttemptLogger`](router_application::AttemptLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlAttemptLogger;
