//! Core domain concepts shared across all subdomains.
//!
//! - [`task::TaskDescription`]: a validated task to classify and route
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod task;
