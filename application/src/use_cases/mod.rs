//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod orchestrate;
pub mod route_task;
