//! Agent routing
//!
//! The [`CapabilityMatrix`] ranks agents per task type and complexity; the
//! [`Selector`] applies caller preferences to it and explains its pick in a
//! [`RoutingDecision`].

pub mod agent;
pub mod decision;
pub mod matrix;
pub mod preferences;
pub mod selector;
pub mod specialized;

pub use agent::{AgentId, AgentProfile, CostTier, SpeedTier};
pub use decision::{Alternative, PickRule, RoutingDecision};
pub use matrix::CapabilityMatrix;
pub use preferences::RoutingPreferences;
pub use selector::{MAX_ALTERNATIVES, Selector};
pub use specialized::{SPECIALIZED_TASKS, SpecializedMatch, SpecializedTask, detect_specialized};
