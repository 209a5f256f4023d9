//! Task classification
//!
//! Turns free text into a [`TaskProfile`]: a task type from a closed set, a
//! complexity bucket and the evidence behind both.

pub mod classifier;
pub mod complexity;
pub mod profile;
pub mod rule;
pub mod task_type;

pub use classifier::{CLASSIFIER_VARIANT, Classifier};
pub use complexity::ComplexityEstimate;
pub use profile::TaskProfile;
pub use rule::{ClassificationRule, Pattern, RULES};
pub use task_type::{Complexity, TaskType};
