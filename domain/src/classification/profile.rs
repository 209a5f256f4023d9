//! Task profile produced by the classifier

use super::task_type::{Complexity, TaskType};
use serde::{Deserialize, Serialize};

/// The classifier's structured judgment about a task
///
/// Created once per classification call and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskProfile {
    pub task_type: TaskType,
    pub complexity: Complexity,
    pub complexity_score: f64,
    /// Confidence in `task_type`, in [0, 1]
    pub confidence: f64,
    /// Named evidence, task-type signals first, then complexity signals
    pub signals: Vec<String>,
    /// True when no rule scored high enough and `open_qa` was assumed
    #[serde(default)]
    pub fallback: bool,
}

impl TaskProfile {
    /// Build a profile directly (used by tests and callers that already
    /// know the task type)
    pub fn new(task_type: TaskType, complexity: Complexity) -> Self {
        let complexity_score = match complexity {
            Complexity::Simple => 0.3,
            Complexity::Moderate => 0.5,
            Complexity::Complex => 0.8,
        };
        Self {
            task_type,
            complexity,
            complexity_score,
            confidence: 1.0,
            signals: Vec::new(),
            fallback: false,
        }
    }

    pub fn with_signals(mut self, signals: Vec<String>) -> Self {
        self.signals = signals;
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }
}
