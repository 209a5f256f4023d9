//! Task type and complexity value objects

use serde::{Deserialize, Serialize};

/// Kind of work a task asks for (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    CodeDebugging,
    CodeReview,
    CodeExplanation,
    CodeGeneration,
    Rewrite,
    Summarization,
    Math,
    OpenQa,
}

impl TaskType {
    /// Every task type, in declaration order
    pub const ALL: [TaskType; 8] = [
        TaskType::CodeDebugging,
        TaskType::CodeReview,
        TaskType::CodeExplanation,
        TaskType::CodeGeneration,
        TaskType::Rewrite,
        TaskType::Summarization,
        TaskType::Math,
        TaskType::OpenQa,
    ];

    /// Tie-break order used when two task types score the same.
    ///
    /// Earlier entries win. Review and debugging intents are the most
    /// specific, open questions the least.
    pub const PRIORITY: [TaskType; 8] = [
        TaskType::CodeReview,
        TaskType::CodeDebugging,
        TaskType::CodeExplanation,
        TaskType::Rewrite,
        TaskType::CodeGeneration,
        TaskType::Summarization,
        TaskType::Math,
        TaskType::OpenQa,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::CodeDebugging => "code_debugging",
            TaskType::CodeReview => "code_review",
            TaskType::CodeExplanation => "code_explanation",
            TaskType::CodeGeneration => "code_generation",
            TaskType::Rewrite => "rewrite",
            TaskType::Summarization => "summarization",
            TaskType::Math => "math",
            TaskType::OpenQa => "open_qa",
        }
    }

    /// Position in [`TaskType::PRIORITY`] (lower wins ties)
    pub fn priority(&self) -> usize {
        Self::PRIORITY
            .iter()
            .position(|t| t == self)
            .unwrap_or(Self::PRIORITY.len())
    }

    /// Whether the task is about source code rather than prose or facts
    pub fn is_code_task(&self) -> bool {
        matches!(
            self,
            TaskType::CodeDebugging
                | TaskType::CodeReview
                | TaskType::CodeExplanation
                | TaskType::CodeGeneration
                | TaskType::Rewrite
        )
    }
}

impl std::fmt::Display for TaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TaskType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskType::ALL
            .into_iter()
            .find(|t| t.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| {
                format!(
                    "Unknown task type: {}. Valid: {}",
                    s,
                    TaskType::ALL.map(|t| t.as_str()).join(", ")
                )
            })
    }
}

/// Complexity bucket derived from the complexity score
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    #[default]
    Simple,
    Moderate,
    Complex,
}

impl Complexity {
    pub const ALL: [Complexity; 3] = [Complexity::Simple, Complexity::Moderate, Complexity::Complex];

    /// Scores below this are simple
    pub const MODERATE_THRESHOLD: f64 = 0.35;
    /// Scores at or above this are complex
    pub const COMPLEX_THRESHOLD: f64 = 0.65;

    /// Bucket a normalized complexity score
    pub fn from_score(score: f64) -> Self {
        if score < Self::MODERATE_THRESHOLD {
            Complexity::Simple
        } else if score < Self::COMPLEX_THRESHOLD {
            Complexity::Moderate
        } else {
            Complexity::Complex
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Complexity::Simple => "simple",
            Complexity::Moderate => "moderate",
            Complexity::Complex => "complex",
        }
    }
}

impl std::fmt::Display for Complexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Complexity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "simple" => Ok(Complexity::Simple),
            "moderate" => Ok(Complexity::Moderate),
            "complex" => Ok(Complexity::Complex),
            _ => Err(format!(
                "Unknown complexity: {}. Valid: simple, moderate, complex",
                s
            )),
        }
    }
}
