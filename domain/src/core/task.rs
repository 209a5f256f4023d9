//! Task description value object

use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// A free-text task submitted for routing (Value Object)
///
/// Carries the raw request plus an optional context string (for example the
/// file being edited). The text is guaranteed to be non-blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDescription {
    text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    context: Option<String>,
}

impl TaskDescription {
    /// Create a new task description, rejecting blank text
    pub fn new(text: impl Into<String>) -> Result<Self, DomainError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(DomainError::EmptyTask);
        }
        Ok(Self {
            text,
            context: None,
        })
    }

    /// Attach a context string. Blank context is dropped.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        let context = context.into();
        self.context = if context.trim().is_empty() {
            None
        } else {
            Some(context)
        };
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Text the classifier scores: the task followed by its context, if any
    pub fn searchable_text(&self) -> String {
        match &self.context {
            Some(context) => format!("{}\n{}", self.text, context),
            None => self.text.clone(),
        }
    }
}

impl std::fmt::Display for TaskDescription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl std::str::FromStr for TaskDescription {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
