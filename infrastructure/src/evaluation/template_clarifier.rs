//! Follow-up prompts built from a fixed template.

use async_trait::async_trait;
use router_application::{Clarifier, CollaboratorError};

/// Builds the next cycle's prompt by listing the gaps under the original
/// request.
#[derive(Debug, Default)]
pub struct TemplateClarifier;

impl TemplateClarifier {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, gaps: &[String], original_request: &str) -> String {
        let mut lines = vec![
            "Your previous answer to the request below needs another pass.".to_string(),
            String::new(),
            "Request:".to_string(),
            original_request.trim().to_string(),
            String::new(),
            "Address these gaps:".to_string(),
        ];
        lines.extend(gaps.iter().map(|gap| format!("- {}", gap)));
        lines.push(String::new());
        lines.push("Reply with the complete revised answer.".to_string());
        lines.join("\n")
    }
}

#[async_trait]
impl Clarifier for TemplateClarifier {
    async fn followup(
        &self,
        gaps: &[String],
        original_request: &str,
    ) -> Result<String, CollaboratorError> {
        if gaps.is_empty() {
            return Err(CollaboratorError::Failed(
                "no gaps to ask a follow-up about".to_string(),
            ));
        }
        Ok(self.render(gaps, original_request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_followup_lists_every_gap() {
        let prompt = TemplateClarifier::new()
            .followup(
                &["missing error handling".to_string(), "missing tests".to_string()],
                "Fix the authentication bug in login.py",
            )
            .await
            .unwrap();

        assert!(prompt.contains("Fix the authentication bug in login.py"));
        assert!(prompt.contains("- missing error handling\n- missing tests"));
    }

    #[tokio::test]
    async fn test_followup_without_gaps_is_an_error() {
        let result = TemplateClarifier::new().followup(&[], "anything").await;
        assert!(result.is_err());
    }
}
