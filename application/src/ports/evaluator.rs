//! Evaluator and Clarifier ports
//!
//! The orchestrator judges each response through an [`Evaluator`] and, when
//! the verdict lists gaps, asks a [`Clarifier`] for the follow-up prompt of
//! the next cycle.

use async_trait::async_trait;
use router_domain::EvaluationVerdict;
use thiserror::Error;

/// Errors from the evaluator or clarifier collaborators.
///
/// Either one failing ends the session as `Failed`, not `Escalated`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollaboratorError {
    #[error("Collaborator unavailable: {0}")]
    Unavailable(String),

    #[error("Collaborator failed: {0}")]
    Failed(String),
}

/// Judges an agent response against the original request
#[async_trait]
pub trait Evaluator: Send + Sync {
    async fn evaluate(
        &self,
        response: &str,
        original_request: &str,
    ) -> Result<EvaluationVerdict, CollaboratorError>;
}

/// Writes the follow-up prompt for the next cycle
#[async_trait]
pub trait Clarifier: Send + Sync {
    async fn followup(
        &self,
        gaps: &[String],
        original_request: &str,
    ) -> Result<String, CollaboratorError>;
}
