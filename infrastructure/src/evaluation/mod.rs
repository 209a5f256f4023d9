//! Local evaluation collaborators
//!
//! Keyword heuristics standing in for a model-backed reviewer:
//! [`HeuristicEvaluator`] fills in the quality checklist and
//! [`TemplateClarifier`] turns the resulting gaps into a follow-up prompt.

mod heuristic_evaluator;
mod template_clarifier;

pub use heuristic_evaluator::HeuristicEvaluator;
pub use template_clarifier::TemplateClarifier;
