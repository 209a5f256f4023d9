//! Keyword-based response evaluator.

use async_trait::async_trait;
use router_application::{CollaboratorError, Evaluator};
use router_domain::{Checklist, EvaluationVerdict};

/// Responses shorter than this are treated as incomplete
const MIN_RESPONSE_CHARS: usize = 40;

/// Longest single line a response may have before it reads as a wall of text
const MAX_LINE_CHARS: usize = 600;

const PLACEHOLDERS: &[&str] = &["todo", "not implemented", "unimplemented!", "fill in", "..."];

const FAILURE_MARKERS: &[&str] = &[
    "traceback (most recent call last)",
    "panicked at",
    "syntaxerror",
    "i cannot",
    "i'm unable",
    "failed to",
];

/// Request words that make edge-case handling part of the job
const CODE_REQUEST_WORDS: &[&str] = &[
    "function",
    "implement",
    "fix",
    "bug",
    "parse",
    "handle",
    "endpoint",
    "refactor",
];

const EDGE_CASE_MARKERS: &[&str] = &[
    "edge case",
    "error",
    "invalid",
    "empty",
    "null",
    "none",
    "overflow",
    "handle",
    "fallback",
];

const TEST_MARKERS: &[&str] = &["test", "assert", "#[cfg(test)]", "pytest", "expect("];

/// Judges a response by scanning it for quality signals.
///
/// Only asks for edge cases on code requests and for tests when the request
/// mentions them. A blank response escalates instead of looping.
#[derive(Debug, Default)]
pub struct HeuristicEvaluator;

impl HeuristicEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Fill in the checklist for a response
    pub fn checklist(&self, response: &str, original_request: &str) -> Checklist {
        let lower = response.to_lowercase();
        let request = original_request.to_lowercase();

        let completeness = response.trim().chars().count() >= MIN_RESPONSE_CHARS
            && !PLACEHOLDERS.iter().any(|p| lower.contains(p));
        let correctness = !FAILURE_MARKERS.iter().any(|m| lower.contains(m));
        let clarity = response
            .lines()
            .all(|line| line.chars().count() <= MAX_LINE_CHARS);

        let is_code_request = CODE_REQUEST_WORDS.iter().any(|w| request.contains(w));
        let edge_cases = !is_code_request || EDGE_CASE_MARKERS.iter().any(|m| lower.contains(m));

        let wants_tests = request.contains("test");
        let testing = !wants_tests || TEST_MARKERS.iter().any(|m| lower.contains(m));

        Checklist {
            completeness,
            correctness,
            clarity,
            edge_cases,
            testing,
        }
    }
}

#[async_trait]
impl Evaluator for HeuristicEvaluator {
    async fn evaluate(
        &self,
        response: &str,
        original_request: &str,
    ) -> Result<EvaluationVerdict, CollaboratorError> {
        let checklist = self.checklist(response, original_request);
        if response.trim().is_empty() {
            return Ok(EvaluationVerdict::escalate(
                checklist,
                "agent returned an empty response",
            ));
        }
        Ok(EvaluationVerdict::from_checklist(checklist))
    }
}
