//! Evaluation verdicts produced after each execution cycle

use serde::{Deserialize, Serialize};

/// What the evaluator recommends doing with a response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictDecision {
    Accept,
    Loop,
    Escalate,
}

impl VerdictDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerdictDecision::Accept => "accept",
            VerdictDecision::Loop => "loop",
            VerdictDecision::Escalate => "escalate",
        }
    }
}

impl std::fmt::Display for VerdictDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Quality checklist an evaluator fills in for a response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checklist {
    pub completeness: bool,
    pub correctness: bool,
    pub clarity: bool,
    pub edge_cases: bool,
    pub testing: bool,
}

impl Checklist {
    /// Every item satisfied
    pub fn passing() -> Self {
        Self {
            completeness: true,
            correctness: true,
            clarity: true,
            edge_cases: true,
            testing: true,
        }
    }

    /// Gap names for the failed items, in checklist order
    pub fn gaps(&self) -> Vec<String> {
        [
            (self.completeness, "incomplete response"),
            (self.correctness, "correctness concerns"),
            (self.clarity, "unclear explanation"),
            (self.edge_cases, "missing edge case handling"),
            (self.testing, "missing tests"),
        ]
        .into_iter()
        .filter(|(ok, _)| !ok)
        .map(|(_, gap)| gap.to_string())
        .collect()
    }
}

impl Default for Checklist {
    fn default() -> Self {
        Self::passing()
    }
}

/// Evaluator judgment of one response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationVerdict {
    pub checklist: Checklist,
    /// Named deficiencies the next cycle should address
    pub gaps: Vec<String>,
    pub decision: VerdictDecision,
    /// Why the evaluator escalated (only set for `Escalate`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

impl EvaluationVerdict {
    /// Derive gaps from the failed checklist items and the decision from gaps
    pub fn from_checklist(checklist: Checklist) -> Self {
        Self::with_gaps(checklist, checklist.gaps())
    }

    /// Verdict with explicit gaps; any gap means another cycle is wanted
    pub fn with_gaps(checklist: Checklist, gaps: Vec<String>) -> Self {
        let gaps: Vec<String> = gaps
            .into_iter()
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty())
            .collect();
        let decision = if gaps.is_empty() {
            VerdictDecision::Accept
        } else {
            VerdictDecision::Loop
        };
        Self {
            checklist,
            gaps,
            decision,
            cause: None,
        }
    }

    pub fn accept() -> Self {
        Self::from_checklist(Checklist::passing())
    }

    /// Output judged unusable; the session escalates instead of looping
    pub fn escalate(checklist: Checklist, cause: impl Into<String>) -> Self {
        Self {
            gaps: checklist.gaps(),
            checklist,
            decision: VerdictDecision::Escalate,
            cause: Some(cause.into()),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.gaps.is_empty()
    }
}
