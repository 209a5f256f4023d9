//! Specialized intent detection
//!
//! Some requests carry a recognizable intent ("plan the migration", "find
//! the memory leak") that is narrower than their task type. Detection only
//! annotates a routing decision with the intent and the agent mode that
//! suits it; it never changes which agent is picked.

use serde::{Deserialize, Serialize};

/// A specialized intent and the phrases that reveal it
#[derive(Debug, Clone, Copy)]
pub struct SpecializedTask {
    pub name: &'static str,
    /// Phrases that count toward the intent
    pub phrases: &'static [&'static str],
    /// Phrases strong enough to decide the intent on their own
    pub strong_phrases: &'static [&'static str],
    /// Agent mode that suits the intent
    pub mode: &'static str,
    pub confidence_boost: f64,
}

/// Result of specialized intent detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecializedMatch {
    pub name: String,
    pub mode: String,
    pub confidence: f64,
    pub matched_phrases: Vec<String>,
}

pub const STRONG_MATCH_CONFIDENCE: f64 = 0.85;
pub const CONTEXT_MATCH_CONFIDENCE: f64 = 0.7;
pub const MAX_MULTI_MATCH_CONFIDENCE: f64 = 0.95;

/// Words that make a single weak phrase believable
const PROJECT_CONTEXT: &[&str] = &[
    "codebase",
    "project",
    "repo",
    "module",
    "component",
    "system",
    "authentication",
    "api",
    "database",
    "service",
    "handler",
];

const fn task(
    name: &'static str,
    phrases: &'static [&'static str],
    strong_phrases: &'static [&'static str],
    mode: &'static str,
) -> SpecializedTask {
    SpecializedTask {
        name,
        phrases,
        strong_phrases,
        mode,
        confidence_boost: 0.0,
    }
}

pub const SPECIALIZED_TASKS: &[SpecializedTask] = &[
    task(
        "planning",
        &[
            "plan the",
            "plan for",
            "create a plan",
            "implementation plan",
            "design the implementation",
            "how should we implement",
            "strategy for",
            "outline the approach",
            "roadmap for",
        ],
        &["plan the", "create a plan", "implementation plan"],
        "plan",
    ),
    task(
        "architecture",
        &[
            "architect",
            "system design",
            "design the architecture",
            "database schema",
            "api design",
            "data model",
            "microservice",
            "infrastructure design",
            "system architecture",
        ],
        &[
            "system design",
            "database schema",
            "api design",
            "system architecture",
        ],
        "plan",
    ),
    task(
        "code_review",
        &[
            "review the",
            "review this",
            "code review",
            "audit the",
            "check for issues",
            "pr review",
            "review changes",
            "review my code",
        ],
        &["code review", "pr review", "review staged"],
        "ask",
    ),
    task(
        "security_review",
        &[
            "security review",
            "security audit",
            "check for vulnerabilities",
            "security analysis",
            "penetration test",
            "vulnerability scan",
            "threat model",
        ],
        &["security review", "security audit", "vulnerability scan"],
        "default",
    ),
    task(
        "refactoring",
        &[
            "refactor the",
            "refactor this",
            "clean up the",
            "reorganize the",
            "consolidate the",
            "modernize the",
            "restructure the",
            "technical debt",
            "dead code",
        ],
        &["refactor the", "refactor this", "technical debt"],
        "agent",
    ),
    SpecializedTask {
        name: "debugging_complex",
        phrases: &[
            "race condition",
            "memory leak",
            "deadlock",
            "concurrency issue",
            "intermittent failure",
            "timing issue",
            "hard to reproduce",
            "flaky test",
            "thread safety",
            "lock contention",
        ],
        strong_phrases: &[
            "race condition",
            "memory leak",
            "deadlock",
            "concurrency issue",
            "intermittent failure",
            "flaky test",
        ],
        mode: "default",
        confidence_boost: 0.05,
    },
    task(
        "debugging",
        &[
            "debug the",
            "debug this",
            "fix the bug",
            "troubleshoot",
            "diagnose the",
            "find the issue",
        ],
        &["debug the", "troubleshoot", "diagnose the"],
        "agent",
    ),
    task(
        "research",
        &[
            "research how",
            "explore how",
            "find all",
            "understand how",
            "analyze how",
            "investigate the",
            "locate all",
            "search for",
            "examine the",
        ],
        &["research how", "find all", "understand how", "analyze how"],
        "read",
    ),
    task(
        "documentation",
        &[
            "document the",
            "write docs",
            "update readme",
            "add comments",
            "document this",
            "write documentation",
        ],
        &["write docs", "write documentation", "update readme"],
        "edit",
    ),
    task(
        "algorithms",
        &[
            "algorithm for",
            "time complexity",
            "space complexity",
            "efficient implementation",
            "big o",
            "data structure for",
            "sorting algorithm",
            "optimize performance",
        ],
        &["time complexity", "space complexity", "big o"],
        "high_reasoning",
    ),
];

/// Detect the strongest specialized intent in a text, if any.
///
/// Scoring per intent, first applicable rule wins:
/// - a strong phrase: [`STRONG_MATCH_CONFIDENCE`] plus the intent's boost
/// - two or more phrases: `0.8 + 0.05 * n`, capped at [`MAX_MULTI_MATCH_CONFIDENCE`]
/// - one phrase plus a project-context word: [`CONTEXT_MATCH_CONFIDENCE`]
///
/// Ties keep the earlier intent in [`SPECIALIZED_TASKS`].
pub fn detect_specialized(text: &str) -> Option<SpecializedMatch> {
    let lower = text.to_lowercase();
    let has_context = PROJECT_CONTEXT.iter().any(|w| lower.contains(w));

    let mut best: Option<SpecializedMatch> = None;
    for task in SPECIALIZED_TASKS {
        let Some((confidence, matched)) = score(task, &lower, has_context) else {
            continue;
        };
        let confidence = (confidence * 100.0).round() / 100.0;
        if best.as_ref().is_none_or(|b| confidence > b.confidence) {
            best = Some(SpecializedMatch {
                name: task.name.to_string(),
                mode: task.mode.to_string(),
                confidence,
                matched_phrases: matched.into_iter().map(str::to_string).collect(),
            });
        }
    }
    best
}

fn score(
    task: &SpecializedTask,
    lower: &str,
    has_context: bool,
) -> Option<(f64, Vec<&'static str>)> {
    let strong: Vec<&'static str> = task
        .strong_phrases
        .iter()
        .copied()
        .filter(|p| lower.contains(p))
        .collect();
    if !strong.is_empty() {
        return Some((STRONG_MATCH_CONFIDENCE + task.confidence_boost, strong));
    }

    let matched: Vec<&'static str> = task
        .phrases
        .iter()
        .copied()
        .filter(|p| lower.contains(p))
        .collect();
    match matched.len() {
        0 => None,
        1 if has_context => Some((CONTEXT_MATCH_CONFIDENCE, matched)),
        1 => None,
        n => Some((
            (0.8 + 0.05 * n as f64).min(MAX_MULTI_MATCH_CONFIDENCE),
            matched,
        )),
    }
}
