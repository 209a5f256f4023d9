//! Complexity estimation
//!
//! Combines independent signals into a score on top of a fixed base. Every
//! signal that contributes is recorded by name so a profile can be audited.

use super::task_type::Complexity;

/// Starting score before any signal is applied
pub const BASE_SCORE: f64 = 0.3;
pub const MIN_SCORE: f64 = 0.1;
pub const MAX_SCORE: f64 = 0.95;

const HIGH_KEYWORDS: &[&str] = &[
    "complex",
    "advanced",
    "sophisticated",
    "comprehensive",
    "production",
    "enterprise",
    "scalable",
    "distributed",
    "concurrent",
    "async",
    "parallel",
];

const LOW_KEYWORDS: &[&str] = &[
    "simple", "basic", "quick", "small", "tiny", "minimal", "trivial",
];

const DEPTH_TERMS: &[&str] = &[
    "authentication",
    "authorization",
    "oauth",
    "jwt",
    "encryption",
    "database",
    "caching",
    "queue",
    "websocket",
    "graphql",
    "grpc",
    "protocol",
    "concurrency",
    "mutex",
    "deadlock",
    "kubernetes",
    "docker",
    "terraform",
    "pipeline",
    "microservice",
    "architecture",
    "design pattern",
    "transaction",
    "rollback",
    "migration",
    "schema",
];

const MULTI_FILE_PHRASES: &[&str] = &[
    "multiple files",
    "several files",
    "all files",
    "across",
    "entire",
    "whole codebase",
    "project-wide",
];

/// Result of complexity estimation
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexityEstimate {
    pub complexity: Complexity,
    pub score: f64,
    pub signals: Vec<String>,
}

/// Estimate the complexity of a task text.
///
/// `lower` must already be lower-cased.
pub fn estimate(lower: &str) -> ComplexityEstimate {
    let tokens = tokenize(lower);
    let mut score = BASE_SCORE;
    let mut signals = Vec::new();

    // Length bucket
    let words = lower.split_whitespace().count();
    let (increment, bucket) = match words {
        n if n > 150 => (0.3, "very_long"),
        n if n > 75 => (0.2, "long"),
        n if n > 30 => (0.1, "medium"),
        _ => (0.0, "short"),
    };
    score += increment;
    signals.push(format!("length:{}", bucket));

    // Explicit escalating / de-escalating vocabulary
    let high = count_terms(lower, &tokens, HIGH_KEYWORDS);
    if high > 0 {
        score += 0.15 * high as f64;
        signals.push(format!("high_kw:{}", high));
    }
    let low = count_terms(lower, &tokens, LOW_KEYWORDS);
    if low > 0 {
        score -= 0.1 * low as f64;
        signals.push(format!("low_kw:{}", low));
    }

    // Enumerated requirements
    let multi_req = count_requirement_markers(lower);
    if multi_req > 3 {
        score += 0.25;
        signals.push(format!("multi_req:{}", multi_req));
    } else if multi_req > 1 {
        score += 0.15;
        signals.push(format!("multi_req:{}", multi_req));
    }

    // Domain depth
    let depth = count_terms(lower, &tokens, DEPTH_TERMS);
    if depth > 2 {
        score += 0.2;
        signals.push(format!("tech_depth:{}", depth));
    } else if depth > 0 {
        score += 0.1;
        signals.push(format!("tech_depth:{}", depth));
    }

    if MULTI_FILE_PHRASES.iter().any(|p| lower.contains(p)) {
        score += 0.15;
        signals.push("multi_file".to_string());
    }

    let score = round2(score.clamp(MIN_SCORE, MAX_SCORE));
    ComplexityEstimate {
        complexity: Complexity::from_score(score),
        score,
        signals,
    }
}

/// Split into word tokens, keeping hyphenated words together
fn tokenize(lower: &str) -> Vec<&str> {
    lower
        .split(|c: char| !(c.is_alphanumeric() || c == '-' || c == '_'))
        .filter(|t| !t.is_empty())
        .collect()
}

/// Count how many of `terms` occur. Single words must match a whole token;
/// multi-word terms match as substrings.
fn count_terms(lower: &str, tokens: &[&str], terms: &[&str]) -> usize {
    terms
        .iter()
        .filter(|term| {
            if term.contains(' ') {
                lower.contains(*term)
            } else {
                tokens.contains(term)
            }
        })
        .count()
}

/// Bullets, numbered items and `and` conjunctions
fn count_requirement_markers(lower: &str) -> usize {
    let conjunctions = lower.matches(" and ").count();
    let list_items = lower
        .lines()
        .map(str::trim_start)
        .filter(|line| is_bullet(line) || is_numbered(line))
        .count();
    conjunctions + list_items
}

fn is_bullet(line: &str) -> bool {
    ["- ", "* ", "\u{2022} "].iter().any(|b| line.starts_with(b))
}

fn is_numbered(line: &str) -> bool {
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    digits > 0 && matches!(line[digits..].chars().next(), Some('.') | Some(')'))
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_plain_question_is_simple() {
        let estimate = estimate("what is the capital of france?");
        assert_eq!(estimate.complexity, Complexity::Simple);
        assert_eq!(estimate.score, 0.3);
        assert_eq!(estimate.signals, vec!["length:short"]);
    }

    #[test]
    fn test_depth_term_bumps_to_moderate() {
        let estimate = estimate("fix the authentication bug in login.py");
        assert_eq!(estimate.complexity, Complexity::Moderate);
        assert_eq!(estimate.score, 0.4);
        assert!(estimate.signals.contains(&"tech_depth:1".to_string()));
    }

    #[test]
    fn test_low_keywords_floor() {
        let estimate = estimate("a quick simple small basic tiny fix");
        assert_eq!(estimate.score, MIN_SCORE);
        assert_eq!(estimate.complexity, Complexity::Simple);
        assert!(estimate.signals.contains(&"low_kw:5".to_string()));
    }

    #[test]
    fn test_complex_request() {
        let text = "build a production-ready distributed and scalable service \
                    across the entire codebase with oauth, database migration and caching";
        let estimate = estimate(text);
        assert_eq!(estimate.complexity, Complexity::Complex);
        assert!(estimate.signals.iter().any(|s| s.starts_with("high_kw:")));
        assert!(estimate.signals.iter().any(|s| s.starts_with("tech_depth:")));
        assert!(estimate.signals.contains(&"multi_file".to_string()));
    }

    #[test]
    fn test_list_items_counted() {
        let text = "requirements:\n- parse input\n- validate\n1. store\n2) report";
        assert_eq!(count_requirement_markers(text), 4);
        let estimate = estimate(text);
        assert!(estimate.signals.contains(&"multi_req:4".to_string()));
    }

    #[test]
    fn test_keyword_needs_whole_word() {
        // "someone" must not count as a low keyword, "asynchronous" not as "async"
        let tokens = tokenize("someone wrote asynchronous code");
        assert_eq!(count_terms("someone wrote asynchronous code", &tokens, LOW_KEYWORDS), 0);
        assert_eq!(count_terms("someone wrote asynchronous code", &tokens, HIGH_KEYWORDS), 0);
    }

    #[test]
    fn test_score_always_in_range() {
        let long = "complex advanced distributed ".repeat(80);
        let estimate = estimate(&long);
        assert!(estimate.score <= MAX_SCORE);
        assert_eq!(estimate.complexity, Complexity::Complex);
    }
}
