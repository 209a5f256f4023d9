//! Rule-based task classifier
//!
//! Scores every task type by summing the weights of matching rules, picks
//! the highest aggregate (ties broken by [`TaskType::PRIORITY`]) and derives
//! confidence from the margin over the runner-up.
//!
//! # Example
//!
//! ```
//! use router_domain::{Classifier, TaskDescription, TaskType};
//!
//! let classifier = Classifier::new();
//! let task = TaskDescription::new("Fix the authentication bug in login.py").unwrap();
//! let profile = classifier.classify(&task);
//! assert_eq!(profile.task_type, TaskType::CodeDebugging);
//! assert!(!profile.fallback);
//! ```

use super::complexity::{self, round2};
use super::profile::TaskProfile;
use super::rule::{ClassificationRule, RULES};
use super::task_type::TaskType;
use crate::core::task::TaskDescription;
use regex::Regex;
use std::collections::BTreeMap;

/// Identifier reported by health checks
pub const CLASSIFIER_VARIANT: &str = "rule_based_v3";

/// Minimum aggregate score for a task type to be trusted
pub const MIN_SCORE: f64 = 0.5;

/// Confidence reported when falling back to `open_qa`
pub const FALLBACK_CONFIDENCE: f64 = 0.3;

/// Confidence floor when exactly one task type fired
pub const SINGLE_TYPE_FLOOR: f64 = 0.6;

struct CompiledRule {
    rule: ClassificationRule,
    regex: Regex,
}

/// Deterministic keyword classifier
///
/// Regexes are compiled once at construction; `classify` does no I/O and
/// never fails.
pub struct Classifier {
    rules: Vec<CompiledRule>,
}

impl Classifier {
    /// Classifier over the built-in rule table
    pub fn new() -> Self {
        Self::with_rules(RULES).expect("built-in classification rules should compile")
    }

    /// Classifier over a custom rule table
    pub fn with_rules(rules: &[ClassificationRule]) -> Result<Self, regex::Error> {
        let rules = rules
            .iter()
            .map(|rule| {
                Regex::new(&rule.pattern.to_regex_source()).map(|regex| CompiledRule {
                    rule: *rule,
                    regex,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Classify a task
    pub fn classify(&self, task: &TaskDescription) -> TaskProfile {
        let lower = task.searchable_text().to_lowercase();

        let mut scores: BTreeMap<TaskType, f64> = BTreeMap::new();
        let mut matched: BTreeMap<TaskType, Vec<&'static str>> = BTreeMap::new();
        for compiled in &self.rules {
            if compiled.regex.is_match(&lower) {
                *scores.entry(compiled.rule.task_type).or_default() += compiled.rule.weight;
                matched
                    .entry(compiled.rule.task_type)
                    .or_default()
                    .push(compiled.rule.pattern.label());
            }
        }

        let ranked = rank(&scores);
        let mut signals: Vec<String> = ranked
            .iter()
            .map(|(task_type, score)| format!("task:{}={:.2}", task_type, score))
            .collect();

        let estimate = complexity::estimate(&lower);

        let top = ranked.first().copied().filter(|(_, s)| *s >= MIN_SCORE);
        let (task_type, confidence, fallback) = match top {
            Some((task_type, top_score)) => {
                let runner_up = ranked.get(1).map(|(_, s)| *s).unwrap_or(0.0);
                let mut confidence = 0.5 + 0.5 * (top_score - runner_up) / top_score;
                if ranked.len() == 1 {
                    confidence = confidence.max(SINGLE_TYPE_FLOOR);
                }
                if let Some(labels) = matched.get(&task_type) {
                    signals.push(format!("matched:{}", labels.join("|")));
                }
                (task_type, round2(confidence.clamp(0.0, 1.0)), false)
            }
            None => {
                signals.push("fallback:open_qa".to_string());
                (TaskType::OpenQa, FALLBACK_CONFIDENCE, true)
            }
        };

        tracing::debug!(
            task_type = %task_type,
            confidence,
            complexity = %estimate.complexity,
            scores = ?ranked,
            "classified task"
        );

        signals.extend(estimate.signals);
        TaskProfile {
            task_type,
            complexity: estimate.complexity,
            complexity_score: estimate.score,
            confidence,
            signals,
            fallback,
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Sort task types by score descending, then by declared priority
fn rank(scores: &BTreeMap<TaskType, f64>) -> Vec<(TaskType, f64)> {
    let mut ranked: Vec<(TaskType, f64)> = scores.iter().map(|(t, s)| (*t, *s)).collect();
    ranked.sort_by(|(ta, sa), (tb, sb)| {
        sb.total_cmp(sa)
            .then_with(|| ta.priority().cmp(&tb.priority()))
    });
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::{Complexity, Pattern};

    fn classify(text: &str) -> TaskProfile {
        Classifier::new().classify(&TaskDescription::new(text).unwrap())
    }

    #[test]
    fn test_builtin_rules_compile() {
        assert_eq!(Classifier::new().rule_count(), RULES.len());
    }

    #[test]
    fn test_debugging_task_scenario() {
        let profile = classify("Fix the authentication bug in login.py");
        assert_eq!(profile.task_type, TaskType::CodeDebugging);
        assert!(matches!(
            profile.complexity,
            Complexity::Simple | Complexity::Moderate
        ));
        assert_eq!(profile.confidence, 1.0);
        assert!(!profile.fallback);
        assert_eq!(profile.signals[0], "task:code_debugging=2.00");
    }

    #[test]
    fn test_general_question_scenario() {
        let profile = classify("What is the capital of France?");
        assert_eq!(profile.task_type, TaskType::OpenQa);
        assert_eq!(profile.complexity, Complexity::Simple);
        assert!(!profile.fallback);
    }

    #[test]
    fn test_known_prompts() {
        let cases = [
            ("Fix the authentication bug in login.py", TaskType::CodeDebugging),
            ("Debug why the API returns 500 errors", TaskType::CodeDebugging),
            (
                "The login function crashes when password is empty",
                TaskType::CodeDebugging,
            ),
            (
                "Explain how the database connection pool works",
                TaskType::CodeExplanation,
            ),
            ("What does this regex pattern do?", TaskType::CodeExplanation),
            (
                "Write a REST API endpoint for user registration",
                TaskType::CodeGeneration,
            ),
            (
                "Create a Python class for handling payments",
                TaskType::CodeGeneration,
            ),
            (
                "Implement JWT authentication with refresh tokens",
                TaskType::CodeGeneration,
            ),
            (
                "Review this pull request for security issues",
                TaskType::CodeReview,
            ),
            ("Audit the auth module for vulnerabilities", TaskType::CodeReview),
            (
                "Refactor the payment module to use async/await",
                TaskType::Rewrite,
            ),
            (
                "Clean up and modernize the legacy utils.js file",
                TaskType::Rewrite,
            ),
            (
                "Summarize the changes in the last 10 commits",
                TaskType::Summarization,
            ),
            (
                "What's the best approach for caching user sessions?",
                TaskType::OpenQa,
            ),
            (
                "Calculate the time complexity of this algorithm",
                TaskType::Math,
            ),
        ];
        for (text, expected) in cases {
            let profile = classify(text);
            assert_eq!(profile.task_type, expected, "prompt: {}", text);
            assert!((0.0..=1.0).contains(&profile.confidence));
        }
    }

    #[test]
    fn test_fallback_when_nothing_fires() {
        let profile = classify("hello there");
        assert_eq!(profile.task_type, TaskType::OpenQa);
        assert!(profile.fallback);
        assert_eq!(profile.confidence, FALLBACK_CONFIDENCE);
        assert!(profile.signals.contains(&"fallback:open_qa".to_string()));
    }

    #[test]
    fn test_weak_match_falls_back() {
        // A lone code-context word scores below the threshold
        let profile = classify("the snippet");
        assert!(profile.fallback);
        assert!(profile.signals[0].starts_with("task:code_explanation="));
    }

    #[test]
    fn test_margin_lowers_confidence() {
        // debugging 2.0 against generation 0.5
        let profile = classify("Debug why the API returns 500 errors");
        assert_eq!(profile.confidence, 0.88);
    }

    #[test]
    fn test_tie_uses_priority() {
        let rules = [
            ClassificationRule {
                task_type: TaskType::Math,
                pattern: Pattern::Word("alpha"),
                weight: 1.0,
            },
            ClassificationRule {
                task_type: TaskType::CodeReview,
                pattern: Pattern::Word("alpha"),
                weight: 1.0,
            },
        ];
        let classifier = Classifier::with_rules(&rules).unwrap();
        let profile = classifier.classify(&TaskDescription::new("alpha").unwrap());
        assert_eq!(profile.task_type, TaskType::CodeReview);
        assert_eq!(profile.confidence, 0.5);
    }

    #[test]
    fn test_context_participates() {
        let task = TaskDescription::new("look at this")
            .unwrap()
            .with_context("it crashes with a traceback");
        let profile = Classifier::new().classify(&task);
        assert_eq!(profile.task_type, TaskType::CodeDebugging);
    }

    #[test]
    fn test_invalid_custom_rule_rejected() {
        let rules = [ClassificationRule {
            task_type: TaskType::Math,
            pattern: Pattern::Regex("(unclosed"),
            weight: 1.0,
        }];
        assert!(Classifier::with_rules(&rules).is_err());
    }

    #[test]
    fn test_deterministic() {
        let a = classify("Refactor the payment module to use async/await");
        let b = classify("Refactor the payment module to use async/await");
        assert_eq!(a, b);
    }
}
