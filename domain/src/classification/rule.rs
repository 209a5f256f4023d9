//! Classification rules
//!
//! Each rule is a typed record `{task_type, pattern, weight}`. The classifier
//! sums the weights of every matching rule per task type; the rule table is
//! the only place keyword knowledge lives.

use super::task_type::TaskType;

/// How a rule matches the lower-cased task text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// Plain substring (`"pull request"` matches inside longer words too)
    Phrase(&'static str),
    /// Whole word, bounded by non-word characters
    Word(&'static str),
    /// Regular expression, already lower-case
    Regex(&'static str),
}

impl Pattern {
    /// Regex source for this pattern
    pub fn to_regex_source(&self) -> String {
        match self {
            Pattern::Phrase(p) => regex::escape(p),
            Pattern::Word(w) => format!(r"\b{}\b", regex::escape(w)),
            Pattern::Regex(r) => (*r).to_string(),
        }
    }

    /// Short label used in classification signals
    pub fn label(&self) -> &'static str {
        match self {
            Pattern::Phrase(p) | Pattern::Word(p) | Pattern::Regex(p) => p,
        }
    }
}

/// A single weighted keyword rule
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassificationRule {
    pub task_type: TaskType,
    pub pattern: Pattern,
    pub weight: f64,
}

const fn rule(task_type: TaskType, pattern: Pattern, weight: f64) -> ClassificationRule {
    ClassificationRule {
        task_type,
        pattern,
        weight,
    }
}

use Pattern::{Phrase, Regex, Word};
use TaskType::*;

/// Built-in rule table
pub const RULES: &[ClassificationRule] = &[
    // Code review
    rule(CodeReview, Phrase("review"), 1.0),
    rule(CodeReview, Word("audit"), 1.0),
    rule(CodeReview, Phrase("pull request"), 1.0),
    rule(CodeReview, Phrase("code quality"), 1.0),
    rule(CodeReview, Phrase("vulnerabilit"), 1.0),
    rule(CodeReview, Phrase("best practices"), 0.5),
    rule(CodeReview, Word("security"), 0.5),
    rule(CodeReview, Phrase("check for"), 0.5),
    // Debugging
    rule(CodeDebugging, Word("fix"), 1.0),
    rule(CodeDebugging, Regex(r"\bbugs?\b"), 1.0),
    rule(CodeDebugging, Phrase("debug"), 1.0),
    rule(CodeDebugging, Regex(r"\berrors?\b"), 1.0),
    rule(CodeDebugging, Phrase("crash"), 1.0),
    rule(CodeDebugging, Phrase("exception"), 1.0),
    rule(CodeDebugging, Phrase("traceback"), 1.0),
    rule(CodeDebugging, Phrase("stack trace"), 1.0),
    rule(CodeDebugging, Word("panics"), 1.0),
    rule(CodeDebugging, Word("broken"), 1.0),
    rule(CodeDebugging, Word("failing"), 1.0),
    rule(CodeDebugging, Phrase("not working"), 1.0),
    rule(CodeDebugging, Phrase("doesn't work"), 1.0),
    rule(CodeDebugging, Phrase("wrong output"), 1.0),
    rule(CodeDebugging, Phrase("troubleshoot"), 1.0),
    rule(CodeDebugging, Word("unexpected"), 0.5),
    // Explanation
    rule(CodeExplanation, Phrase("explain"), 1.0),
    rule(CodeExplanation, Phrase("what does"), 1.0),
    rule(CodeExplanation, Phrase("how does"), 1.0),
    rule(CodeExplanation, Phrase("why does"), 1.0),
    rule(CodeExplanation, Phrase("walk through"), 1.0),
    rule(CodeExplanation, Phrase("walk me through"), 1.0),
    rule(CodeExplanation, Word("describe"), 0.5),
    rule(CodeExplanation, Phrase("purpose of"), 0.5),
    rule(CodeExplanation, Phrase("meaning of"), 0.5),
    rule(CodeExplanation, Phrase("tell me about"), 0.5),
    rule(CodeExplanation, Regex(r"\bhow\b.*\bworks?\b"), 0.5),
    rule(
        CodeExplanation,
        Regex(r"\b(code|function|class|module|method|regex|pattern|algorithm|query|snippet)\b"),
        0.3,
    ),
    // Rewrite
    rule(Rewrite, Phrase("refactor"), 1.0),
    rule(Rewrite, Phrase("restructure"), 1.0),
    rule(Rewrite, Phrase("reorganize"), 1.0),
    rule(Rewrite, Phrase("clean up"), 1.0),
    rule(Rewrite, Phrase("modernize"), 1.0),
    rule(Rewrite, Phrase("rewrite"), 1.0),
    rule(Rewrite, Phrase("simplify"), 0.5),
    rule(Rewrite, Regex(r"\bconvert\b.*\bto\b"), 0.5),
    rule(Rewrite, Word("migrate"), 0.5),
    rule(Rewrite, Word("legacy"), 0.5),
    rule(Rewrite, Word("improve"), 0.5),
    // Generation
    rule(CodeGeneration, Word("write"), 1.0),
    rule(CodeGeneration, Word("create"), 1.0),
    rule(CodeGeneration, Word("implement"), 1.0),
    rule(CodeGeneration, Word("generate"), 1.0),
    rule(CodeGeneration, Word("scaffold"), 1.0),
    rule(CodeGeneration, Word("build"), 0.5),
    rule(CodeGeneration, Word("add"), 0.5),
    rule(CodeGeneration, Word("make"), 0.5),
    rule(CodeGeneration, Word("develop"), 0.5),
    rule(CodeGeneration, Phrase("set up"), 0.5),
    rule(
        CodeGeneration,
        Regex(
            r"\b(function|class|api|endpoint|module|script|component|service|handler|tests?|interface|method|route|middleware|cli)\b",
        ),
        0.5,
    ),
    // Summarization
    rule(Summarization, Phrase("summar"), 1.0),
    rule(Summarization, Word("tldr"), 1.0),
    rule(Summarization, Phrase("tl;dr"), 1.0),
    rule(Summarization, Word("recap"), 1.0),
    rule(Summarization, Word("overview"), 0.5),
    rule(Summarization, Phrase("key points"), 0.5),
    rule(Summarization, Phrase("main points"), 0.5),
    rule(Summarization, Word("gist"), 0.5),
    // Math
    rule(Math, Word("calculate"), 1.0),
    rule(Math, Word("compute"), 1.0),
    rule(Math, Phrase("time complexity"), 1.0),
    rule(Math, Phrase("space complexity"), 1.0),
    rule(Math, Phrase("big o"), 1.0),
    rule(Math, Word("equation"), 1.0),
    rule(Math, Word("formula"), 1.0),
    rule(Math, Word("probability"), 1.0),
    rule(Math, Regex(r"\b(integral|derivative)s?\b"), 1.0),
    rule(Math, Word("fibonacci"), 0.5),
    rule(Math, Word("algorithm"), 0.5),
    rule(Math, Regex(r"\d+\s*[-+*/^]\s*\d+"), 0.5),
    // Open questions
    rule(OpenQa, Phrase("?"), 0.5),
    rule(
        OpenQa,
        Regex(r"^\s*(what|why|how|when|where|which|who|can|should|is|are|does)\b"),
        0.5,
    ),
    rule(
        OpenQa,
        Regex(r"\b(best way|best approach|recommend|pros and cons|difference between|should i)\b"),
        0.5,
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_task_type_has_rules() {
        for task_type in TaskType::ALL {
            assert!(
                RULES.iter().any(|r| r.task_type == task_type),
                "no rules for {}",
                task_type
            );
        }
    }

    #[test]
    fn test_weights_positive() {
        assert!(RULES.iter().all(|r| r.weight > 0.0));
    }

    #[test]
    fn test_word_pattern_source() {
        assert_eq!(Pattern::Word("fix").to_regex_source(), r"\bfix\b");
        assert_eq!(Pattern::Phrase("?").to_regex_source(), r"\?");
        assert_eq!(Pattern::Regex(r"\d+").to_regex_source(), r"\d+");
    }
}
