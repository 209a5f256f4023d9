//! Output compression
//!
//! Shrinks agent output to a token budget. Code fences are never edited;
//! error text, file paths and outcome statements survive every level.

use super::level::CompressionLevel;
use crate::classification::complexity::round2;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Rough characters-per-token estimate used for budgets
pub const CHARS_PER_TOKEN: usize = 4;

/// Appended on its own line whenever output is cut to fit the budget
pub const TRUNCATION_MARKER: &str = "[output truncated]";

/// Prose lines longer than this are dropped at `moderate` unless they carry
/// an error, path or code marker
const LONG_LINE_CHARS: usize = 200;
const MAX_ERRORS: usize = 5;
const MAX_ERROR_CHARS: usize = 500;
const MAX_CODE_BLOCKS: usize = 5;
const MAX_CODE_BLOCK_CHARS: usize = 1000;
const MAX_OUTCOME_CHARS: usize = 200;

static BLANK_RUNS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\n{3,}").expect("BLANK_RUNS regex should compile")
});

static CODE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[\w+-]*\n(.*?)```").expect("CODE_BLOCK regex should compile")
});

static FILE_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)(?:^|[\s(`'"])((?:[\w.-]+)?/[\w./-]*\.[A-Za-z]{1,5})\b"#)
        .expect("FILE_PATH regex should compile")
});

static ERROR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:error|exception|failed|failure|traceback|panicked)[:.\s].*")
        .expect("ERROR regex should compile")
});

static THINKING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:i think|let me|i'll|i will|i'm going to|first,|now,|then,|next,|finally,|hmm|actually,|wait,|okay,|ok,)",
    )
    .expect("THINKING regex should compile")
});

static OUTCOME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:created|modified|updated|deleted|added|removed|fixed|implemented|completed|successfully|done|finished)\b",
    )
    .expect("OUTCOME regex should compile")
});

/// Result of a compression call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressionResult {
    pub compressed: String,
    pub level: CompressionLevel,
    /// True when the budget forced a cut (the output ends with
    /// [`TRUNCATION_MARKER`], or a prefix of it when the budget is tiny)
    pub truncated: bool,
    /// Length of the input in characters
    pub original_length: usize,
    /// Length of `compressed` in characters
    pub compressed_length: usize,
    pub compression_ratio: f64,
    /// Fenced code found in the input
    pub code_blocks: Vec<String>,
    /// File paths mentioned in the input, sorted and deduplicated
    pub file_paths: Vec<String>,
    /// Up to five error lines found in the input
    pub errors: Vec<String>,
}

/// Compress `text` at `level` so it fits in `max_tokens` (about
/// [`CHARS_PER_TOKEN`] characters each). Never fails; overflow is reported
/// through [`CompressionResult::truncated`].
pub fn compress(text: &str, level: CompressionLevel, max_tokens: usize) -> CompressionResult {
    let budget = max_tokens.saturating_mul(CHARS_PER_TOKEN);
    let minimal_output = minimal(text);
    let moderate_output = no_longer_than(moderate(&minimal_output), minimal_output.clone());

    // Each level is clamped against the gentler level's budgeted output, so
    // truncation can never reorder the levels by length.
    let fitted_minimal = fit(minimal_output, budget);
    let (compressed, truncated) = match level {
        CompressionLevel::Minimal => fitted_minimal,
        CompressionLevel::Moderate => shorter_fit(fit(moderate_output, budget), fitted_minimal),
        CompressionLevel::Aggressive => {
            let aggressive_output = aggressive(&moderate_output);
            let fitted_moderate = shorter_fit(fit(moderate_output, budget), fitted_minimal);
            shorter_fit(fit(aggressive_output, budget), fitted_moderate)
        }
    };

    let original_length = char_len(text);
    let compressed_length = char_len(&compressed);
    let compression_ratio = if original_length == 0 {
        1.0
    } else {
        round2(compressed_length as f64 / original_length as f64)
    };

    if truncated {
        tracing::debug!(
            original_length,
            compressed_length,
            budget,
            "output truncated to budget"
        );
    }

    CompressionResult {
        level,
        truncated,
        original_length,
        compressed_length,
        compression_ratio,
        code_blocks: extract_code_blocks(text),
        file_paths: extract_file_paths(text),
        errors: extract_errors(text),
        compressed,
    }
}

/// Collapse blank-line runs and strip trailing whitespace
fn minimal(text: &str) -> String {
    let stripped: Vec<&str> = text.lines().map(str::trim_end).collect();
    let joined = stripped.join("\n");
    BLANK_RUNS.replace_all(&joined, "\n\n").trim().to_string()
}

/// Drop narrative and overlong prose outside code fences
fn moderate(text: &str) -> String {
    let mut kept = Vec::new();
    let mut in_code = false;
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("```") {
            in_code = !in_code;
            kept.push(line);
            continue;
        }
        if in_code {
            kept.push(line);
            continue;
        }
        if has_marker(trimmed) {
            kept.push(line);
            continue;
        }
        if THINKING.is_match(trimmed) || line.chars().count() > LONG_LINE_CHARS {
            continue;
        }
        kept.push(line);
    }
    minimal(&kept.join("\n"))
}

/// Keep only errors, code, paths and one-line outcomes. Empty when nothing
/// qualifies.
fn aggressive(text: &str) -> String {
    let mut parts: Vec<String> = Vec::new();

    let errors = extract_errors(text);
    if !errors.is_empty() {
        parts.push("ERRORS:".to_string());
        parts.extend(errors.iter().take(3).map(|e| format!("- {}", e)));
    }

    let blocks = extract_code_blocks(text);
    if !blocks.is_empty() {
        parts.push("CODE:".to_string());
        for block in blocks.iter().take(MAX_CODE_BLOCKS) {
            let block = block.trim_end();
            if char_len(block) > MAX_CODE_BLOCK_CHARS {
                let head: String = block.chars().take(MAX_CODE_BLOCK_CHARS).collect();
                parts.push(format!("```\n{}\n... (truncated)\n```", head));
            } else {
                parts.push(format!("```\n{}\n```", block));
            }
        }
    }

    let paths = extract_file_paths(text);
    if !paths.is_empty() {
        parts.push(format!("FILES: {}", paths.join(", ")));
    }

    let mut in_code = false;
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("```") {
            in_code = !in_code;
            continue;
        }
        if in_code || ERROR.is_match(trimmed) || trimmed.starts_with("FILES:") {
            continue;
        }
        if OUTCOME.is_match(trimmed) && char_len(trimmed) < MAX_OUTCOME_CHARS {
            let outcome = trimmed.trim_start_matches("- ");
            parts.push(format!("- {}", outcome));
        }
    }

    parts.join("\n")
}

fn has_marker(line: &str) -> bool {
    let lower = line.to_lowercase();
    lower.contains('`') || ERROR.is_match(line) || FILE_PATH.is_match(line) || lower.contains("error")
}

/// Truncate `output` when it exceeds `budget` characters
fn fit(output: String, budget: usize) -> (String, bool) {
    if char_len(&output) > budget {
        (truncate(&output, budget), true)
    } else {
        (output, false)
    }
}

/// Cut to `budget` characters including the marker, preferring a line break
/// in the last fifth of the kept text. A budget too small for the marker gets
/// as much of the marker as fits.
fn truncate(text: &str, budget: usize) -> String {
    let marker_len = char_len(TRUNCATION_MARKER) + 1;
    let keep = budget.saturating_sub(marker_len);
    if keep == 0 {
        return TRUNCATION_MARKER.chars().take(budget).collect();
    }

    let head: String = text.chars().take(keep).collect();
    let cut = match head.rfind('\n') {
        Some(pos) if char_len(&head[..pos]) as f64 > keep as f64 * 0.8 => &head[..pos],
        _ => head.as_str(),
    };
    format!("{}\n{}", cut.trim_end(), TRUNCATION_MARKER)
}

/// Budgeted `candidate` unless it is empty or longer than `fallback`
fn shorter_fit(candidate: (String, bool), fallback: (String, bool)) -> (String, bool) {
    if candidate.0.is_empty() || char_len(&candidate.0) > char_len(&fallback.0) {
        fallback
    } else {
        candidate
    }
}

/// Return `candidate` unless it is longer than `fallback`
fn no_longer_than(candidate: String, fallback: String) -> String {
    if candidate.is_empty() || char_len(&candidate) > char_len(&fallback) {
        fallback
    } else {
        candidate
    }
}

fn extract_code_blocks(text: &str) -> Vec<String> {
    CODE_BLOCK
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

fn extract_file_paths(text: &str) -> Vec<String> {
    let paths: std::collections::BTreeSet<String> = FILE_PATH
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .collect();
    paths.into_iter().collect()
}

fn extract_errors(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| ERROR.find(line))
        .map(|m| m.as_str().trim())
        .filter(|e| char_len(e) > 10)
        .map(|e| e.chars().take(MAX_ERROR_CHARS).collect())
        .take(MAX_ERRORS)
        .collect()
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}
