#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Deterministic matching of submitted answers against ground truth.
//!
//! Matching never calls out to a model; it normalizes both sides and
//! compares. Multiple-choice answers are reduced to an option index so that
//! `2`, `B`, and `②` all name the same option. Short answers compare
//! numerically when both sides parse as numbers, and as case- and
//! whitespace-folded text otherwise.

use itertools::Itertools;

use crate::dataset::QuestionKind;

impl QuestionKind {
    /// Whether `submitted` should be accepted as a correct answer for a
    /// question whose ground truth is `truth`.
    ///
    /// Listening questions always match: the benchmark ships no audio, so
    /// they are graded as correct by policy.
    pub fn matches(&self, truth: &str, submitted: &str) -> bool {
        match self {
            QuestionKind::Listening => true,
            QuestionKind::MultipleChoice => {
                match (choice_index(truth), choice_index(submitted)) {
                    (Some(t), Some(s)) => t == s,
                    // Free-text options (rare, but some manifests carry them)
                    // fall back to string comparison.
                    _ => canonical(truth) == canonical(submitted),
                }
            }
            QuestionKind::ShortAnswer => match (numeric(truth), numeric(submitted)) {
                (Some(t), Some(s)) => (t - s).abs() < f64::EPSILON,
                _ => canonical(truth) == canonical(submitted),
            },
        }
    }
}

/// Reduces a multiple-choice answer to its 1-based option index.
///
/// Accepted notations: ASCII digits (`2`, `02`), a single option letter
/// (`B`, `b`), circled digits (`②`), and fullwidth digits (`２`). Returns
/// `None` when the answer names no recognizable option.
pub fn choice_index(answer: &str) -> Option<u32> {
    let trimmed = answer.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.chars().all(|c| c.is_ascii_digit()) {
        return trimmed.parse::<u32>().ok().filter(|n| *n >= 1);
    }

    let mut chars = trimmed.chars();
    let first = chars.next()?;
    if chars.next().is_some() {
        return None;
    }

    match first {
        'A'..='E' => Some(first as u32 - 'A' as u32 + 1),
        'a'..='e' => Some(first as u32 - 'a' as u32 + 1),
        '①'..='⑨' => Some(first as u32 - '①' as u32 + 1),
        '１'..='９' => Some(first as u32 - '１' as u32 + 1),
        _ => None,
    }
}

/// Folds case and collapses runs of whitespace for text comparison.
pub fn canonical(answer: &str) -> String {
    answer.split_whitespace().join(" ").to_lowercase()
}

/// Parses an answer as a finite number, when it is one.
pub fn numeric(answer: &str) -> Option<f64> {
    answer.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}
