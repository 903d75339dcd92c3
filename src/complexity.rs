//! Lexical complexity scoring for subtasks.

use std::sync::LazyLock;

use regex::Regex;

use crate::compile;

pub const MIN_COMPLEXITY: u8 = 1;
pub const MAX_COMPLEXITY: u8 = 5;

static SIMPLE_ACTION: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^(?:check|verify|confirm|send|email|call|read)\b"));

/// Additive bands, each contributing once regardless of how many words match.
/// Keywords match at the start of a word, so `fix` counts in "fixes" but
/// not in "prefix".
static BANDS: LazyLock<[(Regex, u8); 5]> = LazyLock::new(|| {
    [
        (compile(r"\b(?:update|fix|edit|write|create|add|remove)"), 1),
        (compile(r"\b(?:design|implement|develop|analyze|research|build)"), 2),
        (compile(r"\b(?:architect|optimize|refactor|integrate|deploy)"), 3),
        (compile(r"\b(?:multiple|various|several)"), 1),
        (compile(r"\b(?:complex|advanced|comprehensive)"), 1),
    ]
});

/// Score a subtask title from 1 (trivial) to 5 (very involved).
///
/// Titles that open with a simple action verb are always 1. Otherwise every
/// matching band adds its weight to a base of 1 and the sum is clamped.
pub fn score(title: &str) -> u8 {
    let text = title.trim().to_lowercase();
    if SIMPLE_ACTION.is_match(&text) {
        return MIN_COMPLEXITY;
    }
    let total = BANDS
        .iter()
        .filter(|(pattern, _)| pattern.is_match(&text))
        .fold(u32::from(MIN_COMPLEXITY), |acc, (_, weight)| acc + u32::from(*weight));
    total.clamp(u32::from(MIN_COMPLEXITY), u32::from(MAX_COMPLEXITY)) as u8
}
