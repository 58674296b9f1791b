//! Label formatting, slug ids, and question building.

use std::sync::LazyLock;

use regex::Regex;

use crate::date::is_date_label;

static SEPARATOR_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[_-]+").unwrap());
static WHITESPACE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static NON_SLUG_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Turns an accepted placeholder value into a display label: separators
/// become spaces, whitespace collapses, and each word is title-cased.
/// An empty result falls back to `"Field"`.
pub fn format_label(value: &str) -> String {
    let spaced = SEPARATOR_RUNS.replace_all(value, " ");
    let cleaned = WHITESPACE_RUNS.replace_all(&spaced, " ");
    let cleaned = cleaned.trim();

    if cleaned.is_empty() {
        return "Field".to_string();
    }

    cleaned
        .split(' ')
        .map(title_case_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Derives the placeholder id from its label and discovery sequence number.
/// Slugification that consumes the whole label yields `field-<sequence>`.
pub fn slug_from_label(label: &str, sequence: usize) -> String {
    let lowered = label.to_lowercase();
    let base = NON_SLUG_RUNS.replace_all(&lowered, "-");
    let base = base.trim_matches('-');

    if base.is_empty() {
        format!("field-{sequence}")
    } else {
        format!("{base}-{sequence}")
    }
}

/// Builds the conversational prompt for a label, with a strict-format
/// variant for date fields.
pub fn build_question(label: &str) -> String {
    if label.is_empty() {
        return "Please provide a value.".to_string();
    }

    if is_date_label(label) {
        return "Please provide the date (YYYY-MM-DD).".to_string();
    }

    format!("Please provide the {label}.")
}
