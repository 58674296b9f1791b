//! The placeholder extraction pass.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use chatfill_core::Placeholder;

use crate::context::derive_context_label;
use crate::label::{build_question, format_label, slug_from_label};
use crate::patterns::PATTERNS;

static WHITESPACE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

const MAX_VALUE_CHARS: usize = 120;
const MAX_VALUE_WORDS: usize = 18;
const EDGE_QUOTES: &[char] = &['"', '\'', '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'];

/// Scans `text` for placeholder tokens and returns them deduplicated by
/// normalized label, in discovery order.
///
/// Discovery order is grouped by pattern type: every `{{...}}` match in the
/// document is processed before the first `[[...]]` match, and so on down
/// the pattern table, regardless of textual position. Within one pattern
/// type, order follows the document.
///
/// Two tokens whose derived values normalize to the same lowercase string
/// collapse into a single placeholder carrying the first token's `raw`;
/// later differently-delimited variants are not tracked and will not be
/// substituted. This function is total: any input yields a (possibly
/// empty) result, never an error.
pub fn extract_placeholders(text: &str) -> Vec<Placeholder> {
    let mut ordered = Vec::new();
    let mut seen = HashSet::new();
    let mut sequence = 1usize;

    for pattern in PATTERNS.iter() {
        for found in pattern.regex.find_iter(text) {
            let raw = found.as_str();
            let base_value = sanitize_value((pattern.strip)(raw));

            let derived_value = if is_reasonable_placeholder(&base_value) {
                base_value
            } else {
                match derive_context_label(text, found.start(), raw) {
                    Some(label) => label,
                    None => continue,
                }
            };

            if derived_value.is_empty() {
                continue;
            }

            let normalized = derived_value.to_lowercase();
            if !seen.insert(normalized) {
                continue;
            }

            let label = format_label(&derived_value);
            let question = build_question(&label);
            ordered.push(Placeholder {
                id: slug_from_label(&label, sequence),
                raw: raw.to_string(),
                label,
                question,
            });
            sequence += 1;
        }
    }

    ordered
}

/// Collapses whitespace runs and trims surrounding quotes (straight and
/// curly) from a stripped token content.
pub(crate) fn sanitize_value(value: &str) -> String {
    let collapsed = WHITESPACE_RUNS.replace_all(value, " ");
    collapsed
        .trim_matches(|c: char| c.is_whitespace() || EDGE_QUOTES.contains(&c))
        .to_string()
}

/// Whether a sanitized token content is usable as a label on its own.
pub(crate) fn is_reasonable_placeholder(value: &str) -> bool {
    if !value.bytes().any(|b| b.is_ascii_alphanumeric()) {
        return false;
    }

    let lower = value.to_lowercase();
    if lower.contains("http://") || lower.contains("https://") {
        return false;
    }

    if value.chars().count() > MAX_VALUE_CHARS {
        return false;
    }

    let words = value.split(' ').filter(|w| !w.is_empty()).count();
    if words == 0 || words > MAX_VALUE_WORDS {
        return false;
    }

    true
}


#[cfg(test)]
mod props {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use super::extract_placeholders;

    proptest! {
        #[test]
        fn prop_total_on_arbitrary_input(text in ".*") {
            let _ = extract_placeholders(&text);
        }

        #[test]
        fn prop_ids_unique_and_raw_verbatim(
            text in r"([a-zA-Z ,.]{0,12}(\{\{[a-zA-Z _]{1,16}\}\}|\[[a-zA-Z ]{1,16}\]|<[a-zA-Z ]{1,16}>|__[a-zA-Z ]{1,16}__)){0,6}"
        ) {
            let found = extract_placeholders(&text);
            let mut ids = HashSet::new();
            for p in &found {
                prop_assert!(ids.insert(p.id.clone()));
                prop_assert!(text.contains(&p.raw));
            }
        }

        #[test]
        fn prop_idempotent(text in ".*") {
            prop_assert_eq!(extract_placeholders(&text), extract_placeholders(&text));
        }

        #[test]
        fn prop_dedup_by_normalized_value(
            text in r"([a-z ]{0,10}\{\{[a-zA-Z ]{1,12}\}\}){0,8}"
        ) {
            let found = extract_placeholders(&text);
            let mut normalized = HashSet::new();
            for p in &found {
                prop_assert!(normalized.insert(p.label.to_lowercase()));
            }
        }
    }
}
