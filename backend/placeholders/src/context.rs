//! Context-derived labeling.
//!
//! When a token's own content is not a usable label (a bare underscore run,
//! a URL, an over-long clause), the text around it usually names the blank:
//! legal templates write `... the undersigned (the "Tenant") <...>` or
//! `... payable to the Landlord [...]`. This module inspects a window of up
//! to 160 characters on each side of the token and tries, in order: a
//! `(the "X")` alias after the token, a quoted phrase ending immediately
//! before it, a `the|a|an <Phrase>` ending immediately before it, and
//! finally the last few words before it.

use std::sync::LazyLock;

use regex::Regex;

const CONTEXT_WINDOW_CHARS: usize = 160;
const TRAILING_WORD_COUNT: usize = 6;

static ALIAS_AFTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)^\s*\(\s*the\s+["“]([^"”]+)["”]\s*\)"#).unwrap());
static ALIAS_BEFORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"["“]([^"”]+)["”]\s*$"#).unwrap());
static TITLED_BEFORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:the|a|an)\s+([A-Za-z][A-Za-z0-9\s\-']{2,80})\s*$").unwrap());
static LINE_BREAKS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\r\n]+").unwrap());
static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}\s\-']").unwrap());
static WHITESPACE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Attempts to infer a label for the token at byte offset `start` (with
/// literal text `raw`) from its surroundings. Returns `None` when nothing
/// usable is found, in which case the match is discarded.
pub fn derive_context_label(text: &str, start: usize, raw: &str) -> Option<String> {
    let before = window_before(text, start, CONTEXT_WINDOW_CHARS);
    let after = window_after(text, start + raw.len(), CONTEXT_WINDOW_CHARS);

    if let Some(caps) = ALIAS_AFTER.captures(after) {
        return Some(caps[1].to_string());
    }

    if let Some(caps) = ALIAS_BEFORE.captures(before) {
        return Some(caps[1].to_string());
    }

    if let Some(caps) = TITLED_BEFORE.captures(before) {
        return Some(caps[1].to_string());
    }

    let flattened = LINE_BREAKS.replace_all(before, " ");
    let words: Vec<&str> = flattened.trim().split_whitespace().collect();
    let tail = words[words.len().saturating_sub(TRAILING_WORD_COUNT)..].join(" ");

    let stripped = NON_WORD.replace_all(&tail, " ");
    let cleaned = WHITESPACE_RUNS.replace_all(&stripped, " ");
    let cleaned = cleaned.trim();

    if !cleaned.is_empty() && cleaned.bytes().any(|b| b.is_ascii_alphanumeric()) {
        return Some(cleaned.to_string());
    }

    None
}

/// The last `max_chars` characters of `text` before byte offset `start`.
fn window_before(text: &str, start: usize, max_chars: usize) -> &str {
    let head = &text[..start];
    let cut = head
        .char_indices()
        .rev()
        .nth(max_chars - 1)
        .map(|(i, _)| i)
        .unwrap_or(0);
    &head[cut..]
}

/// The first `max_chars` characters of `text` from byte offset `end`.
fn window_after(text: &str, end: usize, max_chars: usize) -> &str {
    let tail = &text[end..];
    let cut = tail
        .char_indices()
        .nth(max_chars)
        .map(|(i, _)| i)
        .unwrap_or(tail.len());
    &tail[..cut]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_after_token() {
        let text = r#"between Acme Corp and <...> (the "Tenant") who agrees"#;
        let start = text.find("<...>").unwrap();
        assert_eq!(
            derive_context_label(text, start, "<...>"),
            Some("Tenant".to_string())
        );
    }

    #[test]
    fn test_alias_after_with_curly_quotes() {
        let text = "between Acme Corp and <...> (the \u{201c}Landlord\u{201d}) who agrees";
        let start = text.find("<...>").unwrap();
        assert_eq!(
            derive_context_label(text, start, "<...>"),
            Some("Landlord".to_string())
        );
    }

    #[test]
    fn test_quoted_phrase_before_token() {
        let text = r#"hereinafter referred to as "Tenant" <...> shall occupy"#;
        let start = text.find("<...>").unwrap();
        assert_eq!(
            derive_context_label(text, start, "<...>"),
            Some("Tenant".to_string())
        );
    }

    #[test]
    fn test_article_phrase_before_token() {
        let text = "payable to the Landlord <...> on the first of each month";
        let start = text.find("<...>").unwrap();
        let label = derive_context_label(text, start, "<...>").unwrap();
        assert_eq!(label.trim(), "Landlord");
    }

    #[test]
    fn test_trailing_words_fallback() {
        let text = "monthly rent amount due: <...>";
        let start = text.find("<...>").unwrap();
        assert_eq!(
            derive_context_label(text, start, "<...>"),
            Some("monthly rent amount due".to_string())
        );
    }

    #[test]
    fn test_no_context_yields_none() {
        assert_eq!(derive_context_label("<...>", 0, "<...>"), None);
        assert_eq!(derive_context_label("!!! <...>", 4, "<...>"), None);
    }

    #[test]
    fn test_windows_respect_char_boundaries() {
        // Multi-byte characters right at the window edge must not panic.
        let prefix = "é".repeat(200);
        let text = format!("{prefix}<...>");
        let start = text.find("<...>").unwrap();
        let _ = derive_context_label(&text, start, "<...>");
    }
}
