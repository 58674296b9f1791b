//! The ordered token pattern table.
//!
//! Order matters twice: emission order is grouped by pattern type (all
//! `{{...}}` matches across the document come before any `[[...]]` match),
//! and an earlier pattern wins the dedup slot for a value a later pattern
//! would also find.

use std::sync::LazyLock;

use regex::Regex;

pub(crate) struct TokenPattern {
    pub regex: Regex,
    /// Strips the pattern's delimiters from a raw match.
    pub strip: fn(&str) -> &str,
}

pub(crate) static PATTERNS: LazyLock<Vec<TokenPattern>> = LazyLock::new(|| {
    vec![
        TokenPattern {
            regex: Regex::new(r"\{\{([^{}]+)\}\}").unwrap(),
            strip: strip_double,
        },
        TokenPattern {
            regex: Regex::new(r"\[\[([^\[\]]+)\]\]").unwrap(),
            strip: strip_double,
        },
        TokenPattern {
            regex: Regex::new(r"<<([^<>]+)>>").unwrap(),
            strip: strip_double,
        },
        TokenPattern {
            regex: Regex::new(r"<([^<>]+)>").unwrap(),
            strip: strip_single,
        },
        TokenPattern {
            regex: Regex::new(r"\[([^\[\]]+)\]").unwrap(),
            strip: strip_single,
        },
        TokenPattern {
            regex: Regex::new(r"__([^_]+?)__").unwrap(),
            strip: strip_underscores,
        },
        TokenPattern {
            regex: Regex::new(r"\*\*([^*]+?)\*\*").unwrap(),
            strip: strip_asterisks,
        },
    ]
});

// Delimiters are ASCII, so byte slicing is safe here.
fn strip_double(raw: &str) -> &str {
    &raw[2..raw.len() - 2]
}

fn strip_single(raw: &str) -> &str {
    &raw[1..raw.len() - 1]
}

fn strip_underscores(raw: &str) -> &str {
    raw.trim_matches('_')
}

fn strip_asterisks(raw: &str) -> &str {
    raw.trim_matches('*')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_delimiters() {
        assert_eq!(strip_double("{{Tenant}}"), "Tenant");
        assert_eq!(strip_single("[Tenant]"), "Tenant");
        assert_eq!(strip_underscores("__Tenant__"), "Tenant");
        assert_eq!(strip_asterisks("**Tenant**"), "Tenant");
    }

    #[test]
    fn test_single_angle_does_not_cross_brackets() {
        let p = &PATTERNS[3];
        let m = p.regex.find("a <Tenant> and <Landlord>").unwrap();
        assert_eq!(m.as_str(), "<Tenant>");
    }
}
