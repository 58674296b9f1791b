//! Sequential placeholder substitution.
//!
//! Replacement walks the placeholder sequence in order, each pass operating
//! on the cumulative result of the previous ones, and replaces every
//! occurrence of the placeholder's raw token. An answer may itself contain
//! another placeholder's raw token as a substring, so the passes must not
//! be reordered or batched.

use std::collections::HashMap;

use chatfill_core::Placeholder;

use crate::escape::{display_value, escape_html};

/// Produces the markup used for document generation: answered placeholders
/// are replaced with their escaped answers, unanswered ones keep their raw
/// token text verbatim.
pub fn apply_download_markup(
    markup: &str,
    placeholders: &[Placeholder],
    answers: &HashMap<String, String>,
) -> String {
    let mut updated = markup.to_string();
    for placeholder in placeholders {
        match answers.get(&placeholder.id) {
            Some(answer) if !answer.is_empty() => {
                updated = updated.replace(&placeholder.raw, &display_value(answer));
            }
            _ => {}
        }
    }
    updated
}

/// Produces the preview markup: every placeholder occurrence is wrapped in
/// a `<mark>` carrying its id and fill state, showing the escaped answer
/// when one exists and the escaped raw token otherwise. The placeholder
/// currently being edited is additionally tagged active.
pub fn apply_preview_markup(
    markup: &str,
    placeholders: &[Placeholder],
    answers: &HashMap<String, String>,
    active_id: Option<&str>,
) -> String {
    let mut updated = markup.to_string();
    for placeholder in placeholders {
        let answer = answers.get(&placeholder.id).filter(|a| !a.is_empty());
        let is_active = active_id == Some(placeholder.id.as_str());

        let mut classes = vec!["filled-value"];
        classes.push(if answer.is_some() {
            "is-filled"
        } else {
            "is-pending"
        });
        if is_active {
            classes.push("is-active");
        }

        let display = match answer {
            Some(answer) => display_value(answer),
            None => escape_html(&placeholder.raw),
        };

        let mut attributes = vec![
            format!(r#"class="{}""#, classes.join(" ")),
            format!(r#"data-placeholder-id="{}""#, placeholder.id),
            format!(
                r#"data-state="{}""#,
                if answer.is_some() { "filled" } else { "pending" }
            ),
        ];
        if is_active {
            attributes.push(r#"title="Currently editing""#.to_string());
        }

        let replacement = format!("<mark {}>{display}</mark>", attributes.join(" "));
        updated = updated.replace(&placeholder.raw, &replacement);
    }
    updated
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placeholder(id: &str, raw: &str) -> Placeholder {
        Placeholder {
            id: id.into(),
            raw: raw.into(),
            label: "Test".into(),
            question: "Please provide the Test.".into(),
        }
    }

    #[test]
    fn test_download_replaces_every_occurrence() {
        let placeholders = vec![placeholder("name-1", "{{Name}}")];
        let answers = HashMap::from([("name-1".to_string(), "Acme".to_string())]);
        let out = apply_download_markup(
            "<p>{{Name}} sells to {{Name}}</p>",
            &placeholders,
            &answers,
        );
        assert_eq!(out, "<p>Acme sells to Acme</p>");
    }

    #[test]
    fn test_download_keeps_unanswered_raw_verbatim() {
        let placeholders = vec![
            placeholder("name-1", "{{Name}}"),
            placeholder("city-2", "[City]"),
        ];
        let answers = HashMap::from([("name-1".to_string(), "Acme".to_string())]);
        let out = apply_download_markup("<p>{{Name}} of [City]</p>", &placeholders, &answers);
        assert_eq!(out, "<p>Acme of [City]</p>");
    }

    #[test]
    fn test_download_escapes_answers() {
        let placeholders = vec![placeholder("name-1", "{{Name}}")];
        let answers = HashMap::from([("name-1".to_string(), "A & B\nLtd".to_string())]);
        let out = apply_download_markup("<p>{{Name}}</p>", &placeholders, &answers);
        assert_eq!(out, "<p>A &amp; B<br />Ltd</p>");
    }

    #[test]
    fn test_substitution_is_sequential_and_cumulative() {
        // The first answer injects the second placeholder's raw token; the
        // second pass then replaces it inside the first answer too.
        let placeholders = vec![
            placeholder("a-1", "{{A}}"),
            placeholder("b-2", "{{B}}"),
        ];
        let answers = HashMap::from([
            ("a-1".to_string(), "see {{B}}".to_string()),
            ("b-2".to_string(), "below".to_string()),
        ]);
        let out = apply_download_markup("<p>{{A}} / {{B}}</p>", &placeholders, &answers);
        assert_eq!(out, "<p>see below / below</p>");
    }

    #[test]
    fn test_preview_wraps_pending_and_filled() {
        let placeholders = vec![
            placeholder("name-1", "{{Name}}"),
            placeholder("city-2", "[City]"),
        ];
        let answers = HashMap::from([("name-1".to_string(), "Acme".to_string())]);
        let out = apply_preview_markup(
            "<p>{{Name}} of [City]</p>",
            &placeholders,
            &answers,
            Some("city-2"),
        );
        assert!(out.contains(
            r#"<mark class="filled-value is-filled" data-placeholder-id="name-1" data-state="filled">Acme</mark>"#
        ));
        assert!(out.contains(
            r#"<mark class="filled-value is-pending is-active" data-placeholder-id="city-2" data-state="pending" title="Currently editing">[City]</mark>"#
        ));
    }

    #[test]
    fn test_preview_escapes_raw_token_display() {
        let placeholders = vec![placeholder("field-1", "<Tenant>")];
        let out = apply_preview_markup("<p><Tenant></p>", &placeholders, &HashMap::new(), None);
        assert!(out.contains(">&lt;Tenant&gt;</mark>"));
    }
}
