use serde::{Deserialize, Serialize};

/// A detected blank in an uploaded template.
///
/// Produced once per extraction run and immutable afterwards. `raw` is the
/// verbatim delimited token as found in the source text (e.g. `{{Tenant
/// Name}}`) and is the substitution target; `id` keys the answer map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placeholder {
    /// Slug of the label plus the discovery sequence number, e.g.
    /// `tenant-name-1`. Unique within one extraction run.
    pub id: String,
    /// The exact token text, delimiters included.
    pub raw: String,
    /// Human-formatted, title-cased name for the blank.
    pub label: String,
    /// Natural-language prompt shown to the user for this blank.
    pub question: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_serialization() {
        let p = Placeholder {
            id: "tenant-name-1".into(),
            raw: "{{Tenant Name}}".into(),
            label: "Tenant Name".into(),
            question: "Please provide the Tenant Name.".into(),
        };
        let json = serde_json::to_string(&p).unwrap();
        let back: Placeholder = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
        assert!(json.contains("\"raw\":\"{{Tenant Name}}\""));
    }
}
