//! Placeholder detection for legal templates.
//!
//! Scans free text for bracket/delimiter-style blanks (`{{...}}`, `[[...]]`,
//! `<<...>>`, `<...>`, `[...]`, `__...__`, `**...**`), derives a
//! human-readable label for each (from the token content, or from the
//! surrounding text when the content itself is not usable), and builds the
//! question the conversation asks for it.

pub mod context;
pub mod date;
pub mod extract;
pub mod label;
mod patterns;

pub use date::{is_date_label, DATE_LIKE_KEYWORDS};
pub use extract::extract_placeholders;
pub use label::{build_question, format_label, slug_from_label};
