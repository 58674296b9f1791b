//! Word document conversion.
//!
//! A `.docx` file is a zip package whose `word/document.xml` carries the
//! content as WordprocessingML. This crate converts a package into plain
//! text (for placeholder extraction) and into an HTML subset (for preview
//! and substitution), and converts that same HTML subset back into a
//! `.docx` package for download. The supported subset is paragraphs,
//! Heading1–3 styles, bold/italic runs, and explicit line breaks; both
//! directions round-trip it.

pub mod extract;
pub mod generate;
mod xml;

pub use extract::{extract_markup, extract_text};
pub use generate::generate_docx;

/// MIME type for generated `.docx` responses.
pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
