//! Markup rendering for filled templates.
//!
//! Replaces placeholder tokens in the extracted markup with collected
//! answers, in two flavors: a download rendering (answered tokens replaced,
//! the rest left verbatim) and a preview rendering (every token wrapped in
//! a highlight marker carrying its fill state).

pub mod escape;
pub mod substitute;

pub use escape::escape_html;
pub use substitute::{apply_download_markup, apply_preview_markup};
