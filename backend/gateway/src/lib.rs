//! Chatfill HTTP API Server
//!
//! Exposes the upload and download boundaries of the template-completion
//! pipeline, plus a health probe.

pub mod download;
pub mod error;
pub mod server;
pub mod upload;

pub use error::ApiError;
pub use server::{build_router, AppState};
