//! Router construction.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::{download, upload};

pub const MAX_UPLOAD_BYTES: usize = 8 * 1024 * 1024;

/// Application state shared across routes.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Upload size ceiling, enforced before any conversion work runs.
    pub max_upload_bytes: usize,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            max_upload_bytes: MAX_UPLOAD_BYTES,
        }
    }
}

/// Build the Axum router with all API routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    // Body limit sits above the upload ceiling so an oversized file still
    // reaches the handler and gets the 413 message body.
    let body_limit = state.max_upload_bytes + 1024 * 1024;

    Router::new()
        .route("/api/upload", post(upload::upload_template))
        .route("/api/download", post(download::download_document))
        .route("/api/health", get(health))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "chatfill",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
