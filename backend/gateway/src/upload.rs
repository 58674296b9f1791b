//! Template upload boundary.
//!
//! Accepts a multipart `.docx` upload, converts it to plain text and
//! markup concurrently, and returns the markup together with the detected
//! placeholder sequence.

use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

use chatfill_core::{ChatfillError, Placeholder};
use chatfill_placeholders::extract_placeholders;

use crate::error::ApiError;
use crate::server::AppState;

const INVALID_FILE_MESSAGE: &str = "A valid .docx file is required.";
const CONVERSION_FAILED_MESSAGE: &str =
    "We were unable to process that document. Please ensure it's a valid .docx template.";

/// Response body for a processed upload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub file_name: String,
    pub html: String,
    pub placeholders: Vec<Placeholder>,
}

/// Handler for `POST /api/upload`.
pub async fn upload_template(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::bad_request(INVALID_FILE_MESSAGE))?
    {
        if field.name() == Some("file") {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|_| ApiError::bad_request(INVALID_FILE_MESSAGE))?;
            upload = Some((file_name, bytes.to_vec()));
            break;
        }
    }

    let (file_name, bytes) =
        upload.ok_or_else(|| ApiError::bad_request(INVALID_FILE_MESSAGE))?;

    if !is_docx_name(&file_name) {
        return Err(ApiError::bad_request(
            "Only .docx files are supported right now.",
        ));
    }

    if bytes.len() > state.max_upload_bytes {
        return Err(ApiError::payload_too_large(
            "File is too large. Please upload a document smaller than 8 MB.",
        ));
    }

    let request_id = Uuid::new_v4();
    info!(%request_id, file = %file_name, size_bytes = bytes.len(), "processing uploaded template");

    // Text and markup extraction read the same bytes independently.
    let text_bytes = bytes.clone();
    let (text, html) = tokio::join!(
        tokio::task::spawn_blocking(move || chatfill_document::extract_text(&text_bytes)),
        tokio::task::spawn_blocking(move || chatfill_document::extract_markup(&bytes)),
    );
    let text = flatten_conversion(text)?;
    let html = flatten_conversion(html)?;

    let placeholders = extract_placeholders(&text);
    info!(%request_id, placeholders = placeholders.len(), "template processed");

    Ok(Json(UploadResponse {
        file_name,
        html,
        placeholders,
    }))
}

pub(crate) fn is_docx_name(file_name: &str) -> bool {
    file_name.to_lowercase().ends_with(".docx")
}

fn flatten_conversion(
    joined: Result<Result<String, ChatfillError>, tokio::task::JoinError>,
) -> Result<String, ApiError> {
    match joined {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => {
            error!(error = %e, "document conversion failed");
            Err(ApiError::internal(CONVERSION_FAILED_MESSAGE))
        }
        Err(e) => {
            error!(error = %e, "document conversion task panicked");
            Err(ApiError::internal(CONVERSION_FAILED_MESSAGE))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_docx_name_check() {
        assert!(is_docx_name("lease.docx"));
        assert!(is_docx_name("LEASE.DOCX"));
        assert!(!is_docx_name("lease.doc"));
        assert!(!is_docx_name("lease.pdf"));
        assert!(!is_docx_name(""));
    }
}
