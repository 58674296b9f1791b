//! Completed-document download boundary.
//!
//! Accepts the final markup and the original file name, regenerates a
//! `.docx`, and streams it back as an attachment named
//! `<original>-completed.docx`.

use std::sync::LazyLock;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;
use serde::Deserialize;
use tracing::{error, info};

use chatfill_document::{generate_docx, DOCX_CONTENT_TYPE};

use crate::error::ApiError;

static DOCX_SUFFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\.docx$").unwrap());

/// `encodeURIComponent`-compatible set: everything except ASCII
/// alphanumerics and `-_.!~*'()` is escaped.
const FILENAME_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadRequest {
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
}

/// Handler for `POST /api/download`.
pub async fn download_document(
    Json(payload): Json<DownloadRequest>,
) -> Result<Response, ApiError> {
    let html = payload
        .html
        .filter(|h| !h.is_empty())
        .ok_or_else(|| ApiError::bad_request("HTML content is required."))?;
    let file_name = payload
        .file_name
        .filter(|f| !f.is_empty())
        .ok_or_else(|| ApiError::bad_request("File name is required."))?;

    let wrapped = wrap_markup(&html);
    let bytes = match tokio::task::spawn_blocking(move || generate_docx(&wrapped)).await {
        Ok(Ok(bytes)) => bytes,
        Ok(Err(e)) => {
            error!(error = %e, "document generation failed");
            return Err(ApiError::internal(format!(
                "Failed to generate document: {e}"
            )));
        }
        Err(e) => {
            error!(error = %e, "document generation task panicked");
            return Err(ApiError::internal(
                "We couldn't generate the download. Please try again.",
            ));
        }
    };

    if bytes.is_empty() {
        error!("document generation produced an empty buffer");
        return Err(ApiError::internal(
            "We couldn't generate the download. Please try again.",
        ));
    }

    let friendly_name = completed_file_name(&file_name);
    let encoded_name = utf8_percent_encode(&friendly_name, FILENAME_SET).to_string();
    info!(file = %friendly_name, size_bytes = bytes.len(), "generated completed document");

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, DOCX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{encoded_name}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// Wraps substituted body markup in a full document shell for generation.
pub(crate) fn wrap_markup(content: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\" /></head><body>{content}</body></html>"
    )
}

/// Derives the download file name by swapping a trailing `.docx` for
/// `-completed.docx`. Names without the suffix are left unchanged.
pub(crate) fn completed_file_name(file_name: &str) -> String {
    DOCX_SUFFIX
        .replace(file_name, "-completed.docx")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completed_file_name() {
        assert_eq!(completed_file_name("lease.docx"), "lease-completed.docx");
        assert_eq!(completed_file_name("LEASE.DOCX"), "LEASE-completed.docx");
        assert_eq!(completed_file_name("notes.txt"), "notes.txt");
    }

    #[test]
    fn test_filename_percent_encoding_matches_encode_uri_component() {
        let encoded =
            utf8_percent_encode("my lease (v2)-completed.docx", FILENAME_SET).to_string();
        assert_eq!(encoded, "my%20lease%20(v2)-completed.docx");
    }

    #[test]
    fn test_wrap_markup_embeds_body() {
        let wrapped = wrap_markup("<p>done</p>");
        assert!(wrapped.starts_with("<!DOCTYPE html>"));
        assert!(wrapped.contains("<body><p>done</p></body>"));
    }
}
