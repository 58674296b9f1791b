//! API error mapping.
//!
//! Every boundary failure is reported as a JSON body with a `message`
//! field and an HTTP status: 400 for malformed input, 413 for oversized
//! uploads, 500 for conversion/generation failures.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use chatfill_core::ChatfillError;

/// An HTTP-facing error.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "message": self.message }))).into_response()
    }
}

impl From<ChatfillError> for ApiError {
    fn from(err: ChatfillError) -> Self {
        let status = match &err {
            ChatfillError::InvalidInput(_)
            | ChatfillError::UnsupportedFormat(_)
            | ChatfillError::InvalidAnswer(_) => StatusCode::BAD_REQUEST,
            ChatfillError::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ChatfillError::DocumentError(_)
            | ChatfillError::GenerationFailed(_)
            | ChatfillError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        let too_large: ApiError = ChatfillError::FileTooLarge {
            size_bytes: 9_000_000,
            limit_bytes: 8_388_608,
        }
        .into();
        assert_eq!(too_large.status, StatusCode::PAYLOAD_TOO_LARGE);

        let invalid: ApiError = ChatfillError::InvalidInput("missing file".into()).into();
        assert_eq!(invalid.status, StatusCode::BAD_REQUEST);

        let conversion: ApiError = ChatfillError::DocumentError("bad zip".into()).into();
        assert_eq!(conversion.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
