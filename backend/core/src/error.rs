use thiserror::Error;

/// Top-level error type for the Chatfill service.
#[derive(Debug, Error)]
pub enum ChatfillError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("file too large: {size_bytes} bytes (limit {limit_bytes})")]
    FileTooLarge {
        size_bytes: usize,
        limit_bytes: usize,
    },

    #[error("document conversion failed: {0}")]
    DocumentError(String),

    #[error("document generation failed: {0}")]
    GenerationFailed(String),

    #[error("invalid answer: {0}")]
    InvalidAnswer(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
