//! Attachment error types.

use thiserror::Error;
use uuid::Uuid;

/// Attachment operation errors.
#[derive(Debug, Error)]
pub enum AttachmentError {
    /// Attachment not found.
    #[error("attachment not found: {0}")]
    NotFound(Uuid),

    /// Letter not found.
    #[error("letter not found: {0}")]
    LetterNotFound(Uuid),

    /// File name is blank or too long.
    #[error("invalid file name")]
    InvalidFileName,

    /// File reference is malformed.
    #[error("invalid file: {0}")]
    InvalidFile(String),

    /// File size is negative.
    #[error("invalid file size: {0}")]
    InvalidFileSize(i64),

    /// Repository operation failed.
    #[error("repository error: {0}")]
    Repository(String),

    /// Only the uploader or the admin may delete.
    #[error("forbidden: {0}")]
    Forbidden(String),
}

impl AttachmentError {
    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) | Self::LetterNotFound(_) => 404,
            Self::InvalidFileName | Self::InvalidFile(_) | Self::InvalidFileSize(_) => 400,
            Self::Forbidden(_) => 403,
            Self::Repository(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "ATTACHMENT_NOT_FOUND",
            Self::LetterNotFound(_) => "LETTER_NOT_FOUND",
            Self::InvalidFileName | Self::InvalidFile(_) | Self::InvalidFileSize(_) => {
                "VALIDATION_ERROR"
            }
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Repository(_) => "DATABASE_ERROR",
        }
    }
}
