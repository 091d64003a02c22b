//! Attachment types and data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::AttachmentError;
use crate::workflow::LetterRef;

/// Maximum length of a stored file name.
pub const MAX_FILE_NAME_LENGTH: usize = 255;

/// A file held by the external cloud store.
///
/// Only the public URL and the store's identifier cross the boundary;
/// uploads happen between the client and the store directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    /// Public URL of the file.
    pub url: String,
    /// Identifier of the file in the store.
    pub public_id: String,
}

impl FileRef {
    /// Creates a file reference after validating both parts.
    ///
    /// # Errors
    ///
    /// Returns `AttachmentError::InvalidFile` if the URL is not http(s) or the
    /// public id is blank.
    pub fn new(url: impl Into<String>, public_id: impl Into<String>) -> Result<Self, AttachmentError> {
        let url = url.into().trim().to_string();
        let public_id = public_id.into().trim().to_string();
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(AttachmentError::InvalidFile(format!("invalid url: {url}")));
        }
        if public_id.is_empty() {
            return Err(AttachmentError::InvalidFile("public_id is required".to_string()));
        }
        Ok(Self { url, public_id })
    }

    /// Builds a reference from the nullable column pair used in storage.
    #[must_use]
    pub fn from_columns(url: Option<String>, public_id: Option<String>) -> Option<Self> {
        Some(Self {
            url: url?,
            public_id: public_id?,
        })
    }
}

/// Input for adding an attachment to a letter.
#[derive(Debug, Clone)]
pub struct NewAttachment {
    /// Letter to attach to.
    pub letter: LetterRef,
    /// Original file name.
    pub file_name: String,
    /// Stored file.
    pub file: FileRef,
    /// MIME type of the file.
    pub mime_type: Option<String>,
    /// File size in bytes.
    pub file_size: Option<i64>,
}

/// Input for creating an attachment record.
#[derive(Debug, Clone)]
pub struct CreateAttachmentInput {
    /// Attachment ID.
    pub id: Uuid,
    /// Letter to attach to.
    pub letter: LetterRef,
    /// Original file name.
    pub file_name: String,
    /// Stored file.
    pub file: FileRef,
    /// MIME type of the file.
    pub mime_type: Option<String>,
    /// File size in bytes.
    pub file_size: Option<i64>,
    /// User who uploaded the file.
    pub uploaded_by: Uuid,
}

/// Attachment record (lampiran).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    /// Attachment ID.
    pub id: Uuid,
    /// Letter the file belongs to.
    pub letter: LetterRef,
    /// Original file name.
    pub file_name: String,
    /// Public URL of the file.
    pub url: String,
    /// Identifier of the file in the store.
    pub public_id: String,
    /// MIME type.
    pub mime_type: Option<String>,
    /// File size in bytes.
    pub file_size: Option<i64>,
    /// User who uploaded the file.
    pub uploaded_by: Uuid,
    /// Upload timestamp.
    pub created_at: DateTime<Utc>,
}
