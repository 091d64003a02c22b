//! Letter attachments (lampiran).
//!
//! This module provides business logic for file attachments including:
//! - File reference validation
//! - Attaching files to incoming or outgoing letters
//! - Deletion by the uploader or the admin

mod error;
mod service;
mod types;

pub use error::AttachmentError;
pub use service::{AttachmentRepository, AttachmentService};
pub use types::{Attachment, CreateAttachmentInput, FileRef, MAX_FILE_NAME_LENGTH, NewAttachment};
