//! Attachment service implementation.

use std::future::Future;
use std::sync::Arc;

use uuid::Uuid;

use super::error::AttachmentError;
use super::types::{Attachment, CreateAttachmentInput, MAX_FILE_NAME_LENGTH, NewAttachment};
use crate::auth::Actor;
use crate::workflow::LetterRef;

/// Repository trait for attachment persistence.
///
/// This trait is implemented by the db crate to provide actual database operations.
pub trait AttachmentRepository: Send + Sync {
    /// Create a new attachment record and log it on the letter.
    fn create(
        &self,
        input: CreateAttachmentInput,
    ) -> impl Future<Output = Result<Attachment, AttachmentError>> + Send;

    /// Find attachment by ID.
    fn find_by_id(
        &self,
        id: Uuid,
    ) -> impl Future<Output = Result<Option<Attachment>, AttachmentError>> + Send;

    /// List attachments of a letter, oldest first.
    fn list_by_letter(
        &self,
        letter: LetterRef,
    ) -> impl Future<Output = Result<Vec<Attachment>, AttachmentError>> + Send;

    /// Delete attachment by ID, logging the removal as `actor_id`.
    fn delete(
        &self,
        id: Uuid,
        actor_id: Uuid,
    ) -> impl Future<Output = Result<bool, AttachmentError>> + Send;

    /// Check if the letter exists.
    fn letter_exists(
        &self,
        letter: LetterRef,
    ) -> impl Future<Output = Result<bool, AttachmentError>> + Send;
}

/// Attachment service for managing letter attachments.
pub struct AttachmentService<R: AttachmentRepository> {
    repo: Arc<R>,
}

impl<R: AttachmentRepository> AttachmentService<R> {
    /// Create a new attachment service.
    #[must_use]
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Attach a stored file to a letter.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - File name is blank or too long
    /// - File size is negative
    /// - Letter does not exist
    /// - Database operation fails
    pub async fn add(&self, actor: Actor, input: NewAttachment) -> Result<Attachment, AttachmentError> {
        let file_name = input.file_name.trim().to_string();
        if file_name.is_empty() || file_name.chars().count() > MAX_FILE_NAME_LENGTH {
            return Err(AttachmentError::InvalidFileName);
        }
        if let Some(size) = input.file_size.filter(|s| *s < 0) {
            return Err(AttachmentError::InvalidFileSize(size));
        }

        if !self.repo.letter_exists(input.letter).await? {
            return Err(AttachmentError::LetterNotFound(input.letter.id()));
        }

        self.repo
            .create(CreateAttachmentInput {
                id: Uuid::new_v4(),
                letter: input.letter,
                file_name,
                file: input.file,
                mime_type: input.mime_type.filter(|m| !m.trim().is_empty()),
                file_size: input.file_size,
                uploaded_by: actor.id,
            })
            .await
    }

    /// List attachments of a letter.
    ///
    /// # Errors
    ///
    /// Returns an error if the letter does not exist or the database fails.
    pub async fn list(&self, letter: LetterRef) -> Result<Vec<Attachment>, AttachmentError> {
        if !self.repo.letter_exists(letter).await? {
            return Err(AttachmentError::LetterNotFound(letter.id()));
        }
        self.repo.list_by_letter(letter).await
    }

    /// Delete an attachment. Only the uploader or the admin may delete.
    ///
    /// The file itself stays in the external store.
    pub async fn delete(&self, actor: Actor, attachment_id: Uuid) -> Result<(), AttachmentError> {
        let attachment = self
            .repo
            .find_by_id(attachment_id)
            .await?
            .ok_or(AttachmentError::NotFound(attachment_id))?;

        if !actor.owns_or_admin(attachment.uploaded_by) {
            return Err(AttachmentError::Forbidden(
                "only the uploader or an admin can delete an attachment".to_string(),
            ));
        }

        if !self.repo.delete(attachment_id, actor.id).await? {
            return Err(AttachmentError::NotFound(attachment_id));
        }
        Ok(())
    }
}
