//! Lampiran (attachment) repository.
//!
//! Implements the core `AttachmentRepository` trait. Adding and removing an
//! attachment also writes to the letter's activity log in the same transaction.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use amanat_core::attachment::{
    Attachment, AttachmentError, AttachmentRepository as AttachmentRepoTrait,
    CreateAttachmentInput,
};
use amanat_core::workflow::LetterRef;

use super::activity;
use super::letter::letter_filter;
use crate::entities::{lampiran, surat_keluar, surat_masuk};

/// Attachment repository implementation.
#[derive(Debug, Clone)]
pub struct LampiranRepository {
    db: DatabaseConnection,
}

impl LampiranRepository {
    /// Create a new attachment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl AttachmentRepoTrait for LampiranRepository {
    async fn create(&self, input: CreateAttachmentInput) -> Result<Attachment, AttachmentError> {
        let txn = self.db.begin().await.map_err(repo_err)?;

        let (surat_masuk_id, surat_keluar_id) = input.letter.to_columns();
        let model = lampiran::ActiveModel {
            id: Set(input.id),
            surat_masuk_id: Set(surat_masuk_id),
            surat_keluar_id: Set(surat_keluar_id),
            file_name: Set(input.file_name.clone()),
            url: Set(input.file.url),
            public_id: Set(input.file.public_id),
            mime_type: Set(input.mime_type),
            file_size: Set(input.file_size),
            uploaded_by: Set(input.uploaded_by),
            created_at: Set(Utc::now().into()),
        }
        .insert(&txn)
        .await
        .map_err(repo_err)?;

        activity::record(
            &txn,
            input.letter,
            input.uploaded_by,
            "ATTACH",
            format!("Lampiran ditambahkan: {}", input.file_name),
        )
        .await
        .map_err(repo_err)?;

        txn.commit().await.map_err(repo_err)?;

        info!(
            attachment_id = %model.id,
            letter_id = %input.letter.id(),
            uploaded_by = %model.uploaded_by,
            "Attachment added"
        );

        to_domain(model)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Attachment>, AttachmentError> {
        let model = lampiran::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(repo_err)?;

        model.map(to_domain).transpose()
    }

    async fn list_by_letter(&self, letter: LetterRef) -> Result<Vec<Attachment>, AttachmentError> {
        let models = lampiran::Entity::find()
            .filter(letter_filter(
                lampiran::Column::SuratMasukId,
                lampiran::Column::SuratKeluarId,
                letter,
            ))
            .order_by_asc(lampiran::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        models.into_iter().map(to_domain).collect()
    }

    async fn delete(&self, id: Uuid, actor_id: Uuid) -> Result<bool, AttachmentError> {
        let txn = self.db.begin().await.map_err(repo_err)?;

        let Some(model) = lampiran::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(repo_err)?
        else {
            return Ok(false);
        };
        let letter = letter_of(&model)?;
        let file_name = model.file_name.clone();

        model.delete(&txn).await.map_err(repo_err)?;
        activity::record(
            &txn,
            letter,
            actor_id,
            "DETACH",
            format!("Lampiran dihapus: {file_name}"),
        )
        .await
        .map_err(repo_err)?;

        txn.commit().await.map_err(repo_err)?;

        info!(attachment_id = %id, deleted_by = %actor_id, "Attachment deleted");
        Ok(true)
    }

    async fn letter_exists(&self, letter: LetterRef) -> Result<bool, AttachmentError> {
        let count = match letter {
            LetterRef::Incoming(id) => {
                surat_masuk::Entity::find_by_id(id).count(&self.db).await
            }
            LetterRef::Outgoing(id) => {
                surat_keluar::Entity::find_by_id(id).count(&self.db).await
            }
        }
        .map_err(repo_err)?;

        Ok(count > 0)
    }
}

#[allow(clippy::needless_pass_by_value)]
fn repo_err(e: DbErr) -> AttachmentError {
    AttachmentError::repository(e.to_string())
}

fn letter_of(model: &lampiran::Model) -> Result<LetterRef, AttachmentError> {
    LetterRef::from_columns(model.surat_masuk_id, model.surat_keluar_id)
        .ok_or_else(|| AttachmentError::repository(format!("lampiran {} has no letter", model.id)))
}

fn to_domain(model: lampiran::Model) -> Result<Attachment, AttachmentError> {
    let letter = letter_of(&model)?;
    Ok(Attachment {
        id: model.id,
        letter,
        file_name: model.file_name,
        url: model.url,
        public_id: model.public_id,
        mime_type: model.mime_type,
        file_size: model.file_size,
        uploaded_by: model.uploaded_by,
        created_at: model.created_at.with_timezone(&Utc),
    })
}
