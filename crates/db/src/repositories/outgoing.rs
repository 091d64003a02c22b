//! Outgoing letter (surat keluar) repository: creation, editing and listing.
//!
//! Status transitions live in `WorkflowRepository`.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use amanat_core::attachment::FileRef;
use amanat_core::auth::Actor;
use amanat_core::workflow::{LetterRef, OutgoingStatus, WorkflowError, WorkflowService};
use amanat_shared::types::{PageRequest, PageResponse};

use super::activity;
use super::letter::{LockedLetter, contains_ci, db_err, purge_dependents, search_term};
use crate::entities::{sea_orm_active_enums::OutgoingLetterStatus, surat_keluar, surat_masuk};

/// Input for submitting an outgoing letter.
#[derive(Debug, Clone)]
pub struct CreateOutgoingInput {
    /// Subject line.
    pub subject: String,
    /// Addressee.
    pub destination: String,
    /// Short content summary.
    pub summary: Option<String>,
    /// Draft file.
    pub file: Option<FileRef>,
    /// Incoming letter this one answers.
    pub reply_to_incoming_id: Option<Uuid>,
}

/// Input for editing an outgoing letter. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateOutgoingInput {
    /// Subject line.
    pub subject: Option<String>,
    /// Addressee.
    pub destination: Option<String>,
    /// Content summary.
    pub summary: Option<String>,
    /// Replacement draft file.
    pub file: Option<FileRef>,
}

/// Filter for listing outgoing letters.
#[derive(Debug, Clone, Default)]
pub struct OutgoingFilter {
    /// Only letters in this status.
    pub status: Option<OutgoingStatus>,
    /// Only letters created by this user.
    pub created_by: Option<Uuid>,
    /// Case-insensitive match on subject, destination or numbers.
    pub search: Option<String>,
}

/// Outgoing letter repository.
#[derive(Debug, Clone)]
pub struct OutgoingLetterRepository {
    db: DatabaseConnection,
}

impl OutgoingLetterRepository {
    /// Creates a new outgoing letter repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Submits a new outgoing letter in status `PENGAJUAN`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The actor's role may not submit letters
    /// - The answered incoming letter does not exist
    /// - Database operation fails
    pub async fn create(
        &self,
        actor: Actor,
        input: CreateOutgoingInput,
    ) -> Result<surat_keluar::Model, WorkflowError> {
        WorkflowService::check_create(actor)?;

        let txn = self.db.begin().await.map_err(db_err)?;

        if let Some(reply_to) = input.reply_to_incoming_id {
            surat_masuk::Entity::find_by_id(reply_to)
                .one(&txn)
                .await
                .map_err(db_err)?
                .ok_or(WorkflowError::LetterNotFound(reply_to))?;
        }

        let now = Utc::now().into();
        let id = Uuid::new_v4();
        let (file_url, file_public_id) =
            input.file.map_or((None, None), |f| (Some(f.url), Some(f.public_id)));
        let letter = surat_keluar::ActiveModel {
            id: Set(id),
            subject: Set(input.subject),
            destination: Set(input.destination),
            summary: Set(input.summary),
            file_url: Set(file_url),
            file_public_id: Set(file_public_id),
            status: Set(OutgoingLetterStatus::Pengajuan),
            created_by: Set(actor.id),
            reply_to_incoming_id: Set(input.reply_to_incoming_id),
            admin_number: Set(None),
            letter_number: Set(None),
            signed_by: Set(None),
            signed_at: Set(None),
            sent_at: Set(None),
            note: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(db_err)?;

        activity::record(
            &txn,
            LetterRef::Outgoing(id),
            actor.id,
            "CREATE",
            format!("Pengajuan surat keluar kepada {}", letter.destination),
        )
        .await
        .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        info!(letter_id = %id, created_by = %actor.id, "Outgoing letter submitted");
        Ok(letter)
    }

    /// Edits an outgoing letter's content.
    ///
    /// Only the creator or the admin may edit, and only while the letter is
    /// `PENGAJUAN`, `DIPROSES` or `DIKEMBALIKAN`.
    ///
    /// # Errors
    ///
    /// Returns `LetterNotFound`, `Forbidden` or `InvalidTransition`.
    pub async fn update(
        &self,
        actor: Actor,
        id: Uuid,
        input: UpdateOutgoingInput,
    ) -> Result<surat_keluar::Model, WorkflowError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let LockedLetter::Outgoing(letter) = LockedLetter::lock(&txn, LetterRef::Outgoing(id)).await?
        else {
            return Err(WorkflowError::LetterNotFound(id));
        };
        WorkflowService::check_edit(letter.status.into(), letter.created_by, actor)?;

        let mut active: surat_keluar::ActiveModel = letter.into();
        if let Some(subject) = input.subject {
            active.subject = Set(subject);
        }
        if let Some(destination) = input.destination {
            active.destination = Set(destination);
        }
        if let Some(summary) = input.summary {
            active.summary = Set(Some(summary));
        }
        if let Some(file) = input.file {
            active.file_url = Set(Some(file.url));
            active.file_public_id = Set(Some(file.public_id));
        }
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(&txn).await.map_err(db_err)?;

        activity::record(
            &txn,
            LetterRef::Outgoing(id),
            actor.id,
            "UPDATE",
            "Isi surat keluar diperbarui",
        )
        .await
        .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(updated)
    }

    /// Finds an outgoing letter by ID.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Database` if the query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<surat_keluar::Model>, WorkflowError> {
        surat_keluar::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)
    }

    /// Lists outgoing letters, newest first.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Database` if the query fails.
    pub async fn list(
        &self,
        filter: &OutgoingFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<surat_keluar::Model>, WorkflowError> {
        let mut query = surat_keluar::Entity::find();
        if let Some(status) = filter.status {
            query = query.filter(surat_keluar::Column::Status.eq(OutgoingLetterStatus::from(status)));
        }
        if let Some(created_by) = filter.created_by {
            query = query.filter(surat_keluar::Column::CreatedBy.eq(created_by));
        }
        if let Some(search) = search_term(filter.search.as_deref()) {
            query = query.filter(
                Condition::any()
                    .add(contains_ci(surat_keluar::Column::Subject, search))
                    .add(contains_ci(surat_keluar::Column::Destination, search))
                    .add(contains_ci(surat_keluar::Column::LetterNumber, search))
                    .add(contains_ci(surat_keluar::Column::AdminNumber, search)),
            );
        }

        let paginator = query
            .order_by_desc(surat_keluar::Column::CreatedAt)
            .paginate(&self.db, page.limit());
        let total = paginator.num_items().await.map_err(db_err)?;
        let data = paginator
            .fetch_page(page.page_index())
            .await
            .map_err(db_err)?;

        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }

    /// Deletes an outgoing letter with everything that hangs off it, in one
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns `LetterNotFound` if the letter does not exist.
    pub async fn delete(&self, actor: Actor, id: Uuid) -> Result<(), WorkflowError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let letter = LetterRef::Outgoing(id);
        LockedLetter::lock(&txn, letter).await?;
        purge_dependents(&txn, letter).await.map_err(db_err)?;
        surat_keluar::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        info!(letter_id = %id, deleted_by = %actor.id, "Outgoing letter deleted");
        Ok(())
    }
}
