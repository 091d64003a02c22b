//! Incoming letter (surat masuk) repository.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use amanat_core::attachment::FileRef;
use amanat_core::auth::Actor;
use amanat_core::workflow::{IncomingStatus, LetterRef, WorkflowError};
use amanat_shared::types::{PageRequest, PageResponse};

use super::activity;
use super::letter::{LockedLetter, contains_ci, db_err, purge_dependents, search_term};
use crate::entities::{sea_orm_active_enums::IncomingLetterStatus, surat_masuk};

/// Input for registering an incoming letter.
#[derive(Debug, Clone)]
pub struct CreateIncomingInput {
    /// Number printed on the letter by the sender.
    pub letter_number: String,
    /// Sender organization or person.
    pub sender: String,
    /// Subject line.
    pub subject: String,
    /// Date on the letter.
    pub letter_date: NaiveDate,
    /// Date the secretariat received it.
    pub received_date: NaiveDate,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Scanned file.
    pub file: Option<FileRef>,
}

/// Input for updating an incoming letter. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateIncomingInput {
    /// Sender's letter number.
    pub letter_number: Option<String>,
    /// Sender.
    pub sender: Option<String>,
    /// Subject line.
    pub subject: Option<String>,
    /// Date on the letter.
    pub letter_date: Option<NaiveDate>,
    /// Date received.
    pub received_date: Option<NaiveDate>,
    /// Notes.
    pub notes: Option<String>,
    /// Replacement file.
    pub file: Option<FileRef>,
    /// Manual follow-up status.
    pub status: Option<IncomingStatus>,
}

/// Filter for listing incoming letters.
#[derive(Debug, Clone, Default)]
pub struct IncomingFilter {
    /// Only letters in this status.
    pub status: Option<IncomingStatus>,
    /// Case-insensitive match on subject, sender or number.
    pub search: Option<String>,
}

/// Incoming letter repository.
#[derive(Debug, Clone)]
pub struct IncomingLetterRepository {
    db: DatabaseConnection,
}

impl IncomingLetterRepository {
    /// Creates a new incoming letter repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Registers an incoming letter in status `DITERIMA`.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Database` if the insert fails.
    pub async fn create(
        &self,
        actor: Actor,
        input: CreateIncomingInput,
    ) -> Result<surat_masuk::Model, WorkflowError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let now = Utc::now().into();
        let id = Uuid::new_v4();
        let (file_url, file_public_id) = split_file(input.file);
        let letter = surat_masuk::ActiveModel {
            id: Set(id),
            letter_number: Set(input.letter_number),
            sender: Set(input.sender),
            subject: Set(input.subject),
            letter_date: Set(input.letter_date),
            received_date: Set(input.received_date),
            notes: Set(input.notes),
            file_url: Set(file_url),
            file_public_id: Set(file_public_id),
            status: Set(IncomingLetterStatus::Diterima),
            created_by: Set(actor.id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(db_err)?;

        activity::record(
            &txn,
            LetterRef::Incoming(id),
            actor.id,
            "CREATE",
            format!("Surat masuk dari {} dicatat", letter.sender),
        )
        .await
        .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        info!(letter_id = %id, created_by = %actor.id, "Incoming letter registered");
        Ok(letter)
    }

    /// Updates an incoming letter.
    ///
    /// # Errors
    ///
    /// Returns `LetterNotFound` if the letter does not exist.
    pub async fn update(
        &self,
        actor: Actor,
        id: Uuid,
        input: UpdateIncomingInput,
    ) -> Result<surat_masuk::Model, WorkflowError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let LockedLetter::Incoming(letter) = LockedLetter::lock(&txn, LetterRef::Incoming(id)).await?
        else {
            return Err(WorkflowError::LetterNotFound(id));
        };

        let mut active: surat_masuk::ActiveModel = letter.into();
        if let Some(letter_number) = input.letter_number {
            active.letter_number = Set(letter_number);
        }
        if let Some(sender) = input.sender {
            active.sender = Set(sender);
        }
        if let Some(subject) = input.subject {
            active.subject = Set(subject);
        }
        if let Some(letter_date) = input.letter_date {
            active.letter_date = Set(letter_date);
        }
        if let Some(received_date) = input.received_date {
            active.received_date = Set(received_date);
        }
        if let Some(notes) = input.notes {
            active.notes = Set(Some(notes));
        }
        if let Some(file) = input.file {
            active.file_url = Set(Some(file.url));
            active.file_public_id = Set(Some(file.public_id));
        }
        if let Some(status) = input.status {
            active.status = Set(status.into());
        }
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(&txn).await.map_err(db_err)?;

        activity::record(
            &txn,
            LetterRef::Incoming(id),
            actor.id,
            "UPDATE",
            "Data surat masuk diperbarui",
        )
        .await
        .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(updated)
    }

    /// Finds an incoming letter by ID.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Database` if the query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<surat_masuk::Model>, WorkflowError> {
        surat_masuk::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)
    }

    /// Lists incoming letters, newest received first.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Database` if the query fails.
    pub async fn list(
        &self,
        filter: &IncomingFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<surat_masuk::Model>, WorkflowError> {
        let mut query = surat_masuk::Entity::find();
        if let Some(status) = filter.status {
            query = query.filter(surat_masuk::Column::Status.eq(IncomingLetterStatus::from(status)));
        }
        if let Some(search) = search_term(filter.search.as_deref()) {
            query = query.filter(
                Condition::any()
                    .add(contains_ci(surat_masuk::Column::Subject, search))
                    .add(contains_ci(surat_masuk::Column::Sender, search))
                    .add(contains_ci(surat_masuk::Column::LetterNumber, search)),
            );
        }

        let paginator = query
            .order_by_desc(surat_masuk::Column::ReceivedDate)
            .order_by_desc(surat_masuk::Column::CreatedAt)
            .paginate(&self.db, page.limit());
        let total = paginator.num_items().await.map_err(db_err)?;
        let data = paginator
            .fetch_page(page.page_index())
            .await
            .map_err(db_err)?;

        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }

    /// Deletes an incoming letter with its routing records, attachments,
    /// activity log and notifications, in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `LetterNotFound` if the letter does not exist.
    pub async fn delete(&self, actor: Actor, id: Uuid) -> Result<(), WorkflowError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let letter = LetterRef::Incoming(id);
        LockedLetter::lock(&txn, letter).await?;
        purge_dependents(&txn, letter).await.map_err(db_err)?;
        surat_masuk::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        info!(letter_id = %id, deleted_by = %actor.id, "Incoming letter deleted");
        Ok(())
    }
}

fn split_file(file: Option<FileRef>) -> (Option<String>, Option<String>) {
    file.map_or((None, None), |f| (Some(f.url), Some(f.public_id)))
}
