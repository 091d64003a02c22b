//! Disposisi (routing) repository.
//!
//! Routing a letter forwards it to another user: the sender's own pending
//! record is closed as `DITERUSKAN`, the letter status follows the routing
//! table, and the recipient gets a new `PENDING` record and a notification.
//! Everything happens in one transaction under the letter row lock.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DatabaseTransaction,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
    sea_query::Expr,
};
use tracing::info;
use uuid::Uuid;

use amanat_core::auth::{Actor, Role};
use amanat_core::workflow::{
    IncomingStatus, LetterRef, LetterStatus, OutgoingStatus, Recipient, RoutingStatus,
    RoutingTable, WorkflowError, WorkflowService,
};
use amanat_shared::types::{PageRequest, PageResponse};

use super::letter::{LockedLetter, db_err, letter_filter};
use super::{activity, notification};
use crate::entities::{disposisi, sea_orm_active_enums::DisposisiStatus, users};

/// Input for routing a letter.
#[derive(Debug, Clone)]
pub struct RouteInput {
    /// The letter being routed.
    pub letter: LetterRef,
    /// Recipient user.
    pub to_user_id: Uuid,
    /// What the recipient should do.
    pub instruction: String,
    /// Optional deadline.
    pub due_date: Option<NaiveDate>,
}

/// Disposisi repository.
#[derive(Debug, Clone)]
pub struct DispositionRepository {
    db: DatabaseConnection,
}

impl DispositionRepository {
    /// Creates a new disposition repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Routes a letter to another user.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The recipient does not exist, is inactive, or is the actor
    /// - The instruction is blank
    /// - The letter does not exist
    /// - Database operation fails
    pub async fn route(
        &self,
        actor: Actor,
        input: RouteInput,
    ) -> Result<disposisi::Model, WorkflowError> {
        let to_user = users::Entity::find_by_id(input.to_user_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(WorkflowError::UserNotFound(input.to_user_id))?;
        let recipient = Recipient {
            id: to_user.id,
            role: Role::from(to_user.role),
            is_active: to_user.is_active,
        };
        let instruction = WorkflowService::check_route(actor, &recipient, &input.instruction)?;

        let txn = self.db.begin().await.map_err(db_err)?;

        let locked = LockedLetter::lock(&txn, input.letter).await?;
        let subject = locked.subject().to_string();

        let superseded = supersede_pending(&txn, input.letter, actor.id, recipient.id).await?;

        let current = locked.status();
        let next = RoutingTable::next_letter_status(
            current,
            recipient.role.class(),
            locked.has_admin_number(),
        );
        if next != current {
            locked.set_status(&txn, next).await?;
        }

        let (surat_masuk_id, surat_keluar_id) = input.letter.to_columns();
        let now = Utc::now();
        let record = disposisi::ActiveModel {
            id: Set(Uuid::new_v4()),
            from_user_id: Set(actor.id),
            to_user_id: Set(recipient.id),
            surat_masuk_id: Set(surat_masuk_id),
            surat_keluar_id: Set(surat_keluar_id),
            instruction: Set(instruction.clone()),
            due_date: Set(input.due_date),
            status: Set(DisposisiStatus::Pending),
            completed_at: Set(None),
            completion_note: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&txn)
        .await
        .map_err(db_err)?;

        activity::record(
            &txn,
            input.letter,
            actor.id,
            "ROUTE",
            format!("Didisposisikan kepada {}: {instruction}", to_user.full_name),
        )
        .await
        .map_err(db_err)?;

        notification::notify(
            &txn,
            recipient.id,
            "Disposisi baru",
            format!("Anda menerima disposisi untuk surat \"{subject}\": {instruction}"),
            Some(input.letter),
        )
        .await
        .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        info!(
            disposition_id = %record.id,
            letter_id = %input.letter.id(),
            letter_kind = input.letter.kind(),
            from_user = %actor.id,
            to_user = %recipient.id,
            superseded,
            status = %next,
            "Letter routed"
        );

        Ok(record)
    }

    /// Marks a routing record done and closes its letter.
    ///
    /// The first completion closes the whole letter, whatever other records
    /// are still pending.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The record does not exist
    /// - The actor is neither the recipient nor the admin
    /// - The record is no longer pending
    /// - Database operation fails
    pub async fn complete(
        &self,
        actor: Actor,
        id: Uuid,
        note: Option<String>,
    ) -> Result<disposisi::Model, WorkflowError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        // Letter lock first, then the record, same order as `route`.
        let record = find_record(&txn, id).await?;
        let letter = record
            .letter()
            .ok_or_else(|| WorkflowError::Database(format!("disposisi {id} has no letter")))?;
        let locked = LockedLetter::lock(&txn, letter).await?;

        let record = disposisi::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(WorkflowError::RoutingNotFound(id))?;
        WorkflowService::check_complete(id, record.status.into(), record.to_user_id, actor)?;

        let now = Utc::now();
        let note = note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
        let from_user_id = record.from_user_id;
        let mut active: disposisi::ActiveModel = record.into();
        active.status = Set(DisposisiStatus::Selesai);
        active.completed_at = Set(Some(now.into()));
        active.completion_note = Set(note.clone());
        active.updated_at = Set(now.into());
        let updated = active.update(&txn).await.map_err(db_err)?;

        let closed = match letter {
            LetterRef::Incoming(_) => LetterStatus::Incoming(IncomingStatus::Selesai),
            LetterRef::Outgoing(_) => LetterStatus::Outgoing(OutgoingStatus::Selesai),
        };
        let subject = locked.subject().to_string();
        locked.set_status(&txn, closed).await?;

        let description = match &note {
            Some(note) => format!("Disposisi diselesaikan: {note}"),
            None => "Disposisi diselesaikan".to_string(),
        };
        activity::record(&txn, letter, actor.id, "COMPLETE", description)
            .await
            .map_err(db_err)?;

        if from_user_id != actor.id {
            notification::notify(
                &txn,
                from_user_id,
                "Disposisi selesai",
                format!("Disposisi untuk surat \"{subject}\" telah diselesaikan"),
                Some(letter),
            )
            .await
            .map_err(db_err)?;
        }

        txn.commit().await.map_err(db_err)?;

        info!(
            disposition_id = %id,
            letter_id = %letter.id(),
            completed_by = %actor.id,
            "Disposition completed, letter closed"
        );

        Ok(updated)
    }

    /// Finds a routing record by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<disposisi::Model>, WorkflowError> {
        disposisi::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)
    }

    /// Lists records addressed to `user_id`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn inbox(
        &self,
        user_id: Uuid,
        status: Option<RoutingStatus>,
        page: &PageRequest,
    ) -> Result<PageResponse<disposisi::Model>, WorkflowError> {
        self.list_by(disposisi::Column::ToUserId, user_id, status, page)
            .await
    }

    /// Lists records sent by `user_id`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn outbox(
        &self,
        user_id: Uuid,
        status: Option<RoutingStatus>,
        page: &PageRequest,
    ) -> Result<PageResponse<disposisi::Model>, WorkflowError> {
        self.list_by(disposisi::Column::FromUserId, user_id, status, page)
            .await
    }

    async fn list_by(
        &self,
        column: disposisi::Column,
        user_id: Uuid,
        status: Option<RoutingStatus>,
        page: &PageRequest,
    ) -> Result<PageResponse<disposisi::Model>, WorkflowError> {
        let mut query = disposisi::Entity::find().filter(column.eq(user_id));
        if let Some(status) = status {
            query = query.filter(disposisi::Column::Status.eq(DisposisiStatus::from(status)));
        }

        let paginator = query
            .order_by_desc(disposisi::Column::CreatedAt)
            .paginate(&self.db, page.limit());
        let total = paginator.num_items().await.map_err(db_err)?;
        let data = paginator
            .fetch_page(page.page_index())
            .await
            .map_err(db_err)?;

        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }

    /// Lists the routing history of a letter, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn history(&self, letter: LetterRef) -> Result<Vec<disposisi::Model>, WorkflowError> {
        disposisi::Entity::find()
            .filter(letter_filter(
                disposisi::Column::SuratMasukId,
                disposisi::Column::SuratKeluarId,
                letter,
            ))
            .order_by_asc(disposisi::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)
    }

    /// Counts records pending for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn pending_count(&self, user_id: Uuid) -> Result<u64, WorkflowError> {
        disposisi::Entity::find()
            .filter(disposisi::Column::ToUserId.eq(user_id))
            .filter(disposisi::Column::Status.eq(DisposisiStatus::Pending))
            .count(&self.db)
            .await
            .map_err(db_err)
    }
}

async fn find_record(
    txn: &DatabaseTransaction,
    id: Uuid,
) -> Result<disposisi::Model, WorkflowError> {
    disposisi::Entity::find_by_id(id)
        .one(txn)
        .await
        .map_err(db_err)?
        .ok_or(WorkflowError::RoutingNotFound(id))
}

/// Closes the actor's pending records on the letter and any pending record
/// already addressed to the recipient. Returns the number of rows closed.
async fn supersede_pending(
    txn: &DatabaseTransaction,
    letter: LetterRef,
    actor_id: Uuid,
    to_user_id: Uuid,
) -> Result<u64, WorkflowError> {
    let result = disposisi::Entity::update_many()
        .col_expr(disposisi::Column::Status, DisposisiStatus::Diteruskan.as_enum())
        .col_expr(disposisi::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(letter_filter(
            disposisi::Column::SuratMasukId,
            disposisi::Column::SuratKeluarId,
            letter,
        ))
        .filter(disposisi::Column::Status.eq(DisposisiStatus::Pending))
        .filter(
            Condition::any()
                .add(disposisi::Column::ToUserId.eq(actor_id))
                .add(disposisi::Column::ToUserId.eq(to_user_id)),
        )
        .exec(txn)
        .await
        .map_err(db_err)?;
    Ok(result.rows_affected)
}
