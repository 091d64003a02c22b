//! Notification repository.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, sea_query::Expr,
};
use uuid::Uuid;

use amanat_core::workflow::LetterRef;
use amanat_shared::types::{PageRequest, PageResponse};

use crate::entities::notifications;

/// Inserts an unread notification for `user_id`.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub async fn notify<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    title: impl Into<String>,
    message: impl Into<String>,
    letter: Option<LetterRef>,
) -> Result<notifications::Model, DbErr> {
    let (surat_masuk_id, surat_keluar_id) = letter.map_or((None, None), LetterRef::to_columns);
    notifications::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        title: Set(title.into()),
        message: Set(message.into()),
        surat_masuk_id: Set(surat_masuk_id),
        surat_keluar_id: Set(surat_keluar_id),
        is_read: Set(false),
        created_at: Set(Utc::now().into()),
    }
    .insert(conn)
    .await
}

/// Notification repository for a user's inbox.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    db: DatabaseConnection,
}

impl NotificationRepository {
    /// Creates a new notification repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists a user's notifications, unread first, newest first within each group.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        unread_only: bool,
        page: &PageRequest,
    ) -> Result<PageResponse<notifications::Model>, DbErr> {
        let mut query = notifications::Entity::find()
            .filter(notifications::Column::UserId.eq(user_id));
        if unread_only {
            query = query.filter(notifications::Column::IsRead.eq(false));
        }

        let paginator = query
            .order_by_asc(notifications::Column::IsRead)
            .order_by_desc(notifications::Column::CreatedAt)
            .paginate(&self.db, page.limit());
        let total = paginator.num_items().await?;
        let data = paginator.fetch_page(page.page_index()).await?;

        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }

    /// Marks one of the user's notifications as read.
    ///
    /// Returns `false` if no such notification belongs to the user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn mark_read(&self, user_id: Uuid, id: Uuid) -> Result<bool, DbErr> {
        let result = notifications::Entity::update_many()
            .col_expr(notifications::Column::IsRead, Expr::value(true))
            .filter(notifications::Column::Id.eq(id))
            .filter(notifications::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    /// Marks all of the user's notifications as read. Returns how many changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn mark_all_read(&self, user_id: Uuid) -> Result<u64, DbErr> {
        let result = notifications::Entity::update_many()
            .col_expr(notifications::Column::IsRead, Expr::value(true))
            .filter(notifications::Column::UserId.eq(user_id))
            .filter(notifications::Column::IsRead.eq(false))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }

    /// Counts the user's unread notifications.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn unread_count(&self, user_id: Uuid) -> Result<u64, DbErr> {
        notifications::Entity::find()
            .filter(notifications::Column::UserId.eq(user_id))
            .filter(notifications::Column::IsRead.eq(false))
            .count(&self.db)
            .await
    }
}
