//! Activity log repository.
//!
//! The log is append-only. Entries are written inside the transaction of the
//! operation they describe, so a rolled-back action leaves no trace.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use amanat_core::dashboard::ActivityEntry;
use amanat_core::workflow::LetterRef;

use super::letter::letter_filter;
use crate::entities::{activity_logs, users};

/// Appends an entry to the activity log.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub async fn record<C: ConnectionTrait>(
    conn: &C,
    letter: LetterRef,
    user_id: Uuid,
    action: &str,
    description: impl Into<String>,
) -> Result<activity_logs::Model, DbErr> {
    let (surat_masuk_id, surat_keluar_id) = letter.to_columns();
    activity_logs::ActiveModel {
        id: Set(Uuid::new_v4()),
        surat_masuk_id: Set(surat_masuk_id),
        surat_keluar_id: Set(surat_keluar_id),
        user_id: Set(user_id),
        action: Set(action.to_string()),
        description: Set(description.into()),
        created_at: Set(Utc::now().into()),
    }
    .insert(conn)
    .await
}

/// Activity log repository for read queries.
#[derive(Debug, Clone)]
pub struct ActivityRepository {
    db: DatabaseConnection,
}

impl ActivityRepository {
    /// Creates a new activity repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists the activity of one letter, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_letter(&self, letter: LetterRef) -> Result<Vec<ActivityEntry>, DbErr> {
        let rows = activity_logs::Entity::find()
            .filter(letter_filter(
                activity_logs::Column::SuratMasukId,
                activity_logs::Column::SuratKeluarId,
                letter,
            ))
            .order_by_asc(activity_logs::Column::CreatedAt)
            .find_also_related(users::Entity)
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().filter_map(to_entry).collect())
    }

    /// Lists the most recent activity across all letters.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn recent(&self, limit: u64) -> Result<Vec<ActivityEntry>, DbErr> {
        let rows = activity_logs::Entity::find()
            .order_by_desc(activity_logs::Column::CreatedAt)
            .limit(limit)
            .find_also_related(users::Entity)
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().filter_map(to_entry).collect())
    }
}

fn to_entry((log, user): (activity_logs::Model, Option<users::Model>)) -> Option<ActivityEntry> {
    Some(ActivityEntry {
        id: log.id,
        letter: LetterRef::from_columns(log.surat_masuk_id, log.surat_keluar_id)?,
        user_id: log.user_id,
        user_name: user.map(|u| u.full_name),
        action: log.action,
        description: log.description,
        created_at: log.created_at.into(),
    })
}
