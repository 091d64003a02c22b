//! Dashboard repository: letter counts, personal queues and recent activity.

use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QuerySelect,
};
use uuid::Uuid;

use amanat_core::dashboard::{
    DashboardSummary, RECENT_ACTIVITY_LIMIT, incoming_counts, outgoing_counts,
};
use amanat_core::workflow::{IncomingStatus, OutgoingStatus};

use super::ActivityRepository;
use crate::entities::{
    disposisi, notifications,
    sea_orm_active_enums::{DisposisiStatus, IncomingLetterStatus, OutgoingLetterStatus},
    surat_keluar, surat_masuk,
};

/// Dashboard repository.
#[derive(Debug, Clone)]
pub struct DashboardRepository {
    db: DatabaseConnection,
}

impl DashboardRepository {
    /// Creates a new dashboard repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Builds the dashboard of `user_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if any database query fails.
    pub async fn summary(&self, user_id: Uuid) -> Result<DashboardSummary, DbErr> {
        let incoming = self.incoming_by_status().await?;
        let outgoing = self.outgoing_by_status().await?;

        let pending_routing = disposisi::Entity::find()
            .filter(disposisi::Column::ToUserId.eq(user_id))
            .filter(disposisi::Column::Status.eq(DisposisiStatus::Pending))
            .count(&self.db)
            .await?;
        let unread_notifications = notifications::Entity::find()
            .filter(notifications::Column::UserId.eq(user_id))
            .filter(notifications::Column::IsRead.eq(false))
            .count(&self.db)
            .await?;

        let recent_activity = ActivityRepository::new(self.db.clone())
            .recent(RECENT_ACTIVITY_LIMIT)
            .await?;

        Ok(DashboardSummary {
            incoming_total: incoming.iter().map(|(_, n)| n).sum(),
            outgoing_total: outgoing.iter().map(|(_, n)| n).sum(),
            incoming_by_status: incoming_counts(&incoming),
            outgoing_by_status: outgoing_counts(&outgoing),
            pending_routing: to_i64(pending_routing),
            unread_notifications: to_i64(unread_notifications),
            recent_activity,
        })
    }

    async fn incoming_by_status(&self) -> Result<Vec<(IncomingStatus, i64)>, DbErr> {
        let rows: Vec<(IncomingLetterStatus, i64)> = surat_masuk::Entity::find()
            .select_only()
            .column(surat_masuk::Column::Status)
            .column_as(surat_masuk::Column::Id.count(), "count")
            .group_by(surat_masuk::Column::Status)
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(|(s, n)| (s.into(), n)).collect())
    }

    async fn outgoing_by_status(&self) -> Result<Vec<(OutgoingStatus, i64)>, DbErr> {
        let rows: Vec<(OutgoingLetterStatus, i64)> = surat_keluar::Entity::find()
            .select_only()
            .column(surat_keluar::Column::Status)
            .column_as(surat_keluar::Column::Id.count(), "count")
            .group_by(surat_keluar::Column::Status)
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(|(s, n)| (s.into(), n)).collect())
    }
}

fn to_i64(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
