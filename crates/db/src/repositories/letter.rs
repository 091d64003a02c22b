//! Helpers shared by the repositories that work on either letter kind.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QuerySelect, Set,
    sea_query::{Expr, Func, IntoColumnRef, LikeExpr, SimpleExpr},
};

use amanat_core::workflow::{LetterRef, LetterStatus, WorkflowError};

use crate::entities::{activity_logs, disposisi, lampiran, notifications, surat_keluar, surat_masuk};

/// Maps a database error into the workflow error taxonomy.
pub(crate) fn db_err(e: DbErr) -> WorkflowError {
    WorkflowError::Database(e.to_string())
}

/// Builds the filter selecting rows that belong to `letter`.
pub(crate) fn letter_filter<C: ColumnTrait>(masuk: C, keluar: C, letter: LetterRef) -> SimpleExpr {
    match letter {
        LetterRef::Incoming(id) => masuk.eq(id),
        LetterRef::Outgoing(id) => keluar.eq(id),
    }
}

/// Case-insensitive substring match on a text column. `%`, `_` and `\` in
/// the needle match literally.
pub(crate) fn contains_ci<C: IntoColumnRef>(column: C, needle: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column)))
        .like(LikeExpr::new(contains_pattern(needle)).escape('\\'))
}

fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Returns the trimmed search term, or `None` when blank.
pub(crate) fn search_term(search: Option<&str>) -> Option<&str> {
    search.map(str::trim).filter(|s| !s.is_empty())
}

/// A letter row held under `SELECT .. FOR UPDATE`.
#[derive(Debug, Clone)]
pub(crate) enum LockedLetter {
    Incoming(surat_masuk::Model),
    Outgoing(surat_keluar::Model),
}

impl LockedLetter {
    /// Locks the letter row for the rest of the transaction.
    pub(crate) async fn lock(
        txn: &DatabaseTransaction,
        letter: LetterRef,
    ) -> Result<Self, WorkflowError> {
        let locked = match letter {
            LetterRef::Incoming(id) => surat_masuk::Entity::find_by_id(id)
                .lock_exclusive()
                .one(txn)
                .await
                .map_err(db_err)?
                .map(Self::Incoming),
            LetterRef::Outgoing(id) => surat_keluar::Entity::find_by_id(id)
                .lock_exclusive()
                .one(txn)
                .await
                .map_err(db_err)?
                .map(Self::Outgoing),
        };
        locked.ok_or(WorkflowError::LetterNotFound(letter.id()))
    }

    pub(crate) fn status(&self) -> LetterStatus {
        match self {
            Self::Incoming(m) => LetterStatus::Incoming(m.status.into()),
            Self::Outgoing(m) => LetterStatus::Outgoing(m.status.into()),
        }
    }

    pub(crate) fn subject(&self) -> &str {
        match self {
            Self::Incoming(m) => &m.subject,
            Self::Outgoing(m) => &m.subject,
        }
    }

    pub(crate) fn has_admin_number(&self) -> bool {
        match self {
            Self::Incoming(_) => false,
            Self::Outgoing(m) => m.admin_number.as_deref().is_some_and(|n| !n.trim().is_empty()),
        }
    }

    /// Persists a new status (and bumps `updated_at`).
    pub(crate) async fn set_status(
        self,
        txn: &DatabaseTransaction,
        status: LetterStatus,
    ) -> Result<(), WorkflowError> {
        let now = Utc::now().into();
        match (self, status) {
            (Self::Incoming(m), LetterStatus::Incoming(s)) => {
                let mut active: surat_masuk::ActiveModel = m.into();
                active.status = Set(s.into());
                active.updated_at = Set(now);
                active.update(txn).await.map_err(db_err)?;
            }
            (Self::Outgoing(m), LetterStatus::Outgoing(s)) => {
                let mut active: surat_keluar::ActiveModel = m.into();
                active.status = Set(s.into());
                active.updated_at = Set(now);
                active.update(txn).await.map_err(db_err)?;
            }
            (_, status) => {
                return Err(WorkflowError::Database(format!(
                    "status {status} does not belong to this letter kind"
                )));
            }
        }
        Ok(())
    }
}

/// Deletes every row that hangs off a letter: notifications, activity log,
/// attachments and routing records. The letter itself is left to the caller.
pub(crate) async fn purge_dependents<C: ConnectionTrait>(
    conn: &C,
    letter: LetterRef,
) -> Result<(), DbErr> {
    notifications::Entity::delete_many()
        .filter(letter_filter(
            notifications::Column::SuratMasukId,
            notifications::Column::SuratKeluarId,
            letter,
        ))
        .exec(conn)
        .await?;
    activity_logs::Entity::delete_many()
        .filter(letter_filter(
            activity_logs::Column::SuratMasukId,
            activity_logs::Column::SuratKeluarId,
            letter,
        ))
        .exec(conn)
        .await?;
    lampiran::Entity::delete_many()
        .filter(letter_filter(
            lampiran::Column::SuratMasukId,
            lampiran::Column::SuratKeluarId,
            letter,
        ))
        .exec(conn)
        .await?;
    disposisi::Entity::delete_many()
        .filter(letter_filter(
            disposisi::Column::SuratMasukId,
            disposisi::Column::SuratKeluarId,
            letter,
        ))
        .exec(conn)
        .await?;
    Ok(())
}
