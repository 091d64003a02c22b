//! Sequence counter repository for official letter numbers.
//!
//! Each `(year, code)` pair owns one counter row. Incrementing is a single
//! `INSERT .. ON CONFLICT DO UPDATE .. RETURNING` statement, so concurrent
//! callers serialize on the row lock and never see the same value.

use sea_orm::{
    ConnectionTrait, DatabaseConnection, DbBackend, DbErr, EntityTrait, Statement,
};

use crate::entities::sequence_counters;

const NEXT_VALUE_SQL: &str = r"
INSERT INTO sequence_counters (year, code, value, updated_at)
VALUES ($1, $2, 1, now())
ON CONFLICT (year, code)
DO UPDATE SET value = sequence_counters.value + 1, updated_at = now()
RETURNING value
";

/// Increments and returns the counter for `(year, code)` on `conn`.
///
/// Run it on a transaction to tie the increment to the caller's outcome:
/// a rollback also rolls back the increment, so no number is skipped.
///
/// # Errors
///
/// Returns an error if the statement fails.
pub async fn next_in<C: ConnectionTrait>(conn: &C, year: i32, code: &str) -> Result<i32, DbErr> {
    let row = conn
        .query_one(Statement::from_sql_and_values(
            DbBackend::Postgres,
            NEXT_VALUE_SQL,
            [year.into(), code.into()],
        ))
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("sequence counter {year}/{code}")))?;
    row.try_get::<i32>("", "value")
}

/// Sequence counter repository.
#[derive(Debug, Clone)]
pub struct SequenceRepository {
    db: DatabaseConnection,
    code: String,
}

impl SequenceRepository {
    /// Creates a repository minting numbers for the letter-type `code`.
    #[must_use]
    pub fn new(db: DatabaseConnection, code: impl Into<String>) -> Self {
        Self {
            db,
            code: code.into(),
        }
    }

    /// Returns the next value for `year` under the configured code.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    pub async fn next(&self, year: i32) -> Result<i32, DbErr> {
        next_in(&self.db, year, &self.code).await
    }

    /// Returns the next value for `(year, code)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    pub async fn next_for(&self, year: i32, code: &str) -> Result<i32, DbErr> {
        next_in(&self.db, year, code).await
    }

    /// Returns the last value handed out for `(year, code)`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn current(&self, year: i32, code: &str) -> Result<Option<i32>, DbErr> {
        Ok(sequence_counters::Entity::find_by_id((year, code.to_string()))
            .one(&self.db)
            .await?
            .map(|row| row.value))
    }
}
