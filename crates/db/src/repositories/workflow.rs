//! Workflow repository for outgoing-letter state transitions.
//!
//! Every action runs in one transaction: lock the letter row, ask
//! `WorkflowService` for the transition, apply it, append the activity log.
//! Signing also mints the official number from the sequence counter inside
//! the same transaction.

use std::time::Duration;

use chrono::{DateTime, Datelike, Utc};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DatabaseTransaction, DbErr, RuntimeErr, Set,
    TransactionTrait,
};
use tracing::{info, warn};
use uuid::Uuid;

use amanat_core::attachment::FileRef;
use amanat_core::auth::Actor;
use amanat_core::workflow::{
    LetterNumber, LetterRef, OutgoingStatus, WorkflowAction, WorkflowError, WorkflowService,
};
use amanat_shared::LetterConfig;

use super::activity;
use super::letter::{LockedLetter, db_err};
use super::sequence;
use crate::entities::surat_keluar;

/// Attempts made to sign a letter before giving up with `NumberConflict`.
pub const SIGN_MAX_ATTEMPTS: u32 = 3;

/// Base backoff between signing attempts; attempt `n` waits `n * base`.
const SIGN_RETRY_BACKOFF: Duration = Duration::from_millis(25);

/// Input for the validate action.
#[derive(Debug, Clone, Default)]
pub struct ValidateInput {
    /// Accept/approve (`true`) or return (`false`).
    pub is_valid: bool,
    /// Review note, required when returning.
    pub note: Option<String>,
    /// Admin agenda number, required when the admin accepts a letter without one.
    pub admin_number: Option<String>,
}

/// Input for the sign action.
#[derive(Debug, Clone, Default)]
pub struct SignInput {
    /// Sign (`true`) or return (`false`).
    pub is_approved: bool,
    /// Note, required when returning.
    pub note: Option<String>,
}

/// Workflow repository for outgoing-letter state transitions.
#[derive(Debug, Clone)]
pub struct WorkflowRepository {
    db: DatabaseConnection,
    letter_config: LetterConfig,
}

impl WorkflowRepository {
    /// Creates a new workflow repository using the default number codes.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_config(db, LetterConfig::default())
    }

    /// Creates a new workflow repository with explicit number codes.
    #[must_use]
    pub const fn with_config(db: DatabaseConnection, letter_config: LetterConfig) -> Self {
        Self { db, letter_config }
    }

    /// Admin replaces the file of a letter under rework.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Letter is not found
    /// - Actor is not the admin
    /// - Letter is not `DIPROSES` or `DIKEMBALIKAN`
    /// - Database operation fails
    pub async fn revise(
        &self,
        actor: Actor,
        letter_id: Uuid,
        file: FileRef,
    ) -> Result<surat_keluar::Model, WorkflowError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let letter = lock_outgoing(&txn, letter_id).await?;

        let action = WorkflowService::revise(letter.status.into(), actor)?;

        let mut active: surat_keluar::ActiveModel = letter.into();
        active.file_url = Set(Some(file.url));
        active.file_public_id = Set(Some(file.public_id));
        let updated = apply(&txn, active, &action, actor, "Revisi surat diunggah")
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        info!(letter_id = %letter_id, revised_by = %actor.id, "Outgoing letter revised");
        Ok(updated)
    }

    /// Validates or returns a letter.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Letter is not found
    /// - Actor's role may not validate from the current status
    /// - A return has no note, or an admin acceptance has no admin number
    /// - Database operation fails
    pub async fn validate(
        &self,
        actor: Actor,
        letter_id: Uuid,
        input: ValidateInput,
    ) -> Result<surat_keluar::Model, WorkflowError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let letter = lock_outgoing(&txn, letter_id).await?;

        let action = WorkflowService::validate(
            letter.status.into(),
            actor,
            input.is_valid,
            input.note,
            input.admin_number,
            letter.admin_number.as_deref(),
        )?;

        let description = if action.new_status() == OutgoingStatus::Dikembalikan {
            "Surat dikembalikan untuk diperbaiki"
        } else {
            "Surat divalidasi"
        };
        let mut active: surat_keluar::ActiveModel = letter.into();
        if let WorkflowAction::Validate {
            note, admin_number, ..
        } = &action
        {
            if let Some(note) = note {
                active.note = Set(Some(note.clone()));
            }
            if let Some(admin_number) = admin_number {
                active.admin_number = Set(Some(admin_number.clone()));
            }
        }
        let updated = apply(&txn, active, &action, actor, description)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        info!(
            letter_id = %letter_id,
            validated_by = %actor.id,
            status = %action.new_status(),
            "Outgoing letter validated"
        );
        Ok(updated)
    }

    /// The top approver signs or returns a letter.
    ///
    /// Signing mints the official number. Serialization failures and duplicate
    /// numbers are retried up to `SIGN_MAX_ATTEMPTS` times with linear backoff;
    /// a duplicate also advances the counter past the taken value first.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Letter is not found
    /// - Actor is not the top approver, or the letter is not `MENUNGGU_TTD`
    /// - A return has no note
    /// - Number minting still conflicts after retrying (`NumberConflict`)
    /// - Database operation fails
    pub async fn sign(
        &self,
        actor: Actor,
        letter_id: Uuid,
        input: SignInput,
    ) -> Result<surat_keluar::Model, WorkflowError> {
        let mut attempt = 1;
        loop {
            match self.sign_once(actor, letter_id, &input).await {
                Ok(updated) => return Ok(updated),
                Err(AttemptError::Workflow(e)) => return Err(e),
                Err(AttemptError::Db(e)) if is_retryable(&e) && attempt < SIGN_MAX_ATTEMPTS => {
                    warn!(letter_id = %letter_id, attempt, error = %e, "Signing conflicted, retrying");
                    if is_unique_violation(&e) {
                        self.skip_taken_number().await.map_err(db_err)?;
                    }
                    tokio::time::sleep(SIGN_RETRY_BACKOFF * attempt).await;
                    attempt += 1;
                }
                Err(AttemptError::Db(e)) if is_retryable(&e) => {
                    warn!(letter_id = %letter_id, attempt, error = %e, "Signing conflicted, giving up");
                    return Err(WorkflowError::NumberConflict);
                }
                Err(AttemptError::Db(e)) => return Err(db_err(e)),
            }
        }
    }

    async fn sign_once(
        &self,
        actor: Actor,
        letter_id: Uuid,
        input: &SignInput,
    ) -> Result<surat_keluar::Model, AttemptError> {
        let txn = self.db.begin().await?;
        let letter = lock_outgoing(&txn, letter_id).await?;

        let action = WorkflowService::sign(
            letter.status.into(),
            actor,
            input.is_approved,
            input.note.clone(),
        )?;
        let WorkflowAction::Sign {
            signed_by,
            signed_at,
            note,
            ..
        } = &action
        else {
            return Err(WorkflowError::Database("unexpected sign action".to_string()).into());
        };

        let existing_number = letter.letter_number.clone();
        let mut active: surat_keluar::ActiveModel = letter.into();
        if let Some(note) = note {
            active.note = Set(Some(note.clone()));
        }

        let description = if action.assigns_number() {
            let number = match existing_number {
                Some(number) => number,
                None => self.mint_number(&txn, *signed_at).await?,
            };
            active.letter_number = Set(Some(number.clone()));
            active.signed_by = Set(Some(*signed_by));
            active.signed_at = Set(Some((*signed_at).into()));
            format!("Surat ditandatangani dengan nomor {number}")
        } else {
            "Surat dikembalikan oleh penandatangan".to_string()
        };

        let updated = apply(&txn, active, &action, actor, &description).await?;
        txn.commit().await?;

        info!(
            letter_id = %letter_id,
            signed_by = %actor.id,
            letter_number = ?updated.letter_number,
            status = %action.new_status(),
            "Outgoing letter signature decided"
        );
        Ok(updated)
    }

    /// Advances the counter past a number that already exists.
    ///
    /// A duplicate number means the counter fell behind the stored letters;
    /// the sign transaction rolled its own increment back, so the skip is
    /// committed on its own and the next attempt mints the following value.
    async fn skip_taken_number(&self) -> Result<(), DbErr> {
        let year = Utc::now().year();
        let skipped = sequence::next_in(&self.db, year, &self.letter_config.number_code).await?;
        warn!(
            year,
            code = %self.letter_config.number_code,
            skipped,
            "Letter number already taken, counter advanced"
        );
        Ok(())
    }

    async fn mint_number(
        &self,
        txn: &DatabaseTransaction,
        signed_at: DateTime<Utc>,
    ) -> Result<String, DbErr> {
        let number = LetterNumber::new(
            0,
            self.letter_config.number_code.clone(),
            self.letter_config.organization_code.clone(),
            signed_at,
        );
        let sequence = sequence::next_in(txn, number.year, &number.code).await?;
        Ok(LetterNumber { sequence, ..number }.to_string())
    }

    /// Admin dispatches a signed letter.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Letter is not found
    /// - Actor is not the admin
    /// - Letter is not `DITANDATANGANI`
    /// - Database operation fails
    pub async fn send(
        &self,
        actor: Actor,
        letter_id: Uuid,
    ) -> Result<surat_keluar::Model, WorkflowError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let letter = lock_outgoing(&txn, letter_id).await?;

        let action = WorkflowService::send(letter.status.into(), actor)?;

        let mut active: surat_keluar::ActiveModel = letter.into();
        if let WorkflowAction::Send { sent_at, .. } = &action {
            active.sent_at = Set(Some((*sent_at).into()));
        }
        let updated = apply(&txn, active, &action, actor, "Surat dikirim")
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        info!(letter_id = %letter_id, sent_by = %actor.id, "Outgoing letter sent");
        Ok(updated)
    }
}

/// Failure of one signing attempt, keeping the raw `DbErr` for retry decisions.
#[derive(Debug)]
enum AttemptError {
    Workflow(WorkflowError),
    Db(DbErr),
}

impl From<WorkflowError> for AttemptError {
    fn from(e: WorkflowError) -> Self {
        Self::Workflow(e)
    }
}

impl From<DbErr> for AttemptError {
    fn from(e: DbErr) -> Self {
        Self::Db(e)
    }
}

/// Postgres SQLSTATE of a database error, if the driver reported one.
fn sql_state(err: &DbErr) -> Option<String> {
    let (DbErr::Exec(runtime) | DbErr::Query(runtime) | DbErr::Conn(runtime)) = err else {
        return None;
    };
    let RuntimeErr::SqlxError(sqlx::Error::Database(db_error)) = runtime else {
        return None;
    };
    db_error.code().map(std::borrow::Cow::into_owned)
}

/// Returns true for serialization failures (`40001`) and unique violations (`23505`).
pub(crate) fn is_retryable(err: &DbErr) -> bool {
    matches!(sql_state(err).as_deref(), Some("40001" | "23505"))
}

fn is_unique_violation(err: &DbErr) -> bool {
    sql_state(err).as_deref() == Some("23505")
}

async fn lock_outgoing(
    txn: &DatabaseTransaction,
    letter_id: Uuid,
) -> Result<surat_keluar::Model, WorkflowError> {
    match LockedLetter::lock(txn, LetterRef::Outgoing(letter_id)).await? {
        LockedLetter::Outgoing(letter) => Ok(letter),
        LockedLetter::Incoming(_) => Err(WorkflowError::LetterNotFound(letter_id)),
    }
}

/// Writes the new status and appends the activity log entry.
///
/// Returns the raw `DbErr` so signing can tell a duplicate number apart.
async fn apply(
    txn: &DatabaseTransaction,
    mut active: surat_keluar::ActiveModel,
    action: &WorkflowAction,
    actor: Actor,
    description: &str,
) -> Result<surat_keluar::Model, DbErr> {
    active.status = Set(action.new_status().into());
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(txn).await?;

    activity::record(
        txn,
        LetterRef::Outgoing(updated.id),
        actor.id,
        action.log_code(),
        description,
    )
    .await?;

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;
    use std::error::Error as StdError;
    use std::fmt;

    use sqlx::error::{DatabaseError, ErrorKind};

    /// Driver error carrying only a SQLSTATE.
    #[derive(Debug)]
    struct SqlState(&'static str);

    impl fmt::Display for SqlState {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "database error {}", self.0)
        }
    }

    impl StdError for SqlState {}

    impl DatabaseError for SqlState {
        fn message(&self) -> &str {
            "database error"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed(self.0))
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            match self.0 {
                "23505" => ErrorKind::UniqueViolation,
                _ => ErrorKind::Other,
            }
        }
    }

    fn query_err(code: &'static str) -> DbErr {
        DbErr::Query(RuntimeErr::SqlxError(sqlx::Error::Database(Box::new(
            SqlState(code),
        ))))
    }

    #[test]
    fn test_retryable_codes() {
        assert!(is_retryable(&query_err("40001")));
        assert!(is_retryable(&query_err("23505")));
        assert!(is_retryable(&DbErr::Exec(RuntimeErr::SqlxError(
            sqlx::Error::Database(Box::new(SqlState("40001")))
        ))));
    }

    #[test]
    fn test_other_errors_are_not_retried() {
        assert!(!is_retryable(&query_err("23503")));
        assert!(!is_retryable(&query_err("P0001")));
        assert!(!is_retryable(&DbErr::RecordNotFound("surat_keluar".to_string())));
        assert!(!is_retryable(&DbErr::Custom("boom".to_string())));
        assert!(!is_retryable(&DbErr::Query(RuntimeErr::Internal(
            "closed".to_string()
        ))));
    }

    #[test]
    fn test_only_duplicates_skip_the_counter() {
        assert!(is_unique_violation(&query_err("23505")));
        assert!(!is_unique_violation(&query_err("40001")));
        assert!(!is_unique_violation(&DbErr::Custom("23505".to_string())));
    }
}
