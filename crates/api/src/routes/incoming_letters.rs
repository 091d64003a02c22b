//! Incoming letter (surat masuk) routes.
//!
//! The admin registers, edits and deletes incoming letters; every role may
//! read them.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{LetterTrail, PageQuery, file_ref, letter_trail, optional, parse_filter, required};
use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::{AuthUser, require_role},
};
use amanat_core::attachment::FileRef;
use amanat_core::auth::Role;
use amanat_core::workflow::{IncomingStatus, LetterRef, WorkflowError};
use amanat_db::{
    IncomingLetterRepository,
    entities::surat_masuk,
    repositories::{CreateIncomingInput, IncomingFilter, UpdateIncomingInput},
};
use amanat_shared::types::PageResponse;

/// Creates the incoming letter routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/incoming-letters", get(list_letters).post(create_letter))
        .route(
            "/incoming-letters/{letter_id}",
            get(get_letter).patch(update_letter).delete(delete_letter),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing incoming letters.
#[derive(Debug, Deserialize)]
pub struct ListIncomingQuery {
    /// Filter by status.
    pub status: Option<String>,
    /// Search in subject, sender or number.
    pub search: Option<String>,
    /// Page number.
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
}

/// Request body for registering an incoming letter.
#[derive(Debug, Deserialize)]
pub struct CreateIncomingRequest {
    /// Number printed on the letter.
    pub letter_number: String,
    /// Sender.
    pub sender: String,
    /// Subject.
    pub subject: String,
    /// Date on the letter (YYYY-MM-DD).
    pub letter_date: NaiveDate,
    /// Date received (YYYY-MM-DD).
    pub received_date: NaiveDate,
    /// Notes.
    pub notes: Option<String>,
    /// Scanned file.
    pub file: Option<FileRef>,
}

/// Request body for updating an incoming letter.
#[derive(Debug, Deserialize)]
pub struct UpdateIncomingRequest {
    /// Sender's letter number.
    pub letter_number: Option<String>,
    /// Sender.
    pub sender: Option<String>,
    /// Subject.
    pub subject: Option<String>,
    /// Date on the letter.
    pub letter_date: Option<NaiveDate>,
    /// Date received.
    pub received_date: Option<NaiveDate>,
    /// Notes.
    pub notes: Option<String>,
    /// Replacement file.
    pub file: Option<FileRef>,
    /// Follow-up status.
    pub status: Option<String>,
}

/// Response for an incoming letter.
#[derive(Debug, Serialize)]
pub struct IncomingLetterResponse {
    /// Letter ID.
    pub id: Uuid,
    /// Sender's letter number.
    pub letter_number: String,
    /// Sender.
    pub sender: String,
    /// Subject.
    pub subject: String,
    /// Date on the letter.
    pub letter_date: NaiveDate,
    /// Date received.
    pub received_date: NaiveDate,
    /// Notes.
    pub notes: Option<String>,
    /// Scanned file.
    pub file: Option<FileRef>,
    /// Status.
    pub status: IncomingStatus,
    /// Registered by.
    pub created_by: Uuid,
    /// Created at.
    pub created_at: DateTime<FixedOffset>,
    /// Updated at.
    pub updated_at: DateTime<FixedOffset>,
}

impl From<surat_masuk::Model> for IncomingLetterResponse {
    fn from(m: surat_masuk::Model) -> Self {
        Self {
            id: m.id,
            letter_number: m.letter_number,
            sender: m.sender,
            subject: m.subject,
            letter_date: m.letter_date,
            received_date: m.received_date,
            notes: m.notes,
            file: FileRef::from_columns(m.file_url, m.file_public_id),
            status: m.status.into(),
            created_by: m.created_by,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Incoming letter with its attachments, routing and activity.
#[derive(Debug, Serialize)]
pub struct IncomingLetterDetail {
    /// The letter.
    #[serde(flatten)]
    pub letter: IncomingLetterResponse,
    /// Attachments, routing history and activity log.
    #[serde(flatten)]
    pub trail: LetterTrail,
}

fn check_dates(letter_date: NaiveDate, received_date: NaiveDate) -> Result<(), ApiError> {
    if received_date < letter_date {
        return Err(ApiError::validation(
            "received_date cannot be before letter_date",
        ));
    }
    Ok(())
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /incoming-letters - List incoming letters.
async fn list_letters(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListIncomingQuery>,
) -> ApiResult<Json<PageResponse<IncomingLetterResponse>>> {
    let filter = IncomingFilter {
        status: parse_filter("status", query.status.as_deref(), IncomingStatus::parse)?,
        search: query.search,
    };
    let page = PageQuery {
        page: query.page,
        per_page: query.per_page,
    }
    .to_request();

    let letters = IncomingLetterRepository::new((*state.db).clone())
        .list(&filter, &page)
        .await?;

    Ok(Json(letters.map(IncomingLetterResponse::from)))
}

/// GET /incoming-letters/{letter_id} - Get one letter with its trail.
async fn get_letter(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(letter_id): Path<Uuid>,
) -> ApiResult<Json<IncomingLetterDetail>> {
    let letter = IncomingLetterRepository::new((*state.db).clone())
        .find_by_id(letter_id)
        .await?
        .ok_or(WorkflowError::LetterNotFound(letter_id))?;
    let trail = letter_trail(&state, LetterRef::Incoming(letter_id)).await?;

    Ok(Json(IncomingLetterDetail {
        letter: letter.into(),
        trail,
    }))
}

/// POST /incoming-letters - Register an incoming letter (admin).
async fn create_letter(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateIncomingRequest>,
) -> ApiResult<impl IntoResponse> {
    require_role(&auth, &[Role::Admin])?;
    check_dates(payload.letter_date, payload.received_date)?;

    let input = CreateIncomingInput {
        letter_number: required("letter_number", &payload.letter_number)?,
        sender: required("sender", &payload.sender)?,
        subject: required("subject", &payload.subject)?,
        letter_date: payload.letter_date,
        received_date: payload.received_date,
        notes: optional(payload.notes),
        file: file_ref(payload.file)?,
    };

    let letter = IncomingLetterRepository::new((*state.db).clone())
        .create(auth.actor(), input)
        .await?;

    Ok((StatusCode::CREATED, Json(IncomingLetterResponse::from(letter))))
}

/// PATCH /incoming-letters/{letter_id} - Update an incoming letter (admin).
async fn update_letter(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(letter_id): Path<Uuid>,
    Json(payload): Json<UpdateIncomingRequest>,
) -> ApiResult<Json<IncomingLetterResponse>> {
    require_role(&auth, &[Role::Admin])?;
    if let (Some(letter_date), Some(received_date)) = (payload.letter_date, payload.received_date)
    {
        check_dates(letter_date, received_date)?;
    }

    let input = UpdateIncomingInput {
        letter_number: optional(payload.letter_number),
        sender: optional(payload.sender),
        subject: optional(payload.subject),
        letter_date: payload.letter_date,
        received_date: payload.received_date,
        notes: payload.notes,
        file: file_ref(payload.file)?,
        status: parse_filter("status", payload.status.as_deref(), IncomingStatus::parse)?,
    };

    let letter = IncomingLetterRepository::new((*state.db).clone())
        .update(auth.actor(), letter_id, input)
        .await?;

    Ok(Json(letter.into()))
}

/// DELETE /incoming-letters/{letter_id} - Delete with all dependents (admin).
async fn delete_letter(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(letter_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    require_role(&auth, &[Role::Admin])?;

    IncomingLetterRepository::new((*state.db).clone())
        .delete(auth.actor(), letter_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
