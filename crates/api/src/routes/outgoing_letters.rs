//! Outgoing letter (surat keluar) routes.
//!
//! Content editing lives on the letter resource; status changes go through
//! the action endpoints (`revise`, `validate`, `sign`, `send`).

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{DateTime, FixedOffset};
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
use amanat_core::workflow::{LetterRef, OutgoingStatus, WorkflowError};
use amanat_db::{
    OutgoingLetterRepository, WorkflowRepository,
    entities::surat_keluar,
    repositories::{
        CreateOutgoingInput, OutgoingFilter, SignInput, UpdateOutgoingInput, ValidateInput,
    },
};
use amanat_shared::types::PageResponse;

/// Creates the outgoing letter routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/outgoing-letters", get(list_letters).post(create_letter))
        .route(
            "/outgoing-letters/{letter_id}",
            get(get_letter).patch(update_letter).delete(delete_letter),
        )
        .route("/outgoing-letters/{letter_id}/revise", post(revise_letter))
        .route("/outgoing-letters/{letter_id}/validate", post(validate_letter))
        .route("/outgoing-letters/{letter_id}/sign", post(sign_letter))
        .route("/outgoing-letters/{letter_id}/send", post(send_letter))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing outgoing letters.
#[derive(Debug, Deserialize)]
pub struct ListOutgoingQuery {
    /// Filter by status.
    pub status: Option<String>,
    /// Only letters created by the caller.
    #[serde(default)]
    pub mine: bool,
    /// Search in subject, destination or numbers.
    pub search: Option<String>,
    /// Page number.
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
}

/// Request body for submitting an outgoing letter.
#[derive(Debug, Deserialize)]
pub struct CreateOutgoingRequest {
    /// Subject.
    pub subject: String,
    /// Addressee.
    pub destination: String,
    /// Content summary.
    pub summary: Option<String>,
    /// Draft file.
    pub file: Option<FileRef>,
    /// Incoming letter this one answers.
    pub reply_to_incoming_id: Option<Uuid>,
}

/// Request body for editing an outgoing letter.
#[derive(Debug, Deserialize)]
pub struct UpdateOutgoingRequest {
    /// Subject.
    pub subject: Option<String>,
    /// Addressee.
    pub destination: Option<String>,
    /// Content summary.
    pub summary: Option<String>,
    /// Replacement draft file.
    pub file: Option<FileRef>,
}

/// Request body for `revise`.
#[derive(Debug, Deserialize)]
pub struct ReviseRequest {
    /// The revised file.
    pub file: FileRef,
}

/// Request body for `validate`.
#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    /// Accept/approve or return.
    pub is_valid: bool,
    /// Review note, required when returning.
    pub note: Option<String>,
    /// Admin agenda number.
    pub admin_number: Option<String>,
}

/// Request body for `sign`.
#[derive(Debug, Deserialize)]
pub struct SignRequest {
    /// Sign or return.
    pub is_approved: bool,
    /// Note, required when returning.
    pub note: Option<String>,
}

/// Response for an outgoing letter.
#[derive(Debug, Serialize)]
pub struct OutgoingLetterResponse {
    /// Letter ID.
    pub id: Uuid,
    /// Subject.
    pub subject: String,
    /// Addressee.
    pub destination: String,
    /// Content summary.
    pub summary: Option<String>,
    /// Current file.
    pub file: Option<FileRef>,
    /// Status.
    pub status: OutgoingStatus,
    /// Submitted by.
    pub created_by: Uuid,
    /// Incoming letter this one answers.
    pub reply_to_incoming_id: Option<Uuid>,
    /// Admin agenda number.
    pub admin_number: Option<String>,
    /// Official number, set at signing.
    pub letter_number: Option<String>,
    /// Signer.
    pub signed_by: Option<Uuid>,
    /// Signing time.
    pub signed_at: Option<DateTime<FixedOffset>>,
    /// Dispatch time.
    pub sent_at: Option<DateTime<FixedOffset>>,
    /// Last review note.
    pub note: Option<String>,
    /// Created at.
    pub created_at: DateTime<FixedOffset>,
    /// Updated at.
    pub updated_at: DateTime<FixedOffset>,
}

impl From<surat_keluar::Model> for OutgoingLetterResponse {
    fn from(m: surat_keluar::Model) -> Self {
        Self {
            id: m.id,
            subject: m.subject,
            destination: m.destination,
            summary: m.summary,
            file: FileRef::from_columns(m.file_url, m.file_public_id),
            status: m.status.into(),
            created_by: m.created_by,
            reply_to_incoming_id: m.reply_to_incoming_id,
            admin_number: m.admin_number,
            letter_number: m.letter_number,
            signed_by: m.signed_by,
            signed_at: m.signed_at,
            sent_at: m.sent_at,
            note: m.note,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Outgoing letter with its attachments, routing and activity.
#[derive(Debug, Serialize)]
pub struct OutgoingLetterDetail {
    /// The letter.
    #[serde(flatten)]
    pub letter: OutgoingLetterResponse,
    /// Attachments, routing history and activity log.
    #[serde(flatten)]
    pub trail: LetterTrail,
}

fn workflow_repo(state: &AppState) -> WorkflowRepository {
    WorkflowRepository::with_config((*state.db).clone(), (*state.letter_config).clone())
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /outgoing-letters - List outgoing letters.
async fn list_letters(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListOutgoingQuery>,
) -> ApiResult<Json<PageResponse<OutgoingLetterResponse>>> {
    let filter = OutgoingFilter {
        status: parse_filter("status", query.status.as_deref(), OutgoingStatus::parse)?,
        created_by: query.mine.then(|| auth.user_id()),
        search: query.search,
    };
    let page = PageQuery {
        page: query.page,
        per_page: query.per_page,
    }
    .to_request();

    let letters = OutgoingLetterRepository::new((*state.db).clone())
        .list(&filter, &page)
        .await?;

    Ok(Json(letters.map(OutgoingLetterResponse::from)))
}

/// GET /outgoing-letters/{letter_id} - Get one letter with its trail.
async fn get_letter(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(letter_id): Path<Uuid>,
) -> ApiResult<Json<OutgoingLetterDetail>> {
    let letter = OutgoingLetterRepository::new((*state.db).clone())
        .find_by_id(letter_id)
        .await?
        .ok_or(WorkflowError::LetterNotFound(letter_id))?;
    let trail = letter_trail(&state, LetterRef::Outgoing(letter_id)).await?;

    Ok(Json(OutgoingLetterDetail {
        letter: letter.into(),
        trail,
    }))
}

/// POST /outgoing-letters - Submit an outgoing letter (every role but the signer).
async fn create_letter(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateOutgoingRequest>,
) -> ApiResult<impl IntoResponse> {
    require_role(&auth, &Role::ALL_BUT_TOP)?;

    let input = CreateOutgoingInput {
        subject: required("subject", &payload.subject)?,
        destination: required("destination", &payload.destination)?,
        summary: optional(payload.summary),
        file: file_ref(payload.file)?,
        reply_to_incoming_id: payload.reply_to_incoming_id,
    };

    let letter = OutgoingLetterRepository::new((*state.db).clone())
        .create(auth.actor(), input)
        .await?;

    Ok((StatusCode::CREATED, Json(OutgoingLetterResponse::from(letter))))
}

/// PATCH /outgoing-letters/{letter_id} - Edit content (creator or admin).
async fn update_letter(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(letter_id): Path<Uuid>,
    Json(payload): Json<UpdateOutgoingRequest>,
) -> ApiResult<Json<OutgoingLetterResponse>> {
    let input = UpdateOutgoingInput {
        subject: optional(payload.subject),
        destination: optional(payload.destination),
        summary: payload.summary,
        file: file_ref(payload.file)?,
    };

    let letter = OutgoingLetterRepository::new((*state.db).clone())
        .update(auth.actor(), letter_id, input)
        .await?;

    Ok(Json(letter.into()))
}

/// DELETE /outgoing-letters/{letter_id} - Delete with all dependents (admin).
async fn delete_letter(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(letter_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    require_role(&auth, &[Role::Admin])?;

    OutgoingLetterRepository::new((*state.db).clone())
        .delete(auth.actor(), letter_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /outgoing-letters/{letter_id}/revise - Upload a revised file (admin).
async fn revise_letter(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(letter_id): Path<Uuid>,
    Json(payload): Json<ReviseRequest>,
) -> ApiResult<Json<OutgoingLetterResponse>> {
    require_role(&auth, &[Role::Admin])?;
    let file = file_ref(Some(payload.file))?
        .ok_or_else(|| ApiError::validation("file is required"))?;

    let letter = workflow_repo(&state)
        .revise(auth.actor(), letter_id, file)
        .await?;

    Ok(Json(letter.into()))
}

/// POST /outgoing-letters/{letter_id}/validate - Accept, approve or return.
async fn validate_letter(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(letter_id): Path<Uuid>,
    Json(payload): Json<ValidateRequest>,
) -> ApiResult<Json<OutgoingLetterResponse>> {
    require_role(&auth, &Role::ALL_BUT_TOP)?;

    let input = ValidateInput {
        is_valid: payload.is_valid,
        note: payload.note,
        admin_number: payload.admin_number,
    };
    let letter = workflow_repo(&state)
        .validate(auth.actor(), letter_id, input)
        .await?;

    Ok(Json(letter.into()))
}

/// POST /outgoing-letters/{letter_id}/sign - Sign or return (top approver).
async fn sign_letter(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(letter_id): Path<Uuid>,
    Json(payload): Json<SignRequest>,
) -> ApiResult<Json<OutgoingLetterResponse>> {
    require_role(&auth, &[Role::KetuaPengurus])?;

    let input = SignInput {
        is_approved: payload.is_approved,
        note: payload.note,
    };
    let letter = workflow_repo(&state)
        .sign(auth.actor(), letter_id, input)
        .await?;

    Ok(Json(letter.into()))
}

/// POST /outgoing-letters/{letter_id}/send - Dispatch a signed letter (admin).
async fn send_letter(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(letter_id): Path<Uuid>,
) -> ApiResult<Json<OutgoingLetterResponse>> {
    require_role(&auth, &[Role::Admin])?;

    let letter = workflow_repo(&state).send(auth.actor(), letter_id).await?;

    Ok(Json(letter.into()))
}
