//! Attachment (lampiran) routes.
//!
//! Files are uploaded by the client straight to the cloud store; the API
//! only records the resulting `(url, public_id)` pair against a letter.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use super::LetterKind;
use crate::{AppState, error::ApiResult, middleware::AuthUser};
use amanat_core::attachment::{Attachment, AttachmentService, FileRef, NewAttachment};
use amanat_db::LampiranRepository;

/// Creates the attachment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/attachments", get(list_attachments).post(add_attachment))
        .route("/attachments/{attachment_id}", delete(delete_attachment))
}

/// Query parameters selecting a letter.
#[derive(Debug, Deserialize)]
pub struct LetterQuery {
    /// `incoming` or `outgoing`.
    pub letter_type: LetterKind,
    /// Letter ID.
    pub letter_id: Uuid,
}

/// Request body for adding an attachment.
#[derive(Debug, Deserialize)]
pub struct AddAttachmentRequest {
    /// `incoming` or `outgoing`.
    pub letter_type: LetterKind,
    /// Letter ID.
    pub letter_id: Uuid,
    /// Original file name.
    pub file_name: String,
    /// Public URL in the store.
    pub url: String,
    /// Store identifier.
    pub public_id: String,
    /// MIME type.
    pub mime_type: Option<String>,
    /// Size in bytes.
    pub file_size: Option<i64>,
}

fn service(state: &AppState) -> AttachmentService<LampiranRepository> {
    AttachmentService::new(Arc::new(LampiranRepository::new((*state.db).clone())))
}

/// GET /attachments?letter_type=&letter_id= - List a letter's attachments.
async fn list_attachments(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<LetterQuery>,
) -> ApiResult<Json<Vec<Attachment>>> {
    let attachments = service(&state)
        .list(query.letter_type.with_id(query.letter_id))
        .await?;

    Ok(Json(attachments))
}

/// POST /attachments - Record an uploaded file against a letter.
async fn add_attachment(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<AddAttachmentRequest>,
) -> ApiResult<impl IntoResponse> {
    let input = NewAttachment {
        letter: payload.letter_type.with_id(payload.letter_id),
        file_name: payload.file_name,
        file: FileRef::new(payload.url, payload.public_id)?,
        mime_type: payload.mime_type,
        file_size: payload.file_size,
    };

    let attachment = service(&state).add(auth.actor(), input).await?;

    Ok((StatusCode::CREATED, Json(attachment)))
}

/// DELETE /attachments/{attachment_id} - Remove an attachment (uploader or admin).
async fn delete_attachment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(attachment_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    service(&state).delete(auth.actor(), attachment_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
