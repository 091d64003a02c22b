//! Notification routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use uuid::Uuid;

use super::PageQuery;
use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::AuthUser,
};
use amanat_core::workflow::LetterRef;
use amanat_db::{NotificationRepository, entities::notifications};
use amanat_shared::types::PageResponse;

/// Creates the notification routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(list_notifications))
        .route("/notifications/read-all", post(mark_all_read))
        .route("/notifications/{notification_id}/read", post(mark_read))
}

/// Query parameters for listing notifications.
#[derive(Debug, Deserialize)]
pub struct ListNotificationsQuery {
    /// Only unread notifications.
    #[serde(default)]
    pub unread: bool,
    /// Page number.
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
}

/// Response for a notification.
#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    /// Notification ID.
    pub id: Uuid,
    /// Title.
    pub title: String,
    /// Message.
    pub message: String,
    /// Letter the notification is about.
    pub letter: Option<LetterRef>,
    /// Read flag.
    pub is_read: bool,
    /// Created at.
    pub created_at: DateTime<FixedOffset>,
}

impl From<notifications::Model> for NotificationResponse {
    fn from(m: notifications::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            message: m.message,
            letter: LetterRef::from_columns(m.surat_masuk_id, m.surat_keluar_id),
            is_read: m.is_read,
            created_at: m.created_at,
        }
    }
}

/// GET /notifications - The caller's notifications, unread first.
async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListNotificationsQuery>,
) -> ApiResult<Json<PageResponse<NotificationResponse>>> {
    let page = PageQuery {
        page: query.page,
        per_page: query.per_page,
    }
    .to_request();

    let notifications = NotificationRepository::new((*state.db).clone())
        .list_for_user(auth.user_id(), query.unread, &page)
        .await?;

    Ok(Json(notifications.map(NotificationResponse::from)))
}

/// POST /notifications/{notification_id}/read - Mark one as read.
async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(notification_id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    let updated = NotificationRepository::new((*state.db).clone())
        .mark_read(auth.user_id(), notification_id)
        .await?;
    if !updated {
        return Err(ApiError::not_found(format!(
            "Notification not found: {notification_id}"
        )));
    }

    Ok(Json(json!({ "id": notification_id, "is_read": true })))
}

/// POST /notifications/read-all - Mark all of the caller's notifications as read.
async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Value>> {
    let updated = NotificationRepository::new((*state.db).clone())
        .mark_all_read(auth.user_id())
        .await?;

    Ok(Json(json!({ "updated": updated })))
}
