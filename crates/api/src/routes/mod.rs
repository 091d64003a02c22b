//! API route definitions.

use axum::{Router, middleware};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::auth::auth_middleware};
use amanat_core::attachment::{Attachment, AttachmentService, FileRef};
use amanat_core::dashboard::ActivityEntry;
use amanat_core::workflow::LetterRef;
use amanat_db::{
    DispositionRepository, LampiranRepository, repositories::ActivityRepository,
};
use amanat_shared::types::PageRequest;

pub mod attachments;
pub mod auth;
pub mod dashboard;
pub mod dispositions;
pub mod health;
pub mod incoming_letters;
pub mod notifications;
pub mod outgoing_letters;
pub mod users;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(auth::protected_routes())
        .merge(users::routes())
        .merge(incoming_letters::routes())
        .merge(outgoing_letters::routes())
        .merge(dispositions::routes())
        .merge(attachments::routes())
        .merge(notifications::routes())
        .merge(dashboard::routes())
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Combine public and protected routes
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}

/// Pagination query parameters shared by list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size (default 20, max 100).
    pub per_page: Option<u32>,
}

impl PageQuery {
    /// Converts into a clamped page request.
    #[must_use]
    pub fn to_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.per_page)
    }
}

/// Letter kind as written in requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LetterKind {
    /// Surat masuk.
    Incoming,
    /// Surat keluar.
    Outgoing,
}

impl LetterKind {
    /// Pairs the kind with a letter ID.
    #[must_use]
    pub const fn with_id(self, id: Uuid) -> LetterRef {
        match self {
            Self::Incoming => LetterRef::Incoming(id),
            Self::Outgoing => LetterRef::Outgoing(id),
        }
    }
}

/// Trims a required text field, rejecting blank input.
pub(crate) fn required(field: &str, value: &str) -> Result<String, ApiError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ApiError::validation(format!("{field} is required")))
    } else {
        Ok(value.to_string())
    }
}

/// Trims an optional text field, mapping blank input to `None`.
pub(crate) fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parses an optional status filter with the given parser.
pub(crate) fn parse_filter<T>(
    field: &str,
    value: Option<&str>,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>, ApiError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| parse(v).ok_or_else(|| ApiError::validation(format!("invalid {field}: {v}"))))
        .transpose()
}

/// Validates a file reference supplied in a request body.
pub(crate) fn file_ref(file: Option<FileRef>) -> Result<Option<FileRef>, ApiError> {
    file.map(|f| FileRef::new(f.url, f.public_id))
        .transpose()
        .map_err(ApiError::from)
}

/// Everything that hangs off a letter, shown on its detail page.
#[derive(Debug, Serialize)]
pub struct LetterTrail {
    /// Attached files.
    pub attachments: Vec<Attachment>,
    /// Routing history, oldest first.
    pub dispositions: Vec<dispositions::DispositionResponse>,
    /// Activity log, oldest first.
    pub activity: Vec<ActivityEntry>,
}

/// Loads the attachments, routing history and activity of a letter.
pub(crate) async fn letter_trail(state: &AppState, letter: LetterRef) -> Result<LetterTrail, ApiError> {
    let db = (*state.db).clone();
    let attachments = AttachmentService::new(Arc::new(LampiranRepository::new(db.clone())))
        .list(letter)
        .await?;
    let dispositions = DispositionRepository::new(db.clone())
        .history(letter)
        .await?
        .into_iter()
        .map(dispositions::DispositionResponse::from)
        .collect();
    let activity = ActivityRepository::new(db).list_for_letter(letter).await?;

    Ok(LetterTrail {
        attachments,
        dispositions,
        activity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use amanat_core::workflow::OutgoingStatus;

    #[test]
    fn test_required_trims_and_rejects_blank() {
        assert_eq!(required("subject", "  Rapat  ").unwrap(), "Rapat");
        assert!(required("subject", "   ").is_err());
    }

    #[test]
    fn test_optional() {
        assert_eq!(optional(Some(" x ".into())), Some("x".into()));
        assert_eq!(optional(Some("  ".into())), None);
        assert_eq!(optional(None), None);
    }

    #[test]
    fn test_parse_filter() {
        assert_eq!(
            parse_filter("status", Some("MENUNGGU_TTD"), OutgoingStatus::parse).unwrap(),
            Some(OutgoingStatus::MenungguTtd)
        );
        assert_eq!(parse_filter("status", Some(""), OutgoingStatus::parse).unwrap(), None);
        assert_eq!(parse_filter("status", None, OutgoingStatus::parse).unwrap(), None);
        assert!(parse_filter("status", Some("DONE"), OutgoingStatus::parse).is_err());
    }

    #[test]
    fn test_letter_kind_with_id() {
        let id = Uuid::new_v4();
        assert_eq!(LetterKind::Incoming.with_id(id), LetterRef::Incoming(id));
        assert_eq!(LetterKind::Outgoing.with_id(id), LetterRef::Outgoing(id));
    }
}
