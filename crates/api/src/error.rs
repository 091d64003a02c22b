//! Error responses.
//!
//! Every failure leaves the API as `{ "error": CODE, "message": text }` with
//! the status code the domain error carries. Server-side failures are logged
//! and reported generically.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde_json::json;
use tracing::error;

use amanat_core::attachment::AttachmentError;
use amanat_core::workflow::WorkflowError;
use amanat_shared::AppError;

/// Any error a handler can return.
#[derive(Debug)]
pub enum ApiError {
    /// Application-wide errors (validation, auth, not found).
    App(AppError),
    /// Letter workflow and routing errors.
    Workflow(WorkflowError),
    /// Attachment errors.
    Attachment(AttachmentError),
}

impl ApiError {
    /// Shorthand for a 400 validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::App(AppError::Validation(message.into()))
    }

    /// Shorthand for a 404.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::App(AppError::NotFound(message.into()))
    }

    /// Shorthand for a 403.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::App(AppError::Forbidden(message.into()))
    }

    /// Returns the HTTP status.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        let code = match self {
            Self::App(e) => e.status_code(),
            Self::Workflow(e) => e.status_code(),
            Self::Attachment(e) => e.status_code(),
        };
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Returns the stable error code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::App(e) => e.error_code(),
            Self::Workflow(e) => e.error_code(),
            Self::Attachment(e) => e.error_code(),
        }
    }

    fn public_message(&self) -> String {
        match self {
            Self::App(e) => e.public_message(),
            Self::Workflow(e) => e.public_message(),
            Self::Attachment(AttachmentError::Repository(_)) => "An error occurred".to_string(),
            Self::Attachment(e) => e.to_string(),
        }
    }

    fn detail(&self) -> String {
        match self {
            Self::App(e) => e.to_string(),
            Self::Workflow(e) => e.to_string(),
            Self::Attachment(e) => e.to_string(),
        }
    }
}

impl From<AppError> for ApiError {
    fn from(e: AppError) -> Self {
        Self::App(e)
    }
}

impl From<WorkflowError> for ApiError {
    fn from(e: WorkflowError) -> Self {
        Self::Workflow(e)
    }
}

impl From<AttachmentError> for ApiError {
    fn from(e: AttachmentError) -> Self {
        Self::Attachment(e)
    }
}

impl From<DbErr> for ApiError {
    fn from(e: DbErr) -> Self {
        Self::App(AppError::Database(e.to_string()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self.detail(), code = self.error_code(), "Request failed");
        }
        (
            status,
            Json(json!({
                "error": self.error_code(),
                "message": self.public_message(),
            })),
        )
            .into_response()
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;
