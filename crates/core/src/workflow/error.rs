//! Workflow error types for letter lifecycle management.
//!
//! This module defines all error types that can occur during
//! workflow operations such as routing, validation, signing and completion.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during workflow operations.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Letter not found.
    #[error("Letter {0} not found")]
    LetterNotFound(Uuid),

    /// Routing record not found.
    #[error("Routing record {0} not found")]
    RoutingNotFound(Uuid),

    /// User not found.
    #[error("User {0} not found")]
    UserNotFound(Uuid),

    /// The acting user may not perform this operation.
    #[error("User is not allowed to {action}")]
    Forbidden {
        /// The attempted action.
        action: &'static str,
    },

    /// Action is not allowed from the current status.
    #[error("Cannot {action} a letter in status {from}")]
    InvalidTransition {
        /// The current status.
        from: String,
        /// The attempted action.
        action: &'static str,
    },

    /// Routing instruction is missing or blank.
    #[error("Instruction is required")]
    InstructionRequired,

    /// Routing recipient is missing.
    #[error("Recipient is required")]
    RecipientRequired,

    /// The actor tried to route a letter to themselves.
    #[error("Cannot route a letter to yourself")]
    SelfRouting,

    /// The recipient account is deactivated.
    #[error("Recipient {0} is not active")]
    RecipientInactive(Uuid),

    /// A note is required when returning a letter.
    #[error("Note is required when returning a letter")]
    NoteRequired,

    /// The admin agenda number is required to accept a letter.
    #[error("Admin number is required")]
    AdminNumberRequired,

    /// The routing record is no longer pending.
    #[error("Routing record {0} is already closed")]
    AlreadyCompleted(Uuid),

    /// A letter number could not be minted after retrying.
    #[error("Letter number conflict, please retry")]
    NumberConflict,

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl WorkflowError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidTransition { .. }
            | Self::InstructionRequired
            | Self::RecipientRequired
            | Self::SelfRouting
            | Self::RecipientInactive(_)
            | Self::NoteRequired
            | Self::AdminNumberRequired => 400,

            Self::Forbidden { .. } => 403,

            Self::LetterNotFound(_) | Self::RoutingNotFound(_) | Self::UserNotFound(_) => 404,

            Self::AlreadyCompleted(_) | Self::NumberConflict => 409,

            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::LetterNotFound(_) => "LETTER_NOT_FOUND",
            Self::RoutingNotFound(_) => "ROUTING_NOT_FOUND",
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::Forbidden { .. } => "FORBIDDEN",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::InstructionRequired => "INSTRUCTION_REQUIRED",
            Self::RecipientRequired => "RECIPIENT_REQUIRED",
            Self::SelfRouting => "SELF_ROUTING",
            Self::RecipientInactive(_) => "RECIPIENT_INACTIVE",
            Self::NoteRequired => "NOTE_REQUIRED",
            Self::AdminNumberRequired => "ADMIN_NUMBER_REQUIRED",
            Self::AlreadyCompleted(_) => "ALREADY_COMPLETED",
            Self::NumberConflict => "NUMBER_CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the message safe to show to API clients.
    ///
    /// Database details stay in the logs.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Database(_) => "An error occurred".to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(WorkflowError::LetterNotFound(Uuid::nil()), 404, "LETTER_NOT_FOUND")]
    #[case(WorkflowError::RoutingNotFound(Uuid::nil()), 404, "ROUTING_NOT_FOUND")]
    #[case(WorkflowError::UserNotFound(Uuid::nil()), 404, "USER_NOT_FOUND")]
    #[case(WorkflowError::Forbidden { action: "sign" }, 403, "FORBIDDEN")]
    #[case(WorkflowError::InstructionRequired, 400, "INSTRUCTION_REQUIRED")]
    #[case(WorkflowError::RecipientRequired, 400, "RECIPIENT_REQUIRED")]
    #[case(WorkflowError::SelfRouting, 400, "SELF_ROUTING")]
    #[case(WorkflowError::RecipientInactive(Uuid::nil()), 400, "RECIPIENT_INACTIVE")]
    #[case(WorkflowError::NoteRequired, 400, "NOTE_REQUIRED")]
    #[case(WorkflowError::AdminNumberRequired, 400, "ADMIN_NUMBER_REQUIRED")]
    #[case(WorkflowError::AlreadyCompleted(Uuid::nil()), 409, "ALREADY_COMPLETED")]
    #[case(WorkflowError::NumberConflict, 409, "NUMBER_CONFLICT")]
    #[case(WorkflowError::Database("boom".into()), 500, "DATABASE_ERROR")]
    fn test_error_mapping(#[case] err: WorkflowError, #[case] status: u16, #[case] code: &str) {
        assert_eq!(err.status_code(), status);
        assert_eq!(err.error_code(), code);
    }

    #[test]
    fn test_invalid_transition_message() {
        let err = WorkflowError::InvalidTransition {
            from: "MENUNGGU_TTD".to_string(),
            action: "send",
        };
        assert_eq!(err.status_code(), 400);
        assert!(err.to_string().contains("MENUNGGU_TTD"));
        assert!(err.to_string().contains("send"));
    }

    #[test]
    fn test_database_message_is_hidden() {
        let err = WorkflowError::Database("relation does not exist".to_string());
        assert_eq!(err.public_message(), "An error occurred");
        assert_eq!(
            WorkflowError::NoteRequired.public_message(),
            "Note is required when returning a letter"
        );
    }
}
