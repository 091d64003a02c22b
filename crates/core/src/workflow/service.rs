//! Workflow service for letter state transitions.
//!
//! This module implements the decision logic of the letter workflow: which
//! role may do what from which status, and what the resulting status is.
//! Persistence lives in the database layer, which applies the returned
//! `WorkflowAction` inside a transaction.

use chrono::Utc;
use uuid::Uuid;

use crate::auth::{Actor, Role, RoleClass};
use crate::workflow::error::WorkflowError;
use crate::workflow::types::{OutgoingStatus, RoutingStatus, WorkflowAction};

/// The user a letter is being routed to, as loaded from storage.
#[derive(Debug, Clone, Copy)]
pub struct Recipient {
    /// User ID.
    pub id: Uuid,
    /// Stored role.
    pub role: Role,
    /// Whether the account is active.
    pub is_active: bool,
}

/// Stateless service for managing letter workflow transitions.
///
/// All methods are associated functions that validate a request against
/// the current state and return the appropriate `WorkflowAction`.
pub struct WorkflowService;

impl WorkflowService {
    /// Admin uploads a revised file for a letter under rework.
    ///
    /// # Returns
    /// * `Ok(WorkflowAction::Revise)` moving to `MENUNGGU_VALIDASI`
    /// * `Err(WorkflowError::Forbidden)` if the actor is not the admin
    /// * `Err(WorkflowError::InvalidTransition)` unless `DIPROSES` or `DIKEMBALIKAN`
    pub fn revise(
        current_status: OutgoingStatus,
        actor: Actor,
    ) -> Result<WorkflowAction, WorkflowError> {
        if !actor.is_admin() {
            return Err(WorkflowError::Forbidden { action: "revise" });
        }
        match current_status {
            OutgoingStatus::Diproses | OutgoingStatus::Dikembalikan => Ok(WorkflowAction::Revise {
                new_status: OutgoingStatus::MenungguValidasi,
                revised_by: actor.id,
            }),
            _ => Err(invalid(current_status, "revise")),
        }
    }

    /// Validates (or returns) a letter.
    ///
    /// The admin accepts a letter into the agenda; accepting requires an
    /// admin number unless one is already stored. Reviewers approve drafts
    /// waiting on them. The top approver never validates, it signs.
    ///
    /// # Arguments
    /// * `current_status` - The current status of the letter
    /// * `actor` - The validating user
    /// * `is_valid` - Accept/approve (`true`) or return (`false`)
    /// * `note` - Review note, required when returning
    /// * `admin_number` - Admin number supplied with this request
    /// * `existing_admin_number` - Admin number already on the letter
    pub fn validate(
        current_status: OutgoingStatus,
        actor: Actor,
        is_valid: bool,
        note: Option<String>,
        admin_number: Option<String>,
        existing_admin_number: Option<&str>,
    ) -> Result<WorkflowAction, WorkflowError> {
        let note = non_blank(note);
        let allowed_from: &[OutgoingStatus] = match actor.role.class() {
            RoleClass::TopApprover => return Err(WorkflowError::Forbidden { action: "validate" }),
            RoleClass::Administrative => &[
                OutgoingStatus::Pengajuan,
                OutgoingStatus::Diproses,
                OutgoingStatus::MenungguValidasi,
                OutgoingStatus::Dikembalikan,
            ],
            RoleClass::Reviewer => &[
                OutgoingStatus::MenungguPersetujuan,
                OutgoingStatus::MenungguVerifikasi,
                OutgoingStatus::MenungguValidasi,
            ],
        };
        if !allowed_from.contains(&current_status) {
            return Err(invalid(current_status, "validate"));
        }

        if !is_valid {
            let note = note.ok_or(WorkflowError::NoteRequired)?;
            return Ok(WorkflowAction::Validate {
                new_status: OutgoingStatus::Dikembalikan,
                validated_by: actor.id,
                validated_at: Utc::now(),
                note: Some(note),
                admin_number: None,
            });
        }

        let (new_status, admin_number) = if actor.is_admin() {
            let supplied = non_blank(admin_number);
            let has_existing = existing_admin_number.is_some_and(|n| !n.trim().is_empty());
            if supplied.is_none() && !has_existing {
                return Err(WorkflowError::AdminNumberRequired);
            }
            (OutgoingStatus::Diterima, supplied)
        } else {
            (OutgoingStatus::Disetujui, None)
        };

        Ok(WorkflowAction::Validate {
            new_status,
            validated_by: actor.id,
            validated_at: Utc::now(),
            note,
            admin_number,
        })
    }

    /// The top approver signs (or refuses) a letter awaiting signature.
    ///
    /// # Returns
    /// * `Ok(WorkflowAction::Sign)` to `DITANDATANGANI` or `DIKEMBALIKAN`
    /// * `Err(WorkflowError::Forbidden)` if the actor is not the top approver
    /// * `Err(WorkflowError::InvalidTransition)` unless `MENUNGGU_TTD`
    /// * `Err(WorkflowError::NoteRequired)` when refusing without a note
    pub fn sign(
        current_status: OutgoingStatus,
        actor: Actor,
        is_approved: bool,
        note: Option<String>,
    ) -> Result<WorkflowAction, WorkflowError> {
        if actor.role.class() != RoleClass::TopApprover {
            return Err(WorkflowError::Forbidden { action: "sign" });
        }
        if current_status != OutgoingStatus::MenungguTtd {
            return Err(invalid(current_status, "sign"));
        }

        let note = non_blank(note);
        let new_status = if is_approved {
            OutgoingStatus::Ditandatangani
        } else {
            if note.is_none() {
                return Err(WorkflowError::NoteRequired);
            }
            OutgoingStatus::Dikembalikan
        };

        Ok(WorkflowAction::Sign {
            new_status,
            signed_by: actor.id,
            signed_at: Utc::now(),
            note,
        })
    }

    /// Admin dispatches a signed letter.
    pub fn send(
        current_status: OutgoingStatus,
        actor: Actor,
    ) -> Result<WorkflowAction, WorkflowError> {
        if !actor.is_admin() {
            return Err(WorkflowError::Forbidden { action: "send" });
        }
        match current_status {
            OutgoingStatus::Ditandatangani => Ok(WorkflowAction::Send {
                new_status: OutgoingStatus::Selesai,
                sent_by: actor.id,
                sent_at: Utc::now(),
            }),
            _ => Err(invalid(current_status, "send")),
        }
    }

    /// Checks a routing request before anything is written.
    ///
    /// Returns the trimmed instruction.
    ///
    /// # Errors
    /// * `InstructionRequired` if the instruction is blank
    /// * `SelfRouting` if the actor routes to themselves
    /// * `RecipientInactive` if the recipient's account is deactivated
    pub fn check_route(
        actor: Actor,
        recipient: &Recipient,
        instruction: &str,
    ) -> Result<String, WorkflowError> {
        let instruction = instruction.trim();
        if instruction.is_empty() {
            return Err(WorkflowError::InstructionRequired);
        }
        if recipient.id == actor.id {
            return Err(WorkflowError::SelfRouting);
        }
        if !recipient.is_active {
            return Err(WorkflowError::RecipientInactive(recipient.id));
        }
        Ok(instruction.to_string())
    }

    /// Checks that the actor may close a routing record.
    ///
    /// Only the recipient or the admin may complete, and only while the
    /// record is still pending.
    pub fn check_complete(
        routing_id: Uuid,
        routing_status: RoutingStatus,
        recipient_id: Uuid,
        actor: Actor,
    ) -> Result<(), WorkflowError> {
        if !actor.owns_or_admin(recipient_id) {
            return Err(WorkflowError::Forbidden { action: "complete" });
        }
        if routing_status != RoutingStatus::Pending {
            return Err(WorkflowError::AlreadyCompleted(routing_id));
        }
        Ok(())
    }

    /// Checks that the actor may edit an outgoing letter's content.
    pub fn check_edit(
        current_status: OutgoingStatus,
        created_by: Uuid,
        actor: Actor,
    ) -> Result<(), WorkflowError> {
        if !actor.owns_or_admin(created_by) {
            return Err(WorkflowError::Forbidden { action: "edit" });
        }
        if !current_status.is_editable() {
            return Err(invalid(current_status, "edit"));
        }
        Ok(())
    }

    /// Checks that the actor may submit a new outgoing letter.
    pub fn check_create(actor: Actor) -> Result<(), WorkflowError> {
        if actor.has_any_role(&Role::ALL_BUT_TOP) {
            Ok(())
        } else {
            Err(WorkflowError::Forbidden { action: "create" })
        }
    }
}

fn invalid(from: OutgoingStatus, action: &'static str) -> WorkflowError {
    WorkflowError::InvalidTransition {
        from: from.as_str().to_string(),
        action,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
