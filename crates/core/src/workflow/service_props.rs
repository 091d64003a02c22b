//! Property-based tests for WorkflowService.

use proptest::prelude::*;
use uuid::Uuid;

use crate::auth::{Actor, Role};
use crate::workflow::error::WorkflowError;
use crate::workflow::service::WorkflowService;
use crate::workflow::types::{OutgoingStatus, WorkflowAction};

/// Strategy for generating random OutgoingStatus values.
fn arb_status() -> impl Strategy<Value = OutgoingStatus> {
    proptest::sample::select(OutgoingStatus::ALL.to_vec())
}

/// Strategy for generating random roles.
fn arb_role() -> impl Strategy<Value = Role> {
    proptest::sample::select(Role::ALL.to_vec())
}

/// Strategy for generating random UUIDs.
fn arb_uuid() -> impl Strategy<Value = Uuid> {
    any::<u128>().prop_map(Uuid::from_u128)
}

/// Strategy for generating non-blank notes.
fn arb_note() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9]{1,40}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Signing only succeeds from MENUNGGU_TTD.
    #[test]
    fn prop_sign_only_from_menunggu_ttd(status in arb_status(), id in arb_uuid(), approve in any::<bool>(), note in arb_note()) {
        let result = WorkflowService::sign(status, Actor::new(id, Role::KetuaPengurus), approve, Some(note));
        if status == OutgoingStatus::MenungguTtd {
            prop_assert!(result.is_ok());
        } else {
            let is_invalid_transition = matches!(result, Err(WorkflowError::InvalidTransition { .. }));
            prop_assert!(is_invalid_transition);
        }
    }

    /// Sending only succeeds from DITANDATANGANI.
    #[test]
    fn prop_send_only_from_signed(status in arb_status(), id in arb_uuid()) {
        let result = WorkflowService::send(status, Actor::new(id, Role::Admin));
        prop_assert_eq!(result.is_ok(), status == OutgoingStatus::Ditandatangani);
    }

    /// Returning a letter always requires a note, whoever returns it.
    #[test]
    fn prop_return_without_note_rejected(status in arb_status(), role in arb_role(), id in arb_uuid()) {
        let result = WorkflowService::validate(status, Actor::new(id, role), false, None, None, None);
        prop_assert!(result.is_err());
    }

    /// A successful return always lands in DIKEMBALIKAN and keeps the note.
    #[test]
    fn prop_return_lands_in_dikembalikan(status in arb_status(), role in arb_role(), id in arb_uuid(), note in arb_note()) {
        if let Ok(action) = WorkflowService::validate(status, Actor::new(id, role), false, Some(note.clone()), None, None) {
            prop_assert_eq!(action.new_status(), OutgoingStatus::Dikembalikan);
            if let WorkflowAction::Validate { note: stored, validated_by, .. } = action {
                prop_assert_eq!(stored, Some(note));
                prop_assert_eq!(validated_by, id);
            } else {
                prop_assert!(false, "Expected Validate action");
            }
        }
    }

    /// Only the top approver's signature can mint a number.
    #[test]
    fn prop_only_sign_assigns_number(status in arb_status(), role in arb_role(), id in arb_uuid()) {
        let actor = Actor::new(id, role);
        let actions = [
            WorkflowService::revise(status, actor),
            WorkflowService::validate(status, actor, true, None, Some("1".to_string()), None),
            WorkflowService::send(status, actor),
        ];
        for action in actions.into_iter().flatten() {
            prop_assert!(!action.assigns_number());
        }
    }

    /// Signed letters can no longer be edited.
    #[test]
    fn prop_signed_letters_not_editable(status in arb_status(), id in arb_uuid()) {
        let admin = Actor::new(id, Role::Admin);
        if matches!(status, OutgoingStatus::Ditandatangani | OutgoingStatus::Selesai) {
            prop_assert!(WorkflowService::check_edit(status, id, admin).is_err());
        }
    }
}
