//! Property-based tests for the routing table.

use proptest::prelude::*;

use crate::auth::RoleClass;
use crate::workflow::routing::RoutingTable;
use crate::workflow::types::{IncomingStatus, OutgoingStatus};

/// Strategy for generating random OutgoingStatus values.
fn arb_status() -> impl Strategy<Value = OutgoingStatus> {
    proptest::sample::select(OutgoingStatus::ALL.to_vec())
}

/// Strategy for generating random IncomingStatus values.
fn arb_incoming_status() -> impl Strategy<Value = IncomingStatus> {
    proptest::sample::select(IncomingStatus::ALL.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Routing to the top approver always asks for a signature.
    #[test]
    fn prop_top_approver_always_menunggu_ttd(current in arb_status(), has_number in any::<bool>()) {
        prop_assert_eq!(
            RoutingTable::next_status(current, RoleClass::TopApprover, has_number),
            OutgoingStatus::MenungguTtd
        );
    }

    /// Routing to the admin always sends the letter back to processing.
    #[test]
    fn prop_admin_always_diproses(current in arb_status(), has_number in any::<bool>()) {
        prop_assert_eq!(
            RoutingTable::next_status(current, RoleClass::Administrative, has_number),
            OutgoingStatus::Diproses
        );
    }

    /// Reviewers never produce signature or terminal statuses they were not already in.
    #[test]
    fn prop_reviewer_never_skips_to_signing(current in arb_status(), has_number in any::<bool>()) {
        let next = RoutingTable::next_status(current, RoleClass::Reviewer, has_number);
        if next != current {
            prop_assert!(matches!(
                next,
                OutgoingStatus::MenungguPersetujuan | OutgoingStatus::MenungguVerifikasi
            ));
        }
    }

    /// The admin number only matters for returned letters.
    #[test]
    fn prop_admin_number_only_matters_when_returned(current in arb_status()) {
        let with = RoutingTable::next_status(current, RoleClass::Reviewer, true);
        let without = RoutingTable::next_status(current, RoleClass::Reviewer, false);
        if current != OutgoingStatus::Dikembalikan {
            prop_assert_eq!(with, without);
        }
    }

    /// Routing an incoming letter is idempotent after the first disposisi.
    #[test]
    fn prop_incoming_routing_idempotent(current in arb_incoming_status()) {
        let once = RoutingTable::next_incoming_status(current);
        prop_assert_eq!(RoutingTable::next_incoming_status(once), once);
        prop_assert_ne!(once, IncomingStatus::Diterima);
    }
}
