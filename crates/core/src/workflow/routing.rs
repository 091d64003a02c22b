//! Routing-triggered status transitions.
//!
//! When a letter is routed (disposisi), its next status is decided by the
//! recipient's role class and the letter's current status. The reviewer rules
//! live in an explicit table so every case can be read and tested on its own.

use serde::{Deserialize, Serialize};

use crate::auth::RoleClass;
use crate::workflow::types::{IncomingStatus, LetterStatus, OutgoingStatus};

/// Outcome of a reviewer rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum RoutingRule {
    /// Move to a fixed status.
    To(OutgoingStatus),
    /// Keep the current status.
    Keep,
    /// Depends on whether the admin agenda number is already set.
    ByAdminNumber {
        /// Status when the admin number is set.
        with: OutgoingStatus,
        /// Status when it is not.
        without: OutgoingStatus,
    },
}

impl RoutingRule {
    /// Applies the rule to a current status.
    #[must_use]
    pub const fn apply(&self, current: OutgoingStatus, has_admin_number: bool) -> OutgoingStatus {
        match *self {
            Self::To(next) => next,
            Self::Keep => current,
            Self::ByAdminNumber { with, without } => {
                if has_admin_number {
                    with
                } else {
                    without
                }
            }
        }
    }
}

/// Reviewer rules keyed by current status. Statuses not listed keep their value.
const REVIEWER_RULES: [(OutgoingStatus, RoutingRule); 6] = [
    (
        OutgoingStatus::Diproses,
        RoutingRule::To(OutgoingStatus::MenungguPersetujuan),
    ),
    (
        OutgoingStatus::Disetujui,
        RoutingRule::To(OutgoingStatus::MenungguVerifikasi),
    ),
    (
        OutgoingStatus::Dikembalikan,
        RoutingRule::ByAdminNumber {
            with: OutgoingStatus::MenungguVerifikasi,
            without: OutgoingStatus::MenungguPersetujuan,
        },
    ),
    (OutgoingStatus::MenungguVerifikasi, RoutingRule::Keep),
    (
        OutgoingStatus::Diterima,
        RoutingRule::To(OutgoingStatus::MenungguVerifikasi),
    ),
    (
        OutgoingStatus::Pengajuan,
        RoutingRule::To(OutgoingStatus::MenungguPersetujuan),
    ),
];

/// Lookup table for routing-triggered transitions.
pub struct RoutingTable;

impl RoutingTable {
    /// Returns the rule for a `(current_status, recipient_class)` pair.
    #[must_use]
    pub fn rule(current: OutgoingStatus, recipient: RoleClass) -> RoutingRule {
        match recipient {
            RoleClass::TopApprover => RoutingRule::To(OutgoingStatus::MenungguTtd),
            RoleClass::Administrative => RoutingRule::To(OutgoingStatus::Diproses),
            RoleClass::Reviewer => REVIEWER_RULES
                .iter()
                .find(|(status, _)| *status == current)
                .map_or(RoutingRule::Keep, |(_, rule)| *rule),
        }
    }

    /// Computes the next status of an outgoing letter routed to a recipient.
    ///
    /// # Arguments
    /// * `current` - The letter's current status
    /// * `recipient` - Role class of the routing recipient (not the sender)
    /// * `has_admin_number` - Whether the admin agenda number is set
    #[must_use]
    pub fn next_status(
        current: OutgoingStatus,
        recipient: RoleClass,
        has_admin_number: bool,
    ) -> OutgoingStatus {
        Self::rule(current, recipient).apply(current, has_admin_number)
    }

    /// Computes the next status of a routed incoming letter.
    #[must_use]
    pub const fn next_incoming_status(current: IncomingStatus) -> IncomingStatus {
        match current {
            IncomingStatus::Diterima => IncomingStatus::Didisposisi,
            other => other,
        }
    }

    /// Computes the next status of either letter kind.
    #[must_use]
    pub fn next_letter_status(
        current: LetterStatus,
        recipient: RoleClass,
        has_admin_number: bool,
    ) -> LetterStatus {
        match current {
            LetterStatus::Incoming(status) => {
                LetterStatus::Incoming(Self::next_incoming_status(status))
            }
            LetterStatus::Outgoing(status) => {
                LetterStatus::Outgoing(Self::next_status(status, recipient, has_admin_number))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(OutgoingStatus::Diproses, false, OutgoingStatus::MenungguPersetujuan)]
    #[case(OutgoingStatus::Disetujui, false, OutgoingStatus::MenungguVerifikasi)]
    #[case(OutgoingStatus::Dikembalikan, true, OutgoingStatus::MenungguVerifikasi)]
    #[case(OutgoingStatus::Dikembalikan, false, OutgoingStatus::MenungguPersetujuan)]
    #[case(OutgoingStatus::MenungguVerifikasi, true, OutgoingStatus::MenungguVerifikasi)]
    #[case(OutgoingStatus::Diterima, true, OutgoingStatus::MenungguVerifikasi)]
    #[case(OutgoingStatus::Pengajuan, false, OutgoingStatus::MenungguPersetujuan)]
    #[case(OutgoingStatus::MenungguPersetujuan, false, OutgoingStatus::MenungguPersetujuan)]
    #[case(OutgoingStatus::MenungguValidasi, true, OutgoingStatus::MenungguValidasi)]
    #[case(OutgoingStatus::MenungguTtd, true, OutgoingStatus::MenungguTtd)]
    #[case(OutgoingStatus::Ditandatangani, true, OutgoingStatus::Ditandatangani)]
    #[case(OutgoingStatus::Selesai, true, OutgoingStatus::Selesai)]
    fn test_reviewer_rules(
        #[case] current: OutgoingStatus,
        #[case] has_admin_number: bool,
        #[case] expected: OutgoingStatus,
    ) {
        assert_eq!(
            RoutingTable::next_status(current, RoleClass::Reviewer, has_admin_number),
            expected
        );
    }

    #[test]
    fn test_top_approver_asks_for_signature() {
        assert_eq!(
            RoutingTable::next_status(OutgoingStatus::Diproses, RoleClass::TopApprover, false),
            OutgoingStatus::MenungguTtd
        );
    }

    #[test]
    fn test_admin_reprocesses() {
        assert_eq!(
            RoutingTable::next_status(OutgoingStatus::Disetujui, RoleClass::Administrative, true),
            OutgoingStatus::Diproses
        );
    }

    #[test]
    fn test_unlisted_reviewer_status_keeps_value() {
        assert_eq!(
            RoutingTable::rule(OutgoingStatus::MenungguTtd, RoleClass::Reviewer),
            RoutingRule::Keep
        );
    }

    #[test]
    fn test_incoming_routing() {
        assert_eq!(
            RoutingTable::next_incoming_status(IncomingStatus::Diterima),
            IncomingStatus::Didisposisi
        );
        assert_eq!(
            RoutingTable::next_incoming_status(IncomingStatus::Diproses),
            IncomingStatus::Diproses
        );
        assert_eq!(
            RoutingTable::next_letter_status(
                LetterStatus::Incoming(IncomingStatus::Diterima),
                RoleClass::TopApprover,
                false
            ),
            LetterStatus::Incoming(IncomingStatus::Didisposisi)
        );
    }
}
