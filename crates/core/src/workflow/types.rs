//! Workflow domain types for letter lifecycle management.
//!
//! This module defines the statuses of incoming and outgoing letters,
//! routing records (disposisi), and the actions that move them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Status of an outgoing letter (surat keluar).
///
/// The happy path is:
/// PENGAJUAN → DITERIMA / DIPROSES → MENUNGGU_PERSETUJUAN → DISETUJUI →
/// MENUNGGU_VERIFIKASI → MENUNGGU_TTD → DITANDATANGANI → SELESAI.
/// Any validation or signature step may return the letter as DIKEMBALIKAN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutgoingStatus {
    /// Requested by a unit, not yet handled by the admin.
    Pengajuan,
    /// Accepted by the admin, agenda number assigned.
    Diterima,
    /// Being processed (or reworked) by the admin.
    Diproses,
    /// Waiting for a reviewer's approval.
    MenungguPersetujuan,
    /// Revised by the admin, waiting for the admin's re-validation.
    MenungguValidasi,
    /// Waiting for a reviewer's verification of an approved draft.
    MenungguVerifikasi,
    /// Approved by a reviewer.
    Disetujui,
    /// Returned for revision.
    Dikembalikan,
    /// Waiting for the top approver's signature.
    MenungguTtd,
    /// Signed, official number assigned.
    Ditandatangani,
    /// Sent out; workflow finished.
    Selesai,
}

impl OutgoingStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [Self; 11] = [
        Self::Pengajuan,
        Self::Diterima,
        Self::Diproses,
        Self::MenungguPersetujuan,
        Self::MenungguValidasi,
        Self::MenungguVerifikasi,
        Self::Disetujui,
        Self::Dikembalikan,
        Self::MenungguTtd,
        Self::Ditandatangani,
        Self::Selesai,
    ];

    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pengajuan => "PENGAJUAN",
            Self::Diterima => "DITERIMA",
            Self::Diproses => "DIPROSES",
            Self::MenungguPersetujuan => "MENUNGGU_PERSETUJUAN",
            Self::MenungguValidasi => "MENUNGGU_VALIDASI",
            Self::MenungguVerifikasi => "MENUNGGU_VERIFIKASI",
            Self::Disetujui => "DISETUJUI",
            Self::Dikembalikan => "DIKEMBALIKAN",
            Self::MenungguTtd => "MENUNGGU_TTD",
            Self::Ditandatangani => "DITANDATANGANI",
            Self::Selesai => "SELESAI",
        }
    }

    /// Parses a status from a string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        let upper = s.trim().to_uppercase();
        Self::ALL.into_iter().find(|status| status.as_str() == upper)
    }

    /// Returns true if the creator (or admin) may still edit the letter content.
    #[must_use]
    pub const fn is_editable(&self) -> bool {
        matches!(self, Self::Pengajuan | Self::Diproses | Self::Dikembalikan)
    }
}

impl fmt::Display for OutgoingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of an incoming letter (surat masuk).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IncomingStatus {
    /// Registered by the admin.
    Diterima,
    /// Routed to at least one user.
    Didisposisi,
    /// Being followed up.
    Diproses,
    /// Handled.
    Selesai,
}

impl IncomingStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [Self; 4] = [
        Self::Diterima,
        Self::Didisposisi,
        Self::Diproses,
        Self::Selesai,
    ];

    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Diterima => "DITERIMA",
            Self::Didisposisi => "DIDISPOSISI",
            Self::Diproses => "DIPROSES",
            Self::Selesai => "SELESAI",
        }
    }

    /// Parses a status from a string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        let upper = s.trim().to_uppercase();
        Self::ALL.into_iter().find(|status| status.as_str() == upper)
    }
}

impl fmt::Display for IncomingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a routing record (disposisi).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoutingStatus {
    /// Actionable by the recipient.
    Pending,
    /// Closed because the recipient forwarded the letter (or was re-routed).
    Diteruskan,
    /// Marked done by the recipient.
    Selesai,
}

impl RoutingStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Diteruskan => "DITERUSKAN",
            Self::Selesai => "SELESAI",
        }
    }

    /// Parses a status from a string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "PENDING" => Some(Self::Pending),
            "DITERUSKAN" => Some(Self::Diteruskan),
            "SELESAI" => Some(Self::Selesai),
            _ => None,
        }
    }
}

impl fmt::Display for RoutingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to exactly one letter, incoming or outgoing.
///
/// Routing records, attachments and activity logs hang off one of these;
/// the enum makes "both" and "neither" unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum LetterRef {
    /// An incoming letter.
    Incoming(Uuid),
    /// An outgoing letter.
    Outgoing(Uuid),
}

impl LetterRef {
    /// Builds a reference from the nullable column pair used in storage.
    ///
    /// Returns `None` unless exactly one side is set.
    #[must_use]
    pub const fn from_columns(incoming: Option<Uuid>, outgoing: Option<Uuid>) -> Option<Self> {
        match (incoming, outgoing) {
            (Some(id), None) => Some(Self::Incoming(id)),
            (None, Some(id)) => Some(Self::Outgoing(id)),
            _ => None,
        }
    }

    /// Splits the reference into the nullable column pair used in storage.
    #[must_use]
    pub const fn to_columns(self) -> (Option<Uuid>, Option<Uuid>) {
        match self {
            Self::Incoming(id) => (Some(id), None),
            Self::Outgoing(id) => (None, Some(id)),
        }
    }

    /// Returns the letter ID.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        match self {
            Self::Incoming(id) | Self::Outgoing(id) => *id,
        }
    }

    /// Returns the letter kind as a string.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Incoming(_) => "incoming",
            Self::Outgoing(_) => "outgoing",
        }
    }
}

/// Current status of the letter a routing record is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LetterStatus {
    /// Status of an incoming letter.
    Incoming(IncomingStatus),
    /// Status of an outgoing letter.
    Outgoing(OutgoingStatus),
}

impl LetterStatus {
    /// Returns the string representation of the wrapped status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Incoming(s) => s.as_str(),
            Self::Outgoing(s) => s.as_str(),
        }
    }
}

impl fmt::Display for LetterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Workflow action representing a state transition with audit data.
#[derive(Debug, Clone)]
pub enum WorkflowAction {
    /// Admin replaced the file of a letter under rework.
    Revise {
        /// The new status after revision.
        new_status: OutgoingStatus,
        /// The admin who revised the letter.
        revised_by: Uuid,
    },
    /// A validation step (admin intake or reviewer approval).
    Validate {
        /// The new status after validation.
        new_status: OutgoingStatus,
        /// The user who validated.
        validated_by: Uuid,
        /// When the letter was validated.
        validated_at: DateTime<Utc>,
        /// Reviewer note (required when returning the letter).
        note: Option<String>,
        /// Admin agenda number to store, if this step assigns one.
        admin_number: Option<String>,
    },
    /// The top approver's decision.
    Sign {
        /// The new status after the decision.
        new_status: OutgoingStatus,
        /// The user who signed (or refused to).
        signed_by: Uuid,
        /// When the decision was made.
        signed_at: DateTime<Utc>,
        /// Note (required when returning the letter).
        note: Option<String>,
    },
    /// Dispatch of a signed letter.
    Send {
        /// The new status after sending.
        new_status: OutgoingStatus,
        /// The admin who sent the letter.
        sent_by: Uuid,
        /// When the letter was sent.
        sent_at: DateTime<Utc>,
    },
}

impl WorkflowAction {
    /// Returns the new status resulting from this action.
    #[must_use]
    pub const fn new_status(&self) -> OutgoingStatus {
        match self {
            Self::Revise { new_status, .. }
            | Self::Validate { new_status, .. }
            | Self::Sign { new_status, .. }
            | Self::Send { new_status, .. } => *new_status,
        }
    }

    /// Returns true if this action requires minting an official number.
    #[must_use]
    pub const fn assigns_number(&self) -> bool {
        matches!(
            self,
            Self::Sign {
                new_status: OutgoingStatus::Ditandatangani,
                ..
            }
        )
    }

    /// Returns the activity-log action code for this transition.
    #[must_use]
    pub const fn log_code(&self) -> &'static str {
        match self {
            Self::Revise { .. } => "REVISE",
            Self::Validate {
                new_status: OutgoingStatus::Dikembalikan,
                ..
            }
            | Self::Sign {
                new_status: OutgoingStatus::Dikembalikan,
                ..
            } => "RETURN",
            Self::Validate { .. } => "VALIDATE",
            Self::Sign { .. } => "SIGN",
            Self::Send { .. } => "SEND",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outgoing_status_round_trip_strings() {
        for status in OutgoingStatus::ALL {
            assert_eq!(OutgoingStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(
            OutgoingStatus::parse("menunggu_ttd"),
            Some(OutgoingStatus::MenungguTtd)
        );
        assert_eq!(OutgoingStatus::parse("DRAFT"), None);
    }

    #[test]
    fn test_outgoing_status_serde_matches_as_str() {
        let json = serde_json::to_string(&OutgoingStatus::MenungguPersetujuan).unwrap();
        assert_eq!(json, "\"MENUNGGU_PERSETUJUAN\"");
    }

    #[test]
    fn test_outgoing_status_editable() {
        assert!(OutgoingStatus::Pengajuan.is_editable());
        assert!(OutgoingStatus::Diproses.is_editable());
        assert!(OutgoingStatus::Dikembalikan.is_editable());
        assert!(!OutgoingStatus::MenungguTtd.is_editable());
        assert!(!OutgoingStatus::Ditandatangani.is_editable());
    }

    #[test]
    fn test_incoming_and_routing_status_parse() {
        assert_eq!(
            IncomingStatus::parse("didisposisi"),
            Some(IncomingStatus::Didisposisi)
        );
        assert_eq!(IncomingStatus::parse("x"), None);
        assert_eq!(RoutingStatus::parse("pending"), Some(RoutingStatus::Pending));
        assert_eq!(
            RoutingStatus::parse("DITERUSKAN"),
            Some(RoutingStatus::Diteruskan)
        );
        assert_eq!(RoutingStatus::Selesai.to_string(), "SELESAI");
    }

    #[test]
    fn test_letter_ref_columns() {
        let id = Uuid::new_v4();
        assert_eq!(
            LetterRef::from_columns(Some(id), None),
            Some(LetterRef::Incoming(id))
        );
        assert_eq!(
            LetterRef::from_columns(None, Some(id)),
            Some(LetterRef::Outgoing(id))
        );
        assert_eq!(LetterRef::from_columns(Some(id), Some(id)), None);
        assert_eq!(LetterRef::from_columns(None, None), None);
        assert_eq!(LetterRef::Outgoing(id).to_columns(), (None, Some(id)));
        assert_eq!(LetterRef::Incoming(id).kind(), "incoming");
        assert_eq!(LetterRef::Incoming(id).id(), id);
    }

    #[test]
    fn test_action_log_codes() {
        let sign_return = WorkflowAction::Sign {
            new_status: OutgoingStatus::Dikembalikan,
            signed_by: Uuid::nil(),
            signed_at: Utc::now(),
            note: Some("typo".to_string()),
        };
        assert_eq!(sign_return.log_code(), "RETURN");
        assert!(!sign_return.assigns_number());

        let sign = WorkflowAction::Sign {
            new_status: OutgoingStatus::Ditandatangani,
            signed_by: Uuid::nil(),
            signed_at: Utc::now(),
            note: None,
        };
        assert_eq!(sign.log_code(), "SIGN");
        assert!(sign.assigns_number());
    }
}
