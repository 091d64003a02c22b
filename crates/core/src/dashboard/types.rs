//! Dashboard data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::workflow::{IncomingStatus, LetterRef, OutgoingStatus};

/// Number of recent activity entries shown on the dashboard.
pub const RECENT_ACTIVITY_LIMIT: u64 = 10;

/// Dashboard summary response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// Incoming letters per status (every status listed, zero included).
    pub incoming_by_status: Vec<StatusCount>,
    /// Outgoing letters per status (every status listed, zero included).
    pub outgoing_by_status: Vec<StatusCount>,
    /// Total incoming letters.
    pub incoming_total: i64,
    /// Total outgoing letters.
    pub outgoing_total: i64,
    /// Routing records waiting on the current user.
    pub pending_routing: i64,
    /// Unread notifications of the current user.
    pub unread_notifications: i64,
    /// Most recent activity entries.
    pub recent_activity: Vec<ActivityEntry>,
}

/// Letter count for one status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    /// Status name.
    pub status: String,
    /// Number of letters.
    pub count: i64,
}

/// Activity log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    /// Entry ID.
    pub id: Uuid,
    /// Letter the entry belongs to.
    pub letter: LetterRef,
    /// Acting user.
    pub user_id: Uuid,
    /// Acting user's name.
    pub user_name: Option<String>,
    /// Action code (`CREATE`, `ROUTE`, `SIGN`, ...).
    pub action: String,
    /// Human-readable description.
    pub description: String,
    /// When it happened.
    pub created_at: DateTime<Utc>,
}

/// Expands sparse `(status, count)` rows into one entry per incoming status.
#[must_use]
pub fn incoming_counts(rows: &[(IncomingStatus, i64)]) -> Vec<StatusCount> {
    IncomingStatus::ALL
        .iter()
        .map(|status| StatusCount {
            status: status.as_str().to_string(),
            count: sum_for(rows, status),
        })
        .collect()
}

/// Expands sparse `(status, count)` rows into one entry per outgoing status.
#[must_use]
pub fn outgoing_counts(rows: &[(OutgoingStatus, i64)]) -> Vec<StatusCount> {
    OutgoingStatus::ALL
        .iter()
        .map(|status| StatusCount {
            status: status.as_str().to_string(),
            count: sum_for(rows, status),
        })
        .collect()
}

fn sum_for<S: PartialEq>(rows: &[(S, i64)], status: &S) -> i64 {
    rows.iter()
        .filter(|(s, _)| s == status)
        .map(|(_, count)| *count)
        .sum()
}
