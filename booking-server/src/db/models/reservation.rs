//! Reservation Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use std::fmt;
use surrealdb::RecordId;

/// Reservation lifecycle status
///
/// `Pending` is the only non-terminal state: a reservation moves away from
/// it exactly once, to `Accepted` or `Rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ReservationStatus {
    /// Terminal states never transition again
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected)
    }

    /// Whether this status consumes seats from its slot's capacity
    pub fn consumes_capacity(&self) -> bool {
        matches!(self, Self::Pending | Self::Accepted)
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        };
        f.write_str(s)
    }
}

/// Reservation entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub full_name: String,
    pub phone: String,
    pub email: String,
    /// Target date (YYYY-MM-DD)
    pub date: String,
    /// Target slot time (HH:MM)
    pub time: String,
    pub seats: u32,
    /// Free-text special requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub status: ReservationStatus,
    /// Insertion timestamp (millis), tiebreak for per-date listing order
    #[serde(default)]
    pub created_at: i64,
}

impl Reservation {
    /// The "reservation:key" string form of the record id
    ///
    /// Records read back from the store always carry an id; an empty string
    /// only appears on unsaved drafts.
    pub fn key(&self) -> String {
        self.id.as_ref().map(|id| id.to_string()).unwrap_or_default()
    }
}

/// Create reservation payload
///
/// Status is never accepted from the caller: admission always stores the
/// reservation as `pending`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationCreate {
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub date: String,
    pub time: String,
    pub seats: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Update reservation payload (field patch)
///
/// Status is deliberately absent: transitions go through the state machine,
/// not through edits.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReservationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seats: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ReservationUpdate {
    /// Whether the patch touches the fields guarded by the capacity invariant
    pub fn touches_capacity(&self) -> bool {
        self.date.is_some() || self.time.is_some() || self.seats.is_some()
    }
}
