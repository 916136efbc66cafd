//! Slot Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Canonical bookable times for every date (lunch and dinner services).
///
/// Zero-padded HH:MM keeps lexicographic order chronological, so listing
/// can sort on the raw string.
pub const CANONICAL_TIMES: &[&str] = &[
    "12:00", "12:30", "13:00", "13:30", "14:00", "19:00", "19:30", "20:00", "20:30", "21:00",
    "21:30", "22:00",
];

/// Times enabled by default when a date is first initialized
pub const DEFAULT_ENABLED_TIMES: &[&str] = &["19:00", "20:00", "21:30"];

/// Default per-slot seat capacity
pub const DEFAULT_MAX_CAPACITY: u32 = 15;

/// Bookable time slot for a specific date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slot {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Date (YYYY-MM-DD)
    pub date: String,
    /// Time of day (HH:MM)
    pub time: String,
    #[serde(default = "default_true", deserialize_with = "serde_helpers::bool_true")]
    pub enabled: bool,
    pub max_capacity: u32,
}

fn default_true() -> bool {
    true
}

/// Toggle slot payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotToggle {
    pub enabled: bool,
}

/// (date, time) pair identifying a slot, used as the admission lock key
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotKey {
    pub date: String,
    pub time: String,
}

impl SlotKey {
    pub fn new(date: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            time: time.into(),
        }
    }
}

impl std::fmt::Display for SlotKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.date, self.time)
    }
}
