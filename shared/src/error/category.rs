//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the error code range:
/// - 0xxx: General errors
/// - 4xxx: Reservation errors
/// - 5xxx: Slot errors
/// - 6xxx: Notification errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Reservation errors (4xxx)
    Reservation,
    /// Slot errors (5xxx)
    Slot,
    /// Notification errors (6xxx)
    Notification,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            4000..5000 => Self::Reservation,
            5000..6000 => Self::Slot,
            6000..7000 => Self::Notification,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Reservation => "reservation",
            Self::Slot => "slot",
            Self::Notification => "notification",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_ranges() {
        assert_eq!(ErrorCode::NotFound.category(), ErrorCategory::General);
        assert_eq!(
            ErrorCode::CapacityExceeded.category(),
            ErrorCategory::Reservation
        );
        assert_eq!(ErrorCode::SlotUnavailable.category(), ErrorCategory::Slot);
        assert_eq!(
            ErrorCode::NotificationDeliveryFailed.category(),
            ErrorCategory::Notification
        );
        assert_eq!(
            ErrorCode::BackendUnavailable.category(),
            ErrorCategory::System
        );
    }
}
