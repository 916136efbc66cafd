//! Unified error codes for the booking service
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Reservation errors
//! - 5xxx: Slot errors
//! - 6xxx: Notification errors
//! - 9xxx: System errors

use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,

    // ==================== 4xxx: Reservation ====================
    /// Reservation not found
    ReservationNotFound = 4001,
    /// Illegal status transition for a reservation
    InvalidTransition = 4002,
    /// Admitting the request would exceed the slot's seat capacity
    CapacityExceeded = 4003,

    // ==================== 5xxx: Slot ====================
    /// Slot not found
    SlotNotFound = 5001,
    /// Slot exists but is disabled, or does not exist at all
    SlotUnavailable = 5002,

    // ==================== 6xxx: Notification ====================
    /// Outbound message or local alert could not be delivered
    NotificationDeliveryFailed = 6001,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Backing store timed out or is unreachable
    BackendUnavailable = 9003,
}

impl ErrorCode {
    /// Get the numeric code value
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the default human-readable message for this error code
    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => "OK",
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",

            Self::ReservationNotFound => "Reservation not found",
            Self::InvalidTransition => "Reservation status cannot change this way",
            Self::CapacityExceeded => "Slot is fully booked",

            Self::SlotNotFound => "Slot not found",
            Self::SlotUnavailable => "Slot is not available",

            Self::NotificationDeliveryFailed => "Notification could not be delivered",

            Self::InternalError => "Internal server error",
            Self::DatabaseError => "Database error",
            Self::BackendUnavailable => "Backing store unavailable",
        }
    }

    /// Get the HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,
            Self::ValidationFailed | Self::InvalidRequest => StatusCode::BAD_REQUEST,
            Self::NotFound | Self::ReservationNotFound | Self::SlotNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::AlreadyExists | Self::InvalidTransition => StatusCode::CONFLICT,
            Self::CapacityExceeded | Self::SlotUnavailable => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotificationDeliveryFailed => StatusCode::BAD_GATEWAY,
            Self::BackendUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Unknown | Self::InternalError | Self::DatabaseError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code as u16
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Success),
            1 => Ok(Self::Unknown),
            2 => Ok(Self::ValidationFailed),
            3 => Ok(Self::NotFound),
            4 => Ok(Self::AlreadyExists),
            5 => Ok(Self::InvalidRequest),
            4001 => Ok(Self::ReservationNotFound),
            4002 => Ok(Self::InvalidTransition),
            4003 => Ok(Self::CapacityExceeded),
            5001 => Ok(Self::SlotNotFound),
            5002 => Ok(Self::SlotUnavailable),
            6001 => Ok(Self::NotificationDeliveryFailed),
            9001 => Ok(Self::InternalError),
            9002 => Ok(Self::DatabaseError),
            9003 => Ok(Self::BackendUnavailable),
            other => Err(InvalidErrorCode(other)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self, self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        for code in [
            ErrorCode::Success,
            ErrorCode::ValidationFailed,
            ErrorCode::ReservationNotFound,
            ErrorCode::InvalidTransition,
            ErrorCode::CapacityExceeded,
            ErrorCode::SlotUnavailable,
            ErrorCode::NotificationDeliveryFailed,
            ErrorCode::BackendUnavailable,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_unknown_code_rejected() {
        assert_eq!(ErrorCode::try_from(1234), Err(InvalidErrorCode(1234)));
    }

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(
            ErrorCode::CapacityExceeded.http_status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ErrorCode::InvalidTransition.http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ErrorCode::BackendUnavailable.http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
