//! Reservation status state machine
//!
//! ```text
//!            ┌─> accepted (terminal)
//! pending ───┤
//!            └─> rejected (terminal)
//! ```
//!
//! A reservation leaves `pending` exactly once. Deleting a reservation is
//! not a transition; it is allowed from any state and frees the seats of
//! pending/accepted reservations immediately.

use crate::db::models::ReservationStatus;
use crate::utils::{AppError, AppResult};

/// Validate a requested status change.
///
/// Only `pending -> accepted` and `pending -> rejected` are legal; every
/// other request (including terminal -> same state) is rejected so a
/// decision can never be silently overwritten.
pub fn validate_transition(
    current: ReservationStatus,
    target: ReservationStatus,
) -> AppResult<()> {
    match (current, target) {
        (ReservationStatus::Pending, ReservationStatus::Accepted)
        | (ReservationStatus::Pending, ReservationStatus::Rejected) => Ok(()),
        _ => Err(AppError::invalid_transition(format!(
            "Cannot change reservation status from {} to {}",
            current, target
        ))
        .with_detail("from", current.to_string())
        .with_detail("to", target.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::ReservationStatus::*;

    #[test]
    fn test_legal_transitions() {
        assert!(validate_transition(Pending, Accepted).is_ok());
        assert!(validate_transition(Pending, Rejected).is_ok());
    }

    #[test]
    fn test_illegal_transitions() {
        for (from, to) in [
            (Pending, Pending),
            (Accepted, Accepted),
            (Accepted, Rejected),
            (Accepted, Pending),
            (Rejected, Rejected),
            (Rejected, Accepted),
            (Rejected, Pending),
        ] {
            let err = validate_transition(from, to).unwrap_err();
            assert_eq!(err.code, shared::error::ErrorCode::InvalidTransition);
        }
    }
}
