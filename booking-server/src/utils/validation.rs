//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SurrealDB TEXT fields have no built-in length enforcement, so limits
//! are applied at the API boundary.

use super::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Customer names
pub const MAX_NAME_LEN: usize = 200;

/// Free-text notes (special requests)
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone numbers
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Largest party a single reservation may request
pub const MAX_PARTY_SIZE: u32 = 50;

// ── Validation helpers (CRUD handlers) ──────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate an email address: non-empty, within limits, plausible shape.
pub fn validate_email(value: &str) -> Result<(), AppError> {
    validate_required_text(value, "email", MAX_EMAIL_LEN)?;
    let Some((local, domain)) = value.split_once('@') else {
        return Err(AppError::validation(format!("Invalid email: {value}")));
    };
    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(AppError::validation(format!("Invalid email: {value}")));
    }
    Ok(())
}

/// Validate a party size: at least one seat, bounded above.
pub fn validate_seats(seats: u32) -> Result<(), AppError> {
    if seats == 0 {
        return Err(AppError::validation("seats must be at least 1"));
    }
    if seats > MAX_PARTY_SIZE {
        return Err(AppError::validation(format!(
            "seats must not exceed {MAX_PARTY_SIZE}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Mario Rossi", "full_name", MAX_NAME_LEN).is_ok());
        assert!(validate_required_text("   ", "full_name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text(&"x".repeat(201), "full_name", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn test_email() {
        assert!(validate_email("mario@example.com").is_ok());
        assert!(validate_email("mario").is_err());
        assert!(validate_email("mario@nodot").is_err());
        assert!(validate_email("@example.com").is_err());
    }

    #[test]
    fn test_seats() {
        assert!(validate_seats(1).is_ok());
        assert!(validate_seats(0).is_err());
        assert!(validate_seats(51).is_err());
    }
}
