//! Time helpers - date/time string parsing and formatting
//!
//! Slots and reservations carry their date as `YYYY-MM-DD` and their time
//! as `HH:MM`; parsing happens at the API boundary, storage and domain
//! logic only see validated strings.

use chrono::{NaiveDate, NaiveTime};

use super::{AppError, AppResult};

/// Parse a date string (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// Parse a time-of-day string (HH:MM)
pub fn parse_time(time: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(time, "%H:%M")
        .map_err(|_| AppError::validation(format!("Invalid time format: {}", time)))
}

/// Format a stored date for outbound mail (dd/MM/yyyy)
///
/// Falls back to the stored string if it does not parse, so a malformed
/// record degrades the mail content rather than failing the send.
pub fn format_mail_date(date: &str) -> String {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|_| date.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert!(parse_date("2024-06-01").is_ok());
        assert!(parse_date("01/06/2024").is_err());
        assert!(parse_date("2024-13-01").is_err());
    }

    #[test]
    fn test_parse_time() {
        assert!(parse_time("20:00").is_ok());
        assert!(parse_time("8pm").is_err());
        assert!(parse_time("25:00").is_err());
    }

    #[test]
    fn test_format_mail_date() {
        assert_eq!(format_mail_date("2024-06-01"), "01/06/2024");
        assert_eq!(format_mail_date("garbage"), "garbage");
    }
}
