//! Server configuration
//!
//! All configuration comes from environment variables with defaults:
//!
//! | Environment variable | Default | Description |
//! |----------|--------|------|
//! | WORK_DIR | /var/lib/booking/server | Working directory (database, logs) |
//! | HTTP_PORT | 3000 | HTTP API port |
//! | ENVIRONMENT | development | Runtime environment |
//! | REQUEST_TIMEOUT_MS | 30000 | Store call timeout (millis) |
//! | DEFAULT_SLOT_CAPACITY | 15 | Seat capacity for newly initialized slots |
//! | EMAIL_API_URL | EmailJS REST endpoint | Outbound email endpoint |
//! | EMAIL_SERVICE_ID | (empty) | Email service id |
//! | EMAIL_USER_ID | (empty) | Email account public key |
//! | EMAIL_ACCEPT_TEMPLATE | (empty) | Template for acceptance mail |
//! | EMAIL_REJECT_TEMPLATE | (empty) | Template for rejection mail |
//! | EMAIL_FROM_NAME | Booking | Sender display name |
//!
//! With EMAIL_SERVICE_ID or EMAIL_USER_ID unset, outbound mail is disabled
//! and transitions only log.

use crate::db::models::DEFAULT_MAX_CAPACITY;
use crate::services::email::EmailConfig;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for database and log files
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Timeout for backing-store calls (millis)
    pub request_timeout_ms: u64,
    /// Seat capacity assigned to newly initialized slots
    pub default_slot_capacity: u32,
    /// Outbound email settings
    pub email: EmailConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR")
                .unwrap_or_else(|_| "/var/lib/booking/server".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),
            default_slot_capacity: std::env::var("DEFAULT_SLOT_CAPACITY")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_MAX_CAPACITY),
            email: EmailConfig {
                api_url: std::env::var("EMAIL_API_URL")
                    .unwrap_or_else(|_| "https://api.emailjs.com/api/v1.0/email/send".into()),
                service_id: std::env::var("EMAIL_SERVICE_ID").unwrap_or_default(),
                user_id: std::env::var("EMAIL_USER_ID").unwrap_or_default(),
                accept_template: std::env::var("EMAIL_ACCEPT_TEMPLATE").unwrap_or_default(),
                reject_template: std::env::var("EMAIL_REJECT_TEMPLATE").unwrap_or_default(),
                from_name: std::env::var("EMAIL_FROM_NAME").unwrap_or_else(|_| "Booking".into()),
            },
        }
    }

    /// Override work dir and port, commonly for tests
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// Store call timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Database directory (work_dir/database)
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// Log directory (work_dir/logs)
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// Make sure the working directory structure exists
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.log_dir())?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_overrides_and_work_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::with_overrides(dir.path().to_string_lossy(), 0);
        assert_eq!(config.http_port, 0);

        config.ensure_work_dir_structure().unwrap();
        assert!(config.database_dir().exists());
        assert!(config.log_dir().exists());
    }
}
