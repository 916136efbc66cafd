//! Outbound email collaborator
//!
//! Customers get one email when their reservation is accepted or rejected.
//! The production implementation posts against an EmailJS-style REST
//! endpoint; the collaborator offers at-least-once delivery, the caller
//! (the dispatcher) guarantees at most one call per transition.

use crate::db::models::Reservation;
use crate::utils::{AppError, AppResult, time};
use async_trait::async_trait;
use serde_json::json;

/// Which template the message uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Acceptance,
    Rejection,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send one message to the reservation's contact address
    async fn send(&self, kind: MessageKind, reservation: &Reservation) -> AppResult<()>;
}

/// Outbound email configuration
///
/// All values come from the environment, see [`Config`](crate::core::Config).
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub api_url: String,
    pub service_id: String,
    pub user_id: String,
    pub accept_template: String,
    pub reject_template: String,
    pub from_name: String,
}

impl EmailConfig {
    /// Whether enough is configured to actually send mail
    pub fn is_configured(&self) -> bool {
        !self.api_url.is_empty() && !self.service_id.is_empty() && !self.user_id.is_empty()
    }
}

/// REST mailer posting JSON to the configured endpoint
pub struct RestMailer {
    http: reqwest::Client,
    config: EmailConfig,
}

impl RestMailer {
    pub fn new(config: EmailConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl Mailer for RestMailer {
    async fn send(&self, kind: MessageKind, reservation: &Reservation) -> AppResult<()> {
        let template_id = match kind {
            MessageKind::Acceptance => &self.config.accept_template,
            MessageKind::Rejection => &self.config.reject_template,
        };

        let body = json!({
            "service_id": self.config.service_id,
            "template_id": template_id,
            "user_id": self.config.user_id,
            "accessToken": self.config.user_id,
            "template_params": {
                "to_name": reservation.full_name,
                "to_email": reservation.email,
                "reservation_date": time::format_mail_date(&reservation.date),
                "reservation_time": reservation.time,
                "seats": reservation.seats,
                "from_name": self.config.from_name,
            },
        });

        let response = self
            .http
            .post(&self.config.api_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::notification_failed(format!("Email request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::notification_failed(format!(
                "Email API returned {status}: {text}"
            )));
        }

        tracing::info!(kind = ?kind, to = %reservation.email, "Outbound email sent");
        Ok(())
    }
}

/// Mailer used when no email endpoint is configured: logs and succeeds,
/// so transitions keep working in development setups.
pub struct NoopMailer;

#[async_trait]
impl Mailer for NoopMailer {
    async fn send(&self, kind: MessageKind, reservation: &Reservation) -> AppResult<()> {
        tracing::warn!(
            kind = ?kind,
            to = %reservation.email,
            "Email endpoint not configured, message skipped"
        );
        Ok(())
    }
}
