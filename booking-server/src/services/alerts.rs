//! Local alert collaborator
//!
//! Fire-and-forget notifications aimed at the staff device. Platform
//! notification plumbing (channels, permissions, push tokens) lives in the
//! client; the server side only needs a sink it can call unconditionally,
//! tolerating silent no-ops.

use async_trait::async_trait;

#[async_trait]
pub trait AlertSink: Send + Sync {
    async fn alert(&self, title: &str, body: &str);
}

/// Default sink: structured log lines under the `alerts` target, which
/// staff clients tail through the log pipeline.
pub struct LogAlertSink;

#[async_trait]
impl AlertSink for LogAlertSink {
    async fn alert(&self, title: &str, body: &str) {
        tracing::info!(target: "alerts", title = %title, body = %body, "Local alert");
    }
}
