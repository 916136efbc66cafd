//! Side-effect collaborators: outbound email and local alerts

pub mod alerts;
pub mod email;

pub use alerts::{AlertSink, LogAlertSink};
pub use email::{EmailConfig, Mailer, MessageKind, NoopMailer, RestMailer};
