use super::*;

use crate::db::DbService;
use crate::db::models::{ReservationCreate, ReservationStatus};
use crate::services::alerts::AlertSink;
use crate::services::email::{Mailer, MessageKind};
use crate::utils::{AppError, AppResult};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

mod test_dispatch;
mod test_feed;
mod test_transitions;

const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Date under test; slots are initialized for it in every harness
pub(crate) const TEST_DATE: &str = "2024-06-01";

pub(crate) struct TestHarness {
    pub service: Arc<ReservationService>,
    pub feed: ChangeFeed,
}

/// In-memory store with the canonical slots materialized for
/// [`TEST_DATE`], every slot carrying the given capacity.
pub(crate) async fn harness_with_capacity(capacity: u32) -> TestHarness {
    let db = DbService::memory().await.expect("open in-memory db").db;
    let service = Arc::new(ReservationService::new(db, TEST_TIMEOUT, capacity));
    service
        .slots()
        .ensure_initialized(TEST_DATE)
        .await
        .expect("initialize slots");
    let feed = ChangeFeed::new(Arc::clone(&service));
    TestHarness { service, feed }
}

pub(crate) fn draft(name: &str, time: &str, seats: u32) -> ReservationCreate {
    ReservationCreate {
        full_name: name.to_string(),
        phone: "+34 600 000 001".to_string(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        date: TEST_DATE.to_string(),
        time: time.to_string(),
        seats,
        note: None,
    }
}

/// Mailer double recording every send attempt; optionally failing all of
/// them to exercise the reported-not-rolled-back contract.
pub(crate) struct RecordingMailer {
    sent: parking_lot::Mutex<Vec<(MessageKind, String)>>,
    fail: bool,
}

impl RecordingMailer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            sent: parking_lot::Mutex::new(Vec::new()),
            fail: false,
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            sent: parking_lot::Mutex::new(Vec::new()),
            fail: true,
        })
    }

    pub fn sent(&self) -> Vec<(MessageKind, String)> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, kind: MessageKind, reservation: &crate::db::models::Reservation) -> AppResult<()> {
        self.sent.lock().push((kind, reservation.email.clone()));
        if self.fail {
            return Err(AppError::notification_failed("email endpoint refused"));
        }
        Ok(())
    }
}

/// Alert sink double recording alert titles
pub(crate) struct RecordingAlerts {
    titles: parking_lot::Mutex<Vec<String>>,
}

impl RecordingAlerts {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            titles: parking_lot::Mutex::new(Vec::new()),
        })
    }

    pub fn titles(&self) -> Vec<String> {
        self.titles.lock().clone()
    }

    pub fn count_of(&self, title: &str) -> usize {
        self.titles.lock().iter().filter(|t| *t == title).count()
    }
}

#[async_trait]
impl AlertSink for RecordingAlerts {
    async fn alert(&self, title: &str, _body: &str) {
        self.titles.lock().push(title.to_string());
    }
}

pub(crate) fn dispatcher_with(
    service: &Arc<ReservationService>,
    mailer: Arc<RecordingMailer>,
    alerts: Arc<RecordingAlerts>,
) -> Arc<NotificationDispatcher> {
    Arc::new(NotificationDispatcher::new(
        Arc::clone(service),
        mailer,
        alerts,
    ))
}
