//! NotificationDispatcher - exactly-once side effects per transition
//!
//! Two trigger paths:
//!
//! - **Feed-observed**: the first sighting of a reservation in `pending`
//!   schedules one "new reservation" alert. Redelivered snapshots (feed
//!   reconnects, multi-subscriber fan-out) are absorbed by the dedup map.
//! - **Explicit staff action**: `accept` / `reject` persist the status
//!   transition first, then send one outbound email and one local alert.
//!   Feed-observed transitions never send mail, so several subscribed
//!   staff clients cannot double-send.
//!
//! The dedup map is bounded: pending marks are evicted once the
//! reservation leaves `pending`, and every mark for an id is dropped when
//! the id disappears from the snapshot.

use crate::db::models::{Reservation, ReservationStatus};
use crate::reservations::feed::ChangeFeed;
use crate::reservations::service::ReservationService;
use crate::services::alerts::AlertSink;
use crate::services::email::{Mailer, MessageKind};
use crate::utils::AppResult;
use dashmap::DashMap;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Notification dedup key component: what happened to the reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    PendingCreated,
    Accepted,
    Rejected,
}

/// Result of an accept/reject action
#[derive(Debug, Clone, Serialize)]
pub struct TransitionOutcome {
    pub reservation: Reservation,
    /// Whether the outbound email went through. The transition itself is
    /// committed either way; a failed send is reported, never rolled back.
    pub notified: bool,
}

pub struct NotificationDispatcher {
    service: Arc<ReservationService>,
    mailer: Arc<dyn Mailer>,
    alerts: Arc<dyn AlertSink>,
    dispatched: DashMap<(String, EventKind), ()>,
}

impl NotificationDispatcher {
    pub fn new(
        service: Arc<ReservationService>,
        mailer: Arc<dyn Mailer>,
        alerts: Arc<dyn AlertSink>,
    ) -> Self {
        Self {
            service,
            mailer,
            alerts,
            dispatched: DashMap::new(),
        }
    }

    /// Start watching the change feed for newly created reservations.
    /// Runs until the feed closes or the shutdown token fires.
    pub fn watch(self: Arc<Self>, feed: &ChangeFeed, shutdown: CancellationToken) -> JoinHandle<()> {
        let feed = feed.clone();
        tokio::spawn(async move {
            let mut subscription = feed.subscribe().await;
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    snapshot = subscription.recv() => match snapshot {
                        Some(snapshot) => self.on_snapshot(&snapshot).await,
                        None => break,
                    },
                }
            }
            tracing::debug!("Dispatcher feed watcher stopped");
        })
    }

    /// Process one feed snapshot
    pub(crate) async fn on_snapshot(&self, snapshot: &[Reservation]) {
        let mut live: HashSet<String> = HashSet::with_capacity(snapshot.len());

        for reservation in snapshot {
            let id = reservation.key();
            if id.is_empty() {
                continue;
            }
            live.insert(id.clone());

            match reservation.status {
                ReservationStatus::Pending => {
                    let first_sighting = self
                        .dispatched
                        .insert((id.clone(), EventKind::PendingCreated), ())
                        .is_none();
                    if first_sighting {
                        self.alerts
                            .alert(
                                "New reservation",
                                &format!(
                                    "New reservation from {} for {} people on {} at {}",
                                    reservation.full_name,
                                    reservation.seats,
                                    reservation.date,
                                    reservation.time
                                ),
                            )
                            .await;
                    }
                }
                ReservationStatus::Accepted | ReservationStatus::Rejected => {
                    // The pending mark has done its job; drop it so the map
                    // stays bounded by the live pending set
                    self.dispatched.remove(&(id.clone(), EventKind::PendingCreated));
                }
            }
        }

        // Deleted reservations take all their marks with them
        self.dispatched.retain(|(id, _), _| live.contains(id));
    }

    /// Accept a pending reservation: persist the transition, then send the
    /// confirmation email and the staff alert.
    pub async fn accept(&self, id: &str) -> AppResult<TransitionOutcome> {
        self.finalize(
            id,
            ReservationStatus::Accepted,
            EventKind::Accepted,
            MessageKind::Acceptance,
            "accepted",
        )
        .await
    }

    /// Reject a pending reservation: persist the transition, then send the
    /// rejection email and the staff alert.
    pub async fn reject(&self, id: &str) -> AppResult<TransitionOutcome> {
        self.finalize(
            id,
            ReservationStatus::Rejected,
            EventKind::Rejected,
            MessageKind::Rejection,
            "rejected",
        )
        .await
    }

    async fn finalize(
        &self,
        id: &str,
        target: ReservationStatus,
        kind: EventKind,
        message: MessageKind,
        verb: &str,
    ) -> AppResult<TransitionOutcome> {
        // (a) the transition is the source of truth; any failure here
        // surfaces to the caller and nothing is sent
        let reservation = self.service.transition(id, target).await?;

        if self
            .dispatched
            .insert((id.to_string(), kind), ())
            .is_some()
        {
            tracing::debug!(id = %id, kind = ?kind, "Notification already dispatched, skipping");
            return Ok(TransitionOutcome {
                reservation,
                notified: false,
            });
        }

        // (b) one outbound email; failure is reported, not retried
        let mut notified = true;
        if let Err(e) = self.mailer.send(message, &reservation).await {
            tracing::error!(id = %id, error = %e, "Outbound email failed, transition stands");
            notified = false;
        }

        // (c) one local alert confirming the staff action
        self.alerts
            .alert(
                &format!("Reservation {verb}"),
                &format!(
                    "You {verb} the reservation of {} for {} people",
                    reservation.full_name, reservation.seats
                ),
            )
            .await;

        Ok(TransitionOutcome {
            reservation,
            notified,
        })
    }

    #[cfg(test)]
    pub(crate) fn dedup_len(&self) -> usize {
        self.dispatched.len()
    }
}
