//! ChangeFeed - live reservation snapshots for every observer
//!
//! Mirrors the store's change events: on every create/update/delete the
//! feed refetches the full reservation collection and fans it out to each
//! active subscriber. The underlying store listener (a single pump task)
//! is started by the first subscriber and released when the last one
//! detaches.
//!
//! ```text
//! ReservationService (broadcast StoreEvent)
//!        │
//!        └── pump task ── refetch ──┬── mpsc ──► subscriber 1
//!                                   ├── mpsc ──► subscriber 2
//!                                   └── mpsc ──► NotificationDispatcher
//! ```
//!
//! Snapshot fetch and delivery are serialized through one gate, so each
//! subscriber observes monotonically non-decreasing knowledge. A full
//! subscriber queue drops the intermediate snapshot (a newer one follows),
//! never reorders. When the store read fails the feed degrades to the last
//! known snapshot instead of crashing the subscriber.

use crate::db::models::Reservation;
use crate::reservations::service::{ReservationService, StoreEvent};
use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, broadcast, mpsc};
use tokio::task::JoinHandle;

/// One full reservation collection, shared between subscribers
pub type FeedSnapshot = Arc<Vec<Reservation>>;

/// Per-subscriber delivery queue depth
const SUBSCRIBER_QUEUE_CAPACITY: usize = 16;

#[derive(Clone)]
pub struct ChangeFeed {
    shared: Arc<FeedShared>,
}

struct FeedShared {
    service: Arc<ReservationService>,
    subscribers: DashMap<u64, mpsc::Sender<FeedSnapshot>>,
    next_id: AtomicU64,
    /// Serializes snapshot fetch + delivery: without it a slow refetch
    /// could deliver an older collection after a newer one
    gate: Mutex<()>,
    last_snapshot: parking_lot::RwLock<FeedSnapshot>,
    pump: parking_lot::Mutex<Option<JoinHandle<()>>>,
}

impl ChangeFeed {
    pub fn new(service: Arc<ReservationService>) -> Self {
        Self {
            shared: Arc::new(FeedShared {
                service,
                subscribers: DashMap::new(),
                next_id: AtomicU64::new(1),
                gate: Mutex::new(()),
                last_snapshot: parking_lot::RwLock::new(Arc::new(Vec::new())),
                pump: parking_lot::Mutex::new(None),
            }),
        }
    }

    /// Attach a new subscriber. The current snapshot is delivered
    /// immediately; afterwards every store change produces a delivery.
    pub async fn subscribe(&self) -> FeedSubscription {
        let id = self.shared.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(SUBSCRIBER_QUEUE_CAPACITY);

        {
            let _gate = self.shared.gate.lock().await;
            let snapshot = self.shared.fetch_or_last().await;
            // Queue is empty at this point, the initial snapshot always fits
            let _ = tx.try_send(snapshot);
            self.shared.subscribers.insert(id, tx);
        }
        self.ensure_pump();

        tracing::debug!(subscriber = id, "Feed subscriber attached");
        FeedSubscription {
            id,
            rx,
            shared: Arc::clone(&self.shared),
        }
    }

    /// Number of currently attached subscribers
    pub fn subscriber_count(&self) -> usize {
        self.shared.subscribers.len()
    }

    fn ensure_pump(&self) {
        let mut pump = self.shared.pump.lock();
        let running = pump.as_ref().map(|h| !h.is_finished()).unwrap_or(false);
        if !running {
            let events = self.shared.service.subscribe_events();
            *pump = Some(tokio::spawn(run_pump(Arc::clone(&self.shared), events)));
        }
    }
}

impl FeedShared {
    /// Refetch the full collection, caching it; on a store failure serve
    /// the last known snapshot.
    async fn fetch_or_last(&self) -> FeedSnapshot {
        match self.service.list_all().await {
            Ok(list) => {
                let snapshot = Arc::new(list);
                *self.last_snapshot.write() = Arc::clone(&snapshot);
                snapshot
            }
            Err(e) => {
                tracing::warn!(error = %e, "Feed refresh failed, serving last known snapshot");
                self.last_snapshot.read().clone()
            }
        }
    }

    /// Refetch and deliver to every subscriber
    async fn publish(&self) {
        let _gate = self.gate.lock().await;
        let snapshot = self.fetch_or_last().await;

        let mut dead = Vec::new();
        for entry in self.subscribers.iter() {
            match entry.value().try_send(Arc::clone(&snapshot)) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    // Intermediate snapshot dropped; the subscriber stays
                    // monotonic and catches up on the next delivery
                    tracing::warn!(
                        subscriber = *entry.key(),
                        "Subscriber queue full, snapshot dropped"
                    );
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    dead.push(*entry.key());
                }
            }
        }
        for id in dead {
            self.detach(id);
        }
    }

    fn detach(&self, id: u64) {
        if self.subscribers.remove(&id).is_some() {
            tracing::debug!(subscriber = id, "Feed subscriber detached");
        }
        if self.subscribers.is_empty() {
            // Last subscriber releases the store listener
            if let Some(handle) = self.pump.lock().take() {
                handle.abort();
                tracing::debug!("Change feed pump stopped, no subscribers remain");
            }
        }
    }
}

async fn run_pump(shared: Arc<FeedShared>, mut events: broadcast::Receiver<StoreEvent>) {
    tracing::debug!("Change feed pump started");
    loop {
        match events.recv().await {
            Ok(event) => {
                tracing::trace!(?event, "Store event received");
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                // The refetch below already reflects the skipped events
                tracing::warn!(skipped, "Change feed lagged behind store events");
            }
            Err(broadcast::error::RecvError::Closed) => {
                tracing::debug!("Store event channel closed, feed pump stopping");
                break;
            }
        }
        shared.publish().await;
    }
}

/// Handle for one feed subscriber. Dropping it (or calling
/// [`unsubscribe`](Self::unsubscribe)) detaches the subscriber; no
/// delivery is observable afterwards.
pub struct FeedSubscription {
    id: u64,
    rx: mpsc::Receiver<FeedSnapshot>,
    shared: Arc<FeedShared>,
}

impl FeedSubscription {
    /// Wait for the next snapshot delivery
    pub async fn recv(&mut self) -> Option<FeedSnapshot> {
        self.rx.recv().await
    }

    /// Detach from the feed
    pub fn unsubscribe(self) {
        // Drop does the work
    }
}

impl Drop for FeedSubscription {
    fn drop(&mut self) {
        self.shared.detach(self.id);
    }
}
