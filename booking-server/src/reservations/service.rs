//! ReservationService - the store facade the rest of the system talks to
//!
//! Wraps the repositories, drives the allocator and the status state
//! machine, and emits a [`StoreEvent`] on an internal broadcast channel
//! after every committed mutation. The [`ChangeFeed`](super::feed)
//! mirrors that stream to its subscribers.

use crate::db::models::{
    Reservation, ReservationCreate, ReservationStatus, ReservationUpdate,
};
use crate::db::repository::{ReservationRepository, SlotRepository};
use crate::reservations::allocator::CapacityAllocator;
use crate::reservations::status;
use crate::utils::{AppError, AppResult};
use std::time::Duration;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tokio::sync::broadcast;

/// Store change notification, broadcast after the mutation committed
#[derive(Debug, Clone)]
pub enum StoreEvent {
    Created(Reservation),
    Updated(Reservation),
    Deleted { id: String },
}

/// Event broadcast channel capacity. The feed refetches the full
/// collection on every event, so a lagged receiver heals on the next
/// delivery; the buffer only needs to ride out bursts.
const EVENT_CHANNEL_CAPACITY: usize = 1024;

pub struct ReservationService {
    repo: ReservationRepository,
    slots: SlotRepository,
    allocator: CapacityAllocator,
    event_tx: broadcast::Sender<StoreEvent>,
}

impl ReservationService {
    pub fn new(db: Surreal<Db>, timeout: Duration, default_capacity: u32) -> Self {
        let repo = ReservationRepository::new(db.clone(), timeout);
        let slots = SlotRepository::new(db, timeout, default_capacity);
        let allocator = CapacityAllocator::new(repo.clone(), slots.clone());
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            repo,
            slots,
            allocator,
            event_tx,
        }
    }

    /// Subscribe to store change events
    pub fn subscribe_events(&self) -> broadcast::Receiver<StoreEvent> {
        self.event_tx.subscribe()
    }

    /// Slot configuration access (listing, toggling)
    pub fn slots(&self) -> &SlotRepository {
        &self.slots
    }

    fn emit(&self, event: StoreEvent) {
        if self.event_tx.send(event).is_err() {
            tracing::debug!("Store event dropped: no active receivers");
        }
    }

    /// Submit a new reservation request through the capacity allocator.
    /// On success the reservation is stored as `pending`.
    pub async fn submit(&self, data: ReservationCreate) -> AppResult<Reservation> {
        let reservation = self.allocator.admit(data).await?;
        self.emit(StoreEvent::Created(reservation.clone()));
        Ok(reservation)
    }

    /// Edit a reservation. Changes to seats, time or date re-validate the
    /// capacity invariant before anything is written.
    pub async fn edit(&self, id: &str, data: ReservationUpdate) -> AppResult<Reservation> {
        let reservation = self.allocator.revalidate_edit(id, data).await?;
        self.emit(StoreEvent::Updated(reservation.clone()));
        Ok(reservation)
    }

    /// Delete a reservation. Permitted from any status; the seats of a
    /// pending or accepted reservation are freed immediately since the
    /// committed-seat sum no longer sees the record.
    pub async fn remove(&self, id: &str) -> AppResult<Reservation> {
        let removed = self.repo.delete(id).await?.ok_or_else(|| {
            AppError::with_message(
                shared::error::ErrorCode::ReservationNotFound,
                format!("Reservation {} not found", id),
            )
        })?;
        tracing::info!(id = %id, status = %removed.status, "Reservation deleted");
        self.emit(StoreEvent::Deleted { id: id.to_string() });
        Ok(removed)
    }

    /// Apply a status transition through the state machine.
    ///
    /// The store write is conditional on the record still being `pending`,
    /// so two racing staff decisions cannot both commit: the loser gets
    /// `InvalidTransition` like any other illegal request.
    pub async fn transition(
        &self,
        id: &str,
        target: ReservationStatus,
    ) -> AppResult<Reservation> {
        let existing = self.repo.find_by_id(id).await?.ok_or_else(|| {
            AppError::with_message(
                shared::error::ErrorCode::ReservationNotFound,
                format!("Reservation {} not found", id),
            )
        })?;

        status::validate_transition(existing.status, target)?;

        let updated = self
            .repo
            .transition_from_pending(id, target)
            .await?
            .ok_or_else(|| {
                AppError::invalid_transition(format!(
                    "Reservation {} already left pending",
                    id
                ))
            })?;

        tracing::info!(id = %id, status = %target, "Reservation status changed");
        self.emit(StoreEvent::Updated(updated.clone()));
        Ok(updated)
    }

    /// Fetch a reservation by id
    pub async fn get(&self, id: &str) -> AppResult<Reservation> {
        self.repo.find_by_id(id).await?.ok_or_else(|| {
            AppError::with_message(
                shared::error::ErrorCode::ReservationNotFound,
                format!("Reservation {} not found", id),
            )
        })
    }

    /// Reservations for a date, ordered by slot time then insertion order
    pub async fn list_by_date(&self, date: &str) -> AppResult<Vec<Reservation>> {
        Ok(self.repo.find_by_date(date).await?)
    }

    /// Every reservation in the store
    pub async fn list_all(&self) -> AppResult<Vec<Reservation>> {
        Ok(self.repo.find_all().await?)
    }
}
