//! Capacity allocator - atomic slot admission
//!
//! The read of the committed-seat total and the write of the new
//! reservation happen under a per-(date, time) async mutex, so two
//! concurrent requests that each fit individually can never overbook a
//! slot together. Admissions for different slots never contend.

use crate::db::models::{Reservation, ReservationCreate, ReservationUpdate, Slot, SlotKey};
use crate::db::repository::{ReservationRepository, SlotRepository};
use crate::utils::{AppError, AppResult, validation};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct CapacityAllocator {
    reservations: ReservationRepository,
    slots: SlotRepository,
    /// One admission lock per slot, created on first use. The map grows
    /// with the number of distinct slots ever touched, which is bounded
    /// by dates-in-service x canonical times.
    locks: DashMap<SlotKey, Arc<Mutex<()>>>,
}

impl CapacityAllocator {
    pub fn new(reservations: ReservationRepository, slots: SlotRepository) -> Self {
        Self {
            reservations,
            slots,
            locks: DashMap::new(),
        }
    }

    fn lock_for(&self, key: &SlotKey) -> Arc<Mutex<()>> {
        self.locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Fetch the target slot and fail unless it exists and is enabled
    async fn available_slot(&self, date: &str, time: &str) -> AppResult<Slot> {
        let slot = self
            .slots
            .get(date, time)
            .await?
            .ok_or_else(|| {
                AppError::slot_unavailable(format!("No slot at {} on {}", time, date))
                    .with_detail("date", date)
                    .with_detail("time", time)
            })?;
        if !slot.enabled {
            return Err(
                AppError::slot_unavailable(format!("Slot {} on {} is disabled", time, date))
                    .with_detail("date", date)
                    .with_detail("time", time),
            );
        }
        Ok(slot)
    }

    /// Check the capacity invariant for a slot, excluding at most one
    /// reservation's own contribution. Must be called with the slot's
    /// admission lock held.
    async fn check_capacity(
        &self,
        slot: &Slot,
        seats: u32,
        exclude: Option<&surrealdb::RecordId>,
    ) -> AppResult<()> {
        let committed = self
            .reservations
            .sum_committed_seats(&slot.date, &slot.time, exclude)
            .await?;

        if committed + seats as u64 > slot.max_capacity as u64 {
            return Err(AppError::capacity_exceeded(format!(
                "Slot {} on {} has {} of {} seats taken, cannot admit {}",
                slot.time, slot.date, committed, slot.max_capacity, seats
            ))
            .with_detail("committed", committed)
            .with_detail("requested", seats)
            .with_detail("max_capacity", slot.max_capacity));
        }
        Ok(())
    }

    /// Admit a new reservation request against its slot's remaining
    /// capacity and persist it as `pending`.
    pub async fn admit(&self, data: ReservationCreate) -> AppResult<Reservation> {
        validation::validate_seats(data.seats)?;

        let key = SlotKey::new(&data.date, &data.time);
        let lock = self.lock_for(&key);
        let _guard = lock.lock().await;

        let slot = self.available_slot(&data.date, &data.time).await?;
        self.check_capacity(&slot, data.seats, None).await?;

        let reservation = self.reservations.create(data).await?;
        tracing::info!(
            id = %reservation.key(),
            slot = %key,
            seats = reservation.seats,
            "Reservation admitted"
        );
        Ok(reservation)
    }

    /// Re-validate the capacity invariant for an edit and persist the
    /// patch.
    ///
    /// The invariant is re-run against the target slot excluding the
    /// reservation's own prior contribution. When the edit moves the
    /// reservation between slots, both admission locks are taken in
    /// canonical key order so two crossing edits cannot deadlock.
    pub async fn revalidate_edit(
        &self,
        id: &str,
        data: ReservationUpdate,
    ) -> AppResult<Reservation> {
        let existing = self
            .reservations
            .find_by_id(id)
            .await?
            .ok_or_else(|| {
                AppError::with_message(
                    shared::error::ErrorCode::ReservationNotFound,
                    format!("Reservation {} not found", id),
                )
            })?;

        let seats = data.seats.unwrap_or(existing.seats);
        validation::validate_seats(seats)?;

        let current_key = SlotKey::new(&existing.date, &existing.time);
        let target_key = SlotKey::new(
            data.date.as_deref().unwrap_or(&existing.date),
            data.time.as_deref().unwrap_or(&existing.time),
        );

        let (first, second) = if current_key == target_key {
            (current_key.clone(), None)
        } else if current_key < target_key {
            (current_key.clone(), Some(target_key.clone()))
        } else {
            (target_key.clone(), Some(current_key.clone()))
        };

        let first_lock = self.lock_for(&first);
        let _first_guard = first_lock.lock().await;
        let second_lock = second.as_ref().map(|key| self.lock_for(key));
        let _second_guard = match &second_lock {
            Some(lock) => Some(lock.lock().await),
            None => None,
        };

        if data.touches_capacity() {
            let slot = self
                .available_slot(&target_key.date, &target_key.time)
                .await?;
            self.check_capacity(&slot, seats, existing.id.as_ref())
                .await?;
        }

        let updated = self.reservations.update(id, data).await?;
        tracing::info!(id = %updated.key(), slot = %target_key, "Reservation updated");
        Ok(updated)
    }
}
