//! Reservation Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Reservation, ReservationCreate, ReservationStatus, ReservationUpdate};
use serde::Deserialize;
use std::time::Duration;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "reservation";

#[derive(Clone)]
pub struct ReservationRepository {
    base: BaseRepository,
}

#[derive(Debug, Deserialize)]
struct SeatTotal {
    total: Option<i64>,
}

impl ReservationRepository {
    pub fn new(db: Surreal<Db>, timeout: Duration) -> Self {
        Self {
            base: BaseRepository::new(db, timeout),
        }
    }

    fn parse_id(&self, id: &str) -> RepoResult<RecordId> {
        id.parse()
            .map_err(|_| RepoError::Validation(format!("Invalid reservation ID: {}", id)))
    }

    /// Persist a new reservation. Status is forced to `pending` and the
    /// insertion timestamp is stamped here, whatever the caller sent.
    pub async fn create(&self, data: ReservationCreate) -> RepoResult<Reservation> {
        let reservation = Reservation {
            id: None,
            full_name: data.full_name,
            phone: data.phone,
            email: data.email,
            date: data.date,
            time: data.time,
            seats: data.seats,
            note: data.note,
            status: ReservationStatus::Pending,
            created_at: shared::util::now_millis(),
        };

        let db = self.base.db().clone();
        let created: Option<Reservation> = self
            .base
            .guard("create reservation", async move {
                db.create(TABLE).content(reservation).await
            })
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create reservation".to_string()))
    }

    /// Find reservation by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Reservation>> {
        let thing = self.parse_id(id)?;
        let db = self.base.db().clone();
        self.base
            .guard("read reservation", async move { db.select(thing).await })
            .await
    }

    /// All reservations for a date, ordered by slot time then insertion order
    pub async fn find_by_date(&self, date: &str) -> RepoResult<Vec<Reservation>> {
        let db = self.base.db().clone();
        let date = date.to_string();
        self.base
            .guard("list reservations", async move {
                let mut result = db
                    .query(
                        "SELECT * FROM reservation WHERE date = $date ORDER BY time, created_at",
                    )
                    .bind(("date", date))
                    .await?;
                result.take(0)
            })
            .await
    }

    /// Every reservation in the store (the change-feed snapshot source)
    pub async fn find_all(&self) -> RepoResult<Vec<Reservation>> {
        let db = self.base.db().clone();
        self.base
            .guard("list reservations", async move {
                let mut result = db
                    .query("SELECT * FROM reservation ORDER BY date, time, created_at")
                    .await?;
                result.take(0)
            })
            .await
    }

    /// Apply a field patch to a reservation
    pub async fn update(&self, id: &str, data: ReservationUpdate) -> RepoResult<Reservation> {
        let thing = self.parse_id(id)?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Reservation {} not found", id)))?;

        let full_name = data.full_name.unwrap_or(existing.full_name);
        let phone = data.phone.unwrap_or(existing.phone);
        let email = data.email.unwrap_or(existing.email);
        let date = data.date.unwrap_or(existing.date);
        let time = data.time.unwrap_or(existing.time);
        let seats = data.seats.unwrap_or(existing.seats);
        let note = data.note.or(existing.note);

        let db = self.base.db().clone();
        self.base
            .guard("update reservation", async move {
                db.query(
                    "UPDATE $thing SET full_name = $full_name, phone = $phone, email = $email, \
                     date = $date, time = $time, seats = $seats, note = $note",
                )
                .bind(("thing", thing))
                .bind(("full_name", full_name))
                .bind(("phone", phone))
                .bind(("email", email))
                .bind(("date", date))
                .bind(("time", time))
                .bind(("seats", seats))
                .bind(("note", note))
                .await?
                .check()?;
                Ok(())
            })
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Reservation {} not found", id)))
    }

    /// Move a reservation out of `pending`, conditionally.
    ///
    /// The status write carries a `WHERE status = 'pending'` guard, so of
    /// two racing transitions exactly one commits; the loser sees `None`.
    pub async fn transition_from_pending(
        &self,
        id: &str,
        status: ReservationStatus,
    ) -> RepoResult<Option<Reservation>> {
        let thing = self.parse_id(id)?;
        let db = self.base.db().clone();
        let updated: Vec<Reservation> = self
            .base
            .guard("update reservation status", async move {
                let mut result = db
                    .query("UPDATE $thing SET status = $status WHERE status = 'pending'")
                    .bind(("thing", thing))
                    .bind(("status", status))
                    .await?;
                result.take(0)
            })
            .await?;
        Ok(updated.into_iter().next())
    }

    /// Hard delete. Returns the removed record, `None` if it did not exist.
    pub async fn delete(&self, id: &str) -> RepoResult<Option<Reservation>> {
        let thing = self.parse_id(id)?;
        let Some(existing) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let db = self.base.db().clone();
        self.base
            .guard("delete reservation", async move {
                db.query("DELETE $thing")
                    .bind(("thing", thing))
                    .await?
                    .check()?;
                Ok(())
            })
            .await?;
        Ok(Some(existing))
    }

    /// Committed seats for a slot: the seat sum over reservations in
    /// `pending` or `accepted` status (rejected ones consume nothing).
    ///
    /// `exclude` removes one reservation's own contribution, for edit
    /// revalidation. Callers needing atomicity against concurrent
    /// admissions must hold the slot's admission lock around this call.
    pub async fn sum_committed_seats(
        &self,
        date: &str,
        time: &str,
        exclude: Option<&RecordId>,
    ) -> RepoResult<u64> {
        let db = self.base.db().clone();
        let date = date.to_string();
        let time = time.to_string();
        let exclude = exclude.cloned();

        let rows: Vec<SeatTotal> = self
            .base
            .guard("sum committed seats", async move {
                let mut result = match exclude {
                    Some(exclude) => {
                        db.query(
                            "SELECT math::sum(seats) AS total FROM reservation \
                             WHERE date = $date AND time = $time \
                             AND status IN ['pending', 'accepted'] \
                             AND id != $exclude GROUP ALL",
                        )
                        .bind(("date", date))
                        .bind(("time", time))
                        .bind(("exclude", exclude))
                        .await?
                    }
                    None => {
                        db.query(
                            "SELECT math::sum(seats) AS total FROM reservation \
                             WHERE date = $date AND time = $time \
                             AND status IN ['pending', 'accepted'] GROUP ALL",
                        )
                        .bind(("date", date))
                        .bind(("time", time))
                        .await?
                    }
                };
                result.take(0)
            })
            .await?;

        Ok(rows
            .into_iter()
            .next()
            .and_then(|r| r.total)
            .unwrap_or(0)
            .max(0) as u64)
    }
}
