//! Slot Repository
//!
//! Per-date slot configuration. Dates are materialized lazily: the first
//! access to a date creates the canonical slot set with the default-enabled
//! subset.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{CANONICAL_TIMES, DEFAULT_ENABLED_TIMES, Slot};
use serde::Deserialize;
use std::time::Duration;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "slot";

#[derive(Clone)]
pub struct SlotRepository {
    base: BaseRepository,
    default_capacity: u32,
}

#[derive(Debug, Deserialize)]
struct CountRow {
    total: i64,
}

impl SlotRepository {
    pub fn new(db: Surreal<Db>, timeout: Duration, default_capacity: u32) -> Self {
        Self {
            base: BaseRepository::new(db, timeout),
            default_capacity,
        }
    }

    /// Create the canonical slot set for a date if none exists yet.
    ///
    /// Idempotent: a date that already has slots is left untouched, so
    /// staff toggles survive re-initialization. `INSERT IGNORE` plus the
    /// unique (date, time) index keeps concurrent first access safe.
    pub async fn ensure_initialized(&self, date: &str) -> RepoResult<()> {
        if self.count_for_date(date).await? > 0 {
            return Ok(());
        }

        let slots: Vec<Slot> = CANONICAL_TIMES
            .iter()
            .map(|time| Slot {
                id: None,
                date: date.to_string(),
                time: time.to_string(),
                enabled: DEFAULT_ENABLED_TIMES.contains(time),
                max_capacity: self.default_capacity,
            })
            .collect();

        let db = self.base.db().clone();
        self.base
            .guard("initialize slots", async move {
                db.query("INSERT IGNORE INTO slot $slots")
                    .bind(("slots", slots))
                    .await?
                    .check()?;
                Ok(())
            })
            .await?;

        tracing::info!(date = %date, "Initialized canonical slots for date");
        Ok(())
    }

    async fn count_for_date(&self, date: &str) -> RepoResult<i64> {
        let db = self.base.db().clone();
        let date = date.to_string();
        let rows: Vec<CountRow> = self
            .base
            .guard("count slots", async move {
                let mut result = db
                    .query("SELECT count() AS total FROM slot WHERE date = $date GROUP ALL")
                    .bind(("date", date))
                    .await?;
                result.take(0)
            })
            .await?;
        Ok(rows.into_iter().next().map(|r| r.total).unwrap_or(0))
    }

    /// Slots for a date in canonical time order; first access initializes
    /// the date.
    pub async fn list_for_date(&self, date: &str) -> RepoResult<Vec<Slot>> {
        self.ensure_initialized(date).await?;

        let db = self.base.db().clone();
        let date = date.to_string();
        self.base
            .guard("list slots", async move {
                let mut result = db
                    .query("SELECT * FROM slot WHERE date = $date ORDER BY time")
                    .bind(("date", date))
                    .await?;
                result.take(0)
            })
            .await
    }

    /// Find a slot by (date, time)
    pub async fn get(&self, date: &str, time: &str) -> RepoResult<Option<Slot>> {
        let db = self.base.db().clone();
        let date = date.to_string();
        let time = time.to_string();
        let slots: Vec<Slot> = self
            .base
            .guard("read slot", async move {
                let mut result = db
                    .query("SELECT * FROM slot WHERE date = $date AND time = $time LIMIT 1")
                    .bind(("date", date))
                    .bind(("time", time))
                    .await?;
                result.take(0)
            })
            .await?;
        Ok(slots.into_iter().next())
    }

    /// Toggle a slot's enabled flag. Unknown slots are an error.
    pub async fn set_enabled(&self, date: &str, time: &str, enabled: bool) -> RepoResult<Slot> {
        let db = self.base.db().clone();
        let date_owned = date.to_string();
        let time_owned = time.to_string();
        let updated: Vec<Slot> = self
            .base
            .guard("toggle slot", async move {
                let mut result = db
                    .query(
                        "UPDATE slot SET enabled = $enabled \
                         WHERE date = $date AND time = $time",
                    )
                    .bind(("enabled", enabled))
                    .bind(("date", date_owned))
                    .bind(("time", time_owned))
                    .await?;
                result.take(0)
            })
            .await?;

        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Slot {} {} not found", date, time)))
    }
}
