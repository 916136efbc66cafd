//! Database Module
//!
//! Embedded SurrealDB storage (RocksDB-backed on disk, in-memory for tests).

pub mod models;
pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

const NAMESPACE: &str = "booking";
const DATABASE: &str = "booking";

/// Database service, owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the on-disk database at the given path
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        define_schema(&db).await?;
        tracing::info!(path = %db_path, "Database connection established");

        Ok(Self { db })
    }

    /// In-memory database for tests
    #[cfg(test)]
    pub async fn memory() -> Result<Self, AppError> {
        use surrealdb::engine::local::Mem;

        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        define_schema(&db).await?;
        Ok(Self { db })
    }
}

/// Define indexes the repositories rely on.
///
/// The unique (date, time) index on `slot` is what keeps concurrent
/// first-access initialization of a date idempotent.
async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query("DEFINE INDEX IF NOT EXISTS slot_date_time ON TABLE slot COLUMNS date, time UNIQUE")
        .query("DEFINE INDEX IF NOT EXISTS reservation_date ON TABLE reservation COLUMNS date")
        .await
        .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?
        .check()
        .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?;
    Ok(())
}
