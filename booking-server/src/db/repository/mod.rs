//! Repository Module
//!
//! CRUD operations for SurrealDB tables. Every call runs under the
//! configured store timeout: an expired call surfaces as
//! `RepoError::Unavailable` instead of hanging the caller.

pub mod reservation;
pub mod slot;

pub use reservation::ReservationRepository;
pub use slot::SlotRepository;

use shared::error::AppError;
use std::future::Future;
use std::time::Duration;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => {
                AppError::with_message(shared::error::ErrorCode::NotFound, msg)
            }
            RepoError::Database(msg) => AppError::database(msg),
            RepoError::Unavailable(msg) => AppError::backend_unavailable(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with database reference and store timeout
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
    timeout: Duration,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>, timeout: Duration) -> Self {
        Self { db, timeout }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }

    /// Run a store operation under the configured timeout
    pub(crate) async fn guard<T, F>(&self, op: &'static str, fut: F) -> RepoResult<T>
    where
        F: Future<Output = Result<T, surrealdb::Error>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(RepoError::Database(e.to_string())),
            Err(_) => Err(RepoError::Unavailable(format!(
                "{op} timed out after {}ms",
                self.timeout.as_millis()
            ))),
        }
    }
}
