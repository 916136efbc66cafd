//! Server state - shared handles for every service component
//!
//! `ServerState` is cloned into each request handler; all members are
//! shallow (Arc-backed) copies.
//!
//! | Field | Type | Role |
//! |------|------|------|
//! | config | Config | Immutable configuration |
//! | db | Surreal<Db> | Embedded database handle |
//! | reservations | Arc<ReservationService> | Store facade + admission |
//! | feed | ChangeFeed | Live snapshot fan-out |
//! | dispatcher | Arc<NotificationDispatcher> | Accept/reject + alerts |

use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tokio_util::sync::CancellationToken;

use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::SlotRepository;
use crate::reservations::{ChangeFeed, NotificationDispatcher, ReservationService};
use crate::services::{AlertSink, LogAlertSink, Mailer, NoopMailer, RestMailer};
use crate::utils::{AppError, AppResult};

#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub reservations: Arc<ReservationService>,
    pub feed: ChangeFeed,
    pub dispatcher: Arc<NotificationDispatcher>,
    /// Cancels background tasks on shutdown
    pub shutdown: CancellationToken,
}

impl ServerState {
    /// Initialize the full component graph
    ///
    /// Order: working directory, database, reservation service, change
    /// feed, mailer (REST when configured, logging no-op otherwise),
    /// dispatcher.
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| AppError::internal(format!("Failed to create work directory: {e}")))?;

        let db_path = config.database_dir().join("booking.db");
        let db_service = DbService::new(&db_path.to_string_lossy()).await?;
        let db = db_service.db;

        let reservations = Arc::new(ReservationService::new(
            db.clone(),
            config.request_timeout(),
            config.default_slot_capacity,
        ));
        let feed = ChangeFeed::new(Arc::clone(&reservations));

        let mailer: Arc<dyn Mailer> = if config.email.is_configured() {
            Arc::new(RestMailer::new(config.email.clone()))
        } else {
            tracing::warn!("Outbound email not configured, customer mail disabled");
            Arc::new(NoopMailer)
        };
        let alerts: Arc<dyn AlertSink> = Arc::new(LogAlertSink);

        let dispatcher = Arc::new(NotificationDispatcher::new(
            Arc::clone(&reservations),
            mailer,
            alerts,
        ));

        Ok(Self {
            config: config.clone(),
            db,
            reservations,
            feed,
            dispatcher,
            shutdown: CancellationToken::new(),
        })
    }

    /// Start background tasks. Must be called before serving requests.
    ///
    /// Currently: the dispatcher's feed watcher (new-reservation alerts).
    pub fn start_background_tasks(&self) {
        let _watcher = Arc::clone(&self.dispatcher).watch(&self.feed, self.shutdown.clone());
    }

    /// Slot configuration access
    pub fn slots(&self) -> &SlotRepository {
        self.reservations.slots()
    }
}
