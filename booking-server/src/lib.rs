//! Booking Server - reservation intake service for a single-location restaurant
//!
//! # Architecture Overview
//!
//! - **Storage** (`db`): embedded SurrealDB with repositories for slots and
//!   reservations
//! - **Domain core** (`reservations`): capacity allocator, status state
//!   machine, change feed, notification dispatcher
//! - **Collaborators** (`services`): outbound email and local alerts
//! - **HTTP API** (`api`): RESTful interface for staff clients
//!
//! # Module Structure
//!
//! ```text
//! booking-server/src/
//! ├── core/          # Config, state, server
//! ├── db/            # Database layer (models, repositories)
//! ├── reservations/  # Admission, transitions, feed, dispatch
//! ├── services/      # Email and alert collaborators
//! ├── api/           # HTTP routes and handlers
//! └── utils/         # Logger, time, validation helpers
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod reservations;
pub mod services;
pub mod utils;

// Re-export public types
pub use core::{Config, Server, ServerState};
pub use reservations::{
    CapacityAllocator, ChangeFeed, NotificationDispatcher, ReservationService, StoreEvent,
};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{cleanup_old_logs, init_logger, init_logger_with_file};
