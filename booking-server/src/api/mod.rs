//! API route modules
//!
//! # Structure
//!
//! - [`health`] - liveness check
//! - [`reservations`] - reservation intake and staff decisions
//! - [`slots`] - per-date slot configuration

pub mod health;
pub mod reservations;
pub mod slots;

use crate::core::ServerState;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Assemble the full application router
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(reservations::router())
        .merge(slots::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
