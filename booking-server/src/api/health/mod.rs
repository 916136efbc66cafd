//! Health check endpoint

use crate::core::ServerState;
use axum::{Json, Router, routing::get};

pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
