//! Slot API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::{Slot, SlotToggle};
use crate::db::repository::RepoError;
use crate::utils::{AppError, AppResult, ErrorCode, time};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    date: Option<String>,
}

/// GET /api/slots?date=YYYY-MM-DD - slots for a date, first access
/// initializes the canonical set
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Slot>>> {
    let date = query
        .date
        .ok_or_else(|| AppError::invalid_request("date query parameter is required"))?;
    time::parse_date(&date)?;

    let slots = state.slots().list_for_date(&date).await?;
    Ok(Json(slots))
}

/// PUT /api/slots/{date}/{time} - enable or disable a slot
pub async fn toggle(
    State(state): State<ServerState>,
    Path((date, slot_time)): Path<(String, String)>,
    Json(payload): Json<SlotToggle>,
) -> AppResult<Json<Slot>> {
    time::parse_date(&date)?;
    time::parse_time(&slot_time)?;

    let slot = state
        .slots()
        .set_enabled(&date, &slot_time, payload.enabled)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::SlotNotFound, msg),
            other => other.into(),
        })?;
    tracing::info!(date = %date, time = %slot_time, enabled = payload.enabled, "Slot toggled");
    Ok(Json(slot))
}
