//! Reservation API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::{Reservation, ReservationCreate, ReservationUpdate};
use crate::reservations::TransitionOutcome;
use crate::utils::{AppResult, time, validation};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    date: Option<String>,
}

/// GET /api/reservations?date=YYYY-MM-DD
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Reservation>>> {
    match query.date {
        Some(date) => {
            time::parse_date(&date)?;
            Ok(Json(state.reservations.list_by_date(&date).await?))
        }
        None => Ok(Json(state.reservations.list_all().await?)),
    }
}

/// POST /api/reservations - submit a seat request
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ReservationCreate>,
) -> AppResult<(StatusCode, Json<Reservation>)> {
    validate_create(&payload)?;
    let reservation = state.reservations.submit(payload).await?;
    Ok((StatusCode::CREATED, Json(reservation)))
}

/// PUT /api/reservations/{id} - edit a reservation
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ReservationUpdate>,
) -> AppResult<Json<Reservation>> {
    validate_update(&payload)?;
    let reservation = state.reservations.edit(&id, payload).await?;
    Ok(Json(reservation))
}

/// DELETE /api/reservations/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Reservation>> {
    let removed = state.reservations.remove(&id).await?;
    Ok(Json(removed))
}

/// POST /api/reservations/{id}/accept - staff accepts a pending request
pub async fn accept(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<TransitionOutcome>> {
    Ok(Json(state.dispatcher.accept(&id).await?))
}

/// POST /api/reservations/{id}/reject - staff rejects a pending request
pub async fn reject(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<TransitionOutcome>> {
    Ok(Json(state.dispatcher.reject(&id).await?))
}

fn validate_create(data: &ReservationCreate) -> AppResult<()> {
    validation::validate_required_text(&data.full_name, "full_name", validation::MAX_NAME_LEN)?;
    validation::validate_required_text(&data.phone, "phone", validation::MAX_SHORT_TEXT_LEN)?;
    validation::validate_email(&data.email)?;
    time::parse_date(&data.date)?;
    time::parse_time(&data.time)?;
    validation::validate_seats(data.seats)?;
    validation::validate_optional_text(&data.note, "note", validation::MAX_NOTE_LEN)?;
    Ok(())
}

fn validate_update(data: &ReservationUpdate) -> AppResult<()> {
    if let Some(full_name) = &data.full_name {
        validation::validate_required_text(full_name, "full_name", validation::MAX_NAME_LEN)?;
    }
    if let Some(phone) = &data.phone {
        validation::validate_required_text(phone, "phone", validation::MAX_SHORT_TEXT_LEN)?;
    }
    if let Some(email) = &data.email {
        validation::validate_email(email)?;
    }
    if let Some(date) = &data.date {
        time::parse_date(date)?;
    }
    if let Some(t) = &data.time {
        time::parse_time(t)?;
    }
    if let Some(seats) = data.seats {
        validation::validate_seats(seats)?;
    }
    validation::validate_optional_text(&data.note, "note", validation::MAX_NOTE_LEN)?;
    Ok(())
}
