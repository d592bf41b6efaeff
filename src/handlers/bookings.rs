use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;

use crate::errors::{AppError, AppResult};
use crate::models::{BookingPatch, BookingStatus, NewBooking};
use crate::services::booking;
use crate::state::AppState;

use super::check_auth;

// POST /bookings
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<NewBooking>, JsonRejection>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    check_auth(&headers, &state.config.api_key)?;
    let Json(new) = payload?;

    let booking = {
        let db = state.db.lock().unwrap();
        booking::create_booking(&db, new, chrono::Utc::now())?
    };

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "success": true,
            "bookingId": booking.id,
            "booking": booking,
        })),
    ))
}

// GET /bookings/:user_id
#[derive(Deserialize)]
pub struct BookingsQuery {
    pub status: Option<String>,
}

pub async fn list_for_user(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(user_id): Path<String>,
    Query(query): Query<BookingsQuery>,
) -> AppResult<Json<serde_json::Value>> {
    check_auth(&headers, &state.config.api_key)?;

    let status_filter = match query.status.as_deref() {
        Some(s) => Some(
            BookingStatus::parse(s)
                .ok_or_else(|| AppError::Validation(format!("unknown booking status: {s}")))?,
        ),
        None => None,
    };

    let mut bookings = {
        let db = state.db.lock().unwrap();
        booking::list_for_user(&db, &user_id)?
    };
    if let Some(status) = status_filter {
        bookings.retain(|b| b.status == status);
    }

    Ok(Json(serde_json::json!({ "success": true, "bookings": bookings })))
}

// GET /booking/:booking_id
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(booking_id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    check_auth(&headers, &state.config.api_key)?;

    let booking = {
        let db = state.db.lock().unwrap();
        booking::get_booking(&db, &booking_id)?
    };

    Ok(Json(serde_json::json!({ "success": true, "booking": booking })))
}

// PUT /booking/:booking_id
pub async fn update_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(booking_id): Path<String>,
    payload: Result<Json<BookingPatch>, JsonRejection>,
) -> AppResult<Json<serde_json::Value>> {
    check_auth(&headers, &state.config.api_key)?;
    let Json(patch) = payload?;

    let booking = {
        let db = state.db.lock().unwrap();
        booking::update_booking(&db, &booking_id, &patch, chrono::Utc::now())?
    };

    Ok(Json(serde_json::json!({ "success": true, "booking": booking })))
}
