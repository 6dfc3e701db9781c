use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::services::availability;
use crate::state::AppState;

fn check_auth(headers: &HeaderMap, expected_token: &str) -> Result<(), AppError> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").unwrap_or("");
    if token != expected_token {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

// GET /api/admin/bookings
#[derive(Deserialize)]
pub struct BookingsQuery {
    pub date: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Serialize)]
pub struct BookingResponse {
    id: i64,
    name: String,
    time: String,
    date: String,
    status: String,
}

pub async fn get_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let bookings = {
        let db = state.db.lock().unwrap();
        match query.date.as_deref() {
            Some(date) => queries::bookings_by_date(&db, date),
            None => queries::recent_bookings(&db, query.limit.unwrap_or(50)),
        }
        .map_err(AppError::Database)?
    };

    let response: Vec<BookingResponse> = bookings
        .into_iter()
        .map(|b| BookingResponse {
            id: b.id,
            name: b.name,
            time: b.time,
            date: b.date,
            status: b.status.as_str().to_string(),
        })
        .collect();

    Ok(Json(response))
}

// GET /api/admin/availability?date=Janeiro%2015
#[derive(Deserialize)]
pub struct AvailabilityQuery {
    pub date: Option<String>,
}

#[derive(Serialize)]
pub struct AvailabilityResponse {
    date: String,
    available: Vec<SlotView>,
}

#[derive(Serialize)]
pub struct SlotView {
    label: char,
    time: String,
}

pub async fn get_availability(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let date = query
        .date
        .ok_or_else(|| AppError::BadRequest("missing date parameter".to_string()))?;

    let free = {
        let db = state.db.lock().unwrap();
        availability::free_slots(&db, &state.profile.catalog, &date)
            .map_err(|e| AppError::Database(anyhow::anyhow!(e)))?
    };

    let available = free
        .into_iter()
        .map(|slot| SlotView {
            label: slot.label,
            time: slot.time,
        })
        .collect();

    Ok(Json(AvailabilityResponse { date, available }))
}
