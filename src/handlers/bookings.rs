use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use super::{check_auth, JsonBody};
use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Booking, BookingWithTaker};
use crate::services::booking::{self, BookingRequest, NewBooking};
use crate::services::dates;
use crate::state::AppState;

// POST /api/bookings
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody<BookingRequest>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let new = NewBooking::from_request(body)?;

    let booking = {
        let mut db = state.db.conn();
        booking::book_taker(&mut db, &state.events, new)?
    };

    Ok((StatusCode::CREATED, Json(booking)))
}

// GET /api/deliveries/upcoming
pub async fn upcoming_deliveries(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<BookingWithTaker>>, AppError> {
    let deliveries = {
        let db = state.db.conn();
        queries::get_upcoming_bookings(&db, dates::today_ist())?
    };
    Ok(Json(deliveries))
}

// GET /api/bookings
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<BookingWithTaker>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let bookings = {
        let db = state.db.conn();
        queries::get_all_bookings(&db)?
    };
    Ok(Json(bookings))
}
