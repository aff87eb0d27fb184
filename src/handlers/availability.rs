use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::{Taker, TakerAvailability};
use crate::services::{availability, dates};
use crate::state::AppState;

// GET /api/availability?month=6&year=2024
#[derive(Deserialize)]
pub struct MonthQuery {
    pub month: Option<String>,
    pub year: Option<String>,
}

fn parse_param<T: FromStr>(value: Option<&str>) -> Result<T, AppError> {
    value
        .and_then(|v| v.trim().parse().ok())
        .ok_or_else(|| AppError::Validation("Invalid month or year".to_string()))
}

pub async fn month_availability(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<BTreeMap<String, bool>>, AppError> {
    let month: u32 = parse_param(query.month.as_deref())?;
    let year: i32 = parse_param(query.year.as_deref())?;

    let map = {
        let db = state.db.conn();
        availability::month_availability(&db, year, month)?
    };

    Ok(Json(map))
}

// GET /api/availability/takers?date=2024-06-01
#[derive(Deserialize)]
pub struct DayQuery {
    pub date: Option<String>,
}

impl DayQuery {
    fn day(&self) -> Result<chrono::NaiveDate, AppError> {
        let raw = self
            .date
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .ok_or_else(|| AppError::Validation("Date is required".to_string()))?;
        Ok(dates::parse_day(raw)?)
    }
}

pub async fn takers_for_day(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DayQuery>,
) -> Result<Json<Vec<TakerAvailability>>, AppError> {
    let day = query.day()?;

    let takers = {
        let db = state.db.conn();
        availability::takers_for_day(&db, day)?
    };

    Ok(Json(takers))
}

// GET /api/availability/takers/free?date=2024-06-01
pub async fn free_takers(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DayQuery>,
) -> Result<Json<Vec<Taker>>, AppError> {
    let day = query.day()?;

    let takers = {
        let db = state.db.conn();
        availability::free_takers_for_day(&db, day)?
    };

    Ok(Json(takers))
}
