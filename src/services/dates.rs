//! Calendar-day handling. Every day in the system is an IST calendar day
//! with no time component; the IST shift is applied once, in [`parse_day`],
//! when a client-supplied instant enters the system.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

/// IST is UTC+5:30.
pub const IST_OFFSET_MINUTES: i64 = 330;

pub const MIN_YEAR: i32 = 1970;
pub const MAX_YEAR: i32 = 2100;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DateError {
    #[error("Invalid date: {0}")]
    InvalidDay(String),

    #[error("Invalid month: {0}")]
    InvalidMonth(u32),

    #[error("Invalid year: {0}")]
    InvalidYear(i32),
}

pub fn ist_day_of(instant: DateTime<Utc>) -> NaiveDate {
    (instant.naive_utc() + Duration::minutes(IST_OFFSET_MINUTES)).date()
}

pub fn today_ist() -> NaiveDate {
    ist_day_of(Utc::now())
}

pub fn day_key(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

/// Accepts a bare `YYYY-MM-DD` day (taken as-is) or an RFC 3339 instant
/// (shifted to IST, then truncated).
pub fn parse_day(input: &str) -> Result<NaiveDate, DateError> {
    let input = input.trim();

    if let Ok(day) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(day);
    }

    DateTime::parse_from_rfc3339(input)
        .map(|dt| ist_day_of(dt.with_timezone(&Utc)))
        .map_err(|_| DateError::InvalidDay(input.to_string()))
}

pub fn month_days(year: i32, month: u32) -> Result<Vec<NaiveDate>, DateError> {
    if !(1..=12).contains(&month) {
        return Err(DateError::InvalidMonth(month));
    }
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(DateError::InvalidYear(year));
    }

    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(DateError::InvalidMonth(month))?;
    Ok(first
        .iter_days()
        .take_while(|d| d.month() == month)
        .collect())
}
