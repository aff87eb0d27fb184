use anyhow::Context;
use chrono::NaiveDate;
use rusqlite::Connection;
use serde::Deserialize;
use uuid::Uuid;

use crate::db::queries;
use crate::models::{Booking, ChangeEvent, ChangeKind, TakerAssignment};
use crate::services::dates::{self, DateError};
use crate::services::events::ChangeFeed;

pub const MIN_MOBILE_DIGITS: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Mobile number must be at least 10 digits")]
    InvalidMobileNumber,

    #[error(transparent)]
    InvalidDate(#[from] DateError),

    #[error("Selected taker does not exist")]
    TakerNotFound(String),

    #[error("Selected taker is already booked for this date")]
    AlreadyBooked,

    #[error("failed to save booking: {0}")]
    Store(#[from] anyhow::Error),
}

/// Booking form as submitted. Every field is optional here so that a missing
/// field is reported by name; a wrongly typed field is still rejected by the
/// JSON extractor as a 400.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub taker_id: Option<String>,
    pub date: Option<String>,
    pub mobile_no: Option<String>,
    pub delivery_address: Option<String>,
    pub booking_by: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub assignment: TakerAssignment,
    pub date: NaiveDate,
    pub mobile_no: String,
    pub delivery_address: String,
    pub booking_by: Option<String>,
}

impl NewBooking {
    pub fn from_request(req: BookingRequest) -> Result<Self, BookingError> {
        let date = required(req.date, "Date")?;
        let date = dates::parse_day(&date)?;

        let mobile_no = required(req.mobile_no, "Mobile number")?;
        if !is_valid_mobile(&mobile_no) {
            return Err(BookingError::InvalidMobileNumber);
        }

        let delivery_address = required(req.delivery_address, "Delivery address")?;

        Ok(Self {
            assignment: TakerAssignment::from_taker_id(non_blank(req.taker_id)),
            date,
            mobile_no,
            delivery_address,
            booking_by: non_blank(req.booking_by),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(value: Option<String>, field: &'static str) -> Result<String, BookingError> {
    non_blank(value).ok_or(BookingError::MissingField(field))
}

fn is_valid_mobile(mobile: &str) -> bool {
    let allowed = mobile
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' '));
    let digits = mobile.chars().filter(char::is_ascii_digit).count();
    allowed && digits >= MIN_MOBILE_DIGITS
}

/// Creates a booking. The taker lookup, the duplicate check and the insert
/// share one transaction; the `(taker_id, date)` unique index catches
/// anything that slips past the check.
pub fn book_taker(
    conn: &mut Connection,
    feed: &ChangeFeed,
    new: NewBooking,
) -> Result<Booking, BookingError> {
    let tx = conn
        .transaction()
        .context("failed to start booking transaction")?;

    if let TakerAssignment::Assigned { taker_id } = &new.assignment {
        if queries::get_taker(&tx, taker_id)?.is_none() {
            return Err(BookingError::TakerNotFound(taker_id.clone()));
        }
        if queries::booking_exists(&tx, taker_id, new.date)? {
            return Err(BookingError::AlreadyBooked);
        }
    }

    let booking = Booking {
        id: Uuid::new_v4().to_string(),
        date: new.date,
        assignment: new.assignment,
        mobile_no: new.mobile_no,
        delivery_address: new.delivery_address,
        booking_by: new.booking_by,
    };

    if let Err(e) = queries::insert_booking(&tx, &booking) {
        if queries::is_unique_violation(&e) {
            return Err(BookingError::AlreadyBooked);
        }
        return Err(e.into());
    }

    tx.commit().context("failed to commit booking")?;

    tracing::info!(
        booking_id = %booking.id,
        taker_id = booking.assignment.taker_id().unwrap_or("-"),
        date = %booking.date,
        "booking created"
    );

    feed.publish(ChangeEvent {
        kind: ChangeKind::BookingCreated,
        taker_id: booking.assignment.taker_id().map(str::to_string),
        date: Some(booking.date),
    });

    Ok(booking)
}
