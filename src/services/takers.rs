use rusqlite::Connection;
use uuid::Uuid;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{ChangeEvent, ChangeKind, Taker, TakerStatus};
use crate::services::dates;
use crate::services::events::ChangeFeed;

pub fn parse_status(status: Option<&str>) -> Result<TakerStatus, AppError> {
    let status = status
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation("Status is required".to_string()))?;

    TakerStatus::parse(status).ok_or_else(|| {
        AppError::Validation(format!(
            "Invalid status: {status} (expected AVAILABLE or UNDER_MAINTENANCE)"
        ))
    })
}

pub fn add_taker(
    conn: &Connection,
    feed: &ChangeFeed,
    name: Option<&str>,
    kind: Option<&str>,
) -> Result<Taker, AppError> {
    let name = name.map(str::trim).unwrap_or_default();
    let kind = kind.map(str::trim).unwrap_or_default();
    if name.is_empty() || kind.is_empty() {
        return Err(AppError::Validation("Name and type are required".to_string()));
    }

    let taker = Taker {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        kind: kind.to_string(),
        status: TakerStatus::Available,
    };
    queries::insert_taker(conn, &taker)?;

    tracing::info!(taker_id = %taker.id, name = %taker.name, kind = %taker.kind, "taker added");
    feed.publish(ChangeEvent {
        kind: ChangeKind::TakerCreated,
        taker_id: Some(taker.id.clone()),
        date: None,
    });

    Ok(taker)
}

/// Setting a taker to the status it already has changes nothing.
/// Existing bookings are never touched.
pub fn set_taker_status(
    conn: &Connection,
    feed: &ChangeFeed,
    id: &str,
    status: TakerStatus,
) -> Result<Taker, AppError> {
    let mut taker = queries::get_taker(conn, id)?
        .ok_or_else(|| AppError::NotFound(format!("taker {id}")))?;

    if taker.status == status {
        tracing::debug!(taker_id = %id, status = status.as_str(), "taker status unchanged");
        return Ok(taker);
    }

    if !queries::update_taker_status(conn, id, status)? {
        return Err(AppError::NotFound(format!("taker {id}")));
    }
    taker.status = status;

    if status == TakerStatus::UnderMaintenance {
        let upcoming = queries::count_bookings_for_taker_from(conn, id, dates::today_ist())?;
        if upcoming > 0 {
            tracing::warn!(
                taker_id = %id,
                upcoming_bookings = upcoming,
                "taker marked under maintenance with upcoming bookings"
            );
        }
    }

    tracing::info!(taker_id = %id, status = status.as_str(), "taker status updated");
    feed.publish(ChangeEvent {
        kind: ChangeKind::TakerUpdated,
        taker_id: Some(taker.id.clone()),
        date: None,
    });

    Ok(taker)
}
