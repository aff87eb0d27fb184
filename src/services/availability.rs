use std::collections::BTreeMap;

use chrono::NaiveDate;
use rusqlite::Connection;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::availability::{annotate_takers, availability_map, free_takers};
use crate::models::{Taker, TakerAvailability};
use crate::services::dates;

/// Day key -> "at least one taker free" for every day of the month.
pub fn month_availability(
    conn: &Connection,
    year: i32,
    month: u32,
) -> Result<BTreeMap<String, bool>, AppError> {
    let days = dates::month_days(year, month)?;
    let (Some(first), Some(last)) = (days.first(), days.last()) else {
        return Ok(BTreeMap::new());
    };

    let takers = queries::list_takers(conn)?;
    let bookings = queries::get_bookings_in_range(conn, *first, *last)?;

    Ok(availability_map(&takers, bookings, &days))
}

/// Every taker with its effective status on `day`.
pub fn takers_for_day(conn: &Connection, day: NaiveDate) -> anyhow::Result<Vec<TakerAvailability>> {
    let takers = queries::list_takers(conn)?;
    let bookings = queries::get_bookings_for_day(conn, day)?;
    Ok(annotate_takers(&takers, &bookings))
}

/// Only the takers that can still be booked on `day`.
pub fn free_takers_for_day(conn: &Connection, day: NaiveDate) -> anyhow::Result<Vec<Taker>> {
    let takers = queries::list_takers(conn)?;
    let bookings = queries::get_bookings_for_day(conn, day)?;
    Ok(free_takers(takers, &bookings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::{EffectiveStatus, TakerStatus};
    use crate::services::booking::{book_taker, BookingRequest, NewBooking};
    use crate::services::events::ChangeFeed;
    use crate::services::takers::set_taker_status;

    fn setup_db() -> Connection {
        let conn = db::init_db(":memory:").unwrap();
        for id in ["t1", "t2"] {
            queries::insert_taker(
                &conn,
                &Taker {
                    id: id.to_string(),
                    name: format!("Tanker {id}"),
                    kind: "Tanker".to_string(),
                    status: TakerStatus::Available,
                },
            )
            .unwrap();
        }
        conn
    }

    fn book(conn: &mut Connection, taker_id: &str, date: &str) {
        let new = NewBooking::from_request(BookingRequest {
            taker_id: Some(taker_id.to_string()),
            date: Some(date.to_string()),
            mobile_no: Some("9876543210".to_string()),
            delivery_address: Some("Ward 7".to_string()),
            booking_by: None,
        })
        .unwrap();
        book_taker(conn, &ChangeFeed::new(1), new).unwrap();
    }

    fn d(s: &str) -> NaiveDate {
        dates::parse_day(s).unwrap()
    }

    #[test]
    fn test_available_taker_without_bookings_is_listed() {
        let conn = setup_db();
        let takers = takers_for_day(&conn, d("2024-06-01")).unwrap();
        let t1 = takers.iter().find(|t| t.id == "t1").unwrap();
        assert_eq!(t1.status, EffectiveStatus::Available);

        let free = free_takers_for_day(&conn, d("2024-06-01")).unwrap();
        assert!(free.iter().any(|t| t.id == "t1"));
    }

    #[test]
    fn test_booked_taker_shows_booked_only_on_that_day() {
        let mut conn = setup_db();
        book(&mut conn, "t1", "2024-06-01");

        let takers = takers_for_day(&conn, d("2024-06-01")).unwrap();
        let t1 = takers.iter().find(|t| t.id == "t1").unwrap();
        assert_eq!(t1.status, EffectiveStatus::Booked);

        let free = free_takers_for_day(&conn, d("2024-06-01")).unwrap();
        assert!(!free.iter().any(|t| t.id == "t1"));

        let free_next_day = free_takers_for_day(&conn, d("2024-06-02")).unwrap();
        assert!(free_next_day.iter().any(|t| t.id == "t1"));
    }

    #[test]
    fn test_maintenance_excludes_taker() {
        let conn = setup_db();
        set_taker_status(&conn, &ChangeFeed::new(1), "t1", TakerStatus::UnderMaintenance).unwrap();

        for day in ["2024-06-01", "2030-01-15"] {
            let free = free_takers_for_day(&conn, d(day)).unwrap();
            assert!(!free.iter().any(|t| t.id == "t1"));
        }
    }

    #[test]
    fn test_month_turns_false_when_every_taker_booked() {
        let mut conn = setup_db();
        book(&mut conn, "t1", "2024-06-10");
        book(&mut conn, "t2", "2024-06-10");
        book(&mut conn, "t1", "2024-06-11");

        let map = month_availability(&conn, 2024, 6).unwrap();
        assert_eq!(map.len(), 30);
        assert!(!map["2024-06-10"]);
        assert!(map["2024-06-11"]);
        assert!(map["2024-06-30"]);
    }

    #[test]
    fn test_month_without_available_takers_is_all_false() {
        let conn = setup_db();
        let feed = ChangeFeed::new(1);
        set_taker_status(&conn, &feed, "t1", TakerStatus::UnderMaintenance).unwrap();
        set_taker_status(&conn, &feed, "t2", TakerStatus::UnderMaintenance).unwrap();

        let map = month_availability(&conn, 2024, 2).unwrap();
        assert_eq!(map.len(), 29);
        assert!(map.values().all(|free| !free));
    }

    #[test]
    fn test_invalid_month_is_a_validation_error() {
        let conn = setup_db();
        assert!(matches!(
            month_availability(&conn, 2024, 13),
            Err(AppError::Validation(_))
        ));
    }
}
