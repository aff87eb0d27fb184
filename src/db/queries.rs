use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};

use crate::models::{Booking, BookingWithTaker, Taker, TakerAssignment, TakerStatus};

const DATE_FORMAT: &str = "%Y-%m-%d";

const BOOKING_WITH_TAKER_COLUMNS: &str =
    "b.id, b.date, b.taker_id, b.mobile_no, b.delivery_address, b.booking_by, \
     t.id, t.name, t.type, t.status";

pub fn ping(conn: &Connection) -> anyhow::Result<()> {
    conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
    Ok(())
}

// ── Takers ──

pub fn insert_taker(conn: &Connection, taker: &Taker) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO takers (id, name, type, status) VALUES (?1, ?2, ?3, ?4)",
        params![taker.id, taker.name, taker.kind, taker.status.as_str()],
    )?;
    Ok(())
}

pub fn get_taker(conn: &Connection, id: &str) -> anyhow::Result<Option<Taker>> {
    let row = conn
        .query_row(
            "SELECT id, name, type, status FROM takers WHERE id = ?1",
            params![id],
            |row| Ok(parse_taker_row(row, 0)),
        )
        .optional()?;

    row.transpose()
}

pub fn list_takers(conn: &Connection) -> anyhow::Result<Vec<Taker>> {
    let mut stmt = conn.prepare("SELECT id, name, type, status FROM takers ORDER BY rowid ASC")?;
    let rows = stmt.query_map([], |row| Ok(parse_taker_row(row, 0)))?;

    let mut takers = vec![];
    for row in rows {
        takers.push(row??);
    }
    Ok(takers)
}

pub fn update_taker_status(
    conn: &Connection,
    id: &str,
    status: TakerStatus,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE takers SET status = ?1 WHERE id = ?2",
        params![status.as_str(), id],
    )?;
    Ok(count > 0)
}

fn parse_taker_row(row: &rusqlite::Row, offset: usize) -> anyhow::Result<Taker> {
    let status_str: String = row.get(offset + 3)?;
    let status = TakerStatus::parse(&status_str)
        .ok_or_else(|| anyhow::anyhow!("unknown taker status in database: {status_str}"))?;

    Ok(Taker {
        id: row.get(offset)?,
        name: row.get(offset + 1)?,
        kind: row.get(offset + 2)?,
        status,
    })
}

// ── Bookings ──

pub fn insert_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO bookings (id, date, taker_id, mobile_no, delivery_address, booking_by)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            booking.id,
            booking.date.format(DATE_FORMAT).to_string(),
            booking.assignment.taker_id(),
            booking.mobile_no,
            booking.delivery_address,
            booking.booking_by,
        ],
    )?;
    Ok(())
}

pub fn booking_exists(conn: &Connection, taker_id: &str, date: NaiveDate) -> anyhow::Result<bool> {
    let exists: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM bookings WHERE taker_id = ?1 AND date = ?2",
        params![taker_id, date.format(DATE_FORMAT).to_string()],
        |row| row.get(0),
    )?;
    Ok(exists)
}

/// Bookings with `start <= date <= end`, ascending by date.
pub fn get_bookings_in_range(
    conn: &Connection,
    start: NaiveDate,
    end: NaiveDate,
) -> anyhow::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(
        "SELECT id, date, taker_id, mobile_no, delivery_address, booking_by
         FROM bookings WHERE date >= ?1 AND date <= ?2 ORDER BY date ASC, rowid ASC",
    )?;

    let rows = stmt.query_map(
        params![
            start.format(DATE_FORMAT).to_string(),
            end.format(DATE_FORMAT).to_string()
        ],
        |row| Ok(parse_booking_row(row)),
    )?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn get_bookings_for_day(conn: &Connection, day: NaiveDate) -> anyhow::Result<Vec<Booking>> {
    get_bookings_in_range(conn, day, day)
}

pub fn count_bookings_for_taker_from(
    conn: &Connection,
    taker_id: &str,
    from: NaiveDate,
) -> anyhow::Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM bookings WHERE taker_id = ?1 AND date >= ?2",
        params![taker_id, from.format(DATE_FORMAT).to_string()],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Bookings on or after `from`, ascending by date, with their takers.
pub fn get_upcoming_bookings(
    conn: &Connection,
    from: NaiveDate,
) -> anyhow::Result<Vec<BookingWithTaker>> {
    let sql = format!(
        "SELECT {BOOKING_WITH_TAKER_COLUMNS}
         FROM bookings b LEFT JOIN takers t ON t.id = b.taker_id
         WHERE b.date >= ?1 ORDER BY b.date ASC, b.rowid ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![from.format(DATE_FORMAT).to_string()], |row| {
        Ok(parse_booking_with_taker_row(row))
    })?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn get_all_bookings(conn: &Connection) -> anyhow::Result<Vec<BookingWithTaker>> {
    let sql = format!(
        "SELECT {BOOKING_WITH_TAKER_COLUMNS}
         FROM bookings b LEFT JOIN takers t ON t.id = b.taker_id
         ORDER BY b.date DESC, b.rowid DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| Ok(parse_booking_with_taker_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<Booking> {
    let date_str: String = row.get(1)?;
    let date = NaiveDate::parse_from_str(&date_str, DATE_FORMAT)
        .map_err(|e| anyhow::anyhow!("invalid booking date in database {date_str:?}: {e}"))?;
    let taker_id: Option<String> = row.get(2)?;

    Ok(Booking {
        id: row.get(0)?,
        date,
        assignment: TakerAssignment::from_taker_id(taker_id),
        mobile_no: row.get(3)?,
        delivery_address: row.get(4)?,
        booking_by: row.get(5)?,
    })
}

fn parse_booking_with_taker_row(row: &rusqlite::Row) -> anyhow::Result<BookingWithTaker> {
    let booking = parse_booking_row(row)?;
    let taker_id: Option<String> = row.get(6)?;
    let taker = match taker_id {
        Some(_) => Some(parse_taker_row(row, 6)?),
        None => None,
    };
    Ok(BookingWithTaker { booking, taker })
}

pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<rusqlite::Error>(),
        Some(rusqlite::Error::SqliteFailure(e, _))
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    fn taker(id: &str) -> Taker {
        Taker {
            id: id.to_string(),
            name: "Tanker 1".to_string(),
            kind: "Tanker".to_string(),
            status: TakerStatus::Available,
        }
    }

    fn booking(id: &str, taker_id: Option<&str>, date: &str) -> Booking {
        Booking {
            id: id.to_string(),
            date: d(date),
            assignment: TakerAssignment::from_taker_id(taker_id.map(str::to_string)),
            mobile_no: "9876543210".to_string(),
            delivery_address: "House 12, Ward 3".to_string(),
            booking_by: Some("Ramesh".to_string()),
        }
    }

    #[test]
    fn test_taker_round_trip_and_status_update() {
        let conn = db::init_db(":memory:").unwrap();
        insert_taker(&conn, &taker("t1")).unwrap();

        assert!(update_taker_status(&conn, "t1", TakerStatus::UnderMaintenance).unwrap());
        let loaded = get_taker(&conn, "t1").unwrap().unwrap();
        assert_eq!(loaded.status, TakerStatus::UnderMaintenance);

        assert!(!update_taker_status(&conn, "missing", TakerStatus::Available).unwrap());
        assert!(get_taker(&conn, "missing").unwrap().is_none());
    }

    #[test]
    fn test_bookings_in_range_is_inclusive() {
        let conn = db::init_db(":memory:").unwrap();
        insert_taker(&conn, &taker("t1")).unwrap();
        insert_booking(&conn, &booking("b1", Some("t1"), "2024-05-31")).unwrap();
        insert_booking(&conn, &booking("b2", Some("t1"), "2024-06-01")).unwrap();
        insert_booking(&conn, &booking("b3", None, "2024-06-30")).unwrap();
        insert_booking(&conn, &booking("b4", Some("t1"), "2024-07-01")).unwrap();

        let june = get_bookings_in_range(&conn, d("2024-06-01"), d("2024-06-30")).unwrap();
        let ids: Vec<_> = june.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["b2", "b3"]);
        assert_eq!(june[1].assignment, TakerAssignment::Unassigned);
    }

    #[test]
    fn test_unique_index_rejects_same_taker_same_day() {
        let conn = db::init_db(":memory:").unwrap();
        insert_taker(&conn, &taker("t1")).unwrap();
        insert_booking(&conn, &booking("b1", Some("t1"), "2024-06-01")).unwrap();

        let err = insert_booking(&conn, &booking("b2", Some("t1"), "2024-06-01")).unwrap_err();
        assert!(is_unique_violation(&err));

        // Unassigned bookings are exempt from the index.
        insert_booking(&conn, &booking("b3", None, "2024-06-01")).unwrap();
        insert_booking(&conn, &booking("b4", None, "2024-06-01")).unwrap();
    }

    #[test]
    fn test_upcoming_bookings_embed_taker() {
        let conn = db::init_db(":memory:").unwrap();
        insert_taker(&conn, &taker("t1")).unwrap();
        insert_booking(&conn, &booking("b1", Some("t1"), "2024-06-03")).unwrap();
        insert_booking(&conn, &booking("b2", None, "2024-06-02")).unwrap();
        insert_booking(&conn, &booking("b0", Some("t1"), "2024-05-01")).unwrap();

        let upcoming = get_upcoming_bookings(&conn, d("2024-06-01")).unwrap();
        assert_eq!(upcoming.len(), 2);
        assert_eq!(upcoming[0].booking.id, "b2");
        assert!(upcoming[0].taker.is_none());
        assert_eq!(upcoming[1].taker.as_ref().map(|t| t.id.as_str()), Some("t1"));

        let all = get_all_bookings(&conn).unwrap();
        assert_eq!(all.first().map(|b| b.booking.id.as_str()), Some("b1"));
        assert_eq!(all.len(), 3);
    }
}
