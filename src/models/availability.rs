use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use super::{Booking, EffectiveStatus, Taker, TakerAvailability, TakerStatus};
use crate::services::dates::day_key;

/// Status of `taker` on a day, given that day's bookings. Every read path
/// derives `BOOKED` through here.
pub fn effective_status(taker: &Taker, bookings_for_day: &[Booking]) -> EffectiveStatus {
    if taker.status == TakerStatus::UnderMaintenance {
        return EffectiveStatus::UnderMaintenance;
    }

    let booked = bookings_for_day
        .iter()
        .any(|b| b.assignment.is_assigned_to(&taker.id));

    if booked {
        EffectiveStatus::Booked
    } else {
        EffectiveStatus::Available
    }
}

pub fn annotate_takers(takers: &[Taker], bookings_for_day: &[Booking]) -> Vec<TakerAvailability> {
    takers
        .iter()
        .map(|t| TakerAvailability {
            id: t.id.clone(),
            name: t.name.clone(),
            kind: t.kind.clone(),
            status: effective_status(t, bookings_for_day),
        })
        .collect()
}

pub fn free_takers(takers: Vec<Taker>, bookings_for_day: &[Booking]) -> Vec<Taker> {
    takers
        .into_iter()
        .filter(|t| effective_status(t, bookings_for_day) == EffectiveStatus::Available)
        .collect()
}

/// Day key -> whether at least one taker is free that day.
pub fn availability_map(
    takers: &[Taker],
    bookings: Vec<Booking>,
    days: &[NaiveDate],
) -> BTreeMap<String, bool> {
    let mut by_day: HashMap<NaiveDate, Vec<Booking>> = HashMap::new();
    for booking in bookings {
        by_day.entry(booking.date).or_default().push(booking);
    }

    days.iter()
        .map(|day| {
            let day_bookings = by_day.get(day).map(Vec::as_slice).unwrap_or(&[]);
            let any_free = takers
                .iter()
                .any(|t| effective_status(t, day_bookings) == EffectiveStatus::Available);
            (day_key(*day), any_free)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TakerAssignment;

    fn taker(id: &str, status: TakerStatus) -> Taker {
        Taker {
            id: id.to_string(),
            name: format!("Taker {id}"),
            kind: "Tanker".to_string(),
            status,
        }
    }

    fn booking(taker_id: Option<&str>, date: NaiveDate) -> Booking {
        Booking {
            id: format!("b-{date}"),
            date,
            assignment: TakerAssignment::from_taker_id(taker_id.map(str::to_string)),
            mobile_no: "9876543210".to_string(),
            delivery_address: "Ward 4".to_string(),
            booking_by: None,
        }
    }

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_maintenance_is_never_overridden() {
        let t = taker("t1", TakerStatus::UnderMaintenance);
        let bookings = vec![booking(Some("t1"), d("2024-06-01"))];
        assert_eq!(effective_status(&t, &bookings), EffectiveStatus::UnderMaintenance);
    }

    #[test]
    fn test_booked_overrides_available() {
        let t = taker("t1", TakerStatus::Available);
        let bookings = vec![booking(Some("t1"), d("2024-06-01"))];
        assert_eq!(effective_status(&t, &bookings), EffectiveStatus::Booked);
    }

    #[test]
    fn test_other_takers_and_unassigned_bookings_do_not_count() {
        let t = taker("t1", TakerStatus::Available);
        let bookings = vec![
            booking(Some("t2"), d("2024-06-01")),
            booking(None, d("2024-06-01")),
        ];
        assert_eq!(effective_status(&t, &bookings), EffectiveStatus::Available);
    }

    #[test]
    fn test_free_takers_filters_booked_and_maintenance() {
        let takers = vec![
            taker("t1", TakerStatus::Available),
            taker("t2", TakerStatus::Available),
            taker("t3", TakerStatus::UnderMaintenance),
        ];
        let bookings = vec![booking(Some("t1"), d("2024-06-01"))];

        let free = free_takers(takers, &bookings);
        let ids: Vec<_> = free.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t2"]);
    }

    #[test]
    fn test_map_without_available_takers_is_all_false() {
        let takers = vec![taker("t1", TakerStatus::UnderMaintenance)];
        let days = vec![d("2024-06-01"), d("2024-06-02"), d("2024-06-03")];

        let map = availability_map(&takers, vec![], &days);
        assert_eq!(map.len(), 3);
        assert!(map.values().all(|free| !free));
    }

    #[test]
    fn test_map_marks_fully_booked_day() {
        let takers = vec![taker("t1", TakerStatus::Available)];
        let days = vec![d("2024-06-01"), d("2024-06-02")];
        let bookings = vec![booking(Some("t1"), d("2024-06-02"))];

        let map = availability_map(&takers, bookings, &days);
        assert!(map["2024-06-01"]);
        assert!(!map["2024-06-02"]);
    }
}
