pub mod availability;
pub mod booking;
pub mod dates;
pub mod events;
pub mod takers;
