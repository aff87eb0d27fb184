pub mod availability;
pub mod booking;
pub mod event;
pub mod taker;

pub use booking::{Booking, BookingWithTaker, TakerAssignment};
pub use event::{ChangeEvent, ChangeKind};
pub use taker::{EffectiveStatus, Taker, TakerAvailability, TakerStatus};
