//! Core value types: seats and showings.

pub mod seat;
pub mod showing;

pub use seat::{SeatId, SeatMask, ALL_SEATS, MAX_SEATS, NO_SEATS};
pub use showing::{ShowingKey, ShowingRecord};
