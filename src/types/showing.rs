//! Showing records: one (movie, theater) pairing and its initial bookings.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::seat::{SeatMask, NO_SEATS};

/// Input record for building a catalog.
///
/// Names are opaque and case-sensitive. `booked_mask` holds the seats that are
/// already taken when the catalog is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowingRecord {
    /// Movie name.
    pub movie: String,
    /// Theater name.
    pub theater: String,
    /// Seats reserved before the catalog was built.
    #[serde(default = "no_seats")]
    pub booked_mask: SeatMask,
}

fn no_seats() -> SeatMask {
    NO_SEATS
}

impl ShowingRecord {
    /// Create a record.
    pub fn new(movie: impl Into<String>, theater: impl Into<String>, booked_mask: SeatMask) -> Self {
        Self {
            movie: movie.into(),
            theater: theater.into(),
            booked_mask,
        }
    }

    /// The (movie, theater) key of this record.
    pub fn key(&self) -> ShowingKey {
        ShowingKey::new(self.movie.clone(), self.theater.clone())
    }
}

/// The (movie, theater) pair identifying a showing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShowingKey {
    /// Movie name.
    pub movie: String,
    /// Theater name.
    pub theater: String,
}

impl ShowingKey {
    /// Create a key.
    pub fn new(movie: impl Into<String>, theater: impl Into<String>) -> Self {
        Self {
            movie: movie.into(),
            theater: theater.into(),
        }
    }
}

impl fmt::Display for ShowingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' at '{}'", self.movie, self.theater)
    }
}
