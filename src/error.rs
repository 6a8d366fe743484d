//! Error types for the booking core.
//!
//! Two families:
//!
//! - [`BookingError`]: per-call failures of catalog queries and bookings.
//!   They never leave a ledger in an inconsistent state.
//! - [`CatalogError`]: failures while building, loading, or installing a catalog.
//!
//! A seat conflict is not an error: `book` returns `Ok(false)`.

use std::fmt;
use std::path::PathBuf;

/// Coarse failure kind exposed at the API boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A movie, theater, or (movie, theater) pair does not exist.
    NotFound,
    /// A seat mask or seat number is malformed.
    InvalidArgument,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::InvalidArgument => write!(f, "invalid_argument"),
        }
    }
}

/// Per-call failure of a catalog query or booking.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingError {
    /// No showing lists this movie.
    #[error("Movie not found: {0}")]
    MovieNotFound(String),

    /// No showing lists this theater.
    #[error("Theater not found: {0}")]
    TheaterNotFound(String),

    /// Movie and theater both exist but never share a showing.
    #[error("Movie '{movie}' is not showing at '{theater}'")]
    ShowingNotFound {
        /// Requested movie.
        movie: String,
        /// Requested theater.
        theater: String,
    },

    /// The requested seat mask selects no seats.
    #[error("Seat mask is empty")]
    EmptySeatMask,

    /// The requested seat mask has bits beyond the last seat.
    #[error("Seat mask {0:#x} selects seats outside 1..=20")]
    SeatMaskOutOfRange(u64),

    /// A seat number outside the valid range.
    #[error("Seat number {0} is outside 1..=20")]
    InvalidSeatId(u32),
}

impl BookingError {
    /// Collapse the diagnostic variant into the API-level failure kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MovieNotFound(_) | Self::TheaterNotFound(_) | Self::ShowingNotFound { .. } => {
                ErrorKind::NotFound
            }
            Self::EmptySeatMask | Self::SeatMaskOutOfRange(_) | Self::InvalidSeatId(_) => {
                ErrorKind::InvalidArgument
            }
        }
    }

    /// Whether this is a not-found failure.
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Whether this is an invalid-argument failure.
    pub fn is_invalid_argument(&self) -> bool {
        self.kind() == ErrorKind::InvalidArgument
    }
}

/// Failure while building, loading, or installing a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// A showing has an empty movie or theater name.
    #[error("Showing #{index} has an empty {field} name")]
    EmptyName {
        /// Position of the offending record in the input.
        index: usize,
        /// `"movie"` or `"theater"`.
        field: &'static str,
    },

    /// Two records share the same (movie, theater) pair.
    #[error("Duplicate showing: '{movie}' at '{theater}'")]
    DuplicateShowing {
        /// Movie name.
        movie: String,
        /// Theater name.
        theater: String,
    },

    /// A record's initial booked mask has bits beyond the last seat.
    #[error("Initial booked mask {mask:#x} for '{movie}' at '{theater}' selects seats outside 1..=20")]
    InitialMaskOutOfRange {
        /// Movie name.
        movie: String,
        /// Theater name.
        theater: String,
        /// Offending raw bits.
        mask: u32,
    },

    /// Could not read a catalog file.
    #[error("Failed to read catalog {}: {source}", .path.display())]
    Io {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Catalog JSON did not parse.
    #[error("Invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The process-wide catalog was already set.
    #[error("Process-wide catalog is already installed")]
    AlreadyInstalled,
}
