//! Per-showing seat ledger.
//!
//! A [`SeatLedger`] owns the booked-seat mask of one showing together with the
//! lock that guards it. The mask is only reachable through the ledger's
//! methods, so every mutation goes through [`SeatLedger::book`].
//!
//! ## Concurrency
//!
//! - Each ledger has its own lock; bookings on different showings never contend.
//! - `book` validates its argument before locking and holds the lock only for
//!   the check-then-set on the mask.
//! - Reads take the same lock, so they observe a state that existed at some
//!   point during the call.

use parking_lot::Mutex;
use tracing::debug;

use crate::error::BookingError;
use crate::types::seat::{SeatMask, ALL_SEATS};
use crate::types::showing::ShowingKey;

/// Lock-guarded booked-seat state for one showing.
#[derive(Debug)]
pub struct SeatLedger {
    key: ShowingKey,
    booked: Mutex<SeatMask>,
}

impl SeatLedger {
    /// Create a ledger with `booked` seats already taken.
    ///
    /// Bits beyond [`ALL_SEATS`] are dropped; catalog construction rejects
    /// them before reaching here.
    pub(crate) fn new(key: ShowingKey, booked: SeatMask) -> Self {
        Self {
            key,
            booked: Mutex::new(booked & ALL_SEATS),
        }
    }

    /// The (movie, theater) pair this ledger belongs to.
    pub fn key(&self) -> &ShowingKey {
        &self.key
    }

    /// Movie name.
    pub fn movie(&self) -> &str {
        &self.key.movie
    }

    /// Theater name.
    pub fn theater(&self) -> &str {
        &self.key.theater
    }

    /// Seats not yet booked.
    pub fn available_seats(&self) -> SeatMask {
        self.booked.lock().complement()
    }

    /// Seats already booked.
    pub fn booked_seats(&self) -> SeatMask {
        *self.booked.lock()
    }

    /// Book every seat in `requested`, or none of them.
    ///
    /// Returns `Ok(true)` when all seats were free and are now booked, and
    /// `Ok(false)` when any of them was already taken (nothing changes).
    ///
    /// # Errors
    ///
    /// [`BookingError::EmptySeatMask`] or [`BookingError::SeatMaskOutOfRange`]
    /// for a malformed mask. The ledger is not touched.
    pub fn book(&self, requested: SeatMask) -> Result<bool, BookingError> {
        let requested = requested.validate()?;

        let mut booked = self.booked.lock();
        if booked.intersects(requested) {
            let conflict = *booked & requested;
            drop(booked);
            debug!(
                showing = %self.key,
                requested = %requested,
                conflict = %conflict,
                "Seat booking conflict"
            );
            return Ok(false);
        }
        *booked = booked.union(requested);
        let now_booked = *booked;
        drop(booked);

        debug!(
            showing = %self.key,
            requested = %requested,
            booked = %now_booked,
            "Seats booked"
        );
        Ok(true)
    }
}
