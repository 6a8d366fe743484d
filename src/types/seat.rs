//! Seat identifiers and seat masks.
//!
//! A showing has [`MAX_SEATS`] seats numbered from 1. Seat `n` is bit `n - 1`
//! of a [`SeatMask`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr};

use crate::error::BookingError;

/// Number of seats in every showing.
pub const MAX_SEATS: u32 = 20;

/// The empty seat set.
pub const NO_SEATS: SeatMask = SeatMask(0);

/// Every seat of a showing.
pub const ALL_SEATS: SeatMask = SeatMask((1 << MAX_SEATS) - 1);

const _: () = assert!(u32::BITS > MAX_SEATS, "SeatMask has too few bits for MAX_SEATS");

/// A 1-based seat number in `1..=MAX_SEATS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SeatId(u8);

impl SeatId {
    /// Create a seat id, rejecting numbers outside `1..=MAX_SEATS`.
    pub fn new(number: u32) -> Result<Self, BookingError> {
        if (1..=MAX_SEATS).contains(&number) {
            Ok(Self(number as u8))
        } else {
            Err(BookingError::InvalidSeatId(number))
        }
    }

    /// The 1-based seat number.
    pub fn number(&self) -> u32 {
        u32::from(self.0)
    }

    /// The mask selecting only this seat.
    pub fn bit(&self) -> SeatMask {
        SeatMask(1 << (self.0 - 1))
    }
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for SeatId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let number = u32::deserialize(deserializer)?;
        Self::new(number).map_err(serde::de::Error::custom)
    }
}

/// A set of seats, one bit per seat.
///
/// Any raw bits can be wrapped; a mask is *valid* for booking only when it is
/// non-empty and a subset of [`ALL_SEATS`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeatMask(u32);

impl SeatMask {
    /// Wrap raw bits without validation.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw bits.
    pub const fn bits(&self) -> u32 {
        self.0
    }

    /// Build a mask from 1-based seat numbers.
    pub fn from_seat_numbers(numbers: &[u32]) -> Result<Self, BookingError> {
        numbers
            .iter()
            .map(|&n| SeatId::new(n))
            .collect::<Result<Self, _>>()
    }

    /// True when no seat is selected.
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// True when non-empty and within [`ALL_SEATS`].
    pub const fn is_valid(&self) -> bool {
        !self.is_empty() && self.0 & !ALL_SEATS.0 == 0
    }

    /// Check that this mask can be booked.
    pub fn validate(self) -> Result<Self, BookingError> {
        if self.is_empty() {
            Err(BookingError::EmptySeatMask)
        } else if self.0 & !ALL_SEATS.0 != 0 {
            Err(BookingError::SeatMaskOutOfRange(u64::from(self.0)))
        } else {
            Ok(self)
        }
    }

    /// True when the two masks share at least one seat.
    pub const fn intersects(&self, other: SeatMask) -> bool {
        self.0 & other.0 != 0
    }

    /// True when `seat` is selected.
    pub const fn contains(&self, seat: SeatId) -> bool {
        self.0 & (1 << (seat.0 - 1)) != 0
    }

    /// Seats in either mask.
    pub const fn union(self, other: SeatMask) -> Self {
        Self(self.0 | other.0)
    }

    /// Seats in `self` but not in `other`.
    pub const fn difference(self, other: SeatMask) -> Self {
        Self(self.0 & !other.0)
    }

    /// Seats of [`ALL_SEATS`] not in `self`.
    pub const fn complement(self) -> Self {
        ALL_SEATS.difference(self)
    }

    /// Number of seats selected within [`ALL_SEATS`].
    pub const fn count(&self) -> u32 {
        (self.0 & ALL_SEATS.0).count_ones()
    }

    /// Selected seats in ascending order. Bits beyond the last seat are ignored.
    pub fn seats(&self) -> impl Iterator<Item = SeatId> {
        let bits = self.0;
        (1..=MAX_SEATS as u8)
            .filter(move |n| bits & (1 << (n - 1)) != 0)
            .map(SeatId)
    }

    /// Selected 1-based seat numbers in ascending order.
    pub fn seat_numbers(&self) -> Vec<u32> {
        self.seats().map(|s| s.number()).collect()
    }
}

impl FromIterator<SeatId> for SeatMask {
    fn from_iter<I: IntoIterator<Item = SeatId>>(iter: I) -> Self {
        iter.into_iter().fold(NO_SEATS, |mask, seat| mask.union(seat.bit()))
    }
}

impl From<SeatId> for SeatMask {
    fn from(seat: SeatId) -> Self {
        seat.bit()
    }
}

impl BitOr for SeatMask {
    type Output = SeatMask;

    fn bitor(self, rhs: SeatMask) -> SeatMask {
        self.union(rhs)
    }
}

impl BitAnd for SeatMask {
    type Output = SeatMask;

    fn bitand(self, rhs: SeatMask) -> SeatMask {
        Self(self.0 & rhs.0)
    }
}

impl fmt::Display for SeatMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#07x}", self.0)
    }
}
