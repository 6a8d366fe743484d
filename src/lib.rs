//! # boring-booking
//!
//! Movie showing catalog with linearizable seat reservation.
//!
//! The core answers two kinds of requests:
//!
//! > Which movies are showing where, and which seats are still free?
//! >
//! > Reserve these seats for this showing, all of them or none.
//!
//! ## Architecture
//!
//! ```text
//! Catalog ──(movie, theater)──→ SeatLedger ──lock──→ booked SeatMask
//!    ↑
//! ShowingRecord list (built-in seed or JSON file)
//! ```
//!
//! ## Guarantees
//!
//! - Bookings on one showing are serialized; no seat is ever booked twice
//! - Bookings on different showings never contend on a shared lock
//! - A seat conflict is `Ok(false)`, distinct from not-found and invalid-argument errors
//! - The catalog is immutable after construction and needs no locking for lookups

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod canonical;
pub mod catalog;
pub mod error;
pub mod ledger;
pub mod seed;
pub mod types;

#[cfg(feature = "service")]
pub mod service;

// Re-exports
pub use catalog::{Catalog, CatalogFile, CatalogStats};
pub use error::{BookingError, CatalogError, ErrorKind};
pub use ledger::SeatLedger;
pub use seed::default_showings;
pub use types::{SeatId, SeatMask, ShowingKey, ShowingRecord, ALL_SEATS, MAX_SEATS, NO_SEATS};
pub use canonical::{canonical_hash, canonical_hash_hex};

// Service re-exports (when service feature is enabled)
#[cfg(feature = "service")]
pub use service::{create_router, ServiceState};

/// API schema version reported by the service.
pub const BOOKING_SCHEMA_VERSION: &str = "1.0.0";
