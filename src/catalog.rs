//! Catalog index: every showing's [`SeatLedger`], looked up by movie and theater.
//!
//! The catalog owns its ledgers in a single vector. The movie and theater
//! indices hold positions into that vector, so there is exactly one owner per
//! ledger. After construction the catalog is read-only; only the ledgers'
//! booked masks change, each behind its own lock.
//!
//! ## Lookup
//!
//! ```text
//! (movie, theater) → by_movie[movie][theater] → ledgers[i] → book / available_seats
//! ```
//!
//! Listings iterate `BTreeMap` keys and therefore come back sorted. Callers
//! should treat them as unordered.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::canonical::canonical_hash_hex;
use crate::error::{BookingError, CatalogError};
use crate::ledger::SeatLedger;
use crate::seed::default_showings;
use crate::types::seat::{SeatMask, ALL_SEATS};
use crate::types::showing::{ShowingKey, ShowingRecord};

/// Position of a ledger in `Catalog::ledgers`.
type LedgerIndex = usize;

/// name → (other name → ledger position)
type NameIndex = BTreeMap<String, BTreeMap<String, LedgerIndex>>;

/// On-disk catalog layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    /// Every showing with its pre-booked seats.
    pub showings: Vec<ShowingRecord>,
}

/// Aggregate counts over the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    /// Distinct movies.
    pub movies: usize,
    /// Distinct theaters.
    pub theaters: usize,
    /// (movie, theater) showings.
    pub showings: usize,
    /// Free seats summed over all showings.
    pub seats_available: u64,
    /// Booked seats summed over all showings.
    pub seats_booked: u64,
}

/// Immutable index of all showings.
#[derive(Debug)]
pub struct Catalog {
    ledgers: Vec<SeatLedger>,
    by_movie: NameIndex,
    by_theater: NameIndex,
}

impl Catalog {
    /// Build a catalog from showing records.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::EmptyName`] if a movie or theater name is empty
    /// - [`CatalogError::DuplicateShowing`] if a (movie, theater) pair repeats
    /// - [`CatalogError::InitialMaskOutOfRange`] if a booked mask has bits beyond the last seat
    pub fn new(records: impl IntoIterator<Item = ShowingRecord>) -> Result<Self, CatalogError> {
        let mut ledgers = Vec::new();
        let mut by_movie = NameIndex::new();
        let mut by_theater = NameIndex::new();

        for (index, record) in records.into_iter().enumerate() {
            if record.movie.is_empty() {
                return Err(CatalogError::EmptyName { index, field: "movie" });
            }
            if record.theater.is_empty() {
                return Err(CatalogError::EmptyName { index, field: "theater" });
            }
            if record.booked_mask.difference(ALL_SEATS).bits() != 0 {
                return Err(CatalogError::InitialMaskOutOfRange {
                    movie: record.movie,
                    theater: record.theater,
                    mask: record.booked_mask.bits(),
                });
            }

            let theaters = by_movie.entry(record.movie.clone()).or_default();
            if theaters.contains_key(&record.theater) {
                return Err(CatalogError::DuplicateShowing {
                    movie: record.movie,
                    theater: record.theater,
                });
            }

            let position = ledgers.len();
            theaters.insert(record.theater.clone(), position);
            by_theater
                .entry(record.theater.clone())
                .or_default()
                .insert(record.movie.clone(), position);

            ledgers.push(SeatLedger::new(
                ShowingKey::new(record.movie, record.theater),
                record.booked_mask,
            ));
        }

        let catalog = Self {
            ledgers,
            by_movie,
            by_theater,
        };
        info!(
            movies = catalog.by_movie.len(),
            theaters = catalog.by_theater.len(),
            showings = catalog.ledgers.len(),
            "Catalog built"
        );
        Ok(catalog)
    }

    /// Build the catalog from the built-in showings.
    pub fn with_defaults() -> Self {
        Self::new(default_showings()).expect("built-in showings are well formed")
    }

    /// Parse a catalog from JSON (`{"showings": [...]}`).
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::new(file.showings)
    }

    /// Load a catalog from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// All movies with at least one showing.
    pub fn movies(&self) -> Vec<&str> {
        self.by_movie.keys().map(String::as_str).collect()
    }

    /// Movies showing at `theater`.
    ///
    /// # Errors
    ///
    /// [`BookingError::TheaterNotFound`] if no showing lists `theater`.
    pub fn movies_at(&self, theater: &str) -> Result<Vec<&str>, BookingError> {
        let movies = self
            .by_theater
            .get(theater)
            .ok_or_else(|| BookingError::TheaterNotFound(theater.to_string()))?;
        debug_assert!(!movies.is_empty(), "indexed theater without showings");
        Ok(movies.keys().map(String::as_str).collect())
    }

    /// All theaters with at least one showing.
    pub fn theaters(&self) -> Vec<&str> {
        self.by_theater.keys().map(String::as_str).collect()
    }

    /// Theaters showing `movie`.
    ///
    /// # Errors
    ///
    /// [`BookingError::MovieNotFound`] if no showing lists `movie`.
    pub fn theaters_showing(&self, movie: &str) -> Result<Vec<&str>, BookingError> {
        let theaters = self
            .by_movie
            .get(movie)
            .ok_or_else(|| BookingError::MovieNotFound(movie.to_string()))?;
        debug_assert!(!theaters.is_empty(), "indexed movie without showings");
        Ok(theaters.keys().map(String::as_str).collect())
    }

    /// Resolve a (movie, theater) pair to its ledger.
    ///
    /// The three failure cases stay distinct for diagnostics; all are
    /// [`ErrorKind::NotFound`](crate::ErrorKind::NotFound).
    pub fn ledger(&self, movie: &str, theater: &str) -> Result<&SeatLedger, BookingError> {
        let theaters = self
            .by_movie
            .get(movie)
            .ok_or_else(|| BookingError::MovieNotFound(movie.to_string()))?;

        match theaters.get(theater) {
            Some(&position) => Ok(&self.ledgers[position]),
            None if self.by_theater.contains_key(theater) => Err(BookingError::ShowingNotFound {
                movie: movie.to_string(),
                theater: theater.to_string(),
            }),
            None => Err(BookingError::TheaterNotFound(theater.to_string())),
        }
    }

    /// Free seats of one showing.
    pub fn available_seats(&self, movie: &str, theater: &str) -> Result<SeatMask, BookingError> {
        Ok(self.ledger(movie, theater)?.available_seats())
    }

    /// Book `seats` for one showing, all or nothing.
    ///
    /// `Ok(false)` means at least one seat was already taken.
    ///
    /// # Errors
    ///
    /// Not-found errors for an unknown pair; invalid-argument errors for an
    /// empty mask or one with bits beyond the last seat.
    pub fn book(&self, movie: &str, theater: &str, seats: SeatMask) -> Result<bool, BookingError> {
        // Reject a malformed mask even when the pair is unknown.
        let seats = seats.validate()?;
        self.ledger(movie, theater)?.book(seats)
    }

    /// Keys of every showing, sorted by movie then theater.
    pub fn showings(&self) -> Vec<ShowingKey> {
        self.by_movie
            .iter()
            .flat_map(|(movie, theaters)| {
                theaters
                    .keys()
                    .map(move |theater| ShowingKey::new(movie.clone(), theater.clone()))
            })
            .collect()
    }

    /// Number of showings.
    pub fn len(&self) -> usize {
        self.ledgers.len()
    }

    /// True when the catalog has no showings.
    pub fn is_empty(&self) -> bool {
        self.ledgers.is_empty()
    }

    /// Aggregate counts. Seat totals are read ledger by ledger, not as one snapshot.
    pub fn stats(&self) -> CatalogStats {
        let seats_booked: u64 = self
            .ledgers
            .iter()
            .map(|l| u64::from(l.booked_seats().count()))
            .sum();
        let capacity = ALL_SEATS.count() as u64 * self.ledgers.len() as u64;

        CatalogStats {
            movies: self.by_movie.len(),
            theaters: self.by_theater.len(),
            showings: self.ledgers.len(),
            seats_available: capacity - seats_booked,
            seats_booked,
        }
    }

    /// Hash of the showing keys. Bookings do not change it.
    pub fn fingerprint(&self) -> String {
        canonical_hash_hex(&self.showings())
    }
}

static INSTANCE: OnceLock<Arc<Catalog>> = OnceLock::new();

/// Set the process-wide catalog. Must happen before the first [`instance`] call.
///
/// # Errors
///
/// [`CatalogError::AlreadyInstalled`] if a catalog was already installed or
/// [`instance`] already initialized the default one.
pub fn install(catalog: Catalog) -> Result<Arc<Catalog>, CatalogError> {
    let catalog = Arc::new(catalog);
    INSTANCE
        .set(Arc::clone(&catalog))
        .map_err(|_| CatalogError::AlreadyInstalled)?;
    Ok(catalog)
}

/// The process-wide catalog, built from the defaults if none was installed.
pub fn instance() -> Arc<Catalog> {
    Arc::clone(INSTANCE.get_or_init(|| Arc::new(Catalog::with_defaults())))
}
