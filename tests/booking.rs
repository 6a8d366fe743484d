//! Catalog and booking tests.
//!
//! Scenario tests for the catalog queries plus concurrency tests that hammer a
//! single showing from many threads and check that no seat is booked twice.

use std::collections::BTreeSet;
use std::sync::Barrier;
use std::thread;

use boring_booking::{
    BookingError, Catalog, ErrorKind, SeatMask, ShowingRecord, ALL_SEATS, MAX_SEATS, NO_SEATS,
};
use proptest::prelude::*;

// ─────────────────────────────────────────────────────────────────────────────
// Test Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn mask(bits: u32) -> SeatMask {
    SeatMask::from_bits(bits)
}

/// Three movies, three theaters, six showings; half of them sold out.
fn build_grid_catalog() -> Catalog {
    Catalog::new(vec![
        ShowingRecord::new("MA", "TA", ALL_SEATS),
        ShowingRecord::new("MA", "TC", NO_SEATS),
        ShowingRecord::new("MB", "TA", NO_SEATS),
        ShowingRecord::new("MB", "TB", ALL_SEATS),
        ShowingRecord::new("MC", "TB", NO_SEATS),
        ShowingRecord::new("MC", "TC", ALL_SEATS),
    ])
    .unwrap()
}

fn sorted(names: Vec<&str>) -> BTreeSet<&str> {
    names.into_iter().collect()
}

/// Run `attempts` on one showing from separate threads released together.
/// Returns the masks that were booked successfully.
fn book_concurrently(catalog: &Catalog, movie: &str, theater: &str, attempts: &[SeatMask]) -> Vec<SeatMask> {
    let barrier = Barrier::new(attempts.len());

    thread::scope(|scope| {
        let handles: Vec<_> = attempts
            .iter()
            .map(|&m| {
                let barrier = &barrier;
                scope.spawn(move || {
                    barrier.wait();
                    catalog.book(movie, theater, m).unwrap().then_some(m)
                })
            })
            .collect();

        handles
            .into_iter()
            .filter_map(|h| h.join().unwrap())
            .collect()
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Catalog queries
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_movies_and_theaters() {
    let catalog = build_grid_catalog();
    assert_eq!(sorted(catalog.movies()), BTreeSet::from(["MA", "MB", "MC"]));
    assert_eq!(sorted(catalog.theaters()), BTreeSet::from(["TA", "TB", "TC"]));
}

#[test]
fn test_movies_at_theater() {
    let catalog = build_grid_catalog();
    assert_eq!(sorted(catalog.movies_at("TA").unwrap()), BTreeSet::from(["MA", "MB"]));
    assert_eq!(sorted(catalog.movies_at("TB").unwrap()), BTreeSet::from(["MB", "MC"]));
    assert_eq!(sorted(catalog.movies_at("TC").unwrap()), BTreeSet::from(["MA", "MC"]));
    assert_eq!(catalog.movies_at("TD").unwrap_err().kind(), ErrorKind::NotFound);
}

#[test]
fn test_theaters_showing_movie() {
    let catalog = build_grid_catalog();
    assert_eq!(sorted(catalog.theaters_showing("MA").unwrap()), BTreeSet::from(["TA", "TC"]));
    assert_eq!(sorted(catalog.theaters_showing("MB").unwrap()), BTreeSet::from(["TA", "TB"]));
    assert_eq!(sorted(catalog.theaters_showing("MC").unwrap()), BTreeSet::from(["TB", "TC"]));
    assert_eq!(catalog.theaters_showing("MD").unwrap_err().kind(), ErrorKind::NotFound);
}

#[test]
fn test_available_seats() {
    let catalog = build_grid_catalog();
    assert_eq!(catalog.available_seats("MA", "TA").unwrap(), NO_SEATS);
    assert_eq!(catalog.available_seats("MA", "TC").unwrap(), ALL_SEATS);
    assert_eq!(catalog.available_seats("MB", "TA").unwrap(), ALL_SEATS);
    assert_eq!(catalog.available_seats("MB", "TB").unwrap(), NO_SEATS);
    assert_eq!(catalog.available_seats("MC", "TB").unwrap(), ALL_SEATS);
    assert_eq!(catalog.available_seats("MC", "TC").unwrap(), NO_SEATS);

    for (movie, theater) in [("MA", "TB"), ("MB", "TC"), ("MC", "TA"), ("MD", "TD")] {
        let err = catalog.available_seats(movie, theater).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound, "{movie} at {theater}");
    }
}

#[test]
fn test_two_showing_scenario() {
    let catalog = Catalog::new(vec![
        ShowingRecord::new("M1", "T1", mask(0xFFFFF)),
        ShowingRecord::new("M1", "T2", NO_SEATS),
    ])
    .unwrap();

    assert_eq!(catalog.movies(), vec!["M1"]);
    assert_eq!(sorted(catalog.theaters()), BTreeSet::from(["T1", "T2"]));
    assert_eq!(catalog.available_seats("M1", "T1").unwrap(), NO_SEATS);
    assert!(!catalog.book("M1", "T1", mask(0x1)).unwrap());
    assert!(catalog.book("M1", "T2", mask(0x1)).unwrap());
    assert_eq!(
        catalog.available_seats("M1", "T2").unwrap(),
        mask(ALL_SEATS.bits() & !0x1)
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Sequential booking
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_book_every_seat_one_by_one() {
    let catalog = build_grid_catalog();
    for seat in ALL_SEATS.seats() {
        assert!(catalog.book("MA", "TC", seat.bit()).unwrap());
        assert!(catalog.book("MB", "TA", seat.bit()).unwrap());
        assert!(catalog.book("MC", "TB", seat.bit()).unwrap());
    }
    assert_eq!(catalog.available_seats("MA", "TC").unwrap(), NO_SEATS);
    assert_eq!(catalog.available_seats("MB", "TA").unwrap(), NO_SEATS);
    assert_eq!(catalog.available_seats("MC", "TB").unwrap(), NO_SEATS);
}

#[test]
fn test_book_multiple_masks() {
    let catalog = build_grid_catalog();
    assert!(catalog.book("MA", "TC", mask(0x0a)).unwrap());
    assert!(catalog.book("MA", "TC", mask(0xa0)).unwrap());
    assert!(catalog.book("MA", "TC", mask(0x05)).unwrap());
    assert!(catalog.book("MA", "TC", mask(0x50)).unwrap());
    for bit in 0..8 {
        assert!(!catalog.book("MA", "TC", mask(1 << bit)).unwrap());
    }
    assert!(!catalog.book("MA", "TC", ALL_SEATS).unwrap());

    // Partially overlapping
    assert!(catalog.book("MB", "TA", mask(0x0a)).unwrap());
    assert!(!catalog.book("MB", "TA", mask(0x08)).unwrap());

    // Identical
    assert!(catalog.book("MC", "TB", mask(0xa0)).unwrap());
    assert!(!catalog.book("MC", "TB", mask(0xa0)).unwrap());
}

#[test]
fn test_book_sold_out_showings() {
    let catalog = build_grid_catalog();
    for seat in ALL_SEATS.seats() {
        assert!(!catalog.book("MA", "TA", seat.bit()).unwrap());
        assert!(!catalog.book("MB", "TB", seat.bit()).unwrap());
        assert!(!catalog.book("MC", "TC", seat.bit()).unwrap());
    }
}

#[test]
fn test_book_invalid_mask() {
    let catalog = build_grid_catalog();
    assert_eq!(
        catalog.book("MA", "TA", NO_SEATS),
        Err(BookingError::EmptySeatMask)
    );
    let shifted = mask(ALL_SEATS.bits() << 1);
    assert_eq!(
        catalog.book("MA", "TC", shifted),
        Err(BookingError::SeatMaskOutOfRange(u64::from(shifted.bits())))
    );
    assert_eq!(catalog.available_seats("MA", "TC").unwrap(), ALL_SEATS);
}

#[test]
fn test_book_unknown_pair() {
    let catalog = build_grid_catalog();
    let err = catalog.book("MA", "TB", mask(0x1)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

// ─────────────────────────────────────────────────────────────────────────────
// Concurrent booking
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_concurrent_arbitrary_masks_never_overbook() {
    let catalog = build_grid_catalog();
    let attempts: Vec<_> = (1..=1000u32).map(mask).collect();

    let won = book_concurrently(&catalog, "MA", "TC", &attempts);

    let mut booked = NO_SEATS;
    for m in &won {
        assert!(!booked.intersects(*m), "seat booked twice: {m}");
        booked = booked | *m;
    }
    let available = catalog.available_seats("MA", "TC").unwrap();
    assert!(!booked.intersects(available));
    assert_eq!(booked | available, ALL_SEATS);
}

#[test]
fn test_concurrent_single_seat_masks() {
    let catalog = build_grid_catalog();
    let attempts: Vec<_> = (0..1000u32).map(|i| mask(1 << (i % MAX_SEATS))).collect();

    let won = book_concurrently(&catalog, "MB", "TA", &attempts);

    assert_eq!(won.len(), MAX_SEATS as usize);
    let distinct: BTreeSet<u32> = won.iter().map(|m| m.bits()).collect();
    assert_eq!(distinct.len(), won.len());
    assert_eq!(catalog.available_seats("MB", "TA").unwrap(), NO_SEATS);
}

#[test]
fn test_concurrent_bookings_on_separate_showings() {
    let catalog = build_grid_catalog();
    let attempts: Vec<_> = ALL_SEATS.seats().map(|s| s.bit()).collect();

    thread::scope(|scope| {
        for (movie, theater) in [("MA", "TC"), ("MB", "TA"), ("MC", "TB")] {
            let catalog = &catalog;
            let attempts = &attempts;
            scope.spawn(move || {
                let won = book_concurrently(catalog, movie, theater, attempts);
                assert_eq!(won.len(), attempts.len());
            });
        }
    });

    assert_eq!(catalog.stats().seats_available, 0);
}

#[test]
fn test_reads_during_bookings_stay_consistent() {
    let catalog = build_grid_catalog();

    thread::scope(|scope| {
        let catalog = &catalog;
        scope.spawn(move || {
            for seat in ALL_SEATS.seats() {
                catalog.book("MC", "TB", seat.bit()).unwrap();
            }
        });
        scope.spawn(move || {
            let mut last = ALL_SEATS;
            for _ in 0..1000 {
                let now = catalog.available_seats("MC", "TB").unwrap();
                // Availability only shrinks
                assert_eq!(now.difference(last), NO_SEATS);
                last = now;
            }
        });
    });
}

// ─────────────────────────────────────────────────────────────────────────────
// Properties
// ─────────────────────────────────────────────────────────────────────────────

fn valid_mask() -> impl Strategy<Value = SeatMask> {
    (1..=ALL_SEATS.bits()).prop_map(SeatMask::from_bits)
}

fn single_showing(booked: SeatMask) -> Catalog {
    Catalog::new(vec![ShowingRecord::new("M", "T", booked)]).unwrap()
}

proptest! {
    #[test]
    fn prop_available_is_complement(booked in 0..=ALL_SEATS.bits(), request in valid_mask()) {
        let catalog = single_showing(mask(booked));
        prop_assert_eq!(catalog.available_seats("M", "T").unwrap(), mask(booked).complement());

        catalog.book("M", "T", request).unwrap();
        let ledger = catalog.ledger("M", "T").unwrap();
        prop_assert_eq!(ledger.available_seats(), ledger.booked_seats().complement());
    }

    #[test]
    fn prop_book_succeeds_iff_disjoint(booked in 0..=ALL_SEATS.bits(), request in valid_mask()) {
        let catalog = single_showing(mask(booked));
        let ok = catalog.book("M", "T", request).unwrap();
        prop_assert_eq!(ok, !mask(booked).intersects(request));

        let expected = if ok { mask(booked) | request } else { mask(booked) };
        prop_assert_eq!(catalog.ledger("M", "T").unwrap().booked_seats(), expected);
    }

    #[test]
    fn prop_rebooking_fails_without_change(request in valid_mask()) {
        let catalog = single_showing(NO_SEATS);
        prop_assert!(catalog.book("M", "T", request).unwrap());
        let before = catalog.available_seats("M", "T").unwrap();
        prop_assert!(!catalog.book("M", "T", request).unwrap());
        prop_assert_eq!(catalog.available_seats("M", "T").unwrap(), before);
    }

    #[test]
    fn prop_out_of_range_is_invalid(low in 0..=ALL_SEATS.bits(), high in 1u32..0xFFF) {
        let catalog = single_showing(NO_SEATS);
        let request = mask(low | (high << MAX_SEATS));
        let err = catalog.book("M", "T", request).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        prop_assert_eq!(catalog.available_seats("M", "T").unwrap(), ALL_SEATS);
    }

    #[test]
    fn prop_concurrent_pair(m1 in valid_mask(), m2 in valid_mask()) {
        let catalog = single_showing(NO_SEATS);
        let won = book_concurrently(&catalog, "M", "T", &[m1, m2]);
        let booked = catalog.ledger("M", "T").unwrap().booked_seats();

        if m1.intersects(m2) {
            prop_assert_eq!(won.len(), 1);
            prop_assert_eq!(booked, won[0]);
        } else {
            prop_assert_eq!(won.len(), 2);
            prop_assert_eq!(booked, m1 | m2);
        }
    }
}
