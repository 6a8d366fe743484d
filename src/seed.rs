//! Built-in showing data.
//!
//! Used when no catalog file is configured.

use crate::types::seat::{SeatMask, ALL_SEATS, NO_SEATS};
use crate::types::showing::ShowingRecord;

const LANDMARK: &str = "Landmark Cinemas";
const GALAXY: &str = "Galaxy Cinemas";
const PARADISO: &str = "Cinema Paradiso";

/// The default showings with their pre-booked seats.
pub fn default_showings() -> Vec<ShowingRecord> {
    let apes = "Kingdom of the Planet of the Apes";
    let furiosa = "Furiosa: A Mad Max Saga";
    let garfield = "Garfield Movie, The";
    let back_to_black = "Back to Black";

    vec![
        ShowingRecord::new(apes, LANDMARK, ALL_SEATS),
        ShowingRecord::new(apes, GALAXY, NO_SEATS),
        ShowingRecord::new(apes, PARADISO, NO_SEATS),
        ShowingRecord::new(furiosa, LANDMARK, SeatMask::from_bits(0xdead)),
        ShowingRecord::new(furiosa, GALAXY, SeatMask::from_bits(0xbeef)),
        ShowingRecord::new(garfield, LANDMARK, SeatMask::from_bits(0xc0ca)),
        ShowingRecord::new(garfield, PARADISO, SeatMask::from_bits(0xc01a)),
        ShowingRecord::new(back_to_black, GALAXY, NO_SEATS),
        ShowingRecord::new(back_to_black, PARADISO, NO_SEATS),
    ]
}
