//! Closed lookup tables stored in the field data block
//!
//! Boats are stored as single-byte ids and tracks are implied by the
//! position of each record. Both tables are fixed by the game, so they are
//! enums with their ids and display names kept side by side.

mod boat;
mod track;

pub use boat::Boat;
pub use track::Track;
