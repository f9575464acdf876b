//! Boat ids as stored in score records

use crate::common::{HtError, HtResult};
use std::fmt;

/// A selectable boat, in the game's stored order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Boat {
    Banshee = 0x00,
    TidalBlade = 0x01,
    RadHazzard = 0x02,
    MissBehave = 0x03,
    DamnTheTorpedoes = 0x04,
    Cutthroat = 0x05,
    Razorback = 0x06,
    Thresher = 0x07,
    Midway = 0x08,
    Chumdinger = 0x09,
    ArmedResponse = 0x0A,
    Blowfish = 0x0B,
    Tinytanic = 0x0C,
}

impl Boat {
    /// Every boat, indexed by its id
    pub const ALL: [Boat; 13] = [
        Boat::Banshee,
        Boat::TidalBlade,
        Boat::RadHazzard,
        Boat::MissBehave,
        Boat::DamnTheTorpedoes,
        Boat::Cutthroat,
        Boat::Razorback,
        Boat::Thresher,
        Boat::Midway,
        Boat::Chumdinger,
        Boat::ArmedResponse,
        Boat::Blowfish,
        Boat::Tinytanic,
    ];

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> HtResult<Self> {
        Self::ALL
            .get(id as usize)
            .copied()
            .ok_or(HtError::UnknownBoatId(id))
    }

    pub fn from_name(name: &str) -> HtResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|boat| boat.name() == name)
            .ok_or_else(|| HtError::UnknownBoatName(name.to_string()))
    }

    /// Name as shown in the attract mode and in exported tables
    pub fn name(self) -> &'static str {
        match self {
            Boat::Banshee => "Banshee",
            Boat::TidalBlade => "Tidal Blade",
            Boat::RadHazzard => "Rad Hazzard",
            Boat::MissBehave => "Miss Behave",
            Boat::DamnTheTorpedoes => "Damn the Torpedoes",
            Boat::Cutthroat => "Cutthroat",
            Boat::Razorback => "Razorback",
            Boat::Thresher => "Thresher",
            Boat::Midway => "Midway",
            Boat::Chumdinger => "Chumdinger",
            Boat::ArmedResponse => "Armed Response",
            Boat::Blowfish => "Blowfish",
            Boat::Tinytanic => "Tinytanic",
        }
    }
}

impl fmt::Display for Boat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_follow_table_order() {
        for (index, boat) in Boat::ALL.iter().enumerate() {
            assert_eq!(boat.id() as usize, index);
        }
    }

    #[test]
    fn test_id_and_name_bijection() {
        for boat in Boat::ALL {
            assert_eq!(Boat::from_id(boat.id()).unwrap(), boat);
            assert_eq!(Boat::from_name(boat.name()).unwrap(), boat);
        }
    }

    #[test]
    fn test_unknown_id() {
        assert!(matches!(Boat::from_id(0x0D), Err(HtError::UnknownBoatId(0x0D))));
        assert!(matches!(Boat::from_id(0xFF), Err(HtError::UnknownBoatId(0xFF))));
    }

    #[test]
    fn test_unknown_name() {
        assert!(matches!(
            Boat::from_name("Rad Hazard"),
            Err(HtError::UnknownBoatName(name)) if name == "Rad Hazard"
        ));
        // Names are matched exactly
        assert!(Boat::from_name("banshee").is_err());
    }
}
