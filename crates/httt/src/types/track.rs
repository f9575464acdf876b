//! Track ids implied by record position

use crate::common::{HtError, HtResult};
use std::fmt;

/// A track slot in the score and split tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Track {
    ShipGraveyard,
    LostIsland,
    VeniceCanals,
    LakePowell,
    ArcticCircle,
    NileAdventure,
    NyDisaster,
    GreekIsles,
    TheFarEast,
    Test,
    ThunderPark,
    HydroSpeedway,
    CastleVonDandy,
    /// Sentinel past the last stored track
    End,
}

impl Track {
    /// Every track in id order (`id = index * 10`)
    pub const ALL: [Track; 14] = [
        Track::ShipGraveyard,
        Track::LostIsland,
        Track::VeniceCanals,
        Track::LakePowell,
        Track::ArcticCircle,
        Track::NileAdventure,
        Track::NyDisaster,
        Track::GreekIsles,
        Track::TheFarEast,
        Track::Test,
        Track::ThunderPark,
        Track::HydroSpeedway,
        Track::CastleVonDandy,
        Track::End,
    ];

    /// Numeric id, a multiple of 10
    pub fn id(self) -> usize {
        self as usize * 10
    }

    /// Look up a track by id; ids that are not a multiple of 10 or lie past
    /// `End` have no track
    pub fn from_id(id: usize) -> Option<Self> {
        if id % 10 != 0 {
            return None;
        }
        Self::ALL.get(id / 10).copied()
    }

    /// Track owning score slot `index` (ten slots per track); slots past
    /// the last track belong to `End`
    pub fn for_score(index: usize) -> Self {
        Self::from_id(index - index % 10).unwrap_or(Track::End)
    }

    /// Track owning split record `index`
    pub fn for_split(index: usize) -> Self {
        Self::from_id(index.saturating_mul(10)).unwrap_or(Track::End)
    }

    pub fn from_name(name: &str) -> HtResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|track| track.name() == name)
            .ok_or_else(|| HtError::UnknownTrack(name.to_string()))
    }

    pub fn name(self) -> &'static str {
        match self {
            Track::ShipGraveyard => "Ship Graveyard",
            Track::LostIsland => "Lost Island",
            Track::VeniceCanals => "Venice Canals",
            Track::LakePowell => "Lake Powell",
            Track::ArcticCircle => "Arctic Circle",
            Track::NileAdventure => "Nile Adventure",
            Track::NyDisaster => "N.Y. Disaster",
            Track::GreekIsles => "Greek Isles",
            Track::TheFarEast => "The Far East",
            Track::Test => "TEST - Not Accessible",
            Track::ThunderPark => "Thunder Park",
            Track::HydroSpeedway => "Hydro Speedway",
            Track::CastleVonDandy => "Castle Von Dandy - Not Accessible",
            Track::End => "End",
        }
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids() {
        assert_eq!(Track::ShipGraveyard.id(), 0);
        assert_eq!(Track::HydroSpeedway.id(), 110);
        assert_eq!(Track::End.id(), 130);
        assert_eq!(Track::from_id(60), Some(Track::NyDisaster));
        assert_eq!(Track::from_id(65), None);
        assert_eq!(Track::from_id(140), None);
    }

    #[test]
    fn test_score_slots() {
        assert_eq!(Track::for_score(0), Track::ShipGraveyard);
        assert_eq!(Track::for_score(9), Track::ShipGraveyard);
        assert_eq!(Track::for_score(10), Track::LostIsland);
        assert_eq!(Track::for_score(129), Track::CastleVonDandy);
        assert_eq!(Track::for_score(500), Track::End);
    }

    #[test]
    fn test_split_slots() {
        assert_eq!(Track::for_split(0), Track::ShipGraveyard);
        assert_eq!(Track::for_split(12), Track::CastleVonDandy);
        assert_eq!(Track::for_split(13), Track::End);
        assert_eq!(Track::for_split(40), Track::End);
    }

    #[test]
    fn test_names() {
        for track in Track::ALL {
            assert_eq!(Track::from_name(track.name()).unwrap(), track);
        }
        assert!(matches!(
            Track::from_name("Atlantis"),
            Err(HtError::UnknownTrack(name)) if name == "Atlantis"
        ));
    }
}
