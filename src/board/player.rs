//! Player colors and the occupants (pawns and huts) they place.

use serde::Serialize;

use super::zone::ZoneId;

/// A player, identified by color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerColor {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
}

impl PlayerColor {
    pub const ALL: [PlayerColor; 5] = [
        PlayerColor::Red,
        PlayerColor::Blue,
        PlayerColor::Green,
        PlayerColor::Yellow,
        PlayerColor::Purple,
    ];

    /// Returns the lowercase color name.
    pub const fn name(self) -> &'static str {
        match self {
            PlayerColor::Red => "red",
            PlayerColor::Blue => "blue",
            PlayerColor::Green => "green",
            PlayerColor::Yellow => "yellow",
            PlayerColor::Purple => "purple",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OccupantKind {
    Pawn,
    Hut,
}

impl OccupantKind {
    /// Number of occupants of this kind each player owns.
    pub const fn count_per_player(self) -> u32 {
        match self {
            OccupantKind::Pawn => 5,
            OccupantKind::Hut => 3,
        }
    }
}

/// An occupant standing on a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Occupant {
    pub kind: OccupantKind,
    pub zone_id: ZoneId,
}

impl Occupant {
    pub const fn new(kind: OccupantKind, zone_id: ZoneId) -> Self {
        Occupant { kind, zone_id }
    }
}
