//! Tiles, their sides, and tiles placed on the board.
//!
//! A tile has four sides, each carrying either a forest, a meadow, or a
//! river flanked by two meadows. Sides are listed in clockwise order (N, E,
//! S, W) and the zones of a river side are listed clockwise as well, so two
//! facing river sides meet meadow1-to-meadow2.

use std::collections::BTreeSet;

use serde::Deserialize;

use super::geometry::{Direction, Pos, Rotation};
use super::player::{Occupant, OccupantKind, PlayerColor};
use super::zone::{Forest, Lake, Meadow, River, SpecialPower, TileId, Zone, ZoneId};

/// One side of a tile.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TileSide {
    Forest(Forest),
    Meadow(Meadow),
    River {
        meadow1: Meadow,
        river: River,
        meadow2: Meadow,
    },
}

impl TileSide {
    /// Returns the zones touching this side, in clockwise order.
    pub fn zones(&self) -> Vec<Zone> {
        match self {
            TileSide::Forest(f) => vec![Zone::Forest(*f)],
            TileSide::Meadow(m) => vec![Zone::Meadow(m.clone())],
            TileSide::River { meadow1, river, meadow2 } => vec![
                Zone::Meadow(meadow1.clone()),
                Zone::River(*river),
                Zone::Meadow(meadow2.clone()),
            ],
        }
    }

    /// Returns true if both sides carry the same terrain kind.
    pub fn is_same_kind_as(&self, other: &TileSide) -> bool {
        matches!(
            (self, other),
            (TileSide::Forest(_), TileSide::Forest(_))
                | (TileSide::Meadow(_), TileSide::Meadow(_))
                | (TileSide::River { .. }, TileSide::River { .. })
        )
    }
}

/// Which deck a tile comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileKind {
    Start,
    Normal,
    Menhir,
}

/// An unplaced tile.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tile {
    pub id: TileId,
    pub kind: TileKind,
    /// Sides indexed by `Direction as usize`.
    pub sides: [TileSide; 4],
    /// Lakes fed by this tile's rivers.
    pub lakes: Vec<Lake>,
}

impl Tile {
    pub fn side(&self, direction: Direction) -> &TileSide {
        &self.sides[direction as usize]
    }

    /// Returns the zones touching at least one side, each once.
    pub fn side_zones(&self) -> Vec<Zone> {
        let mut seen = BTreeSet::new();
        let mut zones = Vec::new();
        for side in &self.sides {
            for zone in side.zones() {
                if seen.insert(zone.id()) {
                    zones.push(zone);
                }
            }
        }
        zones
    }

    /// Returns every zone of the tile: side zones followed by lakes.
    pub fn zones(&self) -> Vec<Zone> {
        let mut zones = self.side_zones();
        zones.extend(self.lakes.iter().map(|l| Zone::Lake(*l)));
        zones
    }

    pub fn lake(&self, id: ZoneId) -> Option<&Lake> {
        self.lakes.iter().find(|l| l.id == id)
    }
}

/// A tile placed on the board, possibly occupied.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlacedTile {
    pub tile: Tile,
    /// The player who placed the tile; `None` for the start tile.
    pub placer: Option<PlayerColor>,
    pub rotation: Rotation,
    pub pos: Pos,
    pub occupant: Option<Occupant>,
}

impl PlacedTile {
    pub fn new(tile: Tile, placer: Option<PlayerColor>, rotation: Rotation, pos: Pos) -> Self {
        PlacedTile { tile, placer, rotation, pos, occupant: None }
    }

    pub fn id(&self) -> TileId {
        self.tile.id
    }

    pub fn kind(&self) -> TileKind {
        self.tile.kind
    }

    /// Returns the side facing `direction` once the rotation is applied.
    pub fn side(&self, direction: Direction) -> &TileSide {
        self.tile.side(direction.rotated(self.rotation.negated()))
    }

    pub fn zone_with_id(&self, id: ZoneId) -> Option<Zone> {
        self.tile.zones().into_iter().find(|z| z.id() == id)
    }

    /// Returns the zone carrying a special power, if any.
    pub fn special_power_zone(&self) -> Option<Zone> {
        self.tile.zones().into_iter().find(|z| z.special_power().is_some())
    }

    pub fn special_power(&self) -> Option<SpecialPower> {
        self.special_power_zone().and_then(|z| z.special_power())
    }

    pub fn forest_zones(&self) -> Vec<Forest> {
        self.tile
            .side_zones()
            .into_iter()
            .filter_map(|z| match z {
                Zone::Forest(f) => Some(f),
                _ => None,
            })
            .collect()
    }

    pub fn meadow_zones(&self) -> Vec<Meadow> {
        self.tile
            .side_zones()
            .into_iter()
            .filter_map(|z| match z {
                Zone::Meadow(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    pub fn river_zones(&self) -> Vec<River> {
        self.tile
            .side_zones()
            .into_iter()
            .filter_map(|z| match z {
                Zone::River(r) => Some(r),
                _ => None,
            })
            .collect()
    }

    /// Returns every occupant the placer could put on this tile: a pawn on
    /// each forest, meadow and river, a hut on each lake and on each river
    /// that does not end in a lake.
    pub fn potential_occupants(&self) -> BTreeSet<Occupant> {
        let mut occupants = BTreeSet::new();
        if self.placer.is_none() {
            return occupants;
        }
        for zone in self.tile.zones() {
            match zone {
                Zone::Forest(_) | Zone::Meadow(_) => {
                    occupants.insert(Occupant::new(OccupantKind::Pawn, zone.id()));
                }
                Zone::River(r) => {
                    occupants.insert(Occupant::new(OccupantKind::Pawn, r.id));
                    if !r.has_lake() {
                        occupants.insert(Occupant::new(OccupantKind::Hut, r.id));
                    }
                }
                Zone::Lake(l) => {
                    occupants.insert(Occupant::new(OccupantKind::Hut, l.id));
                }
            }
        }
        occupants
    }

    pub fn with_occupant(&self, occupant: Occupant) -> PlacedTile {
        PlacedTile { occupant: Some(occupant), ..self.clone() }
    }

    pub fn with_no_occupant(&self) -> PlacedTile {
        PlacedTile { occupant: None, ..self.clone() }
    }

    /// Returns the id of the zone holding an occupant of the given kind.
    pub fn id_of_zone_occupied_by(&self, kind: OccupantKind) -> Option<ZoneId> {
        self.occupant.filter(|o| o.kind == kind).map(|o| o.zone_id)
    }
}
