//! Terrain zones and the animals living in them.
//!
//! A zone is one typed terrain cell of a tile. Its numeric id packs the
//! owning tile and a local index (`10 * tile_id + local_id`), and animal ids
//! extend the scheme one more decimal digit (`100 * zone_id + index`).

use serde::Deserialize;

/// Identifier of a tile.
pub type TileId = u32;

/// Identifier of a zone: `10 * tile_id + local_id`.
pub type ZoneId = u32;

/// Identifier of an animal: `100 * zone_id + index`.
pub type AnimalId = u32;

/// Returns the id of the tile owning the zone.
pub const fn tile_id_of(zone_id: ZoneId) -> TileId {
    zone_id / 10
}

/// Returns the local index of the zone within its tile.
pub const fn local_id_of(zone_id: ZoneId) -> u8 {
    (zone_id % 10) as u8
}

/// Builds a zone id from a tile id and a local index.
pub const fn zone_id(tile_id: TileId, local_id: u8) -> ZoneId {
    tile_id * 10 + local_id as ZoneId
}

/// A marker granting a zone a one-off or end-of-game effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialPower {
    Shaman,
    Logboat,
    HuntingTrap,
    PitTrap,
    Wildfire,
    Raft,
}

/// Species of an animal printed on a meadow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimalKind {
    Mammoth,
    Aurochs,
    Deer,
    Tiger,
}

/// An animal in a meadow zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Animal {
    pub id: AnimalId,
    pub kind: AnimalKind,
}

impl Animal {
    pub const fn new(id: AnimalId, kind: AnimalKind) -> Self {
        Animal { id, kind }
    }

    /// Returns the id of the meadow zone this animal lives in.
    pub const fn zone_id(self) -> ZoneId {
        self.id / 100
    }
}

/// Variants of forest terrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForestKind {
    #[default]
    Plain,
    WithMenhir,
    WithMushrooms,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Forest {
    pub id: ZoneId,
    pub kind: ForestKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Meadow {
    pub id: ZoneId,
    pub animals: Vec<Animal>,
    pub special_power: Option<SpecialPower>,
}

/// A river segment. `lake` holds the id of the lake it empties into, which
/// always lives on the same tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct River {
    pub id: ZoneId,
    pub fish_count: u32,
    pub lake: Option<ZoneId>,
}

impl River {
    pub const fn has_lake(&self) -> bool {
        self.lake.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Lake {
    pub id: ZoneId,
    pub fish_count: u32,
    pub special_power: Option<SpecialPower>,
}

/// A zone of any terrain kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Zone {
    Forest(Forest),
    Meadow(Meadow),
    River(River),
    Lake(Lake),
}

impl Zone {
    pub fn id(&self) -> ZoneId {
        match self {
            Zone::Forest(f) => f.id,
            Zone::Meadow(m) => m.id,
            Zone::River(r) => r.id,
            Zone::Lake(l) => l.id,
        }
    }

    pub fn tile_id(&self) -> TileId {
        tile_id_of(self.id())
    }

    pub fn local_id(&self) -> u8 {
        local_id_of(self.id())
    }

    pub fn special_power(&self) -> Option<SpecialPower> {
        match self {
            Zone::Meadow(m) => m.special_power,
            Zone::Lake(l) => l.special_power,
            Zone::Forest(_) | Zone::River(_) => None,
        }
    }
}

/// A zone belonging to a river system: either a river or a lake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Water {
    River(River),
    Lake(Lake),
}

impl Water {
    pub const fn fish_count(&self) -> u32 {
        match self {
            Water::River(r) => r.fish_count,
            Water::Lake(l) => l.fish_count,
        }
    }
}

/// Zones that can be grouped into an area.
pub trait AreaZone: Clone {
    fn id(&self) -> ZoneId;

    fn tile_id(&self) -> TileId {
        tile_id_of(self.id())
    }
}

impl AreaZone for Forest {
    fn id(&self) -> ZoneId {
        self.id
    }
}

impl AreaZone for Meadow {
    fn id(&self) -> ZoneId {
        self.id
    }
}

impl AreaZone for River {
    fn id(&self) -> ZoneId {
        self.id
    }
}

impl AreaZone for Water {
    fn id(&self) -> ZoneId {
        match self {
            Water::River(r) => r.id,
            Water::Lake(l) => l.id,
        }
    }
}
