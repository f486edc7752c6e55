//! Tile catalogs and shuffled draw decks.
//!
//! A catalog is a JSON document listing every tile. Each tile names its zones
//! by local index and describes its four sides (N, E, S, W) as lists of
//! those indices: one for a forest or meadow side, three (meadow, river,
//! meadow, in clockwise order) for a river side. Lakes are not on any side
//! and are reached through the rivers feeding them.
//!
//! ```json
//! {"tiles": [
//!   {"id": 0, "kind": "normal",
//!    "zones": [{"local": 0, "kind": "forest"},
//!              {"local": 1, "kind": "meadow", "animals": ["deer"]}],
//!    "sides": [[0], [1], [1], [1]]}
//! ]}
//! ```

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::path::{Path, PathBuf};

use log::warn;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;

use crate::board::tile::{Tile, TileKind, TileSide};
use crate::board::zone::{
    zone_id, Animal, AnimalKind, Forest, ForestKind, Lake, Meadow, River, SpecialPower, TileId,
    Zone,
};

const BUILTIN_CATALOG: &str = include_str!("../data/tiles.json");

/// Animal ids keep two decimal digits for the index within a meadow.
const MAX_ANIMALS: usize = 100;

/// Errors raised while loading a catalog or drawing from a deck.
#[derive(Debug, thiserror::Error)]
pub enum DeckError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid tile catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error("tile {0} appears twice in the catalog")]
    DuplicateTile(TileId),

    #[error("tile {tile}: zone {local} is defined twice")]
    DuplicateZone { tile: TileId, local: u8 },

    #[error("tile {tile}: local index {local} is out of range")]
    LocalOutOfRange { tile: TileId, local: u8 },

    #[error("tile {tile}: zone {local} is not defined")]
    UnknownZone { tile: TileId, local: u8 },

    #[error("tile {tile}: side {side} does not describe a forest, meadow or river side")]
    BadSide { tile: TileId, side: usize },

    #[error("tile {tile}: river {local} does not flow into a lake of the tile")]
    BadLake { tile: TileId, local: u8 },

    #[error("tile {tile}: river {local} flows into a lake but touches {sides} sides")]
    LakeRiverSides { tile: TileId, local: u8, sides: usize },

    #[error("tile {tile}: meadow {local} holds {count} animals, at most 100 fit")]
    TooManyAnimals { tile: TileId, local: u8, count: usize },

    #[error("tile {tile}: zone {local} touches no side")]
    DetachedZone { tile: TileId, local: u8 },

    #[error("a catalog needs exactly one start tile, found {0}")]
    StartTileCount(usize),

    #[error("the {0:?} deck is empty")]
    EmptyDeck(TileKind),
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ZoneEntry {
    Forest {
        local: u8,
        #[serde(default)]
        forest: ForestKind,
    },
    Meadow {
        local: u8,
        #[serde(default)]
        animals: Vec<AnimalKind>,
        #[serde(default)]
        power: Option<SpecialPower>,
    },
    River {
        local: u8,
        #[serde(default)]
        fish: u32,
        #[serde(default)]
        lake: Option<u8>,
    },
    Lake {
        local: u8,
        #[serde(default)]
        fish: u32,
        #[serde(default)]
        power: Option<SpecialPower>,
    },
}

impl ZoneEntry {
    fn local(&self) -> u8 {
        match *self {
            ZoneEntry::Forest { local, .. }
            | ZoneEntry::Meadow { local, .. }
            | ZoneEntry::River { local, .. }
            | ZoneEntry::Lake { local, .. } => local,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TileEntry {
    id: TileId,
    kind: TileKind,
    zones: Vec<ZoneEntry>,
    sides: [Vec<u8>; 4],
}

/// A parsed tile catalog.
#[derive(Debug, Deserialize)]
pub struct TileCatalog {
    tiles: Vec<TileEntry>,
}

impl TileCatalog {
    /// Checks the catalog and builds its tiles.
    pub fn into_tiles(self) -> Result<Vec<Tile>, DeckError> {
        let mut seen = BTreeSet::new();
        let mut tiles = Vec::with_capacity(self.tiles.len());
        for entry in self.tiles {
            if !seen.insert(entry.id) {
                return Err(DeckError::DuplicateTile(entry.id));
            }
            tiles.push(build_tile(entry)?);
        }
        let starts = tiles.iter().filter(|t| t.kind == TileKind::Start).count();
        if starts != 1 {
            return Err(DeckError::StartTileCount(starts));
        }
        Ok(tiles)
    }
}

fn build_tile(entry: TileEntry) -> Result<Tile, DeckError> {
    let tile = entry.id;
    let lake_locals: BTreeSet<u8> = entry
        .zones
        .iter()
        .filter(|z| matches!(z, ZoneEntry::Lake { .. }))
        .map(ZoneEntry::local)
        .collect();

    let mut zones: BTreeMap<u8, Zone> = BTreeMap::new();
    for z in entry.zones {
        let local = z.local();
        if local >= 10 {
            return Err(DeckError::LocalOutOfRange { tile, local });
        }
        let id = zone_id(tile, local);
        let zone = match z {
            ZoneEntry::Forest { forest, .. } => Zone::Forest(Forest { id, kind: forest }),
            ZoneEntry::Meadow { animals, power, .. } => {
                if animals.len() > MAX_ANIMALS {
                    return Err(DeckError::TooManyAnimals { tile, local, count: animals.len() });
                }
                Zone::Meadow(Meadow {
                    id,
                    animals: animals
                        .into_iter()
                        .enumerate()
                        .map(|(i, kind)| Animal::new(id * 100 + i as u32, kind))
                        .collect(),
                    special_power: power,
                })
            }
            ZoneEntry::River { fish, lake, .. } => {
                if lake.is_some_and(|l| !lake_locals.contains(&l)) {
                    return Err(DeckError::BadLake { tile, local });
                }
                Zone::River(River { id, fish_count: fish, lake: lake.map(|l| zone_id(tile, l)) })
            }
            ZoneEntry::Lake { fish, power, .. } => {
                Zone::Lake(Lake { id, fish_count: fish, special_power: power })
            }
        };
        if zones.insert(local, zone).is_some() {
            return Err(DeckError::DuplicateZone { tile, local });
        }
    }

    let lookup = |local: u8| zones.get(&local).ok_or(DeckError::UnknownZone { tile, local });
    let mut sides = Vec::with_capacity(4);
    let mut on_side = BTreeSet::new();
    for (i, locals) in entry.sides.iter().enumerate() {
        let bad = || DeckError::BadSide { tile, side: i };
        let side = match locals.as_slice() {
            &[only] => match lookup(only)? {
                Zone::Forest(f) => TileSide::Forest(*f),
                Zone::Meadow(m) => TileSide::Meadow(m.clone()),
                _ => return Err(bad()),
            },
            &[m1, r, m2] => match (lookup(m1)?, lookup(r)?, lookup(m2)?) {
                (Zone::Meadow(meadow1), Zone::River(river), Zone::Meadow(meadow2)) => TileSide::River {
                    meadow1: meadow1.clone(),
                    river: *river,
                    meadow2: meadow2.clone(),
                },
                _ => return Err(bad()),
            },
            _ => return Err(bad()),
        };
        on_side.extend(locals.iter().copied());
        sides.push(side);
    }

    for (&local, zone) in &zones {
        if let Zone::River(River { lake: Some(_), .. }) = zone {
            let sides = entry.sides.iter().filter(|l| l.len() == 3 && l[1] == local).count();
            if sides != 1 {
                return Err(DeckError::LakeRiverSides { tile, local, sides });
            }
        }
    }

    if let Some(&local) = zones
        .iter()
        .find(|(local, z)| !matches!(z, Zone::Lake(_)) && !on_side.contains(*local))
        .map(|(local, _)| local)
    {
        return Err(DeckError::DetachedZone { tile, local });
    }

    let sides: [TileSide; 4] = match sides.try_into() {
        Ok(sides) => sides,
        Err(_) => return Err(DeckError::BadSide { tile, side: 4 }),
    };
    let lakes = zones
        .into_values()
        .filter_map(|z| match z {
            Zone::Lake(l) => Some(l),
            _ => None,
        })
        .collect();
    Ok(Tile { id: tile, kind: entry.kind, sides, lakes })
}

/// Parses and checks a catalog held in a string.
pub fn load_tiles_from_str(json: &str) -> Result<Vec<Tile>, DeckError> {
    let catalog: TileCatalog = serde_json::from_str(json)?;
    catalog.into_tiles()
}

/// Reads, parses and checks a catalog file.
pub fn load_tiles(path: impl AsRef<Path>) -> Result<Vec<Tile>, DeckError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)
        .map_err(|source| DeckError::Io { path: path.to_path_buf(), source })?;
    load_tiles_from_str(&json)
}

/// Returns the tiles of the built-in catalog.
pub fn builtin() -> Result<Vec<Tile>, DeckError> {
    load_tiles_from_str(BUILTIN_CATALOG)
}

/// The three draw piles of a game. The top of each pile is its front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileDecks {
    start: VecDeque<Tile>,
    normal: VecDeque<Tile>,
    menhir: VecDeque<Tile>,
}

impl TileDecks {
    /// Builds decks from tiles listed top first.
    pub fn new(start: Vec<Tile>, normal: Vec<Tile>, menhir: Vec<Tile>) -> Self {
        TileDecks { start: start.into(), normal: normal.into(), menhir: menhir.into() }
    }

    /// Sorts the tiles into their decks and shuffles the normal and menhir
    /// piles.
    pub fn shuffled<R: Rng + ?Sized>(tiles: &[Tile], rng: &mut R) -> Self {
        let of_kind = |kind: TileKind| tiles.iter().filter(|t| t.kind == kind).cloned().collect::<Vec<_>>();
        let mut normal = of_kind(TileKind::Normal);
        let mut menhir = of_kind(TileKind::Menhir);
        normal.shuffle(rng);
        menhir.shuffle(rng);
        TileDecks::new(of_kind(TileKind::Start), normal, menhir)
    }

    fn deck(&self, kind: TileKind) -> &VecDeque<Tile> {
        match kind {
            TileKind::Start => &self.start,
            TileKind::Normal => &self.normal,
            TileKind::Menhir => &self.menhir,
        }
    }

    fn deck_mut(&mut self, kind: TileKind) -> &mut VecDeque<Tile> {
        match kind {
            TileKind::Start => &mut self.start,
            TileKind::Normal => &mut self.normal,
            TileKind::Menhir => &mut self.menhir,
        }
    }

    pub fn deck_size(&self, kind: TileKind) -> usize {
        self.deck(kind).len()
    }

    pub fn top_tile(&self, kind: TileKind) -> Option<&Tile> {
        self.deck(kind).front()
    }

    pub fn with_top_tile_drawn(&self, kind: TileKind) -> Result<TileDecks, DeckError> {
        let mut decks = self.clone();
        decks.deck_mut(kind).pop_front().ok_or(DeckError::EmptyDeck(kind))?;
        Ok(decks)
    }

    /// Discards tiles from the top of a deck until one satisfies `predicate`
    /// or the deck runs out.
    pub fn with_top_tile_drawn_until(&self, kind: TileKind, predicate: impl Fn(&Tile) -> bool) -> TileDecks {
        let mut decks = self.clone();
        let deck = decks.deck_mut(kind);
        while let Some(top) = deck.front() {
            if predicate(top) {
                break;
            }
            warn!("discarding {:?} tile {}: it cannot be placed", kind, top.id);
            deck.pop_front();
        }
        decks
    }
}
