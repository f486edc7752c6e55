//! Hand-built tiles shared by unit tests.

use super::tile::{Tile, TileKind, TileSide};
use super::zone::{
    zone_id, Animal, AnimalKind, Forest, ForestKind, Lake, Meadow, River, SpecialPower, TileId,
};

pub(crate) fn meadow(tile: TileId, local: u8, animals: &[AnimalKind]) -> Meadow {
    let id = zone_id(tile, local);
    Meadow {
        id,
        animals: animals
            .iter()
            .enumerate()
            .map(|(i, kind)| Animal::new(id * 100 + i as u32, *kind))
            .collect(),
        special_power: None,
    }
}

/// The start tile: meadow north, forest with mushrooms east and south, and
/// a river flowing from the west edge into a lake.
pub(crate) fn start_tile() -> Tile {
    let north = meadow(56, 0, &[AnimalKind::Aurochs]);
    let forest = Forest { id: 561, kind: ForestKind::WithMushrooms };
    let south_west = meadow(56, 2, &[]);
    let river = River { id: 563, fish_count: 0, lake: Some(568) };
    Tile {
        id: 56,
        kind: TileKind::Start,
        sides: [
            TileSide::Meadow(north.clone()),
            TileSide::Forest(forest),
            TileSide::Forest(forest),
            TileSide::River { meadow1: south_west, river, meadow2: north },
        ],
        lakes: vec![Lake { id: 568, fish_count: 1, special_power: None }],
    }
}

/// A forest ending at the north edge, meadow on the other three sides.
pub(crate) fn forest_end(id: TileId, kind: ForestKind) -> Tile {
    let forest = Forest { id: zone_id(id, 0), kind };
    let meadow = meadow(id, 1, &[]);
    Tile {
        id,
        kind: TileKind::Normal,
        sides: [
            TileSide::Forest(forest),
            TileSide::Meadow(meadow.clone()),
            TileSide::Meadow(meadow.clone()),
            TileSide::Meadow(meadow),
        ],
        lakes: Vec::new(),
    }
}

/// A single forest covering all four sides.
pub(crate) fn full_forest(id: TileId) -> Tile {
    let forest = TileSide::Forest(Forest { id: zone_id(id, 0), kind: ForestKind::Plain });
    Tile {
        id,
        kind: TileKind::Normal,
        sides: [forest.clone(), forest.clone(), forest.clone(), forest],
        lakes: Vec::new(),
    }
}

/// A river running north to south between a west meadow (with a deer) and
/// an east meadow.
pub(crate) fn straight_river(id: TileId) -> Tile {
    let west = meadow(id, 0, &[AnimalKind::Deer]);
    let east = meadow(id, 2, &[]);
    let river = River { id: zone_id(id, 1), fish_count: 1, lake: None };
    Tile {
        id,
        kind: TileKind::Normal,
        sides: [
            TileSide::River { meadow1: west.clone(), river, meadow2: east.clone() },
            TileSide::Meadow(east.clone()),
            TileSide::River { meadow1: east, river, meadow2: west.clone() },
            TileSide::Meadow(west),
        ],
        lakes: Vec::new(),
    }
}

/// A river entering from the north and ending in a lake, surrounded by a
/// single meadow.
pub(crate) fn river_into_lake(id: TileId, lake_power: Option<SpecialPower>) -> Tile {
    let around = meadow(id, 0, &[]);
    let lake = Lake { id: zone_id(id, 8), fish_count: 2, special_power: lake_power };
    let river = River { id: zone_id(id, 1), fish_count: 1, lake: Some(lake.id) };
    Tile {
        id,
        kind: TileKind::Normal,
        sides: [
            TileSide::River { meadow1: around.clone(), river, meadow2: around.clone() },
            TileSide::Meadow(around.clone()),
            TileSide::Meadow(around.clone()),
            TileSide::Meadow(around),
        ],
        lakes: vec![lake],
    }
}

/// A single meadow covering all four sides.
pub(crate) fn full_meadow(
    id: TileId,
    animals: &[AnimalKind],
    power: Option<SpecialPower>,
) -> Tile {
    let mut m = meadow(id, 0, animals);
    m.special_power = power;
    let side = TileSide::Meadow(m);
    Tile {
        id,
        kind: TileKind::Normal,
        sides: [side.clone(), side.clone(), side.clone(), side],
        lakes: Vec::new(),
    }
}
