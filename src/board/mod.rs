//! Board representation and the pieces placed on it.
//!
//! Contains geometry, players and occupants, terrain zones, tiles, and the
//! immutable `Board` value tracking placed tiles and their areas.

pub mod geometry;
pub mod player;
pub mod state;
pub mod tile;
pub mod zone;

#[cfg(test)]
pub(crate) mod fixtures;

pub use geometry::{Direction, Pos, Rotation};
pub use player::{Occupant, OccupantKind, PlayerColor};
pub use state::{Board, BoardError, CELL_COUNT, REACH, SIDE};
pub use tile::{PlacedTile, Tile, TileKind, TileSide};
pub use zone::{
    tile_id_of, zone_id, Animal, AnimalId, AnimalKind, AreaZone, Forest, ForestKind, Lake, Meadow,
    River, SpecialPower, TileId, Water, Zone, ZoneId,
};
