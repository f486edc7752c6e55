//! Board representation.
//!
//! Holds the tiles placed so far on a fixed-size grid centred on the origin,
//! the zone partitions built from them, and the animals cancelled by
//! predators or traps. A `Board` is an immutable value: every change
//! returns a new board and leaves the old one untouched.

use std::collections::BTreeSet;

use log::debug;

use super::geometry::{Direction, Pos, Rotation};
use super::player::{Occupant, OccupantKind, PlayerColor};
use super::tile::{PlacedTile, Tile};
use super::zone::{tile_id_of, AnimalId, AreaZone, Forest, Meadow, River, TileId, Water, ZoneId};
use crate::territory::area::Area;
use crate::territory::partition::PartitionError;
use crate::territory::partitions::{ZonePartitions, ZonePartitionsBuilder};

/// Maximum distance of a tile from the origin along either axis.
pub const REACH: i32 = 12;

/// Number of cells along one side of the grid.
pub const SIDE: usize = (2 * REACH + 1) as usize;

/// Number of cells in the grid.
pub const CELL_COUNT: usize = SIDE * SIDE;

/// Errors raised by board transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("tile {tile_id} cannot be placed at {pos}")]
    IllegalPlacement { tile_id: TileId, pos: Pos },

    #[error("tile {0} is not on the board")]
    TileNotPlaced(TileId),

    #[error("tile {0} is already occupied")]
    TileAlreadyOccupied(TileId),

    #[error("tile {0} has no placer to own an occupant")]
    NoPlacer(TileId),

    #[error("zone {0} is not on its tile")]
    ZoneNotOnTile(ZoneId),

    #[error("occupant {0:?} is not on the board")]
    OccupantNotPresent(Occupant),

    #[error(transparent)]
    Partition(#[from] PartitionError),
}

/// Returns the grid cell index of `pos`, or None if it is off the grid.
fn cell_index(pos: Pos) -> Option<usize> {
    if pos.x.abs() > REACH || pos.y.abs() > REACH {
        return None;
    }
    Some(((pos.y + REACH) as usize) * SIDE + (pos.x + REACH) as usize)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Tiles in placement order.
    placed_tiles: Vec<PlacedTile>,
    /// Index into `placed_tiles` for each grid cell.
    cells: [Option<u16>; CELL_COUNT],
    partitions: ZonePartitions,
    cancelled_animals: BTreeSet<AnimalId>,
}

impl Default for Board {
    fn default() -> Self {
        Board::empty()
    }
}

impl Board {
    /// Creates a board with no tiles.
    pub fn empty() -> Self {
        Board {
            placed_tiles: Vec::new(),
            cells: [None; CELL_COUNT],
            partitions: ZonePartitions::default(),
            cancelled_animals: BTreeSet::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.placed_tiles.is_empty()
    }

    pub fn tile_at(&self, pos: Pos) -> Option<&PlacedTile> {
        let idx = cell_index(pos)?;
        self.cells[idx].map(|i| &self.placed_tiles[i as usize])
    }

    pub fn tile_with_id(&self, id: TileId) -> Result<&PlacedTile, BoardError> {
        self.placed_tiles
            .iter()
            .find(|t| t.id() == id)
            .ok_or(BoardError::TileNotPlaced(id))
    }

    /// Returns the placed tiles in placement order.
    pub fn placed_tiles(&self) -> &[PlacedTile] {
        &self.placed_tiles
    }

    pub fn last_placed_tile(&self) -> Option<&PlacedTile> {
        self.placed_tiles.last()
    }

    pub fn partitions(&self) -> &ZonePartitions {
        &self.partitions
    }

    pub fn cancelled_animals(&self) -> &BTreeSet<AnimalId> {
        &self.cancelled_animals
    }

    pub fn occupants(&self) -> BTreeSet<Occupant> {
        self.placed_tiles.iter().filter_map(|t| t.occupant).collect()
    }

    /// Counts the occupants of `kind` that `player` has on the board.
    pub fn occupant_count(&self, player: PlayerColor, kind: OccupantKind) -> u32 {
        self.placed_tiles
            .iter()
            .filter(|t| t.placer == Some(player) && t.occupant.is_some_and(|o| o.kind == kind))
            .count() as u32
    }

    pub fn forest_area(&self, forest: &Forest) -> Result<&Area<Forest>, BoardError> {
        Ok(self.partitions.forests.area_containing(forest.id)?)
    }

    pub fn meadow_area(&self, meadow: &Meadow) -> Result<&Area<Meadow>, BoardError> {
        Ok(self.partitions.meadows.area_containing(meadow.id)?)
    }

    pub fn river_area(&self, river: &River) -> Result<&Area<River>, BoardError> {
        Ok(self.partitions.rivers.area_containing(river.id)?)
    }

    pub fn river_system_area(&self, water: &Water) -> Result<&Area<Water>, BoardError> {
        Ok(self.partitions.river_systems.area_containing(water.id())?)
    }

    pub fn meadow_areas(&self) -> &[Area<Meadow>] {
        self.partitions.meadows.areas()
    }

    pub fn river_system_areas(&self) -> &[Area<Water>] {
        self.partitions.river_systems.areas()
    }

    /// Returns the part of the meadow containing `meadow` that lies on tiles
    /// at most one step (diagonals included) from `pos`. The result keeps the
    /// whole area's occupants and has no open connections.
    pub fn adjacent_meadow(&self, pos: Pos, meadow: &Meadow) -> Result<Area<Meadow>, BoardError> {
        let area = self.meadow_area(meadow)?;
        Ok(area.restricted_to(|m| {
            self.tile_with_id(m.tile_id())
                .is_ok_and(|t| (t.pos.x - pos.x).abs() <= 1 && (t.pos.y - pos.y).abs() <= 1)
        }))
    }

    /// Returns the fish of a river area, reading lake data from the tiles.
    pub fn river_fish_count(&self, river: &Area<River>) -> u32 {
        river.fish_count(|lake| {
            self.tile_with_id(tile_id_of(lake))
                .ok()
                .and_then(|t| t.tile.lake(lake))
                .map_or(0, |l| l.fish_count)
        })
    }

    /// Returns the empty cells next to at least one placed tile.
    pub fn insertion_positions(&self) -> BTreeSet<Pos> {
        let mut positions = BTreeSet::new();
        for tile in &self.placed_tiles {
            for direction in Direction::ALL {
                let pos = tile.pos.neighbor(direction);
                if cell_index(pos).is_some() && self.tile_at(pos).is_none() {
                    positions.insert(pos);
                }
            }
        }
        positions
    }

    fn is_insertion_position(&self, pos: Pos) -> bool {
        cell_index(pos).is_some()
            && self.tile_at(pos).is_none()
            && Direction::ALL.iter().any(|&d| self.tile_at(pos.neighbor(d)).is_some())
    }

    /// Returns true if `tile` sits on an insertion position and each of its
    /// sides matches the kind of the neighbor it faces.
    pub fn can_add_tile(&self, tile: &PlacedTile) -> bool {
        if !self.is_insertion_position(tile.pos) {
            return false;
        }
        Direction::ALL.iter().all(|&d| match self.tile_at(tile.pos.neighbor(d)) {
            Some(neighbor) => neighbor.side(d.opposite()).is_same_kind_as(tile.side(d)),
            None => true,
        })
    }

    /// Returns true if `tile` fits somewhere on the board in some rotation.
    pub fn could_place_tile(&self, tile: &Tile) -> bool {
        self.insertion_positions().into_iter().any(|pos| {
            Rotation::ALL
                .iter()
                .any(|&r| self.can_add_tile(&PlacedTile::new(tile.clone(), None, r, pos)))
        })
    }

    /// Places a tile and connects its zones to its neighbors'.
    ///
    /// The first tile may go anywhere on the grid; later ones must satisfy
    /// `can_add_tile`. An occupant already set on the tile is registered too.
    pub fn with_new_tile(&self, tile: PlacedTile) -> Result<Board, BoardError> {
        let illegal = BoardError::IllegalPlacement { tile_id: tile.id(), pos: tile.pos };
        let idx = cell_index(tile.pos).ok_or_else(|| illegal.clone())?;
        if !self.is_empty() && !self.can_add_tile(&tile) {
            return Err(illegal);
        }

        let mut builder = ZonePartitionsBuilder::new(&self.partitions);
        builder.add_tile(&tile.tile)?;
        for direction in Direction::ALL {
            if let Some(neighbor) = self.tile_at(tile.pos.neighbor(direction)) {
                builder.connect_sides(tile.side(direction), neighbor.side(direction.opposite()))?;
            }
        }
        if let Some(occupant) = tile.occupant {
            let placer = tile.placer.ok_or(BoardError::NoPlacer(tile.id()))?;
            let zone = tile
                .zone_with_id(occupant.zone_id)
                .ok_or(BoardError::ZoneNotOnTile(occupant.zone_id))?;
            builder.add_initial_occupant(placer, occupant.kind, &zone)?;
        }

        debug!("placed tile {} at {} ({:?})", tile.id(), tile.pos, tile.rotation);
        let mut board = self.clone();
        board.cells[idx] = Some(board.placed_tiles.len() as u16);
        board.placed_tiles.push(tile);
        board.partitions = builder.build();
        Ok(board)
    }

    fn with_replaced_tile(&self, tile: PlacedTile, partitions: ZonePartitions) -> Board {
        let mut board = self.clone();
        if let Some(slot) = board.placed_tiles.iter_mut().find(|t| t.id() == tile.id()) {
            *slot = tile;
        }
        board.partitions = partitions;
        board
    }

    /// Puts an occupant owned by the tile's placer on one of its zones.
    pub fn with_occupant(&self, occupant: Occupant) -> Result<Board, BoardError> {
        let tile = self.tile_with_id(tile_id_of(occupant.zone_id))?;
        if tile.occupant.is_some() {
            return Err(BoardError::TileAlreadyOccupied(tile.id()));
        }
        let placer = tile.placer.ok_or(BoardError::NoPlacer(tile.id()))?;
        let zone = tile
            .zone_with_id(occupant.zone_id)
            .ok_or(BoardError::ZoneNotOnTile(occupant.zone_id))?;

        let mut builder = ZonePartitionsBuilder::new(&self.partitions);
        builder.add_initial_occupant(placer, occupant.kind, &zone)?;
        debug!("{:?} occupies zone {} with a {:?}", placer, occupant.zone_id, occupant.kind);
        Ok(self.with_replaced_tile(tile.with_occupant(occupant), builder.build()))
    }

    /// Takes a pawn back from the board. Huts stay until the end of the game.
    pub fn without_occupant(&self, occupant: Occupant) -> Result<Board, BoardError> {
        let tile = self.tile_with_id(tile_id_of(occupant.zone_id))?;
        if tile.occupant != Some(occupant) {
            return Err(BoardError::OccupantNotPresent(occupant));
        }
        if occupant.kind != OccupantKind::Pawn {
            return Err(PartitionError::InvalidOccupant {
                kind: occupant.kind,
                zone_id: occupant.zone_id,
            }
            .into());
        }
        let placer = tile.placer.ok_or(BoardError::NoPlacer(tile.id()))?;
        let zone = tile
            .zone_with_id(occupant.zone_id)
            .ok_or(BoardError::ZoneNotOnTile(occupant.zone_id))?;

        let mut builder = ZonePartitionsBuilder::new(&self.partitions);
        builder.remove_pawn(placer, &zone)?;
        Ok(self.with_replaced_tile(tile.with_no_occupant(), builder.build()))
    }

    /// Returns every pawn standing in the given forests and rivers to its
    /// owner.
    pub fn without_gatherers_or_fishers_in(
        &self,
        forests: &[Area<Forest>],
        rivers: &[Area<River>],
    ) -> Result<Board, BoardError> {
        let mut builder = ZonePartitionsBuilder::new(&self.partitions);
        for forest in forests {
            builder.clear_gatherers(forest)?;
        }
        for river in rivers {
            builder.clear_fishers(river)?;
        }

        let mut board = self.clone();
        for tile in board.placed_tiles.iter_mut() {
            let Some(zone_id) = tile.id_of_zone_occupied_by(OccupantKind::Pawn) else {
                continue;
            };
            if forests.iter().any(|f| f.contains(zone_id)) || rivers.iter().any(|r| r.contains(zone_id)) {
                *tile = tile.with_no_occupant();
            }
        }
        board.partitions = builder.build();
        Ok(board)
    }

    pub fn with_more_cancelled_animals(&self, animals: impl IntoIterator<Item = AnimalId>) -> Board {
        let mut board = self.clone();
        board.cancelled_animals.extend(animals);
        board
    }

    /// Returns the forests closed by the last placed tile.
    ///
    /// A closed area has no open edge, so no later tile can touch it: every
    /// closed area holding a zone of the last tile was closed by that tile,
    /// and each closure is reported exactly once.
    pub fn forests_closed_by_last_tile(&self) -> Result<Vec<Area<Forest>>, BoardError> {
        let mut closed: Vec<Area<Forest>> = Vec::new();
        let Some(last) = self.last_placed_tile() else {
            return Ok(closed);
        };
        for forest in last.forest_zones() {
            let area = self.forest_area(&forest)?;
            if area.is_closed() && !closed.iter().any(|a| a.contains(forest.id)) {
                closed.push(area.clone());
            }
        }
        Ok(closed)
    }

    /// Returns the rivers closed by the last placed tile.
    pub fn rivers_closed_by_last_tile(&self) -> Result<Vec<Area<River>>, BoardError> {
        let mut closed: Vec<Area<River>> = Vec::new();
        let Some(last) = self.last_placed_tile() else {
            return Ok(closed);
        };
        for river in last.river_zones() {
            let area = self.river_area(&river)?;
            if area.is_closed() && !closed.iter().any(|a| a.contains(river.id)) {
                closed.push(area.clone());
            }
        }
        Ok(closed)
    }
}
