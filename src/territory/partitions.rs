//! The four zone partitions of a board, kept consistent with each other.
//!
//! River zones live in two partitions: `rivers` (rivers only) and
//! `river_systems` (rivers and lakes together).

use log::trace;

use super::partition::{PartitionError, ZonePartition, ZonePartitionBuilder};
use crate::board::player::{OccupantKind, PlayerColor};
use crate::board::tile::{Tile, TileSide};
use crate::board::zone::{local_id_of, Forest, Meadow, River, Water, Zone};
use crate::territory::area::Area;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZonePartitions {
    pub forests: ZonePartition<Forest>,
    pub meadows: ZonePartition<Meadow>,
    pub rivers: ZonePartition<River>,
    pub river_systems: ZonePartition<Water>,
}

/// Mutable accumulator producing new `ZonePartitions`.
#[derive(Debug)]
pub struct ZonePartitionsBuilder {
    forests: ZonePartitionBuilder<Forest>,
    meadows: ZonePartitionBuilder<Meadow>,
    rivers: ZonePartitionBuilder<River>,
    river_systems: ZonePartitionBuilder<Water>,
}

impl ZonePartitionsBuilder {
    pub fn new(partitions: &ZonePartitions) -> Self {
        ZonePartitionsBuilder {
            forests: ZonePartitionBuilder::new(&partitions.forests),
            meadows: ZonePartitionBuilder::new(&partitions.meadows),
            rivers: ZonePartitionBuilder::new(&partitions.rivers),
            river_systems: ZonePartitionBuilder::new(&partitions.river_systems),
        }
    }

    /// Registers every zone of a newly placed tile as its own area.
    ///
    /// Each zone starts with one open connection per side segment it
    /// touches. A river ending in a lake gives the lake one extra connection
    /// and itself one extra in the river system, which the river-lake union
    /// then resolves; in the river partition the lake end counts as closed.
    pub fn add_tile(&mut self, tile: &Tile) -> Result<(), PartitionError> {
        let mut open = [0u32; 10];
        for side in &tile.sides {
            for zone in side.zones() {
                open[zone.local_id() as usize] += 1;
                if let Zone::River(River { lake: Some(lake), .. }) = zone {
                    open[local_id_of(lake) as usize] += 1;
                    open[zone.local_id() as usize] += 1;
                }
            }
        }

        for zone in tile.zones() {
            let count = open[zone.local_id() as usize];
            match zone {
                Zone::Forest(f) => self.forests.add_singleton(f, count)?,
                Zone::Meadow(m) => self.meadows.add_singleton(m, count)?,
                Zone::River(r) => {
                    let river_count = if r.has_lake() { count.saturating_sub(1) } else { count };
                    self.rivers.add_singleton(r, river_count)?;
                    self.river_systems.add_singleton(Water::River(r), count)?;
                }
                Zone::Lake(l) => self.river_systems.add_singleton(Water::Lake(l), count)?,
            }
        }

        for zone in tile.side_zones() {
            if let Zone::River(River { id, lake: Some(lake), .. }) = zone {
                self.river_systems.union(id, lake)?;
            }
        }
        trace!("registered zones of tile {}", tile.id);
        Ok(())
    }

    /// Connects two sides that have just become adjacent.
    pub fn connect_sides(&mut self, s1: &TileSide, s2: &TileSide) -> Result<(), PartitionError> {
        match (s1, s2) {
            (TileSide::Forest(a), TileSide::Forest(b)) => self.forests.union(a.id, b.id),
            (TileSide::Meadow(a), TileSide::Meadow(b)) => self.meadows.union(a.id, b.id),
            (
                TileSide::River { meadow1: a1, river: ra, meadow2: a2 },
                TileSide::River { meadow1: b1, river: rb, meadow2: b2 },
            ) => {
                self.meadows.union(a1.id, b2.id)?;
                self.meadows.union(a2.id, b1.id)?;
                self.rivers.union(ra.id, rb.id)?;
                self.river_systems.union(ra.id, rb.id)
            }
            _ => Err(PartitionError::MismatchedSides),
        }
    }

    /// Gives the area containing `zone` its first occupant.
    pub fn add_initial_occupant(
        &mut self,
        player: PlayerColor,
        kind: OccupantKind,
        zone: &Zone,
    ) -> Result<(), PartitionError> {
        match (zone, kind) {
            (Zone::Forest(f), OccupantKind::Pawn) => self.forests.add_initial_occupant(f.id, player),
            (Zone::Meadow(m), OccupantKind::Pawn) => self.meadows.add_initial_occupant(m.id, player),
            (Zone::River(r), OccupantKind::Pawn) => self.rivers.add_initial_occupant(r.id, player),
            (Zone::River(_), OccupantKind::Hut) | (Zone::Lake(_), OccupantKind::Hut) => {
                self.river_systems.add_initial_occupant(zone.id(), player)
            }
            _ => Err(PartitionError::InvalidOccupant { kind, zone_id: zone.id() }),
        }
    }

    /// Removes one of `player`'s pawns from the area containing `zone`.
    pub fn remove_pawn(&mut self, player: PlayerColor, zone: &Zone) -> Result<(), PartitionError> {
        match zone {
            Zone::Forest(f) => self.forests.remove_occupant(f.id, player),
            Zone::Meadow(m) => self.meadows.remove_occupant(m.id, player),
            Zone::River(r) => self.rivers.remove_occupant(r.id, player),
            Zone::Lake(l) => Err(PartitionError::InvalidOccupant {
                kind: OccupantKind::Pawn,
                zone_id: l.id,
            }),
        }
    }

    pub fn clear_gatherers(&mut self, forest: &Area<Forest>) -> Result<(), PartitionError> {
        self.forests.remove_all_occupants_of(forest)
    }

    pub fn clear_fishers(&mut self, river: &Area<River>) -> Result<(), PartitionError> {
        self.rivers.remove_all_occupants_of(river)
    }

    pub fn build(self) -> ZonePartitions {
        ZonePartitions {
            forests: self.forests.build(),
            meadows: self.meadows.build(),
            rivers: self.rivers.build(),
            river_systems: self.river_systems.build(),
        }
    }
}
