//! Disjoint covers of all known zones of one kind.
//!
//! `ZonePartition` is an immutable snapshot with O(1) lookup of the area
//! containing a zone. Changes go through `ZonePartitionBuilder`, an owned
//! union-find over area slots keyed by zone id, consumed once by `build()`.

use std::collections::HashMap;

use log::trace;

use super::area::{Area, AreaError};
use crate::board::player::{OccupantKind, PlayerColor};
use crate::board::zone::{AreaZone, ZoneId};

/// Contract violations on partitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PartitionError {
    #[error("zone {0} is not registered in any area")]
    ZoneNotRegistered(ZoneId),

    #[error("zone {0} already belongs to an area")]
    ZoneAlreadyRegistered(ZoneId),

    #[error("area containing zone {0} is not part of the partition")]
    AreaNotPresent(ZoneId),

    #[error("sides of different kinds cannot be connected")]
    MismatchedSides,

    #[error("a {kind:?} cannot occupy zone {zone_id}")]
    InvalidOccupant { kind: OccupantKind, zone_id: ZoneId },

    #[error(transparent)]
    Area(#[from] AreaError),
}

/// A set of disjoint areas covering every registered zone of kind `Z`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZonePartition<Z> {
    /// Ordered by smallest zone id.
    areas: Vec<Area<Z>>,
    /// Zone id -> index into `areas`.
    index: HashMap<ZoneId, usize>,
}

impl<Z> Default for ZonePartition<Z> {
    fn default() -> Self {
        ZonePartition { areas: Vec::new(), index: HashMap::new() }
    }
}

impl<Z: AreaZone> ZonePartition<Z> {
    pub fn new(mut areas: Vec<Area<Z>>) -> Self {
        areas.sort_by_key(|a| a.zone_ids().next());
        let mut index = HashMap::new();
        for (i, area) in areas.iter().enumerate() {
            for id in area.zone_ids() {
                index.insert(id, i);
            }
        }
        ZonePartition { areas, index }
    }

    pub fn areas(&self) -> &[Area<Z>] {
        &self.areas
    }

    pub fn area_containing(&self, zone_id: ZoneId) -> Result<&Area<Z>, PartitionError> {
        self.index
            .get(&zone_id)
            .map(|&i| &self.areas[i])
            .ok_or(PartitionError::ZoneNotRegistered(zone_id))
    }
}

/// Mutable accumulator producing a new `ZonePartition`.
///
/// Every registered zone maps to a slot; slots form a union-find forest
/// whose roots hold the current area. Non-root slots keep stale areas that
/// `build()` ignores.
#[derive(Debug)]
pub struct ZonePartitionBuilder<Z> {
    areas: Vec<Area<Z>>,
    parent: Vec<usize>,
    slot_of: HashMap<ZoneId, usize>,
}

impl<Z: AreaZone> ZonePartitionBuilder<Z> {
    /// Starts from the areas of an existing partition.
    pub fn new(partition: &ZonePartition<Z>) -> Self {
        let areas = partition.areas.clone();
        let parent = (0..areas.len()).collect();
        let slot_of = partition.index.clone();
        ZonePartitionBuilder { areas, parent, slot_of }
    }

    fn find(&mut self, mut slot: usize) -> usize {
        let mut root = slot;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        while self.parent[slot] != root {
            let next = self.parent[slot];
            self.parent[slot] = root;
            slot = next;
        }
        root
    }

    fn root_of(&mut self, zone_id: ZoneId) -> Result<usize, PartitionError> {
        let slot = *self
            .slot_of
            .get(&zone_id)
            .ok_or(PartitionError::ZoneNotRegistered(zone_id))?;
        Ok(self.find(slot))
    }

    /// Registers `zone` as a new unoccupied area on its own.
    pub fn add_singleton(&mut self, zone: Z, open_connections: u32) -> Result<(), PartitionError> {
        let id = zone.id();
        if self.slot_of.contains_key(&id) {
            return Err(PartitionError::ZoneAlreadyRegistered(id));
        }
        let slot = self.areas.len();
        self.areas.push(Area::singleton(zone, open_connections));
        self.parent.push(slot);
        self.slot_of.insert(id, slot);
        Ok(())
    }

    /// Merges the areas containing the two zones, which may be the same.
    pub fn union(&mut self, a: ZoneId, b: ZoneId) -> Result<(), PartitionError> {
        let ra = self.root_of(a)?;
        let rb = self.root_of(b)?;
        let merged = self.areas[ra].connect_to(&self.areas[rb])?;
        trace!(
            "union {} ~ {}: {} zones, {} open",
            a,
            b,
            merged.zones().len(),
            merged.open_connections()
        );
        if ra == rb {
            self.areas[ra] = merged;
            return Ok(());
        }
        let (root, child) = if self.areas[ra].zones().len() >= self.areas[rb].zones().len() {
            (ra, rb)
        } else {
            (rb, ra)
        };
        self.parent[child] = root;
        self.areas[root] = merged;
        Ok(())
    }

    pub fn add_initial_occupant(
        &mut self,
        zone_id: ZoneId,
        color: PlayerColor,
    ) -> Result<(), PartitionError> {
        let root = self.root_of(zone_id)?;
        self.areas[root] = self.areas[root].with_initial_occupant(color)?;
        Ok(())
    }

    pub fn remove_occupant(
        &mut self,
        zone_id: ZoneId,
        color: PlayerColor,
    ) -> Result<(), PartitionError> {
        let root = self.root_of(zone_id)?;
        self.areas[root] = self.areas[root].without_occupant(color)?;
        Ok(())
    }

    /// Removes every occupant from `area`, which must be a current area of
    /// this partition.
    pub fn remove_all_occupants_of(&mut self, area: &Area<Z>) -> Result<(), PartitionError> {
        let first = area.zone_ids().next().ok_or(PartitionError::AreaNotPresent(0))?;
        let root = self.root_of(first)?;
        if !self.areas[root].zone_ids().eq(area.zone_ids()) {
            return Err(PartitionError::AreaNotPresent(first));
        }
        self.areas[root] = self.areas[root].without_occupants();
        Ok(())
    }

    pub fn build(mut self) -> ZonePartition<Z> {
        let roots: Vec<usize> = (0..self.parent.len()).filter(|&s| self.find(s) == s).collect();
        let mut areas: Vec<Option<Area<Z>>> = self.areas.into_iter().map(Some).collect();
        ZonePartition::new(roots.into_iter().filter_map(|r| areas[r].take()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::zone::{Forest, ForestKind};
    use PlayerColor::{Blue, Red};

    fn plain(id: ZoneId) -> Forest {
        Forest { id, kind: ForestKind::Plain }
    }

    fn builder_with(zones: &[(ZoneId, u32)]) -> ZonePartitionBuilder<Forest> {
        let mut builder = ZonePartitionBuilder::new(&ZonePartition::default());
        for &(id, open) in zones {
            builder.add_singleton(plain(id), open).unwrap();
        }
        builder
    }

    #[test]
    fn empty_partition_lookup_fails() {
        let partition: ZonePartition<Forest> = ZonePartition::default();
        assert_eq!(partition.area_containing(10), Err(PartitionError::ZoneNotRegistered(10)));
    }

    #[test]
    fn singletons_are_found() {
        let partition = builder_with(&[(10, 2), (20, 1)]).build();
        assert_eq!(partition.areas().len(), 2);
        assert_eq!(partition.area_containing(10).unwrap().open_connections(), 2);
        assert_eq!(partition.area_containing(20).unwrap().open_connections(), 1);
    }

    #[test]
    fn duplicate_singleton_is_rejected() {
        let mut builder = builder_with(&[(10, 2)]);
        assert_eq!(
            builder.add_singleton(plain(10), 1),
            Err(PartitionError::ZoneAlreadyRegistered(10))
        );
    }

    #[test]
    fn union_merges_and_resolves_connections() {
        let mut builder = builder_with(&[(10, 2), (20, 3), (30, 1)]);
        builder.union(10, 20).unwrap();
        builder.union(30, 20).unwrap();
        let partition = builder.build();
        assert_eq!(partition.areas().len(), 1);
        let area = partition.area_containing(30).unwrap();
        assert_eq!(area.zone_ids().collect::<Vec<_>>(), vec![10, 20, 30]);
        assert_eq!(area.open_connections(), 2);
    }

    #[test]
    fn union_within_one_area_closes_loop() {
        let mut builder = builder_with(&[(10, 2), (20, 2)]);
        builder.union(10, 20).unwrap();
        builder.union(20, 10).unwrap();
        let partition = builder.build();
        assert!(partition.area_containing(10).unwrap().is_closed());
    }

    #[test]
    fn union_with_unknown_zone_fails() {
        let mut builder = builder_with(&[(10, 2)]);
        assert_eq!(builder.union(10, 99), Err(PartitionError::ZoneNotRegistered(99)));
    }

    #[test]
    fn failed_union_keeps_areas() {
        let mut builder = builder_with(&[(10, 1)]);
        assert!(matches!(builder.union(10, 10), Err(PartitionError::Area(_))));
        let partition = builder.build();
        assert_eq!(partition.area_containing(10).unwrap().open_connections(), 1);
    }

    #[test]
    fn occupants_follow_merges() {
        let mut builder = builder_with(&[(10, 1), (20, 1), (30, 2)]);
        builder.add_initial_occupant(10, Red).unwrap();
        builder.add_initial_occupant(20, Blue).unwrap();
        builder.add_initial_occupant(30, Red).unwrap();
        builder.union(10, 30).unwrap();
        builder.union(20, 30).unwrap();
        let partition = builder.build();
        let area = partition.area_containing(20).unwrap();
        assert_eq!(area.occupants(), &[Red, Red, Blue]);
        assert_eq!(area.majority_occupants().into_iter().collect::<Vec<_>>(), vec![Red]);
    }

    #[test]
    fn occupied_area_rejects_initial_occupant() {
        let mut builder = builder_with(&[(10, 1)]);
        builder.add_initial_occupant(10, Red).unwrap();
        assert_eq!(
            builder.add_initial_occupant(10, Blue),
            Err(PartitionError::Area(AreaError::AlreadyOccupied))
        );
    }

    #[test]
    fn remove_occupants() {
        let mut builder = builder_with(&[(10, 1), (20, 3)]);
        builder.add_initial_occupant(10, Red).unwrap();
        builder.add_initial_occupant(20, Blue).unwrap();
        builder.union(10, 20).unwrap();
        builder.remove_occupant(20, Red).unwrap();
        assert_eq!(
            builder.remove_occupant(20, Red),
            Err(PartitionError::Area(AreaError::OccupantNotPresent(Red)))
        );
        let partition = builder.build();
        assert_eq!(partition.area_containing(10).unwrap().occupants(), &[Blue]);

        let area = partition.area_containing(10).unwrap().clone();
        let mut builder = ZonePartitionBuilder::new(&partition);
        builder.remove_all_occupants_of(&area).unwrap();
        assert!(!builder.build().area_containing(20).unwrap().is_occupied());
    }

    #[test]
    fn remove_all_occupants_of_stale_area_fails() {
        let mut builder = builder_with(&[(10, 1), (20, 3)]);
        builder.union(10, 20).unwrap();
        let stale = Area::singleton(plain(10), 1);
        assert_eq!(
            builder.remove_all_occupants_of(&stale),
            Err(PartitionError::AreaNotPresent(10))
        );
    }

    #[test]
    fn rebuilding_preserves_existing_areas() {
        let mut builder = builder_with(&[(10, 2), (20, 2)]);
        builder.union(10, 20).unwrap();
        let first = builder.build();

        let mut builder = ZonePartitionBuilder::new(&first);
        builder.add_singleton(plain(30), 1).unwrap();
        builder.union(30, 10).unwrap();
        let second = builder.build();

        assert_eq!(first.areas().len(), 1);
        assert_eq!(first.area_containing(10).unwrap().open_connections(), 2);
        assert_eq!(second.area_containing(30).unwrap().open_connections(), 1);
    }
}
