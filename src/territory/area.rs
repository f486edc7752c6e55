//! Areas: maximal connected regions of same-kind zones.
//!
//! An `Area` is an immutable snapshot. Every change (merging, adding or
//! removing occupants) produces a new value. Occupants are kept sorted by
//! color so that majority queries are deterministic.

use std::collections::{BTreeMap, BTreeSet};

use crate::board::player::PlayerColor;
use crate::board::zone::{
    Animal, AnimalId, AreaZone, Forest, ForestKind, Meadow, River, SpecialPower, TileId, Water,
    ZoneId,
};

/// Contract violations on area values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AreaError {
    #[error("open connection count would become negative ({0})")]
    InvalidConnections(i64),

    #[error("area is already occupied")]
    AlreadyOccupied,

    #[error("no {0:?} occupant in area")]
    OccupantNotPresent(PlayerColor),
}

/// A connected region of zones of kind `Z`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Area<Z> {
    /// Sorted by zone id, no duplicates.
    zones: Vec<Z>,
    /// Sorted by color; one entry per placed occupant.
    occupants: Vec<PlayerColor>,
    open_connections: u32,
}

impl<Z: AreaZone> Area<Z> {
    /// Builds an area from its zones, which must not be empty.
    pub fn new(
        zones: impl IntoIterator<Item = Z>,
        mut occupants: Vec<PlayerColor>,
        open_connections: u32,
    ) -> Self {
        let mut zones: Vec<Z> = zones.into_iter().collect();
        debug_assert!(!zones.is_empty(), "an area needs at least one zone");
        zones.sort_by_key(|z| z.id());
        zones.dedup_by_key(|z| z.id());
        occupants.sort_unstable();
        Area { zones, occupants, open_connections }
    }

    /// Creates an unoccupied one-zone area.
    pub fn singleton(zone: Z, open_connections: u32) -> Self {
        Area { zones: vec![zone], occupants: Vec::new(), open_connections }
    }

    pub fn zones(&self) -> &[Z] {
        &self.zones
    }

    pub fn zone_ids(&self) -> impl Iterator<Item = ZoneId> + '_ {
        self.zones.iter().map(|z| z.id())
    }

    pub fn contains(&self, zone_id: ZoneId) -> bool {
        self.zones.binary_search_by_key(&zone_id, |z| z.id()).is_ok()
    }

    /// Returns the ids of the tiles this area spreads over.
    pub fn tile_ids(&self) -> BTreeSet<TileId> {
        self.zones.iter().map(|z| z.tile_id()).collect()
    }

    pub fn occupants(&self) -> &[PlayerColor] {
        &self.occupants
    }

    pub fn open_connections(&self) -> u32 {
        self.open_connections
    }

    pub fn is_closed(&self) -> bool {
        self.open_connections == 0
    }

    pub fn is_occupied(&self) -> bool {
        !self.occupants.is_empty()
    }

    /// Returns the colors with the most occupants. An unoccupied area has
    /// no majority and yields the empty set.
    pub fn majority_occupants(&self) -> BTreeSet<PlayerColor> {
        let mut counts: BTreeMap<PlayerColor, u32> = BTreeMap::new();
        for color in &self.occupants {
            *counts.entry(*color).or_default() += 1;
        }
        let max = counts.values().copied().max().unwrap_or(0);
        counts
            .into_iter()
            .filter(|(_, n)| *n == max)
            .map(|(c, _)| c)
            .collect()
    }

    fn same_zones_as(&self, other: &Area<Z>) -> bool {
        self.zones.len() == other.zones.len() && self.zone_ids().eq(other.zone_ids())
    }

    /// Merges this area with `other` across one newly matched edge.
    ///
    /// Each side of the edge resolves one open connection. Connecting an
    /// area to itself closes a loop and resolves two of its own.
    pub fn connect_to(&self, other: &Area<Z>) -> Result<Area<Z>, AreaError> {
        if self.same_zones_as(other) {
            let open = i64::from(self.open_connections) - 2;
            let open = u32::try_from(open).map_err(|_| AreaError::InvalidConnections(open))?;
            return Ok(Area { open_connections: open, ..self.clone() });
        }

        let open = i64::from(self.open_connections) + i64::from(other.open_connections) - 2;
        let open = u32::try_from(open).map_err(|_| AreaError::InvalidConnections(open))?;

        let zones = self.zones.iter().chain(other.zones.iter()).cloned();
        let occupants = self.occupants.iter().chain(other.occupants.iter()).copied().collect();
        Ok(Area::new(zones, occupants, open))
    }

    pub fn with_initial_occupant(&self, color: PlayerColor) -> Result<Area<Z>, AreaError> {
        if self.is_occupied() {
            return Err(AreaError::AlreadyOccupied);
        }
        Ok(Area { occupants: vec![color], ..self.clone() })
    }

    /// Removes one occupant of the given color.
    pub fn without_occupant(&self, color: PlayerColor) -> Result<Area<Z>, AreaError> {
        let idx = self
            .occupants
            .iter()
            .position(|c| *c == color)
            .ok_or(AreaError::OccupantNotPresent(color))?;
        let mut occupants = self.occupants.clone();
        occupants.remove(idx);
        Ok(Area { occupants, ..self.clone() })
    }

    pub fn without_occupants(&self) -> Area<Z> {
        Area { occupants: Vec::new(), ..self.clone() }
    }

    /// Keeps only the zones accepted by `keep`, with the same occupants and
    /// no open connections.
    pub fn restricted_to(&self, keep: impl Fn(&Z) -> bool) -> Area<Z> {
        let zones: Vec<Z> = self.zones.iter().filter(|z| keep(*z)).cloned().collect();
        debug_assert!(!zones.is_empty(), "an area needs at least one zone");
        Area { zones, occupants: self.occupants.clone(), open_connections: 0 }
    }
}

impl Area<Forest> {
    pub fn has_menhir(&self) -> bool {
        self.zones.iter().any(|f| f.kind == ForestKind::WithMenhir)
    }

    pub fn mushroom_group_count(&self) -> u32 {
        self.zones.iter().filter(|f| f.kind == ForestKind::WithMushrooms).count() as u32
    }
}

impl Area<Meadow> {
    /// Returns the animals of the area, minus the cancelled ones.
    pub fn animals(&self, cancelled: &BTreeSet<AnimalId>) -> BTreeSet<Animal> {
        self.zones
            .iter()
            .flat_map(|m| m.animals.iter())
            .filter(|a| !cancelled.contains(&a.id))
            .copied()
            .collect()
    }

    /// Returns the meadow carrying the given power, if any.
    pub fn zone_with_power(&self, power: SpecialPower) -> Option<&Meadow> {
        self.zones.iter().find(|m| m.special_power == Some(power))
    }
}

impl Area<River> {
    /// Returns the fish in the rivers and in the lakes they feed, each lake
    /// counted once however many rivers flow into it.
    pub fn fish_count(&self, lake_fish: impl Fn(ZoneId) -> u32) -> u32 {
        let lakes: BTreeSet<ZoneId> = self.zones.iter().filter_map(|r| r.lake).collect();
        let river_fish: u32 = self.zones.iter().map(|r| r.fish_count).sum();
        river_fish + lakes.into_iter().map(lake_fish).sum::<u32>()
    }
}

impl Area<Water> {
    pub fn fish_count(&self) -> u32 {
        self.zones.iter().map(Water::fish_count).sum()
    }

    pub fn lake_count(&self) -> u32 {
        self.zones.iter().filter(|w| matches!(w, Water::Lake(_))).count() as u32
    }

    pub fn has_lake_with_power(&self, power: SpecialPower) -> bool {
        self.zones
            .iter()
            .any(|w| matches!(w, Water::Lake(l) if l.special_power == Some(power)))
    }
}
