//! Point values awarded for closed areas, meadows and special powers.

/// Preconditions violated by a points computation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PointsError {
    #[error("a closed area spans at least two tiles, got {0}")]
    TooFewTiles(u32),

    #[error("a lake bonus needs at least one lake")]
    NoLakes,
}

fn require_tiles(tile_count: u32) -> Result<(), PointsError> {
    if tile_count > 1 {
        Ok(())
    } else {
        Err(PointsError::TooFewTiles(tile_count))
    }
}

fn require_lakes(lake_count: u32) -> Result<(), PointsError> {
    if lake_count > 0 {
        Ok(())
    } else {
        Err(PointsError::NoLakes)
    }
}

/// Points for a closed forest: 2 per tile and 3 per mushroom group.
pub fn for_closed_forest(tile_count: u32, mushroom_group_count: u32) -> Result<u32, PointsError> {
    require_tiles(tile_count)?;
    Ok(2 * tile_count + 3 * mushroom_group_count)
}

/// Points for a closed river: 1 per tile and 1 per fish.
pub fn for_closed_river(tile_count: u32, fish_count: u32) -> Result<u32, PointsError> {
    require_tiles(tile_count)?;
    Ok(tile_count + fish_count)
}

/// Points for the animals of a meadow. Tigers are worth nothing.
pub fn for_meadow(mammoth_count: u32, aurochs_count: u32, deer_count: u32) -> u32 {
    3 * mammoth_count + 2 * aurochs_count + deer_count
}

pub fn for_river_system(fish_count: u32) -> u32 {
    fish_count
}

pub fn for_logboat(lake_count: u32) -> Result<u32, PointsError> {
    require_lakes(lake_count)?;
    Ok(2 * lake_count)
}

pub fn for_raft(lake_count: u32) -> Result<u32, PointsError> {
    require_lakes(lake_count)?;
    Ok(lake_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_forest() {
        assert_eq!(for_closed_forest(3, 1), Ok(9));
        assert_eq!(for_closed_forest(2, 0), Ok(4));
        assert_eq!(for_closed_forest(1, 0), Err(PointsError::TooFewTiles(1)));
    }

    #[test]
    fn closed_river() {
        assert_eq!(for_closed_river(2, 3), Ok(5));
        assert_eq!(for_closed_river(0, 3), Err(PointsError::TooFewTiles(0)));
    }

    #[test]
    fn meadow_animals() {
        assert_eq!(for_meadow(1, 1, 1), 6);
        assert_eq!(for_meadow(0, 0, 0), 0);
        assert_eq!(for_meadow(2, 0, 3), 9);
    }

    #[test]
    fn lake_bonuses() {
        assert_eq!(for_river_system(7), 7);
        assert_eq!(for_logboat(2), Ok(4));
        assert_eq!(for_raft(3), Ok(3));
        assert_eq!(for_logboat(0), Err(PointsError::NoLakes));
        assert_eq!(for_raft(0), Err(PointsError::NoLakes));
    }
}
