//! Connected areas of same-kind zones and the partitions grouping them.

pub mod area;
pub mod partition;
pub mod partitions;

pub use area::{Area, AreaError};
pub use partition::{PartitionError, ZonePartition, ZonePartitionBuilder};
pub use partitions::{ZonePartitions, ZonePartitionsBuilder};
