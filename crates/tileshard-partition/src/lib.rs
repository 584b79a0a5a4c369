//! Partition assignment for tiled geospatial datasets.
//!
//! A dataset is sharded into a fixed number of partitions. Partitions are
//! spread across zoom levels so that deeper zooms, which hold most tiles,
//! get most of them. Within a zoom level, tiles are ordered along a Gilbert
//! curve over the dataset's bounding box and the curve is cut into
//! contiguous runs, one per partition, so neighbouring tiles share
//! partitions.
//!
//! ```
//! use tileshard_partition::PartitionSpace;
//! use tileshard_core::TileCoord;
//!
//! let space: PartitionSpace = "0_12_9_4094_868_2216_3999_1".parse().unwrap();
//! assert_eq!(space.partition(TileCoord::new(12, 1006, 1539)).unwrap(), 1563);
//! ```

pub mod allocator;
pub mod cache;
pub mod filter;
pub mod resolver;
pub mod space;

pub use allocator::{allocate, ZoomPartitionRange};
pub use cache::{CacheConfig, CacheStats, CachedResolver};
pub use filter::{SpatialFilter, DEFAULT_PARTITION_COLUMN};
pub use resolver::get_partition;
pub use space::{PartitionSpace, RawPartitionSpace};
