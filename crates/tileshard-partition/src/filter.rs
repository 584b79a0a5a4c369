//! Spatial filter predicates for partitioned tileset queries.

use std::fmt;

use tileshard_core::{Error, PartitionId, Result, TileCoord};

use crate::space::PartitionSpace;

/// Column holding the partition number in partitioned tilesets.
pub const DEFAULT_PARTITION_COLUMN: &str = "carto_partition";

/// `WHERE` predicate selecting one tile of a partitioned tileset.
///
/// Renders as `z=<z> AND y=<y> AND x=<x> AND <column>=<partition>`, so the
/// storage engine can prune every other partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpatialFilter {
    pub tile: TileCoord,
    pub partition: PartitionId,
    column: String,
}

impl SpatialFilter {
    /// Create a filter for an already resolved partition.
    #[must_use]
    pub fn new(tile: TileCoord, partition: PartitionId) -> Self {
        Self {
            tile,
            partition,
            column: DEFAULT_PARTITION_COLUMN.to_string(),
        }
    }

    /// Resolve `tile` in `space` and build its filter.
    pub fn resolve(space: &PartitionSpace, tile: TileCoord) -> Result<Self> {
        Ok(Self::new(tile, space.partition(tile)?))
    }

    /// Use a different partition column.
    ///
    /// The name is spliced into query text, so it must be a plain identifier.
    pub fn with_column(mut self, column: impl Into<String>) -> Result<Self> {
        let column = column.into();
        let mut chars = column.chars();
        let valid = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid {
            return Err(Error::InvalidData(format!(
                "partition column {column:?} is not a plain identifier"
            )));
        }
        self.column = column;
        Ok(self)
    }

    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }
}

impl fmt::Display for SpatialFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "z={} AND y={} AND x={} AND {}={}",
            self.tile.z, self.tile.y, self.tile.x, self.column, self.partition
        )
    }
}
