//! Core types for the tileshard partitioning workspace.
//!
//! This crate provides the foundational types used by the other crates:
//! - Tile coordinates and tile-space bounding boxes
//! - Zoom ranges with a step between accepted levels
//! - Common error types

pub mod coords;
pub mod error;
pub mod zoom;

pub use coords::{TileBbox, TileCoord};
pub use error::{ConfigurationError, Error, Result};
pub use zoom::ZoomRange;

/// Identifier of a storage partition.
///
/// Partition 0 is reserved for tiles outside the partitioned coverage.
pub type PartitionId = u32;

/// Workspace-wide constants
pub mod constants {
    use crate::PartitionId;

    /// Partition returned for tiles outside the zoom range or bounding box
    pub const PARTITION_UNPARTITIONED: PartitionId = 0;
    /// Highest zoom level whose tile coordinates fit in a `u32`
    pub const MAX_ZOOM: u8 = 32;
}
