//! Error types for tile partitioning.

use thiserror::Error;

/// Rejected dataset partitioning metadata.
///
/// Raised while building a partition space, never while resolving tiles.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// Partition count missing, zero, negative or not an integer
    #[error("Unexpected partition count. Expected a positive integer. Got {0:?}")]
    InvalidPartitionCount(String),

    /// A required field was not provided
    #[error("Missing {0}")]
    MissingField(&'static str),

    /// A field could not be parsed as an integer
    #[error("Invalid {field}: expected an integer, got {value:?}")]
    InvalidInteger { field: &'static str, value: String },

    /// Zoom bounds out of order, negative, or a step below 1
    #[error("Invalid zoom range received. Got (zmin: {zmin}, zmax: {zmax}, zstep: {zstep})")]
    InvalidZoomRange { zmin: i64, zmax: i64, zstep: i64 },

    /// Maximum zoom deeper than tile coordinates can address
    #[error("Maximum zoom {zmax} exceeds the supported maximum of {max}")]
    ZoomOutOfRange { zmax: i64, max: u8 },

    /// Bounding box out of order or negative
    #[error("Invalid bbox received. Got (xmin: {xmin}, xmax: {xmax}, ymin: {ymin}, ymax: {ymax})")]
    InvalidBbox {
        xmin: i64,
        xmax: i64,
        ymin: i64,
        ymax: i64,
    },

    /// Descriptor string does not have the expected shape
    #[error("Malformed partition descriptor: {0}")]
    MalformedDescriptor(String),
}

/// Error type shared by the tileshard crates.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid partitioning metadata
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Curve requested over an empty or oversized rectangle
    #[error("Invalid Gilbert rectangle. Got: width ({width}), height ({height})")]
    InvalidRectangle { width: u64, height: u64 },

    /// Point lies outside the rectangle it is ranked in
    #[error("Out of bounds: {0}")]
    OutOfBounds(String),

    /// A computed value broke an internal invariant. Indicates a bug.
    #[error("Internal inconsistency: {0}")]
    Inconsistent(String),

    /// Invalid data error
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
