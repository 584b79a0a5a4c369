//! Validated partitioning metadata of a dataset.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tileshard_core::{ConfigurationError, TileBbox, ZoomRange};
use tracing::debug;

/// Partition budget, accepted zoom levels and bounding box of a dataset.
///
/// Immutable once built. Build it once per dataset descriptor and share it
/// (it is `Send + Sync`) for every tile lookup against that dataset.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "SpaceFields", into = "SpaceFields")]
pub struct PartitionSpace {
    partition_count: u32,
    zoom: ZoomRange,
    bbox: TileBbox,
}

impl PartitionSpace {
    /// Create a partition space.
    ///
    /// `bbox` is expressed in tile coordinates at `zoom.zmax()`.
    pub fn new(
        partition_count: u32,
        zoom: ZoomRange,
        bbox: TileBbox,
    ) -> Result<Self, ConfigurationError> {
        if partition_count == 0 {
            return Err(ConfigurationError::InvalidPartitionCount(
                partition_count.to_string(),
            ));
        }
        debug!(
            partition_count,
            zmin = zoom.zmin(),
            zmax = zoom.zmax(),
            zstep = zoom.zstep(),
            ?bbox,
            "partition space created"
        );
        Ok(Self {
            partition_count,
            zoom,
            bbox,
        })
    }

    /// Build a partition space from string-encoded metadata fields.
    pub fn from_raw(raw: &RawPartitionSpace) -> Result<Self, ConfigurationError> {
        let partition_count = match raw.partition_count.as_deref().map(str::trim) {
            Some(value) if !value.is_empty() => value
                .parse::<u32>()
                .ok()
                .filter(|&count| count >= 1)
                .ok_or_else(|| ConfigurationError::InvalidPartitionCount(value.to_string()))?,
            _ => {
                return Err(ConfigurationError::InvalidPartitionCount(
                    "nothing".to_string(),
                ))
            }
        };
        let zoom = ZoomRange::new(
            parse_field("zmin", raw.zmin.as_deref())?,
            parse_field("zmax", raw.zmax.as_deref())?,
            parse_field("zstep", raw.zstep.as_deref())?,
        )?;
        let bbox = TileBbox::new(
            parse_field("xmin", raw.xmin.as_deref())?,
            parse_field("xmax", raw.xmax.as_deref())?,
            parse_field("ymin", raw.ymin.as_deref())?,
            parse_field("ymax", raw.ymax.as_deref())?,
        )?;
        Self::new(partition_count, zoom, bbox)
    }

    /// Total number of usable partitions, numbered from 1.
    #[must_use]
    #[inline]
    pub const fn partition_count(&self) -> u32 {
        self.partition_count
    }

    #[must_use]
    #[inline]
    pub const fn zoom(&self) -> ZoomRange {
        self.zoom
    }

    /// Bounding box at the maximum zoom.
    #[must_use]
    #[inline]
    pub const fn bbox(&self) -> TileBbox {
        self.bbox
    }

    /// Bounding box as seen at zoom `z` (`z <= zmax`).
    #[must_use]
    #[inline]
    pub const fn bbox_at(&self, z: u8) -> TileBbox {
        self.bbox.scaled_down(self.zoom.zmax().saturating_sub(z) as u32)
    }
}

fn parse_field(field: &'static str, value: Option<&str>) -> Result<i64, ConfigurationError> {
    let value = value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(ConfigurationError::MissingField(field))?;
    value
        .parse()
        .map_err(|_| ConfigurationError::InvalidInteger {
            field,
            value: value.to_string(),
        })
}

/// Partitioning metadata as it arrives from a dataset descriptor, before
/// any parsing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawPartitionSpace {
    pub partition_count: Option<String>,
    pub zmin: Option<String>,
    pub zmax: Option<String>,
    pub zstep: Option<String>,
    pub xmin: Option<String>,
    pub xmax: Option<String>,
    pub ymin: Option<String>,
    pub ymax: Option<String>,
}

/// Descriptor field count: `zmin_zmax_xmin_xmax_ymin_ymax_partitions_zstep`.
const DESCRIPTOR_FIELDS: usize = 8;

impl FromStr for RawPartitionSpace {
    type Err = ConfigurationError;

    /// Split a `zmin_zmax_xmin_xmax_ymin_ymax_partitions_zstep` descriptor.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.trim().split('_').collect();
        let &[zmin, zmax, xmin, xmax, ymin, ymax, partitions, zstep] = fields.as_slice() else {
            return Err(ConfigurationError::MalformedDescriptor(format!(
                "expected {DESCRIPTOR_FIELDS} '_'-separated fields, got {} in {s:?}",
                fields.len()
            )));
        };
        let owned = |value: &str| Some(value.to_string());
        Ok(Self {
            partition_count: owned(partitions),
            zmin: owned(zmin),
            zmax: owned(zmax),
            zstep: owned(zstep),
            xmin: owned(xmin),
            xmax: owned(xmax),
            ymin: owned(ymin),
            ymax: owned(ymax),
        })
    }
}

impl FromStr for PartitionSpace {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_raw(&s.parse()?)
    }
}

impl fmt::Display for PartitionSpace {
    /// Formats as a `zmin_zmax_xmin_xmax_ymin_ymax_partitions_zstep` descriptor.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}_{}_{}_{}_{}_{}_{}",
            self.zoom.zmin(),
            self.zoom.zmax(),
            self.bbox.xmin(),
            self.bbox.xmax(),
            self.bbox.ymin(),
            self.bbox.ymax(),
            self.partition_count,
            self.zoom.zstep()
        )
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct SpaceFields {
    partition_count: i64,
    zoom: ZoomRange,
    bbox: TileBbox,
}

impl TryFrom<SpaceFields> for PartitionSpace {
    type Error = ConfigurationError;

    fn try_from(fields: SpaceFields) -> Result<Self, Self::Error> {
        let count = u32::try_from(fields.partition_count).map_err(|_| {
            ConfigurationError::InvalidPartitionCount(fields.partition_count.to_string())
        })?;
        Self::new(count, fields.zoom, fields.bbox)
    }
}

impl From<PartitionSpace> for SpaceFields {
    fn from(space: PartitionSpace) -> Self {
        Self {
            partition_count: space.partition_count.into(),
            zoom: space.zoom,
            bbox: space.bbox,
        }
    }
}
