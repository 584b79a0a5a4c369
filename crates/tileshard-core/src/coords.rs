//! Tile coordinate systems.
//!
//! Tiles follow the usual quad-tree convention: origin at the top-left,
//! x increasing east, y increasing south, `2^z` tiles per axis at zoom `z`.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, Error};

/// Address of a single tile in the pyramid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

impl TileCoord {
    /// Create a new tile coordinate
    #[must_use]
    #[inline]
    pub const fn new(z: u8, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

impl FromStr for TileCoord {
    type Err = Error;

    /// Parse a `z/x/y` tile address.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split('/');
        let (Some(z), Some(x), Some(y), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(Error::InvalidData(format!(
                "expected a z/x/y tile, got {s:?}"
            )));
        };
        let bad = |_: ParseIntError| Error::InvalidData(format!("expected a z/x/y tile, got {s:?}"));
        Ok(Self::new(
            z.parse().map_err(bad)?,
            x.parse().map_err(bad)?,
            y.parse().map_err(bad)?,
        ))
    }
}

/// Inclusive bounding box in tile coordinates.
///
/// A partition space stores its box at the maximum zoom; coarser zooms see
/// the box shifted down by the zoom difference.
///
/// Only obtainable through [`TileBbox::new`] or deserialization, both of
/// which validate:
///
/// ```compile_fail
/// let bbox = tileshard_core::TileBbox { xmin: 4094, xmax: 9, ymin: 868, ymax: 2216 };
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "BboxFields", into = "BboxFields")]
pub struct TileBbox {
    xmin: u32,
    xmax: u32,
    ymin: u32,
    ymax: u32,
}

impl TileBbox {
    /// Validate raw bounds into a bounding box.
    ///
    /// Bounds must be non-negative, ordered, and fit a tile coordinate.
    pub fn new(xmin: i64, xmax: i64, ymin: i64, ymax: i64) -> Result<Self, ConfigurationError> {
        let invalid = ConfigurationError::InvalidBbox {
            xmin,
            xmax,
            ymin,
            ymax,
        };
        if xmin > xmax || xmin < 0 || ymin > ymax || ymin < 0 {
            return Err(invalid);
        }
        match (
            u32::try_from(xmin),
            u32::try_from(xmax),
            u32::try_from(ymin),
            u32::try_from(ymax),
        ) {
            (Ok(xmin), Ok(xmax), Ok(ymin), Ok(ymax)) => Ok(Self {
                xmin,
                xmax,
                ymin,
                ymax,
            }),
            _ => Err(invalid),
        }
    }

    #[must_use]
    #[inline]
    pub const fn xmin(self) -> u32 {
        self.xmin
    }

    #[must_use]
    #[inline]
    pub const fn xmax(self) -> u32 {
        self.xmax
    }

    #[must_use]
    #[inline]
    pub const fn ymin(self) -> u32 {
        self.ymin
    }

    #[must_use]
    #[inline]
    pub const fn ymax(self) -> u32 {
        self.ymax
    }

    /// Project the box `levels` zooms up the pyramid.
    #[must_use]
    #[inline]
    pub const fn scaled_down(self, levels: u32) -> Self {
        Self {
            xmin: shr_or_zero(self.xmin, levels),
            xmax: shr_or_zero(self.xmax, levels),
            ymin: shr_or_zero(self.ymin, levels),
            ymax: shr_or_zero(self.ymax, levels),
        }
    }

    /// Check if a tile column/row lies inside the box
    #[must_use]
    #[inline]
    pub const fn contains(self, x: u32, y: u32) -> bool {
        x >= self.xmin && x <= self.xmax && y >= self.ymin && y <= self.ymax
    }

    /// Number of tile columns covered
    #[must_use]
    #[inline]
    pub const fn width(self) -> u64 {
        (self.xmax - self.xmin) as u64 + 1
    }

    /// Number of tile rows covered
    #[must_use]
    #[inline]
    pub const fn height(self) -> u64 {
        (self.ymax - self.ymin) as u64 + 1
    }

    /// Number of tiles covered
    #[must_use]
    #[inline]
    pub const fn area(self) -> u128 {
        self.width() as u128 * self.height() as u128
    }
}

#[inline]
const fn shr_or_zero(value: u32, levels: u32) -> u32 {
    match value.checked_shr(levels) {
        Some(shifted) => shifted,
        None => 0,
    }
}

/// Serialized form of [`TileBbox`], wide enough to carry invalid input to validation.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
struct BboxFields {
    xmin: i64,
    xmax: i64,
    ymin: i64,
    ymax: i64,
}

impl TryFrom<BboxFields> for TileBbox {
    type Error = ConfigurationError;

    fn try_from(f: BboxFields) -> Result<Self, Self::Error> {
        Self::new(f.xmin, f.xmax, f.ymin, f.ymax)
    }
}

impl From<TileBbox> for BboxFields {
    fn from(b: TileBbox) -> Self {
        Self {
            xmin: b.xmin.into(),
            xmax: b.xmax.into(),
            ymin: b.ymin.into(),
            ymax: b.ymax.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_display_parse_roundtrip() {
        let tile = TileCoord::new(12, 1006, 1539);
        assert_eq!(tile.to_string(), "12/1006/1539");
        assert_eq!("12/1006/1539".parse::<TileCoord>().unwrap(), tile);
    }

    #[test]
    fn tile_parse_rejects_garbage() {
        assert!("12/1006".parse::<TileCoord>().is_err());
        assert!("12/1006/1539/4".parse::<TileCoord>().is_err());
        assert!("a/b/c".parse::<TileCoord>().is_err());
        assert!("12/-1/3".parse::<TileCoord>().is_err());
    }

    #[test]
    fn bbox_validation() {
        assert!(TileBbox::new(9, 4094, 868, 2216).is_ok());
        assert!(TileBbox::new(0, 0, 0, 0).is_ok());
        assert!(matches!(
            TileBbox::new(10, 9, 0, 0),
            Err(ConfigurationError::InvalidBbox { .. })
        ));
        assert!(TileBbox::new(-1, 9, 0, 0).is_err());
        assert!(TileBbox::new(0, 9, 5, 4).is_err());
        assert!(TileBbox::new(0, 9, -3, 4).is_err());
        assert!(TileBbox::new(0, i64::from(u32::MAX) + 1, 0, 0).is_err());
    }

    #[test]
    fn bbox_scaled_down() {
        let bbox = TileBbox::new(9, 4094, 868, 2216).unwrap();
        let z11 = bbox.scaled_down(1);
        assert_eq!(z11, TileBbox::new(4, 2047, 434, 1108).unwrap());
        let z0 = bbox.scaled_down(12);
        assert_eq!(z0, TileBbox::new(0, 0, 0, 0).unwrap());
        assert_eq!(bbox.scaled_down(40), z0);
        assert_eq!(bbox.scaled_down(0), bbox);
    }

    #[test]
    fn bbox_extent() {
        let bbox = TileBbox::new(2, 6, 10, 12).unwrap();
        assert_eq!(bbox.width(), 5);
        assert_eq!(bbox.height(), 3);
        assert_eq!(bbox.area(), 15);
        assert!(bbox.contains(2, 10));
        assert!(bbox.contains(6, 12));
        assert!(!bbox.contains(1, 10));
        assert!(!bbox.contains(6, 13));
    }

    #[test]
    fn full_range_bbox_area_does_not_overflow() {
        let max = i64::from(u32::MAX);
        let bbox = TileBbox::new(0, max, 0, max).unwrap();
        assert_eq!(bbox.area(), 1u128 << 64);
    }
}
