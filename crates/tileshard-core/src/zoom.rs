//! Accepted zoom levels of a partitioned dataset.

use serde::{Deserialize, Serialize};

use crate::constants::MAX_ZOOM;
use crate::error::ConfigurationError;

/// Inclusive zoom range `[zmin, zmax]` where only every `zstep`-th level,
/// counted from `zmin`, carries data.
///
/// Only obtainable through [`ZoomRange::new`] or deserialization, both of
/// which validate:
///
/// ```compile_fail
/// let zoom = tileshard_core::ZoomRange { zmin: 0, zmax: 12, zstep: 0 };
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ZoomFields", into = "ZoomFields")]
pub struct ZoomRange {
    zmin: u8,
    zmax: u8,
    zstep: u8,
}

impl ZoomRange {
    /// Validate raw zoom bounds.
    pub fn new(zmin: i64, zmax: i64, zstep: i64) -> Result<Self, ConfigurationError> {
        if zmin > zmax || zmin < 0 || zstep < 1 {
            return Err(ConfigurationError::InvalidZoomRange { zmin, zmax, zstep });
        }
        if zmax > i64::from(MAX_ZOOM) {
            return Err(ConfigurationError::ZoomOutOfRange {
                zmax,
                max: MAX_ZOOM,
            });
        }
        // zmin and zmax fit after the checks above; oversized steps saturate
        // since any step past zmax - zmin only reaches zmin.
        Ok(Self {
            zmin: zmin as u8,
            zmax: zmax as u8,
            zstep: u8::try_from(zstep).unwrap_or(u8::MAX),
        })
    }

    #[must_use]
    #[inline]
    pub const fn zmin(self) -> u8 {
        self.zmin
    }

    #[must_use]
    #[inline]
    pub const fn zmax(self) -> u8 {
        self.zmax
    }

    /// Distance between reachable levels, at least 1
    #[must_use]
    #[inline]
    pub const fn zstep(self) -> u8 {
        self.zstep
    }

    /// Check if `z` lies within `[zmin, zmax]`
    #[must_use]
    #[inline]
    pub const fn contains(self, z: u8) -> bool {
        z >= self.zmin && z <= self.zmax
    }

    /// Check if `z` is in range and a whole number of steps above `zmin`
    #[must_use]
    #[inline]
    pub const fn is_reachable(self, z: u8) -> bool {
        self.contains(z) && (z - self.zmin) % self.zstep == 0
    }

    /// Highest reachable level, counted from `zmin`.
    #[must_use]
    #[inline]
    pub const fn span(self) -> u8 {
        let span = self.zmax - self.zmin;
        span - span % self.zstep
    }

    /// Reachable zoom levels in ascending order.
    #[must_use]
    pub fn levels(self) -> impl Iterator<Item = u8> {
        (self.zmin..=self.zmax).step_by(usize::from(self.zstep))
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
struct ZoomFields {
    zmin: i64,
    zmax: i64,
    zstep: i64,
}

impl TryFrom<ZoomFields> for ZoomRange {
    type Error = ConfigurationError;

    fn try_from(f: ZoomFields) -> Result<Self, Self::Error> {
        Self::new(f.zmin, f.zmax, f.zstep)
    }
}

impl From<ZoomRange> for ZoomFields {
    fn from(z: ZoomRange) -> Self {
        Self {
            zmin: z.zmin.into(),
            zmax: z.zmax.into(),
            zstep: z.zstep.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_ranges() {
        assert!(ZoomRange::new(0, 12, 1).is_ok());
        assert!(ZoomRange::new(5, 5, 1).is_ok());
        assert!(matches!(
            ZoomRange::new(6, 5, 1),
            Err(ConfigurationError::InvalidZoomRange { .. })
        ));
        assert!(ZoomRange::new(-1, 5, 1).is_err());
        assert!(ZoomRange::new(0, 5, 0).is_err());
        assert!(ZoomRange::new(0, 5, -2).is_err());
        assert!(matches!(
            ZoomRange::new(0, 33, 1),
            Err(ConfigurationError::ZoomOutOfRange { zmax: 33, .. })
        ));
    }

    #[test]
    fn reachable_levels_follow_step() {
        let zoom = ZoomRange::new(3, 14, 3).unwrap();
        assert!(zoom.is_reachable(3));
        assert!(zoom.is_reachable(12));
        assert!(!zoom.is_reachable(4));
        assert!(!zoom.is_reachable(14));
        assert!(!zoom.is_reachable(15));
        assert!(!zoom.is_reachable(0));
        assert_eq!(zoom.levels().collect::<Vec<_>>(), vec![3, 6, 9, 12]);
        assert_eq!(zoom.span(), 9);
    }

    #[test]
    fn huge_step_only_reaches_zmin() {
        let zoom = ZoomRange::new(2, 10, 1000).unwrap();
        assert_eq!(zoom.levels().collect::<Vec<_>>(), vec![2]);
        assert_eq!(zoom.span(), 0);
    }
}
