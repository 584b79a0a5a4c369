//! Split of the partition budget across zoom levels.
//!
//! A quad-tree pyramid keeps roughly three quarters of its tiles at the
//! deepest zoom, three quarters of the rest one level up, and so on. The
//! budget `[1, partition_count]` is split the same way: the deepest reachable
//! level owns the top 3/4 of it, the next one 3/4 of what is left below that,
//! down to the shallowest level, which takes whatever remains at the bottom.
//!
//! With a step above 1, every reachable level also absorbs the share of the
//! skipped levels right below it.
//!
//! The arithmetic is done in `f64` in a fixed order. Range starts are rounded
//! to nearest while range ends are floored, which hands shallow zooms an
//! extra partition now and then; stored datasets depend on these exact
//! bounds.

use serde::{Deserialize, Serialize};
use tileshard_core::constants::PARTITION_UNPARTITIONED;
use tileshard_core::{PartitionId, ZoomRange};

use crate::space::PartitionSpace;

/// Inclusive range of partitions reserved for one zoom level.
///
/// Neighbouring zoom levels may share a boundary partition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZoomPartitionRange {
    pub min: PartitionId,
    pub max: PartitionId,
}

impl ZoomPartitionRange {
    /// Range of a zoom level that carries no data
    pub const UNPARTITIONED: Self = Self {
        min: PARTITION_UNPARTITIONED,
        max: PARTITION_UNPARTITIONED,
    };

    #[must_use]
    #[inline]
    pub const fn is_unpartitioned(&self) -> bool {
        self.min == PARTITION_UNPARTITIONED
    }

    /// Number of partitions in the range (0 for the unpartitioned sentinel)
    #[must_use]
    #[inline]
    pub const fn len(&self) -> u32 {
        if self.is_unpartitioned() {
            0
        } else {
            self.max - self.min + 1
        }
    }

    #[must_use]
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    #[inline]
    pub const fn contains(&self, partition: PartitionId) -> bool {
        !self.is_unpartitioned() && partition >= self.min && partition <= self.max
    }
}

/// Partitions reserved for zoom level `z`.
///
/// Returns [`ZoomPartitionRange::UNPARTITIONED`] for zooms outside the range,
/// zooms not reachable from `zmin` in whole steps, or an empty budget.
#[must_use]
pub fn allocate(partition_count: u32, zoom: ZoomRange, z: u8) -> ZoomPartitionRange {
    if partition_count == 0 || !zoom.is_reachable(z) {
        return ZoomPartitionRange::UNPARTITIONED;
    }

    // Levels are renumbered so that zmin is 0 and the top is a whole step.
    let top = i32::from(zoom.span());
    let level = i32::from(z - zoom.zmin());

    if top == 0 || partition_count == 1 {
        return ZoomPartitionRange {
            min: 1,
            max: partition_count,
        };
    }

    let budget = f64::from(partition_count);
    let (start, owed) = if level == 0 {
        (0.0, 4.0 * budget / 4f64.powi(top + 1))
    } else {
        let first = level - i32::from(zoom.zstep()) + 1;
        let owed = (first..=level).fold(0.0, |owed, l| {
            owed + 3.0 * budget / 4f64.powi(top - l + 1)
        });
        (budget / 4f64.powi(top - first + 1), owed)
    };
    let end = (start + owed).floor();
    let start = start.round();

    // Float to int casts saturate; both values lie in [0, partition_count].
    let first = start as u64 + 1;
    let last = (end.max(start) as u64 + 1).min(u64::from(partition_count));
    ZoomPartitionRange {
        min: first as PartitionId,
        max: last as PartitionId,
    }
}

impl PartitionSpace {
    /// Partitions reserved for zoom level `z` in this space.
    #[must_use]
    pub fn zoom_partitions(&self, z: u8) -> ZoomPartitionRange {
        allocate(self.partition_count(), self.zoom(), z)
    }

    /// Partition ranges of every reachable zoom level, shallowest first.
    #[must_use]
    pub fn allocation(&self) -> Vec<(u8, ZoomPartitionRange)> {
        self.zoom()
            .levels()
            .map(|z| (z, self.zoom_partitions(z)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn zoom(zmin: i64, zmax: i64, zstep: i64) -> ZoomRange {
        ZoomRange::new(zmin, zmax, zstep).unwrap()
    }

    fn ranges(count: u32, zoom: ZoomRange) -> Vec<(u32, u32)> {
        zoom.levels()
            .map(|z| {
                let r = allocate(count, zoom, z);
                (r.min, r.max)
            })
            .collect()
    }

    #[test]
    fn known_allocation_4000() {
        assert_eq!(
            ranges(4000, zoom(0, 12, 1)),
            vec![
                (1, 1),
                (1, 1),
                (1, 1),
                (1, 1),
                (1, 1),
                (1, 1),
                (1, 1),
                (2, 4),
                (5, 16),
                (17, 63),
                (64, 251),
                (251, 1001),
                (1001, 4000),
            ]
        );
    }

    #[test]
    fn known_allocation_3999() {
        let got = ranges(3999, zoom(0, 12, 1));
        assert_eq!(got[7..], [(2, 4), (5, 16), (17, 63), (63, 250), (251, 1000), (1001, 3999)]);
    }

    #[test]
    fn offset_zmin_allocation() {
        assert_eq!(
            ranges(64, zoom(4, 10, 1)),
            vec![(1, 1), (1, 1), (1, 1), (1, 2), (2, 5), (5, 17), (17, 64)]
        );
    }

    #[test]
    fn stepped_allocation() {
        let zoom = zoom(3, 14, 3);
        assert_eq!(ranges(100, zoom), vec![(1, 1), (1, 1), (1, 2), (3, 100)]);
        for z in [4, 5, 7, 13, 14] {
            assert_eq!(allocate(100, zoom, z), ZoomPartitionRange::UNPARTITIONED);
        }
    }

    #[test]
    fn out_of_range_is_unpartitioned() {
        let zoom = zoom(2, 10, 1);
        assert!(allocate(50, zoom, 1).is_unpartitioned());
        assert!(allocate(50, zoom, 11).is_unpartitioned());
        assert!(allocate(0, zoom, 5).is_unpartitioned());
        assert_eq!(ZoomPartitionRange::UNPARTITIONED.len(), 0);
    }

    #[test]
    fn single_level_owns_everything() {
        assert_eq!(
            allocate(10, zoom(7, 7, 1), 7),
            ZoomPartitionRange { min: 1, max: 10 }
        );
        // The step truncates the top level back down to zmin.
        assert_eq!(
            allocate(10, zoom(0, 2, 3), 0),
            ZoomPartitionRange { min: 1, max: 10 }
        );
    }

    #[test]
    fn single_partition_budget() {
        let zoom = zoom(0, 12, 1);
        for z in zoom.levels() {
            assert_eq!(allocate(1, zoom, z), ZoomPartitionRange { min: 1, max: 1 });
        }
    }

    #[test]
    fn deeper_zooms_get_more() {
        let zoom = zoom(0, 12, 1);
        let len = |z| allocate(4000, zoom, z).len();
        assert!(len(12) > len(11));
        assert!(len(11) > len(0));
    }

    #[test]
    fn top_level_takes_three_quarters() {
        let zoom = zoom(0, 12, 1);
        let count = 1_000_000;
        let top = allocate(count, zoom, 12);
        let below = allocate(count, zoom, 11);
        assert_relative_eq!(f64::from(top.len()) / f64::from(count), 0.75, epsilon = 1e-3);
        assert_relative_eq!(
            f64::from(below.len()) / f64::from(count),
            0.75 * 0.25,
            epsilon = 1e-3
        );
    }

    #[test]
    fn ranges_cover_budget_without_gaps() {
        for (count, zoom) in [
            (4000, zoom(0, 12, 1)),
            (3999, zoom(0, 12, 1)),
            (64, zoom(4, 10, 1)),
            (100, zoom(3, 14, 3)),
            (7, zoom(0, 20, 2)),
            (123_456, zoom(5, 18, 1)),
        ] {
            let ranges = ranges(count, zoom);
            assert_eq!(ranges.first().map(|r| r.0), Some(1));
            assert_eq!(ranges.last().map(|r| r.1), Some(count));
            for (min, max) in &ranges {
                assert!(min <= max && *max <= count);
            }
            for pair in ranges.windows(2) {
                let ((min_a, max_a), (min_b, max_b)) = (pair[0], pair[1]);
                assert!(min_a <= min_b && max_a <= max_b, "{count}: {pair:?}");
                assert!(min_b <= max_a + 1, "gap between {pair:?}");
            }
        }
    }

    #[test]
    fn allocation_lists_reachable_levels() {
        let space: PartitionSpace = "3_14_0_10_0_10_100_3".parse().unwrap();
        let allocation = space.allocation();
        assert_eq!(
            allocation.iter().map(|(z, _)| *z).collect::<Vec<_>>(),
            vec![3, 6, 9, 12]
        );
        assert_eq!(allocation[3].1, ZoomPartitionRange { min: 3, max: 100 });
    }

    #[test]
    fn range_contains() {
        let range = ZoomPartitionRange { min: 5, max: 16 };
        assert_eq!(range.len(), 12);
        assert!(range.contains(5) && range.contains(16));
        assert!(!range.contains(4) && !range.contains(17));
        assert!(!ZoomPartitionRange::UNPARTITIONED.contains(0));
    }
}
