//! Tile to partition resolution.

use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use rayon::prelude::*;
use tileshard_core::constants::PARTITION_UNPARTITIONED;
use tileshard_core::{Error, PartitionId, Result, TileCoord};
use tileshard_curve::GilbertRect;
use tracing::{error, trace, trace_span};

use crate::space::PartitionSpace;

/// Partition of `tile` in `space`. See [`PartitionSpace::partition`].
pub fn get_partition(space: &PartitionSpace, tile: TileCoord) -> Result<PartitionId> {
    space.partition(tile)
}

impl PartitionSpace {
    /// Partition holding `tile`, or [`PARTITION_UNPARTITIONED`] when the tile
    /// lies outside the zoom range or the bounding box.
    ///
    /// The tile's zoom gets its range of partitions from the allocator. The
    /// tile is then ranked on a Gilbert curve over the bounding box at that
    /// zoom, and the curve is cut into equal runs, one per partition.
    ///
    /// An `Err` is a defect in the curve, never a property of the input.
    pub fn partition(&self, tile: TileCoord) -> Result<PartitionId> {
        let _span = trace_span!("partition", %tile).entered();

        if !self.zoom().contains(tile.z) {
            return Ok(PARTITION_UNPARTITIONED);
        }
        let bbox = self.bbox_at(tile.z);
        if !bbox.contains(tile.x, tile.y) {
            return Ok(PARTITION_UNPARTITIONED);
        }

        let range = self.zoom_partitions(tile.z);
        if range.min == range.max {
            return Ok(range.min);
        }

        let rect = GilbertRect::new(bbox.width(), bbox.height())?;
        let x = u64::from(tile.x - bbox.xmin());
        let y = u64::from(tile.y - bbox.ymin());
        let rank = rect.rank(x, y)?;
        trace!(rank, width = rect.width(), height = rect.height(), "gilbert rank");

        let area = rect.area();
        if u128::from(rank) >= area {
            error!(%tile, rank, %area, "gilbert rank outside rectangle");
            return Err(Error::Inconsistent(format!(
                "unexpected gilbert position {rank} for tile {tile} => {x}/{y} in {}x{}",
                rect.width(),
                rect.height()
            )));
        }

        let usable = u128::from(range.max - range.min + 1);
        let offset = usable * u128::from(rank) / area;
        // offset < usable, which fits a partition id.
        Ok(range.min + offset as PartitionId)
    }

    /// Resolve a batch of tiles in parallel, keeping input order.
    pub fn partitions(&self, tiles: &[TileCoord]) -> Result<Vec<PartitionId>> {
        tiles.par_iter().map(|&tile| self.partition(tile)).collect()
    }

    /// Distinct partitions touched by the tiles `xs x ys` at zoom `z`, in
    /// ascending order.
    ///
    /// Tiles outside the coverage contribute nothing, so the result never
    /// contains [`PARTITION_UNPARTITIONED`].
    pub fn partitions_covering(
        &self,
        z: u8,
        xs: RangeInclusive<u32>,
        ys: RangeInclusive<u32>,
    ) -> Result<Vec<PartitionId>> {
        if !self.zoom().is_reachable(z) {
            return Ok(Vec::new());
        }
        let bbox = self.bbox_at(z);
        let x0 = (*xs.start()).max(bbox.xmin());
        let x1 = (*xs.end()).min(bbox.xmax());
        let y0 = (*ys.start()).max(bbox.ymin());
        let y1 = (*ys.end()).min(bbox.ymax());
        if x0 > x1 || y0 > y1 {
            return Ok(Vec::new());
        }

        let touched = (y0..=y1)
            .into_par_iter()
            .map(|y| {
                (x0..=x1)
                    .map(|x| self.partition(TileCoord::new(z, x, y)))
                    .collect::<Result<BTreeSet<_>>>()
            })
            .try_reduce(BTreeSet::new, |mut acc, row| {
                acc.extend(row);
                Ok(acc)
            })?;
        Ok(touched
            .into_iter()
            .filter(|&p| p != PARTITION_UNPARTITIONED)
            .collect())
    }
}
