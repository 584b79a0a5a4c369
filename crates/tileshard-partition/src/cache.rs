//! Memoizing resolver shared between request handlers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use hashbrown::HashMap;
use parking_lot::RwLock;
use tileshard_core::{PartitionId, Result, TileCoord};
use tracing::{debug, trace};

use crate::space::PartitionSpace;

/// Cache configuration.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of memoized tiles. 0 disables memoization.
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { capacity: 4096 }
    }
}

/// Cache hit/miss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Resolves tiles against one partition space, memoizing results.
///
/// Provides thread-safe access via `RwLock`. When full, the cache is
/// cleared rather than evicting single entries.
pub struct CachedResolver {
    space: Arc<PartitionSpace>,
    entries: RwLock<HashMap<TileCoord, PartitionId>>,
    capacity: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CachedResolver {
    /// Create a resolver for the given space.
    #[must_use]
    pub fn new(space: Arc<PartitionSpace>, config: CacheConfig) -> Self {
        Self {
            space,
            entries: RwLock::new(HashMap::with_capacity(config.capacity)),
            capacity: config.capacity,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Create a resolver from a `zmin_zmax_xmin_xmax_ymin_ymax_partitions_zstep`
    /// descriptor.
    pub fn from_descriptor(descriptor: &str, config: CacheConfig) -> Result<Self> {
        let space: PartitionSpace = descriptor.parse()?;
        Ok(Self::new(Arc::new(space), config))
    }

    /// The space tiles are resolved against.
    #[must_use]
    pub fn space(&self) -> &PartitionSpace {
        &self.space
    }

    /// Partition of `tile`, computed at most once while cached.
    pub fn partition(&self, tile: TileCoord) -> Result<PartitionId> {
        if let Some(&partition) = self.entries.read().get(&tile) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(%tile, partition, "partition cache hit");
            return Ok(partition);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let partition = self.space.partition(tile)?;
        trace!(%tile, partition, "partition cache miss");

        if self.capacity > 0 {
            let mut entries = self.entries.write();
            if entries.len() >= self.capacity && !entries.contains_key(&tile) {
                debug!(capacity = self.capacity, "partition cache full, clearing");
                entries.clear();
            }
            entries.insert(tile, partition);
        }
        Ok(partition)
    }

    /// Current counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.read().len(),
        }
    }

    /// Drop all memoized tiles. Counters are kept.
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}
