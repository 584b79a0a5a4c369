use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tileshard_core::TileCoord;
use tileshard_partition::{CacheConfig, CachedResolver, PartitionSpace};

fn bench_partition(c: &mut Criterion) {
    let space: PartitionSpace = "0_12_9_4094_868_2216_3999_1".parse().unwrap();

    c.bench_function("partition z12", |b| {
        b.iter(|| space.partition(black_box(TileCoord::new(12, 1006, 1539))))
    });

    c.bench_function("zoom_partitions z11", |b| {
        b.iter(|| space.zoom_partitions(black_box(11)))
    });

    let resolver = CachedResolver::new(Arc::new(space), CacheConfig::default());
    c.bench_function("cached partition z12", |b| {
        b.iter(|| resolver.partition(black_box(TileCoord::new(12, 1006, 1539))))
    });
}

criterion_group!(benches, bench_partition);
criterion_main!(benches);
