//! Memoization wrapper benchmarks
//!
//! Measures the cost of the hit path (hash + decode) against the miss path
//! (hash + compute + encode + write + rehash).

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use memo_benchmarks::criterion_config;
use memo_cache::{CacheStore, Memoized};
use memo_core::{FileHasher, NullReporter};
use std::sync::Arc;
use tempfile::tempdir;

fn bench_hit_and_miss(c: &mut Criterion) {
    let mut group = c.benchmark_group("memoize");

    for len in [100usize, 10_000, 100_000].iter() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("cache.json");
        let data: Vec<u64> = (0..*len as u64).rev().collect();

        let mut expected = data.clone();
        expected.sort_unstable();
        assert!(CacheStore::new().save(&expected, &path));
        let hash = FileHasher::default().try_hash_file(&path).unwrap();

        let mut hit = Memoized::new(
            |mut v: Vec<u64>| {
                v.sort_unstable();
                v
            },
            &path,
            Some(hash.as_str()),
        )
        .with_reporter(Arc::new(NullReporter));
        group.bench_with_input(BenchmarkId::new("hit", len), &data, |b, data| {
            b.iter(|| black_box(hit.call(data.clone())));
        });

        let miss_path = temp_dir.path().join("miss.json");
        let mut miss = Memoized::new(
            |mut v: Vec<u64>| {
                v.sort_unstable();
                v
            },
            &miss_path,
            None,
        )
        .with_reporter(Arc::new(NullReporter));
        group.bench_with_input(BenchmarkId::new("miss", len), &data, |b, data| {
            b.iter(|| black_box(miss.call(data.clone())));
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = criterion_config();
    targets = bench_hit_and_miss
}
criterion_main!(benches);
