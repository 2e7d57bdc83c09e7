//! File hashing performance benchmarks
//!
//! Compares digest algorithms and read block sizes for cache file hashing.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use memo_benchmarks::{create_test_content, criterion_config};
use memo_core::{hash_bytes, FileHasher, HashAlgorithm};
use tempfile::tempdir;

const ALGORITHMS: [HashAlgorithm; 3] = [HashAlgorithm::Md5, HashAlgorithm::Blake3, HashAlgorithm::Sha256];

/// Benchmark file hashing for different file sizes and algorithms
fn bench_file_hashing(c: &mut Criterion) {
    let mut group = c.benchmark_group("file_hashing");
    group.measurement_time(std::time::Duration::from_secs(10));

    for size in [1024, 102_400, 10_240_000].iter() {
        group.throughput(Throughput::Bytes(*size as u64));

        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("test_file");
        std::fs::write(&file_path, create_test_content(*size)).unwrap();

        for algorithm in ALGORITHMS {
            let hasher = FileHasher::new(algorithm);
            group.bench_with_input(
                BenchmarkId::new(algorithm.name(), size),
                &file_path,
                |b, path| {
                    b.iter(|| black_box(hasher.try_hash_file(path).unwrap()));
                },
            );
        }
    }

    group.finish();
}

/// Benchmark the effect of the read block size
fn bench_chunk_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("chunk_sizes");
    let size = 10_240_000;
    group.throughput(Throughput::Bytes(size as u64));

    let temp_dir = tempdir().unwrap();
    let file_path = temp_dir.path().join("test_file");
    std::fs::write(&file_path, create_test_content(size)).unwrap();

    for chunk_size in [4096, 65_536, 1 << 20, 8 << 20].iter() {
        let hasher = FileHasher::default().with_chunk_size(*chunk_size).unwrap();
        group.bench_with_input(BenchmarkId::new("md5", chunk_size), &file_path, |b, path| {
            b.iter(|| black_box(hasher.try_hash_file(path).unwrap()));
        });
    }

    group.finish();
}

/// Benchmark in-memory hashing
fn bench_memory_hashing(c: &mut Criterion) {
    let mut group = c.benchmark_group("memory_hashing");

    let content = create_test_content(1_024_000);
    group.throughput(Throughput::Bytes(content.len() as u64));
    for algorithm in ALGORITHMS {
        group.bench_with_input(BenchmarkId::new(algorithm.name(), content.len()), &content, |b, data| {
            b.iter(|| black_box(hash_bytes(data, algorithm)));
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = criterion_config();
    targets = bench_file_hashing, bench_chunk_sizes, bench_memory_hashing
}
criterion_main!(benches);
