//! sigmatch Criterion Benchmark
//!
//! Throughput of both hash engines across input sizes, streaming overhead,
//! similarity search over synthetic signature databases, and baselines
//! against established hash crates.

#![allow(clippy::pedantic, clippy::nursery)]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use rand::prelude::*;
use sha2::Digest as _;
use std::hint::black_box;

const KB: usize = 1024;
const MB: usize = 1024 * 1024;

fn random_input(size: usize) -> Vec<u8> {
    let mut input = vec![0u8; size];
    rand::rng().fill(&mut input[..]);
    input
}

// =============================================================================
// BENCHMARK 1: TREE HASH
// =============================================================================

/// One-shot tree-hash throughput from sub-chunk inputs to multi-level trees.
fn bench_tree_hash(c: &mut Criterion) {
    let mut group = c.benchmark_group("1-Tree-Hash");

    let sizes = [
        (64, "64B"),
        (KB, "1KB"),
        (4 * KB, "4KB"),
        (64 * KB, "64KB"),
        (MB, "1MB"),
        (16 * MB, "16MB"),
    ];

    for (size, name) in sizes {
        let input = random_input(size);
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(
            criterion::BenchmarkId::from_parameter(name),
            &input,
            |b, data| b.iter(|| sigmatch::hash(black_box(data))),
        );
    }
    group.finish();
}

// =============================================================================
// BENCHMARK 2: SEQUENTIAL HASH
// =============================================================================

/// One-shot sequential-hash throughput at the default 64-byte digest.
fn bench_sequential_hash(c: &mut Criterion) {
    let mut group = c.benchmark_group("2-Sequential-Hash");

    let sizes = [
        (128, "128B"),
        (KB, "1KB"),
        (64 * KB, "64KB"),
        (MB, "1MB"),
        (16 * MB, "16MB"),
    ];

    for (size, name) in sizes {
        let input = random_input(size);
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(
            criterion::BenchmarkId::from_parameter(name),
            &input,
            |b, data| b.iter(|| sigmatch::hash_sequential(black_box(data), 64).unwrap()),
        );
    }
    group.finish();
}

// =============================================================================
// BENCHMARK 3: STREAMING
// =============================================================================

/// Incremental-update overhead at various feed sizes.
fn bench_streaming(c: &mut Criterion) {
    let mut group = c.benchmark_group("3-Streaming");
    group.sample_size(50);

    let test_cases = [
        (MB, 4 * KB, "1MB-4KB-chunks"),
        (MB, 64 * KB, "1MB-64KB-chunks"),
        (16 * MB, 64 * KB, "16MB-64KB-chunks"),
        (16 * MB, 256 * KB, "16MB-256KB-chunks"),
    ];

    for (total_size, chunk_size, name) in test_cases {
        let input = random_input(total_size);
        group.throughput(Throughput::Bytes(total_size as u64));

        group.bench_with_input(
            criterion::BenchmarkId::from_parameter(name),
            &(input, chunk_size),
            |b, (data, chunk_sz)| {
                b.iter(|| {
                    let mut hasher = sigmatch::Blake3::new();
                    for chunk in data.chunks(*chunk_sz) {
                        hasher.update(black_box(chunk));
                    }
                    hasher.finalize(32)
                })
            },
        );
    }
    group.finish();
}

// =============================================================================
// BENCHMARK 4: XOF OUTPUT
// =============================================================================

/// Extendable-output generation cost for a fixed input.
fn bench_xof(c: &mut Criterion) {
    let mut group = c.benchmark_group("4-XOF-Output");

    let input = random_input(4 * KB);
    for (out_len, name) in [(32, "32B"), (64, "64B"), (KB, "1KB"), (64 * KB, "64KB")] {
        group.throughput(Throughput::Bytes(out_len as u64));
        group.bench_with_input(
            criterion::BenchmarkId::from_parameter(name),
            &out_len,
            |b, &len| b.iter(|| sigmatch::hash_xof(black_box(&input), len)),
        );
    }
    group.finish();
}

// =============================================================================
// BENCHMARK 5: MATCHING
// =============================================================================

/// Exact and similarity scans over synthetic signature databases.
fn bench_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("5-Matching");

    let target = sigmatch::hash(b"scan target payload");
    let target_hex = target.to_hex();

    for db_size in [100usize, 1000, 10_000] {
        let hex_db: Vec<Option<String>> = (0..db_size)
            .map(|i| Some(sigmatch::hash_hex(&i.to_le_bytes())))
            .collect();
        let binary_db: Vec<Option<Vec<u8>>> = hex_db
            .iter()
            .map(|slot| slot.as_ref().map(|h| hex::decode(h).unwrap()))
            .collect();

        group.bench_with_input(
            criterion::BenchmarkId::new("exact", db_size),
            &hex_db,
            |b, db| b.iter(|| sigmatch::matching::exact_match(black_box(&target_hex), db).unwrap()),
        );

        group.bench_with_input(
            criterion::BenchmarkId::new("similarity", db_size),
            &binary_db,
            |b, db| {
                b.iter(|| {
                    sigmatch::matching::similarity_search(black_box(target.as_bytes()), db, 0.6)
                        .unwrap()
                })
            },
        );
    }
    group.finish();
}

// =============================================================================
// BENCHMARK 6: BASELINES
// =============================================================================

/// Established crates on the same input, for context.
fn bench_baselines(c: &mut Criterion) {
    let mut group = c.benchmark_group("6-Baselines");
    group.sample_size(50);

    let size = MB;
    let input = random_input(size);
    group.throughput(Throughput::Bytes(size as u64));

    group.bench_function("sigmatch-tree", |b| {
        b.iter(|| sigmatch::hash(black_box(&input)))
    });
    group.bench_function("blake3-crate", |b| {
        b.iter(|| blake3::hash(black_box(&input)))
    });
    group.bench_function("sha2-256", |b| {
        b.iter(|| sha2::Sha256::digest(black_box(&input)))
    });

    group.finish();
}

// =============================================================================
// MAIN
// =============================================================================

criterion_group!(
    benches,
    bench_tree_hash,
    bench_sequential_hash,
    bench_streaming,
    bench_xof,
    bench_matching,
    bench_baselines,
);

criterion_main!(benches);
