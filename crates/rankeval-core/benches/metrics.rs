//! Metric throughput benchmarks.
//!
//! Run with: `cargo bench -p rankeval-core --bench metrics`
//!
//! Measures the two paths that grow with input size:
//!
//! - **MAP/gMAP batches**: O(N) per query, linear in batch size
//! - **Kendall's tau**: O(n log n) alignment and inversion counting
//!
//! Enable `--features parallel` to compare the rayon batch path.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rankeval_core::evaluation::{
    geometric_mean_average_precision, kendall_tau, mean_average_precision, JudgedList,
};

// =============================================================================
// Configuration
// =============================================================================

/// Queries per MAP batch.
const BATCH_SIZES: &[usize] = &[100, 1_000, 10_000];

/// Judged depth per query.
const JUDGED_DEPTH: usize = 100;

/// Ranking sizes for Kendall's tau.
const RANKING_SIZES: &[usize] = &[30, 1_000, 100_000];

// =============================================================================
// Test Data Generation
// =============================================================================

/// Deterministic pseudo-random bit for (query, position).
fn seeded_relevance(query: usize, position: usize) -> u8 {
    let h = (query as u64)
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
        .wrapping_add(position as u64)
        .wrapping_mul(0xBF58_476D_1CE4_E5B9);
    ((h >> 61) == 0) as u8
}

fn generate_batch(size: usize) -> Vec<JudgedList> {
    (0..size)
        .map(|q| {
            let relevance: Vec<u8> = (0..JUDGED_DEPTH).map(|p| seeded_relevance(q, p)).collect();
            let found = relevance.iter().filter(|&&r| r == 1).count();
            JudgedList::new(relevance, found + 5)
        })
        .collect()
}

/// Ranking of `size` ids with a fixed, scrambled order.
fn generate_ranking(size: usize) -> Vec<u64> {
    let mut ids: Vec<u64> = (0..size as u64).collect();
    ids.sort_by_key(|&v| v.wrapping_mul(0x9E37_79B9_7F4A_7C15));
    ids
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_batch_aggregates(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_aggregates");

    for &size in BATCH_SIZES {
        let batch = generate_batch(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("map", size), &batch, |b, batch| {
            b.iter(|| mean_average_precision(black_box(batch)))
        });
        group.bench_with_input(BenchmarkId::new("gmap", size), &batch, |b, batch| {
            b.iter(|| geometric_mean_average_precision(black_box(batch)))
        });
    }

    group.finish();
}

fn bench_kendall_tau(c: &mut Criterion) {
    let mut group = c.benchmark_group("kendall_tau");

    for &size in RANKING_SIZES {
        let left: Vec<u64> = (0..size as u64).collect();
        let right = generate_ranking(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(size),
            &(left, right),
            |b, (left, right)| b.iter(|| kendall_tau(black_box(left), black_box(right))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_batch_aggregates, bench_kendall_tau);
criterion_main!(benches);
