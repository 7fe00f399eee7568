//! Benchmarks for the qvalue frequency table.
//!
//! Run with: cargo bench

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use qhist::FrequencyTable;

/// Deterministic pseudo-random qvalues in a realistic quantizer range.
fn synthetic_qvalues(count: usize, distinct: u64) -> Vec<f64> {
    let mut state: u64 = 0x9e37_79b9;
    (0..count)
        .map(|_| {
            state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
            (state >> 33) % distinct
        })
        .map(|code| code as f64 / 8.0 + 2.0)
        .collect()
}

fn benchmark_observe_repeated_values(criterion: &mut Criterion) {
    // Real streams revisit a small set of qvalues; most observations hit
    // the increment path.
    let qvalues = synthetic_qvalues(10_000, 48);

    criterion.bench_function("observe 10k qvalues, 48 distinct", |bencher| {
        bencher.iter(|| {
            let mut table = FrequencyTable::new();
            for &qvalue in &qvalues {
                table.observe(black_box(qvalue)).unwrap();
            }
            black_box(table.total_observations())
        });
    });
}

fn benchmark_observe_distinct_values(criterion: &mut Criterion) {
    // Worst case: every observation inserts a new sorted entry.
    let qvalues = synthetic_qvalues(10_000, u64::MAX);

    criterion.bench_function("observe 10k qvalues, all distinct", |bencher| {
        bencher.iter(|| {
            let mut table = FrequencyTable::new();
            for &qvalue in &qvalues {
                table.observe(black_box(qvalue)).unwrap();
            }
            black_box(table.distinct_values())
        });
    });
}

fn benchmark_weighted_mean(criterion: &mut Criterion) {
    let mut table = FrequencyTable::new();
    for qvalue in synthetic_qvalues(10_000, 256) {
        table.observe(qvalue).unwrap();
    }

    criterion.bench_function("weighted mean over 256 entries", |bencher| {
        bencher.iter(|| black_box(table.weighted_mean()));
    });
}

criterion_group!(
    benches,
    benchmark_observe_repeated_values,
    benchmark_observe_distinct_values,
    benchmark_weighted_mean,
);
criterion_main!(benches);
