// Criterion benchmarks for Stable Match

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use stable_match::core::{enumerate_stable, enumerate_stable_up_to, solve, PreferenceTable, StabilityCheck};

/// Market where every proposer shares the same ranking, forcing the
/// maximum number of rejections
fn contested_market(n: usize) -> (PreferenceTable, PreferenceTable) {
    let responder_ids: Vec<String> = (0..n).map(|j| format!("S{}", j)).collect();
    let proposer_ids: Vec<String> = (0..n).map(|i| format!("H{}", i)).collect();

    let proposers = proposer_ids
        .iter()
        .map(|id| (id.clone(), responder_ids.clone()))
        .collect();
    let responders = responder_ids
        .iter()
        .map(|id| (id.clone(), proposer_ids.iter().rev().cloned().collect::<Vec<_>>()))
        .collect();
    (proposers, responders)
}

/// Market with rotated rankings on both sides
fn rotated_market(n: usize) -> (PreferenceTable, PreferenceTable) {
    let proposers = (0..n)
        .map(|i| (format!("H{}", i), (0..n).map(|k| format!("S{}", (i + k) % n)).collect::<Vec<_>>()))
        .collect();
    let responders = (0..n)
        .map(|j| (format!("S{}", j), (0..n).map(|k| format!("H{}", (j + 1 + k) % n)).collect::<Vec<_>>()))
        .collect();
    (proposers, responders)
}

fn bench_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve");

    for size in [10, 50, 100, 200].iter() {
        let (proposers, responders) = contested_market(*size);

        group.bench_with_input(BenchmarkId::new("contested", size), size, |b, _| {
            b.iter(|| solve(black_box(&proposers), black_box(&responders)))
        });
    }

    group.finish();
}

fn bench_verify(c: &mut Criterion) {
    let mut group = c.benchmark_group("verify");

    for size in [10, 50, 100, 200].iter() {
        let (proposers, responders) = rotated_market(*size);
        let matching = solve(&proposers, &responders).unwrap();
        let check = StabilityCheck::new(&proposers, &responders).unwrap();

        group.bench_with_input(BenchmarkId::new("blocking_pairs", size), size, |b, _| {
            b.iter(|| check.blocking_pairs(black_box(&matching)))
        });
    }

    group.finish();
}

fn bench_enumerate(c: &mut Criterion) {
    let mut group = c.benchmark_group("enumerate");

    for size in [5, 10, 25, 50].iter() {
        let (proposers, responders) = rotated_market(*size);

        group.bench_with_input(BenchmarkId::new("pairwise_swaps", size), size, |b, _| {
            b.iter(|| enumerate_stable(black_box(&proposers), black_box(&responders)))
        });
    }

    // Rotated markets leave every responder with its last choice, so every
    // proposer pair reaches the stability check
    for size in [50, 100, 200].iter() {
        let (proposers, responders) = rotated_market(*size);

        group.bench_with_input(BenchmarkId::new("capped", size), size, |b, _| {
            b.iter(|| enumerate_stable_up_to(black_box(&proposers), black_box(&responders), 1001))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_solve, bench_verify, bench_enumerate);

criterion_main!(benches);
