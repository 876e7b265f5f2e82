//! Benchmark for TreeMap and TreeMultiset vs standard BTreeMap.
//!
//! Compares the red-black tree containers against Rust's standard BTreeMap
//! for insertion, lookup, removal and iteration.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rbcontainers::associative::{TreeMap, TreeMultiset};
use std::collections::BTreeMap;
use std::hint::black_box;

/// Keys in a scattered but deterministic order.
fn scattered(size: i32) -> Vec<i32> {
    (0..size).map(|index| (index * 7919) % size).collect()
}

// =============================================================================
// insert Benchmark
// =============================================================================

fn benchmark_insert(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("insert");

    for size in [100, 1000, 10000] {
        let keys = scattered(size);

        group.bench_with_input(BenchmarkId::new("TreeMap", size), &keys, |bencher, keys| {
            bencher.iter(|| {
                let mut map = TreeMap::new();
                for &key in keys {
                    map.insert(black_box(key), black_box(key * 2));
                }
                black_box(map)
            });
        });

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &keys, |bencher, keys| {
            bencher.iter(|| {
                let mut map = BTreeMap::new();
                for &key in keys {
                    map.insert(black_box(key), black_box(key * 2));
                }
                black_box(map)
            });
        });
    }

    group.finish();
}

// =============================================================================
// get Benchmark
// =============================================================================

fn benchmark_get(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("get");

    for size in [100, 1000, 10000] {
        let tree_map: TreeMap<i32, i32> = scattered(size).into_iter().map(|key| (key, key)).collect();
        let standard_map: BTreeMap<i32, i32> = (0..size).map(|key| (key, key)).collect();

        group.bench_with_input(BenchmarkId::new("TreeMap", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let mut sum = 0i64;
                for key in 0..size {
                    if let Some(&value) = tree_map.get(&black_box(key)) {
                        sum += i64::from(value);
                    }
                }
                black_box(sum)
            });
        });

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let mut sum = 0i64;
                for key in 0..size {
                    if let Some(&value) = standard_map.get(&black_box(key)) {
                        sum += i64::from(value);
                    }
                }
                black_box(sum)
            });
        });
    }

    group.finish();
}

// =============================================================================
// remove Benchmark
// =============================================================================

fn benchmark_remove(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("remove");

    for size in [100, 1000, 10000] {
        let keys = scattered(size);
        let tree_map: TreeMap<i32, i32> = keys.iter().map(|&key| (key, key)).collect();
        let standard_map: BTreeMap<i32, i32> = keys.iter().map(|&key| (key, key)).collect();

        group.bench_with_input(BenchmarkId::new("TreeMap", size), &keys, |bencher, keys| {
            bencher.iter_batched(
                || tree_map.clone(),
                |mut map| {
                    for key in keys {
                        map.remove(key);
                    }
                    black_box(map)
                },
                criterion::BatchSize::SmallInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &keys, |bencher, keys| {
            bencher.iter_batched(
                || standard_map.clone(),
                |mut map| {
                    for key in keys {
                        map.remove(key);
                    }
                    black_box(map)
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

// =============================================================================
// iteration Benchmark
// =============================================================================

fn benchmark_iteration(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("iteration");

    for size in [1000, 10000] {
        let tree_map: TreeMap<i32, i32> = (0..size).map(|key| (key, key)).collect();
        let standard_map: BTreeMap<i32, i32> = (0..size).map(|key| (key, key)).collect();

        group.bench_with_input(BenchmarkId::new("TreeMap/iter", size), &size, |bencher, _| {
            bencher.iter(|| black_box(tree_map.values().copied().map(i64::from).sum::<i64>()));
        });

        group.bench_with_input(BenchmarkId::new("TreeMap/cursor", size), &size, |bencher, _| {
            bencher.iter(|| {
                let mut sum = 0i64;
                let mut cursor = tree_map.begin();
                while let Some((_, &value)) = tree_map.get_at(cursor) {
                    sum += i64::from(value);
                    cursor = tree_map.next(cursor);
                }
                black_box(sum)
            });
        });

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &size, |bencher, _| {
            bencher.iter(|| black_box(standard_map.values().copied().map(i64::from).sum::<i64>()));
        });
    }

    group.finish();
}

// =============================================================================
// multiset count Benchmark
// =============================================================================

fn benchmark_multiset_count(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("multiset_count");

    for size in [1000, 10000] {
        let multiset: TreeMultiset<i32> = (0..size).map(|index| index % 64).collect();

        group.bench_with_input(BenchmarkId::new("TreeMultiset", size), &size, |bencher, _| {
            bencher.iter(|| {
                let total: usize = (0..64).map(|key| multiset.count(&black_box(key))).sum();
                black_box(total)
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_insert,
    benchmark_get,
    benchmark_remove,
    benchmark_iteration,
    benchmark_multiset_count
);

criterion_main!(benches);
