use std::collections::BTreeSet;
use std::hint::black_box;

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use mway_set::OrderedSet;

const N: usize = 10_000;

fn ordered_keys(n: usize) -> Vec<i32> {
    (0..n as i32).collect()
}

fn reverse_ordered_keys(n: usize) -> Vec<i32> {
    (0..n as i32).rev().collect()
}

fn random_keys(n: usize) -> Vec<i32> {
    // LCG keeps the sequence identical between runs.
    let mut x: u64 = 12345;
    (0..n)
        .map(|_| {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            (x >> 33) as i32
        })
        .collect()
}

fn key_patterns() -> [(&'static str, Vec<i32>); 3] {
    [
        ("ordered", ordered_keys(N)),
        ("reverse", reverse_ordered_keys(N)),
        ("random", random_keys(N)),
    ]
}

fn bench_insert(c: &mut Criterion) {
    for (pattern, keys) in key_patterns() {
        let mut group = c.benchmark_group(format!("set_insert_{pattern}"));

        group.bench_function(BenchmarkId::new("OrderedSet<4>", N), |b| {
            b.iter(|| {
                let mut set: OrderedSet<i32> = OrderedSet::new();
                for &key in &keys {
                    set.insert(key);
                }
                set
            });
        });

        group.bench_function(BenchmarkId::new("OrderedSet<32>", N), |b| {
            b.iter(|| {
                let mut set: OrderedSet<i32, 32> = OrderedSet::new();
                for &key in &keys {
                    set.insert(key);
                }
                set
            });
        });

        group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
            b.iter(|| {
                let mut set = BTreeSet::new();
                for &key in &keys {
                    set.insert(key);
                }
                set
            });
        });

        group.finish();
    }
}

fn bench_contains(c: &mut Criterion) {
    for (pattern, keys) in key_patterns() {
        let mut group = c.benchmark_group(format!("set_contains_{pattern}"));
        let ordered: OrderedSet<i32> = keys.iter().copied().collect();
        let std_set: BTreeSet<i32> = keys.iter().copied().collect();

        group.bench_function(BenchmarkId::new("OrderedSet<4>", N), |b| {
            b.iter(|| keys.iter().filter(|key| ordered.contains(black_box(*key))).count());
        });

        group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
            b.iter(|| keys.iter().filter(|key| std_set.contains(black_box(*key))).count());
        });

        group.finish();
    }
}

fn bench_erase(c: &mut Criterion) {
    for (pattern, keys) in key_patterns() {
        let mut group = c.benchmark_group(format!("set_erase_{pattern}"));
        let ordered: OrderedSet<i32> = keys.iter().copied().collect();
        let std_set: BTreeSet<i32> = keys.iter().copied().collect();

        group.bench_function(BenchmarkId::new("OrderedSet<4>", N), |b| {
            b.iter_batched(
                || ordered.clone(),
                |mut set| {
                    for key in &keys {
                        set.erase(key);
                    }
                    set
                },
                BatchSize::SmallInput,
            );
        });

        group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
            b.iter_batched(
                || std_set.clone(),
                |mut set| {
                    for key in &keys {
                        set.remove(key);
                    }
                    set
                },
                BatchSize::SmallInput,
            );
        });

        group.finish();
    }
}

fn bench_bounds(c: &mut Criterion) {
    let keys = random_keys(N);
    let mut group = c.benchmark_group("set_lower_bound_random");
    let ordered: OrderedSet<i32> = keys.iter().copied().collect();
    let std_set: BTreeSet<i32> = keys.iter().copied().collect();

    group.bench_function(BenchmarkId::new("OrderedSet<4>", N), |b| {
        b.iter(|| keys.iter().filter_map(|key| ordered.lower_bound(black_box(key)).peek()).count());
    });

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| keys.iter().filter_map(|key| std_set.range(black_box(*key)..).next()).count());
    });

    group.finish();
}

fn bench_iterate(c: &mut Criterion) {
    let keys = random_keys(N);
    let mut group = c.benchmark_group("set_iterate");
    let ordered: OrderedSet<i32> = keys.iter().copied().collect();
    let std_set: BTreeSet<i32> = keys.iter().copied().collect();

    group.bench_function(BenchmarkId::new("OrderedSet<4>", N), |b| {
        b.iter(|| ordered.iter().fold(0i64, |acc, &key| acc + i64::from(key)));
    });

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| std_set.iter().fold(0i64, |acc, &key| acc + i64::from(key)));
    });

    group.finish();
}

criterion_group!(set_write_benches, bench_insert, bench_erase);

criterion_group!(set_read_benches, bench_contains, bench_bounds, bench_iterate);

criterion_main!(set_write_benches, set_read_benches);
