use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::collections::BTreeSet;
use treapset::TreapSet;

const N: usize = 10_000;
const SEED: u64 = 0x5eed_1e55;

// ─── Helper functions to generate key sequences ─────────────────────────────

fn ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).collect()
}

fn random_keys(n: usize) -> Vec<i64> {
    // Use a simple LCG for a deterministic pseudo-random sequence
    let mut keys = Vec::with_capacity(n);
    let mut x: u64 = 12345;
    for _ in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        keys.push((x >> 33) as i64);
    }
    keys
}

fn treap_from(keys: &[i64]) -> TreapSet<i64> {
    let mut set = TreapSet::new_ord(SEED);
    for &key in keys {
        set.insert(key);
    }
    set
}

// ─── Insert benchmarks ──────────────────────────────────────────────────────

fn bench_insert_ordered(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_ordered");

    group.bench_function(BenchmarkId::new("TreapSet", N), |b| {
        b.iter(|| {
            let mut set = TreapSet::new_ord(SEED);
            for i in 0..N as i64 {
                set.insert(i);
            }
            set
        });
    });

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| {
            let mut set = BTreeSet::new();
            for i in 0..N as i64 {
                set.insert(i);
            }
            set
        });
    });

    group.finish();
}

fn bench_insert_random(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_random");
    let keys = random_keys(N);

    group.bench_function(BenchmarkId::new("TreapSet", N), |b| {
        b.iter(|| treap_from(&keys));
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

// ─── Search benchmarks ──────────────────────────────────────────────────────

fn bench_search_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_hit");
    let keys = random_keys(N);
    let treap = treap_from(&keys);
    let btree: BTreeSet<i64> = keys.iter().copied().collect();

    group.bench_function(BenchmarkId::new("TreapSet", N), |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for key in &keys {
                if treap.contains(key) {
                    hits += 1;
                }
            }
            hits
        });
    });

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for key in &keys {
                if btree.contains(key) {
                    hits += 1;
                }
            }
            hits
        });
    });

    group.finish();
}

// ─── Remove benchmarks ──────────────────────────────────────────────────────

fn bench_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove");
    let keys = random_keys(N);

    group.bench_function(BenchmarkId::new("TreapSet", N), |b| {
        b.iter_batched(
            || treap_from(&keys),
            |mut set| {
                for key in &keys {
                    set.remove(key);
                }
                set
            },
            criterion::BatchSize::LargeInput,
        );
    });

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter_batched(
            || keys.iter().copied().collect::<BTreeSet<i64>>(),
            |mut set| {
                for key in &keys {
                    set.remove(key);
                }
                set
            },
            criterion::BatchSize::LargeInput,
        );
    });

    group.finish();
}

// ─── Order-statistic benchmarks ─────────────────────────────────────────────

// BTreeSet has no rank/select; the closest it offers is a linear nth scan.
fn bench_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_median");
    let keys = ordered_keys(N);
    let treap = treap_from(&keys);
    let btree: BTreeSet<i64> = keys.iter().copied().collect();

    group.bench_function(BenchmarkId::new("TreapSet::choose", N), |b| {
        b.iter(|| *treap.choose(N / 2));
    });

    group.bench_function(BenchmarkId::new("BTreeSet::iter::nth", N), |b| {
        b.iter(|| *btree.iter().nth(N / 2).unwrap());
    });

    group.finish();
}

fn bench_rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank");
    let keys = ordered_keys(N);
    let treap = treap_from(&keys);
    let btree: BTreeSet<i64> = keys.iter().copied().collect();
    let probe = (N / 2) as i64;

    group.bench_function(BenchmarkId::new("TreapSet::rank", N), |b| {
        b.iter(|| treap.rank(&probe));
    });

    group.bench_function(BenchmarkId::new("BTreeSet::range::count", N), |b| {
        b.iter(|| btree.range(..probe).count());
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_insert_ordered,
    bench_insert_random,
    bench_search_hit,
    bench_remove,
    bench_select,
    bench_rank
);
criterion_main!(benches);
