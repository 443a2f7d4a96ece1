// Benchmark suite for BigList
//
// Compares the default shape against a small-fanout shape (deep trees) and
// against a flat Vec on the same workloads:
// - sequential appends
// - random inserts and removals
// - whole-list and bounded reversal
// - overlapping copies within one list

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use biglist::{BigList, BigListConfig};

fn configs() -> [(&'static str, BigListConfig); 2] {
    return [
        ("default", BigListConfig::default()),
        ("fanout16_leaf64", BigListConfig::new(4, 6).unwrap()),
    ];
}

// =============================================================================
// Benchmark Helpers
// =============================================================================

fn filled(config: BigListConfig, size: usize) -> BigList<u64> {
    return BigList::from_vec_in(config, (0..size as u64).collect()).unwrap();
}

fn random_inserts(list: &mut BigList<u64>, count: usize, rng: &mut StdRng) {
    for i in 0..count {
        let len = usize::try_from(&list.len()).unwrap();
        let pos = rng.gen_range(0..=len);
        list.insert(pos, i as u64).unwrap();
    }
}

fn random_removals(list: &mut BigList<u64>, count: usize, rng: &mut StdRng) {
    for _ in 0..count {
        let len = usize::try_from(&list.len()).unwrap();
        if len == 0 {
            break;
        }
        list.remove_at(rng.gen_range(0..len)).unwrap();
    }
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("append");
    for size in [1_000usize, 10_000, 100_000] {
        group.throughput(Throughput::Elements(size as u64));
        for (name, config) in configs() {
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, &size| {
                b.iter(|| {
                    let mut list = BigList::with_config(config);
                    for i in 0..size as u64 {
                        list.add(i).unwrap();
                    }
                    black_box(list.len())
                });
            });
        }
        group.bench_with_input(BenchmarkId::new("vec", size), &size, |b, &size| {
            b.iter(|| {
                let mut vec = Vec::new();
                for i in 0..size as u64 {
                    vec.push(i);
                }
                black_box(vec.len())
            });
        });
    }
    group.finish();
}

fn bench_random_edits(c: &mut Criterion) {
    let mut group = c.benchmark_group("random_edits");
    for size in [10_000usize, 100_000] {
        group.throughput(Throughput::Elements(1_000));
        for (name, config) in configs() {
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, &size| {
                let base = filled(config, size);
                b.iter(|| {
                    let mut list = base.clone();
                    let mut rng = StdRng::seed_from_u64(42);
                    random_inserts(&mut list, 500, &mut rng);
                    random_removals(&mut list, 500, &mut rng);
                    black_box(list.len())
                });
            });
        }
    }
    group.finish();
}

fn bench_reverse(c: &mut Criterion) {
    let mut group = c.benchmark_group("reverse");
    for size in [10_000usize, 100_000] {
        for (name, config) in configs() {
            let base = filled(config, size);
            group.bench_with_input(BenchmarkId::new(format!("{name}/whole"), size), &size, |b, _| {
                let mut list = base.clone();
                b.iter(|| {
                    list.reverse();
                    black_box(list.first().copied())
                });
            });
            group.bench_with_input(BenchmarkId::new(format!("{name}/range"), size), &size, |b, &size| {
                let mut list = base.clone();
                b.iter(|| {
                    list.reverse_range(size / 8, size * 3 / 4).unwrap();
                    black_box(list.first().copied())
                });
            });
        }
    }
    group.finish();
}

fn bench_copy_within(c: &mut Criterion) {
    let mut group = c.benchmark_group("copy_within");
    for size in [10_000usize, 100_000] {
        group.throughput(Throughput::Elements(size as u64 / 2));
        for (name, config) in configs() {
            let base = filled(config, size);
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, &size| {
                let mut list = base.clone();
                b.iter(|| {
                    list.copy_within(0usize, size / 4, size / 2).unwrap();
                    list.copy_within(size / 4, 0usize, size / 2).unwrap();
                    black_box(list.last().copied())
                });
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_append, bench_random_edits, bench_reverse, bench_copy_within);
criterion_main!(benches);
