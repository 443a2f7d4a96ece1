// Quick benchmark for getting summary results across list shapes

use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use biglist::{BigList, BigListConfig, profiling};

fn time_ops<F: FnMut() -> usize>(mut f: F, iterations: usize) -> f64 {
    // Warmup
    for _ in 0..3 {
        let _ = f();
    }

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = f();
    }
    return start.elapsed().as_nanos() as f64 / iterations as f64;
}

fn len_of(list: &BigList<u32>) -> usize {
    return usize::try_from(&list.len()).unwrap_or(usize::MAX);
}

fn bench_shape(name: &str, config: BigListConfig, size: usize) {
    let append = time_ops(
        || {
            let mut list = BigList::with_config(config);
            for i in 0..size as u32 {
                list.add(i).unwrap();
            }
            len_of(&list)
        },
        20,
    );

    let random_insert = time_ops(
        || {
            let mut list = BigList::with_config(config);
            let mut rng = StdRng::seed_from_u64(42);
            for i in 0..size as u32 {
                let pos = rng.gen_range(0..=len_of(&list));
                list.insert(pos, i).unwrap();
            }
            len_of(&list)
        },
        20,
    );

    let base = BigList::from_vec_in(config, (0..size as u32).collect()).unwrap();
    let random_remove = time_ops(
        || {
            let mut list = base.clone();
            let mut rng = StdRng::seed_from_u64(42);
            while !list.is_empty() {
                let pos = rng.gen_range(0..len_of(&list));
                list.remove_at(pos).unwrap();
            }
            len_of(&list)
        },
        20,
    );

    let mut reversed = base.clone();
    let reverse_range = time_ops(
        || {
            reversed.reverse_range(size / 10, size / 2).unwrap();
            len_of(&reversed)
        },
        100,
    );

    println!(
        "| {:16} | {:>10.0} | {:>10.0} | {:>10.0} | {:>10.2} |",
        name,
        append / 1000.0,
        random_insert / 1000.0,
        random_remove / 1000.0,
        reverse_range / 1000.0
    );
}

fn main() {
    for size in [1_000usize, 10_000] {
        println!("\n=== BigList shapes ({size} elements) ===\n");
        println!("All times in microseconds (us)\n");
        println!(
            "| {:16} | {:>10} | {:>10} | {:>10} | {:>10} |",
            "Shape", "Append", "Rand Ins", "Rand Del", "Rev Range"
        );
        println!("|------------------|------------|------------|------------|------------|");

        profiling::reset();
        bench_shape("default", BigListConfig::default(), size);
        bench_shape("fanout16_leaf64", BigListConfig::new(4, 6).unwrap(), size);
        bench_shape("fanout4_leaf4", BigListConfig::new(2, 2).unwrap(), size);
        println!("\n{}", profiling::report());
    }
}
