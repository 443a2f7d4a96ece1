//! Structural work done by insertion and bounded reversal, measured through
//! the process-wide profiling counters. Kept to a single test so nothing else
//! in this binary moves the counters while it runs.

use biglist::profiling::{self, Snapshot};
use biglist::{BigList, BigListConfig};

fn since(before: Snapshot) -> Snapshot {
    let after = profiling::snapshot();
    return Snapshot {
        slow_operations: after.slow_operations - before.slow_operations,
        compactions: after.compactions - before.compactions,
        splits: after.splits - before.splits,
        shifts: after.shifts - before.shifts,
        copy_tasks: after.copy_tasks - before.copy_tasks,
        leaf_copies: after.leaf_copies - before.leaf_copies,
    };
}

fn front_inserts_stay_local() {
    let count = 4000u64;
    let mut list = BigList::with_config(BigListConfig::new(2, 2).unwrap());
    let before = profiling::snapshot();
    for i in 0..count as u32 {
        list.insert(0usize, i).unwrap();
    }
    let work = since(before);
    assert_eq!(work.shifts, 0, "{work:?}");
    assert!(work.compactions * 4 <= count, "{work:?}");
    assert!(work.splits <= count, "{work:?}");
    list.verify().unwrap();
    assert_eq!(list.to_vec().unwrap(), (0..count as u32).rev().collect::<Vec<u32>>());
}

fn unequal_reversal_moves_only_boundaries() {
    // Four root branches of 1024; the last one is 96 short of full.
    let config = BigListConfig::new(4, 2).unwrap();
    let mut list = BigList::with_capacity(config, 4096usize).unwrap();
    list.add_range(0..4000u32).unwrap();
    let mut oracle: Vec<u32> = (0..4000).collect();

    // Ten elements of the first branch, four of the last, two whole branches
    // between.
    let (index, count) = (1014usize, 2062usize);
    let before = profiling::snapshot();
    list.reverse_range(index, count).unwrap();
    let work = since(before);
    oracle[index..index + count].reverse();

    assert!(work.leaf_copies < 200, "{work:?}");
    assert_eq!(work.compactions, 0, "{work:?}");
    list.verify().unwrap();
    assert_eq!(list.to_vec().unwrap(), oracle);
}

#[test]
fn structural_work_stays_local() {
    front_inserts_stay_local();
    unequal_reversal_moves_only_boundaries();
}
