//! End-to-end scenarios on the small shape (fan-out 4, leaf size 4).

use biglist::{BigList, BigListConfig, Error, UBig};

fn small() -> BigListConfig {
    return BigListConfig::new(2, 2).unwrap();
}

fn numbers(count: u32) -> BigList<u32> {
    let mut list = BigList::with_config(small());
    for i in 0..count {
        list.add(i).unwrap();
    }
    return list;
}

fn ub(value: usize) -> UBig {
    return UBig::from(value);
}

#[test]
fn sequential_inserts_build_a_deep_tree() {
    let mut list = BigList::with_config(small());
    for i in 0..20u32 {
        list.insert(i as usize, i).unwrap();
    }
    assert_eq!(list, (0..20).collect::<Vec<u32>>());
    assert!(list.depth() > 1);
    list.verify().unwrap();
}

#[test]
fn whole_reversal_flips_indexing() {
    let mut list = numbers(20);
    list.reverse();
    assert_eq!(*list.get(0usize).unwrap(), 19);
    assert_eq!(*list.get(19usize).unwrap(), 0);
    let copy = list.get_range(0usize, 20usize).unwrap();
    assert_eq!(copy, (0..20).rev().collect::<Vec<u32>>());
}

#[test]
fn copy_within_toward_the_front() {
    let mut list = numbers(10);
    list.copy_within(5usize, 0usize, 5usize).unwrap();
    assert_eq!(list, vec![5, 6, 7, 8, 9, 5, 6, 7, 8, 9]);
}

#[test]
fn copy_within_toward_the_back() {
    let mut list = numbers(10);
    list.copy_within(0usize, 5usize, 5usize).unwrap();
    assert_eq!(list, vec![0, 1, 2, 3, 4, 0, 1, 2, 3, 4]);
}

#[test]
fn removing_from_the_back_collapses_to_one_leaf() {
    let mut list = numbers(50);
    assert!(list.depth() > 2);
    for i in (0..50usize).rev() {
        assert_eq!(list.remove_at(i).unwrap(), i as u32);
    }
    assert!(list.is_empty());
    assert_eq!(list.len(), ub(0));
    assert_eq!(list.depth(), 1);
    assert_eq!(list.node_count(), 1);
    list.verify().unwrap();
}

#[test]
fn insert_a_larger_list_into_the_middle() {
    // One root fragment worth of elements in A, three in B.
    let fragment = 16u32;
    let a = numbers(fragment);
    let b: BigList<u32> = BigList::from_vec_in(small(), (100..100 + 3 * fragment).collect()).unwrap();

    let mut merged = a.clone();
    let mid = (fragment / 2) as usize;
    merged.insert_range(mid, &b).unwrap();

    assert_eq!(merged.len(), a.len() + b.len());
    let mut expected: Vec<u32> = (0..fragment / 2).collect();
    expected.extend(100..100 + 3 * fragment);
    expected.extend(fragment / 2..fragment);
    assert_eq!(merged, expected);
    merged.verify().unwrap();
}

#[test]
fn many_appends_match_a_flat_oracle() {
    // Ten times fan-out times leaf size.
    let mut list = BigList::with_config(small());
    let mut oracle = Vec::new();
    for i in 0..160u32 {
        list.add(i).unwrap();
        oracle.push(i);
        assert_eq!(list.len(), ub(oracle.len()));
        assert_eq!(list.last(), Some(&i));
    }
    assert_eq!(list, oracle);
    list.verify().unwrap();
}

#[test]
fn invalid_arguments_are_reported() {
    let mut list = numbers(10);
    assert!(matches!(list.get(10usize), Err(Error::IndexOutOfRange { .. })));
    assert!(matches!(list.insert(11usize, 0), Err(Error::IndexOutOfRange { .. })));
    assert!(matches!(
        list.remove_range(5usize, 6usize),
        Err(Error::RangeOutOfBounds { .. })
    ));
    assert!(matches!(
        list.set_capacity(9usize),
        Err(Error::CapacityBelowLength { .. })
    ));
    assert!(matches!(
        list.copy_within(0usize, 11usize, 1usize),
        Err(Error::IndexOutOfRange { .. })
    ));
    assert!(matches!(BigListConfig::new(1, 4), Err(Error::InvalidConfig(_))));
    assert_eq!(list, (0..10).collect::<Vec<u32>>());
}

#[test]
fn huge_indices_are_rejected_not_truncated() {
    let list = numbers(4);
    let far = UBig::from(1u8) << 100usize;
    assert!(matches!(list.get(far.clone()), Err(Error::IndexOutOfRange { .. })));
    assert!(list.iter_from(far).is_err());
}

#[test]
fn iteration_and_conversion() {
    let mut list = numbers(30);
    list.reverse_range(5usize, 20usize).unwrap();
    let mut expected: Vec<u32> = (0..30).collect();
    expected[5..25].reverse();

    let collected: Vec<u32> = list.iter().copied().collect();
    assert_eq!(collected, expected);
    let tail: Vec<u32> = list.iter_from(12usize).unwrap().copied().collect();
    assert_eq!(tail, expected[12..]);
    assert_eq!(list.to_vec().unwrap(), expected);

    let from_slice = BigList::from(&expected[..]);
    assert_eq!(from_slice, list);
}

#[test]
fn capacity_round_trip() {
    let mut list = numbers(40);
    list.set_capacity(1000usize).unwrap();
    assert_eq!(list.capacity(), ub(1000));
    list.verify().unwrap();
    list.remove_range(10usize, 25usize).unwrap();
    list.trim_excess().unwrap();
    assert_eq!(list.capacity(), ub(15));
    let expected: Vec<u32> = (0..10).chain(35..40).collect();
    assert_eq!(list, expected);
    list.verify().unwrap();
}
