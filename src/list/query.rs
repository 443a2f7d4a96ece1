//! Linear searches. Each reports through the slow-operation hook before it
//! scans.

use std::collections::VecDeque;
use std::hash::Hash;

use ibig::UBig;
use rustc_hash::FxHashSet;

use super::BigList;
use crate::error::Result;
use crate::num::{big, one, zero};
use crate::profiling::{self, SlowOperation};

impl<T: PartialEq> BigList<T> {
    pub fn contains(&self, item: &T) -> bool {
        profiling::slow_operation(SlowOperation::Contains);
        return self.iter().any(|candidate| candidate == item);
    }

    /// Whether `item` occurs in `index..index + count`.
    pub fn contains_in(&self, item: &T, index: impl Into<UBig>, count: impl Into<UBig>) -> Result<bool> {
        return Ok(self.index_of_in(item, index, count)?.is_some());
    }

    /// Index of the first element equal to `item`.
    pub fn index_of(&self, item: &T) -> Option<UBig> {
        profiling::slow_operation(SlowOperation::IndexOf);
        return self.iter().position(|candidate| candidate == item).map(big);
    }

    /// Index of the first element equal to `item` in `index..index + count`.
    pub fn index_of_in(&self, item: &T, index: impl Into<UBig>, count: impl Into<UBig>) -> Result<Option<UBig>> {
        let (index, count) = (index.into(), count.into());
        self.check_range(&index, &count)?;
        profiling::slow_operation(SlowOperation::IndexOf);
        let mut offset = zero();
        for candidate in self.iter_from(index.clone())? {
            if offset == count {
                break;
            }
            if candidate == item {
                return Ok(Some(index + offset));
            }
            offset += one();
        }
        return Ok(None);
    }

    /// Index of the last element equal to `item`.
    pub fn last_index_of(&self, item: &T) -> Option<UBig> {
        profiling::slow_operation(SlowOperation::LastIndexOf);
        let mut found = None;
        for (offset, candidate) in self.iter().enumerate() {
            if candidate == item {
                found = Some(offset);
            }
        }
        return found.map(big);
    }

    /// Index of the last element equal to `item` in `index..index + count`.
    pub fn last_index_of_in(&self, item: &T, index: impl Into<UBig>, count: impl Into<UBig>) -> Result<Option<UBig>> {
        let (index, count) = (index.into(), count.into());
        self.check_range(&index, &count)?;
        profiling::slow_operation(SlowOperation::LastIndexOf);
        let mut found = None;
        let mut offset = zero();
        for candidate in self.iter_from(index.clone())? {
            if offset == count {
                break;
            }
            if candidate == item {
                found = Some(offset.clone());
            }
            offset += one();
        }
        return Ok(found.map(|offset| index + offset));
    }

    /// Whether `sequence` occurs as a contiguous run. An empty sequence
    /// always does.
    pub fn contains_sequence(&self, sequence: &[T]) -> bool {
        profiling::slow_operation(SlowOperation::ContainsSequence);
        let needle: Vec<&T> = sequence.iter().collect();
        return contains_run(self.iter(), &self.len(), &needle);
    }

    /// Whether `sequence` occurs as a contiguous run inside
    /// `index..index + count`.
    pub fn contains_sequence_in(
        &self,
        sequence: &[T],
        index: impl Into<UBig>,
        count: impl Into<UBig>,
    ) -> Result<bool> {
        let (index, count) = (index.into(), count.into());
        self.check_range(&index, &count)?;
        profiling::slow_operation(SlowOperation::ContainsSequence);
        let needle: Vec<&T> = sequence.iter().collect();
        return Ok(contains_run(self.iter_from(index)?, &count, &needle));
    }

    /// Whether the elements of `other` occur, in order, as a contiguous run.
    pub fn contains_list(&self, other: &BigList<T>) -> bool {
        profiling::slow_operation(SlowOperation::ContainsSequence);
        let needle: Vec<&T> = other.iter().collect();
        return contains_run(self.iter(), &self.len(), &needle);
    }

    /// Whether the elements of `other` occur, in order, as a contiguous run
    /// inside `index..index + count`.
    pub fn contains_list_in(
        &self,
        other: &BigList<T>,
        index: impl Into<UBig>,
        count: impl Into<UBig>,
    ) -> Result<bool> {
        let (index, count) = (index.into(), count.into());
        self.check_range(&index, &count)?;
        profiling::slow_operation(SlowOperation::ContainsSequence);
        let needle: Vec<&T> = other.iter().collect();
        return Ok(contains_run(self.iter_from(index)?, &count, &needle));
    }
}

/// Slide a window of `needle.len()` over the first `count` items of
/// `haystack` and report whether it ever matches.
fn contains_run<'a, 'b, T: PartialEq>(
    haystack: impl Iterator<Item = &'a T>,
    count: &UBig,
    needle: &[&'b T],
) -> bool
where
    T: 'a + 'b,
{
    if needle.is_empty() {
        return true;
    }
    let mut window: VecDeque<&T> = VecDeque::with_capacity(needle.len());
    let mut seen = zero();
    for item in haystack {
        if seen == *count {
            break;
        }
        seen += one();
        if window.len() == needle.len() {
            window.pop_front();
        }
        window.push_back(item);
        if window.len() == needle.len() && window.iter().zip(needle).all(|(have, want)| *have == *want) {
            return true;
        }
    }
    return false;
}

impl<T: Eq + Hash> BigList<T> {
    /// Whether any element is in `items`.
    pub fn contains_any(&self, items: &[T]) -> bool {
        profiling::slow_operation(SlowOperation::ContainsAny);
        let wanted: FxHashSet<&T> = items.iter().collect();
        return self.iter().any(|candidate| wanted.contains(candidate));
    }

    /// Whether any element is outside `items`.
    pub fn contains_any_excluding(&self, items: &[T]) -> bool {
        profiling::slow_operation(SlowOperation::ContainsAnyExcluding);
        let excluded: FxHashSet<&T> = items.iter().collect();
        return self.iter().any(|candidate| !excluded.contains(candidate));
    }

    /// Whether any element of `index..index + count` is in `items`.
    pub fn contains_any_in(&self, items: &[T], index: impl Into<UBig>, count: impl Into<UBig>) -> Result<bool> {
        let (index, count) = (index.into(), count.into());
        self.check_range(&index, &count)?;
        profiling::slow_operation(SlowOperation::ContainsAny);
        let wanted: FxHashSet<&T> = items.iter().collect();
        return self.any_in(index, &count, |candidate| wanted.contains(candidate));
    }

    /// Whether any element of `index..index + count` is outside `items`.
    pub fn contains_any_excluding_in(
        &self,
        items: &[T],
        index: impl Into<UBig>,
        count: impl Into<UBig>,
    ) -> Result<bool> {
        let (index, count) = (index.into(), count.into());
        self.check_range(&index, &count)?;
        profiling::slow_operation(SlowOperation::ContainsAnyExcluding);
        let excluded: FxHashSet<&T> = items.iter().collect();
        return self.any_in(index, &count, |candidate| !excluded.contains(candidate));
    }

    fn any_in(&self, index: UBig, count: &UBig, matches: impl Fn(&T) -> bool) -> Result<bool> {
        let mut offset = zero();
        for candidate in self.iter_from(index)? {
            if offset == *count {
                break;
            }
            if matches(candidate) {
                return Ok(true);
            }
            offset += one();
        }
        return Ok(false);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};

    use super::*;
    use crate::config::BigListConfig;

    fn letters() -> BigList<char> {
        let mut list = BigList::with_config(BigListConfig::new(2, 2).unwrap());
        list.add_range("abracadabra".chars()).unwrap();
        return list;
    }

    #[test]
    fn first_and_last_matches() {
        let list = letters();
        assert!(list.contains(&'c'));
        assert!(!list.contains(&'z'));
        assert_eq!(list.index_of(&'b'), Some(UBig::from(1u8)));
        assert_eq!(list.last_index_of(&'b'), Some(UBig::from(8u8)));
        assert_eq!(list.index_of(&'z'), None);
    }

    #[test]
    fn bounded_searches() {
        let list = letters();
        assert_eq!(list.index_of_in(&'a', 1usize, 4usize).unwrap(), Some(UBig::from(3u8)));
        assert_eq!(list.last_index_of_in(&'a', 1usize, 6usize).unwrap(), Some(UBig::from(5u8)));
        assert!(!list.contains_in(&'d', 7usize, 4usize).unwrap());
        assert!(list.index_of_in(&'a', 8usize, 4usize).is_err());
        assert_eq!(list.index_of_in(&'a', 11usize, 0usize).unwrap(), None);
    }

    #[test]
    fn set_membership() {
        let list = letters();
        assert!(list.contains_any(&['x', 'd']));
        assert!(!list.contains_any(&['x', 'y']));
        assert!(list.contains_any_excluding(&['a', 'b']));
        assert!(!list.contains_any_excluding(&['a', 'b', 'c', 'd', 'r']));
    }

    #[test]
    fn contiguous_runs() {
        let list = letters();
        assert!(list.contains_sequence(&['c', 'a', 'd']));
        assert!(list.contains_sequence(&['a', 'b', 'r', 'a']));
        assert!(!list.contains_sequence(&['a', 'a']));
        assert!(list.contains_sequence(&[]));
        assert!(!list.contains_sequence(&['a'; 12]));

        assert!(list.contains_sequence_in(&['a', 'b', 'r', 'a'], 7usize, 4usize).unwrap());
        assert!(!list.contains_sequence_in(&['a', 'b', 'r', 'a'], 1usize, 9usize).unwrap());
        assert!(list.contains_sequence_in(&[], 11usize, 0usize).unwrap());
        assert!(list.contains_sequence_in(&['a'], 8usize, 4usize).is_err());
    }

    #[test]
    fn contiguous_runs_of_another_list() {
        let list = letters();
        let mut needle = BigList::with_config(BigListConfig::new(2, 2).unwrap());
        needle.add_range("dab".chars()).unwrap();
        assert!(list.contains_list(&needle));
        assert!(!list.contains_list_in(&needle, 0usize, 6usize).unwrap());
        assert!(list.contains_list_in(&needle, 4usize, 7usize).unwrap());
        needle.reverse();
        assert!(!list.contains_list(&needle));
        assert!(list.contains_list_in(&needle, 5usize, 7usize).is_err());
    }

    #[test]
    fn bounded_set_membership() {
        let list = letters();
        assert!(!list.contains_any_in(&['c', 'd'], 7usize, 4usize).unwrap());
        assert!(list.contains_any_in(&['c', 'd'], 3usize, 3usize).unwrap());
        assert!(!list.contains_any_excluding_in(&['a', 'b', 'r'], 7usize, 4usize).unwrap());
        assert!(list.contains_any_excluding_in(&['a', 'b', 'r'], 0usize, 5usize).unwrap());
        assert!(!list.contains_any_in(&['a'], 4usize, 0usize).unwrap());
        assert!(list.contains_any_in(&['a'], 10usize, 2usize).is_err());
        assert!(list.contains_any_excluding_in(&['a'], 12usize, 0usize).is_err());
    }

    static SEEN: AtomicU64 = AtomicU64::new(0);

    fn count_scan(_: SlowOperation) {
        SEEN.fetch_add(1, Ordering::Relaxed);
    }

    #[test]
    fn scans_report_through_the_hook() {
        profiling::set_slow_operation_hook(Some(count_scan));
        let before = SEEN.load(Ordering::Relaxed);
        let list = letters();
        list.contains(&'a');
        list.last_index_of(&'a');
        list.contains_sequence(&['b', 'r']);
        list.contains_any_in(&['r'], 0usize, 3usize).unwrap();
        assert!(SEEN.load(Ordering::Relaxed) >= before + 4);
        profiling::set_slow_operation_hook(None);
    }
}
