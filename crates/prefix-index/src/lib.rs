//! Prefix-sum index over big unsigned integers.
//!
//! An ordered sequence of non-negative arbitrary-precision integers that can
//! answer "which entry holds cumulative offset X" in O(log n). It backs the
//! per-branch length bookkeeping of the big-list engine, where each entry is
//! the occupied length of one branch.
//!
//! # Structure
//!
//! Entries live in a `Vec` arena and form an implicit treap:
//!
//! - in-order position is the sequence index (no stored keys)
//! - heap order on a random priority keeps the expected depth logarithmic
//! - every entry caches its subtree entry count and subtree value sum
//!
//! Positional operations (`get`, `set`, `insert`, `remove_at`) descend by
//! counts; cumulative operations (`index_of_not_greater_sum`, `prefix_sum`)
//! descend by sums. Both touch a single root-to-leaf path.
//!
//! ```
//! use ibig::UBig;
//! use prefix_index::PrefixSumIndex;
//!
//! let mut index = PrefixSumIndex::new();
//! index.add(UBig::from(4u8));
//! index.add(UBig::from(0u8));
//! index.add(UBig::from(3u8));
//!
//! assert_eq!(index.values_sum(), UBig::from(7u8));
//! // Offset 5 lands one past the start of entry 2; the empty entry 1 is skipped.
//! assert_eq!(index.index_of_not_greater_sum(&UBig::from(5u8)), (2, UBig::from(1u8)));
//! ```

use std::ops::Range;

use ibig::UBig;

/// Index into the entry arena.
type Idx = u32;
/// Sentinel for "no entry".
const NONE_IDX: Idx = u32::MAX;

/// One value of the sequence plus its treap links.
#[derive(Clone, Debug)]
struct Entry {
    /// The stored value.
    value: UBig,
    /// Sum of all values in this subtree.
    sum: UBig,
    /// Number of entries in this subtree.
    count: u32,
    /// Heap priority; parents always have a higher priority than children.
    priority: u64,
    /// Parent.
    p: Idx,
    /// Left child.
    l: Idx,
    /// Right child.
    r: Idx,
}

impl Entry {
    fn new(value: UBig, priority: u64) -> Entry {
        return Entry {
            sum: value.clone(),
            value,
            count: 1,
            priority,
            p: NONE_IDX,
            l: NONE_IDX,
            r: NONE_IDX,
        };
    }
}

/// Ordered sequence of big unsigned integers with logarithmic prefix sums.
#[derive(Clone, Debug)]
pub struct PrefixSumIndex {
    /// Arena of entries. Slots on the free list are garbage.
    entries: Vec<Entry>,
    /// Root of the treap.
    root: Idx,
    /// Free list for reusing removed entry slots.
    free_list: Vec<Idx>,
    /// Xorshift state for priorities.
    rand_state: u64,
    /// Shared zero returned for empty subtrees.
    zero: UBig,
}

impl Default for PrefixSumIndex {
    fn default() -> Self {
        return Self::new();
    }
}

impl PrefixSumIndex {
    /// Create an empty index.
    pub fn new() -> PrefixSumIndex {
        return PrefixSumIndex {
            entries: Vec::new(),
            root: NONE_IDX,
            free_list: Vec::new(),
            rand_state: 0x2545_f491_4f6c_dd1d,
            zero: UBig::from(0u8),
        };
    }

    /// Create an index holding `len` zero entries.
    pub fn with_zeros(len: usize) -> PrefixSumIndex {
        let mut index = PrefixSumIndex::new();
        index.entries.reserve(len);
        for _ in 0..len {
            index.add(UBig::from(0u8));
        }
        return index;
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        return self.count_of(self.root) as usize;
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        return self.root == NONE_IDX;
    }

    /// Sum of every entry.
    #[inline]
    pub fn values_sum(&self) -> UBig {
        return self.sum_of(self.root).clone();
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.free_list.clear();
        self.root = NONE_IDX;
    }

    // =========================================================================
    // Arena helpers
    // =========================================================================

    #[inline(always)]
    fn count_of(&self, idx: Idx) -> u32 {
        if idx == NONE_IDX {
            return 0;
        }
        return self.entries[idx as usize].count;
    }

    #[inline(always)]
    fn sum_of(&self, idx: Idx) -> &UBig {
        if idx == NONE_IDX {
            return &self.zero;
        }
        return &self.entries[idx as usize].sum;
    }

    fn random_priority(&mut self) -> u64 {
        self.rand_state ^= self.rand_state << 13;
        self.rand_state ^= self.rand_state >> 7;
        self.rand_state ^= self.rand_state << 17;
        return self.rand_state;
    }

    fn alloc_entry(&mut self, value: UBig) -> Idx {
        let priority = self.random_priority();
        let entry = Entry::new(value, priority);
        if let Some(idx) = self.free_list.pop() {
            self.entries[idx as usize] = entry;
            return idx;
        }
        let idx = self.entries.len() as Idx;
        self.entries.push(entry);
        return idx;
    }

    /// Recompute the cached count and sum of one entry from its children.
    #[inline]
    fn update(&mut self, idx: Idx) {
        let entry = &self.entries[idx as usize];
        let (l, r) = (entry.l, entry.r);
        let count = 1 + self.count_of(l) + self.count_of(r);
        let sum = self.sum_of(l) + &entry.value + self.sum_of(r);
        let entry = &mut self.entries[idx as usize];
        entry.count = count;
        entry.sum = sum;
    }

    /// Recompute cached aggregates from `idx` up to the root.
    fn update_ancestors(&mut self, idx: Idx) {
        let mut current = idx;
        while current != NONE_IDX {
            self.update(current);
            current = self.entries[current as usize].p;
        }
    }

    /// Replace `old` with `new` in the child slot of `parent`.
    fn replace_child(&mut self, parent: Idx, old: Idx, new: Idx) {
        if parent == NONE_IDX {
            self.root = new;
            return;
        }
        let parent = &mut self.entries[parent as usize];
        if parent.l == old {
            parent.l = new;
        } else {
            parent.r = new;
        }
    }

    /// Right rotation: the left child of `idx` takes its place.
    fn rotate_right(&mut self, idx: Idx) {
        let left_idx = self.entries[idx as usize].l;
        if left_idx == NONE_IDX {
            return;
        }
        let parent_idx = self.entries[idx as usize].p;
        let left_right = self.entries[left_idx as usize].r;

        self.entries[left_idx as usize].p = parent_idx;
        self.entries[left_idx as usize].r = idx;
        self.entries[idx as usize].p = left_idx;
        self.entries[idx as usize].l = left_right;
        if left_right != NONE_IDX {
            self.entries[left_right as usize].p = idx;
        }
        self.replace_child(parent_idx, idx, left_idx);

        self.update(idx);
        self.update(left_idx);
    }

    /// Left rotation: the right child of `idx` takes its place.
    fn rotate_left(&mut self, idx: Idx) {
        let right_idx = self.entries[idx as usize].r;
        if right_idx == NONE_IDX {
            return;
        }
        let parent_idx = self.entries[idx as usize].p;
        let right_left = self.entries[right_idx as usize].l;

        self.entries[right_idx as usize].p = parent_idx;
        self.entries[right_idx as usize].l = idx;
        self.entries[idx as usize].p = right_idx;
        self.entries[idx as usize].r = right_left;
        if right_left != NONE_IDX {
            self.entries[right_left as usize].p = idx;
        }
        self.replace_child(parent_idx, idx, right_idx);

        self.update(idx);
        self.update(right_idx);
    }

    /// Find the arena slot of the entry at `index`. Caller checks bounds.
    fn node_at(&self, index: usize) -> Idx {
        let mut current = self.root;
        let mut index = index as u32;
        loop {
            let entry = &self.entries[current as usize];
            let left = self.count_of(entry.l);
            if index < left {
                current = entry.l;
            } else if index == left {
                return current;
            } else {
                index -= left + 1;
                current = entry.r;
            }
        }
    }

    // =========================================================================
    // Positional access
    // =========================================================================

    /// Value at `index`.
    pub fn get(&self, index: usize) -> Option<&UBig> {
        if index >= self.len() {
            return None;
        }
        let idx = self.node_at(index);
        return Some(&self.entries[idx as usize].value);
    }

    /// Overwrite the value at `index`, returning the old one.
    pub fn set(&mut self, index: usize, value: UBig) -> Option<UBig> {
        if index >= self.len() {
            return None;
        }
        let idx = self.node_at(index);
        let old = std::mem::replace(&mut self.entries[idx as usize].value, value);
        self.update_ancestors(idx);
        return Some(old);
    }

    /// Add `amount` to the value at `index`.
    pub fn increase_by(&mut self, index: usize, amount: &UBig) -> bool {
        if index >= self.len() {
            return false;
        }
        let idx = self.node_at(index);
        self.entries[idx as usize].value += amount;
        self.update_ancestors(idx);
        return true;
    }

    /// Subtract `amount` from the value at `index`. Fails without change when
    /// the value would go negative.
    pub fn decrease_by(&mut self, index: usize, amount: &UBig) -> bool {
        if index >= self.len() {
            return false;
        }
        let idx = self.node_at(index);
        if self.entries[idx as usize].value < *amount {
            return false;
        }
        self.entries[idx as usize].value -= amount;
        self.update_ancestors(idx);
        return true;
    }

    /// Subtract one from the value at `index`.
    pub fn decrease(&mut self, index: usize) -> bool {
        return self.decrease_by(index, &UBig::from(1u8));
    }

    /// Insert `value` so that it ends up at `index`.
    pub fn insert(&mut self, index: usize, value: UBig) -> bool {
        if index > self.len() {
            return false;
        }
        let new_idx = self.alloc_entry(value);
        if self.root == NONE_IDX {
            self.root = new_idx;
            return true;
        }

        // Attach as a leaf at the in-order slot.
        let mut current = self.root;
        let mut index = index as u32;
        loop {
            let entry = &self.entries[current as usize];
            let left = self.count_of(entry.l);
            if index <= left {
                if entry.l == NONE_IDX {
                    self.entries[current as usize].l = new_idx;
                    break;
                }
                current = entry.l;
            } else {
                index -= left + 1;
                if entry.r == NONE_IDX {
                    self.entries[current as usize].r = new_idx;
                    break;
                }
                current = entry.r;
            }
        }
        self.entries[new_idx as usize].p = current;
        self.update_ancestors(current);

        // Restore heap order.
        loop {
            let parent = self.entries[new_idx as usize].p;
            if parent == NONE_IDX {
                break;
            }
            if self.entries[parent as usize].priority >= self.entries[new_idx as usize].priority {
                break;
            }
            if self.entries[parent as usize].l == new_idx {
                self.rotate_right(parent);
            } else {
                self.rotate_left(parent);
            }
        }
        return true;
    }

    /// Append `value`.
    pub fn add(&mut self, value: UBig) {
        let len = self.len();
        self.insert(len, value);
    }

    /// Set the value at `index`, or append when `index == len()`.
    pub fn set_or_add(&mut self, index: usize, value: UBig) -> bool {
        let len = self.len();
        if index == len {
            self.add(value);
            return true;
        }
        return self.set(index, value).is_some();
    }

    /// Remove and return the value at `index`.
    pub fn remove_at(&mut self, index: usize) -> Option<UBig> {
        if index >= self.len() {
            return None;
        }
        let idx = self.node_at(index);

        // Rotate down until at most one child remains.
        loop {
            let entry = &self.entries[idx as usize];
            let (l, r) = (entry.l, entry.r);
            if l == NONE_IDX || r == NONE_IDX {
                break;
            }
            if self.entries[l as usize].priority > self.entries[r as usize].priority {
                self.rotate_right(idx);
            } else {
                self.rotate_left(idx);
            }
        }

        let entry = &self.entries[idx as usize];
        let child = if entry.l != NONE_IDX { entry.l } else { entry.r };
        let parent = entry.p;
        if child != NONE_IDX {
            self.entries[child as usize].p = parent;
        }
        self.replace_child(parent, idx, child);
        self.update_ancestors(parent);

        let value = std::mem::replace(&mut self.entries[idx as usize].value, UBig::from(0u8));
        self.free_list.push(idx);
        return Some(value);
    }

    /// Remove every entry in `range`.
    pub fn remove(&mut self, range: Range<usize>) -> bool {
        if range.start > range.end || range.end > self.len() {
            return false;
        }
        for _ in range.clone() {
            self.remove_at(range.start);
        }
        return true;
    }

    /// Remove every entry from `index` to the end.
    pub fn remove_end(&mut self, index: usize) -> bool {
        let len = self.len();
        if index > len {
            return false;
        }
        return self.remove(index..len);
    }

    /// Reverse the order of the entries in `range`.
    pub fn reverse(&mut self, range: Range<usize>) -> bool {
        if range.start > range.end || range.end > self.len() {
            return false;
        }
        let values: Vec<UBig> = range.clone().filter_map(|i| self.get(i).cloned()).collect();
        for (offset, value) in values.into_iter().rev().enumerate() {
            self.set(range.start + offset, value);
        }
        return true;
    }

    // =========================================================================
    // Cumulative access
    // =========================================================================

    /// Sum of the first `index` entries.
    pub fn prefix_sum(&self, index: usize) -> UBig {
        if index >= self.len() {
            return self.values_sum();
        }
        let mut acc = UBig::from(0u8);
        let mut current = self.root;
        let mut index = index as u32;
        loop {
            let entry = &self.entries[current as usize];
            let left = self.count_of(entry.l);
            if index < left {
                current = entry.l;
                continue;
            }
            acc += self.sum_of(entry.l);
            if index == left {
                return acc;
            }
            acc += &entry.value;
            index -= left + 1;
            current = entry.r;
        }
    }

    /// Find the entry whose cumulative range contains offset `sum`.
    ///
    /// Returns `(index, remainder)` where `index` is the first entry with
    /// `prefix_sum(index + 1) > sum` and `remainder = sum - prefix_sum(index)`.
    /// Zero entries never match. When `sum >= values_sum()` the result is
    /// `(len(), sum - values_sum())`.
    pub fn index_of_not_greater_sum(&self, sum: &UBig) -> (usize, UBig) {
        let total = self.sum_of(self.root);
        if sum >= total {
            return (self.len(), sum - total);
        }
        let mut remainder = sum.clone();
        let mut index = 0usize;
        let mut current = self.root;
        loop {
            let entry = &self.entries[current as usize];
            let left_sum = self.sum_of(entry.l);
            if remainder < *left_sum {
                current = entry.l;
                continue;
            }
            remainder -= left_sum;
            let left = self.count_of(entry.l) as usize;
            if remainder < entry.value {
                return (index + left, remainder);
            }
            remainder -= &entry.value;
            index += left + 1;
            current = entry.r;
        }
    }

    /// In-order iterator over the values.
    pub fn iter(&self) -> Iter<'_> {
        let mut iter = Iter {
            index: self,
            stack: Vec::new(),
        };
        iter.push_left(self.root);
        return iter;
    }
}

/// In-order iterator over a [`PrefixSumIndex`].
pub struct Iter<'a> {
    index: &'a PrefixSumIndex,
    stack: Vec<Idx>,
}

impl<'a> Iter<'a> {
    fn push_left(&mut self, mut idx: Idx) {
        while idx != NONE_IDX {
            self.stack.push(idx);
            idx = self.index.entries[idx as usize].l;
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a UBig;

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.stack.pop()?;
        let entry = &self.index.entries[idx as usize];
        self.push_left(entry.r);
        return Some(&entry.value);
    }
}

impl FromIterator<UBig> for PrefixSumIndex {
    fn from_iter<I: IntoIterator<Item = UBig>>(iter: I) -> Self {
        let mut index = PrefixSumIndex::new();
        for value in iter {
            index.add(value);
        }
        return index;
    }
}
