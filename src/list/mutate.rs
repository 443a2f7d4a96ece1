//! Structural mutation: insertion, removal, side growth and resizing.

use ibig::UBig;
use prefix_index::PrefixSumIndex;

use super::copy::{copy_range, Across, Direction, Span, Within};
use super::{BigList, Body, NodeIdx, NONE};
use crate::config::BigListConfig;
use crate::error::{Error, Result};
use crate::num::{big, materializable, min, one, small, zero};
use crate::profiling;

// =============================================================================
// Removal (no element bounds)
// =============================================================================

impl<T> BigList<T> {
    /// Remove and return the element at `index`.
    pub fn remove_at(&mut self, index: impl Into<UBig>) -> Result<T> {
        let index = index.into();
        self.check_index(&index)?;
        let mut id = self.root;
        let mut index = index;
        loop {
            let node = self.node(id);
            let position = node.element_position(&index);
            if node.is_leaf() {
                let item = self.leaf_mut(id)?.remove_at(small(&position)?)?;
                self.shrink_length(id, &one())?;
                self.after_removal(id)?;
                self.checked()?;
                return Ok(item);
            }
            let (branch, offset) = self.locate(id, &position)?;
            id = self.branch_at(id, branch)?;
            index = offset;
        }
    }

    /// Remove `count` elements starting at `index`.
    pub fn remove_range(&mut self, index: impl Into<UBig>, count: impl Into<UBig>) -> Result<()> {
        let (index, count) = (index.into(), count.into());
        self.check_range(&index, &count)?;
        if count == zero() {
            return Ok(());
        }
        if count == self.node(self.root).length {
            self.collapse();
            return self.checked();
        }

        // Descend while the range fits in one branch.
        let mut id = self.root;
        let mut start = index;
        loop {
            let node = self.node(id);
            let position = node.range_position(&start, &count);
            if node.is_leaf() {
                self.leaf_mut(id)?.remove_range(small(&position)?, small(&count)?)?;
                self.shrink_length(id, &count)?;
                self.after_removal(id)?;
                return self.checked();
            }
            let (first, first_offset) = self.locate(id, &position)?;
            let (last, last_offset) = self.locate(id, &(&position + &count - one()))?;
            if first == last {
                id = self.branch_at(id, first)?;
                start = first_offset;
                continue;
            }

            // Head: the logical tail of the first branch.
            let head = self.branch_at(id, first)?;
            let head_count = &self.node(head).length - &first_offset;
            self.remove_side(head, false, &head_count)?;

            for index in first + 1..last {
                let branch = self.branch_at(id, index)?;
                self.clear_branch(branch)?;
            }

            // Tail: the logical front of the last branch.
            let tail = self.branch_at(id, last)?;
            self.remove_side(tail, true, &(last_offset + one()))?;

            self.recycle_block(id, first, last)?;
            self.after_removal(id)?;
            return self.checked();
        }
    }

    /// Remove every element from `index` to the end.
    pub fn remove_end(&mut self, index: impl Into<UBig>) -> Result<()> {
        let index = index.into();
        self.check_gap(&index)?;
        let count = self.len() - &index;
        return self.remove_range(index, count);
    }

    /// Remove every element, collapsing to a single empty leaf.
    pub fn clear(&mut self) {
        self.collapse();
    }

    /// The single-argument removal is ambiguous between removing by index
    /// and by value; use [`remove_at`](Self::remove_at) or
    /// [`remove_value`](Self::remove_value).
    #[deprecated(note = "use remove_at or remove_value")]
    pub fn remove(&mut self, _index: impl Into<UBig>) -> Result<()> {
        warn_log!("ambiguous remove called; nothing was removed");
        return Err(Error::Unsupported { operation: "remove" });
    }

    /// Remove `count` elements from the logical front (`front_of_view`) or
    /// back of branch `id`.
    fn remove_side(&mut self, id: NodeIdx, front_of_view: bool, count: &UBig) -> Result<()> {
        let node = self.node(id);
        if *count == node.length {
            return self.clear_branch(id);
        }
        let back = front_of_view == node.reversed;
        return self.truncate_side(id, back, count);
    }

    /// Drop `count` elements from one positional side of `id`.
    fn truncate_side(&mut self, id: NodeIdx, back: bool, count: &UBig) -> Result<()> {
        let mut tasks = vec![(id, back, count.clone())];
        while let Some((id, back, count)) = tasks.pop() {
            if count == zero() {
                continue;
            }
            if self.node(id).is_leaf() {
                self.leaf_mut(id)?.truncate_side(back, small(&count)?)?;
                self.shrink_length(id, &count)?;
                continue;
            }
            let mut order = self.branches(id)?.0.to_vec();
            if back {
                order.reverse();
            }
            let mut remaining = count;
            for branch in order {
                if remaining == zero() {
                    break;
                }
                let node = self.node(branch);
                if node.length == zero() {
                    continue;
                }
                if remaining >= node.length {
                    remaining -= &node.length;
                    self.clear_branch(branch)?;
                } else {
                    tasks.push((branch, back ^ node.reversed, remaining));
                    remaining = zero();
                }
            }
            if remaining != zero() {
                return Err(Error::internal("truncation past the end of a node"));
            }
        }
        return Ok(());
    }

    /// Drop every element below `id`, keeping its shape.
    fn clear_branch(&mut self, id: NodeIdx) -> Result<()> {
        let length = self.node(id).length.clone();
        if length == zero() {
            return Ok(());
        }
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            let node = self.node_mut(current);
            if current != id {
                node.length = zero();
            }
            match &mut node.body {
                Body::Leaf(leaf) => leaf.dispose(),
                Body::Branches { branches, high_length } => {
                    *high_length = PrefixSumIndex::with_zeros(branches.len());
                    pending.extend(branches.iter().copied());
                }
            }
        }
        return self.shrink_length(id, &length);
    }

    /// Bookkeeping after elements were removed below `id`: collapse an empty
    /// list, otherwise move the topmost emptied branch out of the way.
    fn after_removal(&mut self, id: NodeIdx) -> Result<()> {
        if self.node(self.root).length == zero() {
            self.collapse();
            return Ok(());
        }
        let mut emptied = None;
        let mut current = id;
        while current != self.root && self.node(current).length == zero() {
            emptied = Some(current);
            current = self.node(current).parent;
        }
        if let Some(branch) = emptied {
            let (parent, index) = (self.node(branch).parent, self.node(branch).index_in_parent);
            self.recycle(parent, index as usize)?;
        }
        return Ok(());
    }

    /// Move an empty branch to the end of its parent's array, or just before
    /// a partially sized last branch.
    fn recycle(&mut self, parent: NodeIdx, index: usize) -> Result<()> {
        let (branches, _) = self.branches(parent)?;
        let count = branches.len();
        if index + 1 >= count {
            return Ok(());
        }
        let last = branches[count - 1];
        let target = if self.node(last).capacity < self.node(parent).fragment {
            count - 2
        } else {
            count - 1
        };
        if index >= target {
            return Ok(());
        }
        return self.move_branch(parent, index, target);
    }

    /// After a removal spanning branches `first..=last` of `id`, move the
    /// block of branches it emptied to the end of the array, or just before a
    /// partially sized last branch.
    fn recycle_block(&mut self, id: NodeIdx, first: usize, last: usize) -> Result<()> {
        let (branches, _) = self.branches(id)?;
        let count = branches.len();
        let end = if self.node(branches[count - 1]).capacity < self.node(id).fragment {
            count - 1
        } else {
            count
        };
        let from = if self.node(branches[first]).length == zero() { first } else { first + 1 };
        let mut to = if self.node(branches[last]).length == zero() { last + 1 } else { last };
        to = to.min(end);
        if from >= to || to == end {
            return Ok(());
        }

        let moved = to - from;
        let (branches, high_length) = self.branches_mut(id)?;
        branches[from..end].rotate_left(moved);
        if !high_length.remove(from..to) {
            return Err(Error::internal("branch array and index disagree"));
        }
        for index in end - moved..end {
            if !high_length.insert(index, zero()) {
                return Err(Error::internal("branch array and index disagree"));
            }
        }
        return self.relink_range(id, from, end);
    }

    /// Move branch `from` of `id` so that it ends up at index `to`.
    fn move_branch(&mut self, id: NodeIdx, from: usize, to: usize) -> Result<()> {
        if from == to {
            return Ok(());
        }
        let (branches, high_length) = self.branches_mut(id)?;
        let branch = branches.remove(from);
        let Some(length) = high_length.remove_at(from) else {
            return Err(Error::internal("branch array and index disagree"));
        };
        branches.insert(to, branch);
        if !high_length.insert(to, length) {
            return Err(Error::internal("branch array and index disagree"));
        }
        return self.relink_range(id, from.min(to), from.max(to) + 1);
    }

    // =========================================================================
    // Room probing
    // =========================================================================

    /// Elements that fit at one positional side of `id` without moving
    /// anything.
    fn side_room(&self, id: NodeIdx, back: bool) -> Result<UBig> {
        let mut total = zero();
        let mut id = id;
        let mut back = back;
        loop {
            let node = self.node(id);
            if node.is_leaf() {
                return Ok(total + (&node.capacity - &node.length));
            }
            let mut order = self.branches(id)?.0.to_vec();
            if back {
                order.reverse();
            }
            let mut boundary = None;
            for branch in order {
                let child = self.node(branch);
                if child.length == zero() {
                    total += &child.capacity;
                } else {
                    boundary = Some((branch, back ^ child.reversed));
                    break;
                }
            }
            match boundary {
                Some((branch, side)) => {
                    id = branch;
                    back = side;
                }
                None => return Ok(total),
            }
        }
    }

    /// Branch of `id` that can take an insertion at positional gap `position`,
    /// and the logical offset inside it.
    ///
    /// Candidates are the branch containing the gap plus every branch ending
    /// exactly at it; the leftmost candidate with room wins.
    fn pick_branch(&self, id: NodeIdx, position: &UBig) -> Result<Option<(NodeIdx, UBig)>> {
        let (branches, high_length) = self.branches(id)?;
        let (containing, remainder) = high_length.index_of_not_greater_sum(position);
        let mut first = containing;
        if remainder == zero() {
            while first > 0 {
                first -= 1;
                if self.node(branches[first]).length != zero() {
                    break;
                }
            }
        }
        let end = (containing + 1).min(branches.len());
        for index in first..end {
            let node = self.node(branches[index]);
            if !node.has_room() {
                continue;
            }
            let offset = if index == containing {
                remainder.clone()
            } else {
                node.length.clone()
            };
            return Ok(Some((branches[index], offset)));
        }
        return Ok(None);
    }

    /// Empty branch of `id` closest to branch `index`, searching both ways.
    fn nearest_empty(&self, id: NodeIdx, index: usize) -> Result<Option<usize>> {
        let (branches, _) = self.branches(id)?;
        let empty = |at: usize| self.node(branches[at]).length == zero();
        for distance in 1..branches.len() {
            if index >= distance && empty(index - distance) {
                return Ok(Some(index - distance));
            }
            if index + distance < branches.len() && empty(index + distance) {
                return Ok(Some(index + distance));
            }
        }
        return Ok(None);
    }
}

// =============================================================================
// Insertion and growth
// =============================================================================

impl<T: Clone> BigList<T> {
    /// Build a list from a vector with the given configuration.
    pub fn from_vec_in(config: BigListConfig, items: Vec<T>) -> Result<BigList<T>> {
        let mut list = BigList::with_config(config);
        if items.is_empty() {
            return Ok(list);
        }
        list.set_capacity(items.len())?;
        let root = list.root;
        let leaves = list.plain_leaves(root);
        list.distribute(&leaves, items, false)?;
        list.recount(root)?;
        list.checked()?;
        return Ok(list);
    }

    /// Append `item` at the logical end.
    pub fn add(&mut self, item: T) -> Result<()> {
        let len = self.len();
        return self.insert(len, item);
    }

    /// Append every item of `items`.
    pub fn add_range(&mut self, items: impl IntoIterator<Item = T>) -> Result<()> {
        let len = self.len();
        return self.insert_iter(len, items);
    }

    /// Insert `item` so that it ends up at `index`.
    pub fn insert(&mut self, index: impl Into<UBig>, item: T) -> Result<()> {
        let index = index.into();
        self.check_gap(&index)?;
        self.insert_items(index, vec![item])?;
        return self.checked();
    }

    /// Insert all of `items` starting at `index`.
    pub fn insert_iter(&mut self, index: impl Into<UBig>, items: impl IntoIterator<Item = T>) -> Result<()> {
        let index = index.into();
        self.check_gap(&index)?;
        self.insert_items(index, items.into_iter().collect())?;
        return self.checked();
    }

    /// Insert a copy of `other` starting at `index`.
    pub fn insert_range(&mut self, index: impl Into<UBig>, other: &BigList<T>) -> Result<()> {
        let index = index.into();
        self.check_gap(&index)?;
        let count = other.len();
        if count == zero() {
            return Ok(());
        }
        let old_len = self.len();
        let filler = other.get_ref(&zero())?.clone();
        self.grow_side(&count, &filler, true)?;

        if index < old_len {
            profiling::shift();
            let tail = &old_len - &index;
            let src = self.root_span(&index, &tail);
            let dst = self.root_span(&(&index + &count), &tail);
            copy_range(&mut Within(self), src, dst, tail, Direction::RightToLeft)?;
        }
        let src = other.root_span(&zero(), &count);
        let dst = self.root_span(&index, &count);
        copy_range(
            &mut Across {
                source: other,
                target: &mut *self,
            },
            src,
            dst,
            count,
            Direction::LeftToRight,
        )?;
        return self.checked();
    }

    /// Overwrite the element at `index`, or append when `index` is the length.
    pub fn set_or_add(&mut self, index: impl Into<UBig>, value: T) -> Result<()> {
        let index = index.into();
        if index == self.node(self.root).length {
            return self.add(value);
        }
        return self.set(index, value);
    }

    /// Replace the whole contents with a copy of `other`.
    pub fn replace(&mut self, other: &BigList<T>) -> Result<()> {
        self.collapse();
        return self.insert_range(zero(), other);
    }

    /// Grow or shrink at the logical end; new slots hold `value`.
    pub fn resize(&mut self, len: impl Into<UBig>, value: T) -> Result<()> {
        let len = len.into();
        let current = self.len();
        if len < current {
            return self.remove_range(len.clone(), &current - &len);
        }
        self.grow_side(&(&len - &current), &value, true)?;
        return self.checked();
    }

    /// Grow or shrink at the logical front; new slots hold `value`.
    pub fn resize_left(&mut self, len: impl Into<UBig>, value: T) -> Result<()> {
        let len = len.into();
        let current = self.len();
        if len < current {
            return self.remove_range(zero(), &current - &len);
        }
        self.grow_side(&(&len - &current), &value, false)?;
        return self.checked();
    }

    /// Add `count` copies of `filler` at the logical end (or front).
    pub(super) fn grow_side(&mut self, count: &UBig, filler: &T, at_end: bool) -> Result<()> {
        if *count == zero() {
            return Ok(());
        }
        let wanted = self.len() + count;
        self.ensure_capacity(wanted)?;
        let root = self.root;
        let back = at_end != self.node(root).reversed;
        if self.side_room(root, back)? < *count {
            self.pack(root, !back)?;
        }
        return self.extend_side(root, back, count, filler);
    }

    /// Add `count` copies of `filler` at one positional side of `id`, using
    /// only the room already there.
    fn extend_side(&mut self, id: NodeIdx, back: bool, count: &UBig, filler: &T) -> Result<()> {
        let mut tasks = vec![(id, back, count.clone())];
        while let Some((id, back, count)) = tasks.pop() {
            if count == zero() {
                continue;
            }
            if self.node(id).is_leaf() {
                self.leaf_mut(id)?.extend_side(back, small(&count)?, filler)?;
                self.grow_length(id, &count)?;
                continue;
            }
            let mut order = self.branches(id)?.0.to_vec();
            if back {
                order.reverse();
            }
            let mut remaining = count;
            for branch in order {
                if remaining == zero() {
                    break;
                }
                let node = self.node(branch);
                if node.length == zero() {
                    let take = min(&remaining, &node.capacity);
                    remaining -= &take;
                    self.fill_empty(branch, &take, filler)?;
                } else {
                    let side = back ^ node.reversed;
                    let take = min(&remaining, &self.side_room(branch, side)?);
                    remaining -= &take;
                    tasks.push((branch, side, take));
                    break;
                }
            }
            if remaining != zero() {
                return Err(Error::internal("not enough room at the side of a node"));
            }
        }
        return Ok(());
    }

    /// Put `count` copies of `filler` into the empty branch `id`.
    fn fill_empty(&mut self, id: NodeIdx, count: &UBig, filler: &T) -> Result<()> {
        let items = vec![filler.clone(); materializable(count)?];
        let leaves = self.plain_leaves(id);
        self.distribute(&leaves, items, false)?;
        self.recount(id)?;
        return self.propagate_length(id, count, true);
    }

    /// Insert `items` in order starting at logical gap `index`, one leaf's
    /// worth at a time.
    pub(super) fn insert_items(&mut self, index: UBig, items: Vec<T>) -> Result<()> {
        if items.is_empty() {
            return Ok(());
        }
        let wanted = self.len() + big(items.len());
        self.ensure_capacity(wanted)?;
        let mut at = index;
        let mut rest = items.into_iter();
        while rest.len() > 0 {
            let placed = self.place_chunk(&at, &mut rest)?;
            at += big(placed);
        }
        return Ok(());
    }

    /// Descend to the leaf at logical gap `index` and move as many of `rest`
    /// into it as fit. Returns how many were placed.
    fn place_chunk(&mut self, index: &UBig, rest: &mut std::vec::IntoIter<T>) -> Result<usize> {
        let mut id = self.root;
        let mut at = index.clone();
        // Whether the positional order of `id` runs against the list order.
        let mut flip = false;
        loop {
            let node = self.node(id);
            if !node.has_room() {
                return Err(Error::internal("descended into a full node"));
            }
            let position = node.gap_position(&at);
            flip ^= node.reversed;
            if node.is_leaf() {
                let take = self.leaf(id)?.room().min(rest.len());
                let mut chunk: Vec<T> = rest.by_ref().take(take).collect();
                if flip {
                    chunk.reverse();
                }
                self.leaf_mut(id)?.insert_chunk(small(&position)?, chunk)?;
                self.grow_length(id, &big(take))?;
                return Ok(take);
            }
            match self.pick_branch(id, &position)? {
                Some((branch, offset)) => {
                    id = branch;
                    at = offset;
                }
                None => {
                    self.make_room(id, &position)?;
                    id = self.root;
                    at = index.clone();
                    flip = false;
                }
            }
        }
    }

    /// No branch touching `position` has room. In order of preference: grow a
    /// partial last branch, pass elements from a full leaf to its neighbour,
    /// split the full branch into the nearest empty one, merge two branches
    /// next to it, or open an empty sibling for the node itself higher up.
    fn make_room(&mut self, id: NodeIdx, position: &UBig) -> Result<()> {
        let (branches, high_length) = self.branches(id)?;
        let count = branches.len();
        let (containing, _) = high_length.index_of_not_greater_sum(position);
        let full_index = containing.min(count - 1);
        let full = branches[full_index];
        let fragment = self.node(id).fragment.clone();

        if full_index == count - 1 && self.node(full).capacity < fragment {
            return self.grow_capacity(full, fragment);
        }
        if self.redistribute(id, full_index, position)? {
            return Ok(());
        }
        if let Some(empty_index) = self.nearest_empty(id, full_index)? {
            return self.split_into(id, full_index, empty_index);
        }
        if let Some(left) = self.mergeable_pair(id, full_index)? {
            return self.merge_pair(id, left);
        }
        return self.open_sibling(id);
    }

    /// Walk up from the dense node `id` to the first ancestor level that can
    /// take half of it: grow a partial last branch, split into an empty
    /// sibling, or merge two branches next to it in the parent. The root
    /// grows by one fragment.
    fn open_sibling(&mut self, id: NodeIdx) -> Result<()> {
        let mut current = id;
        loop {
            let parent = self.node(current).parent;
            if parent == NONE {
                let root = self.node(current);
                let target = &root.capacity + &root.fragment;
                debug_log!(to = %target, "growing the root for a dense node");
                return self.grow_capacity(current, target);
            }
            let index = self.node(current).index_in_parent as usize;
            let fragment = self.node(parent).fragment.clone();
            let count = self.branches(parent)?.0.len();
            if index == count - 1 && self.node(current).capacity < fragment {
                return self.grow_capacity(current, fragment);
            }
            if let Some(empty_index) = self.nearest_empty(parent, index)? {
                return self.split_into(parent, index, empty_index);
            }
            if let Some(left) = self.mergeable_pair(parent, index)? {
                return self.merge_pair(parent, left);
            }
            current = parent;
        }
    }

    /// Move the empty branch next to the full one and hand it the full
    /// branch's logical back half.
    fn split_into(&mut self, id: NodeIdx, full_index: usize, empty_index: usize) -> Result<()> {
        profiling::split();
        let full = self.branch_at(id, full_index)?;
        let empty = self.branch_at(id, empty_index)?;
        let fragment = self.node(id).fragment.clone();
        let count = self.branches(id)?.0.len();

        if empty_index == count - 1 && self.node(empty).capacity < fragment {
            self.grow_capacity(empty, fragment)?;
        }
        let target = if empty_index < full_index { full_index } else { full_index + 1 };
        self.move_branch(id, empty_index, target)?;
        debug_log!(node = id, branch = full_index, "splitting full branch");
        return self.hand_over(full, empty);
    }
}

impl<T: PartialEq> BigList<T> {
    /// Remove the first element equal to `item`. Returns whether one was found.
    pub fn remove_value(&mut self, item: &T) -> Result<bool> {
        profiling::slow_operation(profiling::SlowOperation::RemoveValue);
        let found = self.iter().position(|candidate| candidate == item);
        match found {
            Some(offset) => {
                self.remove_at(big(offset))?;
                return Ok(true);
            }
            None => return Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> BigListConfig {
        return BigListConfig::new(2, 2).unwrap();
    }

    fn numbers(count: u32) -> BigList<u32> {
        return BigList::from_vec_in(small_config(), (0..count).collect()).unwrap();
    }

    #[test]
    fn insert_front_middle_back() {
        let mut list = BigList::with_config(small_config());
        let mut oracle = Vec::new();
        for i in 0..60u32 {
            let at = match i % 3 {
                0 => 0,
                1 => oracle.len() / 2,
                _ => oracle.len(),
            };
            list.insert(at, i).unwrap();
            oracle.insert(at, i);
            list.verify().unwrap();
        }
        assert_eq!(list.to_vec().unwrap(), oracle);
    }

    #[test]
    fn insert_into_full_branch_splits() {
        let mut list = numbers(16);
        list.set_capacity(17usize).unwrap();
        list.insert(5usize, 99).unwrap();
        let mut expected: Vec<u32> = (0..16).collect();
        expected.insert(5, 99);
        assert_eq!(list.to_vec().unwrap(), expected);
        assert_eq!(list.capacity(), UBig::from(32u8));
        list.verify().unwrap();
    }

    #[test]
    fn dense_node_opens_a_sibling_instead_of_shifting() {
        let mut list = BigList::with_capacity(small_config(), 16usize).unwrap();
        for i in 0..15u32 {
            list.add(i).unwrap();
        }
        list.insert(0usize, 99).unwrap();
        let expected: Vec<u32> = std::iter::once(99).chain(0..15).collect();
        assert_eq!(list.to_vec().unwrap(), expected);
        // The root grew by one fragment and the old body was split across it.
        assert_eq!(list.capacity(), UBig::from(32u8));
        list.verify().unwrap();
    }

    fn root_lengths(list: &BigList<u32>) -> Vec<UBig> {
        let (branches, _) = list.branches(list.root).unwrap();
        return branches.iter().map(|&b| list.node(b).length.clone()).collect();
    }

    #[test]
    fn full_leaf_passes_elements_to_its_neighbour() {
        for reversed in [false, true] {
            let mut list = BigList::with_capacity(small_config(), 16usize).unwrap();
            list.add_range(0..16u32).unwrap();
            let mut oracle: Vec<u32> = (0..16).collect();
            if reversed {
                list.reverse();
                oracle.reverse();
            }
            // Leaves hold 0..4, 4..8, ... positionally; leave room in the second.
            let gone = if reversed { 10usize } else { 5 };
            list.remove_at(gone).unwrap();
            oracle.remove(gone);
            let at = if reversed { 14usize } else { 1 };
            list.insert(at, 99).unwrap();
            oracle.insert(at, 99);

            assert_eq!(list.to_vec().unwrap(), oracle);
            assert_eq!(list.capacity(), UBig::from(16u8));
            assert_eq!(root_lengths(&list), vec![UBig::from(4u8); 4]);
            list.verify().unwrap();
        }
    }

    #[test]
    fn sparse_neighbours_merge_by_handing_over_branches() {
        let mut list = BigList::with_capacity(small_config(), 64usize).unwrap();
        list.add_range(0..64u32).unwrap();
        let mut oracle: Vec<u32> = (0..64).collect();
        list.remove_range(16usize, 8usize).unwrap();
        oracle.drain(16..24);
        list.reverse_range(16usize, 8usize).unwrap();
        oracle[16..24].reverse();
        list.remove_range(24usize, 8usize).unwrap();
        oracle.drain(24..32);
        let eight = UBig::from(8u8);
        let sixteen = UBig::from(16u8);
        assert_eq!(root_lengths(&list), vec![sixteen.clone(), eight.clone(), eight, sixteen]);

        list.insert(0usize, 99).unwrap();
        oracle.insert(0, 99);
        assert_eq!(list.to_vec().unwrap(), oracle);
        assert_eq!(list.capacity(), UBig::from(64u8));
        list.verify().unwrap();
    }

    #[test]
    fn front_inserts_keep_shape() {
        let mut list = BigList::with_config(small_config());
        for i in 0..300u32 {
            list.insert(0usize, i).unwrap();
        }
        list.verify().unwrap();
        assert_eq!(list.to_vec().unwrap(), (0..300).rev().collect::<Vec<u32>>());
        assert!(list.capacity() < UBig::from(2400u32));
    }

    #[test]
    fn insert_iter_into_reversed_list() {
        let mut list = numbers(40);
        let mut oracle: Vec<u32> = (0..40).collect();
        list.reverse();
        oracle.reverse();
        list.insert_iter(7usize, 100..130).unwrap();
        oracle.splice(7..7, 100..130);
        assert_eq!(list.to_vec().unwrap(), oracle);
        list.verify().unwrap();
    }

    #[test]
    fn emptied_block_moves_behind_occupied_branches() {
        let mut list = numbers(256);
        // Clears the middle root branches and half of the outer ones.
        list.remove_range(32usize, 192usize).unwrap();
        list.verify().unwrap();
        assert_eq!(root_lengths(&list), vec![UBig::from(32u8), UBig::from(32u8), zero(), zero()]);
        let expected: Vec<u32> = (0..32).chain(224..256).collect();
        assert_eq!(list.to_vec().unwrap(), expected);
    }

    #[test]
    fn remove_range_across_branches() {
        let mut list = numbers(64);
        list.remove_range(3usize, 50usize).unwrap();
        list.verify().unwrap();
        let expected: Vec<u32> = (0..3).chain(53..64).collect();
        assert_eq!(list.to_vec().unwrap(), expected);
        list.add(100).unwrap();
        list.insert(1usize, 101).unwrap();
        list.verify().unwrap();
    }

    #[test]
    fn removing_everything_collapses() {
        let mut list = numbers(40);
        while !list.is_empty() {
            let last = list.len() - UBig::from(1u8);
            list.remove_at(last).unwrap();
        }
        assert_eq!(list.depth(), 1);
        assert!(list.remove_at(0usize).is_err());
    }

    #[test]
    fn resize_both_sides() {
        let mut list = numbers(5);
        list.resize(8usize, 7).unwrap();
        list.resize_left(10usize, 1).unwrap();
        assert_eq!(list.to_vec().unwrap(), vec![1, 1, 0, 1, 2, 3, 4, 7, 7, 7]);
        list.resize_left(4usize, 0).unwrap();
        list.resize(2usize, 0).unwrap();
        assert_eq!(list.to_vec().unwrap(), vec![4, 7]);
    }

    #[test]
    fn remove_value_and_legacy_remove() {
        let mut list = numbers(10);
        assert!(list.remove_value(&4).unwrap());
        assert!(!list.remove_value(&4).unwrap());
        assert_eq!(list.len(), UBig::from(9u8));
        #[allow(deprecated)]
        let legacy = list.remove(0usize);
        assert!(matches!(legacy, Err(Error::Unsupported { .. })));
    }

    #[test]
    fn set_or_add_and_replace() {
        let mut list = numbers(3);
        list.set_or_add(3usize, 30).unwrap();
        list.set_or_add(0usize, 10).unwrap();
        assert!(list.set_or_add(9usize, 1).is_err());
        assert_eq!(list.to_vec().unwrap(), vec![10, 1, 2, 30]);
        let other = numbers(25);
        list.replace(&other).unwrap();
        assert_eq!(list, other);
    }
}
