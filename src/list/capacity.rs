//! Capacity management: canonical subtree creation, growth, shrink and
//! compaction.
//!
//! Growth has two regimes. Linear growth keeps the fragment and appends
//! branches; exponential growth first fills the node to `fanout * fragment`
//! and then wraps its branch array inside a single new branch one level
//! down. Shrink mirrors this: compact, unwrap while the fragment is too large,
//! then release tail branches.
//!
//! Insertion compacts locally. A full leaf passes a few elements to a
//! neighbouring leaf with room, a full branch hands half of its contents to
//! an empty sibling, and two neighbours that fit in one merge into the left
//! one. Internal branches change hands by pointer, so each of these touches
//! at most one leaf's worth of elements. Whole-node packing is left to shrink
//! and side growth.

use ibig::UBig;
use prefix_index::PrefixSumIndex;

use super::{BigList, Body, Node, NodeIdx, NONE};
use crate::error::{Error, Result};
use crate::leaf::LeafStorage;
use crate::num::{big, min, one, small, zero};
use crate::profiling;

/// Capacity used by the first growth of an empty list.
const INITIAL_CAPACITY: usize = 32;

impl<T> BigList<T> {
    #[inline]
    pub(super) fn leaf_size_big(&self) -> UBig {
        return big(self.config.leaf_size());
    }

    #[inline]
    fn fanout_big(&self) -> UBig {
        return big(self.config.fanout());
    }

    /// Smallest `leaf_size * fanout^k` whose `fanout` multiple covers `capacity`.
    pub(super) fn fragment_for(&self, capacity: &UBig) -> UBig {
        let fanout = self.fanout_big();
        let mut fragment = self.leaf_size_big();
        while &fragment * &fanout < *capacity {
            fragment *= &fanout;
        }
        return fragment;
    }

    /// Allocate a node of the given capacity without its branches.
    fn alloc_shell(&mut self, capacity: UBig) -> Result<NodeIdx> {
        if capacity <= self.leaf_size_big() {
            return self.alloc(Node::leaf(small(&capacity)?));
        }
        let fragment = self.fragment_for(&capacity);
        return self.alloc(Node {
            body: Body::Branches {
                branches: Vec::new(),
                high_length: PrefixSumIndex::new(),
            },
            length: zero(),
            capacity,
            fragment,
            parent: NONE,
            index_in_parent: 0,
            reversed: false,
        });
    }

    /// Build an empty subtree in canonical shape for `capacity`.
    pub(super) fn create(&mut self, capacity: UBig) -> Result<NodeIdx> {
        let top = self.alloc_shell(capacity)?;
        let mut pending = vec![top];
        while let Some(id) = pending.pop() {
            if self.node(id).is_leaf() {
                continue;
            }
            let fragment = self.node(id).fragment.clone();
            let mut remaining = self.node(id).capacity.clone();
            let mut branches = Vec::new();
            while remaining > zero() {
                let take = min(&remaining, &fragment);
                remaining -= &take;
                let child = self.alloc_shell(take)?;
                let node = self.node_mut(child);
                node.parent = id;
                node.index_in_parent = branches.len() as u32;
                branches.push(child);
                pending.push(child);
            }
            let high_length = PrefixSumIndex::with_zeros(branches.len());
            self.node_mut(id).body = Body::Branches { branches, high_length };
        }
        return Ok(top);
    }

    // =========================================================================
    // Public capacity surface
    // =========================================================================

    /// Restructure to hold exactly `capacity` elements. Fails when the list
    /// already holds more.
    pub fn set_capacity(&mut self, capacity: impl Into<UBig>) -> Result<()> {
        let capacity = capacity.into();
        let root = self.node(self.root);
        if capacity < root.length {
            return Err(Error::CapacityBelowLength {
                capacity,
                length: root.length.clone(),
            });
        }
        if capacity > root.capacity {
            debug_log!(from = %root.capacity, to = %capacity, "growing capacity");
            self.grow_capacity(self.root, capacity)?;
        } else if capacity < root.capacity {
            debug_log!(from = %root.capacity, to = %capacity, "shrinking capacity");
            self.shrink_capacity(capacity)?;
        }
        return self.checked();
    }

    /// Grow so that at least `minimum` elements fit: to 32 when empty,
    /// otherwise to twice the length, or to `minimum` when that is still short.
    pub fn ensure_capacity(&mut self, minimum: impl Into<UBig>) -> Result<()> {
        let minimum = minimum.into();
        let root = self.node(self.root);
        if root.capacity >= minimum {
            return Ok(());
        }
        let mut capacity = if root.length == zero() {
            big(INITIAL_CAPACITY)
        } else {
            &root.length * big(2)
        };
        if capacity < minimum {
            capacity = minimum;
        }
        return self.set_capacity(capacity);
    }

    /// Shrink capacity to the length when more than a tenth is unused.
    pub fn trim_excess(&mut self) -> Result<()> {
        let root = self.node(self.root);
        let threshold = &root.capacity * big(9) / big(10);
        if root.length < threshold {
            let length = root.length.clone();
            return self.set_capacity(length);
        }
        return Ok(());
    }

    // =========================================================================
    // Growth
    // =========================================================================

    /// Grow the subtree at `id` to `target` capacity, keeping its contents.
    ///
    /// `id` must be the root or lie on the rightmost spine; ancestors absorb
    /// the capacity delta.
    pub(super) fn grow_capacity(&mut self, id: NodeIdx, target: UBig) -> Result<()> {
        let current = self.node(id).capacity.clone();
        if target <= current {
            return Ok(());
        }
        let delta = &target - &current;

        let mut tasks = vec![(id, target)];
        while let Some((id, target)) = tasks.pop() {
            let node = self.node(id);
            if target <= node.capacity {
                continue;
            }
            if node.is_leaf() {
                self.grow_leaf(id, target)?;
                continue;
            }

            let fragment = node.fragment.clone();
            let full = &fragment * self.fanout_big();
            if target > full {
                if node.capacity < full {
                    // Fill this level first so the wrapped branch is full.
                    tasks.push((id, target));
                    tasks.push((id, full));
                } else {
                    self.wrap(id)?;
                    tasks.push((id, target));
                }
                continue;
            }

            // Linear: top up the last branch, then append new ones.
            let capacity = node.capacity.clone();
            let last = match self.branches(id)?.0.last() {
                Some(&last) => last,
                None => return Err(Error::internal("internal node without branches")),
            };
            let last_capacity = self.node(last).capacity.clone();
            let mut remaining = &target - &capacity;
            let top_up = min(&(&fragment - &last_capacity), &remaining);
            if top_up > zero() {
                remaining -= &top_up;
                tasks.push((last, &last_capacity + &top_up));
            }
            while remaining > zero() {
                let take = min(&remaining, &fragment);
                remaining -= &take;
                let child = self.create(take)?;
                let (branches, high_length) = self.branches_mut(id)?;
                let index = branches.len() as u32;
                branches.push(child);
                high_length.add(zero());
                let node = self.node_mut(child);
                node.parent = id;
                node.index_in_parent = index;
            }
            self.node_mut(id).capacity = target;
        }

        self.grow_capacity_above(id, &delta);
        return Ok(());
    }

    /// Grow a leaf, turning it into a canonical subtree when it outgrows the
    /// leaf size.
    fn grow_leaf(&mut self, id: NodeIdx, target: UBig) -> Result<()> {
        if target <= self.leaf_size_big() {
            let bound = small(&target)?;
            self.leaf_mut(id)?.set_capacity(bound)?;
            self.node_mut(id).capacity = target;
            return Ok(());
        }

        let items = self.leaf_mut(id)?.take_all();
        let count = big(items.len());
        let fresh = self.create(target)?;

        // The old contents seed the first leaf.
        let mut first = fresh;
        while let Body::Branches { branches, .. } = &self.node(first).body {
            first = branches[0];
        }
        let bound = self.leaf(first)?.capacity();
        *self.leaf_mut(first)? = LeafStorage::from_vec(items, bound)?;
        self.grow_length(first, &count)?;

        self.transplant(fresh, id)?;
        return Ok(());
    }

    /// Move the body of `from` into `into`, keeping `into`'s place in the tree
    /// and its reversal flag. Frees the `from` slot.
    fn transplant(&mut self, from: NodeIdx, into: NodeIdx) -> Result<()> {
        let source = std::mem::replace(self.node_mut(from), Node::leaf(0));
        self.free_nodes.push(from);
        let target = self.node_mut(into);
        target.body = source.body;
        target.length = source.length;
        target.capacity = source.capacity;
        target.fragment = source.fragment;
        if !target.is_leaf() {
            self.relink(into)?;
        }
        return Ok(());
    }

    /// Push the whole branch array of `id` one level down into a new single
    /// branch, multiplying the fragment by the fan-out.
    fn wrap(&mut self, id: NodeIdx) -> Result<()> {
        let fanout = self.fanout_big();
        let node = self.node_mut(id);
        let body = std::mem::replace(
            &mut node.body,
            Body::Branches {
                branches: Vec::new(),
                high_length: PrefixSumIndex::new(),
            },
        );
        let wrapped = Node {
            body,
            length: node.length.clone(),
            capacity: node.capacity.clone(),
            fragment: node.fragment.clone(),
            parent: id,
            index_in_parent: 0,
            reversed: node.reversed,
        };
        let length = node.length.clone();
        node.fragment = &node.fragment * &fanout;
        node.reversed = false;

        let inner = self.alloc(wrapped)?;
        self.relink(inner)?;
        let (branches, high_length) = self.branches_mut(id)?;
        branches.push(inner);
        high_length.add(length);
        debug_log!(node = id, "wrapped branch array one level down");
        return Ok(());
    }

    // =========================================================================
    // Shrink
    // =========================================================================

    /// Shrink the whole tree to `target` capacity (at least the length).
    fn shrink_capacity(&mut self, target: UBig) -> Result<()> {
        if target > self.leaf_size_big() {
            self.pack(self.root, false)?;
        }

        let mut tasks = vec![(self.root, target)];
        while let Some((id, target)) = tasks.pop() {
            if target <= self.leaf_size_big() {
                self.gather(id, &target)?;
                continue;
            }

            let wanted = self.fragment_for(&target);
            while self.node(id).fragment > wanted {
                self.unwrap(id)?;
            }

            // Linear: drop tail branches, trim the new last one.
            let fragment = self.node(id).fragment.clone();
            let keep = small(&((&target + &fragment - one()) / &fragment))?;
            let (branches, high_length) = self.branches_mut(id)?;
            if keep == 0 || keep > branches.len() {
                return Err(Error::internal("shrink target does not match the branch array"));
            }
            let dropped = branches.split_off(keep);
            high_length.remove_end(keep);
            let last = branches[keep - 1];
            for branch in dropped {
                self.release(branch);
            }
            let last_target = &target - &fragment * big(keep - 1);
            self.node_mut(id).capacity = target;
            if last_target < self.node(last).capacity {
                tasks.push((last, last_target));
            }
        }
        return Ok(());
    }

    /// Replace `id` with its first branch. The node must be packed so the
    /// other branches are empty.
    fn unwrap(&mut self, id: NodeIdx) -> Result<()> {
        let first = self.branch_at(id, 0)?;
        let rest = self.branches(id)?.0[1..].to_vec();
        for branch in rest {
            self.release(branch);
        }
        let flip = self.node(id).reversed ^ self.node(first).reversed;
        self.transplant(first, id)?;
        self.node_mut(id).reversed = flip;
        debug_log!(node = id, "unwrapped one level");
        return Ok(());
    }

    /// Collapse the subtree at `id` into a single leaf with the given bound.
    fn gather(&mut self, id: NodeIdx, bound: &UBig) -> Result<()> {
        let bound = small(bound)?;
        if self.node(id).is_leaf() {
            self.leaf_mut(id)?.set_capacity(bound)?;
        } else {
            let items = self.drain_in_view(id)?;
            let (branches, _) = self.branches(id)?;
            for branch in branches.to_vec() {
                self.release(branch);
            }
            let node = self.node_mut(id);
            node.body = Body::Leaf(LeafStorage::from_vec(items, bound)?);
            node.fragment = one();
        }
        self.node_mut(id).capacity = big(bound);
        return Ok(());
    }

    /// Reset the whole list to one empty leaf.
    pub(super) fn collapse(&mut self) {
        let bound = match usize::try_from(&self.node(self.root).capacity) {
            Ok(capacity) => capacity.min(self.config.leaf_size()),
            Err(_) => self.config.leaf_size(),
        };
        self.nodes.clear();
        self.free_nodes.clear();
        self.nodes.push(Node::leaf(bound));
        self.root = 0;
        debug_log!(bound, "collapsed to a single leaf");
    }

    // =========================================================================
    // Compaction
    // =========================================================================

    /// Move every element of `id` to the front (or back) of its positional
    /// order, leaving the free room contiguous at the other end. Clears every
    /// reversal flag below `id`.
    pub(super) fn pack(&mut self, id: NodeIdx, toward_back: bool) -> Result<()> {
        if self.node(id).is_leaf() {
            return Ok(());
        }
        profiling::compaction();
        debug_log!(node = id, toward_back, "compacting");

        let items = self.drain_in_view(id)?;
        self.normalize_flags(id);
        let leaves = self.plain_leaves(id);
        self.distribute(&leaves, items, toward_back)?;
        return self.recount(id);
    }

    /// Left index of the cheapest occupied pair of branches of `id` right next
    /// to branch `index` that fits in one branch.
    ///
    /// Leaves fit when their elements do. Internal branches fit when the
    /// right one is full sized and their occupied branches fit in one branch
    /// array.
    pub(super) fn mergeable_pair(&self, id: NodeIdx, index: usize) -> Result<Option<usize>> {
        let (branches, _) = self.branches(id)?;
        let mut best: Option<(usize, UBig)> = None;
        let candidates = [index.checked_sub(2), Some(index + 1)];
        for left in candidates.into_iter().flatten() {
            if left + 1 >= branches.len() {
                continue;
            }
            let (a, b) = (self.node(branches[left]), self.node(branches[left + 1]));
            if a.length == zero() || b.length == zero() {
                continue;
            }
            let total = &a.length + &b.length;
            let fits = if a.is_leaf() {
                total <= a.capacity
            } else {
                let slots = self.branches(branches[left])?.0.len();
                b.capacity == a.capacity
                    && self.occupied(branches[left])? + self.occupied(branches[left + 1])? <= slots
            };
            if fits && best.as_ref().is_none_or(|(_, cheapest)| total < *cheapest) {
                best = Some((left, total));
            }
        }
        return Ok(best.map(|(left, _)| left));
    }

    /// Number of non-empty branches of internal node `id`.
    fn occupied(&self, id: NodeIdx) -> Result<usize> {
        let (branches, _) = self.branches(id)?;
        return Ok(branches.iter().filter(|&&branch| self.node(branch).length != zero()).count());
    }

    /// Move the contents of branch `left + 1` of `id` behind those of branch
    /// `left`, leaving the right one empty. Leaves move their elements;
    /// internal branches hand over their occupied branches.
    pub(super) fn merge_pair(&mut self, id: NodeIdx, left: usize) -> Result<()> {
        profiling::compaction();
        let a = self.branch_at(id, left)?;
        let b = self.branch_at(id, left + 1)?;
        debug_log!(node = id, left, "merging neighbouring branches");

        if self.node(a).is_leaf() {
            let count = small(&self.node(b).length)?;
            return self.shift_between(b, a, count, true);
        }
        self.straighten(a)?;
        self.straighten(b)?;

        // Occupied branches of `a` first, in order.
        let (branches, _) = self.branches(a)?;
        let (mut order, empty): (Vec<NodeIdx>, Vec<NodeIdx>) =
            branches.iter().copied().partition(|&branch| self.node(branch).length != zero());
        let kept = order.len();
        order.extend(empty);
        let lengths: PrefixSumIndex = order.iter().map(|&branch| self.node(branch).length.clone()).collect();
        let (branches, high_length) = self.branches_mut(a)?;
        *branches = order;
        *high_length = lengths;
        self.relink(a)?;

        let (incoming, _) = self.branches(b)?;
        let incoming: Vec<usize> = (0..incoming.len())
            .filter(|&at| self.node(incoming[at]).length != zero())
            .collect();
        for (offset, at) in incoming.into_iter().enumerate() {
            self.swap_branches(b, at, a, kept + offset)?;
        }
        let moved = self.node(b).length.clone();
        self.shrink_length(b, &moved)?;
        return self.grow_length(a, &moved);
    }

    /// Clear the reversal flag of internal node `id` by mirroring its branch
    /// array and toggling every branch instead.
    fn straighten(&mut self, id: NodeIdx) -> Result<()> {
        if !self.node(id).reversed {
            return Ok(());
        }
        self.node_mut(id).reversed = false;
        let count = self.branches(id)?.0.len();
        return self.mirror_branches(id, 0, count);
    }

    /// Exchange branch `i` of `x` with branch `j` of `y`. Both branches must
    /// have the same capacity. The lengths of `x` and `y` are left to the
    /// caller.
    fn swap_branches(&mut self, x: NodeIdx, i: usize, y: NodeIdx, j: usize) -> Result<()> {
        let first = self.branch_at(x, i)?;
        let second = self.branch_at(y, j)?;
        if self.node(first).capacity != self.node(second).capacity {
            return Err(Error::internal("swapped branches differ in capacity"));
        }
        let first_length = self.node(first).length.clone();
        let second_length = self.node(second).length.clone();

        let (branches, high_length) = self.branches_mut(x)?;
        branches[i] = second;
        if high_length.set(i, second_length).is_none() {
            return Err(Error::internal("branch array and index disagree"));
        }
        let (branches, high_length) = self.branches_mut(y)?;
        branches[j] = first;
        if high_length.set(j, first_length).is_none() {
            return Err(Error::internal("branch array and index disagree"));
        }

        let node = self.node_mut(second);
        node.parent = x;
        node.index_in_parent = i as u32;
        let node = self.node_mut(first);
        node.parent = y;
        node.index_in_parent = j as u32;
        return Ok(());
    }

    /// Hand the logical back half of the full branch `full` to the empty
    /// sibling `empty`. Leaves move elements. Internal branches swap their
    /// occupied back branches for the sibling's empty front ones.
    pub(super) fn hand_over(&mut self, full: NodeIdx, empty: NodeIdx) -> Result<()> {
        if self.node(full).is_leaf() {
            let length = small(&self.node(full).length)?;
            return self.shift_between(full, empty, length - length / 2, false);
        }

        let (branches, _) = self.branches(full)?;
        let occupied: Vec<usize> = (0..branches.len())
            .filter(|&at| self.node(branches[at]).length != zero())
            .collect();
        let take = occupied.len() / 2;
        if take == 0 {
            return Err(Error::internal("splitting a branch with one occupied branch"));
        }
        // The logical back lies at the positional front of a reversed branch.
        let reversed = self.node(full).reversed;
        let moved = if reversed {
            &occupied[..take]
        } else {
            &occupied[occupied.len() - take..]
        };
        self.node_mut(empty).reversed = reversed;

        let mut total = zero();
        for (slot, &at) in moved.iter().enumerate() {
            total += &self.node(self.branch_at(full, at)?).length;
            self.swap_branches(full, at, empty, slot)?;
        }
        self.shrink_length(full, &total)?;
        return self.grow_length(empty, &total);
    }

    /// Move part of the full leaf at branch `full_index` of `id` into a
    /// neighbouring leaf with room. Only elements on the neighbour's side of
    /// positional gap `position` move, so the gap stays in the full leaf.
    /// Returns whether anything moved.
    pub(super) fn redistribute(&mut self, id: NodeIdx, full_index: usize, position: &UBig) -> Result<bool> {
        let (branches, _) = self.branches(id)?;
        let count = branches.len();
        let full = branches[full_index];
        if !self.node(full).is_leaf() {
            return Ok(false);
        }
        let start = self.branch_start(id, full_index)?;
        let length = small(&self.node(full).length)?;
        let before = if *position > start {
            small(&(position - &start))?.min(length)
        } else {
            0
        };

        let sides = [(full_index.checked_sub(1), before, true), (Some(full_index + 1), length - before, false)];
        for (neighbour, limit, to_left) in sides {
            let Some(neighbour) = neighbour else { continue };
            if neighbour >= count || limit == 0 {
                continue;
            }
            let other = self.branch_at(id, neighbour)?;
            let node = self.node(other);
            if node.length == zero() || !node.has_room() {
                continue;
            }
            let room = small(&(&node.capacity - &node.length))?;
            let moved = (room / 2).max(1).min(limit);
            debug_log!(node = id, from = full_index, to = neighbour, moved, "moving elements to a neighbour");
            self.shift_between(full, other, moved, to_left)?;
            return Ok(true);
        }
        return Ok(false);
    }

    /// Move `count` elements from the logical front (`to_left`) or back of
    /// leaf `from` to the adjoining end of the neighbouring leaf `to`.
    fn shift_between(&mut self, from: NodeIdx, to: NodeIdx, count: usize, to_left: bool) -> Result<()> {
        let from_reversed = self.node(from).reversed;
        let mut chunk = self.leaf_mut(from)?.take_side(to_left == from_reversed, count)?;
        if from_reversed {
            chunk.reverse();
        }
        let to_reversed = self.node(to).reversed;
        if to_reversed {
            chunk.reverse();
        }
        let leaf = self.leaf_mut(to)?;
        let at = if to_left != to_reversed { leaf.len() } else { 0 };
        leaf.insert_chunk(at, chunk)?;

        let moved = big(count);
        self.shrink_length(from, &moved)?;
        return self.grow_length(to, &moved);
    }

    /// Move every element below `id` out, in `id`'s positional order.
    fn drain_in_view(&mut self, id: NodeIdx) -> Result<Vec<T>> {
        let mut items = Vec::with_capacity(small(&self.node(id).length)?);

        // (node, flip relative to id's positional order)
        let mut pending = vec![(id, false)];
        while let Some((current, flip)) = pending.pop() {
            match &mut self.nodes[current as usize].body {
                Body::Leaf(leaf) => {
                    let mut chunk = leaf.take_all();
                    if flip {
                        chunk.reverse();
                    }
                    items.append(&mut chunk);
                }
                Body::Branches { branches, .. } => {
                    let branches = branches.clone();
                    // The first branch in view order must pop first.
                    if flip {
                        for &branch in branches.iter() {
                            pending.push((branch, flip ^ self.node(branch).reversed));
                        }
                    } else {
                        for &branch in branches.iter().rev() {
                            pending.push((branch, flip ^ self.node(branch).reversed));
                        }
                    }
                }
            }
        }
        return Ok(items);
    }

    /// Clear the reversal flag of every node strictly below `id`.
    fn normalize_flags(&mut self, id: NodeIdx) {
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            if current != id {
                self.node_mut(current).reversed = false;
            }
            if let Body::Branches { branches, .. } = &self.node(current).body {
                pending.extend(branches.iter().copied());
            }
        }
    }

    /// Leaves below `id` in branch-array order, ignoring reversal flags.
    pub(super) fn plain_leaves(&self, id: NodeIdx) -> Vec<NodeIdx> {
        let mut leaves = Vec::new();
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            match &self.node(current).body {
                Body::Leaf(_) => leaves.push(current),
                Body::Branches { branches, .. } => pending.extend(branches.iter().rev().copied()),
            }
        }
        return leaves;
    }

    /// Fill empty leaves in order with `items`, from the first leaf or (with
    /// `toward_back`) from the last. Lengths are left for the caller to
    /// recount.
    pub(super) fn distribute(&mut self, leaves: &[NodeIdx], items: Vec<T>, toward_back: bool) -> Result<()> {
        let mut items = items;
        if toward_back {
            for &leaf in leaves.iter().rev() {
                let bound = self.leaf(leaf)?.capacity();
                let take = bound.min(items.len());
                let chunk = items.split_off(items.len() - take);
                *self.leaf_mut(leaf)? = LeafStorage::from_vec(chunk, bound)?;
            }
        } else {
            let mut rest = items.into_iter();
            for &leaf in leaves.iter() {
                let bound = self.leaf(leaf)?.capacity();
                let chunk: Vec<T> = rest.by_ref().take(bound).collect();
                *self.leaf_mut(leaf)? = LeafStorage::from_vec(chunk, bound)?;
            }
            items = rest.collect();
        }
        if !items.is_empty() {
            return Err(Error::internal("subtree too small for its contents"));
        }
        return Ok(());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BigListConfig;

    fn small_list() -> BigList<u32> {
        return BigList::with_config(BigListConfig::new(2, 2).unwrap());
    }

    #[test]
    fn fragment_is_smallest_covering_power() {
        let list = small_list();
        assert_eq!(list.fragment_for(&big(5)), big(4));
        assert_eq!(list.fragment_for(&big(16)), big(4));
        assert_eq!(list.fragment_for(&big(17)), big(16));
        assert_eq!(list.fragment_for(&big(64)), big(16));
        assert_eq!(list.fragment_for(&big(65)), big(64));
    }

    #[test]
    fn canonical_shape() {
        let mut list = small_list();
        list.set_capacity(23usize).unwrap();
        let root = list.node(list.root);
        assert_eq!(root.fragment, big(16));
        let (branches, high_length) = list.branches(list.root).unwrap();
        assert_eq!(branches.len(), 2);
        assert_eq!(high_length.len(), 2);
        assert_eq!(list.node(branches[0]).capacity, big(16));
        assert_eq!(list.node(branches[1]).capacity, big(7));
        assert_eq!(list.depth(), 3);
        list.verify().unwrap();
    }

    #[test]
    fn grow_keeps_contents_through_wraps() {
        let mut list = small_list();
        for i in 0..4u32 {
            list.add(i).unwrap();
        }
        list.set_capacity(300usize).unwrap();
        list.verify().unwrap();
        assert_eq!(list.capacity(), big(300));
        assert_eq!(list.to_vec().unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn shrink_unwraps_after_packing() {
        let mut list = small_list();
        for i in 0..40u32 {
            list.add(i).unwrap();
        }
        list.remove_range(5usize, 30usize).unwrap();
        list.set_capacity(12usize).unwrap();
        list.verify().unwrap();
        assert_eq!(list.capacity(), big(12));
        assert_eq!(list.to_vec().unwrap(), vec![0, 1, 2, 3, 4, 35, 36, 37, 38, 39]);

        list.set_capacity(10usize).unwrap();
        list.set_capacity(4usize).unwrap_err();
        assert_eq!(list.to_vec().unwrap(), vec![0, 1, 2, 3, 4, 35, 36, 37, 38, 39]);
    }

    #[test]
    fn pack_honors_reversed_branches() {
        let mut list = small_list();
        for i in 0..20u32 {
            list.add(i).unwrap();
        }
        list.reverse_range(4usize, 8usize).unwrap();
        let expected = list.to_vec().unwrap();
        let root = list.root;
        list.pack(root, true).unwrap();
        list.verify().unwrap();
        assert_eq!(list.to_vec().unwrap(), expected);
        list.pack(root, false).unwrap();
        assert_eq!(list.to_vec().unwrap(), expected);
    }

    #[test]
    fn ensure_and_trim() {
        let mut list = small_list();
        list.ensure_capacity(1usize).unwrap();
        assert_eq!(list.capacity(), big(32));
        for i in 0..3u32 {
            list.add(i).unwrap();
        }
        list.trim_excess().unwrap();
        assert_eq!(list.capacity(), big(3));
        list.verify().unwrap();
    }
}
