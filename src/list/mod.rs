//! Big List
//!
//! An indexable sequence whose index and length are arbitrary-precision
//! integers, stored as a rope/B-tree hybrid.
//!
//! Structure:
//! - Leaves store up to `leaf_size` elements in a flat vector
//! - Internal nodes own up to `fanout` branches and a prefix-sum index over
//!   the branches' occupied lengths
//! - All nodes live in one arena `Vec` addressed by `u32`; parents are stored
//!   as indices with a `NONE` sentinel
//!
//! Shape:
//! - A node's shape is a function of its capacity. Capacity at most
//!   `leaf_size` is a leaf; anything larger has a `fragment` (the capacity of
//!   each branch) equal to the smallest `leaf_size * fanout^k` whose `fanout`
//!   multiple covers the capacity
//! - Every branch but the last has `capacity == fragment`; the last may be
//!   smaller. Partially sized nodes therefore only occur on the rightmost
//!   spine of the tree
//! - Branches may be under-full ("holes"). An insertion that finds no room
//!   near its position passes elements to a neighbouring leaf, splits the
//!   full branch into an empty sibling, merges two branches next to it, or
//!   grows the list, in that order
//!
//! Reversal:
//! - Every node carries a `reversed` flag. A node's logical sequence is its
//!   positional sequence (the concatenation of its branches' logical
//!   sequences), read backwards when the flag is set
//! - Effective direction is composed along each descent and never cached
//!
//! Operations:
//! - get/set: O(depth * log fanout)
//! - insert/remove_at: O(depth * log fanout) plus O(leaf_size) leaf edits.
//!   Making room moves at most one leaf's worth of elements; internal
//!   branches change hands by pointer at O(fanout) per split or merge
//! - remove_range: O(depth * log fanout) plus O(fanout) per cleared branch
//! - reverse: O(1)
//! - reverse_range: O(depth * log fanout) to find the split node, O(log
//!   fanout) per mirrored branch, and element moves only for the boundary
//!   parts (the shorter one twice, the surplus of the longer one once)
//! - copy_to/copy_within: O(len + depth * fanout) through the copy engine

mod access;
mod capacity;
mod copy;
mod iter;
mod mutate;
mod query;
mod reverse;
mod traits;
mod verify;

pub use iter::Iter;

use ibig::UBig;
use prefix_index::PrefixSumIndex;

use crate::config::BigListConfig;
use crate::error::{Error, Result};
use crate::leaf::LeafStorage;
use crate::num::{big, one, zero};

/// Index into the node arena.
type NodeIdx = u32;
/// Sentinel for "no parent".
const NONE: NodeIdx = u32::MAX;

/// Contents of a node: exactly one of flat storage or a branch array.
#[derive(Clone, Debug)]
enum Body<T> {
    Leaf(LeafStorage<T>),
    Branches {
        /// Owned children in positional order.
        branches: Vec<NodeIdx>,
        /// Occupied length of each branch, one entry per branch.
        high_length: PrefixSumIndex,
    },
}

#[derive(Clone, Debug)]
struct Node<T> {
    body: Body<T>,
    /// Number of stored elements in this subtree.
    length: UBig,
    /// Number of elements this subtree can hold.
    capacity: UBig,
    /// Capacity of each full branch. One for a leaf.
    fragment: UBig,
    /// Parent node index (NONE for the root).
    parent: NodeIdx,
    /// Index of this node in the parent's branch array.
    index_in_parent: u32,
    /// Read the positional sequence backwards.
    reversed: bool,
}

impl<T> Node<T> {
    fn leaf(bound: usize) -> Node<T> {
        return Node {
            body: Body::Leaf(LeafStorage::new(bound)),
            length: zero(),
            capacity: big(bound),
            fragment: one(),
            parent: NONE,
            index_in_parent: 0,
            reversed: false,
        };
    }

    #[inline(always)]
    fn is_leaf(&self) -> bool {
        return matches!(self.body, Body::Leaf(_));
    }

    #[inline(always)]
    fn has_room(&self) -> bool {
        return self.length < self.capacity;
    }

    /// Translate a logical element index into a positional one.
    #[inline]
    fn element_position(&self, index: &UBig) -> UBig {
        if self.reversed {
            return &self.length - index - one();
        }
        return index.clone();
    }

    /// Translate a logical insertion point (0..=length) into a positional one.
    #[inline]
    fn gap_position(&self, index: &UBig) -> UBig {
        if self.reversed {
            return &self.length - index;
        }
        return index.clone();
    }

    /// Translate a logical range start into the positional start of the range.
    #[inline]
    fn range_position(&self, index: &UBig, count: &UBig) -> UBig {
        if self.reversed {
            return &self.length - index - count;
        }
        return index.clone();
    }
}

/// An indexable sequence with arbitrary-precision index and length.
///
/// See the [module documentation](self) for the layout.
#[derive(Clone)]
pub struct BigList<T> {
    /// Node arena. Slots on the free list hold empty leaves.
    nodes: Vec<Node<T>>,
    /// Free list for reusing released node slots.
    free_nodes: Vec<NodeIdx>,
    root: NodeIdx,
    config: BigListConfig,
}

impl<T> Default for BigList<T> {
    fn default() -> Self {
        return BigList::new();
    }
}

impl<T> BigList<T> {
    /// Empty list with the default configuration.
    pub fn new() -> BigList<T> {
        return BigList::with_config(BigListConfig::default());
    }

    pub fn with_config(config: BigListConfig) -> BigList<T> {
        return BigList {
            nodes: vec![Node::leaf(0)],
            free_nodes: Vec::new(),
            root: 0,
            config,
        };
    }

    /// Empty list able to hold `capacity` elements without restructuring.
    pub fn with_capacity(config: BigListConfig, capacity: impl Into<UBig>) -> Result<BigList<T>> {
        let mut list = BigList::with_config(config);
        list.set_capacity(capacity)?;
        return Ok(list);
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> UBig {
        return self.node(self.root).length.clone();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        return self.node(self.root).length == zero();
    }

    #[inline]
    pub fn capacity(&self) -> UBig {
        return self.node(self.root).capacity.clone();
    }

    #[inline]
    pub fn config(&self) -> BigListConfig {
        return self.config;
    }

    /// Number of levels from the root to the deepest leaf (1 for a single leaf).
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut current = self.root;
        while let Body::Branches { branches, .. } = &self.node(current).body {
            match branches.first() {
                Some(&first) => current = first,
                None => break,
            }
            depth += 1;
        }
        return depth;
    }

    // =========================================================================
    // Arena
    // =========================================================================

    #[inline(always)]
    fn node(&self, id: NodeIdx) -> &Node<T> {
        return &self.nodes[id as usize];
    }

    #[inline(always)]
    fn node_mut(&mut self, id: NodeIdx) -> &mut Node<T> {
        return &mut self.nodes[id as usize];
    }

    fn leaf(&self, id: NodeIdx) -> Result<&LeafStorage<T>> {
        match &self.node(id).body {
            Body::Leaf(leaf) => return Ok(leaf),
            Body::Branches { .. } => return Err(Error::internal("expected a leaf")),
        }
    }

    fn leaf_mut(&mut self, id: NodeIdx) -> Result<&mut LeafStorage<T>> {
        match &mut self.node_mut(id).body {
            Body::Leaf(leaf) => return Ok(leaf),
            Body::Branches { .. } => return Err(Error::internal("expected a leaf")),
        }
    }

    fn branches(&self, id: NodeIdx) -> Result<(&[NodeIdx], &PrefixSumIndex)> {
        match &self.node(id).body {
            Body::Branches { branches, high_length } => return Ok((branches, high_length)),
            Body::Leaf(_) => return Err(Error::internal("expected an internal node")),
        }
    }

    fn branches_mut(&mut self, id: NodeIdx) -> Result<(&mut Vec<NodeIdx>, &mut PrefixSumIndex)> {
        match &mut self.node_mut(id).body {
            Body::Branches { branches, high_length } => return Ok((branches, high_length)),
            Body::Leaf(_) => return Err(Error::internal("expected an internal node")),
        }
    }

    fn branch_at(&self, id: NodeIdx, index: usize) -> Result<NodeIdx> {
        let (branches, _) = self.branches(id)?;
        return branches
            .get(index)
            .copied()
            .ok_or_else(|| Error::internal("branch index past the branch array"));
    }

    /// Positional offset at which branch `index` of `id` starts.
    fn branch_start(&self, id: NodeIdx, index: usize) -> Result<UBig> {
        let (_, high_length) = self.branches(id)?;
        return Ok(high_length.prefix_sum(index));
    }

    /// Branch of `id` holding positional element `position`, and the offset
    /// into that branch.
    fn locate(&self, id: NodeIdx, position: &UBig) -> Result<(usize, UBig)> {
        let (branches, high_length) = self.branches(id)?;
        let (index, remainder) = high_length.index_of_not_greater_sum(position);
        if index >= branches.len() {
            return Err(Error::internal("position past the end of the node"));
        }
        return Ok((index, remainder));
    }

    fn alloc(&mut self, node: Node<T>) -> Result<NodeIdx> {
        if let Some(id) = self.free_nodes.pop() {
            self.nodes[id as usize] = node;
            return Ok(id);
        }
        if self.nodes.len() >= NONE as usize {
            return Err(Error::internal("node arena exhausted"));
        }
        let id = self.nodes.len() as NodeIdx;
        self.nodes.push(node);
        return Ok(id);
    }

    /// Return a subtree to the free list, dropping its elements.
    fn release(&mut self, id: NodeIdx) {
        let mut pending = vec![id];
        while let Some(id) = pending.pop() {
            let node = std::mem::replace(self.node_mut(id), Node::leaf(0));
            if let Body::Branches { branches, .. } = node.body {
                pending.extend(branches);
            }
            self.free_nodes.push(id);
        }
    }

    /// Point every branch of `id` back at it.
    fn relink(&mut self, id: NodeIdx) -> Result<()> {
        let count = self.branches(id)?.0.len();
        return self.relink_range(id, 0, count);
    }

    /// Point branches `from..to` of `id` back at it.
    fn relink_range(&mut self, id: NodeIdx, from: usize, to: usize) -> Result<()> {
        let (branches, _) = self.branches(id)?;
        let Some(moved) = branches.get(from..to) else {
            return Err(Error::internal("relink past the branch array"));
        };
        let moved = moved.to_vec();
        for (offset, branch) in moved.into_iter().enumerate() {
            let node = self.node_mut(branch);
            node.parent = id;
            node.index_in_parent = (from + offset) as u32;
        }
        return Ok(());
    }

    // =========================================================================
    // Aggregate propagation
    // =========================================================================

    /// Add `delta` to the length of `id` and every ancestor.
    fn grow_length(&mut self, id: NodeIdx, delta: &UBig) -> Result<()> {
        self.node_mut(id).length += delta;
        return self.propagate_length(id, delta, true);
    }

    /// Subtract `delta` from the length of `id` and every ancestor.
    fn shrink_length(&mut self, id: NodeIdx, delta: &UBig) -> Result<()> {
        let node = self.node_mut(id);
        if node.length < *delta {
            return Err(Error::internal("length underflow"));
        }
        node.length -= delta;
        return self.propagate_length(id, delta, false);
    }

    /// Apply a length change of `id` to its ancestors only.
    fn propagate_length(&mut self, id: NodeIdx, delta: &UBig, grow: bool) -> Result<()> {
        let mut current = id;
        loop {
            let node = self.node(current);
            let (parent, index) = (node.parent, node.index_in_parent as usize);
            if parent == NONE {
                return Ok(());
            }
            let parent_node = self.node_mut(parent);
            let Body::Branches { high_length, .. } = &mut parent_node.body else {
                return Err(Error::internal("parent is a leaf"));
            };
            if grow {
                if !high_length.increase_by(index, delta) {
                    return Err(Error::internal("stale index in parent"));
                }
                parent_node.length += delta;
            } else {
                if !high_length.decrease_by(index, delta) || parent_node.length < *delta {
                    return Err(Error::internal("length underflow in parent"));
                }
                parent_node.length -= delta;
            }
            current = parent;
        }
    }

    /// Add `delta` to the capacity of every ancestor of `id`.
    fn grow_capacity_above(&mut self, id: NodeIdx, delta: &UBig) {
        let mut current = self.node(id).parent;
        while current != NONE {
            let node = self.node_mut(current);
            node.capacity += delta;
            current = node.parent;
        }
    }

    /// Rebuild lengths and prefix-sum indices of a whole subtree from its
    /// leaves. The subtree total may change; ancestors are not touched.
    fn recount(&mut self, id: NodeIdx) -> Result<()> {
        let mut internal = Vec::new();
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            match &self.node(current).body {
                Body::Leaf(leaf) => {
                    let len = big(leaf.len());
                    self.node_mut(current).length = len;
                }
                Body::Branches { branches, .. } => {
                    pending.extend(branches.iter().copied());
                    internal.push(current);
                }
            }
        }
        // Pre-order reversed visits every branch before its parent.
        for &current in internal.iter().rev() {
            let branches = self.branches(current)?.0.to_vec();
            let lengths: PrefixSumIndex = branches.iter().map(|&b| self.node(b).length.clone()).collect();
            let total = lengths.values_sum();
            let node = self.node_mut(current);
            node.length = total;
            if let Body::Branches { high_length, .. } = &mut node.body {
                *high_length = lengths;
            }
        }
        return Ok(());
    }

    /// Run the full invariant check when the `verify` feature is enabled.
    #[inline]
    fn checked(&self) -> Result<()> {
        #[cfg(feature = "verify")]
        self.verify()?;
        return Ok(());
    }
}
