//! Full structural consistency check.

use super::{BigList, Body, NodeIdx, NONE};
use crate::error::{Error, Result};
use crate::num::{big, one, zero};

impl<T> BigList<T> {
    /// Walk the whole tree and check every structural invariant: lengths and
    /// prefix sums agree, parent links point back, branch capacities follow
    /// the canonical shape.
    pub fn verify(&self) -> Result<()> {
        let root = self.node(self.root);
        if root.parent != NONE {
            return Err(Error::internal("root has a parent"));
        }
        let leaf_size = self.leaf_size_big();
        let fanout = self.config.fanout();

        let mut pending: Vec<NodeIdx> = vec![self.root];
        while let Some(id) = pending.pop() {
            let node = self.node(id);
            if node.length > node.capacity {
                return Err(Error::internal(format!(
                    "node {id}: length {} exceeds capacity {}",
                    node.length, node.capacity
                )));
            }
            match &node.body {
                Body::Leaf(leaf) => {
                    if node.length != big(leaf.len()) || node.capacity != big(leaf.capacity()) {
                        return Err(Error::internal(format!("leaf {id}: counts disagree with storage")));
                    }
                    if node.capacity > leaf_size || node.fragment != one() {
                        return Err(Error::internal(format!("leaf {id}: oversized or wrong fragment")));
                    }
                }
                Body::Branches { branches, high_length } => {
                    if node.capacity <= leaf_size {
                        return Err(Error::internal(format!("node {id}: internal node small enough to be a leaf")));
                    }
                    if node.fragment != self.fragment_for(&node.capacity) {
                        return Err(Error::internal(format!("node {id}: fragment {} is not canonical", node.fragment)));
                    }
                    if branches.is_empty() || branches.len() > fanout || high_length.len() != branches.len() {
                        return Err(Error::internal(format!("node {id}: bad branch count {}", branches.len())));
                    }

                    let mut length = zero();
                    let mut capacity = zero();
                    for (index, &branch) in branches.iter().enumerate() {
                        let child = self.node(branch);
                        if child.parent != id || child.index_in_parent as usize != index {
                            return Err(Error::internal(format!("node {branch}: stale parent link")));
                        }
                        if high_length.get(index) != Some(&child.length) {
                            return Err(Error::internal(format!("node {id}: prefix index disagrees at {index}")));
                        }
                        let is_last = index + 1 == branches.len();
                        let fits = if is_last {
                            child.capacity <= node.fragment
                        } else {
                            child.capacity == node.fragment
                        };
                        if !fits {
                            return Err(Error::internal(format!(
                                "node {id}: branch {index} has capacity {} with fragment {}",
                                child.capacity, node.fragment
                            )));
                        }
                        length += &child.length;
                        capacity += &child.capacity;
                        pending.push(branch);
                    }
                    if length != node.length || high_length.values_sum() != length {
                        return Err(Error::internal(format!("node {id}: length does not match its branches")));
                    }
                    if capacity != node.capacity {
                        return Err(Error::internal(format!("node {id}: capacity does not match its branches")));
                    }
                }
            }
        }
        return Ok(());
    }

    /// Number of live nodes in the arena.
    pub fn node_count(&self) -> usize {
        return self.nodes.len() - self.free_nodes.len();
    }
}

#[cfg(test)]
mod tests {
    use ibig::UBig;

    use super::*;
    use crate::config::BigListConfig;

    #[test]
    fn detects_corrupted_lengths() {
        let mut list: BigList<u32> = BigList::from_vec_in(BigListConfig::new(2, 2).unwrap(), (0..30).collect()).unwrap();
        list.verify().unwrap();
        let root = list.root;
        list.node_mut(root).length += UBig::from(1u8);
        assert!(matches!(list.verify(), Err(Error::Internal(_))));
    }

    #[test]
    fn released_nodes_are_reused() {
        let mut list: BigList<u32> = BigList::from_vec_in(BigListConfig::new(2, 2).unwrap(), (0..64).collect()).unwrap();
        let before = list.node_count();
        list.set_capacity(64usize).unwrap();
        list.remove_range(0usize, 60usize).unwrap();
        list.set_capacity(4usize).unwrap();
        assert_eq!(list.node_count(), 1);
        list.set_capacity(64usize).unwrap();
        assert_eq!(list.node_count(), before);
        list.verify().unwrap();
    }
}
