use ibig::UBig;

use super::{BigList, Body, NodeIdx};
use crate::error::{Error, Result};
use crate::num::{small, zero};

/// Borrowing iterator in logical order.
///
/// Holds a stack of subtrees still to visit (with their effective direction)
/// and the slice of the current leaf.
pub struct Iter<'a, T> {
    list: &'a BigList<T>,
    pending: Vec<(NodeIdx, bool)>,
    current: std::slice::Iter<'a, T>,
    backward: bool,
}

impl<'a, T> Iter<'a, T> {
    fn push_branches(&mut self, branches: &[NodeIdx], flip: bool) {
        let list = self.list;
        let live = |&&branch: &&NodeIdx| list.node(branch).length != zero();
        // The first branch in view order ends up on top of the stack.
        if flip {
            for &branch in branches.iter().filter(live) {
                self.pending.push((branch, flip ^ list.node(branch).reversed));
            }
        } else {
            for &branch in branches.iter().rev().filter(live) {
                self.pending.push((branch, flip ^ list.node(branch).reversed));
            }
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        loop {
            let item = if self.backward {
                self.current.next_back()
            } else {
                self.current.next()
            };
            if item.is_some() {
                return item;
            }
            let (id, flip) = self.pending.pop()?;
            let list = self.list;
            match &list.node(id).body {
                Body::Leaf(leaf) => {
                    self.current = leaf.as_slice().iter();
                    self.backward = flip;
                }
                Body::Branches { branches, .. } => self.push_branches(branches, flip),
            }
        }
    }
}

impl<T> BigList<T> {
    /// Iterate over every element in logical order.
    pub fn iter(&self) -> Iter<'_, T> {
        let root = self.node(self.root);
        return Iter {
            list: self,
            pending: vec![(self.root, root.reversed)],
            current: Default::default(),
            backward: false,
        };
    }

    /// Iterate from logical `index` to the end. `index` may equal the length.
    pub fn iter_from(&self, index: impl Into<UBig>) -> Result<Iter<'_, T>> {
        let index = index.into();
        self.check_gap(&index)?;
        let mut iter = Iter {
            list: self,
            pending: Vec::new(),
            current: Default::default(),
            backward: false,
        };
        if index == self.node(self.root).length {
            return Ok(iter);
        }

        let root = self.node(self.root);
        let mut id = self.root;
        let mut flip = root.reversed;
        let mut position = root.element_position(&index);
        loop {
            match &self.node(id).body {
                Body::Leaf(leaf) => {
                    let at = small(&position)?;
                    let slice = leaf.as_slice();
                    let run = if flip { slice.get(..=at) } else { slice.get(at..) };
                    let Some(run) = run else {
                        return Err(Error::internal("leaf shorter than its recorded length"));
                    };
                    iter.current = run.iter();
                    iter.backward = flip;
                    return Ok(iter);
                }
                Body::Branches { branches, .. } => {
                    let (branch, offset) = self.locate(id, &position)?;
                    // Siblings still to come after this branch in view order.
                    if flip {
                        iter.push_branches(&branches[..branch], flip);
                    } else {
                        iter.push_branches(&branches[branch + 1..], flip);
                    }
                    let child = branches[branch];
                    let child_node = self.node(child);
                    flip ^= child_node.reversed;
                    position = child_node.element_position(&offset);
                    id = child;
                }
            }
        }
    }
}

impl<'a, T> IntoIterator for &'a BigList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        return self.iter();
    }
}
