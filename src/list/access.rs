//! Indexed reads and writes, argument validation and leaf-chunk enumeration.

use ibig::UBig;

use super::copy::Span;
use super::{BigList, NodeIdx};
use crate::error::{Error, Result};
use crate::num::{big, one, small, zero};

/// A contiguous run inside one leaf, in request order.
#[derive(Clone, Copy, Debug)]
pub(super) struct LeafChunk {
    pub(super) leaf: NodeIdx,
    pub(super) start: usize,
    pub(super) len: usize,
    /// The request walks this run backwards.
    pub(super) flip: bool,
}

impl<T> BigList<T> {
    // =========================================================================
    // Validation
    // =========================================================================

    pub(super) fn check_index(&self, index: &UBig) -> Result<()> {
        let length = &self.node(self.root).length;
        if index >= length {
            return Err(Error::IndexOutOfRange {
                index: index.clone(),
                length: length.clone(),
            });
        }
        return Ok(());
    }

    /// `index` may equal the length (an insertion point).
    pub(super) fn check_gap(&self, index: &UBig) -> Result<()> {
        let length = &self.node(self.root).length;
        if index > length {
            return Err(Error::IndexOutOfRange {
                index: index.clone(),
                length: length.clone(),
            });
        }
        return Ok(());
    }

    pub(super) fn check_range(&self, index: &UBig, count: &UBig) -> Result<()> {
        let length = &self.node(self.root).length;
        if index + count > *length {
            return Err(Error::RangeOutOfBounds {
                index: index.clone(),
                count: count.clone(),
                length: length.clone(),
            });
        }
        return Ok(());
    }

    // =========================================================================
    // Descent
    // =========================================================================

    /// Leaf and offset holding logical element `index` of the list.
    fn locate_element(&self, index: &UBig) -> Result<(NodeIdx, usize)> {
        let mut id = self.root;
        let mut index = index.clone();
        loop {
            let node = self.node(id);
            let position = node.element_position(&index);
            if node.is_leaf() {
                return Ok((id, small(&position)?));
            }
            let (branch, offset) = self.locate(id, &position)?;
            id = self.branch_at(id, branch)?;
            index = offset;
        }
    }

    /// Leaf and offset holding positional element `position` of node `id`.
    pub(super) fn locate_position(&self, id: NodeIdx, position: &UBig) -> Result<(NodeIdx, usize)> {
        let mut id = id;
        let mut position = position.clone();
        loop {
            if self.node(id).is_leaf() {
                return Ok((id, small(&position)?));
            }
            let (branch, offset) = self.locate(id, &position)?;
            let child = self.branch_at(id, branch)?;
            position = self.node(child).element_position(&offset);
            id = child;
        }
    }

    pub(super) fn get_ref(&self, index: &UBig) -> Result<&T> {
        self.check_index(index)?;
        let (leaf, offset) = self.locate_element(index)?;
        return self
            .leaf(leaf)?
            .get(offset)
            .ok_or_else(|| Error::internal("leaf shorter than its recorded length"));
    }

    pub(super) fn positional_get(&self, id: NodeIdx, position: &UBig) -> Result<&T> {
        let (leaf, offset) = self.locate_position(id, position)?;
        return self
            .leaf(leaf)?
            .get(offset)
            .ok_or_else(|| Error::internal("leaf shorter than its recorded length"));
    }

    pub(super) fn positional_set(&mut self, id: NodeIdx, position: &UBig, value: T) -> Result<()> {
        let (leaf, offset) = self.locate_position(id, position)?;
        return self.leaf_mut(leaf)?.set(offset, value);
    }

    // =========================================================================
    // Public access
    // =========================================================================

    /// Element at `index`.
    pub fn get(&self, index: impl Into<UBig>) -> Result<&T> {
        return self.get_ref(&index.into());
    }

    /// Overwrite the element at `index`.
    pub fn set(&mut self, index: impl Into<UBig>, value: T) -> Result<()> {
        let index = index.into();
        self.check_index(&index)?;
        let (leaf, offset) = self.locate_element(&index)?;
        self.leaf_mut(leaf)?.set(offset, value)?;
        return self.checked();
    }

    pub fn first(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        return self.get_ref(&zero()).ok();
    }

    pub fn last(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        return self.get_ref(&(self.len() - one())).ok();
    }

    /// Leaf runs covering `len` elements of `span`, in request order.
    pub(super) fn leaf_chunks(&self, span: Span, len: UBig) -> Result<Vec<LeafChunk>> {
        let mut chunks = Vec::new();
        let mut pending = vec![(span, zero(), len)];
        while let Some((span, r, len)) = pending.pop() {
            if len == zero() {
                continue;
            }
            if self.node(span.node).is_leaf() {
                chunks.push(LeafChunk {
                    leaf: span.node,
                    start: small(&span.pos)?,
                    len: small(&len)?,
                    flip: span.flip,
                });
                continue;
            }
            let mut pieces = self.pieces(&span, &r, &len)?;
            pieces.sort_by(|a, b| b.r.cmp(&a.r));
            pending.extend(pieces.into_iter().map(|piece| (piece.span, piece.r, piece.len)));
        }
        return Ok(chunks);
    }
}

impl<T: Clone> BigList<T> {
    /// Copy `dest.len()` elements starting at `index` into `dest`.
    pub fn copy_to_slice(&self, index: impl Into<UBig>, dest: &mut [T]) -> Result<()> {
        let index = index.into();
        let count = big(dest.len());
        self.check_range(&index, &count)?;
        let mut written = 0;
        for chunk in self.leaf_chunks(self.root_span(&index, &count), count)? {
            let values = self.leaf(chunk.leaf)?.slice(chunk.start, chunk.len)?;
            let slots = &mut dest[written..written + chunk.len];
            slots.clone_from_slice(values);
            if chunk.flip {
                slots.reverse();
            }
            written += chunk.len;
        }
        return Ok(());
    }
}

impl<T: Default> BigList<T> {
    /// Reset `count` elements starting at `index` to `T::default()`.
    pub fn clear_range(&mut self, index: impl Into<UBig>, count: impl Into<UBig>) -> Result<()> {
        let (index, count) = (index.into(), count.into());
        self.check_range(&index, &count)?;
        for chunk in self.leaf_chunks(self.root_span(&index, &count), count)? {
            self.leaf_mut(chunk.leaf)?.clear_range(chunk.start, chunk.len)?;
        }
        return self.checked();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BigListConfig;

    fn numbers(count: u32) -> BigList<u32> {
        let mut list = BigList::with_config(BigListConfig::new(2, 2).unwrap());
        for i in 0..count {
            list.add(i).unwrap();
        }
        return list;
    }

    #[test]
    fn get_and_set_across_levels() {
        let mut list = numbers(50);
        assert!(list.depth() > 2);
        for i in 0..50usize {
            assert_eq!(*list.get(i).unwrap(), i as u32);
        }
        list.set(37usize, 1000).unwrap();
        assert_eq!(*list.get(37usize).unwrap(), 1000);
        assert!(matches!(list.get(50usize), Err(Error::IndexOutOfRange { .. })));
        assert_eq!(list.first(), Some(&0));
        assert_eq!(list.last(), Some(&49));
    }

    #[test]
    fn reads_follow_reversal() {
        let mut list = numbers(20);
        list.reverse_range(3usize, 10usize).unwrap();
        list.reverse();
        let expected: Vec<u32> = {
            let mut v: Vec<u32> = (0..20).collect();
            v[3..13].reverse();
            v.reverse();
            v
        };
        for (i, value) in expected.iter().enumerate() {
            assert_eq!(list.get(i).unwrap(), value);
        }
        let mut slice = [0u32; 9];
        list.copy_to_slice(5usize, &mut slice).unwrap();
        assert_eq!(&slice[..], &expected[5..14]);
    }

    #[test]
    fn clear_range_resets_to_default() {
        let mut list = numbers(12);
        list.clear_range(2usize, 7usize).unwrap();
        assert_eq!(list.to_vec().unwrap(), vec![0, 1, 0, 0, 0, 0, 0, 0, 0, 9, 10, 11]);
        assert!(list.clear_range(10usize, 3usize).is_err());
    }
}
