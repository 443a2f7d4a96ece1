//! Bounded flat storage for the bottom level of the tree.
//!
//! A leaf is a `Vec<T>` plus a capacity bound that never exceeds the
//! configured leaf size. The backing vector is allocated lazily, so a freshly
//! created canonical tree costs nothing per element until it is filled.

use crate::error::{Error, Result};

#[derive(Clone, Debug)]
pub(crate) struct LeafStorage<T> {
    /// Stored elements in positional order.
    items: Vec<T>,
    /// Maximum number of elements.
    bound: usize,
}

impl<T> LeafStorage<T> {
    pub(crate) fn new(bound: usize) -> LeafStorage<T> {
        return LeafStorage {
            items: Vec::new(),
            bound,
        };
    }

    pub(crate) fn from_vec(items: Vec<T>, bound: usize) -> Result<LeafStorage<T>> {
        if items.len() > bound {
            return Err(Error::internal("leaf contents exceed its bound"));
        }
        return Ok(LeafStorage { items, bound });
    }

    #[inline(always)]
    pub(crate) fn len(&self) -> usize {
        return self.items.len();
    }

    #[inline(always)]
    pub(crate) fn capacity(&self) -> usize {
        return self.bound;
    }

    #[inline(always)]
    pub(crate) fn room(&self) -> usize {
        return self.bound - self.items.len();
    }

    pub(crate) fn set_capacity(&mut self, bound: usize) -> Result<()> {
        if bound < self.items.len() {
            return Err(Error::internal("leaf bound below its length"));
        }
        self.bound = bound;
        return Ok(());
    }

    #[inline]
    pub(crate) fn get(&self, index: usize) -> Option<&T> {
        return self.items.get(index);
    }

    #[inline]
    pub(crate) fn set(&mut self, index: usize, value: T) -> Result<()> {
        match self.items.get_mut(index) {
            Some(slot) => {
                *slot = value;
                return Ok(());
            }
            None => return Err(Error::internal("leaf write past its length")),
        }
    }

    #[inline]
    pub(crate) fn as_slice(&self) -> &[T] {
        return &self.items;
    }

    pub(crate) fn slice(&self, start: usize, len: usize) -> Result<&[T]> {
        return self
            .items
            .get(start..start + len)
            .ok_or_else(|| Error::internal("leaf read past its length"));
    }

    pub(crate) fn slice_mut(&mut self, start: usize, len: usize) -> Result<&mut [T]> {
        return self
            .items
            .get_mut(start..start + len)
            .ok_or_else(|| Error::internal("leaf write past its length"));
    }

    /// Insert `values` in order so the first lands at `index`.
    pub(crate) fn insert_chunk(&mut self, index: usize, values: Vec<T>) -> Result<()> {
        if values.len() > self.room() || index > self.items.len() {
            return Err(Error::internal("leaf insert without room"));
        }
        self.items.splice(index..index, values);
        return Ok(());
    }

    pub(crate) fn remove_at(&mut self, index: usize) -> Result<T> {
        if index >= self.items.len() {
            return Err(Error::internal("leaf remove past its length"));
        }
        return Ok(self.items.remove(index));
    }

    /// Drop `len` elements starting at `start`.
    pub(crate) fn remove_range(&mut self, start: usize, len: usize) -> Result<()> {
        if start + len > self.items.len() {
            return Err(Error::internal("leaf range removal past its length"));
        }
        self.items.drain(start..start + len);
        return Ok(());
    }

    /// Drop `count` elements from the front or the back.
    pub(crate) fn truncate_side(&mut self, back: bool, count: usize) -> Result<()> {
        let len = self.items.len();
        if count > len {
            return Err(Error::internal("leaf truncation past its length"));
        }
        if back {
            self.items.truncate(len - count);
        } else {
            self.items.drain(..count);
        }
        return Ok(());
    }

    /// Remove `count` elements from the front or the back and return them in
    /// positional order.
    pub(crate) fn take_side(&mut self, back: bool, count: usize) -> Result<Vec<T>> {
        let len = self.items.len();
        if count > len {
            return Err(Error::internal("leaf take past its length"));
        }
        if back {
            return Ok(self.items.split_off(len - count));
        }
        return Ok(self.items.drain(..count).collect());
    }

    /// Overwrite `values.len()` elements starting at `start`.
    pub(crate) fn overwrite(&mut self, start: usize, values: Vec<T>) -> Result<()> {
        let slots = self.slice_mut(start, values.len())?;
        for (slot, value) in slots.iter_mut().zip(values) {
            *slot = value;
        }
        return Ok(());
    }

    pub(crate) fn reverse(&mut self, start: usize, len: usize) -> Result<()> {
        self.slice_mut(start, len)?.reverse();
        return Ok(());
    }

    /// Move every element out, leaving the leaf empty with the same bound.
    pub(crate) fn take_all(&mut self) -> Vec<T> {
        return std::mem::take(&mut self.items);
    }

    /// Release the elements and the backing allocation.
    pub(crate) fn dispose(&mut self) {
        self.items = Vec::new();
    }
}

impl<T: Clone> LeafStorage<T> {
    /// Add `count` copies of `filler` at the front or the back.
    pub(crate) fn extend_side(&mut self, back: bool, count: usize, filler: &T) -> Result<()> {
        if count > self.room() {
            return Err(Error::internal("leaf extension without room"));
        }
        if back {
            self.items.extend(std::iter::repeat_n(filler.clone(), count));
        } else {
            self.items.splice(0..0, std::iter::repeat_n(filler.clone(), count));
        }
        return Ok(());
    }

    pub(crate) fn get_range(&self, start: usize, len: usize) -> Result<Vec<T>> {
        return Ok(self.slice(start, len)?.to_vec());
    }
}

impl<T: Default> LeafStorage<T> {
    /// Reset `len` elements starting at `start` to `T::default()`.
    pub(crate) fn clear_range(&mut self, start: usize, len: usize) -> Result<()> {
        for slot in self.slice_mut(start, len)? {
            *slot = T::default();
        }
        return Ok(());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_insert() {
        let mut leaf = LeafStorage::new(4);
        leaf.insert_chunk(0, vec!['d']).unwrap();
        leaf.insert_chunk(0, vec!['a', 'b']).unwrap();
        leaf.insert_chunk(2, vec!['c']).unwrap();
        assert_eq!(leaf.as_slice(), &['a', 'b', 'c', 'd']);
        assert!(leaf.insert_chunk(1, vec!['x']).is_err());
        assert!(leaf.insert_chunk(9, Vec::new()).is_err());
        assert_eq!(leaf.room(), 0);
    }

    #[test]
    fn side_edits() {
        let mut leaf = LeafStorage::from_vec(vec![1, 2, 3], 8).unwrap();
        leaf.extend_side(false, 2, &0).unwrap();
        leaf.extend_side(true, 1, &9).unwrap();
        assert_eq!(leaf.as_slice(), &[0, 0, 1, 2, 3, 9]);
        leaf.truncate_side(false, 3).unwrap();
        leaf.truncate_side(true, 1).unwrap();
        assert_eq!(leaf.as_slice(), &[2, 3]);
        assert!(leaf.truncate_side(true, 3).is_err());

        let mut leaf = LeafStorage::from_vec(vec![1, 2, 3, 4, 5], 8).unwrap();
        assert_eq!(leaf.take_side(true, 2).unwrap(), vec![4, 5]);
        assert_eq!(leaf.take_side(false, 1).unwrap(), vec![1]);
        assert_eq!(leaf.as_slice(), &[2, 3]);
        assert!(leaf.take_side(false, 3).is_err());
    }

    #[test]
    fn range_edits() {
        let mut leaf = LeafStorage::from_vec((0..8).collect(), 8).unwrap();
        leaf.reverse(2, 4).unwrap();
        assert_eq!(leaf.as_slice(), &[0, 1, 5, 4, 3, 2, 6, 7]);
        leaf.clear_range(0, 2).unwrap();
        leaf.remove_range(6, 2).unwrap();
        assert_eq!(leaf.as_slice(), &[0, 0, 5, 4, 3, 2]);

        let mut other = LeafStorage::from_vec(vec![9; 4], 4).unwrap();
        other.overwrite(1, leaf.get_range(2, 3).unwrap()).unwrap();
        assert_eq!(other.as_slice(), &[9, 5, 4, 3]);
        assert!(leaf.set_capacity(5).is_err());
    }
}
