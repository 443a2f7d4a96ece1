//! Copy-range engine.
//!
//! Copies `len` elements between two spans that may sit at any depth of the
//! same tree or of two different trees. A span is a node, a start offset in
//! that node's positional order, and a flip saying whether the request walks
//! the span backwards.
//!
//! The engine runs an explicit worklist. Every task carries `r`, its offset
//! from the start of the request, and is classified as:
//!
//! 1. leaf to leaf: bulk copy through a snapshot, mirrored when the flips differ
//! 2. target is a leaf, or the source fragment is larger: split by source branches
//! 3. source is a leaf, or the source fragment is smaller: split by target branches
//! 4. equal fragments: split both sides and intersect the pieces in `r`
//!
//! Sub-tasks are pushed so they pop in ascending `r` (left to right) or
//! descending `r` (right to left). Within one tree, choosing the direction by
//! the relative order of source and target makes overlapping copies behave
//! as if the source had been snapshotted first.
//!
//! The engine only overwrites existing positions. Callers grow the target
//! beforehand.

use ibig::UBig;
use smallvec::SmallVec;

use super::{BigList, NodeIdx};
use crate::error::{Error, Result};
use crate::num::{materializable, min, small, zero};
use crate::profiling;

/// A run of positions in one node, walked forward or backward.
#[derive(Clone, Debug)]
pub(super) struct Span {
    pub(super) node: NodeIdx,
    /// First position (in the node's positional order) covered by the span.
    pub(super) pos: UBig,
    /// Walk the positions backwards.
    pub(super) flip: bool,
}

impl Span {
    pub(super) fn new(node: NodeIdx, pos: UBig, flip: bool) -> Span {
        return Span { node, pos, flip };
    }

    /// The part of this span (which covers `base_r..base_r + base_len`) that
    /// covers `sub_r..sub_r + sub_len`.
    fn narrow(&self, base_r: &UBig, base_len: &UBig, sub_r: &UBig, sub_len: &UBig) -> Span {
        let offset = if self.flip {
            base_r + base_len - sub_r - sub_len
        } else {
            sub_r - base_r
        };
        return Span::new(self.node, &self.pos + offset, self.flip);
    }
}

/// A span one level down, produced by splitting a span along branch
/// boundaries.
#[derive(Clone, Debug)]
pub(super) struct Piece {
    pub(super) span: Span,
    pub(super) r: UBig,
    pub(super) len: UBig,
}

#[derive(Debug)]
struct Task {
    src: Span,
    dst: Span,
    r: UBig,
    len: UBig,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Direction {
    LeftToRight,
    RightToLeft,
}

/// Source and target of one engine run.
pub(super) trait CopyPair<T> {
    fn source(&self) -> &BigList<T>;
    fn target(&self) -> &BigList<T>;
    fn target_mut(&mut self) -> &mut BigList<T>;
}

/// Copy inside one list.
pub(super) struct Within<'a, T>(pub(super) &'a mut BigList<T>);

/// Copy between two lists.
pub(super) struct Across<'a, 'b, T> {
    pub(super) source: &'a BigList<T>,
    pub(super) target: &'b mut BigList<T>,
}

impl<T> CopyPair<T> for Within<'_, T> {
    fn source(&self) -> &BigList<T> {
        return &*self.0;
    }

    fn target(&self) -> &BigList<T> {
        return &*self.0;
    }

    fn target_mut(&mut self) -> &mut BigList<T> {
        return &mut *self.0;
    }
}

impl<T> CopyPair<T> for Across<'_, '_, T> {
    fn source(&self) -> &BigList<T> {
        return self.source;
    }

    fn target(&self) -> &BigList<T> {
        return &*self.target;
    }

    fn target_mut(&mut self) -> &mut BigList<T> {
        return &mut *self.target;
    }
}

impl<T> BigList<T> {
    /// Span of the root covering logical `index..index + count`.
    pub(super) fn root_span(&self, index: &UBig, count: &UBig) -> Span {
        let root = self.node(self.root);
        return Span::new(self.root, root.range_position(index, count), root.reversed);
    }

    /// Split a span (covering `r..r + len` of its request) along the branch
    /// boundaries of its node. Empty branches produce no piece.
    pub(super) fn pieces(&self, span: &Span, r: &UBig, len: &UBig) -> Result<SmallVec<[Piece; 8]>> {
        let (branches, high_length) = self.branches(span.node)?;
        let (mut index, mut offset) = high_length.index_of_not_greater_sum(&span.pos);
        let mut pieces = SmallVec::new();
        let mut done = zero();
        while done < *len {
            let Some(&branch) = branches.get(index) else {
                return Err(Error::internal("span runs past the end of its node"));
            };
            let child = self.node(branch);
            if child.length == zero() {
                index += 1;
                continue;
            }
            let take = min(&(&child.length - &offset), &(len - &done));
            let pos = if child.reversed {
                &child.length - &offset - &take
            } else {
                offset.clone()
            };
            let piece_r = if span.flip {
                r + (len - &done - &take)
            } else {
                r + &done
            };
            pieces.push(Piece {
                span: Span::new(branch, pos, span.flip ^ child.reversed),
                r: piece_r,
                len: take.clone(),
            });
            done += take;
            index += 1;
            offset = zero();
        }
        return Ok(pieces);
    }
}

/// Copy `len` elements from `src` to `dst`.
pub(super) fn copy_range<T: Clone, P: CopyPair<T>>(
    pair: &mut P,
    src: Span,
    dst: Span,
    len: UBig,
    direction: Direction,
) -> Result<()> {
    let mut tasks = vec![Task { src, dst, r: zero(), len }];
    while let Some(task) = tasks.pop() {
        if task.len == zero() {
            continue;
        }
        profiling::copy_task();

        let source = pair.source().node(task.src.node);
        let target = pair.target().node(task.dst.node);
        let (src_leaf, dst_leaf) = (source.is_leaf(), target.is_leaf());

        let mut subtasks: SmallVec<[Task; 8]> = SmallVec::new();
        if src_leaf && dst_leaf {
            copy_leaf_chunk(pair, &task)?;
            continue;
        } else if dst_leaf || (!src_leaf && source.fragment > target.fragment) {
            trace_log!(r = %task.r, len = %task.len, "split by source");
            for piece in pair.source().pieces(&task.src, &task.r, &task.len)? {
                let dst = task.dst.narrow(&task.r, &task.len, &piece.r, &piece.len);
                subtasks.push(Task {
                    src: piece.span,
                    dst,
                    r: piece.r,
                    len: piece.len,
                });
            }
        } else if src_leaf || source.fragment < target.fragment {
            trace_log!(r = %task.r, len = %task.len, "split by target");
            for piece in pair.target().pieces(&task.dst, &task.r, &task.len)? {
                let src = task.src.narrow(&task.r, &task.len, &piece.r, &piece.len);
                subtasks.push(Task {
                    src,
                    dst: piece.span,
                    r: piece.r,
                    len: piece.len,
                });
            }
        } else {
            trace_log!(r = %task.r, len = %task.len, "split both sides");
            let mut src_pieces = pair.source().pieces(&task.src, &task.r, &task.len)?;
            let mut dst_pieces = pair.target().pieces(&task.dst, &task.r, &task.len)?;
            src_pieces.sort_by(|a, b| a.r.cmp(&b.r));
            dst_pieces.sort_by(|a, b| a.r.cmp(&b.r));
            intersect(&src_pieces, &dst_pieces, &task, &mut subtasks)?;
        }

        subtasks.sort_by(|a, b| a.r.cmp(&b.r));
        match direction {
            Direction::LeftToRight => tasks.extend(subtasks.into_iter().rev()),
            Direction::RightToLeft => tasks.extend(subtasks),
        }
    }
    return Ok(());
}

/// Pair up two partitions of the same `r` range into matching sub-tasks.
fn intersect(src: &[Piece], dst: &[Piece], task: &Task, out: &mut SmallVec<[Task; 8]>) -> Result<()> {
    let end = &task.r + &task.len;
    let mut cursor = task.r.clone();
    let (mut i, mut j) = (0, 0);
    while cursor < end {
        let (Some(a), Some(b)) = (src.get(i), dst.get(j)) else {
            return Err(Error::internal("copy pieces do not cover the task"));
        };
        let a_end = &a.r + &a.len;
        let b_end = &b.r + &b.len;
        let stop = min(&a_end, &b_end);
        let len = &stop - &cursor;
        out.push(Task {
            src: a.span.narrow(&a.r, &a.len, &cursor, &len),
            dst: b.span.narrow(&b.r, &b.len, &cursor, &len),
            r: cursor,
            len,
        });
        if a_end == stop {
            i += 1;
        }
        if b_end == stop {
            j += 1;
        }
        cursor = stop;
    }
    return Ok(());
}

// =============================================================================
// Public copy surface
// =============================================================================

impl<T: Clone> BigList<T> {
    /// Copy `count` elements starting at `index` into `dest` at `dest_index`.
    /// `dest` grows at its end when the copy runs past its length.
    pub fn copy_to(
        &self,
        index: impl Into<UBig>,
        dest: &mut BigList<T>,
        dest_index: impl Into<UBig>,
        count: impl Into<UBig>,
    ) -> Result<()> {
        let (index, dest_index, count) = (index.into(), dest_index.into(), count.into());
        self.check_range(&index, &count)?;
        dest.check_gap(&dest_index)?;
        if count == zero() {
            return Ok(());
        }
        let end = &dest_index + &count;
        let dest_len = dest.len();
        if end > dest_len {
            let filler = self.get_ref(&index)?.clone();
            dest.grow_side(&(&end - &dest_len), &filler, true)?;
        }
        let src = self.root_span(&index, &count);
        let dst = dest.root_span(&dest_index, &count);
        copy_range(
            &mut Across {
                source: self,
                target: &mut *dest,
            },
            src,
            dst,
            count,
            Direction::LeftToRight,
        )?;
        return dest.checked();
    }

    /// Copy `count` elements from `index` to `dest_index` inside this list.
    /// Overlapping ranges read as if the source had been copied out first.
    pub fn copy_within(
        &mut self,
        index: impl Into<UBig>,
        dest_index: impl Into<UBig>,
        count: impl Into<UBig>,
    ) -> Result<()> {
        let (index, dest_index, count) = (index.into(), dest_index.into(), count.into());
        self.check_range(&index, &count)?;
        self.check_gap(&dest_index)?;
        if count == zero() || index == dest_index {
            return Ok(());
        }
        let end = &dest_index + &count;
        let len = self.len();
        if end > len {
            let filler = self.get_ref(&index)?.clone();
            self.grow_side(&(&end - &len), &filler, true)?;
        }
        let direction = if dest_index > index {
            Direction::RightToLeft
        } else {
            Direction::LeftToRight
        };
        let src = self.root_span(&index, &count);
        let dst = self.root_span(&dest_index, &count);
        copy_range(&mut Within(self), src, dst, count, direction)?;
        return self.checked();
    }

    /// A new list holding a copy of `count` elements starting at `index`.
    pub fn get_range(&self, index: impl Into<UBig>, count: impl Into<UBig>) -> Result<BigList<T>> {
        let (index, count) = (index.into(), count.into());
        self.check_range(&index, &count)?;
        let mut range = BigList::with_config(self.config);
        self.copy_to(index, &mut range, zero(), count)?;
        return Ok(range);
    }

    /// Overwrite elements starting at `index` with a copy of `other`,
    /// growing at the end when `other` runs past the length.
    pub fn set_range(&mut self, index: impl Into<UBig>, other: &BigList<T>) -> Result<()> {
        return other.copy_to(zero(), self, index, other.len());
    }

    /// Every element in logical order. Fails with [`Error::TooLarge`] when the
    /// length does not fit in memory.
    pub fn to_vec(&self) -> Result<Vec<T>> {
        let mut items = Vec::with_capacity(materializable(&self.len())?);
        items.extend(self.iter().cloned());
        return Ok(items);
    }
}

fn copy_leaf_chunk<T: Clone, P: CopyPair<T>>(pair: &mut P, task: &Task) -> Result<()> {
    let count = small(&task.len)?;
    let mut chunk = pair
        .source()
        .leaf(task.src.node)?
        .get_range(small(&task.src.pos)?, count)?;
    if task.src.flip != task.dst.flip {
        chunk.reverse();
    }
    let start = small(&task.dst.pos)?;
    pair.target_mut().leaf_mut(task.dst.node)?.overwrite(start, chunk)?;
    profiling::leaf_copy();
    return Ok(());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BigListConfig;

    fn numbers(config: BigListConfig, count: u32) -> BigList<u32> {
        return BigList::from_vec_in(config, (0..count).collect()).unwrap();
    }

    fn small_config() -> BigListConfig {
        return BigListConfig::new(2, 2).unwrap();
    }

    #[test]
    fn overlapping_copies_within() {
        let mut list = numbers(small_config(), 40);
        let mut oracle: Vec<u32> = (0..40).collect();
        list.copy_within(3usize, 9usize, 25usize).unwrap();
        oracle.copy_within(3..28, 9);
        assert_eq!(list.to_vec().unwrap(), oracle);
        list.copy_within(20usize, 1usize, 19usize).unwrap();
        oracle.copy_within(20..39, 1);
        assert_eq!(list.to_vec().unwrap(), oracle);
        list.verify().unwrap();
    }

    #[test]
    fn copy_within_grows_past_the_end() {
        let mut list = numbers(small_config(), 10);
        list.copy_within(2usize, 8usize, 5usize).unwrap();
        assert_eq!(list.to_vec().unwrap(), vec![0, 1, 2, 3, 4, 5, 6, 7, 2, 3, 4, 5, 6]);
        list.verify().unwrap();
    }

    #[test]
    fn copy_across_shapes_and_directions() {
        let mut source = numbers(small_config(), 70);
        source.reverse_range(5usize, 50usize).unwrap();
        let mut oracle: Vec<u32> = (0..70).collect();
        oracle[5..55].reverse();

        let mut dest = numbers(BigListConfig::new(3, 2).unwrap(), 30);
        dest.reverse();
        let mut expected: Vec<u32> = (0..30).rev().collect();
        source.copy_to(10usize, &mut dest, 20usize, 45usize).unwrap();
        expected.truncate(20);
        expected.extend_from_slice(&oracle[10..55]);
        assert_eq!(dest.to_vec().unwrap(), expected);
        dest.verify().unwrap();
    }

    #[test]
    fn get_and_set_range() {
        let mut list = numbers(small_config(), 30);
        let middle = list.get_range(10usize, 12usize).unwrap();
        assert_eq!(middle.to_vec().unwrap(), (10..22).collect::<Vec<u32>>());
        list.set_range(25usize, &middle).unwrap();
        assert_eq!(list.len(), UBig::from(37u8));
        assert_eq!(*list.get(36usize).unwrap(), 21);
        assert!(list.get_range(25usize, 13usize).is_err());
    }
}
