//! Lazy reversal.
//!
//! Reversing a whole subtree toggles its flag. A bounded range descends to
//! the node where the range spans several branches. There the branches fully
//! inside the range are mirrored in the branch array and have their flags
//! toggled, and the two partial boundary parts trade places through the copy
//! engine, each read backwards. The mirrored block lies strictly between the
//! two boundary branches, so a partially sized last branch never moves.
//!
//! Boundary parts of different sizes cannot trade places in place. The
//! surplus of the longer part is removed and set aside, the now balanced
//! range is reversed as above, and the surplus is inserted back reversed at
//! its mirrored place. Only boundary elements move.

use ibig::UBig;

use super::copy::{copy_range, Across, Direction, Span, Within};
use super::{BigList, NodeIdx};
use crate::error::Result;
use crate::num::{materializable, one, small, zero};

impl<T> BigList<T> {
    /// Reverse the whole list in O(1).
    pub fn reverse(&mut self) {
        let root = self.root;
        let node = self.node_mut(root);
        node.reversed = !node.reversed;
    }

    /// Mirror branches `from..to` of `id` and toggle their flags.
    pub(super) fn mirror_branches(&mut self, id: NodeIdx, from: usize, to: usize) -> Result<()> {
        if from >= to {
            return Ok(());
        }
        let (branches, high_length) = self.branches_mut(id)?;
        branches[from..to].reverse();
        high_length.reverse(from..to);
        let middle = branches[from..to].to_vec();
        for branch in middle {
            let node = self.node_mut(branch);
            node.reversed = !node.reversed;
        }
        return self.relink_range(id, from, to);
    }
}

impl<T: Clone> BigList<T> {
    /// Reverse `count` elements starting at `index`.
    pub fn reverse_range(&mut self, index: impl Into<UBig>, count: impl Into<UBig>) -> Result<()> {
        let (index, count) = (index.into(), count.into());
        self.check_range(&index, &count)?;
        if count <= one() {
            return Ok(());
        }
        if count == self.node(self.root).length {
            self.reverse();
            return self.checked();
        }

        let mut id = self.root;
        let mut start = index.clone();
        // Whether the positional order of `id` runs against the list order.
        let mut flip = false;
        loop {
            let node = self.node(id);
            flip ^= node.reversed;
            let position = node.range_position(&start, &count);
            if node.is_leaf() {
                self.leaf_mut(id)?.reverse(small(&position)?, small(&count)?)?;
                return self.checked();
            }

            let (first, first_offset) = self.locate(id, &position)?;
            let (last, last_offset) = self.locate(id, &(&position + &count - one()))?;
            if first == last {
                let child = self.branch_at(id, first)?;
                let child_node = self.node_mut(child);
                if child_node.length == count {
                    child_node.reversed = !child_node.reversed;
                    return self.checked();
                }
                id = child;
                start = first_offset;
                continue;
            }

            let head_branch = self.branch_at(id, first)?;
            let head = &self.node(head_branch).length - &first_offset;
            let tail = last_offset + one();
            if head != tail {
                let (lead, trail) = if flip { (tail, head) } else { (head, tail) };
                debug_log!(node = id, lead = %lead, trail = %trail, "setting the boundary surplus aside");
                return self.reverse_unbalanced(&index, &count, &lead, &trail);
            }
            debug_log!(node = id, first, last, "reversing range by mirroring branches");
            self.swap_mirrored(id, &position, &count, &head)?;
            self.mirror_branches(id, first + 1, last)?;
            return self.checked();
        }
    }

    /// Reverse `index..index + count` whose logical front part `lead` and back
    /// part `trail` lie in different branches and differ in size.
    fn reverse_unbalanced(&mut self, index: &UBig, count: &UBig, lead: &UBig, trail: &UBig) -> Result<()> {
        let middle = count - lead - trail;
        // The surplus sits at the inner end of the longer part and lands next
        // to where that part's balanced remainder ends up.
        let (surplus, taken_at, put_at) = if lead > trail {
            (lead - trail, index + trail, index + trail + &middle)
        } else {
            (trail - lead, index + lead + &middle, index + lead)
        };
        let mut moved: Vec<T> = self
            .iter_from(taken_at.clone())?
            .take(materializable(&surplus)?)
            .cloned()
            .collect();
        moved.reverse();
        self.remove_range(taken_at, surplus.clone())?;
        self.reverse_range(index.clone(), count - &surplus)?;
        self.insert_items(put_at, moved)?;
        return self.checked();
    }

    /// Swap the first and last `part` positions of `position..position + count`
    /// in `id`, reading each backwards.
    fn swap_mirrored(&mut self, id: NodeIdx, position: &UBig, count: &UBig, part: &UBig) -> Result<()> {
        let tail_start = position + count - part;
        let head_span = Span::new(id, position.clone(), false);
        let tail_span = Span::new(id, tail_start.clone(), false);

        let saved = self.save_positional(head_span, part)?;
        copy_range(
            &mut Within(self),
            tail_span,
            Span::new(id, position.clone(), true),
            part.clone(),
            Direction::LeftToRight,
        )?;
        let src = saved.root_span(&zero(), part);
        copy_range(
            &mut Across {
                source: &saved,
                target: &mut *self,
            },
            src,
            Span::new(id, tail_start, true),
            part.clone(),
            Direction::LeftToRight,
        )?;
        return Ok(());
    }

    /// Copy `count` positions of `span` into a fresh list.
    fn save_positional(&self, span: Span, count: &UBig) -> Result<BigList<T>> {
        let filler = self.positional_get(span.node, &span.pos)?.clone();
        let mut saved = BigList::with_config(self.config);
        saved.grow_side(count, &filler, true)?;
        let dst = saved.root_span(&zero(), count);
        copy_range(
            &mut Across {
                source: self,
                target: &mut saved,
            },
            span,
            dst,
            count.clone(),
            Direction::LeftToRight,
        )?;
        return Ok(saved);
    }
}
