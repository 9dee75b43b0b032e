//! Text selection.
//!
//! A selection runs between two positions in the box tree. Positions are
//! ordered by the pre-order of their boxes, then by offset, so callers may
//! pass the endpoints in either order. Offsets count characters of a text
//! box's processed text.

use std::collections::HashMap;

use serde::Serialize;

use crate::box_tree::{BoxId, BoxTree};
use crate::error::{LayoutError, Result};

/// A point in the box tree: a box and a character offset inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TextPosition {
    /// A text box, or an element for a position before its content.
    pub node: BoxId,
    /// Character offset, clamped to the text length.
    pub offset: usize,
}

impl TextPosition {
    /// A position at `offset` in `node`.
    #[must_use]
    pub const fn new(node: BoxId, offset: usize) -> Self {
        Self { node, offset }
    }
}

/// A resolved selection: its endpoints and the selected character range of
/// every text box between them.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    start: TextPosition,
    end: TextPosition,
    ranges: HashMap<BoxId, (usize, usize)>,
}

impl Selection {
    /// Resolve a selection between `a` and `b` in `boxes`.
    ///
    /// # Errors
    ///
    /// [`LayoutError::StaleBox`] if an endpoint is not a live box of the tree.
    pub fn new(boxes: &BoxTree, a: TextPosition, b: TextPosition) -> Result<Self> {
        let order: HashMap<BoxId, usize> = boxes.iter().enumerate().map(|(i, id)| (id, i)).collect();
        let rank = |p: TextPosition| -> Result<(usize, usize)> {
            let index = order.get(&p.node).copied().ok_or(LayoutError::StaleBox(p.node))?;
            Ok((index, p.offset))
        };
        let (start, end) = if rank(a)? <= rank(b)? { (a, b) } else { (b, a) };
        let first = rank(start)?.0;
        let last = rank(end)?.0;

        let mut ranges = HashMap::new();
        for id in boxes.iter().skip(first).take(last - first + 1) {
            let Some(text) = boxes.text(id) else {
                continue;
            };
            let length = text.text.chars().count();
            let from = if id == start.node { start.offset.min(length) } else { 0 };
            let to = if id == end.node { end.offset.min(length) } else { length };
            if from < to {
                let _ = ranges.insert(id, (from, to));
            }
        }
        log::debug!("selection spans {} text boxes", ranges.len());
        Ok(Self { start, end, ranges })
    }

    /// The earlier endpoint.
    #[must_use]
    pub const fn start(&self) -> TextPosition {
        self.start
    }

    /// The later endpoint.
    #[must_use]
    pub const fn end(&self) -> TextPosition {
        self.end
    }

    /// True if no character is selected.
    #[must_use]
    pub fn is_collapsed(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Selected characters of a text box, as a half-open range.
    #[must_use]
    pub fn range_for(&self, text: BoxId) -> Option<(usize, usize)> {
        self.ranges.get(&text).copied()
    }

    /// Selected part of a fragment showing characters `start..end` of
    /// `text`, as a range local to the fragment.
    #[must_use]
    pub fn fragment_range(&self, text: BoxId, start: usize, end: usize) -> Option<(usize, usize)> {
        let (from, to) = self.range_for(text)?;
        let from = from.max(start);
        let to = to.min(end);
        (from < to).then(|| (from - start, to - start))
    }
}
