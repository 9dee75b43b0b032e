//! Finished line boxes.
//!
//! [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
//!
//! "The rectangular area that contains the boxes that form a line is called
//! a line box."

use serde::Serialize;

use crate::box_tree::BoxId;
use crate::layout::box_model::Rect;
use crate::layout::tree::LayoutId;

/// What a fragment shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FragmentKind {
    /// A run of text from one text box.
    Text {
        /// The text box.
        box_id: BoxId,
        /// The element whose style applies: the text box's parent.
        parent: LayoutId,
        /// The characters shown.
        text: String,
        /// First character, counted in the text box's processed text.
        start: usize,
        /// One past the last character.
        end: usize,
    },
    /// The part of a non-replaced inline element on one line. Its rect is
    /// the border box of that part.
    InlineBox {
        /// The inline element.
        node: LayoutId,
        /// The element starts on this line: its left edges are drawn.
        first: bool,
        /// The element ends on this line: its right edges are drawn.
        last: bool,
        /// Number of following fragments that are its descendants.
        descendants: usize,
    },
    /// An inline-block, inline-table or inline replaced element. Its rect is
    /// the margin box.
    Atomic {
        /// The atomic box.
        node: LayoutId,
    },
}

/// One positioned piece of a line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fragment {
    /// Variant data.
    pub kind: FragmentKind,
    /// Page rectangle; see [`FragmentKind`] for which box it describes.
    pub rect: Rect,
    /// Page y of the fragment's baseline.
    pub baseline: f32,
}

impl Fragment {
    /// Text fragments only: the text box and character range.
    #[must_use]
    pub fn text_range(&self) -> Option<(BoxId, usize, usize)> {
        match self.kind {
            FragmentKind::Text {
                box_id, start, end, ..
            } => Some((box_id, start, end)),
            _ => None,
        }
    }
}

/// A line box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineBox {
    /// The line box rectangle: the full available band, as tall as the line.
    pub rect: Rect,
    /// Page y of the line's baseline.
    pub baseline: f32,
    /// Fragments in document order; an [`FragmentKind::InlineBox`] precedes
    /// its descendants.
    pub fragments: Vec<Fragment>,
}

/// The line boxes of one block container.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InlineContent {
    /// Lines from top to bottom.
    pub lines: Vec<LineBox>,
}

impl InlineContent {
    /// Move every line and fragment.
    pub fn translate(&mut self, dx: f32, dy: f32) {
        for line in &mut self.lines {
            line.rect = line.rect.translate(dx, dy);
            line.baseline += dy;
            for fragment in &mut line.fragments {
                fragment.rect = fragment.rect.translate(dx, dy);
                fragment.baseline += dy;
            }
        }
    }

    /// Baseline of the last line, used to align inline-blocks.
    #[must_use]
    pub fn last_baseline(&self) -> Option<f32> {
        self.lines.last().map(|l| l.baseline)
    }

    /// Bottom of the last line.
    #[must_use]
    pub fn bottom(&self) -> Option<f32> {
        self.lines.last().map(|l| l.rect.bottom())
    }

    /// All fragments of all lines.
    pub fn fragments(&self) -> impl Iterator<Item = &Fragment> {
        self.lines.iter().flat_map(|l| l.fragments.iter())
    }
}
