//! The boxes of one line.
//!
//! [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
//!
//! "The height of each inline-level box in the line box is calculated. [...]
//! The inline-level boxes are aligned vertically according to their
//! 'vertical-align' property."
//!
//! Vertical alignment is defined on the tree of inline boxes that share a
//! line. That tree is rebuilt for every line in a small arena with
//! parent/child/sibling links and dropped once the line's fragments exist.

use std::ops::{Index, IndexMut};
use std::rc::Rc;

use crate::box_tree::BoxId;
use crate::layout::tree::LayoutId;
use crate::style::properties::ComputedProperties;

/// Index into [`GeneratedBoxes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct GenId(pub(crate) usize);

/// What a generated box stands for.
#[derive(Debug, Clone)]
pub(crate) enum GenKind {
    /// The root inline box: the container's strut.
    Root,
    /// The part of an inline element on this line.
    Span {
        node: LayoutId,
        first: bool,
        last: bool,
    },
    /// A piece of text.
    Text {
        box_id: BoxId,
        parent: LayoutId,
        text: String,
        start: usize,
        end: usize,
    },
    /// An atomic inline.
    Atomic { node: LayoutId },
    /// The static position of an absolutely positioned box.
    Marker { node: LayoutId },
}

/// One box of the line.
#[derive(Debug, Clone)]
pub(crate) struct GenBox {
    pub(crate) kind: GenKind,
    pub(crate) style: Rc<ComputedProperties>,
    pub(crate) parent: Option<GenId>,
    pub(crate) first_child: Option<GenId>,
    pub(crate) last_child: Option<GenId>,
    pub(crate) next_sibling: Option<GenId>,
    /// Start x relative to the line start, before alignment.
    pub(crate) x: f32,
    /// End x for spans; advance width otherwise.
    pub(crate) end: f32,
    /// Distance from the baseline to the top of the box's layout bounds.
    pub(crate) ascent: f32,
    /// Distance from the baseline to the bottom of the layout bounds.
    pub(crate) descent: f32,
    /// Baseline position relative to the line's baseline, positive down.
    pub(crate) offset: f32,
}

/// Arena of the boxes of one line. Index 0 is the root.
#[derive(Debug)]
pub(crate) struct GeneratedBoxes {
    boxes: Vec<GenBox>,
}

impl Index<GenId> for GeneratedBoxes {
    type Output = GenBox;

    fn index(&self, id: GenId) -> &GenBox {
        &self.boxes[id.0]
    }
}

impl IndexMut<GenId> for GeneratedBoxes {
    fn index_mut(&mut self, id: GenId) -> &mut GenBox {
        &mut self.boxes[id.0]
    }
}

impl GeneratedBoxes {
    pub(crate) const ROOT: GenId = GenId(0);

    /// An arena holding only the root, styled like the container.
    pub(crate) fn new(container_style: Rc<ComputedProperties>) -> Self {
        Self {
            boxes: vec![GenBox {
                kind: GenKind::Root,
                style: container_style,
                parent: None,
                first_child: None,
                last_child: None,
                next_sibling: None,
                x: 0.0,
                end: 0.0,
                ascent: 0.0,
                descent: 0.0,
                offset: 0.0,
            }],
        }
    }

    /// Append a box as the last child of `parent`.
    pub(crate) fn push(&mut self, parent: GenId, kind: GenKind, style: Rc<ComputedProperties>, x: f32) -> GenId {
        let id = GenId(self.boxes.len());
        self.boxes.push(GenBox {
            kind,
            style,
            parent: Some(parent),
            first_child: None,
            last_child: None,
            next_sibling: None,
            x,
            end: x,
            ascent: 0.0,
            descent: 0.0,
            offset: 0.0,
        });
        match self[parent].last_child {
            Some(previous) => self[previous].next_sibling = Some(id),
            None => self[parent].first_child = Some(id),
        }
        self[parent].last_child = Some(id);
        id
    }

    /// Number of boxes, root included.
    pub(crate) fn len(&self) -> usize {
        self.boxes.len()
    }

    /// Ids in document order, root first.
    pub(crate) fn ids(&self) -> impl Iterator<Item = GenId> + use<> {
        (0..self.boxes.len()).map(GenId)
    }

    /// One past the last id of the subtree at `id`. Boxes are pushed in
    /// document order, so a subtree occupies a contiguous range.
    pub(crate) fn subtree_end(&self, id: GenId) -> usize {
        let mut last = id;
        while let Some(child) = self[last].last_child {
            last = child;
        }
        last.0 + 1
    }

    /// Children of `id` in order.
    pub(crate) fn children(&self, id: GenId) -> impl Iterator<Item = GenId> + '_ {
        std::iter::successors(self[id].first_child, |&c| self[c].next_sibling)
    }
}
