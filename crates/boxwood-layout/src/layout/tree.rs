//! The layout tree.
//!
//! One [`LayoutNode`] per element box. Text boxes do not get nodes: they are
//! laid out as fragments of the line boxes of their block container.
//!
//! The tree is rebuilt from the box tree on every layout; it owns the block
//! formatting contexts and stacking contexts of that layout.

use std::collections::HashMap;
use std::ops::{Index, IndexMut};
use std::rc::Rc;

use serde::Serialize;

use crate::box_tree::{BoxId, BoxTree};
use crate::error::{LayoutError, Result};
use crate::resources::ImageHandle;
use crate::style::properties::ComputedProperties;
use crate::style::values::{Display, Position, ZIndex};

use super::box_model::{EdgeSizes, Point, Rect, Size};
use super::formatting_context::{BlockFormattingContext, ContextId};
use super::inline::line::InlineContent;
use super::stacking::{StackingContext, StackingId, sort_children};
use super::table::TableSizeGrid;

/// Index of a [`LayoutNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct LayoutId(pub(crate) usize);

/// A node's link to a context: either it owns one or it shares its
/// ancestor's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContextLink<T> {
    /// The node establishes this context.
    Root(T),
    /// The node participates in an ancestor's context.
    Inherited(T),
}

impl<T: Copy> ContextLink<T> {
    /// The linked context, owned or not.
    #[must_use]
    pub const fn id(&self) -> T {
        match *self {
            Self::Root(id) | Self::Inherited(id) => id,
        }
    }

    /// True if the node owns the context.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        matches!(self, Self::Root(_))
    }
}

/// A dimension that may still be waiting for a sizing pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SizeValue {
    /// Used value in pixels, meaningful once `expanding` is false.
    pub value: f32,
    /// The value depends on content and is filled by shrink-to-fit or by
    /// content layout.
    pub expanding: bool,
}

impl SizeValue {
    /// A determined size.
    #[must_use]
    pub const fn fixed(value: f32) -> Self {
        Self {
            value,
            expanding: false,
        }
    }

    /// A size to be determined from content.
    #[must_use]
    pub const fn expanding() -> Self {
        Self {
            value: 0.0,
            expanding: true,
        }
    }
}

/// Table-specific layout results.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TableData {
    /// Final column and row sizes.
    pub grid: TableSizeGrid,
    /// Height of the captions above the table box.
    pub caption_height: f32,
}

/// Replaced-element data.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReplacedData {
    /// The loaded image, if any.
    pub image: Option<ImageHandle>,
    /// [§ 10.3.2](https://www.w3.org/TR/CSS2/visudet.html#inline-replaced-width)
    /// Intrinsic size; zero when nothing is known.
    pub intrinsic: Size,
    /// True if an intrinsic width is known.
    pub has_intrinsic_width: bool,
    /// True if an intrinsic height is known.
    pub has_intrinsic_height: bool,
}

/// Layout node kinds.
#[derive(Debug, Clone, Serialize)]
pub enum LayoutKind {
    /// Block containers: blocks, list items, inline-blocks, table cells and
    /// captions.
    Block,
    /// A non-replaced inline element. Its geometry comes from its fragments.
    Inline,
    /// `table` or `inline-table`.
    Table(TableData),
    /// `table-row-group`, `table-header-group` or `table-footer-group`.
    TableRowGroup,
    /// `table-row`.
    TableRow,
    /// `table-column` or `table-column-group`.
    TableColumn,
    /// A replaced element.
    Replaced(ReplacedData),
}

/// One laid-out box.
#[derive(Debug, Clone)]
pub struct LayoutNode {
    /// The box this node lays out.
    pub box_id: BoxId,
    /// Computed style, shared with the box.
    pub style: Rc<ComputedProperties>,
    /// Variant data.
    pub kind: LayoutKind,
    /// Used `display`.
    pub display: Display,
    /// Layout parent.
    pub parent: Option<LayoutId>,
    /// Layout children in box order.
    pub children: Vec<LayoutId>,
    /// Used margins.
    pub margin: EdgeSizes,
    /// Used border widths.
    pub border: EdgeSizes,
    /// Used padding.
    pub padding: EdgeSizes,
    /// Content width.
    pub width: SizeValue,
    /// Content height.
    pub height: SizeValue,
    /// Width of the containing block, set by the parent before sizing.
    pub containing_width: f32,
    /// Height of the containing block when it is definite.
    pub containing_height: Option<f32>,
    /// Content box in page coordinates.
    pub content_box: Rect,
    /// Offset applied by `position: relative`.
    pub relative: Point,
    /// Where an absolutely positioned box would have been in normal flow.
    pub static_position: Point,
    /// Block formatting context link.
    pub formatting_context: ContextLink<ContextId>,
    /// Stacking context link.
    pub stacking_context: ContextLink<StackingId>,
    /// Line boxes, for block containers with inline content.
    pub inline_content: Option<InlineContent>,
}

impl LayoutNode {
    /// Padding box in page coordinates.
    #[must_use]
    pub fn padding_box(&self) -> Rect {
        self.content_box.expand(&self.padding)
    }

    /// Border box in page coordinates.
    #[must_use]
    pub fn border_box(&self) -> Rect {
        self.padding_box().expand(&self.border)
    }

    /// Margin box in page coordinates.
    #[must_use]
    pub fn margin_box(&self) -> Rect {
        self.border_box().expand(&self.margin)
    }

    /// Horizontal margin, border and padding.
    #[must_use]
    pub fn horizontal_edges(&self) -> f32 {
        self.margin.horizontal() + self.border.horizontal() + self.padding.horizontal()
    }

    /// Vertical margin, border and padding.
    #[must_use]
    pub fn vertical_edges(&self) -> f32 {
        self.margin.vertical() + self.border.vertical() + self.padding.vertical()
    }

    /// Floated box.
    #[must_use]
    pub fn is_float(&self) -> bool {
        self.style.is_floated()
    }

    /// `absolute` or `fixed`.
    #[must_use]
    pub fn is_out_of_flow(&self) -> bool {
        self.style.position.is_out_of_flow()
    }

    /// Positioned box: anything but `static`.
    #[must_use]
    pub fn is_positioned(&self) -> bool {
        self.style.position.is_positioned()
    }

    /// Inline-level box that is laid out as one unit on a line.
    #[must_use]
    pub fn is_atomic_inline(&self) -> bool {
        match self.kind {
            LayoutKind::Inline => false,
            LayoutKind::Replaced(_) => self.display.is_inline_level(),
            _ => matches!(self.display, Display::InlineBlock | Display::InlineTable),
        }
    }

    /// Block-level box in the sense of block flow.
    #[must_use]
    pub fn is_block_level(&self) -> bool {
        self.display.is_block_level()
            || matches!(self.display, Display::TableCaption | Display::RunIn)
    }

    /// A block-level box that must not overlap floats in its parent's
    /// context: it establishes its own formatting context or is replaced.
    #[must_use]
    pub fn avoids_floats(&self) -> bool {
        matches!(self.kind, LayoutKind::Table(_) | LayoutKind::Replaced(_))
            || self.formatting_context.is_root()
    }
}

/// Arena of layout nodes plus the contexts they reference.
#[derive(Debug, Default)]
pub struct LayoutTree {
    nodes: Vec<LayoutNode>,
    pub(crate) contexts: Vec<BlockFormattingContext>,
    pub(crate) stacking: Vec<StackingContext>,
    by_box: HashMap<BoxId, LayoutId>,
    root: Option<LayoutId>,
    pub(crate) viewport: Size,
}

impl Index<LayoutId> for LayoutTree {
    type Output = LayoutNode;

    fn index(&self, id: LayoutId) -> &LayoutNode {
        &self.nodes[id.0]
    }
}

impl IndexMut<LayoutId> for LayoutTree {
    fn index_mut(&mut self, id: LayoutId) -> &mut LayoutNode {
        &mut self.nodes[id.0]
    }
}

/// [§ 9.4.1](https://www.w3.org/TR/CSS2/visuren.html#block-formatting)
fn establishes_formatting_context(style: &ComputedProperties, display: Display, is_root: bool) -> bool {
    is_root
        || style.is_floated()
        || style.position.is_out_of_flow()
        || matches!(
            display,
            Display::InlineBlock
                | Display::TableCell
                | Display::TableCaption
                | Display::Table
                | Display::InlineTable
        )
        || (display.is_block_level() && style.overflow.clips())
}

fn kind_for(boxes: &BoxTree, id: BoxId, display: Display) -> LayoutKind {
    let replaced = boxes.element(id).is_some_and(crate::box_tree::ElementBox::is_replaced);
    if replaced {
        return LayoutKind::Replaced(ReplacedData::default());
    }
    match display {
        Display::Table | Display::InlineTable => LayoutKind::Table(TableData::default()),
        Display::TableRowGroup | Display::TableHeaderGroup | Display::TableFooterGroup => {
            LayoutKind::TableRowGroup
        }
        Display::TableRow => LayoutKind::TableRow,
        Display::TableColumn | Display::TableColumnGroup => LayoutKind::TableColumn,
        Display::Inline => LayoutKind::Inline,
        _ => LayoutKind::Block,
    }
}

impl LayoutTree {
    /// Build the layout tree for every element box.
    ///
    /// Formatting and stacking contexts are created here; their geometry is
    /// filled in by layout.
    ///
    /// # Errors
    ///
    /// [`LayoutError::DocumentTooDeep`] if the box tree nests deeper than
    /// `max_depth`.
    pub fn build(boxes: &BoxTree, viewport: Size, max_depth: usize) -> Result<Self> {
        let mut tree = Self {
            viewport,
            ..Self::default()
        };
        let Some(root_box) = boxes.root() else {
            return Ok(tree);
        };

        let mut tree_order = 0_usize;
        let mut stack: Vec<(BoxId, Option<LayoutId>, usize)> = vec![(root_box, None, 0)];
        while let Some((box_id, parent, depth)) = stack.pop() {
            if depth > max_depth {
                return Err(LayoutError::DocumentTooDeep { limit: max_depth });
            }
            let Some(element) = boxes.element(box_id) else {
                continue;
            };
            let style = Rc::clone(&element.computed);
            let display = style.display;
            let id = LayoutId(tree.nodes.len());
            let is_root = parent.is_none();

            // Formatting context.
            let formatting_context = if establishes_formatting_context(&style, display, is_root) {
                let enclosing = parent.map(|p| tree[p].formatting_context.id());
                let enclosing = if style.position == Position::Fixed {
                    None
                } else {
                    enclosing
                };
                let context = ContextId(tree.contexts.len());
                tree.contexts
                    .push(BlockFormattingContext::new(id, enclosing, Point::default()));
                ContextLink::Root(context)
            } else {
                // Only the root lacks a parent, and the root always
                // establishes a context.
                parent.map_or(ContextLink::Root(ContextId(0)), |p| {
                    ContextLink::Inherited(tree[p].formatting_context.id())
                })
            };

            // Stacking context.
            let enclosing_stacking = parent.map(|p| tree[p].stacking_context.id());
            let stacking_context = match (enclosing_stacking, style.z_index) {
                (None, _) => {
                    tree.stacking
                        .push(StackingContext::new(id, 0, tree_order, None));
                    ContextLink::Root(StackingId(tree.stacking.len() - 1))
                }
                (Some(enclosing), ZIndex::Integer(level)) if style.establishes_stacking_context() => {
                    let context = StackingId(tree.stacking.len());
                    tree.stacking
                        .push(StackingContext::new(id, level, tree_order, Some(enclosing)));
                    tree.stacking[enclosing.0].children.push(context);
                    ContextLink::Root(context)
                }
                (Some(enclosing), _) => {
                    if style.position.is_positioned() {
                        tree.stacking[enclosing.0].positioned.push((tree_order, id));
                    }
                    ContextLink::Inherited(enclosing)
                }
            };
            tree_order += 1;

            tree.nodes.push(LayoutNode {
                box_id,
                kind: kind_for(boxes, box_id, display),
                display,
                style,
                parent,
                children: Vec::new(),
                margin: EdgeSizes::default(),
                border: EdgeSizes::default(),
                padding: EdgeSizes::default(),
                width: SizeValue::default(),
                height: SizeValue::default(),
                containing_width: 0.0,
                containing_height: None,
                content_box: Rect::default(),
                relative: Point::default(),
                static_position: Point::default(),
                formatting_context,
                stacking_context,
                inline_content: None,
            });
            let _ = tree.by_box.insert(box_id, id);
            match parent {
                Some(parent) => tree[parent].children.push(id),
                None => tree.root = Some(id),
            }
            for &child in boxes.children(box_id).iter().rev() {
                stack.push((child, Some(id), depth + 1));
            }
        }

        sort_children(&mut tree.stacking);
        Ok(tree)
    }

    /// The root node.
    #[must_use]
    pub const fn root(&self) -> Option<LayoutId> {
        self.root
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if nothing was laid out.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The viewport the tree was laid out for.
    #[must_use]
    pub const fn viewport(&self) -> Size {
        self.viewport
    }

    /// Borrow a node, `None` for ids from another tree.
    #[must_use]
    pub fn get(&self, id: LayoutId) -> Option<&LayoutNode> {
        self.nodes.get(id.0)
    }

    /// The node laying out `box_id`.
    #[must_use]
    pub fn node_for_box(&self, box_id: BoxId) -> Option<LayoutId> {
        self.by_box.get(&box_id).copied()
    }

    /// A block formatting context.
    #[must_use]
    pub fn context(&self, id: ContextId) -> &BlockFormattingContext {
        &self.contexts[id.0]
    }

    pub(crate) fn context_mut(&mut self, id: ContextId) -> &mut BlockFormattingContext {
        &mut self.contexts[id.0]
    }

    /// A stacking context.
    #[must_use]
    pub fn stacking_context(&self, id: StackingId) -> &StackingContext {
        &self.stacking[id.0]
    }

    /// All stacking contexts; index 0 belongs to the root.
    #[must_use]
    pub fn stacking_contexts(&self) -> &[StackingContext] {
        &self.stacking
    }

    /// Pre-order traversal of the subtree at `id`.
    #[must_use]
    pub fn descendants(&self, id: LayoutId) -> Vec<LayoutId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self[current].children.iter().rev().copied());
        }
        out
    }

    /// Pre-order traversal of the whole tree.
    #[must_use]
    pub fn iter(&self) -> Vec<LayoutId> {
        self.root.map(|r| self.descendants(r)).unwrap_or_default()
    }

    /// Move a laid-out subtree by `(dx, dy)`: content boxes, line boxes,
    /// static positions and the origins of contexts owned inside it.
    pub fn translate_subtree(&mut self, id: LayoutId, dx: f32, dy: f32) {
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        for current in self.descendants(id) {
            let node = &mut self[current];
            node.content_box = node.content_box.translate(dx, dy);
            node.static_position = Point::new(node.static_position.x + dx, node.static_position.y + dy);
            if let Some(content) = &mut node.inline_content {
                content.translate(dx, dy);
            }
            if let ContextLink::Root(context) = node.formatting_context {
                let origin = &mut self.contexts[context.0].origin;
                origin.x += dx;
                origin.y += dy;
            }
        }
    }
}
