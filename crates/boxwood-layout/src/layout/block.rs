//! Block formatting.
//!
//! [§ 9.4.1 Block formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#block-formatting)
//!
//! "In a block formatting context, boxes are laid out one after the other,
//! vertically, beginning at the top of a containing block. The vertical
//! distance between two sibling boxes is determined by the 'margin'
//! properties. Vertical margins between adjacent block-level boxes in a
//! block formatting context collapse."
//!
//! Children are visited in box order. Consecutive inline-level boxes and
//! text form a run handed to the inline engine; floats met between blocks
//! are placed at the current position; absolutely positioned boxes only
//! record their static position.

use crate::box_tree::BoxId;
use crate::error::Result;
use crate::style::values::{Clear, Float};

use super::box_model::{Point, Rect};
use super::formatting_context::ContextId;
use super::inline;
use super::sizing;
use super::table;
use super::tree::{ContextLink, LayoutId, LayoutKind, LayoutNode, SizeValue};
use super::LayoutContext;

/// [§ 8.3.1 Collapsing margins](https://www.w3.org/TR/CSS2/box.html#collapsing-margins)
///
/// "When two or more margins collapse, the resulting margin width is the
/// maximum of the collapsing margins' widths. In the case of negative
/// margins, the maximum of the absolute values of the negative adjoining
/// margins is deducted from the maximum of the positive adjoining margins.
/// If there are no positive margins, the maximum of the absolute values of
/// the adjoining margins is deducted from zero."
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CollapsedMargin {
    positive: f32,
    negative: f32,
}

impl CollapsedMargin {
    /// A set holding one margin.
    #[must_use]
    pub fn new(margin: f32) -> Self {
        let mut set = Self::default();
        set.push(margin);
        set
    }

    /// Add an adjoining margin.
    pub fn push(&mut self, margin: f32) {
        if margin >= 0.0 {
            self.positive = self.positive.max(margin);
        } else {
            self.negative = self.negative.min(margin);
        }
    }

    /// The collapsed width.
    #[must_use]
    pub fn resolve(&self) -> f32 {
        self.positive + self.negative
    }
}

/// Where the next block-level box goes.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct BlockCursor {
    /// Bottom border edge of the previous in-flow content.
    pub(crate) y: f32,
    /// Margins adjoining the next box's top margin.
    pub(crate) margin: CollapsedMargin,
}

impl BlockCursor {
    pub(crate) fn at(y: f32) -> Self {
        Self {
            y,
            margin: CollapsedMargin::default(),
        }
    }

    /// The position after the pending margins.
    pub(crate) fn next_y(&self) -> f32 {
        self.y + self.margin.resolve()
    }
}

/// The margin box of a laid-out node, extended over a table's captions.
#[must_use]
pub(crate) fn outer_box(node: &LayoutNode) -> Rect {
    let margin_box = node.margin_box();
    match &node.kind {
        LayoutKind::Table(data) if data.caption_height > 0.0 => Rect::new(
            margin_box.x,
            margin_box.y - data.caption_height,
            margin_box.width,
            margin_box.height + data.caption_height,
        ),
        _ => margin_box,
    }
}

/// Lay out the root box in the initial containing block.
///
/// # Errors
///
/// Propagates errors from laying out the tree.
pub(crate) fn layout_root(cx: &mut LayoutContext<'_>, root: LayoutId, initial: Rect) -> Result<()> {
    {
        let node = &mut cx.tree[root];
        node.containing_width = initial.width;
        node.containing_height = Some(initial.height);
        sizing::calculate_top_down_sizes(node);
    }
    match cx.tree[root].kind {
        LayoutKind::Table(_) => table::resolve_table_width(cx, root, initial.width)?,
        _ => sizing::resolve_expanding_width(cx, root)?,
    }
    let node = &mut cx.tree[root];
    node.content_box = Rect::new(
        initial.x + node.margin.left + node.border.left + node.padding.left,
        initial.y + node.margin.top + node.border.top + node.padding.top,
        node.width.value,
        0.0,
    );
    layout_box_contents(cx, root)
}

/// Lay out the inside of a box whose content-box position and width are
/// set, then fix its height.
///
/// # Errors
///
/// Propagates errors from laying out the children.
pub(crate) fn layout_box_contents(cx: &mut LayoutContext<'_>, id: LayoutId) -> Result<()> {
    #[cfg(feature = "layout-trace")]
    log::trace!(target: "boxwood::layout", "layout {id:?} at {:?}", cx.tree[id].content_box);

    let content_height = match cx.tree[id].kind {
        LayoutKind::Replaced(_) => {
            let node = &mut cx.tree[id];
            node.content_box.height = node.height.value;
            return Ok(());
        }
        LayoutKind::Table(_) => return table::layout_table_contents(cx, id),
        LayoutKind::Inline
        | LayoutKind::TableRowGroup
        | LayoutKind::TableRow
        | LayoutKind::TableColumn => 0.0,
        LayoutKind::Block => {
            if cx.tree[id].formatting_context.is_root() {
                layout_formatting_root(cx, id)?
            } else {
                layout_block_content(cx, id)?
            }
        }
    };
    let node = &mut cx.tree[id];
    let height = sizing::used_height(node, content_height);
    node.height = SizeValue::fixed(height);
    node.content_box.height = height;
    Ok(())
}

/// [§ 10.6.7 'Auto' heights for block formatting context roots](https://www.w3.org/TR/CSS2/visudet.html#root-height)
///
/// Lay out the content of a box that owns a formatting context. Returns the
/// content height, which grows to contain the floats of the context.
///
/// # Errors
///
/// Propagates errors from laying out the children.
pub(crate) fn layout_formatting_root(cx: &mut LayoutContext<'_>, id: LayoutId) -> Result<f32> {
    let ContextLink::Root(fc) = cx.tree[id].formatting_context else {
        return layout_block_content(cx, id);
    };
    let content = cx.tree[id].content_box;
    {
        let context = cx.tree.context_mut(fc);
        context.clear();
        context.origin = Point::new(content.x, content.y);
    }
    let height = layout_block_content(cx, id)?;
    // "If the element has any floating descendants whose bottom margin edge
    // is below the element's bottom content edge, then the height is
    // increased to include those edges."
    Ok(match cx.tree.context(fc).floats_bottom() {
        Some(bottom) => height.max(bottom),
        None => height,
    })
}

/// Lay out the children of a block container. Returns the content height:
/// from the top of the content box to the last in-flow bottom margin edge.
///
/// # Errors
///
/// Propagates errors from laying out the children.
pub(crate) fn layout_block_content(cx: &mut LayoutContext<'_>, id: LayoutId) -> Result<f32> {
    let boxes = cx.boxes;
    let content = cx.tree[id].content_box;
    cx.tree[id].inline_content = None;

    let mut cursor = BlockCursor::at(content.y);
    let mut run: Vec<BoxId> = Vec::new();

    for &child in boxes.children(cx.tree[id].box_id) {
        let Some(child_id) = cx.tree.node_for_box(child) else {
            run.push(child);
            continue;
        };
        let node = &cx.tree[child_id];
        let in_flow_block = node.is_block_level() && !node.is_float() && !node.is_out_of_flow();
        if in_flow_block {
            flush_inline_run(cx, id, &mut run, &mut cursor)?;
            layout_block_child(cx, id, child_id, &mut cursor)?;
        } else if run.is_empty() && node.is_float() {
            layout_float(cx, id, child_id, cursor.next_y())?;
        } else if run.is_empty() && node.is_out_of_flow() {
            // [§ 10.3.7] "the static position for 'left' is the distance from
            // the left edge of the containing block to the left margin edge
            // of a hypothetical box that would have been the first box of the
            // element if its 'position' property had been 'static'"
            cx.tree[child_id].static_position = Point::new(content.x, cursor.next_y());
        } else {
            run.push(child);
        }
    }
    flush_inline_run(cx, id, &mut run, &mut cursor)?;

    // The last child's bottom margin stays inside the parent.
    Ok(cursor.next_y() - content.y)
}

/// Hand a run of inline content to the inline engine.
fn flush_inline_run(
    cx: &mut LayoutContext<'_>,
    container: LayoutId,
    run: &mut Vec<BoxId>,
    cursor: &mut BlockCursor,
) -> Result<()> {
    if run.is_empty() {
        return Ok(());
    }
    // [§ 8.3.1] Line boxes separate margins; a run that makes no line box
    // leaves them adjoining.
    if let Some(bottom) = inline::layout_inline_run(cx, container, run, cursor.next_y())? {
        *cursor = BlockCursor::at(bottom);
    }
    run.clear();
    Ok(())
}

/// [§ 9.5.2 Controlling flow next to floats: the 'clear' property](https://www.w3.org/TR/CSS2/visuren.html#flow-control)
///
/// Page y below the floats that `clear` names, if any were placed.
fn clearance_y(cx: &LayoutContext<'_>, fc: ContextId, clear: Clear) -> Option<f32> {
    let context = cx.tree.context(fc);
    let local = match clear {
        Clear::None => None,
        Clear::Left => context.find_left_clearance(),
        Clear::Right => context.find_right_clearance(),
        Clear::Both => context.floats_bottom(),
    }?;
    Some(local + context.origin.y)
}

/// Lay out one in-flow block-level child at the cursor and advance it.
///
/// # Errors
///
/// Propagates errors from laying out the child.
pub(crate) fn layout_block_child(
    cx: &mut LayoutContext<'_>,
    parent: LayoutId,
    child: LayoutId,
    cursor: &mut BlockCursor,
) -> Result<()> {
    let fc = cx.tree[parent].formatting_context.id();
    let container = cx.tree[parent].content_box;
    let containing_height = sizing::definite_height(&cx.tree[parent]);
    {
        let node = &mut cx.tree[child];
        node.containing_width = container.width;
        node.containing_height = containing_height;
        sizing::calculate_top_down_sizes(node);
    }
    if matches!(cx.tree[child].kind, LayoutKind::Table(_)) {
        table::resolve_table_width(cx, child, container.width)?;
    }

    // STEP 1: Collapse the top margin with the adjoining margins above.
    cursor.margin.push(cx.tree[child].margin.top);
    let mut border_top = cursor.next_y();

    // STEP 2: Clearance.
    // "Computing the clearance of an element on which 'clear' is set is done
    // by first determining the hypothetical position of the element's top
    // border edge within its parent block. [...] If this hypothetical
    // position of the element's top border edge is not past the relevant
    // floats, then clearance is introduced."
    let mut cleared = false;
    if let Some(clear_y) = clearance_y(cx, fc, cx.tree[child].style.clear)
        && clear_y > border_top
    {
        border_top = clear_y;
        cleared = true;
    }

    // STEP 3: Boxes that establish a formatting context must not overlap
    // the floats of their parent's context.
    //
    // [§ 9.5] "The border box of a table, a block-level replaced element, or
    // an element in the normal flow that establishes a new block formatting
    // context [...] must not overlap the margin box of any floats in the same
    // block formatting context as the element itself."
    let mut band = (container.x, container.right());
    if cx.tree[child].avoids_floats() {
        let node = &cx.tree[child];
        let auto_width = node.style.width.is_auto() && matches!(node.kind, LayoutKind::Block);
        let needed = if auto_width {
            0.0
        } else {
            node.width.value + node.border.horizontal() + node.padding.horizontal()
        };
        let context = cx.tree.context(fc);
        let found = context.find_line_box(
            container.x - context.origin.x,
            container.right() - context.origin.x,
            border_top - context.origin.y,
            0.0,
            needed,
        );
        band = (found.left + context.origin.x, found.right + context.origin.x);
        border_top = found.top + context.origin.y;

        let available = band.1 - band.0;
        if available < container.width {
            if auto_width {
                let node = &mut cx.tree[child];
                let width = available - node.horizontal_edges();
                node.width = SizeValue::fixed(sizing::clamp_width(node, width));
            } else if matches!(cx.tree[child].kind, LayoutKind::Table(_)) {
                table::resolve_table_width(cx, child, available)?;
            }
            let node = &mut cx.tree[child];
            let border_box = node.width.value + node.border.horizontal() + node.padding.horizontal();
            sizing::resolve_horizontal_margins(node, border_box, available);
        }
    }

    // STEP 4: Place and lay out.
    {
        let node = &mut cx.tree[child];
        node.content_box = Rect::new(
            band.0 + node.margin.left + node.border.left + node.padding.left,
            border_top + node.border.top + node.padding.top,
            node.width.value,
            0.0,
        );
    }
    layout_box_contents(cx, child)?;

    // STEP 5: Advance.
    // [§ 8.3.1] "top and bottom margins of a box that does not establish a
    // new block formatting context and that has zero computed 'min-height',
    // zero or 'auto' computed 'height', and no in-flow children" collapse
    // through it.
    let node = &cx.tree[child];
    let collapses_through = !cleared
        && matches!(node.kind, LayoutKind::Block)
        && !node.formatting_context.is_root()
        && node.height.value == 0.0
        && node.border.vertical() == 0.0
        && node.padding.vertical() == 0.0
        && node.inline_content.as_ref().is_none_or(|c| c.lines.is_empty());
    if collapses_through {
        cursor.margin.push(node.margin.bottom);
    } else {
        cursor.y = node.border_box().bottom();
        cursor.margin = CollapsedMargin::new(node.margin.bottom);
    }
    Ok(())
}

/// Lay out a box on its own with its margin box at the origin, before it is
/// placed: floats, atomic inlines and absolutely positioned boxes.
///
/// # Errors
///
/// Propagates errors from laying out the box.
pub(crate) fn layout_detached(
    cx: &mut LayoutContext<'_>,
    id: LayoutId,
    containing_width: f32,
    containing_height: Option<f32>,
) -> Result<()> {
    {
        let node = &mut cx.tree[id];
        node.containing_width = containing_width;
        node.containing_height = containing_height;
        sizing::calculate_top_down_sizes(node);
    }
    match cx.tree[id].kind {
        LayoutKind::Table(_) => table::resolve_table_width(cx, id, containing_width)?,
        LayoutKind::Replaced(_) => {}
        _ => sizing::resolve_expanding_width(cx, id)?,
    }
    let node = &mut cx.tree[id];
    node.content_box = Rect::new(
        node.margin.left + node.border.left + node.padding.left,
        node.margin.top + node.border.top + node.padding.top,
        node.width.value,
        0.0,
    );
    layout_box_contents(cx, id)
}

/// [§ 9.5.1 Positioning the float: the 'float' property](https://www.w3.org/TR/CSS2/visuren.html#float-position)
///
/// Lay out the float `id` of `container` and place it no higher than `y`.
///
/// # Errors
///
/// Propagates errors from laying out the float.
pub(crate) fn layout_float(cx: &mut LayoutContext<'_>, container: LayoutId, id: LayoutId, y: f32) -> Result<()> {
    let fc = cx.tree[container].formatting_context.id();
    let content = cx.tree[container].content_box;
    let containing_height = sizing::definite_height(&cx.tree[container]);
    layout_detached(cx, id, content.width, containing_height)?;
    place_float(cx, fc, content, id, y);
    Ok(())
}

/// Place a laid-out float in the context `fc`, inside the containing block
/// `content`, no higher than `y`.
pub(crate) fn place_float(cx: &mut LayoutContext<'_>, fc: ContextId, content: Rect, id: LayoutId, y: f32) {
    let outer = outer_box(&cx.tree[id]);
    let side = cx.tree[id].style.float;
    // "the top margin edge of the box must be below the bottom outer edge of
    // all earlier left-floating boxes (in the case of 'clear: left')"
    let y = clearance_y(cx, fc, cx.tree[id].style.clear).map_or(y, |clear| y.max(clear));

    let context = cx.tree.context_mut(fc);
    let origin = context.origin;
    let candidate = Rect::new(content.x - origin.x, y - origin.y, outer.width, outer.height);
    let max_right = content.right() - origin.x;
    let placed = match side {
        Float::Right => context.float_right(candidate, max_right),
        Float::Left | Float::None => context.float_left(candidate, max_right),
    };
    cx.tree
        .translate_subtree(id, placed.x + origin.x - outer.x, placed.y + origin.y - outer.y);
}
