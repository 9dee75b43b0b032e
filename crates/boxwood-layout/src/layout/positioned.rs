//! Relative, absolute and fixed positioning.
//!
//! [§ 9.3 Positioning schemes](https://www.w3.org/TR/CSS2/visuren.html#positioning-scheme)
//!
//! Both passes run after normal flow: relative offsets shift finished
//! subtrees, and absolutely positioned boxes are laid out top-down once
//! their containing blocks have their final geometry.

use crate::error::Result;
use crate::style::values::{Direction, Position};

use super::block;
use super::box_model::{Point, Rect};
use super::sizing::{self, AbsoluteAxis};
use super::table;
use super::tree::{LayoutId, LayoutKind, LayoutNode, SizeValue};
use super::LayoutContext;

/// [§ 9.4.3 Relative positioning](https://www.w3.org/TR/CSS2/visuren.html#relative-positioning)
///
/// "If neither 'left' nor 'right' is 'auto', the position is
/// over-constrained, and one of them has to be ignored. If the 'direction'
/// property of the containing block is 'ltr', the value of 'left' wins and
/// 'right' becomes -'left'. If 'direction' of the containing block is
/// 'rtl', 'right' wins and 'left' is ignored."
///
/// "If neither 'top' nor 'bottom' is 'auto', 'bottom' is ignored."
#[must_use]
pub fn relative_offset(node: &LayoutNode) -> Point {
    let offsets = &node.style.offsets;
    let width = Some(node.containing_width);
    let height = node.containing_height;
    let x = match (offsets.left.resolve(width), offsets.right.resolve(width)) {
        (Some(_), Some(right)) if node.style.direction == Direction::Rtl => -right,
        (Some(left), _) => left,
        (None, Some(right)) => -right,
        (None, None) => 0.0,
    };
    let y = match (offsets.top.resolve(height), offsets.bottom.resolve(height)) {
        (Some(top), _) => top,
        (None, Some(bottom)) => -bottom,
        (None, None) => 0.0,
    };
    Point::new(x, y)
}

/// Shift every relatively positioned box below `start` by its offset,
/// along with its subtree.
///
/// Inline elements are skipped: their fragments were offset when their
/// lines were built. Absolutely positioned subtrees other than `start` are
/// left for [`layout_absolute_and_fixed_content`].
pub(crate) fn apply_relative_offsets(cx: &mut LayoutContext<'_>, start: LayoutId) {
    let mut stack = vec![start];
    while let Some(id) = stack.pop() {
        let node = &cx.tree[id];
        if id != start && node.is_out_of_flow() {
            continue;
        }
        if node.style.position == Position::Relative && !matches!(node.kind, LayoutKind::Inline) {
            let offset = relative_offset(node);
            cx.tree.translate_subtree(id, offset.x, offset.y);
            cx.tree[id].relative = offset;
        }
        stack.extend(cx.tree[id].children.iter().copied());
    }
}

/// [§ 10.1 Definition of "containing block"](https://www.w3.org/TR/CSS2/visudet.html#containing-block-details)
///
/// "If the element has 'position: fixed', the containing block is
/// established by the viewport [...]. If the element has 'position:
/// absolute', the containing block is established by the nearest ancestor
/// with a 'position' of 'absolute', 'relative' or 'fixed' [...]. If there is
/// no such ancestor, the containing block is the initial containing block."
fn containing_block(cx: &LayoutContext<'_>, id: LayoutId, initial: Rect) -> Rect {
    if cx.tree[id].style.position == Position::Fixed {
        let viewport = cx.tree.viewport();
        return Rect::new(0.0, 0.0, viewport.width, viewport.height);
    }
    let mut ancestor = cx.tree[id].parent;
    while let Some(current) = ancestor {
        let node = &cx.tree[current];
        if node.is_positioned() {
            return node.padding_box();
        }
        ancestor = node.parent;
    }
    initial
}

/// Lay out every absolutely and fixed positioned box, outermost first.
///
/// # Errors
///
/// Propagates errors from laying out the boxes' contents.
pub(crate) fn layout_absolute_and_fixed_content(cx: &mut LayoutContext<'_>, initial: Rect) -> Result<()> {
    let root = cx.tree.root();
    for id in cx.tree.iter() {
        if Some(id) == root || !cx.tree[id].is_out_of_flow() {
            continue;
        }
        layout_positioned(cx, id, initial)?;
    }
    Ok(())
}

/// [§ 10.3.7 Absolutely positioned, non-replaced elements](https://www.w3.org/TR/CSS2/visudet.html#abs-non-replaced-width)
/// [§ 10.6.4 Absolutely positioned, non-replaced elements](https://www.w3.org/TR/CSS2/visudet.html#abs-non-replaced-height)
///
/// Solve the horizontal axis, lay the content out at that width, then
/// solve the vertical axis knowing the content height.
fn layout_positioned(cx: &mut LayoutContext<'_>, id: LayoutId, initial: Rect) -> Result<()> {
    let cb = containing_block(cx, id, initial);
    {
        let node = &mut cx.tree[id];
        node.containing_width = cb.width;
        node.containing_height = Some(cb.height);
        sizing::calculate_top_down_sizes(node);
    }

    // STEP 1: Width.
    let table_width = if matches!(cx.tree[id].kind, LayoutKind::Table(_)) {
        table::resolve_table_width(cx, id, cb.width)?;
        Some(cx.tree[id].width.value)
    } else {
        None
    };
    let node = &cx.tree[id];
    let static_position = node.static_position;
    let direction = node.style.direction;
    let basis = Some(cb.width);
    let limits = (node.style.min_width.resolve(basis), node.style.max_width.resolve(basis));
    let axis = AbsoluteAxis {
        size: table_width.or(sizing::horizontal_axis(node).size),
        ..sizing::horizontal_axis(node)
    };
    let horizontal = sizing::solve_absolute_axis_clamped(
        axis,
        cb.width,
        static_position.x - cb.x,
        false,
        direction,
        limits,
        &mut |available| sizing::shrink_to_fit(cx, id, available),
    )?;

    // STEP 2: Content, laid out at the solved width.
    {
        let node = &mut cx.tree[id];
        node.width = SizeValue::fixed(horizontal.size);
        node.margin.left = horizontal.margin_start;
        node.margin.right = horizontal.margin_end;
        node.content_box = Rect::new(
            cb.x + horizontal.start + horizontal.margin_start + node.border.left + node.padding.left,
            0.0,
            horizontal.size,
            0.0,
        );
        // Children see a definite height when the vertical axis fixes one
        // without the content.
        let axis = sizing::vertical_axis(node);
        node.height = match (axis.start, axis.size, axis.end) {
            (_, Some(height), _) => SizeValue::fixed(sizing::clamp_height(node, height)),
            (Some(top), None, Some(bottom)) => {
                let margins = axis.margin_start.unwrap_or(0.0) + axis.margin_end.unwrap_or(0.0);
                let height = (cb.height - top - bottom - margins - axis.edges).max(0.0);
                SizeValue::fixed(sizing::clamp_height(node, height))
            }
            _ => SizeValue::expanding(),
        };
    }
    block::layout_box_contents(cx, id)?;

    // STEP 3: Height and vertical position.
    let node = &cx.tree[id];
    let content_height = node.content_box.height;
    let basis = Some(cb.height);
    let limits = (node.style.min_height.resolve(basis), node.style.max_height.resolve(basis));
    let vertical = sizing::solve_absolute_axis_clamped(
        sizing::vertical_axis(node),
        cb.height,
        static_position.y - cb.y,
        true,
        direction,
        limits,
        &mut |_| Ok(content_height),
    )?;
    let top = cb.y + vertical.start + vertical.margin_start + node.border.top + node.padding.top;
    let dy = top - node.content_box.y;
    cx.tree.translate_subtree(id, 0.0, dy);
    {
        let node = &mut cx.tree[id];
        node.margin.top = vertical.margin_start;
        node.margin.bottom = vertical.margin_end;
        node.height = SizeValue::fixed(vertical.size);
        node.content_box.height = vertical.size;
    }

    #[cfg(feature = "layout-trace")]
    log::trace!(target: "boxwood::layout", "positioned {id:?} at {:?}", cx.tree[id].content_box);

    // STEP 4: Relative offsets inside the positioned subtree.
    apply_relative_offsets(cx, id);
    Ok(())
}
