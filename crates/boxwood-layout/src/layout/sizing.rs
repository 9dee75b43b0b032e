//! Widths, heights and margins.
//!
//! [§ 10 Visual formatting model details](https://www.w3.org/TR/CSS2/visudet.html)
//!
//! The constraint equations are solved by pure functions
//! ([`solve_block_width`], [`solve_absolute_axis`]) so that each case of the
//! spec can be exercised without building a tree. The node-level helpers
//! read computed values from a [`LayoutNode`] and write used values back.

use crate::error::Result;
use crate::style::values::{Direction, Display};

use super::box_model::EdgeSizes;
use super::intrinsic::{self, Strategy};
use super::tree::{LayoutId, LayoutKind, LayoutNode, SizeValue};
use super::LayoutContext;

// ─────────────────────────────────────────────────────────────────────────────
// Edges
// ─────────────────────────────────────────────────────────────────────────────

/// [§ 8.3 Margin properties](https://www.w3.org/TR/CSS2/box.html#margin-properties)
/// [§ 8.4 Padding properties](https://www.w3.org/TR/CSS2/box.html#padding-properties)
///
/// "The percentage is calculated with respect to the width of the generated
/// box's containing block. Note that this is true for 'margin-top' and
/// 'margin-bottom' as well."
///
/// Resolve borders, padding and margins against `containing_width`. `auto`
/// margins become 0 here; the width equations overwrite them when they
/// apply.
pub(crate) fn resolve_edges(node: &mut LayoutNode) {
    let basis = Some(node.containing_width);
    node.border = EdgeSizes::from(node.style.border_width.map(|w| *w));
    node.padding = EdgeSizes::from(node.style.padding.map(|p| p.resolve(basis)));
    node.margin = EdgeSizes::from(node.style.margin.map(|m| m.resolve(basis).unwrap_or(0.0)));
}

/// Margins as `Option`s, `None` for `auto`.
fn auto_margins(node: &LayoutNode) -> (Option<f32>, Option<f32>, Option<f32>, Option<f32>) {
    let basis = Some(node.containing_width);
    let m = &node.style.margin;
    (
        m.top.resolve(basis),
        m.right.resolve(basis),
        m.bottom.resolve(basis),
        m.left.resolve(basis),
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Min and max
// ─────────────────────────────────────────────────────────────────────────────

/// [§ 10.4 Minimum and maximum widths](https://www.w3.org/TR/CSS2/visudet.html#min-max-widths)
///
/// "If the tentative used width is greater than 'max-width', the rules above
/// are applied again, but this time using the computed value of 'max-width'
/// as the computed value for 'width'. If the resulting width is smaller than
/// 'min-width', the rules above are applied again, but this time using the
/// value of 'min-width' as the computed value for 'width'."
///
/// For callers without rules to re-run, clamping gives the same width.
#[must_use]
pub(crate) fn clamp_width(node: &LayoutNode, width: f32) -> f32 {
    let basis = Some(node.containing_width);
    let mut width = width;
    if let Some(max) = node.style.max_width.resolve(basis) {
        width = width.min(max);
    }
    width.max(node.style.min_width.resolve(basis)).max(0.0)
}

/// [§ 10.7 Minimum and maximum heights](https://www.w3.org/TR/CSS2/visudet.html#min-max-heights)
///
/// Percentages against an indefinite containing height are ignored: `none`
/// for `max-height` and 0 for `min-height`.
#[must_use]
pub(crate) fn clamp_height(node: &LayoutNode, height: f32) -> f32 {
    let basis = node.containing_height;
    let mut height = height;
    if let Some(max) = node.style.max_height.resolve(basis) {
        height = height.min(max);
    }
    height.max(node.style.min_height.resolve(basis)).max(0.0)
}

/// [§ 10.5 Content height: the 'height' property](https://www.w3.org/TR/CSS2/visudet.html#the-height-property)
///
/// "If the height of the containing block is not specified explicitly (i.e.,
/// it depends on content height), and this element is not absolutely
/// positioned, the value computes to 'auto'."
#[must_use]
pub(crate) fn specified_height(node: &LayoutNode) -> Option<f32> {
    node.style.height.resolve(node.containing_height)
}

/// The used content height: the specified height if there is one, else the
/// content height, then clamped.
#[must_use]
pub(crate) fn used_height(node: &LayoutNode, content_height: f32) -> f32 {
    clamp_height(node, specified_height(node).unwrap_or(content_height))
}

/// Height a child may resolve percentages against: the node's used height
/// when it does not depend on content.
#[must_use]
pub(crate) fn definite_height(node: &LayoutNode) -> Option<f32> {
    match node.kind {
        LayoutKind::Inline => None,
        _ if node.is_out_of_flow() && !node.height.expanding => Some(node.height.value),
        _ => specified_height(node).map(|h| clamp_height(node, h)),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// § 10.3.3 Block-level, non-replaced elements in normal flow
// ─────────────────────────────────────────────────────────────────────────────

/// Used `(width, margin-left, margin-right)` of a block-level non-replaced
/// box in normal flow. `None` stands for `auto`; `edges` is the sum of the
/// horizontal borders and padding.
///
/// [§ 10.3.3](https://www.w3.org/TR/CSS2/visudet.html#blockwidth)
///
/// "'margin-left' + 'border-left-width' + 'padding-left' + 'width' +
/// 'padding-right' + 'border-right-width' + 'margin-right' = width of
/// containing block"
#[must_use]
pub fn solve_block_width(
    containing: f32,
    width: Option<f32>,
    margin_left: Option<f32>,
    margin_right: Option<f32>,
    edges: f32,
    direction: Direction,
) -> (f32, f32, f32) {
    let (mut margin_left, mut margin_right) = (margin_left, margin_right);

    // "If 'width' is not 'auto' and 'border-left-width' + 'padding-left' +
    // 'width' + 'padding-right' + 'border-right-width' (plus any of
    // 'margin-left' or 'margin-right' that are not 'auto') is larger than the
    // width of containing block, then any 'auto' values for 'margin-left' or
    // 'margin-right' are, for the following rules, treated as zero."
    if let Some(w) = width {
        let total = edges + w + margin_left.unwrap_or(0.0) + margin_right.unwrap_or(0.0);
        if total > containing {
            margin_left = margin_left.or(Some(0.0));
            margin_right = margin_right.or(Some(0.0));
        }
    }

    match (width, margin_left, margin_right) {
        // "If 'width' is set to 'auto', any other 'auto' values become '0'
        // and 'width' follows from the resulting equality."
        (None, ml, mr) => {
            let (ml, mr) = (ml.unwrap_or(0.0), mr.unwrap_or(0.0));
            ((containing - ml - mr - edges).max(0.0), ml, mr)
        }
        // "If both 'margin-left' and 'margin-right' are 'auto', their used
        // values are equal. This horizontally centers the element with
        // respect to the edges of the containing block."
        (Some(w), None, None) => {
            let half = (containing - w - edges) / 2.0;
            (w, half, half)
        }
        // "If there is exactly one value specified as 'auto', its used value
        // follows from the equality."
        (Some(w), None, Some(mr)) => (w, containing - w - edges - mr, mr),
        (Some(w), Some(ml), None) => (w, ml, containing - w - edges - ml),
        // "If all of the above have a computed value other than 'auto', the
        // values are said to be "over-constrained" and one of the used values
        // will have to be different from its computed value. If the
        // 'direction' property of the containing block has the value 'ltr',
        // the specified value of 'margin-right' is ignored and the value is
        // calculated so as to make the equality true. If the value of
        // 'direction' is 'rtl', this happens to 'margin-left' instead."
        (Some(w), Some(ml), Some(mr)) => match direction {
            Direction::Ltr => (w, ml, containing - w - edges - ml),
            Direction::Rtl => (w, containing - w - edges - mr, mr),
        },
    }
}

/// Width and horizontal margins of a block-level box in flow, with the
/// min/max rules re-run as § 10.4 requires.
fn block_width_in_flow(node: &LayoutNode, containing: f32) -> (f32, f32, f32) {
    let basis = Some(node.containing_width);
    let (_, mr, _, ml) = auto_margins(node);
    let edges = node.border.horizontal() + node.padding.horizontal();
    // The containing block's direction decides over-constrained margins; the
    // property is inherited, so the box's own value is the parent's unless
    // the box overrides it.
    let direction = node.style.direction;
    let solve = |width| solve_block_width(containing, width, ml, mr, edges, direction);

    let mut used = solve(node.style.width.resolve(basis));
    if let Some(max) = node.style.max_width.resolve(basis)
        && used.0 > max
    {
        used = solve(Some(max));
    }
    let min = node.style.min_width.resolve(basis);
    if used.0 < min {
        used = solve(Some(min));
    }
    used
}

/// [§ 10.3 Calculating widths and margins](https://www.w3.org/TR/CSS2/visudet.html#Computing_widths_and_margins)
///
/// The top-down part of width computation, run by the parent before the
/// box is laid out:
///
/// - normal-flow block boxes (§ 10.3.3) get their final width and margins;
/// - floats (§ 10.3.5), inline-blocks (§ 10.3.9) and absolutely positioned
///   boxes (§ 10.3.7) with `width: auto` are marked expanding, to be filled
///   by shrink-to-fit;
/// - replaced elements get their § 10.3.2 size;
/// - table boxes are sized by the table algorithm and only get edges here.
pub(crate) fn calculate_top_down_sizes(node: &mut LayoutNode) {
    resolve_edges(node);
    let containing = node.containing_width;

    if let LayoutKind::Replaced(_) = node.kind {
        super::replaced::size_replaced(node);
        if node.is_block_level() && !node.is_float() && !node.is_out_of_flow() {
            let edges = node.border.horizontal() + node.padding.horizontal();
            let (_, mr, _, ml) = auto_margins(node);
            let (_, ml, mr) = solve_block_width(
                containing,
                Some(node.width.value),
                ml,
                mr,
                edges,
                node.style.direction,
            );
            node.margin.left = ml;
            node.margin.right = mr;
        }
        return;
    }

    if matches!(node.kind, LayoutKind::Table(_)) || matches!(node.display, Display::TableCell) {
        return;
    }

    // [§ 10.3.5](https://www.w3.org/TR/CSS2/visudet.html#float-width),
    // [§ 10.3.9](https://www.w3.org/TR/CSS2/visudet.html#inlineblock-width)
    //
    // "If 'margin-left', or 'margin-right' are computed as 'auto', their used
    // value is '0'. If 'width' is computed as 'auto', the used value is the
    // shrink-to-fit width."
    if node.is_float() || node.is_out_of_flow() || node.display == Display::InlineBlock {
        node.width = node
            .style
            .width
            .resolve(Some(containing))
            .map_or_else(SizeValue::expanding, |w| SizeValue::fixed(clamp_width(node, w)));
        return;
    }

    let (width, margin_left, margin_right) = block_width_in_flow(node, containing);
    node.width = SizeValue::fixed(width);
    node.margin.left = margin_left;
    node.margin.right = margin_right;
}

/// Solve the horizontal margins of a block-level box of known border-box
/// width placed in `available` pixels, such as a table or a box narrowed
/// by floats.
pub(crate) fn resolve_horizontal_margins(node: &mut LayoutNode, border_box_width: f32, available: f32) {
    let (_, mr, _, ml) = auto_margins(node);
    let (_, ml, mr) = solve_block_width(
        available,
        Some(border_box_width),
        ml,
        mr,
        0.0,
        node.style.direction,
    );
    node.margin.left = ml;
    node.margin.right = mr;
}

// ─────────────────────────────────────────────────────────────────────────────
// Shrink-to-fit
// ─────────────────────────────────────────────────────────────────────────────

/// [§ 10.3.5 Floating, non-replaced elements](https://www.w3.org/TR/CSS2/visudet.html#float-width)
///
/// "Calculate the preferred width by formatting the content without breaking
/// lines other than where explicit line breaks occur, and also calculate the
/// preferred minimum width, e.g., by trying all possible line breaks. [...]
/// Then the shrink-to-fit width is: min(max(preferred minimum width,
/// available width), preferred width)."
///
/// `available` is the content width left once margins, borders and padding
/// are taken from the containing block.
///
/// # Errors
///
/// Propagates errors from measuring the content.
pub(crate) fn shrink_to_fit(cx: &mut LayoutContext<'_>, id: LayoutId, available: f32) -> Result<f32> {
    let preferred = intrinsic::content_width(cx, id, Strategy::Preferred)?;
    let width = if preferred <= available {
        preferred
    } else {
        let minimum = intrinsic::content_width(cx, id, Strategy::Minimum)?;
        minimum.max(available).min(preferred)
    };
    Ok(clamp_width(&cx.tree[id], width))
}

/// Fill in an expanding width with the shrink-to-fit width.
///
/// # Errors
///
/// Propagates errors from measuring the content.
pub(crate) fn resolve_expanding_width(cx: &mut LayoutContext<'_>, id: LayoutId) -> Result<()> {
    let node = &cx.tree[id];
    if !node.width.expanding {
        return Ok(());
    }
    let available = (node.containing_width - node.horizontal_edges()).max(0.0);
    let width = shrink_to_fit(cx, id, available)?;
    cx.tree[id].width = SizeValue::fixed(width);
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// § 10.3.7 / § 10.6.4 Absolutely positioned, non-replaced elements
// ─────────────────────────────────────────────────────────────────────────────

/// One axis of the constraint equation of an absolutely positioned box.
/// `None` stands for `auto`.
///
/// [§ 10.3.7](https://www.w3.org/TR/CSS2/visudet.html#abs-non-replaced-width)
///
/// "'left' + 'margin-left' + 'border-left-width' + 'padding-left' + 'width'
/// + 'padding-right' + 'border-right-width' + 'margin-right' + 'right' =
/// width of containing block"
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AbsoluteAxis {
    /// `left` or `top`.
    pub start: Option<f32>,
    /// `width` or `height`.
    pub size: Option<f32>,
    /// `right` or `bottom`.
    pub end: Option<f32>,
    /// `margin-left` or `margin-top`.
    pub margin_start: Option<f32>,
    /// `margin-right` or `margin-bottom`.
    pub margin_end: Option<f32>,
    /// Borders plus padding on both sides.
    pub edges: f32,
}

/// Used values of an [`AbsoluteAxis`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AxisSolution {
    /// `left` or `top`.
    pub start: f32,
    /// `width` or `height`.
    pub size: f32,
    /// `right` or `bottom`.
    pub end: f32,
    /// `margin-left` or `margin-top`.
    pub margin_start: f32,
    /// `margin-right` or `margin-bottom`.
    pub margin_end: f32,
}

/// Fill in `end` from the other values.
fn complete(
    containing: f32,
    start: f32,
    size: f32,
    margin_start: f32,
    margin_end: f32,
    edges: f32,
) -> AxisSolution {
    AxisSolution {
        start,
        size,
        end: containing - start - margin_start - edges - size - margin_end,
        margin_start,
        margin_end,
    }
}

/// Solve one axis of an absolutely positioned box.
///
/// `static_start` is the static position relative to the containing block.
/// `content` returns the size the content wants given the space available
/// to it: shrink-to-fit for widths, the laid-out content height for heights.
/// `vertical` selects the § 10.6.4 variant, which never drops a negative
/// margin split. `direction` decides which value yields when the axis is
/// over-constrained.
///
/// When only the size is given (rule 2) the box always sits at
/// `static_start`; the 'rtl' variant that pins 'right' to the static
/// position is not implemented.
///
/// # Errors
///
/// Propagates errors from `content`.
pub fn solve_absolute_axis(
    axis: AbsoluteAxis,
    containing: f32,
    static_start: f32,
    vertical: bool,
    direction: Direction,
    content: &mut dyn FnMut(f32) -> Result<f32>,
) -> Result<AxisSolution> {
    let AbsoluteAxis {
        start,
        size,
        end,
        margin_start,
        margin_end,
        edges,
    } = axis;
    // Every rule but the fully specified one treats 'auto' margins as 0.
    let ms = margin_start.unwrap_or(0.0);
    let me = margin_end.unwrap_or(0.0);

    let solution = match (start, size, end) {
        // "If all three of 'left', 'width', and 'right' are 'auto': First set
        // any 'auto' values for 'margin-left' and 'margin-right' to 0. Then,
        // if the 'direction' property of the element establishing the
        // static-position containing block is 'ltr' set 'left' to the static
        // position and apply rule number three below."
        //
        // Rule 3: "'width' and 'right' are 'auto' and 'left' is not 'auto',
        // then the width is shrink-to-fit. Then solve for 'right'."
        (None, None, None) | (Some(_), None, None) => {
            let start = start.unwrap_or(static_start);
            let size = content((containing - start - ms - me - edges).max(0.0))?;
            complete(containing, start, size, ms, me, edges)
        }
        // Rule 1: "'left' and 'width' are 'auto' and 'right' is not 'auto',
        // then the width is shrink-to-fit. Then solve for 'left'."
        (None, None, Some(end)) => {
            let size = content((containing - end - ms - me - edges).max(0.0))?;
            let start = containing - end - me - edges - size - ms;
            complete(containing, start, size, ms, me, edges)
        }
        // Rule 2: "'left' and 'right' are 'auto' and 'width' is not 'auto',
        // then if the 'direction' property of the element establishing the
        // static-position containing block is 'ltr' set 'left' to the static
        // position, otherwise set 'right' to the static position."
        (None, Some(size), None) => complete(containing, static_start, size, ms, me, edges),
        // Rule 4: "'left' is 'auto', 'width' and 'right' are not 'auto', then
        // solve for 'left'."
        (None, Some(size), Some(end)) => {
            let start = containing - end - me - edges - size - ms;
            complete(containing, start, size, ms, me, edges)
        }
        // Rule 5: "'width' is 'auto', 'left' and 'right' are not 'auto', then
        // solve for 'width'."
        (Some(start), None, Some(end)) => {
            let size = (containing - start - ms - edges - me - end).max(0.0);
            complete(containing, start, size, ms, me, edges)
        }
        // Rule 6: "'right' is 'auto', 'left' and 'width' are not 'auto', then
        // solve for 'right'."
        (Some(start), Some(size), None) => complete(containing, start, size, ms, me, edges),
        (Some(start), Some(size), Some(end)) => {
            solve_margins(containing, (start, size, end), (margin_start, margin_end), edges, vertical, direction)
        }
    };
    Ok(solution)
}

/// "If none of the three is 'auto'": the margins absorb the slack.
fn solve_margins(
    containing: f32,
    (start, size, end): (f32, f32, f32),
    margins: (Option<f32>, Option<f32>),
    edges: f32,
    vertical: bool,
    direction: Direction,
) -> AxisSolution {
    let remaining = containing - start - size - end - edges;
    let with_margins = |margin_start, margin_end| AxisSolution {
        start,
        size,
        end,
        margin_start,
        margin_end,
    };
    match margins {
        // "If both 'margin-left' and 'margin-right' are 'auto', solve the
        // equation under the extra constraint that the two margins get equal
        // values, unless this would make them negative, in which case when
        // direction of the containing block is 'ltr' ('rtl'), set
        // 'margin-left' ('margin-right') to zero and solve for 'margin-right'
        // ('margin-left')."
        (None, None) => {
            let half = remaining / 2.0;
            if half >= 0.0 || vertical {
                with_margins(half, half)
            } else if direction == Direction::Rtl {
                with_margins(remaining, 0.0)
            } else {
                with_margins(0.0, remaining)
            }
        }
        // "If one of 'margin-left' or 'margin-right' is 'auto', solve the
        // equation for that value."
        (None, Some(me)) => with_margins(remaining - me, me),
        (Some(ms), None) => with_margins(ms, remaining - ms),
        // "If the values are over-constrained, ignore the value for 'left'
        // (in case the 'direction' property of the containing block is 'rtl')
        // or 'right' (in case 'direction' is 'ltr') and solve for that value."
        //
        // [§ 10.6.4] "If the values are over-constrained, ignore the value
        // for 'bottom' and solve for that value."
        (Some(ms), Some(me)) => {
            if direction == Direction::Rtl && !vertical {
                let start = containing - end - me - edges - size - ms;
                complete(containing, start, size, ms, me, edges)
            } else {
                complete(containing, start, size, ms, me, edges)
            }
        }
    }
}

/// [`solve_absolute_axis`] with the § 10.4 / § 10.7 min and max rules: the
/// equation is solved again with the limit as the specified size.
///
/// # Errors
///
/// Propagates errors from `content`.
pub fn solve_absolute_axis_clamped(
    axis: AbsoluteAxis,
    containing: f32,
    static_start: f32,
    vertical: bool,
    direction: Direction,
    (min, max): (f32, Option<f32>),
    content: &mut dyn FnMut(f32) -> Result<f32>,
) -> Result<AxisSolution> {
    let mut solution = solve_absolute_axis(axis, containing, static_start, vertical, direction, content)?;
    if let Some(max) = max
        && solution.size > max
    {
        let axis = AbsoluteAxis {
            size: Some(max),
            ..axis
        };
        solution = solve_absolute_axis(axis, containing, static_start, vertical, direction, content)?;
    }
    if solution.size < min {
        let axis = AbsoluteAxis {
            size: Some(min),
            ..axis
        };
        solution = solve_absolute_axis(axis, containing, static_start, vertical, direction, content)?;
    }
    Ok(solution)
}

/// The horizontal [`AbsoluteAxis`] of a node whose edges are resolved.
#[must_use]
pub(crate) fn horizontal_axis(node: &LayoutNode) -> AbsoluteAxis {
    let basis = Some(node.containing_width);
    let (_, mr, _, ml) = auto_margins(node);
    AbsoluteAxis {
        start: node.style.offsets.left.resolve(basis),
        size: match node.kind {
            LayoutKind::Replaced(_) => Some(node.width.value),
            _ => node.style.width.resolve(basis),
        },
        end: node.style.offsets.right.resolve(basis),
        margin_start: ml,
        margin_end: mr,
        edges: node.border.horizontal() + node.padding.horizontal(),
    }
}

/// The vertical [`AbsoluteAxis`] of a node whose edges are resolved.
#[must_use]
pub(crate) fn vertical_axis(node: &LayoutNode) -> AbsoluteAxis {
    let basis = node.containing_height;
    let (mt, _, mb, _) = auto_margins(node);
    AbsoluteAxis {
        start: node.style.offsets.top.resolve(basis),
        size: match node.kind {
            LayoutKind::Replaced(_) => Some(node.height.value),
            _ => node.style.height.resolve(basis),
        },
        end: node.style.offsets.bottom.resolve(basis),
        margin_start: mt,
        margin_end: mb,
        edges: node.border.vertical() + node.padding.vertical(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_content(_: f32) -> Result<f32> {
        Ok(0.0)
    }

    #[test]
    fn auto_width_fills_the_containing_block() {
        let (w, ml, mr) = solve_block_width(500.0, None, Some(10.0), Some(20.0), 30.0, Direction::Ltr);
        assert_eq!((w, ml, mr), (440.0, 10.0, 20.0));
    }

    #[test]
    fn auto_margins_center_a_fixed_width() {
        let (w, ml, mr) = solve_block_width(500.0, Some(300.0), None, None, 0.0, Direction::Ltr);
        assert_eq!((w, ml, mr), (300.0, 100.0, 100.0));
    }

    #[test]
    fn over_constrained_adjusts_the_end_margin() {
        let ltr = solve_block_width(500.0, Some(300.0), Some(10.0), Some(10.0), 0.0, Direction::Ltr);
        assert_eq!(ltr, (300.0, 10.0, 190.0));
        let rtl = solve_block_width(500.0, Some(300.0), Some(10.0), Some(10.0), 0.0, Direction::Rtl);
        assert_eq!(rtl, (300.0, 190.0, 10.0));
    }

    #[test]
    fn too_wide_box_treats_auto_margins_as_zero() {
        let (w, ml, mr) = solve_block_width(200.0, Some(300.0), None, None, 0.0, Direction::Ltr);
        assert_eq!((w, ml), (300.0, 0.0));
        assert_eq!(mr, -100.0);
    }

    #[test]
    fn absolute_all_auto_uses_static_position_and_content() {
        let mut content = |available: f32| Ok(available.min(80.0));
        let s = solve_absolute_axis(
            AbsoluteAxis::default(),
            400.0,
            25.0,
            false,
            Direction::Ltr,
            &mut content,
        )
        .unwrap();
        assert_eq!((s.start, s.size, s.end), (25.0, 80.0, 295.0));
    }

    #[test]
    fn absolute_fixed_width_sits_at_static_start_in_both_directions() {
        let axis = AbsoluteAxis {
            size: Some(100.0),
            ..AbsoluteAxis::default()
        };
        for direction in [Direction::Ltr, Direction::Rtl] {
            let s = solve_absolute_axis(axis, 400.0, 40.0, false, direction, &mut no_content).unwrap();
            assert_eq!((s.start, s.size, s.end), (40.0, 100.0, 260.0));
        }
    }

    #[test]
    fn absolute_right_only_solves_left() {
        let axis = AbsoluteAxis {
            end: Some(10.0),
            ..AbsoluteAxis::default()
        };
        let mut content = |_| Ok(50.0);
        let s = solve_absolute_axis(axis, 400.0, 0.0, false, Direction::Ltr, &mut content).unwrap();
        assert_eq!((s.start, s.size), (340.0, 50.0));
    }

    #[test]
    fn absolute_left_and_right_solve_width() {
        let axis = AbsoluteAxis {
            start: Some(10.0),
            end: Some(30.0),
            edges: 10.0,
            ..AbsoluteAxis::default()
        };
        let s = solve_absolute_axis(axis, 400.0, 0.0, false, Direction::Ltr, &mut no_content).unwrap();
        assert_eq!(s.size, 350.0);
    }

    #[test]
    fn absolute_auto_margins_center_or_fall_back() {
        let axis = AbsoluteAxis {
            start: Some(0.0),
            size: Some(100.0),
            end: Some(0.0),
            ..AbsoluteAxis::default()
        };
        let s = solve_absolute_axis(axis, 300.0, 0.0, false, Direction::Ltr, &mut no_content).unwrap();
        assert_eq!((s.margin_start, s.margin_end), (100.0, 100.0));

        let s = solve_absolute_axis(axis, 50.0, 0.0, false, Direction::Ltr, &mut no_content).unwrap();
        assert_eq!((s.margin_start, s.margin_end), (0.0, -50.0));

        let s = solve_absolute_axis(axis, 50.0, 0.0, true, Direction::Ltr, &mut no_content).unwrap();
        assert_eq!((s.margin_start, s.margin_end), (-25.0, -25.0));
    }

    #[test]
    fn absolute_over_constrained_ignores_end_in_ltr() {
        let axis = AbsoluteAxis {
            start: Some(10.0),
            size: Some(100.0),
            end: Some(10.0),
            margin_start: Some(0.0),
            margin_end: Some(0.0),
            edges: 0.0,
        };
        let s = solve_absolute_axis(axis, 300.0, 0.0, false, Direction::Ltr, &mut no_content).unwrap();
        assert_eq!((s.start, s.end), (10.0, 190.0));
        let s = solve_absolute_axis(axis, 300.0, 0.0, false, Direction::Rtl, &mut no_content).unwrap();
        assert_eq!((s.start, s.end), (190.0, 10.0));
    }

    #[test]
    fn clamped_solution_reruns_with_the_limit() {
        let axis = AbsoluteAxis {
            start: Some(0.0),
            end: Some(0.0),
            margin_start: Some(0.0),
            margin_end: Some(0.0),
            ..AbsoluteAxis::default()
        };
        let s = solve_absolute_axis_clamped(
            axis,
            500.0,
            0.0,
            false,
            Direction::Ltr,
            (0.0, Some(200.0)),
            &mut no_content,
        )
        .unwrap();
        assert_eq!((s.size, s.end), (200.0, 300.0));
    }
}
