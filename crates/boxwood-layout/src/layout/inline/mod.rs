//! Inline formatting.
//!
//! [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
//!
//! "In an inline formatting context, boxes are laid out horizontally, one
//! after the other, beginning at the top of a containing block. [...] The
//! rectangular area that contains the boxes that form a line is called a
//! line box."
//!
//! A run of inline content is flattened into items ([`items`]), packed
//! greedily into line boxes that avoid floats, aligned vertically on a
//! per-line box tree ([`generated`]) and turned into positioned fragments
//! ([`line`]).

pub mod generated;
pub mod items;
pub mod line;

use std::collections::HashMap;
use std::rc::Rc;

use crate::box_tree::BoxId;
use crate::error::Result;
use crate::resources::FontMetrics;
use crate::style::properties::ComputedProperties;
use crate::style::values::{Direction, Position, TextAlign, VerticalAlign};

use super::block::{self, BlockCursor, outer_box};
use super::box_model::{Point, Rect};
use super::formatting_context::{ContextId, LineBand};
use super::positioned::relative_offset;
use super::sizing;
use super::tree::{LayoutId, LayoutKind, LayoutTree, SizeValue};
use super::LayoutContext;
use generated::{GenId, GenKind, GeneratedBoxes};
use items::{InlineItem, ItemKind, collect_items, segment_end};
use line::{Fragment, FragmentKind, InlineContent, LineBox};

/// Lay out one run of inline content of `container` starting at page `y`.
///
/// Lines are appended to the container's inline content. Returns the bottom
/// of the last line, or `None` if the run produced no line box.
///
/// # Errors
///
/// Propagates errors from laying out atomic inlines, floats and blocks found
/// in the run.
pub(crate) fn layout_inline_run(
    cx: &mut LayoutContext<'_>,
    container: LayoutId,
    run: &[BoxId],
    y: f32,
) -> Result<Option<f32>> {
    let items = collect_items(cx.boxes, &cx.tree, run);
    if items.is_empty() {
        return Ok(None);
    }
    let fc = cx.tree[container].formatting_context.id();
    let content = cx.tree[container].content_box;
    let style = Rc::clone(&cx.tree[container].style);
    let strut = style.used_line_height();

    // STEP 1: Resolve inline edges and lay out atomics and floats on their own.
    prepare_items(cx, container, &items, y)?;
    let (advance, hang) = measure_items(cx, &items);

    // STEP 2: Fill lines.
    let mut open: Vec<LayoutId> = Vec::new();
    let mut y = y;
    let mut bottom = None;
    let mut first_line = cx.tree[container]
        .inline_content
        .as_ref()
        .is_none_or(|c| c.lines.is_empty());
    let mut i = 0;

    while i < items.len() {
        if let ItemKind::Block(node) = items[i].kind {
            let mut cursor = BlockCursor::at(y);
            block::layout_block_child(cx, container, node, &mut cursor)?;
            y = cursor.next_y();
            bottom = Some(y);
            i += 1;
            continue;
        }

        // [§ 16.1 Indentation: the 'text-indent' property](https://www.w3.org/TR/CSS2/text.html#indentation-prop)
        //
        // "This property specifies the indentation of the first line of text
        // in a block container."
        let indent = if first_line {
            style.text_indent.resolve(Some(content.width))
        } else {
            0.0
        };
        let first_end = segment_end(&items, i);
        let needed = indent + fit_width(&items, &advance, &hang, i, first_end);
        let mut band = find_band(cx, fc, content, y, strut, needed);

        let mut end = i;
        let mut used = indent;
        let mut deferred: Vec<LayoutId> = Vec::new();
        while end < items.len() && !matches!(items[end].kind, ItemKind::Block(_)) {
            let next = segment_end(&items, end);
            // The first segment always goes on the line, even if it overflows.
            if end > i && used + fit_width(&items, &advance, &hang, end, next) > band.width() {
                break;
            }
            let total: f32 = advance[end..next].iter().sum();
            for item in &items[end..next] {
                let ItemKind::Float(float) = item.kind else {
                    continue;
                };
                // [§ 9.5.1] A float that fits next to the content of the
                // current line goes on this line; otherwise below it.
                let width = outer_box(&cx.tree[float]).width;
                if deferred.is_empty() && used + total + width <= band.width() {
                    block::place_float(cx, fc, content, float, band.top);
                    band = find_band(cx, fc, content, band.top, strut, 0.0);
                } else {
                    deferred.push(float);
                }
            }
            used += total;
            end = next;
            if matches!(items[end - 1].kind, ItemKind::HardBreak) {
                break;
            }
        }

        let last = end >= items.len()
            || matches!(items[end].kind, ItemKind::Block(_))
            || matches!(items[end - 1].kind, ItemKind::HardBreak);
        let line = LineInput {
            items: &items[i..end],
            band,
            indent,
            last,
        };
        if let Some(line) = build_line(cx, container, &line, &mut open) {
            y = line.rect.bottom();
            bottom = Some(y);
            first_line = false;
            cx.tree[container]
                .inline_content
                .get_or_insert_with(InlineContent::default)
                .lines
                .push(line);
        }
        for float in deferred {
            block::place_float(cx, fc, content, float, y);
        }
        i = end;
    }

    update_inline_geometry(cx, container);
    Ok(bottom)
}

fn prepare_items(cx: &mut LayoutContext<'_>, container: LayoutId, items: &[InlineItem], y: f32) -> Result<()> {
    let content = cx.tree[container].content_box;
    let containing_height = sizing::definite_height(&cx.tree[container]);
    for item in items {
        match item.kind {
            ItemKind::Open(node) => {
                let node = &mut cx.tree[node];
                node.containing_width = content.width;
                node.containing_height = None;
                sizing::resolve_edges(node);
            }
            ItemKind::Atomic(node) | ItemKind::Float(node) => {
                block::layout_detached(cx, node, content.width, containing_height)?;
            }
            // Overwritten when the box lands on a line.
            ItemKind::Positioned(node) => cx.tree[node].static_position = Point::new(content.x, y),
            ItemKind::Text { .. } | ItemKind::Close(_) | ItemKind::HardBreak | ItemKind::Block(_) => {}
        }
    }
    Ok(())
}

/// Advance of every item, and the width of the trailing spaces that may
/// hang past the end of a line.
fn measure_items(cx: &mut LayoutContext<'_>, items: &[InlineItem]) -> (Vec<f32>, Vec<f32>) {
    let mut advance = Vec::with_capacity(items.len());
    let mut hang = Vec::with_capacity(items.len());
    for item in items {
        let (width, hanging) = match &item.kind {
            ItemKind::Text { parent, text, .. } => {
                let style = Rc::clone(&cx.tree[*parent].style);
                let width = cx.text_width(&style, text);
                let hanging = if style.white_space.allows_soft_wrap() {
                    width - cx.text_width(&style, text.trim_end_matches(' '))
                } else {
                    0.0
                };
                (width, hanging)
            }
            ItemKind::Open(node) => {
                let node = &cx.tree[*node];
                (node.margin.left + node.border.left + node.padding.left, 0.0)
            }
            ItemKind::Close(node) => {
                let node = &cx.tree[*node];
                (node.margin.right + node.border.right + node.padding.right, 0.0)
            }
            ItemKind::Atomic(node) => (outer_box(&cx.tree[*node]).width, 0.0),
            ItemKind::Float(_) | ItemKind::Positioned(_) | ItemKind::HardBreak | ItemKind::Block(_) => (0.0, 0.0),
        };
        advance.push(width);
        hang.push(hanging);
    }
    (advance, hang)
}

/// Width the items `start..end` need at the end of a line.
fn fit_width(items: &[InlineItem], advance: &[f32], hang: &[f32], start: usize, end: usize) -> f32 {
    let total: f32 = advance[start..end].iter().sum();
    let hanging = (start..end)
        .rev()
        .find(|&k| {
            !matches!(
                items[k].kind,
                ItemKind::Close(_) | ItemKind::Float(_) | ItemKind::Positioned(_) | ItemKind::HardBreak
            )
        })
        .filter(|&k| matches!(items[k].kind, ItemKind::Text { .. }))
        .map_or(0.0, |k| hang[k]);
    total - hanging
}

/// The band free of floats at page `y`, in page coordinates.
fn find_band(cx: &LayoutContext<'_>, fc: ContextId, content: Rect, y: f32, height: f32, min_width: f32) -> LineBand {
    let context = cx.tree.context(fc);
    let origin = context.origin;
    let band = context.find_line_box(
        content.x - origin.x,
        content.right() - origin.x,
        y - origin.y,
        height,
        min_width,
    );
    LineBand {
        left: band.left + origin.x,
        right: band.right + origin.x,
        top: band.top + origin.y,
    }
}

struct LineInput<'i> {
    items: &'i [InlineItem],
    band: LineBand,
    indent: f32,
    /// Last line of the run or ended by a forced break: never justified.
    last: bool,
}

/// Build the line box for `line.items`. Returns `None` if nothing on the
/// line has width or height.
///
/// `open` holds the inline elements still open at the start of the line
/// and is updated to those open at its end.
fn build_line(
    cx: &mut LayoutContext<'_>,
    container: LayoutId,
    line: &LineInput<'_>,
    open: &mut Vec<LayoutId>,
) -> Option<LineBox> {
    let container_style = Rc::clone(&cx.tree[container].style);
    let mut boxes = GeneratedBoxes::new(Rc::clone(&container_style));
    let mut stack = vec![GeneratedBoxes::ROOT];

    // Elements that continue from the previous line.
    for &node in open.iter() {
        let parent = stack.last().copied().unwrap_or(GeneratedBoxes::ROOT);
        let kind = GenKind::Span {
            node,
            first: false,
            last: false,
        };
        stack.push(boxes.push(parent, kind, Rc::clone(&cx.tree[node].style), 0.0));
    }

    // [§ 16.6.1] "As each line is laid out, [...] If a space (U+0020) at the
    // beginning of a line has 'white-space' set to 'normal', 'nowrap', or
    // 'pre-line', it is removed. [...] If a space (U+0020) at the end of a
    // line has 'white-space' set to 'normal', 'nowrap', or 'pre-line', it is
    // also removed."
    let items = line.items;
    let last_text = items
        .iter()
        .rposition(|item| {
            !matches!(
                item.kind,
                ItemKind::Close(_) | ItemKind::Float(_) | ItemKind::Positioned(_) | ItemKind::HardBreak
            )
        })
        .filter(|&k| matches!(items[k].kind, ItemKind::Text { .. }));

    let mut x = line.indent;
    let mut has_content = false;
    let mut at_start = true;
    for (k, item) in items.iter().enumerate() {
        let parent = stack.last().copied().unwrap_or(GeneratedBoxes::ROOT);
        match &item.kind {
            ItemKind::Open(node) => {
                let element = &cx.tree[*node];
                has_content |= element.horizontal_edges() != 0.0;
                let kind = GenKind::Span {
                    node: *node,
                    first: true,
                    last: false,
                };
                let id = boxes.push(parent, kind, Rc::clone(&element.style), x);
                x += element.margin.left + element.border.left + element.padding.left;
                stack.push(id);
                open.push(*node);
            }
            ItemKind::Close(node) => {
                let element = &cx.tree[*node];
                x += element.margin.right + element.border.right + element.padding.right;
                if stack.len() > 1
                    && let Some(id) = stack.pop()
                {
                    boxes[id].end = x;
                    if let GenKind::Span { last, .. } = &mut boxes[id].kind {
                        *last = true;
                    }
                }
                let _ = open.pop();
            }
            ItemKind::Text {
                box_id,
                parent: owner,
                text,
                start,
                end,
            } => {
                let style = Rc::clone(&cx.tree[*owner].style);
                let (mut start, mut end) = (*start, *end);
                let mut piece = text.as_str();
                if style.white_space.collapses_spaces() {
                    if at_start {
                        let trimmed = piece.trim_start_matches(' ');
                        start += piece.len() - trimmed.len();
                        piece = trimmed;
                    }
                    if Some(k) == last_text {
                        let trimmed = piece.trim_end_matches(' ');
                        end -= piece.len() - trimmed.len();
                        piece = trimmed;
                    }
                }
                if piece.is_empty() {
                    continue;
                }
                let width = cx.text_width(&style, piece);
                let kind = GenKind::Text {
                    box_id: *box_id,
                    parent: *owner,
                    text: piece.to_owned(),
                    start,
                    end,
                };
                let id = boxes.push(parent, kind, style, x);
                x += width;
                boxes[id].end = x;
                has_content = true;
                at_start = false;
            }
            ItemKind::Atomic(node) => {
                let element = &cx.tree[*node];
                let id = boxes.push(parent, GenKind::Atomic { node: *node }, Rc::clone(&element.style), x);
                x += outer_box(element).width;
                boxes[id].end = x;
                has_content = true;
                at_start = false;
            }
            ItemKind::Positioned(node) => {
                let _ = boxes.push(parent, GenKind::Marker { node: *node }, Rc::clone(&container_style), x);
            }
            // A forced break makes the line exist even when it is empty.
            ItemKind::HardBreak => has_content = true,
            ItemKind::Float(_) | ItemKind::Block(_) => {}
        }
    }
    for &id in &stack[1..] {
        boxes[id].end = x;
    }

    if !has_content {
        // "Line boxes that contain no text, no preserved white space, no
        // inline elements with non-zero margins, padding, or borders or other
        // in-flow content [...] must be treated as zero-height line boxes"
        for id in boxes.ids() {
            if let GenKind::Marker { node } = boxes[id].kind {
                cx.tree[node].static_position = Point::new(line.band.left + boxes[id].x, line.band.top);
            }
        }
        return None;
    }

    let (above, below) = align_vertically(cx, &mut boxes);
    Some(place_fragments(cx, &container_style, &boxes, line, x, above, below))
}

/// [§ 10.8.1 Leading and half-leading](https://www.w3.org/TR/CSS2/visudet.html#leading)
///
/// "Add half the leading to the top and half to the bottom of the inline
/// box, with the leading L = 'line-height' - AD."
fn half_leading(metrics: &FontMetrics, line_height: f32) -> (f32, f32) {
    let leading = line_height - (metrics.ascent + metrics.descent);
    let ascent = metrics.ascent + leading / 2.0;
    (ascent, line_height - ascent)
}

/// [§ 10.8.1 'vertical-align'](https://www.w3.org/TR/CSS2/visudet.html#propdef-vertical-align)
///
/// Baseline shift, positive down, of a box with layout bounds `ascent` /
/// `descent` relative to its parent's baseline.
fn baseline_shift(align: VerticalAlign, parent: &FontMetrics, parent_font_size: f32, ascent: f32, descent: f32) -> f32 {
    match align {
        VerticalAlign::Baseline | VerticalAlign::Top | VerticalAlign::Bottom => 0.0,
        VerticalAlign::Sub => parent_font_size * 0.2,
        VerticalAlign::Super => -parent_font_size * 0.33,
        VerticalAlign::TextTop => ascent - parent.ascent,
        VerticalAlign::TextBottom => parent.descent - descent,
        VerticalAlign::Middle => (ascent - descent) / 2.0 - parent.x_height / 2.0,
        VerticalAlign::Offset(raise) => -raise,
    }
}

/// Layout bounds of an atomic inline around its baseline.
///
/// [§ 10.8.1] "The baseline of an 'inline-block' is the baseline of its last
/// line box in the normal flow, unless it has either no in-flow line boxes
/// or if its 'overflow' property has a computed value other than 'visible',
/// in which case the baseline is the bottom margin edge."
fn atomic_extent(tree: &LayoutTree, node: LayoutId) -> (f32, f32) {
    let element = &tree[node];
    let outer = outer_box(element);
    let baseline = match element.kind {
        LayoutKind::Block if !element.style.overflow.clips() => last_line_baseline(tree, node),
        _ => None,
    };
    match baseline {
        Some(baseline) => (baseline - outer.y, outer.bottom() - baseline),
        None => (outer.height, 0.0),
    }
}

/// Lowest baseline among the in-flow line boxes inside `id`.
pub(crate) fn last_line_baseline(tree: &LayoutTree, id: LayoutId) -> Option<f32> {
    let mut best: Option<f32> = None;
    let mut stack = vec![id];
    while let Some(current) = stack.pop() {
        let node = &tree[current];
        if let Some(baseline) = node.inline_content.as_ref().and_then(InlineContent::last_baseline) {
            best = Some(best.map_or(baseline, |b| b.max(baseline)));
        }
        stack.extend(node.children.iter().copied().filter(|&c| {
            let child = &tree[c];
            matches!(child.kind, LayoutKind::Block)
                && child.is_block_level()
                && !child.is_float()
                && !child.is_out_of_flow()
        }));
    }
    best
}

/// [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
///
/// Fill in the layout bounds and baseline offsets of every box, then return
/// the line box's extent above and below its baseline.
fn align_vertically(cx: &mut LayoutContext<'_>, boxes: &mut GeneratedBoxes) -> (f32, f32) {
    let count = boxes.len();
    let mut align = vec![VerticalAlign::Baseline; count];
    let mut aligned_root: Vec<Option<GenId>> = vec![None; count];

    // STEP 1: "The height of each inline-level box in the line box is
    // calculated", then its baseline is placed relative to its parent.
    for id in boxes.ids() {
        let style = Rc::clone(&boxes[id].style);
        let (ascent, descent) = match boxes[id].kind {
            GenKind::Root | GenKind::Span { .. } | GenKind::Text { .. } => {
                let metrics = cx.metrics(&style);
                half_leading(&metrics, style.used_line_height())
            }
            GenKind::Atomic { node } => atomic_extent(&cx.tree, node),
            GenKind::Marker { .. } => (0.0, 0.0),
        };
        boxes[id].ascent = ascent;
        boxes[id].descent = descent;

        let Some(parent) = boxes[id].parent else {
            continue;
        };
        if matches!(boxes[id].kind, GenKind::Span { .. } | GenKind::Atomic { .. }) {
            align[id.0] = style.vertical_align;
        }
        let parent_style = Rc::clone(&boxes[parent].style);
        let parent_metrics = cx.metrics(&parent_style);
        let shift = baseline_shift(align[id.0], &parent_metrics, parent_style.font_size, ascent, descent);
        boxes[id].offset = boxes[parent].offset + shift;
        aligned_root[id.0] = if matches!(align[id.0], VerticalAlign::Top | VerticalAlign::Bottom) {
            Some(id)
        } else {
            aligned_root[parent.0]
        };
    }

    // STEP 2: "The line box height is the distance between the uppermost box
    // top and the lowermost box bottom."
    let mut above: f32 = 0.0;
    let mut below: f32 = 0.0;
    for id in boxes.ids() {
        if aligned_root[id.0].is_none() {
            above = above.max(boxes[id].ascent - boxes[id].offset);
            below = below.max(boxes[id].descent + boxes[id].offset);
        }
    }

    // STEP 3: 'top' and 'bottom' subtrees are aligned to the line box once
    // its height is known, growing it if they do not fit.
    let roots: Vec<GenId> = boxes.ids().filter(|id| aligned_root[id.0] == Some(*id)).collect();
    let extent = |boxes: &GeneratedBoxes, root: GenId| {
        let base = boxes[root].offset;
        (root.0..boxes.subtree_end(root)).fold((0.0_f32, 0.0_f32), |(a, d), k| {
            let b = &boxes[GenId(k)];
            (a.max(b.ascent - (b.offset - base)), d.max(b.descent + (b.offset - base)))
        })
    };
    for &root in &roots {
        let (sub_above, sub_below) = extent(&*boxes, root);
        let overflow = sub_above + sub_below - (above + below);
        if overflow > 0.0 {
            match align[root.0] {
                VerticalAlign::Top => below += overflow,
                _ => above += overflow,
            }
        }
    }
    for &root in &roots {
        let (sub_above, sub_below) = extent(&*boxes, root);
        let target = match align[root.0] {
            VerticalAlign::Top => sub_above - above,
            _ => below - sub_below,
        };
        let delta = target - boxes[root].offset;
        for k in root.0..boxes.subtree_end(root) {
            boxes[GenId(k)].offset += delta;
        }
    }
    (above, below)
}

/// [§ 16.2 Alignment: the 'text-align' property](https://www.w3.org/TR/CSS2/text.html#alignment-prop)
///
/// Align the line horizontally and emit its fragments. `width` is the
/// content width of the line; `above` and `below` its extent around the
/// baseline.
fn place_fragments(
    cx: &mut LayoutContext<'_>,
    container_style: &ComputedProperties,
    boxes: &GeneratedBoxes,
    line: &LineInput<'_>,
    width: f32,
    above: f32,
    below: f32,
) -> LineBox {
    let band = line.band;
    let slack = (band.width() - width).max(0.0);
    let start = match container_style.direction {
        Direction::Ltr => 0.0,
        Direction::Rtl => slack,
    };
    // "If an element has a computed value for 'white-space' of 'pre' or
    // 'pre-wrap', then neither the glyphs of that element's text content nor
    // its white space may be altered by any justification algorithm." Lines
    // ending in a forced break are left unjustified.
    let justify = container_style.text_align == TextAlign::Justify && !line.last;
    let shift = match container_style.text_align {
        TextAlign::Left => 0.0,
        TextAlign::Right => slack,
        TextAlign::Center => slack / 2.0,
        TextAlign::Start | TextAlign::Justify => start,
    };

    // Word gaps: a text piece ending in a space is followed by one.
    let ends_in_space = |id: GenId| match &boxes[id].kind {
        GenKind::Text { text, .. } => boxes[id].style.white_space.collapses_spaces() && text.ends_with(' '),
        _ => false,
    };
    let mut gaps_before = vec![0_usize; boxes.len() + 1];
    for id in boxes.ids() {
        gaps_before[id.0 + 1] = gaps_before[id.0] + usize::from(ends_in_space(id));
    }
    let gaps = gaps_before[boxes.len()];
    let per_gap = if justify && gaps > 0 { slack / gaps as f32 } else { 0.0 };
    let shift = if justify && gaps > 0 { 0.0 } else { shift };

    let left = band.left + shift;
    let baseline = band.top + above;
    let mut fragments: Vec<Fragment> = Vec::new();
    let mut sources: Vec<usize> = Vec::new();
    let mut relative = vec![Point::default(); boxes.len()];

    for id in boxes.ids().skip(1) {
        let b = &boxes[id];
        let parent = b.parent.unwrap_or(GeneratedBoxes::ROOT);
        relative[id.0] = relative[parent.0];
        let x = left + b.x + gaps_before[id.0] as f32 * per_gap;
        let y = baseline + b.offset;

        let fragment = match &b.kind {
            GenKind::Root => continue,
            GenKind::Marker { node } => {
                cx.tree[*node].static_position = Point::new(x, band.top);
                continue;
            }
            GenKind::Span { node, first, last } => {
                let metrics = cx.metrics(&b.style);
                let element = &cx.tree[*node];
                let own = if element.style.position == Position::Relative {
                    relative_offset(element)
                } else {
                    Point::default()
                };
                relative[id.0] = Point::new(relative[id.0].x + own.x, relative[id.0].y + own.y);
                let r = relative[id.0];
                let left_edge = x + if *first { element.margin.left } else { 0.0 };
                let right_edge = left + b.end + gaps_before[boxes.subtree_end(id)] as f32 * per_gap
                    - if *last { element.margin.right } else { 0.0 };
                let top = y - metrics.ascent - element.padding.top - element.border.top;
                let height =
                    metrics.ascent + metrics.descent + element.padding.vertical() + element.border.vertical();
                cx.tree[*node].relative = own;
                Fragment {
                    kind: FragmentKind::InlineBox {
                        node: *node,
                        first: *first,
                        last: *last,
                        descendants: 0,
                    },
                    rect: Rect::new(left_edge + r.x, top + r.y, (right_edge - left_edge).max(0.0), height),
                    baseline: y + r.y,
                }
            }
            GenKind::Text {
                box_id,
                parent,
                text,
                start,
                end,
            } => {
                let metrics = cx.metrics(&b.style);
                let r = relative[id.0];
                let extra = if ends_in_space(id) { per_gap } else { 0.0 };
                Fragment {
                    kind: FragmentKind::Text {
                        box_id: *box_id,
                        parent: *parent,
                        text: text.clone(),
                        start: *start,
                        end: *end,
                    },
                    rect: Rect::new(
                        x + r.x,
                        y - metrics.ascent + r.y,
                        b.end - b.x + extra,
                        metrics.ascent + metrics.descent,
                    ),
                    baseline: y + r.y,
                }
            }
            GenKind::Atomic { node } => {
                let r = relative[id.0];
                let outer = outer_box(&cx.tree[*node]);
                let target = Point::new(x + r.x, y - b.ascent + r.y);
                cx.tree.translate_subtree(*node, target.x - outer.x, target.y - outer.y);
                Fragment {
                    kind: FragmentKind::Atomic { node: *node },
                    rect: Rect::new(target.x, target.y, outer.width, outer.height),
                    baseline: y + r.y,
                }
            }
        };
        fragments.push(fragment);
        sources.push(id.0);
    }

    // An inline box fragment counts the fragments of its subtree that
    // follow it.
    for f in 0..fragments.len() {
        if let FragmentKind::InlineBox { descendants, .. } = &mut fragments[f].kind {
            let end = boxes.subtree_end(GenId(sources[f]));
            *descendants = sources[f + 1..].iter().take_while(|&&s| s < end).count();
        }
    }

    LineBox {
        rect: Rect::new(band.left, band.top, band.width(), above + below),
        baseline,
        fragments,
    }
}

/// Set the content box of every inline element of `container` to the union
/// of its fragments, less borders and padding.
fn update_inline_geometry(cx: &mut LayoutContext<'_>, container: LayoutId) {
    let Some(content) = &cx.tree[container].inline_content else {
        return;
    };
    let mut unions: HashMap<LayoutId, Rect> = HashMap::new();
    for fragment in content.fragments() {
        let FragmentKind::InlineBox { node, first, last, .. } = fragment.kind else {
            continue;
        };
        let element = &cx.tree[node];
        let left = if first { element.border.left + element.padding.left } else { 0.0 };
        let right = if last { element.border.right + element.padding.right } else { 0.0 };
        let top = element.border.top + element.padding.top;
        let r = fragment.rect;
        let inner = Rect::new(
            r.x + left,
            r.y + top,
            (r.width - left - right).max(0.0),
            (r.height - element.border.vertical() - element.padding.vertical()).max(0.0),
        );
        let _ = unions
            .entry(node)
            .and_modify(|u| *u = u.union(&inner))
            .or_insert(inner);
    }
    for (node, rect) in unions {
        let element = &mut cx.tree[node];
        element.content_box = rect;
        element.width = SizeValue::fixed(rect.width);
        element.height = SizeValue::fixed(rect.height);
    }
}
