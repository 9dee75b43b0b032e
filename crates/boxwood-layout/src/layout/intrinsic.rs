//! Intrinsic widths for shrink-to-fit and table column sizing.
//!
//! [§ 10.3.5 Floating, non-replaced elements](https://www.w3.org/TR/CSS2/visudet.html#float-width)
//!
//! "Calculate the preferred width by formatting the content without
//! breaking lines other than where explicit line breaks occur, and also
//! calculate the preferred minimum width, e.g., by trying all possible line
//! breaks."
//!
//! Measurements never depend on the containing block: percentages count as
//! zero. Results are cached per layout pass.

use std::rc::Rc;

use crate::box_tree::BoxId;
use crate::error::Result;
use crate::style::properties::ComputedProperties;
use crate::style::values::{LengthPercentage, LengthPercentageAuto, MaxSize};

use super::inline::items::{ItemKind, collect_items};
use super::replaced::used_replaced_size;
use super::table;
use super::tree::{LayoutId, LayoutKind};
use super::LayoutContext;

/// Which intrinsic width to measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Preferred (max-content) width: break only at forced breaks.
    Preferred,
    /// Preferred minimum (min-content) width: break at every opportunity.
    Minimum,
}

fn px(length: LengthPercentage) -> f32 {
    match length {
        LengthPercentage::Px(px) => px,
        LengthPercentage::Percent(_) => 0.0,
    }
}

fn px_or_zero(length: LengthPercentageAuto) -> f32 {
    match length {
        LengthPercentageAuto::Px(px) => px,
        _ => 0.0,
    }
}

/// Left margin, border and padding, counting percentages and `auto` as zero.
pub(crate) fn start_edges(style: &ComputedProperties) -> f32 {
    px_or_zero(style.margin.left) + style.border_width.left + px(style.padding.left)
}

/// Right margin, border and padding, counting percentages and `auto` as zero.
pub(crate) fn end_edges(style: &ComputedProperties) -> f32 {
    px_or_zero(style.margin.right) + style.border_width.right + px(style.padding.right)
}

/// Horizontal borders and padding, counting percentages as zero.
pub(crate) fn border_and_padding(style: &ComputedProperties) -> f32 {
    style.border_width.left + style.border_width.right + px(style.padding.left) + px(style.padding.right)
}

/// Content-box width of `id` under `strategy`.
///
/// # Errors
///
/// Propagates errors from laying out table cells while measuring.
pub(crate) fn content_width(cx: &mut LayoutContext<'_>, id: LayoutId, strategy: Strategy) -> Result<f32> {
    if let Some(&width) = cx.intrinsic_cache.get(&(id, strategy)) {
        return Ok(width);
    }
    let width = if let LayoutKind::Replaced(data) = &cx.tree[id].kind {
        let style = &cx.tree[id].style;
        used_replaced_size(data, style.width, style.height, 0.0, None).width
    } else if matches!(cx.tree[id].kind, LayoutKind::Table(_)) {
        let border_box = table::measure_table(cx, id, strategy)?;
        (border_box - border_and_padding(&cx.tree[id].style)).max(0.0)
    } else {
        measure_block_flow(cx, id, strategy)?
    };
    let _ = cx.intrinsic_cache.insert((id, strategy), width);
    Ok(width)
}

/// Margin-box width of `id` under `strategy`. A fixed `width` wins over
/// the content.
///
/// # Errors
///
/// Propagates errors from [`content_width`].
pub(crate) fn outer_width(cx: &mut LayoutContext<'_>, id: LayoutId, strategy: Strategy) -> Result<f32> {
    let style = Rc::clone(&cx.tree[id].style);
    let fixed = match (&cx.tree[id].kind, style.width) {
        (LayoutKind::Replaced(_) | LayoutKind::Table(_), _) => None,
        (_, LengthPercentageAuto::Px(width)) => Some(width),
        _ => None,
    };
    let mut content = match fixed {
        Some(width) => width,
        None => content_width(cx, id, strategy)?,
    };
    if let MaxSize::Px(max) = style.max_width {
        content = content.min(max);
    }
    content = content.max(px(style.min_width));
    Ok(start_edges(&style) + content + end_edges(&style))
}

/// Width of block-level children stacked vertically, with runs of inline
/// content measured as lines.
fn measure_block_flow(cx: &mut LayoutContext<'_>, id: LayoutId, strategy: Strategy) -> Result<f32> {
    let boxes = cx.boxes;
    let mut best: f32 = 0.0;
    let mut float_row: f32 = 0.0;
    let mut run: Vec<BoxId> = Vec::new();

    for &child in boxes.children(cx.tree[id].box_id) {
        let Some(child_id) = cx.tree.node_for_box(child) else {
            run.push(child);
            continue;
        };
        let node = &cx.tree[child_id];
        if node.is_out_of_flow() {
            continue;
        }
        if node.is_float() {
            let width = outer_width(cx, child_id, strategy)?;
            match strategy {
                // Floats in a row sit side by side.
                Strategy::Preferred => float_row += width,
                Strategy::Minimum => best = best.max(width),
            }
            best = best.max(float_row);
            continue;
        }
        if node.is_block_level() {
            if !run.is_empty() {
                let lines = measure_inline_run(cx, id, &run, strategy)?;
                best = best.max(float_row + lines);
                run.clear();
            }
            best = best.max(outer_width(cx, child_id, strategy)?);
            float_row = 0.0;
            continue;
        }
        run.push(child);
    }
    if !run.is_empty() {
        let lines = measure_inline_run(cx, id, &run, strategy)?;
        best = best.max(float_row + lines);
    }
    Ok(best)
}

/// Width of the text piece as it would end a line: trailing spaces hang
/// when the text may wrap.
fn piece_width(cx: &mut LayoutContext<'_>, parent: LayoutId, text: &str, strategy: Strategy) -> f32 {
    let style = Rc::clone(&cx.tree[parent].style);
    let text = if strategy == Strategy::Minimum && style.white_space.allows_soft_wrap() {
        text.trim_end_matches(' ')
    } else {
        text
    };
    cx.text_width(&style, text)
}

/// Preferred or minimum width of one run of inline content of `container`.
///
/// # Errors
///
/// Propagates errors from measuring atomic inlines.
pub(crate) fn measure_inline_run(
    cx: &mut LayoutContext<'_>,
    container: LayoutId,
    run: &[BoxId],
    strategy: Strategy,
) -> Result<f32> {
    let items = collect_items(cx.boxes, &cx.tree, run);
    let indent = px(cx.tree[container].style.text_indent);
    let mut best: f32 = 0.0;
    let mut line = indent;

    for item in &items {
        if strategy == Strategy::Minimum && item.break_before {
            best = best.max(line);
            line = 0.0;
        }
        match &item.kind {
            ItemKind::Text { parent, text, .. } => line += piece_width(cx, *parent, text, strategy),
            ItemKind::Open(node) => line += start_edges(&cx.tree[*node].style),
            ItemKind::Close(node) => line += end_edges(&cx.tree[*node].style),
            ItemKind::Atomic(node) => line += outer_width(cx, *node, strategy)?,
            ItemKind::Float(node) => {
                let width = outer_width(cx, *node, strategy)?;
                match strategy {
                    Strategy::Preferred => line += width,
                    Strategy::Minimum => best = best.max(width),
                }
            }
            ItemKind::Positioned(_) => {}
            ItemKind::HardBreak => {
                best = best.max(line);
                line = 0.0;
            }
            ItemKind::Block(node) => {
                best = best.max(line).max(outer_width(cx, *node, strategy)?);
                line = 0.0;
            }
        }
    }
    Ok(best.max(line))
}
