//! Hit testing: which box, and which character, lies under a point.
//!
//! Layers are searched front to back, the reverse of paint order. Inside a
//! layer, inline content is painted last, so text and inline boxes are tried
//! before the boxes of the layer's block-level descendants.

use serde::Serialize;

use crate::box_tree::BoxId;
use crate::layout::box_model::Point;
use crate::layout::inline::line::{Fragment, FragmentKind};
use crate::layout::stacking::{PaintStep, StackingId, paint_order};
use crate::layout::tree::{LayoutId, LayoutKind, LayoutTree};
use crate::paint::painter::char_prefix;
use crate::paint::surface::Surface;
use crate::resources::{FontHandle, ResourceCache};

/// Where the point fell relative to the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HitZone {
    /// On a box or a piece of text.
    Inside,
    /// Above the first line of text.
    OutsideTop,
    /// Left of a line of text.
    OutsideLeft,
    /// Right of a line of text.
    OutsideRight,
    /// Below the last line of text.
    OutsideBottom,
    /// Nothing was laid out.
    NoObjects,
}

/// Result of [`hit_test`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HitResult {
    /// The box hit, or the text box nearest to the point.
    pub node: Option<BoxId>,
    /// Character offset in `node` for text boxes, otherwise 0.
    pub text_offset: usize,
    /// Relation of the point to the content.
    pub zone: HitZone,
}

impl HitResult {
    const fn nothing() -> Self {
        Self {
            node: None,
            text_offset: 0,
            zone: HitZone::NoObjects,
        }
    }
}

/// Find what lies under `point`.
pub fn hit_test(
    tree: &LayoutTree,
    surface: &mut dyn Surface,
    resources: &mut dyn ResourceCache,
    point: Point,
) -> HitResult {
    let Some(root) = tree.root() else {
        return HitResult::nothing();
    };

    // STEP 1: Front to back through the layers.
    let steps = paint_order(tree.stacking_contexts(), StackingId(0));
    for step in steps.iter().rev() {
        let owner = match *step {
            PaintStep::Layer(context) => tree.stacking_context(context).owner,
            PaintStep::Positioned(node) => node,
        };
        let members = layer_members(tree, owner);
        if let Some(hit) = hit_inline(tree, surface, resources, &members, point) {
            return hit;
        }
        for &id in members.iter().rev() {
            let node = &tree[id];
            if !matches!(node.kind, LayoutKind::Inline) && node.border_box().contains(point) {
                return HitResult {
                    node: Some(node.box_id),
                    text_offset: 0,
                    zone: HitZone::Inside,
                };
            }
        }
    }

    // STEP 2: Nothing under the point: snap to the nearest text.
    let fragments: Vec<&Fragment> = tree
        .descendants(root)
        .into_iter()
        .filter_map(|id| tree[id].inline_content.as_ref())
        .flat_map(|content| content.lines.iter().flat_map(|line| line.fragments.iter()))
        .filter(|f| matches!(f.kind, FragmentKind::Text { .. }))
        .collect();
    nearest_text(&fragments, point)
}

/// The nodes painted by the layer of `owner`: its subtree without the
/// subtrees of other positioned boxes.
fn layer_members(tree: &LayoutTree, owner: LayoutId) -> Vec<LayoutId> {
    let mut out = Vec::new();
    let mut stack = vec![owner];
    while let Some(id) = stack.pop() {
        out.push(id);
        stack.extend(
            tree[id]
                .children
                .iter()
                .rev()
                .copied()
                .filter(|&c| !tree[c].is_positioned()),
        );
    }
    out
}

fn hit_inline(
    tree: &LayoutTree,
    surface: &mut dyn Surface,
    resources: &mut dyn ResourceCache,
    members: &[LayoutId],
    point: Point,
) -> Option<HitResult> {
    for &id in members.iter().rev() {
        let Some(content) = &tree[id].inline_content else {
            continue;
        };
        for line in content.lines.iter().rev() {
            for fragment in line.fragments.iter().rev() {
                if !fragment.rect.contains(point) {
                    continue;
                }
                match &fragment.kind {
                    FragmentKind::Text {
                        box_id,
                        parent,
                        text,
                        start,
                        ..
                    } => {
                        let font = resources.get_font(&tree[*parent].style);
                        let offset = offset_at(surface, &font, text, point.x - fragment.rect.x);
                        return Some(HitResult {
                            node: Some(*box_id),
                            text_offset: start + offset,
                            zone: HitZone::Inside,
                        });
                    }
                    FragmentKind::InlineBox { node, .. } | FragmentKind::Atomic { node } => {
                        if tree[*node].is_positioned() {
                            continue;
                        }
                        return Some(HitResult {
                            node: Some(tree[*node].box_id),
                            text_offset: 0,
                            zone: HitZone::Inside,
                        });
                    }
                }
            }
        }
    }
    None
}

/// Number of characters of `text` whose midpoint lies left of `x`.
fn offset_at(surface: &mut dyn Surface, font: &FontHandle, text: &str, x: f32) -> usize {
    let count = text.chars().count();
    let mut previous = 0.0;
    for n in 1..=count {
        let width = surface.get_text_size(font, char_prefix(text, n)).width;
        if x < (previous + width) / 2.0 {
            return n - 1;
        }
        previous = width;
    }
    count
}

fn snap(fragment: &Fragment, at_end: bool, zone: HitZone) -> HitResult {
    match fragment.text_range() {
        Some((node, start, end)) => HitResult {
            node: Some(node),
            text_offset: if at_end { end } else { start },
            zone,
        },
        None => HitResult::nothing(),
    }
}

fn nearest_text(fragments: &[&Fragment], point: Point) -> HitResult {
    let (Some(&first), Some(&last)) = (fragments.first(), fragments.last()) else {
        return HitResult::nothing();
    };
    if point.y < first.rect.y {
        return snap(first, false, HitZone::OutsideTop);
    }
    let bottom = fragments.iter().map(|f| f.rect.bottom()).fold(f32::MIN, f32::max);
    if point.y >= bottom {
        return snap(last, true, HitZone::OutsideBottom);
    }

    // Fragments on the point's row; between rows, the first fragment below.
    let row: Vec<&Fragment> = fragments
        .iter()
        .copied()
        .filter(|f| point.y >= f.rect.y && point.y < f.rect.bottom())
        .collect();
    let Some(&leftmost) = row.iter().min_by(|a, b| a.rect.x.total_cmp(&b.rect.x)) else {
        let below = fragments.iter().copied().find(|f| f.rect.y > point.y).unwrap_or(last);
        return snap(below, false, HitZone::OutsideTop);
    };
    if point.x < leftmost.rect.x {
        return snap(leftmost, false, HitZone::OutsideLeft);
    }
    // Right of the line, or in a gap: the closest fragment ending before x.
    let before = row
        .iter()
        .copied()
        .filter(|f| f.rect.right() <= point.x)
        .max_by(|a, b| a.rect.right().total_cmp(&b.rect.right()))
        .unwrap_or(leftmost);
    snap(before, true, HitZone::OutsideRight)
}
