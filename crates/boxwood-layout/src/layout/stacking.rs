//! Stacking contexts and paint order.
//!
//! [§ 9.9 Layered presentation](https://www.w3.org/TR/CSS2/visuren.html#layers)
//!
//! "An element in CSS 2 may have a stack level, which describes its position
//! within a set of elements sharing the same stacking context."
//!
//! [CSS 2.1 Appendix E: Elaborate description of Stacking Contexts](https://www.w3.org/TR/CSS2/zindex.html)

use serde::Serialize;

use super::tree::LayoutId;

/// Index of a [`StackingContext`] in a layout tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct StackingId(pub(crate) usize);

/// [§ 9.9.1 Specifying the stack level: the 'z-index' property](https://www.w3.org/TR/CSS2/visuren.html#z-index)
///
/// "Each box belongs to one stacking context. Each positioned box in a given
/// stacking context has an integer stack level, which is its position on the
/// z-axis relative to other stack levels within the same stacking context."
#[derive(Debug, Clone, Serialize)]
pub struct StackingContext {
    /// The box that establishes the context.
    pub owner: LayoutId,
    /// Resolved `z-index`; 0 for the root.
    pub level: i32,
    /// Document order among contexts and positioned boxes, assigned when the
    /// layout tree is built.
    pub tree_order: usize,
    /// The enclosing context.
    pub parent: Option<StackingId>,
    /// Child contexts, sorted by `(level, tree_order)` once the tree is built.
    pub children: Vec<StackingId>,
    /// Positioned descendants with `z-index: auto`, painted at level 0 in
    /// tree order. Each entry carries its tree order.
    pub positioned: Vec<(usize, LayoutId)>,
}

impl StackingContext {
    /// A context with no children.
    #[must_use]
    pub const fn new(owner: LayoutId, level: i32, tree_order: usize, parent: Option<StackingId>) -> Self {
        Self {
            owner,
            level,
            tree_order,
            parent,
            children: Vec::new(),
            positioned: Vec::new(),
        }
    }

    /// Sort key for siblings: stack level, then document order.
    #[must_use]
    pub const fn sort_key(&self) -> (i32, usize) {
        (self.level, self.tree_order)
    }
}

/// Sort every context's children by [`StackingContext::sort_key`].
///
/// The key is a total order over siblings (tree orders are unique), so
/// sorting twice gives the same result.
pub fn sort_children(contexts: &mut [StackingContext]) {
    for index in 0..contexts.len() {
        let mut children = std::mem::take(&mut contexts[index].children);
        children.sort_by_key(|&StackingId(c)| contexts[c].sort_key());
        contexts[index].children = children;
    }
}

/// One entry of the paint order of a stacking context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PaintStep {
    /// Paint the context owner's own layer.
    Layer(StackingId),
    /// Paint a positioned `z-index: auto` box as if it were a context.
    Positioned(LayoutId),
}

/// [Appendix E.2 Painting order](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
///
/// Back-to-front paint steps for the context `root` and everything inside it:
///
/// 1. "the child stacking contexts with negative stack levels (most negative
///    first)";
/// 2. the context's own layer;
/// 3. "all positioned descendants with 'z-index: auto' or 'z-index: 0', in
///    tree order";
/// 4. "the child stacking contexts with positive stack levels (least
///    positive first)".
#[must_use]
pub fn paint_order(contexts: &[StackingContext], root: StackingId) -> Vec<PaintStep> {
    let mut steps = Vec::new();
    collect(contexts, root, &mut steps);
    steps
}

fn collect(contexts: &[StackingContext], id: StackingId, steps: &mut Vec<PaintStep>) {
    let context = &contexts[id.0];
    let (negative, rest): (Vec<StackingId>, Vec<StackingId>) = context
        .children
        .iter()
        .partition(|c| contexts[c.0].level < 0);

    for child in negative {
        collect(contexts, child, steps);
    }
    steps.push(PaintStep::Layer(id));

    // Level 0: z-index:auto boxes and z-index:0 contexts interleave by tree order.
    let (zero, positive): (Vec<StackingId>, Vec<StackingId>) =
        rest.into_iter().partition(|c| contexts[c.0].level == 0);
    let mut level_zero: Vec<(usize, Option<StackingId>, Option<LayoutId>)> = zero
        .into_iter()
        .map(|c| (contexts[c.0].tree_order, Some(c), None))
        .chain(context.positioned.iter().map(|&(order, node)| (order, None, Some(node))))
        .collect();
    level_zero.sort_by_key(|entry| entry.0);
    for (_, child, node) in level_zero {
        match (child, node) {
            (Some(child), _) => collect(contexts, child, steps),
            (None, Some(node)) => steps.push(PaintStep::Positioned(node)),
            (None, None) => {}
        }
    }

    for child in positive {
        collect(contexts, child, steps);
    }
}
