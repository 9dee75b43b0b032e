//! The layout engine.
//!
//! [§ 9 Visual formatting model](https://www.w3.org/TR/CSS2/visuren.html)
//! [§ 10 Visual formatting model details](https://www.w3.org/TR/CSS2/visudet.html)
//!
//! Layout runs in three passes over a freshly built [`LayoutTree`]:
//!
//! 1. normal flow from the root, which records the static position of every
//!    absolutely positioned box and skips it;
//! 2. relative offsets, which shift whole subtrees;
//! 3. absolutely and fixed positioned boxes, top-down, against their
//!    finished containing blocks.

pub mod block;
pub mod box_model;
pub mod formatting_context;
pub mod inline;
pub mod intrinsic;
pub mod positioned;
pub mod replaced;
pub mod sizing;
pub mod stacking;
pub mod table;
pub mod tree;

use std::collections::HashMap;

use crate::box_tree::BoxTree;
use crate::config::LayoutConfig;
use crate::error::Result;
use crate::paint::surface::Surface;
use crate::resources::{FontMetrics, ResourceCache};
use crate::style::properties::ComputedProperties;

use box_model::{Rect, Size};
use intrinsic::Strategy;
use tree::{LayoutId, LayoutTree};

/// Everything a layout pass needs, threaded through the algorithms.
pub(crate) struct LayoutContext<'a> {
    pub(crate) boxes: &'a BoxTree,
    pub(crate) tree: LayoutTree,
    pub(crate) surface: &'a mut dyn Surface,
    pub(crate) resources: &'a mut dyn ResourceCache,
    pub(crate) intrinsic_cache: HashMap<(LayoutId, Strategy), f32>,
}

impl LayoutContext<'_> {
    /// Advance width of `text` in the font of `style`.
    pub(crate) fn text_width(&mut self, style: &ComputedProperties, text: &str) -> f32 {
        if text.is_empty() {
            return 0.0;
        }
        let font = self.resources.get_font(style);
        self.surface.get_text_size(&font, text).width
    }

    /// Vertical metrics of the font of `style`.
    pub(crate) fn metrics(&mut self, style: &ComputedProperties) -> FontMetrics {
        let font = self.resources.get_font(style);
        self.resources.get_font_metrics(&font)
    }
}

/// Lay out a prepared box tree for a viewport.
///
/// # Errors
///
/// - [`LayoutError::DocumentTooDeep`](crate::LayoutError::DocumentTooDeep)
///   if the tree nests deeper than `config.max_depth`;
/// - [`LayoutError::StaleBox`](crate::LayoutError::StaleBox) on a corrupt
///   box tree.
pub fn layout_document(
    boxes: &BoxTree,
    surface: &mut dyn Surface,
    resources: &mut dyn ResourceCache,
    viewport: Size,
    config: &LayoutConfig,
) -> Result<LayoutTree> {
    let tree = LayoutTree::build(boxes, viewport, config.max_depth)?;
    let mut cx = LayoutContext {
        boxes,
        tree,
        surface,
        resources,
        intrinsic_cache: HashMap::new(),
    };
    let Some(root) = cx.tree.root() else {
        return Ok(cx.tree);
    };

    #[cfg(feature = "layout-trace")]
    log::trace!(target: "boxwood::layout", "layout {} nodes in {viewport:?}", cx.tree.len());

    replaced::load_images(&mut cx);

    // STEP 1: Normal flow.
    // [§ 10.1 Definition of "containing block"](https://www.w3.org/TR/CSS2/visudet.html#containing-block-details)
    //
    // "The containing block in which the root element lives is a rectangle
    // called the initial containing block. For continuous media, it has the
    // dimensions of the viewport and is anchored at the canvas origin."
    let initial = Rect::new(0.0, 0.0, viewport.width, viewport.height);
    block::layout_root(&mut cx, root, initial)?;

    // STEP 2: Relative offsets.
    positioned::apply_relative_offsets(&mut cx, root);

    // STEP 3: Absolute and fixed boxes.
    positioned::layout_absolute_and_fixed_content(&mut cx, initial)?;

    log::debug!(
        "laid out {} nodes, document height {}",
        cx.tree.len(),
        cx.tree[root].margin_box().bottom()
    );
    Ok(cx.tree)
}
