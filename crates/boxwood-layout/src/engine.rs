//! The public layout API.
//!
//! A [`LayoutEngine`] owns a box tree built from a document and the result
//! of its most recent layout. The operations follow the life cycle of a
//! document view:
//!
//! 1. [`create`](LayoutEngine::create) builds boxes from the document;
//! 2. [`prepare`](LayoutEngine::prepare) computes styles and completes the
//!    box tree;
//! 3. [`layout`](LayoutEngine::layout) positions everything for a viewport;
//! 4. [`render`](LayoutEngine::render), [`hit_test`](LayoutEngine::hit_test)
//!    and the geometry queries read the finished layout.
//!
//! ```
//! use boxwood_dom::DomBuilder;
//! use boxwood_layout::{ApproximateResources, LayoutConfig, LayoutEngine, RecordingSurface, Size};
//! use boxwood_layout::style::cascade::InlineStyleCascade;
//!
//! let dom = DomBuilder::new()
//!     .open("div", &[("style", "width: 100px; height: 20px; background-color: red")])
//!     .close()
//!     .finish();
//! let mut engine = LayoutEngine::create(&dom, &InlineStyleCascade::new(), LayoutConfig::default()).unwrap();
//! let mut resources = ApproximateResources::new();
//! let mut surface = RecordingSurface::new();
//! engine.prepare(&mut resources).unwrap();
//! engine.layout(&mut surface, &mut resources, Size::new(800.0, 600.0)).unwrap();
//! engine.render(&mut surface, &mut resources).unwrap();
//! assert!(!surface.display_list().is_empty());
//! ```

use boxwood_dom::{DomTree, NodeId};

use crate::box_tree::builder::build_box_tree;
use crate::box_tree::prepare::prepare;
use crate::box_tree::{BoxId, BoxTree};
use crate::config::LayoutConfig;
use crate::error::{LayoutError, Result};
use crate::hit_test::{self, HitResult};
use crate::layout::box_model::{Point, Rect, Size};
use crate::layout::layout_document;
use crate::layout::stacking::{PaintStep, StackingId, paint_order};
use crate::layout::tree::LayoutTree;
use crate::paint::painter::Painter;
use crate::paint::surface::Surface;
use crate::resources::ResourceCache;
use crate::selection::{Selection, TextPosition};
use crate::style::cascade::Cascade;

/// A document's boxes and their layout.
#[derive(Debug)]
pub struct LayoutEngine {
    config: LayoutConfig,
    boxes: BoxTree,
    prepared: bool,
    layout: Option<LayoutTree>,
    selection: Option<Selection>,
}

impl LayoutEngine {
    /// Build the box tree for `dom` with declarations from `cascade`.
    ///
    /// # Errors
    ///
    /// [`LayoutError::DocumentTooDeep`] if the document nests deeper than
    /// `config.max_depth`.
    pub fn create(dom: &DomTree, cascade: &dyn Cascade, config: LayoutConfig) -> Result<Self> {
        let boxes = build_box_tree(dom, cascade, &config)?;
        log::debug!("created box tree with {} boxes", boxes.len());
        Ok(Self {
            config,
            boxes,
            prepared: false,
            layout: None,
            selection: None,
        })
    }

    /// Compute styles, process whitespace and complete table structure.
    ///
    /// # Errors
    ///
    /// Propagates errors from the preparation passes.
    pub fn prepare(&mut self, resources: &mut dyn ResourceCache) -> Result<()> {
        prepare(&mut self.boxes, resources, &self.config)?;
        self.prepared = true;
        self.layout = None;
        Ok(())
    }

    /// Lay the document out for a viewport, preparing it first if needed.
    ///
    /// On error the previous layout is discarded.
    ///
    /// # Errors
    ///
    /// - [`LayoutError::DocumentTooDeep`] if the tree nests too deeply;
    /// - errors from [`prepare`](Self::prepare).
    pub fn layout(
        &mut self,
        surface: &mut dyn Surface,
        resources: &mut dyn ResourceCache,
        viewport: Size,
    ) -> Result<()> {
        if !self.prepared {
            self.prepare(resources)?;
        }
        self.layout = None;
        let tree = layout_document(&self.boxes, surface, resources, viewport, &self.config)?;
        self.layout = Some(tree);
        Ok(())
    }

    /// Paint the last layout onto `surface`.
    ///
    /// # Errors
    ///
    /// [`LayoutError::NotLaidOut`] if [`layout`](Self::layout) has not
    /// succeeded since the tree last changed.
    pub fn render(&self, surface: &mut dyn Surface, resources: &mut dyn ResourceCache) -> Result<()> {
        let tree = self.layout_tree().ok_or(LayoutError::NotLaidOut)?;
        let mut painter = Painter::new(tree, resources);
        if let Some(selection) = &self.selection {
            painter = painter.with_selection(selection, self.config.selection_color);
        }
        painter.paint(surface);
        Ok(())
    }

    /// Find the box and character under `point`.
    ///
    /// # Errors
    ///
    /// [`LayoutError::NotLaidOut`] if there is no layout.
    pub fn hit_test(
        &self,
        surface: &mut dyn Surface,
        resources: &mut dyn ResourceCache,
        point: Point,
    ) -> Result<HitResult> {
        let tree = self.layout_tree().ok_or(LayoutError::NotLaidOut)?;
        Ok(hit_test::hit_test(tree, surface, resources, point))
    }

    /// Content box of the box generated by a document element, in page
    /// coordinates. `None` before layout or for elements without a box.
    #[must_use]
    pub fn get_content_box(&self, element: NodeId) -> Option<Rect> {
        let tree = self.layout_tree()?;
        let id = tree.node_for_box(self.boxes.box_for_node(element)?)?;
        Some(tree[id].content_box)
    }

    /// Select the text between two positions, in either order.
    ///
    /// # Errors
    ///
    /// [`LayoutError::StaleBox`] if an endpoint is not in the box tree.
    pub fn set_selection(
        &mut self,
        start_node: BoxId,
        start_offset: usize,
        end_node: BoxId,
        end_offset: usize,
    ) -> Result<()> {
        self.selection = Some(Selection::new(
            &self.boxes,
            TextPosition::new(start_node, start_offset),
            TextPosition::new(end_node, end_offset),
        )?);
        Ok(())
    }

    /// Drop the selection.
    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// The current selection.
    #[must_use]
    pub const fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// The box tree.
    #[must_use]
    pub const fn boxes(&self) -> &BoxTree {
        &self.boxes
    }

    /// Mutable access to the box tree. The layout and the selection are
    /// discarded and the tree must be prepared again.
    pub fn boxes_mut(&mut self) -> &mut BoxTree {
        self.prepared = false;
        self.layout = None;
        self.selection = None;
        &mut self.boxes
    }

    /// The box generated by a document node.
    #[must_use]
    pub fn box_for_node(&self, node: NodeId) -> Option<BoxId> {
        self.boxes.box_for_node(node)
    }

    /// The finished layout, if any.
    #[must_use]
    pub const fn layout_tree(&self) -> Option<&LayoutTree> {
        self.layout.as_ref()
    }

    /// [Appendix E.2](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
    ///
    /// Back-to-front paint steps of the last layout.
    ///
    /// # Errors
    ///
    /// [`LayoutError::NotLaidOut`] if there is no layout.
    pub fn stacking_order(&self) -> Result<Vec<PaintStep>> {
        let tree = self.layout_tree().ok_or(LayoutError::NotLaidOut)?;
        if tree.stacking_contexts().is_empty() {
            return Ok(Vec::new());
        }
        Ok(paint_order(tree.stacking_contexts(), StackingId(0)))
    }

    /// The configuration the engine was created with.
    #[must_use]
    pub const fn config(&self) -> &LayoutConfig {
        &self.config
    }
}
