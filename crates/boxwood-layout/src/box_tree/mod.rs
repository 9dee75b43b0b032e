//! The box tree.
//!
//! [§ 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen)
//!
//! The box tree sits between the document and layout. It holds one node per
//! element or text run that generates boxes, plus anonymous boxes created to
//! complete table structure, and pseudo-element boxes. Each element node
//! carries both its specified and computed properties.
//!
//! # Storage
//!
//! Nodes live in a slot arena addressed by [`BoxId`]. A `BoxId` carries the
//! slot's generation: removing a subtree frees its slots and bumps their
//! generation, so a stale id is rejected with [`LayoutError::StaleBox`]
//! instead of silently addressing whatever reuses the slot.

pub mod anonymous;
pub mod builder;
pub mod prepare;
pub mod whitespace;

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::num::IntErrorKind;
use std::rc::Rc;

use boxwood_dom::NodeId;
use serde::Serialize;

use crate::error::{LayoutError, Result};
use crate::style::parse::{Declaration, apply_declaration};
use crate::style::properties::{ComputedProperties, SpecifiedProperties};
use crate::style::values::PseudoElement;

/// Largest accepted `colspan` or column `span`.
pub const MAX_COLSPAN: usize = 1000;
/// Largest accepted `rowspan`.
pub const MAX_ROWSPAN: usize = 65534;

/// Generational index of a node in a [`BoxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BoxId {
    index: u32,
    generation: u32,
}

impl BoxId {
    /// Slot index, stable for the lifetime of the node.
    #[must_use]
    pub const fn index(self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for BoxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// Arbitrary data an embedder attaches to a box.
///
/// Any `'static` type that implements `Debug` qualifies.
pub trait UserData: Any + fmt::Debug {
    /// Upcast for downcasting to the concrete type.
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any + fmt::Debug> UserData for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// An element box: a real element, a pseudo-element or an anonymous box.
#[derive(Debug, Clone)]
pub struct ElementBox {
    /// Source element, `None` for anonymous boxes.
    pub node: Option<NodeId>,
    /// Set for `::before` and `::after` boxes.
    pub pseudo: Option<PseudoElement>,
    /// Lowercase tag name, empty for anonymous boxes.
    pub tag_name: String,
    /// Source attributes.
    pub attrs: HashMap<String, String>,
    /// Authored declarations in cascade order.
    pub declarations: Vec<Declaration>,
    /// [§ 6.1.1 Specified values](https://www.w3.org/TR/CSS2/cascade.html#specified-value)
    pub properties: SpecifiedProperties,
    /// [§ 6.1.2 Computed values](https://www.w3.org/TR/CSS2/cascade.html#computed-value)
    ///
    /// Shared with the layout tree, which outlives no box.
    pub computed: Rc<ComputedProperties>,
}

impl ElementBox {
    /// An element box with the given declarations applied.
    #[must_use]
    pub fn new(node: Option<NodeId>, tag_name: &str, declarations: Vec<Declaration>) -> Self {
        let mut properties = SpecifiedProperties::default();
        for declaration in &declarations {
            let _ = apply_declaration(&mut properties, declaration);
        }
        Self {
            node,
            pseudo: None,
            tag_name: tag_name.to_string(),
            attrs: HashMap::new(),
            declarations,
            properties,
            computed: Rc::new(ComputedProperties::default()),
        }
    }

    /// True for boxes generated without a source element or pseudo-element.
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.node.is_none()
    }

    /// Look up an attribute.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// [§ 3.1 Definitions](https://www.w3.org/TR/CSS2/conform.html#replaced-element)
    ///
    /// "An element whose content is outside the scope of the CSS formatting
    /// model, such as an image." Only `img` is replaced here.
    #[must_use]
    pub fn is_replaced(&self) -> bool {
        self.is_tag("img")
    }

    /// True for an element (not a pseudo-element) with this tag name, in
    /// any case.
    #[must_use]
    pub fn is_tag(&self, name: &str) -> bool {
        self.pseudo.is_none() && self.tag_name.eq_ignore_ascii_case(name)
    }

    /// A `colspan`, `rowspan` or `span` attribute, defaulting to 1.
    ///
    /// [HTML § 4.9.11 Processing model](https://html.spec.whatwg.org/multipage/tables.html#attr-tdth-colspan)
    ///
    /// "The td and th elements may also have a colspan content attribute
    /// specified, whose value must be a valid non-negative integer greater
    /// than zero and less than or equal to 1000." Rows may span at most
    /// 65534. Larger values, including ones too big to parse, are clamped.
    #[must_use]
    pub fn span_attr(&self, name: &str) -> usize {
        let limit = if name.eq_ignore_ascii_case("rowspan") {
            MAX_ROWSPAN
        } else {
            MAX_COLSPAN
        };
        let value = match self.attr(name).map(|v| v.trim().parse::<usize>()) {
            Some(Ok(value)) => value,
            Some(Err(e)) if *e.kind() == IntErrorKind::PosOverflow => limit,
            _ => 1,
        };
        value.clamp(1, limit)
    }
}

/// A text run.
#[derive(Debug, Clone)]
pub struct TextBox {
    /// Source text node, `None` for generated content.
    pub node: Option<NodeId>,
    /// The text as it appears in the document.
    pub source: String,
    /// The text after whitespace processing.
    pub text: String,
}

/// Box node kinds.
#[derive(Debug, Clone)]
pub enum BoxKind {
    /// An element, pseudo-element or anonymous box.
    Element(ElementBox),
    /// A text run, styled by its parent element.
    Text(TextBox),
}

/// One node of the box tree.
#[derive(Debug)]
pub struct BoxNode {
    /// Element or text data.
    pub kind: BoxKind,
    parent: Option<BoxId>,
    children: Vec<BoxId>,
    user_data: Option<Box<dyn UserData>>,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<BoxNode>,
}

/// Arena-backed tree of [`BoxNode`]s.
#[derive(Debug, Default)]
pub struct BoxTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: Option<BoxId>,
    by_node: HashMap<NodeId, BoxId>,
}

impl BoxTree {
    /// An empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The root box, normally generated by the document element.
    #[must_use]
    pub const fn root(&self) -> Option<BoxId> {
        self.root
    }

    /// Make a detached node the root.
    ///
    /// # Errors
    ///
    /// Fails if `id` is stale or has a parent.
    pub fn set_root(&mut self, id: BoxId) -> Result<()> {
        if self.get(id)?.parent.is_some() {
            return Err(LayoutError::NodeHasParent(id));
        }
        self.root = Some(id);
        Ok(())
    }

    /// Number of live nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.node.is_some()).count()
    }

    /// True if no node is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Allocate a detached node.
    pub fn alloc(&mut self, kind: BoxKind) -> BoxId {
        let source = match &kind {
            BoxKind::Element(e) if e.pseudo.is_none() => e.node,
            BoxKind::Text(t) => t.node,
            BoxKind::Element(_) => None,
        };
        let node = BoxNode {
            kind,
            parent: None,
            children: Vec::new(),
            user_data: None,
        };
        let id = if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            BoxId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            BoxId {
                index,
                generation: 0,
            }
        };
        if let Some(source) = source {
            let _ = self.by_node.insert(source, id);
        }
        id
    }

    /// Check that `id` addresses a live node.
    #[must_use]
    pub fn contains(&self, id: BoxId) -> bool {
        self.get(id).is_ok()
    }

    /// Borrow a node.
    ///
    /// # Errors
    ///
    /// [`LayoutError::StaleBox`] if the node was removed.
    pub fn get(&self, id: BoxId) -> Result<&BoxNode> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
            .ok_or(LayoutError::StaleBox(id))
    }

    /// Mutably borrow a node.
    ///
    /// # Errors
    ///
    /// [`LayoutError::StaleBox`] if the node was removed.
    pub fn get_mut(&mut self, id: BoxId) -> Result<&mut BoxNode> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
            .ok_or(LayoutError::StaleBox(id))
    }

    /// The box generated by a document node, if any.
    #[must_use]
    pub fn box_for_node(&self, node: NodeId) -> Option<BoxId> {
        self.by_node
            .get(&node)
            .copied()
            .filter(|&id| self.contains(id))
    }

    /// Parent of a node; `None` for the root, detached or stale nodes.
    #[must_use]
    pub fn parent(&self, id: BoxId) -> Option<BoxId> {
        self.get(id).ok().and_then(|n| n.parent)
    }

    /// Children of a node in order; empty for stale ids.
    #[must_use]
    pub fn children(&self, id: BoxId) -> &[BoxId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Element data of a node.
    #[must_use]
    pub fn element(&self, id: BoxId) -> Option<&ElementBox> {
        match &self.get(id).ok()?.kind {
            BoxKind::Element(e) => Some(e),
            BoxKind::Text(_) => None,
        }
    }

    /// Mutable element data of a node.
    pub fn element_mut(&mut self, id: BoxId) -> Option<&mut ElementBox> {
        match &mut self.get_mut(id).ok()?.kind {
            BoxKind::Element(e) => Some(e),
            BoxKind::Text(_) => None,
        }
    }

    /// Text data of a node.
    #[must_use]
    pub fn text(&self, id: BoxId) -> Option<&TextBox> {
        match &self.get(id).ok()?.kind {
            BoxKind::Text(t) => Some(t),
            BoxKind::Element(_) => None,
        }
    }

    /// Computed style of a node. Text boxes use their parent's.
    #[must_use]
    pub fn computed(&self, id: BoxId) -> Option<&Rc<ComputedProperties>> {
        match &self.get(id).ok()?.kind {
            BoxKind::Element(e) => Some(&e.computed),
            BoxKind::Text(_) => self.parent(id).and_then(|p| self.computed(p)),
        }
    }

    /// [§ 4.2.3 Append](https://dom.spec.whatwg.org/#concept-node-append)
    ///
    /// # Errors
    ///
    /// - [`LayoutError::StaleBox`] if either id is stale;
    /// - [`LayoutError::NodeHasParent`] if `child` is attached or is the root;
    /// - [`LayoutError::WouldCycle`] if `child` is an ancestor of `parent`.
    pub fn append_child(&mut self, parent: BoxId, child: BoxId) -> Result<()> {
        self.check_insertable(parent, child)?;
        self.get_mut(parent)?.children.push(child);
        self.get_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// [§ 4.2.3 Pre-insert](https://dom.spec.whatwg.org/#concept-node-pre-insert)
    ///
    /// # Errors
    ///
    /// As [`append_child`](Self::append_child), plus
    /// [`LayoutError::NotAChild`] if `reference` is not a child of `parent`.
    pub fn insert_before(&mut self, parent: BoxId, child: BoxId, reference: BoxId) -> Result<()> {
        self.check_insertable(parent, child)?;
        let index = self.index_in_parent(parent, reference)?;
        self.get_mut(parent)?.children.insert(index, child);
        self.get_mut(child)?.parent = Some(parent);
        Ok(())
    }

    fn check_insertable(&self, parent: BoxId, child: BoxId) -> Result<()> {
        let _ = self.get(parent)?;
        if self.get(child)?.parent.is_some() || self.root == Some(child) {
            return Err(LayoutError::NodeHasParent(child));
        }
        let mut cursor = Some(parent);
        while let Some(id) = cursor {
            if id == child {
                return Err(LayoutError::WouldCycle { parent, child });
            }
            cursor = self.parent(id);
        }
        Ok(())
    }

    fn index_in_parent(&self, parent: BoxId, child: BoxId) -> Result<usize> {
        let _ = self.get(child)?;
        self.get(parent)?
            .children
            .iter()
            .position(|&c| c == child)
            .ok_or(LayoutError::NotAChild { parent, child })
    }

    /// Detach a node from its parent, keeping its subtree alive.
    ///
    /// # Errors
    ///
    /// [`LayoutError::StaleBox`] if `id` is stale.
    pub fn detach(&mut self, id: BoxId) -> Result<()> {
        if let Some(parent) = self.get(id)?.parent {
            let index = self.index_in_parent(parent, id)?;
            let _ = self.get_mut(parent)?.children.remove(index);
            self.get_mut(id)?.parent = None;
        }
        if self.root == Some(id) {
            self.root = None;
        }
        Ok(())
    }

    /// Remove a node and destroy its whole subtree.
    ///
    /// Every id in the subtree becomes stale.
    ///
    /// # Errors
    ///
    /// [`LayoutError::StaleBox`] if `id` is stale.
    pub fn remove(&mut self, id: BoxId) -> Result<()> {
        self.detach(id)?;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let slot = &mut self.slots[current.index()];
            let Some(node) = slot.node.take() else {
                continue;
            };
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(current.index);
            stack.extend(node.children);
            let source = match node.kind {
                BoxKind::Element(e) if e.pseudo.is_none() => e.node,
                BoxKind::Text(t) => t.node,
                BoxKind::Element(_) => None,
            };
            if let Some(source) = source
                && self.by_node.get(&source) == Some(&current)
            {
                let _ = self.by_node.remove(&source);
            }
        }
        Ok(())
    }

    /// Replace an element's authored declarations and re-derive its
    /// specified properties. Computed values update on the next `prepare`.
    ///
    /// # Errors
    ///
    /// [`LayoutError::StaleBox`] if `id` is stale. Text boxes ignore the call.
    pub fn apply_properties(&mut self, id: BoxId, declarations: &[Declaration]) -> Result<()> {
        if let BoxKind::Element(element) = &mut self.get_mut(id)?.kind {
            let mut properties = SpecifiedProperties::default();
            for declaration in declarations {
                let _ = apply_declaration(&mut properties, declaration);
            }
            element.properties = properties;
            element.declarations = declarations.to_vec();
        }
        Ok(())
    }

    /// Attach user data to a node, returning what was there before.
    ///
    /// # Errors
    ///
    /// [`LayoutError::StaleBox`] if `id` is stale.
    pub fn set_user_data(
        &mut self,
        id: BoxId,
        data: Box<dyn UserData>,
    ) -> Result<Option<Box<dyn UserData>>> {
        Ok(self.get_mut(id)?.user_data.replace(data))
    }

    /// Borrow a node's user data as `T`.
    #[must_use]
    pub fn user_data<T: Any>(&self, id: BoxId) -> Option<&T> {
        let data = self.get(id).ok()?.user_data.as_deref()?;
        data.as_any().downcast_ref::<T>()
    }

    /// Remove and return a node's user data.
    ///
    /// # Errors
    ///
    /// [`LayoutError::StaleBox`] if `id` is stale.
    pub fn take_user_data(&mut self, id: BoxId) -> Result<Option<Box<dyn UserData>>> {
        Ok(self.get_mut(id)?.user_data.take())
    }

    /// Pre-order traversal of the subtree at `id`.
    #[must_use]
    pub fn descendants(&self, id: BoxId) -> Descendants<'_> {
        Descendants {
            tree: self,
            stack: if self.contains(id) { vec![id] } else { Vec::new() },
        }
    }

    /// Pre-order traversal of the whole tree.
    #[must_use]
    pub fn iter(&self) -> Descendants<'_> {
        Descendants {
            tree: self,
            stack: self.root.into_iter().collect(),
        }
    }

    /// Number of ancestors of `id`.
    #[must_use]
    pub fn depth(&self, id: BoxId) -> usize {
        std::iter::successors(self.parent(id), |&p| self.parent(p)).count()
    }
}

/// Pre-order iterator over a subtree.
pub struct Descendants<'a> {
    tree: &'a BoxTree,
    stack: Vec<BoxId>,
}

impl Iterator for Descendants<'_> {
    type Item = BoxId;

    fn next(&mut self) -> Option<BoxId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
