//! Document tree consumed by the Boxwood layout engine.
//!
//! The layout engine reads the document once, while building its box tree:
//! node kind, tag name, attributes and ordered children. This crate provides
//! an arena-based tree following the
//! [DOM Living Standard](https://dom.spec.whatwg.org/) closely enough for that.
//!
//! # Design
//!
//! All nodes live in one vector and refer to each other through [`NodeId`]
//! indices. Sibling navigation is answered from the parent's child list, so
//! insertion and removal only touch two vectors.

use std::collections::HashMap;

/// Map of attribute names to values for an element.
pub type AttributesMap = HashMap<String, String>;

/// A type-safe index into the document tree.
///
/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root document node is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Node is an abstract interface that is used by all nodes in a tree."
#[derive(Debug, Clone)]
pub struct Node {
    /// "Each node has an associated node type"
    pub node_type: NodeType,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-parent)
    /// "An object that participates in a tree has a parent, which is either
    /// null or an object."
    pub parent: Option<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-child)
    /// "A node has an associated list of children"
    pub children: Vec<NodeId>,
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Each node has an associated node type"
#[derive(Debug, Clone)]
pub enum NodeType {
    /// The document node at [`NodeId::ROOT`].
    Document,
    /// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
    Element(ElementData),
    /// [§ 4.10 Interface Text](https://dom.spec.whatwg.org/#interface-text)
    Text(String),
    /// [§ 4.7 Interface Comment](https://dom.spec.whatwg.org/#interface-comment)
    ///
    /// Comments never generate boxes.
    Comment(String),
}

/// Element-specific data: the local name and the attribute list.
#[derive(Debug, Clone, Default)]
pub struct ElementData {
    /// "An element's local name", stored lowercase.
    pub tag_name: String,
    /// "An element has an associated attribute list"
    pub attrs: AttributesMap,
}

impl ElementData {
    /// Create element data with a lowercase tag name and no attributes.
    #[must_use]
    pub fn new(tag_name: &str) -> Self {
        Self {
            tag_name: tag_name.to_ascii_lowercase(),
            attrs: AttributesMap::new(),
        }
    }

    /// Look up an attribute value by name.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Returns the element's id attribute value if present.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }
}

/// Errors reported by tree mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeError {
    /// The node being inserted already has a parent.
    AlreadyHasParent(NodeId),
    /// The reference node is not a child of the target parent.
    NotAChild {
        /// Target parent.
        parent: NodeId,
        /// Offending reference node.
        child: NodeId,
    },
}

impl std::fmt::Display for TreeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyHasParent(id) => write!(f, "node {} already has a parent", id.0),
            Self::NotAChild { parent, child } => {
                write!(f, "node {} is not a child of node {}", child.0, parent.0)
            }
        }
    }
}

impl std::error::Error for TreeError {}

/// Arena-based document tree.
///
/// [§ 4 Nodes](https://dom.spec.whatwg.org/#nodes)
///
/// "The DOM represents a document as a tree."
#[derive(Debug, Clone)]
pub struct DomTree {
    /// The Document node is always at index 0 ([`NodeId::ROOT`]).
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a new tree holding just the Document node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                node_type: NodeType::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Get the root document node ID.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Number of allocated nodes, attached or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the Document node is allocated on construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a detached node and return its ID.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            node_type,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// [§ 4.2.3 Append](https://dom.spec.whatwg.org/#concept-node-append)
    ///
    /// Appends `child` as the last child of `parent`.
    ///
    /// # Errors
    ///
    /// Fails if `child` is already attached somewhere.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        if self.nodes[child.0].parent.is_some() {
            return Err(TreeError::AlreadyHasParent(child));
        }
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
        Ok(())
    }

    /// [§ 4.2.3 Pre-insert](https://dom.spec.whatwg.org/#concept-node-pre-insert)
    ///
    /// Inserts `child` into `parent` immediately before `reference`.
    ///
    /// # Errors
    ///
    /// "If child is non-null and its parent is not parent, then throw a
    /// 'NotFoundError' DOMException." A `child` that already has a parent is
    /// rejected as well.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: NodeId,
    ) -> Result<(), TreeError> {
        if self.nodes[child.0].parent.is_some() {
            return Err(TreeError::AlreadyHasParent(child));
        }
        let index = self.index_in_parent(parent, reference)?;
        self.nodes[parent.0].children.insert(index, child);
        self.nodes[child.0].parent = Some(parent);
        Ok(())
    }

    /// [§ 4.2.3 Remove](https://dom.spec.whatwg.org/#concept-node-remove)
    ///
    /// Detaches `child` from `parent`. The node keeps its own subtree and can
    /// be re-inserted elsewhere.
    ///
    /// # Errors
    ///
    /// Fails if `child` is not a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        let index = self.index_in_parent(parent, child)?;
        let _ = self.nodes[parent.0].children.remove(index);
        self.nodes[child.0].parent = None;
        Ok(())
    }

    fn index_in_parent(&self, parent: NodeId, child: NodeId) -> Result<usize, TreeError> {
        self.nodes[parent.0]
            .children
            .iter()
            .position(|&c| c == child)
            .ok_or(TreeError::NotAChild { parent, child })
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Get the first child of a node.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    /// Get the last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).last().copied()
    }

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-next-sibling)
    /// "An object A's next sibling is the object immediately following A
    /// in the children of A's parent."
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.children(self.parent(id)?);
        let index = siblings.iter().position(|&c| c == id)?;
        siblings.get(index + 1).copied()
    }

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-previous-sibling)
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.children(self.parent(id)?);
        let index = siblings.iter().position(|&c| c == id)?;
        index.checked_sub(1).map(|i| siblings[i])
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Get element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get text content if this node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// [§ 3.1.1 The document element](https://html.spec.whatwg.org/multipage/dom.html#the-html-element-2)
    ///
    /// "The document element of a document is the element whose parent is that
    /// document, if it exists; otherwise null."
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(NodeId::ROOT)
            .iter()
            .copied()
            .find(|&id| self.as_element(id).is_some())
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Incremental document construction for tests and tools.
///
/// ```
/// use boxwood_dom::DomBuilder;
///
/// let tree = DomBuilder::new()
///     .open("div", &[("style", "width: 200px")])
///     .text("hello")
///     .close()
///     .finish();
/// assert_eq!(tree.as_element(tree.document_element().unwrap()).unwrap().tag_name, "div");
/// ```
#[derive(Debug)]
pub struct DomBuilder {
    tree: DomTree,
    open: Vec<NodeId>,
}

impl DomBuilder {
    /// Start a document with nothing but the Document node open.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: DomTree::new(),
            open: vec![NodeId::ROOT],
        }
    }

    fn current(&self) -> NodeId {
        self.open.last().copied().unwrap_or(NodeId::ROOT)
    }

    fn attach(&mut self, node_type: NodeType) -> NodeId {
        let parent = self.current();
        let id = self.tree.alloc(node_type);
        self.tree.nodes[parent.0].children.push(id);
        self.tree.nodes[id.0].parent = Some(parent);
        id
    }

    /// Open an element; following calls add children to it until [`close`](Self::close).
    #[must_use]
    pub fn open(mut self, tag: &str, attrs: &[(&str, &str)]) -> Self {
        let mut data = ElementData::new(tag);
        for (name, value) in attrs {
            let _ = data.attrs.insert((*name).to_string(), (*value).to_string());
        }
        let id = self.attach(NodeType::Element(data));
        self.open.push(id);
        self
    }

    /// Add an element with no children.
    #[must_use]
    pub fn leaf(self, tag: &str, attrs: &[(&str, &str)]) -> Self {
        self.open(tag, attrs).close()
    }

    /// Add a text node to the open element.
    #[must_use]
    pub fn text(mut self, text: &str) -> Self {
        let _ = self.attach(NodeType::Text(text.to_string()));
        self
    }

    /// Add a comment node to the open element.
    #[must_use]
    pub fn comment(mut self, text: &str) -> Self {
        let _ = self.attach(NodeType::Comment(text.to_string()));
        self
    }

    /// Close the innermost open element. Closing the Document is a no-op.
    #[must_use]
    pub fn close(mut self) -> Self {
        if self.open.len() > 1 {
            let _ = self.open.pop();
        }
        self
    }

    /// The node most recently opened and not yet closed.
    #[must_use]
    pub fn current_node(&self) -> NodeId {
        self.current()
    }

    /// Finish building, implicitly closing every open element.
    #[must_use]
    pub fn finish(self) -> DomTree {
        self.tree
    }
}

impl Default for DomBuilder {
    fn default() -> Self {
        Self::new()
    }
}
