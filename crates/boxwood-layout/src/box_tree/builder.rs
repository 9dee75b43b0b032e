//! Box generation from the document tree.
//!
//! [§ 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen)

use boxwood_dom::{DomTree, NodeId, NodeType};

use crate::config::LayoutConfig;
use crate::error::{LayoutError, Result};
use crate::style::cascade::Cascade;
use crate::style::properties::{Specified, SpecifiedProperties};
use crate::style::values::{Display, PseudoElement};

use super::{BoxId, BoxKind, BoxTree, ElementBox, TextBox};

enum Work {
    /// Generate boxes for a document node under `parent`.
    Node {
        node: NodeId,
        parent: Option<BoxId>,
        parent_display: Display,
        depth: usize,
    },
    /// Append the `::after` box once all children are in place.
    After { node: NodeId, owner: BoxId },
}

/// Build a box tree for the document element of `dom`.
///
/// - Comments generate nothing.
/// - [§ 9.2.4](https://www.w3.org/TR/CSS2/visuren.html#display-prop)
///   "none: This value causes an element to not appear in the formatting
///   structure (i.e., in visual media the element generates no boxes and has
///   no effect on layout). Descendant elements do not generate any boxes
///   either."
/// - [§ 12.1](https://www.w3.org/TR/CSS2/generate.html#before-after-content)
///   `::before` and `::after` with string `content` become the first and last
///   children of their element.
///
/// The traversal uses an explicit work stack; elements nested deeper than
/// `config.max_depth` fail the whole build.
///
/// # Errors
///
/// [`LayoutError::DocumentTooDeep`] if the nesting limit is exceeded.
pub fn build_box_tree(dom: &DomTree, cascade: &dyn Cascade, config: &LayoutConfig) -> Result<BoxTree> {
    let mut tree = BoxTree::new();
    let Some(document_element) = dom.document_element() else {
        return Ok(tree);
    };

    let mut stack = vec![Work::Node {
        node: document_element,
        parent: None,
        parent_display: Display::Block,
        depth: 0,
    }];

    while let Some(work) = stack.pop() {
        let (node, parent, parent_display, depth) = match work {
            Work::Node {
                node,
                parent,
                parent_display,
                depth,
            } => (node, parent, parent_display, depth),
            Work::After { node, owner } => {
                if let Some(pseudo) =
                    pseudo_box(&mut tree, dom, cascade, node, PseudoElement::After)
                {
                    tree.append_child(owner, pseudo)?;
                }
                continue;
            }
        };
        if depth > config.max_depth {
            return Err(LayoutError::DocumentTooDeep {
                limit: config.max_depth,
            });
        }

        let Some(dom_node) = dom.get(node) else {
            continue;
        };
        match &dom_node.node_type {
            NodeType::Text(text) => {
                let id = tree.alloc(BoxKind::Text(TextBox {
                    node: Some(node),
                    source: text.clone(),
                    text: text.clone(),
                }));
                if let Some(parent) = parent {
                    tree.append_child(parent, id)?;
                }
            }
            NodeType::Element(data) => {
                let declarations = cascade.declarations(dom, node, None);
                let mut element = ElementBox::new(Some(node), &data.tag_name, declarations);
                element.attrs.clone_from(&data.attrs);
                let display = resolve_display(&element.properties, parent_display);
                if display == Display::None {
                    continue;
                }

                let id = tree.alloc(BoxKind::Element(element));
                match parent {
                    Some(parent) => tree.append_child(parent, id)?,
                    None => tree.set_root(id)?,
                }

                if let Some(before) =
                    pseudo_box(&mut tree, dom, cascade, node, PseudoElement::Before)
                {
                    tree.append_child(id, before)?;
                }
                stack.push(Work::After { node, owner: id });
                for &child in dom.children(node).iter().rev() {
                    stack.push(Work::Node {
                        node: child,
                        parent: Some(id),
                        parent_display: display,
                        depth: depth + 1,
                    });
                }
            }
            NodeType::Document | NodeType::Comment(_) => {}
        }
    }

    #[cfg(feature = "layout-trace")]
    log::trace!(target: "boxwood::box_tree", "built {} boxes", tree.len());

    Ok(tree)
}

/// `display` as far as box generation is concerned: `inherit` takes the
/// parent's value.
fn resolve_display(properties: &SpecifiedProperties, parent_display: Display) -> Display {
    match properties.display {
        Some(Specified::Value(display)) => display,
        Some(Specified::Inherit) => parent_display,
        None => Display::Inline,
    }
}

/// [§ 12.2 The 'content' property](https://www.w3.org/TR/CSS2/generate.html#content)
///
/// A pseudo-element box with a single text child, or `None` if the
/// pseudo-element generates nothing.
fn pseudo_box(
    tree: &mut BoxTree,
    dom: &DomTree,
    cascade: &dyn Cascade,
    node: NodeId,
    pseudo: PseudoElement,
) -> Option<BoxId> {
    let declarations = cascade.declarations(dom, node, Some(pseudo));
    if declarations.is_empty() {
        return None;
    }
    let mut element = ElementBox::new(Some(node), &format!("::{pseudo}"), declarations);
    element.pseudo = Some(pseudo);
    let text = match &element.properties.content {
        Some(Specified::Value(Some(text))) if !text.is_empty() => text.clone(),
        _ => return None,
    };
    if resolve_display(&element.properties, Display::Inline) == Display::None {
        return None;
    }

    let id = tree.alloc(BoxKind::Element(element));
    let text = tree.alloc(BoxKind::Text(TextBox {
        node: None,
        source: text.clone(),
        text,
    }));
    // Both ids are fresh and detached.
    tree.append_child(id, text).ok()?;
    Some(id)
}
