//! Tests for document tree mutation: append_child, insert_before, remove_child.

use boxwood_dom::{DomBuilder, DomTree, ElementData, NodeId, NodeType, TreeError};

/// Helper to create a detached element node and return its NodeId.
fn alloc_element(tree: &mut DomTree, tag: &str) -> NodeId {
    tree.alloc(NodeType::Element(ElementData::new(tag)))
}

#[test]
fn test_append_child_sets_parent_and_order() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent).unwrap();
    let a = alloc_element(&mut tree, "a");
    let b = alloc_element(&mut tree, "b");
    tree.append_child(parent, a).unwrap();
    tree.append_child(parent, b).unwrap();

    assert_eq!(tree.children(parent), &[a, b]);
    assert_eq!(tree.parent(a), Some(parent));
    assert_eq!(tree.next_sibling(a), Some(b));
    assert_eq!(tree.prev_sibling(b), Some(a));
    assert_eq!(tree.prev_sibling(a), None);
}

#[test]
fn test_append_child_rejects_attached_node() {
    let mut tree = DomTree::new();
    let a = alloc_element(&mut tree, "div");
    let b = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, a).unwrap();
    let child = alloc_element(&mut tree, "p");
    tree.append_child(a, child).unwrap();

    assert_eq!(
        tree.append_child(b, child),
        Err(TreeError::AlreadyHasParent(child))
    );
    assert_eq!(tree.parent(child), Some(a));
}

#[test]
fn test_insert_before_middle() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "ul");
    let first = alloc_element(&mut tree, "li");
    let last = alloc_element(&mut tree, "li");
    tree.append_child(parent, first).unwrap();
    tree.append_child(parent, last).unwrap();

    let middle = alloc_element(&mut tree, "li");
    tree.insert_before(parent, middle, last).unwrap();

    assert_eq!(tree.children(parent), &[first, middle, last]);
    assert_eq!(tree.next_sibling(middle), Some(last));
}

#[test]
fn test_insert_before_foreign_reference_fails() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    let other = alloc_element(&mut tree, "div");
    let stranger = alloc_element(&mut tree, "span");
    tree.append_child(other, stranger).unwrap();

    let child = alloc_element(&mut tree, "p");
    let result = tree.insert_before(parent, child, stranger);

    assert_eq!(
        result,
        Err(TreeError::NotAChild {
            parent,
            child: stranger
        })
    );
    assert_eq!(tree.parent(child), None, "failed insert must not attach");
}

#[test]
fn test_remove_child_detaches_and_allows_reinsert() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    let child = alloc_element(&mut tree, "p");
    tree.append_child(parent, child).unwrap();

    tree.remove_child(parent, child).unwrap();
    assert!(tree.children(parent).is_empty());
    assert_eq!(tree.parent(child), None);

    let other = alloc_element(&mut tree, "section");
    tree.append_child(other, child).unwrap();
    assert_eq!(tree.parent(child), Some(other));
}

#[test]
fn test_builder_nesting_and_document_element() {
    let tree = DomBuilder::new()
        .open("HTML", &[])
        .open("body", &[("style", "margin: 0")])
        .text("hi")
        .comment("ignored")
        .leaf("br", &[])
        .close()
        .close()
        .finish();

    let html = tree.document_element().unwrap();
    assert_eq!(tree.as_element(html).unwrap().tag_name, "html");
    let body = tree.first_child(html).unwrap();
    assert_eq!(tree.as_element(body).unwrap().attr("style"), Some("margin: 0"));
    assert_eq!(tree.children(body).len(), 3);
    assert_eq!(tree.as_text(tree.children(body)[0]), Some("hi"));
    assert_eq!(tree.ancestors(tree.children(body)[2]).count(), 3);
}
