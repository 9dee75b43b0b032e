//! Integration tests for the box tree: arena operations, box generation and
//! preparation.

use boxwood_dom::{DomBuilder, DomTree, NodeId};
use boxwood_layout::box_tree::ElementBox;
use boxwood_layout::style::cascade::InlineStyleCascade;
use boxwood_layout::style::parse::Declaration;
use boxwood_layout::style::values::{Color, Display};
use boxwood_layout::{ApproximateResources, BoxId, BoxKind, BoxTree, LayoutConfig, LayoutEngine, LayoutError};

fn element(tree: &mut BoxTree, tag: &str) -> BoxId {
    tree.alloc(BoxKind::Element(ElementBox::new(None, tag, Vec::new())))
}

/// Helper: a root with two children.
fn small_tree() -> (BoxTree, BoxId, BoxId, BoxId) {
    let mut tree = BoxTree::new();
    let root = element(&mut tree, "div");
    tree.set_root(root).unwrap();
    let a = element(&mut tree, "p");
    let b = element(&mut tree, "p");
    tree.append_child(root, a).unwrap();
    tree.append_child(root, b).unwrap();
    (tree, root, a, b)
}

/// Helper: create and prepare an engine for a document.
fn prepared(dom: &DomTree) -> LayoutEngine {
    let mut engine =
        LayoutEngine::create(dom, &InlineStyleCascade::new(), LayoutConfig::default()).unwrap();
    engine.prepare(&mut ApproximateResources::new()).unwrap();
    engine
}

fn by_id(dom: &DomTree, id: &str) -> NodeId {
    (0..dom.len())
        .map(NodeId)
        .find(|&n| dom.as_element(n).and_then(|e| e.id()) == Some(id))
        .unwrap_or_else(|| panic!("no element with id {id}"))
}

// ---------------------------------------------------------------------------
// Arena operations
// ---------------------------------------------------------------------------

#[test]
fn test_append_and_traverse() {
    let (tree, root, a, b) = small_tree();
    assert_eq!(tree.children(root), &[a, b]);
    assert_eq!(tree.parent(a), Some(root));
    assert_eq!(tree.iter().collect::<Vec<_>>(), vec![root, a, b]);
    assert_eq!(tree.depth(b), 1);
}

#[test]
fn test_insert_before_places_child() {
    let (mut tree, root, a, b) = small_tree();
    let c = element(&mut tree, "span");
    tree.insert_before(root, c, b).unwrap();
    assert_eq!(tree.children(root), &[a, c, b]);
}

#[test]
fn test_attached_node_cannot_be_inserted_again() {
    let (mut tree, _, a, b) = small_tree();
    assert_eq!(tree.append_child(b, a), Err(LayoutError::NodeHasParent(a)));
}

#[test]
fn test_insert_before_a_non_child_fails() {
    let (mut tree, root, a, _) = small_tree();
    let c = element(&mut tree, "span");
    let d = element(&mut tree, "span");
    assert_eq!(
        tree.insert_before(a, c, d),
        Err(LayoutError::NotAChild { parent: a, child: d })
    );
    // Nothing changed.
    assert_eq!(tree.parent(c), None);
    assert_eq!(tree.children(root).len(), 2);
}

#[test]
fn test_node_cannot_become_its_own_ancestor() {
    let (mut tree, _, a, _) = small_tree();
    let c = element(&mut tree, "span");
    tree.append_child(a, c).unwrap();
    tree.detach(a).unwrap();
    assert_eq!(
        tree.append_child(c, a),
        Err(LayoutError::WouldCycle { parent: c, child: a })
    );
}

#[test]
fn test_removed_ids_are_stale() {
    let (mut tree, root, a, b) = small_tree();
    let c = element(&mut tree, "span");
    tree.append_child(a, c).unwrap();
    tree.remove(a).unwrap();

    assert_eq!(tree.children(root), &[b]);
    assert!(!tree.contains(a));
    assert!(!tree.contains(c));
    assert!(matches!(tree.get(c), Err(LayoutError::StaleBox(id)) if id == c));

    // A reused slot gets a new generation.
    let d = element(&mut tree, "span");
    assert!(d.index() == a.index() || d.index() == c.index());
    assert_ne!(d, a);
    assert_ne!(d, c);
    assert!(tree.get(a).is_err());
}

#[test]
fn test_user_data_round_trips() {
    let (mut tree, _, a, _) = small_tree();
    assert!(tree.set_user_data(a, Box::new(42_u32)).unwrap().is_none());
    assert_eq!(tree.user_data::<u32>(a), Some(&42));
    assert_eq!(tree.user_data::<String>(a), None);
    assert!(tree.take_user_data(a).unwrap().is_some());
    assert_eq!(tree.user_data::<u32>(a), None);
}

#[test]
fn test_apply_properties_replaces_declarations() {
    let (mut tree, _, a, _) = small_tree();
    tree.apply_properties(a, &[Declaration::new("display", "none")])
        .unwrap();
    let element = tree.element(a).unwrap();
    assert_eq!(element.declarations.len(), 1);
    assert_eq!(element.declarations[0].name, "display");
}

#[test]
fn test_span_attributes_are_clamped() {
    let mut cell = ElementBox::new(None, "td", Vec::new());
    assert_eq!(cell.span_attr("colspan"), 1);

    let mut span_of = |name: &str, value: &str| {
        cell.attrs.insert(name.to_string(), value.to_string());
        cell.span_attr(name)
    };
    assert_eq!(span_of("colspan", "3"), 3);
    assert_eq!(span_of("colspan", "5000"), 1000);
    assert_eq!(span_of("colspan", "18446744073709551615"), 1000);
    assert_eq!(span_of("colspan", "99999999999999999999999"), 1000);
    assert_eq!(span_of("colspan", "0"), 1);
    assert_eq!(span_of("colspan", "abc"), 1);
    assert_eq!(span_of("rowspan", "70000"), 65534);
    assert_eq!(span_of("span", "2000"), 1000);
}

#[test]
fn test_tag_checks_ignore_case() {
    let image = ElementBox::new(None, "IMG", Vec::new());
    assert!(image.is_replaced());
    assert!(image.is_tag("img"));
    assert!(!image.is_tag("br"));
}

// ---------------------------------------------------------------------------
// Box generation
// ---------------------------------------------------------------------------

#[test]
fn test_display_none_generates_no_boxes() {
    let dom = DomBuilder::new()
        .open("div", &[])
        .open("div", &[("id", "gone"), ("style", "display: none")])
        .leaf("p", &[("id", "inner")])
        .close()
        .leaf("p", &[("id", "kept")])
        .close()
        .finish();
    let engine = prepared(&dom);
    assert!(engine.box_for_node(by_id(&dom, "gone")).is_none());
    assert!(engine.box_for_node(by_id(&dom, "inner")).is_none());
    assert!(engine.box_for_node(by_id(&dom, "kept")).is_some());
}

#[test]
fn test_comments_generate_nothing() {
    let dom = DomBuilder::new()
        .open("div", &[])
        .comment("note")
        .text("x")
        .close()
        .finish();
    let engine = prepared(&dom);
    let root = engine.boxes().root().unwrap();
    assert_eq!(engine.boxes().children(root).len(), 1);
}

#[test]
fn test_before_and_after_boxes_wrap_children() {
    let dom = DomBuilder::new()
        .open("div", &[])
        .text("middle")
        .close()
        .finish();
    let root = dom.document_element().unwrap();
    let cascade = InlineStyleCascade::new()
        .with_pseudo_rule(root, boxwood_layout::style::values::PseudoElement::Before, "content: \"[\"")
        .with_pseudo_rule(root, boxwood_layout::style::values::PseudoElement::After, "content: \"]\"");
    let mut engine = LayoutEngine::create(&dom, &cascade, LayoutConfig::default()).unwrap();
    engine.prepare(&mut ApproximateResources::new()).unwrap();

    let boxes = engine.boxes();
    let root_box = boxes.root().unwrap();
    let children = boxes.children(root_box);
    assert_eq!(children.len(), 3);
    let text_of = |id: BoxId| -> String {
        boxes
            .descendants(id)
            .filter_map(|d| boxes.text(d).map(|t| t.text.clone()))
            .collect()
    };
    assert_eq!(text_of(children[0]), "[");
    assert_eq!(text_of(children[2]), "]");
}

#[test]
fn test_misparented_cell_gets_row_and_table() {
    let dom = DomBuilder::new()
        .open("div", &[])
        .open("div", &[("id", "cell"), ("style", "display: table-cell")])
        .text("x")
        .close()
        .close()
        .finish();
    let engine = prepared(&dom);
    let boxes = engine.boxes();
    let cell = engine.box_for_node(by_id(&dom, "cell")).unwrap();

    let row = boxes.parent(cell).unwrap();
    let row_element = boxes.element(row).unwrap();
    assert!(row_element.is_anonymous());
    assert_eq!(row_element.computed.display, Display::TableRow);

    let table = boxes.parent(row).unwrap();
    let table_element = boxes.element(table).unwrap();
    assert!(table_element.is_anonymous());
    assert_eq!(table_element.computed.display, Display::Table);
    assert_eq!(boxes.parent(table), boxes.root());
}

#[test]
fn test_stray_content_in_row_gets_a_cell() {
    let dom = DomBuilder::new()
        .open("table", &[])
        .open("tr", &[("id", "row")])
        .leaf("span", &[("id", "loose")])
        .close()
        .close()
        .finish();
    let engine = prepared(&dom);
    let boxes = engine.boxes();
    let loose = engine.box_for_node(by_id(&dom, "loose")).unwrap();
    let cell = boxes.parent(loose).unwrap();
    assert_eq!(boxes.element(cell).unwrap().computed.display, Display::TableCell);
    assert_eq!(boxes.parent(cell), engine.box_for_node(by_id(&dom, "row")));
}

#[test]
fn test_anonymous_boxes_inherit_nothing() {
    let dom = DomBuilder::new()
        .open("div", &[("style", "color: red; font-size: 30px")])
        .leaf("div", &[("id", "cell"), ("style", "display: table-cell")])
        .close()
        .finish();
    let engine = prepared(&dom);
    let boxes = engine.boxes();
    let cell = engine.box_for_node(by_id(&dom, "cell")).unwrap();
    let row = boxes.parent(cell).unwrap();
    let row_style = &boxes.element(row).unwrap().computed;
    assert_eq!(row_style.color, Color::BLACK);
    assert_eq!(row_style.font_size, 16.0);
    assert_eq!(row_style.display, Display::TableRow);

    // The wrapped element keeps what it inherited from its source parent.
    let cell_style = &boxes.element(cell).unwrap().computed;
    assert_eq!(cell_style.color, Color::rgb(255, 0, 0));
    assert_eq!(cell_style.font_size, 30.0);
}

// ---------------------------------------------------------------------------
// Run-in boxes
// ---------------------------------------------------------------------------

#[test]
fn test_run_in_merges_into_following_block() {
    let dom = DomBuilder::new()
        .open("div", &[])
        .open("div", &[("id", "head"), ("style", "display: run-in")])
        .text("Head")
        .close()
        .open("div", &[("id", "body")])
        .text("body")
        .close()
        .close()
        .finish();
    let engine = prepared(&dom);
    let boxes = engine.boxes();
    let head = engine.box_for_node(by_id(&dom, "head")).unwrap();
    let body = engine.box_for_node(by_id(&dom, "body")).unwrap();

    assert_eq!(boxes.parent(head), Some(body));
    assert_eq!(boxes.children(body).first(), Some(&head));
    assert_eq!(boxes.element(head).unwrap().computed.display, Display::Inline);
    let text: String = boxes
        .descendants(body)
        .filter_map(|d| boxes.text(d).map(|t| t.text.clone()))
        .collect();
    assert_eq!(text, "Headbody");
}

#[test]
fn test_run_in_before_inline_content_becomes_block() {
    let dom = DomBuilder::new()
        .open("div", &[("id", "first")])
        .open("div", &[("id", "a"), ("style", "display: run-in")])
        .text("A")
        .close()
        .text("loose text")
        .leaf("div", &[])
        .close()
        .open("div", &[("id", "second")])
        .open("div", &[("id", "b"), ("style", "display: run-in")])
        .text("B")
        .close()
        .open("span", &[])
        .text("inline")
        .close()
        .leaf("div", &[])
        .close()
        .finish();
    let engine = prepared(&dom);
    let boxes = engine.boxes();
    for (run_in, parent) in [("a", "first"), ("b", "second")] {
        let run_in = engine.box_for_node(by_id(&dom, run_in)).unwrap();
        assert_eq!(boxes.element(run_in).unwrap().computed.display, Display::Block);
        assert_eq!(boxes.parent(run_in), engine.box_for_node(by_id(&dom, parent)));
    }
}

#[test]
fn test_run_in_containing_a_block_becomes_block() {
    let dom = DomBuilder::new()
        .open("div", &[("id", "outer")])
        .open("div", &[("id", "head"), ("style", "display: run-in")])
        .leaf("p", &[])
        .close()
        .leaf("div", &[("id", "next")])
        .close()
        .finish();
    let engine = prepared(&dom);
    let boxes = engine.boxes();
    let head = engine.box_for_node(by_id(&dom, "head")).unwrap();
    assert_eq!(boxes.element(head).unwrap().computed.display, Display::Block);
    assert_eq!(boxes.parent(head), engine.box_for_node(by_id(&dom, "outer")));
}

#[test]
fn test_run_in_skips_floats_and_positioned_siblings() {
    let dom = DomBuilder::new()
        .open("div", &[])
        .open("div", &[("id", "head"), ("style", "display: run-in")])
        .text("Head")
        .close()
        .leaf("div", &[("style", "float: left; width: 10px; height: 10px")])
        .leaf("div", &[("style", "position: absolute")])
        .open("div", &[("id", "target")])
        .text("body")
        .close()
        .close()
        .finish();
    let engine = prepared(&dom);
    let boxes = engine.boxes();
    let head = engine.box_for_node(by_id(&dom, "head")).unwrap();
    let target = engine.box_for_node(by_id(&dom, "target")).unwrap();
    assert_eq!(boxes.parent(head), Some(target));
    assert_eq!(boxes.children(target).first(), Some(&head));
    assert_eq!(boxes.element(head).unwrap().computed.display, Display::Inline);
}

#[test]
fn test_whitespace_collapses_across_text_boxes() {
    let dom = DomBuilder::new()
        .open("div", &[])
        .text("  a   b ")
        .open("span", &[])
        .text("  c")
        .close()
        .close()
        .finish();
    let engine = prepared(&dom);
    let boxes = engine.boxes();
    let texts: Vec<String> = boxes
        .iter()
        .filter_map(|id| boxes.text(id).map(|t| t.text.clone()))
        .collect();
    assert_eq!(texts, vec!["a b ", "c"]);
}

#[test]
fn test_create_rejects_deep_documents() {
    let mut builder = DomBuilder::new();
    for _ in 0..10 {
        builder = builder.open("div", &[]);
    }
    let dom = builder.finish();
    let config = LayoutConfig {
        max_depth: 4,
        ..LayoutConfig::default()
    };
    let err = LayoutEngine::create(&dom, &InlineStyleCascade::new(), config).unwrap_err();
    assert_eq!(err, LayoutError::DocumentTooDeep { limit: 4 });
    assert_eq!(err.to_string(), "document nesting exceeds the depth limit of 4");
}
