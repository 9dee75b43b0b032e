//! Integration tests for block, float, inline, table and positioned layout.

use boxwood_dom::{DomBuilder, DomTree, NodeId};
use boxwood_layout::layout::inline::line::FragmentKind;
use boxwood_layout::style::cascade::InlineStyleCascade;
use boxwood_layout::{
    ApproximateResources, LayoutConfig, LayoutEngine, LayoutError, LayoutNode, Rect,
    RecordingSurface, Size,
};
use quickcheck_macros::quickcheck;

/// Helper: build, prepare and lay out a document at 800×600.
fn lay_out(dom: &DomTree) -> LayoutEngine {
    let mut engine =
        LayoutEngine::create(dom, &InlineStyleCascade::new(), LayoutConfig::default()).unwrap();
    let mut resources = ApproximateResources::new();
    let mut surface = RecordingSurface::new();
    engine
        .layout(&mut surface, &mut resources, Size::new(800.0, 600.0))
        .unwrap();
    engine
}

/// Helper: the document node with the given `id` attribute.
fn by_id(dom: &DomTree, id: &str) -> NodeId {
    (0..dom.len())
        .map(NodeId)
        .find(|&n| dom.as_element(n).and_then(|e| e.id()) == Some(id))
        .unwrap_or_else(|| panic!("no element with id {id}"))
}

/// Helper: the layout node generated by a document node.
fn node<'a>(engine: &'a LayoutEngine, dom_node: NodeId) -> &'a LayoutNode {
    let tree = engine.layout_tree().unwrap();
    let box_id = engine.box_for_node(dom_node).unwrap();
    &tree[tree.node_for_box(box_id).unwrap()]
}

/// Helper: the text of each line box of a block container.
fn line_texts(engine: &LayoutEngine, dom_node: NodeId) -> Vec<String> {
    let content = node(engine, dom_node).inline_content.as_ref().unwrap();
    content
        .lines
        .iter()
        .map(|line| {
            line.fragments
                .iter()
                .filter_map(|f| match &f.kind {
                    FragmentKind::Text { text, .. } => Some(text.as_str()),
                    _ => None,
                })
                .collect::<String>()
        })
        .collect()
}

fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 0.01,
        "expected {expected}, got {actual}"
    );
}

fn assert_rect(actual: Rect, expected: Rect) {
    assert_close(actual.x, expected.x);
    assert_close(actual.y, expected.y);
    assert_close(actual.width, expected.width);
    assert_close(actual.height, expected.height);
}

// ---------------------------------------------------------------------------
// Block layout
//
// [§ 10.3.3 Block-level, non-replaced elements in normal flow](https://www.w3.org/TR/CSS2/visudet.html#blockwidth)
// ---------------------------------------------------------------------------

#[test]
fn test_block_fills_containing_block() {
    let dom = DomBuilder::new()
        .open("div", &[("id", "root")])
        .leaf("div", &[("id", "a"), ("style", "height: 30px; padding: 5px; border: 2px solid black")])
        .leaf("div", &[("id", "b"), ("style", "height: 10px")])
        .close()
        .finish();
    let engine = lay_out(&dom);

    let a = node(&engine, by_id(&dom, "a"));
    assert_rect(a.content_box, Rect::new(7.0, 7.0, 786.0, 30.0));
    assert_rect(a.border_box(), Rect::new(0.0, 0.0, 800.0, 44.0));

    let b = node(&engine, by_id(&dom, "b"));
    assert_rect(b.content_box, Rect::new(0.0, 44.0, 800.0, 10.0));

    let root = node(&engine, by_id(&dom, "root"));
    assert_close(root.content_box.height, 54.0);
}

#[test]
fn test_auto_margins_center_a_block() {
    let dom = DomBuilder::new()
        .open("div", &[])
        .leaf("div", &[("id", "a"), ("style", "width: 200px; height: 10px; margin: 0 auto")])
        .close()
        .finish();
    let engine = lay_out(&dom);
    let a = node(&engine, by_id(&dom, "a"));
    assert_close(a.content_box.x, 300.0);
    assert_close(a.margin.left, 300.0);
    assert_close(a.margin.right, 300.0);
}

#[test]
fn test_sibling_margins_collapse() {
    // [§ 8.3.1] "the resulting margin width is the maximum of the
    // collapsing margins' widths."
    let dom = DomBuilder::new()
        .open("div", &[])
        .leaf("div", &[("id", "a"), ("style", "height: 10px; margin-bottom: 20px")])
        .leaf("div", &[("id", "b"), ("style", "height: 10px; margin-top: 30px")])
        .close()
        .finish();
    let engine = lay_out(&dom);
    let b = node(&engine, by_id(&dom, "b"));
    assert_close(b.content_box.y, 40.0);
}

#[test]
fn test_percentage_width_resolves_against_container() {
    let dom = DomBuilder::new()
        .open("div", &[("style", "width: 400px")])
        .leaf("div", &[("id", "a"), ("style", "width: 25%; height: 5px")])
        .close()
        .finish();
    let engine = lay_out(&dom);
    assert_close(node(&engine, by_id(&dom, "a")).content_box.width, 100.0);
}

#[test]
fn test_min_and_max_width_clamp() {
    let dom = DomBuilder::new()
        .open("div", &[])
        .leaf("div", &[("id", "a"), ("style", "width: 50px; min-width: 80px")])
        .leaf("div", &[("id", "b"), ("style", "max-width: 120px")])
        .close()
        .finish();
    let engine = lay_out(&dom);
    assert_close(node(&engine, by_id(&dom, "a")).content_box.width, 80.0);
    assert_close(node(&engine, by_id(&dom, "b")).content_box.width, 120.0);
}

// ---------------------------------------------------------------------------
// Floats
//
// [§ 9.5 Floats](https://www.w3.org/TR/CSS2/visuren.html#floats)
// ---------------------------------------------------------------------------

#[test]
fn test_second_float_sits_beside_the_first() {
    let dom = DomBuilder::new()
        .open("div", &[("style", "width: 200px")])
        .leaf("div", &[("id", "f1"), ("style", "float: left; width: 80px; height: 20px")])
        .leaf("div", &[("id", "f2"), ("style", "float: left; width: 80px; height: 20px")])
        .close()
        .finish();
    let engine = lay_out(&dom);
    assert_rect(node(&engine, by_id(&dom, "f1")).content_box, Rect::new(0.0, 0.0, 80.0, 20.0));
    assert_rect(node(&engine, by_id(&dom, "f2")).content_box, Rect::new(80.0, 0.0, 80.0, 20.0));
}

#[test]
fn test_float_that_does_not_fit_moves_down() {
    let dom = DomBuilder::new()
        .open("div", &[("style", "width: 200px")])
        .leaf("div", &[("id", "f1"), ("style", "float: left; width: 120px; height: 20px")])
        .leaf("div", &[("id", "f2"), ("style", "float: left; width: 120px; height: 20px")])
        .close()
        .finish();
    let engine = lay_out(&dom);
    assert_rect(node(&engine, by_id(&dom, "f2")).content_box, Rect::new(0.0, 20.0, 120.0, 20.0));
}

#[test]
fn test_right_float_hugs_the_right_edge() {
    let dom = DomBuilder::new()
        .open("div", &[("style", "width: 200px")])
        .leaf("div", &[("id", "f"), ("style", "float: right; width: 50px; height: 20px")])
        .close()
        .finish();
    let engine = lay_out(&dom);
    assert_rect(node(&engine, by_id(&dom, "f")).content_box, Rect::new(150.0, 0.0, 50.0, 20.0));
}

#[test]
fn test_clear_moves_below_floats() {
    let dom = DomBuilder::new()
        .open("div", &[("style", "width: 200px")])
        .leaf("div", &[("style", "float: left; width: 50px; height: 30px")])
        .leaf("div", &[("id", "c"), ("style", "clear: left; height: 10px")])
        .close()
        .finish();
    let engine = lay_out(&dom);
    assert_close(node(&engine, by_id(&dom, "c")).border_box().y, 30.0);
}

#[test]
fn test_formatting_root_grows_to_contain_floats() {
    let dom = DomBuilder::new()
        .open("div", &[("id", "root"), ("style", "width: 200px")])
        .leaf("div", &[("style", "float: left; width: 50px; height: 30px")])
        .close()
        .finish();
    let engine = lay_out(&dom);
    assert_close(node(&engine, by_id(&dom, "root")).content_box.height, 30.0);
}

#[test]
fn test_lines_shorten_beside_a_float() {
    let dom = DomBuilder::new()
        .open("div", &[("id", "root"), ("style", "width: 200px")])
        .leaf("div", &[("style", "float: left; width: 50px; height: 30px")])
        .text("abc")
        .close()
        .finish();
    let engine = lay_out(&dom);
    let content = node(&engine, by_id(&dom, "root")).inline_content.as_ref().unwrap();
    assert_close(content.lines[0].rect.x, 50.0);
    assert_close(content.lines[0].rect.width, 150.0);
}

// ---------------------------------------------------------------------------
// Inline formatting
//
// [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
// ---------------------------------------------------------------------------

#[test]
fn test_text_wraps_at_last_fitting_word() {
    // 16px text advances 9.6px per character: "aaaa bbbb" is 86.4px.
    let dom = DomBuilder::new()
        .open("div", &[("id", "p"), ("style", "width: 100px")])
        .text("aaaa bbbb cccc")
        .close()
        .finish();
    let engine = lay_out(&dom);
    assert_eq!(line_texts(&engine, by_id(&dom, "p")), vec!["aaaa bbbb", "cccc"]);
}

#[test]
fn test_overlong_word_gets_its_own_line() {
    let dom = DomBuilder::new()
        .open("div", &[("id", "p"), ("style", "width: 100px")])
        .text("ab verylongwordhere cd")
        .close()
        .finish();
    let engine = lay_out(&dom);
    assert_eq!(
        line_texts(&engine, by_id(&dom, "p")),
        vec!["ab", "verylongwordhere", "cd"]
    );
}

#[test]
fn test_lines_stack_by_line_height() {
    let dom = DomBuilder::new()
        .open("div", &[("id", "p"), ("style", "width: 100px; line-height: 20px")])
        .text("aaaa bbbb cccc")
        .close()
        .finish();
    let engine = lay_out(&dom);
    let p = node(&engine, by_id(&dom, "p"));
    let lines = &p.inline_content.as_ref().unwrap().lines;
    assert_close(lines[0].rect.y, 0.0);
    assert_close(lines[1].rect.y, 20.0);
    assert_close(p.content_box.height, 40.0);
}

#[test]
fn test_justify_spreads_slack_over_gaps() {
    // 10px text advances 6px per character. "a b c d" is 42px in a 72px
    // line: 30px over 3 gaps.
    let dom = DomBuilder::new()
        .open("div", &[("id", "p"), ("style", "width: 72px; font-size: 10px; text-align: justify")])
        .text("a b c d eeeeeeeeee")
        .close()
        .finish();
    let engine = lay_out(&dom);
    let p = node(&engine, by_id(&dom, "p"));
    let lines = &p.inline_content.as_ref().unwrap().lines;
    assert_eq!(lines.len(), 2);
    let xs: Vec<f32> = lines[0].fragments.iter().map(|f| f.rect.x).collect();
    assert_eq!(xs.len(), 4);
    for (x, expected) in xs.iter().zip([0.0, 22.0, 44.0, 66.0]) {
        assert_close(*x, expected);
    }
    // The last line is not justified.
    assert_close(lines[1].fragments[0].rect.x, 0.0);
}

#[test]
fn test_text_align_center_and_right() {
    let dom = DomBuilder::new()
        .open("div", &[("style", "width: 100px; font-size: 10px")])
        .open("div", &[("id", "c"), ("style", "text-align: center")])
        .text("abcd")
        .close()
        .open("div", &[("id", "r"), ("style", "text-align: right")])
        .text("abcd")
        .close()
        .close()
        .finish();
    let engine = lay_out(&dom);
    let first_x = |id: &str| {
        node(&engine, by_id(&dom, id)).inline_content.as_ref().unwrap().lines[0].fragments[0]
            .rect
            .x
    };
    assert_close(first_x("c"), 38.0);
    assert_close(first_x("r"), 76.0);
}

#[test]
fn test_br_forces_a_line_break() {
    let dom = DomBuilder::new()
        .open("div", &[("id", "p")])
        .text("one")
        .leaf("br", &[])
        .text("two")
        .close()
        .finish();
    let engine = lay_out(&dom);
    assert_eq!(line_texts(&engine, by_id(&dom, "p")), vec!["one", "two"]);
}

#[test]
fn test_uppercase_br_forces_a_line_break() {
    let dom = DomBuilder::new()
        .open("div", &[("id", "p")])
        .text("one")
        .leaf("BR", &[])
        .text("two")
        .close()
        .finish();
    let engine = lay_out(&dom);
    assert_eq!(line_texts(&engine, by_id(&dom, "p")), vec!["one", "two"]);
}

#[test]
fn test_pre_keeps_spaces_and_newlines() {
    let dom = DomBuilder::new()
        .open("div", &[("id", "p"), ("style", "white-space: pre")])
        .text("a  b\nc")
        .close()
        .finish();
    let engine = lay_out(&dom);
    assert_eq!(line_texts(&engine, by_id(&dom, "p")), vec!["a  b", "c"]);
}

#[test]
fn test_inline_element_spans_its_text() {
    let dom = DomBuilder::new()
        .open("div", &[("style", "font-size: 10px")])
        .text("ab ")
        .open("span", &[("id", "s"), ("style", "padding: 0 4px")])
        .text("cd")
        .close()
        .close()
        .finish();
    let engine = lay_out(&dom);
    let span = node(&engine, by_id(&dom, "s"));
    assert_close(span.content_box.x, 22.0);
    assert_close(span.content_box.width, 12.0);
}

#[test]
fn test_inline_block_is_atomic() {
    let dom = DomBuilder::new()
        .open("div", &[("style", "font-size: 10px")])
        .text("ab ")
        .leaf("span", &[("id", "ib"), ("style", "display: inline-block; width: 30px; height: 15px")])
        .close()
        .finish();
    let engine = lay_out(&dom);
    let ib = node(&engine, by_id(&dom, "ib"));
    assert_close(ib.content_box.x, 18.0);
    assert_close(ib.content_box.width, 30.0);
    assert_close(ib.content_box.height, 15.0);
}

// ---------------------------------------------------------------------------
// Tables
//
// [§ 17 Tables](https://www.w3.org/TR/CSS2/tables.html)
// ---------------------------------------------------------------------------

/// Helper: a 2×2 table whose cells are `cell_style`.
fn two_by_two(table_style: &str, cell_style: &str) -> DomTree {
    let mut builder = DomBuilder::new()
        .open("div", &[])
        .open("table", &[("id", "t"), ("style", table_style)]);
    for r in 0..2 {
        builder = builder.open("tr", &[]);
        for c in 0..2 {
            let id = format!("c{r}{c}");
            builder = builder.leaf("td", &[("id", id.as_str()), ("style", cell_style)]);
        }
        builder = builder.close();
    }
    builder.close().close().finish()
}

#[test]
fn test_separated_table_width_adds_spacing_and_edges() {
    let dom = two_by_two(
        "border-collapse: separate; border-spacing: 5px; border: 2px solid black; padding: 3px",
        "width: 40px; height: 10px",
    );
    let engine = lay_out(&dom);
    let table = node(&engine, by_id(&dom, "t"));
    // 2 × 40 + 3 × 5 + 2 × (2 + 3)
    assert_close(table.border_box().width, 105.0);
}

#[test]
fn test_cells_line_up_on_the_grid() {
    let dom = two_by_two("border-spacing: 5px", "width: 40px; height: 10px");
    let engine = lay_out(&dom);
    let cell = |id: &str| node(&engine, by_id(&dom, id)).content_box;

    assert_rect(cell("c00"), Rect::new(5.0, 5.0, 40.0, 10.0));
    assert_rect(cell("c01"), Rect::new(50.0, 5.0, 40.0, 10.0));
    assert_rect(cell("c10"), Rect::new(5.0, 20.0, 40.0, 10.0));
    // Every cell in a column shares x and width; every cell in a row shares y.
    assert_close(cell("c00").x, cell("c10").x);
    assert_close(cell("c01").width, cell("c11").width);
    assert_close(cell("c10").y, cell("c11").y);

    let table = node(&engine, by_id(&dom, "t"));
    assert_close(table.content_box.height, 35.0);
}

#[test]
fn test_collapsed_borders_drop_spacing() {
    let dom = two_by_two(
        "border-collapse: collapse; border-spacing: 5px",
        "width: 40px; height: 10px; border: 2px solid black",
    );
    let engine = lay_out(&dom);
    let table = node(&engine, by_id(&dom, "t"));
    // Three vertical lines of 2px, no spacing.
    assert_close(table.border_box().width, 86.0);
}

#[test]
fn test_taller_cell_sets_the_row_height() {
    let dom = DomBuilder::new()
        .open("table", &[("id", "t"), ("style", "border-spacing: 0px")])
        .open("tr", &[])
        .leaf("td", &[("id", "a"), ("style", "width: 20px; height: 10px")])
        .leaf("td", &[("id", "b"), ("style", "width: 20px; height: 30px")])
        .close()
        .close()
        .finish();
    let engine = lay_out(&dom);
    assert_close(node(&engine, by_id(&dom, "a")).content_box.height, 30.0);
    assert_close(node(&engine, by_id(&dom, "t")).content_box.height, 30.0);
}

#[test]
fn test_colspan_covers_both_columns() {
    let dom = DomBuilder::new()
        .open("table", &[("style", "border-spacing: 4px")])
        .open("tr", &[])
        .leaf("td", &[("style", "width: 30px")])
        .leaf("td", &[("style", "width: 30px")])
        .close()
        .open("tr", &[])
        .leaf("td", &[("id", "wide"), ("colspan", "2")])
        .close()
        .close()
        .finish();
    let engine = lay_out(&dom);
    assert_close(node(&engine, by_id(&dom, "wide")).content_box.width, 64.0);
}

#[test]
fn test_huge_colspan_is_clamped() {
    let dom = DomBuilder::new()
        .open("table", &[("style", "border-spacing: 0px")])
        .open("tr", &[])
        .open("td", &[("id", "c"), ("colspan", "18446744073709551615")])
        .text("x")
        .close()
        .close()
        .close()
        .finish();
    let engine = lay_out(&dom);
    let width = node(&engine, by_id(&dom, "c")).content_box.width;
    assert!(width >= 9.6 - 0.01, "cell narrower than its text: {width}");
    assert!(width <= 800.0, "cell wider than the viewport: {width}");
}

#[test]
fn test_cell_vertical_align_offsets_content() {
    let dom = DomBuilder::new()
        .open("table", &[("style", "border-spacing: 0px")])
        .open("tr", &[])
        .leaf("td", &[("style", "height: 50px; width: 10px")])
        .open("td", &[("id", "middle"), ("style", "vertical-align: middle")])
        .leaf("div", &[("id", "m"), ("style", "height: 10px; width: 10px")])
        .close()
        .open("td", &[("style", "vertical-align: bottom")])
        .leaf("div", &[("id", "b"), ("style", "height: 10px; width: 10px")])
        .close()
        .open("td", &[("style", "vertical-align: top")])
        .leaf("div", &[("id", "t"), ("style", "height: 10px; width: 10px")])
        .close()
        .close()
        .close()
        .finish();
    let engine = lay_out(&dom);
    let row = node(&engine, by_id(&dom, "middle")).content_box;
    assert_close(row.height, 50.0);
    let offset = |id: &str| node(&engine, by_id(&dom, id)).content_box.y - row.y;
    assert_close(offset("m"), 20.0);
    assert_close(offset("b"), 40.0);
    assert_close(offset("t"), 0.0);
}

// ---------------------------------------------------------------------------
// Positioning
//
// [§ 9.3 Positioning schemes](https://www.w3.org/TR/CSS2/visuren.html#positioning-scheme)
// ---------------------------------------------------------------------------

#[test]
fn test_absolute_offsets_override_static_position() {
    let dom = DomBuilder::new()
        .open("div", &[])
        .leaf("div", &[("style", "height: 40px")])
        .open("div", &[("style", "padding-left: 40px")])
        .leaf(
            "div",
            &[("id", "abs"), ("style", "position: absolute; left: 10px; top: 10px; height: 5px")],
        )
        .close()
        .close()
        .finish();
    let engine = lay_out(&dom);
    let abs = node(&engine, by_id(&dom, "abs"));
    assert_close(abs.content_box.x, 10.0);
    assert_close(abs.content_box.y, 10.0);
}

#[test]
fn test_absolute_without_offsets_stays_at_static_position() {
    let dom = DomBuilder::new()
        .open("div", &[])
        .leaf("div", &[("style", "height: 40px")])
        .open("div", &[("style", "padding-left: 40px")])
        .leaf("div", &[("id", "abs"), ("style", "position: absolute; width: 10px; height: 5px")])
        .close()
        .close()
        .finish();
    let engine = lay_out(&dom);
    let abs = node(&engine, by_id(&dom, "abs"));
    assert_close(abs.content_box.x, 40.0);
    assert_close(abs.content_box.y, 40.0);
}

#[test]
fn test_absolute_uses_positioned_ancestor() {
    let dom = DomBuilder::new()
        .open("div", &[])
        .leaf("div", &[("style", "height: 50px")])
        .open("div", &[("style", "position: relative; margin-left: 100px; height: 200px")])
        .leaf(
            "div",
            &[("id", "abs"), ("style", "position: absolute; right: 0; bottom: 0; width: 20px; height: 20px")],
        )
        .close()
        .close()
        .finish();
    let engine = lay_out(&dom);
    let abs = node(&engine, by_id(&dom, "abs"));
    assert_rect(abs.content_box, Rect::new(780.0, 230.0, 20.0, 20.0));
}

#[test]
fn test_relative_offset_moves_box_not_flow() {
    let dom = DomBuilder::new()
        .open("div", &[])
        .leaf("div", &[("id", "rel"), ("style", "position: relative; left: 5px; top: 7px; height: 10px")])
        .leaf("div", &[("id", "next"), ("style", "height: 10px")])
        .close()
        .finish();
    let engine = lay_out(&dom);
    let rel = node(&engine, by_id(&dom, "rel"));
    assert_close(rel.content_box.x, 5.0);
    assert_close(rel.content_box.y, 7.0);
    assert_close(node(&engine, by_id(&dom, "next")).content_box.y, 10.0);
}

#[test]
fn test_fixed_uses_the_viewport() {
    let dom = DomBuilder::new()
        .open("div", &[("style", "position: relative; margin-left: 100px")])
        .leaf(
            "div",
            &[("id", "fixed"), ("style", "position: fixed; right: 0; bottom: 0; width: 10px; height: 10px")],
        )
        .close()
        .finish();
    let engine = lay_out(&dom);
    let fixed = node(&engine, by_id(&dom, "fixed"));
    assert_rect(fixed.content_box, Rect::new(790.0, 590.0, 10.0, 10.0));
}

// ---------------------------------------------------------------------------
// Replaced elements
// ---------------------------------------------------------------------------

#[test]
fn test_image_uses_intrinsic_size() {
    let dom = DomBuilder::new()
        .open("div", &[])
        .leaf("img", &[("id", "img"), ("src", "cat.png"), ("style", "display: block")])
        .close()
        .finish();
    let mut engine =
        LayoutEngine::create(&dom, &InlineStyleCascade::new(), LayoutConfig::default()).unwrap();
    let mut resources = ApproximateResources::new();
    resources.add_image("cat.png", 64.0, 32.0);
    let mut surface = RecordingSurface::new();
    engine
        .layout(&mut surface, &mut resources, Size::new(800.0, 600.0))
        .unwrap();
    let img = node(&engine, by_id(&dom, "img"));
    assert_close(img.content_box.width, 64.0);
    assert_close(img.content_box.height, 32.0);
}

#[test]
fn test_missing_image_falls_back_to_attributes() {
    let dom = DomBuilder::new()
        .open("div", &[])
        .leaf(
            "img",
            &[
                ("id", "img"),
                ("src", "missing.png"),
                ("width", "40"),
                ("height", "20"),
                ("style", "display: block"),
            ],
        )
        .close()
        .finish();
    let engine = lay_out(&dom);
    let img = node(&engine, by_id(&dom, "img"));
    assert_close(img.content_box.width, 40.0);
    assert_close(img.content_box.height, 20.0);
}

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

#[test]
fn test_deep_document_is_rejected() {
    let mut builder = DomBuilder::new();
    for _ in 0..20 {
        builder = builder.open("div", &[]);
    }
    let dom = builder.finish();
    let config = LayoutConfig {
        max_depth: 8,
        ..LayoutConfig::default()
    };
    let result = LayoutEngine::create(&dom, &InlineStyleCascade::new(), config);
    assert_eq!(result.err(), Some(LayoutError::DocumentTooDeep { limit: 8 }));
}

#[test]
fn test_layout_is_repeatable() {
    let dom = two_by_two("border-spacing: 5px", "width: 40px; height: 10px");
    let mut engine = lay_out(&dom);
    let first = node(&engine, by_id(&dom, "c11")).content_box;
    let mut resources = ApproximateResources::new();
    let mut surface = RecordingSurface::new();
    engine
        .layout(&mut surface, &mut resources, Size::new(800.0, 600.0))
        .unwrap();
    assert_eq!(node(&engine, by_id(&dom, "c11")).content_box, first);
}

// ---------------------------------------------------------------------------
// Shrink-to-fit
//
// [§ 10.3.5 Floating, non-replaced elements](https://www.w3.org/TR/CSS2/visudet.html#float-width)
// ---------------------------------------------------------------------------

#[quickcheck]
fn shrink_to_fit_lies_between_minimum_and_preferred(lengths: Vec<u8>) -> bool {
    let words: Vec<String> = lengths
        .iter()
        .take(12)
        .map(|&len| "a".repeat(1 + usize::from(len % 15)))
        .collect();
    if words.is_empty() {
        return true;
    }
    let dom = DomBuilder::new()
        .open("div", &[])
        .open("div", &[("id", "f"), ("style", "float: left; font-size: 10px")])
        .text(&words.join(" "))
        .close()
        .close()
        .finish();
    let engine = lay_out(&dom);
    let width = node(&engine, by_id(&dom, "f")).content_box.width;

    // 6px per character, spaces included.
    let minimum = words.iter().map(String::len).max().unwrap_or(0) as f32 * 6.0;
    let preferred = (words.iter().map(String::len).sum::<usize>() + words.len() - 1) as f32 * 6.0;
    minimum - 0.01 <= width && width <= preferred.min(800.0) + 0.01
}
