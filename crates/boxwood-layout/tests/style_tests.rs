//! Integration tests for computed values and inheritance.
//!
//! [§ 6 Assigning property values, Cascading, and Inheritance](https://www.w3.org/TR/CSS2/cascade.html)

use std::rc::Rc;

use boxwood_dom::{DomBuilder, DomTree, NodeId};
use boxwood_layout::style::cascade::InlineStyleCascade;
use boxwood_layout::style::values::{
    BorderStyle, Color, Display, Float, LengthPercentageAuto, Position, TextAlign,
};
use boxwood_layout::{ApproximateResources, ComputedProperties, LayoutConfig, LayoutEngine};

/// Helper: computed properties of every element with an `id`, after `prepare`.
fn computed(dom: &DomTree, id: &str) -> Rc<ComputedProperties> {
    let mut engine =
        LayoutEngine::create(dom, &InlineStyleCascade::new(), LayoutConfig::default()).unwrap();
    engine.prepare(&mut ApproximateResources::new()).unwrap();
    let node = (0..dom.len())
        .map(NodeId)
        .find(|&n| dom.as_element(n).and_then(|e| e.id()) == Some(id))
        .unwrap();
    let box_id = engine.box_for_node(node).unwrap();
    Rc::clone(engine.boxes().computed(box_id).unwrap())
}

/// Helper: a parent with `parent_style` around a child with `child_style`.
fn nested(parent_style: &str, child_style: &str) -> DomTree {
    DomBuilder::new()
        .open("div", &[("id", "parent"), ("style", parent_style)])
        .leaf("div", &[("id", "child"), ("style", child_style)])
        .close()
        .finish()
}

#[test]
fn test_initial_values() {
    let dom = nested("", "");
    let child = computed(&dom, "child");
    assert_eq!(child.font_size, 16.0);
    assert_eq!(child.font_family, "serif");
    assert_eq!(child.width, LengthPercentageAuto::Auto);
    assert_eq!(child.color, Color::BLACK);
    assert!(child.background_color.is_transparent());
    assert_eq!(child.position, Position::Static);
}

#[test]
fn test_em_lengths_use_own_font_size() {
    let dom = nested("font-size: 20px", "width: 2em; font-size: 10px");
    assert_eq!(computed(&dom, "child").width, LengthPercentageAuto::Px(20.0));
}

#[test]
fn test_font_size_em_uses_parent_font_size() {
    let dom = nested("font-size: 20px", "font-size: 1.5em");
    assert_eq!(computed(&dom, "child").font_size, 30.0);
}

#[test]
fn test_font_size_percentage_uses_parent_font_size() {
    let dom = nested("font-size: 20px", "font-size: 50%");
    assert_eq!(computed(&dom, "child").font_size, 10.0);
}

#[test]
fn test_ex_lengths_use_x_height() {
    // The approximate metrics give an x-height of half the font size.
    let dom = nested("", "font-size: 20px; width: 3ex");
    assert_eq!(computed(&dom, "child").width, LengthPercentageAuto::Px(30.0));
}

#[test]
fn test_percentages_stay_percentages() {
    let dom = nested("", "width: 50%");
    assert_eq!(computed(&dom, "child").width, LengthPercentageAuto::Percent(50.0));
}

#[test]
fn test_inherited_properties_flow_down() {
    let dom = nested("color: red; text-align: center; font-size: 12px", "");
    let child = computed(&dom, "child");
    assert_eq!(child.color, Color::rgb(255, 0, 0));
    assert_eq!(child.text_align, TextAlign::Center);
    assert_eq!(child.font_size, 12.0);
}

#[test]
fn test_non_inherited_properties_do_not() {
    let dom = nested("width: 100px; background-color: blue; padding: 4px", "");
    let child = computed(&dom, "child");
    assert_eq!(child.width, LengthPercentageAuto::Auto);
    assert!(child.background_color.is_transparent());
}

#[test]
fn test_explicit_inherit_copies_parent_value() {
    let dom = nested("width: 100px", "width: inherit");
    assert_eq!(computed(&dom, "child").width, LengthPercentageAuto::Px(100.0));
}

#[test]
fn test_invalid_declarations_are_ignored() {
    let dom = nested("", "width: banana; color: #00f; height: -");
    let child = computed(&dom, "child");
    assert_eq!(child.width, LengthPercentageAuto::Auto);
    assert_eq!(child.color, Color::rgb(0, 0, 255));
}

#[test]
fn test_later_declarations_win() {
    let dom = nested("", "color: red; color: green");
    assert_eq!(computed(&dom, "child").color, Color::rgb(0, 128, 0));
}

#[test]
fn test_border_width_needs_a_style() {
    let dom = nested("", "border-width: 5px");
    let child = computed(&dom, "child");
    assert_eq!(child.border_style.top, BorderStyle::None);
    assert_eq!(child.border_width.top, 0.0);

    let dom = nested("", "border: 5px dashed red");
    let child = computed(&dom, "child");
    assert_eq!(child.border_style.left, BorderStyle::Dashed);
    assert_eq!(child.border_width.left, 5.0);
    assert_eq!(child.border_color.left, Color::rgb(255, 0, 0));
}

#[test]
fn test_line_height_number_inherits_as_number() {
    let dom = nested("font-size: 10px; line-height: 1.5", "font-size: 20px");
    assert_eq!(computed(&dom, "child").used_line_height(), 30.0);
}

#[test]
fn test_floats_and_absolutes_are_blockified() {
    let dom = DomBuilder::new()
        .open("div", &[])
        .leaf("span", &[("id", "floated"), ("style", "float: left")])
        .leaf("span", &[("id", "abs"), ("style", "position: absolute; float: right")])
        .close()
        .finish();
    assert_eq!(computed(&dom, "floated").display, Display::Block);
    let abs = computed(&dom, "abs");
    assert_eq!(abs.display, Display::Block);
    assert_eq!(abs.float, Float::None);
}

#[test]
fn test_root_is_blockified() {
    let dom = DomBuilder::new()
        .open("span", &[("id", "root")])
        .close()
        .finish();
    assert_eq!(computed(&dom, "root").display, Display::Block);
}

#[test]
fn test_configured_default_font() {
    let dom = nested("", "");
    let mut engine = LayoutEngine::create(
        &dom,
        &InlineStyleCascade::new(),
        LayoutConfig {
            default_font_size: 20.0,
            default_font_family: "sans-serif".to_string(),
            ..LayoutConfig::default()
        },
    )
    .unwrap();
    engine.prepare(&mut ApproximateResources::new()).unwrap();
    let root = engine.boxes().root().unwrap();
    let style = engine.boxes().computed(root).unwrap();
    assert_eq!(style.font_size, 20.0);
    assert_eq!(style.font_family, "sans-serif");
}
