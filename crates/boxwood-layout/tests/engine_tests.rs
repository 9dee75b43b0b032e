//! Integration tests for the engine life cycle, hit testing and selection.

use boxwood_dom::{DomBuilder, DomTree, NodeId};
use boxwood_layout::style::cascade::InlineStyleCascade;
use boxwood_layout::{
    ApproximateResources, BoxId, DisplayCommand, HitResult, HitZone, LayoutConfig, LayoutEngine,
    LayoutError, Point, RecordingSurface, Size, TextPosition,
};

struct Harness {
    engine: LayoutEngine,
    resources: ApproximateResources,
    surface: RecordingSurface,
}

impl Harness {
    fn new(dom: &DomTree) -> Self {
        let engine =
            LayoutEngine::create(dom, &InlineStyleCascade::new(), LayoutConfig::default()).unwrap();
        Self {
            engine,
            resources: ApproximateResources::new(),
            surface: RecordingSurface::new(),
        }
    }

    fn layout(&mut self) {
        self.engine
            .layout(&mut self.surface, &mut self.resources, Size::new(800.0, 600.0))
            .unwrap();
    }

    fn hit(&mut self, x: f32, y: f32) -> HitResult {
        self.engine
            .hit_test(&mut self.surface, &mut self.resources, Point::new(x, y))
            .unwrap()
    }

    fn render(&mut self) -> Vec<DisplayCommand> {
        let _ = self.surface.take_display_list();
        self.engine
            .render(&mut self.surface, &mut self.resources)
            .unwrap();
        self.surface.take_display_list().commands().to_vec()
    }
}

/// Helper: a single 10px paragraph "hello". Text advances 6px per character.
fn hello() -> DomTree {
    DomBuilder::new()
        .open("div", &[("id", "p"), ("style", "font-size: 10px")])
        .text("hello")
        .close()
        .finish()
}

/// Helper: the box of the first text node in the document.
fn text_box(harness: &Harness, dom: &DomTree) -> BoxId {
    let node = (0..dom.len())
        .map(NodeId)
        .find(|&n| dom.as_text(n).is_some())
        .unwrap();
    harness.engine.box_for_node(node).unwrap()
}

// ---------------------------------------------------------------------------
// Life cycle
// ---------------------------------------------------------------------------

#[test]
fn test_queries_before_layout_fail() {
    let dom = hello();
    let mut harness = Harness::new(&dom);
    let Harness {
        engine,
        resources,
        surface,
    } = &mut harness;
    assert_eq!(engine.render(surface, resources), Err(LayoutError::NotLaidOut));
    assert_eq!(
        engine.hit_test(surface, resources, Point::new(0.0, 0.0)),
        Err(LayoutError::NotLaidOut)
    );
    assert_eq!(engine.stacking_order(), Err(LayoutError::NotLaidOut));
    assert!(engine.get_content_box(dom.document_element().unwrap()).is_none());
}

#[test]
fn test_layout_prepares_on_demand() {
    let dom = hello();
    let mut harness = Harness::new(&dom);
    harness.layout();
    assert!(harness.engine.layout_tree().is_some());
    let content = harness
        .engine
        .get_content_box(dom.document_element().unwrap())
        .unwrap();
    assert_eq!((content.x, content.y, content.width), (0.0, 0.0, 800.0));
    assert!((content.height - 12.0).abs() < 0.01);
}

#[test]
fn test_layout_twice_gives_the_same_geometry() {
    let dom = hello();
    let mut harness = Harness::new(&dom);
    harness.layout();
    let first = harness.render();
    harness.layout();
    let second = harness.render();
    assert_eq!(first, second);
}

#[test]
fn test_viewport_width_drives_layout() {
    let dom = hello();
    let mut harness = Harness::new(&dom);
    harness
        .engine
        .layout(&mut harness.surface, &mut harness.resources, Size::new(300.0, 200.0))
        .unwrap();
    let content = harness
        .engine
        .get_content_box(dom.document_element().unwrap())
        .unwrap();
    assert_eq!(content.width, 300.0);
}

#[test]
fn test_editing_boxes_discards_the_layout() {
    let dom = hello();
    let mut harness = Harness::new(&dom);
    harness.layout();
    let _ = harness.engine.boxes_mut();
    assert!(harness.engine.layout_tree().is_none());
    assert_eq!(
        harness.engine.render(&mut harness.surface, &mut harness.resources),
        Err(LayoutError::NotLaidOut)
    );
    harness.layout();
    assert!(harness.engine.layout_tree().is_some());
}

#[test]
fn test_removed_box_disappears_after_relayout() {
    let dom = DomBuilder::new()
        .open("div", &[])
        .leaf("div", &[("id", "a"), ("style", "height: 10px")])
        .leaf("div", &[("id", "b"), ("style", "height: 10px")])
        .close()
        .finish();
    let a = NodeId(2);
    let b = NodeId(3);
    assert_eq!(dom.as_element(a).and_then(|e| e.id()), Some("a"));
    let mut harness = Harness::new(&dom);
    harness.layout();
    assert_eq!(harness.engine.get_content_box(b).map(|r| r.y), Some(10.0));

    let a_box = harness.engine.box_for_node(a).unwrap();
    harness.engine.boxes_mut().remove(a_box).unwrap();
    harness.layout();
    assert!(harness.engine.get_content_box(a).is_none());
    assert_eq!(harness.engine.get_content_box(b).map(|r| r.y), Some(0.0));
}

#[test]
fn test_empty_document_lays_out_to_nothing() {
    let dom = DomBuilder::new().finish();
    let mut harness = Harness::new(&dom);
    harness.layout();
    assert!(harness.render().is_empty());
    assert_eq!(harness.hit(10.0, 10.0).zone, HitZone::NoObjects);
    assert!(harness.engine.stacking_order().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Hit testing
// ---------------------------------------------------------------------------

#[test]
fn test_hit_inside_text_finds_the_character() {
    let dom = hello();
    let mut harness = Harness::new(&dom);
    harness.layout();
    let text = text_box(&harness, &dom);

    // x = 13 is past the middle of "e" (6..12) and before the middle of
    // the first "l" (12..18).
    let hit = harness.hit(13.0, 5.0);
    assert_eq!(hit.zone, HitZone::Inside);
    assert_eq!(hit.node, Some(text));
    assert_eq!(hit.text_offset, 2);

    let hit = harness.hit(1.0, 5.0);
    assert_eq!(hit.text_offset, 0);
    let hit = harness.hit(29.0, 5.0);
    assert_eq!(hit.text_offset, 5);
}

#[test]
fn test_hit_beside_text_finds_the_block() {
    let dom = hello();
    let mut harness = Harness::new(&dom);
    harness.layout();
    let hit = harness.hit(400.0, 5.0);
    assert_eq!(hit.zone, HitZone::Inside);
    assert_eq!(hit.node, harness.engine.boxes().root());
}

#[test]
fn test_hit_below_content_snaps_to_the_end() {
    let dom = hello();
    let mut harness = Harness::new(&dom);
    harness.layout();
    let text = text_box(&harness, &dom);
    let hit = harness.hit(5.0, 300.0);
    assert_eq!(hit.zone, HitZone::OutsideBottom);
    assert_eq!(hit.node, Some(text));
    assert_eq!(hit.text_offset, 5);
}

#[test]
fn test_hit_prefers_higher_stack_levels() {
    let dom = DomBuilder::new()
        .open("div", &[])
        .leaf("div", &[("id", "under"), ("style", "height: 50px")])
        .leaf(
            "div",
            &[("id", "over"), ("style", "position: absolute; left: 0; top: 0; width: 20px; height: 20px")],
        )
        .close()
        .finish();
    let mut harness = Harness::new(&dom);
    harness.layout();
    let over = harness.engine.box_for_node(NodeId(3)).unwrap();
    let under = harness.engine.box_for_node(NodeId(2)).unwrap();
    assert_eq!(harness.hit(10.0, 10.0).node, Some(over));
    assert_eq!(harness.hit(30.0, 10.0).node, Some(under));
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

#[test]
fn test_selection_paints_highlight_behind_text() {
    let dom = hello();
    let mut harness = Harness::new(&dom);
    harness.layout();
    let text = text_box(&harness, &dom);
    harness.engine.set_selection(text, 3, text, 1).unwrap();

    let selection = harness.engine.selection().unwrap();
    assert_eq!(selection.start(), TextPosition::new(text, 1));
    assert_eq!(selection.end(), TextPosition::new(text, 3));
    assert!(!selection.is_collapsed());

    let commands = harness.render();
    let highlight_color = LayoutConfig::default().selection_color;
    let is_highlight = |command: &DisplayCommand| {
        matches!(command, DisplayCommand::Fill { color, .. } if *color == highlight_color)
    };
    let highlight = commands.iter().position(is_highlight).unwrap();
    let DisplayCommand::Fill { rect, .. } = &commands[highlight] else {
        unreachable!();
    };
    assert!((rect.x - 6.0).abs() < 0.01);
    assert!((rect.width - 12.0).abs() < 0.01);
    let text_command = commands
        .iter()
        .position(|c| matches!(c, DisplayCommand::Text { .. }))
        .unwrap();
    assert!(highlight < text_command);

    harness.engine.clear_selection();
    let commands = harness.render();
    assert!(!commands.iter().any(is_highlight));
}

#[test]
fn test_selection_spans_text_boxes() {
    let dom = DomBuilder::new()
        .open("div", &[])
        .text("abc ")
        .open("b", &[])
        .text("def ")
        .close()
        .text("ghi")
        .close()
        .finish();
    let mut harness = Harness::new(&dom);
    harness.layout();
    let texts: Vec<BoxId> = (0..dom.len())
        .map(NodeId)
        .filter(|&n| dom.as_text(n).is_some())
        .map(|n| harness.engine.box_for_node(n).unwrap())
        .collect();
    harness.engine.set_selection(texts[0], 2, texts[2], 1).unwrap();
    let selection = harness.engine.selection().unwrap();
    assert_eq!(selection.range_for(texts[0]), Some((2, 4)));
    assert_eq!(selection.range_for(texts[1]), Some((0, 4)));
    assert_eq!(selection.range_for(texts[2]), Some((0, 1)));
}

#[test]
fn test_selection_rejects_stale_boxes() {
    let dom = hello();
    let mut harness = Harness::new(&dom);
    harness.layout();
    let text = text_box(&harness, &dom);
    harness.engine.boxes_mut().remove(text).unwrap();
    assert_eq!(
        harness.engine.set_selection(text, 0, text, 1),
        Err(LayoutError::StaleBox(text))
    );
}
