//! Integration tests for painting and paint order.
//!
//! [CSS 2.1 Appendix E](https://www.w3.org/TR/CSS2/zindex.html)

use boxwood_dom::{DomBuilder, DomTree};
use boxwood_layout::style::cascade::InlineStyleCascade;
use boxwood_layout::style::values::Color;
use boxwood_layout::{
    ApproximateResources, DisplayCommand, LayoutConfig, LayoutEngine, PaintStep, Rect,
    RecordingSurface, Size,
};

/// Helper: lay out and render a document, returning the recorded commands
/// and the surface's clip depth after painting.
fn render(dom: &DomTree) -> (Vec<DisplayCommand>, usize) {
    render_with(dom, ApproximateResources::new())
}

fn render_with(dom: &DomTree, mut resources: ApproximateResources) -> (Vec<DisplayCommand>, usize) {
    let mut engine =
        LayoutEngine::create(dom, &InlineStyleCascade::new(), LayoutConfig::default()).unwrap();
    let mut surface = RecordingSurface::new();
    engine
        .layout(&mut surface, &mut resources, Size::new(800.0, 600.0))
        .unwrap();
    engine.render(&mut surface, &mut resources).unwrap();
    let depth = surface.clip_depth();
    (surface.take_display_list().commands().to_vec(), depth)
}

/// Helper: fill colors in paint order.
fn fill_colors(commands: &[DisplayCommand]) -> Vec<Color> {
    commands
        .iter()
        .filter_map(|c| match c {
            DisplayCommand::Fill { color, .. } => Some(*color),
            _ => None,
        })
        .collect()
}

fn position_of(commands: &[DisplayCommand], wanted: impl Fn(&DisplayCommand) -> bool) -> usize {
    commands.iter().position(wanted).unwrap()
}

const RED: Color = Color::rgb(255, 0, 0);
const GREEN: Color = Color::rgb(0, 255, 0);
const BLUE: Color = Color::rgb(0, 0, 255);
const YELLOW: Color = Color::rgb(255, 255, 0);

#[test]
fn test_root_background_covers_the_canvas() {
    let dom = DomBuilder::new()
        .open("div", &[("style", "background-color: #f00; height: 50px")])
        .leaf("div", &[("style", "background-color: #00f; height: 10px")])
        .close()
        .finish();
    let (commands, _) = render(&dom);
    assert_eq!(
        commands,
        vec![
            DisplayCommand::Fill {
                rect: Rect::new(0.0, 0.0, 800.0, 600.0),
                color: RED,
            },
            DisplayCommand::Fill {
                rect: Rect::new(0.0, 0.0, 800.0, 10.0),
                color: BLUE,
            },
        ]
    );
}

#[test]
fn test_stack_levels_order_painting() {
    let dom = DomBuilder::new()
        .open("div", &[])
        .leaf(
            "div",
            &[("style", "position: absolute; z-index: 2; width: 10px; height: 10px; background-color: #00f")],
        )
        .leaf(
            "div",
            &[("style", "position: absolute; z-index: 1; width: 10px; height: 10px; background-color: #0f0")],
        )
        .leaf("div", &[("style", "height: 10px; background-color: #f00")])
        .leaf(
            "div",
            &[("style", "position: absolute; z-index: -1; width: 10px; height: 10px; background-color: #ff0")],
        )
        .close()
        .finish();
    let (commands, _) = render(&dom);
    assert_eq!(fill_colors(&commands), vec![YELLOW, RED, GREEN, BLUE]);
}

#[test]
fn test_auto_positioned_boxes_paint_after_in_flow_content() {
    let dom = DomBuilder::new()
        .open("div", &[])
        .leaf(
            "div",
            &[("style", "position: relative; height: 10px; background-color: #00f")],
        )
        .leaf("div", &[("style", "height: 10px; background-color: #f00")])
        .close()
        .finish();
    let (commands, _) = render(&dom);
    assert_eq!(fill_colors(&commands), vec![RED, BLUE]);
}

#[test]
fn test_floats_paint_between_blocks_and_text() {
    let dom = DomBuilder::new()
        .open("div", &[])
        .leaf("div", &[("style", "float: left; width: 10px; height: 10px; background-color: #00f")])
        .leaf("div", &[("style", "height: 5px; background-color: #f00")])
        .open("div", &[])
        .text("x")
        .close()
        .close()
        .finish();
    let (commands, _) = render(&dom);
    let red = position_of(&commands, |c| matches!(c, DisplayCommand::Fill { color, .. } if *color == RED));
    let blue = position_of(&commands, |c| matches!(c, DisplayCommand::Fill { color, .. } if *color == BLUE));
    let text = position_of(&commands, |c| matches!(c, DisplayCommand::Text { .. }));
    assert!(red < blue);
    assert!(blue < text);
}

#[test]
fn test_text_is_drawn_on_its_baseline() {
    // 10px text with 'line-height: normal' (12px): the baseline sits at the
    // 8px ascent plus 1px of half-leading.
    let dom = DomBuilder::new()
        .open("div", &[("style", "font-size: 10px; color: #00f")])
        .text("hello")
        .close()
        .finish();
    let (commands, _) = render(&dom);
    let [DisplayCommand::Text { x, y, text, size, color, .. }] = commands.as_slice() else {
        panic!("expected one text command, got {commands:?}");
    };
    assert_eq!(text, "hello");
    assert!((x - 0.0).abs() < 0.01);
    assert!((y - 9.0).abs() < 0.01);
    assert!((size - 10.0).abs() < 0.01);
    assert_eq!(*color, BLUE);
}

#[test]
fn test_hidden_boxes_do_not_paint_but_visible_children_do() {
    let dom = DomBuilder::new()
        .open("div", &[])
        .open("div", &[("style", "visibility: hidden; background-color: #f00")])
        .leaf(
            "div",
            &[("style", "visibility: visible; height: 10px; background-color: #00f")],
        )
        .close()
        .close()
        .finish();
    let (commands, _) = render(&dom);
    assert_eq!(fill_colors(&commands), vec![BLUE]);
}

#[test]
fn test_overflow_hidden_clips_to_padding_box() {
    let dom = DomBuilder::new()
        .open("div", &[])
        .open(
            "div",
            &[("style", "overflow: hidden; width: 50px; height: 20px; padding: 5px; border: 1px solid black")],
        )
        .leaf("div", &[("style", "height: 100px; background-color: #f00")])
        .close()
        .close()
        .finish();
    let (commands, depth) = render(&dom);
    assert_eq!(depth, 0);
    let pushes: Vec<Rect> = commands
        .iter()
        .filter_map(|c| match c {
            DisplayCommand::PushClip { rect } => Some(*rect),
            _ => None,
        })
        .collect();
    let pops = commands
        .iter()
        .filter(|c| matches!(c, DisplayCommand::PopClip))
        .count();
    assert!(!pushes.is_empty());
    assert_eq!(pushes.len(), pops);
    assert!(pushes.iter().all(|r| *r == Rect::new(1.0, 1.0, 60.0, 30.0)));

    // The child's background is drawn inside the clip.
    let push = position_of(&commands, |c| matches!(c, DisplayCommand::PushClip { .. }));
    let fill = position_of(&commands, |c| matches!(c, DisplayCommand::Fill { color, .. } if *color == RED));
    let pop = position_of(&commands, |c| matches!(c, DisplayCommand::PopClip));
    assert!(push < fill && fill < pop);
}

#[test]
fn test_solid_border_paints_four_strips() {
    let dom = DomBuilder::new()
        .open("div", &[])
        .leaf(
            "div",
            &[("style", "width: 100px; height: 10px; border: 2px solid #00f")],
        )
        .close()
        .finish();
    let (commands, _) = render(&dom);
    let fills: Vec<Rect> = commands
        .iter()
        .filter_map(|c| match c {
            DisplayCommand::Fill { rect, color } if *color == BLUE => Some(*rect),
            _ => None,
        })
        .collect();
    assert_eq!(fills.len(), 4);
    assert!(fills.contains(&Rect::new(0.0, 0.0, 104.0, 2.0)));
    assert!(fills.contains(&Rect::new(0.0, 12.0, 104.0, 2.0)));
}

#[test]
fn test_background_image_is_drawn_at_its_size() {
    let dom = DomBuilder::new()
        .open("div", &[])
        .leaf(
            "div",
            &[(
                "style",
                "width: 100px; height: 50px; background-image: url(tile.png); background-repeat: no-repeat",
            )],
        )
        .close()
        .finish();
    let mut resources = ApproximateResources::new();
    resources.add_image("tile.png", 20.0, 10.0);
    let (commands, depth) = render_with(&dom, resources);
    assert_eq!(depth, 0);
    assert!(commands.contains(&DisplayCommand::Image {
        url: "tile.png".to_string(),
        rect: Rect::new(0.0, 0.0, 20.0, 10.0),
    }));
}

#[test]
fn test_missing_image_draws_nothing() {
    let dom = DomBuilder::new()
        .open("div", &[])
        .leaf("img", &[("src", "missing.png"), ("width", "40"), ("height", "20")])
        .close()
        .finish();
    let (commands, depth) = render_with(&dom, ApproximateResources::new());
    assert!(!commands
        .iter()
        .any(|c| matches!(c, DisplayCommand::Image { .. })));
    assert_eq!(depth, 0);
}

#[test]
fn test_stacking_order_lists_layers() {
    let dom = DomBuilder::new()
        .open("div", &[])
        .leaf("div", &[("style", "position: absolute; z-index: 3")])
        .leaf("div", &[("style", "position: relative")])
        .close()
        .finish();
    let mut engine =
        LayoutEngine::create(&dom, &InlineStyleCascade::new(), LayoutConfig::default()).unwrap();
    let mut resources = ApproximateResources::new();
    let mut surface = RecordingSurface::new();
    engine
        .layout(&mut surface, &mut resources, Size::new(800.0, 600.0))
        .unwrap();
    let order = engine.stacking_order().unwrap();
    assert_eq!(order.len(), 3);
    assert!(matches!(order[0], PaintStep::Layer(_)));
    assert!(matches!(order[1], PaintStep::Positioned(_)));
    assert!(matches!(order[2], PaintStep::Layer(_)));
}

#[test]
fn test_display_list_serializes_to_json() {
    let dom = DomBuilder::new()
        .open("div", &[("style", "background-color: #f00")])
        .close()
        .finish();
    let (commands, _) = render(&dom);
    let json = serde_json::to_value(&commands).unwrap();
    assert_eq!(json[0]["op"], "fill");
    assert_eq!(json[0]["rect"]["width"], 800.0);
}
