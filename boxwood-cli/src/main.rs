//! Boxwood CLI - lay out and paint JSON documents from the terminal
//!
//! Usage:
//!   boxwood layout <doc.json>            Print the layout tree
//!   boxwood layout <doc.json> -f json    Print box geometry as JSON
//!   boxwood paint <doc.json>             Print the display list as JSON
//!
//! Documents are JSON trees. An element is an object with a `tag`, optional
//! `attrs` and optional `children`; a string is a text node and an object
//! with a `comment` key is a comment:
//!
//! ```json
//! { "tag": "div", "attrs": { "style": "width: 200px" },
//!   "children": ["Hello ", { "tag": "b", "children": ["world"] }] }
//! ```
//!
//! Styles come from `style` attributes. Logging is controlled with
//! `RUST_LOG` (for example `RUST_LOG=boxwood=warn`).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use boxwood_dom::{DomBuilder, DomTree};
use boxwood_layout::layout::inline::line::FragmentKind;
use boxwood_layout::style::cascade::InlineStyleCascade;
use boxwood_layout::{
    ApproximateResources, BoxId, LayoutConfig, LayoutEngine, LayoutId, LayoutKind, LayoutTree,
    Rect, RecordingSurface, Size,
};
use clap::{Parser, Subcommand, ValueEnum};
use owo_colors::{OwoColorize, Style};
use serde::{Deserialize, Serialize};

/// Boxwood - CSS 2.1 layout for JSON documents
#[derive(Parser, Debug)]
#[command(name = "boxwood")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the layout tree for an 800x600 viewport
    boxwood layout page.json

    # Narrow viewport, machine-readable output
    boxwood layout page.json --width 320 --format json

    # Display list with a custom configuration
    boxwood --config boxwood.json paint page.json
"#)]
struct Cli {
    /// Engine configuration (JSON); missing fields keep their defaults
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the maximum element nesting depth
    #[arg(long, global = true, value_name = "N")]
    max_depth: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lay out a document and print the resulting boxes
    Layout {
        #[command(flatten)]
        view: ViewArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Tree)]
        format: Format,

        /// Disable colored tree output
        #[arg(long)]
        plain: bool,
    },
    /// Lay out and paint a document, printing the display list
    Paint {
        #[command(flatten)]
        view: ViewArgs,
    },
}

#[derive(clap::Args, Debug)]
struct ViewArgs {
    /// Path to the JSON document
    #[arg(value_name = "FILE")]
    path: PathBuf,

    /// Viewport width in pixels
    #[arg(long, default_value = "800")]
    width: f32,

    /// Viewport height in pixels
    #[arg(long, default_value = "600")]
    height: f32,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    /// Indented, colored layout tree
    Tree,
    /// One JSON record per laid-out box
    Json,
}

/// A node of the JSON document format.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DocNode {
    Text(String),
    Comment {
        comment: String,
    },
    Element {
        tag: String,
        #[serde(default)]
        attrs: BTreeMap<String, String>,
        #[serde(default)]
        children: Vec<DocNode>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Command::Layout {
            view,
            format,
            plain,
        } => {
            let (dom, engine) = lay_out(&view, config)?;
            let tree = engine
                .layout_tree()
                .context("layout produced no tree")?;
            match format {
                Format::Tree => print_tree(&engine, &dom, tree, plain),
                Format::Json => {
                    let records = box_records(&engine, tree);
                    println!("{}", serde_json::to_string_pretty(&records)?);
                }
            }
        }
        Command::Paint { view } => {
            let mut resources = ApproximateResources::new();
            let mut surface = RecordingSurface::new();
            let dom = load_document(&view.path)?;
            let mut engine = create_engine(&dom, config)?;
            engine
                .layout(&mut surface, &mut resources, view.size())
                .context("layout failed")?;
            engine
                .render(&mut surface, &mut resources)
                .context("painting failed")?;
            println!(
                "{}",
                serde_json::to_string_pretty(surface.display_list())?
            );
        }
    }
    Ok(())
}

impl ViewArgs {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Read the configuration file, then apply command-line overrides.
fn load_config(cli: &Cli) -> Result<LayoutConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config '{}'", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing config '{}'", path.display()))?
        }
        None => LayoutConfig::default(),
    };
    if let Some(depth) = cli.max_depth {
        config.max_depth = depth;
    }
    log::debug!("configuration: {config:?}");
    Ok(config)
}

fn load_document(path: &Path) -> Result<DomTree> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading document '{}'", path.display()))?;
    let root: DocNode = serde_json::from_str(&text)
        .with_context(|| format!("parsing document '{}'", path.display()))?;
    Ok(build_dom(DomBuilder::new(), &root).finish())
}

/// Feed a JSON node and its descendants to the builder.
fn build_dom(builder: DomBuilder, node: &DocNode) -> DomBuilder {
    match node {
        DocNode::Text(text) => builder.text(text),
        DocNode::Comment { comment } => builder.comment(comment),
        DocNode::Element {
            tag,
            attrs,
            children,
        } => {
            let attrs: Vec<(&str, &str)> = attrs
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str()))
                .collect();
            children
                .iter()
                .fold(builder.open(tag, &attrs), build_dom)
                .close()
        }
    }
}

fn create_engine(dom: &DomTree, config: LayoutConfig) -> Result<LayoutEngine> {
    LayoutEngine::create(dom, &InlineStyleCascade::new(), config)
        .context("building the box tree failed")
}

fn lay_out(view: &ViewArgs, config: LayoutConfig) -> Result<(DomTree, LayoutEngine)> {
    let dom = load_document(&view.path)?;
    let mut engine = create_engine(&dom, config)?;
    engine
        .layout(
            &mut RecordingSurface::new(),
            &mut ApproximateResources::new(),
            view.size(),
        )
        .context("layout failed")?;
    Ok((dom, engine))
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Geometry of one laid-out box, as printed by `--format json`.
#[derive(Debug, Serialize)]
struct BoxRecord {
    #[serde(rename = "box")]
    box_id: BoxId,
    name: String,
    display: String,
    depth: usize,
    border_box: Rect,
    content_box: Rect,
}

fn box_records(engine: &LayoutEngine, tree: &LayoutTree) -> Vec<BoxRecord> {
    let mut records = Vec::new();
    let mut stack: Vec<(LayoutId, usize)> = tree.root().into_iter().map(|id| (id, 0)).collect();
    while let Some((id, depth)) = stack.pop() {
        let Some(node) = tree.get(id) else { continue };
        records.push(BoxRecord {
            box_id: node.box_id,
            name: box_name(engine, node.box_id),
            display: format!("{:?}", node.display),
            depth,
            border_box: node.border_box(),
            content_box: node.content_box,
        });
        stack.extend(node.children.iter().rev().map(|&child| (child, depth + 1)));
    }
    records
}

/// Tag name, pseudo-element or `anonymous` for a box.
fn box_name(engine: &LayoutEngine, box_id: BoxId) -> String {
    let Some(element) = engine.boxes().element(box_id) else {
        return "text".to_string();
    };
    match element.pseudo {
        Some(pseudo) => format!("{}::{pseudo}", element.tag_name),
        None if element.is_anonymous() => "anonymous".to_string(),
        None => element.tag_name.clone(),
    }
}

struct Palette {
    name: Style,
    anonymous: Style,
    detail: Style,
    text: Style,
}

impl Palette {
    fn new(plain: bool) -> Self {
        if plain {
            let none = Style::new();
            return Self {
                name: none,
                anonymous: none,
                detail: none,
                text: none,
            };
        }
        Self {
            name: Style::new().cyan().bold(),
            anonymous: Style::new().magenta(),
            detail: Style::new().dimmed(),
            text: Style::new().green(),
        }
    }
}

fn print_tree(engine: &LayoutEngine, dom: &DomTree, tree: &LayoutTree, plain: bool) {
    let viewport = tree.viewport();
    println!(
        "=== Layout Tree (viewport: {}x{}, {} nodes) ===\n",
        viewport.width,
        viewport.height,
        tree.len()
    );
    let palette = Palette::new(plain);
    if let Some(root) = tree.root() {
        print_node(engine, dom, tree, root, 0, &palette);
    }
}

/// Recursively print a layout node, its lines and its children.
fn print_node(
    engine: &LayoutEngine,
    dom: &DomTree,
    tree: &LayoutTree,
    id: LayoutId,
    depth: usize,
    palette: &Palette,
) {
    let Some(node) = tree.get(id) else { return };
    let indent = "  ".repeat(depth);
    let name = box_name(engine, node.box_id);
    let name_style = if name == "anonymous" {
        palette.anonymous
    } else {
        palette.name
    };
    let source = engine
        .boxes()
        .element(node.box_id)
        .and_then(|element| element.node)
        .and_then(|n| dom.as_element(n))
        .and_then(|element| element.id())
        .map(|id| format!("#{id}"))
        .unwrap_or_default();
    let kind = match node.kind {
        LayoutKind::Block => "block",
        LayoutKind::Inline => "inline",
        LayoutKind::Table(_) => "table",
        LayoutKind::TableRowGroup => "row-group",
        LayoutKind::TableRow => "row",
        LayoutKind::TableColumn => "column",
        LayoutKind::Replaced(_) => "replaced",
    };

    println!(
        "{indent}[{}{}] {}",
        name.style(name_style),
        source.style(name_style),
        format!("{kind} {:?}", node.display).style(palette.detail)
    );
    let border = node.border_box();
    println!(
        "{indent}  border: x={:.1} y={:.1} w={:.1} h={:.1}",
        border.x, border.y, border.width, border.height
    );
    if node.content_box != border {
        let content = node.content_box;
        println!(
            "{}",
            format!(
                "{indent}  content: x={:.1} y={:.1} w={:.1} h={:.1}",
                content.x, content.y, content.width, content.height
            )
            .style(palette.detail)
        );
    }

    if let Some(inline) = &node.inline_content {
        for line in &inline.lines {
            let texts: Vec<&str> = line
                .fragments
                .iter()
                .filter_map(|fragment| match &fragment.kind {
                    FragmentKind::Text { text, .. } => Some(text.as_str()),
                    _ => None,
                })
                .collect();
            println!(
                "{indent}  line y={:.1} h={:.1} {}",
                line.rect.y,
                line.rect.height,
                format!("{:?}", texts.concat()).style(palette.text)
            );
        }
    }

    for &child in &node.children {
        print_node(engine, dom, tree, child, depth + 1, palette);
    }
}
