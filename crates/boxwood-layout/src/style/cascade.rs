//! The cascaded property interface.
//!
//! [§ 6.4 The cascade](https://www.w3.org/TR/CSS2/cascade.html#cascade)
//!
//! Selector matching and specificity sorting live outside the engine. A
//! [`Cascade`] hands over, per element and pseudo-element, the declarations
//! that apply, already in cascade order: later declarations win.

use std::collections::HashMap;

use boxwood_dom::{DomTree, NodeId};

use super::parse::{Declaration, parse_declaration_block};
use super::values::PseudoElement;

/// Source of cascade-sorted declarations.
pub trait Cascade {
    /// Declarations for `node`, or for its `pseudo` element, lowest priority first.
    fn declarations(
        &self,
        tree: &DomTree,
        node: NodeId,
        pseudo: Option<PseudoElement>,
    ) -> Vec<Declaration>;
}

/// [Appendix D. Default style sheet for HTML 4](https://www.w3.org/TR/CSS2/sample.html)
///
/// The subset that matters for layout. Margins are intentionally absent: the
/// embedder's style sheet is expected to supply them.
const USER_AGENT_RULES: &[(&[&str], &str)] = &[
    (
        &[
            "html", "body", "div", "p", "h1", "h2", "h3", "h4", "h5", "h6", "ul", "ol", "dl",
            "dt", "dd", "section", "article", "header", "footer", "nav", "main", "aside",
            "blockquote", "pre", "form", "address", "hr", "center", "figure", "fieldset",
        ],
        "display: block",
    ),
    (&["li"], "display: list-item"),
    (
        &["head", "script", "style", "title", "meta", "link", "template"],
        "display: none",
    ),
    (&["table"], "display: table"),
    (&["caption"], "display: table-caption"),
    (&["thead"], "display: table-header-group"),
    (&["tbody"], "display: table-row-group"),
    (&["tfoot"], "display: table-footer-group"),
    (&["tr"], "display: table-row"),
    (&["td", "th"], "display: table-cell; vertical-align: middle"),
    (&["th"], "font-weight: bold; text-align: center"),
    (&["col"], "display: table-column"),
    (&["colgroup"], "display: table-column-group"),
    (&["b", "strong"], "font-weight: bold"),
    (&["i", "em", "cite", "var", "address"], "font-style: italic"),
    (&["h1"], "font-size: 2em; font-weight: bold"),
    (&["h2"], "font-size: 1.5em; font-weight: bold"),
    (&["h3"], "font-size: 1.17em; font-weight: bold"),
    (&["h4", "h5", "h6"], "font-weight: bold"),
    (&["pre"], "white-space: pre"),
    (&["center"], "text-align: center"),
    (&["sub"], "vertical-align: sub"),
    (&["sup"], "vertical-align: super"),
    (&["nobr"], "white-space: nowrap"),
];

/// A cascade made of user-agent defaults, `style` attributes and
/// pseudo-element rules registered per node.
///
/// ```
/// use boxwood_dom::DomBuilder;
/// use boxwood_layout::style::cascade::{Cascade, InlineStyleCascade};
///
/// let tree = DomBuilder::new().open("p", &[("style", "color: red")]).close().finish();
/// let p = tree.document_element().unwrap();
/// let decls = InlineStyleCascade::new().declarations(&tree, p, None);
/// assert_eq!(decls.last().unwrap().name, "color");
/// ```
#[derive(Debug, Default)]
pub struct InlineStyleCascade {
    pseudo_rules: HashMap<(NodeId, PseudoElement), Vec<Declaration>>,
}

impl InlineStyleCascade {
    /// A cascade with no pseudo-element rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register declarations for `node::pseudo`, parsed from `css`.
    pub fn add_pseudo_rule(&mut self, node: NodeId, pseudo: PseudoElement, css: &str) {
        self.pseudo_rules
            .entry((node, pseudo))
            .or_default()
            .extend(parse_declaration_block(css));
    }

    /// Builder form of [`add_pseudo_rule`](Self::add_pseudo_rule).
    #[must_use]
    pub fn with_pseudo_rule(mut self, node: NodeId, pseudo: PseudoElement, css: &str) -> Self {
        self.add_pseudo_rule(node, pseudo, css);
        self
    }
}

impl Cascade for InlineStyleCascade {
    fn declarations(
        &self,
        tree: &DomTree,
        node: NodeId,
        pseudo: Option<PseudoElement>,
    ) -> Vec<Declaration> {
        if let Some(pseudo) = pseudo {
            return self
                .pseudo_rules
                .get(&(node, pseudo))
                .cloned()
                .unwrap_or_default();
        }
        let Some(element) = tree.as_element(node) else {
            return Vec::new();
        };

        // STEP 1: User-agent origin.
        let mut declarations: Vec<Declaration> = USER_AGENT_RULES
            .iter()
            .filter(|(tags, _)| tags.iter().any(|tag| element.tag_name.eq_ignore_ascii_case(tag)))
            .flat_map(|(_, css)| parse_declaration_block(css))
            .collect();

        // STEP 2: Author origin, the style attribute.
        // [§ 6.4.3](https://www.w3.org/TR/CSS2/cascade.html#specificity)
        // Declarations in a style attribute have the highest specificity.
        if let Some(style) = element.attr("style") {
            declarations.extend(parse_declaration_block(style));
        }
        declarations
    }
}
