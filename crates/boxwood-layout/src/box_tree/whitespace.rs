//! Whitespace processing.
//!
//! [§ 16.6.1 The 'white-space' processing model](https://www.w3.org/TR/CSS2/text.html#white-space-model)
//!
//! Text is processed per block container. The container's inline content is
//! walked in document order, descending into non-atomic inline elements
//! only; block-level children and forced breaks are line boundaries.

use crate::error::Result;
use crate::style::values::{Display, WhiteSpace};

use super::{BoxId, BoxKind, BoxTree};

/// What the walk meets inside one block container.
enum Item {
    Text(BoxId, WhiteSpace),
    /// An atomic inline: behaves like one non-space character.
    Atomic,
    /// A block-level child or a `<br>`.
    Boundary,
}

/// [§ 16.6.1](https://www.w3.org/TR/CSS2/text.html#white-space-model)
///
/// Collapse one text run in isolation.
///
/// - "If 'white-space' is set to 'normal', 'nowrap', or 'pre-line', ... each
///   tab (U+0009) is converted to a space (U+0020)" and "any space (U+0020)
///   following another space (U+0020) ... is removed."
/// - Newlines become spaces unless `pre-line`, where spaces around them are
///   removed instead.
/// - `pre` and `pre-wrap` text is left alone.
#[must_use]
pub fn collapse(text: &str, white_space: WhiteSpace) -> String {
    if !white_space.collapses_spaces() {
        return text.to_string();
    }
    let keep_newlines = white_space.preserves_newlines();
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        let c = match c {
            '\r' => continue,
            '\t' => ' ',
            '\n' if !keep_newlines => ' ',
            c => c,
        };
        match c {
            ' ' if out.ends_with(' ') || out.ends_with('\n') => {}
            '\n' => {
                // "All spaces and tabs immediately preceding or following a
                // line feed character are removed."
                while out.ends_with(' ') {
                    let _ = out.pop();
                }
                out.push('\n');
            }
            c => out.push(c),
        }
    }
    out
}

/// Process every text box in the tree and drop the ones left empty.
///
/// Each text is re-derived from its source, so running this twice gives the
/// same result.
///
/// # Errors
///
/// Only fails on a corrupt tree (stale ids reached through child lists).
pub fn process_whitespace(tree: &mut BoxTree) -> Result<()> {
    let containers: Vec<BoxId> = tree
        .iter()
        .filter(|&id| tree.element(id).is_some() && !is_inline_flow(tree, id))
        .collect();

    let mut empty = Vec::new();
    for container in containers {
        let items = inline_items(tree, container);
        process_container(tree, &items, &mut empty)?;
    }

    for id in empty {
        if tree.contains(id) {
            tree.remove(id)?;
        }
    }
    Ok(())
}

/// A non-atomic inline element in flow: its text belongs to the enclosing
/// block container.
fn is_inline_flow(tree: &BoxTree, id: BoxId) -> bool {
    tree.element(id).is_some_and(|e| {
        let c = &e.computed;
        c.display == Display::Inline
            && !c.is_floated()
            && !c.position.is_out_of_flow()
            && !e.is_replaced()
    })
}

fn inline_items(tree: &BoxTree, container: BoxId) -> Vec<Item> {
    let mut items = Vec::new();
    let mut stack: Vec<BoxId> = tree.children(container).iter().rev().copied().collect();
    while let Some(id) = stack.pop() {
        match tree.get(id).map(|n| &n.kind) {
            Ok(BoxKind::Text(_)) => {
                let white_space = tree
                    .computed(id)
                    .map_or(WhiteSpace::Normal, |c| c.white_space);
                items.push(Item::Text(id, white_space));
            }
            Ok(BoxKind::Element(element)) => {
                let c = &element.computed;
                if c.is_floated() || c.position.is_out_of_flow() {
                    continue;
                }
                if element.is_tag("br") {
                    items.push(Item::Boundary);
                } else if is_inline_flow(tree, id) {
                    stack.extend(tree.children(id).iter().rev().copied());
                } else if c.display.is_inline_level() {
                    items.push(Item::Atomic);
                } else {
                    items.push(Item::Boundary);
                }
            }
            Err(_) => {}
        }
    }
    items
}

fn process_container(tree: &mut BoxTree, items: &[Item], empty: &mut Vec<BoxId>) -> Result<()> {
    // True at a line start, or after text ending in a collapsible space.
    let mut after_space = true;
    // The last collapsible text, if nothing but collapsible text followed it.
    let mut trailing: Option<BoxId> = None;

    for item in items {
        match *item {
            Item::Text(id, white_space) => {
                let Some(source) = tree.text(id).map(|t| t.source.clone()) else {
                    continue;
                };
                let mut text = collapse(&source, white_space);
                if !white_space.collapses_spaces() {
                    // Preserved text is skipped by the neighbour checks.
                    set_text(tree, id, text, empty)?;
                    continue;
                }
                if after_space && text.starts_with(' ') {
                    let _ = text.remove(0);
                }
                if !text.is_empty() {
                    after_space = text.ends_with(' ') || text.ends_with('\n');
                    trailing = Some(id);
                }
                set_text(tree, id, text, empty)?;
            }
            Item::Atomic => {
                after_space = false;
                trailing = None;
            }
            Item::Boundary => {
                strip_trailing(tree, trailing.take(), empty)?;
                after_space = true;
            }
        }
    }
    strip_trailing(tree, trailing, empty)
}

fn strip_trailing(tree: &mut BoxTree, id: Option<BoxId>, empty: &mut Vec<BoxId>) -> Result<()> {
    let Some(id) = id else {
        return Ok(());
    };
    let Some(mut text) = tree.text(id).map(|t| t.text.clone()) else {
        return Ok(());
    };
    if text.ends_with(' ') {
        let _ = text.pop();
        set_text(tree, id, text, empty)?;
    }
    Ok(())
}

fn set_text(tree: &mut BoxTree, id: BoxId, text: String, empty: &mut Vec<BoxId>) -> Result<()> {
    if text.is_empty() && !empty.contains(&id) {
        empty.push(id);
    }
    if let BoxKind::Text(t) = &mut tree.get_mut(id)?.kind {
        t.text = text;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapse_normal_turns_newlines_into_spaces() {
        assert_eq!(collapse("a \n\t b", WhiteSpace::Normal), "a b");
    }

    #[test]
    fn collapse_pre_line_keeps_newlines() {
        assert_eq!(collapse("a  \n  b", WhiteSpace::PreLine), "a\nb");
    }

    #[test]
    fn collapse_pre_is_untouched() {
        assert_eq!(collapse("a  \n  b", WhiteSpace::Pre), "a  \n  b");
    }
}
