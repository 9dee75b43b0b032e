//! Anonymous table objects.
//!
//! [§ 17.2.1 Anonymous table objects](https://www.w3.org/TR/CSS2/tables.html#anonymous-boxes)
//!
//! "Document languages other than HTML may not contain all the elements in
//! the CSS 2.1 table model. In these cases, the 'missing' elements must be
//! assumed in order for the table model to work."

use std::rc::Rc;

use crate::error::Result;
use crate::resources::ResourceCache;
use crate::style::compute::compute;
use crate::style::parse::Declaration;
use crate::style::properties::ComputedProperties;
use crate::style::values::Display;

use super::{BoxId, BoxKind, BoxTree, ElementBox};

fn display_of(tree: &BoxTree, id: BoxId) -> Option<Display> {
    tree.element(id).map(|e| e.computed.display)
}

fn is_whitespace_text(tree: &BoxTree, id: BoxId) -> bool {
    tree.text(id)
        .is_some_and(|t| t.text.chars().all(char::is_whitespace))
}

/// Complete the table structure of the whole tree.
///
/// The tree is walked top-down with a work stack. Each visited box gets its
/// children fixed up first, then the (possibly new) children are visited, so
/// wrappers created here are completed in turn.
///
/// # Errors
///
/// Propagates [`compute`] failures for the new boxes.
pub fn generate_anonymous_tables(
    tree: &mut BoxTree,
    resources: &mut dyn ResourceCache,
    initial: &ComputedProperties,
) -> Result<()> {
    let mut stack: Vec<BoxId> = tree.root().into_iter().collect();
    while let Some(parent) = stack.pop() {
        let Some(parent_display) = display_of(tree, parent) else {
            continue;
        };
        fix_children(tree, resources, initial, parent, parent_display)?;
        stack.extend(
            tree.children(parent)
                .iter()
                .rev()
                .copied()
                .filter(|&c| tree.element(c).is_some()),
        );
    }
    Ok(())
}

fn fix_children(
    tree: &mut BoxTree,
    resources: &mut dyn ResourceCache,
    initial: &ComputedProperties,
    parent: BoxId,
    parent_display: Display,
) -> Result<()> {
    let children = tree.children(parent).to_vec();

    // "If a child C of a 'table' or 'inline-table' box is not a proper
    // table child, ... " whitespace-only text between table parts is
    // dropped rather than wrapped.
    if parent_display.is_table()
        || parent_display.is_row_group()
        || parent_display == Display::TableRow
        || matches!(parent_display, Display::TableColumn | Display::TableColumnGroup)
    {
        for &child in &children {
            if is_whitespace_text(tree, child) {
                tree.remove(child)?;
            }
        }
    }

    match parent_display {
        // [§ 17.2.1 rule 1](https://www.w3.org/TR/CSS2/tables.html#anonymous-boxes)
        // "All child boxes of a 'table-column' parent are treated as if they
        // had 'display: none'."
        Display::TableColumn => {
            for child in tree.children(parent).to_vec() {
                tree.remove(child)?;
            }
        }
        // "If a child C of a 'table-column-group' parent is not a
        // 'table-column' box, then it is treated as if it had 'display: none'."
        Display::TableColumnGroup => {
            for child in tree.children(parent).to_vec() {
                if display_of(tree, child) != Some(Display::TableColumn) {
                    tree.remove(child)?;
                }
            }
        }
        // Rule: non-caption, non-row-group, non-row children of a table are
        // wrapped in an anonymous row.
        Display::Table | Display::InlineTable => {
            wrap_runs(tree, resources, initial, parent, Display::TableRow, |d| {
                !matches!(
                    d,
                    Some(
                        Display::TableCaption
                            | Display::TableRowGroup
                            | Display::TableHeaderGroup
                            | Display::TableFooterGroup
                            | Display::TableRow
                            | Display::TableColumn
                            | Display::TableColumnGroup
                    )
                )
            })?;
        }
        // "If a child C of a row group box is not a 'table-row' box, then
        // generate an anonymous 'table-row' box around C and all consecutive
        // siblings of C that are not 'table-row' boxes."
        Display::TableRowGroup | Display::TableHeaderGroup | Display::TableFooterGroup => {
            wrap_runs(tree, resources, initial, parent, Display::TableRow, |d| {
                d != Some(Display::TableRow)
            })?;
        }
        // "If a child C of a 'table-row' box is not a 'table-cell', then
        // generate an anonymous 'table-cell' box around C and all consecutive
        // siblings of C that are not 'table-cell' boxes."
        Display::TableRow => {
            wrap_runs(tree, resources, initial, parent, Display::TableCell, |d| {
                d != Some(Display::TableCell)
            })?;
        }
        _ => {
            // [§ 17.2.1 rule 2](https://www.w3.org/TR/CSS2/tables.html#anonymous-boxes)
            // "If a child C of a 'table-row' parent is ... a 'table-cell' box
            // whose parent is not a 'table-row', generate an anonymous
            // 'table-row' box around C and all consecutive siblings of C that
            // are 'table-cell' boxes."
            wrap_runs(tree, resources, initial, parent, Display::TableRow, |d| {
                d == Some(Display::TableCell)
            })?;
            // "If a box B is a proper table child that is misparented, then
            // generate an anonymous 'table' or 'inline-table' box T around B
            // and all consecutive siblings of B that are proper table children."
            let table = if parent_display == Display::Inline {
                Display::InlineTable
            } else {
                Display::Table
            };
            wrap_runs(tree, resources, initial, parent, table, |d| {
                matches!(
                    d,
                    Some(
                        Display::TableCaption
                            | Display::TableRowGroup
                            | Display::TableHeaderGroup
                            | Display::TableFooterGroup
                            | Display::TableRow
                            | Display::TableColumn
                            | Display::TableColumnGroup
                    )
                )
            })?;
        }
    }
    Ok(())
}

/// Wrap every maximal run of children matching `needs_wrap` in a new
/// anonymous box with the given `display`.
fn wrap_runs(
    tree: &mut BoxTree,
    resources: &mut dyn ResourceCache,
    initial: &ComputedProperties,
    parent: BoxId,
    display: Display,
    needs_wrap: impl Fn(Option<Display>) -> bool,
) -> Result<()> {
    let children = tree.children(parent).to_vec();
    let mut runs: Vec<Vec<BoxId>> = Vec::new();
    let mut current: Vec<BoxId> = Vec::new();
    for child in children {
        if needs_wrap(display_of(tree, child)) {
            current.push(child);
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }

    for run in runs {
        let wrapper = anonymous_box(tree, resources, initial, display)?;
        tree.insert_before(parent, wrapper, run[0])?;
        for child in run {
            tree.detach(child)?;
            tree.append_child(wrapper, child)?;
        }
        #[cfg(feature = "layout-trace")]
        log::trace!(target: "boxwood::box_tree", "anonymous {display:?} {wrapper} under {parent}");
    }
    Ok(())
}

/// A new detached anonymous box whose only declaration is `display`.
///
/// The box inherits nothing: every other property takes its initial value.
/// Boxes moved inside it keep the values they computed under their source
/// parent.
///
/// # Errors
///
/// Propagates [`compute`] failures.
pub fn anonymous_box(
    tree: &mut BoxTree,
    resources: &mut dyn ResourceCache,
    initial: &ComputedProperties,
    display: Display,
) -> Result<BoxId> {
    let keyword = display_keyword(display);
    let mut element = ElementBox::new(None, "", vec![Declaration::new("display", keyword)]);
    element.computed = Rc::new(compute(&element.properties, None, resources, initial)?);
    Ok(tree.alloc(BoxKind::Element(element)))
}

fn display_keyword(display: Display) -> &'static str {
    match display {
        Display::Table => "table",
        Display::InlineTable => "inline-table",
        Display::TableRow => "table-row",
        Display::TableCell => "table-cell",
        Display::TableRowGroup => "table-row-group",
        Display::Inline => "inline",
        _ => "block",
    }
}
