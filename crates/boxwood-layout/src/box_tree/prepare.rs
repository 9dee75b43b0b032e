//! Preparing a box tree for layout.
//!
//! Four passes run in a fixed order, each over the whole tree:
//!
//! 1. compute every element's properties top-down;
//! 2. resolve `run-in` boxes;
//! 3. process whitespace;
//! 4. generate anonymous table objects.

use std::rc::Rc;

use crate::config::LayoutConfig;
use crate::error::{LayoutError, Result};
use crate::resources::ResourceCache;
use crate::style::compute::compute;
use crate::style::properties::{ComputedProperties, Specified};
use crate::style::values::{Display, Float};

use super::anonymous::generate_anonymous_tables;
use super::whitespace::process_whitespace;
use super::{BoxId, BoxTree};

/// Run all preparation passes.
///
/// # Errors
///
/// - [`LayoutError::DocumentTooDeep`] if the tree nests deeper than
///   `config.max_depth`;
/// - any error from computing properties.
pub fn prepare(
    tree: &mut BoxTree,
    resources: &mut dyn ResourceCache,
    config: &LayoutConfig,
) -> Result<()> {
    let initial =
        ComputedProperties::initial(&config.default_font_family, config.default_font_size);

    // STEP 1: Compute.
    compute_tree(tree, resources, &initial, config.max_depth)?;

    // STEP 2: Run-in.
    resolve_run_ins(tree)?;

    // STEP 3: Whitespace.
    process_whitespace(tree)?;

    // STEP 4: Anonymous tables.
    generate_anonymous_tables(tree, resources, &initial)?;

    log::debug!("prepared box tree with {} boxes", tree.len());
    Ok(())
}

/// [§ 6.2 Inheritance](https://www.w3.org/TR/CSS2/cascade.html#inheritance)
///
/// "When inheritance occurs, elements inherit computed values. The computed
/// value from the parent element becomes both the specified value and the
/// computed value on the child."
///
/// Parents are visited before children, so each element sees its parent's
/// fresh values.
fn compute_tree(
    tree: &mut BoxTree,
    resources: &mut dyn ResourceCache,
    initial: &ComputedProperties,
    max_depth: usize,
) -> Result<()> {
    let Some(root) = tree.root() else {
        return Ok(());
    };
    let mut stack: Vec<(BoxId, Option<Rc<ComputedProperties>>, usize)> = vec![(root, None, 0)];
    while let Some((id, parent, depth)) = stack.pop() {
        if depth > max_depth {
            return Err(LayoutError::DocumentTooDeep { limit: max_depth });
        }
        let Some(element) = tree.element(id) else {
            continue;
        };
        let mut computed = compute(&element.properties, parent.as_deref(), resources, initial)?;

        // [§ 9.7 Relationships between 'display', 'position', and 'float'](https://www.w3.org/TR/CSS2/visuren.html#dis-pos-flo)
        //
        // "Otherwise, if 'position' has the value 'absolute' or 'fixed', the
        // box is absolutely positioned, the computed value of 'float' is
        // 'none', and display is set according to the table below."
        if computed.position.is_out_of_flow() {
            computed.float = Float::None;
            computed.display = computed.display.blockified();
        } else if computed.is_floated() || parent.is_none() {
            // "Otherwise, if 'float' has a value other than 'none', the box is
            // floated and 'display' is set according to the table below."
            // "Otherwise, if the element is the root element, 'display' is set
            // according to the table below."
            computed.display = computed.display.blockified();
        }

        let computed = Rc::new(computed);
        if let Some(element) = tree.element_mut(id) {
            element.computed = Rc::clone(&computed);
        }
        for &child in tree.children(id).iter().rev() {
            stack.push((child, Some(Rc::clone(&computed)), depth + 1));
        }
    }
    Ok(())
}

/// [§ 9.2.3 Run-in boxes](https://www.w3.org/TR/CSS2/visuren.html#run-in)
///
/// "1. If the run-in box contains a block box, the run-in box becomes a
/// block box.
/// 2. If a sibling block box (that does not float and is not absolutely
/// positioned) follows the run-in box, the run-in box becomes the first
/// inline box of the block box. A run-in cannot run in to a block that
/// already starts with a run-in or that itself is a run-in.
/// 3. Otherwise, the run-in box becomes a block box."
fn resolve_run_ins(tree: &mut BoxTree) -> Result<()> {
    let run_ins: Vec<BoxId> = tree
        .iter()
        .filter(|&id| display(tree, id) == Some(Display::RunIn))
        .collect();

    for run_in in run_ins {
        // An earlier run-in may have been merged around this one.
        if display(tree, run_in) != Some(Display::RunIn) {
            continue;
        }
        let contains_block = tree
            .children(run_in)
            .iter()
            .any(|&c| display(tree, c).is_some_and(Display::is_block_level));
        let target = if contains_block {
            None
        } else {
            following_block(tree, run_in)
        };

        match target {
            Some(block) => {
                tree.detach(run_in)?;
                match tree.children(block).first().copied() {
                    Some(first) => tree.insert_before(block, run_in, first)?,
                    None => tree.append_child(block, run_in)?,
                }
                set_display(tree, run_in, Display::Inline);
            }
            None => set_display(tree, run_in, Display::Block),
        }
    }
    Ok(())
}

fn display(tree: &BoxTree, id: BoxId) -> Option<Display> {
    tree.element(id).map(|e| e.computed.display)
}

/// The next in-flow sibling if it is a block box that can take a run-in.
fn following_block(tree: &BoxTree, run_in: BoxId) -> Option<BoxId> {
    let parent = tree.parent(run_in)?;
    let siblings = tree.children(parent);
    let index = siblings.iter().position(|&s| s == run_in)?;
    for &sibling in &siblings[index + 1..] {
        let Some(element) = tree.element(sibling) else {
            // Text between the run-in and the block stops the merge.
            return None;
        };
        let c = &element.computed;
        if c.is_floated() || c.position.is_out_of_flow() {
            continue;
        }
        if !matches!(c.display, Display::Block | Display::ListItem) {
            return None;
        }
        let starts_with_run_in = tree
            .children(sibling)
            .first()
            .is_some_and(|&first| display(tree, first) == Some(Display::RunIn));
        return (!starts_with_run_in).then_some(sibling);
    }
    None
}

fn set_display(tree: &mut BoxTree, id: BoxId, display: Display) {
    if let Some(element) = tree.element_mut(id) {
        element.properties.display = Some(Specified::Value(display));
        Rc::make_mut(&mut element.computed).display = display;
    }
}
