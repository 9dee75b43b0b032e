//! Painter: walks a laid-out tree and draws it onto a [`Surface`].
//!
//! [CSS 2.1 Appendix E.2 Painting order](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
//!
//! Stacking contexts and positioned `z-index: auto` boxes come from
//! [`paint_order`]. Each of them paints as a layer in three passes over the
//! part of its subtree that belongs to it: backgrounds and borders, then
//! floats, then inline content. Positioned descendants are left to their own
//! steps; floats and atomic inlines paint as nested layers.

use crate::layout::box_model::{EdgeSizes, Rect};
use crate::layout::inline::line::{Fragment, FragmentKind, InlineContent};
use crate::layout::stacking::{PaintStep, StackingId, paint_order};
use crate::layout::tree::{LayoutId, LayoutKind, LayoutTree};
use crate::resources::ResourceCache;
use crate::selection::Selection;
use crate::style::values::{Color, Direction};

use super::background::paint_background;
use super::border::paint_borders;
use super::surface::Surface;

/// The leading `count` characters of `text`.
#[must_use]
pub(crate) fn char_prefix(text: &str, count: usize) -> &str {
    text.char_indices().nth(count).map_or(text, |(i, _)| &text[..i])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    /// [Appendix E.2 step 4] "for all its in-flow, non-positioned,
    /// block-level descendants in tree order: [...] background color of
    /// element, background image of element, border of element."
    Decorations,
    /// [Appendix E.2 step 5] "All non-positioned floating descendants, in
    /// tree order. For each one of these, treat the element as if it created
    /// a new stacking context."
    Floats,
    /// [Appendix E.2 step 7] inline content and replaced content.
    Content,
}

/// Paints a [`LayoutTree`] back to front.
pub struct Painter<'a> {
    tree: &'a LayoutTree,
    resources: &'a mut dyn ResourceCache,
    selection: Option<&'a Selection>,
    selection_color: Color,
}

impl<'a> Painter<'a> {
    /// A painter for `tree` that loads fonts and images from `resources`.
    #[must_use]
    pub fn new(tree: &'a LayoutTree, resources: &'a mut dyn ResourceCache) -> Self {
        Self {
            tree,
            resources,
            selection: None,
            selection_color: Color::TRANSPARENT,
        }
    }

    /// Highlight `selection` with `color` behind the selected text.
    #[must_use]
    pub fn with_selection(mut self, selection: &'a Selection, color: Color) -> Self {
        self.selection = Some(selection);
        self.selection_color = color;
        self
    }

    /// Paint the whole tree.
    ///
    /// Clip pushes and pops on `surface` are balanced.
    pub fn paint(&mut self, surface: &mut dyn Surface) {
        let Some(root) = self.tree.root() else {
            return;
        };
        self.paint_canvas(surface, root);
        if self.tree.stacking_contexts().is_empty() {
            return;
        }
        for step in paint_order(self.tree.stacking_contexts(), StackingId(0)) {
            let owner = match step {
                PaintStep::Layer(context) => self.tree.stacking_context(context).owner,
                PaintStep::Positioned(node) => node,
            };
            self.paint_layer(surface, owner);
        }
    }

    /// [§ 14.2 The background](https://www.w3.org/TR/CSS2/colors.html#background)
    ///
    /// "The background of the root element becomes the background of the
    /// canvas and covers the entire canvas."
    fn paint_canvas(&mut self, surface: &mut dyn Surface, root: LayoutId) {
        let node = &self.tree[root];
        if !node.style.is_visible() {
            return;
        }
        let viewport = self.tree.viewport();
        let document = node.margin_box();
        let canvas = Rect::new(
            0.0,
            0.0,
            viewport.width.max(document.right()),
            viewport.height.max(document.bottom()),
        );
        paint_background(surface, self.resources, &node.style, canvas);
    }

    /// Paint `owner` and the part of its subtree that belongs to its layer.
    fn paint_layer(&mut self, surface: &mut dyn Surface, owner: LayoutId) {
        #[cfg(feature = "layout-trace")]
        log::trace!(target: "boxwood::layout", "paint layer {owner:?}");

        for pass in [Pass::Decorations, Pass::Floats, Pass::Content] {
            self.walk(surface, owner, pass, true);
        }
    }

    fn walk(&mut self, surface: &mut dyn Surface, id: LayoutId, pass: Pass, is_owner: bool) {
        let tree = self.tree;
        let node = &tree[id];
        let visible = node.style.is_visible();
        let inline = matches!(node.kind, LayoutKind::Inline);

        // [Appendix E.2 step 2] "background color of element", "background
        // image of element", "border of element".
        if pass == Pass::Decorations && visible && !inline {
            self.paint_decorations(surface, id);
        }

        // [§ 11.1.1] "'hidden': This value indicates that the content is
        // clipped and that no scrolling user interface should be provided to
        // view the content outside the clipping region."
        let clips = node.style.overflow.clips()
            && !inline
            && (!node.children.is_empty() || node.inline_content.is_some());
        if clips {
            surface.push_cliprect(node.padding_box());
        }

        if pass == Pass::Content {
            if let LayoutKind::Replaced(data) = &node.kind
                && let Some(image) = &data.image
                && visible
            {
                // [Appendix E.2 step 7] "the replaced content of replaced
                // inline-level elements, atomically"
                surface.draw_image(image, node.content_box);
            }
            if inline && is_owner {
                self.paint_inline_element(surface, id);
            }
            if let Some(content) = &node.inline_content {
                self.paint_lines(surface, content);
            }
        }

        for &child in &node.children {
            let child_node = &tree[child];
            if child_node.is_positioned() || child_node.is_atomic_inline() {
                continue;
            }
            if child_node.is_float() {
                if pass == Pass::Floats {
                    self.paint_layer(surface, child);
                }
                continue;
            }
            self.walk(surface, child, pass, false);
        }

        if clips {
            surface.pop_cliprect();
        }
    }

    fn paint_decorations(&mut self, surface: &mut dyn Surface, id: LayoutId) {
        let node = &self.tree[id];
        let border_box = node.border_box();
        if Some(id) != self.tree.root() {
            paint_background(surface, self.resources, &node.style, border_box);
        }
        paint_borders(surface, &node.style, border_box, node.border);
    }

    fn paint_lines(&mut self, surface: &mut dyn Surface, content: &InlineContent) {
        for line in &content.lines {
            self.paint_fragments(surface, &line.fragments);
        }
    }

    /// Paint fragments in order, skipping positioned inline elements and
    /// atomics: they paint in their own steps.
    fn paint_fragments(&mut self, surface: &mut dyn Surface, fragments: &[Fragment]) {
        let tree = self.tree;
        let mut skip = 0;
        for fragment in fragments {
            if skip > 0 {
                skip -= 1;
                continue;
            }
            match fragment.kind {
                FragmentKind::InlineBox { node, descendants, .. } if tree[node].is_positioned() => {
                    skip = descendants;
                }
                FragmentKind::Atomic { node } if tree[node].is_positioned() => {}
                _ => self.paint_fragment(surface, fragment),
            }
        }
    }

    /// The fragments of a positioned inline element, found in the line boxes
    /// of its block container.
    fn paint_inline_element(&mut self, surface: &mut dyn Surface, id: LayoutId) {
        let tree = self.tree;
        let container = std::iter::successors(tree[id].parent, |&p| tree[p].parent)
            .find(|&p| tree[p].inline_content.is_some());
        let Some(content) = container.and_then(|c| tree[c].inline_content.as_ref()) else {
            return;
        };
        for line in &content.lines {
            let start = line.fragments.iter().position(|f| {
                matches!(f.kind, FragmentKind::InlineBox { node, .. } if node == id)
            });
            let Some(start) = start else {
                continue;
            };
            let FragmentKind::InlineBox { descendants, .. } = line.fragments[start].kind else {
                continue;
            };
            self.paint_fragment(surface, &line.fragments[start]);
            let end = (start + 1 + descendants).min(line.fragments.len());
            self.paint_fragments(surface, &line.fragments[start + 1..end]);
        }
    }

    fn paint_fragment(&mut self, surface: &mut dyn Surface, fragment: &Fragment) {
        let tree = self.tree;
        match &fragment.kind {
            FragmentKind::InlineBox { node, first, last, .. } => {
                let node = &tree[*node];
                if !node.style.is_visible() {
                    return;
                }
                // [§ 8.6 The box model for inline elements in bidirectional
                // context] "the left-most generated box of the first line box
                // in which the element appears has the left margin, left
                // border and left padding"; mirrored for 'rtl'.
                let (opens_left, closes_right) = match node.style.direction {
                    Direction::Ltr => (*first, *last),
                    Direction::Rtl => (*last, *first),
                };
                let widths = EdgeSizes {
                    left: if opens_left { node.border.left } else { 0.0 },
                    right: if closes_right { node.border.right } else { 0.0 },
                    ..node.border
                };
                paint_background(surface, self.resources, &node.style, fragment.rect);
                paint_borders(surface, &node.style, fragment.rect, widths);
            }
            FragmentKind::Text {
                box_id,
                parent,
                text,
                start,
                end,
            } => {
                let style = &tree[*parent].style;
                if !style.is_visible() || text.is_empty() {
                    return;
                }
                let font = self.resources.get_font(style);
                if let Some(selection) = self.selection
                    && let Some((from, to)) = selection.fragment_range(*box_id, *start, *end)
                {
                    let x0 = fragment.rect.x + surface.get_text_size(&font, char_prefix(text, from)).width;
                    let x1 = fragment.rect.x + surface.get_text_size(&font, char_prefix(text, to)).width;
                    surface.fill(
                        Rect::new(x0, fragment.rect.y, x1 - x0, fragment.rect.height),
                        self.selection_color,
                    );
                }
                // [Appendix E.2 step 7.2.1.4.1.1.2] "each text run: the text
                // of the run"
                surface.draw_text(&font, fragment.rect.x, fragment.baseline, text, style.color);
            }
            FragmentKind::Atomic { node } => self.paint_layer(surface, *node),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_counts_characters_not_bytes() {
        assert_eq!(char_prefix("héllo", 2), "hé");
        assert_eq!(char_prefix("abc", 0), "");
        assert_eq!(char_prefix("abc", 9), "abc");
    }
}
