//! Flattening inline content into a sequence of items.
//!
//! [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
//!
//! The inline boxes, text and atomic boxes of one run of a block container
//! become a flat list. Non-replaced inline elements turn into `Open` /
//! `Close` pairs around their content; text is cut into pieces at every soft
//! wrap opportunity; each item records whether a line may break before it.

use crate::box_tree::{BoxId, BoxTree};
use crate::layout::tree::{LayoutId, LayoutTree};
use crate::style::values::WhiteSpace;

/// What an item contributes to a line.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ItemKind {
    /// A piece of a text box.
    Text {
        /// The text box.
        box_id: BoxId,
        /// Its parent element, whose style the text uses.
        parent: LayoutId,
        /// The characters.
        text: String,
        /// Character offset of the first character in the text box.
        start: usize,
        /// One past the last character.
        end: usize,
    },
    /// Start of a non-replaced inline element.
    Open(LayoutId),
    /// End of a non-replaced inline element.
    Close(LayoutId),
    /// An inline-block, inline-table or inline replaced element.
    Atomic(LayoutId),
    /// A float met inside inline content.
    Float(LayoutId),
    /// An absolutely positioned box; only its static position is recorded.
    Positioned(LayoutId),
    /// A preserved newline or a `<br>`.
    HardBreak,
    /// A block-level box inside inline content. It sits on its own between
    /// forced breaks.
    Block(LayoutId),
}

/// One item with its break opportunity.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct InlineItem {
    pub(crate) kind: ItemKind,
    /// A line may end right before this item.
    pub(crate) break_before: bool,
}

impl InlineItem {
    /// True for the items that force the line to end after them.
    pub(crate) const fn ends_line(&self) -> bool {
        matches!(self.kind, ItemKind::HardBreak | ItemKind::Block(_))
    }
}

enum Visit {
    Enter(BoxId),
    Exit(LayoutId),
}

#[derive(Default)]
struct Collector {
    items: Vec<InlineItem>,
    /// The next item may be preceded by a break.
    pending_break: bool,
    /// The last character collected was a space.
    after_space: bool,
}

impl Collector {
    fn push(&mut self, kind: ItemKind, break_before: bool) {
        self.items.push(InlineItem { kind, break_before });
    }

    fn take_pending(&mut self) -> bool {
        std::mem::take(&mut self.pending_break)
    }

    fn piece(&mut self, box_id: BoxId, parent: LayoutId, chars: &[char], range: (usize, usize), break_before: bool) {
        let (start, end) = range;
        if start >= end {
            return;
        }
        self.push(
            ItemKind::Text {
                box_id,
                parent,
                text: chars[start..end].iter().collect(),
                start,
                end,
            },
            break_before,
        );
    }

    /// [§ 16.6.1 The 'white-space' processing model](https://www.w3.org/TR/CSS2/text.html#white-space-model)
    ///
    /// Cut a text box into pieces. A soft wrap opportunity sits before every
    /// non-space character that follows a space, unless `white-space`
    /// forbids wrapping. Preserved newlines become hard breaks.
    fn text(&mut self, box_id: BoxId, parent: LayoutId, text: &str, white_space: WhiteSpace) {
        let chars: Vec<char> = text.chars().collect();
        let mut piece_start = 0;
        let mut piece_break = self.take_pending();

        for (i, &c) in chars.iter().enumerate() {
            if c == '\n' && white_space.preserves_newlines() {
                self.piece(box_id, parent, &chars, (piece_start, i), piece_break);
                self.push(ItemKind::HardBreak, false);
                piece_start = i + 1;
                piece_break = true;
                self.after_space = false;
                continue;
            }
            if white_space.allows_soft_wrap() && self.after_space && c != ' ' {
                if i > piece_start {
                    self.piece(box_id, parent, &chars, (piece_start, i), piece_break);
                    piece_start = i;
                }
                piece_break = true;
            }
            self.after_space = c == ' ';
        }
        if piece_start < chars.len() {
            self.piece(box_id, parent, &chars, (piece_start, chars.len()), piece_break);
        } else if piece_break {
            // The text ended on a hard break: the next item may start a line.
            self.pending_break = true;
        }
    }
}

/// Flatten the boxes of `run`, in order, into items.
///
/// `run` holds sibling boxes of one block container: text boxes and
/// inline-level, floated or absolutely positioned element boxes.
pub(crate) fn collect_items(boxes: &BoxTree, tree: &LayoutTree, run: &[BoxId]) -> Vec<InlineItem> {
    let mut collector = Collector::default();
    let mut stack: Vec<Visit> = run.iter().rev().map(|&b| Visit::Enter(b)).collect();

    while let Some(visit) = stack.pop() {
        let box_id = match visit {
            Visit::Exit(id) => {
                collector.push(ItemKind::Close(id), false);
                continue;
            }
            Visit::Enter(box_id) => box_id,
        };

        if let Some(text) = boxes.text(box_id) {
            let Some(parent) = boxes.parent(box_id).and_then(|p| tree.node_for_box(p)) else {
                continue;
            };
            collector.text(box_id, parent, &text.text, tree[parent].style.white_space);
            continue;
        }

        let Some(id) = tree.node_for_box(box_id) else {
            continue;
        };
        let node = &tree[id];
        let is_br = boxes.element(box_id).is_some_and(|e| e.is_tag("br"));

        if node.is_out_of_flow() {
            collector.push(ItemKind::Positioned(id), false);
        } else if node.is_float() {
            collector.push(ItemKind::Float(id), false);
        } else if is_br {
            let _ = collector.take_pending();
            collector.push(ItemKind::HardBreak, false);
            collector.pending_break = true;
            collector.after_space = false;
        } else if node.is_block_level() {
            let _ = collector.take_pending();
            collector.push(ItemKind::Block(id), true);
            collector.pending_break = true;
            collector.after_space = false;
        } else if node.is_atomic_inline() {
            // [§ 16.6] Atomic inlines are break opportunities on both sides
            // when the surrounding text may wrap.
            let wraps = node
                .parent
                .map_or(node.style.white_space, |p| tree[p].style.white_space)
                .allows_soft_wrap();
            let pending = collector.take_pending();
            collector.push(ItemKind::Atomic(id), wraps || pending);
            collector.pending_break = wraps;
            collector.after_space = false;
        } else {
            collector.push(ItemKind::Open(id), false);
            stack.push(Visit::Exit(id));
            stack.extend(boxes.children(box_id).iter().rev().map(|&c| Visit::Enter(c)));
        }
    }

    let mut items = collector.items;
    // A break before the first content of an inline element belongs before
    // the element itself, so the element's left edge moves with its text.
    for i in (0..items.len().saturating_sub(1)).rev() {
        if matches!(items[i].kind, ItemKind::Open(_)) && items[i + 1].break_before {
            items[i].break_before = true;
            items[i + 1].break_before = false;
        }
    }
    items
}

/// Index one past the end of the segment starting at `start`: the items up
/// to the next break opportunity, or through the next forced break.
pub(crate) fn segment_end(items: &[InlineItem], start: usize) -> usize {
    let mut end = start;
    while end < items.len() {
        if end > start && items[end].break_before {
            break;
        }
        let forced = items[end].ends_line();
        end += 1;
        if forced {
            break;
        }
    }
    end
}
