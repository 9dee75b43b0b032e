//! Block formatting contexts and float placement.
//!
//! [§ 9.4.1 Block formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#block-formatting)
//! [§ 9.5 Floats](https://www.w3.org/TR/CSS2/visuren.html#floats)
//!
//! Float rectangles are margin boxes stored in the context's local
//! coordinates. `origin` maps local `(0, 0)` to page coordinates; it is the
//! content-box corner of the box that owns the context.

use serde::Serialize;

use super::box_model::{Point, Rect};
use super::tree::LayoutId;

/// Index of a [`BlockFormattingContext`] in a layout tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ContextId(pub(crate) usize);

/// The horizontal band a line or a float-avoiding box may use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineBand {
    /// Left edge of the free space.
    pub left: f32,
    /// Right edge of the free space.
    pub right: f32,
    /// Top of the band; at or below the requested `y`.
    pub top: f32,
}

impl LineBand {
    /// `right - left`, never negative.
    #[must_use]
    pub fn width(&self) -> f32 {
        (self.right - self.left).max(0.0)
    }
}

/// [§ 9.4.1 Block formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#block-formatting)
///
/// "Floats, absolutely positioned elements, block containers (such as
/// inline-blocks, table-cells, and table-captions) that are not block boxes,
/// and block boxes with 'overflow' other than 'visible' (except when that
/// value has been propagated to the viewport) establish new block formatting
/// contexts for their contents."
#[derive(Debug, Clone, Serialize)]
pub struct BlockFormattingContext {
    /// The box that establishes this context.
    pub owner: LayoutId,
    /// The enclosing context; `None` at the root and for fixed boxes.
    pub parent: Option<ContextId>,
    /// Page position of local `(0, 0)`.
    pub origin: Point,
    left_floats: Vec<Rect>,
    right_floats: Vec<Rect>,
}

/// Which horizontal band obstructs a candidate rectangle.
struct Obstruction {
    /// Right edge of the closest left float, if one overlaps.
    left: Option<f32>,
    /// Left edge of the closest right float, if one overlaps.
    right: Option<f32>,
    /// Smallest bottom among the overlapping floats.
    lowest_escape: Option<f32>,
}

impl BlockFormattingContext {
    /// An empty context.
    #[must_use]
    pub const fn new(owner: LayoutId, parent: Option<ContextId>, origin: Point) -> Self {
        Self {
            owner,
            parent,
            origin,
            left_floats: Vec::new(),
            right_floats: Vec::new(),
        }
    }

    /// Forget all placed floats.
    pub fn clear(&mut self) {
        self.left_floats.clear();
        self.right_floats.clear();
    }

    /// Left floats in placement order.
    #[must_use]
    pub fn left_floats(&self) -> &[Rect] {
        &self.left_floats
    }

    /// Right floats in placement order.
    #[must_use]
    pub fn right_floats(&self) -> &[Rect] {
        &self.right_floats
    }

    /// Probe the floats overlapping the vertical span `[top, top + height)`.
    ///
    /// A zero-height probe is treated as one pixel tall so that a line or
    /// an empty float still sees the floats beside it.
    fn obstruction(&self, top: f32, height: f32) -> Obstruction {
        let bottom = top + height.max(1.0);
        let overlaps = |r: &&Rect| r.y < bottom && r.bottom() > top && r.height > 0.0;
        let mut escape: Option<f32> = None;
        let mut note = |r: &Rect| {
            escape = Some(escape.map_or(r.bottom(), |e| e.min(r.bottom())));
        };

        let mut left: Option<f32> = None;
        for r in self.left_floats.iter().filter(overlaps) {
            left = Some(left.map_or(r.right(), |l| l.max(r.right())));
            note(r);
        }
        let mut right: Option<f32> = None;
        for r in self.right_floats.iter().filter(overlaps) {
            right = Some(right.map_or(r.x, |x| x.min(r.x)));
            note(r);
        }
        Obstruction {
            left,
            right,
            lowest_escape: escape,
        }
    }

    /// [§ 9.5.1 Positioning the float](https://www.w3.org/TR/CSS2/visuren.html#float-position)
    ///
    /// "The outer top of a floating box may not be higher than the outer top
    /// of any block or floated box generated by an element earlier in the
    /// source document."
    fn min_top(&self) -> f32 {
        self.left_floats
            .iter()
            .chain(&self.right_floats)
            .map(|r| r.y)
            .fold(f32::NEG_INFINITY, f32::max)
    }

    /// Place a left float.
    ///
    /// `candidate` is the float's margin box with `x` at the left edge of the
    /// containing block and `y` at the highest allowed top. `max_right` is the
    /// right edge of the containing block.
    ///
    /// STEP 1: probe the closest left and right floats overlapping the
    ///         candidate's vertical span;
    /// STEP 2: if there are none, the candidate stays where it is;
    /// STEP 3: otherwise shift it right of the left obstruction; if it still
    ///         does not fit before the right obstruction, move `top` down to
    ///         the lowest escape and retry.
    pub fn float_left(&mut self, candidate: Rect, max_right: f32) -> Rect {
        let placed = self.place(candidate, max_right, true);
        self.left_floats.push(placed);
        placed
    }

    /// Place a right float. `candidate.x` is the left edge of the containing
    /// block; the float is pushed against `max_right`.
    pub fn float_right(&mut self, candidate: Rect, max_right: f32) -> Rect {
        let placed = self.place(candidate, max_right, false);
        self.right_floats.push(placed);
        placed
    }

    fn place(&self, candidate: Rect, max_right: f32, left_side: bool) -> Rect {
        let min_left = candidate.x;
        let mut top = candidate.y.max(self.min_top());
        loop {
            let probe = self.obstruction(top, candidate.height);
            let left = probe.left.map_or(min_left, |l| l.max(min_left));
            let right = probe.right.map_or(max_right, |r| r.min(max_right));
            let fits = left + candidate.width <= right;
            // [§ 9.5.1 rule 7] "A left-floating box that has another
            // left-floating box to its left may not have its right outer edge
            // to the right of its containing block's right edge."
            if probe.lowest_escape.is_none() || fits {
                let x = if left_side {
                    left
                } else {
                    right - candidate.width
                };
                return Rect::new(x, top, candidate.width, candidate.height);
            }
            match probe.lowest_escape {
                Some(escape) if escape > top => top = escape,
                _ => {
                    let x = if left_side {
                        left
                    } else {
                        right - candidate.width
                    };
                    return Rect::new(x, top, candidate.width, candidate.height);
                }
            }
        }
    }

    /// [§ 9.5 Floats](https://www.w3.org/TR/CSS2/visuren.html#floats)
    ///
    /// "The current and subsequent line boxes created next to the float are
    /// shortened as necessary to make room for the margin box of the float."
    ///
    /// The band free of floats at `y`, between `left` and `right`. `top`
    /// moves down until the band is at least `min_width` wide or no float
    /// remains to clear.
    #[must_use]
    pub fn find_line_box(&self, left: f32, right: f32, y: f32, height: f32, min_width: f32) -> LineBand {
        let mut top = y;
        loop {
            let probe = self.obstruction(top, height);
            let band = LineBand {
                left: probe.left.map_or(left, |l| l.max(left)),
                right: probe.right.map_or(right, |r| r.min(right)),
                top,
            };
            if band.width() >= min_width {
                return band;
            }
            match probe.lowest_escape {
                Some(escape) if escape > top => top = escape,
                _ => return band,
            }
        }
    }

    /// [§ 9.5.2 Controlling flow next to floats](https://www.w3.org/TR/CSS2/visuren.html#flow-control)
    ///
    /// Lowest bottom edge among left floats.
    #[must_use]
    pub fn find_left_clearance(&self) -> Option<f32> {
        self.left_floats.iter().map(Rect::bottom).reduce(f32::max)
    }

    /// Lowest bottom edge among right floats.
    #[must_use]
    pub fn find_right_clearance(&self) -> Option<f32> {
        self.right_floats.iter().map(Rect::bottom).reduce(f32::max)
    }

    /// [§ 10.6.7 'Auto' heights for block formatting context roots](https://www.w3.org/TR/CSS2/visudet.html#root-height)
    ///
    /// "If the element has any floating descendants whose bottom margin edge
    /// is below the element's bottom content edge, then the height is
    /// increased to include those edges."
    #[must_use]
    pub fn floats_bottom(&self) -> Option<f32> {
        match (self.find_left_clearance(), self.find_right_clearance()) {
            (Some(l), Some(r)) => Some(l.max(r)),
            (l, r) => l.or(r),
        }
    }

    /// Page coordinates to local coordinates.
    #[must_use]
    pub fn to_local(&self, p: Point) -> Point {
        Point::new(p.x - self.origin.x, p.y - self.origin.y)
    }

    /// Local coordinates to page coordinates.
    #[must_use]
    pub fn to_page(&self, p: Point) -> Point {
        Point::new(p.x + self.origin.x, p.y + self.origin.y)
    }
}
