//! Box-tree construction, CSS 2.1 layout and painting for the Boxwood engine.
//!
//! # Scope
//!
//! This crate implements:
//! - **Box generation** ([§ 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen))
//!   - Element, text and `::before`/`::after` boxes
//!   - `run-in` resolution and whitespace processing
//!   - Anonymous table objects
//!
//! - **Style computation** ([§ 6 Assigning property values, Cascading, and Inheritance](https://www.w3.org/TR/CSS2/cascade.html))
//!   - Declarations from a pluggable [`Cascade`](style::cascade::Cascade)
//!   - Inheritance and computed values
//!
//! - **Layout** ([§ 9 Visual formatting model](https://www.w3.org/TR/CSS2/visuren.html),
//!   [§ 10 Visual formatting model details](https://www.w3.org/TR/CSS2/visudet.html))
//!   - Block formatting contexts, margin collapsing, floats and clearance
//!   - Inline formatting: line breaking, vertical alignment, justification
//!   - Shrink-to-fit widths from intrinsic measurements
//!   - Tables with separated and collapsed borders
//!   - Relative, absolute and fixed positioning
//!   - Replaced elements
//!
//! - **Painting** ([Appendix E](https://www.w3.org/TR/CSS2/zindex.html))
//!   - Stacking contexts and paint order
//!   - Backgrounds, borders, text and selection highlight
//!   - Hit testing
//!
//! # Not Implemented
//!
//! - Selector matching and style sheet parsing beyond declaration blocks
//! - Bidirectional reordering and vertical writing modes
//! - Incremental relayout

/// Box tree per [§ 9.2](https://www.w3.org/TR/CSS2/visuren.html#box-gen).
pub mod box_tree;
/// Engine configuration.
pub mod config;
/// The public layout API.
pub mod engine;
/// Fatal engine errors.
pub mod error;
/// Hit testing.
pub mod hit_test;
/// Layout per [§ 9](https://www.w3.org/TR/CSS2/visuren.html) and [§ 10](https://www.w3.org/TR/CSS2/visudet.html).
pub mod layout;
/// Painting per [Appendix E](https://www.w3.org/TR/CSS2/zindex.html).
pub mod paint;
/// Fonts, images and lengths.
pub mod resources;
/// Text selection.
pub mod selection;
/// Property values, parsing, the cascade interface and computation.
pub mod style;

// Re-exports for convenience
pub use box_tree::{BoxId, BoxKind, BoxTree};
pub use config::LayoutConfig;
pub use engine::LayoutEngine;
pub use error::{LayoutError, Result};
pub use hit_test::{HitResult, HitZone};
pub use layout::box_model::{EdgeSizes, Point, Rect, Size};
pub use layout::stacking::PaintStep;
pub use layout::tree::{LayoutId, LayoutKind, LayoutNode, LayoutTree};
pub use paint::{DisplayCommand, DisplayList, Painter, RecordingSurface, Surface};
pub use resources::{ApproximateResources, FontHandle, FontMetrics, ImageHandle, ResourceCache};
pub use selection::{Selection, TextPosition};
pub use style::properties::ComputedProperties;
