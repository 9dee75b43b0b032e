//! Painting
//!
//! [CSS 2.1 Appendix E - Elaborate description of Stacking Contexts](https://www.w3.org/TR/CSS2/zindex.html)
//!
//! This module turns a laid-out tree into drawing calls on a [`Surface`].
//!
//! # Architecture
//!
//! ```text
//! Box tree → Layout tree → Painter → Surface
//!                                      ↓
//!                        RecordingSurface → DisplayList
//! ```
//!
//! Embedders implement [`Surface`] on their own canvas. The recording
//! surface captures the calls as a serializable [`DisplayList`], which the
//! command-line tool prints and the tests inspect.

pub mod background;
pub mod border;
pub mod display_list;
pub mod painter;
pub mod surface;

pub use display_list::{DisplayCommand, DisplayList, RecordingSurface};
pub use painter::Painter;
pub use surface::Surface;
