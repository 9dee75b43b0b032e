//! The drawing surface collaborator.

use crate::layout::box_model::{Rect, Size};
use crate::resources::{FontHandle, ImageHandle};
use crate::style::values::Color;

/// A 2D target that layout measures text with and paint draws onto.
///
/// Clip pushes and pops are always balanced by the painter.
pub trait Surface {
    /// Fill a rectangle with a solid color.
    fn fill(&mut self, rect: Rect, color: Color);

    /// Draw an image scaled into `rect`.
    fn draw_image(&mut self, image: &ImageHandle, rect: Rect);

    /// Draw `text` with its baseline origin at `(x, y)`.
    fn draw_text(&mut self, font: &FontHandle, x: f32, y: f32, text: &str, color: Color);

    /// Advance width and line height of `text`.
    fn get_text_size(&mut self, font: &FontHandle, text: &str) -> Size;

    /// Intersect the clip region with `rect` until the matching pop.
    fn push_cliprect(&mut self, rect: Rect);

    /// Undo the last [`push_cliprect`](Self::push_cliprect).
    fn pop_cliprect(&mut self);
}
