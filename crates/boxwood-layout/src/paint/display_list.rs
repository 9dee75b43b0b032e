//! Display list: a recorded sequence of drawing commands.
//!
//! [CSS 2.1 Appendix E](https://www.w3.org/TR/CSS2/zindex.html)
//!
//! [`RecordingSurface`] implements [`Surface`] by appending to a
//! [`DisplayList`], which serializes to JSON for inspection and tests.

use serde::Serialize;

use crate::layout::box_model::{Rect, Size};
use crate::resources::{FontHandle, ImageHandle};
use crate::style::values::Color;

use super::surface::Surface;

/// A single drawing command.
///
/// [CSS 2.1 Appendix E.2 Painting order](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
///
/// Commands are added to the display list in painting order (back to front).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DisplayCommand {
    /// Fill a rectangle with a solid color.
    Fill {
        /// Area to fill.
        rect: Rect,
        /// Fill color.
        color: Color,
    },
    /// Draw an image scaled into a rectangle.
    Image {
        /// Image URL.
        url: String,
        /// Destination rectangle.
        rect: Rect,
    },
    /// Draw text.
    Text {
        /// Font descriptor key.
        font: String,
        /// Font size in pixels.
        size: f32,
        /// X coordinate of the baseline origin.
        x: f32,
        /// Y coordinate of the baseline origin.
        y: f32,
        /// The text content to draw.
        text: String,
        /// Text color.
        color: Color,
    },
    /// [§ 11.1.1 overflow](https://www.w3.org/TR/CSS2/visufx.html#overflow)
    ///
    /// Push a clip rectangle onto the clip stack.
    PushClip {
        /// Clip rectangle.
        rect: Rect,
    },
    /// Pop the most recent clip rectangle from the clip stack.
    PopClip,
}

/// A list of drawing commands in painting order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DisplayList {
    commands: Vec<DisplayCommand>,
}

impl DisplayList {
    /// Create an empty display list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Add a command to the display list.
    pub fn push(&mut self, command: DisplayCommand) {
        self.commands.push(command);
    }

    /// Get the commands in painting order.
    #[must_use]
    pub fn commands(&self) -> &[DisplayCommand] {
        &self.commands
    }

    /// Get the number of commands.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.commands.len()
    }

    /// Check if the display list is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Drop all commands.
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

/// A [`Surface`] that records into a [`DisplayList`].
///
/// Text is measured with a fixed advance of 0.6 × the font size per
/// character and a height of 1.2 × the font size, the usual approximation
/// for proportional Latin text.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    list: DisplayList,
    clip_depth: usize,
}

impl RecordingSurface {
    /// Average advance width per character, relative to the font size.
    pub const ADVANCE_RATIO: f32 = 0.6;

    /// An empty surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The commands recorded so far.
    #[must_use]
    pub const fn display_list(&self) -> &DisplayList {
        &self.list
    }

    /// Take the recorded commands, leaving the surface empty.
    pub fn take_display_list(&mut self) -> DisplayList {
        std::mem::take(&mut self.list)
    }

    /// Clip rectangles currently pushed.
    #[must_use]
    pub const fn clip_depth(&self) -> usize {
        self.clip_depth
    }
}

impl Surface for RecordingSurface {
    fn fill(&mut self, rect: Rect, color: Color) {
        self.list.push(DisplayCommand::Fill { rect, color });
    }

    fn draw_image(&mut self, image: &ImageHandle, rect: Rect) {
        self.list.push(DisplayCommand::Image {
            url: image.url.clone(),
            rect,
        });
    }

    fn draw_text(&mut self, font: &FontHandle, x: f32, y: f32, text: &str, color: Color) {
        self.list.push(DisplayCommand::Text {
            font: font.descriptor().key(),
            size: font.size(),
            x,
            y,
            text: text.to_string(),
            color,
        });
    }

    fn get_text_size(&mut self, font: &FontHandle, text: &str) -> Size {
        let size = font.size();
        Size::new(
            text.chars().count() as f32 * size * Self::ADVANCE_RATIO,
            size * 1.2,
        )
    }

    fn push_cliprect(&mut self, rect: Rect) {
        self.clip_depth += 1;
        self.list.push(DisplayCommand::PushClip { rect });
    }

    fn pop_cliprect(&mut self) {
        self.clip_depth = self.clip_depth.saturating_sub(1);
        self.list.push(DisplayCommand::PopClip);
    }
}
