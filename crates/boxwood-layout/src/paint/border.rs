//! Border painting.
//!
//! [§ 8.5 Border properties](https://www.w3.org/TR/CSS2/box.html#border-properties)
//!
//! Each side is a strip of the border box. Top and bottom strips span the
//! full width including the corners; left and right strips fill the space
//! between them.

use crate::layout::box_model::{EdgeSizes, Rect};
use crate::style::properties::ComputedProperties;
use crate::style::values::{BorderStyle, Color};

use super::surface::Surface;

/// Darkening applied to the shadowed half of 3D styles.
const SHADOW: f32 = 0.5;
/// Lightening applied to the lit half of 3D styles.
const LIGHT: f32 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    const fn is_horizontal(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }

    /// Top and left sides face the light source.
    const fn faces_light(self) -> bool {
        matches!(self, Self::Top | Self::Left)
    }
}

/// Paint the borders of `border_box` with the styles and colors of `style`
/// and the given widths. A zero width suppresses a side, which is how
/// inline boxes split across lines drop their inner edges.
pub fn paint_borders(surface: &mut dyn Surface, style: &ComputedProperties, border_box: Rect, widths: EdgeSizes) {
    let Rect { x, y, width, height } = border_box;
    let middle = (height - widths.top - widths.bottom).max(0.0);
    let sides = [
        (Side::Top, Rect::new(x, y, width, widths.top), style.border_style.top, style.border_color.top),
        (
            Side::Bottom,
            Rect::new(x, y + height - widths.bottom, width, widths.bottom),
            style.border_style.bottom,
            style.border_color.bottom,
        ),
        (
            Side::Left,
            Rect::new(x, y + widths.top, widths.left, middle),
            style.border_style.left,
            style.border_color.left,
        ),
        (
            Side::Right,
            Rect::new(x + width - widths.right, y + widths.top, widths.right, middle),
            style.border_style.right,
            style.border_color.right,
        ),
    ];
    for (side, strip, border_style, color) in sides {
        if strip.width <= 0.0 || strip.height <= 0.0 || !border_style.is_visible() || color.is_transparent() {
            continue;
        }
        paint_side(surface, side, strip, border_style, color);
    }
}

fn paint_side(surface: &mut dyn Surface, side: Side, strip: Rect, style: BorderStyle, color: Color) {
    let thickness = if side.is_horizontal() { strip.height } else { strip.width };
    match style {
        BorderStyle::None | BorderStyle::Hidden => {}
        BorderStyle::Solid => surface.fill(strip, color),
        // "The border is a series of dots."
        BorderStyle::Dotted => {
            for segment in segments(strip, side, thickness, thickness) {
                surface.fill(segment, color);
            }
        }
        // "The border is a series of short line segments."
        BorderStyle::Dashed => {
            for segment in segments(strip, side, thickness * 3.0, thickness * 2.0) {
                surface.fill(segment, color);
            }
        }
        // "The sum of the two lines and the space between them equals the
        // value of 'border-width'."
        BorderStyle::Double => {
            let (outer, _) = split(strip, side, 1.0 / 3.0);
            let (_, inner) = split(strip, side, 2.0 / 3.0);
            surface.fill(outer, color);
            surface.fill(inner, color);
        }
        BorderStyle::Inset | BorderStyle::Outset => {
            let sunken = style == BorderStyle::Inset;
            let shade = if side.faces_light() == sunken { SHADOW } else { LIGHT };
            surface.fill(strip, color.shade(shade));
        }
        BorderStyle::Groove | BorderStyle::Ridge => {
            let carved = style == BorderStyle::Groove;
            let (outer, inner) = split(strip, side, 0.5);
            let (outer_shade, inner_shade) = if side.faces_light() == carved {
                (SHADOW, LIGHT)
            } else {
                (LIGHT, SHADOW)
            };
            surface.fill(outer, color.shade(outer_shade));
            surface.fill(inner, color.shade(inner_shade));
        }
    }
}

/// Split a strip across its thickness: the outer part takes `fraction` of
/// it, the inner part the rest.
fn split(strip: Rect, side: Side, fraction: f32) -> (Rect, Rect) {
    match side {
        Side::Top => {
            let outer = strip.height * fraction;
            (
                Rect::new(strip.x, strip.y, strip.width, outer),
                Rect::new(strip.x, strip.y + outer, strip.width, strip.height - outer),
            )
        }
        Side::Bottom => {
            let outer = strip.height * fraction;
            (
                Rect::new(strip.x, strip.bottom() - outer, strip.width, outer),
                Rect::new(strip.x, strip.y, strip.width, strip.height - outer),
            )
        }
        Side::Left => {
            let outer = strip.width * fraction;
            (
                Rect::new(strip.x, strip.y, outer, strip.height),
                Rect::new(strip.x + outer, strip.y, strip.width - outer, strip.height),
            )
        }
        Side::Right => {
            let outer = strip.width * fraction;
            (
                Rect::new(strip.right() - outer, strip.y, outer, strip.height),
                Rect::new(strip.x, strip.y, strip.width - outer, strip.height),
            )
        }
    }
}

/// Dash rectangles along a strip, `on` long with `off` gaps. The last dash
/// is cut at the strip's end.
fn segments(strip: Rect, side: Side, on: f32, off: f32) -> Vec<Rect> {
    let (start, length) = if side.is_horizontal() {
        (strip.x, strip.width)
    } else {
        (strip.y, strip.height)
    };
    let mut out = Vec::new();
    if on <= 0.0 {
        return out;
    }
    let mut offset = 0.0;
    while offset < length {
        let run = on.min(length - offset);
        out.push(if side.is_horizontal() {
            Rect::new(start + offset, strip.y, run, strip.height)
        } else {
            Rect::new(strip.x, start + offset, strip.width, run)
        });
        offset += on + off;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::display_list::{DisplayCommand, RecordingSurface};
    use crate::style::properties::Sides;

    fn styled(border_style: BorderStyle) -> ComputedProperties {
        ComputedProperties {
            border_style: Sides::all(border_style),
            border_color: Sides::all(Color::rgb(200, 100, 50)),
            ..ComputedProperties::default()
        }
    }

    fn fills(surface: &RecordingSurface) -> Vec<Rect> {
        surface
            .display_list()
            .commands()
            .iter()
            .filter_map(|c| match c {
                DisplayCommand::Fill { rect, .. } => Some(*rect),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn solid_sides_tile_the_border_area() {
        let mut surface = RecordingSurface::new();
        let widths = EdgeSizes {
            top: 2.0,
            right: 3.0,
            bottom: 4.0,
            left: 5.0,
        };
        paint_borders(&mut surface, &styled(BorderStyle::Solid), Rect::new(0.0, 0.0, 100.0, 50.0), widths);
        assert_eq!(
            fills(&surface),
            vec![
                Rect::new(0.0, 0.0, 100.0, 2.0),
                Rect::new(0.0, 46.0, 100.0, 4.0),
                Rect::new(0.0, 2.0, 5.0, 44.0),
                Rect::new(97.0, 2.0, 3.0, 44.0),
            ]
        );
    }

    #[test]
    fn zero_width_side_is_skipped() {
        let mut surface = RecordingSurface::new();
        let widths = EdgeSizes {
            top: 1.0,
            ..EdgeSizes::default()
        };
        paint_borders(&mut surface, &styled(BorderStyle::Solid), Rect::new(0.0, 0.0, 10.0, 10.0), widths);
        assert_eq!(fills(&surface).len(), 1);
    }

    #[test]
    fn double_draws_two_thirds_apart() {
        let mut surface = RecordingSurface::new();
        let widths = EdgeSizes {
            top: 3.0,
            ..EdgeSizes::default()
        };
        paint_borders(&mut surface, &styled(BorderStyle::Double), Rect::new(0.0, 0.0, 10.0, 10.0), widths);
        assert_eq!(
            fills(&surface),
            vec![Rect::new(0.0, 0.0, 10.0, 1.0), Rect::new(0.0, 2.0, 10.0, 1.0)]
        );
    }

    #[test]
    fn dotted_segments_end_at_the_strip() {
        let strip = Rect::new(0.0, 0.0, 5.0, 2.0);
        let dots = segments(strip, Side::Top, 2.0, 2.0);
        assert_eq!(
            dots,
            vec![Rect::new(0.0, 0.0, 2.0, 2.0), Rect::new(4.0, 0.0, 1.0, 2.0)]
        );
    }

    #[test]
    fn inset_darkens_top_and_lightens_bottom() {
        let color = Color::rgb(100, 100, 100);
        let mut surface = RecordingSurface::new();
        paint_side(&mut surface, Side::Top, Rect::new(0.0, 0.0, 10.0, 2.0), BorderStyle::Inset, color);
        paint_side(&mut surface, Side::Bottom, Rect::new(0.0, 8.0, 10.0, 2.0), BorderStyle::Inset, color);
        let colors: Vec<Color> = surface
            .display_list()
            .commands()
            .iter()
            .filter_map(|c| match c {
                DisplayCommand::Fill { color, .. } => Some(*color),
                _ => None,
            })
            .collect();
        assert_eq!(colors, vec![Color::rgb(50, 50, 50), Color::rgb(150, 150, 150)]);
    }
}
