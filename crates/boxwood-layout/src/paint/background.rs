//! Background painting.
//!
//! [§ 14.2 The background](https://www.w3.org/TR/CSS2/colors.html#background)
//!
//! "Backgrounds of elements are painted over the border box. The background
//! of the root element covers the entire canvas."

use crate::layout::box_model::Rect;
use crate::resources::ResourceCache;
use crate::style::properties::ComputedProperties;
use crate::style::values::BackgroundRepeat;

use super::surface::Surface;

/// Paint the background color and image of `style` over `area`.
///
/// A background image that fails to load is skipped.
pub fn paint_background(
    surface: &mut dyn Surface,
    resources: &mut dyn ResourceCache,
    style: &ComputedProperties,
    area: Rect,
) {
    if area.width <= 0.0 || area.height <= 0.0 {
        return;
    }
    if !style.background_color.is_transparent() {
        surface.fill(area, style.background_color);
    }

    let Some(url) = &style.background_image else {
        return;
    };
    let Some(image) = resources.get_image(url) else {
        return;
    };
    if image.width <= 0.0 || image.height <= 0.0 {
        return;
    }

    // [§ 14.2.1 'background-position']
    // "refer to the size of the padding box minus the size of the image"
    let (x, y) = style.background_position;
    let origin_x = area.x + x.resolve(Some(area.width - image.width));
    let origin_y = area.y + y.resolve(Some(area.height - image.height));

    let (repeat_x, repeat_y) = match style.background_repeat {
        BackgroundRepeat::Repeat => (true, true),
        BackgroundRepeat::RepeatX => (true, false),
        BackgroundRepeat::RepeatY => (false, true),
        BackgroundRepeat::NoRepeat => (false, false),
    };
    let columns = tile_starts(origin_x, image.width, area.x, area.right(), repeat_x);
    let rows = tile_starts(origin_y, image.height, area.y, area.bottom(), repeat_y);
    if columns.is_empty() || rows.is_empty() {
        return;
    }

    surface.push_cliprect(area);
    for &ty in &rows {
        for &tx in &columns {
            surface.draw_image(&image, Rect::new(tx, ty, image.width, image.height));
        }
    }
    surface.pop_cliprect();
}

/// Start coordinates of the tiles along one axis that touch `[start, end)`.
///
/// Without repetition only the tile at `origin` is kept, and only if it is
/// visible at all.
#[must_use]
pub fn tile_starts(origin: f32, tile: f32, start: f32, end: f32, repeat: bool) -> Vec<f32> {
    if !repeat {
        return if origin < end && origin + tile > start {
            vec![origin]
        } else {
            Vec::new()
        };
    }
    // Step back to the first tile that reaches `start`.
    let mut position = origin - ((origin - start) / tile).ceil() * tile;
    let mut tiles = Vec::new();
    while position < end {
        tiles.push(position);
        position += tile;
    }
    tiles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::display_list::{DisplayCommand, RecordingSurface};
    use crate::resources::ApproximateResources;
    use crate::style::values::{Color, LengthPercentage};

    #[test]
    fn repeated_tiles_cover_the_area_from_the_origin() {
        assert_eq!(tile_starts(5.0, 10.0, 0.0, 25.0, true), vec![-5.0, 5.0, 15.0]);
    }

    #[test]
    fn single_tile_outside_the_area_is_dropped() {
        assert_eq!(tile_starts(30.0, 10.0, 0.0, 25.0, false), Vec::<f32>::new());
        assert_eq!(tile_starts(20.0, 10.0, 0.0, 25.0, false), vec![20.0]);
    }

    #[test]
    fn missing_image_paints_only_the_color() {
        let mut surface = RecordingSurface::new();
        let mut resources = ApproximateResources::new();
        let style = ComputedProperties {
            background_color: Color::WHITE,
            background_image: Some("missing.png".to_string()),
            ..ComputedProperties::default()
        };
        paint_background(&mut surface, &mut resources, &style, Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(surface.display_list().len(), 1);
    }

    #[test]
    fn centered_no_repeat_image_is_clipped_once() {
        let mut surface = RecordingSurface::new();
        let mut resources = ApproximateResources::new();
        resources.add_image("dot.png", 10.0, 10.0);
        let style = ComputedProperties {
            background_image: Some("dot.png".to_string()),
            background_repeat: BackgroundRepeat::NoRepeat,
            background_position: (LengthPercentage::Percent(50.0), LengthPercentage::Percent(50.0)),
            ..ComputedProperties::default()
        };
        paint_background(&mut surface, &mut resources, &style, Rect::new(0.0, 0.0, 30.0, 50.0));
        let commands = surface.display_list().commands();
        assert_eq!(commands.len(), 3);
        assert_eq!(
            commands[1],
            DisplayCommand::Image {
                url: "dot.png".to_string(),
                rect: Rect::new(10.0, 20.0, 10.0, 10.0),
            }
        );
        assert_eq!(surface.clip_depth(), 0);
    }
}
