//! Fonts, images and physical length resolution.
//!
//! Layout never loads anything itself. It asks a [`ResourceCache`] for font
//! handles, font metrics, images and absolute lengths. Embedders back this
//! with a real font stack; [`ApproximateResources`] is a self-contained
//! implementation with fixed metric ratios, used by the command-line tool and
//! the tests.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use serde::Serialize;

use crate::error::{LayoutError, Result};
use crate::style::properties::ComputedProperties;
use crate::style::values::{FontStyle, Length, LengthUnit};

/// The parts of the computed style that select a font face.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FontDescriptor {
    /// Family name.
    pub family: String,
    /// Size in pixels.
    pub size: f32,
    /// Numeric weight, 100 to 900.
    pub weight: u16,
    /// Upright, italic or oblique.
    pub style: FontStyle,
}

impl FontDescriptor {
    /// The font requested by a computed style.
    #[must_use]
    pub fn from_properties(props: &ComputedProperties) -> Self {
        Self {
            family: props.font_family.clone(),
            size: props.font_size,
            weight: props.font_weight,
            style: props.font_style,
        }
    }

    /// Stable cache key, also used by display lists.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}-{}-{}-{:?}", self.family, self.size, self.weight, self.style)
    }
}

/// A shared handle to a loaded font.
#[derive(Debug, Clone, PartialEq)]
pub struct FontHandle(Rc<FontDescriptor>);

impl FontHandle {
    /// Wrap a descriptor.
    #[must_use]
    pub fn new(descriptor: FontDescriptor) -> Self {
        Self(Rc::new(descriptor))
    }

    /// The face this handle was loaded for.
    #[must_use]
    pub fn descriptor(&self) -> &FontDescriptor {
        &self.0
    }

    /// Font size in pixels.
    #[must_use]
    pub fn size(&self) -> f32 {
        self.0.size
    }
}

impl fmt::Display for FontHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.key())
    }
}

/// [§ 10.8.1 Leading and half-leading](https://www.w3.org/TR/CSS2/visudet.html#leading)
///
/// Vertical metrics of a font in pixels. `ascent` is above the baseline,
/// `descent` below it, both positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FontMetrics {
    /// Distance from baseline to the top of the em box.
    pub ascent: f32,
    /// Distance from baseline to the bottom of the em box.
    pub descent: f32,
    /// Default line spacing.
    pub height: f32,
    /// [§ 4.3.2](https://www.w3.org/TR/CSS2/syndata.html#length-units)
    /// "the 'x-height' is so called because it is often equal to the height
    /// of the lowercase 'x'."
    pub x_height: f32,
}

/// A loaded raster image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageHandle {
    /// Source URL.
    pub url: String,
    /// Intrinsic width in pixels.
    pub width: f32,
    /// Intrinsic height in pixels.
    pub height: f32,
}

/// Font, image and length services consumed by layout and paint.
pub trait ResourceCache {
    /// Font face for a computed style.
    fn get_font(&mut self, props: &ComputedProperties) -> FontHandle;

    /// Vertical metrics of a font.
    fn get_font_metrics(&self, font: &FontHandle) -> FontMetrics;

    /// Image for a URL, or `None` if it failed to load.
    fn get_image(&mut self, url: &str) -> Option<ImageHandle>;

    /// [§ 4.3.2 Lengths](https://www.w3.org/TR/CSS2/syndata.html#length-units)
    ///
    /// Convert a length to pixels given the font size (`em`) and x-height (`ex`).
    ///
    /// # Errors
    ///
    /// Fails with [`LayoutError::UnresolvableUnit`] for percentages, which
    /// need a containing block and must never reach this point.
    fn compute_length(&self, length: Length, em: f32, ex: f32) -> Result<f32> {
        absolute_length(length, em, ex)
    }
}

/// [§ 4.3.2](https://www.w3.org/TR/CSS2/syndata.html#length-units)
///
/// "1in = 2.54cm = 25.4mm = 72pt = 6pc" and "1px = 0.75pt".
///
/// # Errors
///
/// Fails with [`LayoutError::UnresolvableUnit`] for percentages.
pub fn absolute_length(length: Length, em: f32, ex: f32) -> Result<f32> {
    let px = match length.unit {
        LengthUnit::Px => length.value,
        LengthUnit::Em => length.value * em,
        LengthUnit::Ex => length.value * ex,
        LengthUnit::In => length.value * 96.0,
        LengthUnit::Cm => length.value * 96.0 / 2.54,
        LengthUnit::Mm => length.value * 96.0 / 25.4,
        LengthUnit::Pt => length.value * 96.0 / 72.0,
        LengthUnit::Pc => length.value * 16.0,
        LengthUnit::Percent => return Err(LayoutError::UnresolvableUnit(length)),
    };
    Ok(px)
}

/// A resource cache with fixed metric ratios and registered images.
///
/// | metric | value |
/// |---|---|
/// | ascent | 0.8 × size |
/// | descent | 0.2 × size |
/// | height | 1.2 × size |
/// | x-height | 0.5 × size |
///
/// Images are only known if registered with [`add_image`](Self::add_image);
/// every other URL fails to load.
#[derive(Debug, Default)]
pub struct ApproximateResources {
    fonts: HashMap<String, FontHandle>,
    images: HashMap<String, ImageHandle>,
}

impl ApproximateResources {
    /// An empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `url` loadable with the given intrinsic size.
    pub fn add_image(&mut self, url: &str, width: f32, height: f32) {
        let _ = self.images.insert(
            url.to_string(),
            ImageHandle {
                url: url.to_string(),
                width,
                height,
            },
        );
    }
}

impl ResourceCache for ApproximateResources {
    fn get_font(&mut self, props: &ComputedProperties) -> FontHandle {
        let descriptor = FontDescriptor::from_properties(props);
        self.fonts
            .entry(descriptor.key())
            .or_insert_with(|| FontHandle::new(descriptor))
            .clone()
    }

    fn get_font_metrics(&self, font: &FontHandle) -> FontMetrics {
        let size = font.size();
        FontMetrics {
            ascent: size * 0.8,
            descent: size * 0.2,
            height: size * 1.2,
            x_height: size * 0.5,
        }
    }

    fn get_image(&mut self, url: &str) -> Option<ImageHandle> {
        self.images.get(url).cloned()
    }
}
