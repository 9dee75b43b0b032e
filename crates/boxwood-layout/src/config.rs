//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::style::values::Color;

/// Tunables for box-tree construction, layout and painting.
///
/// Loaded from JSON by the command-line tool. Every field has a default, so
/// a partial file only overrides what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Deepest element nesting accepted by `create` and `layout`.
    pub max_depth: usize,
    /// Font size of the root element, in pixels.
    pub default_font_size: f32,
    /// Font family of the root element.
    pub default_font_family: String,
    /// Background painted behind selected text.
    #[serde(with = "color_hex")]
    pub selection_color: Color,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_depth: 512,
            default_font_size: 16.0,
            default_font_family: "serif".to_string(),
            selection_color: Color::rgb(0x33, 0x99, 0xff),
        }
    }
}

/// Colors appear as `"#rrggbb"` or any other CSS color string in config files.
mod color_hex {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    use crate::style::values::Color;

    pub(super) fn serialize<S: Serializer>(color: &Color, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format!(
            "#{:02x}{:02x}{:02x}{:02x}",
            color.r, color.g, color.b, color.a
        ))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Color, D::Error> {
        let text = String::deserialize(d)?;
        Color::parse(&text).ok_or_else(|| D::Error::custom(format!("invalid color '{text}'")))
    }
}
