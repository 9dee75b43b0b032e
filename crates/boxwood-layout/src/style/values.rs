//! CSS value types: lengths, colors and keyword enums.
//!
//! - [CSS 2.1 § 4.3 Values](https://www.w3.org/TR/CSS2/syndata.html#values)
//! - [CSS Color Level 4](https://www.w3.org/TR/css-color-4/)
//!
//! Specified lengths keep their unit ([`Length`]). Computed values replace
//! every unit except percentages with pixels; percentages stay symbolic until
//! layout knows the containing block.

use serde::Serialize;
use strum_macros::EnumString;

// ─────────────────────────────────────────────────────────────────────────────
// Lengths
// ─────────────────────────────────────────────────────────────────────────────

/// [§ 4.3.2 Lengths](https://www.w3.org/TR/CSS2/syndata.html#length-units)
///
/// The closed set of units the declaration parser produces. `Percent` is
/// listed here so a single [`Length`] type can carry `<length>` and
/// `<percentage>` alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumString, strum_macros::Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LengthUnit {
    /// "pixel units: 1px is equal to 0.75pt"
    Px,
    /// "the 'font-size' of the relevant font"
    Em,
    /// "the 'x-height' of the relevant font"
    Ex,
    /// "inches: 1in is equal to 2.54cm"
    In,
    /// "centimeters"
    Cm,
    /// "millimeters"
    Mm,
    /// "points: the points used by CSS are equal to 1/72nd of 1in"
    Pt,
    /// "picas: 1pc is equal to 12pt"
    Pc,
    /// [§ 4.3.3 Percentages](https://www.w3.org/TR/CSS2/syndata.html#percentage-units)
    #[strum(serialize = "%")]
    Percent,
}

/// A specified length: a number and its unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Length {
    /// The numeric part.
    pub value: f32,
    /// The unit part.
    pub unit: LengthUnit,
}

impl Length {
    /// A length in CSS pixels.
    #[must_use]
    pub const fn px(value: f32) -> Self {
        Self {
            value,
            unit: LengthUnit::Px,
        }
    }

    /// A percentage.
    #[must_use]
    pub const fn percent(value: f32) -> Self {
        Self {
            value,
            unit: LengthUnit::Percent,
        }
    }

    /// A length in ems.
    #[must_use]
    pub const fn em(value: f32) -> Self {
        Self {
            value,
            unit: LengthUnit::Em,
        }
    }

    /// True for `%` lengths, which resolve against a containing block.
    #[must_use]
    pub fn is_percent(&self) -> bool {
        self.unit == LengthUnit::Percent
    }

    /// Parse a single dimension token such as `12px`, `1.5em`, `50%` or `0`.
    ///
    /// [§ 4.3.2](https://www.w3.org/TR/CSS2/syndata.html#length-units)
    /// "After a zero length, the unit identifier is optional."
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        let split = token
            .char_indices()
            .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && (c == '-' || c == '+'))))
            .map_or(token.len(), |(i, _)| i);
        let (number, unit) = token.split_at(split);
        let value: f32 = number.parse().ok()?;
        if unit.is_empty() {
            return (value == 0.0).then_some(Self::px(0.0));
        }
        let unit: LengthUnit = unit.parse().ok()?;
        Some(Self { value, unit })
    }
}

/// Computed `<length> | <percentage> | auto`, used by `width`, `height`,
/// margins and the box offsets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Default)]
pub enum LengthPercentageAuto {
    /// "The keyword 'auto' allows the user agent to compute the value
    /// based on other properties."
    #[default]
    Auto,
    /// Absolute pixels.
    Px(f32),
    /// Percentage of the containing block.
    Percent(f32),
}

impl LengthPercentageAuto {
    /// True for `auto`.
    #[must_use]
    pub const fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }

    /// Resolve against a containing block dimension; `None` for `auto`.
    ///
    /// A percentage against an indefinite basis also resolves to `None`.
    #[must_use]
    pub fn resolve(&self, basis: Option<f32>) -> Option<f32> {
        match *self {
            Self::Auto => None,
            Self::Px(px) => Some(px),
            Self::Percent(p) => basis.map(|b| b * p / 100.0),
        }
    }
}

/// Computed `<length> | <percentage>`, used by padding, `min-*` and `text-indent`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum LengthPercentage {
    /// Absolute pixels.
    Px(f32),
    /// Percentage of the containing block.
    Percent(f32),
}

impl Default for LengthPercentage {
    fn default() -> Self {
        Self::Px(0.0)
    }
}

impl LengthPercentage {
    /// Resolve against a basis; an unknown basis makes percentages zero.
    #[must_use]
    pub fn resolve(&self, basis: Option<f32>) -> f32 {
        match *self {
            Self::Px(px) => px,
            Self::Percent(p) => basis.map_or(0.0, |b| b * p / 100.0),
        }
    }
}

/// Computed `<length> | <percentage> | none`, used by `max-width`/`max-height`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Default)]
pub enum MaxSize {
    /// "No limit on the size of the box."
    #[default]
    None,
    /// Absolute pixels.
    Px(f32),
    /// Percentage of the containing block.
    Percent(f32),
}

impl MaxSize {
    /// Resolve against a basis; `None` means unconstrained.
    #[must_use]
    pub fn resolve(&self, basis: Option<f32>) -> Option<f32> {
        match *self {
            Self::None => None,
            Self::Px(px) => Some(px),
            Self::Percent(p) => basis.map(|b| b * p / 100.0),
        }
    }
}

/// [§ 10.8.1 'line-height'](https://www.w3.org/TR/CSS2/visudet.html#propdef-line-height)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Default)]
pub enum LineHeight {
    /// "Tells user agents to set the used value to a 'reasonable' value
    /// based on the font of the element." Used value: 1.2 × font size.
    #[default]
    Normal,
    /// "The used value of the property is this number multiplied by the
    /// element's font size." Inherited as the number.
    Number(f32),
    /// Absolute pixels.
    Px(f32),
}

impl LineHeight {
    /// Used line height for a given font size.
    #[must_use]
    pub fn used(&self, font_size: f32) -> f32 {
        match *self {
            Self::Normal => font_size * 1.2,
            Self::Number(n) => font_size * n,
            Self::Px(px) => px,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Colors
// ─────────────────────────────────────────────────────────────────────────────

/// sRGB color with 8-bit channels.
///
/// [§ 4.3.6 Colors](https://www.w3.org/TR/CSS2/syndata.html#color-units)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel, 255 = opaque.
    pub a: u8,
}

impl Color {
    /// Opaque black, the initial `color`.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Fully transparent, the initial `background-color`.
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    /// An opaque color from channels.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// True if painting this color has no visible effect.
    #[must_use]
    pub const fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Scale the RGB channels, used for 3D border shading.
    #[must_use]
    pub fn shade(&self, factor: f32) -> Self {
        let scale = |c: u8| (f32::from(c) * factor).round().clamp(0.0, 255.0) as u8;
        Self {
            r: scale(self.r),
            g: scale(self.g),
            b: scale(self.b),
            a: self.a,
        }
    }

    /// [§ 4.2 The RGB hexadecimal notations](https://www.w3.org/TR/css-color-4/#hex-notation)
    ///
    /// Accepts 3, 4, 6 or 8 hex digits, with or without the leading `#`.
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return None;
        }
        let digit = |s: &str| u8::from_str_radix(s, 16).ok();
        let short = |i: usize| digit(&hex[i..=i].repeat(2));
        let long = |i: usize| digit(&hex[i * 2..i * 2 + 2]);
        match hex.len() {
            // "The three-digit RGB notation (#RGB) is converted into six-digit
            // form (#RRGGBB) by replicating digits, not by adding zeros."
            3 => Some(Self::rgb(short(0)?, short(1)?, short(2)?)),
            4 => Some(Self {
                r: short(0)?,
                g: short(1)?,
                b: short(2)?,
                a: short(3)?,
            }),
            6 => Some(Self::rgb(long(0)?, long(1)?, long(2)?)),
            8 => Some(Self {
                r: long(0)?,
                g: long(1)?,
                b: long(2)?,
                a: long(3)?,
            }),
            _ => None,
        }
    }

    /// [§ 6.1 Named Colors](https://www.w3.org/TR/css-color-4/#named-colors)
    ///
    /// Case-insensitive lookup in [`NAMED_COLORS`].
    #[must_use]
    pub fn from_named(name: &str) -> Option<Self> {
        let name = name.to_ascii_lowercase();
        if name == "transparent" {
            return Some(Self::TRANSPARENT);
        }
        NAMED_COLORS
            .binary_search_by(|(n, _)| (*n).cmp(name.as_str()))
            .ok()
            .map(|i| NAMED_COLORS[i].1)
    }

    /// Parse a color token: a hex color, a name, or `rgb()`/`rgba()`.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        if token.starts_with('#') {
            return Self::from_hex(token);
        }
        let lower = token.to_ascii_lowercase();
        if let Some(args) = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return Self::parse_rgb_args(args);
        }
        Self::from_named(&lower)
    }

    /// [§ 4.1 The RGB functions](https://www.w3.org/TR/css-color-4/#rgb-functions)
    fn parse_rgb_args(args: &str) -> Option<Self> {
        let parts: Vec<&str> = args
            .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .collect();
        if parts.len() != 3 && parts.len() != 4 {
            return None;
        }
        let channel = |s: &str| -> Option<u8> {
            if let Some(p) = s.strip_suffix('%') {
                let p: f32 = p.parse().ok()?;
                Some((p.clamp(0.0, 100.0) * 2.55).round() as u8)
            } else {
                let v: f32 = s.parse().ok()?;
                Some(v.round().clamp(0.0, 255.0) as u8)
            }
        };
        let alpha = match parts.get(3) {
            None => 255,
            Some(s) => {
                if let Some(p) = s.strip_suffix('%') {
                    let p: f32 = p.parse().ok()?;
                    (p.clamp(0.0, 100.0) * 2.55).round() as u8
                } else {
                    let v: f32 = s.parse().ok()?;
                    (v.clamp(0.0, 1.0) * 255.0).round() as u8
                }
            }
        };
        Some(Self {
            r: channel(parts[0])?,
            g: channel(parts[1])?,
            b: channel(parts[2])?,
            a: alpha,
        })
    }
}

/// Named colors, sorted by name for binary search.
///
/// The seventeen CSS2.1 colors plus the commonly used extended keywords.
pub const NAMED_COLORS: &[(&str, Color)] = &[
    ("aqua", Color::rgb(0, 255, 255)),
    ("azure", Color::rgb(240, 255, 255)),
    ("beige", Color::rgb(245, 245, 220)),
    ("black", Color::rgb(0, 0, 0)),
    ("blue", Color::rgb(0, 0, 255)),
    ("brown", Color::rgb(165, 42, 42)),
    ("chocolate", Color::rgb(210, 105, 30)),
    ("coral", Color::rgb(255, 127, 80)),
    ("crimson", Color::rgb(220, 20, 60)),
    ("cyan", Color::rgb(0, 255, 255)),
    ("darkblue", Color::rgb(0, 0, 139)),
    ("darkgray", Color::rgb(169, 169, 169)),
    ("darkgreen", Color::rgb(0, 100, 0)),
    ("darkgrey", Color::rgb(169, 169, 169)),
    ("darkred", Color::rgb(139, 0, 0)),
    ("fuchsia", Color::rgb(255, 0, 255)),
    ("gainsboro", Color::rgb(220, 220, 220)),
    ("gold", Color::rgb(255, 215, 0)),
    ("gray", Color::rgb(128, 128, 128)),
    ("green", Color::rgb(0, 128, 0)),
    ("grey", Color::rgb(128, 128, 128)),
    ("hotpink", Color::rgb(255, 105, 180)),
    ("indigo", Color::rgb(75, 0, 130)),
    ("ivory", Color::rgb(255, 255, 240)),
    ("khaki", Color::rgb(240, 230, 140)),
    ("lavender", Color::rgb(230, 230, 250)),
    ("lightblue", Color::rgb(173, 216, 230)),
    ("lightgray", Color::rgb(211, 211, 211)),
    ("lightgreen", Color::rgb(144, 238, 144)),
    ("lightgrey", Color::rgb(211, 211, 211)),
    ("lightyellow", Color::rgb(255, 255, 224)),
    ("lime", Color::rgb(0, 255, 0)),
    ("linen", Color::rgb(250, 240, 230)),
    ("magenta", Color::rgb(255, 0, 255)),
    ("maroon", Color::rgb(128, 0, 0)),
    ("navy", Color::rgb(0, 0, 128)),
    ("olive", Color::rgb(128, 128, 0)),
    ("orange", Color::rgb(255, 165, 0)),
    ("orchid", Color::rgb(218, 112, 214)),
    ("pink", Color::rgb(255, 192, 203)),
    ("plum", Color::rgb(221, 160, 221)),
    ("purple", Color::rgb(128, 0, 128)),
    ("red", Color::rgb(255, 0, 0)),
    ("salmon", Color::rgb(250, 128, 114)),
    ("silver", Color::rgb(192, 192, 192)),
    ("skyblue", Color::rgb(135, 206, 235)),
    ("tan", Color::rgb(210, 180, 140)),
    ("teal", Color::rgb(0, 128, 128)),
    ("tomato", Color::rgb(255, 99, 71)),
    ("turquoise", Color::rgb(64, 224, 208)),
    ("violet", Color::rgb(238, 130, 238)),
    ("wheat", Color::rgb(245, 222, 179)),
    ("white", Color::rgb(255, 255, 255)),
    ("whitesmoke", Color::rgb(245, 245, 245)),
    ("yellow", Color::rgb(255, 255, 0)),
    ("yellowgreen", Color::rgb(154, 205, 50)),
];

// ─────────────────────────────────────────────────────────────────────────────
// Keyword properties
// ─────────────────────────────────────────────────────────────────────────────

/// [§ 9.2.4 The 'display' property](https://www.w3.org/TR/CSS2/visuren.html#display-prop)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumString, Default)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Display {
    /// "This value causes an element to generate one or more inline boxes."
    #[default]
    Inline,
    /// "This value causes an element to generate a block box."
    Block,
    /// "This value causes an element to generate a principal block box and
    /// a marker box."
    ListItem,
    /// "This value creates either block or inline boxes, depending on context."
    RunIn,
    /// "This value causes an element to generate an inline-level block container."
    InlineBlock,
    /// A block-level table.
    Table,
    /// An inline-level table.
    InlineTable,
    /// A group of one or more rows.
    TableRowGroup,
    /// Like `table-row-group`, but always displayed before all other rows.
    TableHeaderGroup,
    /// Like `table-row-group`, but always displayed after all other rows.
    TableFooterGroup,
    /// A row of cells.
    TableRow,
    /// A group of one or more columns.
    TableColumnGroup,
    /// A column of cells.
    TableColumn,
    /// A table cell.
    TableCell,
    /// A table caption.
    TableCaption,
    /// "This value causes an element to not appear in the formatting structure."
    None,
}

impl Display {
    /// Block-level values: the box participates in a block formatting context.
    #[must_use]
    pub const fn is_block_level(self) -> bool {
        matches!(self, Self::Block | Self::ListItem | Self::Table)
    }

    /// Inline-level values: the box participates in an inline formatting context.
    #[must_use]
    pub const fn is_inline_level(self) -> bool {
        matches!(self, Self::Inline | Self::InlineBlock | Self::InlineTable)
    }

    /// Table-internal values that only make sense inside a table.
    #[must_use]
    pub const fn is_table_part(self) -> bool {
        matches!(
            self,
            Self::TableRowGroup
                | Self::TableHeaderGroup
                | Self::TableFooterGroup
                | Self::TableRow
                | Self::TableColumnGroup
                | Self::TableColumn
                | Self::TableCell
                | Self::TableCaption
        )
    }

    /// Row groups of any kind.
    #[must_use]
    pub const fn is_row_group(self) -> bool {
        matches!(
            self,
            Self::TableRowGroup | Self::TableHeaderGroup | Self::TableFooterGroup
        )
    }

    /// `table` or `inline-table`.
    #[must_use]
    pub const fn is_table(self) -> bool {
        matches!(self, Self::Table | Self::InlineTable)
    }

    /// [§ 9.7 Relationships between 'display', 'position', and 'float'](https://www.w3.org/TR/CSS2/visuren.html#dis-pos-flo)
    ///
    /// The computed display of floated, absolutely positioned and root boxes.
    #[must_use]
    pub const fn blockified(self) -> Self {
        match self {
            Self::InlineTable => Self::Table,
            Self::Inline
            | Self::RunIn
            | Self::TableRowGroup
            | Self::TableHeaderGroup
            | Self::TableFooterGroup
            | Self::TableRow
            | Self::TableColumnGroup
            | Self::TableColumn
            | Self::TableCell
            | Self::TableCaption
            | Self::InlineBlock => Self::Block,
            other => other,
        }
    }
}

/// [§ 9.3.1 Choosing a positioning scheme: 'position' property](https://www.w3.org/TR/CSS2/visuren.html#choose-position)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumString, Default)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Position {
    /// "The box is a normal box, laid out according to the normal flow."
    #[default]
    Static,
    /// "The box's position is calculated according to the normal flow.
    /// Then the box is offset relative to its normal position."
    Relative,
    /// "The box's position is specified with the 'top', 'right', 'bottom',
    /// and 'left' properties."
    Absolute,
    /// "The box's position is calculated according to the 'absolute' model,
    /// but in addition, the box is fixed with respect to some reference."
    Fixed,
}

impl Position {
    /// `absolute` or `fixed`: the box is taken out of flow.
    #[must_use]
    pub const fn is_out_of_flow(self) -> bool {
        matches!(self, Self::Absolute | Self::Fixed)
    }

    /// Anything but `static`.
    #[must_use]
    pub const fn is_positioned(self) -> bool {
        !matches!(self, Self::Static)
    }
}

/// [§ 9.5.1 Positioning the float: the 'float' property](https://www.w3.org/TR/CSS2/visuren.html#float-position)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumString, Default)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Float {
    /// "The box is not floated."
    #[default]
    None,
    /// "The element generates a block box that is floated to the left."
    Left,
    /// "The element generates a block box that is floated to the right."
    Right,
}

/// [§ 9.5.2 Controlling flow next to floats: the 'clear' property](https://www.w3.org/TR/CSS2/visuren.html#flow-control)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumString, Default)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Clear {
    /// "No constraint on the box's position with respect to floats."
    #[default]
    None,
    /// "below the bottom outer edge of any left-floating boxes"
    Left,
    /// "below the bottom outer edge of any right-floating boxes"
    Right,
    /// "below the bottom outer edge of any right-floating and left-floating boxes"
    Both,
}

/// [§ 9.9.1 Specifying the stack level: the 'z-index' property](https://www.w3.org/TR/CSS2/visuren.html#z-index)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
pub enum ZIndex {
    /// "The stack level of the generated box in the current stacking context
    /// is 0. The box does not establish a new stacking context."
    #[default]
    Auto,
    /// "This integer is the stack level of the generated box in the current
    /// stacking context. The box also establishes a new stacking context."
    Integer(i32),
}

/// [§ 8.5.3 Border style](https://www.w3.org/TR/CSS2/box.html#border-style-properties)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumString, Default)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum BorderStyle {
    /// "No border; the computed border width is zero."
    #[default]
    None,
    /// "Same as 'none', except in terms of border conflict resolution."
    Hidden,
    /// "The border is a series of dots."
    Dotted,
    /// "The border is a series of short line segments."
    Dashed,
    /// "The border is a single line segment."
    Solid,
    /// "The border is two solid lines."
    Double,
    /// "The border looks as though it were carved into the canvas."
    Groove,
    /// "The opposite of 'groove'."
    Ridge,
    /// "The border makes the box look as though it were embedded in the canvas."
    Inset,
    /// "The opposite of 'inset'."
    Outset,
}

impl BorderStyle {
    /// `none` and `hidden` force the used border width to zero.
    #[must_use]
    pub const fn is_visible(self) -> bool {
        !matches!(self, Self::None | Self::Hidden)
    }
}

/// [§ 14.2.1 'background-repeat'](https://www.w3.org/TR/CSS2/colors.html#propdef-background-repeat)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumString, Default)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum BackgroundRepeat {
    /// "The image is repeated both horizontally and vertically."
    #[default]
    Repeat,
    /// "The image is repeated horizontally only."
    RepeatX,
    /// "The image is repeated vertically only."
    RepeatY,
    /// "The image is not repeated: only one copy of the image is drawn."
    NoRepeat,
}

/// [§ 15.7 'font-style'](https://www.w3.org/TR/CSS2/fonts.html#font-styling)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumString, Default)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum FontStyle {
    /// Upright glyphs.
    #[default]
    Normal,
    /// Italic glyphs.
    Italic,
    /// Slanted glyphs.
    Oblique,
}

/// [§ 16.2 Alignment: the 'text-align' property](https://www.w3.org/TR/CSS2/text.html#alignment-prop)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumString, Default)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum TextAlign {
    /// "'left' if 'direction' is 'ltr', and 'right' if 'direction' is 'rtl'"
    #[default]
    Start,
    /// Flush left.
    Left,
    /// Flush right.
    Right,
    /// Centered.
    Center,
    /// "Text is justified according to the method specified by 'text-justify'."
    Justify,
}

/// [§ 10.8.1 'vertical-align'](https://www.w3.org/TR/CSS2/visudet.html#propdef-vertical-align)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, EnumString, Default)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum VerticalAlign {
    /// "Align the baseline of the box with the baseline of the parent box."
    #[default]
    Baseline,
    /// "Lower the baseline of the box to the proper position for subscripts."
    Sub,
    /// "Raise the baseline of the box to the proper position for superscripts."
    Super,
    /// "Align the top of the box with the top of the parent's content area."
    TextTop,
    /// "Align the bottom of the box with the bottom of the parent's content area."
    TextBottom,
    /// "Align the vertical midpoint of the box with the baseline of the parent
    /// box plus half the x-height of the parent."
    Middle,
    /// "Align the top of the aligned subtree with the top of the line box."
    Top,
    /// "Align the bottom of the aligned subtree with the bottom of the line box."
    Bottom,
    /// "Raise (positive value) or lower (negative value) the box by this distance."
    /// Pixels in computed values.
    #[strum(disabled)]
    Offset(f32),
}

/// [§ 16.6 Whitespace: the 'white-space' property](https://www.w3.org/TR/CSS2/text.html#white-space-prop)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumString, Default)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum WhiteSpace {
    /// Collapse whitespace, wrap lines.
    #[default]
    Normal,
    /// Preserve whitespace, never wrap.
    Pre,
    /// Collapse whitespace, never wrap.
    Nowrap,
    /// Preserve whitespace, wrap lines.
    PreWrap,
    /// Collapse spaces, keep newlines, wrap lines.
    PreLine,
}

impl WhiteSpace {
    /// Runs of spaces and tabs collapse to one space.
    #[must_use]
    pub const fn collapses_spaces(self) -> bool {
        matches!(self, Self::Normal | Self::Nowrap | Self::PreLine)
    }

    /// Newlines are kept as forced breaks.
    #[must_use]
    pub const fn preserves_newlines(self) -> bool {
        matches!(self, Self::Pre | Self::PreWrap | Self::PreLine)
    }

    /// Lines may wrap at spaces.
    #[must_use]
    pub const fn allows_soft_wrap(self) -> bool {
        matches!(self, Self::Normal | Self::PreWrap | Self::PreLine)
    }
}

/// [§ 9.10 Text direction: the 'direction' property](https://www.w3.org/TR/CSS2/visuren.html#direction)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumString, Default)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Direction {
    /// Left-to-right.
    #[default]
    Ltr,
    /// Right-to-left.
    Rtl,
}

/// [§ 17.6 Borders](https://www.w3.org/TR/CSS2/tables.html#borders)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumString, Default)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum BorderCollapse {
    /// "Selects the separated borders border model."
    #[default]
    Separate,
    /// "Selects the collapsing borders model."
    Collapse,
}

/// [§ 11.1.1 Overflow: the 'overflow' property](https://www.w3.org/TR/CSS2/visufx.html#overflow)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumString, Default)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Overflow {
    /// "Content is not clipped."
    #[default]
    Visible,
    /// "Content is clipped and no scrolling user interface should be provided."
    Hidden,
    /// Clipped, with a scrolling mechanism.
    Scroll,
    /// User-agent dependent; clipped here.
    Auto,
}

impl Overflow {
    /// Every value except `visible` clips and establishes a formatting context.
    #[must_use]
    pub const fn clips(self) -> bool {
        !matches!(self, Self::Visible)
    }
}

/// [§ 11.2 Visibility: the 'visibility' property](https://www.w3.org/TR/CSS2/visufx.html#visibility)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumString, Default)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Visibility {
    /// "The generated box is visible."
    #[default]
    Visible,
    /// "The generated box is invisible (fully transparent, nothing is drawn),
    /// but still affects layout."
    Hidden,
    /// Same as hidden outside tables.
    Collapse,
}

/// Pseudo-elements that can generate boxes.
///
/// [§ 12.1 The :before and :after pseudo-elements](https://www.w3.org/TR/CSS2/generate.html#before-after-content)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumString, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum PseudoElement {
    /// Generated content before the element's content.
    Before,
    /// Generated content after the element's content.
    After,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_colors_are_sorted_for_binary_search() {
        assert!(NAMED_COLORS.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn length_parse_units() {
        assert_eq!(Length::parse("12px"), Some(Length::px(12.0)));
        assert_eq!(Length::parse("1.5em"), Some(Length::em(1.5)));
        assert_eq!(Length::parse("50%"), Some(Length::percent(50.0)));
        assert_eq!(Length::parse("0"), Some(Length::px(0.0)));
        assert_eq!(
            Length::parse("-3pt"),
            Some(Length {
                value: -3.0,
                unit: LengthUnit::Pt
            })
        );
        assert_eq!(Length::parse("12"), None);
        assert_eq!(Length::parse("12furlongs"), None);
        assert_eq!(Length::parse("px"), None);
    }

    #[test]
    fn color_functions_and_names() {
        assert_eq!(Color::parse("rgb(255, 0, 0)"), Some(Color::rgb(255, 0, 0)));
        assert_eq!(
            Color::parse("rgba(0, 0, 255, 0.5)"),
            Some(Color {
                r: 0,
                g: 0,
                b: 255,
                a: 128
            })
        );
        assert_eq!(Color::parse("Navy"), Some(Color::rgb(0, 0, 128)));
        assert_eq!(Color::parse("#0f08"), Some(Color { r: 0, g: 255, b: 0, a: 136 }));
        assert_eq!(Color::parse("notacolor"), None);
    }
}
