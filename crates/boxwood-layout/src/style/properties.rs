//! Specified and computed property records.
//!
//! [§ 6.1 Specified, computed, and actual values](https://www.w3.org/TR/CSS2/cascade.html#value-stages)
//!
//! A box carries two records. [`SpecifiedProperties`] holds what the cascade
//! produced, including `inherit` markers and unresolved units.
//! [`ComputedProperties`] holds the result of the compute pass. It has no
//! representation for `inherit` at all, so a computed record can never leak
//! an unresolved marker into layout.

use serde::Serialize;

use super::values::{
    BackgroundRepeat, BorderCollapse, BorderStyle, Clear, Color, Direction, Display, Float,
    FontStyle, Length, LengthPercentage, LengthPercentageAuto, LineHeight, MaxSize, Overflow,
    Position, TextAlign, VerticalAlign, Visibility, WhiteSpace, ZIndex,
};

/// [§ 6.2.1 The 'inherit' value](https://www.w3.org/TR/CSS2/cascade.html#value-def-inherit)
///
/// "Each property may also have a cascaded value of 'inherit', which means
/// that, for a given element, the property takes the same specified value as
/// the property for the element's parent."
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Specified<T> {
    /// Take the parent's computed value.
    Inherit,
    /// An explicit value.
    Value(T),
}

/// A declared property. `None` means no declaration applied.
pub type Declared<T> = Option<Specified<T>>;

/// Per-side storage for margins, padding, borders and box offsets.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Sides<T> {
    /// Top side.
    pub top: T,
    /// Right side.
    pub right: T,
    /// Bottom side.
    pub bottom: T,
    /// Left side.
    pub left: T,
}

impl<T: Clone> Sides<T> {
    /// The same value on every side.
    #[must_use]
    pub fn all(value: T) -> Self {
        Self {
            top: value.clone(),
            right: value.clone(),
            bottom: value.clone(),
            left: value,
        }
    }

    /// [§ 8.3 Margin properties](https://www.w3.org/TR/CSS2/box.html#margin-properties)
    ///
    /// Expand a 1 to 4 value shorthand list: "If there is only one component
    /// value, it applies to all sides. If there are two values, the top and
    /// bottom margins are set to the first value and the right and left
    /// margins are set to the second. If there are three values, the top is
    /// set to the first value, the left and right are set to the second, and
    /// the bottom is set to the third. If there are four values, they apply to
    /// the top, right, bottom, and left, respectively."
    #[must_use]
    pub fn from_shorthand(values: &[T]) -> Option<Self> {
        let (top, right, bottom, left) = match values {
            [a] => (a, a, a, a),
            [a, b] => (a, b, a, b),
            [a, b, c] => (a, b, c, b),
            [a, b, c, d] => (a, b, c, d),
            _ => return None,
        };
        Some(Self {
            top: top.clone(),
            right: right.clone(),
            bottom: bottom.clone(),
            left: left.clone(),
        })
    }

    /// Apply `f` to each side.
    #[must_use]
    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> Sides<U> {
        Sides {
            top: f(&self.top),
            right: f(&self.right),
            bottom: f(&self.bottom),
            left: f(&self.left),
        }
    }
}

/// Specified `<length> | <percentage> | auto`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum SizeSpec {
    /// `auto`
    Auto,
    /// A length or percentage.
    Length(Length),
}

/// Specified `<length> | <percentage> | none`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum MaxSizeSpec {
    /// `none`
    None,
    /// A length or percentage.
    Length(Length),
}

/// Specified `line-height`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum LineHeightSpec {
    /// `normal`
    Normal,
    /// A unitless multiplier.
    Number(f32),
    /// A length or percentage of the font size.
    Length(Length),
}

/// Specified `vertical-align`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum VerticalAlignSpec {
    /// A keyword.
    Keyword(VerticalAlign),
    /// A length, or a percentage of the element's line height.
    Length(Length),
}

/// Cascaded values for one element, before computation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[allow(missing_docs)]
pub struct SpecifiedProperties {
    pub display: Declared<Display>,
    pub position: Declared<Position>,
    pub float: Declared<Float>,
    pub clear: Declared<Clear>,
    pub z_index: Declared<ZIndex>,
    /// `top`, `right`, `bottom`, `left`.
    pub offsets: Sides<Declared<SizeSpec>>,
    pub width: Declared<SizeSpec>,
    pub height: Declared<SizeSpec>,
    pub min_width: Declared<Length>,
    pub min_height: Declared<Length>,
    pub max_width: Declared<MaxSizeSpec>,
    pub max_height: Declared<MaxSizeSpec>,
    pub margin: Sides<Declared<SizeSpec>>,
    pub padding: Sides<Declared<Length>>,
    pub border_width: Sides<Declared<Length>>,
    pub border_style: Sides<Declared<BorderStyle>>,
    /// `None` inside the value stands for `currentColor`.
    pub border_color: Sides<Declared<Option<Color>>>,
    pub color: Declared<Color>,
    pub background_color: Declared<Color>,
    pub background_image: Declared<Option<String>>,
    pub background_repeat: Declared<BackgroundRepeat>,
    pub background_position: Declared<(Length, Length)>,
    pub font_family: Declared<String>,
    pub font_size: Declared<Length>,
    pub font_weight: Declared<u16>,
    pub font_style: Declared<FontStyle>,
    pub line_height: Declared<LineHeightSpec>,
    pub text_align: Declared<TextAlign>,
    pub text_indent: Declared<Length>,
    pub vertical_align: Declared<VerticalAlignSpec>,
    pub white_space: Declared<WhiteSpace>,
    pub direction: Declared<Direction>,
    pub border_collapse: Declared<BorderCollapse>,
    pub border_spacing: Declared<(Length, Length)>,
    pub overflow: Declared<Overflow>,
    pub visibility: Declared<Visibility>,
    pub content: Declared<Option<String>>,
}

/// Fully resolved values for one element.
///
/// [§ 6.1.2 Computed values](https://www.w3.org/TR/CSS2/cascade.html#computed-value)
///
/// "Specified values are resolved to computed values during the cascade; for
/// example URIs are made absolute and 'em' and 'ex' units are computed to
/// pixel or absolute lengths."
///
/// Percentages are the exception: they stay symbolic until layout knows the
/// containing block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[allow(missing_docs)]
pub struct ComputedProperties {
    pub display: Display,
    pub position: Position,
    pub float: Float,
    pub clear: Clear,
    pub z_index: ZIndex,
    pub offsets: Sides<LengthPercentageAuto>,
    pub width: LengthPercentageAuto,
    pub height: LengthPercentageAuto,
    pub min_width: LengthPercentage,
    pub min_height: LengthPercentage,
    pub max_width: MaxSize,
    pub max_height: MaxSize,
    pub margin: Sides<LengthPercentageAuto>,
    pub padding: Sides<LengthPercentage>,
    /// Used border widths: zero where the style is `none` or `hidden`.
    pub border_width: Sides<f32>,
    pub border_style: Sides<BorderStyle>,
    pub border_color: Sides<Color>,
    pub color: Color,
    pub background_color: Color,
    pub background_image: Option<String>,
    pub background_repeat: BackgroundRepeat,
    pub background_position: (LengthPercentage, LengthPercentage),
    pub font_family: String,
    /// Pixels.
    pub font_size: f32,
    pub font_weight: u16,
    pub font_style: FontStyle,
    pub line_height: LineHeight,
    pub text_align: TextAlign,
    pub text_indent: LengthPercentage,
    pub vertical_align: VerticalAlign,
    pub white_space: WhiteSpace,
    pub direction: Direction,
    pub border_collapse: BorderCollapse,
    /// Horizontal and vertical spacing in pixels.
    pub border_spacing: (f32, f32),
    pub overflow: Overflow,
    pub visibility: Visibility,
    pub content: Option<String>,
}

impl ComputedProperties {
    /// Initial values for every property, with the given default font.
    ///
    /// [§ 6.1.1 Specified values](https://www.w3.org/TR/CSS2/cascade.html#specified-value)
    /// "Otherwise, the property's initial value is used."
    #[must_use]
    pub fn initial(font_family: &str, font_size: f32) -> Self {
        Self {
            display: Display::Inline,
            position: Position::Static,
            float: Float::None,
            clear: Clear::None,
            z_index: ZIndex::Auto,
            offsets: Sides::all(LengthPercentageAuto::Auto),
            width: LengthPercentageAuto::Auto,
            height: LengthPercentageAuto::Auto,
            min_width: LengthPercentage::Px(0.0),
            min_height: LengthPercentage::Px(0.0),
            max_width: MaxSize::None,
            max_height: MaxSize::None,
            margin: Sides::all(LengthPercentageAuto::Px(0.0)),
            padding: Sides::all(LengthPercentage::Px(0.0)),
            border_width: Sides::all(0.0),
            border_style: Sides::all(BorderStyle::None),
            border_color: Sides::all(Color::BLACK),
            color: Color::BLACK,
            background_color: Color::TRANSPARENT,
            background_image: None,
            background_repeat: BackgroundRepeat::Repeat,
            background_position: (LengthPercentage::Percent(0.0), LengthPercentage::Percent(0.0)),
            font_family: font_family.to_string(),
            font_size,
            font_weight: 400,
            font_style: FontStyle::Normal,
            line_height: LineHeight::Normal,
            text_align: TextAlign::Start,
            text_indent: LengthPercentage::Px(0.0),
            vertical_align: VerticalAlign::Baseline,
            white_space: WhiteSpace::Normal,
            direction: Direction::Ltr,
            border_collapse: BorderCollapse::Separate,
            border_spacing: (0.0, 0.0),
            overflow: Overflow::Visible,
            visibility: Visibility::Visible,
            content: None,
        }
    }

    /// True if this box is floated.
    #[must_use]
    pub fn is_floated(&self) -> bool {
        self.float != Float::None
    }

    /// Used line height in pixels.
    #[must_use]
    pub fn used_line_height(&self) -> f32 {
        self.line_height.used(self.font_size)
    }

    /// `visibility: visible`.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visibility == Visibility::Visible
    }

    /// [§ 9.9.1](https://www.w3.org/TR/CSS2/visuren.html#z-index)
    ///
    /// A positioned box with an integer `z-index` establishes a stacking context.
    #[must_use]
    pub fn establishes_stacking_context(&self) -> bool {
        self.position.is_positioned() && matches!(self.z_index, ZIndex::Integer(_))
    }
}

impl Default for ComputedProperties {
    fn default() -> Self {
        Self::initial("serif", 16.0)
    }
}
