//! The compute pass: specified values to computed values.
//!
//! [§ 6.1.2 Computed values](https://www.w3.org/TR/CSS2/cascade.html#computed-value)

use crate::error::Result;
use crate::resources::ResourceCache;

use super::properties::{
    ComputedProperties, Declared, LineHeightSpec, MaxSizeSpec, Sides, SizeSpec, Specified,
    SpecifiedProperties, VerticalAlignSpec,
};
use super::values::{
    BorderStyle, Length, LengthPercentage, LengthPercentageAuto, LineHeight, MaxSize,
    VerticalAlign,
};

/// Resolve one property.
///
/// [§ 6.1.1 Specified values](https://www.w3.org/TR/CSS2/cascade.html#specified-value)
///
/// "1. If the cascade results in a value, use it. 2. Otherwise, if the
/// property is inherited and the element is not the root of the document
/// tree, use the computed value of the parent element. 3. Otherwise use the
/// property's initial value."
fn pick<S, C>(
    declared: &Declared<S>,
    inherited: bool,
    parent: Option<C>,
    initial: C,
    compute: impl FnOnce(&S) -> Result<C>,
) -> Result<C> {
    match declared {
        Some(Specified::Value(value)) => compute(value),
        // "If the element has no parent, the property takes its initial value."
        Some(Specified::Inherit) => Ok(parent.unwrap_or(initial)),
        None if inherited => Ok(parent.unwrap_or(initial)),
        None => Ok(initial),
    }
}

/// Keyword properties compute to themselves.
fn pick_keyword<T: Clone>(
    declared: &Declared<T>,
    inherited: bool,
    parent: Option<T>,
    initial: T,
) -> T {
    match declared {
        Some(Specified::Value(value)) => value.clone(),
        Some(Specified::Inherit) => parent.unwrap_or(initial),
        None if inherited => parent.unwrap_or(initial),
        None => initial,
    }
}

/// Lengths relative to the element's own font.
struct FontBasis<'a> {
    resources: &'a dyn ResourceCache,
    em: f32,
    ex: f32,
}

impl FontBasis<'_> {
    fn px(&self, length: Length) -> Result<f32> {
        self.resources.compute_length(length, self.em, self.ex)
    }

    fn length_percentage(&self, length: Length) -> Result<LengthPercentage> {
        if length.is_percent() {
            Ok(LengthPercentage::Percent(length.value))
        } else {
            self.px(length).map(LengthPercentage::Px)
        }
    }

    fn size(&self, spec: SizeSpec) -> Result<LengthPercentageAuto> {
        match spec {
            SizeSpec::Auto => Ok(LengthPercentageAuto::Auto),
            SizeSpec::Length(l) if l.is_percent() => Ok(LengthPercentageAuto::Percent(l.value)),
            SizeSpec::Length(l) => self.px(l).map(LengthPercentageAuto::Px),
        }
    }

    fn max_size(&self, spec: MaxSizeSpec) -> Result<MaxSize> {
        match spec {
            MaxSizeSpec::None => Ok(MaxSize::None),
            MaxSizeSpec::Length(l) if l.is_percent() => Ok(MaxSize::Percent(l.value)),
            MaxSizeSpec::Length(l) => self.px(l).map(MaxSize::Px),
        }
    }
}

fn sides<S, C: Clone>(
    declared: &Sides<Declared<S>>,
    inherited: bool,
    parent: Option<&Sides<C>>,
    initial: &Sides<C>,
    mut compute: impl FnMut(&S) -> Result<C>,
) -> Result<Sides<C>> {
    Ok(Sides {
        top: pick(
            &declared.top,
            inherited,
            parent.map(|p| p.top.clone()),
            initial.top.clone(),
            &mut compute,
        )?,
        right: pick(
            &declared.right,
            inherited,
            parent.map(|p| p.right.clone()),
            initial.right.clone(),
            &mut compute,
        )?,
        bottom: pick(
            &declared.bottom,
            inherited,
            parent.map(|p| p.bottom.clone()),
            initial.bottom.clone(),
            &mut compute,
        )?,
        left: pick(
            &declared.left,
            inherited,
            parent.map(|p| p.left.clone()),
            initial.left.clone(),
            &mut compute,
        )?,
    })
}

/// Compute an element's properties from its specified values and its parent.
///
/// `initial` supplies the initial values (it carries the configured default
/// font). `font-size` is computed first, against the parent's font size;
/// every other `em` and `ex` length is then relative to the element's own font.
///
/// # Errors
///
/// Fails only if [`ResourceCache::compute_length`] fails, which indicates a
/// unit the parser should never have produced.
pub fn compute(
    specified: &SpecifiedProperties,
    parent: Option<&ComputedProperties>,
    resources: &mut dyn ResourceCache,
    initial: &ComputedProperties,
) -> Result<ComputedProperties> {
    let s = specified;
    let p = parent;

    // STEP 1: Font selection.
    // [§ 15.7 Font size](https://www.w3.org/TR/CSS2/fonts.html#font-size-props)
    //
    // "Percentages: refer to inherited font size". Ems in 'font-size' do too.
    let parent_font_size = p.map_or(initial.font_size, |p| p.font_size);
    let mut computed = initial.clone();
    computed.font_family = pick_keyword(
        &s.font_family,
        true,
        p.map(|p| p.font_family.clone()),
        initial.font_family.clone(),
    );
    computed.font_weight =
        pick_keyword(&s.font_weight, true, p.map(|p| p.font_weight), initial.font_weight);
    computed.font_style =
        pick_keyword(&s.font_style, true, p.map(|p| p.font_style), initial.font_style);
    computed.font_size = pick(
        &s.font_size,
        true,
        p.map(|p| p.font_size),
        initial.font_size,
        |&length| {
            if length.is_percent() {
                Ok(parent_font_size * length.value / 100.0)
            } else {
                resources.compute_length(length, parent_font_size, parent_font_size / 2.0)
            }
        },
    )?;

    // STEP 2: Resolve the element's font for em/ex.
    let font = resources.get_font(&computed);
    let metrics = resources.get_font_metrics(&font);
    let basis = FontBasis {
        resources: &*resources,
        em: computed.font_size,
        ex: metrics.x_height,
    };

    // STEP 3: Everything else.
    computed.display = pick_keyword(&s.display, false, p.map(|p| p.display), initial.display);
    computed.position = pick_keyword(&s.position, false, p.map(|p| p.position), initial.position);
    computed.float = pick_keyword(&s.float, false, p.map(|p| p.float), initial.float);
    computed.clear = pick_keyword(&s.clear, false, p.map(|p| p.clear), initial.clear);
    computed.z_index = pick_keyword(&s.z_index, false, p.map(|p| p.z_index), initial.z_index);

    computed.offsets = sides(&s.offsets, false, p.map(|p| &p.offsets), &initial.offsets, |&v| {
        basis.size(v)
    })?;
    computed.width = pick(&s.width, false, p.map(|p| p.width), initial.width, |&v| {
        basis.size(v)
    })?;
    computed.height = pick(&s.height, false, p.map(|p| p.height), initial.height, |&v| {
        basis.size(v)
    })?;
    computed.min_width = pick(
        &s.min_width,
        false,
        p.map(|p| p.min_width),
        initial.min_width,
        |&v| basis.length_percentage(v),
    )?;
    computed.min_height = pick(
        &s.min_height,
        false,
        p.map(|p| p.min_height),
        initial.min_height,
        |&v| basis.length_percentage(v),
    )?;
    computed.max_width = pick(
        &s.max_width,
        false,
        p.map(|p| p.max_width),
        initial.max_width,
        |&v| basis.max_size(v),
    )?;
    computed.max_height = pick(
        &s.max_height,
        false,
        p.map(|p| p.max_height),
        initial.max_height,
        |&v| basis.max_size(v),
    )?;
    computed.margin = sides(&s.margin, false, p.map(|p| &p.margin), &initial.margin, |&v| {
        basis.size(v)
    })?;
    computed.padding = sides(&s.padding, false, p.map(|p| &p.padding), &initial.padding, |&v| {
        basis.length_percentage(v)
    })?;

    // [§ 14.1](https://www.w3.org/TR/CSS2/colors.html#colors) 'color' first:
    // border colors default to it.
    computed.color = pick_keyword(&s.color, true, p.map(|p| p.color), initial.color);
    let current_color = computed.color;
    computed.border_style = sides(
        &s.border_style,
        false,
        p.map(|p| &p.border_style),
        &initial.border_style,
        |&v| Ok(v),
    )?;
    computed.border_color = sides(
        &s.border_color,
        false,
        p.map(|p| &p.border_color),
        &Sides::all(current_color),
        |&v| Ok(v.unwrap_or(current_color)),
    )?;
    // [§ 8.5.1](https://www.w3.org/TR/CSS2/box.html#border-width-properties)
    // "Computed value: absolute length; '0' if the border style is 'none' or 'hidden'"
    // Undeclared widths are 'medium'.
    let declared_width = sides(
        &s.border_width,
        false,
        p.map(|p| &p.border_width),
        &Sides::all(3.0),
        |&v| basis.px(v),
    )?;
    let style = computed.border_style;
    computed.border_width = Sides {
        top: visible_width(style.top, declared_width.top),
        right: visible_width(style.right, declared_width.right),
        bottom: visible_width(style.bottom, declared_width.bottom),
        left: visible_width(style.left, declared_width.left),
    };

    computed.background_color = pick_keyword(
        &s.background_color,
        false,
        p.map(|p| p.background_color),
        initial.background_color,
    );
    computed.background_image = pick_keyword(
        &s.background_image,
        false,
        p.map(|p| p.background_image.clone()),
        initial.background_image.clone(),
    );
    computed.background_repeat = pick_keyword(
        &s.background_repeat,
        false,
        p.map(|p| p.background_repeat),
        initial.background_repeat,
    );
    computed.background_position = pick(
        &s.background_position,
        false,
        p.map(|p| p.background_position),
        initial.background_position,
        |&(x, y)| Ok((basis.length_percentage(x)?, basis.length_percentage(y)?)),
    )?;

    // [§ 10.8.1](https://www.w3.org/TR/CSS2/visudet.html#propdef-line-height)
    // "<number>: The computed value is the same as the specified value."
    // "<percentage>: ... multiplied by the element's computed font size."
    let font_size = computed.font_size;
    computed.line_height = pick(
        &s.line_height,
        true,
        p.map(|p| p.line_height),
        initial.line_height,
        |&v| match v {
            LineHeightSpec::Normal => Ok(LineHeight::Normal),
            LineHeightSpec::Number(n) => Ok(LineHeight::Number(n)),
            LineHeightSpec::Length(l) if l.is_percent() => {
                Ok(LineHeight::Px(font_size * l.value / 100.0))
            }
            LineHeightSpec::Length(l) => basis.px(l).map(LineHeight::Px),
        },
    )?;
    let line_height = computed.line_height.used(font_size);
    computed.text_align =
        pick_keyword(&s.text_align, true, p.map(|p| p.text_align), initial.text_align);
    computed.text_indent = pick(
        &s.text_indent,
        true,
        p.map(|p| p.text_indent),
        initial.text_indent,
        |&v| basis.length_percentage(v),
    )?;
    // "<percentage>: Raise (positive value) or lower (negative value) the box
    // by this distance (a percentage of the 'line-height' value)."
    computed.vertical_align = pick(
        &s.vertical_align,
        false,
        p.map(|p| p.vertical_align),
        initial.vertical_align,
        |&v| match v {
            VerticalAlignSpec::Keyword(k) => Ok(k),
            VerticalAlignSpec::Length(l) if l.is_percent() => {
                Ok(VerticalAlign::Offset(line_height * l.value / 100.0))
            }
            VerticalAlignSpec::Length(l) => basis.px(l).map(VerticalAlign::Offset),
        },
    )?;
    computed.white_space =
        pick_keyword(&s.white_space, true, p.map(|p| p.white_space), initial.white_space);
    computed.direction =
        pick_keyword(&s.direction, true, p.map(|p| p.direction), initial.direction);
    computed.border_collapse = pick_keyword(
        &s.border_collapse,
        true,
        p.map(|p| p.border_collapse),
        initial.border_collapse,
    );
    computed.border_spacing = pick(
        &s.border_spacing,
        true,
        p.map(|p| p.border_spacing),
        initial.border_spacing,
        |&(h, v)| Ok((basis.px(h)?, basis.px(v)?)),
    )?;
    computed.overflow = pick_keyword(&s.overflow, false, p.map(|p| p.overflow), initial.overflow);
    computed.visibility =
        pick_keyword(&s.visibility, true, p.map(|p| p.visibility), initial.visibility);
    computed.content = pick_keyword(
        &s.content,
        false,
        p.map(|p| p.content.clone()),
        initial.content.clone(),
    );

    Ok(computed)
}

fn visible_width(style: BorderStyle, width: f32) -> f32 {
    if style.is_visible() { width } else { 0.0 }
}
