//! Declaration parsing.
//!
//! [§ 4.1.8 Declarations and properties](https://www.w3.org/TR/CSS2/syndata.html#declaration)
//!
//! The cascade hands over declarations as a property name and a token list.
//! [`apply_declaration`] turns one declaration into typed values on a
//! [`SpecifiedProperties`] record. A value that does not parse leaves the
//! record untouched: "User agents must ignore a declaration with an illegal
//! value." The rejection is reported once through
//! [`warn_once`](boxwood_common::warning::warn_once).

use std::str::FromStr;

use boxwood_common::warning::warn_once;

use super::properties::{
    Declared, LineHeightSpec, MaxSizeSpec, Sides, SizeSpec, Specified, SpecifiedProperties,
    VerticalAlignSpec,
};
use super::values::{
    BackgroundRepeat, BorderStyle, Color, Length, LengthUnit, VerticalAlign, ZIndex,
};

/// [§ 4.1.8 Declarations and properties](https://www.w3.org/TR/CSS2/syndata.html#declaration)
///
/// "A declaration is either empty or consists of a property name, followed by
/// a colon (:), followed by a property value."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Lowercase property name.
    pub name: String,
    /// Whitespace and comma separated value tokens. Parenthesized groups and
    /// quoted strings are single tokens.
    pub tokens: Vec<String>,
}

impl Declaration {
    /// Build a declaration from a name and raw value text.
    #[must_use]
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.trim().to_ascii_lowercase(),
            tokens: tokenize_value(value),
        }
    }
}

/// Parse the contents of a `style` attribute or rule body.
///
/// Empty declarations and declarations without a colon are dropped.
#[must_use]
pub fn parse_declaration_block(text: &str) -> Vec<Declaration> {
    split_outside_groups(text, ';')
        .into_iter()
        .filter_map(|part| {
            let (name, value) = part.split_once(':')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some(Declaration::new(name, value))
        })
        .filter(|decl| !decl.tokens.is_empty())
        .collect()
}

/// Split `text` on `separator`, ignoring separators inside quotes or parentheses.
fn split_outside_groups(text: &str, separator: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0_u32;
    let mut quote: Option<char> = None;
    for c in text.chars() {
        match (quote, c) {
            (Some(q), _) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, _) if c == separator && depth == 0 => {
                parts.push(std::mem::take(&mut current));
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    parts.push(current);
    parts
}

/// Split a property value into tokens.
///
/// Commas outside parentheses become their own `,` token.
#[must_use]
pub fn tokenize_value(value: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth = 0_u32;
    let mut quote: Option<char> = None;
    for c in value.trim().chars() {
        if let Some(q) = quote {
            current.push(c);
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => {
                quote = Some(c);
                current.push(c);
            }
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            ',' if depth == 0 => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
                tokens.push(",".to_string());
            }
            c if c.is_whitespace() && depth == 0 => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Apply one declaration to `props`.
///
/// Returns `false`, and leaves `props` untouched, if the property is unknown
/// or its value is malformed.
pub fn apply_declaration(props: &mut SpecifiedProperties, decl: &Declaration) -> bool {
    let applied = if is_inherit(&decl.tokens) {
        apply_inherit(props, &decl.name)
    } else {
        apply_value(props, &decl.name, &decl.tokens)
    };
    if !applied {
        let _ = warn_once(
            "CSS",
            &format!("ignored declaration '{}: {}'", decl.name, decl.tokens.join(" ")),
        );
    }
    applied
}

fn is_inherit(tokens: &[String]) -> bool {
    matches!(tokens, [t] if t.eq_ignore_ascii_case("inherit"))
}

fn inherit_sides<T>(sides: &mut Sides<Declared<T>>) {
    sides.top = Some(Specified::Inherit);
    sides.right = Some(Specified::Inherit);
    sides.bottom = Some(Specified::Inherit);
    sides.left = Some(Specified::Inherit);
}

/// [§ 6.2.1 The 'inherit' value](https://www.w3.org/TR/CSS2/cascade.html#value-def-inherit)
///
/// A shorthand set to `inherit` makes every longhand it covers inherit.
fn apply_inherit(p: &mut SpecifiedProperties, name: &str) -> bool {
    match name {
        "display" => p.display = Some(Specified::Inherit),
        "position" => p.position = Some(Specified::Inherit),
        "float" => p.float = Some(Specified::Inherit),
        "clear" => p.clear = Some(Specified::Inherit),
        "z-index" => p.z_index = Some(Specified::Inherit),
        "top" => p.offsets.top = Some(Specified::Inherit),
        "right" => p.offsets.right = Some(Specified::Inherit),
        "bottom" => p.offsets.bottom = Some(Specified::Inherit),
        "left" => p.offsets.left = Some(Specified::Inherit),
        "width" => p.width = Some(Specified::Inherit),
        "height" => p.height = Some(Specified::Inherit),
        "min-width" => p.min_width = Some(Specified::Inherit),
        "min-height" => p.min_height = Some(Specified::Inherit),
        "max-width" => p.max_width = Some(Specified::Inherit),
        "max-height" => p.max_height = Some(Specified::Inherit),
        "margin" => inherit_sides(&mut p.margin),
        "margin-top" => p.margin.top = Some(Specified::Inherit),
        "margin-right" => p.margin.right = Some(Specified::Inherit),
        "margin-bottom" => p.margin.bottom = Some(Specified::Inherit),
        "margin-left" => p.margin.left = Some(Specified::Inherit),
        "padding" => inherit_sides(&mut p.padding),
        "padding-top" => p.padding.top = Some(Specified::Inherit),
        "padding-right" => p.padding.right = Some(Specified::Inherit),
        "padding-bottom" => p.padding.bottom = Some(Specified::Inherit),
        "padding-left" => p.padding.left = Some(Specified::Inherit),
        "border" => {
            inherit_sides(&mut p.border_width);
            inherit_sides(&mut p.border_style);
            inherit_sides(&mut p.border_color);
        }
        "border-width" => inherit_sides(&mut p.border_width),
        "border-style" => inherit_sides(&mut p.border_style),
        "border-color" => inherit_sides(&mut p.border_color),
        "color" => p.color = Some(Specified::Inherit),
        "background" => {
            p.background_color = Some(Specified::Inherit);
            p.background_image = Some(Specified::Inherit);
            p.background_repeat = Some(Specified::Inherit);
            p.background_position = Some(Specified::Inherit);
        }
        "background-color" => p.background_color = Some(Specified::Inherit),
        "background-image" => p.background_image = Some(Specified::Inherit),
        "background-repeat" => p.background_repeat = Some(Specified::Inherit),
        "background-position" => p.background_position = Some(Specified::Inherit),
        "font-family" => p.font_family = Some(Specified::Inherit),
        "font-size" => p.font_size = Some(Specified::Inherit),
        "font-weight" => p.font_weight = Some(Specified::Inherit),
        "font-style" => p.font_style = Some(Specified::Inherit),
        "line-height" => p.line_height = Some(Specified::Inherit),
        "text-align" => p.text_align = Some(Specified::Inherit),
        "text-indent" => p.text_indent = Some(Specified::Inherit),
        "vertical-align" => p.vertical_align = Some(Specified::Inherit),
        "white-space" => p.white_space = Some(Specified::Inherit),
        "direction" => p.direction = Some(Specified::Inherit),
        "border-collapse" => p.border_collapse = Some(Specified::Inherit),
        "border-spacing" => p.border_spacing = Some(Specified::Inherit),
        "overflow" => p.overflow = Some(Specified::Inherit),
        "visibility" => p.visibility = Some(Specified::Inherit),
        "content" => p.content = Some(Specified::Inherit),
        name => match border_side(name) {
            Some((side, None)) => {
                *side_of(&mut p.border_width, side) = Some(Specified::Inherit);
                *side_of(&mut p.border_style, side) = Some(Specified::Inherit);
                *side_of(&mut p.border_color, side) = Some(Specified::Inherit);
            }
            Some((side, Some(BorderPart::Width))) => {
                *side_of(&mut p.border_width, side) = Some(Specified::Inherit);
            }
            Some((side, Some(BorderPart::Style))) => {
                *side_of(&mut p.border_style, side) = Some(Specified::Inherit);
            }
            Some((side, Some(BorderPart::Color))) => {
                *side_of(&mut p.border_color, side) = Some(Specified::Inherit);
            }
            None => return false,
        },
    }
    true
}

/// Store `value` if it parsed.
fn set<T>(slot: &mut Declared<T>, value: Option<T>) -> bool {
    value.map(|v| *slot = Some(Specified::Value(v))).is_some()
}

/// Store one value per side if the shorthand parsed.
fn set_sides<T: Clone>(slots: &mut Sides<Declared<T>>, values: Option<Vec<T>>) -> bool {
    let Some(sides) = values.as_deref().and_then(Sides::from_shorthand) else {
        return false;
    };
    slots.top = Some(Specified::Value(sides.top));
    slots.right = Some(Specified::Value(sides.right));
    slots.bottom = Some(Specified::Value(sides.bottom));
    slots.left = Some(Specified::Value(sides.left));
    true
}

fn apply_value(p: &mut SpecifiedProperties, name: &str, tokens: &[String]) -> bool {
    match name {
        // [§ 9.2.4](https://www.w3.org/TR/CSS2/visuren.html#display-prop)
        "display" => set(&mut p.display, keyword(tokens)),
        "position" => set(&mut p.position, keyword(tokens)),
        "float" => set(&mut p.float, keyword(tokens)),
        "clear" => set(&mut p.clear, keyword(tokens)),
        // [§ 9.9.1](https://www.w3.org/TR/CSS2/visuren.html#z-index)
        // "Value: auto | <integer> | inherit"
        "z-index" => set(&mut p.z_index, single(tokens).and_then(parse_z_index)),
        // [§ 9.3.2 Box offsets](https://www.w3.org/TR/CSS2/visuren.html#position-props)
        "top" => set(&mut p.offsets.top, single(tokens).and_then(parse_size)),
        "right" => set(&mut p.offsets.right, single(tokens).and_then(parse_size)),
        "bottom" => set(&mut p.offsets.bottom, single(tokens).and_then(parse_size)),
        "left" => set(&mut p.offsets.left, single(tokens).and_then(parse_size)),
        // [§ 10.2 Content width](https://www.w3.org/TR/CSS2/visudet.html#the-width-property)
        // "Negative values for 'width' are illegal."
        "width" => set(&mut p.width, single(tokens).and_then(parse_non_negative_size)),
        "height" => set(&mut p.height, single(tokens).and_then(parse_non_negative_size)),
        "min-width" => set(&mut p.min_width, single(tokens).and_then(parse_non_negative)),
        "min-height" => set(&mut p.min_height, single(tokens).and_then(parse_non_negative)),
        "max-width" => set(&mut p.max_width, single(tokens).and_then(parse_max_size)),
        "max-height" => set(&mut p.max_height, single(tokens).and_then(parse_max_size)),
        // [§ 8.3 Margin properties](https://www.w3.org/TR/CSS2/box.html#margin-properties)
        "margin" => set_sides(&mut p.margin, each(tokens, parse_size)),
        "margin-top" => set(&mut p.margin.top, single(tokens).and_then(parse_size)),
        "margin-right" => set(&mut p.margin.right, single(tokens).and_then(parse_size)),
        "margin-bottom" => set(&mut p.margin.bottom, single(tokens).and_then(parse_size)),
        "margin-left" => set(&mut p.margin.left, single(tokens).and_then(parse_size)),
        // [§ 8.4 Padding properties](https://www.w3.org/TR/CSS2/box.html#padding-properties)
        // "Unlike margin properties, values for padding values cannot be negative."
        "padding" => set_sides(&mut p.padding, each(tokens, parse_non_negative)),
        "padding-top" => set(&mut p.padding.top, single(tokens).and_then(parse_non_negative)),
        "padding-right" => set(&mut p.padding.right, single(tokens).and_then(parse_non_negative)),
        "padding-bottom" => {
            set(&mut p.padding.bottom, single(tokens).and_then(parse_non_negative))
        }
        "padding-left" => set(&mut p.padding.left, single(tokens).and_then(parse_non_negative)),
        // [§ 8.5 Border properties](https://www.w3.org/TR/CSS2/box.html#border-properties)
        "border-width" => set_sides(&mut p.border_width, each(tokens, parse_border_width)),
        "border-style" => set_sides(&mut p.border_style, each(tokens, keyword_token)),
        "border-color" => set_sides(&mut p.border_color, each(tokens, parse_border_color)),
        "border" => match parse_border_shorthand(tokens) {
            Some((width, style, color)) => {
                p.border_width = Sides::all(Some(Specified::Value(width)));
                p.border_style = Sides::all(Some(Specified::Value(style)));
                p.border_color = Sides::all(Some(Specified::Value(color)));
                true
            }
            None => false,
        },
        // [§ 14.1 Foreground color](https://www.w3.org/TR/CSS2/colors.html#colors)
        "color" => set(&mut p.color, single(tokens).and_then(Color::parse)),
        // [§ 14.2.1 Background properties](https://www.w3.org/TR/CSS2/colors.html#background-properties)
        "background-color" => {
            set(&mut p.background_color, single(tokens).and_then(Color::parse))
        }
        "background-image" => {
            set(&mut p.background_image, single(tokens).and_then(parse_image))
        }
        "background-repeat" => set(&mut p.background_repeat, keyword(tokens)),
        "background-position" => {
            set(&mut p.background_position, parse_background_position(tokens))
        }
        "background" => apply_background_shorthand(p, tokens),
        // [§ 15 Fonts](https://www.w3.org/TR/CSS2/fonts.html)
        "font-family" => set(&mut p.font_family, parse_font_family(tokens)),
        "font-size" => set(&mut p.font_size, single(tokens).and_then(parse_font_size)),
        "font-weight" => set(&mut p.font_weight, single(tokens).and_then(parse_font_weight)),
        "font-style" => set(&mut p.font_style, keyword(tokens)),
        // [§ 10.8.1 Leading and half-leading](https://www.w3.org/TR/CSS2/visudet.html#leading)
        "line-height" => set(&mut p.line_height, single(tokens).and_then(parse_line_height)),
        // [§ 16 Text](https://www.w3.org/TR/CSS2/text.html)
        "text-align" => set(&mut p.text_align, keyword(tokens)),
        "text-indent" => set(&mut p.text_indent, single(tokens).and_then(Length::parse)),
        "vertical-align" => {
            set(&mut p.vertical_align, single(tokens).and_then(parse_vertical_align))
        }
        "white-space" => set(&mut p.white_space, keyword(tokens)),
        "direction" => set(&mut p.direction, keyword(tokens)),
        // [§ 17.6 Borders](https://www.w3.org/TR/CSS2/tables.html#borders)
        "border-collapse" => set(&mut p.border_collapse, keyword(tokens)),
        "border-spacing" => set(&mut p.border_spacing, parse_border_spacing(tokens)),
        // [§ 11 Visual effects](https://www.w3.org/TR/CSS2/visufx.html)
        "overflow" => set(&mut p.overflow, keyword(tokens)),
        "visibility" => set(&mut p.visibility, keyword(tokens)),
        // [§ 12.2 The 'content' property](https://www.w3.org/TR/CSS2/generate.html#content)
        "content" => set(&mut p.content, parse_content(tokens)),
        name => apply_border_side(p, name, tokens),
    }
}

#[derive(Clone, Copy)]
enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

#[derive(Clone, Copy)]
enum BorderPart {
    Width,
    Style,
    Color,
}

/// Split names such as `border-left` or `border-top-color`.
fn border_side(name: &str) -> Option<(Side, Option<BorderPart>)> {
    let rest = name.strip_prefix("border-")?;
    let (side, part) = rest.split_once('-').map_or((rest, None), |(s, p)| (s, Some(p)));
    let side = match side {
        "top" => Side::Top,
        "right" => Side::Right,
        "bottom" => Side::Bottom,
        "left" => Side::Left,
        _ => return None,
    };
    let part = match part {
        None => None,
        Some("width") => Some(BorderPart::Width),
        Some("style") => Some(BorderPart::Style),
        Some("color") => Some(BorderPart::Color),
        Some(_) => return None,
    };
    Some((side, part))
}

fn side_of<T>(sides: &mut Sides<T>, side: Side) -> &mut T {
    match side {
        Side::Top => &mut sides.top,
        Side::Right => &mut sides.right,
        Side::Bottom => &mut sides.bottom,
        Side::Left => &mut sides.left,
    }
}

fn apply_border_side(p: &mut SpecifiedProperties, name: &str, tokens: &[String]) -> bool {
    match border_side(name) {
        Some((side, None)) => match parse_border_shorthand(tokens) {
            Some((width, style, color)) => {
                *side_of(&mut p.border_width, side) = Some(Specified::Value(width));
                *side_of(&mut p.border_style, side) = Some(Specified::Value(style));
                *side_of(&mut p.border_color, side) = Some(Specified::Value(color));
                true
            }
            None => false,
        },
        Some((side, Some(BorderPart::Width))) => set(
            side_of(&mut p.border_width, side),
            single(tokens).and_then(parse_border_width),
        ),
        Some((side, Some(BorderPart::Style))) => {
            set(side_of(&mut p.border_style, side), keyword(tokens))
        }
        Some((side, Some(BorderPart::Color))) => set(
            side_of(&mut p.border_color, side),
            single(tokens).and_then(parse_border_color),
        ),
        None => false,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Value parsers
// ─────────────────────────────────────────────────────────────────────────────

fn single(tokens: &[String]) -> Option<&str> {
    match tokens {
        [t] => Some(t.as_str()),
        _ => None,
    }
}

fn each<T>(tokens: &[String], parse: impl Fn(&str) -> Option<T>) -> Option<Vec<T>> {
    tokens.iter().map(|t| parse(t.as_str())).collect()
}

fn keyword_token<T: FromStr>(token: &str) -> Option<T> {
    token.parse().ok()
}

fn keyword<T: FromStr>(tokens: &[String]) -> Option<T> {
    single(tokens).and_then(keyword_token)
}

fn parse_z_index(token: &str) -> Option<ZIndex> {
    if token.eq_ignore_ascii_case("auto") {
        return Some(ZIndex::Auto);
    }
    token.parse().ok().map(ZIndex::Integer)
}

fn parse_size(token: &str) -> Option<SizeSpec> {
    if token.eq_ignore_ascii_case("auto") {
        return Some(SizeSpec::Auto);
    }
    Length::parse(token).map(SizeSpec::Length)
}

fn parse_non_negative_size(token: &str) -> Option<SizeSpec> {
    parse_size(token).filter(|s| !matches!(s, SizeSpec::Length(l) if l.value < 0.0))
}

fn parse_non_negative(token: &str) -> Option<Length> {
    Length::parse(token).filter(|l| l.value >= 0.0)
}

fn parse_max_size(token: &str) -> Option<MaxSizeSpec> {
    if token.eq_ignore_ascii_case("none") {
        return Some(MaxSizeSpec::None);
    }
    parse_non_negative(token).map(MaxSizeSpec::Length)
}

/// [§ 8.5.1 Border width](https://www.w3.org/TR/CSS2/box.html#border-width-properties)
///
/// "The interpretation of the first three values depends on the user agent.
/// The following relationships must hold, however: 'thin' <= 'medium' <= 'thick'."
fn parse_border_width(token: &str) -> Option<Length> {
    match token.to_ascii_lowercase().as_str() {
        "thin" => Some(Length::px(1.0)),
        "medium" => Some(Length::px(3.0)),
        "thick" => Some(Length::px(5.0)),
        _ => parse_non_negative(token).filter(|l| !l.is_percent()),
    }
}

/// `None` stands for `currentColor`.
fn parse_border_color(token: &str) -> Option<Option<Color>> {
    if token.eq_ignore_ascii_case("currentcolor") {
        return Some(None);
    }
    Color::parse(token).map(Some)
}

/// [§ 8.5.4 Border shorthand properties](https://www.w3.org/TR/CSS2/box.html#border-shorthand-properties)
///
/// "Value: [ <border-width> || <border-style> || 'border-top-color' ] | inherit"
///
/// Omitted parts reset to their initial values.
fn parse_border_shorthand(tokens: &[String]) -> Option<(Length, BorderStyle, Option<Color>)> {
    let mut width = None;
    let mut style = None;
    let mut color = None;
    for token in tokens {
        if width.is_none()
            && let Some(w) = parse_border_width(token)
        {
            width = Some(w);
        } else if style.is_none()
            && let Some(s) = keyword_token::<BorderStyle>(token)
        {
            style = Some(s);
        } else if color.is_none()
            && let Some(c) = parse_border_color(token)
        {
            color = Some(c);
        } else {
            return None;
        }
    }
    if tokens.is_empty() {
        return None;
    }
    Some((
        width.unwrap_or(Length::px(3.0)),
        style.unwrap_or_default(),
        color.unwrap_or(None),
    ))
}

/// [§ 14.2.1 'background-image'](https://www.w3.org/TR/CSS2/colors.html#propdef-background-image)
///
/// "Value: <uri> | none | inherit"
fn parse_image(token: &str) -> Option<Option<String>> {
    if token.eq_ignore_ascii_case("none") {
        return Some(None);
    }
    let inner = token
        .strip_prefix("url(")
        .or_else(|| token.strip_prefix("URL("))?
        .strip_suffix(')')?
        .trim();
    Some(Some(unquote(inner).to_string()))
}

fn unquote(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| s.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')))
        .unwrap_or(s)
}

/// [§ 14.2.1 'background-position'](https://www.w3.org/TR/CSS2/colors.html#propdef-background-position)
///
/// "If only one value is specified, the second value is assumed to be 'center'."
fn parse_background_position(tokens: &[String]) -> Option<(Length, Length)> {
    let horizontal = |t: &str| match t.to_ascii_lowercase().as_str() {
        "left" => Some(Length::percent(0.0)),
        "center" => Some(Length::percent(50.0)),
        "right" => Some(Length::percent(100.0)),
        _ => Length::parse(t),
    };
    let vertical = |t: &str| match t.to_ascii_lowercase().as_str() {
        "top" => Some(Length::percent(0.0)),
        "center" => Some(Length::percent(50.0)),
        "bottom" => Some(Length::percent(100.0)),
        _ => Length::parse(t),
    };
    match tokens {
        [one] => match one.to_ascii_lowercase().as_str() {
            "top" | "bottom" => Some((Length::percent(50.0), vertical(one)?)),
            _ => Some((horizontal(one)?, Length::percent(50.0))),
        },
        [a, b] => {
            // "top left" is allowed for keyword pairs.
            let a_vertical = matches!(a.to_ascii_lowercase().as_str(), "top" | "bottom");
            if a_vertical {
                Some((horizontal(b)?, vertical(a)?))
            } else {
                Some((horizontal(a)?, vertical(b)?))
            }
        }
        _ => None,
    }
}

/// [§ 14.2.1 'background'](https://www.w3.org/TR/CSS2/colors.html#propdef-background)
///
/// "Given a valid declaration, the 'background' property first sets all the
/// individual background properties to their initial values, then assigns
/// explicit values given in the declaration."
fn apply_background_shorthand(p: &mut SpecifiedProperties, tokens: &[String]) -> bool {
    let mut color = Color::TRANSPARENT;
    let mut image = None;
    let mut repeat = BackgroundRepeat::Repeat;
    let mut position: Vec<String> = Vec::new();
    for token in tokens {
        if let Some(c) = Color::parse(token) {
            color = c;
        } else if let Some(i) = parse_image(token) {
            image = i;
        } else if let Some(r) = keyword_token::<BackgroundRepeat>(token) {
            repeat = r;
        } else {
            position.push(token.clone());
        }
    }
    let position = if position.is_empty() {
        (Length::percent(0.0), Length::percent(0.0))
    } else {
        match parse_background_position(&position) {
            Some(pos) => pos,
            None => return false,
        }
    };
    p.background_color = Some(Specified::Value(color));
    p.background_image = Some(Specified::Value(image));
    p.background_repeat = Some(Specified::Value(repeat));
    p.background_position = Some(Specified::Value(position));
    true
}

/// [§ 15.3 Font family](https://www.w3.org/TR/CSS2/fonts.html#font-family-prop)
///
/// Only the first family in the list is kept.
fn parse_font_family(tokens: &[String]) -> Option<String> {
    let words: Vec<&str> = tokens
        .iter()
        .take_while(|t| t.as_str() != ",")
        .map(|t| unquote(t))
        .collect();
    (!words.is_empty()).then(|| words.join(" "))
}

/// [§ 15.7 Font size](https://www.w3.org/TR/CSS2/fonts.html#font-size-props)
///
/// Absolute keywords map to a fixed pixel table with `medium` at 16px.
/// "larger" and "smaller" scale the parent size by 1.2.
fn parse_font_size(token: &str) -> Option<Length> {
    let px = match token.to_ascii_lowercase().as_str() {
        "xx-small" => 9.0,
        "x-small" => 10.0,
        "small" => 13.0,
        "medium" => 16.0,
        "large" => 18.0,
        "x-large" => 24.0,
        "xx-large" => 32.0,
        "larger" => return Some(Length::em(1.2)),
        "smaller" => return Some(Length::em(1.0 / 1.2)),
        _ => return parse_non_negative(token),
    };
    Some(Length::px(px))
}

/// [§ 15.6 Font boldness](https://www.w3.org/TR/CSS2/fonts.html#font-boldness)
fn parse_font_weight(token: &str) -> Option<u16> {
    match token.to_ascii_lowercase().as_str() {
        "normal" => Some(400),
        "bold" | "bolder" => Some(700),
        "lighter" => Some(100),
        _ => token
            .parse::<u16>()
            .ok()
            .filter(|w| (100..=900).contains(w) && w % 100 == 0),
    }
}

fn parse_line_height(token: &str) -> Option<LineHeightSpec> {
    if token.eq_ignore_ascii_case("normal") {
        return Some(LineHeightSpec::Normal);
    }
    if let Ok(number) = token.parse::<f32>() {
        return (number >= 0.0).then_some(LineHeightSpec::Number(number));
    }
    parse_non_negative(token).map(LineHeightSpec::Length)
}

fn parse_vertical_align(token: &str) -> Option<VerticalAlignSpec> {
    if let Ok(keyword) = token.parse::<VerticalAlign>() {
        return Some(VerticalAlignSpec::Keyword(keyword));
    }
    Length::parse(token).map(VerticalAlignSpec::Length)
}

/// [§ 17.6.1 'border-spacing'](https://www.w3.org/TR/CSS2/tables.html#propdef-border-spacing)
///
/// "If one length is specified, it gives both the horizontal and vertical
/// spacing. If two are specified, the first gives the horizontal spacing and
/// the second the vertical spacing. Lengths may not be negative."
fn parse_border_spacing(tokens: &[String]) -> Option<(Length, Length)> {
    let lengths = each(tokens, |t| {
        parse_non_negative(t).filter(|l| l.unit != LengthUnit::Percent)
    })?;
    match lengths.as_slice() {
        [both] => Some((*both, *both)),
        [h, v] => Some((*h, *v)),
        _ => None,
    }
}

/// [§ 12.2 The 'content' property](https://www.w3.org/TR/CSS2/generate.html#content)
///
/// Strings only; `normal` and `none` generate nothing.
fn parse_content(tokens: &[String]) -> Option<Option<String>> {
    if let [t] = tokens
        && (t.eq_ignore_ascii_case("none") || t.eq_ignore_ascii_case("normal"))
    {
        return Some(None);
    }
    let mut text = String::new();
    for token in tokens {
        let quoted = token.len() >= 2
            && ((token.starts_with('"') && token.ends_with('"'))
                || (token.starts_with('\'') && token.ends_with('\'')));
        if !quoted {
            return None;
        }
        text.push_str(&token[1..token.len() - 1]);
    }
    Some(Some(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::values::{Display, Length};

    #[test]
    fn tokenizer_keeps_functions_and_strings_whole() {
        assert_eq!(
            tokenize_value("1px solid rgb(1, 2, 3)"),
            vec!["1px", "solid", "rgb(1, 2, 3)"]
        );
        assert_eq!(tokenize_value("\"a b\" 'c'"), vec!["\"a b\"", "'c'"]);
        assert_eq!(tokenize_value("Arial, serif"), vec!["Arial", ",", "serif"]);
    }

    #[test]
    fn block_parsing_skips_empty_declarations() {
        let decls = parse_declaration_block("width: 10px;; color:red; bogus; content: 'a;b'");
        assert_eq!(decls.len(), 3);
        assert_eq!(decls[0].name, "width");
        assert_eq!(decls[2].tokens, vec!["'a;b'"]);
    }

    #[test]
    fn margin_shorthand_expands_three_values() {
        let mut props = SpecifiedProperties::default();
        assert!(apply_declaration(&mut props, &Declaration::new("margin", "1px auto 3px")));
        assert_eq!(props.margin.left, Some(Specified::Value(SizeSpec::Auto)));
        assert_eq!(
            props.margin.bottom,
            Some(Specified::Value(SizeSpec::Length(Length::px(3.0))))
        );
    }

    #[test]
    fn malformed_value_keeps_previous() {
        let mut props = SpecifiedProperties::default();
        assert!(apply_declaration(&mut props, &Declaration::new("display", "block")));
        assert!(!apply_declaration(&mut props, &Declaration::new("display", "blocky")));
        assert_eq!(props.display, Some(Specified::Value(Display::Block)));
    }

    #[test]
    fn border_side_shorthand_in_any_order() {
        let mut props = SpecifiedProperties::default();
        assert!(apply_declaration(&mut props, &Declaration::new("border-left", "red dashed 2px")));
        assert_eq!(
            props.border_style.left,
            Some(Specified::Value(BorderStyle::Dashed))
        );
        assert_eq!(props.border_style.top, None);
    }
}
