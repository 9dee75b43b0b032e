//! Replaced elements.
//!
//! [§ 10.3.2 Inline, replaced elements](https://www.w3.org/TR/CSS2/visudet.html#inline-replaced-width)
//! [§ 10.6.2 Inline replaced elements, block-level replaced elements in normal flow, 'inline-block' replaced elements in normal flow and floating replaced elements](https://www.w3.org/TR/CSS2/visudet.html#inline-replaced-height)
//!
//! An `img` box is replaced: its content is an image, not child boxes.
//! Intrinsic dimensions come from the loaded image, then from the `width`
//! and `height` attributes.

use crate::style::values::LengthPercentageAuto;

use super::box_model::Size;
use super::sizing::{clamp_height, clamp_width};
use super::tree::{LayoutKind, LayoutNode, ReplacedData, SizeValue};
use super::LayoutContext;

/// Load the image and intrinsic size of every replaced node.
pub(crate) fn load_images(cx: &mut LayoutContext<'_>) {
    let boxes = cx.boxes;
    for id in cx.tree.iter() {
        if !matches!(cx.tree[id].kind, LayoutKind::Replaced(_)) {
            continue;
        }
        let Some(element) = boxes.element(cx.tree[id].box_id) else {
            continue;
        };
        let image = element.attr("src").and_then(|src| cx.resources.get_image(src));
        let attribute = |name: &str| {
            element
                .attr(name)
                .and_then(|v| v.trim().trim_end_matches("px").parse::<f32>().ok())
                .filter(|v| *v >= 0.0)
        };

        let mut data = ReplacedData::default();
        match &image {
            Some(image) => {
                data.intrinsic = Size::new(image.width, image.height);
                data.has_intrinsic_width = true;
                data.has_intrinsic_height = true;
            }
            None => {
                if let Some(width) = attribute("width") {
                    data.intrinsic.width = width;
                    data.has_intrinsic_width = true;
                }
                if let Some(height) = attribute("height") {
                    data.intrinsic.height = height;
                    data.has_intrinsic_height = true;
                }
            }
        }
        if image.is_none() {
            log::debug!("image {:?} did not load", element.attr("src"));
        }
        data.image = image;
        cx.tree[id].kind = LayoutKind::Replaced(data);
    }
}

/// The intrinsic ratio, when both intrinsic dimensions are known and
/// non-zero.
fn ratio(data: &ReplacedData) -> Option<f32> {
    (data.has_intrinsic_width
        && data.has_intrinsic_height
        && data.intrinsic.width > 0.0
        && data.intrinsic.height > 0.0)
        .then(|| data.intrinsic.width / data.intrinsic.height)
}

/// Used content size of a replaced element, before min/max.
///
/// [§ 10.3.2](https://www.w3.org/TR/CSS2/visudet.html#inline-replaced-width)
///
/// "If 'height' and 'width' both have computed values of 'auto' and the
/// element also has an intrinsic width, then that intrinsic width is the
/// used value of 'width'."
///
/// "If 'width' has a computed value of 'auto', 'height' has some other
/// computed value, and the element does have an intrinsic ratio; then the
/// used value of 'width' is: (used height) * (intrinsic ratio)"
///
/// [§ 10.6.2](https://www.w3.org/TR/CSS2/visudet.html#inline-replaced-height)
///
/// "Otherwise, if 'height' has a computed value of 'auto', and the element
/// has an intrinsic ratio then the used value of 'height' is: (used width) /
/// (intrinsic ratio)"
#[must_use]
pub fn used_replaced_size(
    data: &ReplacedData,
    width: LengthPercentageAuto,
    height: LengthPercentageAuto,
    containing_width: f32,
    containing_height: Option<f32>,
) -> Size {
    let width = width.resolve(Some(containing_width));
    let height = height.resolve(containing_height);
    let ratio = ratio(data);
    let intrinsic = data.intrinsic;
    match (width, height) {
        (Some(w), Some(h)) => Size::new(w, h),
        (Some(w), None) => {
            let h = ratio.map_or(intrinsic.height, |r| w / r);
            Size::new(w, h)
        }
        (None, Some(h)) => {
            let w = ratio.map_or(intrinsic.width, |r| h * r);
            Size::new(w, h)
        }
        (None, None) => intrinsic,
    }
}

/// Set the used width and height of a replaced node whose edges are
/// resolved.
pub(crate) fn size_replaced(node: &mut LayoutNode) {
    let LayoutKind::Replaced(data) = &node.kind else {
        return;
    };
    let size = used_replaced_size(
        data,
        node.style.width,
        node.style.height,
        node.containing_width,
        node.containing_height,
    );
    let mut width = clamp_width(node, size.width);
    let mut height = clamp_height(node, size.height);

    // [§ 10.4] With both dimensions auto, a clamped dimension drags the other
    // along to keep the ratio.
    let both_auto = node.style.width.is_auto() && node.style.height.is_auto();
    if both_auto && let Some(ratio) = ratio(data) {
        if width != size.width {
            height = clamp_height(node, width / ratio);
        } else if height != size.height {
            width = clamp_width(node, height * ratio);
        }
    }

    node.width = SizeValue::fixed(width);
    node.height = SizeValue::fixed(height);
}
