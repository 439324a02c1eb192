//! Text measurement and anchoring for WRITE_TEXT.
//!
//! Width is approximated from character count, font size and weight; the
//! same approximation a layout pass would later refine. Good enough for
//! anchor math, which is all the interpreter needs.

use crate::action::{ActionKind, FontSpec, TextAlign, TurtleAction};
use kurbo::Point;

/// Approximate pixel width of `text` under `font`.
///
/// This is a rough estimate; actual width depends on the glyphs. The
/// factors are empirically chosen per weight, bold glyphs running wider.
pub fn measure_width(text: &str, font: &FontSpec) -> f64 {
    let char_width_factor = match font.weight.as_str() {
        "bold" | "heavy" => 0.60,
        "light" => 0.48,
        _ => 0.52,
    };
    text.chars().count() as f64 * font.size * char_width_factor
}

/// Resolve the anchor point for a WRITE_TEXT action.
///
/// `left` keeps the stated position, `center` shifts left by half the
/// measured width, `right` by the full width. Any other alignment value is
/// a defined fallback to the origin, not an error.
///
/// # Panics
///
/// Panics when called for an action that is not WRITE_TEXT; that is an
/// interpreter bug, not bad input data.
pub fn anchor_point(action: &TurtleAction) -> Point {
    assert_eq!(
        action.kind,
        ActionKind::WriteText,
        "anchor_point called for a non-WRITE_TEXT action"
    );
    let position = action.point().unwrap_or(Point::ZERO);
    let font = action.font.clone().unwrap_or_default();
    let width = measure_width(action.text.as_deref().unwrap_or(""), &font);
    match action.align {
        TextAlign::Left => position,
        TextAlign::Center => Point::new(position.x - width / 2.0, position.y),
        TextAlign::Right => Point::new(position.x - width, position.y),
        TextAlign::Other => Point::ZERO,
    }
}
