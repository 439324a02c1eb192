//! Built-in turtle sprite shapes.
//!
//! Each shape is defined in a local 32x32 coordinate box with the nominal
//! center at (16, 16). Rotation, stretch and final placement are applied by
//! the sprite transform, never baked into the geometry.

use kurbo::{BezPath, Circle, Rect, Shape as KurboShape};
use peniko::Color;

/// Side length of the local shape box.
pub const SHAPE_SIZE: f64 = 32.0;

/// Flattening tolerance used when converting analytic shapes to paths.
const PATH_TOLERANCE: f64 = 0.1;

/// Size compensation for the turtle composite, whose artwork fills its box
/// more tightly than the primitive shapes do.
pub const TURTLE_SCALE_COMPENSATION: f64 = 1.45;

/// The turtle icon, as (SVG path data, fill color) pairs.
///
/// Ported verbatim from the classic 32x32 turtle artwork; the subpaths are
/// layered in order, shell last.
const TURTLE_PATHS: &[(&str, (u8, u8, u8))] = &[
    // Head
    ("M16 0.248374C13.9097 0.248374 12.2153 1.9429 12.2153 4.03313L12.2153 7.81788C12.2153 9.90811 13.9097 11.6026 16 11.6026 18.0904 11.6026 19.7848 9.90811 19.7848 7.81788L19.7848 4.03313C19.7848 1.9429 18.0903 0.248374 16 0.248374Z", (0x9D, 0xD7, 0xF5)),
    ("M19.7848 7.81788C19.7848 9.90811 18.0904 11.6026 16 11.6026L16 11.6026C16 7.9125 16 4.03313 16 0.248374L16 0.248374C18.0904 0.248374 19.7848 1.9429 19.7848 4.03313L19.7848 7.81788Z", (0x78, 0xB9, 0xEB)),
    // Legs
    ("M10.3323 11.6026 5.67713 11.6026C2.54165 11.6026 0 14.1444 0 17.2798L10.3323 17.2798 10.3323 11.6026Z", (0x9D, 0xD7, 0xF5)),
    ("M10.5874 20.1183 7.7139 23.7808C5.77856 26.2476 6.20946 29.8163 8.67617 31.7516L15.0539 23.6225 10.5874 20.1183Z", (0x9D, 0xD7, 0xF5)),
    ("M21.4127 20.1183 24.2862 23.7808C26.2215 26.2476 25.7906 29.8163 23.3239 31.7516L16.9462 23.6226 21.4127 20.1183Z", (0x78, 0xB9, 0xEB)),
    ("M21.6677 11.6026 26.3229 11.6026C29.4583 11.6026 32 14.1444 32 17.2798L21.6677 17.2798 21.6677 11.6026Z", (0x78, 0xB9, 0xEB)),
    // Shell segments
    ("M16.0037 17.2798 22.6782 8.09417C20.8046 6.73052 18.4984 5.92532 16.0037 5.92532 13.5091 5.92532 11.2029 6.73052 9.32932 8.09417L16.0037 17.2798Z", (0xFF, 0x98, 0x11)),
    ("M16.0037 17.2798 22.6782 8.09417C20.8046 6.73052 18.4984 5.92532 16.0037 5.92532 16.0037 9.71026 16.0037 17.2798 16.0037 17.2798Z", (0xFF, 0x50, 0x23)),
    ("M16.0037 17.2798 9.33008 8.09351C7.45417 9.45384 5.97575 11.3985 5.20489 13.771 4.43412 16.1436 4.48711 18.5858 5.20508 20.789L16.0037 17.2798Z", (0xFF, 0x50, 0x23)),
    ("M16.0037 17.2821 16.0037 17.2798 16 17.281 15.9964 17.2798 15.9964 17.2821 5.20498 20.788C5.91907 22.9923 7.31167 24.9994 9.3298 26.4657 11.3456 27.9302 13.6812 28.6343 15.9957 28.6341L15.9957 28.6342C15.9972 28.6342 15.9985 28.6341 16 28.6341 16.0016 28.6341 16.0029 28.6342 16.0044 28.6342L16.0044 28.6341C18.3189 28.6343 20.6546 27.9302 22.6703 26.4657 24.6884 24.9994 26.081 22.9923 26.7951 20.788L16.0037 17.2821Z", (0xFF, 0x98, 0x11)),
    ("M16.0037 17.2798 16.0032 28.6341C18.3203 28.6361 20.6596 27.932 22.6777 26.4657 24.696 24.9993 26.0884 22.9923 26.8028 20.7879L16.0037 17.2798Z", (0xD8, 0x00, 0x27)),
    ("M16.0037 17.2798 26.8023 20.7891C27.5203 18.5858 27.5733 16.1435 26.8023 13.7711 26.0315 11.3984 24.5532 9.45403 22.6772 8.09341L16.0037 17.2798Z", (0x80, 0x28, 0x12)),
    ("M19.6188 12.3061 21.8529 19.1825 16.0037 23.4322 10.1544 19.1825 12.3887 12.3061Z", (0xFF, 0xDA, 0x44)),
    ("M19.6188 12.3061 21.8529 19.1825 16.0037 23.4322 16 12.3061Z", (0xFF, 0x98, 0x11)),
];

/// A sprite shape bundled with the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinShape {
    /// Simple triangular pointer glyph.
    Arrow,
    /// Equilateral triangle.
    Triangle,
    /// Filled circle.
    Circle,
    /// Filled square.
    Square,
    /// The 14-subpath turtle composite (also the default shape).
    Turtle,
}

impl BuiltinShape {
    /// Resolve a shape name from the action stream.
    ///
    /// The empty string and `"default"` are aliases for the turtle icon.
    /// Anything else is not a built-in and must go through resource lookup.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "" | "default" | "turtle" => Some(BuiltinShape::Turtle),
            "arrow" => Some(BuiltinShape::Arrow),
            "triangle" => Some(BuiltinShape::Triangle),
            "circle" => Some(BuiltinShape::Circle),
            "square" => Some(BuiltinShape::Square),
            _ => None,
        }
    }

    /// Extra scale applied on top of the stretch factors.
    pub fn scale_compensation(&self) -> f64 {
        match self {
            BuiltinShape::Turtle => TURTLE_SCALE_COMPENSATION,
            _ => 1.0,
        }
    }

    /// Local geometry as (path, fill) pairs, layered back to front.
    ///
    /// Primitive shapes take their fill from `fill`; the turtle composite
    /// carries its own fixed palette.
    pub fn local_paths(&self, fill: Color) -> Vec<(BezPath, Color)> {
        match self {
            BuiltinShape::Arrow => {
                let mut path = BezPath::new();
                path.move_to((14.0, 0.0));
                path.line_to((27.8564, 24.0));
                path.line_to((0.1436, 24.0));
                path.close_path();
                vec![(path, fill)]
            }
            BuiltinShape::Triangle => {
                let mut path = BezPath::new();
                path.move_to((16.0, 0.0));
                path.line_to((32.0, 28.0));
                path.line_to((0.0, 28.0));
                path.close_path();
                vec![(path, fill)]
            }
            BuiltinShape::Circle => {
                let circle = Circle::new((16.0, 16.0), 16.0);
                vec![(circle.to_path(PATH_TOLERANCE), fill)]
            }
            BuiltinShape::Square => {
                let rect = Rect::new(0.0, 0.0, SHAPE_SIZE, SHAPE_SIZE);
                vec![(rect.to_path(PATH_TOLERANCE), fill)]
            }
            BuiltinShape::Turtle => TURTLE_PATHS
                .iter()
                .map(|&(d, (r, g, b))| {
                    // Static artwork, parse failure would be a packaging bug.
                    let path = BezPath::from_svg(d).expect("builtin turtle path data is valid");
                    (path, Color::from_rgba8(r, g, b, 255))
                })
                .collect(),
        }
    }
}
