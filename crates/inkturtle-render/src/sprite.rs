//! Turtle sprite construction and placement.
//!
//! A sprite is the renderable form of a turtle's visual state: a shape
//! source plus a transform that places, rotates and stretches it on the
//! canvas. Raster-backed sprites are two-phase: they first render at a
//! placeholder size and are corrected once the image's natural size is
//! known (see [`SizeCorrection`]).

use crate::shapes::{BuiltinShape, SHAPE_SIZE};
use kurbo::{Affine, Point, Size, Vec2};
use peniko::Color;
use std::io::Cursor;
use thiserror::Error;

/// Errors produced while preparing sprite content.
#[derive(Debug, Error)]
pub enum SpriteError {
    #[error("unreadable raster data: {0}")]
    Raster(String),
}

/// Where a sprite's pixels come from.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeSource {
    /// One of the built-in vector shapes.
    Builtin(BuiltinShape),
    /// A remote image referenced by URL; fetched by the host.
    RemoteImage { url: String },
    /// Inline vector markup taken from the resource map.
    InlineSvg { markup: String },
    /// Raster bytes taken from the resource map.
    RasterImage { data: Vec<u8>, mime: String },
}

impl ShapeSource {
    /// Whether this source needs a deferred natural-size correction.
    pub fn is_raster(&self) -> bool {
        matches!(
            self,
            ShapeSource::RasterImage { .. } | ShapeSource::RemoteImage { .. }
        )
    }
}

/// Style inputs that affect how a sprite is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteStyle {
    /// Heading in degrees, turtle convention (0 = east, counterclockwise).
    pub heading: f64,
    /// Stretch factors `[sx, sy]`.
    pub stretch: [f64; 2],
    /// Outline stroke width.
    pub outline_width: f64,
    /// Outline stroke color.
    pub pencolor: Color,
    /// Fill color for primitive shapes.
    pub fillcolor: Color,
}

impl Default for SpriteStyle {
    fn default() -> Self {
        Self {
            heading: 0.0,
            stretch: [1.0, 1.0],
            outline_width: 1.0,
            pencolor: Color::BLACK,
            fillcolor: Color::BLACK,
        }
    }
}

/// Deferred size fix-up for a raster sprite.
///
/// Applying one to a sprite that has already been replaced is harmless;
/// the correction simply targets whatever node still holds the identity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeCorrection {
    pub width: f64,
    pub height: f64,
}

/// A positioned, rotated, stretched turtle sprite.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    /// Shape content.
    pub source: ShapeSource,
    /// Canvas position of the sprite center.
    pub position: Point,
    /// Style inputs.
    pub style: SpriteStyle,
    /// Current display size. Placeholder until a correction lands for
    /// raster sources.
    pub size: Size,
    /// True while a raster sprite is still at its placeholder size.
    pub awaiting_natural_size: bool,
}

impl Sprite {
    /// Build a sprite for the given source at `position`.
    pub fn new(source: ShapeSource, position: Point, style: SpriteStyle) -> Self {
        let awaiting = source.is_raster();
        Self {
            source,
            position,
            style,
            size: Size::new(SHAPE_SIZE, SHAPE_SIZE),
            awaiting_natural_size: awaiting,
        }
    }

    /// Screen rotation in degrees: heading 0 (east) points "up", canvas Y
    /// grows downward.
    pub fn screen_rotation(&self) -> f64 {
        (-self.style.heading + 90.0).rem_euclid(360.0)
    }

    /// Full placement transform.
    ///
    /// Composition order: local center to origin, rotate by the screen
    /// heading, stretch (with the shape's size compensation), translate to
    /// the final position.
    pub fn transform(&self) -> Affine {
        let comp = match &self.source {
            ShapeSource::Builtin(shape) => shape.scale_compensation(),
            _ => 1.0,
        };
        let center = Vec2::new(self.size.width / 2.0, self.size.height / 2.0);
        Affine::translate(self.position.to_vec2())
            * Affine::scale_non_uniform(self.style.stretch[0] * comp, self.style.stretch[1] * comp)
            * Affine::rotate(self.screen_rotation().to_radians())
            * Affine::translate(-center)
    }

    /// Compute the deferred size correction for a raster sprite.
    ///
    /// Returns `None` for vector sources and for remote images (whose size
    /// is only known to the host after fetch). Unreadable raster data keeps
    /// the placeholder size; the sprite still renders.
    pub fn deferred_size_correction(&self) -> Option<SizeCorrection> {
        let ShapeSource::RasterImage { data, .. } = &self.source else {
            return None;
        };
        match natural_size(data) {
            Ok((w, h)) => Some(SizeCorrection {
                width: w as f64,
                height: h as f64,
            }),
            Err(err) => {
                log::warn!("raster sprite keeps placeholder size: {err}");
                None
            }
        }
    }

    /// Apply a natural-size correction. No-op once applied.
    pub fn apply_size_correction(&mut self, correction: SizeCorrection) {
        self.size = Size::new(correction.width, correction.height);
        self.awaiting_natural_size = false;
    }
}

/// Read a raster image's natural dimensions from its header.
pub fn natural_size(data: &[u8]) -> Result<(u32, u32), SpriteError> {
    image::ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| SpriteError::Raster(e.to_string()))?
        .into_dimensions()
        .map_err(|e| SpriteError::Raster(e.to_string()))
}
