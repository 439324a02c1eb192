//! inkturtle sprite rendering.
//!
//! Maps a turtle's visual state (shape, heading, stretch, colors) to a
//! positioned vector drawing primitive: a built-in polygon set, a resource
//! image, or inline vector markup. The scene model and action interpreter
//! live in `inkturtle-core`; this crate only knows how a single sprite
//! looks and where it sits.

pub mod shapes;
pub mod sprite;

pub use shapes::{BuiltinShape, SHAPE_SIZE, TURTLE_SCALE_COMPENSATION};
pub use sprite::{natural_size, ShapeSource, SizeCorrection, Sprite, SpriteError, SpriteStyle};
