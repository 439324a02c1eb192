//! InkTurtle Core Library
//!
//! Action-stream interpreter, scene model and session replay for the
//! InkTurtle canvas.

pub mod action;
pub mod audio;
pub mod canvas;
pub mod color;
pub mod fill;
pub mod interpreter;
pub mod resource;
pub mod scene;
pub mod session;
pub mod text;
pub mod turtle;

pub use action::{ActionKind, FontSpec, TextAlign, TurtleAction};
pub use audio::{AudioChannel, AudioSink, AudioSource, ClipId, NullAudioSink};
pub use canvas::CanvasSession;
pub use color::Rgba;
pub use interpreter::{Applied, CanvasConfig, Interpreter};
pub use resource::{ResolvedResource, ResourceEntry, ResourceMap, resolve};
pub use scene::{Layer, NodeId, Scene, SceneElement, SceneNode};
pub use session::{FileSessionStore, MemorySessionStore, SessionError, SessionStore};
pub use turtle::TurtleVisual;
