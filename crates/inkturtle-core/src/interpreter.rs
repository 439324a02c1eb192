//! Action interpreter: the stateful core of the renderer.
//!
//! Applies each action exactly once, in emission order, mutating the scene
//! and its own cursor/fill state as a side effect. Batches are synchronous
//! and atomic; the host must never call [`Interpreter::apply`] re-entrantly.

use crate::action::{ActionKind, TurtleAction};
use crate::audio::{AudioChannel, AudioSource};
use crate::color::Rgba;
use crate::fill::{arc_between, FillBuilder};
use crate::resource::{resolve, ResolvedResource, ResourceMap};
use crate::scene::{NodeId, Scene, SceneElement};
use crate::text;
use crate::turtle::TurtleVisual;
use inkturtle_render::{BuiltinShape, ShapeSource, SizeCorrection, Sprite, SpriteStyle};
use kurbo::{BezPath, Point};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Canvas configuration supplied by the collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// Canvas identity; also the session-log key.
    pub id: String,
    pub width: f64,
    pub height: f64,
    pub background: String,
    #[serde(rename = "bgUrl", default)]
    pub bg_url: Option<String>,
}

impl CanvasConfig {
    /// Classic screen defaults.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            width: 800.0,
            height: 500.0,
            background: "white".to_string(),
            bg_url: None,
        }
    }

    /// Canvas center, the home position of every turtle.
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Outcome of applying one action, for the session layer to act on.
#[derive(Debug, Default, PartialEq)]
pub struct Applied {
    /// Append this action to the persisted session log.
    pub persist: bool,
    /// Drop this turtle's entries from the persisted log.
    pub cleared: Option<String>,
    /// Deferred raster sizing produced by a stamp render.
    pub size_correction: Option<(NodeId, SizeCorrection)>,
}

/// Stamp key reserved for DONE renders, which update in place per turtle.
const DONE_STAMP_ID: i64 = -1;

/// Interpreter state for one canvas.
pub struct Interpreter {
    config: CanvasConfig,
    /// Last recorded point per turtle; canvas center before first record.
    positions: HashMap<String, Point>,
    /// Latest full visual state per turtle.
    turtles: HashMap<String, TurtleVisual>,
    /// At most one open fill outline per canvas.
    open_fill: Option<FillBuilder>,
    /// Synthetic ids for stamps the stream left anonymous.
    next_anonymous_stamp: i64,
}

impl Interpreter {
    pub fn new(config: CanvasConfig) -> Self {
        Self {
            config,
            positions: HashMap::new(),
            turtles: HashMap::new(),
            open_fill: None,
            next_anonymous_stamp: DONE_STAMP_ID - 1,
        }
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Last recorded position for a turtle, defaulting to canvas center.
    pub fn position_of(&self, id: &str) -> Point {
        self.positions
            .get(id)
            .copied()
            .unwrap_or_else(|| self.config.center())
    }

    /// Latest visual snapshot for a turtle, if any action established one.
    pub fn visual_of(&self, id: &str) -> Option<&TurtleVisual> {
        self.turtles.get(id)
    }

    /// Whether a fill outline is currently open.
    pub fn fill_open(&self) -> bool {
        self.open_fill.is_some()
    }

    /// Apply one action. `replaying` suppresses side effects that must not
    /// re-trigger on remount (audio) and re-persistence.
    pub fn apply(
        &mut self,
        action: &TurtleAction,
        scene: &mut Scene,
        resources: &ResourceMap,
        audio: &mut AudioChannel,
        replaying: bool,
    ) -> Applied {
        let mut applied = match action.kind {
            ActionKind::MoveAbsolute => self.move_absolute(action),
            ActionKind::MoveRelative => {
                // Deliberate identity transform; relative deltas are
                // resolved upstream. Nothing to record or draw.
                Applied::default()
            }
            ActionKind::LineAbsolute => self.line_absolute(action, scene),
            ActionKind::DrawDot => self.draw_dot(action, scene),
            ActionKind::Circle => self.circle(action, scene),
            ActionKind::WriteText => self.write_text(action, scene),
            ActionKind::Sound => self.sound(action, resources, audio, replaying),
            ActionKind::Clear => {
                scene.clear_turtle(&action.id);
                Applied {
                    cleared: Some(action.id.clone()),
                    ..Applied::default()
                }
            }
            ActionKind::UpdateState => {
                self.refresh_visual(action);
                Applied {
                    persist: true,
                    ..Applied::default()
                }
            }
            ActionKind::Stamp => self.stamp(action, scene, resources, action.stampid),
            ActionKind::Done => {
                let stampid = action.stampid.or(Some(DONE_STAMP_ID));
                self.stamp(action, scene, resources, stampid)
            }
            ActionKind::BeginFill => self.begin_fill(action),
            ActionKind::EndFill => self.end_fill(action, scene),
            ActionKind::Unknown => {
                // Trusted stream, independently versioned: drop silently.
                log::debug!("dropping unrecognized action for turtle {}", action.id);
                Applied::default()
            }
        };
        if replaying {
            applied.persist = false;
        }
        applied
    }

    fn move_absolute(&mut self, action: &TurtleAction) -> Applied {
        if let Some(to) = action.point() {
            self.positions.insert(action.id.clone(), to);
            if let Some(visual) = self.turtles.get_mut(&action.id) {
                visual.position = to;
            }
        }
        Applied {
            persist: true,
            ..Applied::default()
        }
    }

    fn line_absolute(&mut self, action: &TurtleAction, scene: &mut Scene) -> Applied {
        let from = self.position_of(&action.id);
        let to = action.point().unwrap_or(from);
        if action.pen != 0 {
            let mut path = BezPath::new();
            path.move_to(from);
            path.line_to(to);
            scene.insert_mark(
                &action.id,
                SceneElement::Path {
                    path,
                    color: Rgba::parse(&action.pencolor),
                    width: action.pensize,
                },
            );
            if let Some(fill) = &mut self.open_fill {
                fill.line_to(to);
            }
        }
        // Pen state never gates movement.
        self.positions.insert(action.id.clone(), to);
        if let Some(visual) = self.turtles.get_mut(&action.id) {
            visual.position = to;
        }
        Applied {
            persist: true,
            ..Applied::default()
        }
    }

    fn draw_dot(&mut self, action: &TurtleAction, scene: &mut Scene) -> Applied {
        let center = action.point().unwrap_or_else(|| self.position_of(&action.id));
        scene.insert_mark(
            &action.id,
            SceneElement::Dot {
                center,
                radius: action.radius,
                color: Rgba::parse(&action.pencolor),
            },
        );
        Applied {
            persist: true,
            ..Applied::default()
        }
    }

    fn circle(&mut self, action: &TurtleAction, scene: &mut Scene) -> Applied {
        let from = self.position_of(&action.id);
        let to = action.point().unwrap_or(from);
        let mut path = BezPath::new();
        path.move_to(from);
        path.extend(arc_between(
            from,
            to,
            action.radius,
            action.large_arc,
            action.clockwise,
        ));
        scene.insert_mark(
            &action.id,
            SceneElement::Path {
                path,
                color: Rgba::parse(&action.pencolor),
                width: action.pensize,
            },
        );
        if let Some(fill) = &mut self.open_fill {
            fill.arc_to(from, to, action.radius, action.large_arc, action.clockwise);
        }
        self.positions.insert(action.id.clone(), to);
        if let Some(visual) = self.turtles.get_mut(&action.id) {
            visual.position = to;
        }
        Applied {
            persist: true,
            ..Applied::default()
        }
    }

    fn write_text(&mut self, action: &TurtleAction, scene: &mut Scene) -> Applied {
        let anchor = text::anchor_point(action);
        scene.insert_text(
            &action.id,
            SceneElement::Glyphs {
                origin: anchor,
                text: action.text.clone().unwrap_or_default(),
                font: action.font.clone().unwrap_or_default(),
                color: Rgba::parse(&action.pencolor),
            },
        );
        self.positions.insert(action.id.clone(), anchor);
        Applied {
            persist: true,
            ..Applied::default()
        }
    }

    fn sound(
        &mut self,
        action: &TurtleAction,
        resources: &ResourceMap,
        audio: &mut AudioChannel,
        replaying: bool,
    ) -> Applied {
        // Sound is never persisted and never replayed.
        if replaying {
            return Applied::default();
        }
        let Some(media) = &action.media else {
            return Applied::default();
        };
        match AudioSource::from_resolved(resolve(media, resources)) {
            Some(source) => audio.play(source),
            None => log::debug!("sound media did not resolve: {media}"),
        }
        Applied::default()
    }

    fn refresh_visual(&mut self, action: &TurtleAction) {
        let home = self.config.center();
        self.turtles
            .entry(action.id.clone())
            .or_insert_with(|| TurtleVisual::at_home(home))
            .update_from(action);
    }

    fn stamp(
        &mut self,
        action: &TurtleAction,
        scene: &mut Scene,
        resources: &ResourceMap,
        stampid: Option<i64>,
    ) -> Applied {
        self.refresh_visual(action);
        let visual = self.turtles[&action.id].clone();
        let stampid = stampid.unwrap_or_else(|| {
            let id = self.next_anonymous_stamp;
            self.next_anonymous_stamp -= 1;
            id
        });

        let mut size_correction = None;
        if let Some(sprite) = self.build_sprite(&visual, resources) {
            let correction = sprite.deferred_size_correction();
            let node = scene.upsert_stamp(&action.id, stampid, sprite.clone());
            if let Some(correction) = correction {
                size_correction = Some((node, correction));
            }
            scene.set_live_sprite(&action.id, visual.show.then_some(sprite));
        } else {
            // Unresolvable shape: no stamp, and the live sprite goes away.
            scene.set_live_sprite(&action.id, None);
        }
        Applied {
            persist: true,
            size_correction,
            ..Applied::default()
        }
    }

    fn begin_fill(&mut self, action: &TurtleAction) -> Applied {
        if self.open_fill.is_some() {
            log::warn!("BEGIN_FILL while a fill is open; discarding the old outline");
        }
        let seed = action
            .fill_start_position
            .map(|[x, y]| Point::new(x, y))
            .unwrap_or_else(|| self.position_of(&action.id));
        self.open_fill = Some(FillBuilder::open(seed, Rgba::parse(&action.color)));
        Applied {
            persist: true,
            ..Applied::default()
        }
    }

    fn end_fill(&mut self, action: &TurtleAction, scene: &mut Scene) -> Applied {
        if let Some(fill) = self.open_fill.take() {
            let (path, color) = fill.close();
            scene.insert_mark(&action.id, SceneElement::FillRegion { path, color });
        }
        Applied {
            persist: true,
            ..Applied::default()
        }
    }

    /// Sprite for a turtle's current visual state, or `None` when the
    /// shape resolves to nothing (graceful, never an error).
    fn build_sprite(&self, visual: &TurtleVisual, resources: &ResourceMap) -> Option<Sprite> {
        let source = match BuiltinShape::from_name(&visual.shape) {
            Some(builtin) => ShapeSource::Builtin(builtin),
            None => match resolve(&visual.shape, resources) {
                ResolvedResource::RemoteUrl(url) => ShapeSource::RemoteImage { url },
                ResolvedResource::VectorMarkup(markup) => ShapeSource::InlineSvg { markup },
                ResolvedResource::Raster { mime, data } => ShapeSource::RasterImage { data, mime },
                ResolvedResource::NotFound => return None,
            },
        };
        let style = SpriteStyle {
            heading: visual.heading,
            stretch: visual.penstretchfactor,
            outline_width: visual.penoutlinewidth,
            pencolor: visual.pencolor.into(),
            fillcolor: visual.color.into(),
        };
        Some(Sprite::new(source, visual.position, style))
    }
}
