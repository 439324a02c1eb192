//! Retained vector scene with turtle-graphics z-ordering.
//!
//! The scene owns every rendered element and its draw order. Ordering is
//! layered, bottom to top: accumulated marks (lines, dots, arcs, fills),
//! then stamps, then the live turtle sprites, then text. Inserting a mark
//! after a stamp therefore still draws it underneath the sprite layer,
//! which is the insert-before-baseline behavior the action stream expects.
//!
//! Nodes are addressed by owned [`NodeId`] handles; stamp identity is an
//! explicit index, never reconstructed from string patterns.

use crate::action::FontSpec;
use crate::color::Rgba;
use inkturtle_render::{SizeCorrection, Sprite};
use kurbo::{BezPath, Point};
use std::collections::HashMap;
use uuid::Uuid;

/// Unique identifier for scene nodes.
pub type NodeId = Uuid;

/// Draw layers, bottom to top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    /// Lines, dots, arcs and committed fills.
    Marks,
    /// Persistent sprite copies.
    Stamps,
    /// Live turtle sprites, above stamps.
    Sprites,
    /// Text runs, drawn topmost.
    Text,
}

impl Layer {
    const ALL: [Layer; 4] = [Layer::Marks, Layer::Stamps, Layer::Sprites, Layer::Text];

    fn index(self) -> usize {
        match self {
            Layer::Marks => 0,
            Layer::Stamps => 1,
            Layer::Sprites => 2,
            Layer::Text => 3,
        }
    }
}

/// Renderable content of a scene node.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneElement {
    /// Stroked path: straight segment or arc.
    Path {
        path: BezPath,
        color: Rgba,
        width: f64,
    },
    /// Filled and stroked dot.
    Dot {
        center: Point,
        radius: f64,
        color: Rgba,
    },
    /// Committed fill outline.
    FillRegion { path: BezPath, color: Rgba },
    /// Text run at a resolved anchor.
    Glyphs {
        origin: Point,
        text: String,
        font: FontSpec,
        color: Rgba,
    },
    /// Turtle sprite (stamp or live).
    Sprite(Sprite),
}

/// One element in the scene, tagged with the turtle that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub id: NodeId,
    pub turtle: String,
    pub element: SceneElement,
}

/// Stamp identity: turtle plus stamp instance. The shape is tracked next
/// to the node so a shape change replaces rather than duplicates.
type StampKey = (String, i64);

/// The retained scene.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: HashMap<NodeId, SceneNode>,
    layers: [Vec<NodeId>; 4],
    stamps: HashMap<StampKey, (String, NodeId)>,
    live: HashMap<String, NodeId>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, layer: Layer, turtle: &str, element: SceneElement) -> NodeId {
        let id = Uuid::new_v4();
        self.nodes.insert(
            id,
            SceneNode {
                id,
                turtle: turtle.to_string(),
                element,
            },
        );
        self.layers[layer.index()].push(id);
        id
    }

    /// Add a regular mark (line, dot, arc, fill) below the stamp layer.
    pub fn insert_mark(&mut self, turtle: &str, element: SceneElement) -> NodeId {
        self.insert(Layer::Marks, turtle, element)
    }

    /// Add a text run above the stamp and sprite layers.
    pub fn insert_text(&mut self, turtle: &str, element: SceneElement) -> NodeId {
        self.insert(Layer::Text, turtle, element)
    }

    /// Create or update a stamp.
    ///
    /// Same (turtle, shape, stamp id): the existing node is updated in
    /// place and keeps its handle. Same (turtle, stamp id) with a new
    /// shape: the stale node is removed first, so the element count never
    /// grows on re-render.
    pub fn upsert_stamp(&mut self, turtle: &str, stampid: i64, sprite: Sprite) -> NodeId {
        let key = (turtle.to_string(), stampid);
        let shape = shape_identity(&sprite);
        if let Some((existing_shape, node_id)) = self.stamps.get(&key).cloned() {
            if existing_shape == shape {
                if let Some(node) = self.nodes.get_mut(&node_id) {
                    node.element = SceneElement::Sprite(sprite);
                    return node_id;
                }
            }
            self.remove_node(node_id);
        }
        let id = self.insert(Layer::Stamps, turtle, SceneElement::Sprite(sprite));
        self.stamps.insert(key, (shape, id));
        id
    }

    /// Set, replace or remove (with `None`) the live sprite for a turtle.
    pub fn set_live_sprite(&mut self, turtle: &str, sprite: Option<Sprite>) -> Option<NodeId> {
        match sprite {
            Some(sprite) => {
                if let Some(&node_id) = self.live.get(turtle) {
                    if let Some(node) = self.nodes.get_mut(&node_id) {
                        node.element = SceneElement::Sprite(sprite);
                        return Some(node_id);
                    }
                }
                let id = self.insert(Layer::Sprites, turtle, SceneElement::Sprite(sprite));
                self.live.insert(turtle.to_string(), id);
                Some(id)
            }
            None => {
                if let Some(node_id) = self.live.remove(turtle) {
                    self.remove_node(node_id);
                }
                None
            }
        }
    }

    /// Remove every node produced by `turtle`, in every layer. Other
    /// turtles' nodes keep their order.
    pub fn clear_turtle(&mut self, turtle: &str) {
        let doomed: Vec<NodeId> = self
            .nodes
            .values()
            .filter(|node| node.turtle == turtle)
            .map(|node| node.id)
            .collect();
        for id in doomed {
            self.remove_node(id);
        }
        self.stamps.retain(|(owner, _), _| owner != turtle);
        self.live.remove(turtle);
    }

    fn remove_node(&mut self, id: NodeId) {
        if self.nodes.remove(&id).is_some() {
            for layer in &mut self.layers {
                layer.retain(|&node_id| node_id != id);
            }
        }
    }

    /// Apply a deferred raster-size correction. Targeting a node that has
    /// been removed, or one that is not a sprite, is a harmless no-op.
    pub fn apply_size_correction(&mut self, id: NodeId, correction: SizeCorrection) {
        if let Some(SceneNode {
            element: SceneElement::Sprite(sprite),
            ..
        }) = self.nodes.get_mut(&id)
        {
            sprite.apply_size_correction(correction);
        }
    }

    /// All nodes in draw order, bottom to top.
    pub fn nodes_ordered(&self) -> impl Iterator<Item = &SceneNode> {
        Layer::ALL
            .iter()
            .flat_map(|layer| self.layers[layer.index()].iter())
            .filter_map(|id| self.nodes.get(id))
    }

    /// Nodes of a single layer in insertion order.
    pub fn layer_nodes(&self, layer: Layer) -> impl Iterator<Item = &SceneNode> {
        self.layers[layer.index()]
            .iter()
            .filter_map(|id| self.nodes.get(id))
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Stable identity string for a sprite's shape content.
fn shape_identity(sprite: &Sprite) -> String {
    use inkturtle_render::ShapeSource;
    match &sprite.source {
        ShapeSource::Builtin(shape) => format!("builtin:{shape:?}"),
        ShapeSource::RemoteImage { url } => format!("url:{url}"),
        ShapeSource::InlineSvg { markup } => format!("svg:{}", markup.len()),
        ShapeSource::RasterImage { mime, data } => format!("raster:{mime}:{}", data.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkturtle_render::{BuiltinShape, ShapeSource, SpriteStyle};

    fn mark(color: Rgba) -> SceneElement {
        SceneElement::Dot {
            center: Point::ZERO,
            radius: 2.0,
            color,
        }
    }

    fn sprite(shape: BuiltinShape) -> Sprite {
        Sprite::new(
            ShapeSource::Builtin(shape),
            Point::new(10.0, 10.0),
            SpriteStyle::default(),
        )
    }

    #[test]
    fn test_marks_stay_below_stamps_regardless_of_insertion_order() {
        let mut scene = Scene::new();
        scene.upsert_stamp("t1", 1, sprite(BuiltinShape::Square));
        scene.insert_mark("t1", mark(Rgba::black()));

        let order: Vec<_> = scene.nodes_ordered().collect();
        assert_eq!(order.len(), 2);
        assert!(matches!(order[0].element, SceneElement::Dot { .. }));
        assert!(matches!(order[1].element, SceneElement::Sprite(_)));
    }

    #[test]
    fn test_text_sits_above_stamps_and_sprites() {
        let mut scene = Scene::new();
        scene.insert_text(
            "t1",
            SceneElement::Glyphs {
                origin: Point::ZERO,
                text: "hi".to_string(),
                font: FontSpec::default(),
                color: Rgba::black(),
            },
        );
        scene.set_live_sprite("t1", Some(sprite(BuiltinShape::Turtle)));
        scene.upsert_stamp("t1", 1, sprite(BuiltinShape::Square));

        let kinds: Vec<&str> = scene
            .nodes_ordered()
            .map(|node| match node.element {
                SceneElement::Sprite(_) => "sprite",
                SceneElement::Glyphs { .. } => "text",
                _ => "mark",
            })
            .collect();
        // stamp, then live sprite, then text on top
        assert_eq!(kinds, vec!["sprite", "sprite", "text"]);
        let top = scene.nodes_ordered().last().unwrap();
        assert!(scene.layer_nodes(Layer::Text).any(|n| n.id == top.id));
    }

    #[test]
    fn test_stamp_same_identity_updates_in_place() {
        let mut scene = Scene::new();
        let first = scene.upsert_stamp("t1", 7, sprite(BuiltinShape::Square));
        let mut updated = sprite(BuiltinShape::Square);
        updated.position = Point::new(99.0, 0.0);
        let second = scene.upsert_stamp("t1", 7, updated);

        assert_eq!(first, second);
        assert_eq!(scene.len(), 1);
        match &scene.get(first).unwrap().element {
            SceneElement::Sprite(s) => assert_eq!(s.position, Point::new(99.0, 0.0)),
            other => panic!("expected sprite, got {other:?}"),
        }
    }

    #[test]
    fn test_stamp_shape_change_replaces_node() {
        let mut scene = Scene::new();
        let first = scene.upsert_stamp("t1", 7, sprite(BuiltinShape::Square));
        let second = scene.upsert_stamp("t1", 7, sprite(BuiltinShape::Circle));

        assert_ne!(first, second);
        assert_eq!(scene.len(), 1);
        assert!(scene.get(first).is_none());
        assert!(scene.get(second).is_some());
    }

    #[test]
    fn test_distinct_stamp_ids_coexist() {
        let mut scene = Scene::new();
        scene.upsert_stamp("t1", 1, sprite(BuiltinShape::Square));
        scene.upsert_stamp("t1", 2, sprite(BuiltinShape::Square));
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn test_clear_turtle_is_selective() {
        let mut scene = Scene::new();
        scene.insert_mark("t1", mark(Rgba::black()));
        scene.insert_mark("t2", mark(Rgba::white()));
        scene.upsert_stamp("t1", 1, sprite(BuiltinShape::Square));
        scene.set_live_sprite("t1", Some(sprite(BuiltinShape::Turtle)));

        scene.clear_turtle("t1");

        assert_eq!(scene.len(), 1);
        assert!(scene.nodes_ordered().all(|node| node.turtle == "t2"));
        // A fresh stamp with the old identity creates a new node cleanly.
        scene.upsert_stamp("t1", 1, sprite(BuiltinShape::Square));
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn test_live_sprite_is_singleton_per_turtle() {
        let mut scene = Scene::new();
        let first = scene.set_live_sprite("t1", Some(sprite(BuiltinShape::Turtle)));
        let second = scene.set_live_sprite("t1", Some(sprite(BuiltinShape::Turtle)));
        assert_eq!(first, second);
        assert_eq!(scene.len(), 1);

        scene.set_live_sprite("t1", None);
        assert!(scene.is_empty());
    }

    #[test]
    fn test_size_correction_on_removed_node_is_noop() {
        let mut scene = Scene::new();
        let id = scene.upsert_stamp("t1", 1, sprite(BuiltinShape::Square));
        scene.clear_turtle("t1");
        scene.apply_size_correction(
            id,
            SizeCorrection {
                width: 64.0,
                height: 64.0,
            },
        );
        assert!(scene.is_empty());
    }
}
