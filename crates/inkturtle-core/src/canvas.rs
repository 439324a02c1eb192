//! Canvas session: one interpreter, one scene, one persisted log.
//!
//! The session ties the pieces together for a host frontend: it mounts a
//! canvas by replaying its stored log, applies live batches atomically,
//! and keeps the log in sync (appending persistable actions, pruning on
//! CLEAR).

use crate::action::TurtleAction;
use crate::audio::AudioChannel;
use crate::interpreter::{CanvasConfig, Interpreter};
use crate::resource::{ResourceEntry, ResourceMap};
use crate::scene::{NodeId, Scene};
use crate::session::{SessionResult, SessionStore};
use inkturtle_render::SizeCorrection;

/// A mounted canvas with live interpreter state.
pub struct CanvasSession {
    interpreter: Interpreter,
    scene: Scene,
    resources: ResourceMap,
    audio: AudioChannel,
    store: Box<dyn SessionStore>,
    /// Most recent sync key seen in an applied batch.
    last_key: Option<String>,
}

impl CanvasSession {
    pub fn new(config: CanvasConfig, store: Box<dyn SessionStore>, audio: AudioChannel) -> Self {
        Self {
            interpreter: Interpreter::new(config),
            scene: Scene::new(),
            resources: ResourceMap::new(),
            audio,
            store,
            last_key: None,
        }
    }

    pub fn config(&self) -> &CanvasConfig {
        self.interpreter.config()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    pub fn audio_mut(&mut self) -> &mut AudioChannel {
        &mut self.audio
    }

    /// Register or replace a named resource.
    pub fn put_resource(&mut self, entry: ResourceEntry) {
        self.resources.insert(entry.name.clone(), entry);
    }

    /// Replace the whole resource map, as on a host resync.
    pub fn set_resources(&mut self, resources: ResourceMap) {
        self.resources = resources;
    }

    /// Most recent sync key from an applied batch, consumed on read.
    pub fn take_key(&mut self) -> Option<String> {
        self.last_key.take()
    }

    /// Rebuild the scene from the persisted log.
    ///
    /// Replay is silent: sounds do not re-fire and nothing is re-appended
    /// to the log. The resulting scene is identical to the one the log's
    /// actions produced when first applied.
    pub async fn mount(&mut self) -> SessionResult<()> {
        let log = self.store.load(&self.interpreter.config().id).await?;
        log::info!(
            "mounting canvas {} from {} logged actions",
            self.interpreter.config().id,
            log.len()
        );
        for action in &log {
            let applied =
                self.interpreter
                    .apply(action, &mut self.scene, &self.resources, &mut self.audio, true);
            if let Some((node, correction)) = applied.size_correction {
                self.scene.apply_size_correction(node, correction);
            }
        }
        Ok(())
    }

    /// Apply one batch of actions in order.
    ///
    /// Persistable actions are appended to the log as they apply; a CLEAR
    /// prunes its turtle's history instead. Size corrections for embedded
    /// raster sprites are applied in the same pass. Corrections for
    /// remote images stay with the host, which fetches the bytes and
    /// calls [`CanvasSession::correct_sprite_size`].
    pub async fn apply_batch(&mut self, actions: &[TurtleAction]) -> SessionResult<()> {
        let canvas = self.interpreter.config().id.clone();
        for action in actions {
            let applied =
                self.interpreter
                    .apply(action, &mut self.scene, &self.resources, &mut self.audio, false);
            if applied.persist {
                self.store.append(&canvas, action).await?;
            }
            if let Some(turtle) = &applied.cleared {
                self.store.remove_turtle(&canvas, turtle).await?;
            }
            if let Some((node, correction)) = applied.size_correction {
                self.scene.apply_size_correction(node, correction);
            }
            if let Some(key) = &action.key {
                self.last_key = Some(key.clone());
            }
        }
        Ok(())
    }

    /// Apply a host-computed natural size to a sprite node.
    pub fn correct_sprite_size(&mut self, node: NodeId, correction: SizeCorrection) {
        self.scene.apply_size_correction(node, correction);
    }

    /// Delete this canvas's stored log without touching the live scene.
    pub async fn forget_history(&mut self) -> SessionResult<()> {
        self.store.clear(&self.interpreter.config().id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionKind, FontSpec, TextAlign};
    use crate::audio::test_sink::RecordingSink;
    use crate::scene::SceneElement;
    use crate::session::{block_on, MemorySessionStore};
    use std::sync::Arc;

    fn session(store: Arc<MemorySessionStore>) -> CanvasSession {
        CanvasSession::new(
            CanvasConfig::new("c1"),
            Box::new(store),
            AudioChannel::muted(),
        )
    }

    fn elements(scene: &Scene) -> Vec<SceneElement> {
        scene.nodes_ordered().map(|n| n.element.clone()).collect()
    }

    fn drawing_batch() -> Vec<TurtleAction> {
        vec![
            TurtleAction::new("t1", ActionKind::MoveAbsolute).at(0.0, 0.0),
            TurtleAction::new("t1", ActionKind::BeginFill).with_color("orange"),
            TurtleAction::new("t1", ActionKind::LineAbsolute)
                .at(100.0, 0.0)
                .with_pencolor("blue"),
            TurtleAction::new("t1", ActionKind::LineAbsolute)
                .at(100.0, 100.0)
                .with_pencolor("blue"),
            TurtleAction::new("t1", ActionKind::EndFill),
            TurtleAction {
                radius: 3.0,
                ..TurtleAction::new("t1", ActionKind::DrawDot).at(50.0, 50.0)
            },
            TurtleAction::new("t1", ActionKind::WriteText)
                .at(10.0, 120.0)
                .with_text("done", FontSpec::default(), TextAlign::Left),
            TurtleAction::new("t1", ActionKind::Done)
                .at(100.0, 100.0)
                .with_shape("turtle"),
        ]
    }

    #[test]
    fn test_remount_reproduces_scene_exactly() {
        let store = Arc::new(MemorySessionStore::new());
        let mut live = session(store.clone());
        block_on(live.apply_batch(&drawing_batch())).unwrap();

        let mut replayed = session(store);
        block_on(replayed.mount()).unwrap();

        // Same elements in the same z-order, attribute for attribute.
        assert_eq!(elements(replayed.scene()), elements(live.scene()));
        assert_eq!(
            replayed.interpreter().position_of("t1"),
            live.interpreter().position_of("t1")
        );
    }

    #[test]
    fn test_clear_prunes_only_that_turtle_from_history() {
        let store = Arc::new(MemorySessionStore::new());
        let mut live = session(store.clone());
        block_on(live.apply_batch(&[
            TurtleAction::new("t1", ActionKind::LineAbsolute).at(10.0, 0.0),
            TurtleAction::new("t2", ActionKind::LineAbsolute).at(20.0, 0.0),
            TurtleAction::new("t1", ActionKind::Clear),
        ]))
        .unwrap();

        let mut replayed = session(store);
        block_on(replayed.mount()).unwrap();

        let owners: Vec<&str> = replayed
            .scene()
            .nodes_ordered()
            .map(|n| n.turtle.as_str())
            .collect();
        assert_eq!(owners, vec!["t2"]);
    }

    #[test]
    fn test_sound_never_persists_or_replays() {
        let store = Arc::new(MemorySessionStore::new());
        let mut live = session(store.clone());
        block_on(live.apply_batch(&[TurtleAction::new("t1", ActionKind::Sound)
            .with_media("https://x.test/clip.mp3")]))
        .unwrap();

        let (sink, events) = RecordingSink::new();
        let mut replayed = CanvasSession::new(
            CanvasConfig::new("c1"),
            Box::new(store),
            AudioChannel::new(Box::new(sink)),
        );
        block_on(replayed.mount()).unwrap();

        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_batch_key_is_consumed_once() {
        let store = Arc::new(MemorySessionStore::new());
        let mut live = session(store);
        let mut action = TurtleAction::new("t1", ActionKind::UpdateState);
        action.key = Some("batch-7".to_string());
        block_on(live.apply_batch(&[action])).unwrap();

        assert_eq!(live.take_key().as_deref(), Some("batch-7"));
        assert_eq!(live.take_key(), None);
    }

    #[test]
    fn test_forget_history_leaves_scene_intact() {
        let store = Arc::new(MemorySessionStore::new());
        let mut live = session(store.clone());
        block_on(live.apply_batch(&drawing_batch())).unwrap();
        let before = live.scene().len();

        block_on(live.forget_history()).unwrap();
        assert_eq!(live.scene().len(), before);

        let mut replayed = session(store);
        block_on(replayed.mount()).unwrap();
        assert!(replayed.scene().is_empty());
    }
}
