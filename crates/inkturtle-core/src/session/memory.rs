//! In-memory session store for tests and ephemeral canvases.

use super::{BoxFuture, SessionResult, SessionStore};
use crate::action::TurtleAction;
use std::collections::HashMap;
use std::sync::RwLock;

/// Session store backed by a process-local map.
#[derive(Default)]
pub struct MemorySessionStore {
    logs: RwLock<HashMap<String, Vec<TurtleAction>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn append(&self, canvas: &str, action: &TurtleAction) -> BoxFuture<'_, SessionResult<()>> {
        let canvas = canvas.to_string();
        let action = action.clone();
        Box::pin(async move {
            let mut logs = self.logs.write().unwrap();
            logs.entry(canvas).or_default().push(action);
            Ok(())
        })
    }

    fn load(&self, canvas: &str) -> BoxFuture<'_, SessionResult<Vec<TurtleAction>>> {
        let canvas = canvas.to_string();
        Box::pin(async move {
            let logs = self.logs.read().unwrap();
            Ok(logs.get(&canvas).cloned().unwrap_or_default())
        })
    }

    fn remove_turtle(&self, canvas: &str, turtle: &str) -> BoxFuture<'_, SessionResult<()>> {
        let canvas = canvas.to_string();
        let turtle = turtle.to_string();
        Box::pin(async move {
            let mut logs = self.logs.write().unwrap();
            if let Some(log) = logs.get_mut(&canvas) {
                log.retain(|action| action.id != turtle);
            }
            Ok(())
        })
    }

    fn clear(&self, canvas: &str) -> BoxFuture<'_, SessionResult<()>> {
        let canvas = canvas.to_string();
        Box::pin(async move {
            self.logs.write().unwrap().remove(&canvas);
            Ok(())
        })
    }

    fn exists(&self, canvas: &str) -> BoxFuture<'_, SessionResult<bool>> {
        let canvas = canvas.to_string();
        Box::pin(async move { Ok(self.logs.read().unwrap().contains_key(&canvas)) })
    }
}

#[cfg(test)]
mod tests {
    use super::super::block_on;
    use super::*;
    use crate::action::ActionKind;

    #[test]
    fn test_append_and_load_preserve_order() {
        let store = MemorySessionStore::new();
        for x in [1.0, 2.0, 3.0] {
            let action = TurtleAction::new("t1", ActionKind::LineAbsolute).at(x, 0.0);
            block_on(store.append("c1", &action)).unwrap();
        }

        let log = block_on(store.load("c1")).unwrap();
        let xs: Vec<f64> = log.iter().filter_map(|a| a.point()).map(|p| p.x).collect();
        assert_eq!(xs, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_unknown_canvas_loads_empty() {
        let store = MemorySessionStore::new();
        assert!(block_on(store.load("nope")).unwrap().is_empty());
        assert!(!block_on(store.exists("nope")).unwrap());
    }

    #[test]
    fn test_remove_turtle_keeps_other_turtles() {
        let store = MemorySessionStore::new();
        block_on(store.append("c1", &TurtleAction::new("a", ActionKind::LineAbsolute).at(1.0, 0.0)))
            .unwrap();
        block_on(store.append("c1", &TurtleAction::new("b", ActionKind::LineAbsolute).at(2.0, 0.0)))
            .unwrap();
        block_on(store.remove_turtle("c1", "a")).unwrap();

        let log = block_on(store.load("c1")).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].id, "b");
    }

    #[test]
    fn test_clear_deletes_log() {
        let store = MemorySessionStore::new();
        block_on(store.append("c1", &TurtleAction::new("a", ActionKind::UpdateState))).unwrap();
        assert!(block_on(store.exists("c1")).unwrap());
        block_on(store.clear("c1")).unwrap();
        assert!(!block_on(store.exists("c1")).unwrap());
    }
}
