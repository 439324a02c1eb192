//! File-based session store for native platforms.

use super::{BoxFuture, SessionError, SessionResult, SessionStore};
use crate::action::TurtleAction;
use std::fs;
use std::path::PathBuf;

/// Session store keeping one JSON file per canvas.
pub struct FileSessionStore {
    /// Base directory for session logs.
    base_path: PathBuf,
}

impl FileSessionStore {
    /// Create a new file store with the given base directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new(base_path: PathBuf) -> SessionResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                SessionError::Io(format!("Failed to create session directory: {}", e))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Create a file store in the default location.
    ///
    /// On Unix: `~/.local/share/inkturtle/sessions/`
    pub fn default_location() -> SessionResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| SessionError::Io("Could not determine home directory".to_string()))?;
        Self::new(base.join("inkturtle").join("sessions"))
    }

    /// Get the file path for a canvas id.
    fn log_path(&self, canvas: &str) -> PathBuf {
        // Sanitize the id to be safe for filenames
        let safe: String = canvas
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_path.join(format!("{}.json", safe))
    }

    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }

    fn read_log(&self, canvas: &str) -> SessionResult<Vec<TurtleAction>> {
        let path = self.log_path(canvas);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let json = fs::read_to_string(&path)
            .map_err(|e| SessionError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        serde_json::from_str(&json).map_err(|e| {
            SessionError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    fn write_log(&self, canvas: &str, log: &[TurtleAction]) -> SessionResult<()> {
        let path = self.log_path(canvas);
        let json = serde_json::to_string(log)
            .map_err(|e| SessionError::Serialization(e.to_string()))?;
        fs::write(&path, json)
            .map_err(|e| SessionError::Io(format!("Failed to write {}: {}", path.display(), e)))
    }
}

impl SessionStore for FileSessionStore {
    fn append(&self, canvas: &str, action: &TurtleAction) -> BoxFuture<'_, SessionResult<()>> {
        let canvas = canvas.to_string();
        let action = action.clone();
        Box::pin(async move {
            let mut log = self.read_log(&canvas)?;
            log.push(action);
            self.write_log(&canvas, &log)
        })
    }

    fn load(&self, canvas: &str) -> BoxFuture<'_, SessionResult<Vec<TurtleAction>>> {
        let canvas = canvas.to_string();
        Box::pin(async move { self.read_log(&canvas) })
    }

    fn remove_turtle(&self, canvas: &str, turtle: &str) -> BoxFuture<'_, SessionResult<()>> {
        let canvas = canvas.to_string();
        let turtle = turtle.to_string();
        Box::pin(async move {
            let mut log = self.read_log(&canvas)?;
            log.retain(|action| action.id != turtle);
            self.write_log(&canvas, &log)
        })
    }

    fn clear(&self, canvas: &str) -> BoxFuture<'_, SessionResult<()>> {
        let path = self.log_path(canvas);
        Box::pin(async move {
            if path.exists() {
                fs::remove_file(&path).map_err(|e| {
                    SessionError::Io(format!("Failed to delete {}: {}", path.display(), e))
                })?;
            }
            Ok(())
        })
    }

    fn exists(&self, canvas: &str) -> BoxFuture<'_, SessionResult<bool>> {
        let path = self.log_path(canvas);
        Box::pin(async move { Ok(path.exists()) })
    }
}

#[cfg(test)]
mod tests {
    use super::super::block_on;
    use super::*;
    use crate::action::ActionKind;
    use tempfile::tempdir;

    #[test]
    fn test_append_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().to_path_buf()).unwrap();

        let action = TurtleAction::new("t1", ActionKind::LineAbsolute)
            .at(10.0, 20.0)
            .with_pencolor("red");
        block_on(store.append("c1", &action)).unwrap();

        let log = block_on(store.load("c1")).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0], action);
    }

    #[test]
    fn test_missing_log_is_empty_not_error() {
        let dir = tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().to_path_buf()).unwrap();
        assert!(block_on(store.load("nope")).unwrap().is_empty());
    }

    #[test]
    fn test_remove_turtle_rewrites_file() {
        let dir = tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().to_path_buf()).unwrap();

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
    fn test_clear_and_exists() {
        let dir = tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().to_path_buf()).unwrap();

        block_on(store.append("c1", &TurtleAction::new("a", ActionKind::UpdateState))).unwrap();
        assert!(block_on(store.exists("c1")).unwrap());
        block_on(store.clear("c1")).unwrap();
        assert!(!block_on(store.exists("c1")).unwrap());
    }

    #[test]
    fn test_sanitizes_canvas_id() {
        let dir = tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().to_path_buf()).unwrap();

        let action = TurtleAction::new("t1", ActionKind::UpdateState);
        block_on(store.append("canvas/with:odd*chars", &action)).unwrap();
        let log = block_on(store.load("canvas/with:odd*chars")).unwrap();
        assert_eq!(log.len(), 1);
    }
}
