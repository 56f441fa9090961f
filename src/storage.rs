use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::Task;

/// Backend the planner flushes its tasks to.
pub trait TaskStore {
    /// Returns the stored tasks, or `None` when nothing has been stored yet.
    fn load(&self) -> Result<Option<Vec<Task>>>;

    /// Replaces the stored tasks.
    fn save(&mut self, tasks: &[Task]) -> Result<()>;

    /// Whether saved tasks survive a restart.
    fn is_persistent(&self) -> bool {
        true
    }
}

/// Keeps nothing: state lives as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStore;

impl TaskStore for MemoryStore {
    fn load(&self) -> Result<Option<Vec<Task>>> {
        Ok(None)
    }

    fn save(&mut self, _tasks: &[Task]) -> Result<()> {
        Ok(())
    }

    fn is_persistent(&self) -> bool {
        false
    }
}

/// Stores tasks as pretty-printed JSON in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> JsonFileStore {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TaskStore for JsonFileStore {
    fn load(&self) -> Result<Option<Vec<Task>>> {
        let mut f = match OpenOptions::new().read(true).open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let mut s = String::new();
        f.read_to_string(&mut s)?;
        let tasks: Vec<Task> = serde_json::from_str(&s)?;
        tracing::debug!(path = %self.path.display(), count = tasks.len(), "loaded tasks");
        Ok(Some(tasks))
    }

    fn save(&mut self, tasks: &[Task]) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }
        let s = serde_json::to_string_pretty(tasks)?;
        let mut f = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        f.write_all(s.as_bytes())?;
        tracing::debug!(path = %self.path.display(), count = tasks.len(), "saved tasks");
        Ok(())
    }
}
