use std::path::PathBuf;

use crate::repository::FuturePolicy;
use crate::storage::{JsonFileStore, MemoryStore, TaskStore};

pub const DB_ENV: &str = "PLANPASS_DB";
pub const LOG_ENV: &str = "PLANPASS_LOG";
pub const POLICY_ENV: &str = "PLANPASS_FUTURE_POLICY";

/// Runtime settings, read from the environment and then overridden by flags.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// JSON database file. `None` keeps tasks in memory only.
    pub db_path: Option<PathBuf>,
    pub future_policy: FuturePolicy,
}

impl Config {
    pub fn from_env() -> Config {
        let db_path = std::env::var(DB_ENV)
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        let future_policy = match std::env::var(POLICY_ENV) {
            Ok(v) => v.parse().unwrap_or_else(|e: String| {
                tracing::warn!("{}: {}, using default", POLICY_ENV, e);
                FuturePolicy::default()
            }),
            Err(_) => FuturePolicy::default(),
        };
        Config {
            db_path,
            future_policy,
        }
    }

    /// Applies command-line overrides on top of the environment.
    pub fn with_overrides(
        mut self,
        db: Option<PathBuf>,
        memory: bool,
        future_policy: Option<FuturePolicy>,
    ) -> Config {
        if let Some(path) = db {
            self.db_path = Some(path);
        }
        if memory {
            self.db_path = None;
        }
        if let Some(policy) = future_policy {
            self.future_policy = policy;
        }
        self
    }

    pub fn store(&self) -> Box<dyn TaskStore> {
        match &self.db_path {
            Some(path) => Box::new(JsonFileStore::new(path.clone())),
            None => Box::new(MemoryStore),
        }
    }
}

/// `~/.local/share/planpass` on Linux, `./planpass` if there is no data dir.
pub fn data_dir() -> PathBuf {
    let mut p = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    p.push("planpass");
    p
}

/// Default location for `--db` when persistence is requested without a path.
pub fn default_db_path() -> PathBuf {
    let mut p = data_dir();
    p.push("tasks.json");
    p
}
