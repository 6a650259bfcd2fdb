use std::env;
use std::path::PathBuf;

use crate::errors::{KnowledgeError, KnowledgeResult};

pub const DEFAULT_RETENTION_DAYS: i64 = 365;
pub const DEFAULT_MAX_ENTRIES: usize = 10_000;

/// Settings of the long-term knowledge store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeConfig {
    /// JSON file backing the store
    pub storage_path: PathBuf,
    /// Entries older than this many days are evicted
    pub retention_days: i64,
    /// Oldest entries are evicted beyond this count
    pub max_entries: usize,
    /// Turns long-term memory off entirely
    pub enabled: bool,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            storage_path: default_storage_path(),
            retention_days: DEFAULT_RETENTION_DAYS,
            max_entries: DEFAULT_MAX_ENTRIES,
            enabled: true,
        }
    }
}

/// `~/.cline/knowledge_base.json`, relative to the working directory when
/// the home directory cannot be determined
pub fn default_storage_path() -> PathBuf {
    default_config_dir().join("knowledge_base.json")
}

/// Directory holding the agent's persistent files
pub fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".cline")
}

impl KnowledgeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Overrides defaults with `KNOWLEDGE_*` values; unparsable values are ignored
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        Self {
            storage_path: get("KNOWLEDGE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_path),
            retention_days: get("KNOWLEDGE_RETENTION_DAYS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.retention_days),
            max_entries: get("KNOWLEDGE_MAX_ENTRIES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_entries),
            enabled: get("KNOWLEDGE_ENABLED")
                .map(|v| {
                    let v = v.to_lowercase();
                    v != "false" && v != "0" && v != "no"
                })
                .unwrap_or(defaults.enabled),
        }
    }

    pub fn validate(&self) -> KnowledgeResult<()> {
        if self.storage_path.as_os_str().is_empty() {
            return Err(KnowledgeError::config(
                "storage_path",
                "the storage path cannot be empty",
            ));
        }
        if self.retention_days <= 0 {
            return Err(KnowledgeError::config(
                "retention_days",
                "the retention period must be greater than zero",
            ));
        }
        if self.max_entries == 0 {
            return Err(KnowledgeError::config(
                "max_entries",
                "the maximum number of entries must be greater than zero",
            ));
        }
        Ok(())
    }
}
