use chrono::{DateTime, TimeDelta, Utc};
use log::{debug, info};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::KnowledgeConfig;
use crate::entry::KnowledgeEntry;
use crate::errors::{KnowledgeError, KnowledgeResult};

/// Limits applied to the store on load and after every insertion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetentionPolicy {
    pub max_age_days: Option<i64>,
    pub max_entries: Option<usize>,
}

impl From<&KnowledgeConfig> for RetentionPolicy {
    fn from(config: &KnowledgeConfig) -> Self {
        Self {
            max_age_days: Some(config.retention_days),
            max_entries: Some(config.max_entries),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeStats {
    pub entries: usize,
    pub first: Option<DateTime<Utc>>,
    pub last: Option<DateTime<Utc>>,
}

/// Long-term knowledge base: an id → entry map mirrored to a JSON file.
///
/// All operations share one read/write lock. Every write is flushed to disk
/// before it returns, while the write lock is still held.
#[derive(Debug)]
pub struct KnowledgeBase {
    entries: RwLock<HashMap<String, KnowledgeEntry>>,
    file_path: PathBuf,
    retention: RetentionPolicy,
}

impl KnowledgeBase {
    /// Opens the store at `file_path` without any retention limits
    pub fn open(file_path: impl Into<PathBuf>) -> KnowledgeResult<Self> {
        Self::open_with_policy(file_path, RetentionPolicy::default())
    }

    /// Opens the store described by a validated configuration
    pub fn from_config(config: &KnowledgeConfig) -> KnowledgeResult<Self> {
        config.validate()?;
        Self::open_with_policy(&config.storage_path, RetentionPolicy::from(config))
    }

    pub fn open_with_policy(
        file_path: impl Into<PathBuf>,
        retention: RetentionPolicy,
    ) -> KnowledgeResult<Self> {
        let file_path = file_path.into();
        let mut entries = if file_path.exists() {
            load(&file_path)?
        } else {
            debug!(
                "No knowledge file at {}, starting empty",
                file_path.display()
            );
            HashMap::new()
        };

        let evicted = apply_retention(&mut entries, retention, Utc::now());
        info!(
            "Knowledge base loaded from {} ({} entries)",
            file_path.display(),
            entries.len()
        );

        let store = Self {
            entries: RwLock::new(entries),
            file_path,
            retention,
        };
        if evicted > 0 {
            store.save()?;
        }
        Ok(store)
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, KnowledgeEntry>> {
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, KnowledgeEntry>> {
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Creates an entry and persists the store before returning it
    pub fn add(
        &self,
        category: &str,
        key: &str,
        value: &str,
        metadata: Option<HashMap<String, String>>,
    ) -> KnowledgeResult<KnowledgeEntry> {
        let entry = KnowledgeEntry::new(category, key, value, metadata);
        self.insert(entry.clone())?;
        Ok(entry)
    }

    /// Inserts a pre-built entry, replacing any entry with the same id.
    ///
    /// The in-memory map only changes once the file has been written, so a
    /// failed flush leaves the store as it was.
    pub fn insert(&self, entry: KnowledgeEntry) -> KnowledgeResult<()> {
        let mut entries = self.write();
        debug!("Adding knowledge entry {} ({})", entry.id, entry.key);

        let mut next = entries.clone();
        next.insert(entry.id.clone(), entry);
        apply_retention(&mut next, self.retention, Utc::now());
        save(&self.file_path, &next)?;

        *entries = next;
        Ok(())
    }

    pub fn get_by_key(&self, key: &str) -> Vec<KnowledgeEntry> {
        self.collect(|entry| entry.key == key)
    }

    pub fn get_by_category(&self, category: &str) -> Vec<KnowledgeEntry> {
        self.collect(|entry| entry.category == category)
    }

    pub fn get_all(&self) -> Vec<KnowledgeEntry> {
        self.collect(|_| true)
    }

    /// Linear scan under the read lock, oldest entries first
    fn collect<F>(&self, predicate: F) -> Vec<KnowledgeEntry>
    where
        F: Fn(&KnowledgeEntry) -> bool,
    {
        let entries = self.read();
        let mut results: Vec<KnowledgeEntry> = entries
            .values()
            .filter(|entry| predicate(entry))
            .cloned()
            .collect();
        results.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));
        results
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn stats(&self) -> KnowledgeStats {
        let entries = self.read();
        KnowledgeStats {
            entries: entries.len(),
            first: entries.values().map(|e| e.timestamp).min(),
            last: entries.values().map(|e| e.timestamp).max(),
        }
    }

    /// Forces a flush of the whole store to disk
    pub fn save(&self) -> KnowledgeResult<()> {
        let entries = self.read();
        save(&self.file_path, &entries)
    }
}

fn load(path: &Path) -> KnowledgeResult<HashMap<String, KnowledgeEntry>> {
    let file = File::open(path).map_err(|e| KnowledgeError::io(path, e))?;
    let entries = serde_json::from_reader(BufReader::new(file))?;
    Ok(entries)
}

/// Writes to a sibling temp file then renames it over the target
fn save(path: &Path, entries: &HashMap<String, KnowledgeEntry>) -> KnowledgeResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| KnowledgeError::io(parent, e))?;
        }
    }

    let tmp_path = path.with_extension("json.tmp");
    let file = File::create(&tmp_path).map_err(|e| KnowledgeError::io(&tmp_path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, entries)?;
    writer
        .write_all(b"\n")
        .and_then(|_| writer.flush())
        .map_err(|e| KnowledgeError::io(&tmp_path, e))?;
    drop(writer);

    fs::rename(&tmp_path, path).map_err(|e| KnowledgeError::io(path, e))?;
    debug!("Saved {} knowledge entries to {}", entries.len(), path.display());
    Ok(())
}

/// Evicts expired entries, then the oldest ones beyond the count limit.
/// Returns the number of evicted entries.
fn apply_retention(
    entries: &mut HashMap<String, KnowledgeEntry>,
    policy: RetentionPolicy,
    now: DateTime<Utc>,
) -> usize {
    let before = entries.len();

    // a period reaching past the representable range evicts nothing
    let cutoff = policy
        .max_age_days
        .and_then(TimeDelta::try_days)
        .and_then(|age| now.checked_sub_signed(age));
    if let Some(cutoff) = cutoff {
        entries.retain(|_, entry| entry.timestamp >= cutoff);
    }

    if let Some(max) = policy.max_entries {
        if entries.len() > max {
            let mut by_age: Vec<(DateTime<Utc>, String)> = entries
                .values()
                .map(|e| (e.timestamp, e.id.clone()))
                .collect();
            by_age.sort();
            let excess = entries.len() - max;
            for (_, id) in by_age.into_iter().take(excess) {
                entries.remove(&id);
            }
        }
    }

    let evicted = before - entries.len();
    if evicted > 0 {
        info!("Evicted {} knowledge entries by retention policy", evicted);
    }
    evicted
}
