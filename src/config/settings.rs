//! JSON settings store for the dashboard.
//!
//! Settings form a two-level tree: a section (`general`, `system`, `devices`,
//! `versions`) holding flat `key -> value` pairs of JSON primitives. The tree is
//! read once when the service is opened and the whole file is rewritten on
//! every [`ConfigService::set`].
//!
//! All access goes through one re-entrant lock with a bounded wait. A missing
//! or damaged file is never an error: the default tree is used instead.

use crate::errors::{Error, Result};
use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// `section -> key -> value`
pub type SettingsTree = BTreeMap<String, BTreeMap<String, Value>>;

/// How long callers wait for the settings lock before giving up
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// The tree used when no usable settings file exists.
#[must_use]
pub fn default_settings() -> SettingsTree {
    let section = |pairs: &[(&str, Value)]| {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect::<BTreeMap<_, _>>()
    };

    BTreeMap::from([
        (
            "general".to_string(),
            section(&[("location_name", json!("")), ("monitor_program_path", json!(""))]),
        ),
        (
            "system".to_string(),
            section(&[
                ("enable_restart", json!(false)),
                ("minutes_to_restart", json!("")),
                ("startup_snooze_time", json!("")),
            ]),
        ),
        (
            "devices".to_string(),
            section(&[
                ("relay_fail_threshold", json!("")),
                ("camera_fail_threshold", json!("")),
                ("camera_log_minutes", json!("")),
            ]),
        ),
    ])
}

/// Settings store backed by a single JSON file.
///
/// Create one per process and share it (`Arc<ConfigService>`) with every
/// consumer; it is `Sync` and safe to call from several threads.
pub struct ConfigService {
    path: PathBuf,
    lock_timeout: Duration,
    tree: ReentrantMutex<RefCell<SettingsTree>>,
}

impl std::fmt::Debug for ConfigService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigService")
            .field("path", &self.path)
            .field("lock_timeout", &self.lock_timeout)
            .finish_non_exhaustive()
    }
}

impl ConfigService {
    /// Loads the settings file at `path`, falling back to the default tree.
    #[instrument]
    pub fn open<P: AsRef<Path> + std::fmt::Debug>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let tree = load_tree(&path);
        Self {
            path,
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
            tree: ReentrantMutex::new(RefCell::new(tree)),
        }
    }

    /// Replaces the lock timeout (5 seconds unless changed).
    #[must_use]
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    /// The file this service reads and writes.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn acquire(&self) -> Result<ReentrantMutexGuard<'_, RefCell<SettingsTree>>> {
        self.tree
            .try_lock_for(self.lock_timeout)
            .ok_or(Error::LockTimeout {
                timeout: self.lock_timeout,
            })
    }

    /// Returns the raw stored value, if any.
    pub fn get_value(&self, section: &str, key: &str) -> Result<Option<Value>> {
        let guard = self.acquire()?;
        let tree = guard.borrow();
        Ok(tree.get(section).and_then(|s| s.get(key)).cloned())
    }

    /// Returns the stored value, or `default` when the section or key is
    /// absent or the stored value is not a `T`.
    ///
    /// Fails only when the lock cannot be acquired in time.
    pub fn get<T: DeserializeOwned>(&self, section: &str, key: &str, default: T) -> Result<T> {
        let Some(value) = self.get_value(section, key)? else {
            return Ok(default);
        };
        Ok(serde_json::from_value(value).unwrap_or_else(|e| {
            debug!("Setting {}.{} has an unexpected type ({}), using default", section, key, e);
            default
        }))
    }

    /// Stores `value` under `section.key` and rewrites the settings file.
    #[instrument(skip(self, value))]
    pub fn set<V: Into<Value>>(&self, section: &str, key: &str, value: V) -> Result<()> {
        let value = value.into();
        let guard = self.acquire()?;
        let previous = {
            let mut tree = guard.borrow_mut();
            tree.entry(section.to_string())
                .or_default()
                .insert(key.to_string(), value.clone())
        };
        let previous = previous.unwrap_or(Value::Null);
        info!(
            target: "config.changes",
            "{}.{}: {} -> {}",
            section,
            key,
            previous,
            value
        );
        self.save()
    }

    /// A copy of the whole settings tree.
    pub fn all(&self) -> Result<SettingsTree> {
        let guard = self.acquire()?;
        let tree = guard.borrow().clone();
        Ok(tree)
    }

    /// Writes the in-memory tree to the settings file.
    pub fn save(&self) -> Result<()> {
        let guard = self.acquire()?;
        let contents = serde_json::to_string_pretty(&*guard.borrow())?;
        crate::config::database::ensure_parent_dir(&self.path)?;
        std::fs::write(&self.path, contents).inspect_err(|e| {
            error!("Failed to write settings file {:?}: {}", self.path, e);
        })?;
        debug!("Settings written to {:?}", self.path);
        Ok(())
    }
}

fn load_tree(path: &Path) -> SettingsTree {
    if !path.exists() {
        info!("Settings file {:?} not found, using defaults", path);
        return default_settings();
    }

    let parsed = std::fs::read_to_string(path)
        .map_err(Error::from)
        .and_then(|contents| {
            serde_json::from_str::<serde_json::Map<String, Value>>(&contents).map_err(Error::from)
        });

    match parsed {
        Ok(document) => {
            let tree = sections_from_document(document, path);
            debug!("Loaded {} settings sections from {:?}", tree.len(), path);
            tree
        }
        Err(e) => {
            // The next `set` rewrites the file with these defaults.
            warn!("Could not load settings file {:?}, using defaults: {}", path, e);
            default_settings()
        }
    }
}

/// Keeps every well-formed section. A section that is not an object is
/// replaced by its default, or dropped when it has none.
fn sections_from_document(document: serde_json::Map<String, Value>, path: &Path) -> SettingsTree {
    let mut defaults = default_settings();
    let mut tree = SettingsTree::new();

    for (section, value) in document {
        match value {
            Value::Object(entries) => {
                tree.insert(section, entries.into_iter().collect());
            }
            other => {
                warn!(
                    "Settings section '{}' in {:?} is not an object ({}), using its defaults",
                    section, path, other
                );
                if let Some(fallback) = defaults.remove(&section) {
                    tree.insert(section, fallback);
                }
            }
        }
    }
    tree
}
