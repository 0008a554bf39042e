//! Persistent credential store.
//!
//! A flat key → string mapping kept as a JSON object at
//! `~/.escrow/config.json`. The file is read fully on every access and
//! rewritten fully on every mutation; no handle is held between calls.
//! Concurrent writers race at the file level (last writer wins).

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::Value;
use thiserror::Error;

/// Environment variable that relocates the store directory.
pub const CONFIG_DIR_ENV_VAR: &str = "ESCROW_CONFIG_DIR";

const CONFIG_DIR_NAME: &str = ".escrow";
const CONFIG_FILE_NAME: &str = "config.json";

/// Errors raised while reading or writing the credential store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not determine the home directory (HOME is not set)")]
    NoHomeDirectory,

    #[error("failed to read configuration at '{path}': {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("configuration at '{path}' is not a JSON object: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to write configuration at '{path}': {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// Key/value persistence consumed by the config resolver and the
/// `config` subcommands.
pub trait CredentialStore {
    /// Value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Insert or replace `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key`. Returns whether it existed.
    fn unset(&self, key: &str) -> Result<bool, StoreError>;

    /// All entries, ordered by key.
    fn list(&self) -> Result<Vec<(String, String)>, StoreError>;
}

/// Renders a stored JSON value the way the CLI shows it. `null` is absent.
fn render(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// The on-disk store.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store rooted at an explicit directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store at `$ESCROW_CONFIG_DIR`, or `$HOME/.escrow` when unset.
    pub fn from_env() -> Result<Self, StoreError> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV_VAR) {
            if !dir.trim().is_empty() {
                return Ok(Self::new(dir));
            }
        }
        let home = std::env::var("HOME").map_err(|_| StoreError::NoHomeDirectory)?;
        Ok(Self::new(PathBuf::from(home).join(CONFIG_DIR_NAME)))
    }

    /// Directory holding the config file.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of `config.json`.
    pub fn path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE_NAME)
    }

    fn load(&self) -> Result<BTreeMap<String, Value>, StoreError> {
        let path = self.path();
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => return Err(StoreError::Read { path, source }),
        };
        serde_json::from_str(&raw).map_err(|source| StoreError::Parse { path, source })
    }

    fn save(&self, entries: &BTreeMap<String, Value>) -> Result<(), StoreError> {
        let path = self.path();
        let write_err = |source| StoreError::Write {
            path: path.clone(),
            source,
        };

        if !self.dir.exists() {
            create_private_dir(&self.dir).map_err(write_err)?;
        }
        let content = serde_json::to_string_pretty(entries).map_err(|e| write_err(e.into()))?;
        write_private_file(&path, content.as_bytes()).map_err(write_err)?;

        tracing::debug!(path = %path.display(), entries = entries.len(), "Configuration saved");
        Ok(())
    }
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}

#[cfg(unix)]
fn write_private_file(path: &Path, content: &[u8]) -> io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // `mode` only applies on creation; tighten files that already existed.
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    file.write_all(content)
}

#[cfg(not(unix))]
fn write_private_file(path: &Path, content: &[u8]) -> io::Result<()> {
    fs::write(path, content)
}

impl CredentialStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.load()?.get(key).and_then(render))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), Value::String(value.to_string()));
        self.save(&entries)
    }

    fn unset(&self, key: &str) -> Result<bool, StoreError> {
        let mut entries = self.load()?;
        if entries.remove(key).is_none() {
            return Ok(false);
        }
        self.save(&entries)?;
        Ok(true)
    }

    fn list(&self) -> Result<Vec<(String, String)>, StoreError> {
        Ok(self
            .load()?
            .iter()
            .filter_map(|(k, v)| render(v).map(|v| (k.clone(), v)))
            .collect())
    }
}

/// In-memory store for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            entries: Mutex::new(map),
        }
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        // A poisoned map is still a valid map.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn unset(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.entries().remove(key).is_some())
    }

    fn list(&self) -> Result<Vec<(String, String)>, StoreError> {
        Ok(self
            .entries()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}
