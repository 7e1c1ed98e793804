use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{StoreError, StoreKey, TokenStore};

/// Config for the on-disk session store.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema, PartialEq, Eq)]
pub struct FileStoreConfig {
    pub path: PathBuf,
}

/// Persists the session entries as a flat JSON object, e.g.
/// `{"accessToken": "...", "refreshToken": "...", "currentUser": "{...}"}`.
///
/// Every write replaces the whole file through a rename, so a crash leaves
/// either the old or the new contents.
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

type Entries = BTreeMap<String, String>;

impl FileStore {
    pub fn new(config: &FileStoreConfig) -> Result<Self, StoreError> {
        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
        Ok(FileStore {
            path: config.path.clone(),
            lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Entries, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Entries::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if raw.trim().is_empty() {
            return Ok(Entries::new());
        }
        serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn write(&self, entries: &Entries) -> Result<(), StoreError> {
        let serialized = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serialized).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!("Wrote {} session entries to {}", entries.len(), self.path.display());
        Ok(())
    }

    /// Read-modify-write under the lock. A corrupt file is replaced rather
    /// than blocking every later login or logout.
    fn update(&self, apply: impl FnOnce(&mut Entries)) -> Result<(), StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = match self.read() {
            Ok(entries) => entries,
            Err(e @ StoreError::Corrupt { .. }) => {
                warn!("Discarding unreadable session entries: {}", e);
                Entries::new()
            }
            Err(e) => return Err(e),
        };
        apply(&mut entries);
        self.write(&entries)
    }
}

impl TokenStore for FileStore {
    fn get(&self, key: StoreKey) -> Result<Option<String>, StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.read()?.remove(key.as_str()))
    }

    fn set(&self, key: StoreKey, value: &str) -> Result<(), StoreError> {
        self.update(|entries| {
            entries.insert(key.as_str().to_string(), value.to_string());
        })
    }

    fn remove(&self, key: StoreKey) -> Result<(), StoreError> {
        self.update(|entries| {
            entries.remove(key.as_str());
        })
    }

    fn set_all(&self, new_entries: &[(StoreKey, String)]) -> Result<(), StoreError> {
        self.update(|entries| {
            for (key, value) in new_entries {
                entries.insert(key.as_str().to_string(), value.clone());
            }
        })
    }

    fn remove_all(&self, keys: &[StoreKey]) -> Result<(), StoreError> {
        self.update(|entries| {
            for key in keys {
                entries.remove(key.as_str());
            }
        })
    }

    fn get_name(&self) -> &str {
        "file"
    }
}
