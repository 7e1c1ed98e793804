use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use super::{file_store::FileStore, memory_store::MemoryStore};
use crate::config::StoreConfig;

/// The three entries that make up a persisted session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StoreKey {
    AccessToken,
    RefreshToken,
    CurrentUser,
}

impl StoreKey {
    pub const ALL: [StoreKey; 3] = [
        StoreKey::AccessToken,
        StoreKey::RefreshToken,
        StoreKey::CurrentUser,
    ];

    /// The name the entry is persisted under.
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::AccessToken => "accessToken",
            StoreKey::RefreshToken => "refreshToken",
            StoreKey::CurrentUser => "currentUser",
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("corrupt session file {}: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode session entry: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Synchronous key-value storage for the session entries.
///
/// Pure storage: no expiry logic lives here. Callers that need the
/// "all three or none" invariant go through `set_all` / `remove_all`.
pub trait TokenStore: Send + Sync {
    fn get(&self, key: StoreKey) -> Result<Option<String>, StoreError>;
    fn set(&self, key: StoreKey, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: StoreKey) -> Result<(), StoreError>;

    /// Writes several entries. Backends that persist should override this
    /// to write them in one step.
    fn set_all(&self, entries: &[(StoreKey, String)]) -> Result<(), StoreError> {
        for (key, value) in entries {
            self.set(*key, value)?;
        }
        Ok(())
    }

    fn remove_all(&self, keys: &[StoreKey]) -> Result<(), StoreError> {
        for key in keys {
            self.remove(*key)?;
        }
        Ok(())
    }

    fn get_name(&self) -> &str;
}

/// Creates the configured store backend.
pub fn create_store(config: &StoreConfig) -> Result<Arc<dyn TokenStore>, StoreError> {
    match config {
        StoreConfig::File(file_config) => {
            let store = FileStore::new(file_config)?;
            info!("Using file session store at {}", file_config.path.display());
            Ok(Arc::new(store))
        }
        StoreConfig::Memory => {
            info!("Using in-memory session store; sessions will not survive restarts.");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::file_store::FileStoreConfig;

    #[test]
    fn test_key_names_match_persisted_layout() {
        let names: Vec<&str> = StoreKey::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(names, vec!["accessToken", "refreshToken", "currentUser"]);
    }

    #[test]
    fn test_create_store_picks_backend() {
        let memory = create_store(&StoreConfig::Memory).unwrap();
        assert_eq!(memory.get_name(), "memory");

        let dir = tempfile::tempdir().unwrap();
        let file = create_store(&StoreConfig::File(FileStoreConfig {
            path: dir.path().join("session.json"),
        }))
        .unwrap();
        assert_eq!(file.get_name(), "file");
    }
}
