use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use super::{StoreError, StoreKey, TokenStore};

/// Process-local store. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<StoreKey, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }
}

impl TokenStore for MemoryStore {
    fn get(&self, key: StoreKey) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(&key).cloned())
    }

    fn set(&self, key: StoreKey, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key, value.to_string());
        Ok(())
    }

    fn remove(&self, key: StoreKey) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(&key);
        Ok(())
    }

    fn set_all(&self, new_entries: &[(StoreKey, String)]) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        for (key, value) in new_entries {
            entries.insert(*key, value.clone());
        }
        Ok(())
    }

    fn remove_all(&self, keys: &[StoreKey]) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        for key in keys {
            entries.remove(key);
        }
        Ok(())
    }

    fn get_name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_memory_store_set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get(StoreKey::AccessToken).unwrap(), None);

        store.set(StoreKey::AccessToken, "abc").unwrap();
        assert_eq!(
            store.get(StoreKey::AccessToken).unwrap(),
            Some("abc".to_string())
        );

        store.remove(StoreKey::AccessToken).unwrap();
        assert_eq!(store.get(StoreKey::AccessToken).unwrap(), None);
    }

    #[test]
    fn test_memory_store_batch_operations() {
        let store = MemoryStore::new();
        store
            .set_all(&[
                (StoreKey::AccessToken, "a".to_string()),
                (StoreKey::RefreshToken, "r".to_string()),
            ])
            .unwrap();
        assert_eq!(store.get(StoreKey::RefreshToken).unwrap(), Some("r".into()));

        store.remove_all(&StoreKey::ALL).unwrap();
        for key in StoreKey::ALL {
            assert_eq!(store.get(key).unwrap(), None);
        }
    }

    /// Readers never observe a half-written pair.
    #[test]
    fn test_memory_store_batch_writes_are_atomic_for_readers() {
        let store = Arc::new(MemoryStore::new());
        let writer = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..2000 {
                    store
                        .set_all(&[
                            (StoreKey::AccessToken, format!("access-{}", i)),
                            (StoreKey::RefreshToken, format!("refresh-{}", i)),
                        ])
                        .unwrap();
                    if i % 7 == 0 {
                        store.remove_all(&StoreKey::ALL).unwrap();
                    }
                }
            })
        };

        for _ in 0..2000 {
            let entries = store.entries.lock().unwrap();
            let access = entries.get(&StoreKey::AccessToken).cloned();
            let refresh = entries.get(&StoreKey::RefreshToken).cloned();
            drop(entries);
            match (access, refresh) {
                (Some(a), Some(r)) => {
                    assert_eq!(a.trim_start_matches("access-"), r.trim_start_matches("refresh-"))
                }
                (None, None) => {}
                other => panic!("torn pair: {:?}", other),
            }
        }
        writer.join().unwrap();
    }
}
