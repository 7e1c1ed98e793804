pub mod base;
pub mod file_store;
pub mod memory_store;

// Re-export the primary Store items so code outside can do
// "use crate::store::{TokenStore, create_store};"
pub use base::{create_store, StoreError, StoreKey, TokenStore};
pub use file_store::{FileStore, FileStoreConfig};
pub use memory_store::MemoryStore;
