//! Session store adapters. Both implement KeyValueStore; `open_store` picks one
//! from the configured store URL.

pub mod memory_store;
pub mod sqlite_store;

pub use memory_store::MemoryStore;
pub use sqlite_store::SqliteStore;

use crate::domain::DomainError;
use crate::ports::KeyValueStore;
use std::path::PathBuf;
use std::sync::Arc;

/// Where the session store lives, as parsed from `STORE_URL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    Memory,
    Sqlite(PathBuf),
}

impl StoreLocation {
    /// Accepts `memory://`, `sqlite://<path>` and `file:<path>`.
    pub fn parse(url: &str) -> Result<Self, DomainError> {
        let url = url.trim();
        if url.eq_ignore_ascii_case("memory") || url.starts_with("memory://") {
            return Ok(StoreLocation::Memory);
        }
        let path = url
            .strip_prefix("sqlite://")
            .or_else(|| url.strip_prefix("file:"))
            .ok_or_else(|| {
                DomainError::Config(format!(
                    "unsupported store URL {:?} (use memory:// or sqlite://<path>)",
                    url
                ))
            })?;
        if path.is_empty() {
            return Err(DomainError::Config(format!(
                "store URL {:?} has no path",
                url
            )));
        }
        Ok(StoreLocation::Sqlite(PathBuf::from(path)))
    }
}

/// Build the store for `url` and check it answers.
pub async fn open_store(url: &str) -> Result<Arc<dyn KeyValueStore>, DomainError> {
    let store: Arc<dyn KeyValueStore> = match StoreLocation::parse(url)? {
        StoreLocation::Memory => Arc::new(MemoryStore::new()),
        StoreLocation::Sqlite(path) => Arc::new(SqliteStore::connect(path).await?),
    };
    store.ping().await?;
    Ok(store)
}
