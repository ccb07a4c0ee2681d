use std::sync::Arc;

pub mod config;
pub mod db;
pub mod key;
pub mod profile;

use config::StoreConfig;
use db::Database;
use key::Key;

/// Shared handle to the byte-blob database backing the profile store.
#[derive(Clone)]
pub struct Store {
    db: Arc<dyn Database>,
}

impl Store {
    pub fn open<T: Database>(config: &StoreConfig) -> eyre::Result<Self> {
        let db = T::open(config)?;

        Ok(Self::new(db))
    }

    pub fn new<T: Database>(db: T) -> Self {
        Self { db: Arc::new(db) }
    }

    pub fn has(&self, key: Key) -> eyre::Result<bool> {
        self.db.has(key.as_bytes())
    }

    pub fn get(&self, key: Key) -> eyre::Result<Option<Vec<u8>>> {
        self.db.get(key.as_bytes())
    }

    pub fn put(&self, key: Key, value: &[u8]) -> eyre::Result<()> {
        self.db.put(key.as_bytes(), value)
    }

    pub fn delete(&self, key: Key) -> eyre::Result<()> {
        self.db.delete(key.as_bytes())
    }
}

impl core::fmt::Debug for Store {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}
