use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::StoreConfig;
use crate::db::Database;

type Entries = BTreeMap<Box<[u8]>, Box<[u8]>>;

/// Volatile database, used by tests and simulated devices.
#[derive(Debug, Default)]
pub struct InMemoryDB {
    inner: RwLock<Entries>,
}

impl InMemoryDB {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> eyre::Result<RwLockReadGuard<'_, Entries>> {
        self.inner
            .read()
            .map_err(|_| eyre::eyre!("failed to acquire read lock on database"))
    }

    fn write(&self) -> eyre::Result<RwLockWriteGuard<'_, Entries>> {
        self.inner
            .write()
            .map_err(|_| eyre::eyre!("failed to acquire write lock on database"))
    }
}

impl Database for InMemoryDB {
    fn open(_config: &StoreConfig) -> eyre::Result<Self> {
        Ok(Self::default())
    }

    fn get(&self, key: &[u8]) -> eyre::Result<Option<Vec<u8>>> {
        Ok(self.read()?.get(key).map(|value| value.to_vec()))
    }

    fn put(&self, key: &[u8], value: &[u8]) -> eyre::Result<()> {
        drop(self.write()?.insert(key.into(), value.into()));

        Ok(())
    }

    fn delete(&self, key: &[u8]) -> eyre::Result<()> {
        drop(self.write()?.remove(key));

        Ok(())
    }
}
