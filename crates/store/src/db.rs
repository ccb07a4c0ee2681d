use crate::config::StoreConfig;

mod memory;
mod rocksdb;

pub use self::rocksdb::RocksDB;
pub use memory::InMemoryDB;

/// A plain byte-blob key/value store.
pub trait Database: Send + Sync + 'static {
    fn open(config: &StoreConfig) -> eyre::Result<Self>
    where
        Self: Sized;

    fn has(&self, key: &[u8]) -> eyre::Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    fn get(&self, key: &[u8]) -> eyre::Result<Option<Vec<u8>>>;
    fn put(&self, key: &[u8], value: &[u8]) -> eyre::Result<()>;
    fn delete(&self, key: &[u8]) -> eyre::Result<()>;
}
