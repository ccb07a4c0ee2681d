#[cfg(test)]
#[path = "../tests/rocksdb.rs"]
mod tests;

use eyre::WrapErr;

use crate::config::StoreConfig;
use crate::db::Database;

pub struct RocksDB {
    db: rocksdb::DB,
}

impl Database for RocksDB {
    fn open(config: &StoreConfig) -> eyre::Result<Self> {
        let mut options = rocksdb::Options::default();

        options.create_if_missing(true);

        let db = rocksdb::DB::open(&options, &config.path)
            .wrap_err_with(|| format!("failed to open datastore at {:?}", config.path))?;

        Ok(Self { db })
    }

    fn get(&self, key: &[u8]) -> eyre::Result<Option<Vec<u8>>> {
        let value = self.db.get_pinned(key)?;

        Ok(value.map(|value| value.to_vec()))
    }

    fn put(&self, key: &[u8], value: &[u8]) -> eyre::Result<()> {
        self.db.put(key, value)?;

        Ok(())
    }

    fn delete(&self, key: &[u8]) -> eyre::Result<()> {
        self.db.delete(key)?;

        Ok(())
    }
}

impl core::fmt::Debug for RocksDB {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RocksDB")
            .field("path", &self.db.path())
            .finish()
    }
}
