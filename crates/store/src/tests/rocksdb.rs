use camino::Utf8PathBuf;
use tempfile::tempdir;

use super::*;

fn open_in(dir: &tempfile::TempDir) -> RocksDB {
    let path = Utf8PathBuf::from_path_buf(dir.path().join("data")).unwrap();

    RocksDB::open(&StoreConfig::new(path)).unwrap()
}

#[test]
fn test_rocksdb_creates_datastore() {
    let dir = tempdir().unwrap();
    let _db = open_in(&dir);

    assert!(dir.path().join("data").is_dir());
}

#[test]
fn test_rocksdb_get_put_delete() {
    let dir = tempdir().unwrap();
    let db = open_in(&dir);

    assert_eq!(db.get(b"user_profile").unwrap(), None);
    assert!(!db.has(b"user_profile").unwrap());

    db.put(b"user_profile", b"{}").unwrap();
    assert_eq!(db.get(b"user_profile").unwrap(), Some(b"{}".to_vec()));
    assert!(db.has(b"user_profile").unwrap());

    db.put(b"user_profile", b"[]").unwrap();
    assert_eq!(db.get(b"user_profile").unwrap(), Some(b"[]".to_vec()));

    db.delete(b"user_profile").unwrap();
    db.delete(b"user_profile").unwrap();
    assert_eq!(db.get(b"user_profile").unwrap(), None);
}

#[test]
fn test_rocksdb_survives_reopen() {
    let dir = tempdir().unwrap();

    open_in(&dir).put(b"k", b"v").unwrap();

    assert_eq!(open_in(&dir).get(b"k").unwrap(), Some(b"v".to_vec()));
}
