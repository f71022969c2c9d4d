//! RocksDB implementation of the StorageBackend trait.
//!
//! The world state lives in a single column family. Prefix scans read from a
//! RocksDB snapshot so a scan sees a consistent view even while creates land.

use crate::storage_trait::{KvIterator, Partition, Result, StorageBackend, StorageError};
use rocksdb::{ColumnFamily, Direction, IteratorMode, DB};
use std::sync::Arc;

/// RocksDB implementation of the StorageBackend trait.
///
/// ## Example
///
/// ```rust,ignore
/// use docledger_store::{RocksDBBackend, RocksDbInit, StorageBackend, Partition};
///
/// let db = RocksDbInit::with_defaults("/tmp/ledger", "world_state").open().unwrap();
/// let backend = RocksDBBackend::new(db, Partition::new("world_state")).unwrap();
///
/// backend.put(b"key1", b"value1").unwrap();
/// assert_eq!(backend.get(b"key1").unwrap(), Some(b"value1".to_vec()));
/// ```
pub struct RocksDBBackend {
    db: Arc<DB>,
    partition: Partition,
}

impl RocksDBBackend {
    /// Wraps an open database. Fails if the partition's column family is missing.
    pub fn new(db: Arc<DB>, partition: Partition) -> Result<Self> {
        if db.cf_handle(partition.name()).is_none() {
            return Err(StorageError::PartitionNotFound(partition.name().to_string()));
        }
        Ok(Self { db, partition })
    }

    fn get_cf(&self) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(self.partition.name())
            .ok_or_else(|| StorageError::PartitionNotFound(self.partition.name().to_string()))
    }
}

impl StorageBackend for RocksDBBackend {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let cf = self.get_cf()?;
        self.db
            .get_cf(cf, key)
            .map_err(|e| StorageError::IoError(e.to_string()))
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        let cf = self.get_cf()?;
        self.db
            .put_cf(cf, key, value)
            .map_err(|e| StorageError::IoError(e.to_string()))
    }

    fn scan_prefix(&self, prefix: &[u8]) -> Result<KvIterator<'_>> {
        let cf = self.get_cf()?;

        // Take a consistent snapshot for the duration of the iterator
        let snapshot = self.db.snapshot();

        let iter_mode = if prefix.is_empty() {
            IteratorMode::Start
        } else {
            IteratorMode::From(prefix, Direction::Forward)
        };

        let mut readopts = rocksdb::ReadOptions::default();
        readopts.set_snapshot(&snapshot);
        let inner = self.db.iterator_cf_opt(cf, readopts, iter_mode);

        struct SnapshotScanIter<'a, D: rocksdb::DBAccess> {
            // Hold the snapshot to keep it alive for 'a
            _snapshot: rocksdb::SnapshotWithThreadMode<'a, D>,
            inner: rocksdb::DBIteratorWithThreadMode<'a, D>,
            prefix: Vec<u8>,
            done: bool,
        }

        impl<'a, D: rocksdb::DBAccess> Iterator for SnapshotScanIter<'a, D> {
            type Item = Result<(Vec<u8>, Vec<u8>)>;

            fn next(&mut self) -> Option<Self::Item> {
                if self.done {
                    return None;
                }

                match self.inner.next()? {
                    Ok((k, v)) => {
                        if !k.starts_with(&self.prefix) {
                            self.done = true;
                            return None;
                        }
                        Some(Ok((k.to_vec(), v.to_vec())))
                    }
                    Err(e) => {
                        self.done = true;
                        Some(Err(StorageError::IoError(e.to_string())))
                    }
                }
            }
        }

        let iter = SnapshotScanIter::<DB> {
            _snapshot: snapshot,
            inner,
            prefix: prefix.to_vec(),
            done: false,
        };

        Ok(Box::new(iter))
    }
}
