//! Test utilities for docledger-store.
//!
//! Provides a temporary RocksDB and a backend that fails on demand.

use crate::storage_trait::{KvIterator, Result as StorageResult, StorageBackend, StorageError};
use anyhow::Result;
use rocksdb::{Options, DB};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

/// Test database wrapper that automatically cleans up on drop.
pub struct TestDb {
    /// RocksDB instance
    pub db: Arc<DB>,
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
}

impl TestDb {
    /// Column family created by [`TestDb::new`].
    pub const PARTITION: &'static str = "world_state";

    /// Create a new test database with the world-state column family.
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let db = DB::open_cf(&opts, temp_dir.path(), [Self::PARTITION])?;

        Ok(Self {
            db: Arc::new(db),
            temp_dir,
        })
    }
}

/// Wraps a backend and fails every `put` after the first `allowed_puts`.
///
/// Reads always go through. Used to open the window between the primary write
/// and the index writes of a create.
pub struct FlakyBackend {
    inner: Arc<dyn StorageBackend>,
    allowed_puts: usize,
    puts: AtomicUsize,
}

impl FlakyBackend {
    pub fn new(inner: Arc<dyn StorageBackend>, allowed_puts: usize) -> Self {
        Self {
            inner,
            allowed_puts,
            puts: AtomicUsize::new(0),
        }
    }

    /// Number of put calls seen so far, failed ones included.
    pub fn put_calls(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

impl StorageBackend for FlakyBackend {
    fn get(&self, key: &[u8]) -> StorageResult<Option<Vec<u8>>> {
        self.inner.get(key)
    }

    fn put(&self, key: &[u8], value: &[u8]) -> StorageResult<()> {
        let seen = self.puts.fetch_add(1, Ordering::SeqCst);
        if seen >= self.allowed_puts {
            return Err(StorageError::IoError(format!(
                "injected failure on put #{}",
                seen + 1
            )));
        }
        self.inner.put(key, value)
    }

    fn scan_prefix(&self, prefix: &[u8]) -> StorageResult<KvIterator<'_>> {
        self.inner.scan_prefix(prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_backend::InMemoryBackend;

    #[test]
    fn test_create_test_db() {
        let test_db = TestDb::new().unwrap();
        assert!(test_db.db.cf_handle(TestDb::PARTITION).is_some());
    }

    #[test]
    fn test_flaky_backend_fails_after_limit() {
        let inner = Arc::new(InMemoryBackend::new());
        let flaky = FlakyBackend::new(inner.clone(), 2);

        flaky.put(b"a", b"1").unwrap();
        flaky.put(b"b", b"2").unwrap();
        assert!(matches!(flaky.put(b"c", b"3"), Err(StorageError::IoError(_))));
        assert_eq!(flaky.put_calls(), 3);

        assert_eq!(inner.len(), 2);
        assert_eq!(flaky.get(b"a").unwrap(), Some(b"1".to_vec()));
        assert_eq!(flaky.scan_prefix(b"").unwrap().count(), 2);
    }
}
