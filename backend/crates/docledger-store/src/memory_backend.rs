//! In-memory implementation of the StorageBackend trait.
//!
//! Backed by an ordered map so prefix scans come back in byte order, the same as
//! RocksDB. Scans copy the matching range under the read lock and iterate that
//! snapshot, so writes that happen during a scan are not observed by it.

use crate::storage_trait::{KvIterator, Result, StorageBackend};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::ops::Bound;

#[derive(Debug, Default)]
pub struct InMemoryBackend {
    data: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }
}

impl StorageBackend for InMemoryBackend {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.data.read().get(key).cloned())
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.data.write().insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn scan_prefix(&self, prefix: &[u8]) -> Result<KvIterator<'_>> {
        let snapshot: Vec<(Vec<u8>, Vec<u8>)> = {
            let data = self.data.read();
            data.range::<[u8], _>((Bound::Included(prefix), Bound::Unbounded))
                .take_while(|(k, _)| k.starts_with(prefix))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()
        };

        Ok(Box::new(snapshot.into_iter().map(Ok)))
    }

    fn contains(&self, key: &[u8]) -> Result<bool> {
        Ok(self.data.read().contains_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect_keys(backend: &InMemoryBackend, prefix: &[u8]) -> Vec<Vec<u8>> {
        backend
            .scan_prefix(prefix)
            .unwrap()
            .map(|item| item.unwrap().0)
            .collect()
    }

    #[test]
    fn test_get_put() {
        let backend = InMemoryBackend::new();
        assert!(backend.is_empty());
        assert_eq!(backend.get(b"missing").unwrap(), None);

        backend.put(b"key", b"v1").unwrap();
        backend.put(b"key", b"v2").unwrap();
        assert_eq!(backend.get(b"key").unwrap(), Some(b"v2".to_vec()));
        assert!(backend.contains(b"key").unwrap());
        assert_eq!(backend.len(), 1);
    }

    #[test]
    fn test_scan_prefix_is_ordered_and_bounded() {
        let backend = InMemoryBackend::new();
        backend.put(b"b:2", b"").unwrap();
        backend.put(b"a:1", b"").unwrap();
        backend.put(b"b:1", b"").unwrap();
        backend.put(b"c:1", b"").unwrap();

        assert_eq!(collect_keys(&backend, b"b:"), vec![b"b:1".to_vec(), b"b:2".to_vec()]);
        assert_eq!(collect_keys(&backend, b"").len(), 4);
        assert!(collect_keys(&backend, b"z").is_empty());
    }

    #[test]
    fn test_scan_ignores_later_writes() {
        let backend = InMemoryBackend::new();
        backend.put(b"p1", b"").unwrap();

        let iter = backend.scan_prefix(b"p").unwrap();
        backend.put(b"p2", b"").unwrap();

        assert_eq!(iter.count(), 1);
        assert_eq!(collect_keys(&backend, b"p").len(), 2);
    }
}
