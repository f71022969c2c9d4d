//! Storage backend abstraction for the world state.
//!
//! The ledger only needs three things from the host key-value store: point reads,
//! point writes and ordered prefix scans. `StorageBackend` captures exactly that so
//! the index and query layers can run over RocksDB, an in-memory map, or a test
//! double without change.
//!
//! ## Partition Model
//!
//! All entities and indexes live in one flat keyspace (the world state). Backends
//! that have a native grouping concept map the world state to one [`Partition`]:
//! - **RocksDB**: Partition = Column Family
//! - **In-Memory**: Partition is a label only
//!
//! ## Example Usage
//!
//! ```rust
//! use docledger_store::memory_backend::InMemoryBackend;
//! use docledger_store::storage_trait::StorageBackend;
//!
//! let backend = InMemoryBackend::new();
//! backend.put(b"k1", b"v1").unwrap();
//! assert_eq!(backend.get(b"k1").unwrap(), Some(b"v1".to_vec()));
//!
//! let hits: Vec<_> = backend.scan_prefix(b"k").unwrap().collect();
//! assert_eq!(hits.len(), 1);
//! ```

use std::fmt;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Ordered, finite, single-pass iterator over `(key, value)` pairs.
///
/// Items are fallible: a backend may fail halfway through a scan.
pub type KvIterator<'a> = Box<dyn Iterator<Item = Result<(Vec<u8>, Vec<u8>)>> + 'a>;

/// Errors that can occur during storage operations.
#[derive(Debug, Clone)]
pub enum StorageError {
    /// Partition (column family) not found
    PartitionNotFound(String),

    /// Generic I/O error from underlying storage
    IoError(String),

    /// Store refused or could not serve the request
    Unavailable(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::PartitionNotFound(p) => write!(f, "Partition not found: {}", p),
            StorageError::IoError(msg) => write!(f, "I/O error: {}", msg),
            StorageError::Unavailable(msg) => write!(f, "Store unavailable: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

/// Named region of a backend's keyspace that holds the world state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Partition {
    name: String,
}

impl Partition {
    /// Creates a new partition with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the partition name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl From<String> for Partition {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl From<&str> for Partition {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Trait for pluggable world-state backends.
///
/// Implementations must be thread-safe (Send + Sync) so one backend can be shared
/// through `Arc<dyn StorageBackend>`. Each call is atomic on its own; nothing spans
/// several calls.
///
/// ## Error Handling
///
/// Implementations should:
/// - Return `PartitionNotFound` if the configured partition doesn't exist
/// - Return `IoError` for underlying storage failures
/// - Return `Unavailable` when the store rejects the request outright
pub trait StorageBackend: Send + Sync {
    /// Retrieves a value by key.
    ///
    /// Returns `Ok(None)` if the key doesn't exist.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Stores a key-value pair, overwriting any previous value.
    fn put(&self, key: &[u8], value: &[u8]) -> Result<()>;

    /// Scans every key that starts with `prefix`, in ascending byte order.
    ///
    /// An empty prefix scans the whole keyspace.
    fn scan_prefix(&self, prefix: &[u8]) -> Result<KvIterator<'_>>;

    /// Checks whether a key exists.
    fn contains(&self, key: &[u8]) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_creation() {
        let p1 = Partition::new("world_state");
        assert_eq!(p1.name(), "world_state");

        let p2: Partition = "world_state".into();
        assert_eq!(p1, p2);

        let p3: Partition = String::from("other").into();
        assert_eq!(p3.to_string(), "other");
    }

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::PartitionNotFound("world_state".to_string());
        assert_eq!(err.to_string(), "Partition not found: world_state");

        let err = StorageError::IoError("disk full".to_string());
        assert_eq!(err.to_string(), "I/O error: disk full");

        let err = StorageError::Unavailable("read-only".to_string());
        assert_eq!(err.to_string(), "Store unavailable: read-only");
    }
}
