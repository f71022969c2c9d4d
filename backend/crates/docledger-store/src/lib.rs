//! # docledger-store
//!
//! World-state storage for DocLedger: pluggable key-value backends, the entity
//! registry, secondary index maintenance and the query engine.
//!
//! ## Architecture
//!
//! ```text
//! docledger-core (DocLedger facade)
//!     ↓
//! IndexedEntityStore (writes) / QueryEngine (reads)
//!     ↓
//! EntityRegistry + composite keys
//!     ↓
//! StorageBackend (RocksDB, in-memory)
//! ```

pub mod error;
pub mod id_gen;
pub mod index; // Secondary index entries
pub mod indexed_store;
pub mod memory_backend;
pub mod payload;
pub mod query;
pub mod registry;
pub mod rocksdb_impl;
pub mod rocksdb_init;
pub mod storage_trait;

pub use error::{EntityError, Result};
pub use id_gen::generate_unique_id;
pub use index::SecondaryIndex;
pub use indexed_store::IndexedEntityStore;
pub use memory_backend::InMemoryBackend;
pub use query::QueryEngine;
pub use registry::{EntityDefinition, EntityRegistry, IndexDefinition};
pub use rocksdb_impl::RocksDBBackend;
pub use rocksdb_init::RocksDbInit;
pub use storage_trait::{KvIterator, Partition, StorageBackend, StorageError};

// Make test_utils available for testing in dependent crates
pub mod test_utils;
