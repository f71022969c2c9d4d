//! Indexed Entity Store - primary records plus secondary index maintenance.
//!
//! ## Write Path
//!
//! ```text
//! create(kind, attributes, payload)
//!     │
//!     ├── 1. build primary key and every index key   (nothing written yet)
//!     ├── 2. get(primary)            present → AlreadyExists
//!     ├── 3. unique indexes          value present → AlreadyExists
//!     ├── 4. serialize payload
//!     ├── 5. put(primary, payload)
//!     └── 6. put(index key, primary key) for each index
//! ```
//!
//! Steps 5 and 6 are separate store calls. If an index write fails after the
//! primary write, the record exists but is invisible through that index; the
//! failure is logged and returned unchanged. Records are never updated or deleted.
//!
//! Two concurrent creates of the same key can both pass step 2; whichever writes
//! last wins. Callers that need more must serialize creates themselves.
//!
//! ## Example Usage
//!
//! ```rust
//! use docledger_commons::User;
//! use docledger_store::{EntityRegistry, IndexedEntityStore, InMemoryBackend};
//! use std::sync::Arc;
//!
//! let store = IndexedEntityStore::new(
//!     Arc::new(InMemoryBackend::new()),
//!     Arc::new(EntityRegistry::indexed()),
//! );
//! let key = store.insert(&User::new("u1", "a@x.io", "hash")).unwrap();
//! assert_eq!(key.to_string(), "User(u1)");
//! ```

use crate::error::{EntityError, Result};
use crate::index::SecondaryIndex;
use crate::payload::serialize_payload;
use crate::registry::EntityRegistry;
use crate::storage_trait::StorageBackend;
use docledger_commons::{Attributes, CompositeKey, Entity, EntityKind};
use serde::Serialize;
use std::sync::Arc;

pub struct IndexedEntityStore {
    backend: Arc<dyn StorageBackend>,
    registry: Arc<EntityRegistry>,
}

impl IndexedEntityStore {
    pub fn new(backend: Arc<dyn StorageBackend>, registry: Arc<EntityRegistry>) -> Self {
        Self { backend, registry }
    }

    /// Store a typed record. Key attributes come from [`Entity::attributes`].
    pub fn insert<E: Entity>(&self, entity: &E) -> Result<CompositeKey> {
        self.create(E::KIND, &entity.attributes(), entity)
    }

    /// Store `payload` under the primary key derived from `attributes`, then
    /// write one entry per secondary index.
    pub fn create<P: Serialize + ?Sized>(
        &self,
        kind: EntityKind,
        attributes: &Attributes,
        payload: &P,
    ) -> Result<CompositeKey> {
        let definition = self.registry.definition(kind);
        let primary_key = definition.primary_key(attributes)?;

        let indexes: Vec<(SecondaryIndex, CompositeKey)> = definition
            .indexes
            .iter()
            .map(|def| -> Result<(SecondaryIndex, CompositeKey)> {
                let index = SecondaryIndex::new(self.backend.clone(), kind, def);
                let key = index.key_for(attributes)?;
                Ok((index, key))
            })
            .collect::<Result<_>>()?;

        let primary_bytes = primary_key.encode()?;
        if self.backend.contains(&primary_bytes)? {
            return Err(EntityError::AlreadyExists(primary_key.to_string()));
        }

        for (index, index_key) in &indexes {
            if !index.is_unique() {
                continue;
            }
            let value = &index_key.segments()[0];
            if index.contains_value(value)? {
                return Err(EntityError::AlreadyExists(format!(
                    "{} with {} '{}'",
                    kind,
                    index.definition().attribute,
                    value
                )));
            }
        }

        let blob = serialize_payload(payload)?;
        self.backend.put(&primary_bytes, &blob)?;

        for (index, index_key) in &indexes {
            if let Err(e) = index.put(index_key, &primary_key) {
                log::error!(
                    "Stored {} but failed to write {} index entry {}: {}",
                    primary_key,
                    index.definition().attribute,
                    index_key,
                    e
                );
                return Err(e);
            }
        }

        log::debug!("Created {} with {} index entries", primary_key, indexes.len());
        Ok(primary_key)
    }
}
