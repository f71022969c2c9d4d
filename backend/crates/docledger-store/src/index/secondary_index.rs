use crate::error::{EntityError, Result};
use crate::registry::IndexDefinition;
use crate::storage_trait::StorageBackend;
use docledger_commons::{decode_key, Attributes, CompositeKey, EntityKind};
use std::sync::Arc;

/// Secondary index over one attribute of one entity kind.
///
/// Maps index keys to primary keys.
///
/// ## Index Types
/// - **Unique**: at most one record per attribute value (e.g., email → user)
/// - **Non-Unique**: any number of records per value (e.g., docname → documents)
///
/// ## Storage Format
/// `encode(index ns, [value, pk segments...])` → `encode(primary key)`
///
/// Every entry carries the full primary key in its own key, so entries are
/// never rewritten: a new record only adds a new entry.
pub struct SecondaryIndex {
    backend: Arc<dyn StorageBackend>,
    kind: EntityKind,
    definition: &'static IndexDefinition,
}

impl SecondaryIndex {
    pub fn new(
        backend: Arc<dyn StorageBackend>,
        kind: EntityKind,
        definition: &'static IndexDefinition,
    ) -> Self {
        Self {
            backend,
            kind,
            definition,
        }
    }

    pub fn definition(&self) -> &'static IndexDefinition {
        self.definition
    }

    pub fn is_unique(&self) -> bool {
        self.definition.unique
    }

    /// Index key for a record, built from its attributes.
    pub fn key_for(&self, attributes: &Attributes) -> Result<CompositeKey> {
        self.definition.index_key(self.kind, attributes)
    }

    /// Writes one index entry pointing at `primary_key`.
    pub fn put(&self, index_key: &CompositeKey, primary_key: &CompositeKey) -> Result<()> {
        self.backend.put(&index_key.encode()?, &primary_key.encode()?)?;
        Ok(())
    }

    /// Returns true if any entry exists for the attribute value.
    pub fn contains_value(&self, value: &str) -> Result<bool> {
        let prefix = self.definition.value_prefix(value)?;
        match self.backend.scan_prefix(&prefix)?.next() {
            Some(item) => {
                item?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Primary keys of every record with the attribute value, in index key order.
    pub fn primary_keys(&self, value: &str) -> Result<Vec<CompositeKey>> {
        let prefix = self.definition.value_prefix(value)?;
        self.backend
            .scan_prefix(&prefix)?
            .map(|item| {
                let (index_key, primary_key) = item?;
                decode_key(&primary_key).map_err(|e| {
                    EntityError::SerializationError(format!(
                        "index entry {} holds an invalid primary key: {}",
                        decode_key(&index_key)
                            .map(|k| k.to_string())
                            .unwrap_or_else(|_| "<undecodable>".to_string()),
                        e
                    ))
                })
            })
            .collect()
    }
}
