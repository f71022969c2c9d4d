//! Read path: primary lookups, prefix scans and index-backed queries.
//!
//! All reads are typed by the [`Entity`] being decoded; the registry supplies the
//! namespace and key templates for `E::KIND`.
//!
//! ```text
//! get_by_index(email, "a@x.io")
//!     │
//!     ├── scan_prefix(Email, ["a@x.io"])      → [User(u1), User(u7)]
//!     ├── get(User(u1)), get(User(u7))        → payloads
//!     └── decode                              → [User, User]
//! ```

use crate::error::{EntityError, Result};
use crate::index::SecondaryIndex;
use crate::payload::deserialize_payload;
use crate::registry::EntityRegistry;
use crate::storage_trait::StorageBackend;
use docledger_commons::{Attributes, CompositeKey, Entity, EntityKind};
use std::sync::Arc;

pub struct QueryEngine {
    backend: Arc<dyn StorageBackend>,
    registry: Arc<EntityRegistry>,
}

impl QueryEngine {
    pub fn new(backend: Arc<dyn StorageBackend>, registry: Arc<EntityRegistry>) -> Self {
        Self { backend, registry }
    }

    /// Fetch one record by its full primary key, segments in template order.
    pub fn get_by_primary<E: Entity, S: AsRef<str>>(&self, segments: &[S]) -> Result<E> {
        let key = self
            .registry
            .definition(E::KIND)
            .primary_key_from_segments(segments)?;
        self.load(&key)?
            .ok_or_else(|| EntityError::NotFound(key.to_string()))
    }

    /// Fetch one record by the attributes that make up its primary key.
    ///
    /// Extra attributes are ignored, so the same map works for every registry layout.
    pub fn get_by_key_attributes<E: Entity>(&self, attributes: &Attributes) -> Result<E> {
        let key = self.registry.definition(E::KIND).primary_key(attributes)?;
        self.load(&key)?
            .ok_or_else(|| EntityError::NotFound(key.to_string()))
    }

    /// Every record whose primary key starts with `segments`, in key order.
    pub fn get_by_primary_prefix<E: Entity, S: AsRef<str>>(&self, segments: &[S]) -> Result<Vec<E>> {
        let definition = self.registry.definition(E::KIND);
        let prefix = definition.primary_prefix(segments)?;
        let records = self.scan_records(&prefix)?;
        if records.is_empty() {
            return Err(EntityError::NotFound(format!(
                "{} with primary key prefix [{}]",
                E::KIND,
                join(segments)
            )));
        }
        Ok(records)
    }

    /// Every record whose indexed `attribute` equals `value`, in index key order.
    ///
    /// Index entries whose primary record is gone are skipped. An empty `value`
    /// cannot form an index key and fails with `InvalidSegment`, not `NotFound`.
    pub fn get_by_index<E: Entity>(&self, attribute: &str, value: &str) -> Result<Vec<E>> {
        let keys = self.index_primary_keys(E::KIND, attribute, value)?;
        if keys.is_empty() {
            return Err(EntityError::NotFound(format!(
                "{} with {} '{}'",
                E::KIND,
                attribute,
                value
            )));
        }

        let mut records = Vec::with_capacity(keys.len());
        for key in keys {
            match self.load(&key)? {
                Some(record) => records.push(record),
                None => log::warn!(
                    "{} index entry for '{}' points at missing record {}",
                    attribute,
                    value,
                    key
                ),
            }
        }

        if records.is_empty() {
            return Err(EntityError::NotFound(format!(
                "{} with {} '{}'",
                E::KIND,
                attribute,
                value
            )));
        }
        Ok(records)
    }

    /// Primary keys recorded in the index for `value`, without loading records.
    pub fn index_primary_keys(
        &self,
        kind: EntityKind,
        attribute: &str,
        value: &str,
    ) -> Result<Vec<CompositeKey>> {
        let definition = self.registry.index(kind, attribute)?;
        SecondaryIndex::new(self.backend.clone(), kind, definition).primary_keys(value)
    }

    /// Find records by attribute regardless of registry layout.
    ///
    /// Uses the secondary index when there is one, a primary prefix scan when the
    /// attribute leads the primary key, and otherwise a filtered namespace scan.
    /// An empty `value` is `InvalidSegment` on every path.
    pub fn get_by_attribute<E: Entity>(&self, attribute: &str, value: &str) -> Result<Vec<E>> {
        if value.is_empty() {
            return Err(EntityError::InvalidSegment(format!(
                "{} lookup by {} needs a non-empty value",
                E::KIND,
                attribute
            )));
        }

        let definition = self.registry.definition(E::KIND);

        if definition.index(attribute).is_some() {
            return self.get_by_index(attribute, value);
        }

        if definition.primary_key.first() == Some(&attribute) {
            return self.get_by_primary_prefix(&[value]);
        }

        log::debug!(
            "No index on {}.{}, scanning the whole namespace",
            E::KIND,
            attribute
        );
        let records: Vec<E> = self
            .get_all::<E>()?
            .into_iter()
            .filter(|record| record.attributes().get(attribute).map(String::as_str) == Some(value))
            .collect();

        if records.is_empty() {
            return Err(EntityError::NotFound(format!(
                "{} with {} '{}'",
                E::KIND,
                attribute,
                value
            )));
        }
        Ok(records)
    }

    /// Every record of the kind, in primary key order. May be empty.
    pub fn get_all<E: Entity>(&self) -> Result<Vec<E>> {
        let prefix = self
            .registry
            .definition(E::KIND)
            .primary_prefix::<&str>(&[])?;
        self.scan_records(&prefix)
    }

    pub fn exists<S: AsRef<str>>(&self, kind: EntityKind, segments: &[S]) -> Result<bool> {
        let key = self
            .registry
            .definition(kind)
            .primary_key_from_segments(segments)?;
        Ok(self.backend.contains(&key.encode()?)?)
    }

    fn load<E: Entity>(&self, key: &CompositeKey) -> Result<Option<E>> {
        match self.backend.get(&key.encode()?)? {
            Some(bytes) => Ok(Some(deserialize_payload(&bytes)?)),
            None => Ok(None),
        }
    }

    fn scan_records<E: Entity>(&self, prefix: &[u8]) -> Result<Vec<E>> {
        self.backend
            .scan_prefix(prefix)?
            .map(|item| {
                let (_, value) = item?;
                deserialize_payload(&value)
            })
            .collect()
    }
}

fn join<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(", ")
}
