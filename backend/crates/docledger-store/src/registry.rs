//! Entity registry: which attributes form each key.
//!
//! The registry is static and versioned. `V2` gives every kind a composite primary
//! key plus secondary indexes; `V1` keeps single-segment primary keys and no indexes.
//! The index and query layers read everything from here, so one code path serves
//! both layouts.
//!
//! ```text
//! V2  User      ns=User  primary=[userid]         Email   -> [email, userid] (unique)
//!     Document  ns=Doc   primary=[userid, docid]  DocName -> [docname, userid, docid]
//! V1  User      ns=User  primary=[userid]
//!     Document  ns=Doc   primary=[docid]
//! ```

use crate::error::{EntityError, Result};
use docledger_commons::{
    encode_prefix, AttributeNames, Attributes, CompositeKey, EntityKind, Namespaces,
};
use docledger_configs::RegistryVersion;

// ============================================================================
// IndexDefinition
// ============================================================================

/// Secondary index template.
///
/// ## Key Design
///
/// The key starts with the indexed attribute so a prefix scan on `[value]`
/// returns every entry for that value, followed by enough of the primary key to
/// keep entries distinct. The stored value is the encoded primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexDefinition {
    /// Attribute the index is queried by
    pub attribute: &'static str,
    /// Namespace holding the index entries
    pub namespace: &'static str,
    /// Attributes forming the index key, in order
    pub key_attributes: &'static [&'static str],
    /// Reject a second record with the same attribute value
    pub unique: bool,
}

impl IndexDefinition {
    /// Build the index key for a record.
    pub fn index_key(&self, kind: EntityKind, attributes: &Attributes) -> Result<CompositeKey> {
        build_key(kind, self.namespace, self.key_attributes, attributes)
    }

    /// Prefix covering every entry whose indexed attribute equals `value`.
    pub fn value_prefix(&self, value: &str) -> Result<Vec<u8>> {
        Ok(encode_prefix(self.namespace, &[value])?)
    }
}

// ============================================================================
// EntityDefinition
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityDefinition {
    pub kind: EntityKind,
    pub namespace: &'static str,
    pub primary_key: &'static [&'static str],
    pub indexes: &'static [IndexDefinition],
}

impl EntityDefinition {
    /// Build the primary key for a record.
    pub fn primary_key(&self, attributes: &Attributes) -> Result<CompositeKey> {
        build_key(self.kind, self.namespace, self.primary_key, attributes)
    }

    /// Build a primary key from segments given in template order.
    pub fn primary_key_from_segments<S: AsRef<str>>(&self, segments: &[S]) -> Result<CompositeKey> {
        if segments.len() != self.primary_key.len() {
            return Err(EntityError::InvalidSegment(format!(
                "{} primary key takes {} segments, got {}",
                self.kind,
                self.primary_key.len(),
                segments.len()
            )));
        }
        Ok(CompositeKey::new(self.namespace, segments)?)
    }

    /// Prefix over a leading part of the primary key; empty = every record.
    pub fn primary_prefix<S: AsRef<str>>(&self, segments: &[S]) -> Result<Vec<u8>> {
        if segments.len() > self.primary_key.len() {
            return Err(EntityError::InvalidSegment(format!(
                "{} primary key has only {} segments",
                self.kind,
                self.primary_key.len()
            )));
        }
        Ok(encode_prefix(self.namespace, segments)?)
    }

    pub fn index(&self, attribute: &str) -> Option<&'static IndexDefinition> {
        self.indexes.iter().find(|idx| idx.attribute == attribute)
    }
}

fn build_key(
    kind: EntityKind,
    namespace: &str,
    template: &[&str],
    attributes: &Attributes,
) -> Result<CompositeKey> {
    let segments = template
        .iter()
        .map(|name| {
            attributes
                .get(*name)
                .map(String::as_str)
                .ok_or_else(|| EntityError::MissingAttribute {
                    kind,
                    attribute: (*name).to_string(),
                })
        })
        .collect::<Result<Vec<&str>>>()?;

    Ok(CompositeKey::new(namespace, &segments)?)
}

// ============================================================================
// Static tables
// ============================================================================

const EMAIL_INDEX: IndexDefinition = IndexDefinition {
    attribute: AttributeNames::EMAIL,
    namespace: Namespaces::EMAIL_INDEX,
    key_attributes: &[AttributeNames::EMAIL, AttributeNames::USER_ID],
    unique: true,
};

const DOC_NAME_INDEX: IndexDefinition = IndexDefinition {
    attribute: AttributeNames::DOC_NAME,
    namespace: Namespaces::DOC_NAME_INDEX,
    key_attributes: &[
        AttributeNames::DOC_NAME,
        AttributeNames::USER_ID,
        AttributeNames::DOC_ID,
    ],
    unique: false,
};

const USER_V2: EntityDefinition = EntityDefinition {
    kind: EntityKind::User,
    namespace: Namespaces::USER,
    primary_key: &[AttributeNames::USER_ID],
    indexes: &[EMAIL_INDEX],
};

const DOCUMENT_V2: EntityDefinition = EntityDefinition {
    kind: EntityKind::Document,
    namespace: Namespaces::DOCUMENT,
    primary_key: &[AttributeNames::USER_ID, AttributeNames::DOC_ID],
    indexes: &[DOC_NAME_INDEX],
};

const USER_V1: EntityDefinition = EntityDefinition {
    kind: EntityKind::User,
    namespace: Namespaces::USER,
    primary_key: &[AttributeNames::USER_ID],
    indexes: &[],
};

const DOCUMENT_V1: EntityDefinition = EntityDefinition {
    kind: EntityKind::Document,
    namespace: Namespaces::DOCUMENT,
    primary_key: &[AttributeNames::DOC_ID],
    indexes: &[],
};

// ============================================================================
// EntityRegistry
// ============================================================================

#[derive(Debug, Clone)]
pub struct EntityRegistry {
    user: &'static EntityDefinition,
    document: &'static EntityDefinition,
}

impl EntityRegistry {
    pub fn new(version: RegistryVersion) -> Self {
        match version {
            RegistryVersion::V1 => Self::legacy(),
            RegistryVersion::V2 => Self::indexed(),
        }
    }

    /// Composite primary keys with secondary indexes.
    pub fn indexed() -> Self {
        Self {
            user: &USER_V2,
            document: &DOCUMENT_V2,
        }
    }

    /// Single-segment primary keys, no secondary indexes.
    pub fn legacy() -> Self {
        Self {
            user: &USER_V1,
            document: &DOCUMENT_V1,
        }
    }

    pub fn definition(&self, kind: EntityKind) -> &'static EntityDefinition {
        match kind {
            EntityKind::User => self.user,
            EntityKind::Document => self.document,
        }
    }

    pub fn index(&self, kind: EntityKind, attribute: &str) -> Result<&'static IndexDefinition> {
        self.definition(kind)
            .index(attribute)
            .ok_or_else(|| EntityError::UnknownIndex {
                kind,
                attribute: attribute.to_string(),
            })
    }
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::indexed()
    }
}
