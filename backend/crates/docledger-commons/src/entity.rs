//! Entity kinds and attribute maps.
//!
//! Keys are never built from typed fields directly. Each record exposes its
//! attributes as a name → value map and the entity registry picks the attributes
//! that form the primary key and each secondary index key, in template order.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Attribute name → string value.
pub type Attributes = BTreeMap<String, String>;

/// Record kinds known to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    User,
    Document,
}

impl EntityKind {
    pub fn all() -> [EntityKind; 2] {
        [EntityKind::User, EntityKind::Document]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::User => "User",
            EntityKind::Document => "Document",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record that can be written to and read from the world state.
///
/// The payload stored under the primary key is the serde serialization of the
/// implementing type; `attributes()` supplies the values used to build keys.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync {
    const KIND: EntityKind;

    fn attributes(&self) -> Attributes;
}
