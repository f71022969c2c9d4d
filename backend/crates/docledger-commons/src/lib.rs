//! # docledger-commons
//!
//! Types shared by every DocLedger crate:
//!
//! - [`composite_key`]: order-preserving encoding of `(namespace, segments)` keys
//! - [`entity`]: the [`Entity`] trait and attribute maps used to derive keys
//! - [`models`]: the `User` and `Document` records stored in the world state
//! - [`constants`]: namespace and attribute names

pub mod composite_key;
pub mod constants;
pub mod entity;
pub mod models;

pub use composite_key::{decode_key, encode_key, encode_prefix, CompositeKey, KeyError};
pub use constants::{AttributeNames, Namespaces};
pub use entity::{Attributes, Entity, EntityKind};
pub use models::{Document, User};
