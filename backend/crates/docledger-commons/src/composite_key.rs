//! Composite keys with lexicographic ordering
//!
//! Every record in the world state is addressed by a namespace (the entity kind or
//! the indexed attribute) plus an ordered list of string segments. This module turns
//! such a key into bytes and back using the `storekey` crate.
//!
//! # Encoding
//!
//! ```text
//! storekey(namespace) | storekey(segment_1) | ... | storekey(segment_n)
//! ```
//!
//! Each component is written with storekey's string encoding: escaped bytes followed
//! by a terminator, so a NUL inside a segment never reads as a boundary. Components
//! are concatenated like the fields of a storekey tuple.
//!
//! # Ordering Guarantees
//!
//! The backing store iterates keys in byte order. With this encoding:
//! - keys of the same namespace sort segment by segment, each segment alphabetically
//!   ("aaa" < "ab", "a" < "a\0" < "ab")
//! - `encode_prefix(ns, p)` is a byte prefix of `encode_key(ns, s)` exactly when `p`
//!   is a prefix of `s`, so a prefix scan returns only whole-segment matches
//!   ("ali" never matches "alice")
//! - namespaces never bleed into each other ("User" vs "Users")
//!
//! # Usage
//!
//! ```rust
//! use docledger_commons::composite_key::{decode_key, encode_key, encode_prefix};
//!
//! let key = encode_key("Doc", &["u1", "d1"]).unwrap();
//! let prefix = encode_prefix("Doc", &["u1"]).unwrap();
//! assert!(key.starts_with(&prefix));
//!
//! let decoded = decode_key(&key).unwrap();
//! assert_eq!(decoded.namespace(), "Doc");
//! assert_eq!(decoded.segments(), &["u1".to_string(), "d1".to_string()]);
//! ```

use std::fmt;
use std::io::Cursor;
use thiserror::Error;

/// Errors raised while building or parsing composite keys.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// A namespace or segment is empty, or a key has no segments at all
    #[error("Invalid segment: {0}")]
    InvalidSegment(String),

    /// Bytes that were not produced by [`encode_key`]
    #[error("Malformed key: {0}")]
    MalformedKey(String),

    #[error("Key encoding failed: {0}")]
    EncodingFailed(String),
}

/// A validated `(namespace, segments)` pair.
///
/// Construction rejects empty namespaces, empty segments and empty segment lists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompositeKey {
    namespace: String,
    segments: Vec<String>,
}

impl CompositeKey {
    pub fn new<S: AsRef<str>>(namespace: &str, segments: &[S]) -> Result<Self, KeyError> {
        validate_namespace(namespace)?;
        if segments.is_empty() {
            return Err(KeyError::InvalidSegment(format!(
                "composite key in '{}' requires at least one segment",
                namespace
            )));
        }
        validate_segments(namespace, segments)?;

        Ok(Self {
            namespace: namespace.to_string(),
            segments: segments.iter().map(|s| s.as_ref().to_string()).collect(),
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Serialize to the order-preserving byte form.
    pub fn encode(&self) -> Result<Vec<u8>, KeyError> {
        encode_components(&self.namespace, &self.segments)
    }

    /// Parse bytes produced by [`CompositeKey::encode`].
    pub fn decode(bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.is_empty() {
            return Err(KeyError::MalformedKey("empty key".to_string()));
        }

        let mut cursor = Cursor::new(bytes);
        let namespace = read_component(&mut cursor)?;

        let mut segments = Vec::new();
        while (cursor.position() as usize) < bytes.len() {
            segments.push(read_component(&mut cursor)?);
        }

        Self::new(&namespace, &segments).map_err(|e| KeyError::MalformedKey(e.to_string()))
    }

    /// Returns true if the leading segments equal `prefix`.
    pub fn starts_with<S: AsRef<str>>(&self, prefix: &[S]) -> bool {
        prefix.len() <= self.segments.len()
            && prefix
                .iter()
                .zip(&self.segments)
                .all(|(p, s)| p.as_ref() == s.as_str())
    }
}

impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.namespace, self.segments.join(", "))
    }
}

/// Encode a full composite key.
pub fn encode_key<S: AsRef<str>>(namespace: &str, segments: &[S]) -> Result<Vec<u8>, KeyError> {
    CompositeKey::new(namespace, segments)?.encode()
}

/// Encode a partial key for prefix scans.
///
/// An empty `segments` slice yields the prefix of the whole namespace.
///
/// ```rust
/// use docledger_commons::composite_key::{encode_key, encode_prefix};
///
/// let all_docs = encode_prefix::<&str>("Doc", &[]).unwrap();
/// let user_docs = encode_prefix("Doc", &["u1"]).unwrap();
/// let doc = encode_key("Doc", &["u1", "d1"]).unwrap();
/// assert!(doc.starts_with(&all_docs));
/// assert!(doc.starts_with(&user_docs));
/// ```
pub fn encode_prefix<S: AsRef<str>>(namespace: &str, segments: &[S]) -> Result<Vec<u8>, KeyError> {
    validate_namespace(namespace)?;
    validate_segments(namespace, segments)?;
    encode_components(namespace, segments)
}

/// Decode a full composite key.
pub fn decode_key(bytes: &[u8]) -> Result<CompositeKey, KeyError> {
    CompositeKey::decode(bytes)
}

fn validate_namespace(namespace: &str) -> Result<(), KeyError> {
    if namespace.is_empty() {
        return Err(KeyError::InvalidSegment("namespace cannot be empty".to_string()));
    }
    Ok(())
}

fn validate_segments<S: AsRef<str>>(namespace: &str, segments: &[S]) -> Result<(), KeyError> {
    if let Some(idx) = segments.iter().position(|s| s.as_ref().is_empty()) {
        return Err(KeyError::InvalidSegment(format!(
            "segment {} of '{}' key is empty",
            idx, namespace
        )));
    }
    Ok(())
}

fn encode_components<S: AsRef<str>>(namespace: &str, segments: &[S]) -> Result<Vec<u8>, KeyError> {
    let mut buf = write_component(namespace)?;
    for segment in segments {
        buf.extend(write_component(segment.as_ref())?);
    }
    Ok(buf)
}

fn write_component(component: &str) -> Result<Vec<u8>, KeyError> {
    storekey::encode_vec(&component)
        .map_err(|e| KeyError::EncodingFailed(format!("{:?}", e)))
}

fn read_component(cursor: &mut Cursor<&[u8]>) -> Result<String, KeyError> {
    let start = cursor.position();
    storekey::decode(&mut *cursor).map_err(|e| {
        KeyError::MalformedKey(format!("undecodable component at byte {}: {:?}", start, e))
    })
}
