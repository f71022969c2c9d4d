use crate::storage_trait::StorageError;
use docledger_commons::{EntityKind, KeyError};
use thiserror::Error;

/// Errors raised by the index and query layers
#[derive(Error, Debug)]
pub enum EntityError {
    #[error("Invalid segment: {0}")]
    InvalidSegment(String),

    #[error("{kind} is missing attribute '{attribute}'")]
    MissingAttribute { kind: EntityKind, attribute: String },

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] StorageError),

    #[error("{kind} has no index on '{attribute}'")]
    UnknownIndex { kind: EntityKind, attribute: String },

    #[error("No unused id found after {0} attempts")]
    ExhaustedAttempts(u32),
}

/// Result type for entity operations
pub type Result<T> = std::result::Result<T, EntityError>;

impl From<KeyError> for EntityError {
    fn from(err: KeyError) -> Self {
        match err {
            KeyError::InvalidSegment(msg) => EntityError::InvalidSegment(msg),
            KeyError::MalformedKey(msg) | KeyError::EncodingFailed(msg) => {
                EntityError::SerializationError(msg)
            }
        }
    }
}
