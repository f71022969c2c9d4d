//! JSON payload codec for records stored under primary keys.

use crate::error::{EntityError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub fn serialize_payload<P: Serialize + ?Sized>(payload: &P) -> Result<Vec<u8>> {
    serde_json::to_vec(payload).map_err(|e| EntityError::SerializationError(e.to_string()))
}

pub fn deserialize_payload<V: DeserializeOwned>(bytes: &[u8]) -> Result<V> {
    serde_json::from_slice(bytes).map_err(|e| EntityError::SerializationError(e.to_string()))
}
