use crate::constants::AttributeNames;
use crate::entity::{Attributes, Entity, EntityKind};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A document registered by a user.
///
/// The document body lives elsewhere (content-addressed storage); the ledger keeps
/// only its metadata and `content_hash`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "userid")]
    pub user_id: String,
    #[serde(rename = "docid")]
    pub doc_id: String,
    #[serde(rename = "docname")]
    pub doc_name: String,
    #[serde(rename = "doctype")]
    pub doc_type: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "ipfshash")]
    pub content_hash: String,
}

impl Document {
    pub fn new(
        user_id: impl Into<String>,
        doc_id: impl Into<String>,
        doc_name: impl Into<String>,
        doc_type: impl Into<String>,
        timestamp: DateTime<Utc>,
        content_hash: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            doc_id: doc_id.into(),
            doc_name: doc_name.into(),
            doc_type: doc_type.into(),
            timestamp,
            content_hash: content_hash.into(),
        }
    }
}

impl Entity for Document {
    const KIND: EntityKind = EntityKind::Document;

    fn attributes(&self) -> Attributes {
        let mut attrs = Attributes::new();
        attrs.insert(AttributeNames::USER_ID.to_string(), self.user_id.clone());
        attrs.insert(AttributeNames::DOC_ID.to_string(), self.doc_id.clone());
        attrs.insert(AttributeNames::DOC_NAME.to_string(), self.doc_name.clone());
        attrs.insert(AttributeNames::DOC_TYPE.to_string(), self.doc_type.clone());
        attrs.insert(
            AttributeNames::TIMESTAMP.to_string(),
            self.timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        );
        attrs.insert(AttributeNames::CONTENT_HASH.to_string(), self.content_hash.clone());
        attrs
    }
}
