//! Namespace and attribute names shared across crates.

/// Namespaces of the world-state keyspace.
///
/// Primary records live under their entity namespace, secondary index entries
/// under one namespace per indexed attribute.
pub struct Namespaces;

impl Namespaces {
    pub const USER: &'static str = "User";
    pub const DOCUMENT: &'static str = "Doc";
    pub const EMAIL_INDEX: &'static str = "Email";
    pub const DOC_NAME_INDEX: &'static str = "DocName";
}

/// Attribute names. These double as the JSON field names of the stored payloads.
pub struct AttributeNames;

impl AttributeNames {
    pub const USER_ID: &'static str = "userid";
    pub const EMAIL: &'static str = "email";
    pub const PASSWORD: &'static str = "pwd";
    pub const DOC_ID: &'static str = "docid";
    pub const DOC_NAME: &'static str = "docname";
    pub const DOC_TYPE: &'static str = "doctype";
    pub const TIMESTAMP: &'static str = "timestamp";
    pub const CONTENT_HASH: &'static str = "ipfshash";
}
