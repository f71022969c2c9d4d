use crate::constants::AttributeNames;
use crate::entity::{Attributes, Entity, EntityKind};
use serde::{Deserialize, Serialize};

/// A registered account.
///
/// `pwd` holds the stored credential hash, never the plain password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "userid")]
    pub user_id: String,
    pub email: String,
    pub pwd: String,
}

impl User {
    pub fn new(
        user_id: impl Into<String>,
        email: impl Into<String>,
        pwd: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            email: email.into(),
            pwd: pwd.into(),
        }
    }
}

impl Entity for User {
    const KIND: EntityKind = EntityKind::User;

    fn attributes(&self) -> Attributes {
        let mut attrs = Attributes::new();
        attrs.insert(AttributeNames::USER_ID.to_string(), self.user_id.clone());
        attrs.insert(AttributeNames::EMAIL.to_string(), self.email.clone());
        attrs
    }
}
