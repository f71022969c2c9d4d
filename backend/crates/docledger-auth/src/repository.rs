use docledger_commons::{AttributeNames, User};
use docledger_store::{EntityError, QueryEngine};

/// Abstraction over user lookup for authentication.
///
/// Returns every user registered with the email, in index order (email, then
/// user id). An empty result is `Ok(vec![])`, not an error.
pub trait UserRepository: Send + Sync {
    fn users_by_email(&self, email: &str) -> Result<Vec<User>, EntityError>;
}

impl UserRepository for QueryEngine {
    fn users_by_email(&self, email: &str) -> Result<Vec<User>, EntityError> {
        match self.get_by_attribute::<User>(AttributeNames::EMAIL, email) {
            Ok(users) => Ok(users),
            Err(EntityError::NotFound(_)) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }
}
