//! Email + password authentication over the user index.

use crate::error::{AuthError, AuthResult};
use crate::repository::UserRepository;
use crate::verifier::CredentialVerifier;
use std::sync::Arc;

pub struct AuthGate {
    users: Arc<dyn UserRepository>,
    verifier: Arc<dyn CredentialVerifier>,
}

impl AuthGate {
    pub fn new(users: Arc<dyn UserRepository>, verifier: Arc<dyn CredentialVerifier>) -> Self {
        Self { users, verifier }
    }

    pub fn verifier(&self) -> &Arc<dyn CredentialVerifier> {
        &self.verifier
    }

    /// Check `candidate` against the credential stored for `email`.
    ///
    /// Returns `Ok(true)` on a match. A wrong password is `InvalidCredential`,
    /// never `Ok(false)`. When several users share the email, the first in index
    /// order is checked. An empty email is rejected by the lookup with
    /// `AuthError::Entity(InvalidSegment)` rather than `NotFound`.
    pub fn authenticate(&self, email: &str, candidate: &str) -> AuthResult<bool> {
        let users = self.users.users_by_email(email)?;

        let user = match users.first() {
            Some(user) => user,
            None => return Err(AuthError::NotFound(email.to_string())),
        };
        if users.len() > 1 {
            log::warn!(
                "{} users share email '{}', authenticating as {}",
                users.len(),
                email,
                user.user_id
            );
        }

        match self.verifier.verify(&user.pwd, candidate) {
            Ok(true) => {
                log::debug!("Authenticated user {}", user.user_id);
                Ok(true)
            }
            Ok(false) => {
                log::debug!("Rejected credentials for user {}", user.user_id);
                Err(AuthError::InvalidCredential)
            }
            Err(e @ AuthError::VerificationError(_)) => Err(e),
            Err(e) => Err(AuthError::VerificationError(e.to_string())),
        }
    }
}
