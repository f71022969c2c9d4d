//! Pluggable credential hashing.

use crate::error::AuthResult;
use crate::password::{hash_password, verify_password};

/// Hashes new credentials and checks candidates against stored hashes.
///
/// `verify` returns `Ok(false)` for a wrong candidate and `Err` only when the
/// stored value cannot be checked at all.
pub trait CredentialVerifier: Send + Sync {
    fn hash(&self, password: &str) -> AuthResult<String>;

    fn verify(&self, stored_hash: &str, candidate: &str) -> AuthResult<bool>;
}

/// bcrypt-backed verifier.
#[derive(Debug, Clone, Copy)]
pub struct BcryptVerifier {
    cost: u32,
}

impl BcryptVerifier {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptVerifier {
    fn default() -> Self {
        Self::new(crate::password::BCRYPT_COST)
    }
}

impl CredentialVerifier for BcryptVerifier {
    fn hash(&self, password: &str) -> AuthResult<String> {
        hash_password(password, Some(self.cost))
    }

    fn verify(&self, stored_hash: &str, candidate: &str) -> AuthResult<bool> {
        verify_password(candidate, stored_hash)
    }
}
