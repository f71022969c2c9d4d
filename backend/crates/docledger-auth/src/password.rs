// Password hashing and verification

use crate::error::{AuthError, AuthResult};
use bcrypt::{hash, verify, DEFAULT_COST};

/// Bcrypt cost factor used when none is configured.
pub const BCRYPT_COST: u32 = DEFAULT_COST;

/// Hash a password using bcrypt.
///
/// # Errors
/// Returns `AuthError::HashingError` if bcrypt fails (e.g. cost out of range)
pub fn hash_password(password: &str, cost: Option<u32>) -> AuthResult<String> {
    hash(password, cost.unwrap_or(BCRYPT_COST)).map_err(|e| AuthError::HashingError(e.to_string()))
}

/// Verify a password against a bcrypt hash.
///
/// Returns `Ok(true)` if the password matches, `Ok(false)` if not.
///
/// # Errors
/// Returns `AuthError::VerificationError` if the stored hash cannot be parsed
pub fn verify_password(password: &str, hash: &str) -> AuthResult<bool> {
    verify(password, hash).map_err(|e| AuthError::VerificationError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Keep the cost at the bcrypt minimum so tests stay fast
    const TEST_COST: u32 = 4;

    #[test]
    fn test_hash_and_verify() {
        let hashed = hash_password("S3cure!pass", Some(TEST_COST)).unwrap();
        assert_ne!(hashed, "S3cure!pass");
        assert!(hashed.starts_with("$2"));

        assert!(verify_password("S3cure!pass", &hashed).unwrap());
        assert!(!verify_password("wrong", &hashed).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same", Some(TEST_COST)).unwrap();
        let b = hash_password("same", Some(TEST_COST)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_invalid_cost() {
        let err = hash_password("pw", Some(3)).unwrap_err();
        assert!(matches!(err, AuthError::HashingError(_)));
    }

    #[test]
    fn test_malformed_hash() {
        let err = verify_password("pw", "plaintext").unwrap_err();
        assert!(matches!(err, AuthError::VerificationError(_)));
    }
}
