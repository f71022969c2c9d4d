use docledger_store::EntityError;
use thiserror::Error;

/// Errors raised while hashing or checking credentials
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("No user registered with email '{0}'")]
    NotFound(String),

    #[error("Invalid credentials")]
    InvalidCredential,

    #[error("Credential verification failed: {0}")]
    VerificationError(String),

    #[error("Password hashing failed: {0}")]
    HashingError(String),

    #[error(transparent)]
    Entity(#[from] EntityError),
}

/// Result type for auth operations
pub type AuthResult<T> = std::result::Result<T, AuthError>;
