//! # docledger-auth
//!
//! Credential hashing and the email/password gate.
//!
//! - [`CredentialVerifier`] hashes and checks credentials ([`BcryptVerifier`] by default)
//! - [`UserRepository`] finds users by email (implemented for the store's `QueryEngine`)
//! - [`AuthGate`] ties the two together

pub mod error;
pub mod gate;
pub mod password;
pub mod repository;
pub mod verifier;

pub use error::{AuthError, AuthResult};
pub use gate::AuthGate;
pub use password::{hash_password, verify_password, BCRYPT_COST};
pub use repository::UserRepository;
pub use verifier::{BcryptVerifier, CredentialVerifier};
