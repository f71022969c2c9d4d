use docledger_auth::AuthError;
use docledger_store::{EntityError, StorageError};
use thiserror::Error;

/// Errors surfaced by the ledger facade
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error(transparent)]
    Entity(#[from] EntityError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;

impl From<StorageError> for LedgerError {
    fn from(err: StorageError) -> Self {
        LedgerError::Entity(EntityError::StoreUnavailable(err))
    }
}
