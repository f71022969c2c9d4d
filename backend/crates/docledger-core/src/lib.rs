//! # docledger-core
//!
//! The [`DocLedger`] facade ties the world-state crates together:
//!
//! ```text
//! docledger-core
//!     ├── docledger-auth     credential hashing, AuthGate
//!     ├── docledger-store    backends, registry, indexes, queries
//!     ├── docledger-configs  LedgerConfig
//!     └── docledger-commons  composite keys, User / Document
//! ```
//!
//! ## Example
//!
//! ```rust
//! use docledger_configs::LedgerConfig;
//! use docledger_core::DocLedger;
//!
//! let mut config = LedgerConfig::default();
//! config.auth.bcrypt_cost = 4;
//! let ledger = DocLedger::open(&config).unwrap();
//!
//! ledger.create_user("u1", "a@x.io", "pw").unwrap();
//! assert!(ledger.authenticate("a@x.io", "pw").unwrap());
//! ```

pub mod error;
pub mod ledger;
pub mod logging;

pub use error::{LedgerError, Result};
pub use ledger::DocLedger;
pub use logging::{init_logging, LogFormat};
