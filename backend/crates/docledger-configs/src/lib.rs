//! docledger-configs
//!
//! Configuration types and loader for DocLedger.

pub mod config;

pub use config::*;
