//! Papertrade Core - Domain entities, services, and traits.
//!
//! This crate contains the ledger and valuation logic of the brokerage
//! simulator. It is database-agnostic and defines traits that are
//! implemented by the `storage-sqlite` and `market-data` crates.

pub mod accounts;
pub mod constants;
pub mod errors;
pub mod ledger;
pub mod portfolio;
pub mod quotes;
pub mod trading;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export common types from the ledger and portfolio modules
pub use ledger::*;
pub use portfolio::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
