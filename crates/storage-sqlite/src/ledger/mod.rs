//! SQLite storage implementation for the ledger: positions and transactions.

mod model;
mod repository;

pub use model::{NewTransactionDB, PositionDB, TransactionDB};
pub use repository::LedgerRepository;
