//! Ledger store trait.
//!
//! This trait defines the contract for the ledger store without any
//! database-specific types, allowing for different storage implementations.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use super::ledger_model::{LedgerSnapshot, Position, Transaction, TradeRequest};
use crate::errors::Result;

/// Trait defining the contract for the ledger store.
///
/// Implementations own the atomicity of trade writes: the cash update, the
/// position upsert or delete and the transaction insert of one
/// `apply_trade` call either all commit or none do.
#[async_trait]
pub trait LedgerRepositoryTrait: Send + Sync {
    /// Current cash balance of an account.
    ///
    /// Fails with `LedgerError::AccountNotFound` for an unknown account.
    fn get_cash(&self, account_id: &str) -> Result<Decimal>;

    /// Shares of `symbol` held by the account, 0 when there is no position.
    fn get_position(&self, account_id: &str, symbol: &str) -> Result<i64>;

    /// All positions of the account, ordered by symbol.
    fn get_positions(&self, account_id: &str) -> Result<Vec<Position>>;

    /// Cash and positions read from one consistent snapshot.
    fn get_snapshot(&self, account_id: &str) -> Result<LedgerSnapshot>;

    /// Atomically applies a trade and records its transaction.
    ///
    /// Re-validates the balances under the store's own write lock, rejecting
    /// with `InsufficientFunds` / `InsufficientShares` / `InvalidQuantity` /
    /// `InvalidPrice` and leaving state unchanged on any failure. The
    /// recorded timestamp is strictly greater than the account's previous one.
    async fn apply_trade(&self, request: TradeRequest) -> Result<Transaction>;

    /// Every transaction of the account, newest first. Fails with
    /// `AccountNotFound` for an unknown account.
    fn get_transactions(&self, account_id: &str) -> Result<Vec<Transaction>>;

    /// Transactions at or after `since`, oldest first. Fails with
    /// `AccountNotFound` for an unknown account.
    fn get_transactions_since(
        &self,
        account_id: &str,
        since: NaiveDateTime,
    ) -> Result<Vec<Transaction>>;
}
