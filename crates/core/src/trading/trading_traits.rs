use async_trait::async_trait;

use crate::errors::Result;
use crate::ledger::Transaction;

/// Trait defining the contract for trade execution.
#[async_trait]
pub trait TradeServiceTrait: Send + Sync {
    /// Buys `shares` of `symbol` at its current quote.
    ///
    /// Fails with `QuoteUnavailable`, `InvalidQuantity`, `InsufficientFunds`,
    /// `PartialQuoteFailure` or `LedgerUnavailable`; account state is left
    /// unchanged on every failure.
    async fn buy(&self, account_id: &str, symbol: &str, shares: i64) -> Result<Transaction>;

    /// Sells `shares` of `symbol` at its current quote.
    ///
    /// Same failures as `buy`, with `InsufficientShares` in place of
    /// `InsufficientFunds`.
    async fn sell(&self, account_id: &str, symbol: &str, shares: i64) -> Result<Transaction>;
}
