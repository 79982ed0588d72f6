use rust_decimal::Decimal;
use thiserror::Error;

/// Caller-visible failures of trade execution and valuation.
///
/// Each variant is distinct so the consumer can map it to its own message;
/// none of them is ever clamped or swallowed by the ledger.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("Invalid quantity: {0}. Share counts must be positive whole numbers")]
    InvalidQuantity(i64),

    #[error("Invalid price for {symbol}: {price}")]
    InvalidPrice { symbol: String, price: Decimal },

    #[error("Quote unavailable for {0}")]
    QuoteUnavailable(String),

    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds {
        required: Decimal,
        available: Decimal,
    },

    #[error("Insufficient shares of {symbol}: requested {requested}, held {held}")]
    InsufficientShares {
        symbol: String,
        requested: i64,
        held: i64,
    },

    #[error("Quote lookup failed while valuing: {}", symbols.join(", "))]
    PartialQuoteFailure { symbols: Vec<String> },

    /// Raised by a store when a held symbol has no mark to stamp the
    /// transaction total with.
    #[error("No mark supplied for held symbols: {}", symbols.join(", "))]
    UnpricedPositions { symbols: Vec<String> },

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Ledger unavailable: {0}")]
    LedgerUnavailable(String),
}
