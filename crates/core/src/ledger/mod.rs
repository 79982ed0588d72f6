//! Ledger module - positions, transactions and the store contract.

mod ledger_calculator;
mod ledger_errors;
mod ledger_model;
mod ledger_traits;

pub use ledger_calculator::{compute_trade_effect, next_timestamp, stamp_total, TradeEffect};
pub use ledger_errors::LedgerError;
pub use ledger_model::{
    normalize_symbol, LedgerSnapshot, Position, TradeRequest, TradeSide,
    Transaction,
};
pub use ledger_traits::LedgerRepositoryTrait;
