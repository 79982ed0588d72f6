//! Pure trade arithmetic shared by every ledger store.
//!
//! Stores call these inside their own atomic write so that the balance
//! checks run against the state that is actually committed.

use chrono::{Duration, NaiveDateTime};
use rust_decimal::Decimal;

use super::ledger_errors::LedgerError;
use super::ledger_model::{Position, TradeRequest};
use crate::portfolio::valuation::mark_to_market;

/// Cash and share quantity of the traded symbol after a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeEffect {
    pub cash_after: Decimal,
    pub quantity_after: i64,
}

/// Applies `request` to the current cash balance and held quantity.
///
/// Fails without partial fills when cash or shares would go negative.
pub fn compute_trade_effect(
    cash: Decimal,
    held: i64,
    request: &TradeRequest,
) -> Result<TradeEffect, LedgerError> {
    request.validate()?;

    let overflow = || LedgerError::InvalidQuantity(request.shares);
    let amount = request.gross_amount().ok_or_else(overflow)?;
    if request.shares > 0 {
        if cash < amount {
            return Err(LedgerError::InsufficientFunds {
                required: amount,
                available: cash,
            });
        }
        let quantity_after = held.checked_add(request.shares).ok_or_else(overflow)?;
        Ok(TradeEffect {
            cash_after: cash - amount,
            quantity_after,
        })
    } else {
        let requested = request.shares.checked_neg().ok_or_else(overflow)?;
        if held < requested {
            return Err(LedgerError::InsufficientShares {
                symbol: request.symbol.clone(),
                requested,
                held,
            });
        }
        Ok(TradeEffect {
            cash_after: cash.checked_add(amount).ok_or_else(overflow)?,
            quantity_after: held - requested,
        })
    }
}

/// Net worth to stamp on the transaction: `cash_after` plus every position
/// after the trade, the traded symbol marked at the execution price and the
/// rest at the request's marks.
pub fn stamp_total(
    cash_after: Decimal,
    positions_after: &[Position],
    request: &TradeRequest,
) -> Result<Decimal, LedgerError> {
    let mut marks = request.marks.clone();
    marks.insert(request.symbol.clone(), request.price);
    mark_to_market(
        cash_after,
        positions_after
            .iter()
            .map(|p| (p.symbol.as_str(), p.quantity)),
        &marks,
    )
}

/// Keeps transaction timestamps strictly increasing per account: a requested
/// time at or before the last recorded one is moved one microsecond past it.
pub fn next_timestamp(requested: NaiveDateTime, last: Option<NaiveDateTime>) -> NaiveDateTime {
    match last {
        Some(last) if requested <= last => last + Duration::microseconds(1),
        _ => requested,
    }
}
