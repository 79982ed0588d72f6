//! Ledger domain models.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::ledger_errors::LedgerError;
use crate::errors::{Error, Result, ValidationError};

/// Direction of a requested trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeSide {
    Buy,
    Sell,
}

/// Shares of one symbol held by an account. Only positive quantities are
/// ever stored; a missing position means zero shares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub account_id: String,
    pub symbol: String,
    pub quantity: i64,
}

/// Immutable record of one executed trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    pub account_id: String,
    pub symbol: String,
    /// Signed share delta: positive for a buy, negative for a sell
    pub shares: i64,
    /// Execution price per share
    pub price: Decimal,
    /// Account net worth right after the trade, marked at the execution price
    /// for `symbol` and the latest quotes for everything else held
    pub total: Decimal,
    pub transacted_at: NaiveDateTime,
}

impl Transaction {
    /// Cash moved by this trade (always non-negative).
    pub fn gross_amount(&self) -> Decimal {
        self.price * Decimal::from(self.shares.unsigned_abs())
    }
}

/// Cash and positions of an account, read together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSnapshot {
    pub account_id: String,
    pub cash: Decimal,
    pub positions: Vec<Position>,
}

impl LedgerSnapshot {
    pub fn quantity_of(&self, symbol: &str) -> i64 {
        self.positions
            .iter()
            .find(|p| p.symbol == symbol)
            .map(|p| p.quantity)
            .unwrap_or(0)
    }
}

/// Input to `LedgerRepositoryTrait::apply_trade`.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeRequest {
    pub account_id: String,
    pub symbol: String,
    /// Signed share delta: positive for a buy, negative for a sell
    pub shares: i64,
    /// Execution price per share
    pub price: Decimal,
    /// Latest known prices for the other symbols the account holds, used to
    /// stamp the transaction total. The traded symbol is always marked at
    /// `price`, whatever this map says.
    pub marks: HashMap<String, Decimal>,
    pub transacted_at: NaiveDateTime,
}

impl TradeRequest {
    /// Cash this trade moves, before any balance check. `None` when the
    /// amount does not fit a `Decimal`.
    pub fn gross_amount(&self) -> Option<Decimal> {
        self.price
            .checked_mul(Decimal::from(self.shares.unsigned_abs()))
    }

    /// Checks the request on its own, without looking at account state.
    pub fn validate(&self) -> std::result::Result<(), LedgerError> {
        // i64::MIN has no positive counterpart to sell.
        if self.shares == 0 || self.shares == i64::MIN {
            return Err(LedgerError::InvalidQuantity(self.shares));
        }
        if self.price <= Decimal::ZERO {
            return Err(LedgerError::InvalidPrice {
                symbol: self.symbol.clone(),
                price: self.price,
            });
        }
        Ok(())
    }
}

/// Trims and upper-cases a ticker symbol.
pub fn normalize_symbol(symbol: &str) -> Result<String> {
    let normalized = symbol.trim().to_uppercase();
    if normalized.is_empty() {
        return Err(Error::Validation(ValidationError::MissingField(
            "symbol".to_string(),
        )));
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn request(shares: i64, price: Decimal) -> TradeRequest {
        TradeRequest {
            account_id: "acc-1".to_string(),
            symbol: "AAPL".to_string(),
            shares,
            price,
            marks: HashMap::new(),
            transacted_at: NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_opt(15, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_normalize_symbol() {
        assert_eq!(normalize_symbol("  aapl ").unwrap(), "AAPL");
        assert!(normalize_symbol("   ").is_err());
    }

    #[test]
    fn test_request_validation() {
        assert!(request(10, dec!(50)).validate().is_ok());
        assert_eq!(
            request(0, dec!(50)).validate(),
            Err(LedgerError::InvalidQuantity(0))
        );
        assert_eq!(
            request(i64::MIN, dec!(50)).validate(),
            Err(LedgerError::InvalidQuantity(i64::MIN))
        );
        assert!(request(i64::MAX, dec!(50)).validate().is_ok());
        assert!(matches!(
            request(5, dec!(0)).validate(),
            Err(LedgerError::InvalidPrice { .. })
        ));
        assert!(matches!(
            request(-5, dec!(-1)).validate(),
            Err(LedgerError::InvalidPrice { .. })
        ));
    }

    #[test]
    fn test_gross_amount() {
        assert_eq!(request(10, dec!(50)).gross_amount(), Some(dec!(500)));
        assert_eq!(request(-4, dec!(60)).gross_amount(), Some(dec!(240)));
        assert_eq!(request(i64::MAX, Decimal::MAX).gross_amount(), None);
    }

    #[test]
    fn test_snapshot_quantity_of_missing_symbol_is_zero() {
        let snapshot = LedgerSnapshot {
            account_id: "acc-1".to_string(),
            cash: dec!(100),
            positions: vec![Position {
                account_id: "acc-1".to_string(),
                symbol: "MSFT".to_string(),
                quantity: 3,
            }],
        };
        assert_eq!(snapshot.quantity_of("MSFT"), 3);
        assert_eq!(snapshot.quantity_of("AAPL"), 0);
    }
}
