use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One position marked to market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub symbol: String,
    pub quantity: i64,
    pub price: Decimal,
    pub market_value: Decimal,
}

/// Live valuation of an account: cash plus every holding at its latest quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioValuation {
    pub account_id: String,
    pub cash: Decimal,
    /// Ordered by symbol
    pub holdings: Vec<Holding>,
    pub total: Decimal,
    pub valued_at: NaiveDateTime,
}

/// Net worth recorded on a calendar date (the last transaction of that day).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetWorthPoint {
    pub date: NaiveDate,
    pub total: Decimal,
}
