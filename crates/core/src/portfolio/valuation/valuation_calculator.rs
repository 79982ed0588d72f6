use std::collections::{BTreeMap, BTreeSet, HashMap};

use rust_decimal::Decimal;

use super::valuation_model::{Holding, NetWorthPoint};
use crate::ledger::{LedgerError, Position, Transaction};
use crate::utils::time_utils::trading_date;

/// Cash plus the market value of every `(symbol, quantity)` pair at `marks`.
///
/// Fails with `UnpricedPositions` naming every symbol without a mark rather
/// than valuing it at zero.
pub fn mark_to_market<'a, I>(
    cash: Decimal,
    positions: I,
    marks: &HashMap<String, Decimal>,
) -> Result<Decimal, LedgerError>
where
    I: IntoIterator<Item = (&'a str, i64)>,
{
    let mut total = cash;
    let mut unpriced = BTreeSet::new();

    for (symbol, quantity) in positions {
        match marks.get(symbol) {
            Some(price) => total += *price * Decimal::from(quantity),
            None => {
                unpriced.insert(symbol.to_string());
            }
        }
    }

    if unpriced.is_empty() {
        Ok(total)
    } else {
        Err(LedgerError::UnpricedPositions {
            symbols: unpriced.into_iter().collect(),
        })
    }
}

/// Marks each position at `prices`, ordered by symbol.
pub fn value_holdings(
    positions: &[Position],
    prices: &HashMap<String, Decimal>,
) -> Result<Vec<Holding>, LedgerError> {
    let mut holdings = Vec::with_capacity(positions.len());
    let mut unpriced = Vec::new();

    for position in positions {
        match prices.get(&position.symbol) {
            Some(price) => holdings.push(Holding {
                symbol: position.symbol.clone(),
                quantity: position.quantity,
                price: *price,
                market_value: *price * Decimal::from(position.quantity),
            }),
            None => unpriced.push(position.symbol.clone()),
        }
    }

    if !unpriced.is_empty() {
        unpriced.sort();
        return Err(LedgerError::UnpricedPositions { symbols: unpriced });
    }

    holdings.sort_by(|a, b| a.symbol.cmp(&b.symbol));
    Ok(holdings)
}

/// Reduces transactions to one point per calendar date, the latest
/// transaction of each day winning. Input order does not matter; output is
/// ascending by date. Days without a transaction are left out.
pub fn daily_series(transactions: &[Transaction]) -> Vec<NetWorthPoint> {
    let mut by_date: BTreeMap<_, (chrono::NaiveDateTime, i64, Decimal)> = BTreeMap::new();

    for tx in transactions {
        let date = trading_date(tx.transacted_at);
        let key = (tx.transacted_at, tx.id, tx.total);
        by_date
            .entry(date)
            .and_modify(|current| {
                if (key.0, key.1) > (current.0, current.1) {
                    *current = key;
                }
            })
            .or_insert(key);
    }

    by_date
        .into_iter()
        .map(|(date, (_, _, total))| NetWorthPoint { date, total })
        .collect()
}
