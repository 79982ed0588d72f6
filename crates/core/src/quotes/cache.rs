//! Per-call quote memo.
//!
//! A `QuoteCache` lives for a single valuation or trade so that each symbol
//! is looked up at most once within it. It is never shared across calls.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use futures::future::join_all;
use log::warn;
use rust_decimal::Decimal;

use crate::ledger::LedgerError;
use crate::quotes::QuoteSourceTrait;

pub struct QuoteCache {
    source: Arc<dyn QuoteSourceTrait>,
    prices: HashMap<String, Decimal>,
}

impl QuoteCache {
    pub fn new(source: Arc<dyn QuoteSourceTrait>) -> Self {
        Self {
            source,
            prices: HashMap::new(),
        }
    }

    /// Records a price obtained elsewhere, e.g. the execution price of a trade.
    pub fn seed(&mut self, symbol: &str, price: Decimal) {
        self.prices.insert(symbol.to_string(), price);
    }

    pub fn get(&self, symbol: &str) -> Option<Decimal> {
        self.prices.get(symbol).copied()
    }

    /// Fetches every symbol not already cached, concurrently.
    ///
    /// Fails with `PartialQuoteFailure` naming every symbol whose lookup
    /// failed; successful lookups stay cached either way.
    pub async fn fetch_all<'a, I>(&mut self, symbols: I) -> Result<(), LedgerError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let missing: BTreeSet<&str> = symbols
            .into_iter()
            .filter(|s| !self.prices.contains_key(*s))
            .collect();
        if missing.is_empty() {
            return Ok(());
        }

        let lookups = missing.iter().map(|symbol| {
            let source = Arc::clone(&self.source);
            async move { (*symbol, source.lookup(symbol).await) }
        });

        let mut failed = Vec::new();
        for (symbol, result) in join_all(lookups).await {
            match result {
                Ok(quote) => {
                    self.prices.insert(symbol.to_string(), quote.price);
                }
                Err(e) => {
                    warn!("No quote for {} while valuing: {}", symbol, e);
                    failed.push(symbol.to_string());
                }
            }
        }

        if failed.is_empty() {
            Ok(())
        } else {
            Err(LedgerError::PartialQuoteFailure { symbols: failed })
        }
    }

    pub fn into_prices(self) -> HashMap<String, Decimal> {
        self.prices
    }
}
