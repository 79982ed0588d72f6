//! Market Data Client - Facade for the market-data crate.
//!
//! Adapts a `MarketDataProvider` to the ledger's `QuoteSourceTrait`:
//!
//! ```text
//! symbol ─▶ normalize ─▶ MarketDataProvider ─▶ market::Quote
//!                                                   │
//!            core::Quote ◀── validate + round ◀─────┘
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};
use rust_decimal::Decimal;

use crate::constants::PRICE_PRECISION;
use crate::errors::Result;
use crate::ledger::{normalize_symbol, LedgerError};
use crate::quotes::{Quote, QuoteSourceTrait};

use papertrade_market_data::{MarketDataProvider, Quote as MarketQuote, YahooProvider};

/// Quote source backed by a market data provider.
pub struct MarketDataClient {
    provider: Arc<dyn MarketDataProvider>,
}

impl MarketDataClient {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self { provider }
    }

    /// Client backed by the Yahoo Finance provider.
    pub fn yahoo() -> Result<Self> {
        let provider = YahooProvider::new()?;
        Ok(Self::new(Arc::new(provider)))
    }

    fn to_core_quote(symbol: String, quote: MarketQuote) -> Result<Quote> {
        let price = quote.last_price().round_dp(PRICE_PRECISION);
        if price <= Decimal::ZERO {
            return Err(LedgerError::InvalidPrice { symbol, price }.into());
        }
        Ok(Quote {
            symbol,
            price,
            timestamp: quote.timestamp,
        })
    }
}

#[async_trait]
impl QuoteSourceTrait for MarketDataClient {
    async fn lookup(&self, symbol: &str) -> Result<Quote> {
        let symbol = normalize_symbol(symbol)?;
        debug!("Looking up {} via {}", symbol, self.provider.id());

        let quote = self
            .provider
            .get_latest_quote(&symbol)
            .await
            .map_err(|e| {
                warn!("Quote lookup for {} failed: {}", symbol, e);
                e
            })?;

        Self::to_core_quote(symbol, quote)
    }
}
