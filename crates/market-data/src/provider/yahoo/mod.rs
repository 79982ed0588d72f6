//! Yahoo Finance market data provider.
//!
//! Looks up the last week of daily bars for a symbol and reports the most
//! recent adjusted close as the last traded price.

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use time::OffsetDateTime;
use tracing::{debug, warn};
use yahoo_finance_api as yahoo;

use crate::errors::MarketDataError;
use crate::models::Quote;
use crate::provider::MarketDataProvider;

const PROVIDER_ID: &str = "YAHOO";

/// Number of calendar days of daily history requested per lookup. A week
/// always spans at least one trading session, even over long weekends.
const LOOKBACK_DAYS: i64 = 7;

// ============================================================================
// Yahoo Provider
// ============================================================================

/// Yahoo Finance market data provider.
pub struct YahooProvider {
    connector: yahoo::YahooConnector,
}

impl YahooProvider {
    /// Create a new Yahoo Finance provider.
    pub fn new() -> Result<Self, MarketDataError> {
        let connector =
            yahoo::YahooConnector::new().map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to initialize Yahoo connector: {}", e),
            })?;
        Ok(Self { connector })
    }

    fn chrono_to_offset_datetime(dt: DateTime<Utc>) -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(dt.timestamp())
            .unwrap_or_else(|_| OffsetDateTime::now_utc())
    }

    /// Convert a Yahoo quote to our Quote model.
    fn yahoo_quote_to_quote(
        &self,
        symbol: &str,
        yahoo_quote: yahoo::Quote,
    ) -> Result<Quote, MarketDataError> {
        let timestamp: DateTime<Utc> = Utc
            .timestamp_opt(yahoo_quote.timestamp as i64, 0)
            .single()
            .ok_or_else(|| MarketDataError::ValidationFailed {
                message: format!("Invalid timestamp: {}", yahoo_quote.timestamp),
            })?;

        let close = Decimal::from_f64_retain(yahoo_quote.close).ok_or_else(|| {
            MarketDataError::ValidationFailed {
                message: format!(
                    "Failed to convert close price {} to Decimal",
                    yahoo_quote.close
                ),
            }
        })?;

        Ok(Quote {
            symbol: symbol.to_string(),
            timestamp,
            close,
            adjclose: Decimal::from_f64_retain(yahoo_quote.adjclose),
            source: PROVIDER_ID.to_string(),
        })
    }

    fn map_yahoo_error(symbol: &str, e: yahoo::YahooError) -> MarketDataError {
        if matches!(e, yahoo::YahooError::NoQuotes | yahoo::YahooError::NoResult) {
            MarketDataError::SymbolNotFound(symbol.to_string())
        } else {
            MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: e.to_string(),
            }
        }
    }
}

/// Picks the most recent quote out of a daily history.
fn select_latest(quotes: Vec<Quote>) -> Option<Quote> {
    quotes.into_iter().max_by_key(|q| q.timestamp)
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn get_latest_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        let end = Utc::now();
        let start = end - Duration::days(LOOKBACK_DAYS);

        debug!(
            "Fetching latest quote for {} from Yahoo ({} to {})",
            symbol,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        );

        let response = self
            .connector
            .get_quote_history(
                symbol,
                Self::chrono_to_offset_datetime(start),
                Self::chrono_to_offset_datetime(end),
            )
            .await
            .map_err(|e| Self::map_yahoo_error(symbol, e))?;

        let yahoo_quotes = response
            .quotes()
            .map_err(|e| Self::map_yahoo_error(symbol, e))?;

        let quotes: Vec<Quote> = yahoo_quotes
            .into_iter()
            .filter_map(|q| match self.yahoo_quote_to_quote(symbol, q) {
                Ok(quote) => Some(quote),
                Err(e) => {
                    warn!("Skipping quote for {} due to conversion error: {:?}", symbol, e);
                    None
                }
            })
            .collect();

        select_latest(quotes).ok_or(MarketDataError::NoDataForRange)
    }
}

// ============================================================================
// Tests
// ============================================================================
