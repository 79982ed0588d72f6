use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Market data quote as returned by a provider.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Quote {
    /// Symbol the quote was fetched for, as the provider knows it
    pub symbol: String,

    /// Timestamp of the quote
    pub timestamp: DateTime<Utc>,

    /// Closing/current price (required)
    pub close: Decimal,

    /// Adjusted close, when the provider reports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjclose: Option<Decimal>,

    /// Source of the quote (YAHOO, ...)
    pub source: String,
}

impl Quote {
    /// Create a new quote with minimal required fields
    pub fn new(symbol: String, timestamp: DateTime<Utc>, close: Decimal, source: String) -> Self {
        Self {
            symbol,
            timestamp,
            close,
            adjclose: None,
            source,
        }
    }

    /// Last traded price: the adjusted close when present, otherwise the close.
    pub fn last_price(&self) -> Decimal {
        self.adjclose.unwrap_or(self.close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_last_price_prefers_adjclose() {
        let mut quote = Quote::new(
            "AAPL".to_string(),
            Utc::now(),
            dec!(150.25),
            "YAHOO".to_string(),
        );
        assert_eq!(quote.last_price(), dec!(150.25));

        quote.adjclose = Some(dec!(149.80));
        assert_eq!(quote.last_price(), dec!(149.80));
    }
}
