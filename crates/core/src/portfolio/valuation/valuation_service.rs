use crate::errors::Result as CoreResult;
use crate::ledger::{LedgerError, LedgerRepositoryTrait};
use crate::portfolio::valuation::valuation_calculator::{daily_series, value_holdings};
use crate::portfolio::valuation::valuation_model::{NetWorthPoint, PortfolioValuation};
use crate::quotes::{QuoteCache, QuoteSourceTrait};
use crate::utils::time_utils;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use log::{debug, warn};
use rust_decimal::Decimal;
use std::sync::Arc;

#[async_trait]
pub trait ValuationServiceTrait: Send + Sync {
    /// Values every position of the account at its latest quote.
    ///
    /// Args:
    ///     account_id: The ID of the account.
    ///
    /// Returns:
    ///     The cash balance, the marked holdings and their sum. Fails with
    ///     `PartialQuoteFailure` if any held symbol cannot be quoted.
    async fn current_valuation(&self, account_id: &str) -> CoreResult<PortfolioValuation>;

    /// Live net worth: cash plus every position at its latest quote.
    async fn current_total(&self, account_id: &str) -> CoreResult<Decimal>;

    /// Stamped transaction totals at or after `since`, one point per
    /// calendar date, ascending.
    fn historical_series(
        &self,
        account_id: &str,
        since: NaiveDateTime,
    ) -> CoreResult<Vec<NetWorthPoint>>;
}

#[derive(Clone)]
pub struct ValuationService {
    ledger: Arc<dyn LedgerRepositoryTrait>,
    quote_source: Arc<dyn QuoteSourceTrait>,
}

impl ValuationService {
    pub fn new(
        ledger: Arc<dyn LedgerRepositoryTrait>,
        quote_source: Arc<dyn QuoteSourceTrait>,
    ) -> Self {
        Self {
            ledger,
            quote_source,
        }
    }
}

#[async_trait]
impl ValuationServiceTrait for ValuationService {
    async fn current_valuation(&self, account_id: &str) -> CoreResult<PortfolioValuation> {
        let snapshot = self.ledger.get_snapshot(account_id)?;

        let mut cache = QuoteCache::new(Arc::clone(&self.quote_source));
        if let Err(e) = cache
            .fetch_all(snapshot.positions.iter().map(|p| p.symbol.as_str()))
            .await
        {
            warn!("Valuation of account {} aborted: {}", account_id, e);
            return Err(e.into());
        }

        let holdings = value_holdings(&snapshot.positions, &cache.into_prices()).map_err(
            |e| match e {
                LedgerError::UnpricedPositions { symbols } => {
                    LedgerError::PartialQuoteFailure { symbols }
                }
                other => other,
            },
        )?;
        let total = snapshot.cash + holdings.iter().map(|h| h.market_value).sum::<Decimal>();

        debug!(
            "Account {} valued at {} ({} holdings)",
            account_id,
            total,
            holdings.len()
        );

        Ok(PortfolioValuation {
            account_id: snapshot.account_id,
            cash: snapshot.cash,
            holdings,
            total,
            valued_at: time_utils::utc_now(),
        })
    }

    async fn current_total(&self, account_id: &str) -> CoreResult<Decimal> {
        Ok(self.current_valuation(account_id).await?.total)
    }

    fn historical_series(
        &self,
        account_id: &str,
        since: NaiveDateTime,
    ) -> CoreResult<Vec<NetWorthPoint>> {
        let transactions = self.ledger.get_transactions_since(account_id, since)?;
        Ok(daily_series(&transactions))
    }
}
