use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use log::debug;
use rust_decimal::Decimal;

use super::performance_calculator::{compare_totals, daily_changes};
use super::performance_model::{PerformanceSummary, TimeWindow};
use crate::errors::Result;
use crate::portfolio::valuation::ValuationServiceTrait;
use crate::utils::time_utils;

#[async_trait]
pub trait PerformanceServiceTrait: Send + Sync {
    /// Net-worth series, gain/loss and percent change over `window`, ending now.
    async fn analyze(&self, account_id: &str, window: TimeWindow) -> Result<PerformanceSummary>;

    /// Same as `analyze`, with the window ending at `now`.
    async fn analyze_at(
        &self,
        account_id: &str,
        window: TimeWindow,
        now: NaiveDateTime,
    ) -> Result<PerformanceSummary>;
}

pub struct PerformanceService {
    valuation_service: Arc<dyn ValuationServiceTrait>,
}

impl PerformanceService {
    pub fn new(valuation_service: Arc<dyn ValuationServiceTrait>) -> Self {
        Self { valuation_service }
    }
}

#[async_trait]
impl PerformanceServiceTrait for PerformanceService {
    async fn analyze(&self, account_id: &str, window: TimeWindow) -> Result<PerformanceSummary> {
        self.analyze_at(account_id, window, time_utils::utc_now())
            .await
    }

    async fn analyze_at(
        &self,
        account_id: &str,
        window: TimeWindow,
        now: NaiveDateTime,
    ) -> Result<PerformanceSummary> {
        let since = window.since(now);
        let series = self
            .valuation_service
            .historical_series(account_id, since)?;
        let daily_changes = daily_changes(&series);

        // Fewer than two points: nothing to compare, and no live valuation.
        if series.len() < 2 {
            debug!(
                "Account {} has {} point(s) in {}; reporting no change",
                account_id,
                series.len(),
                window
            );
            return Ok(PerformanceSummary {
                account_id: account_id.to_string(),
                window,
                since,
                series,
                daily_changes,
                gain_loss: Decimal::ZERO,
                percent_change: Some(Decimal::ZERO),
                current_total: None,
            });
        }

        let earliest = series[0].total;
        let latest = self.valuation_service.current_total(account_id).await?;
        let (gain_loss, percent_change) = compare_totals(earliest, latest);

        debug!(
            "Account {} over {}: {} -> {} ({:?}%)",
            account_id, window, earliest, latest, percent_change
        );

        Ok(PerformanceSummary {
            account_id: account_id.to_string(),
            window,
            since,
            series,
            daily_changes,
            gain_loss,
            percent_change,
            current_total: Some(latest),
        })
    }
}
