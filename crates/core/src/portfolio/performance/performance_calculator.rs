use rust_decimal::Decimal;

use super::performance_model::DailyChange;
use crate::constants::DECIMAL_PRECISION;
use crate::portfolio::valuation::NetWorthPoint;

/// Absolute and percent change from `earliest` to `latest`.
///
/// The percent change is `None` when `earliest` is zero.
pub fn compare_totals(earliest: Decimal, latest: Decimal) -> (Decimal, Option<Decimal>) {
    let gain_loss = latest - earliest;
    let percent = if earliest.is_zero() {
        None
    } else {
        gain_loss
            .checked_div(earliest)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .map(|p| p.round_dp(DECIMAL_PRECISION))
    };
    (gain_loss, percent)
}

/// Per-date change against the previous point; the first point is 0.
pub fn daily_changes(series: &[NetWorthPoint]) -> Vec<DailyChange> {
    let mut previous: Option<Decimal> = None;
    series
        .iter()
        .map(|point| {
            let change = previous.map_or(Decimal::ZERO, |p| point.total - p);
            previous = Some(point.total);
            DailyChange {
                date: point.date,
                change,
            }
        })
        .collect()
}
