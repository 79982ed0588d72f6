use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, ValidationError};
use crate::portfolio::valuation::NetWorthPoint;
use crate::utils::time_utils::days_since_year_start;

/// Named lookback period for performance analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeWindow {
    #[serde(rename = "1D")]
    OneDay,
    #[serde(rename = "5D")]
    FiveDays,
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "6M")]
    SixMonths,
    #[serde(rename = "YTD")]
    YearToDate,
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "5Y")]
    FiveYears,
}

impl TimeWindow {
    pub const ALL: [TimeWindow; 7] = [
        TimeWindow::OneDay,
        TimeWindow::FiveDays,
        TimeWindow::OneMonth,
        TimeWindow::SixMonths,
        TimeWindow::YearToDate,
        TimeWindow::OneYear,
        TimeWindow::FiveYears,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::OneDay => "1D",
            TimeWindow::FiveDays => "5D",
            TimeWindow::OneMonth => "1M",
            TimeWindow::SixMonths => "6M",
            TimeWindow::YearToDate => "YTD",
            TimeWindow::OneYear => "1Y",
            TimeWindow::FiveYears => "5Y",
        }
    }

    /// Days to look back from `now`. Only `YearToDate` depends on `now`.
    pub fn lookback_days(&self, now: NaiveDateTime) -> i64 {
        match self {
            TimeWindow::OneDay => 1,
            TimeWindow::FiveDays => 5,
            TimeWindow::OneMonth => 30,
            TimeWindow::SixMonths => 180,
            TimeWindow::YearToDate => days_since_year_start(now.date()),
            TimeWindow::OneYear => 365,
            TimeWindow::FiveYears => 1825,
        }
    }

    /// Start of the window ending at `now`.
    pub fn since(&self, now: NaiveDateTime) -> NaiveDateTime {
        now - Duration::days(self.lookback_days(now))
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeWindow {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_uppercase();
        TimeWindow::ALL
            .iter()
            .find(|w| w.as_str() == key)
            .copied()
            .ok_or_else(|| {
                Error::Validation(ValidationError::InvalidInput(format!(
                    "Unknown time window '{}'",
                    s
                )))
            })
    }
}

/// Change of the stamped total from the previous series date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyChange {
    pub date: NaiveDate,
    pub change: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSummary {
    pub account_id: String,
    pub window: TimeWindow,
    pub since: NaiveDateTime,
    pub series: Vec<NetWorthPoint>,
    pub daily_changes: Vec<DailyChange>,
    /// Live total minus the earliest total in the window
    pub gain_loss: Decimal,
    /// Percent of the earliest total; `None` when that total is zero
    pub percent_change: Option<Decimal>,
    /// Live total the gain was measured against; `None` when the window held
    /// fewer than two points and no valuation was made
    pub current_total: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("1m".parse::<TimeWindow>().unwrap(), TimeWindow::OneMonth);
        assert_eq!(" ytd ".parse::<TimeWindow>().unwrap(), TimeWindow::YearToDate);
        assert_eq!("5Y".parse::<TimeWindow>().unwrap(), TimeWindow::FiveYears);
        assert!("2W".parse::<TimeWindow>().is_err());
    }

    #[test]
    fn test_fixed_lookbacks() {
        let now = at(2024, 6, 15);
        let days: Vec<i64> = TimeWindow::ALL
            .iter()
            .filter(|w| **w != TimeWindow::YearToDate)
            .map(|w| w.lookback_days(now))
            .collect();
        assert_eq!(days, vec![1, 5, 30, 180, 365, 1825]);
    }

    #[test]
    fn test_year_to_date_since_is_january_first() {
        let now = at(2024, 3, 10);
        assert_eq!(TimeWindow::YearToDate.lookback_days(now), 69);
        assert_eq!(TimeWindow::YearToDate.since(now), at(2024, 1, 1));
    }

    #[test]
    fn test_since_subtracts_lookback() {
        assert_eq!(TimeWindow::OneMonth.since(at(2024, 3, 31)), at(2024, 3, 1));
    }

    #[test]
    fn test_serializes_as_key() {
        assert_eq!(
            serde_json::to_string(&TimeWindow::SixMonths).unwrap(),
            "\"6M\""
        );
        assert_eq!(TimeWindow::OneDay.to_string(), "1D");
    }
}
