use chrono::{Datelike, NaiveDate, NaiveDateTime, Utc};

/// Current UTC instant, the clock every ledger timestamp is taken from.
pub fn utc_now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Calendar date a UTC timestamp is bucketed under.
///
/// This is the single source of truth for converting transaction timestamps
/// to series dates.
pub fn trading_date(instant: NaiveDateTime) -> NaiveDate {
    instant.date()
}

/// Whole days elapsed from January 1 of `today`'s year to `today`.
/// January 1 itself yields 0.
pub fn days_since_year_start(today: NaiveDate) -> i64 {
    match NaiveDate::from_ymd_opt(today.year(), 1, 1) {
        Some(jan_first) => (today - jan_first).num_days(),
        None => i64::from(today.ordinal0()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trading_date_uses_utc_calendar_day() {
        let late = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        assert_eq!(trading_date(late), NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
    }

    #[test]
    fn test_days_since_year_start() {
        let jan_first = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(days_since_year_start(jan_first), 0);

        let march_first = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(days_since_year_start(march_first), 31 + 29);

        let new_years_eve = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        assert_eq!(days_since_year_start(new_years_eve), 364);
    }
}
