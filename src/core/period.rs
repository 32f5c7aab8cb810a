//! Date-range filters for worker history listings

use chrono::{Datelike, Duration, NaiveDate};

use crate::core::error::{CoreError, Result};

/// A reporting period, resolved against "today" into an inclusive date range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Today,
    Yesterday,
    ThisMonth,
    LastMonth,
    Last7Days,
    Last30Days,
    Range { start: NaiveDate, end: NaiveDate },
}

impl Period {
    /// Resolve to inclusive (start, end) dates. Fails with `InvalidInput`
    /// when a custom range has start after end.
    pub fn bounds(&self, today: NaiveDate) -> Result<(NaiveDate, NaiveDate)> {
        let first_of_month = today.with_day(1).unwrap_or(today);
        match *self {
            Period::Today => Ok((today, today)),
            Period::Yesterday => {
                let y = today - Duration::days(1);
                Ok((y, y))
            }
            Period::ThisMonth => Ok((first_of_month, today)),
            Period::LastMonth => {
                let last_prev = first_of_month - Duration::days(1);
                let first_prev = last_prev.with_day(1).unwrap_or(last_prev);
                Ok((first_prev, last_prev))
            }
            Period::Last7Days => Ok((today - Duration::days(6), today)),
            Period::Last30Days => Ok((today - Duration::days(29), today)),
            Period::Range { start, end } => {
                if start > end {
                    return Err(CoreError::InvalidInput(
                        "start date is after end date".to_string(),
                    ));
                }
                Ok((start, end))
            }
        }
    }
}

impl std::str::FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "today" => Ok(Period::Today),
            "yesterday" => Ok(Period::Yesterday),
            "this-month" => Ok(Period::ThisMonth),
            "last-month" => Ok(Period::LastMonth),
            "7d" => Ok(Period::Last7Days),
            "30d" => Ok(Period::Last30Days),
            _ => Err(format!(
                "Invalid period: {}. Use today, yesterday, this-month, last-month, 7d, or 30d",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_today_and_yesterday() {
        let today = date(2026, 3, 15);
        assert_eq!(
            Period::Today.bounds(today).unwrap(),
            (today, today)
        );
        assert_eq!(
            Period::Yesterday.bounds(today).unwrap(),
            (date(2026, 3, 14), date(2026, 3, 14))
        );
    }

    #[test]
    fn test_month_windows() {
        let today = date(2026, 3, 15);
        assert_eq!(
            Period::ThisMonth.bounds(today).unwrap(),
            (date(2026, 3, 1), today)
        );
        assert_eq!(
            Period::LastMonth.bounds(today).unwrap(),
            (date(2026, 2, 1), date(2026, 2, 28))
        );
    }

    #[test]
    fn test_last_month_crosses_year() {
        let today = date(2026, 1, 2);
        assert_eq!(
            Period::LastMonth.bounds(today).unwrap(),
            (date(2025, 12, 1), date(2025, 12, 31))
        );
    }

    #[test]
    fn test_rolling_windows_are_inclusive() {
        let today = date(2026, 3, 15);
        assert_eq!(
            Period::Last7Days.bounds(today).unwrap(),
            (date(2026, 3, 9), today)
        );
        assert_eq!(
            Period::Last30Days.bounds(today).unwrap(),
            (date(2026, 2, 14), today)
        );
    }

    #[test]
    fn test_custom_range_validation() {
        let today = date(2026, 3, 15);
        let ok = Period::Range {
            start: date(2026, 3, 1),
            end: date(2026, 3, 10),
        };
        assert!(ok.bounds(today).is_ok());

        let bad = Period::Range {
            start: date(2026, 3, 10),
            end: date(2026, 3, 1),
        };
        assert!(matches!(
            bad.bounds(today),
            Err(CoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_period_parse() {
        assert_eq!("this-month".parse::<Period>().unwrap(), Period::ThisMonth);
        assert!("fortnight".parse::<Period>().is_err());
    }
}
