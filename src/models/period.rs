//! Period filter applied before aggregation

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Time window selecting which transactions feed the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PeriodFilter {
    /// Every transaction with a valid date
    AllTime,
    /// Transactions dated in the reference year
    #[default]
    ThisYear,
    /// Transactions dated in the reference year and month
    ThisMonth,
}

impl PeriodFilter {
    /// All filters in display order
    pub fn all() -> &'static [PeriodFilter] {
        &[Self::AllTime, Self::ThisYear, Self::ThisMonth]
    }

    /// Check whether a date falls inside this window relative to `now`
    pub fn contains(&self, date: NaiveDateTime, now: NaiveDateTime) -> bool {
        match self {
            Self::AllTime => true,
            Self::ThisYear => date.year() == now.year(),
            Self::ThisMonth => date.year() == now.year() && date.month() == now.month(),
        }
    }

    /// Short machine name, as accepted by `FromStr`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AllTime => "all",
            Self::ThisYear => "this-year",
            Self::ThisMonth => "this-month",
        }
    }
}

impl fmt::Display for PeriodFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllTime => write!(f, "All time"),
            Self::ThisYear => write!(f, "This year"),
            Self::ThisMonth => write!(f, "This month"),
        }
    }
}

impl FromStr for PeriodFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "all" | "all-time" => Ok(Self::AllTime),
            "this-year" | "year" => Ok(Self::ThisYear),
            "this-month" | "month" => Ok(Self::ThisMonth),
            other => {
                let known: Vec<&str> = Self::all().iter().map(|f| f.as_str()).collect();
                Err(format!(
                    "Unknown period '{}'. Use one of: {}",
                    other,
                    known.join(", ")
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_contains() {
        let now = at(2024, 6, 15);

        assert!(PeriodFilter::AllTime.contains(at(1999, 1, 1), now));
        assert!(PeriodFilter::ThisYear.contains(at(2024, 1, 1), now));
        assert!(!PeriodFilter::ThisYear.contains(at(2023, 6, 15), now));
        assert!(PeriodFilter::ThisMonth.contains(at(2024, 6, 1), now));
        assert!(!PeriodFilter::ThisMonth.contains(at(2024, 5, 31), now));
        assert!(!PeriodFilter::ThisMonth.contains(at(2023, 6, 15), now));
    }

    #[test]
    fn test_parse() {
        assert_eq!("all".parse::<PeriodFilter>().unwrap(), PeriodFilter::AllTime);
        assert_eq!("this_year".parse::<PeriodFilter>().unwrap(), PeriodFilter::ThisYear);
        assert_eq!("This-Month".parse::<PeriodFilter>().unwrap(), PeriodFilter::ThisMonth);
        assert!("last-week".parse::<PeriodFilter>().is_err());

        for filter in PeriodFilter::all() {
            assert_eq!(filter.as_str().parse::<PeriodFilter>().unwrap(), *filter);
        }
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&PeriodFilter::ThisYear).unwrap();
        assert_eq!(json, "\"this_year\"");
    }
}
