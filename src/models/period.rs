//! Calendar periods and date arithmetic
//!
//! Reporting works on whole calendar months or years. The recurring expense
//! generator needs month arithmetic that clamps to the end of shorter months
//! (Jan 31 + 1 month = Feb 28/29) and half-open month windows.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// First day of the month containing `date`
pub fn first_day_of_month(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

/// First day of the month after the one containing `date`
pub fn first_day_of_next_month(date: NaiveDate) -> Option<NaiveDate> {
    first_day_of_month(date).checked_add_months(Months::new(1))
}

/// Shift `date` by a signed number of months, clamping the day of month
pub fn add_months_clamped(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let magnitude = Months::new(months.unsigned_abs());
    if months >= 0 {
        date.checked_add_months(magnitude)
    } else {
        date.checked_sub_months(magnitude)
    }
}

/// Whole calendar months from `from` to `to`, ignoring the day of month
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i32 {
    (to.year() - from.year()) * 12 + (to.month() as i32 - from.month() as i32)
}

/// Whether two dates fall in the same calendar month
pub fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

/// A half-open date window `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// The calendar month containing `date`
    pub fn month_of(date: NaiveDate) -> Option<Self> {
        Some(Self {
            start: first_day_of_month(date),
            end: first_day_of_next_month(date)?,
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }
}

/// A reporting period: one calendar month or one calendar year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum ReportPeriod {
    Month { year: i32, month: u32 },
    Year { year: i32 },
}

impl ReportPeriod {
    pub fn month(year: i32, month: u32) -> Self {
        Self::Month { year, month }
    }

    pub fn year(year: i32) -> Self {
        Self::Year { year }
    }

    /// The month containing `date`
    pub fn month_of(date: NaiveDate) -> Self {
        Self::Month {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Parse "2024-08" (month) or "2024" (year)
    pub fn parse(s: &str) -> Result<Self, PeriodParseError> {
        let s = s.trim();
        let invalid = || PeriodParseError(s.to_string());

        match s.split_once('-') {
            Some((year, month)) => {
                let year: i32 = year.parse().map_err(|_| invalid())?;
                let month: u32 = month.parse().map_err(|_| invalid())?;
                if !(1..=12).contains(&month) {
                    return Err(invalid());
                }
                Self::Month { year, month }.checked().ok_or_else(invalid)
            }
            None => {
                let year: i32 = s.parse().map_err(|_| invalid())?;
                Self::Year { year }.checked().ok_or_else(invalid)
            }
        }
    }

    /// The period itself, if every day of it is a representable date
    pub fn checked(self) -> Option<Self> {
        self.end_date().map(|_| self)
    }

    /// First day of the period
    pub fn start_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Month { year, month } => NaiveDate::from_ymd_opt(*year, *month, 1),
            Self::Year { year } => NaiveDate::from_ymd_opt(*year, 1, 1),
        }
    }

    /// Last day of the period (inclusive)
    pub fn end_date(&self) -> Option<NaiveDate> {
        let start = self.start_date()?;
        let next = match self {
            Self::Month { .. } => start.checked_add_months(Months::new(1))?,
            Self::Year { .. } => start.checked_add_months(Months::new(12))?,
        };
        next.pred_opt()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        match self {
            Self::Month { year, month } => date.year() == *year && date.month() == *month,
            Self::Year { year } => date.year() == *year,
        }
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Month { year, month } => write!(f, "{:04}-{:02}", year, month),
            Self::Year { year } => write!(f, "{:04}", year),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid period '{0}': use YYYY-MM or YYYY")]
pub struct PeriodParseError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_month_boundaries() {
        assert_eq!(first_day_of_month(d(2024, 8, 15)), d(2024, 8, 1));
        assert_eq!(first_day_of_next_month(d(2024, 8, 15)), Some(d(2024, 9, 1)));
        assert_eq!(first_day_of_next_month(d(2024, 12, 31)), Some(d(2025, 1, 1)));
    }

    #[test]
    fn test_add_months_clamps_to_month_end() {
        assert_eq!(add_months_clamped(d(2024, 1, 31), 1), Some(d(2024, 2, 29)));
        assert_eq!(add_months_clamped(d(2023, 1, 31), 1), Some(d(2023, 2, 28)));
        assert_eq!(add_months_clamped(d(2024, 3, 15), -2), Some(d(2024, 1, 15)));
        assert_eq!(add_months_clamped(d(2024, 2, 29), 12), Some(d(2025, 2, 28)));
    }

    #[test]
    fn test_months_between() {
        assert_eq!(months_between(d(2024, 1, 1), d(2024, 8, 15)), 7);
        assert_eq!(months_between(d(2024, 11, 20), d(2025, 2, 1)), 3);
        assert_eq!(months_between(d(2025, 3, 1), d(2025, 1, 1)), -2);
    }

    #[test]
    fn test_window_is_half_open() {
        let window = DateWindow::month_of(d(2024, 8, 15)).unwrap();
        assert!(window.contains(d(2024, 8, 1)));
        assert!(window.contains(d(2024, 8, 31)));
        assert!(!window.contains(d(2024, 9, 1)));
        assert!(!window.contains(d(2024, 7, 31)));
    }

    #[test]
    fn test_report_period_parse_and_range() {
        let month = ReportPeriod::parse("2024-02").unwrap();
        assert_eq!(month, ReportPeriod::month(2024, 2));
        assert_eq!(month.start_date(), Some(d(2024, 2, 1)));
        assert_eq!(month.end_date(), Some(d(2024, 2, 29)));
        assert_eq!(month.to_string(), "2024-02");

        let year = ReportPeriod::parse("2025").unwrap();
        assert_eq!(year.end_date(), Some(d(2025, 12, 31)));
        assert!(year.contains(d(2025, 6, 1)));
        assert!(!year.contains(d(2024, 12, 31)));

        assert!(ReportPeriod::parse("2024-13").is_err());
        assert!(ReportPeriod::parse("august").is_err());
        assert!(ReportPeriod::parse("300000").is_err());
        assert!(ReportPeriod::parse("300000-01").is_err());
        assert_eq!(ReportPeriod::year(300000).checked(), None);
    }
}
