use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A calendar month used to scope listings and summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Month {
    year: i32,
    month: u32,
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Month {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        // Validated through chrono so Month can hand out unwrap-free dates later.
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Month { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Month {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    pub fn start_date(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap()
    }

    /// Last day of the month (inclusive end, matching DateRange::contains).
    pub fn end_date(self) -> NaiveDate {
        let first_of_next = if self.month == 12 {
            NaiveDate::from_ymd_opt(self.year + 1, 1, 1).unwrap()
        } else {
            NaiveDate::from_ymd_opt(self.year, self.month + 1, 1).unwrap()
        };
        first_of_next.pred_opt().unwrap()
    }

    pub fn range(self) -> DateRange {
        DateRange::new(self.start_date(), self.end_date())
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_new_rejects_invalid() {
        assert!(Month::new(2024, 13).is_none());
        assert!(Month::new(2024, 0).is_none());
        assert!(Month::new(2024, 12).is_some());
    }

    #[test]
    fn month_display() {
        assert_eq!(Month::new(2024, 3).unwrap().to_string(), "2024-03");
    }

    #[test]
    fn month_start_and_end_dates() {
        let m = Month::new(2024, 2).unwrap();
        assert_eq!(m.start_date(), date(2024, 2, 1));
        assert_eq!(m.end_date(), date(2024, 2, 29)); // leap year
    }

    #[test]
    fn december_end_date_rolls_year() {
        let m = Month::new(2023, 12).unwrap();
        assert_eq!(m.end_date(), date(2023, 12, 31));
    }

    #[test]
    fn month_of_date() {
        assert_eq!(Month::of(date(2024, 6, 15)), Month::new(2024, 6).unwrap());
    }

    #[test]
    fn month_contains() {
        let m = Month::new(2024, 1).unwrap();
        assert!(m.contains(date(2024, 1, 1)));
        assert!(m.contains(date(2024, 1, 31)));
        assert!(!m.contains(date(2024, 2, 1)));
        assert!(!m.contains(date(2023, 1, 15)));
    }

    #[test]
    fn date_range_contains() {
        let range = DateRange::new(date(2024, 1, 1), date(2024, 12, 31));
        assert!(range.contains(date(2024, 6, 15)));
        assert!(range.contains(date(2024, 1, 1))); // inclusive start
        assert!(range.contains(date(2024, 12, 31))); // inclusive end
        assert!(!range.contains(date(2023, 12, 31)));
        assert!(!range.contains(date(2025, 1, 1)));
    }

    #[test]
    fn date_range_display() {
        let range = DateRange::new(date(2024, 1, 1), date(2024, 12, 31));
        assert_eq!(range.to_string(), "2024-01-01 to 2024-12-31");
    }
}
