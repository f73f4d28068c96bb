//! Budget period representation
//!
//! Budgets are scoped to calendar months, keyed as `YYYY-MM`.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A calendar month used to scope budgets and variance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    /// Create a period, rejecting months outside 1-12 and unrepresentable years
    pub fn new(year: i32, month: u32) -> Result<Self, PeriodParseError> {
        if !(1..=12).contains(&month) {
            return Err(PeriodParseError::InvalidMonth(month));
        }
        // Both ends of the month must exist in chrono's calendar
        let next_start = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        };
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() || next_start.is_none() {
            return Err(PeriodParseError::InvalidFormat(format!("{}-{:02}", year, month)));
        }
        Ok(Self { year, month })
    }

    /// The month containing `date`
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The current month in local time
    pub fn current() -> Self {
        Self::from_date(chrono::Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// First day of the month
    pub fn start_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Last day of the month (inclusive)
    pub fn end_date(&self) -> NaiveDate {
        self.next().start_date() - Duration::days(1)
    }

    /// Check if a date falls within this month
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// The following month
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// The preceding month
    pub fn prev(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// Parse a period argument, defaulting to the current month
    ///
    /// Accepts `YYYY-MM`, `current` and `last`.
    pub fn parse_or_current(arg: Option<&str>) -> Result<Self, PeriodParseError> {
        match arg.map(str::trim) {
            None | Some("") => Ok(Self::current()),
            Some(s) if s.eq_ignore_ascii_case("current") => Ok(Self::current()),
            Some(s) if s.eq_ignore_ascii_case("last") => Ok(Self::current().prev()),
            Some(s) => s.parse(),
        }
    }
}

impl FromStr for Period {
    type Err = PeriodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || PeriodParseError::InvalidFormat(s.to_string());

        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;

        Self::new(year, month)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for period parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodParseError {
    InvalidFormat(String),
    InvalidMonth(u32),
}

impl fmt::Display for PeriodParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodParseError::InvalidFormat(s) => {
                write!(f, "Invalid period format (expected YYYY-MM): {}", s)
            }
            PeriodParseError::InvalidMonth(m) => write!(f, "Invalid month: {}", m),
        }
    }
}

impl std::error::Error for PeriodParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_bounds() {
        let june = Period::new(2024, 6).unwrap();
        assert_eq!(june.start_date(), date(2024, 6, 1));
        assert_eq!(june.end_date(), date(2024, 6, 30));

        let feb_leap = Period::new(2024, 2).unwrap();
        assert_eq!(feb_leap.end_date(), date(2024, 2, 29));

        let dec = Period::new(2024, 12).unwrap();
        assert_eq!(dec.end_date(), date(2024, 12, 31));
    }

    #[test]
    fn test_contains() {
        let june = Period::new(2024, 6).unwrap();
        assert!(june.contains(date(2024, 6, 1)));
        assert!(june.contains(date(2024, 6, 30)));
        assert!(!june.contains(date(2024, 7, 1)));
        assert!(!june.contains(date(2023, 6, 15)));
    }

    #[test]
    fn test_navigation_wraps_year() {
        let dec = Period::new(2024, 12).unwrap();
        assert_eq!(dec.next(), Period::new(2025, 1).unwrap());
        assert_eq!(dec.next().prev(), dec);
    }

    #[test]
    fn test_parse() {
        assert_eq!("2024-06".parse::<Period>().unwrap(), Period::new(2024, 6).unwrap());
        assert_eq!(
            "2024-13".parse::<Period>().unwrap_err(),
            PeriodParseError::InvalidMonth(13)
        );
        assert!("2024-6".parse::<Period>().is_err());
        assert!("June".parse::<Period>().is_err());
        assert!("2024-06-01".parse::<Period>().is_err());
    }

    #[test]
    fn test_parse_or_current() {
        let current = Period::current();
        assert_eq!(Period::parse_or_current(None).unwrap(), current);
        assert_eq!(Period::parse_or_current(Some("last")).unwrap(), current.prev());
        assert_eq!(
            Period::parse_or_current(Some("2023-01")).unwrap(),
            Period::new(2023, 1).unwrap()
        );
    }

    #[test]
    fn test_serializes_as_string() {
        let period = Period::new(2024, 6).unwrap();
        assert_eq!(serde_json::to_string(&period).unwrap(), "\"2024-06\"");
        assert_eq!(serde_json::from_str::<Period>("\"2024-06\"").unwrap(), period);
        assert!(serde_json::from_str::<Period>("\"2024-00\"").is_err());
    }
}
