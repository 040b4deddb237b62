//! Billing-period keys in `YYYY-MM` form

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static MONTH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}-(0[1-9]|1[0-2])$").expect("month pattern is a valid regex")
});

/// Message returned whenever a month string fails validation
pub const INVALID_MONTH_MESSAGE: &str = "Invalid month format (YYYY-MM)";

/// A validated billing month such as `2025-09`
///
/// Ordering follows the calendar because the string form is zero padded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey(String);

/// Error returned when a string is not a valid `YYYY-MM` key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidMonth(pub String);

impl fmt::Display for InvalidMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is not a valid month format (YYYY-MM)", self.0)
    }
}

impl std::error::Error for InvalidMonth {}

impl MonthKey {
    /// Parse and validate a month key
    pub fn parse(value: &str) -> Result<Self, InvalidMonth> {
        if MONTH_PATTERN.is_match(value) {
            Ok(Self(value.to_string()))
        } else {
            Err(InvalidMonth(value.to_string()))
        }
    }

    /// Whether `value` is a valid month key
    pub fn is_valid(value: &str) -> bool {
        MONTH_PATTERN.is_match(value)
    }

    /// The month containing `date`
    pub fn from_date(date: NaiveDate) -> Self {
        Self(format!("{:04}-{:02}", date.year(), date.month()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn year_month(&self) -> (i32, u32) {
        // The pattern guarantees both halves are ASCII digits
        let year = self.0[..4].parse().unwrap_or_default();
        let month = self.0[5..].parse().unwrap_or(1);
        (year, month)
    }

    /// The month immediately before this one
    pub fn previous(&self) -> Self {
        let (year, month) = self.year_month();
        if month == 1 {
            Self(format!("{:04}-12", year - 1))
        } else {
            Self(format!("{:04}-{:02}", year, month - 1))
        }
    }

    /// The `count` months ending with (and including) this one, oldest first
    pub fn window_ending(&self, count: usize) -> Vec<Self> {
        let mut months = Vec::with_capacity(count);
        let mut current = self.clone();
        for _ in 0..count {
            let previous = current.previous();
            months.push(current);
            current = previous;
        }
        months.reverse();
        months
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for MonthKey {
    type Err = InvalidMonth;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for MonthKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
