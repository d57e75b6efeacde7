//! Calendar value types used for day iteration and cadence bucketing.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors raised while parsing calendar text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CalendarError {
    #[error("invalid calendar date `{0}` (expected YYYY-MM-DD)")]
    InvalidDate(String),
    #[error("invalid clock time `{0}` (expected HH:MM)")]
    InvalidTime(String),
    #[error("date overflow after {0}")]
    Overflow(NaiveDate),
}

/// A single calendar day, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Parse an ISO `YYYY-MM-DD` string.
    ///
    /// # Errors
    ///
    /// Returns an error when the text is not a valid date.
    pub fn parse(text: &str) -> Result<Self, CalendarError> {
        NaiveDate::parse_from_str(text.trim(), DATE_FORMAT)
            .map(Self)
            .map_err(|_| CalendarError::InvalidDate(text.to_string()))
    }

    /// The following day.
    ///
    /// # Errors
    ///
    /// Returns an error at the end of the representable range.
    pub fn succ(self) -> Result<Self, CalendarError> {
        self.0
            .checked_add_days(Days::new(1))
            .map(Self)
            .ok_or(CalendarError::Overflow(self.0))
    }

    /// Iterate every day from `self` through `end`, inclusive.
    #[must_use]
    pub fn through(self, end: Self) -> DayRange {
        DayRange {
            next: (self <= end).then_some(self),
            end,
        }
    }

    #[must_use]
    pub fn weekday(self) -> Weekday {
        self.0.weekday()
    }

    #[must_use]
    pub fn year(self) -> i32 {
        self.0.year()
    }

    /// Zero-based month index.
    #[must_use]
    pub fn month0(self) -> u32 {
        self.0.month0()
    }

    /// ISO week bucket, e.g. `2024-W5`. The year is the ISO week-numbering
    /// year, so the last days of December can belong to the next year.
    #[must_use]
    pub fn iso_week_key(self) -> String {
        let week = self.0.iso_week();
        format!("{}-W{}", week.year(), week.week())
    }

    /// Month bucket, e.g. `2024-05`.
    #[must_use]
    pub fn month_key(self) -> String {
        format!("{:04}-{:02}", self.0.year(), self.0.month())
    }

    /// The first Saturday of each month hosts the boss encounter.
    #[must_use]
    pub fn is_first_saturday(self) -> bool {
        self.0.weekday() == Weekday::Sat && self.0.day() <= 7
    }

    /// Whole days from `self` to `later` (negative when `later` is earlier).
    #[must_use]
    pub fn days_until(self, later: Self) -> i64 {
        (later.0 - self.0).num_days()
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl FromStr for CalendarDate {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CalendarDate {
    type Error = CalendarError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CalendarDate> for String {
    fn from(value: CalendarDate) -> Self {
        value.to_string()
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(value: NaiveDate) -> Self {
        Self(value)
    }
}

/// Inclusive iterator over consecutive calendar days.
#[derive(Debug, Clone)]
pub struct DayRange {
    next: Option<CalendarDate>,
    end: CalendarDate,
}

impl Iterator for DayRange {
    type Item = CalendarDate;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = if current < self.end {
            current.succ().ok()
        } else {
            None
        };
        Some(current)
    }
}

/// Wall-clock submission time (`HH:MM`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClockTime {
    pub hour: u8,
    pub minute: u8,
}

impl ClockTime {
    /// Parse `HH:MM`; seconds, if present, are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error when hour or minute are missing or out of range.
    pub fn parse(text: &str) -> Result<Self, CalendarError> {
        let invalid = || CalendarError::InvalidTime(text.to_string());
        let mut parts = text.trim().split(':');
        let hour: u8 = parts
            .next()
            .and_then(|h| h.parse().ok())
            .ok_or_else(invalid)?;
        let minute: u8 = parts
            .next()
            .and_then(|m| m.parse().ok())
            .ok_or_else(invalid)?;
        if hour > 23 || minute > 59 {
            return Err(invalid());
        }
        Ok(Self { hour, minute })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(text: &str) -> CalendarDate {
        CalendarDate::parse(text).unwrap()
    }

    #[test]
    fn parses_and_displays_iso_dates() {
        let d = date("2024-02-29");
        assert_eq!(d.to_string(), "2024-02-29");
        assert!(CalendarDate::parse("2023-02-29").is_err());
        assert!(CalendarDate::parse("yesterday").is_err());
    }

    #[test]
    fn successor_crosses_month_and_year() {
        assert_eq!(date("2024-01-31").succ().unwrap(), date("2024-02-01"));
        assert_eq!(date("2023-12-31").succ().unwrap(), date("2024-01-01"));
    }

    #[test]
    fn range_is_inclusive_and_empty_when_reversed() {
        let days: Vec<_> = date("2024-03-30").through(date("2024-04-02")).collect();
        assert_eq!(days.len(), 4);
        assert_eq!(days[3], date("2024-04-02"));
        assert_eq!(date("2024-04-02").through(date("2024-04-01")).count(), 0);
        assert_eq!(date("2024-04-02").through(date("2024-04-02")).count(), 1);
    }

    #[test]
    fn iso_week_uses_week_numbering_year() {
        assert_eq!(date("2024-01-01").iso_week_key(), "2024-W1");
        assert_eq!(date("2024-12-30").iso_week_key(), "2025-W1");
        assert_eq!(date("2021-01-03").iso_week_key(), "2020-W53");
        assert_eq!(date("2024-05-15").iso_week_key(), "2024-W20");
    }

    #[test]
    fn month_key_is_zero_padded() {
        assert_eq!(date("2024-05-15").month_key(), "2024-05");
        assert_eq!(date("2024-11-01").month_key(), "2024-11");
    }

    #[test]
    fn first_saturday_detection() {
        assert!(date("2024-06-01").is_first_saturday());
        assert!(date("2024-03-02").is_first_saturday());
        assert!(!date("2024-06-08").is_first_saturday());
        assert!(!date("2024-06-02").is_first_saturday());
    }

    #[test]
    fn serde_uses_plain_strings() {
        let json = serde_json::to_string(&date("2024-01-05")).unwrap();
        assert_eq!(json, "\"2024-01-05\"");
        let back: CalendarDate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, date("2024-01-05"));
        assert!(serde_json::from_str::<CalendarDate>("\"2024-13-01\"").is_err());
    }

    #[test]
    fn clock_time_parsing() {
        assert_eq!(
            ClockTime::parse("23:57").unwrap(),
            ClockTime {
                hour: 23,
                minute: 57
            }
        );
        assert_eq!(ClockTime::parse("07:05:12").unwrap().minute, 5);
        assert!(ClockTime::parse("24:00").is_err());
        assert!(ClockTime::parse("noon").is_err());
    }
}
