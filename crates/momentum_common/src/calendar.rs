//! Calendar-day value type shared by streaks and the habit store.
//!
//! A `CalendarDay` is a date with no time of day. All streak arithmetic is
//! done in whole days; the caller decides which local day "today" is.

use chrono::{Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{MomentumError, Result};

/// Wire and display format for calendar days
pub const DAY_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarDay(NaiveDate);

impl CalendarDay {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Build from year/month/day, rejecting impossible dates
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| MomentumError::InvalidDate {
                value: format!("{:04}-{:02}-{:02}", year, month, day),
                reason: "no such calendar day".to_string(),
            })
    }

    /// Parse a `YYYY-MM-DD` string
    pub fn parse(value: &str) -> Result<Self> {
        NaiveDate::parse_from_str(value.trim(), DAY_FORMAT)
            .map(Self)
            .map_err(|e| MomentumError::InvalidDate {
                value: value.to_string(),
                reason: e.to_string(),
            })
    }

    /// The current day in the local time zone of this process
    pub fn today_local() -> Self {
        Self(Local::now().date_naive())
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Signed number of days from `earlier` to `self`
    pub fn days_since(&self, earlier: CalendarDay) -> i64 {
        (self.0 - earlier.0).num_days()
    }

    /// Shift by a signed number of days; `None` past chrono's date range
    pub fn offset(&self, days: i64) -> Option<Self> {
        self.0.checked_add_signed(Duration::days(days)).map(Self)
    }

    pub fn pred(&self) -> Option<Self> {
        self.offset(-1)
    }

    pub fn succ(&self) -> Option<Self> {
        self.offset(1)
    }
}

impl fmt::Display for CalendarDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DAY_FORMAT))
    }
}

impl FromStr for CalendarDay {
    type Err = MomentumError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<NaiveDate> for CalendarDay {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let day = CalendarDay::parse("2024-02-29").unwrap();
        assert_eq!(day.to_string(), "2024-02-29");
        assert_eq!(" 2024-03-01 ".parse::<CalendarDay>().unwrap().to_string(), "2024-03-01");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(CalendarDay::parse("2023-02-29").is_err());
        assert!(CalendarDay::parse("yesterday").is_err());
        assert!(CalendarDay::parse("2024-1-2T00:00").is_err());
        assert!(CalendarDay::from_ymd(2024, 13, 1).is_err());
    }

    #[test]
    fn test_days_since_crosses_month_and_year() {
        let a = CalendarDay::from_ymd(2023, 12, 31).unwrap();
        let b = CalendarDay::from_ymd(2024, 1, 1).unwrap();
        assert_eq!(b.days_since(a), 1);
        assert_eq!(a.days_since(b), -1);
        assert_eq!(a.succ(), Some(b));
        assert_eq!(b.pred(), Some(a));
    }

    #[test]
    fn test_serde_as_plain_string() {
        let day = CalendarDay::from_ymd(2024, 5, 7).unwrap();
        let json = serde_json::to_string(&day).unwrap();
        assert_eq!(json, "\"2024-05-07\"");
        let back: CalendarDay = serde_json::from_str(&json).unwrap();
        assert_eq!(back, day);
    }
}
