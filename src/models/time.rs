use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced while parsing clock times and calendar dates
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeParseError {
    #[error("expected HH:MM, got {0:?}")]
    Format(String),

    #[error("time out of range: {0:?}")]
    OutOfRange(String),

    #[error("expected YYYY-MM-DD or an RFC 3339 timestamp, got {0:?}")]
    Date(String),
}

/// A wall-clock time stored as minutes since midnight
///
/// Parsed from 24-hour "HH:MM" strings. The hour may be written with one or
/// two digits ("9:00" and "09:00" are the same time).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub fn from_hm(hour: u8, minute: u8) -> Option<Self> {
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(Self(hour as u16 * 60 + minute as u16))
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u8 {
        (self.0 / 60) as u8
    }

    pub fn minute(self) -> u8 {
        (self.0 % 60) as u8
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (h, m) = trimmed
            .split_once(':')
            .ok_or_else(|| TimeParseError::Format(s.to_string()))?;

        let well_formed = (1..=2).contains(&h.len())
            && m.len() == 2
            && h.bytes().chain(m.bytes()).all(|b| b.is_ascii_digit());
        if !well_formed {
            return Err(TimeParseError::Format(s.to_string()));
        }

        let hour: u8 = h.parse().map_err(|_| TimeParseError::Format(s.to_string()))?;
        let minute: u8 = m.parse().map_err(|_| TimeParseError::Format(s.to_string()))?;

        Self::from_hm(hour, minute).ok_or_else(|| TimeParseError::OutOfRange(s.to_string()))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Parse a calendar date from either `YYYY-MM-DD` or an RFC 3339 timestamp
///
/// Timestamps are reduced to their UTC calendar date, which is what browsers
/// send when they serialise a `Date` picked in a form.
pub fn parse_date(s: &str) -> Result<NaiveDate, TimeParseError> {
    let trimmed = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .map_err(|_| TimeParseError::Date(s.to_string()))
}

/// Serde adapter for [`parse_date`]
pub fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).map_err(serde::de::Error::custom)
}

/// Serde adapter for an optional [`parse_date`] field
pub fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    raw.map(|s| parse_date(&s).map_err(serde::de::Error::custom))
        .transpose()
}
