//! Events extracted from a remote feed.
//!
//! These are transient: pull-sync parses them, reports them, and never
//! persists them.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// An event read from a feed document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub uid: String,
    pub summary: String,
    pub description: Option<String>,
    pub location: Option<String>,
    /// Best-effort; `None` when the property was missing or unparsable.
    pub start: Option<EventTime>,
    pub end: Option<EventTime>,
}

/// A DTSTART/DTEND value as it appeared in the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventTime {
    /// All-day value (`VALUE=DATE`)
    Date(NaiveDate),
    /// Value with a `Z` suffix
    DateTimeUtc(DateTime<Utc>),
    /// Value without `Z`. Any TZID parameter is ignored, so zoned values land here too.
    DateTimeFloating(NaiveDateTime),
}

impl EventTime {
    /// Parse a bare DTSTART/DTEND value (`20240601`, `20240601T090000`, `20240601T090000Z`).
    pub fn parse(value: &str) -> Option<EventTime> {
        let value = value.trim();

        if let Some(utc) = value.strip_suffix('Z') {
            return NaiveDateTime::parse_from_str(utc, "%Y%m%dT%H%M%S")
                .ok()
                .map(|dt| EventTime::DateTimeUtc(dt.and_utc()));
        }

        if value.contains('T') {
            return NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%S")
                .ok()
                .map(EventTime::DateTimeFloating);
        }

        if value.len() == 8 {
            return NaiveDate::parse_from_str(value, "%Y%m%d")
                .ok()
                .map(EventTime::Date);
        }

        None
    }

    /// Best-effort conversion to an instant. Floating values are read as UTC.
    pub fn to_utc(&self) -> DateTime<Utc> {
        match self {
            EventTime::Date(d) => d.and_time(chrono::NaiveTime::MIN).and_utc(),
            EventTime::DateTimeUtc(dt) => *dt,
            EventTime::DateTimeFloating(dt) => dt.and_utc(),
        }
    }
}

impl fmt::Display for EventTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EventTime::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            EventTime::DateTimeUtc(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M UTC")),
            EventTime::DateTimeFloating(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M")),
        }
    }
}

impl fmt::Display for CalendarEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_utc_value() {
        assert_eq!(
            EventTime::parse("20240601T090000Z"),
            Some(EventTime::DateTimeUtc(
                Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()
            ))
        );
    }

    #[test]
    fn test_parse_floating_value() {
        let expected = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        assert_eq!(
            EventTime::parse("20240601T093000"),
            Some(EventTime::DateTimeFloating(expected))
        );
    }

    #[test]
    fn test_parse_date_value() {
        assert_eq!(
            EventTime::parse("20240601"),
            Some(EventTime::Date(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()))
        );
    }

    #[test]
    fn test_parse_garbage_is_none() {
        assert_eq!(EventTime::parse(""), None);
        assert_eq!(EventTime::parse("tomorrow"), None);
        assert_eq!(EventTime::parse("20241399T250000Z"), None);
    }
}
