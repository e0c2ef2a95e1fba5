//! Job records handed to the feed generator.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// A schedulable job as supplied by the job-data provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// `YYYY-MM-DD`
    #[serde(default)]
    pub scheduled_date: Option<String>,
    /// `HH:MM` or `HH:MM:SS`
    #[serde(default)]
    pub scheduled_time: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub client_address: Option<String>,
}

impl JobRecord {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        JobRecord {
            id: id.into(),
            title: title.into(),
            description: None,
            scheduled_date: None,
            scheduled_time: None,
            status: None,
            client_name: None,
            client_address: None,
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        let raw = self.scheduled_date.as_deref()?.trim();
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
    }

    pub fn time(&self) -> Option<NaiveTime> {
        let raw = self.scheduled_time.as_deref()?.trim();
        NaiveTime::parse_from_str(raw, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
            .ok()
    }

    /// Date and time combined, or `None` if either is missing or unreadable.
    pub fn scheduled_at(&self) -> Option<NaiveDateTime> {
        Some(self.date()?.and_time(self.time()?))
    }

    /// Only jobs with a date, a time and a single-line id can become feed events.
    pub fn is_eligible(&self) -> bool {
        self.has_line_safe_id() && self.scheduled_at().is_some()
    }

    /// The id is written verbatim into the event UID, so control characters are not allowed.
    pub fn has_line_safe_id(&self) -> bool {
        !self.id.chars().any(char::is_control)
    }

    /// Scheduled today or later.
    pub fn is_upcoming(&self, today: NaiveDate) -> bool {
        self.date().is_some_and(|d| d >= today)
    }

    /// Interpret the scheduled wall-clock time in `tz`.
    ///
    /// Ambiguous times (DST fold) take the earlier instant. Times that do not
    /// exist in `tz` (DST gap) are read as UTC.
    pub fn scheduled_start(&self, tz: Tz) -> Option<DateTime<Utc>> {
        let naive = self.scheduled_at()?;
        let start = tz
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| naive.and_utc());
        Some(start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduled(date: &str, time: &str) -> JobRecord {
        let mut job = JobRecord::new("1", "Window wash");
        job.scheduled_date = Some(date.to_string());
        job.scheduled_time = Some(time.to_string());
        job
    }

    #[test]
    fn test_eligibility_requires_date_and_time() {
        let mut job = JobRecord::new("1", "Window wash");
        assert!(!job.is_eligible());

        job.scheduled_date = Some("2024-06-01".into());
        assert!(!job.is_eligible());

        job.scheduled_time = Some("09:00".into());
        assert!(job.is_eligible());
    }

    #[test]
    fn test_id_with_control_characters_is_not_eligible() {
        let mut job = scheduled("2024-06-01", "09:00");
        assert!(job.is_eligible());

        for bad in ["7\r\nUID:evil", "tab\there", "nul\0"] {
            job.id = bad.to_string();
            assert!(!job.is_eligible(), "{bad:?} should not be eligible");
        }
    }

    #[test]
    fn test_unreadable_date_is_not_eligible() {
        assert!(!scheduled("June 1st", "09:00").is_eligible());
        assert!(!scheduled("2024-06-01", "9am").is_eligible());
    }

    #[test]
    fn test_time_with_seconds() {
        let job = scheduled("2024-06-01", "09:15:30");
        assert_eq!(
            job.time(),
            Some(NaiveTime::from_hms_opt(9, 15, 30).unwrap())
        );
    }

    #[test]
    fn test_scheduled_start_in_zone() {
        let job = scheduled("2024-06-01", "09:00");
        let start = job.scheduled_start(chrono_tz::America::New_York).unwrap();
        // EDT is UTC-4 in June
        assert_eq!(start.format("%Y%m%dT%H%M%SZ").to_string(), "20240601T130000Z");
    }

    #[test]
    fn test_scheduled_start_in_dst_gap_falls_back_to_utc() {
        let job = scheduled("2024-03-10", "02:30");
        let start = job.scheduled_start(chrono_tz::America::New_York).unwrap();
        assert_eq!(start.format("%Y%m%dT%H%M%SZ").to_string(), "20240310T023000Z");
    }

    #[test]
    fn test_is_upcoming() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert!(scheduled("2024-06-01", "09:00").is_upcoming(today));
        assert!(scheduled("2024-07-01", "09:00").is_upcoming(today));
        assert!(!scheduled("2024-05-31", "09:00").is_upcoming(today));
        assert!(!JobRecord::new("2", "Unscheduled").is_upcoming(today));
    }

    #[test]
    fn test_deserialize_camel_case() {
        let job: JobRecord = serde_json::from_str(
            r#"{"id":"42","title":"Deep Clean","scheduledDate":"2024-06-01","scheduledTime":"09:00","clientName":"Acme Co"}"#,
        )
        .unwrap();
        assert_eq!(job.client_name.as_deref(), Some("Acme Co"));
        assert_eq!(job.client_address, None);
        assert!(job.is_eligible());
    }
}
