//! Per-account calendar integration record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::feed_url::FeedKind;

/// The single persisted row tracking one account's calendar synchronization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarIntegration {
    pub account_id: String,
    /// Last validated remote feed (set by pull-sync)
    #[serde(default)]
    pub feed_url: Option<String>,
    #[serde(default)]
    pub feed_kind: Option<String>,
    #[serde(default)]
    pub last_sync_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_active: bool,
    /// Last generated feed text (set by push-sync)
    #[serde(default)]
    pub published_document: Option<String>,
}

impl CalendarIntegration {
    pub fn new(account_id: impl Into<String>) -> Self {
        CalendarIntegration {
            account_id: account_id.into(),
            feed_url: None,
            feed_kind: None,
            last_sync_at: None,
            is_active: false,
            published_document: None,
        }
    }
}

/// The fields one operation writes. Applied as a whole or not at all.
#[derive(Debug, Clone, PartialEq)]
pub enum IntegrationUpdate {
    Pull { feed_url: String, feed_kind: FeedKind },
    Push { document: String },
    Deactivate,
}

impl IntegrationUpdate {
    /// Compute the record to store from whatever is stored now.
    ///
    /// Fields this update does not own are carried over untouched.
    pub fn apply(
        self,
        existing: Option<CalendarIntegration>,
        account_id: &str,
        now: DateTime<Utc>,
    ) -> CalendarIntegration {
        let mut record = existing.unwrap_or_else(|| CalendarIntegration::new(account_id));

        match self {
            IntegrationUpdate::Pull {
                feed_url,
                feed_kind,
            } => {
                record.feed_url = Some(feed_url);
                record.feed_kind = Some(feed_kind.as_str().to_string());
                record.last_sync_at = Some(now);
                record.is_active = true;
            }
            IntegrationUpdate::Push { document } => {
                record.published_document = Some(document);
                record.last_sync_at = Some(now);
                record.is_active = true;
            }
            IntegrationUpdate::Deactivate => {
                record.is_active = false;
            }
        }

        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, hour, 0, 0).unwrap()
    }

    fn pull(url: &str) -> IntegrationUpdate {
        IntegrationUpdate::Pull {
            feed_url: url.to_string(),
            feed_kind: FeedKind::GenericIcal,
        }
    }

    #[test]
    fn test_pull_creates_record() {
        let record = pull("https://example.com/ical/a").apply(None, "acct-1", at(9));

        assert_eq!(record.account_id, "acct-1");
        assert_eq!(record.feed_url.as_deref(), Some("https://example.com/ical/a"));
        assert_eq!(record.feed_kind.as_deref(), Some("generic-ical"));
        assert_eq!(record.last_sync_at, Some(at(9)));
        assert!(record.is_active);
        assert_eq!(record.published_document, None);
    }

    #[test]
    fn test_push_keeps_pull_fields() {
        let pulled = pull("https://example.com/ical/a").apply(None, "acct-1", at(9));
        let pushed = IntegrationUpdate::Push {
            document: "BEGIN:VCALENDAR".to_string(),
        }
        .apply(Some(pulled), "acct-1", at(10));

        assert_eq!(pushed.feed_url.as_deref(), Some("https://example.com/ical/a"));
        assert_eq!(pushed.published_document.as_deref(), Some("BEGIN:VCALENDAR"));
        assert_eq!(pushed.last_sync_at, Some(at(10)));
    }

    #[test]
    fn test_sync_reactivates() {
        let mut record = pull("https://example.com/ical/a").apply(None, "acct-1", at(9));
        record.is_active = false;

        let record = pull("https://example.com/ical/b").apply(Some(record), "acct-1", at(10));
        assert!(record.is_active);
        assert_eq!(record.feed_url.as_deref(), Some("https://example.com/ical/b"));
    }

    #[test]
    fn test_deactivate_only_touches_flag() {
        let record = pull("https://example.com/ical/a").apply(None, "acct-1", at(9));
        let deactivated = IntegrationUpdate::Deactivate.apply(Some(record.clone()), "acct-1", at(11));

        assert!(!deactivated.is_active);
        assert_eq!(deactivated.last_sync_at, record.last_sync_at);
        assert_eq!(deactivated.feed_url, record.feed_url);
    }

    #[test]
    fn test_repeated_pull_only_advances_timestamp() {
        let first = pull("https://example.com/ical/a").apply(None, "acct-1", at(9));
        let second = pull("https://example.com/ical/a").apply(Some(first.clone()), "acct-1", at(10));

        assert_eq!(
            CalendarIntegration {
                last_sync_at: first.last_sync_at,
                ..second.clone()
            },
            first
        );
        assert_eq!(second.last_sync_at, Some(at(10)));
    }
}
