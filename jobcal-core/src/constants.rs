/// Path segment that marks a URL as a calendar export link.
pub const FEED_PATH_MARKER: &str = "/ical/";

/// A fetched feed must contain this line to be accepted.
pub const CALENDAR_START_MARKER: &str = "BEGIN:VCALENDAR";

pub const PRODUCT_ID: &str = "-//jobcal//Job Schedule//EN";

/// Generated UIDs look like `job-<id>@jobcal`.
pub const UID_NAMESPACE: &str = "job";
pub const UID_DOMAIN: &str = "jobcal";

/// Jobs carry no duration, so every generated event lasts this long.
pub const EVENT_DURATION_HOURS: i64 = 2;

pub const DEFAULT_CALENDAR_NAME: &str = "Jobs";

pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_SERVER_PORT: u16 = 4096;

pub const ICS_MEDIA_TYPE: &str = "text/calendar; charset=utf-8";
