//! Feed generation from job records.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;

use crate::constants::{
    DEFAULT_CALENDAR_NAME, EVENT_DURATION_HOURS, PRODUCT_ID, UID_DOMAIN, UID_NAMESPACE,
};
use crate::ics::escape_text;
use crate::job::JobRecord;

const CRLF: &str = "\r\n";

/// Settings that are not part of the job data itself.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Shown by calendar apps as the subscription name (X-WR-CALNAME)
    pub calendar_name: String,
    /// Zone used to read job dates and times
    pub timezone: Tz,
    /// Stamped into CREATED, LAST-MODIFIED and DTSTAMP
    pub generated_at: DateTime<Utc>,
}

impl GenerateOptions {
    pub fn new(calendar_name: impl Into<String>) -> Self {
        GenerateOptions {
            calendar_name: calendar_name.into(),
            timezone: local_timezone(),
            generated_at: Utc::now(),
        }
    }

    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn with_generated_at(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = generated_at;
        self
    }
}

impl Default for GenerateOptions {
    fn default() -> Self {
        GenerateOptions::new(DEFAULT_CALENDAR_NAME)
    }
}

/// The environment's local zone, or UTC when it cannot be determined.
pub fn local_timezone() -> Tz {
    iana_time_zone::get_timezone()
        .ok()
        .and_then(|name| name.parse::<Tz>().ok())
        .unwrap_or(Tz::UTC)
}

/// Stable UID for a job, so re-publishing never duplicates events downstream.
pub fn event_uid(job_id: &str) -> String {
    format!("{UID_NAMESPACE}-{job_id}@{UID_DOMAIN}")
}

fn format_utc(dt: DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}

fn summary_for(job: &JobRecord) -> String {
    match job.client_name.as_deref().filter(|n| !n.trim().is_empty()) {
        Some(client) => format!("{} - {}", job.title, client),
        None => job.title.clone(),
    }
}

/// Description, status and id, one per line, joined by the literal `\n` escape.
fn description_for(job: &JobRecord) -> String {
    let mut parts = Vec::new();
    if let Some(desc) = job.description.as_deref().filter(|d| !d.is_empty()) {
        parts.push(escape_text(desc));
    }
    if let Some(status) = job.status.as_deref().filter(|s| !s.is_empty()) {
        parts.push(escape_text(&format!("Status: {status}")));
    }
    parts.push(escape_text(&format!("Job ID: {}", job.id)));
    parts.join("\\n")
}

fn event_lines(job: &JobRecord, start: DateTime<Utc>, stamp: &str) -> Vec<String> {
    let end = start + Duration::hours(EVENT_DURATION_HOURS);

    let mut lines = vec![
        "BEGIN:VEVENT".to_string(),
        format!("UID:{}", event_uid(&job.id)),
        format!("DTSTAMP:{stamp}"),
        format!("DTSTART:{}", format_utc(start)),
        format!("DTEND:{}", format_utc(end)),
        format!("SUMMARY:{}", escape_text(&summary_for(job))),
        format!("DESCRIPTION:{}", description_for(job)),
    ];

    // Omitted rather than emitted empty
    if let Some(address) = job.client_address.as_deref().filter(|a| !a.trim().is_empty()) {
        lines.push(format!("LOCATION:{}", escape_text(address)));
    }

    lines.extend([
        "TRANSP:OPAQUE".to_string(),
        "STATUS:CONFIRMED".to_string(),
        "SEQUENCE:0".to_string(),
        format!("CREATED:{stamp}"),
        format!("LAST-MODIFIED:{stamp}"),
        "END:VEVENT".to_string(),
    ]);

    lines
}

/// Jobs that become events, paired with their start instant in `tz`.
pub fn scheduled_events(
    jobs: &[JobRecord],
    tz: Tz,
) -> impl Iterator<Item = (&JobRecord, DateTime<Utc>)> {
    jobs.iter()
        .filter(|job| job.is_eligible())
        .filter_map(move |job| Some((job, job.scheduled_start(tz)?)))
}

/// Render every eligible job as a VEVENT inside a single VCALENDAR document.
///
/// Jobs without a readable date and time, or whose id could not sit on a
/// single content line, are skipped. With no eligible jobs the
/// result is a valid, empty calendar.
pub fn generate(jobs: &[JobRecord], options: &GenerateOptions) -> String {
    let stamp = format_utc(options.generated_at);

    let mut lines = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        format!("PRODID:{PRODUCT_ID}"),
        "CALSCALE:GREGORIAN".to_string(),
        "METHOD:PUBLISH".to_string(),
        format!("X-WR-CALNAME:{}", escape_text(&options.calendar_name)),
        format!("X-WR-TIMEZONE:{}", options.timezone.name()),
    ];

    for (job, start) in scheduled_events(jobs, options.timezone) {
        lines.extend(event_lines(job, start, &stamp));
    }

    lines.push("END:VCALENDAR".to_string());

    let mut document = lines.join(CRLF);
    document.push_str(CRLF);
    document
}
