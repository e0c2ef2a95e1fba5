//! Pull-sync and push-sync.
//!
//! Each call is a complete transaction: it validates, talks to at most one
//! remote, and then performs a single record upsert. Any failure before the
//! upsert returns early, so a stored integration is either fully updated or
//! left exactly as it was.

mod locator;

pub use locator::FeedLocator;

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::config::JobcalConfig;
use crate::constants::CALENDAR_START_MARKER;
use crate::error::{FetchError, JobcalError, JobcalResult, SyncError, SyncResult};
use crate::event::CalendarEvent;
use crate::feed_url;
use crate::fetch::{FeedFetcher, HttpFetcher};
use crate::ics::{self, GenerateOptions};
use crate::integration::{CalendarIntegration, IntegrationUpdate};
use crate::jobs::{FileJobs, JobSource};
use crate::store::{FileStore, IntegrationStore};

/// Source of "now". Swappable so tests can control timestamps.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

#[derive(Debug, Clone, Serialize)]
pub struct PullOutcome {
    pub event_count: usize,
    pub events: Vec<CalendarEvent>,
    pub integration: CalendarIntegration,
}

#[derive(Debug, Clone, Serialize)]
pub struct PushOutcome {
    pub event_count: usize,
    /// Where subscribers retrieve the published document
    pub feed_url: String,
    pub integration: CalendarIntegration,
}

pub struct SyncCoordinator {
    fetcher: Arc<dyn FeedFetcher>,
    store: Arc<dyn IntegrationStore>,
    jobs: Arc<dyn JobSource>,
    locator: FeedLocator,
    calendar_name: String,
    timezone: Tz,
    clock: Clock,
}

impl SyncCoordinator {
    pub fn new(
        fetcher: Arc<dyn FeedFetcher>,
        store: Arc<dyn IntegrationStore>,
        jobs: Arc<dyn JobSource>,
        locator: FeedLocator,
    ) -> Self {
        let defaults = GenerateOptions::default();
        SyncCoordinator {
            fetcher,
            store,
            jobs,
            locator,
            calendar_name: defaults.calendar_name,
            timezone: defaults.timezone,
            clock: Arc::new(Utc::now),
        }
    }

    /// HTTP fetching plus file-backed records and jobs under the configured data dir.
    pub fn from_config(config: &JobcalConfig) -> JobcalResult<Self> {
        let data_dir = config.data_dir()?;
        let locator = FeedLocator::parse(&config.public_base_url).map_err(|e| {
            JobcalError::Config(format!(
                "Invalid public_base_url '{}': {e}",
                config.public_base_url
            ))
        })?;

        let fetcher = HttpFetcher::new(Duration::from_secs(config.fetch_timeout_secs));
        let coordinator = SyncCoordinator::new(
            Arc::new(fetcher),
            Arc::new(FileStore::new(data_dir.join("integrations"))),
            Arc::new(FileJobs::new(data_dir.join("jobs"))),
            locator,
        )
        .with_calendar_name(config.calendar_name.clone())
        .with_timezone(config.timezone()?);

        Ok(coordinator)
    }

    pub fn with_calendar_name(mut self, calendar_name: impl Into<String>) -> Self {
        self.calendar_name = calendar_name.into();
        self
    }

    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn locator(&self) -> &FeedLocator {
        &self.locator
    }

    /// Ingest the remote feed at `url` and remember it for `account_id`.
    pub async fn pull_sync(&self, account_id: &str, url: &str) -> SyncResult<PullOutcome> {
        let result = self.try_pull(account_id, url).await;
        match &result {
            Ok(outcome) => tracing::info!(
                account_id,
                events = outcome.event_count,
                "pull-sync complete"
            ),
            Err(e) => tracing::warn!(account_id, kind = e.kind(), error = %e, "pull-sync failed"),
        }
        result
    }

    async fn try_pull(&self, account_id: &str, url: &str) -> SyncResult<PullOutcome> {
        let feed_url = feed_url::validate(url)?;

        tracing::debug!(account_id, url = %feed_url, "fetching remote feed");
        let response = self.fetcher.fetch_text(feed_url.as_url()).await?;
        if !response.is_success() {
            return Err(FetchError::Status(response.status).into());
        }

        if !response.body.contains(CALENDAR_START_MARKER) {
            return Err(SyncError::InvalidFeedFormat {
                missing: CALENDAR_START_MARKER,
            });
        }

        let events = ics::parse(&response.body);
        tracing::debug!(account_id, events = events.len(), "parsed remote feed");

        let update = IntegrationUpdate::Pull {
            feed_url: feed_url.as_str().to_string(),
            feed_kind: feed_url.kind(),
        };
        let integration = self.store.upsert(account_id, update, (self.clock)()).await?;

        Ok(PullOutcome {
            event_count: events.len(),
            events,
            integration,
        })
    }

    /// Publish a feed generated from the account's upcoming jobs.
    pub async fn push_sync(&self, account_id: &str) -> SyncResult<PushOutcome> {
        let result = self.try_push(account_id).await;
        match &result {
            Ok(outcome) => tracing::info!(
                account_id,
                events = outcome.event_count,
                feed_url = %outcome.feed_url,
                "push-sync complete"
            ),
            Err(e) => tracing::warn!(account_id, kind = e.kind(), error = %e, "push-sync failed"),
        }
        result
    }

    async fn try_push(&self, account_id: &str) -> SyncResult<PushOutcome> {
        let now = (self.clock)();
        let today = now.with_timezone(&self.timezone).date_naive();

        let jobs = self.jobs.list_upcoming(account_id, today).await?;
        tracing::debug!(account_id, jobs = jobs.len(), %today, "loaded upcoming jobs");

        let options = GenerateOptions::new(self.calendar_name.clone())
            .with_timezone(self.timezone)
            .with_generated_at(now);
        let document = ics::generate(&jobs, &options);
        let event_count = ics::scheduled_events(&jobs, self.timezone).count();

        let integration = self
            .store
            .upsert(account_id, IntegrationUpdate::Push { document }, now)
            .await?;

        Ok(PushOutcome {
            event_count,
            feed_url: self.locator.feed_url(account_id),
            integration,
        })
    }

    pub async fn integration(&self, account_id: &str) -> SyncResult<Option<CalendarIntegration>> {
        Ok(self.store.get(account_id).await?)
    }

    /// Turn the integration off without deleting it. `None` if the account never synced.
    pub async fn deactivate(&self, account_id: &str) -> SyncResult<Option<CalendarIntegration>> {
        if self.store.get(account_id).await?.is_none() {
            return Ok(None);
        }

        let record = self
            .store
            .upsert(account_id, IntegrationUpdate::Deactivate, (self.clock)())
            .await?;
        tracing::info!(account_id, "integration deactivated");
        Ok(Some(record))
    }

    /// The document to serve to subscribers, if the integration is active and has one.
    pub async fn published_document(&self, account_id: &str) -> SyncResult<Option<String>> {
        Ok(self
            .store
            .get(account_id)
            .await?
            .filter(|r| r.is_active)
            .and_then(|r| r.published_document))
    }
}
