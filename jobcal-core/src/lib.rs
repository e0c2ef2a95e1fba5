//! Calendar feed interoperability for job scheduling.
//!
//! This crate provides everything behind jobcal's pull and push syncs:
//! - `feed_url` validates remote feed links before any network call
//! - `ics` parses feed documents into events and generates feeds from jobs
//! - `sync` coordinates fetching, parsing/generation and record storage
//! - `fetch`, `store` and `jobs` hold the collaborator traits and their implementations

pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod feed_url;
pub mod fetch;
pub mod ics;
pub mod integration;
pub mod job;
pub mod jobs;
pub mod store;
pub mod sync;

pub use config::JobcalConfig;
pub use error::{FetchError, JobcalError, JobcalResult, SyncError, SyncResult};
pub use event::{CalendarEvent, EventTime};
pub use integration::{CalendarIntegration, IntegrationUpdate};
pub use job::JobRecord;
pub use jobs::JobSourceError;
pub use sync::{FeedLocator, PullOutcome, PushOutcome, SyncCoordinator};
