//! Error types for the jobcal ecosystem.

use std::time::Duration;

use thiserror::Error;

use crate::feed_url::FeedUrlError;
use crate::jobs::JobSourceError;
use crate::store::StoreError;

/// Why a remote feed could not be retrieved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("remote server responded with HTTP {0}")]
    Status(u16),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("request failed: {0}")]
    Transport(String),
}

/// Errors reported by pull-sync and push-sync.
///
/// None of these are retried internally. Callers decide whether to retry
/// using [`SyncError::is_retryable`].
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Malformed feed URL: {0}")]
    MalformedUrl(String),

    #[error("Not a calendar feed URL: {0}")]
    NotAFeedUrl(String),

    #[error("Could not fetch feed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Invalid feed format: missing {missing}")]
    InvalidFeedFormat { missing: &'static str },

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Could not load jobs: {0}")]
    JobSource(#[from] JobSourceError),
}

impl SyncError {
    /// Short machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            SyncError::MalformedUrl(_) => "malformed_url",
            SyncError::NotAFeedUrl(_) => "not_a_feed_url",
            SyncError::Fetch(_) => "fetch_error",
            SyncError::InvalidFeedFormat { .. } => "invalid_feed_format",
            SyncError::Storage(_) => "storage_error",
            SyncError::JobSource(_) => "job_source_error",
        }
    }

    /// Network and storage failures may succeed on a later attempt; bad input never will.
    pub fn is_retryable(&self) -> bool {
        match self {
            SyncError::Fetch(_) => true,
            SyncError::Storage(e) => e.is_retryable(),
            SyncError::JobSource(e) => e.is_retryable(),
            SyncError::MalformedUrl(_)
            | SyncError::NotAFeedUrl(_)
            | SyncError::InvalidFeedFormat { .. } => false,
        }
    }
}

impl From<FeedUrlError> for SyncError {
    fn from(err: FeedUrlError) -> Self {
        match err {
            FeedUrlError::Malformed { .. } => SyncError::MalformedUrl(err.to_string()),
            FeedUrlError::NotAFeed { .. } => SyncError::NotAFeedUrl(err.to_string()),
        }
    }
}

pub type SyncResult<T> = Result<T, SyncError>;

/// Errors outside the sync path (configuration, local files).
#[derive(Error, Debug)]
pub enum JobcalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for configuration operations.
pub type JobcalResult<T> = Result<T, JobcalError>;
