//! Job-data providers.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::job::JobRecord;
use crate::store::is_safe_key;

#[derive(Error, Debug)]
pub enum JobSourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not parse jobs: {0}")]
    Parse(String),

    #[error("Account id '{0}' cannot be used to look up jobs")]
    InvalidAccountId(String),

    #[error("Job source unavailable: {0}")]
    Unavailable(String),
}

impl JobSourceError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, JobSourceError::Io(_) | JobSourceError::Unavailable(_))
    }
}

pub type JobSourceResult<T> = Result<T, JobSourceError>;

#[async_trait]
pub trait JobSource: Send + Sync {
    /// Jobs for `account_id` scheduled on or after `today`, in display order.
    async fn list_upcoming(
        &self,
        account_id: &str,
        today: NaiveDate,
    ) -> JobSourceResult<Vec<JobRecord>>;
}

/// Keeps only jobs dated today or later. Undated jobs are dropped too, since
/// they could never become events.
fn upcoming(jobs: Vec<JobRecord>, today: NaiveDate) -> Vec<JobRecord> {
    jobs.into_iter().filter(|j| j.is_upcoming(today)).collect()
}

/// Jobs held in memory, keyed by account.
#[derive(Default)]
pub struct MemoryJobs {
    jobs: Mutex<HashMap<String, Vec<JobRecord>>>,
}

impl MemoryJobs {
    pub fn new() -> Self {
        MemoryJobs::default()
    }

    pub fn set(&self, account_id: &str, jobs: Vec<JobRecord>) {
        if let Ok(mut map) = self.jobs.lock() {
            map.insert(account_id.to_string(), jobs);
        }
    }
}

#[async_trait]
impl JobSource for MemoryJobs {
    async fn list_upcoming(
        &self,
        account_id: &str,
        today: NaiveDate,
    ) -> JobSourceResult<Vec<JobRecord>> {
        let jobs = self
            .jobs
            .lock()
            .map_err(|_| JobSourceError::Unavailable("job map lock poisoned".into()))?
            .get(account_id)
            .cloned()
            .unwrap_or_default();
        Ok(upcoming(jobs, today))
    }
}

/// Reads `<dir>/<account_id>.json`, a JSON array of job records.
///
/// A missing file means the account has no jobs.
pub struct FileJobs {
    dir: PathBuf,
}

impl FileJobs {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileJobs { dir: dir.into() }
    }
}

#[async_trait]
impl JobSource for FileJobs {
    async fn list_upcoming(
        &self,
        account_id: &str,
        today: NaiveDate,
    ) -> JobSourceResult<Vec<JobRecord>> {
        // Same rule as the integration store, so both agree on which accounts exist
        if !is_safe_key(account_id) {
            return Err(JobSourceError::InvalidAccountId(account_id.to_string()));
        }

        let path = self.dir.join(format!("{account_id}.json"));
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let jobs: Vec<JobRecord> = serde_json::from_str(&content)
            .map_err(|e| JobSourceError::Parse(format!("{}: {e}", path.display())))?;
        Ok(upcoming(jobs, today))
    }
}
