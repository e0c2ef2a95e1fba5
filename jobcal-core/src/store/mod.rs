//! Persistence of integration records.
//!
//! Stores only promise two things: a lookup by account id, and an upsert that
//! applies an [`IntegrationUpdate`] atomically per record. What the update
//! writes is decided by [`IntegrationUpdate::apply`], not by the store.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::integration::{CalendarIntegration, IntegrationUpdate};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not (de)serialize record: {0}")]
    Serialization(String),

    #[error("Account id '{0}' cannot be used as a storage key")]
    InvalidAccountId(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// IO trouble and an unavailable backend can clear up; a bad key or a corrupt record cannot.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Io(_) | StoreError::Unavailable(_))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

const MAX_ACCOUNT_ID_LEN: usize = 128;

/// Account ids become file names, so only a conservative character set is allowed.
pub(crate) fn is_safe_key(account_id: &str) -> bool {
    !account_id.is_empty()
        && account_id.len() <= MAX_ACCOUNT_ID_LEN
        && !account_id.starts_with('.')
        && account_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

#[async_trait]
pub trait IntegrationStore: Send + Sync {
    async fn get(&self, account_id: &str) -> StoreResult<Option<CalendarIntegration>>;

    /// Read the current record, apply `update`, and write the result back as one step.
    /// On error the stored record is unchanged.
    async fn upsert(
        &self,
        account_id: &str,
        update: IntegrationUpdate,
        now: DateTime<Utc>,
    ) -> StoreResult<CalendarIntegration>;
}
