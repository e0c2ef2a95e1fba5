use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::integration::{CalendarIntegration, IntegrationUpdate};
use crate::store::{IntegrationStore, StoreError, StoreResult};

/// Records kept in a map. Used by tests and by embedders that persist elsewhere.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, CalendarIntegration>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Make every following upsert fail with [`StoreError::Unavailable`].
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.lock()?.is_empty())
    }

    /// Seed a record directly, bypassing update semantics.
    pub fn insert(&self, record: CalendarIntegration) -> StoreResult<()> {
        let mut records = self.lock()?;
        records.insert(record.account_id.clone(), record);
        Ok(())
    }

    fn lock(
        &self,
    ) -> StoreResult<std::sync::MutexGuard<'_, HashMap<String, CalendarIntegration>>> {
        self.records
            .lock()
            .map_err(|_| StoreError::Unavailable("record map lock poisoned".into()))
    }
}

#[async_trait]
impl IntegrationStore for MemoryStore {
    async fn get(&self, account_id: &str) -> StoreResult<Option<CalendarIntegration>> {
        Ok(self.lock()?.get(account_id).cloned())
    }

    async fn upsert(
        &self,
        account_id: &str,
        update: IntegrationUpdate,
        now: DateTime<Utc>,
    ) -> StoreResult<CalendarIntegration> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("writes disabled".into()));
        }

        let mut records = self.lock()?;
        let record = update.apply(records.get(account_id).cloned(), account_id, now);
        records.insert(account_id.to_string(), record.clone());
        Ok(record)
    }
}
