use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::integration::{CalendarIntegration, IntegrationUpdate};
use crate::store::{IntegrationStore, StoreError, StoreResult, is_safe_key};

/// One JSON file per account: `<dir>/<account_id>.json`.
///
/// Writes go to a temporary file first and are renamed into place, so a
/// failed write never leaves a half-written record behind.
pub struct FileStore {
    dir: PathBuf,
    // Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, account_id: &str) -> StoreResult<PathBuf> {
        if !is_safe_key(account_id) {
            return Err(StoreError::InvalidAccountId(account_id.to_string()));
        }
        Ok(self.dir.join(format!("{account_id}.json")))
    }

    async fn read(&self, path: &Path) -> StoreResult<Option<CalendarIntegration>> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let record = serde_json::from_str(&content)
            .map_err(|e| StoreError::Serialization(format!("{}: {e}", path.display())))?;
        Ok(Some(record))
    }
}

#[async_trait]
impl IntegrationStore for FileStore {
    async fn get(&self, account_id: &str) -> StoreResult<Option<CalendarIntegration>> {
        let path = self.record_path(account_id)?;
        self.read(&path).await
    }

    async fn upsert(
        &self,
        account_id: &str,
        update: IntegrationUpdate,
        now: DateTime<Utc>,
    ) -> StoreResult<CalendarIntegration> {
        let path = self.record_path(account_id)?;
        let _guard = self.write_lock.lock().await;

        let existing = self.read(&path).await?;
        let record = update.apply(existing, account_id, now);

        let content = serde_json::to_string_pretty(&record)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        tokio::fs::create_dir_all(&self.dir).await?;
        let temp = path.with_extension("json.tmp");
        tokio::fs::write(&temp, content).await?;
        tokio::fs::rename(&temp, &path).await?;

        tracing::debug!(account_id, path = %path.display(), "integration record written");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed_url::FeedKind;

    fn pull() -> IntegrationUpdate {
        IntegrationUpdate::Pull {
            feed_url: "https://example.com/ical/a".into(),
            feed_kind: FeedKind::GenericIcal,
        }
    }

    #[tokio::test]
    async fn test_missing_record_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert!(store.get("acct").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_records_survive_new_instance() {
        let dir = tempfile::tempdir().unwrap();
        let written = FileStore::new(dir.path().join("integrations"))
            .upsert("acct-1", pull(), Utc::now())
            .await
            .unwrap();

        let reopened = FileStore::new(dir.path().join("integrations"));
        assert_eq!(reopened.get("acct-1").await.unwrap(), Some(written));
        assert!(dir.path().join("integrations/acct-1.json").exists());
        assert!(!dir.path().join("integrations/acct-1.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_rejects_unsafe_account_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        for bad in ["", "../escape", ".hidden", "a/b", "spaces are bad"] {
            let result = store.upsert(bad, pull(), Utc::now()).await;
            assert!(
                matches!(result, Err(StoreError::InvalidAccountId(_))),
                "expected {bad:?} to be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_corrupt_record_is_reported_and_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("acct.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = FileStore::new(dir.path());
        let result = store.upsert("acct", pull(), Utc::now()).await;

        assert!(matches!(result, Err(StoreError::Serialization(_))));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[tokio::test]
    async fn test_failed_write_leaves_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.upsert("acct", pull(), Utc::now()).await.unwrap();
        let path = dir.path().join("acct.json");
        let before = std::fs::read(&path).unwrap();

        std::fs::create_dir(dir.path().join("acct.json.tmp")).unwrap();
        let result = store
            .upsert("acct", IntegrationUpdate::Deactivate, Utc::now())
            .await;

        assert!(matches!(result, Err(StoreError::Io(_))));
        assert_eq!(std::fs::read(&path).unwrap(), before);
        assert!(store.get("acct").await.unwrap().unwrap().is_active);
    }
}
