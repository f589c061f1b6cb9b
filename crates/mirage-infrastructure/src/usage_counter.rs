//! TOML-backed UsageCounter implementation.

use crate::dto::UsageRecord;
use crate::paths::MiragePaths;
use crate::storage::AtomicTomlFile;
use async_trait::async_trait;
use mirage_core::error::{MirageError, Result};
use mirage_core::gallery::UsageCounter;
use std::path::PathBuf;
use std::sync::Arc;

/// Usage counter persisted in `usage.toml`.
///
/// Increments run under an exclusive file lock on the blocking pool.
#[derive(Clone)]
pub struct TomlUsageCounter {
    file: Arc<AtomicTomlFile<UsageRecord>>,
}

impl TomlUsageCounter {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicTomlFile::new(path)),
        }
    }

    pub fn from_paths(paths: &MiragePaths) -> Result<Self> {
        Ok(Self::new(paths.usage_file()?))
    }

    async fn run_blocking<R, F>(&self, f: F) -> Result<R>
    where
        R: Send + 'static,
        F: FnOnce(&AtomicTomlFile<UsageRecord>) -> Result<R> + Send + 'static,
    {
        let file = Arc::clone(&self.file);
        tokio::task::spawn_blocking(move || f(&file))
            .await
            .map_err(|e| MirageError::internal(format!("Usage counter task failed: {e}")))?
    }
}

#[async_trait]
impl UsageCounter for TomlUsageCounter {
    async fn get(&self) -> Result<u64> {
        self.run_blocking(|file| Ok(file.load()?.map(|record| record.count).unwrap_or(0)))
            .await
    }

    async fn increment_and_get(&self) -> Result<u64> {
        let count = self
            .run_blocking(|file| {
                Ok(file.update(UsageRecord::new(), |record| {
                    record.count = record.count.saturating_add(1);
                    Ok(record.count)
                })?)
            })
            .await
            .map_err(|e| MirageError::persistence(format!("Failed to increment usage counter: {e}")))?;

        tracing::debug!(count, "Usage counter incremented");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_starts_at_zero() {
        let temp_dir = TempDir::new().unwrap();
        let counter = TomlUsageCounter::new(temp_dir.path().join("usage.toml"));
        assert_eq!(counter.get().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_increment_persists_across_instances() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("usage.toml");

        let counter = TomlUsageCounter::new(path.clone());
        assert_eq!(counter.increment_and_get().await.unwrap(), 1);
        assert_eq!(counter.increment_and_get().await.unwrap(), 2);

        let reopened = TomlUsageCounter::new(path);
        assert_eq!(reopened.get().await.unwrap(), 2);
        assert_eq!(reopened.increment_and_get().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("usage.toml");
        std::fs::write(&path, "count = \"many\"").unwrap();

        let counter = TomlUsageCounter::new(path);
        assert!(counter.get().await.is_err());
        assert!(counter.increment_and_get().await.unwrap_err().is_persistence());
    }
}
