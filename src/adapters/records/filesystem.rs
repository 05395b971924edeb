//! Filesystem record store
//!
//! Records live as `<root>/<record_id>.json`. [`RecordId`] validation keeps
//! identifiers from escaping `root`.

use super::RecordStore;
use crate::domain::errors::DocshipError;
use crate::domain::ids::RecordId;
use crate::domain::record::LogRecord;
use crate::domain::Result;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Record store reading JSON files from a directory
#[derive(Debug, Clone)]
pub struct FsRecordStore {
    root: PathBuf,
}

impl FsRecordStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file a record is read from
    pub fn record_path(&self, id: &RecordId) -> PathBuf {
        self.root.join(format!("{id}.json"))
    }

    /// Check the root directory exists and is a directory
    pub async fn check(&self) -> Result<()> {
        let metadata = tokio::fs::metadata(&self.root).await.map_err(|e| {
            DocshipError::RecordStore(format!(
                "Record directory {} is not accessible: {e}",
                self.root.display()
            ))
        })?;
        if !metadata.is_dir() {
            return Err(DocshipError::RecordStore(format!(
                "Record path {} is not a directory",
                self.root.display()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for FsRecordStore {
    async fn fetch(&self, id: &RecordId) -> Result<Option<LogRecord>> {
        let path = self.record_path(id);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(record_id = %id, path = %path.display(), "Record file not found");
                return Ok(None);
            }
            Err(e) => {
                return Err(DocshipError::RecordStore(format!(
                    "Failed to read {}: {e}",
                    path.display()
                )))
            }
        };

        let record: LogRecord = serde_json::from_slice(&bytes).map_err(|e| {
            DocshipError::RecordStore(format!("Corrupt record {}: {e}", path.display()))
        })?;

        if record.id != *id {
            return Err(DocshipError::RecordStore(format!(
                "Record file {} holds id '{}'",
                path.display(),
                record.id
            )));
        }

        Ok(Some(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, body: &str) {
        std::fs::write(dir.path().join(name), body).unwrap();
    }

    #[tokio::test]
    async fn test_fetch_reads_json_file() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "42.json",
            r#"{"id":"42","timestamp":"2024-05-01T12:00:00Z","level":"error","message":"boom"}"#,
        );

        let store = FsRecordStore::new(dir.path());
        let record = store
            .fetch(&RecordId::new("42").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.level, "error");
        assert_eq!(record.message, "boom");
    }

    #[tokio::test]
    async fn test_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let store = FsRecordStore::new(dir.path());
        let result = store.fetch(&RecordId::new("99").unwrap()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_error() {
        let dir = TempDir::new().unwrap();
        write(&dir, "7.json", "{ not json");
        let store = FsRecordStore::new(dir.path());
        let result = store.fetch(&RecordId::new("7").unwrap()).await;
        assert!(matches!(result, Err(DocshipError::RecordStore(_))));
    }

    #[tokio::test]
    async fn test_id_mismatch_is_error() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "7.json",
            r#"{"id":"8","timestamp":"2024-05-01T12:00:00Z","message":"x"}"#,
        );
        let store = FsRecordStore::new(dir.path());
        assert!(store.fetch(&RecordId::new("7").unwrap()).await.is_err());
    }

    #[tokio::test]
    async fn test_check_root() {
        let dir = TempDir::new().unwrap();
        assert!(FsRecordStore::new(dir.path()).check().await.is_ok());
        assert!(FsRecordStore::new(dir.path().join("nope")).check().await.is_err());
    }
}
