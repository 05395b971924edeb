//! In-memory record store

use super::RecordStore;
use crate::domain::ids::RecordId;
use crate::domain::record::LogRecord;
use crate::domain::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// Record store backed by a map, for tests and local runs
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    records: RwLock<HashMap<RecordId, LogRecord>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store holding the given records
    pub fn with_records(records: impl IntoIterator<Item = LogRecord>) -> Self {
        let store = Self::new();
        for record in records {
            store.insert(record);
        }
        store
    }

    /// Insert or replace a record
    pub fn insert(&self, record: LogRecord) {
        let mut records = self
            .records
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        records.insert(record.id.clone(), record);
    }

    pub fn remove(&self, id: &RecordId) -> Option<LogRecord> {
        let mut records = self
            .records
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        records.remove(id)
    }

    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn fetch(&self, id: &RecordId) -> Result<Option<LogRecord>> {
        let records = self
            .records
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(records.get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(id: &str) -> LogRecord {
        LogRecord::new(RecordId::new(id).unwrap(), Utc::now(), "info", "api", "hello")
    }

    #[tokio::test]
    async fn test_fetch_existing_and_missing() {
        let store = InMemoryRecordStore::with_records([record("42")]);

        let found = store.fetch(&RecordId::new("42").unwrap()).await.unwrap();
        assert_eq!(found.unwrap().message, "hello");

        let missing = store.fetch(&RecordId::new("99").unwrap()).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_insert_replaces() {
        let store = InMemoryRecordStore::new();
        store.insert(record("1"));
        let mut updated = record("1");
        updated.message = "changed".to_string();
        store.insert(updated);

        assert_eq!(store.len(), 1);
        let fetched = store.fetch(&RecordId::new("1").unwrap()).await.unwrap();
        assert_eq!(fetched.unwrap().message, "changed");
    }

    #[tokio::test]
    async fn test_remove() {
        let store = InMemoryRecordStore::with_records([record("1")]);
        assert!(store.remove(&RecordId::new("1").unwrap()).is_some());
        assert!(store.is_empty());
    }
}
