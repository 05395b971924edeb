//! Log record sources
//!
//! The document builder reads records through [`RecordStore`]. A missing record
//! is `Ok(None)`; `Err` is reserved for a store that cannot be read.

pub mod filesystem;
pub mod memory;

pub use filesystem::FsRecordStore;
pub use memory::InMemoryRecordStore;

use crate::domain::ids::RecordId;
use crate::domain::record::LogRecord;
use crate::domain::Result;
use async_trait::async_trait;

/// Read access to stored log records
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch a record by identifier
    ///
    /// # Errors
    ///
    /// Returns [`DocshipError::RecordStore`](crate::domain::DocshipError::RecordStore)
    /// if the store is unreachable or the stored record is corrupt.
    async fn fetch(&self, id: &RecordId) -> Result<Option<LogRecord>>;
}
