//! Object storage capability
//!
//! [`ObjectStore`] is the static capability the upload manager and link broker
//! depend on. Implementations report what the platform said as a
//! [`StorageError`]; retry decisions are made by the caller.

pub mod factory;
pub mod http;
pub mod memory;
pub mod signing;

pub use factory::create_object_store;
pub use http::HttpObjectStore;
pub use memory::{FaultPlan, InMemoryObjectStore, WriteAttempt};

use crate::domain::errors::StorageError;
use crate::domain::ids::StorageKey;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Platform acknowledgement of a completed write
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteAck {
    pub etag: Option<String>,
    pub version: Option<String>,
}

/// A signed, expiring URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedUrl {
    pub url: String,
    pub expires_at: DateTime<Utc>,
}

/// Storage client capability shared read-only across exports
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Write the full payload under `key`, replacing any existing object
    ///
    /// Returns only once the platform has acknowledged the write.
    async fn write(
        &self,
        key: &StorageKey,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<WriteAck, StorageError>;

    /// Produce a URL for `key` that stops working after `ttl`
    async fn sign(&self, key: &StorageKey, ttl: Duration) -> Result<SignedUrl, StorageError>;

    /// Permanent URL for `key`, if the platform serves objects publicly
    fn public_url(&self, key: &StorageKey) -> Option<String>;

    /// Whether client links must be signed
    fn requires_signing(&self) -> bool;
}
