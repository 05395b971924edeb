//! In-memory object store with scripted faults
//!
//! Every write attempt that reaches the store is logged with the payload
//! checksum, so tests can assert retry counts and that each retry re-sent the
//! same bytes. Artificial latency is applied before an attempt is logged; an
//! attempt cancelled during the delay leaves no trace.

use super::{ObjectStore, SignedUrl, WriteAck};
use crate::core::checksum::calculate_checksum_bytes;
use crate::domain::errors::StorageError;
use crate::domain::ids::StorageKey;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

const BASE_URL: &str = "memory://docship";

/// One write call as seen by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteAttempt {
    pub key: StorageKey,
    pub checksum: String,
    pub size: u64,
    pub succeeded: bool,
}

/// Scripted failures and delays
///
/// Write failures are consumed in order, one per write call; once the queue is
/// empty writes succeed.
#[derive(Debug, Clone, Default)]
pub struct FaultPlan {
    write_failures: VecDeque<StorageError>,
    write_latency: Option<Duration>,
    sign_failure: Option<StorageError>,
}

impl FaultPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `n` writes with a transient network error
    pub fn fail_transient(mut self, n: usize) -> Self {
        for i in 0..n {
            self.write_failures
                .push_back(StorageError::Network(format!("connection reset ({})", i + 1)));
        }
        self
    }

    /// Fail the next write with `error`
    pub fn fail_write_with(mut self, error: StorageError) -> Self {
        self.write_failures.push_back(error);
        self
    }

    /// Delay every write by `latency`
    pub fn write_latency(mut self, latency: Duration) -> Self {
        self.write_latency = Some(latency);
        self
    }

    /// Fail every signing call with `error`
    pub fn fail_signing(mut self, error: StorageError) -> Self {
        self.sign_failure = Some(error);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkMode {
    Signed,
    Permanent,
    NoSigning,
}

#[derive(Debug, Clone)]
struct StoredObject {
    bytes: Vec<u8>,
    content_type: String,
}

/// Thread-safe in-process [`ObjectStore`]
#[derive(Debug)]
pub struct InMemoryObjectStore {
    objects: Mutex<HashMap<StorageKey, StoredObject>>,
    attempts: Mutex<Vec<WriteAttempt>>,
    faults: Mutex<FaultPlan>,
    mode: LinkMode,
    versions: AtomicU64,
    signatures: AtomicU64,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl InMemoryObjectStore {
    /// Store that issues signed, expiring links
    pub fn new() -> Self {
        Self::with_mode(LinkMode::Signed)
    }

    /// Store that serves objects at permanent public URLs
    pub fn permanent() -> Self {
        Self::with_mode(LinkMode::Permanent)
    }

    /// Store that requires signed links but cannot produce them
    pub fn without_signing() -> Self {
        Self::with_mode(LinkMode::NoSigning)
    }

    fn with_mode(mode: LinkMode) -> Self {
        Self {
            objects: Mutex::new(HashMap::new()),
            attempts: Mutex::new(Vec::new()),
            faults: Mutex::new(FaultPlan::default()),
            mode,
            versions: AtomicU64::new(0),
            signatures: AtomicU64::new(0),
        }
    }

    /// Replace the fault plan
    pub fn with_faults(self, plan: FaultPlan) -> Self {
        self.set_faults(plan);
        self
    }

    pub fn set_faults(&self, plan: FaultPlan) {
        *lock(&self.faults) = plan;
    }

    /// Every write attempt so far, in call order
    pub fn attempts(&self) -> Vec<WriteAttempt> {
        lock(&self.attempts).clone()
    }

    pub fn write_count(&self) -> usize {
        lock(&self.attempts).len()
    }

    /// Stored payload for `key`
    pub fn object(&self, key: &StorageKey) -> Option<Vec<u8>> {
        lock(&self.objects).get(key).map(|o| o.bytes.clone())
    }

    pub fn content_type(&self, key: &StorageKey) -> Option<String> {
        lock(&self.objects).get(key).map(|o| o.content_type.clone())
    }

    pub fn object_count(&self) -> usize {
        lock(&self.objects).len()
    }
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn write(
        &self,
        key: &StorageKey,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<WriteAck, StorageError> {
        let latency = lock(&self.faults).write_latency;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        let checksum = calculate_checksum_bytes(bytes);
        let failure = lock(&self.faults).write_failures.pop_front();

        lock(&self.attempts).push(WriteAttempt {
            key: key.clone(),
            checksum: checksum.clone(),
            size: bytes.len() as u64,
            succeeded: failure.is_none(),
        });

        if let Some(error) = failure {
            return Err(error);
        }

        lock(&self.objects).insert(
            key.clone(),
            StoredObject {
                bytes: bytes.to_vec(),
                content_type: content_type.to_string(),
            },
        );

        let version = self.versions.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(WriteAck {
            etag: Some(format!("\"{checksum}\"")),
            version: Some(version.to_string()),
        })
    }

    async fn sign(&self, key: &StorageKey, ttl: Duration) -> Result<SignedUrl, StorageError> {
        if let Some(error) = lock(&self.faults).sign_failure.clone() {
            return Err(error);
        }

        if self.mode == LinkMode::NoSigning {
            return Err(StorageError::SigningUnavailable(
                "in-memory store configured without signing".to_string(),
            ));
        }

        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| StorageError::InvalidUrl(format!("TTL out of range: {e}")))?;
        let expires_at = Utc::now() + ttl;
        let nonce = self.signatures.fetch_add(1, Ordering::SeqCst);

        Ok(SignedUrl {
            url: format!(
                "{BASE_URL}/{key}?expires={}&sig={nonce}",
                expires_at.timestamp()
            ),
            expires_at,
        })
    }

    fn public_url(&self, key: &StorageKey) -> Option<String> {
        (self.mode == LinkMode::Permanent).then(|| format!("{BASE_URL}/{key}"))
    }

    fn requires_signing(&self) -> bool {
        self.mode != LinkMode::Permanent
    }
}
