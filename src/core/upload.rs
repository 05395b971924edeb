//! Upload manager
//!
//! Writes an artifact to object storage under its storage key, retrying
//! transient failures with exponential backoff. Every attempt sends the full
//! payload under the same key, so a retried upload replaces the object
//! instead of creating another one.

use crate::adapters::storage::ObjectStore;
use crate::config::RetryConfig;
use crate::domain::errors::UploadError;
use crate::domain::export::{DocumentArtifact, StoredObjectRef};
use crate::log_retry_attempt;
use chrono::Utc;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

/// Bounded exponential backoff
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Attempts in total, first try included
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
    /// Pick each delay uniformly from the upper half of its backoff window
    pub jitter: bool,
}

impl RetryPolicy {
    pub fn from_config(max_attempts: u32, config: &RetryConfig) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay: Duration::from_millis(config.initial_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
            multiplier: config.backoff_multiplier,
            jitter: config.jitter,
        }
    }

    /// No delay between attempts
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            multiplier: 1.0,
            jitter: false,
        }
    }

    /// Upper bound of the delay after failed attempt `attempt` (1-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(32) as i32;
        let millis = self.initial_delay.as_millis() as f64 * self.multiplier.powi(exponent);
        let capped = millis.min(self.max_delay.as_millis() as f64);
        Duration::from_millis(capped as u64)
    }

    /// Delay to sleep after failed attempt `attempt` (1-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let ceiling = self.backoff(attempt);
        if !self.jitter || ceiling.is_zero() {
            return ceiling;
        }
        let hi = ceiling.as_millis() as u64;
        let lo = hi / 2;
        Duration::from_millis(rand::thread_rng().gen_range(lo..=hi))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(3, &RetryConfig::default())
    }
}

/// Pushes artifacts to object storage
pub struct UploadManager {
    store: Arc<dyn ObjectStore>,
    policy: RetryPolicy,
}

impl UploadManager {
    pub fn new(store: Arc<dyn ObjectStore>, policy: RetryPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Upload `artifact`, consuming it
    ///
    /// Success is only returned after the store acknowledged the write.
    ///
    /// # Errors
    ///
    /// - [`UploadError::Auth`] on the first credential rejection, without retrying
    /// - [`UploadError::Rejected`] for other permanent refusals, without retrying
    /// - [`UploadError::Exhausted`] once every attempt failed transiently
    pub async fn upload(&self, artifact: DocumentArtifact) -> Result<StoredObjectRef, UploadError> {
        let key = artifact.key();
        let max_attempts = self.policy.max_attempts;
        let mut attempt = 0;

        loop {
            attempt += 1;
            tracing::debug!(
                storage_key = %key,
                attempt,
                max_attempts,
                size = artifact.size(),
                store = self.store.name(),
                "Writing artifact"
            );

            let error = match self
                .store
                .write(key, artifact.bytes(), artifact.format().content_type())
                .await
            {
                Ok(ack) => {
                    tracing::info!(
                        storage_key = %key,
                        attempt,
                        etag = ack.etag.as_deref().unwrap_or("-"),
                        "Upload acknowledged"
                    );
                    return Ok(StoredObjectRef::acknowledged(
                        &artifact,
                        ack.etag,
                        ack.version,
                        Utc::now(),
                    ));
                }
                Err(e) => e,
            };

            if error.is_auth() {
                tracing::error!(storage_key = %key, attempt, error = %error, "Upload not authorized");
                return Err(UploadError::Auth(error.to_string()));
            }

            if !error.is_transient() {
                tracing::error!(storage_key = %key, attempt, error = %error, "Upload rejected");
                return Err(UploadError::Rejected(error.to_string()));
            }

            if attempt >= max_attempts {
                tracing::error!(
                    storage_key = %key,
                    attempts = attempt,
                    error = %error,
                    "Upload retries exhausted"
                );
                return Err(UploadError::Exhausted {
                    attempts: attempt,
                    last_cause: error.to_string(),
                });
            }

            let delay = self.policy.delay_for(attempt);
            log_retry_attempt!(attempt + 1, max_attempts, delay, error);
            tokio::time::sleep(delay).await;
        }
    }
}
