//! Link broker
//!
//! Turns an acknowledged upload into a client-facing link. Platforms that
//! require signing get an expiring URL (the configured default TTL applies
//! when the caller gives none); platforms serving public URLs get a
//! permanent link with no expiry, and any requested TTL is ignored.

use crate::adapters::storage::ObjectStore;
use crate::config::schema::MAX_LINK_TTL_SECONDS;
use crate::domain::errors::LinkError;
use crate::domain::export::{DeliveryLink, StoredObjectRef};
use std::sync::Arc;
use std::time::Duration;

/// Issues delivery links for stored objects
pub struct LinkBroker {
    store: Arc<dyn ObjectStore>,
    default_ttl: Duration,
}

impl LinkBroker {
    pub fn new(store: Arc<dyn ObjectStore>, default_ttl: Duration) -> Self {
        Self { store, default_ttl }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Issue a link for `object`
    ///
    /// A TTL longer than seven days is clamped.
    ///
    /// # Errors
    ///
    /// - [`LinkError::Auth`] when the platform rejects credentials while signing
    /// - [`LinkError::Signing`] when signing is unavailable, fails, or the TTL is zero
    pub async fn issue_link(
        &self,
        object: StoredObjectRef,
        ttl: Option<Duration>,
    ) -> Result<DeliveryLink, LinkError> {
        let key = object.key();

        if !self.store.requires_signing() {
            if let Some(url) = self.store.public_url(key) {
                if ttl.is_some() {
                    tracing::debug!(
                        storage_key = %key,
                        "Platform serves permanent links; requested TTL ignored"
                    );
                }
                return Ok(DeliveryLink::new(url, None, object));
            }
        }

        let ttl = ttl.unwrap_or(self.default_ttl);
        if ttl.is_zero() {
            return Err(LinkError::Signing("link TTL must be greater than zero".to_string()));
        }
        let max_ttl = Duration::from_secs(MAX_LINK_TTL_SECONDS);
        let ttl = if ttl > max_ttl {
            tracing::warn!(
                storage_key = %key,
                requested_secs = ttl.as_secs(),
                max_secs = MAX_LINK_TTL_SECONDS,
                "Clamping link TTL"
            );
            max_ttl
        } else {
            ttl
        };

        match self.store.sign(key, ttl).await {
            Ok(signed) => {
                tracing::debug!(
                    storage_key = %key,
                    expires_at = %signed.expires_at,
                    "Signed link issued"
                );
                Ok(DeliveryLink::new(signed.url, Some(signed.expires_at), object))
            }
            Err(e) if e.is_auth() => Err(LinkError::Auth(e.to_string())),
            Err(e) => Err(LinkError::Signing(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::{FaultPlan, InMemoryObjectStore};
    use crate::domain::errors::StorageError;
    use crate::domain::export::{DocumentArtifact, DocumentFormat};
    use crate::domain::ids::{RecordId, StorageKey};
    use chrono::Utc;

    fn stored() -> StoredObjectRef {
        let id = RecordId::new("42").unwrap();
        let key = StorageKey::for_record("exports", None, &id);
        let artifact = DocumentArtifact::new(id, key, DocumentFormat::Word, vec![1], "c".into());
        StoredObjectRef::acknowledged(&artifact, None, None, Utc::now())
    }

    const DEFAULT_TTL: Duration = Duration::from_secs(900);

    #[tokio::test]
    async fn test_default_ttl_applied() {
        let broker = LinkBroker::new(Arc::new(InMemoryObjectStore::new()), DEFAULT_TTL);
        let before = Utc::now();
        let link = broker.issue_link(stored(), None).await.unwrap();

        let expires = link.expires_at().unwrap();
        let ttl = (expires - before).num_seconds();
        assert!((899..=901).contains(&ttl), "ttl was {ttl}");
        assert_eq!(link.object().key().as_str(), "exports/42");
    }

    #[tokio::test]
    async fn test_caller_ttl_wins() {
        let broker = LinkBroker::new(Arc::new(InMemoryObjectStore::new()), DEFAULT_TTL);
        let before = Utc::now();
        let link = broker
            .issue_link(stored(), Some(Duration::from_secs(60)))
            .await
            .unwrap();
        let ttl = (link.expires_at().unwrap() - before).num_seconds();
        assert!((59..=61).contains(&ttl));
    }

    #[tokio::test]
    async fn test_permanent_link_without_expiry() {
        let broker = LinkBroker::new(Arc::new(InMemoryObjectStore::permanent()), DEFAULT_TTL);
        let link = broker
            .issue_link(stored(), Some(Duration::from_secs(60)))
            .await
            .unwrap();
        assert!(link.expires_at().is_none());
        assert_eq!(link.url(), "memory://docship/exports/42");
    }

    #[tokio::test]
    async fn test_missing_signing_capability() {
        let broker = LinkBroker::new(Arc::new(InMemoryObjectStore::without_signing()), DEFAULT_TTL);
        let err = broker.issue_link(stored(), None).await.unwrap_err();
        assert!(matches!(err, LinkError::Signing(_)));
    }

    #[tokio::test]
    async fn test_auth_failure_while_signing() {
        let store = InMemoryObjectStore::new()
            .with_faults(FaultPlan::new().fail_signing(StorageError::Forbidden("denied".into())));
        let broker = LinkBroker::new(Arc::new(store), DEFAULT_TTL);
        let err = broker.issue_link(stored(), None).await.unwrap_err();
        assert!(matches!(err, LinkError::Auth(_)));
    }

    #[tokio::test]
    async fn test_zero_ttl_rejected() {
        let broker = LinkBroker::new(Arc::new(InMemoryObjectStore::new()), DEFAULT_TTL);
        let err = broker
            .issue_link(stored(), Some(Duration::ZERO))
            .await
            .unwrap_err();
        assert!(matches!(err, LinkError::Signing(_)));
    }

    #[tokio::test]
    async fn test_long_ttl_clamped() {
        let broker = LinkBroker::new(Arc::new(InMemoryObjectStore::new()), DEFAULT_TTL);
        let before = Utc::now();
        let link = broker
            .issue_link(stored(), Some(Duration::from_secs(MAX_LINK_TTL_SECONDS * 2)))
            .await
            .unwrap();
        let ttl = (link.expires_at().unwrap() - before).num_seconds() as u64;
        assert!(ttl <= MAX_LINK_TTL_SECONDS + 1);
    }
}
