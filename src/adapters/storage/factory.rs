//! Object store factory
//!
//! Selects the [`ObjectStore`] implementation named by `storage.backend`.

use super::{HttpObjectStore, InMemoryObjectStore, ObjectStore};
use crate::config::schema::{StorageBackend, StorageConfig};
use crate::domain::Result;
use std::sync::Arc;

/// Create an object store based on the configuration
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be created
pub fn create_object_store(config: &StorageConfig) -> Result<Arc<dyn ObjectStore>> {
    match config.backend {
        StorageBackend::Http => {
            tracing::info!(endpoint = %config.endpoint, bucket = %config.bucket, "Creating HTTP object store");
            Ok(Arc::new(HttpObjectStore::new(config)?))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory object store; uploads are not persisted");
            Ok(Arc::new(InMemoryObjectStore::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    #[test]
    fn test_create_memory_store() {
        let config = StorageConfig {
            backend: StorageBackend::Memory,
            ..StorageConfig::default()
        };
        let store = create_object_store(&config).unwrap();
        assert_eq!(store.name(), "memory");
    }

    #[test]
    fn test_create_http_store() {
        let config = StorageConfig {
            endpoint: "http://localhost:9000".to_string(),
            credentials: Some(secret_string("token".to_string())),
            ..StorageConfig::default()
        };
        let store = create_object_store(&config).unwrap();
        assert_eq!(store.name(), "http");
        assert!(store.requires_signing());
    }
}
