//! HTTP object storage client
//!
//! Objects are written with `PUT {endpoint}/{bucket}/{key}` and a bearer token.
//! Status codes are mapped onto [`StorageError`] so the upload manager can tell
//! transient failures from permanent ones.

use super::signing::UrlSigner;
use super::{ObjectStore, SignedUrl, WriteAck};
use crate::config::{SecretString, StorageConfig};
use crate::domain::errors::{DocshipError, StorageError};
use crate::domain::ids::StorageKey;
use crate::domain::Result;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, ETAG};
use reqwest::{Client, ClientBuilder, StatusCode};
use secrecy::ExposeSecret;
use std::time::Duration;
use url::Url;

/// Response header carrying the object version
pub const VERSION_HEADER: &str = "x-object-version";

/// Longest error body kept in a [`StorageError`] message
const MAX_ERROR_BODY: usize = 512;

/// Object store client speaking plain HTTP
pub struct HttpObjectStore {
    client: Client,
    endpoint: String,
    bucket: String,
    credentials: Option<SecretString>,
    signer: Option<UrlSigner>,
    public_base_url: Option<String>,
    max_payload_bytes: u64,
}

impl std::fmt::Debug for HttpObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpObjectStore")
            .field("endpoint", &self.endpoint)
            .field("bucket", &self.bucket)
            .field("signing", &self.signer.is_some())
            .field("public_base_url", &self.public_base_url)
            .finish_non_exhaustive()
    }
}

impl HttpObjectStore {
    /// Create a client from storage configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the endpoint is not a valid URL or the
    /// HTTP client cannot be built.
    pub fn new(config: &StorageConfig) -> Result<Self> {
        Url::parse(&config.endpoint).map_err(|e| {
            DocshipError::Configuration(format!(
                "Invalid storage.endpoint '{}': {e}",
                config.endpoint
            ))
        })?;

        let mut client_builder = ClientBuilder::new()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .connect_timeout(Duration::from_secs(10));

        if !config.tls_verify {
            tracing::warn!("TLS certificate verification disabled for object storage");
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder.build().map_err(|e| {
            DocshipError::Configuration(format!("Failed to build HTTP client: {e}"))
        })?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            bucket: config.bucket.clone(),
            credentials: config.credentials.clone(),
            signer: config.signing_key.as_ref().map(UrlSigner::new),
            public_base_url: config
                .public_base_url
                .as_ref()
                .map(|u| u.trim_end_matches('/').to_string()),
            max_payload_bytes: config.max_payload_bytes,
        })
    }

    fn object_path(&self, key: &StorageKey) -> String {
        format!("{}/{}", self.bucket, key)
    }

    fn object_url(&self, base: &str, key: &StorageKey) -> std::result::Result<Url, StorageError> {
        let raw = format!("{base}/{}", self.object_path(key));
        Url::parse(&raw).map_err(|e| StorageError::InvalidUrl(format!("{raw}: {e}")))
    }

    fn link_base(&self) -> &str {
        self.public_base_url.as_deref().unwrap_or(&self.endpoint)
    }
}

/// Map a non-success HTTP status to a storage error
pub(crate) fn classify_status(
    status: StatusCode,
    body: &str,
    size: u64,
    limit: u64,
) -> StorageError {
    let message = truncate(body);
    match status {
        StatusCode::UNAUTHORIZED => StorageError::Unauthorized(message),
        StatusCode::FORBIDDEN => StorageError::Forbidden(message),
        StatusCode::PAYLOAD_TOO_LARGE => StorageError::PayloadTooLarge { size, limit },
        StatusCode::TOO_MANY_REQUESTS => StorageError::RateLimited(message),
        StatusCode::REQUEST_TIMEOUT => StorageError::Timeout(message),
        s if s.is_server_error() => StorageError::Server {
            status: s.as_u16(),
            message,
        },
        s => StorageError::Rejected {
            status: s.as_u16(),
            message,
        },
    }
}

fn classify_transport(err: reqwest::Error) -> StorageError {
    if err.is_timeout() {
        StorageError::Timeout(err.to_string())
    } else {
        StorageError::Network(err.to_string())
    }
}

fn truncate(body: &str) -> String {
    let body = body.trim();
    match body.char_indices().nth(MAX_ERROR_BODY) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

fn header_value(
    headers: &reqwest::header::HeaderMap,
    name: impl reqwest::header::AsHeaderName,
) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn write(
        &self,
        key: &StorageKey,
        bytes: &[u8],
        content_type: &str,
    ) -> std::result::Result<WriteAck, StorageError> {
        let size = bytes.len() as u64;
        if size > self.max_payload_bytes {
            return Err(StorageError::PayloadTooLarge {
                size,
                limit: self.max_payload_bytes,
            });
        }

        let url = self.object_url(&self.endpoint, key)?;
        let mut request = self
            .client
            .put(url)
            .header(CONTENT_TYPE, content_type)
            .body(bytes.to_vec());

        if let Some(token) = &self.credentials {
            let token: &str = token.expose_secret().as_ref();
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = request.send().await.map_err(classify_transport)?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &body, size, self.max_payload_bytes));
        }

        let headers = response.headers();
        Ok(WriteAck {
            etag: header_value(headers, ETAG),
            version: header_value(headers, VERSION_HEADER),
        })
    }

    async fn sign(
        &self,
        key: &StorageKey,
        ttl: Duration,
    ) -> std::result::Result<SignedUrl, StorageError> {
        let signer = self.signer.as_ref().ok_or_else(|| {
            StorageError::SigningUnavailable("storage.signing_key is not configured".to_string())
        })?;

        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| StorageError::InvalidUrl(format!("TTL out of range: {e}")))?;
        let expires_at = Utc::now() + ttl;
        let expires = expires_at.timestamp();
        let signature = signer.signature(&self.object_path(key), expires);

        let mut url = self.object_url(self.link_base(), key)?;
        url.query_pairs_mut()
            .append_pair("expires", &expires.to_string())
            .append_pair("signature", &signature);

        Ok(SignedUrl {
            url: url.into(),
            expires_at,
        })
    }

    fn public_url(&self, key: &StorageKey) -> Option<String> {
        let base = self.public_base_url.as_deref()?;
        self.object_url(base, key).ok().map(String::from)
    }

    fn requires_signing(&self) -> bool {
        self.signer.is_some() || self.public_base_url.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;
    use test_case::test_case;

    fn config() -> StorageConfig {
        StorageConfig {
            endpoint: "https://storage.example.com/".to_string(),
            bucket: "docs".to_string(),
            credentials: Some(secret_string("token".to_string())),
            ..StorageConfig::default()
        }
    }

    #[test_case(401, "Unauthorized" ; "unauthorized")]
    #[test_case(403, "Forbidden" ; "forbidden")]
    #[test_case(413, "PayloadTooLarge" ; "payload too large")]
    #[test_case(429, "RateLimited" ; "rate limited")]
    #[test_case(500, "Server" ; "internal error")]
    #[test_case(503, "Server" ; "unavailable")]
    #[test_case(404, "Rejected" ; "other client error")]
    fn test_classify_status(code: u16, expected: &str) {
        let status = StatusCode::from_u16(code).unwrap();
        let err = classify_status(status, "body", 10, 5);
        let name = format!("{err:?}");
        assert!(name.starts_with(expected), "{code} mapped to {name}");
    }

    #[test]
    fn test_transient_statuses() {
        let transient =
            |code| classify_status(StatusCode::from_u16(code).unwrap(), "", 0, 0).is_transient();
        assert!(transient(429));
        assert!(transient(502));
        assert!(transient(408));
        assert!(!transient(401));
        assert!(!transient(413));
        assert!(!transient(400));
    }

    #[test]
    fn test_truncate_long_body() {
        let body = "x".repeat(MAX_ERROR_BODY + 10);
        assert_eq!(truncate(&body).len(), MAX_ERROR_BODY + 3);
    }

    #[test]
    fn test_requires_signing_matrix() {
        let store = HttpObjectStore::new(&config()).unwrap();
        assert!(store.requires_signing());

        let mut public = config();
        public.public_base_url = Some("https://cdn.example.com".to_string());
        let store = HttpObjectStore::new(&public).unwrap();
        assert!(!store.requires_signing());
        assert_eq!(
            store.public_url(&StorageKey::new("exports/42").unwrap()).unwrap(),
            "https://cdn.example.com/docs/exports/42"
        );

        public.signing_key = Some(secret_string("k".to_string()));
        let store = HttpObjectStore::new(&public).unwrap();
        assert!(store.requires_signing());
    }

    #[tokio::test]
    async fn test_sign_without_key_fails() {
        let store = HttpObjectStore::new(&config()).unwrap();
        let err = store
            .sign(&StorageKey::new("exports/42").unwrap(), Duration::from_secs(60))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::SigningUnavailable(_)));
    }

    #[tokio::test]
    async fn test_sign_produces_verifiable_url() {
        let mut cfg = config();
        cfg.signing_key = Some(secret_string("secret".to_string()));
        let store = HttpObjectStore::new(&cfg).unwrap();

        let signed = store
            .sign(&StorageKey::new("exports/42").unwrap(), Duration::from_secs(900))
            .await
            .unwrap();

        let url = Url::parse(&signed.url).unwrap();
        assert_eq!(url.path(), "/docs/exports/42");
        let pairs: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();
        let expires: i64 = pairs["expires"].parse().unwrap();
        assert_eq!(expires, signed.expires_at.timestamp());

        let signer = UrlSigner::new(&secret_string("secret".to_string()));
        assert_eq!(pairs["signature"], signer.signature("docs/exports/42", expires));
    }

    #[tokio::test]
    async fn test_oversized_payload_rejected_locally() {
        let mut cfg = config();
        cfg.max_payload_bytes = 4;
        let store = HttpObjectStore::new(&cfg).unwrap();
        let err = store
            .write(&StorageKey::new("exports/1").unwrap(), b"too long", "text/plain")
            .await
            .unwrap_err();
        assert_eq!(err, StorageError::PayloadTooLarge { size: 8, limit: 4 });
    }

    #[test]
    fn test_invalid_endpoint() {
        let mut cfg = config();
        cfg.endpoint = "not a url".to_string();
        assert!(HttpObjectStore::new(&cfg).is_err());
    }
}
