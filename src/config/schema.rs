//! Configuration schema types
//!
//! This module defines the configuration structure for docship.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Longest link validity accepted (seven days)
pub const MAX_LINK_TTL_SECONDS: u64 = 7 * 24 * 60 * 60;

/// Storage backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Remote object storage over HTTP
    #[default]
    Http,
    /// In-process store, for local runs and tests
    Memory,
}

/// Runtime environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment
    #[default]
    Development,
    /// Staging environment
    Staging,
    /// Production environment
    Production,
}

/// Main docship configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocshipConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Object storage settings
    pub storage: StorageConfig,

    /// Export pipeline settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Where log records are read from
    #[serde(default)]
    pub records: RecordsConfig,

    /// HTTP host settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl DocshipConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.storage.validate(&self.application.environment)?;
        self.export.validate()?;
        self.records.validate()?;
        self.server.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: Environment,

    /// Tenant identifier; when set it prefixes every storage key
    #[serde(default)]
    pub tenant: Option<String>,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }

        if let Some(tenant) = &self.tenant {
            if !is_key_segment(tenant) {
                return Err(format!(
                    "application.tenant '{tenant}' may only contain A-Z, a-z, 0-9, '.', '_', '-'"
                ));
            }
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            environment: Environment::default(),
            tenant: None,
        }
    }
}

/// Object storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Which store implementation to use
    #[serde(default)]
    pub backend: StorageBackend,

    /// Base URL of the storage platform
    #[serde(default)]
    pub endpoint: String,

    /// Bucket (or container) name
    #[serde(default = "default_bucket")]
    pub bucket: String,

    /// Bearer credentials sent with every write
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub credentials: Option<SecretString>,

    /// Key used to sign expiring links; without it links are permanent
    /// (if `public_base_url` is set) or cannot be issued
    #[serde(default)]
    pub signing_key: Option<SecretString>,

    /// Base URL for client-facing links, if different from `endpoint`
    #[serde(default)]
    pub public_base_url: Option<String>,

    /// TLS certificate verification enabled
    ///
    /// **SECURITY WARNING**: Disabling TLS verification exposes uploads to
    /// man-in-the-middle attacks. Rejected in production.
    #[serde(default = "default_true")]
    pub tls_verify: bool,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,

    /// Largest payload the platform accepts, checked before sending
    #[serde(default = "default_max_payload_bytes")]
    pub max_payload_bytes: u64,
}

impl StorageConfig {
    fn validate(&self, environment: &Environment) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if self.backend == StorageBackend::Memory {
            if *environment == Environment::Production {
                return Err(
                    "storage.backend = \"memory\" is not allowed in production environments"
                        .to_string(),
                );
            }
            return Ok(());
        }

        if self.endpoint.is_empty() {
            return Err("storage.endpoint cannot be empty".to_string());
        }

        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err("storage.endpoint must start with http:// or https://".to_string());
        }

        if self.bucket.is_empty() || self.bucket.contains('/') {
            return Err(format!(
                "storage.bucket must be a non-empty name without '/', got '{}'",
                self.bucket
            ));
        }

        if self
            .credentials
            .as_ref()
            .map(|c| c.expose_secret().is_blank())
            .unwrap_or(true)
        {
            return Err("storage.credentials cannot be empty".to_string());
        }

        if let Some(key) = &self.signing_key {
            if key.expose_secret().is_blank() {
                return Err("storage.signing_key cannot be empty when set".to_string());
            }
        }

        if let Some(base) = &self.public_base_url {
            if !base.starts_with("http://") && !base.starts_with("https://") {
                return Err(
                    "storage.public_base_url must start with http:// or https://".to_string()
                );
            }
        }

        if self.request_timeout_seconds == 0 {
            return Err("storage.request_timeout_seconds must be > 0".to_string());
        }

        if self.max_payload_bytes == 0 {
            return Err("storage.max_payload_bytes must be > 0".to_string());
        }

        if *environment == Environment::Production {
            if !self.tls_verify {
                return Err(
                    "TLS certificate verification cannot be disabled in production environments. \
                    Set 'tls_verify = true' or use environment = \"development\" for local testing."
                        .to_string(),
                );
            }
            if !self.endpoint.starts_with("https://") {
                return Err("storage.endpoint must use https:// in production".to_string());
            }
        }

        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            endpoint: String::new(),
            bucket: default_bucket(),
            credentials: None,
            signing_key: None,
            public_base_url: None,
            tls_verify: true,
            request_timeout_seconds: default_request_timeout_seconds(),
            max_payload_bytes: default_max_payload_bytes(),
        }
    }
}

/// Export pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Link validity used when the caller does not ask for one
    #[serde(default = "default_link_ttl_seconds")]
    pub default_link_ttl_seconds: u64,

    /// Upload attempts, first try included
    #[serde(default = "default_max_upload_attempts")]
    pub max_upload_attempts: u32,

    /// Deadline spanning build, upload and link issuing
    #[serde(default = "default_overall_timeout_seconds")]
    pub overall_timeout_seconds: u64,

    /// First segment of every storage key
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// Concurrent invocations in a batch export
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Upload backoff
    #[serde(default)]
    pub retry: RetryConfig,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.default_link_ttl_seconds == 0
            || self.default_link_ttl_seconds > MAX_LINK_TTL_SECONDS
        {
            return Err(format!(
                "export.default_link_ttl_seconds must be between 1 and {MAX_LINK_TTL_SECONDS}, got {}",
                self.default_link_ttl_seconds
            ));
        }

        if !(1..=10).contains(&self.max_upload_attempts) {
            return Err(format!(
                "export.max_upload_attempts must be between 1 and 10, got {}",
                self.max_upload_attempts
            ));
        }

        if self.overall_timeout_seconds == 0 {
            return Err("export.overall_timeout_seconds must be > 0".to_string());
        }

        let prefix = self.key_prefix.trim_matches('/');
        if prefix.is_empty() || !prefix.split('/').all(is_key_segment) {
            return Err(format!(
                "export.key_prefix '{}' must be one or more '/'-separated segments of A-Z, a-z, 0-9, '.', '_', '-'",
                self.key_prefix
            ));
        }

        if self.max_concurrency == 0 || self.max_concurrency > 64 {
            return Err(format!(
                "export.max_concurrency must be between 1 and 64, got {}",
                self.max_concurrency
            ));
        }

        self.retry.validate()
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_link_ttl_seconds: default_link_ttl_seconds(),
            max_upload_attempts: default_max_upload_attempts(),
            overall_timeout_seconds: default_overall_timeout_seconds(),
            key_prefix: default_key_prefix(),
            max_concurrency: default_max_concurrency(),
            retry: RetryConfig::default(),
        }
    }
}

/// Retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Initial delay in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Backoff multiplier
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Randomise each delay within its upper half
    #[serde(default = "default_true")]
    pub jitter: bool,
}

impl RetryConfig {
    fn validate(&self) -> Result<(), String> {
        if !self.backoff_multiplier.is_finite() || self.backoff_multiplier < 1.0 {
            return Err(format!(
                "export.retry.backoff_multiplier must be >= 1.0, got {}",
                self.backoff_multiplier
            ));
        }

        if self.initial_delay_ms > self.max_delay_ms {
            return Err(format!(
                "export.retry.initial_delay_ms ({}) must not exceed max_delay_ms ({})",
                self.initial_delay_ms, self.max_delay_ms
            ));
        }
        Ok(())
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
            jitter: true,
        }
    }
}

/// Record source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordsConfig {
    /// Directory holding `<record_id>.json` files
    #[serde(default = "default_records_path")]
    pub path: String,
}

impl RecordsConfig {
    fn validate(&self) -> Result<(), String> {
        if self.path.trim().is_empty() {
            return Err("records.path cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for RecordsConfig {
    fn default() -> Self {
        Self {
            path: default_records_path(),
        }
    }
}

/// HTTP host configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address `docship serve` listens on
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl ServerConfig {
    /// Parsed listen address
    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        self.bind_address
            .parse()
            .map_err(|e| format!("Invalid server.bind_address '{}': {e}", self.bind_address))
    }

    fn validate(&self) -> Result<(), String> {
        self.socket_addr().map(|_| ())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled".to_string());
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

fn is_key_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_bucket() -> String {
    "docship".to_string()
}

fn default_request_timeout_seconds() -> u64 {
    30
}

fn default_max_payload_bytes() -> u64 {
    50 * 1024 * 1024
}

fn default_link_ttl_seconds() -> u64 {
    900
}

fn default_max_upload_attempts() -> u32 {
    3
}

fn default_overall_timeout_seconds() -> u64 {
    60
}

fn default_key_prefix() -> String {
    "exports".to_string()
}

fn default_max_concurrency() -> usize {
    4
}

fn default_initial_delay_ms() -> u64 {
    200
}

fn default_max_delay_ms() -> u64 {
    5000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_records_path() -> String {
    "./records".to_string()
}

fn default_bind_address() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
