//! Configuration management for docship.
//!
//! docship reads a TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `DOCSHIP_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use docship::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("docship.toml")?;
//! println!("Storage endpoint: {}", config.storage.endpoint);
//! println!("Default link TTL: {}s", config.export.default_link_ttl_seconds);
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//! environment = "production"
//! tenant = "acme"
//!
//! [storage]
//! endpoint = "https://storage.example.com"
//! bucket = "exports"
//! credentials = "${DOCSHIP_STORAGE_TOKEN}"
//! signing_key = "${DOCSHIP_SIGNING_KEY}"
//!
//! [export]
//! default_link_ttl_seconds = 900
//! max_upload_attempts = 3
//! overall_timeout_seconds = 60
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, DocshipConfig, Environment, ExportConfig, LoggingConfig, RecordsConfig,
    RetryConfig, ServerConfig, StorageBackend, StorageConfig,
};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
