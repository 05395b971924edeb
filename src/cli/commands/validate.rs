//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the docship configuration file.

use crate::config::load_config;
use crate::config::schema::StorageBackend;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // Loading also validates
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Environment: {:?}", config.application.environment);
        println!("  Log Level: {}", config.application.log_level);
        println!(
            "  Tenant: {}",
            config.application.tenant.as_deref().unwrap_or("none")
        );

        match config.storage.backend {
            StorageBackend::Http => {
                println!("  Storage: HTTP");
                println!("  Endpoint: {}", config.storage.endpoint);
                println!("  Bucket: {}", config.storage.bucket);
                println!(
                    "  Links: {}",
                    match (&config.storage.signing_key, &config.storage.public_base_url) {
                        (Some(_), _) => "signed".to_string(),
                        (None, Some(base)) => format!("permanent ({base})"),
                        (None, None) => "unavailable (no signing key or public base URL)".to_string(),
                    }
                );
            }
            StorageBackend::Memory => println!("  Storage: in-memory (not persisted)"),
        }

        println!("  Records: {}", config.records.path);
        println!("  Key Prefix: {}", config.export.key_prefix);
        println!("  Default Link TTL: {}s", config.export.default_link_ttl_seconds);
        println!("  Max Upload Attempts: {}", config.export.max_upload_attempts);
        println!("  Overall Timeout: {}s", config.export.overall_timeout_seconds);
        println!("  Max Concurrency: {}", config.export.max_concurrency);
        println!("  Bind Address: {}", config.server.bind_address);
        println!();
        Ok(0)
    }
}
