//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "docship.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing docship configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Create a .env file with your credentials:");
                println!("     - Set DOCSHIP_STORAGE_TOKEN");
                println!("     - Set DOCSHIP_SIGNING_KEY (for expiring links)");
                println!("  3. Validate configuration: docship validate-config");
                println!("  4. Export a record: docship export <record-id>");
                println!("  5. Or run the HTTP host: docship serve");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# docship Configuration File
# Log record to Word document export pipeline

[application]
log_level = "info"
environment = "development"

[storage]
backend = "http"
endpoint = "https://storage.example.com"
bucket = "docship"
credentials = "${DOCSHIP_STORAGE_TOKEN}"
signing_key = "${DOCSHIP_SIGNING_KEY}"
tls_verify = true

[export]
default_link_ttl_seconds = 900
max_upload_attempts = 3
overall_timeout_seconds = 60
key_prefix = "exports"

[records]
path = "./records"

[server]
bind_address = "127.0.0.1:8080"

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# docship Configuration File
# Log record to Word document export pipeline
#
# Every key can be overridden with DOCSHIP_<SECTION>_<KEY>, for example
# DOCSHIP_EXPORT_MAX_UPLOAD_ATTEMPTS=5. Values may reference environment
# variables as ${VAR_NAME}.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# development | staging | production
# Production requires HTTPS storage with TLS verification and forbids the
# in-memory backend.
environment = "development"

# Optional tenant; prefixes every storage key as <tenant>/<key_prefix>/<id>
# tenant = "acme"

# ============================================================================
# Object Storage
# ============================================================================
[storage]
# http | memory
backend = "http"

# Objects are written with PUT <endpoint>/<bucket>/<key>
endpoint = "https://storage.example.com"
bucket = "docship"

# Bearer token sent with every write (use environment variable)
credentials = "${DOCSHIP_STORAGE_TOKEN}"

# HMAC key for expiring links. Without it, links are permanent and require
# public_base_url.
signing_key = "${DOCSHIP_SIGNING_KEY}"

# Base URL for client-facing links (defaults to endpoint)
# public_base_url = "https://cdn.example.com"

tls_verify = true
request_timeout_seconds = 30

# Largest document accepted, in bytes
max_payload_bytes = 52428800

# ============================================================================
# Export Pipeline
# ============================================================================
[export]
# Link validity when the caller does not ask for one (max 604800)
default_link_ttl_seconds = 900

# Upload attempts including the first (1-10)
max_upload_attempts = 3

# Deadline spanning build, upload and link issuing
overall_timeout_seconds = 60

key_prefix = "exports"

# Records exported concurrently by a batch (1-64)
max_concurrency = 4

[export.retry]
initial_delay_ms = 200
max_delay_ms = 5000
backoff_multiplier = 2.0
jitter = true

# ============================================================================
# Record Source
# ============================================================================
[records]
# Directory holding <record-id>.json files
path = "./records"

# ============================================================================
# HTTP Host
# ============================================================================
[server]
bind_address = "127.0.0.1:8080"

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable JSON file logging in addition to the console
local_enabled = false
local_path = "./logs"

# daily | hourly | never
local_rotation = "daily"
"#
        .to_string()
    }
}
