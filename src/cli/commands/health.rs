//! Health command implementation
//!
//! Probes a running host. Missing or garbled fields print as "unavailable".

use crate::adapters::diagnostics::HealthClient;
use crate::config::load_config;
use clap::Args;
use std::time::Duration;

const DEFAULT_URL: &str = "http://127.0.0.1:8080";

/// Arguments for the health command
#[derive(Args, Debug)]
pub struct HealthArgs {
    /// Host URL (defaults to server.bind_address from the configuration)
    #[arg(long)]
    pub url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 5)]
    pub timeout: u64,
}

impl HealthArgs {
    /// Resolve the URL to probe
    pub fn target(&self, config_path: &str) -> String {
        if let Some(url) = &self.url {
            return url.clone();
        }
        match load_config(config_path) {
            Ok(config) => format!("http://{}", config.server.bind_address),
            Err(e) => {
                tracing::debug!(error = %e, "No usable configuration; probing default address");
                DEFAULT_URL.to_string()
            }
        }
    }

    /// Execute the health command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let client = HealthClient::new(&self.target(config_path), Duration::from_secs(self.timeout))?;
        tracing::info!(url = %client.url(), "Probing health endpoint");

        match client.check().await {
            Ok(status) => {
                println!("{status}");
                if status.is_healthy() {
                    println!("✅ Healthy");
                    Ok(0)
                } else {
                    println!("⚠️  Unhealthy");
                    Ok(4)
                }
            }
            Err(e) => {
                eprintln!("❌ {e}");
                Ok(4)
            }
        }
    }
}
