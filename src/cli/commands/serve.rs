//! Serve command implementation
//!
//! Runs the HTTP host until a shutdown signal arrives.

use crate::adapters::records::FsRecordStore;
use crate::config::load_config;
use crate::core::export::ExportOrchestrator;
use crate::server;
use clap::Args;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Override server.bind_address
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<String>,
}

impl ServeArgs {
    /// Execute the serve command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Configuration error: {e}");
                return Ok(2);
            }
        };

        if let Some(bind) = &self.bind {
            tracing::info!(bind = %bind, "Overriding bind address from CLI");
            config.server.bind_address = bind.clone();
        }

        let addr = match config.server.socket_addr() {
            Ok(a) => a,
            Err(e) => {
                eprintln!("Configuration error: {e}");
                return Ok(2);
            }
        };

        if let Err(e) = FsRecordStore::new(&config.records.path).check().await {
            tracing::warn!(error = %e, "Record directory not ready; exports will fail until it exists");
        }

        let orchestrator = match ExportOrchestrator::from_config(&config) {
            Ok(o) => Arc::new(o),
            Err(e) => {
                tracing::error!(error = %e, "Failed to create export orchestrator");
                eprintln!("Failed to initialize export: {e}");
                return Ok(4);
            }
        };

        let listener = match TcpListener::bind(addr).await {
            Ok(l) => l,
            Err(e) => {
                tracing::error!(%addr, error = %e, "Failed to bind");
                eprintln!("Failed to bind {addr}: {e}");
                return Ok(4);
            }
        };

        println!("🚀 docship listening on http://{addr}");
        println!("   Health: http://{addr}/health");
        println!("   Export: POST http://{addr}/exports/<record-id>");

        match server::serve(listener, orchestrator, shutdown_signal).await {
            Ok(()) => {
                println!("✅ Server stopped");
                Ok(0)
            }
            Err(e) => {
                tracing::error!(error = %e, "Server failed");
                eprintln!("Server failed: {e}");
                Ok(5)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_config_is_config_error() {
        let (_tx, rx) = watch::channel(false);
        let args = ServeArgs { bind: None };
        let code = args.execute("/nonexistent/docship.toml", rx).await.unwrap();
        assert_eq!(code, 2);
    }
}
