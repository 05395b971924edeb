//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for docship using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// docship - log record export pipeline
#[derive(Parser, Debug)]
#[command(name = "docship")]
#[command(version, about, long_about = None)]
#[command(author = "Docship Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "docship.toml", env = "DOCSHIP_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "DOCSHIP_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export one or more records and print their delivery links
    Export(commands::export::ExportArgs),

    /// Run the HTTP host
    Serve(commands::serve::ServeArgs),

    /// Probe a running host's health endpoint
    Health(commands::health::HealthArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
