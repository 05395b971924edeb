// Docship - log record export pipeline
// Copyright (c) 2025 Docship Contributors
// Licensed under the MIT License

//! # docship - log records to Word documents, delivered by link
//!
//! docship turns a stored log record into a Word document, uploads it to object
//! storage and hands the caller a link to download it.
//!
//! ## Overview
//!
//! Every export runs three stages in sequence under one deadline:
//!
//! - **Build** the document from the record ([`core::builder`])
//! - **Upload** it under a key derived from the record id, retrying transient
//!   failures ([`core::upload`])
//! - **Issue** a signed expiring link, or the permanent public URL on platforms
//!   that serve one ([`core::link`])
//!
//! The caller always gets a single [`ExportOutcome`](domain::ExportOutcome):
//! a link, or a failure tagged with its kind and the stage it happened in.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Pipeline stages and orchestration
//! - [`adapters`] - Record stores, object stores, health probing
//! - [`server`] - HTTP host
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docship::adapters::records::InMemoryRecordStore;
//! use docship::adapters::storage::InMemoryObjectStore;
//! use docship::core::export::{ExportOrchestrator, ExportSettings};
//! use docship::domain::{ExportRequest, LogRecord, RecordId};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let id = RecordId::new("42")?;
//!     let records = Arc::new(InMemoryRecordStore::with_records([LogRecord::new(
//!         id.clone(),
//!         chrono::Utc::now(),
//!         "error",
//!         "billing",
//!         "Invoice generation failed",
//!     )]));
//!
//!     let orchestrator = ExportOrchestrator::new(
//!         ExportSettings::default(),
//!         records,
//!         Arc::new(InMemoryObjectStore::new()),
//!     );
//!
//!     let link = orchestrator.export(ExportRequest::new(id)).await.into_result()?;
//!     println!("{}", link.url());
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Stages return their own error types ([`domain::errors`]). The orchestrator
//! maps them onto a closed set of [`FailureKind`](domain::FailureKind)s, each
//! with a stable user message and a retryable flag. Setup paths use
//! [`domain::DocshipError`].
//!
//! ## Logging
//!
//! docship uses structured logging with the `tracing` crate. Each export runs
//! in an `export` span carrying `record_id` and `request_id`.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
pub mod server;
