//! Core business logic for docship.
//!
//! # Modules
//!
//! - [`builder`] - Record lookup and document rendering
//! - [`upload`] - Object storage writes with bounded retry
//! - [`link`] - Delivery link issuing
//! - [`export`] - Orchestration of the three stages, single and batch
//! - [`checksum`] - SHA-256 content checksums
//!
//! # Export Workflow
//!
//! 1. **Build**: Resolve the record and render it to a Word document
//! 2. **Upload**: Write it under a key derived from the record id, retrying transient faults
//! 3. **Link**: Issue a signed expiring URL, or the permanent public URL
//! 4. **Report**: Return an [`ExportOutcome`](crate::domain::ExportOutcome)
//!
//! # Example
//!
//! ```rust,no_run
//! use docship::config::load_config;
//! use docship::core::export::ExportOrchestrator;
//! use docship::domain::{ExportRequest, RecordId};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("docship.toml")?;
//! let orchestrator = ExportOrchestrator::from_config(&config)?;
//!
//! let outcome = orchestrator
//!     .export(ExportRequest::new(RecordId::new("42")?))
//!     .await;
//!
//! match outcome.into_result() {
//!     Ok(link) => println!("{}", link.url()),
//!     Err(failure) => eprintln!("{}", failure.user_message()),
//! }
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod checksum;
pub mod export;
pub mod link;
pub mod upload;
