//! Export orchestration
//!
//! - [`ExportOrchestrator`] runs the pipeline for one request or a batch
//! - [`ExportSettings`] is the configuration it runs with
//! - [`ExportSummary`] aggregates batch outcomes

pub mod orchestrator;
pub mod settings;
pub mod summary;

pub use orchestrator::ExportOrchestrator;
pub use settings::ExportSettings;
pub use summary::ExportSummary;
