//! Domain models and types for docship.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`RecordId`], [`StorageKey`])
//! - **The source record** ([`LogRecord`])
//! - **Pipeline values** ([`ExportRequest`], [`DocumentArtifact`], [`StoredObjectRef`],
//!   [`DeliveryLink`], [`ExportOutcome`])
//! - **Error types** ([`DocshipError`], [`StorageError`] and one error per stage)
//! - **Result type alias** ([`Result`])
//!
//! Identifiers use the newtype pattern so a record id is never written where a
//! storage key is expected:
//!
//! ```rust
//! use docship::domain::{RecordId, StorageKey};
//!
//! # fn example() -> Result<(), String> {
//! let id = RecordId::new("42")?;
//! let key = StorageKey::for_record("exports", None, &id);
//! assert_eq!(key.as_str(), "exports/42");
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod export;
pub mod ids;
pub mod record;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{BuildError, DocshipError, LinkError, RenderError, StorageError, UploadError};
pub use export::{
    DeliveryLink, DocumentArtifact, DocumentFormat, ExportFailure, ExportOutcome, ExportRequest,
    ExportStage, ExportState, FailureKind, StoredObjectRef,
};
pub use ids::{RecordId, StorageKey};
pub use record::LogRecord;
pub use result::Result;
