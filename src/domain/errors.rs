//! Domain error types
//!
//! This module defines the error hierarchy for docship. Each pipeline stage has
//! its own error type; the export orchestrator is the only place that turns them
//! into an [`ExportFailure`](crate::domain::export::ExportFailure).
//! None of these types expose third-party transport errors.

use crate::domain::ids::RecordId;
use thiserror::Error;

/// Main docship error type
///
/// Used for everything outside the per-stage pipeline: configuration,
/// adapter construction, the HTTP host and the CLI.
#[derive(Debug, Error)]
pub enum DocshipError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Record store errors (the source of log records)
    #[error("Record store error: {0}")]
    RecordStore(String),

    /// Object storage errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Network/connection errors
    #[error("Connection error: {0}")]
    Connection(String),

    /// HTTP host errors
    #[error("Server error: {0}")]
    Server(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Errors reported by an [`ObjectStore`](crate::adapters::storage::ObjectStore)
///
/// The variants describe what the storage platform said, not what the
/// pipeline should do about it; [`StorageError::is_transient`] carries the
/// retry classification.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    /// The request did not complete in time
    #[error("Storage request timed out: {0}")]
    Timeout(String),

    /// Connection could not be established or was interrupted
    #[error("Network error: {0}")]
    Network(String),

    /// The platform reported a 5xx-class failure
    #[error("Storage server error: {status} - {message}")]
    Server { status: u16, message: String },

    /// The platform is throttling requests
    #[error("Storage rate limit exceeded: {0}")]
    RateLimited(String),

    /// Credentials were missing, invalid or expired
    #[error("Storage rejected credentials: {0}")]
    Unauthorized(String),

    /// Credentials were valid but lack permission
    #[error("Storage access forbidden: {0}")]
    Forbidden(String),

    /// The payload exceeds what the platform accepts
    #[error("Payload too large: {size} bytes exceeds limit of {limit} bytes")]
    PayloadTooLarge { size: u64, limit: u64 },

    /// Any other client-side rejection (4xx)
    #[error("Storage rejected request: {status} - {message}")]
    Rejected { status: u16, message: String },

    /// Link signing was requested but no signing capability is configured
    #[error("Link signing is not available: {0}")]
    SigningUnavailable(String),

    /// A URL could not be built for the object
    #[error("Invalid object URL: {0}")]
    InvalidUrl(String),
}

impl StorageError {
    /// Whether the failure is likely to succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            StorageError::Timeout(_)
                | StorageError::Network(_)
                | StorageError::Server { .. }
                | StorageError::RateLimited(_)
        )
    }

    /// Whether the failure is an authentication or authorization problem.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            StorageError::Unauthorized(_) | StorageError::Forbidden(_)
        )
    }
}

/// Errors rendering a record into a document
#[derive(Debug, Error)]
pub enum RenderError {
    /// Writing to the render surface failed
    #[error("Render I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The record cannot be represented in the document
    #[error("Record cannot be rendered: {0}")]
    Unrenderable(String),
}

/// Document builder failures
#[derive(Debug, Error)]
pub enum BuildError {
    /// The record identifier does not resolve to a record
    #[error("Record not found: {0}")]
    NotFound(RecordId),

    /// The record store could not be read
    #[error("Record store unavailable: {0}")]
    Source(String),

    /// Rendering faulted internally
    #[error("Rendering failed: {0}")]
    RenderFailure(String),
}

/// Upload manager failures
///
/// Transient storage errors never appear here on their own; they are retried
/// and only their exhaustion is reported.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Every attempt failed with a transient error
    #[error("Upload failed after {attempts} attempt(s): {last_cause}")]
    Exhausted { attempts: u32, last_cause: String },

    /// Credentials were rejected; never retried
    #[error("Upload authentication failed: {0}")]
    Auth(String),

    /// The platform refused the payload (e.g. too large); never retried
    #[error("Upload rejected: {0}")]
    Rejected(String),
}

/// Link broker failures
#[derive(Debug, Error)]
pub enum LinkError {
    /// The signing capability is missing or failed
    #[error("Link signing failed: {0}")]
    Signing(String),

    /// Credentials were rejected while signing
    #[error("Link signing authentication failed: {0}")]
    Auth(String),
}

impl From<std::io::Error> for DocshipError {
    fn from(err: std::io::Error) -> Self {
        DocshipError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for DocshipError {
    fn from(err: serde_json::Error) -> Self {
        DocshipError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for DocshipError {
    fn from(err: toml::de::Error) -> Self {
        DocshipError::Configuration(format!("TOML parse error: {err}"))
    }
}
