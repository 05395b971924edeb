//! Export pipeline value types
//!
//! Requests, artifacts, stored-object references, links and the outcome the
//! orchestrator hands back to callers. Constructors for [`StoredObjectRef`] and
//! [`DeliveryLink`] are crate-private: a stored reference only comes from an
//! acknowledged write, and a link only from a stored reference.

use crate::domain::ids::{RecordId, StorageKey};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// Output document type
///
/// The pipeline produces a single document type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    /// Single-file WordprocessingML, opened by Word as a `.doc`
    #[default]
    Word,
}

impl DocumentFormat {
    /// MIME type sent to object storage
    pub fn content_type(&self) -> &'static str {
        match self {
            DocumentFormat::Word => "application/msword",
        }
    }

    /// Conventional file extension (without the dot)
    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::Word => "doc",
        }
    }
}

/// A request to export one record
///
/// Immutable once built; the builder-style methods consume `self`.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    request_id: Uuid,
    record_id: RecordId,
    format: DocumentFormat,
    timeout: Option<Duration>,
    link_ttl: Option<Duration>,
}

impl ExportRequest {
    /// Create a request for a record using the default format
    pub fn new(record_id: RecordId) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            record_id,
            format: DocumentFormat::default(),
            timeout: None,
            link_ttl: None,
        }
    }

    /// Override the overall deadline for this request
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Request a specific link validity window
    pub fn with_link_ttl(mut self, ttl: Duration) -> Self {
        self.link_ttl = Some(ttl);
        self
    }

    /// Correlation id for logs; not part of the storage key
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn record_id(&self) -> &RecordId {
        &self.record_id
    }

    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn link_ttl(&self) -> Option<Duration> {
        self.link_ttl
    }
}

/// A rendered document waiting to be uploaded
///
/// Not `Clone`: an artifact belongs to exactly one pipeline invocation and is
/// dropped once the upload stage is done with it.
#[derive(Debug)]
pub struct DocumentArtifact {
    record_id: RecordId,
    key: StorageKey,
    format: DocumentFormat,
    bytes: Vec<u8>,
    checksum: String,
}

impl DocumentArtifact {
    pub(crate) fn new(
        record_id: RecordId,
        key: StorageKey,
        format: DocumentFormat,
        bytes: Vec<u8>,
        checksum: String,
    ) -> Self {
        Self {
            record_id,
            key,
            format,
            bytes,
            checksum,
        }
    }

    pub fn record_id(&self) -> &RecordId {
        &self.record_id
    }

    pub fn key(&self) -> &StorageKey {
        &self.key
    }

    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Hex-encoded SHA-256 of the payload
    pub fn checksum(&self) -> &str {
        &self.checksum
    }
}

/// Reference to an object the storage platform acknowledged
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredObjectRef {
    key: StorageKey,
    etag: Option<String>,
    version: Option<String>,
    checksum: String,
    size: u64,
    uploaded_at: DateTime<Utc>,
}

impl StoredObjectRef {
    pub(crate) fn acknowledged(
        artifact: &DocumentArtifact,
        etag: Option<String>,
        version: Option<String>,
        uploaded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            key: artifact.key.clone(),
            etag,
            version,
            checksum: artifact.checksum.clone(),
            size: artifact.size(),
            uploaded_at,
        }
    }

    pub fn key(&self) -> &StorageKey {
        &self.key
    }

    pub fn etag(&self) -> Option<&str> {
        self.etag.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn checksum(&self) -> &str {
        &self.checksum
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn uploaded_at(&self) -> DateTime<Utc> {
        self.uploaded_at
    }
}

/// Client-facing reference to an uploaded document
///
/// `expires_at` is `None` for permanent links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryLink {
    url: String,
    expires_at: Option<DateTime<Utc>>,
    object: StoredObjectRef,
}

impl DeliveryLink {
    pub(crate) fn new(
        url: String,
        expires_at: Option<DateTime<Utc>>,
        object: StoredObjectRef,
    ) -> Self {
        Self {
            url,
            expires_at,
            object,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// The stored object this link resolves to
    pub fn object(&self) -> &StoredObjectRef {
        &self.object
    }
}

/// Pipeline stage, used to tag failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportStage {
    Building,
    Uploading,
    LinkIssuing,
}

impl fmt::Display for ExportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportStage::Building => "building",
            ExportStage::Uploading => "uploading",
            ExportStage::LinkIssuing => "link_issuing",
        };
        write!(f, "{name}")
    }
}

/// Per-invocation state machine
///
/// `Pending → Building → Uploading → LinkIssuing → Succeeded`, with
/// `Failed(stage)` reachable from any non-terminal state. No state is revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportState {
    Pending,
    Building,
    Uploading,
    LinkIssuing,
    Succeeded,
    Failed(ExportStage),
}

impl ExportState {
    /// The stage being worked on, if any
    pub fn in_flight(&self) -> Option<ExportStage> {
        match self {
            ExportState::Building => Some(ExportStage::Building),
            ExportState::Uploading => Some(ExportStage::Uploading),
            ExportState::LinkIssuing => Some(ExportStage::LinkIssuing),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ExportState::Succeeded | ExportState::Failed(_))
    }

    /// Returns the next state if `next` is a legal forward transition
    pub fn advance(self, next: ExportState) -> Option<ExportState> {
        use ExportState::*;
        let legal = match (self, next) {
            (Pending, Building) => true,
            (Building, Uploading) => true,
            (Uploading, LinkIssuing) => true,
            (LinkIssuing, Succeeded) => true,
            (current, Failed(_)) => !current.is_terminal(),
            _ => false,
        };
        legal.then_some(next)
    }
}

/// Closed set of failure kinds callers can rely on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    NotFound,
    RenderFailure,
    UploadExhausted,
    UploadRejected,
    AuthFailure,
    SigningFailure,
    Timeout,
}

impl FailureKind {
    /// Whether a user may reasonably retry by hand
    pub fn is_retryable(&self) -> bool {
        matches!(self, FailureKind::UploadExhausted | FailureKind::Timeout)
    }

    /// Stable user-facing message
    pub fn user_message(&self) -> &'static str {
        match self {
            FailureKind::NotFound => "The requested log record does not exist.",
            FailureKind::RenderFailure => "The document could not be generated.",
            FailureKind::UploadExhausted => {
                "The document could not be uploaded right now. Please try again."
            }
            FailureKind::UploadRejected => "The document was rejected by storage.",
            FailureKind::AuthFailure => "Storage credentials were rejected. Please sign in again.",
            FailureKind::SigningFailure => "A download link could not be created.",
            FailureKind::Timeout => "The export took too long. Please try again.",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::NotFound => "not_found",
            FailureKind::RenderFailure => "render_failure",
            FailureKind::UploadExhausted => "upload_exhausted",
            FailureKind::UploadRejected => "upload_rejected",
            FailureKind::AuthFailure => "auth_failure",
            FailureKind::SigningFailure => "signing_failure",
            FailureKind::Timeout => "timeout",
        };
        write!(f, "{name}")
    }
}

/// Structured failure: what went wrong, where, and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportFailure {
    pub kind: FailureKind,
    pub stage: ExportStage,
    pub cause: String,
    /// Upload attempts made, when the failure came from the upload stage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempts: Option<u32>,
}

impl ExportFailure {
    pub fn new(kind: FailureKind, stage: ExportStage, cause: impl Into<String>) -> Self {
        Self {
            kind,
            stage,
            cause: cause.into(),
            attempts: None,
        }
    }

    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = Some(attempts);
        self
    }

    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    pub fn user_message(&self) -> &'static str {
        self.kind.user_message()
    }
}

impl fmt::Display for ExportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} during {}: {}", self.kind, self.stage, self.cause)
    }
}

impl std::error::Error for ExportFailure {}

/// Result of one export invocation: exactly one of a link or a failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Delivered(DeliveryLink),
    Failed(ExportFailure),
}

impl ExportOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ExportOutcome::Delivered(_))
    }

    pub fn link(&self) -> Option<&DeliveryLink> {
        match self {
            ExportOutcome::Delivered(link) => Some(link),
            ExportOutcome::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&ExportFailure> {
        match self {
            ExportOutcome::Delivered(_) => None,
            ExportOutcome::Failed(failure) => Some(failure),
        }
    }

    pub fn into_result(self) -> Result<DeliveryLink, ExportFailure> {
        match self {
            ExportOutcome::Delivered(link) => Ok(link),
            ExportOutcome::Failed(failure) => Err(failure),
        }
    }
}

impl From<Result<DeliveryLink, ExportFailure>> for ExportOutcome {
    fn from(result: Result<DeliveryLink, ExportFailure>) -> Self {
        match result {
            Ok(link) => ExportOutcome::Delivered(link),
            Err(failure) => ExportOutcome::Failed(failure),
        }
    }
}
