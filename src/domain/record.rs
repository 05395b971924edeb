//! Log record domain model
//!
//! A log record is the source material for an export. The pipeline only reads
//! records; their persistence belongs to the record store.

use crate::domain::ids::RecordId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single stored log entry
///
/// `fields` is a `BTreeMap` so iteration order (and therefore the rendered
/// document) does not depend on insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Record identifier
    pub id: RecordId,

    /// When the entry was logged
    pub timestamp: DateTime<Utc>,

    /// Severity (free-form, e.g. "info", "error")
    #[serde(default = "default_level")]
    pub level: String,

    /// Emitting component or service
    #[serde(default)]
    pub source: String,

    /// Log message, may span multiple lines
    pub message: String,

    /// Additional structured fields
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

impl LogRecord {
    /// Create a record with no extra fields
    pub fn new(
        id: RecordId,
        timestamp: DateTime<Utc>,
        level: impl Into<String>,
        source: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id,
            timestamp,
            level: level.into(),
            source: source.into(),
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Add a structured field
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}

fn default_level() -> String {
    "info".to_string()
}
