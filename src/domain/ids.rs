//! Domain identifier types with validation
//!
//! Newtype wrappers so record identifiers and storage keys cannot be mixed up.
//! Both types are validated on construction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum accepted length of a record identifier
pub const MAX_RECORD_ID_LEN: usize = 128;

/// Log record identifier newtype wrapper
///
/// Identifiers are opaque to the pipeline but restricted to
/// `[A-Za-z0-9._-]`, because they become part of storage keys and
/// file names in the filesystem record store.
///
/// # Examples
///
/// ```
/// use docship::domain::ids::RecordId;
/// use std::str::FromStr;
///
/// let id = RecordId::from_str("42").unwrap();
/// assert_eq!(id.as_str(), "42");
/// assert!(RecordId::new("../etc/passwd").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(String);

impl RecordId {
    /// Creates a new RecordId from a string
    ///
    /// # Returns
    ///
    /// Returns `Ok(RecordId)` if the ID is valid, `Err` otherwise
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Record ID cannot be empty".to_string());
        }

        if id.len() > MAX_RECORD_ID_LEN {
            return Err(format!(
                "Record ID exceeds {MAX_RECORD_ID_LEN} characters"
            ));
        }

        if id == "." || id == ".." {
            return Err(format!("Invalid record ID: {id}"));
        }

        if let Some(bad) = id
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
        {
            return Err(format!(
                "Invalid character {bad:?} in record ID. Allowed: A-Z, a-z, 0-9, '.', '_', '-'"
            ));
        }

        Ok(Self(id))
    }

    /// Returns the record ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for RecordId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Storage key newtype wrapper
///
/// The key under which an artifact is written to object storage. Keys are
/// derived from the request only, so a retried or repeated export of the
/// same record overwrites the same object instead of creating a new one.
///
/// # Examples
///
/// ```
/// use docship::domain::ids::{RecordId, StorageKey};
///
/// let id = RecordId::new("42").unwrap();
/// let key = StorageKey::for_record("exports", None, &id);
/// assert_eq!(key.as_str(), "exports/42");
///
/// let key = StorageKey::for_record("exports", Some("acme"), &id);
/// assert_eq!(key.as_str(), "acme/exports/42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StorageKey(String);

impl StorageKey {
    /// Derive the key for a record: `[<tenant>/]<prefix>/<record_id>`
    pub fn for_record(prefix: &str, tenant: Option<&str>, record_id: &RecordId) -> Self {
        let prefix = prefix.trim_matches('/');
        let key = match tenant.map(|t| t.trim_matches('/')).filter(|t| !t.is_empty()) {
            Some(tenant) => format!("{tenant}/{prefix}/{record_id}"),
            None => format!("{prefix}/{record_id}"),
        };
        Self(key)
    }

    /// Creates a StorageKey from an existing key string
    pub fn new(key: impl Into<String>) -> Result<Self, String> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err("Storage key cannot be empty".to_string());
        }
        if key.starts_with('/') || key.ends_with('/') {
            return Err(format!(
                "Storage key must not start or end with '/': {key}"
            ));
        }
        if key.split('/').any(|segment| segment.is_empty() || segment == "..") {
            return Err(format!("Storage key has an invalid segment: {key}"));
        }
        Ok(Self(key))
    }

    /// Returns the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_valid() {
        assert!(RecordId::new("42").is_ok());
        assert!(RecordId::new("log-2024.01_a").is_ok());
    }

    #[test]
    fn test_record_id_rejects_empty() {
        assert!(RecordId::new("").is_err());
        assert!(RecordId::new("   ").is_err());
    }

    #[test]
    fn test_record_id_rejects_path_segments() {
        assert!(RecordId::new("..").is_err());
        assert!(RecordId::new(".").is_err());
        assert!(RecordId::new("a/b").is_err());
        assert!(RecordId::new("a\\b").is_err());
        assert!(RecordId::new("id with space").is_err());
    }

    #[test]
    fn test_record_id_rejects_long_ids() {
        let long = "a".repeat(MAX_RECORD_ID_LEN + 1);
        assert!(RecordId::new(long).is_err());
    }

    #[test]
    fn test_record_id_serde_validates() {
        let id: RecordId = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(id.as_str(), "7");
        assert!(serde_json::from_str::<RecordId>("\"../x\"").is_err());
    }

    #[test]
    fn test_storage_key_is_deterministic() {
        let id = RecordId::new("7").unwrap();
        let first = StorageKey::for_record("exports", None, &id);
        let second = StorageKey::for_record("exports", None, &id);
        assert_eq!(first, second);
        assert_eq!(first.as_str(), "exports/7");
    }

    #[test]
    fn test_storage_key_trims_slashes() {
        let id = RecordId::new("7").unwrap();
        let key = StorageKey::for_record("/exports/", Some("/acme/"), &id);
        assert_eq!(key.as_str(), "acme/exports/7");
    }

    #[test]
    fn test_storage_key_empty_tenant_ignored() {
        let id = RecordId::new("7").unwrap();
        let key = StorageKey::for_record("exports", Some(""), &id);
        assert_eq!(key.as_str(), "exports/7");
    }

    #[test]
    fn test_storage_key_new_validation() {
        assert!(StorageKey::new("exports/1").is_ok());
        assert!(StorageKey::new("/exports/1").is_err());
        assert!(StorageKey::new("exports//1").is_err());
        assert!(StorageKey::new("exports/../1").is_err());
        assert!(StorageKey::new("").is_err());
    }
}
