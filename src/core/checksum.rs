//! Payload checksums
//!
//! Artifacts are identified by the SHA-256 of their bytes. The same digest is
//! logged by the in-memory store on every write, so a retry can be checked to
//! have re-sent identical bytes.

use sha2::{Digest, Sha256};

/// Calculate SHA-256 checksum of raw bytes
///
/// Returns a lowercase hex-encoded string (64 characters).
///
/// # Examples
///
/// ```
/// use docship::core::checksum::calculate_checksum_bytes;
///
/// let checksum = calculate_checksum_bytes(b"hello");
/// assert_eq!(checksum.len(), 64);
/// ```
pub fn calculate_checksum_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    format!("{result:x}")
}

/// Check `data` against an expected hex checksum (case-insensitive)
pub fn verify_checksum_bytes(data: &[u8], expected: &str) -> bool {
    calculate_checksum_bytes(data).eq_ignore_ascii_case(expected)
}
