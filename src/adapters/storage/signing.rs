//! Expiring link signatures
//!
//! A link carries `expires=<unix seconds>&signature=<base64url>`, where the
//! signature is HMAC-SHA256 over `"{bucket}/{key}\n{expires}"`.

use crate::config::SecretString;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use ring::hmac;
use secrecy::ExposeSecret;

/// Signs and verifies object links with a shared key
#[derive(Clone)]
pub struct UrlSigner {
    key: hmac::Key,
}

// The key is never printed
impl std::fmt::Debug for UrlSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UrlSigner")
            .field("key", &"<redacted>")
            .finish()
    }
}

impl UrlSigner {
    pub fn new(secret: &SecretString) -> Self {
        let raw: &str = secret.expose_secret().as_ref();
        Self {
            key: hmac::Key::new(hmac::HMAC_SHA256, raw.as_bytes()),
        }
    }

    fn message(object_path: &str, expires: i64) -> String {
        format!("{object_path}\n{expires}")
    }

    /// Signature for an object path and expiry
    pub fn signature(&self, object_path: &str, expires: i64) -> String {
        let tag = hmac::sign(&self.key, Self::message(object_path, expires).as_bytes());
        URL_SAFE_NO_PAD.encode(tag.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    fn signer(key: &str) -> UrlSigner {
        UrlSigner::new(&secret_string(key.to_string()))
    }

    #[test]
    fn test_signature_is_full_sha256_tag() {
        let sig = signer("signing-key").signature("docs/exports/42", 1_700_000_000);
        assert_eq!(URL_SAFE_NO_PAD.decode(sig).unwrap().len(), 32);
    }

    #[test]
    fn test_signature_matches_raw_hmac() {
        let sig = signer("signing-key").signature("docs/exports/42", 1_700_000_000);

        let key = hmac::Key::new(hmac::HMAC_SHA256, b"signing-key");
        let tag = hmac::sign(&key, b"docs/exports/42\n1700000000");
        assert_eq!(sig, URL_SAFE_NO_PAD.encode(tag.as_ref()));
        assert!(!sig.contains('=') && !sig.contains('+') && !sig.contains('/'));
    }

    #[test]
    fn test_signature_binds_path_and_expiry() {
        let signer = signer("signing-key");
        let sig = signer.signature("docs/exports/42", 1_700_000_000);

        assert_eq!(sig, signer.signature("docs/exports/42", 1_700_000_000));
        assert_ne!(sig, signer.signature("docs/exports/43", 1_700_000_000));
        assert_ne!(sig, signer.signature("docs/exports/42", 1_700_000_001));
    }

    #[test]
    fn test_different_keys_disagree() {
        let a = signer("key-a").signature("docs/exports/42", 1);
        let b = signer("key-b").signature("docs/exports/42", 1);
        assert_ne!(a, b);
    }

    #[test]
    fn test_debug_hides_key() {
        let signer = signer("signing-key");
        assert!(!format!("{signer:?}").contains("signing-key"));
    }
}
