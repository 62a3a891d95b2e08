//! Deterministic fingerprinting of alert fields.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;
use sha2::{Digest, Sha256};

/// Hashes the given parts into a URL-safe, deterministic fingerprint.
///
/// Each part is fed to SHA-256 followed by a NUL separator byte, so that
/// `["ab", "c"]` and `["a", "bc"]` hash differently. The digest is base64
/// encoded (URL-safe alphabet, padded) so the result is safe for use in
/// URLs and as a database key.
#[must_use]
pub fn fingerprint<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut hasher = Sha256::new();

    for part in parts {
        hasher.update(part.as_ref().as_bytes());
        hasher.update([0u8]);
    }

    URL_SAFE.encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_deterministic() {
        let a = fingerprint(["alert", "C123", "header"]);
        let b = fingerprint(["alert", "C123", "header"]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_fingerprint_differs_per_field() {
        let base = fingerprint(["alert", "C123", "header"]);
        assert_ne!(base, fingerprint(["alert", "C124", "header"]));
        assert_ne!(base, fingerprint(["alert", "C123", "header2"]));
        assert_ne!(base, fingerprint(["issue", "C123", "header"]));
    }

    #[test]
    fn test_fingerprint_no_concatenation_ambiguity() {
        assert_ne!(fingerprint(["ab", "c"]), fingerprint(["a", "bc"]));
        assert_ne!(fingerprint(["ab", ""]), fingerprint(["a", "b"]));
    }

    #[test]
    fn test_fingerprint_is_url_safe() {
        let id = fingerprint(["alert", "C123", "some header / with ? chars"]);
        assert!(id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '='));
    }
}
