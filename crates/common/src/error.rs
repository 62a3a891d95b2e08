//! Error types for the contract layer.

use thiserror::Error;

use crate::crypto::KEY_LENGTH;

/// Error returned when an alert (or one of its nested values) fails
/// validation.
///
/// Messages are deterministic, descriptive and index-qualified (e.g.
/// `webhook[2].plainTextInput[0].id is required`) so that callers and tests
/// can match on substrings. Validation errors are always recoverable by
/// correcting the alert; they are never retried automatically.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(String);

impl ValidationError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    /// The human-readable validation failure, including the field path.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.0
    }
}

/// Errors from webhook payload encryption and decryption.
///
/// These are always fatal to the operation and never include key material.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The key is not exactly [`KEY_LENGTH`] bytes.
    #[error("encryption key must be exactly {KEY_LENGTH} bytes, got {actual}")]
    InvalidKeyLength { actual: usize },

    /// The encrypted blob is shorter than one nonce and cannot be split.
    #[error("encrypted data length is too short")]
    CiphertextTooShort,

    /// Sealing the plaintext failed.
    #[error("encryption failed")]
    EncryptionFailed,

    /// Authentication tag mismatch or corrupted ciphertext.
    #[error("decryption failed: data is corrupted or the key is wrong")]
    DecryptionFailed,

    /// The serialized webhook payload exceeds the size limit for encryption.
    #[error("payload is too large to encrypt, {actual} bytes serialized (max {max})")]
    PayloadTooLarge { actual: usize, max: usize },

    /// The payload could not be serialized to or deserialized from JSON.
    #[error("payload serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The stored encrypted payload is not valid base64.
    #[error("encrypted payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
}
