//! Symmetric authenticated encryption for webhook payloads.
//!
//! Wire format: `nonce (12 bytes) || ciphertext || 16-byte tag`, produced by
//! AES-256-GCM with no associated data. The blob is base64 encoded when
//! embedded in JSON (see [`crate::Webhook::encrypt_payload`]).

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};

use crate::error::CryptoError;

/// Required key length in bytes (AES-256).
pub const KEY_LENGTH: usize = 32;

/// GCM standard nonce length in bytes.
pub const NONCE_LENGTH: usize = 12;

/// Encrypts `plaintext` with a fresh random nonce, returning
/// `nonce || ciphertext || tag` as a single byte string.
///
/// The key must be exactly [`KEY_LENGTH`] bytes.
pub fn encrypt(key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let cipher = new_cipher(key)?;
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|_| CryptoError::EncryptionFailed)?;

    let mut out = Vec::with_capacity(NONCE_LENGTH + ciphertext.len());
    out.extend_from_slice(&nonce);
    out.extend_from_slice(&ciphertext);

    Ok(out)
}

/// Decrypts a blob produced by [`encrypt`] with the same key.
///
/// Fails if the key length is wrong, the blob is shorter than one nonce, or
/// the authentication tag does not match.
pub fn decrypt(key: &[u8], encrypted_data: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let cipher = new_cipher(key)?;

    if encrypted_data.len() < NONCE_LENGTH {
        return Err(CryptoError::CiphertextTooShort);
    }

    let (nonce, ciphertext) = encrypted_data.split_at(NONCE_LENGTH);

    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| CryptoError::DecryptionFailed)
}

fn new_cipher(key: &[u8]) -> Result<Aes256Gcm, CryptoError> {
    if key.len() != KEY_LENGTH {
        return Err(CryptoError::InvalidKeyLength { actual: key.len() });
    }

    Aes256Gcm::new_from_slice(key).map_err(|_| CryptoError::InvalidKeyLength { actual: key.len() })
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &[u8] = b"passphrasewhichneedstobe32bytes!";

    #[test]
    fn test_round_trip() {
        let encrypted = encrypt(KEY, b"Heisann!").unwrap();
        let decrypted = decrypt(KEY, &encrypted).unwrap();
        assert_eq!(decrypted, b"Heisann!");
    }

    #[test]
    fn test_nonce_is_fresh() {
        let a = encrypt(KEY, b"same input").unwrap();
        let b = encrypt(KEY, b"same input").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_blob_layout() {
        let encrypted = encrypt(KEY, b"x").unwrap();
        // nonce + 1 plaintext byte + 16-byte tag
        assert_eq!(encrypted.len(), NONCE_LENGTH + 1 + 16);
    }

    #[test]
    fn test_wrong_key_length() {
        assert!(matches!(
            encrypt(b"short", b"data"),
            Err(CryptoError::InvalidKeyLength { actual: 5 })
        ));
        assert!(matches!(
            decrypt(b"short", b"data"),
            Err(CryptoError::InvalidKeyLength { actual: 5 })
        ));
    }

    #[test]
    fn test_truncated_blob() {
        assert!(matches!(
            decrypt(KEY, &[0u8; NONCE_LENGTH - 1]),
            Err(CryptoError::CiphertextTooShort)
        ));
    }

    #[test]
    fn test_tampered_ciphertext() {
        let mut encrypted = encrypt(KEY, b"Heisann!").unwrap();
        let last = encrypted.len() - 1;
        encrypted[last] ^= 0xff;

        assert!(matches!(
            decrypt(KEY, &encrypted),
            Err(CryptoError::DecryptionFailed)
        ));
    }

    #[test]
    fn test_wrong_key_fails_authentication() {
        let encrypted = encrypt(KEY, b"Heisann!").unwrap();
        let other_key = b"anotherpassphraseof32bytes....!!";
        assert!(matches!(
            decrypt(other_key, &encrypted),
            Err(CryptoError::DecryptionFailed)
        ));
    }
}
