//! Payload encryption
//!
//! AES-256-GCM encryption with base64 transport encoding, plus an
//! HMAC-SHA256 signing helper. Keys come from configuration; the random
//! nonce is prepended to each ciphertext so no state is shared between
//! calls. Error values never carry plaintext or key material.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM, NONCE_LEN};
use ring::hmac;
use ring::rand::{SecureRandom, SystemRandom};
use thiserror::Error;

use crate::logger::Logger;

static LOG: Logger = Logger::new("security");

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("cipher key must decode to {expected} bytes")]
    InvalidKey { expected: usize },
    #[error("payload is not valid base64")]
    Encoding(#[from] base64::DecodeError),
    #[error("could not process payload")]
    Cipher,
    #[error("decrypted payload is not valid utf-8")]
    NotText,
}

pub struct Cipher {
    key: LessSafeKey,
    mac_key: hmac::Key,
    rng: SystemRandom,
}

impl Cipher {
    /// `key_b64` is the base64 encoding of a 32-byte key; the MAC key may be
    /// any length.
    pub fn new(key_b64: &str, mac_key: &[u8]) -> Result<Self, CryptoError> {
        let key_bytes = BASE64.decode(key_b64)?;
        let unbound = UnboundKey::new(&AES_256_GCM, &key_bytes).map_err(|_| {
            CryptoError::InvalidKey {
                expected: AES_256_GCM.key_len(),
            }
        })?;
        Ok(Self {
            key: LessSafeKey::new(unbound),
            mac_key: hmac::Key::new(hmac::HMAC_SHA256, mac_key),
            rng: SystemRandom::new(),
        })
    }

    /// Encrypt `plaintext` and return `base64(nonce || ciphertext || tag)`
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CryptoError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        self.rng
            .fill(&mut nonce_bytes)
            .map_err(|_| CryptoError::Cipher)?;
        let nonce = Nonce::assume_unique_for_key(nonce_bytes);

        let mut buffer = plaintext.as_bytes().to_vec();
        self.key
            .seal_in_place_append_tag(nonce, Aad::empty(), &mut buffer)
            .map_err(|_| CryptoError::Cipher)?;

        let mut payload = nonce_bytes.to_vec();
        payload.extend_from_slice(&buffer);
        Ok(BASE64.encode(payload))
    }

    /// Decrypt a value produced by [`Cipher::encrypt`]
    pub fn decrypt(&self, encoded: &str) -> Result<String, CryptoError> {
        let payload = BASE64.decode(encoded)?;
        if payload.len() < NONCE_LEN {
            return Err(CryptoError::Cipher);
        }
        let (nonce_bytes, ciphertext) = payload.split_at(NONCE_LEN);
        let nonce =
            Nonce::try_assume_unique_for_key(nonce_bytes).map_err(|_| CryptoError::Cipher)?;

        let mut buffer = ciphertext.to_vec();
        let plaintext = self
            .key
            .open_in_place(nonce, Aad::empty(), &mut buffer)
            .map_err(|_| {
                LOG.error("could not decrypt payload");
                CryptoError::Cipher
            })?;
        String::from_utf8(plaintext.to_vec()).map_err(|_| CryptoError::NotText)
    }

    /// HMAC-SHA256 over `value`, base64-encoded
    #[must_use]
    pub fn sign(&self, value: &str) -> String {
        BASE64.encode(hmac::sign(&self.mac_key, value.as_bytes()).as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_cipher() -> Cipher {
        let key = BASE64.encode([7u8; 32]);
        Cipher::new(&key, b"mac-secret").unwrap()
    }

    #[test]
    fn encrypt_then_decrypt_returns_the_plaintext() {
        let cipher = test_cipher();
        let encrypted = cipher.encrypt("confidential record").unwrap();
        assert_ne!(encrypted, "confidential record");
        assert_eq!(cipher.decrypt(&encrypted).unwrap(), "confidential record");
    }

    #[test]
    fn nonces_differ_between_calls() {
        let cipher = test_cipher();
        let first = cipher.encrypt("same input").unwrap();
        let second = cipher.encrypt("same input").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn tampered_ciphertext_is_rejected() {
        let cipher = test_cipher();
        let mut payload = BASE64.decode(cipher.encrypt("value").unwrap()).unwrap();
        let last = payload.len() - 1;
        payload[last] ^= 0xff;
        let tampered = BASE64.encode(payload);
        assert!(matches!(cipher.decrypt(&tampered), Err(CryptoError::Cipher)));
    }

    #[test]
    fn invalid_base64_is_an_encoding_error() {
        let cipher = test_cipher();
        assert!(matches!(
            cipher.decrypt("not base64!!!"),
            Err(CryptoError::Encoding(_))
        ));
    }

    #[test]
    fn short_key_is_rejected() {
        let key = BASE64.encode([1u8; 16]);
        assert!(matches!(
            Cipher::new(&key, b"mac"),
            Err(CryptoError::InvalidKey { expected: 32 })
        ));
    }

    #[test]
    fn sign_is_deterministic_per_key() {
        let cipher = test_cipher();
        assert_eq!(cipher.sign("value"), cipher.sign("value"));
        assert_ne!(cipher.sign("value"), cipher.sign("other"));
    }
}
