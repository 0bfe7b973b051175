//! A local symmetric crypter.
//!
//! Backends that keep key material locally (passphrase-derived keys,
//! files) use this ChaCha20-Poly1305 crypter instead of a remote service.
//! Wire ciphertexts are base64 over `nonce || ciphertext || tag`.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chacha20poly1305::{
    ChaCha20Poly1305, Nonce,
    aead::{Aead, KeyInit},
};
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypter::{Decrypter, Encrypter};
use crate::error::{Error, Result};

/// Size of the encryption key in bytes (256 bits).
pub const KEY_SIZE: usize = 32;

/// Size of the nonce in bytes (96 bits).
pub const NONCE_SIZE: usize = 12;

/// Size of the authentication tag in bytes (128 bits).
pub const TAG_SIZE: usize = 16;

/// A symmetric encryption key, zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey {
    bytes: [u8; KEY_SIZE],
}

impl SecretKey {
    /// Generates a new random key.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_SIZE];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Creates a `SecretKey` from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the byte slice is not exactly 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != KEY_SIZE {
            return Err(Error::Encryption {
                reason: format!("key must be exactly {KEY_SIZE} bytes, got {}", bytes.len()),
            });
        }

        let mut key_bytes = [0u8; KEY_SIZE];
        key_bytes.copy_from_slice(bytes);
        Ok(Self { bytes: key_bytes })
    }

    /// Returns the key bytes as a slice.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// A ChaCha20-Poly1305 crypter over string values.
///
/// Encryption is local, so the bulk path is genuine in the sense the
/// coordinator requires: one call, all-or-nothing.
#[derive(Debug, Clone)]
pub struct SymmetricCrypter {
    key: SecretKey,
}

impl SymmetricCrypter {
    /// Creates a crypter using the given key.
    #[must_use]
    pub const fn new(key: SecretKey) -> Self {
        Self { key }
    }

    /// Creates a crypter with a freshly generated key.
    #[must_use]
    pub fn generate() -> Self {
        Self::new(SecretKey::generate())
    }

    fn encrypt_bytes(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let cipher =
            ChaCha20Poly1305::new_from_slice(self.key.as_bytes()).map_err(|e| Error::Encryption {
                reason: format!("failed to create cipher: {e}"),
            })?;

        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, plaintext)
            .map_err(|e| Error::Encryption {
                reason: format!("encryption failed: {e}"),
            })?;

        let mut output = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        output.extend_from_slice(&nonce_bytes);
        output.extend_from_slice(&ciphertext);
        Ok(output)
    }

    fn decrypt_bytes(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        if ciphertext.len() < NONCE_SIZE + TAG_SIZE {
            return Err(Error::Decryption {
                reason: format!(
                    "ciphertext too short: expected at least {} bytes, got {}",
                    NONCE_SIZE + TAG_SIZE,
                    ciphertext.len()
                ),
            });
        }

        let cipher =
            ChaCha20Poly1305::new_from_slice(self.key.as_bytes()).map_err(|e| Error::Decryption {
                reason: format!("failed to create cipher: {e}"),
            })?;

        let nonce = Nonce::from_slice(&ciphertext[..NONCE_SIZE]);
        let encrypted = &ciphertext[NONCE_SIZE..];

        cipher
            .decrypt(nonce, encrypted)
            .map_err(|e| Error::Decryption {
                reason: format!("decryption failed: {e}"),
            })
    }
}

impl Encrypter for SymmetricCrypter {
    fn encrypt_value(&self, plaintext: &str) -> Result<String> {
        let sealed = self.encrypt_bytes(plaintext.as_bytes())?;
        Ok(BASE64.encode(sealed))
    }

    fn supports_bulk_encryption(&self) -> bool {
        true
    }

    fn bulk_encrypt(&self, plaintexts: &[String]) -> Result<Vec<String>> {
        plaintexts
            .iter()
            .map(|plaintext| self.encrypt_value(plaintext))
            .collect()
    }
}

impl Decrypter for SymmetricCrypter {
    fn decrypt_value(&self, ciphertext: &str) -> Result<String> {
        let sealed = BASE64
            .decode(ciphertext.as_bytes())
            .map_err(|e| Error::Decryption {
                reason: format!("invalid base64 ciphertext: {e}"),
            })?;
        let plaintext = self.decrypt_bytes(&sealed)?;
        String::from_utf8(plaintext).map_err(|e| Error::Decryption {
            reason: format!("decrypted value is not utf-8: {e}"),
        })
    }
}
