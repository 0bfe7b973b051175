//! The opaque encrypt/decrypt capability contract.
//!
//! Concrete key-management backends live elsewhere; the serialization
//! core depends only on these traits. Calls are synchronous and may block
//! on the network inside the capability.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use tide_property::SecretIdentity;

use crate::error::{Error, Result};

/// Reserved prefix marking a ciphertext slot that a bulk encryption
/// window has not yet filled in.
pub(crate) const PENDING_CIPHERTEXT_PREFIX: &str = "pending://";

/// The result of an identity-aware secret encryption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretCiphertext {
    /// A real ciphertext, available immediately.
    Resolved(String),
    /// A placeholder: the secret was queued in an open bulk encryption
    /// window and will receive its ciphertext when the window completes.
    Pending(SecretIdentity),
}

impl SecretCiphertext {
    /// Returns the string to embed in the wire output: the ciphertext
    /// itself, or a reserved placeholder token that bulk completion
    /// later patches by identity lookup.
    #[must_use]
    pub fn into_wire(self) -> String {
        match self {
            Self::Resolved(ciphertext) => ciphertext,
            Self::Pending(identity) => format!("{PENDING_CIPHERTEXT_PREFIX}{identity}"),
        }
    }

    /// Parses a wire ciphertext slot back into a pending identity, if it
    /// is a placeholder.
    #[must_use]
    pub(crate) fn parse_pending(wire: &str) -> Option<SecretIdentity> {
        let raw = wire.strip_prefix(PENDING_CIPHERTEXT_PREFIX)?;
        raw.parse::<uuid::Uuid>().ok().map(SecretIdentity::from)
    }
}

/// An opaque encryption capability.
pub trait Encrypter {
    /// Encrypts a single plaintext value.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying capability fails.
    fn encrypt_value(&self, plaintext: &str) -> Result<String>;

    /// Returns true if [`bulk_encrypt`](Self::bulk_encrypt) is a genuine
    /// batched operation rather than unsupported.
    fn supports_bulk_encryption(&self) -> bool {
        false
    }

    /// Encrypts many plaintexts in one call, returning ciphertexts in
    /// request order.
    ///
    /// # Errors
    ///
    /// The default implementation always fails; capabilities with a
    /// native bulk path override both this and
    /// [`supports_bulk_encryption`](Self::supports_bulk_encryption).
    fn bulk_encrypt(&self, plaintexts: &[String]) -> Result<Vec<String>> {
        let _ = plaintexts;
        Err(Error::BulkUnsupported)
    }

    /// Identity-aware encryption used by the property value codec.
    ///
    /// The default simply encrypts, ignoring the identity. Caching
    /// encrypters override this with the at-most-once-per-plaintext
    /// contract and bulk window queueing.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying capability fails.
    fn encrypt_secret(
        &self,
        identity: SecretIdentity,
        plaintext: &str,
    ) -> Result<SecretCiphertext> {
        let _ = identity;
        self.encrypt_value(plaintext).map(SecretCiphertext::Resolved)
    }
}

/// An opaque decryption capability.
pub trait Decrypter {
    /// Decrypts a single ciphertext value.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying capability fails.
    fn decrypt_value(&self, ciphertext: &str) -> Result<String>;

    /// Decrypts many ciphertexts, returning plaintexts in request order.
    ///
    /// The default loops over [`decrypt_value`](Self::decrypt_value);
    /// capabilities with a native bulk path override it with one batched
    /// call.
    ///
    /// # Errors
    ///
    /// Returns the first per-item error encountered.
    fn bulk_decrypt(&self, ciphertexts: &[String]) -> Result<Vec<String>> {
        ciphertexts
            .iter()
            .map(|ciphertext| self.decrypt_value(ciphertext))
            .collect()
    }

    /// Called by the decode path after a secret has been reconstructed,
    /// so caching decrypters can associate the new secret's identity
    /// with its plaintext/ciphertext pair. The default does nothing.
    fn seed_secret(&self, identity: SecretIdentity, plaintext: &str, ciphertext: &str) {
        let _ = (identity, plaintext, ciphertext);
    }
}

/// A crypter that passes values through unchanged.
///
/// Used by the codec to obtain the canonical plaintext encoding of a
/// secret's inner value, and for show-secrets inspection flows.
#[derive(Debug, Clone, Copy, Default)]
pub struct NopCrypter;

impl Encrypter for NopCrypter {
    fn encrypt_value(&self, plaintext: &str) -> Result<String> {
        Ok(plaintext.to_string())
    }
}

impl Decrypter for NopCrypter {
    fn decrypt_value(&self, ciphertext: &str) -> Result<String> {
        Ok(ciphertext.to_string())
    }
}

/// A reversible, keyless crypter for development and tests.
///
/// Offers no confidentiality at all; it exists so the caching and bulk
/// machinery can be exercised without key material.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64Crypter;

impl Encrypter for Base64Crypter {
    fn encrypt_value(&self, plaintext: &str) -> Result<String> {
        Ok(BASE64.encode(plaintext.as_bytes()))
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

impl Decrypter for Base64Crypter {
    fn decrypt_value(&self, ciphertext: &str) -> Result<String> {
        let bytes = BASE64
            .decode(ciphertext.as_bytes())
            .map_err(|e| Error::Decryption {
                reason: format!("invalid base64 ciphertext: {e}"),
            })?;
        String::from_utf8(bytes).map_err(|e| Error::Decryption {
            reason: format!("ciphertext is not utf-8 plaintext: {e}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nop_crypter_passes_through() {
        let crypter = NopCrypter;
        assert_eq!(
            crypter.encrypt_value("plain").expect("encrypt"),
            "plain"
        );
        assert_eq!(
            crypter.decrypt_value("plain").expect("decrypt"),
            "plain"
        );
        assert!(!crypter.supports_bulk_encryption());
    }

    #[test]
    fn base64_crypter_round_trips() {
        let crypter = Base64Crypter;
        let ciphertext = crypter.encrypt_value("hello").expect("encrypt");
        assert_ne!(ciphertext, "hello");

        let plaintext = crypter.decrypt_value(&ciphertext).expect("decrypt");
        assert_eq!(plaintext, "hello");
    }

    #[test]
    fn base64_crypter_rejects_garbage() {
        let crypter = Base64Crypter;
        let result = crypter.decrypt_value("not base64!!!");
        assert!(matches!(result, Err(Error::Decryption { .. })));
    }

    #[test]
    fn default_bulk_decrypt_loops_per_item() {
        let crypter = Base64Crypter;
        let ciphertexts = vec![
            crypter.encrypt_value("a").expect("encrypt a"),
            crypter.encrypt_value("b").expect("encrypt b"),
        ];

        let plaintexts = crypter.bulk_decrypt(&ciphertexts).expect("bulk decrypt");
        assert_eq!(plaintexts, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn default_bulk_encrypt_is_unsupported() {
        let crypter = NopCrypter;
        let result = crypter.bulk_encrypt(&["a".to_string()]);
        assert!(matches!(result, Err(Error::BulkUnsupported)));
    }

    #[test]
    fn pending_wire_token_round_trips() {
        let identity = SecretIdentity::new();
        let wire = SecretCiphertext::Pending(identity).into_wire();

        assert!(wire.starts_with(PENDING_CIPHERTEXT_PREFIX));
        assert_eq!(SecretCiphertext::parse_pending(&wire), Some(identity));
        assert_eq!(SecretCiphertext::parse_pending("AAAA"), None);
    }
}
