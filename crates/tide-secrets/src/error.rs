//! Error types for the secrets encryption layer.

use thiserror::Error;

/// Errors that can occur in the secrets encryption layer.
#[derive(Debug, Error)]
pub enum Error {
    /// Encryption failed in the underlying capability.
    #[error("encryption error: {reason}")]
    Encryption {
        /// The reason encryption failed.
        reason: String,
    },

    /// Decryption failed in the underlying capability.
    #[error("decryption error: {reason}")]
    Decryption {
        /// The reason decryption failed.
        reason: String,
    },

    /// The underlying encrypter has no bulk encryption support.
    #[error("bulk encryption is not supported by the underlying encrypter")]
    BulkUnsupported,

    /// A bulk encryption window is already open on this manager.
    #[error("a bulk encryption window is already open")]
    BulkWindowOpen,

    /// The bulk encrypt response did not match the request length.
    #[error("bulk encrypt returned {got} ciphertexts for {expected} plaintexts")]
    BulkLengthMismatch {
        /// Number of plaintexts sent.
        expected: usize,
        /// Number of ciphertexts received.
        got: usize,
    },
}

/// Result type alias for secrets operations.
pub type Result<T> = std::result::Result<T, Error>;
