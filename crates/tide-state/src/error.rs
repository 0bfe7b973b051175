//! Error types for deployment state serialization.
//!
//! Three classes are kept distinct: malformed input (schema violations in
//! wire data, surfaced with the offending field), capability failures
//! (underlying encrypt/decrypt errors, propagated with operation
//! context, never retried here), and internal contract violations (a
//! signature matched but the specialized decoder disagreed).

use thiserror::Error;

/// Errors that can occur serializing or deserializing deployment state.
#[derive(Debug, Error)]
pub enum Error {
    /// A secret wire object did not carry exactly one of ciphertext and
    /// plaintext.
    #[error("malformed secret value: {reason}")]
    MalformedSecret {
        /// The reason the secret is malformed.
        reason: String,
    },

    /// A wire object carried a signature this codec does not recognize.
    #[error("unrecognized value signature: {signature}")]
    UnrecognizedSignature {
        /// The offending signature value.
        signature: String,
    },

    /// A resource reference wire object is malformed.
    #[error("malformed resource reference: {reason}")]
    MalformedReference {
        /// The reason the reference is malformed.
        reason: String,
    },

    /// A resource wire object is missing a required field.
    #[error("resource is missing required field: {field}")]
    MissingResourceField {
        /// The name of the missing field.
        field: String,
    },

    /// A resource wire object violates a structural rule.
    #[error("invalid resource {urn}: {reason}")]
    InvalidResource {
        /// The URN of the offending resource.
        urn: String,
        /// The reason the resource is invalid.
        reason: String,
    },

    /// A number with no JSON representation was serialized.
    #[error("cannot serialize non-finite number: {value}")]
    NonFiniteNumber {
        /// The offending value.
        value: f64,
    },

    /// Encrypting a secret value failed in the underlying capability.
    #[error("encrypting secret value: {source}")]
    Encrypt {
        /// The underlying capability error.
        #[source]
        source: tide_secrets::Error,
    },

    /// Decrypting a secret value failed in the underlying capability.
    #[error("decrypting secret value: {source}")]
    Decrypt {
        /// The underlying capability error.
        #[source]
        source: tide_secrets::Error,
    },

    /// A property model error (malformed asset, archive, or URN).
    #[error(transparent)]
    Property(#[from] tide_property::Error),

    /// Serialized output failed schema validation.
    #[error("schema validation failed: {reason}")]
    SchemaValidation {
        /// The collected validation errors.
        reason: String,
    },

    /// An invariant broke between the signature check and the
    /// specialized decoder. Indicates a bug, not bad input.
    #[error("internal error: {reason}")]
    Internal {
        /// What went wrong.
        reason: String,
    },
}

/// Result type alias for state serialization operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formats_correctly() {
        let err = Error::MalformedSecret {
            reason: "both ciphertext and plaintext present".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "malformed secret value: both ciphertext and plaintext present"
        );

        let err = Error::UnrecognizedSignature {
            signature: "mystery".to_string(),
        };
        assert_eq!(err.to_string(), "unrecognized value signature: mystery");

        let err = Error::MissingResourceField {
            field: "type".to_string(),
        };
        assert_eq!(err.to_string(), "resource is missing required field: type");
    }

    #[test]
    fn capability_errors_carry_operation_context() {
        let err = Error::Encrypt {
            source: tide_secrets::Error::Encryption {
                reason: "kms offline".to_string(),
            },
        };
        assert_eq!(
            err.to_string(),
            "encrypting secret value: encryption error: kms offline"
        );
    }
}
