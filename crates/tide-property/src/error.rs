//! Error types for the property value model.

use thiserror::Error;

/// Errors that can occur constructing or decoding property model types.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid URN format.
    #[error("invalid urn: {reason}")]
    InvalidUrn {
        /// The reason the URN is invalid.
        reason: String,
    },

    /// An asset wire object matched the asset signature but is malformed.
    #[error("malformed asset: {reason}")]
    MalformedAsset {
        /// The reason the asset is malformed.
        reason: String,
    },

    /// An archive wire object matched the archive signature but is malformed.
    #[error("malformed archive: {reason}")]
    MalformedArchive {
        /// The reason the archive is malformed.
        reason: String,
    },

    /// Invalid resource reference.
    #[error("invalid resource reference: {reason}")]
    InvalidReference {
        /// The reason the reference is invalid.
        reason: String,
    },
}

/// Result type alias for property model operations.
pub type Result<T> = std::result::Result<T, Error>;
