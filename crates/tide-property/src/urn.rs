//! Uniform resource names for deployment resources.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The uniform resource name of a deployed resource.
///
/// URNs are opaque to the serialization layer apart from being non-empty;
/// their internal structure is owned by the resource graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Urn(String);

impl Urn {
    /// Creates a `Urn` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is empty.
    pub fn new(urn: impl Into<String>) -> Result<Self> {
        let urn = urn.into();
        if urn.is_empty() {
            return Err(Error::InvalidUrn {
                reason: "urn must not be empty".to_string(),
            });
        }
        Ok(Self(urn))
    }

    /// Returns the URN as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Urn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Urn {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
