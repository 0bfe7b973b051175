//! References to other resources.

use serde_json::{Value, json};

use crate::error::{Error, Result};
use crate::sig::{RESOURCE_REFERENCE_SIG, SIG_KEY};
use crate::urn::Urn;

/// A foreign-key-like link to another resource.
///
/// Custom resources carry an ID; component resources, which have no ID by
/// design, do not. The package version records which provider package
/// defined the referenced resource's type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceReference {
    urn: Urn,
    id: Option<String>,
    package_version: String,
}

impl ResourceReference {
    /// Creates a reference to a custom resource, which has an ID.
    #[must_use]
    pub fn make_custom(urn: Urn, id: impl Into<String>, package_version: impl Into<String>) -> Self {
        Self {
            urn,
            id: Some(id.into()),
            package_version: package_version.into(),
        }
    }

    /// Creates a reference to a component resource, which has no ID.
    #[must_use]
    pub fn make_component(urn: Urn, package_version: impl Into<String>) -> Self {
        Self {
            urn,
            id: None,
            package_version: package_version.into(),
        }
    }

    /// Returns the referenced resource's URN.
    #[must_use]
    pub fn urn(&self) -> &Urn {
        &self.urn
    }

    /// Returns the referenced resource's ID, if it is a custom resource.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Returns the package version.
    #[must_use]
    pub fn package_version(&self) -> &str {
        &self.package_version
    }

    /// Serializes this reference to its wire form.
    ///
    /// The ID key is omitted entirely for component references rather
    /// than emitted as null, to keep the wire form diffable.
    #[must_use]
    pub fn to_wire(&self) -> Value {
        let mut wire = json!({
            SIG_KEY: RESOURCE_REFERENCE_SIG,
            "urn": self.urn.as_str(),
            "packageVersion": self.package_version,
        });
        if let (Some(id), Some(obj)) = (&self.id, wire.as_object_mut()) {
            obj.insert("id".to_string(), Value::String(id.clone()));
        }
        wire
    }
}

/// Validates that a reference ID is usable.
///
/// # Errors
///
/// Returns an error if the ID is empty.
pub fn validate_reference_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(Error::InvalidReference {
            reason: "custom resource reference id must not be empty".to_string(),
        });
    }
    Ok(())
}
