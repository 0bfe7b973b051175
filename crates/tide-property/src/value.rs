//! The tagged property value union.
//!
//! [`PropertyValue`] is a closed sum type so the codec gets
//! compiler-checked exhaustiveness whenever a new kind is added. Objects
//! use a `BTreeMap` so key iteration is deterministic, which keeps
//! serialized output stable across runs for identical logical content.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::asset::{Archive, Asset};
use crate::reference::ResourceReference;

/// A property bag: string keys mapped to property values.
///
/// Insertion order is irrelevant for semantics; the `BTreeMap` guarantees
/// lexicographic key order on iteration and therefore on the wire.
pub type PropertyMap = BTreeMap<String, PropertyValue>;

/// A single value in a resource's property tree.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// The absence of a value.
    Null,
    /// A boolean.
    Bool(bool),
    /// A 64-bit floating point number.
    Number(f64),
    /// A string.
    String(String),
    /// An ordered sequence of values.
    Array(Vec<PropertyValue>),
    /// A string-keyed bag of values.
    Object(PropertyMap),
    /// A value that is not yet known. Carries the expected shape of the
    /// eventual value, which is discarded on serialization.
    Computed(Box<PropertyValue>),
    /// An unresolved promise-like value. Placeholder semantics are
    /// identical to [`Computed`](Self::Computed).
    Output(Box<PropertyValue>),
    /// A content blob with a hash.
    Asset(Asset),
    /// A rooted tree of named assets and archives.
    Archive(Archive),
    /// A value that must be encrypted at rest.
    Secret(SecretValue),
    /// A link to another resource. Never an ownership relation.
    ResourceReference(ResourceReference),
}

impl PropertyValue {
    /// Wraps a value in a new secret with a fresh identity.
    #[must_use]
    pub fn secret(element: PropertyValue) -> Self {
        Self::Secret(SecretValue::new(element))
    }

    /// Wraps a shape in a computed placeholder.
    #[must_use]
    pub fn computed(shape: PropertyValue) -> Self {
        Self::Computed(Box::new(shape))
    }

    /// Wraps a shape in an output placeholder.
    #[must_use]
    pub fn output(shape: PropertyValue) -> Self {
        Self::Output(Box::new(shape))
    }

    /// Returns true if this value is or transitively contains a secret.
    #[must_use]
    pub fn contains_secrets(&self) -> bool {
        match self {
            Self::Secret(_) => true,
            Self::Array(items) => items.iter().any(PropertyValue::contains_secrets),
            Self::Object(map) => map.values().any(PropertyValue::contains_secrets),
            Self::Computed(inner) | Self::Output(inner) => inner.contains_secrets(),
            Self::Null
            | Self::Bool(_)
            | Self::Number(_)
            | Self::String(_)
            | Self::Asset(_)
            | Self::Archive(_)
            | Self::ResourceReference(_) => false,
        }
    }
}

/// A unique token identifying one secret instance.
///
/// The serialization cache is keyed by identity, not by plaintext: two
/// secrets holding equal plaintext are still distinct and must be
/// encrypted independently. Rust values have no stable allocation
/// identity across moves, so each secret is tagged with one of these at
/// construction instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretIdentity(Uuid);

impl SecretIdentity {
    /// Mints a new unique identity.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for SecretIdentity {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for SecretIdentity {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for SecretIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A secret: exclusive ownership of one inner value plus an identity.
///
/// Cloning preserves the identity, so a clone re-serializes to the same
/// ciphertext as its source. Only [`SecretValue::new`] mints a new
/// identity. Equality compares elements and ignores identity.
#[derive(Clone)]
pub struct SecretValue {
    identity: SecretIdentity,
    element: Box<PropertyValue>,
}

impl SecretValue {
    /// Creates a secret owning `element`, with a fresh identity.
    #[must_use]
    pub fn new(element: PropertyValue) -> Self {
        Self {
            identity: SecretIdentity::new(),
            element: Box::new(element),
        }
    }

    /// Returns this secret's identity.
    #[must_use]
    pub const fn identity(&self) -> SecretIdentity {
        self.identity
    }

    /// Returns the inner value.
    #[must_use]
    pub fn element(&self) -> &PropertyValue {
        &self.element
    }

    /// Consumes the secret, returning the inner value.
    #[must_use]
    pub fn into_element(self) -> PropertyValue {
        *self.element
    }
}

impl PartialEq for SecretValue {
    fn eq(&self, other: &Self) -> bool {
        self.element == other.element
    }
}

impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretValue")
            .field("identity", &self.identity)
            .field("element", &"[REDACTED]")
            .finish()
    }
}
