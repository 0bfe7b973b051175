//! # Tide State
//!
//! Serialization of Tide deployment state to its durable, versioned
//! wire format and back:
//!
//! - **Property value codec**: recursive serialize/deserialize of the
//!   tagged [`PropertyValue`](tide_property::PropertyValue) tree,
//!   including secrets, assets, archives, resource references, and
//!   unresolved-value placeholders
//! - **Resource serializer**: a resource's input/output maps plus its
//!   metadata as a camelCase [`ResourceV1`] wire struct
//! - **Schema conformance**: embedded JSON Schema documents that pin the
//!   exact wire shape, with validators that downstream tooling (and this
//!   crate's own tests) check serialized output against
//!
//! Secret encryption routes through the capability traits in
//! [`tide_secrets`]; pass the views of a
//! [`CachingSecretsManager`](tide_secrets::CachingSecretsManager) to get
//! at-most-once encryption per secret and bulk batching.

pub mod deserialize;
pub mod error;
pub mod resource;
pub mod schema;
pub mod serialize;

// Re-export commonly used types
pub use deserialize::{deserialize_properties, deserialize_value};
pub use error::{Error, Result};
pub use resource::{
    CustomTimeouts, ResourceState, ResourceV1, deserialize_resource, serialize_resource,
};
pub use schema::{
    PROPERTY_VALUE_SCHEMA_ID, RESOURCE_SCHEMA_ID, validate_property_value, validate_resource,
};
pub use serialize::{serialize_properties, serialize_value};
