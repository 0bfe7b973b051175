//! # Tide Property
//!
//! The property value model for Tide deployment state:
//!
//! - **Tagged values**: a closed [`PropertyValue`] union covering nulls,
//!   scalars, arrays, objects, unresolved placeholders, assets, archives,
//!   secrets, and resource references
//! - **Identity-carrying secrets**: every [`SecretValue`] is minted with a
//!   [`SecretIdentity`] at construction, so caching layers can distinguish
//!   "same secret re-serialized" from "different secret, equal plaintext"
//! - **Self-describing wire forms**: assets, archives, secrets, and
//!   resource references all carry a reserved signature key on the wire
//!
//! ## Example
//!
//! ```rust
//! use tide_property::{PropertyValue, SecretValue};
//!
//! let password = PropertyValue::secret(PropertyValue::String("hunter2".into()));
//! assert!(password.contains_secrets());
//! ```

pub mod asset;
pub mod error;
pub mod reference;
pub mod sig;
pub mod urn;
pub mod value;

// Re-export commonly used types
pub use asset::{Archive, ArchiveMember, Asset};
pub use error::{Error, Result};
pub use reference::ResourceReference;
pub use urn::Urn;
pub use value::{PropertyMap, PropertyValue, SecretIdentity, SecretValue};
