//! Wire signature constants.
//!
//! Self-describing wire objects (secrets, assets, archives, resource
//! references) carry a reserved key whose value identifies their kind.
//! These constants are part of the persisted wire format: every previously
//! serialized deployment depends on them, so they must never change.

/// Reserved object key identifying a self-describing wire value.
pub const SIG_KEY: &str = "__sig";

/// Signature value for a secret wire object.
pub const SECRET_SIG: &str = "secret";

/// Signature value for an asset wire object.
pub const ASSET_SIG: &str = "asset";

/// Signature value for an archive wire object.
pub const ARCHIVE_SIG: &str = "archive";

/// Signature value for a resource reference wire object.
pub const RESOURCE_REFERENCE_SIG: &str = "resource-reference";

/// Sentinel string emitted for values that are not yet known
/// ([`Computed`](crate::PropertyValue::Computed) and
/// [`Output`](crate::PropertyValue::Output) placeholders).
///
/// Any unresolved value collapses to this single marker so that consumers
/// which do not understand unresolved values degrade gracefully to
/// "unknown". Stable across versions.
pub const UNKNOWN_VALUE: &str = "9f2d41b3-0c5e-4d70-8f41-6a1e6bfb41aa";
