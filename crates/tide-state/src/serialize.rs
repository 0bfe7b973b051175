//! Serialization of property values to the wire format.

use serde_json::{Map, Number, Value};
use tide_property::sig::{SECRET_SIG, SIG_KEY, UNKNOWN_VALUE};
use tide_property::{PropertyMap, PropertyValue};
use tide_secrets::{Encrypter, NopCrypter};

use crate::error::{Error, Result};

/// Serializes a property value tree to its JSON wire form.
///
/// Unresolved values (`Computed` and `Output`) collapse to the reserved
/// unknown-value sentinel. Secrets are encrypted through `encrypter`
/// unless `show_secrets` is set, in which case the plaintext is embedded
/// directly for local inspection flows.
///
/// # Errors
///
/// Fails on non-finite numbers, on any failure of the underlying
/// encryption capability, and eagerly on the first failing element of an
/// array or object.
pub fn serialize_value(
    value: &PropertyValue,
    encrypter: &dyn Encrypter,
    show_secrets: bool,
) -> Result<Value> {
    match value {
        PropertyValue::Null => Ok(Value::Null),
        PropertyValue::Bool(b) => Ok(Value::Bool(*b)),
        PropertyValue::Number(n) => Number::from_f64(*n)
            .map(Value::Number)
            .ok_or(Error::NonFiniteNumber { value: *n }),
        PropertyValue::String(s) => Ok(Value::String(s.clone())),
        // Every class of not-yet-known value collapses to the same
        // marker so consumers that cannot represent unresolved values
        // degrade to "unknown".
        PropertyValue::Computed(_) | PropertyValue::Output(_) => {
            Ok(Value::String(UNKNOWN_VALUE.to_string()))
        }
        PropertyValue::Array(items) => {
            let mut wire = Vec::with_capacity(items.len());
            for item in items {
                wire.push(serialize_value(item, encrypter, show_secrets)?);
            }
            Ok(Value::Array(wire))
        }
        PropertyValue::Object(map) => {
            serialize_properties(map, encrypter, show_secrets).map(Value::Object)
        }
        PropertyValue::Asset(asset) => Ok(asset.to_wire()),
        PropertyValue::Archive(archive) => Ok(archive.to_wire()),
        PropertyValue::ResourceReference(reference) => Ok(reference.to_wire()),
        PropertyValue::Secret(secret) => {
            // Canonical plaintext: the inner element serialized with
            // encryption disabled, then JSON-encoded.
            let inner = serialize_value(secret.element(), &NopCrypter, show_secrets)?;
            let plaintext = serde_json::to_string(&inner).map_err(|e| Error::Internal {
                reason: format!("failed to encode secret plaintext: {e}"),
            })?;

            let mut wire = Map::new();
            wire.insert(SIG_KEY.to_string(), Value::String(SECRET_SIG.to_string()));
            if show_secrets {
                wire.insert("plaintext".to_string(), Value::String(plaintext));
            } else {
                let ciphertext = encrypter
                    .encrypt_secret(secret.identity(), &plaintext)
                    .map_err(|source| Error::Encrypt { source })?;
                wire.insert(
                    "ciphertext".to_string(),
                    Value::String(ciphertext.into_wire()),
                );
            }
            Ok(Value::Object(wire))
        }
    }
}

/// Serializes a property map to a JSON object.
///
/// Keys are visited in lexicographic order, so serialized output is
/// deterministic across runs for identical logical content.
///
/// # Errors
///
/// Fails eagerly on the first failing value.
pub fn serialize_properties(
    map: &PropertyMap,
    encrypter: &dyn Encrypter,
    show_secrets: bool,
) -> Result<Map<String, Value>> {
    let mut wire = Map::new();
    for (key, value) in map {
        wire.insert(key.clone(), serialize_value(value, encrypter, show_secrets)?);
    }
    Ok(wire)
}
