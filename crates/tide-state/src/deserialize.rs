//! Deserialization of wire values back into property value trees.

use serde_json::{Map, Value};
use tide_property::reference::validate_reference_id;
use tide_property::sig::{
    ARCHIVE_SIG, ASSET_SIG, RESOURCE_REFERENCE_SIG, SECRET_SIG, SIG_KEY, UNKNOWN_VALUE,
};
use tide_property::{
    Archive, Asset, PropertyMap, PropertyValue, ResourceReference, SecretValue, Urn,
};
use tide_secrets::{Decrypter, Encrypter};

use crate::error::{Error, Result};

/// Deserializes a JSON wire value into a property value tree.
///
/// The unknown-value sentinel comes back as `Computed` wrapping an empty
/// string: the original shape of an unresolved value is not preserved
/// across a round trip, by contract. Decrypted secrets are constructed
/// with fresh identities and immediately seeded into `decrypter`'s cache
/// (when it is a caching variant), so re-serializing them is free.
///
/// # Errors
///
/// Fails on malformed signature objects, on unrecognized signatures, and
/// on any failure of the underlying decryption capability. A plaintext
/// secret (the show-secrets echo form) is re-encrypted through
/// `encrypter`, so that path can fail on encryption too.
pub fn deserialize_value(
    wire: &Value,
    decrypter: &dyn Decrypter,
    encrypter: &dyn Encrypter,
) -> Result<PropertyValue> {
    match wire {
        Value::Null => Ok(PropertyValue::Null),
        Value::Bool(b) => Ok(PropertyValue::Bool(*b)),
        Value::Number(n) => {
            let value = n.as_f64().ok_or(Error::Internal {
                reason: format!("number {n} has no f64 representation"),
            })?;
            Ok(PropertyValue::Number(value))
        }
        Value::String(s) => {
            if s == UNKNOWN_VALUE {
                Ok(PropertyValue::computed(PropertyValue::String(String::new())))
            } else {
                Ok(PropertyValue::String(s.clone()))
            }
        }
        Value::Array(items) => {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                values.push(deserialize_value(item, decrypter, encrypter)?);
            }
            Ok(PropertyValue::Array(values))
        }
        Value::Object(obj) => deserialize_object(obj, decrypter, encrypter),
    }
}

/// Deserializes a JSON object into a property map.
///
/// # Errors
///
/// Fails eagerly on the first failing value.
pub fn deserialize_properties(
    wire: &Map<String, Value>,
    decrypter: &dyn Decrypter,
    encrypter: &dyn Encrypter,
) -> Result<PropertyMap> {
    let mut map = PropertyMap::new();
    for (key, value) in wire {
        map.insert(key.clone(), deserialize_value(value, decrypter, encrypter)?);
    }
    Ok(map)
}

fn deserialize_object(
    obj: &Map<String, Value>,
    decrypter: &dyn Decrypter,
    encrypter: &dyn Encrypter,
) -> Result<PropertyValue> {
    let Some(sig) = obj.get(SIG_KEY) else {
        return deserialize_properties(obj, decrypter, encrypter).map(PropertyValue::Object);
    };

    match sig.as_str() {
        Some(SECRET_SIG) => deserialize_secret(obj, decrypter, encrypter),
        Some(ASSET_SIG) => {
            // The signature is trusted once matched: a mismatch here is
            // a broken invariant, not bad input.
            let asset = Asset::try_from_wire(obj)?.ok_or_else(|| Error::Internal {
                reason: "object with asset signature is not an asset".to_string(),
            })?;
            Ok(PropertyValue::Asset(asset))
        }
        Some(ARCHIVE_SIG) => {
            let archive = Archive::try_from_wire(obj)?.ok_or_else(|| Error::Internal {
                reason: "object with archive signature is not an archive".to_string(),
            })?;
            Ok(PropertyValue::Archive(archive))
        }
        Some(RESOURCE_REFERENCE_SIG) => deserialize_resource_reference(obj),
        Some(other) => Err(Error::UnrecognizedSignature {
            signature: other.to_string(),
        }),
        None => Err(Error::UnrecognizedSignature {
            signature: sig.to_string(),
        }),
    }
}

fn deserialize_secret(
    obj: &Map<String, Value>,
    decrypter: &dyn Decrypter,
    encrypter: &dyn Encrypter,
) -> Result<PropertyValue> {
    let ciphertext_field = obj.get("ciphertext");
    let plaintext_field = obj.get("plaintext");

    let (plaintext, ciphertext) = match (ciphertext_field, plaintext_field) {
        (Some(_), Some(_)) => {
            return Err(Error::MalformedSecret {
                reason: "both ciphertext and plaintext present".to_string(),
            });
        }
        (None, None) => {
            return Err(Error::MalformedSecret {
                reason: "neither ciphertext nor plaintext present".to_string(),
            });
        }
        (Some(ciphertext), None) => {
            let ciphertext = ciphertext.as_str().ok_or_else(|| Error::MalformedSecret {
                reason: "ciphertext must be a string".to_string(),
            })?;
            let plaintext = decrypter
                .decrypt_value(ciphertext)
                .map_err(|source| Error::Decrypt { source })?;
            (plaintext, ciphertext.to_string())
        }
        (None, Some(plaintext)) => {
            let plaintext = plaintext.as_str().ok_or_else(|| Error::MalformedSecret {
                reason: "plaintext must be a string".to_string(),
            })?;
            // The show-secrets echo form: re-encrypt immediately so the
            // cache gets a usable pair. A decrypter is always paired
            // with a usable encrypter on this path.
            let ciphertext = encrypter
                .encrypt_value(plaintext)
                .map_err(|source| Error::Encrypt { source })?;
            (plaintext.to_string(), ciphertext)
        }
    };

    let inner: Value = serde_json::from_str(&plaintext).map_err(|e| Error::MalformedSecret {
        reason: format!("plaintext is not valid json: {e}"),
    })?;
    let element = deserialize_value(&inner, decrypter, encrypter)?;

    let secret = SecretValue::new(element);
    decrypter.seed_secret(secret.identity(), &plaintext, &ciphertext);
    Ok(PropertyValue::Secret(secret))
}

fn deserialize_resource_reference(obj: &Map<String, Value>) -> Result<PropertyValue> {
    let urn = obj
        .get("urn")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::MalformedReference {
            reason: "missing urn".to_string(),
        })?;
    let urn = Urn::new(urn)?;

    let package_version = obj
        .get("packageVersion")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let id = parse_reference_id(obj.get("id"))?;

    let reference = match id {
        Some(id) => ResourceReference::make_custom(urn, id, package_version),
        None => ResourceReference::make_component(urn, package_version),
    };
    Ok(PropertyValue::ResourceReference(reference))
}

/// Parses the ID of a resource reference, accepting both its modern and
/// legacy wire shapes.
///
/// An older serializer leaked the internal value-wrapper shape of the ID
/// onto the wire as `{"V": <id>}`; those deployments still deserialize,
/// so both forms are accepted. An absent or null ID (in either shape)
/// means a component resource, not an error.
fn parse_reference_id(id: Option<&Value>) -> Result<Option<String>> {
    let id = match id {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(id)) => id,
        Some(Value::Object(wrapper)) => match wrapper.get("V") {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::String(id)) => id,
            Some(other) => {
                return Err(Error::MalformedReference {
                    reason: format!("wrapped id must be a string, got {other}"),
                });
            }
        },
        Some(other) => {
            return Err(Error::MalformedReference {
                reason: format!("id must be a string, got {other}"),
            });
        }
    };
    validate_reference_id(id)?;
    Ok(Some(id.clone()))
}
