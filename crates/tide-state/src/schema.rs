//! JSON Schema conformance for the wire format.
//!
//! Downstream tooling validates persisted deployments against these
//! schema documents, so they are the compatibility contract for
//! everything the serializers emit. Validators compile once on first
//! use; nothing happens at module load time.

use jsonschema::Validator;
use once_cell::sync::Lazy;
use serde_json::Value;

use crate::error::{Error, Result};

/// Stable identifier of the property value schema document.
pub const PROPERTY_VALUE_SCHEMA_ID: &str = "https://tide.dev/schemas/property-value.v1.json";

/// Stable identifier of the resource schema document.
pub const RESOURCE_SCHEMA_ID: &str = "https://tide.dev/schemas/resource.v1.json";

/// The embedded property value schema document.
pub const PROPERTY_VALUE_SCHEMA: &str = include_str!("../schemas/property-value.v1.json");

/// The embedded resource schema document.
pub const RESOURCE_SCHEMA: &str = include_str!("../schemas/resource.v1.json");

fn compile(raw: &str) -> Validator {
    let schema: Value = serde_json::from_str(raw).expect("embedded schema document is valid json");
    jsonschema::options()
        .with_draft(jsonschema::Draft::Draft202012)
        .build(&schema)
        .expect("embedded schema document compiles")
}

static PROPERTY_VALUE_VALIDATOR: Lazy<Validator> = Lazy::new(|| compile(PROPERTY_VALUE_SCHEMA));
static RESOURCE_VALIDATOR: Lazy<Validator> = Lazy::new(|| compile(RESOURCE_SCHEMA));

fn validate(validator: &Validator, value: &Value) -> Result<()> {
    if validator.is_valid(value) {
        return Ok(());
    }
    let reasons: Vec<String> = validator
        .iter_errors(value)
        .map(|error| error.to_string())
        .collect();
    Err(Error::SchemaValidation {
        reason: reasons.join("; "),
    })
}

/// Validates a serialized property value against the property value
/// schema.
///
/// # Errors
///
/// Returns an error listing every violation.
pub fn validate_property_value(value: &Value) -> Result<()> {
    validate(&PROPERTY_VALUE_VALIDATOR, value)
}

/// Validates a serialized resource against the resource schema.
///
/// # Errors
///
/// Returns an error listing every violation.
pub fn validate_resource(value: &Value) -> Result<()> {
    validate(&RESOURCE_VALIDATOR, value)
}
