//! Resource state and its wire format.
//!
//! A resource's live state is a bag of metadata plus two property maps
//! (inputs and outputs) that route through the property value codec so
//! secrets, assets, and references get their special handling.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tide_property::{PropertyMap, Urn};
use tide_secrets::{Decrypter, Encrypter};
use tracing::debug;

use crate::deserialize::deserialize_properties;
use crate::error::{Error, Result};
use crate::serialize::serialize_properties;

/// Operation timeouts configured on a custom resource, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomTimeouts {
    /// Timeout for create operations. Zero means unset.
    #[serde(default)]
    pub create: f64,
    /// Timeout for update operations. Zero means unset.
    #[serde(default)]
    pub update: f64,
    /// Timeout for delete operations. Zero means unset.
    #[serde(default)]
    pub delete: f64,
}

impl CustomTimeouts {
    /// Returns true if no timeout is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.create == 0.0 && self.update == 0.0 && self.delete == 0.0
    }
}

/// The live state of one resource in a deployment.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceState {
    /// The resource's URN. Non-empty by construction.
    pub urn: Urn,
    /// The resource's type token.
    pub type_: String,
    /// True for custom (provider-managed) resources, false for
    /// components.
    pub custom: bool,
    /// True if the resource is pending deletion.
    pub delete: bool,
    /// True if the resource is not managed by this deployment.
    pub external: bool,
    /// The provider-assigned ID. Components have none.
    pub id: Option<String>,
    /// Input properties. Absent maps are omitted from the wire form.
    pub inputs: Option<PropertyMap>,
    /// Output properties. Absent maps are omitted from the wire form.
    pub outputs: Option<PropertyMap>,
    /// The URN of the parent resource, if any.
    pub parent: Option<Urn>,
    /// URNs of resources this resource depends on.
    pub dependencies: Vec<Urn>,
    /// The provider reference that manages this resource.
    pub provider: Option<String>,
    /// Dependency URNs broken down per input property.
    pub property_dependencies: BTreeMap<String, Vec<Urn>>,
    /// True if the resource is awaiting replacement.
    pub pending_replacement: bool,
    /// Output property names to treat as secret in addition to those
    /// already marked.
    pub additional_secret_outputs: Vec<String>,
    /// Other URNs this resource is known by.
    pub aliases: Vec<Urn>,
    /// The ID the resource was imported with, if it was imported.
    pub import_id: Option<String>,
    /// Operation timeouts. Included on the wire only when non-empty.
    pub custom_timeouts: Option<CustomTimeouts>,
}

impl ResourceState {
    /// Creates a minimal resource state with the given URN and type.
    #[must_use]
    pub fn new(urn: Urn, type_: impl Into<String>) -> Self {
        Self {
            urn,
            type_: type_.into(),
            custom: false,
            delete: false,
            external: false,
            id: None,
            inputs: None,
            outputs: None,
            parent: None,
            dependencies: Vec::new(),
            provider: None,
            property_dependencies: BTreeMap::new(),
            pending_replacement: false,
            additional_secret_outputs: Vec::new(),
            aliases: Vec::new(),
            import_id: None,
            custom_timeouts: None,
        }
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// The versioned wire form of a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceV1 {
    /// The resource's URN.
    pub urn: String,
    /// The resource's type token.
    #[serde(rename = "type")]
    pub type_: String,
    /// True for custom resources.
    #[serde(default, skip_serializing_if = "is_false")]
    pub custom: bool,
    /// True if pending deletion.
    #[serde(default, skip_serializing_if = "is_false")]
    pub delete: bool,
    /// True if externally managed.
    #[serde(default, skip_serializing_if = "is_false")]
    pub external: bool,
    /// The provider-assigned ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Serialized input properties.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs: Option<Map<String, Value>>,
    /// Serialized output properties.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<Map<String, Value>>,
    /// The parent URN.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Dependency URNs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
    /// The managing provider reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Per-property dependency URNs.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub property_dependencies: BTreeMap<String, Vec<String>>,
    /// True if awaiting replacement.
    #[serde(default, skip_serializing_if = "is_false")]
    pub pending_replacement: bool,
    /// Extra output property names to treat as secret.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_secret_outputs: Vec<String>,
    /// Alias URNs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    /// The import ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_id: Option<String>,
    /// Operation timeouts, present only when non-empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_timeouts: Option<CustomTimeouts>,
}

/// Serializes a resource's state to its wire form.
///
/// Inputs and outputs route through the property value codec; absent
/// maps stay absent on the wire rather than becoming empty maps, so old
/// and new wire forms diff cleanly. A non-empty URN is a precondition
/// enforced by the [`Urn`] type itself.
///
/// # Errors
///
/// Fails if any input or output property fails to serialize.
pub fn serialize_resource(
    state: &ResourceState,
    encrypter: &dyn Encrypter,
    show_secrets: bool,
) -> Result<ResourceV1> {
    debug!(urn = %state.urn, "serializing resource");

    let inputs = state
        .inputs
        .as_ref()
        .map(|map| serialize_properties(map, encrypter, show_secrets))
        .transpose()?;
    let outputs = state
        .outputs
        .as_ref()
        .map(|map| serialize_properties(map, encrypter, show_secrets))
        .transpose()?;

    Ok(ResourceV1 {
        urn: state.urn.as_str().to_string(),
        type_: state.type_.clone(),
        custom: state.custom,
        delete: state.delete,
        external: state.external,
        id: state.id.clone(),
        inputs,
        outputs,
        parent: state.parent.as_ref().map(|p| p.as_str().to_string()),
        dependencies: state
            .dependencies
            .iter()
            .map(|d| d.as_str().to_string())
            .collect(),
        provider: state.provider.clone(),
        property_dependencies: state
            .property_dependencies
            .iter()
            .map(|(key, urns)| {
                let urns = urns.iter().map(|u| u.as_str().to_string()).collect();
                (key.clone(), urns)
            })
            .collect(),
        pending_replacement: state.pending_replacement,
        additional_secret_outputs: state.additional_secret_outputs.clone(),
        aliases: state.aliases.iter().map(|a| a.as_str().to_string()).collect(),
        import_id: state.import_id.clone(),
        custom_timeouts: state.custom_timeouts.filter(|t| !t.is_empty()),
    })
}

/// Deserializes a resource wire form back into live state.
///
/// # Errors
///
/// Fails if `type` or `urn` is empty, if a non-custom resource carries
/// an ID, or if any input or output property fails to deserialize.
pub fn deserialize_resource(
    wire: &ResourceV1,
    decrypter: &dyn Decrypter,
    encrypter: &dyn Encrypter,
) -> Result<ResourceState> {
    if wire.type_.is_empty() {
        return Err(Error::MissingResourceField {
            field: "type".to_string(),
        });
    }
    if wire.urn.is_empty() {
        return Err(Error::MissingResourceField {
            field: "urn".to_string(),
        });
    }
    if !wire.custom {
        if let Some(id) = &wire.id {
            if !id.is_empty() {
                return Err(Error::InvalidResource {
                    urn: wire.urn.clone(),
                    reason: "non-custom resource has an id".to_string(),
                });
            }
        }
    }

    debug!(urn = %wire.urn, "deserializing resource");

    let inputs = wire
        .inputs
        .as_ref()
        .map(|map| deserialize_properties(map, decrypter, encrypter))
        .transpose()?;
    let outputs = wire
        .outputs
        .as_ref()
        .map(|map| deserialize_properties(map, decrypter, encrypter))
        .transpose()?;

    let parse_urns = |urns: &[String]| -> Result<Vec<Urn>> {
        urns.iter().map(|u| Ok(Urn::new(u.clone())?)).collect()
    };

    Ok(ResourceState {
        urn: Urn::new(wire.urn.clone())?,
        type_: wire.type_.clone(),
        custom: wire.custom,
        delete: wire.delete,
        external: wire.external,
        id: wire.id.clone(),
        inputs,
        outputs,
        parent: wire
            .parent
            .as_ref()
            .map(|p| Urn::new(p.clone()))
            .transpose()?,
        dependencies: parse_urns(&wire.dependencies)?,
        provider: wire.provider.clone(),
        property_dependencies: wire
            .property_dependencies
            .iter()
            .map(|(key, urns)| Ok((key.clone(), parse_urns(urns)?)))
            .collect::<Result<BTreeMap<_, _>>>()?,
        pending_replacement: wire.pending_replacement,
        additional_secret_outputs: wire.additional_secret_outputs.clone(),
        aliases: parse_urns(&wire.aliases)?,
        import_id: wire.import_id.clone(),
        custom_timeouts: wire.custom_timeouts,
    })
}
