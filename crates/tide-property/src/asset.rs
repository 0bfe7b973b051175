//! Assets and archives: self-describing content blobs.
//!
//! An asset is a literal text blob with a content hash; an archive is a
//! rooted tree of named assets and archives. Both serialize to wire
//! objects tagged with the reserved signature key so the codec can
//! distinguish them from ordinary property objects.

use std::collections::BTreeMap;

use serde_json::{Map, Value, json};

use crate::error::{Error, Result};
use crate::sig::{ARCHIVE_SIG, ASSET_SIG, SIG_KEY};

/// A content blob with a hash.
///
/// Only the literal-text content form is currently defined; other forms
/// (paths, URIs) are reserved for the future.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    hash: String,
    text: String,
}

impl Asset {
    /// Creates an asset from literal text, computing its content hash.
    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let hash = blake3::hash(text.as_bytes()).to_hex().to_string();
        Self { hash, text }
    }

    /// Returns the hex content hash.
    #[must_use]
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Returns the literal text content.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Serializes this asset to its wire form.
    #[must_use]
    pub fn to_wire(&self) -> Value {
        json!({
            SIG_KEY: ASSET_SIG,
            "hash": self.hash,
            "text": self.text,
        })
    }

    /// Deserializes an asset from a wire object.
    ///
    /// Returns `Ok(None)` if the object does not carry the asset
    /// signature at all, letting the caller treat it as something else.
    ///
    /// # Errors
    ///
    /// Returns an error if the object carries the asset signature but its
    /// fields are missing or of the wrong type.
    pub fn try_from_wire(obj: &Map<String, Value>) -> Result<Option<Self>> {
        match obj.get(SIG_KEY).and_then(Value::as_str) {
            Some(ASSET_SIG) => {}
            _ => return Ok(None),
        }

        let hash = obj
            .get("hash")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::MalformedAsset {
                reason: "missing or non-string hash".to_string(),
            })?;
        let text = obj
            .get("text")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::MalformedAsset {
                reason: "missing or non-string text".to_string(),
            })?;

        Ok(Some(Self {
            hash: hash.to_string(),
            text: text.to_string(),
        }))
    }
}

/// One entry of an archive: either a leaf asset or a nested archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveMember {
    /// A leaf asset.
    Asset(Asset),
    /// A nested archive.
    Archive(Archive),
}

/// A rooted tree of named assets and archives.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Archive {
    assets: BTreeMap<String, ArchiveMember>,
}

impl Archive {
    /// Creates an empty archive.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an archive from its members.
    #[must_use]
    pub fn from_members(assets: BTreeMap<String, ArchiveMember>) -> Self {
        Self { assets }
    }

    /// Adds a member, replacing any existing member with the same name.
    pub fn insert(&mut self, name: impl Into<String>, member: ArchiveMember) {
        self.assets.insert(name.into(), member);
    }

    /// Returns the members of this archive.
    #[must_use]
    pub fn members(&self) -> &BTreeMap<String, ArchiveMember> {
        &self.assets
    }

    /// Serializes this archive to its wire form.
    #[must_use]
    pub fn to_wire(&self) -> Value {
        let mut assets = Map::new();
        for (name, member) in &self.assets {
            let wire = match member {
                ArchiveMember::Asset(asset) => asset.to_wire(),
                ArchiveMember::Archive(archive) => archive.to_wire(),
            };
            assets.insert(name.clone(), wire);
        }
        json!({
            SIG_KEY: ARCHIVE_SIG,
            "assets": assets,
        })
    }

    /// Deserializes an archive from a wire object.
    ///
    /// Returns `Ok(None)` if the object does not carry the archive
    /// signature.
    ///
    /// # Errors
    ///
    /// Returns an error if the object carries the archive signature but
    /// its members are missing, of the wrong type, or themselves
    /// malformed.
    pub fn try_from_wire(obj: &Map<String, Value>) -> Result<Option<Self>> {
        match obj.get(SIG_KEY).and_then(Value::as_str) {
            Some(ARCHIVE_SIG) => {}
            _ => return Ok(None),
        }

        let entries = obj
            .get("assets")
            .and_then(Value::as_object)
            .ok_or_else(|| Error::MalformedArchive {
                reason: "missing or non-object assets".to_string(),
            })?;

        let mut assets = BTreeMap::new();
        for (name, entry) in entries {
            let entry_obj = entry.as_object().ok_or_else(|| Error::MalformedArchive {
                reason: format!("member {name} is not an object"),
            })?;

            let member = if let Some(asset) = Asset::try_from_wire(entry_obj)? {
                ArchiveMember::Asset(asset)
            } else if let Some(archive) = Self::try_from_wire(entry_obj)? {
                ArchiveMember::Archive(archive)
            } else {
                return Err(Error::MalformedArchive {
                    reason: format!("member {name} is neither an asset nor an archive"),
                });
            };
            assets.insert(name.clone(), member);
        }

        Ok(Some(Self { assets }))
    }
}
