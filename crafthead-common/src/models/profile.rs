// File: crafthead-common/src/models/profile.rs

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use crate::error::Error;
use crate::models::skin::StructuredSkin;

/// One signed property of a player profile, e.g. `textures`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ProfileProperty {
    pub name: String,
    /// Base64-encoded payload.
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

/// A resolved player profile. Serializes to the public `profile` document
/// (`id`, `name`, `properties`).
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Profile {
    /// Hyphen-free lowercase hex UUID.
    pub id: String,
    pub name: String,
    pub properties: Vec<ProfileProperty>,
    #[serde(skip)]
    pub skin: Option<StructuredSkin>,
}

impl Profile {
    pub fn property(&self, name: &str) -> Option<&ProfileProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Decode the `textures` property, if the profile carries one.
    pub fn textures(&self) -> Result<Option<TexturesPayload>, Error> {
        let Some(prop) = self.property("textures") else {
            return Ok(None);
        };
        let raw = STANDARD.decode(prop.value.trim())?;
        let payload: TexturesPayload = serde_json::from_slice(&raw)?;
        Ok(Some(payload))
    }
}

/// JSON shape hidden inside the base64 `textures` property.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct TexturesPayload {
    pub textures: TextureSet,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct TextureSet {
    #[serde(rename = "SKIN")]
    pub skin: Option<TextureRef>,
    #[serde(rename = "CAPE")]
    pub cape: Option<TextureRef>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TextureRef {
    pub url: String,
    #[serde(default)]
    pub metadata: Option<TextureMetadata>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct TextureMetadata {
    #[serde(default)]
    pub model: Option<String>,
}

impl TextureRef {
    /// Texture hash: the last path segment of the signed texture url.
    pub fn texture_id(&self) -> Option<&str> {
        self.url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty() && !s.contains(':'))
    }

    pub fn is_slim(&self) -> bool {
        self.metadata
            .as_ref()
            .and_then(|m| m.model.as_deref())
            .map(|m| m.eq_ignore_ascii_case("slim"))
            .unwrap_or(false)
    }
}
