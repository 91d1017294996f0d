// File: crafthead-common/src/models/cosmetic.rs

use std::collections::HashMap;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use crate::models::skin::CosmeticSlot;

/// Static catalog entry for one cosmetic id within a slot.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CosmeticDefinition {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub greyscale_texture: Option<String>,
    #[serde(default)]
    pub gradient_set: Option<String>,
    #[serde(default)]
    pub variants: Option<HashMap<String, CosmeticVariant>>,
    /// Pre-coloured textures keyed by colour id. Declared order matters: the
    /// first entry is the fallback when the requested colour is missing.
    #[serde(default)]
    pub textures: Option<IndexMap<String, TextureEntry>>,
}

impl CosmeticDefinition {
    pub fn variant(&self, key: &str) -> Option<&CosmeticVariant> {
        self.variants.as_ref()?.get(key)
    }

    /// The pre-coloured texture table, if the definition declares a non-empty one.
    pub fn texture_table(&self) -> Option<&IndexMap<String, TextureEntry>> {
        self.textures.as_ref().filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CosmeticVariant {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub greyscale_texture: Option<String>,
    #[serde(default)]
    pub base_color: Option<Vec<String>>,
    #[serde(default)]
    pub textures: Option<IndexMap<String, TextureEntry>>,
}

impl CosmeticVariant {
    pub fn texture_table(&self) -> Option<&IndexMap<String, TextureEntry>> {
        self.textures.as_ref().filter(|t| !t.is_empty())
    }
}

/// A pre-coloured texture with its base colour(s).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TextureEntry {
    pub texture: String,
    #[serde(default)]
    pub base_color: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GradientDefinition {
    #[serde(default)]
    pub base_color: Option<Vec<String>>,
    #[serde(default)]
    pub texture: Option<String>,
}

/// Named palette: colour id -> base colour + tint gradient texture.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GradientSet {
    pub id: String,
    #[serde(default)]
    pub gradients: HashMap<String, GradientDefinition>,
}

/// A slot value expanded to concrete asset paths and colour data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedCosmetic {
    pub slot: CosmeticSlot,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub texture_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gradient_set_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gradient_texture_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_color: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedSkin {
    /// Every resolved slot except the skin tone, in canonical slot order.
    pub cosmetics: Vec<ResolvedCosmetic>,
    pub skin_tone: Option<ResolvedCosmetic>,
}

impl ResolvedSkin {
    pub fn get(&self, slot: CosmeticSlot) -> Option<&ResolvedCosmetic> {
        if slot == CosmeticSlot::SKIN_TONE {
            return self.skin_tone.as_ref();
        }
        self.cosmetics.iter().find(|c| c.slot == slot)
    }
}
