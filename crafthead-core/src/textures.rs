// File: crafthead-core/src/textures.rs

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crafthead_common::models::{Profile, SkinModel, TextureRef};
use crate::assets::AssetStore;
use crate::cosmetics::ASSET_ROOT;
use crate::http::HttpClient;
use crate::identity::DefaultSkin;
use crate::Error;

/// Where the skin texture for a flat render comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkinSource {
    /// Texture hash served by the texture host.
    Texture(String),
    /// Built-in skin for players without a usable texture.
    Default(DefaultSkin),
}

impl SkinSource {
    /// Stable id used in cache keys; identical textures share it no matter
    /// how the player was addressed.
    pub fn cache_id(&self) -> String {
        match self {
            SkinSource::Texture(id) => id.clone(),
            SkinSource::Default(skin) => format!("default:{}", skin.name()),
        }
    }
}

/// Textures chosen for one Minecraft request.
#[derive(Debug, Clone)]
pub struct LegacyTextures {
    pub skin: SkinSource,
    pub model: SkinModel,
    pub cape: Option<String>,
}

/// Canonical texture id for a texture URL (its last path segment, leading
/// zeros stripped).
pub fn texture_id_from_ref(texture: &TextureRef) -> Option<String> {
    let raw = texture.texture_id()?;
    let stripped = raw.trim_start_matches('0');
    Some(if stripped.is_empty() { "0".to_string() } else { stripped.to_ascii_lowercase() })
}

/// Choose the skin/cape textures for a player. Falls back to the default
/// skin when the profile is absent or carries no usable skin.
pub fn select_legacy_textures(profile: Option<&Profile>, canonical_id: &str) -> LegacyTextures {
    let default = DefaultSkin::for_canonical(canonical_id);
    let payload = match profile.map(Profile::textures) {
        Some(Ok(payload)) => payload,
        Some(Err(e)) => {
            warn!("Unreadable textures property for {}: {:?}", canonical_id, e);
            None
        }
        None => None,
    };

    let Some(payload) = payload else {
        return LegacyTextures {
            skin: SkinSource::Default(default),
            model: default.model(),
            cape: None,
        };
    };

    let cape = payload.textures.cape.as_ref().and_then(texture_id_from_ref);
    match payload.textures.skin.as_ref() {
        Some(skin) => match texture_id_from_ref(skin) {
            Some(id) => LegacyTextures {
                skin: SkinSource::Texture(id),
                model: if skin.is_slim() { SkinModel::Slim } else { SkinModel::Regular },
                cape,
            },
            None => LegacyTextures {
                skin: SkinSource::Default(default),
                model: default.model(),
                cape,
            },
        },
        None => LegacyTextures {
            skin: SkinSource::Default(default),
            model: default.model(),
            cape,
        },
    }
}

/// Downloads textures from the texture host and serves the built-in skins.
#[derive(Clone)]
pub struct TextureFetcher {
    http: Arc<dyn HttpClient>,
    texture_base: String,
    assets: AssetStore,
}

impl TextureFetcher {
    pub fn new(http: Arc<dyn HttpClient>, texture_base: impl Into<String>, assets: AssetStore) -> Self {
        Self {
            http,
            texture_base: texture_base.into().trim_end_matches('/').to_string(),
            assets,
        }
    }

    /// PNG bytes for a texture hash. Anything but a 2xx is `AssetMissing`.
    pub async fn fetch_texture(&self, texture_id: &str) -> Result<Vec<u8>, Error> {
        let url = format!("{}/texture/{}", self.texture_base, texture_id);
        debug!("Fetching texture {}", url);
        let resp = self
            .http
            .get(&url, HashMap::new())
            .await
            .map_err(|e| Error::AssetMissing(format!("texture {texture_id}: {e}")))?;
        if !resp.is_success() {
            return Err(Error::AssetMissing(format!(
                "texture {texture_id}: HTTP {}",
                resp.status
            )));
        }
        Ok(resp.body)
    }

    pub async fn default_skin(&self, skin: DefaultSkin) -> Result<Vec<u8>, Error> {
        self.assets
            .fetch(&format!("{ASSET_ROOT}Defaults/{}.png", skin.name()))
            .await
    }

    pub async fn fetch_skin(&self, source: &SkinSource) -> Result<Vec<u8>, Error> {
        match source {
            SkinSource::Texture(id) => self.fetch_texture(id).await,
            SkinSource::Default(skin) => self.default_skin(*skin).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use crafthead_common::models::ProfileProperty;

    fn profile_with(textures_json: &str) -> Profile {
        Profile {
            id: "ef6134805b6244e4a4467fbe85d65513".into(),
            name: "CherryJimbo".into(),
            properties: vec![ProfileProperty {
                name: "textures".into(),
                value: STANDARD.encode(textures_json),
                signature: None,
            }],
            skin: None,
        }
    }

    #[test]
    fn test_slim_skin_and_cape_selected() {
        let profile = profile_with(
            r#"{"textures":{"SKIN":{"url":"http://textures.minecraft.net/texture/0abc","metadata":{"model":"slim"}},
                            "CAPE":{"url":"http://textures.minecraft.net/texture/cafe"}}}"#,
        );
        let chosen = select_legacy_textures(Some(&profile), &profile.id);
        assert_eq!(chosen.skin, SkinSource::Texture("abc".into()));
        assert_eq!(chosen.model, SkinModel::Slim);
        assert_eq!(chosen.cape.as_deref(), Some("cafe"));
    }

    #[test]
    fn test_missing_profile_uses_default_skin() {
        let id = "ef6134805b6244e4a4467fbe85d65513";
        let chosen = select_legacy_textures(None, id);
        let expected = DefaultSkin::for_canonical(id);
        assert_eq!(chosen.skin, SkinSource::Default(expected));
        assert_eq!(chosen.model, expected.model());
        assert!(chosen.skin.cache_id().starts_with("default:"));
    }
}
