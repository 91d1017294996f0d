// File: crafthead-core/src/render/orchestrator.rs

use std::sync::Arc;
use serde_json::json;
use tracing::{debug, info, warn};

use crafthead_common::models::{
    Game, IdentityKind, ModelRenderJob, Profile, RequestDescriptor, SkinModel, SkinRenderJob, StructuredSkin, View,
};
use crafthead_common::traits::{BlobStore, ModelRenderer, ProfileProvider, SkinRenderer};
use crate::assets::AssetStore;
use crate::cache::{RenderCache, RenderCacheKey};
use crate::config::CraftheadConfig;
use crate::cosmetics::{dependencies, CosmeticCatalog, CosmeticResolver};
use crate::http::HttpClient;
use crate::identity::{IdentityNormalizer, NormalizedRequest};
use crate::profile::{ProfileResolver, Provenance};
use crate::render::{encode_png, render_text_avatar};
use crate::tasks::BackgroundTasks;
use crate::textures::{select_legacy_textures, LegacyTextures, SkinSource, TextureFetcher};
use crate::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum RenderBody {
    Png(Vec<u8>),
    Json(serde_json::Value),
}

/// What the front door sends back for one request.
#[derive(Debug, Clone)]
pub struct RenderResponse {
    pub status: u16,
    pub body: RenderBody,
    /// The image is the generated text avatar rather than a real render.
    pub fallback: bool,
    pub cache_hit: bool,
    pub provenance: Option<Provenance>,
}

impl RenderResponse {
    fn png(bytes: Vec<u8>) -> Self {
        Self {
            status: 200,
            body: RenderBody::Png(bytes),
            fallback: false,
            cache_hit: false,
            provenance: None,
        }
    }

    fn json(status: u16, value: serde_json::Value) -> Self {
        Self {
            status,
            body: RenderBody::Json(value),
            fallback: false,
            cache_hit: false,
            provenance: None,
        }
    }

    /// JSON error document for an error that escaped the pipeline.
    pub fn from_error(err: &Error) -> Self {
        Self::json(err.status_code(), json!({ "error": err.to_string() }))
    }

    pub fn content_type(&self) -> &'static str {
        match self.body {
            RenderBody::Png(_) => "image/png",
            RenderBody::Json(_) => "application/json",
        }
    }

    pub fn png_bytes(&self) -> Option<&[u8]> {
        match &self.body {
            RenderBody::Png(b) => Some(b),
            RenderBody::Json(_) => None,
        }
    }

    pub fn into_bytes(self) -> Result<Vec<u8>, Error> {
        match self.body {
            RenderBody::Png(b) => Ok(b),
            RenderBody::Json(v) => Ok(serde_json::to_vec_pretty(&v)?),
        }
    }
}

/// External collaborators the orchestrator is wired to.
pub struct Collaborators {
    pub profile_provider: Arc<dyn ProfileProvider>,
    pub http: Arc<dyn HttpClient>,
    /// Static asset namespace (`Common/...`).
    pub assets: Arc<dyn BlobStore>,
    /// Durable store behind the render dedup cache.
    pub render_store: Arc<dyn BlobStore>,
    pub skin_renderer: Arc<dyn SkinRenderer>,
    /// 3D engine for structured skins; without one those renders fall back.
    pub model_renderer: Option<Arc<dyn ModelRenderer>>,
}

pub struct RenderOrchestrator {
    normalizer: IdentityNormalizer,
    profiles: Arc<ProfileResolver>,
    cosmetics: CosmeticResolver,
    render_cache: RenderCache,
    assets: AssetStore,
    textures: TextureFetcher,
    skin_renderer: Arc<dyn SkinRenderer>,
    model_renderer: Option<Arc<dyn ModelRenderer>>,
    player_model_path: String,
    player_animation_path: String,
    default_base_texture_path: String,
}

impl RenderOrchestrator {
    pub fn new(
        config: &CraftheadConfig,
        catalog: Arc<CosmeticCatalog>,
        collaborators: Collaborators,
        tasks: BackgroundTasks,
    ) -> Self {
        let profiles = Arc::new(ProfileResolver::new(
            collaborators.profile_provider,
            config.profile_cache_ttl,
            config.profile_timeout,
        ));
        let assets = AssetStore::new(collaborators.assets, config.asset_fetch_concurrency);
        Self {
            normalizer: IdentityNormalizer::new(profiles.clone()),
            profiles,
            cosmetics: CosmeticResolver::new(catalog),
            render_cache: RenderCache::new(collaborators.render_store, config.render_cache_ttl, tasks),
            textures: TextureFetcher::new(collaborators.http, config.texture_base.clone(), assets.clone()),
            assets,
            skin_renderer: collaborators.skin_renderer,
            model_renderer: collaborators.model_renderer,
            player_model_path: config.player_model_path.clone(),
            player_animation_path: config.player_animation_path.clone(),
            default_base_texture_path: config.default_base_texture_path.clone(),
        }
    }

    pub fn profiles(&self) -> &Arc<ProfileResolver> {
        &self.profiles
    }

    pub fn background_tasks(&self) -> &BackgroundTasks {
        self.render_cache.tasks()
    }

    /// Like [`handle`](Self::handle), but caller-visible errors become a JSON
    /// error response with the matching status.
    pub async fn respond(&self, request: &RequestDescriptor) -> RenderResponse {
        match self.handle(request).await {
            Ok(resp) => resp,
            Err(e) => {
                warn!("Request for {} {} failed: {}", request.view, request.raw_identity, e);
                RenderResponse::from_error(&e)
            }
        }
    }

    /// Run one request through the pipeline. Only invalid requests and
    /// identities, upstream failures and internal errors come back as `Err`;
    /// everything else degrades to a text avatar.
    pub async fn handle(&self, request: &RequestDescriptor) -> Result<RenderResponse, Error> {
        if request.game == Game::Hytale && matches!(request.view, View::Skin | View::Cape) {
            return Err(Error::InvalidRequest(format!(
                "view '{}' is not available for {}",
                request.view, request.game
            )));
        }

        let normalized = self.normalizer.normalize(request).await?;
        let d = &normalized.descriptor;
        let (profile, provenance) = self
            .profiles
            .resolve(d.game, &d.raw_identity, d.identity_kind, normalized.prefetched.as_ref())
            .await?;
        debug!("Profile for {} {}: {}", d.game, d.raw_identity, provenance);

        if d.view == View::Profile {
            let mut resp = profile_response(profile.as_ref(), &d.raw_identity)?;
            resp.provenance = Some(provenance);
            return Ok(resp);
        }

        let rendered = match d.game {
            Game::Minecraft => self.render_legacy(d, profile.as_ref()).await,
            Game::Hytale => self.render_structured(d, profile.as_ref().and_then(|p| p.skin.as_ref())).await,
        };

        let mut resp = match rendered {
            Ok(resp) => resp,
            Err(e) if e.is_recoverable() => {
                warn!("Falling back to text avatar for {}: {}", d.raw_identity, e);
                self.fallback(&normalized, profile.as_ref())?
            }
            Err(e) => return Err(e),
        };
        resp.provenance = Some(provenance);

        info!(
            "{} {} {} size={} cache_hit={} fallback={}",
            d.game, d.view, d.raw_identity, d.size, resp.cache_hit, resp.fallback
        );
        Ok(resp)
    }

    fn fallback(&self, normalized: &NormalizedRequest, profile: Option<&Profile>) -> Result<RenderResponse, Error> {
        let name = profile
            .map(|p| p.name.as_str())
            .unwrap_or(normalized.requested_as.as_str());
        let png = encode_png(&render_text_avatar(name, normalized.descriptor.size))?;
        let mut resp = RenderResponse::png(png);
        resp.fallback = true;
        Ok(resp)
    }

    async fn render_legacy(&self, d: &RequestDescriptor, profile: Option<&Profile>) -> Result<RenderResponse, Error> {
        let chosen = if d.identity_kind == IdentityKind::TextureId {
            LegacyTextures {
                skin: SkinSource::Texture(d.raw_identity.clone()),
                model: SkinModel::Regular,
                cape: None,
            }
        } else {
            select_legacy_textures(profile, &d.raw_identity)
        };
        let model = d.model_override.unwrap_or(chosen.model);

        if d.view == View::Skin {
            let bytes = self.textures.fetch_skin(&chosen.skin).await?;
            return Ok(RenderResponse::png(bytes));
        }

        let (texture_key, source) = match d.view {
            View::Cape => {
                let Some(cape) = chosen.cape else {
                    return Err(Error::AssetMissing(format!("{} has no cape", d.raw_identity)));
                };
                (format!("cape:{cape}"), SkinSource::Texture(cape))
            }
            _ => (chosen.skin.cache_id(), chosen.skin),
        };

        let key = RenderCacheKey::for_texture(&texture_key, model, d.view, d.size, d.armored);
        if let Some(bytes) = self.render_cache.fetch(&key).await {
            let mut resp = RenderResponse::png(bytes);
            resp.cache_hit = true;
            return Ok(resp);
        }

        let texture_png = self.textures.fetch_skin(&source).await?;
        let png = self
            .skin_renderer
            .render_skin(SkinRenderJob {
                texture_png,
                view: d.view,
                size: d.size,
                armored: d.armored,
                model,
            })
            .await
            .map_err(engine_failure)?;

        self.render_cache.store_detached(key, png.clone());
        Ok(RenderResponse::png(png))
    }

    async fn render_structured(
        &self,
        d: &RequestDescriptor,
        skin: Option<&StructuredSkin>,
    ) -> Result<RenderResponse, Error> {
        let Some(skin) = skin.filter(|s| !s.is_empty()) else {
            return Err(Error::AssetMissing(format!("{} has no structured skin", d.raw_identity)));
        };
        let framing = d.view.model_framing().ok_or_else(|| {
            Error::InvalidRequest(format!("view '{}' has no 3D rendering", d.view))
        })?;

        let resolved = self.cosmetics.resolve(skin);
        let key = RenderCacheKey::for_resolved(d.game, &resolved, d.view, d.size, d.armored)?;
        if let Some(bytes) = self.render_cache.fetch(&key).await {
            let mut resp = RenderResponse::png(bytes);
            resp.cache_hit = true;
            return Ok(resp);
        }

        let Some(renderer) = self.model_renderer.as_ref() else {
            return Err(Error::RenderEngineFailure("no model renderer configured".to_string()));
        };

        let asset_paths = dependencies(&resolved);
        let base_texture_path = resolved
            .skin_tone
            .as_ref()
            .and_then(|t| t.texture_path.as_deref())
            .unwrap_or(self.default_base_texture_path.as_str());

        let (model_json, animation_json, base_texture, asset_bytes) = tokio::try_join!(
            self.assets.fetch_text(&self.player_model_path),
            self.assets.fetch_text(&self.player_animation_path),
            self.assets.fetch(base_texture_path),
            self.assets.fetch_all(&asset_paths),
        )?;

        let job = ModelRenderJob {
            model_json,
            animation_json,
            base_texture,
            resolved_skin_json: serde_json::to_string(&resolved)?,
            asset_paths,
            asset_bytes,
            view_type: framing.to_string(),
            size: d.size,
        };
        let png = renderer.render_model(job).await.map_err(engine_failure)?;

        self.render_cache.store_detached(key, png.clone());
        Ok(RenderResponse::png(png))
    }
}

/// Anything a renderer raises is an engine failure as far as callers care.
fn engine_failure(err: Error) -> Error {
    match err {
        Error::RenderEngineFailure(_) => err,
        other => Error::RenderEngineFailure(other.to_string()),
    }
}

fn profile_response(profile: Option<&Profile>, identity: &str) -> Result<RenderResponse, Error> {
    match profile {
        Some(p) => Ok(RenderResponse::json(200, serde_json::to_value(p)?)),
        None => Ok(RenderResponse::json(
            404,
            json!({ "error": format!("no profile for {identity}") }),
        )),
    }
}
