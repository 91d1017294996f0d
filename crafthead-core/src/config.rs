// File: crafthead-core/src/config.rs

use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// Process-wide settings. Everything has a default; `from_env` layers
/// `CRAFTHEAD_*` environment variables (and a `.env` file, if present) on top.
#[derive(Debug, Clone)]
pub struct CraftheadConfig {
    pub profile_api_base: String,
    pub texture_base: String,
    pub profile_timeout: Duration,
    /// Per-request limit for every outbound HTTP call.
    pub http_timeout: Duration,
    pub profile_cache_ttl: Duration,
    pub render_cache_ttl: Duration,
    pub asset_fetch_concurrency: usize,
    pub catalog_dir: Option<PathBuf>,
    pub player_model_path: String,
    pub player_animation_path: String,
    pub default_base_texture_path: String,
    pub user_agent: String,
}

impl Default for CraftheadConfig {
    fn default() -> Self {
        Self {
            profile_api_base: "https://playerdb.co".to_string(),
            texture_base: "https://textures.minecraft.net".to_string(),
            profile_timeout: Duration::from_secs(5),
            http_timeout: Duration::from_secs(10),
            profile_cache_ttl: Duration::from_secs(3600),
            render_cache_ttl: Duration::from_secs(24 * 3600),
            asset_fetch_concurrency: 5,
            catalog_dir: None,
            player_model_path: "Common/Characters/Player.blockymodel".to_string(),
            player_animation_path: "Common/Characters/Animations/Default/Idle.blockyanim".to_string(),
            default_base_texture_path: "Common/Characters/Player_Textures/Player_Greyscale.png".to_string(),
            user_agent: "Crafthead/1.0 (+https://crafthead.net)".to_string(),
        }
    }
}

impl CraftheadConfig {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("CRAFTHEAD_PROFILE_API") {
            cfg.profile_api_base = v.trim_end_matches('/').to_string();
        }
        if let Ok(v) = std::env::var("CRAFTHEAD_TEXTURE_BASE") {
            cfg.texture_base = v.trim_end_matches('/').to_string();
        }
        if let Some(ms) = env_u64("CRAFTHEAD_PROFILE_TIMEOUT_MS") {
            cfg.profile_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = env_u64("CRAFTHEAD_HTTP_TIMEOUT_MS") {
            cfg.http_timeout = Duration::from_millis(ms.max(1));
        }
        if let Some(secs) = env_u64("CRAFTHEAD_PROFILE_CACHE_TTL_SECS") {
            cfg.profile_cache_ttl = Duration::from_secs(secs);
        }
        if let Some(secs) = env_u64("CRAFTHEAD_RENDER_CACHE_TTL_SECS") {
            cfg.render_cache_ttl = Duration::from_secs(secs);
        }
        if let Some(n) = env_u64("CRAFTHEAD_ASSET_CONCURRENCY") {
            cfg.asset_fetch_concurrency = (n as usize).max(1);
        }
        if let Ok(v) = std::env::var("CRAFTHEAD_CATALOG_DIR") {
            cfg.catalog_dir = Some(PathBuf::from(v));
        }
        cfg
    }
}

fn env_u64(name: &str) -> Option<u64> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse::<u64>() {
        Ok(v) => Some(v),
        Err(e) => {
            warn!("Ignoring {}='{}': {}", name, raw, e);
            None
        }
    }
}
