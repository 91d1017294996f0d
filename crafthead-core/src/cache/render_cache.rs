// File: crafthead-core/src/cache/render_cache.rs

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use chrono::Utc;
use serde_json::json;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crafthead_common::models::{Game, ResolvedSkin, SkinModel, View};
use crafthead_common::traits::BlobStore;
use crate::tasks::BackgroundTasks;
use crate::Error;

/// Metadata entry holding the store time in epoch milliseconds.
pub const CREATED_AT_KEY: &str = "created-at";
const KEY_PREFIX: &str = "renders/";

/// Content address of one render: a SHA-256 over everything that affects the
/// output pixels, and nothing that identifies the requester.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenderCacheKey(String);

impl RenderCacheKey {
    /// Key for a structured-skin render.
    pub fn for_resolved(
        game: Game,
        skin: &ResolvedSkin,
        view: View,
        size: u32,
        armored: bool,
    ) -> Result<Self, Error> {
        // `Value` objects serialize with sorted keys, so this is canonical.
        let doc = json!({
            "game": game.as_str(),
            "skin": skin,
            "view": view.as_str(),
            "size": size,
            "armored": armored,
        });
        Ok(Self::from_bytes(&serde_json::to_vec(&doc)?))
    }

    /// Key for a flat-texture render, addressed by the texture itself.
    pub fn for_texture(texture_id: &str, model: SkinModel, view: View, size: u32, armored: bool) -> Self {
        let doc = format!(
            "minecraft\n{}\n{}\n{}\n{}\n{}",
            texture_id,
            model.as_str(),
            view.as_str(),
            size,
            armored
        );
        Self::from_bytes(doc.as_bytes())
    }

    fn from_bytes(bytes: &[u8]) -> Self {
        Self(format!("{KEY_PREFIX}{}", hex::encode(Sha256::digest(bytes))))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RenderCacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Render dedup cache over a blob store. Reads degrade to a miss on any
/// error; writes are detached from the caller.
#[derive(Clone)]
pub struct RenderCache {
    store: Arc<dyn BlobStore>,
    ttl: chrono::Duration,
    tasks: BackgroundTasks,
}

impl RenderCache {
    pub fn new(store: Arc<dyn BlobStore>, ttl: Duration, tasks: BackgroundTasks) -> Self {
        Self {
            store,
            ttl: chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::hours(24)),
            tasks,
        }
    }

    /// Fresh cached bytes, or `None`. A stale entry is deleted on the way.
    pub async fn fetch(&self, key: &RenderCacheKey) -> Option<Vec<u8>> {
        let blob = match self.store.get(key.as_str()).await {
            Ok(Some(blob)) => blob,
            Ok(None) => return None,
            Err(e) => {
                warn!("Render cache read failed for {}: {:?}", key, e);
                return None;
            }
        };

        let created = blob
            .metadata
            .get(CREATED_AT_KEY)
            .and_then(|raw| raw.parse::<i64>().ok());
        let now = Utc::now().timestamp_millis();
        let fresh = matches!(created, Some(ms) if now - ms < self.ttl.num_milliseconds());

        if fresh {
            debug!("Render cache hit {}", key);
            return Some(blob.bytes);
        }

        debug!("Render cache entry {} is stale; deleting", key);
        if let Err(e) = self.store.delete(key.as_str()).await {
            warn!("Failed to delete stale render {}: {:?}", key, e);
        }
        None
    }

    /// Write `bytes` stamped with the current time.
    pub async fn store(&self, key: &RenderCacheKey, bytes: Vec<u8>) -> Result<(), Error> {
        store_blob(self.store.as_ref(), key, bytes).await
    }

    /// Schedule a store on the background pool and return immediately.
    pub fn store_detached(&self, key: RenderCacheKey, bytes: Vec<u8>) {
        let store = self.store.clone();
        self.tasks.spawn("render-cache-store", async move {
            store_blob(store.as_ref(), &key, bytes).await
        });
    }

    pub fn tasks(&self) -> &BackgroundTasks {
        &self.tasks
    }
}

async fn store_blob(store: &dyn BlobStore, key: &RenderCacheKey, bytes: Vec<u8>) -> Result<(), Error> {
    let mut metadata = HashMap::new();
    metadata.insert(CREATED_AT_KEY.to_string(), Utc::now().timestamp_millis().to_string());
    store.put(key.as_str(), bytes, metadata).await
}
