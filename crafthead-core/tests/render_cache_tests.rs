// tests/render_cache_tests.rs

mod test_utils;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use chrono::Utc;

use crafthead_common::models::{CosmeticSlot, Game, SkinModel, StructuredSkin, View};
use crafthead_common::traits::{Blob, BlobStore};
use crafthead_core::cache::{RenderCache, RenderCacheKey, CREATED_AT_KEY};
use crafthead_core::cosmetics::CosmeticResolver;
use crafthead_core::storage::MemoryBlobStore;
use crafthead_core::tasks::BackgroundTasks;
use crafthead_core::Error;
use test_utils::*;

/// Store whose every call fails.
struct BrokenStore;

#[async_trait]
impl BlobStore for BrokenStore {
    async fn get(&self, _key: &str) -> Result<Option<Blob>, Error> {
        Err(Error::Storage("disk on fire".into()))
    }
    async fn put(&self, _key: &str, _bytes: Vec<u8>, _metadata: HashMap<String, String>) -> Result<(), Error> {
        Err(Error::Storage("disk on fire".into()))
    }
    async fn delete(&self, _key: &str) -> Result<(), Error> {
        Err(Error::Storage("disk on fire".into()))
    }
}

fn cache_over(store: Arc<MemoryBlobStore>) -> RenderCache {
    RenderCache::new(store, Duration::from_secs(24 * 3600), BackgroundTasks::new())
}

fn texture_key() -> RenderCacheKey {
    RenderCacheKey::for_texture(JIMBO_TEXTURE, SkinModel::Regular, View::Avatar, 180, false)
}

#[tokio::test]
async fn test_store_then_hit() {
    let store = Arc::new(MemoryBlobStore::new());
    let cache = cache_over(store.clone());
    let key = texture_key();

    assert!(cache.fetch(&key).await.is_none());
    cache.store(&key, vec![1, 2, 3]).await.unwrap();
    assert_eq!(cache.fetch(&key).await, Some(vec![1, 2, 3]));

    let blob = store.get(key.as_str()).await.unwrap().unwrap();
    let stamped: i64 = blob.metadata[CREATED_AT_KEY].parse().unwrap();
    assert!(Utc::now().timestamp_millis() - stamped < 60_000);
}

#[tokio::test]
async fn test_stale_entry_is_a_miss_and_deleted() {
    let store = Arc::new(MemoryBlobStore::new());
    let cache = cache_over(store.clone());
    let key = texture_key();

    cache.store(&key, vec![9]).await.unwrap();
    let two_days_ago = Utc::now().timestamp_millis() - 48 * 3600 * 1000;
    assert!(store.set_metadata(key.as_str(), CREATED_AT_KEY, two_days_ago.to_string()));

    assert!(cache.fetch(&key).await.is_none());
    assert!(!store.contains(key.as_str()));
}

#[tokio::test]
async fn test_unparseable_timestamp_counts_as_stale() {
    let store = Arc::new(MemoryBlobStore::new());
    let cache = cache_over(store.clone());
    let key = texture_key();

    store.insert(key.as_str(), vec![4, 4]);
    assert!(cache.fetch(&key).await.is_none());
    assert!(!store.contains(key.as_str()));

    cache.store(&key, vec![5]).await.unwrap();
    store.set_metadata(key.as_str(), CREATED_AT_KEY, "yesterday-ish");
    assert!(cache.fetch(&key).await.is_none());
}

#[tokio::test]
async fn test_store_errors_degrade_to_miss() {
    let cache = RenderCache::new(Arc::new(BrokenStore), Duration::from_secs(60), BackgroundTasks::new());
    let key = texture_key();
    assert!(cache.fetch(&key).await.is_none());
    assert!(matches!(cache.store(&key, vec![1]).await, Err(Error::Storage(_))));

    // A detached write failure is logged, never surfaced.
    cache.store_detached(key, vec![1]);
    cache.tasks().drain().await;
    assert!(cache.tasks().is_empty());
}

#[tokio::test]
async fn test_detached_store_lands_after_drain() {
    let store = Arc::new(MemoryBlobStore::new());
    let cache = cache_over(store.clone());
    let key = texture_key();

    cache.store_detached(key.clone(), vec![7, 7, 7]);
    cache.tasks().drain().await;
    assert_eq!(cache.fetch(&key).await, Some(vec![7, 7, 7]));

    // The pool stays usable after a drain.
    let other = RenderCacheKey::for_texture(JIMBO_TEXTURE, SkinModel::Slim, View::Avatar, 180, false);
    cache.store_detached(other.clone(), vec![8]);
    cache.tasks().drain().await;
    assert!(store.contains(other.as_str()));
}

#[test]
fn test_texture_keys_separate_every_pixel_input() {
    let base = texture_key();
    assert!(base.as_str().starts_with("renders/"));
    assert_eq!(base.as_str().len(), "renders/".len() + 64);
    assert_eq!(base, texture_key());

    let variants = [
        RenderCacheKey::for_texture("abc", SkinModel::Regular, View::Avatar, 180, false),
        RenderCacheKey::for_texture(JIMBO_TEXTURE, SkinModel::Slim, View::Avatar, 180, false),
        RenderCacheKey::for_texture(JIMBO_TEXTURE, SkinModel::Regular, View::Helm, 180, false),
        RenderCacheKey::for_texture(JIMBO_TEXTURE, SkinModel::Regular, View::Avatar, 181, false),
        RenderCacheKey::for_texture(JIMBO_TEXTURE, SkinModel::Regular, View::Avatar, 180, true),
    ];
    for key in variants {
        assert_ne!(key, base);
    }
}

#[test]
fn test_identically_resolving_skins_share_a_key() {
    let resolver = CosmeticResolver::new(sample_catalog());
    let a = sample_skin();
    // Unknown ids are dropped during resolution, so this skin renders the same pixels.
    let b = sample_skin().with(CosmeticSlot::Face, "NotInTheCatalog");
    assert_ne!(a, b);

    let ka = RenderCacheKey::for_resolved(Game::Hytale, &resolver.resolve(&a), View::Avatar, 180, false).unwrap();
    let kb = RenderCacheKey::for_resolved(Game::Hytale, &resolver.resolve(&b), View::Avatar, 180, false).unwrap();
    assert_eq!(ka, kb);

    let other = StructuredSkin::new().with(CosmeticSlot::Haircut, "Bob.Red");
    let kc = RenderCacheKey::for_resolved(Game::Hytale, &resolver.resolve(&other), View::Avatar, 180, false).unwrap();
    assert_ne!(ka, kc);

    let bigger = RenderCacheKey::for_resolved(Game::Hytale, &resolver.resolve(&a), View::Avatar, 300, false).unwrap();
    assert_ne!(ka, bigger);
}
