// File: crafthead-core/src/assets.rs

use std::sync::Arc;
use futures_util::stream::{self, StreamExt, TryStreamExt};
use tracing::debug;

use crafthead_common::traits::BlobStore;
use crate::Error;

/// Read-side view of the static asset namespace (models, animations, greyscale
/// and gradient textures, default skins).
#[derive(Clone)]
pub struct AssetStore {
    blobs: Arc<dyn BlobStore>,
    concurrency: usize,
}

impl AssetStore {
    pub fn new(blobs: Arc<dyn BlobStore>, concurrency: usize) -> Self {
        Self {
            blobs,
            concurrency: concurrency.max(1),
        }
    }

    /// Bytes for one asset. Absent or unreadable assets are `AssetMissing`.
    pub async fn fetch(&self, path: &str) -> Result<Vec<u8>, Error> {
        match self.blobs.get(path).await {
            Ok(Some(blob)) => Ok(blob.bytes),
            Ok(None) => Err(Error::AssetMissing(path.to_string())),
            Err(e) => Err(Error::AssetMissing(format!("{path}: {e}"))),
        }
    }

    pub async fn fetch_text(&self, path: &str) -> Result<String, Error> {
        let bytes = self.fetch(path).await?;
        String::from_utf8(bytes).map_err(|_| Error::AssetMissing(format!("{path} is not UTF-8")))
    }

    /// Fetch every path with bounded concurrency. The result is parallel to
    /// `paths`; one missing asset fails the whole batch.
    pub async fn fetch_all(&self, paths: &[String]) -> Result<Vec<Vec<u8>>, Error> {
        debug!("Fetching {} asset(s), concurrency {}", paths.len(), self.concurrency);
        stream::iter(paths.iter())
            .map(|path| self.fetch(path))
            .buffered(self.concurrency)
            .try_collect()
            .await
    }
}
