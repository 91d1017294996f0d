// File: crafthead-core/src/storage/memory.rs

use std::collections::HashMap;
use async_trait::async_trait;
use dashmap::DashMap;

use crafthead_common::traits::{Blob, BlobStore};
use crate::Error;

/// Process-local blob store. Used in tests and as the render cache when no
/// durable store is configured.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: DashMap<String, Blob>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.blobs.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    /// Synchronous insert for seeding fixtures.
    pub fn insert(&self, key: impl Into<String>, bytes: Vec<u8>) {
        self.blobs.insert(
            key.into(),
            Blob {
                bytes,
                metadata: HashMap::new(),
            },
        );
    }

    /// Overwrite one metadata entry of an existing blob.
    pub fn set_metadata(&self, key: &str, name: &str, value: impl Into<String>) -> bool {
        match self.blobs.get_mut(key) {
            Some(mut blob) => {
                blob.metadata.insert(name.to_string(), value.into());
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn get(&self, key: &str) -> Result<Option<Blob>, Error> {
        Ok(self.blobs.get(key).map(|b| b.value().clone()))
    }

    async fn put(&self, key: &str, bytes: Vec<u8>, metadata: HashMap<String, String>) -> Result<(), Error> {
        self.blobs.insert(key.to_string(), Blob { bytes, metadata });
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), Error> {
        self.blobs.remove(key);
        Ok(())
    }
}
