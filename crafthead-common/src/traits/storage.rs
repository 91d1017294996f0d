use std::collections::HashMap;
use async_trait::async_trait;
use crate::error::Error;

/// Bytes plus the custom metadata they were stored with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blob {
    pub bytes: Vec<u8>,
    pub metadata: HashMap<String, String>,
}

/// Byte-oriented key/value storage with per-object metadata. Backs both the
/// static asset catalog and the render cache.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Blob>, Error>;
    async fn put(&self, key: &str, bytes: Vec<u8>, metadata: HashMap<String, String>) -> Result<(), Error>;
    async fn delete(&self, key: &str) -> Result<(), Error>;
}
