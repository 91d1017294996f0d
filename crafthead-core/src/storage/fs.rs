// File: crafthead-core/src/storage/fs.rs

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use async_trait::async_trait;
use tracing::warn;

use crafthead_common::traits::{Blob, BlobStore};
use crate::Error;

const META_SUFFIX: &str = ".meta.json";

/// Blob store over a directory tree: one file per key, metadata in a JSON
/// sidecar next to it.
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, Error> {
        if key.is_empty() || key.starts_with('/') || key.ends_with(META_SUFFIX) {
            return Err(Error::Storage(format!("invalid blob key '{key}'")));
        }
        let mut path = self.root.clone();
        for segment in key.split('/') {
            if segment.is_empty() || segment == "." || segment == ".." || segment.contains('\\') {
                return Err(Error::Storage(format!("invalid blob key '{key}'")));
            }
            path.push(segment);
        }
        Ok(path)
    }

    fn meta_path(path: &Path) -> PathBuf {
        let mut os = path.as_os_str().to_owned();
        os.push(META_SUFFIX);
        PathBuf::from(os)
    }
}

/// Writes through a uniquely named temp file in the same directory, then
/// renames over `path`, so readers never see a half-written file.
async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), Error> {
    let name = path
        .file_name()
        .ok_or_else(|| Error::Storage(format!("no file name in {}", path.display())))?;
    let mut tmp_name = std::ffi::OsString::from(".");
    tmp_name.push(name);
    tmp_name.push(format!(".{}.tmp", uuid::Uuid::new_v4().simple()));
    let tmp = path.with_file_name(tmp_name);

    tokio::fs::write(&tmp, bytes).await?;
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(Error::Storage(format!("rename into {}: {e}", path.display())));
    }
    Ok(())
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn get(&self, key: &str) -> Result<Option<Blob>, Error> {
        let path = self.path_for(key)?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::Storage(format!("read {}: {e}", path.display()))),
        };

        let metadata = match tokio::fs::read(Self::meta_path(&path)).await {
            Ok(raw) => serde_json::from_slice(&raw).unwrap_or_else(|e| {
                warn!("Ignoring unreadable metadata for '{}': {}", key, e);
                HashMap::new()
            }),
            Err(_) => HashMap::new(),
        };

        Ok(Some(Blob { bytes, metadata }))
    }

    async fn put(&self, key: &str, bytes: Vec<u8>, metadata: HashMap<String, String>) -> Result<(), Error> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        write_atomic(&path, &bytes).await?;

        let meta_path = Self::meta_path(&path);
        if metadata.is_empty() {
            match tokio::fs::remove_file(&meta_path).await {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        } else {
            write_atomic(&meta_path, &serde_json::to_vec(&metadata)?).await?;
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), Error> {
        let path = self.path_for(key)?;
        for p in [Self::meta_path(&path), path] {
            match tokio::fs::remove_file(&p).await {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}
