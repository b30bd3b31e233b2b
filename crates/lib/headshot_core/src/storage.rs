//! Object storage for generated images.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Utc;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid object key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Write-only blob store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` under `key`, returning a reference to the object.
    async fn put(&self, key: &str, bytes: &[u8], content_type: &str)
    -> Result<String, StorageError>;
}

/// Filesystem-backed store rooted at a directory.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Default root: `<data dir>/headshot/objects`.
    pub fn default_root() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("headshot")
            .join("objects")
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, key: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(key);
        let safe = !key.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put(
        &self,
        key: &str,
        bytes: &[u8],
        _content_type: &str,
    ) -> Result<String, StorageError> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;
        debug!(path = %path.display(), bytes = bytes.len(), "object written");
        Ok(path.to_string_lossy().into_owned())
    }
}

/// Write generated data-URI images under `<owner>/<millis>_<index>.jpg`.
///
/// URL entries are skipped. Failures are logged; the returned list holds the
/// references that were written.
pub async fn persist_generated(
    store: &dyn ObjectStore,
    owner: &str,
    images: &[String],
) -> Vec<String> {
    let millis = Utc::now().timestamp_millis();
    let mut written = Vec::new();
    for (index, image) in images.iter().enumerate() {
        let Some(body) = image
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(";base64,"))
            .map(|(_, body)| body)
        else {
            continue;
        };
        let bytes = match BASE64.decode(body) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(owner, index, error = %e, "skipping undecodable image");
                continue;
            }
        };
        let key = format!("{owner}/{millis}_{index}.jpg");
        match store.put(&key, &bytes, "image/jpeg").await {
            Ok(reference) => written.push(reference),
            Err(e) => warn!(owner, key, error = %e, "failed to store generated image"),
        }
    }
    written
}
