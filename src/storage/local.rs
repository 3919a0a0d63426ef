//! Filesystem object store

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::debug;

use super::{ObjectStore, StorageError, StorageResult};

/// Serves objects from a directory, the key being a relative path
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map a key to a path under the root, rejecting traversal
    fn resolve(&self, key: &str) -> StorageResult<PathBuf> {
        let relative = Path::new(key.trim_start_matches('/'));
        if key.is_empty()
            || relative
                .components()
                .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ObjectStore for LocalStore {
    async fn fetch(&self, key: &str) -> StorageResult<Bytes> {
        let path = self.resolve(key)?;
        debug!(path = %path.display(), "Reading object from disk");

        match fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotFound(key.to_string())),
            Err(e) => {
                // A directory under the key is not an object
                let is_dir = fs::metadata(&path)
                    .await
                    .map(|meta| meta.is_dir())
                    .unwrap_or(false);
                if is_dir {
                    Err(StorageError::NotFound(key.to_string()))
                } else {
                    Err(StorageError::Io(e))
                }
            }
        }
    }

    fn name(&self) -> &'static str {
        "local"
    }
}
