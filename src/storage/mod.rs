//! Object storage abstraction
//!
//! The pipeline only needs one capability from storage: fetch the complete
//! bytes stored under a key. `S3Store` talks to S3 (or any S3-compatible
//! endpoint), `LocalStore` serves a directory tree for development.

pub mod local;
pub mod s3;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::config::{StorageBackendKind, StorageConfig};
use crate::constants::FILENAME_PLACEHOLDER;

pub use local::LocalStore;
pub use s3::S3Store;

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

/// Read-only view of an object store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch the full object stored under `key`
    async fn fetch(&self, key: &str) -> StorageResult<Bytes>;

    /// Short backend name used in logs
    fn name(&self) -> &'static str;
}

/// Template mapping a URL filename to an object key
///
/// Every occurrence of `:filename` is replaced by the filename, e.g. the
/// pattern `images/:filename` maps `photo.jpg` to `images/photo.jpg`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPattern(String);

impl KeyPattern {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self(pattern.into())
    }

    pub fn key_for(&self, filename: &str) -> String {
        self.0.replace(FILENAME_PLACEHOLDER, filename)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for KeyPattern {
    fn default() -> Self {
        Self(FILENAME_PLACEHOLDER.to_string())
    }
}

/// Build the configured store
pub async fn build_store(config: &StorageConfig) -> StorageResult<Arc<dyn ObjectStore>> {
    match config.backend {
        StorageBackendKind::S3 => Ok(Arc::new(S3Store::from_config(config).await)),
        StorageBackendKind::Local => {
            let root = config.root.clone().ok_or_else(|| {
                StorageError::Backend("local storage requires a root directory".to_string())
            })?;
            Ok(Arc::new(LocalStore::new(root)))
        }
    }
}
