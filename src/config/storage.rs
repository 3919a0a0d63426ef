//! Object store configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::{DEFAULT_KEY_PATTERN, DEFAULT_REGION, DEFAULT_S3_TIMEOUT_SECS};

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

fn default_key_pattern() -> String {
    DEFAULT_KEY_PATTERN.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_S3_TIMEOUT_SECS
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackendKind {
    #[default]
    S3,
    Local,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackendKind,
    #[serde(default)]
    pub bucket: String,
    #[serde(default = "default_region")]
    pub region: String,
    /// S3-compatible endpoint (MinIO, LocalStack, R2)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
    /// Path-style addressing, needed by most S3-compatible endpoints
    #[serde(default)]
    pub force_path_style: bool,
    /// Template for object keys, `:filename` is the requested filename
    #[serde(default = "default_key_pattern")]
    pub key_pattern: String,
    /// Root directory for the local backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    /// Timeout for a single fetch in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackendKind::default(),
            bucket: String::new(),
            region: default_region(),
            endpoint: None,
            access_key: None,
            secret_key: None,
            force_path_style: false,
            key_pattern: default_key_pattern(),
            root: None,
            timeout: default_timeout(),
        }
    }
}
