// Configuration module

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::{
    DEFAULT_LOG_LEVEL, DEFAULT_METRICS_ADDRESS, FILENAME_PLACEHOLDER, MAX_BLUR_SIGMA,
    MIN_BLUR_SIGMA,
};

pub mod image;
pub mod server;
pub mod storage;

pub use self::image::ImageConfig;
pub use server::ServerConfig;
pub use storage::{StorageBackendKind, StorageConfig};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub image: ImageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<MetricsConfig>,
}

/// Log line format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Tracing filter directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_metrics_address() -> String {
    DEFAULT_METRICS_ADDRESS.to_string()
}

/// Prometheus listener, kept off the image URL space
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_address")]
    pub address: String,
}

impl Config {
    pub fn from_yaml_with_env(yaml: &str) -> Result<Self, String> {
        // Replace ${VAR_NAME} with environment variable values
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").map_err(|e| e.to_string())?;

        // First, check that all referenced environment variables exist
        for caps in re.captures_iter(yaml) {
            let var_name = &caps[1];
            std::env::var(var_name).map_err(|_| {
                format!(
                    "Environment variable '{}' is referenced but not set",
                    var_name
                )
            })?;
        }

        let substituted = re.replace_all(yaml, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_default()
        });

        serde_yaml::from_str(&substituted).map_err(|e| e.to_string())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        Self::from_yaml_with_env(&yaml)
    }

    /// Build the configuration from the process environment
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup
    ///
    /// Recognised variables: `AWS_REGION`, `S3_IMAGE_BUCKET` (both required),
    /// `S3_IMAGE_KEY_PATTERN`, `S3_ENDPOINT`, `LISTEN_ADDRESS`, `PORT`,
    /// `LOG_FORMAT`, `METRICS_ADDRESS`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.is_empty());

        let region = var("AWS_REGION").ok_or("Please set up AWS_REGION")?;
        let bucket = var("S3_IMAGE_BUCKET").ok_or("Please set up S3_IMAGE_BUCKET")?;

        let mut storage = StorageConfig {
            region,
            bucket,
            ..StorageConfig::default()
        };
        if let Some(pattern) = var("S3_IMAGE_KEY_PATTERN") {
            storage.key_pattern = pattern;
        }
        if let Some(endpoint) = var("S3_ENDPOINT") {
            storage.endpoint = Some(endpoint);
            storage.force_path_style = true;
        }

        let mut server = ServerConfig::default();
        if let Some(address) = var("LISTEN_ADDRESS") {
            server.address = address;
        }
        if let Some(port) = var("PORT") {
            server.port = port
                .parse()
                .map_err(|_| format!("Invalid PORT value '{}'", port))?;
        }

        let mut logging = LoggingConfig::default();
        if let Some(format) = var("LOG_FORMAT") {
            logging.format = match format.as_str() {
                "json" => LogFormat::Json,
                "pretty" => LogFormat::Pretty,
                other => return Err(format!("Invalid LOG_FORMAT value '{}'", other)),
            };
        }

        Ok(Config {
            server,
            storage,
            image: ImageConfig::default(),
            logging,
            metrics: var("METRICS_ADDRESS").map(|address| MetricsConfig { address }),
        })
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("Server port cannot be 0".to_string());
        }
        if self.server.threads == 0 {
            return Err("Server threads must be at least 1".to_string());
        }

        match self.storage.backend {
            StorageBackendKind::S3 => {
                if self.storage.bucket.is_empty() {
                    return Err("Storage bucket cannot be empty".to_string());
                }
                if self.storage.region.is_empty() {
                    return Err("Storage region cannot be empty".to_string());
                }
            }
            StorageBackendKind::Local => {
                let empty = self
                    .storage
                    .root
                    .as_ref()
                    .map_or(true, |root| root.as_os_str().is_empty());
                if empty {
                    return Err("Local storage requires a root directory".to_string());
                }
            }
        }

        if !self.storage.key_pattern.contains(FILENAME_PLACEHOLDER) {
            return Err(format!(
                "Key pattern '{}' must contain the {} placeholder",
                self.storage.key_pattern, FILENAME_PLACEHOLDER
            ));
        }

        if self.storage.timeout == 0 {
            return Err("Storage timeout must be greater than 0".to_string());
        }

        let image = &self.image;
        if image.max_pixels == 0 {
            return Err("image.max_pixels must be greater than 0".to_string());
        }
        if image.default_density <= 0.0 {
            return Err("image.default_density must be greater than 0".to_string());
        }
        if image.max_density <= 0.0 {
            return Err("image.max_density must be greater than 0".to_string());
        }
        if !(MIN_BLUR_SIGMA..=MAX_BLUR_SIGMA).contains(&image.auto_blur_sigma) {
            return Err(format!(
                "image.auto_blur_sigma must be between {} and {}",
                MIN_BLUR_SIGMA, MAX_BLUR_SIGMA
            ));
        }

        if let Some(metrics) = &self.metrics {
            if metrics.address == self.server.listen_addr() {
                return Err("Metrics address must differ from the server address".to_string());
            }
        }

        Ok(())
    }
}
