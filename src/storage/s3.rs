//! S3 object store

use std::time::Duration;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::Client;
use bytes::Bytes;
use tracing::{debug, error};

use super::{ObjectStore, StorageError, StorageResult};
use crate::config::StorageConfig;

pub struct S3Store {
    client: Client,
    bucket: String,
    timeout: Duration,
}

impl S3Store {
    pub fn new(client: Client, bucket: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            timeout,
        }
    }

    /// Create a client from configuration
    ///
    /// Static credentials are used when both keys are configured, otherwise
    /// the default AWS provider chain (environment, profile, IMDS) applies.
    pub async fn from_config(config: &StorageConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));

        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        if let (Some(access_key), Some(secret_key)) = (&config.access_key, &config.secret_key) {
            loader = loader.credentials_provider(Credentials::new(
                access_key.as_str(),
                secret_key.as_str(),
                None,
                None,
                "kagami-config",
            ));
        }

        let shared = loader.load().await;
        let s3_config = aws_sdk_s3::config::Builder::from(&shared)
            .force_path_style(config.force_path_style)
            .build();

        debug!(
            bucket = %config.bucket,
            region = %config.region,
            endpoint = ?config.endpoint,
            "S3 client created"
        );

        Self::new(
            Client::from_conf(s3_config),
            config.bucket.clone(),
            Duration::from_secs(config.timeout),
        )
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn fetch(&self, key: &str) -> StorageResult<Bytes> {
        if key.is_empty() {
            return Err(StorageError::InvalidKey("empty key".to_string()));
        }

        debug!(bucket = %self.bucket, key = %key, "Fetching object from S3");

        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send();

        let output = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| {
                StorageError::Backend(format!(
                    "S3 get_object timed out after {}s",
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| {
                let missing = e
                    .as_service_error()
                    .map(|se| se.is_no_such_key())
                    .unwrap_or(false)
                    || e.raw_response()
                        .map(|r| r.status().as_u16() == 404)
                        .unwrap_or(false);
                if missing {
                    StorageError::NotFound(key.to_string())
                } else {
                    error!(bucket = %self.bucket, key = %key, error = %e, "S3 get_object failed");
                    StorageError::Backend(format!("S3 get_object failed: {e}"))
                }
            })?;

        let data = output
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Backend(format!("Failed to read S3 body: {e}")))?
            .into_bytes();

        debug!(key = %key, bytes = data.len(), "Fetched object from S3");
        Ok(data)
    }

    fn name(&self) -> &'static str {
        "s3"
    }
}
