// Request pipeline module - request context and the transformation orchestrator
//
// fetch → negotiate → inspect → feasibility → density → pixels → encode

pub mod negotiation;

use bytes::Bytes;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::TransformError;
use crate::imaging::{inspect, EncodeOptions, ImageProcessor, OutputFormat, ProcessingPlan};
use crate::metrics::Metrics;
use crate::storage::ObjectStore;
use crate::transform::TransformRequest;

pub use negotiation::negotiate;

/// Per-request state carried through the proxy hooks
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: String,
    started: Instant,
    method: String,
    path: String,
    status: Option<u16>,
    bytes_sent: usize,
}

impl RequestContext {
    /// Create a new RequestContext; generates a unique request ID (UUID v4)
    pub fn new(method: String, path: String) -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            started: Instant::now(),
            method,
            path,
            status: None,
            bytes_sent: 0,
        }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn set_request_line(&mut self, method: &str, path: &str) {
        self.method = method.to_string();
        self.path = path.to_string();
    }

    /// Record the response that was written
    pub fn record_response(&mut self, status: u16, bytes: usize) {
        self.status = Some(status);
        self.bytes_sent = bytes;
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn bytes_sent(&self) -> usize {
        self.bytes_sent
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// A successful transformation
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub body: Bytes,
    pub format: OutputFormat,
}

impl PipelineOutput {
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }
}

/// Orchestrates one transformation request against the object store
#[derive(Clone)]
pub struct Pipeline {
    store: Arc<dyn ObjectStore>,
    processor: ImageProcessor,
}

impl Pipeline {
    pub fn new(store: Arc<dyn ObjectStore>, processor: ImageProcessor) -> Self {
        Self { store, processor }
    }

    pub async fn run(
        &self,
        request: &TransformRequest,
        accept: Option<&str>,
    ) -> Result<PipelineOutput, TransformError> {
        let source = self.store.fetch(&request.source_key).await?;
        Metrics::global().record_source_bytes(source.len());
        debug!(
            key = %request.source_key,
            store = self.store.name(),
            bytes = source.len(),
            "Fetched source"
        );

        let format = negotiate(accept, request.cosmetic.format)?;
        let metadata = inspect(&source)?;

        if format.is_vector() {
            if !metadata.format.is_vector() {
                return Err(TransformError::NotAcceptable(format!(
                    "Cannot convert {} to SVG",
                    metadata.format
                )));
            }
            // Vector to vector is served untouched
            return Ok(PipelineOutput {
                body: source,
                format,
            });
        }

        let density = match (&request.resize, metadata.format.is_vector()) {
            (Some(resize), true) => self.processor.density_for(&metadata, resize)?,
            _ => self.processor.default_density(),
        };

        let cosmetic = &request.cosmetic;
        let plan = ProcessingPlan {
            density,
            resize: request.resize.clone(),
            rotate: cosmetic.rotate.clone(),
            blur: cosmetic.blur,
            format,
            options: EncodeOptions::default()
                .with_quality(cosmetic.quality)
                .with_alpha_quality(cosmetic.alpha_quality)
                .with_progressive(cosmetic.progressive),
        };

        let processor = self.processor.clone();
        let started = Instant::now();
        let encoded = tokio::task::spawn_blocking(move || {
            processor.process(&source, &metadata, &plan)
        })
        .await
        .map_err(|e| TransformError::Internal(format!("Transform task failed: {}", e)))??;

        let elapsed = started.elapsed();
        Metrics::global().record_transform(format.as_str(), elapsed);
        info!(
            filename = %request.filename,
            source_format = %metadata.format,
            format = format.as_str(),
            width = encoded.width,
            height = encoded.height,
            bytes = encoded.data.len(),
            duration_ms = elapsed.as_millis() as u64,
            "Image transformed"
        );

        Ok(PipelineOutput {
            body: Bytes::from(encoded.data),
            format,
        })
    }
}
