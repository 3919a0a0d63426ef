// Proxy module - Pingora ProxyHttp implementation
//
// Every request is answered locally from request_filter; nothing is ever
// proxied to an upstream peer.

pub mod response;

use async_trait::async_trait;
use pingora_core::upstreams::peer::HttpPeer;
use pingora_core::Result;
use pingora_proxy::{ProxyHttp, Session};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::TransformError;
use crate::imaging::ImageProcessor;
use crate::metrics::Metrics;
use crate::pipeline::{Pipeline, RequestContext};
use crate::router::Dispatcher;
use crate::storage::{build_store, KeyPattern, ObjectStore};

pub use response::ImageResponse;

/// ImageProxy implements the Pingora ProxyHttp trait
/// Handles routing, content negotiation and image transformation
#[derive(Clone)]
pub struct ImageProxy {
    dispatcher: Dispatcher,
    pipeline: Pipeline,
}

impl ImageProxy {
    pub fn new(dispatcher: Dispatcher, pipeline: Pipeline) -> Self {
        Self {
            dispatcher,
            pipeline,
        }
    }

    /// Wire dispatcher and pipeline around an existing store
    pub fn with_store(config: &Config, store: Arc<dyn ObjectStore>) -> Self {
        let dispatcher = Dispatcher::new(KeyPattern::new(config.storage.key_pattern.clone()));
        let pipeline = Pipeline::new(store, ImageProcessor::new(&config.image));
        Self::new(dispatcher, pipeline)
    }

    /// Build the configured object store and wire everything up
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let store = build_store(&config.storage).await?;
        info!(
            backend = store.name(),
            key_pattern = %config.storage.key_pattern,
            "Object store ready"
        );
        Ok(Self::with_store(config, store))
    }

    /// Answer one request
    pub async fn handle(
        &self,
        method: &str,
        path: &str,
        accept: Option<&str>,
        request_id: &str,
    ) -> ImageResponse {
        match self.transform(method, path, accept).await {
            Ok(response) => response,
            Err(err) => {
                if err.is_server_error() {
                    error!(request_id = %request_id, path = %path, error = %err, "Transformation failed");
                } else {
                    warn!(
                        request_id = %request_id,
                        path = %path,
                        status = err.status().as_u16(),
                        error = %err,
                        "Request rejected"
                    );
                }
                ImageResponse::error(&err)
            }
        }
    }

    async fn transform(
        &self,
        method: &str,
        path: &str,
        accept: Option<&str>,
    ) -> std::result::Result<ImageResponse, TransformError> {
        // Method check precedes route matching
        if method != "GET" {
            return Err(TransformError::MethodNotAllowed);
        }
        let request = self.dispatcher.dispatch(path)?;
        let output = self.pipeline.run(&request, accept).await?;
        Ok(ImageResponse::image(output))
    }
}

#[async_trait]
impl ProxyHttp for ImageProxy {
    type CTX = RequestContext;

    fn new_ctx(&self) -> Self::CTX {
        RequestContext::new("GET".to_string(), "/".to_string())
    }

    async fn upstream_peer(
        &self,
        _session: &mut Session,
        _ctx: &mut Self::CTX,
    ) -> Result<Box<HttpPeer>> {
        // request_filter always answers, so there is never an upstream
        Err(pingora_core::Error::explain(
            pingora_core::ErrorType::InternalError,
            "Image service has no upstream peer",
        ))
    }

    async fn request_filter(&self, session: &mut Session, ctx: &mut Self::CTX) -> Result<bool> {
        let req = session.req_header();
        let method = req.method.to_string();
        let path = req.uri.path().to_string();
        let accept = req
            .headers
            .get(http::header::ACCEPT)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        ctx.set_request_line(&method, &path);

        let response = self
            .handle(&method, &path, accept.as_deref(), ctx.request_id())
            .await;

        ctx.record_response(response.status, response.body.len());
        response.write_to(session).await?;
        Ok(true)
    }

    async fn logging(
        &self,
        session: &mut Session,
        e: Option<&pingora_core::Error>,
        ctx: &mut Self::CTX,
    ) {
        let status = ctx
            .status()
            .or_else(|| session.response_written().map(|resp| resp.status.as_u16()))
            .unwrap_or(500);

        Metrics::global().record_request(status);

        let error = e.map(|err| err.to_string());
        info!(
            request_id = %ctx.request_id(),
            method = %ctx.method(),
            path = %ctx.path(),
            status = status,
            bytes = ctx.bytes_sent(),
            duration_ms = ctx.elapsed().as_millis() as u64,
            error = error.as_deref(),
            "Request completed"
        );
    }
}
