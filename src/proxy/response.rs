//! Responses produced by the image handler.
//!
//! Handlers return `ImageResponse` instead of writing directly to the
//! session, which keeps them testable; the caller writes it out.

use bytes::Bytes;
use pingora_http::ResponseHeader;
use pingora_proxy::Session;

use crate::constants::CACHE_CONTROL_IMMUTABLE;
use crate::error::TransformError;
use crate::pipeline::PipelineOutput;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

#[derive(Debug, Clone)]
pub struct ImageResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Bytes,
    /// Extra headers beyond Content-Type and Content-Length
    pub headers: Vec<(&'static str, &'static str)>,
}

impl ImageResponse {
    /// 200 with the transformed image
    pub fn image(output: PipelineOutput) -> Self {
        Self {
            status: 200,
            content_type: output.content_type(),
            body: output.body,
            headers: vec![("Cache-Control", CACHE_CONTROL_IMMUTABLE), ("Vary", "Accept")],
        }
    }

    /// Short plain-text error; server-side detail is never exposed
    pub fn error(err: &TransformError) -> Self {
        let mut headers = Vec::new();
        if matches!(err, TransformError::MethodNotAllowed) {
            headers.push(("Allow", "GET"));
        }
        Self {
            status: err.status().as_u16(),
            content_type: TEXT_PLAIN,
            body: Bytes::from(err.public_message()),
            headers,
        }
    }

    pub fn header(&self, name: &str) -> Option<&'static str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| *value)
    }

    pub fn to_header(&self) -> pingora_core::Result<ResponseHeader> {
        let mut header = ResponseHeader::build(self.status, Some(3 + self.headers.len()))?;
        header.insert_header("Content-Type", self.content_type)?;
        header.insert_header("Content-Length", self.body.len().to_string())?;
        for (name, value) in &self.headers {
            header.insert_header(*name, *value)?;
        }
        Ok(header)
    }

    /// Write status, headers and body, ending the stream
    pub async fn write_to(self, session: &mut Session) -> pingora_core::Result<()> {
        let header = self.to_header()?;
        session
            .write_response_header(Box::new(header), false)
            .await?;
        session.write_response_body(Some(self.body), true).await?;
        Ok(())
    }
}
