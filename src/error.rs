// Error types module

use http::StatusCode;
use thiserror::Error;

use crate::imaging::ImageError;
use crate::storage::StorageError;

/// Outcome of a failed transformation request
///
/// Variants with a known status short-circuit the pipeline and are reported
/// to the client as-is; `Upstream` and `Internal` collapse into a generic 500.
#[derive(Debug, Error)]
pub enum TransformError {
    /// No route shape matched the path
    #[error("Not Found")]
    RouteNotFound,

    /// Request method other than GET
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    /// No acceptable output format, or an impossible conversion
    #[error("{0}")]
    NotAcceptable(String),

    /// The object store has no object under the key
    #[error("Source object not found: {0}")]
    SourceNotFound(String),

    /// Unclassified failure of the object store or the image capability
    #[error("Upstream failure: {0}")]
    Upstream(String),

    /// Broken internal precondition
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TransformError {
    pub fn not_acceptable() -> Self {
        TransformError::NotAcceptable("Not Acceptable".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            TransformError::RouteNotFound | TransformError::SourceNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            TransformError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            TransformError::NotAcceptable(_) => StatusCode::NOT_ACCEPTABLE,
            TransformError::Upstream(_) | TransformError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Short text safe to send to clients; internal detail stays in the logs
    pub fn public_message(&self) -> String {
        match self {
            TransformError::NotAcceptable(message) => message.clone(),
            TransformError::SourceNotFound(_) => "Not Found".to_string(),
            TransformError::Upstream(_) | TransformError::Internal(_) => {
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Whether the failure should be logged as a server-side error
    pub fn is_server_error(&self) -> bool {
        self.status().is_server_error()
    }
}

impl From<StorageError> for TransformError {
    fn from(err: StorageError) -> Self {
        match err {
            // A key that cannot name an object is as absent as a missing one
            StorageError::NotFound(key) | StorageError::InvalidKey(key) => {
                TransformError::SourceNotFound(key)
            }
            other => TransformError::Upstream(other.to_string()),
        }
    }
}

impl From<ImageError> for TransformError {
    fn from(err: ImageError) -> Self {
        match err {
            ImageError::MissingDimension => TransformError::Internal(err.to_string()),
            other => TransformError::Upstream(other.to_string()),
        }
    }
}
