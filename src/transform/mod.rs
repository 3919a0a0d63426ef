//! Transformation requests
//!
//! A `TransformRequest` is what the route table produces for one URL: the
//! object key to fetch, an optional resize descriptor, and the cosmetic
//! parameters parsed from the trailing segment.

pub mod color;
pub mod params;
pub mod resize;

pub use color::{parse_color, DEFAULT_BACKGROUND, DEFAULT_BACKGROUND_STR};
pub use params::{parse_parameters, Blur, CosmeticParameters, Rotation};
pub use resize::{resolve, Anchor, FitMode, Gravity, ResizeCaptures, ResizeDescriptor, Strategy};

/// One fully parsed request, ready for the pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct TransformRequest {
    /// Filename as it appeared in the URL (percent-decoded)
    pub filename: String,
    /// Object-store key derived from the filename
    pub source_key: String,
    /// Absent for the bare passthrough shape
    pub resize: Option<ResizeDescriptor>,
    pub cosmetic: CosmeticParameters,
}
