//! Image capability
//!
//! Everything the pipeline asks of an image library: sniff and measure a
//! source, rasterize vectors at a density, resize by fit mode, rotate, blur
//! and encode.

pub mod effects;
pub mod encoder;
pub mod error;
pub mod format;
pub mod processor;
pub mod resize;
pub mod smart_crop;
pub mod svg;

pub use encoder::{encode, EncodeOptions, EncodedImage, EncoderFactory, ImageEncoder};
pub use error::ImageError;
pub use format::{OutputFormat, SourceFormat};
pub use processor::{ImageProcessor, ProcessingPlan};

use std::io::Cursor;

use image::ImageReader;

/// Intrinsic properties of a stored source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageMetadata {
    pub format: SourceFormat,
    pub width: u32,
    pub height: u32,
}

/// Read the format and dimensions of a source without decoding pixels
pub fn inspect(data: &[u8]) -> Result<ImageMetadata, ImageError> {
    let format = SourceFormat::detect(data)
        .ok_or_else(|| ImageError::unsupported_format("unknown"))?;

    let (width, height) = if format.is_vector() {
        svg::intrinsic_size(data)?
    } else {
        ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| ImageError::decode_failed(e.to_string()))?
            .into_dimensions()
            .map_err(|e| ImageError::decode_failed(e.to_string()))?
    };

    Ok(ImageMetadata {
        format,
        width,
        height,
    })
}
