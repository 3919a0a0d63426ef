//! Image encoder abstraction
//!
//! One encoder per raster output format, selected through `EncoderFactory`.
//! Each encoder reads only the options that apply to its format; the rest
//! are ignored rather than rejected.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat};

use super::error::ImageError;
use super::format::OutputFormat;
use crate::constants::{DEFAULT_ALPHA_QUALITY, DEFAULT_QUALITY};

/// Output tuning collected from the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Quality 1-100 (jpeg, webp)
    pub quality: u8,
    /// Alpha channel quality 1-100 (webp)
    pub alpha_quality: u8,
    /// Progressive jpeg scans / interlaced png
    pub progressive: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            alpha_quality: DEFAULT_ALPHA_QUALITY,
            progressive: false,
        }
    }
}

impl EncodeOptions {
    pub fn with_quality(mut self, quality: Option<u8>) -> Self {
        if let Some(q) = quality {
            self.quality = q.clamp(1, 100);
        }
        self
    }

    pub fn with_alpha_quality(mut self, alpha_quality: Option<u8>) -> Self {
        if let Some(q) = alpha_quality {
            self.alpha_quality = q.clamp(1, 100);
        }
        self
    }

    pub fn with_progressive(mut self, progressive: Option<bool>) -> Self {
        self.progressive = progressive.unwrap_or(self.progressive);
        self
    }
}

/// Result of encoding an image
#[derive(Debug)]
pub struct EncodedImage {
    pub data: Vec<u8>,
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
}

impl EncodedImage {
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }
}

/// Trait for image encoders
pub trait ImageEncoder: Send + Sync {
    fn encode(&self, image: &DynamicImage, options: EncodeOptions)
        -> Result<EncodedImage, ImageError>;
}

/// JPEG encoder backed by mozjpeg
pub struct JpegEncoder;

impl ImageEncoder for JpegEncoder {
    fn encode(
        &self,
        image: &DynamicImage,
        options: EncodeOptions,
    ) -> Result<EncodedImage, ImageError> {
        // JPEG has no alpha channel
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();

        let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
        comp.set_size(width as usize, height as usize);
        comp.set_quality(options.quality as f32);
        if options.progressive {
            comp.set_progressive_mode();
        }
        comp.set_optimize_coding(true);

        let jpeg_err = |e: std::io::Error| ImageError::encode_failed("jpeg", e.to_string());
        let mut started = comp.start_compress(Vec::new()).map_err(jpeg_err)?;
        started.write_scanlines(rgb.as_raw()).map_err(jpeg_err)?;
        let data = started.finish().map_err(jpeg_err)?;

        Ok(EncodedImage {
            data,
            format: OutputFormat::Jpeg,
            width,
            height,
        })
    }
}

/// PNG encoder: `image` writes the stream, oxipng recompresses it
pub struct PngEncoder;

impl ImageEncoder for PngEncoder {
    fn encode(
        &self,
        image: &DynamicImage,
        options: EncodeOptions,
    ) -> Result<EncodedImage, ImageError> {
        let mut output = Cursor::new(Vec::new());
        image
            .write_to(&mut output, ImageFormat::Png)
            .map_err(|e| ImageError::encode_failed("png", e.to_string()))?;

        let mut oxi = oxipng::Options::default();
        if options.progressive {
            oxi.interlace = Some(oxipng::Interlacing::Adam7);
        }
        let data = oxipng::optimize_from_memory(&output.into_inner(), &oxi)
            .map_err(|e| ImageError::encode_failed("png", e.to_string()))?;

        Ok(EncodedImage {
            data,
            format: OutputFormat::Png,
            width: image.width(),
            height: image.height(),
        })
    }
}

/// Lossy WebP encoder backed by libwebp
pub struct WebPEncoder;

impl ImageEncoder for WebPEncoder {
    fn encode(
        &self,
        image: &DynamicImage,
        options: EncodeOptions,
    ) -> Result<EncodedImage, ImageError> {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();

        let mut config = webp::WebPConfig::new()
            .map_err(|_| ImageError::encode_failed("webp", "invalid encoder configuration"))?;
        config.quality = options.quality as f32;
        config.alpha_quality = options.alpha_quality as i32;

        let encoded = webp::Encoder::from_rgba(rgba.as_raw(), width, height)
            .encode_advanced(&config)
            .map_err(|e| ImageError::encode_failed("webp", format!("{:?}", e)))?;

        Ok(EncodedImage {
            data: encoded.to_vec(),
            format: OutputFormat::WebP,
            width,
            height,
        })
    }
}

/// Factory for creating encoders based on output format
pub struct EncoderFactory;

impl EncoderFactory {
    /// Vector output is never synthesized, so `Svg` has no encoder
    pub fn create(format: OutputFormat) -> Result<Box<dyn ImageEncoder>, ImageError> {
        match format {
            OutputFormat::Jpeg => Ok(Box::new(JpegEncoder)),
            OutputFormat::Png => Ok(Box::new(PngEncoder)),
            OutputFormat::WebP => Ok(Box::new(WebPEncoder)),
            OutputFormat::Svg => Err(ImageError::unsupported_format("svg")),
        }
    }
}

/// Encode an image to the given format
pub fn encode(
    image: &DynamicImage,
    format: OutputFormat,
    options: EncodeOptions,
) -> Result<EncodedImage, ImageError> {
    EncoderFactory::create(format)?.encode(image, options)
}
