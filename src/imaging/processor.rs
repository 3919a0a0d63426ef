//! Image processing implementation
//!
//! Runs the fixed operation chain on one source:
//! decode (rasterizing vectors) → resize → rotate → blur → encode.
//! Everything here is CPU bound and synchronous; callers on an async runtime
//! should run it on the blocking pool.

use image::{DynamicImage, ImageReader};
use std::io::Cursor;
use tracing::debug;

use super::effects;
use super::encoder::{encode, EncodeOptions, EncodedImage};
use super::error::ImageError;
use super::format::OutputFormat;
use super::resize;
use super::svg;
use super::ImageMetadata;
use crate::config::ImageConfig;
use crate::constants::DEFAULT_DENSITY;
use crate::transform::{parse_color, Blur, ResizeDescriptor, Rotation, DEFAULT_BACKGROUND};

/// Everything needed to turn source bytes into the response body
#[derive(Debug, Clone)]
pub struct ProcessingPlan {
    /// Rasterization density, only read for vector sources
    pub density: f64,
    pub resize: Option<ResizeDescriptor>,
    pub rotate: Option<Rotation>,
    pub blur: Option<Blur>,
    pub format: OutputFormat,
    pub options: EncodeOptions,
}

/// Stateless processor carrying the configured limits
#[derive(Debug, Clone)]
pub struct ImageProcessor {
    max_pixels: u64,
    default_density: f64,
    max_density: f64,
    auto_blur_sigma: f32,
}

impl ImageProcessor {
    pub fn new(config: &ImageConfig) -> Self {
        Self {
            max_pixels: config.max_pixels,
            default_density: config.default_density,
            max_density: config.max_density,
            auto_blur_sigma: config.auto_blur_sigma,
        }
    }

    /// Density used for vector sources when no resize is requested
    pub fn default_density(&self) -> f64 {
        self.default_density
    }

    /// Density at which a vector source must be rasterized so that the
    /// resize step downsamples instead of upsampling
    ///
    /// Computed from the CSS reference density, the same base `decode` uses to
    /// turn a density into pixels, so the raster lands on the requested size.
    pub fn density_for(
        &self,
        metadata: &ImageMetadata,
        resize: &ResizeDescriptor,
    ) -> Result<f64, ImageError> {
        let density = match (resize.width, resize.height) {
            (Some(width), _) => {
                DEFAULT_DENSITY * (width as f64 / metadata.width as f64)
            }
            (None, Some(height)) => {
                DEFAULT_DENSITY * (height as f64 / metadata.height as f64)
            }
            (None, None) => return Err(ImageError::MissingDimension),
        };
        Ok(density.min(self.max_density))
    }

    fn check_budget(&self, width: u32, height: u32) -> Result<(), ImageError> {
        let pixels = width as u64 * height as u64;
        if pixels > self.max_pixels {
            return Err(ImageError::image_bomb(width, height, self.max_pixels));
        }
        Ok(())
    }

    /// Decode a source into pixels, enforcing the pixel budget first
    pub fn decode(
        &self,
        data: &[u8],
        metadata: &ImageMetadata,
        density: f64,
    ) -> Result<DynamicImage, ImageError> {
        if metadata.format.is_vector() {
            let scale = density / DEFAULT_DENSITY;
            self.check_budget(
                (metadata.width as f64 * scale).round() as u32,
                (metadata.height as f64 * scale).round() as u32,
            )?;
            return svg::rasterize(data, density).map(DynamicImage::ImageRgba8);
        }

        self.check_budget(metadata.width, metadata.height)?;
        ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| ImageError::decode_failed(e.to_string()))?
            .decode()
            .map_err(|e| ImageError::decode_failed(e.to_string()))
    }

    /// Run the full operation chain
    pub fn process(
        &self,
        data: &[u8],
        metadata: &ImageMetadata,
        plan: &ProcessingPlan,
    ) -> Result<EncodedImage, ImageError> {
        let mut image = self.decode(data, metadata, plan.density)?;
        debug!(
            source_format = %metadata.format,
            width = image.width(),
            height = image.height(),
            "Decoded source"
        );

        if let Some(descriptor) = &plan.resize {
            image = resize::apply(image, descriptor)?;
        }

        if let Some(rotation) = &plan.rotate {
            let background = rotation
                .background
                .as_deref()
                .and_then(parse_color)
                .unwrap_or(DEFAULT_BACKGROUND);
            image = effects::rotate(image, rotation.angle, background);
        }

        if let Some(blur) = plan.blur {
            let sigma = match blur {
                Blur::Auto => self.auto_blur_sigma,
                Blur::Sigma(sigma) => sigma,
            };
            image = effects::blur(image, sigma);
        }

        encode(&image, plan.format, plan.options)
    }
}
