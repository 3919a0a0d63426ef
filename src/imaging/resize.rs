//! Fit-mode resizing
//!
//! `plan` is pure geometry: it turns source dimensions and a descriptor into
//! the size to scale to plus whatever crop or letterbox follows. `apply`
//! executes a plan with fast_image_resize.

use std::num::NonZeroU32;

use fast_image_resize::{FilterType, Image, PixelType, ResizeAlg, Resizer};
use image::{imageops, DynamicImage, Rgba, RgbaImage};

use super::error::ImageError;
use super::smart_crop;
use crate::transform::{parse_color, Anchor, FitMode, Gravity, ResizeDescriptor, DEFAULT_BACKGROUND};

/// What happens after scaling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finish {
    None,
    /// Cut a `width` x `height` window out of the scaled image
    Crop { width: u32, height: u32 },
    /// Place the scaled image on a `width` x `height` canvas
    Letterbox { width: u32, height: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizePlan {
    pub scale_width: u32,
    pub scale_height: u32,
    pub finish: Finish,
}

impl ResizePlan {
    fn identity(width: u32, height: u32) -> Self {
        Self {
            scale_width: width,
            scale_height: height,
            finish: Finish::None,
        }
    }

    /// Dimensions of the image the plan produces
    pub fn output_size(&self) -> (u32, u32) {
        match self.finish {
            Finish::None => (self.scale_width, self.scale_height),
            Finish::Crop { width, height } | Finish::Letterbox { width, height } => {
                (width, height)
            }
        }
    }
}

fn scaled(value: u32, factor: f64) -> u32 {
    ((value as f64 * factor).round() as u32).max(1)
}

/// Compute the resize geometry for a source of `src_w` x `src_h`
pub fn plan(src_w: u32, src_h: u32, descriptor: &ResizeDescriptor) -> Result<ResizePlan, ImageError> {
    let (target_w, target_h) = match (descriptor.width, descriptor.height) {
        (None, None) => return Err(ImageError::MissingDimension),
        // A single dimension always scales proportionally
        (Some(w), None) => {
            if !descriptor.allow_enlargement && w > src_w {
                return Ok(ResizePlan::identity(src_w, src_h));
            }
            let factor = w as f64 / src_w as f64;
            return Ok(ResizePlan {
                scale_width: w,
                scale_height: scaled(src_h, factor),
                finish: Finish::None,
            });
        }
        (None, Some(h)) => {
            if !descriptor.allow_enlargement && h > src_h {
                return Ok(ResizePlan::identity(src_w, src_h));
            }
            let factor = h as f64 / src_h as f64;
            return Ok(ResizePlan {
                scale_width: scaled(src_w, factor),
                scale_height: h,
                finish: Finish::None,
            });
        }
        (Some(w), Some(h)) => (w, h),
    };

    let ratio_w = target_w as f64 / src_w as f64;
    let ratio_h = target_h as f64 / src_h as f64;

    let (factor, finish) = match descriptor.fit {
        FitMode::Fill => {
            if !descriptor.allow_enlargement && (target_w > src_w || target_h > src_h) {
                return Ok(ResizePlan::identity(src_w, src_h));
            }
            return Ok(ResizePlan {
                scale_width: target_w,
                scale_height: target_h,
                finish: Finish::None,
            });
        }
        FitMode::Cover => (
            ratio_w.max(ratio_h),
            Finish::Crop {
                width: target_w,
                height: target_h,
            },
        ),
        FitMode::Contain => (
            ratio_w.min(ratio_h),
            Finish::Letterbox {
                width: target_w,
                height: target_h,
            },
        ),
        FitMode::Inside => (ratio_w.min(ratio_h), Finish::None),
        FitMode::Outside => (ratio_w.max(ratio_h), Finish::None),
    };

    if !descriptor.allow_enlargement && factor > 1.0 {
        return Ok(ResizePlan::identity(src_w, src_h));
    }

    let (mut scale_width, mut scale_height) = (scaled(src_w, factor), scaled(src_h, factor));
    match finish {
        // Rounding must never leave the crop window larger than the image
        Finish::Crop { width, height } => {
            scale_width = scale_width.max(width);
            scale_height = scale_height.max(height);
        }
        Finish::Letterbox { width, height } => {
            scale_width = scale_width.min(width);
            scale_height = scale_height.min(height);
        }
        Finish::None => {}
    }

    Ok(ResizePlan {
        scale_width,
        scale_height,
        finish,
    })
}

/// Offset of a `inner` span inside an `outer` span for a placement factor
fn offset(outer: u32, inner: u32, factor: f64) -> u32 {
    (outer.saturating_sub(inner) as f64 * factor).round() as u32
}

fn gravity_of(anchor: &Anchor) -> Gravity {
    match anchor {
        Anchor::Gravity(gravity) => *gravity,
        Anchor::Strategy(_) | Anchor::Literal(_) => Gravity::Center,
    }
}

/// Resize an image according to the descriptor
pub fn apply(image: DynamicImage, descriptor: &ResizeDescriptor) -> Result<DynamicImage, ImageError> {
    let plan = plan(image.width(), image.height(), descriptor)?;

    let scaled = if (plan.scale_width, plan.scale_height) == (image.width(), image.height()) {
        image.to_rgba8()
    } else {
        resample(&image, plan.scale_width, plan.scale_height)?
    };

    let finished = match plan.finish {
        Finish::None => scaled,
        Finish::Crop { width, height } => {
            if (width, height) == scaled.dimensions() {
                scaled
            } else {
                let (x, y) = match &descriptor.anchor {
                    Anchor::Strategy(strategy) => {
                        smart_crop::crop_origin(&scaled, width, height, *strategy)
                    }
                    other => {
                        let (fx, fy) = gravity_of(other).factors();
                        (
                            offset(scaled.width(), width, fx),
                            offset(scaled.height(), height, fy),
                        )
                    }
                };
                imageops::crop_imm(&scaled, x, y, width, height).to_image()
            }
        }
        Finish::Letterbox { width, height } => {
            let background = parse_color(&descriptor.background).unwrap_or(DEFAULT_BACKGROUND);
            letterbox(&scaled, width, height, background, gravity_of(&descriptor.anchor))
        }
    };

    Ok(DynamicImage::ImageRgba8(finished))
}

fn letterbox(
    image: &RgbaImage,
    width: u32,
    height: u32,
    background: Rgba<u8>,
    gravity: Gravity,
) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(width, height, background);
    let (fx, fy) = gravity.factors();
    let x = offset(width, image.width(), fx);
    let y = offset(height, image.height(), fy);
    imageops::overlay(&mut canvas, image, x as i64, y as i64);
    canvas
}

/// Resample with fast-image-resize using the Lanczos3 filter
fn resample(image: &DynamicImage, target_w: u32, target_h: u32) -> Result<RgbaImage, ImageError> {
    let src_width = NonZeroU32::new(image.width())
        .ok_or_else(|| ImageError::resize_failed("Source width is 0"))?;
    let src_height = NonZeroU32::new(image.height())
        .ok_or_else(|| ImageError::resize_failed("Source height is 0"))?;
    let dst_width =
        NonZeroU32::new(target_w).ok_or_else(|| ImageError::resize_failed("Target width is 0"))?;
    let dst_height =
        NonZeroU32::new(target_h).ok_or_else(|| ImageError::resize_failed("Target height is 0"))?;

    let src_image = Image::from_vec_u8(
        src_width,
        src_height,
        image.to_rgba8().into_raw(),
        PixelType::U8x4,
    )
    .map_err(|e| ImageError::resize_failed(format!("Failed to create source image: {:?}", e)))?;

    let mut dst_image = Image::new(dst_width, dst_height, PixelType::U8x4);

    let mut resizer = Resizer::new(ResizeAlg::Convolution(FilterType::Lanczos3));
    resizer
        .resize(&src_image.view(), &mut dst_image.view_mut())
        .map_err(|e| ImageError::resize_failed(format!("Resize operation failed: {:?}", e)))?;

    RgbaImage::from_raw(target_w, target_h, dst_image.into_vec())
        .ok_or_else(|| ImageError::resize_failed("Failed to create output image buffer"))
}
