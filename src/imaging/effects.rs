//! Rotation and blur

use image::{imageops, DynamicImage, Rgba, RgbaImage};
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};

/// Rotate clockwise by `angle` degrees
///
/// Quarter turns are lossless. Any other angle grows the canvas to hold the
/// whole rotated image and paints the uncovered corners with `background`.
pub fn rotate(image: DynamicImage, angle: i32, background: Rgba<u8>) -> DynamicImage {
    match angle.rem_euclid(360) {
        0 => image,
        90 => image.rotate90(),
        180 => image.rotate180(),
        270 => image.rotate270(),
        degrees => {
            let source = image.to_rgba8();
            let (width, height) = source.dimensions();
            let theta = (degrees as f32).to_radians();
            let (sin, cos) = (theta.sin().abs(), theta.cos().abs());
            let out_w = ((width as f32 * cos + height as f32 * sin).ceil() as u32).max(1);
            let out_h = ((width as f32 * sin + height as f32 * cos).ceil() as u32).max(1);

            // The working canvas must hold both the source and the rotated bounds
            let work_w = out_w.max(width);
            let work_h = out_h.max(height);
            let mut canvas = RgbaImage::from_pixel(work_w, work_h, background);
            imageops::replace(
                &mut canvas,
                &source,
                ((work_w - width) / 2) as i64,
                ((work_h - height) / 2) as i64,
            );

            let rotated = rotate_about_center(&canvas, theta, Interpolation::Bilinear, background);
            let cropped = imageops::crop_imm(
                &rotated,
                (work_w - out_w) / 2,
                (work_h - out_h) / 2,
                out_w,
                out_h,
            )
            .to_image();
            DynamicImage::ImageRgba8(cropped)
        }
    }
}

/// Gaussian blur with the given sigma
pub fn blur(image: DynamicImage, sigma: f32) -> DynamicImage {
    image.blur(sigma)
}
