//! SVG sizing and rasterization

use image::RgbaImage;
use resvg::tiny_skia;

use super::error::ImageError;
use crate::constants::DEFAULT_DENSITY;

fn parse(data: &[u8]) -> Result<usvg::Tree, ImageError> {
    usvg::Tree::from_data(data, &usvg::Options::default())
        .map_err(|e| ImageError::decode_failed(format!("Invalid SVG: {e}")))
}

/// Intrinsic size in CSS pixels, rounded up
pub fn intrinsic_size(data: &[u8]) -> Result<(u32, u32), ImageError> {
    let tree = parse(data)?;
    let size = tree.size();
    Ok((
        (size.width().ceil() as u32).max(1),
        (size.height().ceil() as u32).max(1),
    ))
}

/// Rasterize at `density` (96 renders at intrinsic size)
pub fn rasterize(data: &[u8], density: f64) -> Result<RgbaImage, ImageError> {
    let tree = parse(data)?;
    let scale = (density / DEFAULT_DENSITY) as f32;
    let size = tree.size();
    let width = ((size.width() * scale).round() as u32).max(1);
    let height = ((size.height() * scale).round() as u32).max(1);

    let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
        ImageError::decode_failed(format!("Cannot allocate {width}x{height} canvas"))
    })?;
    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );

    // tiny-skia stores premultiplied alpha
    let mut rgba = Vec::with_capacity((width * height * 4) as usize);
    for pixel in pixmap.pixels() {
        let color = pixel.demultiply();
        rgba.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
    }

    RgbaImage::from_raw(width, height, rgba)
        .ok_or_else(|| ImageError::decode_failed("Rasterized buffer size mismatch"))
}
