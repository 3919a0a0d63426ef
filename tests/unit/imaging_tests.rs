// Image capability tests: inspection, resize planning, encoding

use image::{DynamicImage, GenericImageView, ImageFormat, Rgba, RgbaImage};
use kagami::config::ImageConfig;
use kagami::imaging::resize::{plan, Finish};
use kagami::imaging::{
    encode, inspect, EncodeOptions, ImageError, ImageProcessor, OutputFormat, ProcessingPlan,
    SourceFormat,
};
use kagami::transform::{Anchor, FitMode, ResizeDescriptor, Rotation};
use std::io::Cursor;

const SVG: &[u8] = br##"<svg xmlns="http://www.w3.org/2000/svg" width="32" height="16"><rect width="32" height="16" fill="#0000ff"/></svg>"##;

fn png(width: u32, height: u32) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([0, 0, 255, 255])))
        .write_to(&mut buffer, ImageFormat::Png)
        .unwrap();
    buffer.into_inner()
}

fn descriptor(fit: FitMode, width: Option<u32>, height: Option<u32>) -> ResizeDescriptor {
    ResizeDescriptor {
        fit,
        width,
        height,
        anchor: Anchor::default(),
        background: "#ffffff".to_string(),
        allow_enlargement: true,
    }
}

#[test]
fn test_inspect_raster_and_vector() {
    let metadata = inspect(&png(30, 20)).unwrap();
    assert_eq!(metadata.format, SourceFormat::Png);
    assert_eq!((metadata.width, metadata.height), (30, 20));

    let metadata = inspect(SVG).unwrap();
    assert_eq!(metadata.format, SourceFormat::Svg);
    assert_eq!((metadata.width, metadata.height), (32, 16));
}

#[test]
fn test_inspect_rejects_unknown_bytes() {
    assert!(inspect(b"definitely not an image").is_err());
}

#[test]
fn test_plan_fit_modes() {
    let cover = plan(400, 200, &descriptor(FitMode::Cover, Some(100), Some(100))).unwrap();
    assert_eq!((cover.scale_width, cover.scale_height), (200, 100));
    assert_eq!(cover.output_size(), (100, 100));

    let contain = plan(400, 200, &descriptor(FitMode::Contain, Some(100), Some(100))).unwrap();
    assert_eq!((contain.scale_width, contain.scale_height), (100, 50));
    assert!(matches!(contain.finish, Finish::Letterbox { .. }));

    let inside = plan(400, 200, &descriptor(FitMode::Inside, Some(100), Some(100))).unwrap();
    assert_eq!(inside.output_size(), (100, 50));

    let outside = plan(400, 200, &descriptor(FitMode::Outside, Some(100), Some(100))).unwrap();
    assert_eq!(outside.output_size(), (200, 100));

    let fill = plan(400, 200, &descriptor(FitMode::Fill, Some(10), Some(90))).unwrap();
    assert_eq!(fill.output_size(), (10, 90));
}

#[test]
fn test_plan_unlarge_keeps_source() {
    let mut resize = descriptor(FitMode::Cover, Some(800), None);
    resize.allow_enlargement = false;
    let plan = plan(400, 200, &resize).unwrap();
    assert_eq!(plan.output_size(), (400, 200));
}

#[test]
fn test_encode_formats() {
    let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(16, 8, Rgba([10, 20, 30, 128])));
    for format in [OutputFormat::Jpeg, OutputFormat::Png, OutputFormat::WebP] {
        let encoded = encode(&image, format, EncodeOptions::default()).unwrap();
        assert_eq!((encoded.width, encoded.height), (16, 8));
        let decoded = image::load_from_memory(&encoded.data).unwrap();
        assert_eq!(decoded.dimensions(), (16, 8), "{}", format);
    }
    assert!(encode(&image, OutputFormat::Svg, EncodeOptions::default()).is_err());
}

#[test]
fn test_processor_rotates_after_resize() {
    let processor = ImageProcessor::new(&ImageConfig::default());
    let data = png(40, 20);
    let metadata = inspect(&data).unwrap();
    let plan = ProcessingPlan {
        density: processor.default_density(),
        resize: Some(descriptor(FitMode::Cover, Some(20), None)),
        rotate: Some(Rotation {
            angle: 90,
            background: None,
        }),
        blur: None,
        format: OutputFormat::Png,
        options: EncodeOptions::default(),
    };
    let encoded = processor.process(&data, &metadata, &plan).unwrap();
    assert_eq!((encoded.width, encoded.height), (10, 20));
}

#[test]
fn test_processor_pixel_budget() {
    let processor = ImageProcessor::new(&ImageConfig {
        max_pixels: 100,
        ..ImageConfig::default()
    });
    let data = png(20, 20);
    let metadata = inspect(&data).unwrap();
    let err = processor
        .decode(&data, &metadata, processor.default_density())
        .unwrap_err();
    assert!(matches!(err, ImageError::ImageBombDetected { .. }));
}

#[test]
fn test_vector_density_follows_requested_width() {
    let processor = ImageProcessor::new(&ImageConfig::default());
    let metadata = inspect(SVG).unwrap();
    let density = processor
        .density_for(&metadata, &descriptor(FitMode::Cover, Some(64), None))
        .unwrap();
    assert_eq!(density, 192.0);

    let err = processor
        .density_for(&metadata, &descriptor(FitMode::Cover, None, None))
        .unwrap_err();
    assert!(matches!(err, ImageError::MissingDimension));
}
