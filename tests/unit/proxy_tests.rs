// End-to-end request handling against a local object store

use image::{DynamicImage, GenericImageView, ImageFormat, Rgba, RgbaImage};
use kagami::config::{Config, StorageBackendKind, StorageConfig};
use kagami::proxy::{ImageProxy, ImageResponse};
use std::io::Cursor;
use tempfile::TempDir;

const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
const SVG: &[u8] = br##"<svg xmlns="http://www.w3.org/2000/svg" width="32" height="16"><rect width="32" height="16" fill="#0000ff"/></svg>"##;

struct Fixture {
    _dir: TempDir,
    proxy: ImageProxy,
}

impl Fixture {
    async fn new() -> Self {
        let dir = TempDir::new().unwrap();

        let mut png = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(200, 100, BLUE))
            .write_to(&mut png, ImageFormat::Png)
            .unwrap();
        std::fs::write(dir.path().join("photo"), png.into_inner()).unwrap();
        std::fs::write(dir.path().join("logo.svg"), SVG).unwrap();

        let mut config = Config::from_lookup(|name| match name {
            "AWS_REGION" => Some("us-east-1".to_string()),
            "S3_IMAGE_BUCKET" => Some("unused".to_string()),
            _ => None,
        })
        .unwrap();
        config.storage = StorageConfig {
            backend: StorageBackendKind::Local,
            root: Some(dir.path().to_path_buf()),
            ..StorageConfig::default()
        };

        let proxy = ImageProxy::from_config(&config).await.unwrap();
        Self { _dir: dir, proxy }
    }

    async fn get(&self, path: &str, accept: Option<&str>) -> ImageResponse {
        self.proxy.handle("GET", path, accept, "test-request").await
    }
}

fn close_to(actual: Rgba<u8>, expected: Rgba<u8>) -> bool {
    actual
        .0
        .iter()
        .zip(expected.0.iter())
        .all(|(a, e)| a.abs_diff(*e) <= 8)
}

#[tokio::test]
async fn test_resize_width_defaults_to_jpeg() {
    let fixture = Fixture::new().await;
    let response = fixture.get("/photo/resize/w100", Some("*/*")).await;

    assert_eq!(response.status, 200);
    assert_eq!(response.content_type, "image/jpeg");
    assert_eq!(
        response.header("Cache-Control"),
        Some("max-age=31556926, immutable")
    );
    let decoded = image::load_from_memory(&response.body).unwrap();
    assert_eq!(decoded.dimensions(), (100, 50));
}

#[tokio::test]
async fn test_contain_letterboxes_with_background() {
    let fixture = Fixture::new().await;
    let response = fixture
        .get("/photo/contain/bg(%23ff0000)/80x80", Some("image/png"))
        .await;

    assert_eq!(response.status, 200);
    assert_eq!(response.content_type, "image/png");
    let decoded = image::load_from_memory(&response.body).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (80, 80));
    assert!(close_to(*decoded.get_pixel(0, 0), Rgba([255, 0, 0, 255])));
    assert!(close_to(*decoded.get_pixel(79, 79), Rgba([255, 0, 0, 255])));
    assert!(close_to(*decoded.get_pixel(40, 40), BLUE));
}

#[tokio::test]
async fn test_forced_webp_with_quality() {
    let fixture = Fixture::new().await;
    let response = fixture.get("/photo/fill/30x30/quality(50)webp", None).await;

    assert_eq!(response.status, 200);
    assert_eq!(response.content_type, "image/webp");
    let decoded = image::load_from_memory(&response.body).unwrap();
    assert_eq!(decoded.dimensions(), (30, 30));
}

#[tokio::test]
async fn test_method_not_allowed() {
    let fixture = Fixture::new().await;
    let response = fixture
        .proxy
        .handle("POST", "/photo/resize/w100", None, "test-request")
        .await;

    assert_eq!(response.status, 405);
    assert_eq!(response.header("Allow"), Some("GET"));
    assert_eq!(&response.body[..], b"Method Not Allowed");
}

#[tokio::test]
async fn test_unmatched_route_and_missing_object() {
    let fixture = Fixture::new().await;

    let response = fixture.get("/a/b/c/d/e/f", None).await;
    assert_eq!(response.status, 404);
    assert_eq!(response.content_type, "text/plain; charset=utf-8");

    let response = fixture.get("/missing/resize/w10", None).await;
    assert_eq!(response.status, 404);
    assert_eq!(&response.body[..], b"Not Found");
}

#[tokio::test]
async fn test_traversal_filename_is_not_found() {
    let fixture = Fixture::new().await;
    let response = fixture.get("/..%2Fphoto/resize/w10", None).await;
    assert_eq!(response.status, 404);
    assert_eq!(&response.body[..], b"Not Found");
}

#[tokio::test]
async fn test_raster_to_svg_not_acceptable() {
    let fixture = Fixture::new().await;
    let response = fixture.get("/photo/svg", None).await;

    assert_eq!(response.status, 406);
    assert_eq!(&response.body[..], b"Cannot convert png to SVG");
}

#[tokio::test]
async fn test_unacceptable_accept_header() {
    let fixture = Fixture::new().await;
    let response = fixture.get("/photo", Some("text/html")).await;
    assert_eq!(response.status, 406);
    assert_eq!(&response.body[..], b"Not Acceptable");
}

#[tokio::test]
async fn test_svg_passthrough_and_rasterization() {
    let fixture = Fixture::new().await;

    let response = fixture.get("/logo.svg/svg", Some("image/svg+xml")).await;
    assert_eq!(response.status, 200);
    assert_eq!(response.content_type, "image/svg+xml");
    assert_eq!(&response.body[..], SVG);

    let response = fixture.get("/logo.svg/resize/w64/png", None).await;
    assert_eq!(response.status, 200);
    let decoded = image::load_from_memory(&response.body).unwrap();
    assert_eq!(decoded.dimensions(), (64, 32));
}
