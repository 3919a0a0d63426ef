// Configuration loading and validation tests

use std::collections::HashMap;
use std::io::Write;

use kagami::config::*;
use tempfile::NamedTempFile;

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| map.get(name).cloned()
}

#[test]
fn test_can_load_config_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
server:
  address: "127.0.0.1"
  port: 8080
storage:
  bucket: images
  region: eu-west-1
  key_pattern: "originals/:filename"
image:
  max_pixels: 1000000
metrics:
  address: "127.0.0.1:9100"
"#
    )
    .unwrap();

    let config = Config::from_file(file.path()).expect("Failed to load config");
    assert_eq!(config.server.listen_addr(), "127.0.0.1:8080");
    assert_eq!(config.storage.backend, StorageBackendKind::S3);
    assert_eq!(config.storage.bucket, "images");
    assert_eq!(config.storage.key_pattern, "originals/:filename");
    assert_eq!(config.image.max_pixels, 1_000_000);
    assert_eq!(config.image.default_density, 96.0);
    assert_eq!(config.logging.format, LogFormat::Json);
    assert_eq!(config.metrics.as_ref().unwrap().address, "127.0.0.1:9100");
    assert!(config.validate().is_ok());
}

#[test]
fn test_missing_config_file() {
    let err = Config::from_file("/nonexistent/kagami.yaml").unwrap_err();
    assert!(err.contains("Failed to read config file"));
}

#[test]
fn test_env_substitution_in_yaml() {
    std::env::set_var("KAGAMI_TEST_BUCKET_NAME", "from-env");
    let yaml = r#"
storage:
  bucket: "${KAGAMI_TEST_BUCKET_NAME}"
"#;
    let config = Config::from_yaml_with_env(yaml).unwrap();
    assert_eq!(config.storage.bucket, "from-env");
}

#[test]
fn test_env_substitution_requires_variable() {
    let yaml = r#"
storage:
  bucket: "${KAGAMI_TEST_UNSET_VARIABLE}"
"#;
    let err = Config::from_yaml_with_env(yaml).unwrap_err();
    assert!(err.contains("KAGAMI_TEST_UNSET_VARIABLE"));
}

#[test]
fn test_from_lookup_required_variables() {
    let err = Config::from_lookup(lookup(&[("S3_IMAGE_BUCKET", "b")])).unwrap_err();
    assert_eq!(err, "Please set up AWS_REGION");

    let err = Config::from_lookup(lookup(&[("AWS_REGION", "us-east-1")])).unwrap_err();
    assert_eq!(err, "Please set up S3_IMAGE_BUCKET");
}

#[test]
fn test_from_lookup_full_environment() {
    let config = Config::from_lookup(lookup(&[
        ("AWS_REGION", "ap-northeast-1"),
        ("S3_IMAGE_BUCKET", "assets"),
        ("S3_IMAGE_KEY_PATTERN", "img/:filename"),
        ("S3_ENDPOINT", "http://localhost:9000"),
        ("PORT", "8081"),
        ("LOG_FORMAT", "pretty"),
        ("METRICS_ADDRESS", "0.0.0.0:9191"),
    ]))
    .unwrap();

    assert_eq!(config.storage.region, "ap-northeast-1");
    assert_eq!(config.storage.bucket, "assets");
    assert_eq!(config.storage.key_pattern, "img/:filename");
    assert_eq!(
        config.storage.endpoint.as_deref(),
        Some("http://localhost:9000")
    );
    assert!(config.storage.force_path_style);
    assert_eq!(config.server.port, 8081);
    assert_eq!(config.logging.format, LogFormat::Pretty);
    assert!(config.validate().is_ok());
}

#[test]
fn test_from_lookup_rejects_bad_port() {
    let err = Config::from_lookup(lookup(&[
        ("AWS_REGION", "us-east-1"),
        ("S3_IMAGE_BUCKET", "b"),
        ("PORT", "eighty"),
    ]))
    .unwrap_err();
    assert!(err.contains("PORT"));
}

fn valid_config() -> Config {
    Config::from_lookup(lookup(&[("AWS_REGION", "us-east-1"), ("S3_IMAGE_BUCKET", "b")])).unwrap()
}

#[test]
fn test_validate_key_pattern_placeholder() {
    let mut config = valid_config();
    config.storage.key_pattern = "static/key".to_string();
    assert!(config.validate().unwrap_err().contains(":filename"));
}

#[test]
fn test_validate_local_backend_needs_root() {
    let mut config = valid_config();
    config.storage.backend = StorageBackendKind::Local;
    assert!(config.validate().is_err());

    config.storage.root = Some("/srv/images".into());
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_metrics_address_collision() {
    let mut config = valid_config();
    config.metrics = Some(MetricsConfig {
        address: config.server.listen_addr(),
    });
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_image_limits() {
    let mut config = valid_config();
    config.image.auto_blur_sigma = 0.0;
    assert!(config.validate().is_err());

    let mut config = valid_config();
    config.image.max_pixels = 0;
    assert!(config.validate().is_err());
}
