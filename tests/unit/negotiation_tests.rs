// Content negotiation tests

use kagami::error::TransformError;
use kagami::imaging::OutputFormat;
use kagami::pipeline::negotiation::{accepts, best_match, negotiate};

#[test]
fn test_no_accept_defaults_to_jpeg() {
    assert_eq!(negotiate(None, None).unwrap(), OutputFormat::Jpeg);
    assert_eq!(negotiate(Some("   "), None).unwrap(), OutputFormat::Jpeg);
}

#[test]
fn test_forced_format_without_accept() {
    assert_eq!(
        negotiate(None, Some(OutputFormat::Svg)).unwrap(),
        OutputFormat::Svg
    );
}

#[test]
fn test_forced_format_must_be_accepted() {
    assert_eq!(
        negotiate(Some("image/webp,image/png"), Some(OutputFormat::Png)).unwrap(),
        OutputFormat::Png
    );
    // Not accepted: falls back to the header's own choice
    assert_eq!(
        negotiate(Some("image/webp"), Some(OutputFormat::Png)).unwrap(),
        OutputFormat::WebP
    );
}

#[test]
fn test_wildcard_prefers_jpeg() {
    assert_eq!(negotiate(Some("*/*"), None).unwrap(), OutputFormat::Jpeg);
    assert_eq!(negotiate(Some("image/*"), None).unwrap(), OutputFormat::Jpeg);
}

#[test]
fn test_quality_values_rank_candidates() {
    assert_eq!(
        negotiate(Some("image/jpeg;q=0.5, image/webp"), None).unwrap(),
        OutputFormat::WebP
    );
    assert_eq!(
        best_match("image/*;q=0.8, image/png", &OutputFormat::PREFERENCE),
        Some(OutputFormat::Png)
    );
}

#[test]
fn test_zero_quality_excludes() {
    assert!(!accepts("image/*, image/jpeg;q=0", OutputFormat::Jpeg));
    assert!(accepts("image/*, image/jpeg;q=0", OutputFormat::Png));
}

#[test]
fn test_nothing_acceptable() {
    let err = negotiate(Some("text/html"), None).unwrap_err();
    assert!(matches!(err, TransformError::NotAcceptable(_)));
    assert_eq!(err.status().as_u16(), 406);
}
