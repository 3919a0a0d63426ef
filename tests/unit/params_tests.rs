// Parameter segment and colour parsing tests

use image::Rgba;
use kagami::imaging::OutputFormat;
use kagami::transform::{parse_color, parse_parameters, Blur, Rotation};
use rstest::rstest;

#[test]
fn test_full_parameter_segment() {
    let params = parse_parameters("quality(75)alphaQuality(40)progressiveblur(2.5)rotate(90)webp");
    assert_eq!(params.quality, Some(75));
    assert_eq!(params.alpha_quality, Some(40));
    assert_eq!(params.progressive, Some(true));
    assert_eq!(params.blur, Some(Blur::Sigma(2.5)));
    assert_eq!(
        params.rotate,
        Some(Rotation {
            angle: 90,
            background: None
        })
    );
    assert_eq!(params.format, Some(OutputFormat::WebP));
}

#[rstest]
#[case("quality(0)", None)]
#[case("quality(1)", Some(1))]
#[case("quality(55)", Some(55))]
#[case("quality(100)", Some(100))]
#[case("quality(101)", None)]
#[case("quality(-5)", None)]
#[case("quality()", None)]
#[case("quality(1.5)", None)]
fn test_quality_bounds(#[case] input: &str, #[case] expected: Option<u8>) {
    assert_eq!(parse_parameters(input).quality, expected);
}

#[test]
fn test_blur_bounds_fall_back_to_auto() {
    assert_eq!(parse_parameters("blur(0.1)").blur, Some(Blur::Auto));
    assert_eq!(parse_parameters("blur(0.3)").blur, Some(Blur::Sigma(0.3)));
    assert_eq!(parse_parameters("blur(1000)").blur, Some(Blur::Sigma(1000.0)));
    assert_eq!(parse_parameters("blur(1001)").blur, Some(Blur::Auto));
    assert_eq!(parse_parameters("noblurhere").blur, Some(Blur::Auto));
}

#[rstest]
#[case("blur", Some(Blur::Auto))]
#[case("blur(99999)", Some(Blur::Auto))]
#[case("blur(3)", Some(Blur::Sigma(3.0)))]
#[case("quality(80)", None)]
fn test_blur_grammar(#[case] input: &str, #[case] expected: Option<Blur>) {
    assert_eq!(parse_parameters(input).blur, expected);
}

#[rstest]
#[case("rotate(110)", Some(110))]
#[case("rotate(-90)", Some(-90))]
#[case("rotate(1.1)", None)]
#[case("rotate(1000)", None)]
#[case("rotate()", None)]
fn test_rotate_angle_grammar(#[case] input: &str, #[case] expected: Option<i32>) {
    let angle = parse_parameters(input).rotate.map(|rotation| rotation.angle);
    assert_eq!(angle, expected);
}

#[test]
fn test_rotate_whitespace_before_background_is_ignored() {
    let spaced = parse_parameters("rotate(100, #000)");
    let compact = parse_parameters("rotate(100,#000)");
    assert_eq!(spaced, compact);
    assert_eq!(
        spaced.rotate,
        Some(Rotation {
            angle: 100,
            background: Some("#000".to_string())
        })
    );
}

#[test]
fn test_format_tokens_case_insensitive() {
    assert_eq!(parse_parameters("PNG").format, Some(OutputFormat::Png));
    assert_eq!(parse_parameters("Svg").format, Some(OutputFormat::Svg));
    assert_eq!(parse_parameters("gif").format, None);
}

#[test]
fn test_rotate_negative_with_hex_background() {
    let params = parse_parameters("rotate(-45,#00ff00)");
    assert_eq!(
        params.rotate,
        Some(Rotation {
            angle: -45,
            background: Some("#00ff00".to_string())
        })
    );
}

#[test]
fn test_parse_color_forms() {
    assert_eq!(parse_color("#f00"), Some(Rgba([255, 0, 0, 255])));
    assert_eq!(parse_color("#00ff0080"), Some(Rgba([0, 255, 0, 128])));
    assert_eq!(parse_color("rgb(1, 2, 3)"), Some(Rgba([1, 2, 3, 255])));
    assert_eq!(parse_color("rgba(0,0,0,0)"), Some(Rgba([0, 0, 0, 0])));
    assert_eq!(parse_color("(#ffffff)"), Some(Rgba([255, 255, 255, 255])));
    assert_eq!(parse_color("not-a-colour"), None);
}
