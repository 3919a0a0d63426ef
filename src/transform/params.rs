//! Cosmetic parameter mini-language
//!
//! The last path segment of a transformation URL may carry output tuning
//! keywords, e.g. `quality(80)blur(3)webp` or `rotate(90,#fff)progressive`.
//!
//! Parsing is a tolerant scan rather than a grammar: every keyword has its
//! own matcher that searches the whole segment independently, and the last
//! occurrence wins. Anything a matcher does not recognise is ignored, and a
//! keyword whose argument is out of range is dropped without failing the
//! request.

use regex::{Captures, Regex};
use std::sync::OnceLock;

use super::color::color_pattern;
use crate::constants::{MAX_BLUR_SIGMA, MIN_BLUR_SIGMA};
use crate::imaging::OutputFormat;

/// Blur request: an explicit Gaussian sigma or the automatic default
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Blur {
    Auto,
    Sigma(f32),
}

/// Rotation request in degrees with an optional fill colour
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rotation {
    pub angle: i32,
    pub background: Option<String>,
}

/// Output tuning extracted from the parameter segment; every field optional
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CosmeticParameters {
    /// Format forced by a bare `jpeg`/`png`/`webp`/`svg` token
    pub format: Option<OutputFormat>,
    /// `quality(n)`, 1-100 (jpeg, webp)
    pub quality: Option<u8>,
    /// `alphaQuality(n)`, 1-100 (webp)
    pub alpha_quality: Option<u8>,
    /// `progressive` / `progressive(flag)` (jpeg, png)
    pub progressive: Option<bool>,
    pub blur: Option<Blur>,
    pub rotate: Option<Rotation>,
}

impl CosmeticParameters {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

type Extractor = fn(&str, &mut CosmeticParameters);

/// Independent keyword matchers, each filling at most one field
const EXTRACTORS: &[Extractor] = &[
    extract_alpha_quality,
    extract_blur,
    extract_format,
    extract_progressive,
    extract_quality,
    extract_rotate,
];

/// Parse a parameter segment; never fails
pub fn parse_parameters(input: &str) -> CosmeticParameters {
    let mut params = CosmeticParameters::default();
    for extract in EXTRACTORS {
        extract(input, &mut params);
    }
    params
}

const QUALITY_INT: &str = "([1-9]|[1-9][0-9]|100)";

macro_rules! keyword_pattern {
    ($name:ident, $pattern:expr) => {
        fn $name() -> &'static Regex {
            static PATTERN: OnceLock<Regex> = OnceLock::new();
            // Patterns are built from constants; a failure here is a programming error
            // caught by `test_keyword_patterns_compile`.
            PATTERN.get_or_init(|| Regex::new(&$pattern).expect("invalid keyword pattern"))
        }
    };
}

keyword_pattern!(alpha_quality_pattern, format!(r"alphaQuality\({}\)", QUALITY_INT));
keyword_pattern!(quality_pattern, format!(r"quality\({}\)", QUALITY_INT));
keyword_pattern!(blur_pattern, r"blur(?:\(([0-9]*\.?[0-9]+)\))?");
keyword_pattern!(format_pattern, r"(?i)(svg|jpeg|webp|png)");
keyword_pattern!(
    rotate_pattern,
    format!(r"rotate\((-?[0-9]{{1,3}})(?:,\s*({}))?\)", color_pattern())
);
keyword_pattern!(progressive_pattern, r"progressive(?:\((1|true|0|false)\))?");

fn last_match<'t>(pattern: &Regex, input: &'t str) -> Option<Captures<'t>> {
    pattern.captures_iter(input).last()
}

fn extract_alpha_quality(input: &str, params: &mut CosmeticParameters) {
    if let Some(caps) = last_match(alpha_quality_pattern(), input) {
        params.alpha_quality = caps[1].parse().ok();
    }
}

fn extract_quality(input: &str, params: &mut CosmeticParameters) {
    if let Some(caps) = last_match(quality_pattern(), input) {
        params.quality = caps[1].parse().ok();
    }
}

fn extract_blur(input: &str, params: &mut CosmeticParameters) {
    if let Some(caps) = last_match(blur_pattern(), input) {
        let sigma = caps
            .get(1)
            .and_then(|m| m.as_str().parse::<f32>().ok())
            .filter(|s| (MIN_BLUR_SIGMA..=MAX_BLUR_SIGMA).contains(s));

        params.blur = Some(match sigma {
            Some(s) => Blur::Sigma(s),
            None => Blur::Auto,
        });
    }
}

fn extract_format(input: &str, params: &mut CosmeticParameters) {
    if let Some(caps) = last_match(format_pattern(), input) {
        params.format = caps[1].parse().ok();
    }
}

fn extract_progressive(input: &str, params: &mut CosmeticParameters) {
    if let Some(caps) = last_match(progressive_pattern(), input) {
        params.progressive = Some(match caps.get(1).map(|m| m.as_str()) {
            None => true,
            Some(flag) => flag == "1" || flag == "true",
        });
    }
}

fn extract_rotate(input: &str, params: &mut CosmeticParameters) {
    if let Some(caps) = last_match(rotate_pattern(), input) {
        if let Ok(angle) = caps[1].parse::<i32>() {
            params.rotate = Some(Rotation {
                angle,
                background: caps.get(2).map(|m| m.as_str().to_string()),
            });
        }
    }
}
