//! Image formats known to the service
//!
//! `OutputFormat` is what a response can be encoded as (and what the
//! Accept header negotiates over); `SourceFormat` is what a stored object
//! turned out to be once sniffed.

use std::fmt;
use std::str::FromStr;

use super::error::ImageError;

/// Response encoding, one per negotiable MIME type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Jpeg,
    Png,
    WebP,
    Svg,
}

impl OutputFormat {
    /// Negotiation order used when the Accept header does not prefer one type
    pub const PREFERENCE: [OutputFormat; 4] = [
        OutputFormat::Jpeg,
        OutputFormat::Png,
        OutputFormat::WebP,
        OutputFormat::Svg,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::WebP => "webp",
            Self::Svg => "svg",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::WebP => "image/webp",
            Self::Svg => "image/svg+xml",
        }
    }

    pub fn is_vector(&self) -> bool {
        matches!(self, Self::Svg)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.content_type())
    }
}

impl FromStr for OutputFormat {
    type Err = ImageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jpeg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            "webp" => Ok(OutputFormat::WebP),
            "svg" => Ok(OutputFormat::Svg),
            _ => Err(ImageError::unsupported_format(s)),
        }
    }
}

/// Format of a stored source object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Jpeg,
    Png,
    WebP,
    Gif,
    Svg,
}

impl SourceFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::WebP => "webp",
            Self::Gif => "gif",
            Self::Svg => "svg",
        }
    }

    pub fn is_vector(&self) -> bool {
        matches!(self, Self::Svg)
    }

    /// Sniff the format from the leading bytes of an object
    pub fn detect(data: &[u8]) -> Option<Self> {
        match image::guess_format(data) {
            Ok(image::ImageFormat::Jpeg) => Some(Self::Jpeg),
            Ok(image::ImageFormat::Png) => Some(Self::Png),
            Ok(image::ImageFormat::WebP) => Some(Self::WebP),
            Ok(image::ImageFormat::Gif) => Some(Self::Gif),
            _ if looks_like_svg(data) => Some(Self::Svg),
            _ => None,
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How far into a document to look for the `<svg` root element
const SVG_SNIFF_WINDOW: usize = 4096;

fn looks_like_svg(data: &[u8]) -> bool {
    let window = &data[..data.len().min(SVG_SNIFF_WINDOW)];
    let text = String::from_utf8_lossy(window);
    let text = text.trim_start_matches('\u{feff}').trim_start();

    if text.starts_with("<svg") {
        return true;
    }

    // XML prolog, doctype or a leading comment may precede the root element
    (text.starts_with("<?xml") || text.starts_with("<!")) && text.contains("<svg")
}
