//! Resize descriptor resolution
//!
//! Turns the strings captured by a route shape (fit keyword, width, height,
//! anchor, background, `unlarge`) into a canonical `ResizeDescriptor`.

use std::fmt;
use std::str::FromStr;

use super::color::DEFAULT_BACKGROUND_STR;

/// How source dimensions map onto the target box (CSS `object-fit` semantics)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitMode {
    /// Fill the box preserving aspect ratio, cropping the overflow
    Cover,
    /// Fit inside the box preserving aspect ratio, letterboxing the rest
    Contain,
    /// Stretch to exactly the box, ignoring aspect ratio
    Fill,
    /// Largest size whose dimensions are both within the box
    Inside,
    /// Smallest size whose dimensions both cover the box
    Outside,
}

impl FitMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FitMode::Cover => "cover",
            FitMode::Contain => "contain",
            FitMode::Fill => "fill",
            FitMode::Inside => "inside",
            FitMode::Outside => "outside",
        }
    }
}

impl fmt::Display for FitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compass point the retained region is pinned to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gravity {
    #[default]
    Center,
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Gravity {
    /// Horizontal and vertical placement factors in [0, 1]
    pub fn factors(&self) -> (f64, f64) {
        match self {
            Gravity::Center => (0.5, 0.5),
            Gravity::North => (0.5, 0.0),
            Gravity::NorthEast => (1.0, 0.0),
            Gravity::East => (1.0, 0.5),
            Gravity::SouthEast => (1.0, 1.0),
            Gravity::South => (0.5, 1.0),
            Gravity::SouthWest => (0.0, 1.0),
            Gravity::West => (0.0, 0.5),
            Gravity::NorthWest => (0.0, 0.0),
        }
    }
}

impl FromStr for Gravity {
    type Err = ();

    /// Accepts compass names and the space separated edge/corner positions
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "center" | "centre" => Ok(Gravity::Center),
            "north" | "top" => Ok(Gravity::North),
            "northeast" | "right top" => Ok(Gravity::NorthEast),
            "east" | "right" => Ok(Gravity::East),
            "southeast" | "right bottom" => Ok(Gravity::SouthEast),
            "south" | "bottom" => Ok(Gravity::South),
            "southwest" | "left bottom" => Ok(Gravity::SouthWest),
            "west" | "left" => Ok(Gravity::West),
            "northwest" | "left top" => Ok(Gravity::NorthWest),
            _ => Err(()),
        }
    }
}

/// Content-aware crop strategy (cover only)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Region with the most edges and local contrast
    Attention,
    /// Region with the highest luminance entropy
    Entropy,
}

impl FromStr for Strategy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "attention" => Ok(Strategy::Attention),
            "entropy" => Ok(Strategy::Entropy),
            _ => Err(()),
        }
    }
}

/// Which part of the source is retained when cropping or letterboxing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anchor {
    Gravity(Gravity),
    Strategy(Strategy),
    /// Unrecognised token kept verbatim; the processor treats it as center
    Literal(String),
}

impl Default for Anchor {
    fn default() -> Self {
        Anchor::Gravity(Gravity::Center)
    }
}

impl Anchor {
    /// Normalize a route token (`left-bottom` -> `left bottom`) and classify it
    pub fn from_token(token: &str) -> Self {
        let normalized = token.replace('-', " ");
        if let Ok(gravity) = normalized.parse() {
            Anchor::Gravity(gravity)
        } else if let Ok(strategy) = normalized.parse() {
            Anchor::Strategy(strategy)
        } else {
            Anchor::Literal(normalized)
        }
    }
}

/// Canonical resize request, immutable once resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeDescriptor {
    pub fit: FitMode,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub anchor: Anchor,
    /// Letterbox colour string, only used by `contain`
    pub background: String,
    pub allow_enlargement: bool,
}

/// Raw strings captured by a route shape
#[derive(Debug, Clone, Copy, Default)]
pub struct ResizeCaptures<'a> {
    pub width: Option<&'a str>,
    pub height: Option<&'a str>,
    pub anchor: Option<&'a str>,
    pub background: Option<&'a str>,
    pub unlarge: bool,
}

/// Build a descriptor from route captures
///
/// Numeric captures are already restricted by the route grammar to 1-4
/// digits without a leading zero, so conversion cannot fail in practice.
pub fn resolve(fit: FitMode, captures: &ResizeCaptures<'_>) -> ResizeDescriptor {
    ResizeDescriptor {
        fit,
        width: captures.width.and_then(|w| w.parse().ok()),
        height: captures.height.and_then(|h| h.parse().ok()),
        anchor: captures.anchor.map(Anchor::from_token).unwrap_or_default(),
        background: captures
            .background
            .unwrap_or(DEFAULT_BACKGROUND_STR)
            .to_string(),
        allow_enlargement: !captures.unlarge,
    }
}
