// Router module - ordered route table for transformation URLs
//
// Every supported URL shape is one entry of ROUTES: a list of segment
// matchers plus an extractor that turns the captures into a resize
// descriptor. Entries are tried strictly in declaration order and the first
// match wins, so specific shapes (explicit anchor or background) are listed
// before general ones and the passthrough shape comes last.

use crate::error::TransformError;
use crate::storage::KeyPattern;
use crate::transform::{
    parse_parameters, resolve, FitMode, ResizeCaptures, ResizeDescriptor, TransformRequest,
};

const GRAVITY: &[&str] = &[
    "center",
    "centre",
    "east",
    "south",
    "southeast",
    "southwest",
    "north",
    "northeast",
    "northwest",
    "west",
];

const POSITION: &[&str] = &[
    "bottom",
    "center",
    "centre",
    "left",
    "left-bottom",
    "left-top",
    "right",
    "right-bottom",
    "right-top",
    "top",
];

const STRATEGY: &[&str] = &["attention", "entropy"];

/// Anchor vocabulary accepted at an anchor segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorSet {
    /// gravity, position and saliency strategies
    Cover,
    /// gravity and position only
    Contain,
}

impl AnchorSet {
    fn accepts(&self, token: &str) -> bool {
        let positional = GRAVITY.contains(&token) || POSITION.contains(&token);
        match self {
            AnchorSet::Cover => positional || STRATEGY.contains(&token),
            AnchorSet::Contain => positional,
        }
    }
}

/// One path segment matcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    /// Any non-empty segment, captured as the filename
    Filename,
    /// The literal `unlarge`, optional; presence disables enlargement
    Unlarge,
    /// One of the listed literals
    Keyword(&'static [&'static str]),
    /// `w{N}`
    Width,
    /// `h{N}`
    Height,
    /// `{W}x{H}`
    Size,
    /// An anchor token from the given vocabulary
    Anchor(AnchorSet),
    /// `bg{color}`
    Background,
    /// Optional trailing parameter segment; must be last
    Parameters,
}

/// Strings captured while matching one shape
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteCaptures<'a> {
    pub filename: &'a str,
    pub unlarge: bool,
    pub width: Option<&'a str>,
    pub height: Option<&'a str>,
    pub anchor: Option<&'a str>,
    pub background: Option<&'a str>,
    pub parameters: &'a str,
}

impl<'a> RouteCaptures<'a> {
    fn resize_captures(&self) -> ResizeCaptures<'a> {
        ResizeCaptures {
            width: self.width,
            height: self.height,
            anchor: self.anchor,
            background: self.background,
            unlarge: self.unlarge,
        }
    }
}

type Extractor = fn(&RouteCaptures<'_>) -> Option<ResizeDescriptor>;

/// A route shape: segment matchers plus the extractor for its captures
pub struct RouteShape {
    pub name: &'static str,
    pub segments: &'static [Segment],
    extract: Extractor,
}

impl RouteShape {
    /// Try to match decoded path segments against this shape
    pub fn matches<'a>(&self, segments: &[&'a str]) -> Option<RouteCaptures<'a>> {
        let mut captures = RouteCaptures::default();
        let mut rest = segments;

        for matcher in self.segments {
            match matcher {
                Segment::Unlarge => {
                    if rest.first() == Some(&"unlarge") {
                        captures.unlarge = true;
                        rest = &rest[1..];
                    }
                    continue;
                }
                Segment::Parameters => {
                    match rest {
                        [] => {}
                        [params] => captures.parameters = *params,
                        _ => return None,
                    }
                    rest = &[];
                    continue;
                }
                _ => {}
            }

            let (&segment, tail) = rest.split_first()?;
            match matcher {
                Segment::Filename if !segment.is_empty() => captures.filename = segment,
                Segment::Keyword(words) if words.contains(&segment) => {}
                Segment::Width => {
                    captures.width = Some(dimension(segment.strip_prefix('w')?)?);
                }
                Segment::Height => {
                    captures.height = Some(dimension(segment.strip_prefix('h')?)?);
                }
                Segment::Size => {
                    let (w, h) = segment.split_once('x')?;
                    captures.width = Some(dimension(w)?);
                    captures.height = Some(dimension(h)?);
                }
                Segment::Anchor(set) if set.accepts(segment) => captures.anchor = Some(segment),
                Segment::Background => {
                    let color = segment.strip_prefix("bg").filter(|c| !c.is_empty())?;
                    captures.background = Some(color);
                }
                _ => return None,
            }
            rest = tail;
        }

        rest.is_empty().then_some(captures)
    }

    pub fn extract(&self, captures: &RouteCaptures<'_>) -> Option<ResizeDescriptor> {
        (self.extract)(captures)
    }
}

/// `[1-9][0-9]{0,3}`: 1 to 9999 without leading zeros
fn dimension(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    let valid = (1..=4).contains(&bytes.len())
        && (b'1'..=b'9').contains(&bytes[0])
        && bytes.iter().all(u8::is_ascii_digit);
    valid.then_some(s)
}

fn cover(c: &RouteCaptures<'_>) -> Option<ResizeDescriptor> {
    Some(resolve(FitMode::Cover, &c.resize_captures()))
}

fn contain(c: &RouteCaptures<'_>) -> Option<ResizeDescriptor> {
    Some(resolve(FitMode::Contain, &c.resize_captures()))
}

fn fill(c: &RouteCaptures<'_>) -> Option<ResizeDescriptor> {
    Some(resolve(FitMode::Fill, &c.resize_captures()))
}

fn inside(c: &RouteCaptures<'_>) -> Option<ResizeDescriptor> {
    Some(resolve(FitMode::Inside, &c.resize_captures()))
}

fn outside(c: &RouteCaptures<'_>) -> Option<ResizeDescriptor> {
    Some(resolve(FitMode::Outside, &c.resize_captures()))
}

fn passthrough(_: &RouteCaptures<'_>) -> Option<ResizeDescriptor> {
    None
}

use Segment::*;

const RESIZE_OR_COVER: Segment = Keyword(&["resize", "cover"]);
const COVER: Segment = Keyword(&["cover"]);
const CONTAIN: Segment = Keyword(&["contain"]);

/// The route table, in precedence order
pub static ROUTES: &[RouteShape] = &[
    // cover (`resize` is a synonym)
    RouteShape {
        name: "cover-width",
        segments: &[Filename, Unlarge, RESIZE_OR_COVER, Width, Parameters],
        extract: cover,
    },
    RouteShape {
        name: "cover-height",
        segments: &[Filename, Unlarge, RESIZE_OR_COVER, Height, Parameters],
        extract: cover,
    },
    RouteShape {
        name: "cover-size",
        segments: &[Filename, Unlarge, RESIZE_OR_COVER, Size, Parameters],
        extract: cover,
    },
    RouteShape {
        name: "cover-anchor-size",
        segments: &[
            Filename,
            Unlarge,
            COVER,
            Anchor(AnchorSet::Cover),
            Size,
            Parameters,
        ],
        extract: cover,
    },
    // contain
    RouteShape {
        name: "contain-size",
        segments: &[Filename, Unlarge, CONTAIN, Size, Parameters],
        extract: contain,
    },
    RouteShape {
        name: "contain-background-size",
        segments: &[Filename, Unlarge, CONTAIN, Background, Size, Parameters],
        extract: contain,
    },
    RouteShape {
        name: "contain-anchor-size",
        segments: &[
            Filename,
            Unlarge,
            CONTAIN,
            Anchor(AnchorSet::Contain),
            Size,
            Parameters,
        ],
        extract: contain,
    },
    RouteShape {
        name: "contain-background-anchor-size",
        segments: &[
            Filename,
            Unlarge,
            CONTAIN,
            Background,
            Anchor(AnchorSet::Contain),
            Size,
            Parameters,
        ],
        extract: contain,
    },
    RouteShape {
        name: "contain-anchor-background-size",
        segments: &[
            Filename,
            Unlarge,
            CONTAIN,
            Anchor(AnchorSet::Contain),
            Background,
            Size,
            Parameters,
        ],
        extract: contain,
    },
    // fill / inside / outside take both dimensions only
    RouteShape {
        name: "fill-size",
        segments: &[Filename, Unlarge, Keyword(&["fill"]), Size, Parameters],
        extract: fill,
    },
    RouteShape {
        name: "inside-size",
        segments: &[Filename, Unlarge, Keyword(&["inside"]), Size, Parameters],
        extract: inside,
    },
    RouteShape {
        name: "outside-size",
        segments: &[Filename, Unlarge, Keyword(&["outside"]), Size, Parameters],
        extract: outside,
    },
    // passthrough, cosmetic parameters only
    RouteShape {
        name: "passthrough",
        segments: &[Filename, Parameters],
        extract: passthrough,
    },
];

/// Split a raw request path into percent-decoded segments
///
/// A single trailing slash is ignored. Returns `None` when a segment does
/// not decode to UTF-8.
pub fn split_path(path: &str) -> Option<Vec<String>> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);

    trimmed
        .split('/')
        .map(|segment| {
            urlencoding::decode(segment)
                .ok()
                .map(|decoded| decoded.into_owned())
        })
        .collect()
}

/// Maps URL paths to transformation requests
#[derive(Debug, Clone)]
pub struct Dispatcher {
    key_pattern: KeyPattern,
}

impl Dispatcher {
    pub fn new(key_pattern: KeyPattern) -> Self {
        Self { key_pattern }
    }

    /// Find the first matching shape and build the request
    pub fn dispatch(&self, path: &str) -> Result<TransformRequest, TransformError> {
        let owned = split_path(path).ok_or(TransformError::RouteNotFound)?;
        let segments: Vec<&str> = owned.iter().map(String::as_str).collect();

        for route in ROUTES {
            if let Some(captures) = route.matches(&segments) {
                tracing::debug!(
                    route = route.name,
                    filename = captures.filename,
                    parameters = captures.parameters,
                    "Matched route shape"
                );

                return Ok(TransformRequest {
                    filename: captures.filename.to_string(),
                    source_key: self.key_pattern.key_for(captures.filename),
                    resize: route.extract(&captures),
                    cosmetic: parse_parameters(captures.parameters),
                });
            }
        }

        Err(TransformError::RouteNotFound)
    }
}
