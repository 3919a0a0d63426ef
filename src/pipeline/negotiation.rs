//! Output format selection from the Accept header
//!
//! Each candidate MIME type is matched against every Accept range. The most
//! specific matching range decides the candidate's quality; candidates are
//! then ranked by quality, specificity, position of the matching range in
//! the header and finally by the fixed preference order.

use crate::error::TransformError;
use crate::imaging::OutputFormat;

/// One parsed media range
#[derive(Debug, Clone, PartialEq)]
struct MediaRange {
    kind: String,
    subtype: String,
    quality: f32,
    /// Position in the header
    order: usize,
}

impl MediaRange {
    /// Specificity of a match against `kind/subtype`, `None` if no match
    fn specificity(&self, kind: &str, subtype: &str) -> Option<u8> {
        let mut score = 0;
        if self.kind == kind {
            score |= 2;
        } else if self.kind != "*" {
            return None;
        }
        if self.subtype == subtype {
            score |= 1;
        } else if self.subtype != "*" {
            return None;
        }
        Some(score)
    }
}

/// Parse an Accept header, dropping malformed ranges
fn parse_accept(header: &str) -> Vec<MediaRange> {
    header
        .split(',')
        .enumerate()
        .filter_map(|(order, part)| {
            let mut pieces = part.split(';');
            let media_type = pieces.next()?.trim().to_ascii_lowercase();
            let (kind, subtype) = media_type.split_once('/')?;
            if kind.is_empty() || subtype.is_empty() {
                return None;
            }

            let quality = pieces
                .filter_map(|param| param.trim().split_once('='))
                .find(|(name, _)| name.trim().eq_ignore_ascii_case("q"))
                .map(|(_, value)| value.trim().parse::<f32>().unwrap_or(0.0))
                .unwrap_or(1.0)
                .clamp(0.0, 1.0);

            Some(MediaRange {
                kind: kind.to_string(),
                subtype: subtype.to_string(),
                quality,
                order,
            })
        })
        .collect()
}

/// How a candidate fares against the header: (quality, specificity, order)
fn priority(ranges: &[MediaRange], format: OutputFormat) -> Option<(f32, u8, usize)> {
    let (kind, subtype) = format.content_type().split_once('/')?;
    ranges
        .iter()
        .filter_map(|range| {
            range
                .specificity(kind, subtype)
                .map(|s| (range.quality, s, range.order))
        })
        // Most specific range wins, then the higher quality, then the earlier one
        .max_by(|a, b| {
            a.1.cmp(&b.1)
                .then(a.0.total_cmp(&b.0))
                .then(b.2.cmp(&a.2))
        })
        .filter(|(quality, _, _)| *quality > 0.0)
}

/// Whether the header accepts `format` at all
pub fn accepts(header: &str, format: OutputFormat) -> bool {
    priority(&parse_accept(header), format).is_some()
}

/// Pick the best of `candidates` for the header, `None` when none is acceptable
pub fn best_match(header: &str, candidates: &[OutputFormat]) -> Option<OutputFormat> {
    let ranges = parse_accept(header);
    candidates
        .iter()
        .enumerate()
        .filter_map(|(index, format)| priority(&ranges, *format).map(|p| (p, index, *format)))
        .max_by(|((qa, sa, oa), ia, _), ((qb, sb, ob), ib, _)| {
            qa.total_cmp(qb)
                .then(sa.cmp(sb))
                .then(ob.cmp(oa))
                .then(ib.cmp(ia))
        })
        .map(|(_, _, format)| format)
}

/// Resolve the output format for a request
///
/// A forced format is used when the client sends no Accept header or accepts
/// it; otherwise the header decides among the supported formats. Without an
/// Accept header the answer is jpeg.
pub fn negotiate(
    accept: Option<&str>,
    forced: Option<OutputFormat>,
) -> Result<OutputFormat, TransformError> {
    let accept = accept.map(str::trim).filter(|header| !header.is_empty());

    if let Some(format) = forced {
        match accept {
            None => return Ok(format),
            Some(header) if accepts(header, format) => return Ok(format),
            Some(_) => {}
        }
    }

    match accept {
        None => Ok(OutputFormat::Jpeg),
        Some(header) => {
            best_match(header, &OutputFormat::PREFERENCE).ok_or_else(TransformError::not_acceptable)
        }
    }
}
