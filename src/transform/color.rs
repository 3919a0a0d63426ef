//! Colour values used for backgrounds
//!
//! The URL grammar carries colours as strings (`#fff`, `#ff0000`,
//! `rgb(255,0,0)`, `rgba(0,0,0,.5)`). The regex fragments here are shared
//! with the parameter parser so `rotate(45,rgba(...))` uses the exact same
//! channel rules; `parse_color` turns a captured string into pixels.

use image::Rgba;

/// One colour channel, 0-255
pub(crate) const COLOR_INT: &str = r"(?:0|[1-9]|[1-9][0-9]|1[0-9]{2}|2[0-4][0-9]|25[0-5])";

/// Alpha: 0, 1, or a single decimal digit fraction (`.5`, `0.5`)
pub(crate) const COLOR_ALPHA: &str = r"(?:0?\.[0-9]|0|1)";

/// Any colour accepted inside the parameter mini-language
pub(crate) fn color_pattern() -> String {
    format!(
        r"(?:#[0-9a-fA-F]{{6}}|#[0-9a-fA-F]{{3}}|rgb\({i},{i},{i}\)|rgba\({i},{i},{i},{a}\))",
        i = COLOR_INT,
        a = COLOR_ALPHA
    )
}

/// Opaque black, the background when none is given
pub const DEFAULT_BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Canonical string form of the default background
pub const DEFAULT_BACKGROUND_STR: &str = "rgba(0,0,0,1)";

/// Parse a colour string into an RGBA pixel
///
/// Accepts hex (`#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`), `rgb(r,g,b)`,
/// `rgba(r,g,b,a)` with optional spaces and a handful of CSS names.
/// A colour wrapped in parentheses, as in `bg(#ff0000)`, is unwrapped first.
pub fn parse_color(input: &str) -> Option<Rgba<u8>> {
    let mut value = input.trim();
    while let Some(inner) = value.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        value = inner.trim();
    }
    let lower = value.to_ascii_lowercase();

    if let Some(hex) = lower.strip_prefix('#') {
        return parse_hex(hex);
    }
    if let Some(args) = lower
        .strip_prefix("rgba(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return parse_functional(args, true);
    }
    if let Some(args) = lower
        .strip_prefix("rgb(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return parse_functional(args, false);
    }

    named_color(&lower)
}

fn parse_hex(hex: &str) -> Option<Rgba<u8>> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    match hex.len() {
        3 => Some(Rgba([nibble(0)?, nibble(1)?, nibble(2)?, 255])),
        4 => Some(Rgba([nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?])),
        6 => Some(Rgba([byte(0)?, byte(2)?, byte(4)?, 255])),
        8 => Some(Rgba([byte(0)?, byte(2)?, byte(4)?, byte(6)?])),
        _ => None,
    }
}

fn parse_functional(args: &str, with_alpha: bool) -> Option<Rgba<u8>> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    let expected = if with_alpha { 4 } else { 3 };
    if parts.len() != expected {
        return None;
    }

    let channel = |s: &str| s.parse::<u16>().ok().filter(|v| *v <= 255).map(|v| v as u8);
    let alpha = if with_alpha {
        let a: f32 = parts[3].parse().ok()?;
        if !(0.0..=1.0).contains(&a) {
            return None;
        }
        (a * 255.0).round() as u8
    } else {
        255
    };

    Some(Rgba([
        channel(parts[0])?,
        channel(parts[1])?,
        channel(parts[2])?,
        alpha,
    ]))
}

fn named_color(name: &str) -> Option<Rgba<u8>> {
    let rgba = match name {
        "black" => [0, 0, 0, 255],
        "white" => [255, 255, 255, 255],
        "red" => [255, 0, 0, 255],
        "green" => [0, 128, 0, 255],
        "lime" => [0, 255, 0, 255],
        "blue" => [0, 0, 255, 255],
        "yellow" => [255, 255, 0, 255],
        "cyan" | "aqua" => [0, 255, 255, 255],
        "magenta" | "fuchsia" => [255, 0, 255, 255],
        "gray" | "grey" => [128, 128, 128, 255],
        "silver" => [192, 192, 192, 255],
        "transparent" => [0, 0, 0, 0],
        _ => return None,
    };
    Some(Rgba(rgba))
}
