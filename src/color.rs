//! Color literal parsing for style directives
//!
//! Style values accept three color spellings: an `H`-prefixed hex literal
//! (`H00FF00`, `HFF000000`), a comma-separated RGB triplet (`255,0,0`), or a
//! name from the fixed platform color table. Parsing is total: anything
//! unrecognized falls back to black so a bad color never aborts analysis.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Pack as 0xAARRGGBB, the layout the renderer consumes.
    pub fn to_argb(self) -> u32 {
        (self.a as u32) << 24 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08X}", self.to_argb())
    }
}

/// Parse a color value literal. Never fails; returns black on any
/// unrecognized or malformed input.
pub fn parse_color(text: &str) -> Color {
    let compact: String = text.trim().chars().filter(|c| !c.is_whitespace()).collect();

    if compact.len() > 1 && (compact.starts_with('H') || compact.starts_with('h')) {
        if let Some(color) = parse_hex(&compact[1..]) {
            return color;
        }
        return Color::BLACK;
    }

    if compact.contains(',') {
        return parse_triplet(&compact);
    }

    named_color(&compact).unwrap_or(Color::BLACK)
}

/// RGB, ARGB, RRGGBB or AARRGGBB hex digits (the `#`-less body of a color
/// literal). Short forms expand by repeating each digit: `F00` is `FF0000`.
fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let byte = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    let nibble = |index: usize| byte(index..index + 1).map(|v| v * 0x11);

    match hex.len() {
        3 => Some(Color::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
        4 => Some(Color::new(nibble(1)?, nibble(2)?, nibble(3)?, nibble(0)?)),
        6 => Some(Color::rgb(byte(0..2)?, byte(2..4)?, byte(4..6)?)),
        8 => Some(Color::new(byte(2..4)?, byte(4..6)?, byte(6..8)?, byte(0..2)?)),
        _ => None,
    }
}

/// Exactly three integer components, each clamped to [0, 255].
fn parse_triplet(text: &str) -> Color {
    let parts: Vec<&str> = text.split(',').collect();
    if parts.len() != 3 {
        return Color::BLACK;
    }

    let mut components = [0u8; 3];
    for (slot, part) in components.iter_mut().zip(&parts) {
        match part.parse::<i64>() {
            Ok(value) => *slot = value.clamp(0, 255) as u8,
            Err(_) => return Color::BLACK,
        }
    }

    Color::rgb(components[0], components[1], components[2])
}

/// Fixed platform color table, matching the names the Android renderer
/// resolves.
fn named_color(name: &str) -> Option<Color> {
    let color = match name.to_ascii_lowercase().as_str() {
        "black" => Color::rgb(0x00, 0x00, 0x00),
        "white" => Color::rgb(0xFF, 0xFF, 0xFF),
        "red" => Color::rgb(0xFF, 0x00, 0x00),
        "green" => Color::rgb(0x00, 0xFF, 0x00),
        "blue" => Color::rgb(0x00, 0x00, 0xFF),
        "yellow" => Color::rgb(0xFF, 0xFF, 0x00),
        "cyan" | "aqua" => Color::rgb(0x00, 0xFF, 0xFF),
        "magenta" | "fuchsia" => Color::rgb(0xFF, 0x00, 0xFF),
        "gray" | "grey" => Color::rgb(0x88, 0x88, 0x88),
        "lightgray" | "lightgrey" => Color::rgb(0xCC, 0xCC, 0xCC),
        "darkgray" | "darkgrey" => Color::rgb(0x44, 0x44, 0x44),
        "lime" => Color::rgb(0x00, 0xFF, 0x00),
        "maroon" => Color::rgb(0x80, 0x00, 0x00),
        "navy" => Color::rgb(0x00, 0x00, 0x80),
        "olive" => Color::rgb(0x80, 0x80, 0x00),
        "purple" => Color::rgb(0x80, 0x00, 0x80),
        "silver" => Color::rgb(0xC0, 0xC0, 0xC0),
        "teal" => Color::rgb(0x00, 0x80, 0x80),
        _ => return None,
    };
    Some(color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_prefix() {
        assert_eq!(parse_color("H0000FF"), Color::rgb(0, 0, 255));
        assert_eq!(parse_color("hFF0000"), Color::rgb(255, 0, 0));
        assert_eq!(parse_color("H80FF0000"), Color::new(255, 0, 0, 0x80));
    }

    #[test]
    fn test_hex_short_forms() {
        assert_eq!(parse_color("HF00"), Color::rgb(255, 0, 0));
        assert_eq!(parse_color("h0a0"), Color::rgb(0, 0xAA, 0));
        assert_eq!(parse_color("H8F00"), Color::new(255, 0, 0, 0x88));
    }

    #[test]
    fn test_hex_invalid() {
        assert_eq!(parse_color("HZZZZZZ"), Color::BLACK);
        assert_eq!(parse_color("H12345"), Color::BLACK);
        assert_eq!(parse_color("H"), Color::BLACK);
    }

    #[test]
    fn test_triplet() {
        assert_eq!(parse_color("0,0,255"), Color::rgb(0, 0, 255));
        assert_eq!(parse_color("255, 128, 0"), Color::rgb(255, 128, 0));
        // Components clamp rather than fail
        assert_eq!(parse_color("300,-5,255"), Color::rgb(255, 0, 255));
    }

    #[test]
    fn test_triplet_malformed() {
        assert_eq!(parse_color("1,2"), Color::BLACK);
        assert_eq!(parse_color("1,2,3,4"), Color::BLACK);
        assert_eq!(parse_color("1,x,3"), Color::BLACK);
    }

    #[test]
    fn test_named() {
        assert_eq!(parse_color("red"), Color::rgb(255, 0, 0));
        assert_eq!(parse_color("TEAL"), Color::rgb(0, 0x80, 0x80));
        assert_eq!(parse_color("bogus-name"), Color::BLACK);
        assert_eq!(parse_color(""), Color::BLACK);
    }

    #[test]
    fn test_packing() {
        assert_eq!(Color::rgb(0x12, 0x34, 0x56).to_argb(), 0xFF123456);
    }
}
