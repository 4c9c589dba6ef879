//! Colour strings from the draw list to RGBA pixels.

use image::Rgba;

/// An sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    /// Red, 0-255.
    pub r: u8,
    /// Green, 0-255.
    pub g: u8,
    /// Blue, 0-255.
    pub b: u8,
    /// Alpha, 255 is opaque.
    pub a: u8,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// An opaque colour.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse a named colour or `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.starts_with('#') {
            Self::from_hex(value)
        } else {
            Self::from_named(value)
        }
    }

    /// Hex notation. Short forms replicate digits: `#abc` is `#aabbcc`.
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return None;
        }
        let short = |i: usize| u8::from_str_radix(&hex[i..=i].repeat(2), 16).ok();
        let long = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

        match hex.len() {
            3 => Some(Self::rgb(short(0)?, short(1)?, short(2)?)),
            4 => Some(Self {
                r: short(0)?,
                g: short(1)?,
                b: short(2)?,
                a: short(3)?,
            }),
            6 => Some(Self::rgb(long(0)?, long(2)?, long(4)?)),
            8 => Some(Self {
                r: long(0)?,
                g: long(2)?,
                b: long(4)?,
                a: long(6)?,
            }),
            _ => None,
        }
    }

    /// The basic named colours.
    #[must_use]
    pub fn from_named(name: &str) -> Option<Self> {
        let (r, g, b) = match name.to_ascii_lowercase().as_str() {
            "transparent" => return Some(Self { r: 0, g: 0, b: 0, a: 0 }),
            "white" => (255, 255, 255),
            "black" => (0, 0, 0),
            "red" => (255, 0, 0),
            "green" => (0, 128, 0),
            "blue" => (0, 0, 255),
            "yellow" => (255, 255, 0),
            "gray" | "grey" => (128, 128, 128),
            "lightgray" | "lightgrey" => (211, 211, 211),
            "aqua" | "cyan" => (0, 255, 255),
            "fuchsia" | "magenta" => (255, 0, 255),
            "lime" => (0, 255, 0),
            "maroon" => (128, 0, 0),
            "navy" => (0, 0, 128),
            "olive" => (128, 128, 0),
            "orange" => (255, 165, 0),
            "purple" => (128, 0, 128),
            "silver" => (192, 192, 192),
            "teal" => (0, 128, 128),
            _ => return None,
        };
        Some(Self::rgb(r, g, b))
    }
}

impl From<Color> for Rgba<u8> {
    fn from(color: Color) -> Self {
        Self([color.r, color.g, color.b, color.a])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_forms() {
        assert_eq!(Color::parse("#eeeeee"), Some(Color::rgb(0xee, 0xee, 0xee)));
        assert_eq!(Color::parse("#abc"), Some(Color::rgb(0xaa, 0xbb, 0xcc)));
        assert_eq!(Color::parse("#ff000080").map(|c| c.a), Some(0x80));
        assert_eq!(Color::parse("#12"), None);
        assert_eq!(Color::parse("#gggggg"), None);
    }

    #[test]
    fn test_named() {
        assert_eq!(Color::parse("Gray"), Some(Color::rgb(128, 128, 128)));
        assert_eq!(Color::parse("transparent").map(|c| c.a), Some(0));
        assert_eq!(Color::parse("notacolor"), None);
    }
}
