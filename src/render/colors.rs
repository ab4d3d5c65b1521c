//! Colour handling for the worksheet renderer.
//!
//! Styles carry CSS hex strings; drawing code works on [`Rgb`] values so that
//! the offscreen surface can write pixels and the canvas backend can emit
//! `fillStyle` strings from the same type.

use serde::{Deserialize, Serialize};

/// RGB color with u8 components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse from a hex string (with or without #).
    /// Returns None if the format is invalid.
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().strip_prefix('#').unwrap_or(s.trim());
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
        let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
        let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
        Some(Self { r, g, b })
    }

    /// Convert to CSS hex string (#RRGGBB).
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Component-wise average of two colours.
    ///
    /// Used for de-emphasised text such as the digit-count marker of a
    /// truncated number, drawn halfway between text and background.
    pub fn midpoint(self, other: Rgb) -> Self {
        Self {
            r: Self::mid_component(self.r, other.r),
            g: Self::mid_component(self.g, other.g),
            b: Self::mid_component(self.b, other.b),
        }
    }

    /// RGBA bytes, fully opaque.
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }

    fn mid_component(a: u8, b: u8) -> u8 {
        let sum = u16::from(a) + u16::from(b);
        u8::try_from(sum / 2).unwrap_or(u8::MAX)
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::new(0, 0, 0)
    }
}

/// Colours used by the view itself rather than by cell styles.
pub mod palette {
    use super::Rgb;

    /// Selection bounding boxes.
    pub const SELECTION: Rgb = Rgb::new(0x33, 0x66, 0xCC);
    /// Fallback background.
    pub const WHITE: Rgb = Rgb::new(0xFF, 0xFF, 0xFF);
}
