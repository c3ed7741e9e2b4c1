use palette::{FromColor, IntoColor, Lab, Srgb};

use crate::error::{Result, ThemeError};

/// One palette entry: an sRGB triple with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a hex color string like `#FF8800` or `#ff8800`.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(ThemeError::Validation(format!(
                "invalid hex color '{hex}': expected 6 hex digits"
            )));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|e| ThemeError::Validation(format!("invalid hex color '{hex}': {e}")))
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    /// Serialize to uppercase hex `#RRGGBB`.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Serialize to uppercase hex with an alpha byte, `#RRGGBBAA`.
    pub fn to_hex_alpha(self, alpha: u8) -> String {
        format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, alpha)
    }

    pub fn to_srgb_u8(self) -> Srgb<u8> {
        Srgb::new(self.r, self.g, self.b)
    }

    /// Convert to CIELAB (the space colors are clustered in).
    pub fn to_lab(self) -> Lab {
        let srgb_f32: Srgb<f32> = self.to_srgb_u8().into_format();
        srgb_f32.into_color()
    }

    /// Create from CIELAB, clamping out-of-gamut values.
    pub fn from_lab(lab: Lab) -> Self {
        let srgb: Srgb<f32> = Srgb::from_color(lab);
        let r = (srgb.red.clamp(0.0, 1.0) * 255.0).round() as u8;
        let g = (srgb.green.clamp(0.0, 1.0) * 255.0).round() as u8;
        let b = (srgb.blue.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self { r, g, b }
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}
