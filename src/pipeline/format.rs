use serde::Serialize;

use crate::color::Color;
use crate::error::{Result, ThemeError};

/// The palette as templates see it: `palette` holds `#RRGGBB` strings and
/// `rgba` the index-aligned `#RRGGBBAA` strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedPalette {
    #[serde(rename = "palette")]
    pub hex: Vec<String>,
    pub rgba: Vec<String>,
}

impl FormattedPalette {
    pub fn new(palette: &[Color], alpha: f32) -> Result<Self> {
        Ok(Self {
            hex: to_hex(palette)?,
            rgba: to_rgba(palette, alpha)?,
        })
    }
}

/// Map each color to `#RRGGBB`, uppercase and zero-padded.
pub fn to_hex(palette: &[Color]) -> Result<Vec<String>> {
    ensure_not_empty(palette)?;
    Ok(palette.iter().map(|c| c.to_hex()).collect())
}

/// Map each color to `#RRGGBBAA` using one shared alpha.
pub fn to_rgba(palette: &[Color], alpha: f32) -> Result<Vec<String>> {
    ensure_not_empty(palette)?;
    let a = alpha_to_byte(alpha)?;
    Ok(palette.iter().map(|c| c.to_hex_alpha(a)).collect())
}

/// Scale an alpha in [0.0, 1.0] to a byte by multiplying by 255 and
/// truncating (0.5 becomes 0x7F, not 0x80).
pub fn alpha_to_byte(alpha: f32) -> Result<u8> {
    let scaled = (alpha * 255.0).trunc();
    if !(0.0..=255.0).contains(&scaled) {
        return Err(ThemeError::Validation(format!("invalid alpha value: {alpha}")));
    }
    Ok(scaled as u8)
}

fn ensure_not_empty(palette: &[Color]) -> Result<()> {
    if palette.is_empty() {
        return Err(ThemeError::Validation("color palette is empty".to_string()));
    }
    Ok(())
}
