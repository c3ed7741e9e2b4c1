use std::io::Write;

use crossterm::queue;
use crossterm::style::{Color as TermColor, Print, ResetColor, SetBackgroundColor};

use crate::color::Color;
use crate::error::{Result, ThemeError};

/// Print one 24-bit background swatch per hex color followed by the hex
/// value. Nothing written here feeds into the generated files.
pub fn print_palette<W: Write>(out: &mut W, hex_palette: &[String]) -> Result<()> {
    writeln!(out).map_err(ThemeError::Preview)?;
    writeln!(out, "Palette Preview:").map_err(ThemeError::Preview)?;

    for hex in hex_palette {
        let c = Color::from_hex(hex)?;
        queue!(
            out,
            SetBackgroundColor(TermColor::Rgb {
                r: c.r,
                g: c.g,
                b: c.b
            }),
            Print("  "),
            ResetColor,
            Print(format!(" {hex}\n"))
        )
        .map_err(ThemeError::Preview)?;
    }

    writeln!(out).map_err(ThemeError::Preview)?;
    out.flush().map_err(ThemeError::Preview)
}
