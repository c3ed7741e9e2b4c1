//! Text-output collaborators. A backend turns a formatted palette into the
//! contents of one output file per template.

pub mod jinja;

use crate::error::Result;
use crate::pipeline::format::FormattedPalette;

pub trait TemplateBackend {
    /// Human-readable name for logs.
    fn name(&self) -> &str;

    /// Whether `template` resolves to a template this backend can load.
    fn has_template(&self, template: &str) -> bool;

    /// Render `template` with `palette` and `rgba` bound from `palette`.
    fn render(&self, template: &str, palette: &FormattedPalette) -> Result<String>;
}
