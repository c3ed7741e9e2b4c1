//! Image to palette: extraction, then string formatting for templates.

pub mod extract;
pub mod format;
