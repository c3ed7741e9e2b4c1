//! Extract a dominant color palette from an image and render it into text
//! templates, one output directory per image.

pub mod app;
pub mod backends;
pub mod cli;
pub mod color;
pub mod config;
pub mod error;
pub mod interrupt;
pub mod logging;
pub mod output;
pub mod pipeline;
pub mod preview;
pub mod theme;
