//! One run of the tool, start to finish.
//!
//! The order is fixed: check templates, extract, format, optionally preview,
//! then render and write each template, then optionally mirror. Any error
//! ends the run; files written before it stay on disk.

use std::io::Write;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::backends::jinja::JinjaBackend;
use crate::backends::TemplateBackend;
use crate::config::Config;
use crate::error::{Result, TemplateError};
use crate::interrupt::Interrupt;
use crate::output::{self, ESTIMATED_OUTPUT_MB};
use crate::pipeline::extract::{extract_palette, KMeansExtractor, PaletteExtractor};
use crate::pipeline::format::FormattedPalette;
use crate::preview;
use crate::theme::ImageTheme;

/// Per-invocation inputs that come from the command line.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub image: PathBuf,
    pub alpha: f32,
    pub preview: bool,
}

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub palette: FormattedPalette,
    pub output_dir: PathBuf,
    pub written: Vec<PathBuf>,
    pub mirrored_to: Option<PathBuf>,
}

/// Run with the default collaborators, previewing to stdout.
pub fn run(options: &RunOptions, config: &Config, interrupt: &Interrupt) -> Result<RunReport> {
    let backend = JinjaBackend::new(&config.files.template_dir)?;
    debug!(root = %backend.root().display(), "loaded template directory");

    let mut stdout = std::io::stdout();
    run_with(
        options,
        config,
        &KMeansExtractor,
        &backend,
        &mut stdout,
        interrupt,
    )
}

/// Run with explicit collaborators. `preview_out` only receives output when
/// `options.preview` is set.
pub fn run_with(
    options: &RunOptions,
    config: &Config,
    extractor: &dyn PaletteExtractor,
    backend: &dyn TemplateBackend,
    mut preview_out: &mut dyn Write,
    interrupt: &Interrupt,
) -> Result<RunReport> {
    for template in &config.files.templates {
        if !backend.has_template(template) {
            return Err(TemplateError::NotFound(template.clone()).into());
        }
    }
    debug!(
        backend = backend.name(),
        templates = config.files.templates.len(),
        "templates resolved"
    );

    interrupt.check()?;
    let colors = extract_palette(extractor, &options.image, &config.colors)?;

    interrupt.check()?;
    let palette = FormattedPalette::new(&colors, options.alpha)?;
    debug!(palette = ?palette.hex, "palette formatted");

    if options.preview {
        preview::print_palette(&mut preview_out, &palette.hex)?;
    }

    let theme = ImageTheme::new(&options.image, palette, &config.files.output_dir)?;
    let mut space_targets = vec![theme.output_dir()];
    if let Some(final_dir) = &config.files.final_dir {
        space_targets.push(final_dir.as_path());
    }
    output::check_disk_space(&space_targets, ESTIMATED_OUTPUT_MB)?;

    let mut written = Vec::with_capacity(config.files.templates.len());
    for template in &config.files.templates {
        interrupt.check()?;
        written.push(theme.write_template(backend, template)?);
    }
    debug!(files = written.len(), dir = %theme.output_dir().display(), "templates written");

    let mirrored_to = match &config.files.final_dir {
        Some(final_dir) => {
            interrupt.check()?;
            let dest = theme.install(final_dir)?;
            debug!(dest = %dest.display(), "output mirrored");
            Some(dest)
        }
        None => None,
    };

    info!(
        output = %theme.output_dir().display(),
        files = written.len(),
        "theme generated"
    );

    Ok(RunReport {
        output_dir: theme.output_dir().to_path_buf(),
        palette: theme.palette,
        written,
        mirrored_to,
    })
}
