//! Settings file loading.
//!
//! The file is TOML with two sections:
//!
//! ```toml
//! [colors]
//! quality = 10
//! count = 8
//!
//! [files]
//! templates = ["swaync.css.j2", "waybar.css.j2"]
//! final_dir = "/home/me/.config/theme"   # optional
//! template_dir = "templates"             # optional
//! output_dir = "build"                   # optional
//! ```
//!
//! Every violation is collected before failing so the user can fix them in
//! one pass.

use std::io;
use std::path::{Path, PathBuf};

use toml::{Table, Value};

use crate::error::{Result, ThemeError};

pub const MAX_COLOR_COUNT: i64 = 20;
pub const DEFAULT_TEMPLATE_DIR: &str = "templates";

/// How the palette is sampled from the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionParams {
    /// Sampling stride; larger values look at fewer pixels.
    pub quality: u32,
    /// Number of palette entries requested, 1..=20.
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilesConfig {
    pub templates: Vec<String>,
    pub final_dir: Option<PathBuf>,
    pub template_dir: PathBuf,
    /// Root under which the per-image directory is created.
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub colors: ExtractionParams,
    pub files: FilesConfig,
}

impl Config {
    /// Read and validate the settings file at `path`.
    ///
    /// Relative directories inside the file resolve against the file's own
    /// directory. Without `output_dir` the per-image directory goes into the
    /// working directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            let message = match e.kind() {
                io::ErrorKind::NotFound => {
                    format!("configuration file not found: {}", path.display())
                }
                io::ErrorKind::PermissionDenied => {
                    format!("permission denied reading config file: {}", path.display())
                }
                _ => format!("failed to read config file {}: {e}", path.display()),
            };
            ThemeError::Config(vec![message])
        })?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Self::parse(&text, base)
    }

    /// Parse settings text, resolving relative paths against `base`.
    pub fn parse(text: &str, base: &Path) -> Result<Self> {
        let table: Table = toml::from_str(text).map_err(|e| {
            ThemeError::Config(vec![format!(
                "invalid TOML in config file: {}",
                e.message()
            )])
        })?;
        validate(&table, base).map_err(ThemeError::Config)
    }
}

/// Validate the raw document, collecting every problem found.
pub fn validate(table: &Table, base: &Path) -> std::result::Result<Config, Vec<String>> {
    let mut errors = Vec::new();

    let colors = section(table, "colors", &mut errors)
        .and_then(|colors| validate_colors(colors, &mut errors));
    let files =
        section(table, "files", &mut errors).and_then(|files| validate_files(files, base, &mut errors));

    match (colors, files) {
        (Some(colors), Some(files)) if errors.is_empty() => Ok(Config { colors, files }),
        _ => Err(errors),
    }
}

fn section<'a>(table: &'a Table, name: &str, errors: &mut Vec<String>) -> Option<&'a Table> {
    match table.get(name) {
        None => {
            errors.push(format!("missing required [{name}] section"));
            None
        }
        Some(Value::Table(section)) => Some(section),
        Some(_) => {
            errors.push(format!("[{name}] must be a table"));
            None
        }
    }
}

fn validate_colors(colors: &Table, errors: &mut Vec<String>) -> Option<ExtractionParams> {
    let quality = match colors.get("quality") {
        None => {
            errors.push("missing required 'colors.quality'".to_string());
            None
        }
        Some(Value::Integer(q)) if *q > i64::from(u32::MAX) => {
            errors.push(format!("colors.quality too large (max: {})", u32::MAX));
            None
        }
        Some(Value::Integer(q)) if *q >= 1 => Some(*q as u32),
        Some(_) => {
            errors.push("colors.quality must be a positive integer".to_string());
            None
        }
    };

    let count = match colors.get("count") {
        None => {
            errors.push("missing required 'colors.count'".to_string());
            None
        }
        Some(Value::Integer(c)) if *c <= 0 => {
            errors.push("colors.count must be a positive integer".to_string());
            None
        }
        Some(Value::Integer(c)) if *c > MAX_COLOR_COUNT => {
            errors.push(format!("colors.count too large (max: {MAX_COLOR_COUNT})"));
            None
        }
        Some(Value::Integer(c)) => Some(*c as usize),
        Some(_) => {
            errors.push("colors.count must be a positive integer".to_string());
            None
        }
    };

    Some(ExtractionParams {
        quality: quality?,
        count: count?,
    })
}

fn validate_files(files: &Table, base: &Path, errors: &mut Vec<String>) -> Option<FilesConfig> {
    let templates = match files.get("templates") {
        None => {
            errors.push("missing required 'files.templates'".to_string());
            None
        }
        Some(Value::Array(items)) if !items.is_empty() => {
            let mut names = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                match item {
                    Value::String(name) if !name.is_empty() => names.push(name.clone()),
                    _ => errors.push(format!("files.templates[{i}] must be a non-empty string")),
                }
            }
            (names.len() == items.len()).then_some(names)
        }
        Some(_) => {
            errors.push("files.templates must be a non-empty list".to_string());
            None
        }
    };

    let final_dir = optional_dir(files, "final_dir", base, errors);
    let template_dir = optional_dir(files, "template_dir", base, errors)
        .unwrap_or_else(|| base.join(DEFAULT_TEMPLATE_DIR));
    let output_dir = optional_dir(files, "output_dir", base, errors).unwrap_or_default();

    Some(FilesConfig {
        templates: templates?,
        final_dir,
        template_dir,
        output_dir,
    })
}

/// An optional directory key; an empty string counts as unset.
fn optional_dir(files: &Table, key: &str, base: &Path, errors: &mut Vec<String>) -> Option<PathBuf> {
    match files.get(key) {
        None => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(Value::String(s)) => Some(base.join(s)),
        Some(_) => {
            errors.push(format!("files.{key} must be a string"));
            None
        }
    }
}
