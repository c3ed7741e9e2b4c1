use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Every way a theme build can fail. Each variant is fatal to the run.
#[derive(Error, Debug)]
pub enum ThemeError {
    #[error("{0}")]
    Usage(String),

    #[error("configuration errors: {}", .0.join("; "))]
    Config(Vec<String>),

    #[error("{0}")]
    Validation(String),

    #[error("color extraction failed: {0}")]
    Extraction(String),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    FileSystem(#[from] FileSystemError),

    #[error("failed to print palette preview: {0}")]
    Preview(io::Error),

    #[error("interrupted by user")]
    Interrupted,
}

impl ThemeError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            ThemeError::Usage(_) => 2,
            ThemeError::Interrupted => 130,
            _ => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("template directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("template file not found: {0}")]
    NotFound(String),

    #[error("template syntax error in {name}{}: {message}", line_suffix(.line))]
    Syntax {
        name: String,
        line: Option<usize>,
        message: String,
    },

    #[error("template variable error in {name}: {message}")]
    Undefined { name: String, message: String },

    #[error("failed to render template {name}: {message}")]
    Render { name: String, message: String },
}

fn line_suffix(line: &Option<usize>) -> String {
    line.map(|l| format!(" at line {l}")).unwrap_or_default()
}

#[derive(Error, Debug)]
pub enum FileSystemError {
    #[error("permission denied {action} {}", .path.display())]
    PermissionDenied { action: &'static str, path: PathBuf },

    #[error("failed {action} {}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        source: io::Error,
    },

    #[error("source and destination are the same file: {}", .path.display())]
    SameFile { path: PathBuf },

    #[error("insufficient disk space: {available_mb}MB available, {required_mb}MB required")]
    DiskSpace { available_mb: u64, required_mb: u64 },
}

impl FileSystemError {
    /// Classify an I/O failure, keeping permission denial distinct.
    pub fn from_io(action: &'static str, path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::PermissionDenied {
            FileSystemError::PermissionDenied {
                action,
                path: path.to_path_buf(),
            }
        } else {
            FileSystemError::Io {
                action,
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ThemeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_are_joined_on_one_line() {
        let err = ThemeError::Config(vec![
            "missing required 'colors.count'".into(),
            "files.templates must be a non-empty list".into(),
        ]);
        let msg = err.to_string();
        assert_eq!(
            msg,
            "configuration errors: missing required 'colors.count'; files.templates must be a non-empty list"
        );
        assert!(!msg.contains('\n'));
    }

    #[test]
    fn syntax_error_reports_line_when_known() {
        let err = TemplateError::Syntax {
            name: "gtk.css.j2".into(),
            line: Some(3),
            message: "unexpected end of input".into(),
        };
        assert_eq!(
            err.to_string(),
            "template syntax error in gtk.css.j2 at line 3: unexpected end of input"
        );

        let err = TemplateError::Syntax {
            name: "gtk.css.j2".into(),
            line: None,
            message: "bad".into(),
        };
        assert_eq!(err.to_string(), "template syntax error in gtk.css.j2: bad");
    }

    #[test]
    fn permission_denied_is_kept_apart_from_other_io() {
        let path = Path::new("/tmp/out/theme.css");
        let denied = FileSystemError::from_io(
            "writing to",
            path,
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(denied, FileSystemError::PermissionDenied { .. }));
        assert_eq!(denied.to_string(), "permission denied writing to /tmp/out/theme.css");

        let other = FileSystemError::from_io("writing to", path, io::Error::other("disk on fire"));
        assert!(matches!(other, FileSystemError::Io { .. }));
        assert_eq!(other.to_string(), "failed writing to /tmp/out/theme.css");
        let source = std::error::Error::source(&other).unwrap();
        assert_eq!(source.to_string(), "disk on fire");

        // the binary prints the whole chain on one line
        let top = anyhow::Error::from(ThemeError::from(other));
        assert_eq!(
            format!("{top:#}"),
            "failed writing to /tmp/out/theme.css: disk on fire"
        );
    }

    #[test]
    fn exit_codes() {
        assert_eq!(ThemeError::Usage("bad".into()).exit_code(), 2);
        assert_eq!(ThemeError::Interrupted.exit_code(), 130);
        assert_eq!(ThemeError::Validation("bad".into()).exit_code(), 1);
        assert_eq!(ThemeError::Config(vec![]).exit_code(), 1);
    }
}
