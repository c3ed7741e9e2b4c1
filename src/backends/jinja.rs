use std::path::{Path, PathBuf};

use minijinja::{path_loader, Environment, ErrorKind, UndefinedBehavior};

use crate::error::{Result, TemplateError};
use crate::pipeline::format::FormattedPalette;

use super::TemplateBackend;

/// Jinja-syntax templates loaded from a directory.
///
/// Undefined variables and out-of-range palette indexes are errors at render
/// time instead of rendering as empty strings.
pub struct JinjaBackend {
    root: PathBuf,
    env: Environment<'static>,
}

impl JinjaBackend {
    pub fn new(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(TemplateError::DirectoryNotFound(root.to_path_buf()).into());
        }

        let mut env = Environment::new();
        env.set_loader(path_loader(root));
        env.set_undefined_behavior(UndefinedBehavior::Strict);

        Ok(Self {
            root: root.to_path_buf(),
            env,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TemplateBackend for JinjaBackend {
    fn name(&self) -> &str {
        "Jinja"
    }

    fn has_template(&self, template: &str) -> bool {
        // same segment rules the loader applies
        let safe = template
            .split('/')
            .all(|segment| !segment.is_empty() && segment != "." && segment != "..");
        safe && self.root.join(template).is_file()
    }

    fn render(&self, template: &str, palette: &FormattedPalette) -> Result<String> {
        let tmpl = self
            .env
            .get_template(template)
            .map_err(|e| classify(template, e))?;
        let rendered = tmpl.render(palette).map_err(|e| classify(template, e))?;
        Ok(rendered)
    }
}

fn classify(template: &str, err: minijinja::Error) -> TemplateError {
    let name = template.to_string();
    let message = err
        .detail()
        .map(str::to_string)
        .unwrap_or_else(|| err.to_string());

    match err.kind() {
        ErrorKind::TemplateNotFound => TemplateError::NotFound(name),
        ErrorKind::SyntaxError => TemplateError::Syntax {
            name,
            line: err.line(),
            message,
        },
        ErrorKind::UndefinedError => TemplateError::Undefined { name, message },
        _ => TemplateError::Render { name, message },
    }
}
