use std::path::{Path, PathBuf};

use tracing::debug;

use crate::backends::TemplateBackend;
use crate::error::{Result, ThemeError};
use crate::output;
use crate::pipeline::format::FormattedPalette;

/// Generated theme files for one source image.
///
/// Output goes into `<output_root>/<image stem>/`, one file per template.
#[derive(Debug, Clone)]
pub struct ImageTheme {
    image: PathBuf,
    stem: String,
    output_dir: PathBuf,
    pub palette: FormattedPalette,
}

impl ImageTheme {
    pub fn new(image: &Path, palette: FormattedPalette, output_root: &Path) -> Result<Self> {
        let stem = image
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                ThemeError::Validation(format!("image path has no file name: {}", image.display()))
            })?;

        Ok(Self {
            image: image.to_path_buf(),
            output_dir: output_root.join(&stem),
            stem,
            palette,
        })
    }

    pub fn stem(&self) -> &str {
        &self.stem
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Render one template and write it into the output directory.
    pub fn write_template(&self, backend: &dyn TemplateBackend, template: &str) -> Result<PathBuf> {
        let content = backend.render(template, &self.palette)?;
        let path = output::write_file(&self.output_dir, &output_file_name(template), &content)?;
        debug!(template, path = %path.display(), "wrote template");
        Ok(path)
    }

    /// Copy the source image in as `wallpaper.<ext>` and merge the output
    /// directory into `final_dir/<stem>`. Returns the mirrored directory.
    pub fn install(&self, final_dir: &Path) -> Result<PathBuf> {
        let wallpaper = self.output_dir.join(wallpaper_name(&self.image));
        output::copy_file(&self.image, &wallpaper)?;
        debug!(path = %wallpaper.display(), "copied wallpaper");

        let dest = final_dir.join(&self.stem);
        output::copy_dir_merge(&self.output_dir, &dest)?;
        Ok(dest)
    }
}

/// Output file for a template: its last extension is dropped and any
/// subdirectory kept, so `gtk/colors.css.j2` becomes `gtk/colors.css`.
pub fn output_file_name(template: &str) -> PathBuf {
    Path::new(template).with_extension("")
}

fn wallpaper_name(image: &Path) -> String {
    match image.extension() {
        Some(ext) => format!("wallpaper.{}", ext.to_string_lossy()),
        None => "wallpaper".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::error::{FileSystemError, TemplateError};

    struct EchoBackend;

    impl TemplateBackend for EchoBackend {
        fn name(&self) -> &str {
            "echo"
        }

        fn has_template(&self, template: &str) -> bool {
            template != "missing.j2"
        }

        fn render(&self, template: &str, palette: &FormattedPalette) -> Result<String> {
            if !self.has_template(template) {
                return Err(TemplateError::NotFound(template.to_string()).into());
            }
            Ok(format!("{template}: {}", palette.hex.join(",")))
        }
    }

    fn palette() -> FormattedPalette {
        FormattedPalette::new(&[Color::new(1, 2, 3), Color::new(250, 251, 252)], 1.0).unwrap()
    }

    #[test]
    fn output_names_drop_the_template_extension() {
        assert_eq!(output_file_name("swaync.css.j2"), PathBuf::from("swaync.css"));
        assert_eq!(output_file_name("gtk/colors.css.j2"), PathBuf::from("gtk/colors.css"));
        assert_eq!(output_file_name("README"), PathBuf::from("README"));
    }

    #[test]
    fn wallpaper_keeps_original_extension() {
        assert_eq!(wallpaper_name(Path::new("/pics/photo.png")), "wallpaper.png");
        assert_eq!(wallpaper_name(Path::new("/pics/Photo.JPG")), "wallpaper.JPG");
        assert_eq!(wallpaper_name(Path::new("/pics/photo")), "wallpaper");
    }

    #[test]
    fn output_dir_is_named_after_image_stem() {
        let theme = ImageTheme::new(Path::new("/pics/sunset.beach.jpg"), palette(), Path::new("out"))
            .unwrap();
        assert_eq!(theme.stem(), "sunset.beach");
        assert_eq!(theme.output_dir(), Path::new("out/sunset.beach"));
    }

    #[test]
    fn image_without_file_name_is_rejected() {
        let err = ImageTheme::new(Path::new("/"), palette(), Path::new("out")).unwrap_err();
        assert!(matches!(err, ThemeError::Validation(_)));
    }

    #[test]
    fn write_template_renders_into_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let theme = ImageTheme::new(Path::new("photo.png"), palette(), dir.path()).unwrap();

        let path = theme.write_template(&EchoBackend, "waybar.css.j2").unwrap();
        assert_eq!(path, dir.path().join("photo/waybar.css"));
        assert_eq!(
            std::fs::read_to_string(path).unwrap(),
            "waybar.css.j2: #010203,#FAFBFC"
        );
    }

    #[test]
    fn failed_render_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let theme = ImageTheme::new(Path::new("photo.png"), palette(), dir.path()).unwrap();

        assert!(theme.write_template(&EchoBackend, "missing.j2").is_err());
        assert!(!dir.path().join("photo").exists());
    }

    #[test]
    fn install_mirrors_output_and_wallpaper() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("photo.png");
        std::fs::write(&image, b"\x89PNG fake bytes").unwrap();
        let final_dir = dir.path().join("live");
        std::fs::create_dir_all(final_dir.join("photo")).unwrap();
        std::fs::write(final_dir.join("photo/extra.css"), "untouched").unwrap();

        let theme = ImageTheme::new(&image, palette(), &dir.path().join("build")).unwrap();
        theme.write_template(&EchoBackend, "swaync.css.j2").unwrap();
        let dest = theme.install(&final_dir).unwrap();

        assert_eq!(dest, final_dir.join("photo"));
        assert_eq!(
            std::fs::read(dest.join("wallpaper.png")).unwrap(),
            std::fs::read(&image).unwrap()
        );
        assert!(dest.join("swaync.css").exists());
        assert!(theme.output_dir().join("wallpaper.png").exists());
        assert_eq!(
            std::fs::read_to_string(dest.join("extra.css")).unwrap(),
            "untouched"
        );
    }

    #[test]
    fn install_refuses_to_copy_the_image_onto_itself() {
        let dir = tempfile::tempdir().unwrap();
        let build = dir.path().join("build");
        let image = build.join("wallpaper/wallpaper.png");
        std::fs::create_dir_all(image.parent().unwrap()).unwrap();
        std::fs::write(&image, b"\x89PNG fake bytes").unwrap();

        let theme = ImageTheme::new(&image, palette(), &build).unwrap();
        let err = theme.install(&dir.path().join("live")).unwrap_err();

        assert!(matches!(
            err,
            ThemeError::FileSystem(FileSystemError::SameFile { .. })
        ));
        assert_eq!(std::fs::read(&image).unwrap(), b"\x89PNG fake bytes");
        assert!(!dir.path().join("live").exists());
    }

    #[test]
    fn install_into_its_own_output_root_keeps_generated_files() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("photo.png");
        std::fs::write(&image, b"\x89PNG fake bytes").unwrap();
        let build = dir.path().join("build");

        let theme = ImageTheme::new(&image, palette(), &build).unwrap();
        let written = theme.write_template(&EchoBackend, "swaync.css.j2").unwrap();
        let err = theme.install(&build.join(".")).unwrap_err();

        assert!(err.to_string().contains("same file"), "got {err}");
        assert_eq!(
            std::fs::read_to_string(written).unwrap(),
            "swaync.css.j2: #010203,#FAFBFC"
        );
    }
}
