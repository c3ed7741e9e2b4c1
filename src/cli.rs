use std::path::PathBuf;

use clap::Parser;

use crate::error::{Result, ThemeError};

/// Generate theme files from an image's color palette.
#[derive(Parser, Debug)]
#[command(name = "theme-builder", version, about)]
pub struct Args {
    /// Path to the input image
    pub image: PathBuf,

    /// Alpha value for RGBA colors (0.0-1.0)
    #[arg(short, long, default_value_t = 1.0, value_parser = parse_alpha)]
    pub alpha: f32,

    /// Print the generated color palette to the terminal
    #[arg(short, long)]
    pub preview: bool,

    /// Enable verbose terminal output
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,
}

impl Args {
    /// Checks clap cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.image.as_os_str().is_empty() {
            return Err(ThemeError::Usage("image file path is required".to_string()));
        }
        Ok(())
    }
}

fn parse_alpha(value: &str) -> std::result::Result<f32, String> {
    let alpha: f32 = value
        .trim()
        .parse()
        .map_err(|_| format!("Invalid alpha value: {value}"))?;
    if !(0.0..=1.0).contains(&alpha) {
        return Err(format!(
            "Alpha value must be between 0.0 and 1.0, got {alpha}"
        ));
    }
    Ok(alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["theme-builder", "photo.png"]).unwrap();
        assert_eq!(args.image, PathBuf::from("photo.png"));
        assert_eq!(args.alpha, 1.0);
        assert!(!args.preview);
        assert!(!args.verbose);
        assert_eq!(args.config, PathBuf::from("config.toml"));
    }

    #[test]
    fn short_flags() {
        let args =
            Args::try_parse_from(["theme-builder", "-a", "0.5", "-p", "-v", "-c", "x.toml", "p.jpg"])
                .unwrap();
        assert_eq!(args.alpha, 0.5);
        assert!(args.preview);
        assert!(args.verbose);
        assert_eq!(args.config, PathBuf::from("x.toml"));
    }

    #[test]
    fn alpha_out_of_range_is_a_usage_error() {
        let err = Args::try_parse_from(["theme-builder", "--alpha", "1.5", "p.png"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("between 0.0 and 1.0"));
    }

    #[test]
    fn alpha_not_a_number() {
        let err = Args::try_parse_from(["theme-builder", "--alpha", "opaque", "p.png"]).unwrap_err();
        assert!(err.to_string().contains("Invalid alpha value: opaque"));
    }

    #[test]
    fn nan_alpha_is_rejected() {
        assert!(parse_alpha("NaN").is_err());
        assert_eq!(parse_alpha("0").unwrap(), 0.0);
        assert_eq!(parse_alpha("1.0").unwrap(), 1.0);
    }

    #[test]
    fn image_is_required() {
        let err = Args::try_parse_from(["theme-builder"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn empty_image_path_fails_validation() {
        let args = Args {
            image: PathBuf::new(),
            alpha: 1.0,
            preview: false,
            verbose: false,
            config: PathBuf::from("config.toml"),
        };
        let err = args.validate().unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
