use std::collections::HashSet;
use std::path::Path;

use image::imageops::FilterType;
use kmeans_colors::{get_kmeans, get_kmeans_hamerly, Kmeans};
use palette::Lab;
use tracing::info;

use crate::color::Color;
use crate::config::ExtractionParams;
use crate::error::{Result, ThemeError};

/// Image extensions accepted as input, lowercase without the dot.
pub const SUPPORTED_EXTENSIONS: [&str; 6] = ["bmp", "gif", "jpeg", "jpg", "png", "webp"];

const MAX_DIM: u32 = 256;
const MAX_ITER: usize = 20;
const CONVERGE: f32 = 5.0;
const SEED: u64 = 42;

/// Something that can turn an image into an ordered list of dominant colors.
pub trait PaletteExtractor {
    fn extract(&self, image: &Path, params: &ExtractionParams) -> Result<Vec<Color>>;
}

/// Validate the image, run the extractor and check that it delivered.
///
/// The returned palette is exactly what the extractor produced; a palette
/// shorter than `params.count` is an error rather than a silent shortfall.
pub fn extract_palette(
    extractor: &dyn PaletteExtractor,
    image: &Path,
    params: &ExtractionParams,
) -> Result<Vec<Color>> {
    validate_image(image)?;

    info!(image = %image.display(), "extracting colors from image");
    info!(quality = params.quality, count = params.count, "extraction parameters");

    let palette = extractor.extract(image, params)?;
    if palette.is_empty() {
        return Err(ThemeError::Extraction("no colors found in image".to_string()));
    }
    if palette.len() < params.count {
        return Err(ThemeError::Extraction(format!(
            "only {} of {} requested colors found in {}",
            palette.len(),
            params.count,
            image.display()
        )));
    }

    info!(colors = palette.len(), "color extraction complete");
    Ok(palette)
}

/// Check that `image` is an existing regular file with a supported extension.
pub fn validate_image(image: &Path) -> Result<()> {
    if !image.exists() {
        return Err(ThemeError::Validation(format!(
            "image file not found: {}",
            image.display()
        )));
    }
    if !image.is_file() {
        return Err(ThemeError::Validation(format!(
            "path is not a file: {}",
            image.display()
        )));
    }

    let extension = image
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase());
    match extension {
        Some(ext) if SUPPORTED_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        other => Err(ThemeError::Validation(format!(
            "unsupported image format: {} (supported: {})",
            other.map_or_else(|| "(none)".to_string(), |ext| format!(".{ext}")),
            SUPPORTED_EXTENSIONS
                .iter()
                .map(|ext| format!(".{ext}"))
                .collect::<Vec<_>>()
                .join(", ")
        ))),
    }
}

/// Default extractor: K-means clustering in CIELAB space.
#[derive(Debug, Default, Clone, Copy)]
pub struct KMeansExtractor;

impl PaletteExtractor for KMeansExtractor {
    fn extract(&self, image: &Path, params: &ExtractionParams) -> Result<Vec<Color>> {
        let samples = load_samples(image, params.quality)?;

        let distinct = samples.iter().collect::<HashSet<_>>().len();
        if distinct < params.count {
            return Err(ThemeError::Extraction(format!(
                "image has only {distinct} distinct colors at quality {}, {} requested",
                params.quality, params.count
            )));
        }

        let pixels: Vec<Lab> = samples.iter().map(|c| c.to_lab()).collect();
        Ok(cluster(&pixels, params.count))
    }
}

/// Load an image, shrink it to fit within 256x256 (preserving aspect ratio)
/// and keep every `quality`-th pixel.
pub fn load_samples(path: &Path, quality: u32) -> Result<Vec<Color>> {
    let img = image::open(path).map_err(|e| {
        ThemeError::Extraction(format!("failed to decode image {}: {e}", path.display()))
    })?;

    let img = if img.width() > MAX_DIM || img.height() > MAX_DIM {
        img.resize(MAX_DIM, MAX_DIM, FilterType::Lanczos3)
    } else {
        img
    };

    let samples = img
        .to_rgb8()
        .pixels()
        .step_by(quality.max(1) as usize)
        .map(|p| Color::from(p.0))
        .collect();
    Ok(samples)
}

/// Run K-means on LAB pixels and return the non-empty cluster centers,
/// heaviest first.
pub fn cluster(pixels: &[Lab], k: usize) -> Vec<Color> {
    // Hamerly needs a second centroid to bound distances against.
    let result: Kmeans<Lab> = if k < 2 {
        get_kmeans(k, MAX_ITER, CONVERGE, false, pixels, SEED)
    } else {
        get_kmeans_hamerly(k, MAX_ITER, CONVERGE, false, pixels, SEED)
    };

    let mut counts = vec![0u32; result.centroids.len()];
    for &idx in &result.indices {
        counts[idx as usize] += 1;
    }

    let mut weighted: Vec<(u32, Color)> = result
        .centroids
        .iter()
        .zip(&counts)
        .filter(|(_, count)| **count > 0)
        .map(|(lab, &count)| (count, Color::from_lab(*lab)))
        .collect();

    // stable sort keeps centroid order among equal weights
    weighted.sort_by(|a, b| b.0.cmp(&a.0));
    weighted.into_iter().map(|(_, color)| color).collect()
}
