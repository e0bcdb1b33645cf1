use std::path::{Path, PathBuf};

use image::{ImageReader, RgbaImage};
use log::info;

use crate::error::SplitError;

/// Extensions offered by the open dialog
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "bmp", "jpg", "jpeg", "gif", "webp"];

/// The spritesheet being split, decoded to RGBA. Read-only once loaded.
#[derive(Debug, Clone)]
pub struct SourceImage {
    /// File the image was loaded from
    pub path: PathBuf,
    pub pixels: RgbaImage,
}

impl SourceImage {
    pub fn new(path: impl Into<PathBuf>, pixels: RgbaImage) -> Self {
        Self {
            path: path.into(),
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// File name for status messages
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Check whether a path has one of the offered image extensions
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Decode an image file into RGBA.
///
/// The format is guessed from the file contents, so a mislabelled extension
/// still loads.
pub fn load_source_image(path: &Path) -> Result<SourceImage, SplitError> {
    let load_error = |source: image::ImageError| SplitError::ImageLoad {
        path: path.to_path_buf(),
        source,
    };

    let pixels = ImageReader::open(path)
        .map_err(|e| load_error(e.into()))?
        .with_guessed_format()
        .map_err(|e| load_error(e.into()))?
        .decode()
        .map_err(load_error)?
        .into_rgba8();

    info!(
        "Loaded {} ({}x{})",
        path.display(),
        pixels.width(),
        pixels.height()
    );

    Ok(SourceImage::new(path, pixels))
}
