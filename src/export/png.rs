use std::io::Cursor;

use image::{ImageFormat, RgbaImage};

use crate::cli::CompressionLevel;
use crate::error::SplitError;

/// Encode an RGBA image as PNG bytes, optionally optimised with oxipng
pub fn encode_png(
    image: &RgbaImage,
    name: &str,
    compress: Option<CompressionLevel>,
) -> Result<Vec<u8>, SplitError> {
    let mut png_data = Cursor::new(Vec::new());
    image
        .write_to(&mut png_data, ImageFormat::Png)
        .map_err(|e| SplitError::ImageEncode {
            name: name.to_string(),
            source: e,
        })?;

    let Some(level) = compress else {
        return Ok(png_data.into_inner());
    };

    let opts = match level {
        CompressionLevel::Level(n) => oxipng::Options::from_preset(n),
        CompressionLevel::Max => oxipng::Options::max_compression(),
    };
    oxipng::optimize_from_memory(&png_data.into_inner(), &opts).map_err(|e| {
        SplitError::PngCompress {
            name: name.to_string(),
            message: e.to_string(),
        }
    })
}
