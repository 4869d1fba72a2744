//! Pure Rust image processing backend — zero external dependencies.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::image_dimensions` (header read, no full decode) |
//! | Decode (JPEG, PNG, TIFF, WebP) | `image` crate (pure Rust decoders) |
//! | Resize | `image::imageops::resize` with `Lanczos3` filter |
//! | Encode | `image::DynamicImage::save` (format from output extension) |

use super::backend::{BackendError, Dimensions, ImageBackend, ThumbnailParams};
use image::ImageFormat;
use image::imageops::FilterType;
use std::path::Path;

/// Extensions whose decoders are compiled in.
const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tif", "tiff", "webp"];

/// Returns the image file extensions that have working codecs compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    SUPPORTED_EXTENSIONS
}

fn check_supported(path: &Path) -> Result<(), BackendError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
        Ok(())
    } else {
        Err(BackendError::UnsupportedFormat(format!(
            "{} ({})",
            ext,
            path.display()
        )))
    }
}

/// Pure Rust backend using the `image` crate.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        check_supported(path)?;
        let (width, height) = image::image_dimensions(path).map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Ok(Dimensions { width, height })
    }

    fn thumbnail(&self, params: &ThumbnailParams) -> Result<(), BackendError> {
        check_supported(&params.source)?;
        let img = image::open(&params.source).map_err(|e| {
            BackendError::ProcessingFailed(format!(
                "Failed to decode {}: {}",
                params.source.display(),
                e
            ))
        })?;

        let resized = img.resize_exact(params.width, params.height, FilterType::Lanczos3);

        // `save` infers the format from the extension; guard against outputs
        // the compiled codecs cannot encode before doing the pixel work.
        if ImageFormat::from_path(&params.output).is_err() {
            return Err(BackendError::UnsupportedFormat(format!(
                "{}",
                params.output.display()
            )));
        }
        resized.save(&params.output).map_err(|e| {
            BackendError::ProcessingFailed(format!(
                "Failed to write {}: {}",
                params.output.display(),
                e
            ))
        })
    }
}
