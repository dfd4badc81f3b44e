//! Pixel-buffer load/store.

use contour_common::{ContourError, ContourResult, Image};
use std::path::Path;
use tracing::debug;

/// Decode an image file into an 8-bit RGB buffer.
pub fn load<P: AsRef<Path>>(path: P) -> ContourResult<Image> {
    let path = path.as_ref();
    let decoded = image::open(path).map_err(|e| ContourError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let image = Image::from_rgb_image(decoded.to_rgb8());
    debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        "Loaded image"
    );

    Ok(image)
}

/// Encode an image, choosing the format from the file extension.
///
/// A `.ppm` extension produces a binary `P6` pixmap.
pub fn store<P: AsRef<Path>>(image: &Image, path: P) -> ContourResult<()> {
    let path = path.as_ref();
    let buffer = image.to_rgb_image()?;

    buffer.save(path).map_err(|e| ContourError::Encode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        "Stored image"
    );

    Ok(())
}
