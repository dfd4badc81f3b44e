//! Rescale phase: bring oversized inputs down to the working bound.
//!
//! When either source dimension exceeds the configured maximum, the working
//! image is allocated at exactly `max_width x max_height` (aspect ratio is not
//! preserved) and every working pixel is resampled from the source. Otherwise
//! the source itself is the working image and this phase does nothing.

use contour_common::{ContourResult, Image, InterpolationMethod, PipelineConfig, Rgb};

use crate::partition::Partition;

/// Whether a `width x height` source exceeds the working bound.
pub fn needs_rescale(width: usize, height: usize, config: &PipelineConfig) -> bool {
    width > config.max_width || height > config.max_height
}

/// Working image dimensions for a `width x height` source.
pub fn working_dimensions(width: usize, height: usize, config: &PipelineConfig) -> (usize, usize) {
    if needs_rescale(width, height, config) {
        (config.max_width, config.max_height)
    } else {
        (width, height)
    }
}

/// Normalized coordinate of pixel `index` along an axis of `extent` pixels.
#[inline]
fn normalized(index: usize, extent: usize) -> f32 {
    if extent > 1 {
        index as f32 / (extent - 1) as f32
    } else {
        0.0
    }
}

/// Resample the pixel rows in `band` of a `width x height` target.
///
/// `rows` holds exactly those rows, row-major.
pub fn rescale_rows(
    source: &Image,
    rows: &mut [Rgb<u8>],
    width: usize,
    height: usize,
    band: Partition,
    method: InterpolationMethod,
) {
    debug_assert_eq!(rows.len(), band.len() * width);
    if width == 0 {
        return;
    }

    for (offset, row) in rows.chunks_exact_mut(width).enumerate() {
        let v = normalized(band.start + offset, height);
        for (x, pixel) in row.iter_mut().enumerate() {
            let u = normalized(x, width);
            *pixel = raster::sample(source, u, v, method);
        }
    }
}

/// Resample a whole image on the calling thread.
pub fn rescale_image(
    source: &Image,
    width: usize,
    height: usize,
    method: InterpolationMethod,
) -> ContourResult<Image> {
    let mut target = Image::try_new(width, height)?;
    let band = Partition { start: 0, end: height };
    rescale_rows(source, target.pixels_mut(), width, height, band, method);
    Ok(target)
}
