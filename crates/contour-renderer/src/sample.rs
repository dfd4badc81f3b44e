//! Sample phase: threshold the working image into the binary grid.
//!
//! Interior grid point `(i, j)` reads the pixel at row `i * step`, column
//! `j * step`. The closing row `p` and column `q` read the image's true last
//! row and column instead of step-aligned pixels.

use contour_common::{Image, Rgb};

use crate::grid::{BinaryGrid, GridLayout};
use crate::partition::Partition;

/// Unweighted channel mean, truncated.
#[inline]
pub fn luminance(pixel: Rgb<u8>) -> u8 {
    let [r, g, b] = pixel.0;
    ((r as u16 + g as u16 + b as u16) / 3) as u8
}

/// 1 for pixels at or below `threshold` (inside the contour), else 0.
#[inline]
pub fn classify(pixel: Rgb<u8>, threshold: u8) -> u8 {
    if luminance(pixel) > threshold {
        0
    } else {
        1
    }
}

#[inline]
fn pixel_at(pixels: &[Rgb<u8>], layout: &GridLayout, row: usize, col: usize) -> Rgb<u8> {
    pixels[row * layout.width + col]
}

/// Sample interior grid rows `band` (all columns `0..q`).
///
/// `set(index, value)` receives the flat grid index of every point written.
pub fn sample_rows<F>(pixels: &[Rgb<u8>], layout: &GridLayout, band: Partition, threshold: u8, mut set: F)
where
    F: FnMut(usize, u8),
{
    for i in band.range() {
        let row = i * layout.step;
        for j in 0..layout.q {
            let pixel = pixel_at(pixels, layout, row, j * layout.step);
            set(layout.index(i, j), classify(pixel, threshold));
        }
    }
}

/// Sample the closing column `q`, the closing row `p` and the corner `(p, q)`.
///
/// Must run on exactly one worker, after that worker's own rows.
pub fn sample_boundary<F>(pixels: &[Rgb<u8>], layout: &GridLayout, threshold: u8, mut set: F)
where
    F: FnMut(usize, u8),
{
    debug_assert!(layout.width > 0 && layout.height > 0);
    let last_col = layout.width - 1;
    let last_row = layout.height - 1;

    for i in 0..layout.p {
        let pixel = pixel_at(pixels, layout, i * layout.step, last_col);
        set(layout.index(i, layout.q), classify(pixel, threshold));
    }

    for j in 0..layout.q {
        let pixel = pixel_at(pixels, layout, last_row, j * layout.step);
        set(layout.index(layout.p, j), classify(pixel, threshold));
    }

    let corner = pixel_at(pixels, layout, last_row, last_col);
    set(layout.index(layout.p, layout.q), classify(corner, threshold));
}

/// Build the whole grid on the calling thread.
pub fn sample_grid(image: &Image, step: usize, threshold: u8) -> BinaryGrid {
    let layout = GridLayout::new(image.width(), image.height(), step);
    let mut cells = vec![0u8; layout.cell_count()];

    let band = Partition { start: 0, end: layout.p };
    sample_rows(image.pixels(), &layout, band, threshold, |idx, v| cells[idx] = v);
    if !image.is_empty() {
        sample_boundary(image.pixels(), &layout, threshold, |idx, v| cells[idx] = v);
    }

    BinaryGrid::from_cells(layout, cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_luminance_is_truncated_mean() {
        assert_eq!(luminance(Rgb([255, 255, 255])), 255);
        assert_eq!(luminance(Rgb([1, 1, 0])), 0);
        assert_eq!(luminance(Rgb([200, 201, 202])), 201);
    }

    #[test]
    fn test_threshold_is_inclusive_for_dark() {
        assert_eq!(classify(Rgb([200, 200, 200]), 200), 1);
        assert_eq!(classify(Rgb([201, 201, 201]), 200), 0);
        assert_eq!(classify(Rgb([0, 0, 0]), 0), 1);
    }

    #[test]
    fn test_boundary_reads_last_row_and_column() {
        // 20x20 at step 8: p = q = 2, step-aligned samples at 0 and 8,
        // boundary samples at 19.
        let mut img = Image::filled(20, 20, Rgb([255, 255, 255]));
        for k in 0..20 {
            img.put(19, k, Rgb([0, 0, 0]));
            img.put(k, 19, Rgb([0, 0, 0]));
        }

        let grid = sample_grid(&img, 8, 200);
        for i in 0..2 {
            for j in 0..2 {
                assert_eq!(grid.get(i, j), 0);
            }
            assert_eq!(grid.get(i, 2), 1, "closing column row {}", i);
            assert_eq!(grid.get(2, i), 1, "closing row column {}", i);
        }
        assert_eq!(grid.get(2, 2), 1);
    }

    #[test]
    fn test_interior_reads_step_aligned_pixels() {
        let mut img = Image::filled(16, 16, Rgb([255, 255, 255]));
        img.put(8, 0, Rgb([0, 0, 0])); // row 0, column 8 -> (0, 1)
        img.put(0, 8, Rgb([10, 10, 10])); // row 8, column 0 -> (1, 0)

        let grid = sample_grid(&img, 8, 200);
        assert_eq!(grid.get(0, 0), 0);
        assert_eq!(grid.get(0, 1), 1);
        assert_eq!(grid.get(1, 0), 1);
        assert_eq!(grid.get(1, 1), 0);
    }

    #[test]
    fn test_image_smaller_than_step() {
        let img = Image::filled(5, 3, Rgb([0, 0, 0]));
        let grid = sample_grid(&img, 8, 200);
        assert_eq!((grid.rows(), grid.cols()), (1, 1));
        assert_eq!(grid.get(0, 0), 1);
    }
}
