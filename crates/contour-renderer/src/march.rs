//! March phase: replace each grid cell's pixels with its contour stamp.

use contour_common::{Image, Rgb};

use crate::grid::{cell_configuration, BinaryGrid, GridLayout};
use crate::partition::Partition;
use crate::stamps::StampTable;

/// Stamp every cell in cell rows `band`.
///
/// `rows` holds pixel rows `band.start * step .. band.end * step` of the
/// working image. `cells` is the complete, already sampled grid.
pub fn march_rows(
    rows: &mut [Rgb<u8>],
    cells: &[u8],
    layout: &GridLayout,
    band: Partition,
    stamps: &StampTable,
) {
    let step = layout.step;
    let width = layout.width;
    debug_assert_eq!(stamps.step(), step);
    debug_assert_eq!(rows.len(), band.len() * step * width);

    for i in band.range() {
        let base_row = (i - band.start) * step;
        for j in 0..layout.q {
            let k = cell_configuration(cells, layout, i, j);
            let stamp = stamps.get(k);
            let x = j * step;

            for sy in 0..step {
                let start = (base_row + sy) * width + x;
                rows[start..start + step].copy_from_slice(stamp.row(sy));
            }
        }
    }
}

/// Stamp a whole image on the calling thread.
pub fn march_image(image: &mut Image, grid: &BinaryGrid, stamps: &StampTable) {
    let layout = *grid.layout();
    assert_eq!(
        (layout.width / layout.step, layout.height / layout.step),
        (image.width() / layout.step, image.height() / layout.step),
        "grid does not match image"
    );
    let layout = GridLayout { width: image.width(), ..layout };
    let band = Partition { start: 0, end: layout.p };
    let end = band.end * layout.step * layout.width;
    march_rows(&mut image.pixels_mut()[..end], grid.cells(), &layout, band, stamps);
}
