//! Binary sample grid and marching-squares configuration indices.

/// Geometry shared by the sample and march phases.
///
/// `p` counts cell rows and `q` cell columns of the working image; the grid
/// has one extra row and column closing the last cells at the image edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    /// Cell edge in pixels.
    pub step: usize,
    /// Working image width in pixels.
    pub width: usize,
    /// Working image height in pixels.
    pub height: usize,
    /// Number of full cell rows (`height / step`).
    pub p: usize,
    /// Number of full cell columns (`width / step`).
    pub q: usize,
}

impl GridLayout {
    pub fn new(width: usize, height: usize, step: usize) -> Self {
        assert!(step > 0, "grid step must be > 0");
        Self {
            step,
            width,
            height,
            p: height / step,
            q: width / step,
        }
    }

    /// Rows of grid points (`p + 1`).
    #[inline]
    pub fn rows(&self) -> usize {
        self.p + 1
    }

    /// Columns of grid points (`q + 1`).
    #[inline]
    pub fn cols(&self) -> usize {
        self.q + 1
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.rows() * self.cols()
    }

    /// Flat index of grid point `(i, j)`.
    #[inline]
    pub fn index(&self, i: usize, j: usize) -> usize {
        i * self.cols() + j
    }
}

/// Marching-squares configuration of one cell.
///
/// Corners are read clockwise from the top-left and weighted 8, 4, 2, 1.
#[inline]
pub fn configuration_index(top_left: u8, top_right: u8, bottom_right: u8, bottom_left: u8) -> u8 {
    8 * top_left + 4 * top_right + 2 * bottom_right + bottom_left
}

/// A `(p + 1) x (q + 1)` matrix of 0/1 samples.
///
/// A value of 1 marks a dark sample, inside the contour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryGrid {
    layout: GridLayout,
    cells: Vec<u8>,
}

impl BinaryGrid {
    pub(crate) fn from_cells(layout: GridLayout, cells: Vec<u8>) -> Self {
        debug_assert_eq!(cells.len(), layout.cell_count());
        Self { layout, cells }
    }

    /// Build a grid from rows of samples. Every row must have the same length.
    pub fn from_rows(step: usize, rows: &[Vec<u8>]) -> Self {
        let p = rows.len().saturating_sub(1);
        let q = rows.first().map_or(0, |r| r.len().saturating_sub(1));
        assert!(rows.iter().all(|r| r.len() == q + 1), "ragged grid rows");

        let layout = GridLayout {
            step,
            width: q * step,
            height: p * step,
            p,
            q,
        };
        let cells = rows.iter().flatten().copied().collect();
        Self { layout, cells }
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn rows(&self) -> usize {
        self.layout.rows()
    }

    pub fn cols(&self) -> usize {
        self.layout.cols()
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> u8 {
        self.cells[self.layout.index(i, j)]
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Configuration of cell `(i, j)` for `i < p`, `j < q`.
    #[inline]
    pub fn configuration(&self, i: usize, j: usize) -> u8 {
        cell_configuration(&self.cells, &self.layout, i, j)
    }

    /// Number of grid points set to 1.
    pub fn count_inside(&self) -> usize {
        self.cells.iter().filter(|&&c| c == 1).count()
    }
}

/// Configuration of cell `(i, j)` read from a flat cell slice.
#[inline]
pub(crate) fn cell_configuration(cells: &[u8], layout: &GridLayout, i: usize, j: usize) -> u8 {
    configuration_index(
        cells[layout.index(i, j)],
        cells[layout.index(i, j + 1)],
        cells[layout.index(i + 1, j + 1)],
        cells[layout.index(i + 1, j)],
    )
}
