//! Contour stamp table: one `step x step` tile per cell configuration.
//!
//! Stamps are loaded once before the pipeline starts and are read-only
//! afterwards, so every worker reads them without synchronization.

use contour_common::{ContourError, ContourResult, Image, Rgb};
use std::path::Path;
use tracing::{debug, info};

/// Number of marching-squares configurations (4 corners, 1 bit each).
pub const CONTOUR_CONFIG_COUNT: usize = 16;

const PAPER: Rgb<u8> = Rgb([255, 255, 255]);
const INK: Rgb<u8> = Rgb([0, 0, 0]);

/// Sixteen stamps indexed by configuration.
#[derive(Debug, Clone)]
pub struct StampTable {
    step: usize,
    stamps: Vec<Image>,
}

impl StampTable {
    /// Build a table from sixteen images, all `step x step`.
    pub fn from_images(step: usize, stamps: Vec<Image>) -> ContourResult<Self> {
        if stamps.len() != CONTOUR_CONFIG_COUNT {
            return Err(ContourError::InvalidStamp {
                index: stamps.len(),
                message: format!("expected {} stamps, got {}", CONTOUR_CONFIG_COUNT, stamps.len()),
            });
        }

        for (index, stamp) in stamps.iter().enumerate() {
            if stamp.dimensions() != (step, step) {
                return Err(ContourError::InvalidStamp {
                    index,
                    message: format!(
                        "expected {}x{}, got {}x{}",
                        step,
                        step,
                        stamp.width(),
                        stamp.height()
                    ),
                });
            }
        }

        Ok(Self { step, stamps })
    }

    /// Load `0.ppm` .. `15.ppm` from `dir`.
    pub fn load_dir<P: AsRef<Path>>(dir: P, step: usize) -> ContourResult<Self> {
        let dir = dir.as_ref();
        let stamps = (0..CONTOUR_CONFIG_COUNT)
            .map(|k| raster::load(dir.join(format!("{}.ppm", k))))
            .collect::<ContourResult<Vec<_>>>()?;

        let table = Self::from_images(step, stamps)?;
        info!(dir = %dir.display(), step, "Loaded contour stamps");
        Ok(table)
    }

    /// Write the table as `0.ppm` .. `15.ppm` into `dir`.
    pub fn save_dir<P: AsRef<Path>>(&self, dir: P) -> ContourResult<()> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        for (k, stamp) in self.stamps.iter().enumerate() {
            raster::store(stamp, dir.join(format!("{}.ppm", k)))?;
        }
        Ok(())
    }

    /// Render the sixteen stamps procedurally.
    ///
    /// Each stamp is white with a black line joining the midpoints of the
    /// cell edges whose two corners disagree. The saddles (5 and 10) get two
    /// lines, each cutting off one inside corner.
    pub fn synthesize(step: usize) -> ContourResult<Self> {
        if step == 0 {
            return Err(ContourError::InvalidConfig("step must be > 0".to_string()));
        }

        let stamps = (0..CONTOUR_CONFIG_COUNT as u8)
            .map(|k| draw_stamp(k, step))
            .collect();

        debug!(step, "Synthesized contour stamps");
        Self::from_images(step, stamps)
    }

    pub fn step(&self) -> usize {
        self.step
    }

    /// Stamp for configuration `k`. Panics if `k >= 16`.
    #[inline]
    pub fn get(&self, k: u8) -> &Image {
        &self.stamps[k as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Image> {
        self.stamps.iter()
    }
}

#[derive(Debug, Clone, Copy)]
enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

fn edge_segments(k: u8) -> &'static [(Edge, Edge)] {
    use Edge::*;
    match k {
        0 | 15 => &[],
        1 | 14 => &[(Left, Bottom)],
        2 | 13 => &[(Bottom, Right)],
        3 | 12 => &[(Left, Right)],
        4 | 11 => &[(Top, Right)],
        5 => &[(Top, Right), (Bottom, Left)],
        6 | 9 => &[(Top, Bottom)],
        7 | 8 => &[(Left, Top)],
        10 => &[(Left, Top), (Right, Bottom)],
        _ => &[],
    }
}

fn edge_midpoint(edge: Edge, step: usize) -> (f32, f32) {
    let far = (step - 1) as f32;
    let mid = far / 2.0;
    match edge {
        Edge::Top => (mid, 0.0),
        Edge::Right => (far, mid),
        Edge::Bottom => (mid, far),
        Edge::Left => (0.0, mid),
    }
}

fn draw_stamp(k: u8, step: usize) -> Image {
    let mut stamp = Image::filled(step, step, PAPER);
    for &(from, to) in edge_segments(k) {
        let (x0, y0) = edge_midpoint(from, step);
        let (x1, y1) = edge_midpoint(to, step);
        draw_line(&mut stamp, x0, y0, x1, y1);
    }
    stamp
}

fn draw_line(img: &mut Image, x0: f32, y0: f32, x1: f32, y1: f32) {
    let steps = (x1 - x0).abs().max((y1 - y0).abs()).ceil().max(1.0) as usize;
    for s in 0..=steps {
        let t = s as f32 / steps as f32;
        let x = (x0 + t * (x1 - x0)).round() as usize;
        let y = (y0 + t * (y1 - y0)).round() as usize;
        if x < img.width() && y < img.height() {
            img.put(x, y, INK);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ink_count(img: &Image) -> usize {
        img.pixels().iter().filter(|&&p| p == INK).count()
    }

    #[test]
    fn test_uniform_configurations_are_blank() {
        let table = StampTable::synthesize(8).unwrap();
        assert_eq!(ink_count(table.get(0)), 0);
        assert_eq!(ink_count(table.get(15)), 0);
    }

    #[test]
    fn test_mixed_configurations_have_ink() {
        let table = StampTable::synthesize(8).unwrap();
        for k in 1..15u8 {
            assert!(ink_count(table.get(k)) > 0, "stamp {} is blank", k);
        }
    }

    #[test]
    fn test_complements_share_a_line() {
        let table = StampTable::synthesize(8).unwrap();
        for k in [1u8, 2, 3, 4, 6, 7] {
            assert_eq!(table.get(k), table.get(15 - k), "stamp {} vs {}", k, 15 - k);
        }
    }

    #[test]
    fn test_horizontal_line_crosses_middle_row() {
        // k = 12: top corners inside, bottom corners outside
        let table = StampTable::synthesize(9).unwrap();
        let stamp = table.get(12);
        for x in 0..9 {
            assert_eq!(stamp.get(x, 4), INK);
        }
        assert_eq!(ink_count(stamp), 9);
    }

    #[test]
    fn test_from_images_rejects_wrong_size() {
        let mut stamps: Vec<Image> = (0..16).map(|_| Image::filled(8, 8, PAPER)).collect();
        stamps[5] = Image::filled(8, 4, PAPER);

        match StampTable::from_images(8, stamps) {
            Err(ContourError::InvalidStamp { index, .. }) => assert_eq!(index, 5),
            other => panic!("expected InvalidStamp, got {:?}", other),
        }
    }

    #[test]
    fn test_from_images_rejects_wrong_count() {
        let stamps: Vec<Image> = (0..15).map(|_| Image::filled(8, 8, PAPER)).collect();
        assert!(StampTable::from_images(8, stamps).is_err());
    }

    #[test]
    fn test_zero_step_is_rejected() {
        assert!(StampTable::synthesize(0).is_err());
    }
}
