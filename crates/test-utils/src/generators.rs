//! Synthetic image generators.
//!
//! Every generator is deterministic so pipeline outputs can be compared
//! across runs and thread counts.

use contour_common::{Image, Rgb};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// Creates an image with a single color.
pub fn solid_image(width: usize, height: usize, color: Rgb<u8>) -> Image {
    Image::filled(width, height, color)
}

/// Creates a black/white checkerboard with `square` pixel squares.
///
/// The top-left square is black.
pub fn checkerboard_image(width: usize, height: usize, square: usize) -> Image {
    let square = square.max(1);
    let mut img = Image::filled(width, height, WHITE);
    for y in 0..height {
        for x in 0..width {
            if (x / square + y / square) % 2 == 0 {
                img.put(x, y, BLACK);
            }
        }
    }
    img
}

/// Creates a dark disk centered in a white image.
///
/// # Example
///
/// ```
/// use test_utils::disk_image;
///
/// let img = disk_image(32, 32, 8.0);
/// assert_eq!(img.get(16, 16).0, [0, 0, 0]);
/// assert_eq!(img.get(0, 0).0, [255, 255, 255]);
/// ```
pub fn disk_image(width: usize, height: usize, radius: f32) -> Image {
    let cx = width as f32 / 2.0;
    let cy = height as f32 / 2.0;
    let mut img = Image::filled(width, height, WHITE);
    for y in 0..height {
        for x in 0..width {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            if dx * dx + dy * dy <= radius * radius {
                img.put(x, y, BLACK);
            }
        }
    }
    img
}

/// Creates a horizontal-plus-vertical gray gradient.
///
/// Luminance grows from black at the top-left to white at the bottom-right.
pub fn gradient_image(width: usize, height: usize) -> Image {
    let mut img = Image::filled(width, height, BLACK);
    let span = (width + height).saturating_sub(2).max(1) as f32;
    for y in 0..height {
        for x in 0..width {
            let value = ((x + y) as f32 / span * 255.0).round() as u8;
            img.put(x, y, Rgb([value, value, value]));
        }
    }
    img
}

/// Creates an image of seeded random colors.
pub fn noise_image(width: usize, height: usize, seed: u64) -> Image {
    let mut rng = StdRng::seed_from_u64(seed);
    let pixels = (0..width * height)
        .map(|_| Rgb([rng.gen(), rng.gen(), rng.gen()]))
        .collect();
    Image::from_pixels(width, height, pixels).expect("pixel count matches dimensions")
}
