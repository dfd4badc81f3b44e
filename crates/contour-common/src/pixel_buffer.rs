//! In-memory RGB pixel buffer.
//!
//! Pixels are stored row-major: pixel `(x, y)` lives at `y * width + x`.
//! Rows are the contiguous dimension, which is what lets the pipeline hand
//! each worker a contiguous band of rows.

use crate::error::{ContourError, ContourResult};
use image::RgbImage;

pub use image::Rgb;

/// An 8-bit RGB image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: usize,
    height: usize,
    pixels: Vec<Rgb<u8>>,
}

impl Image {
    /// Allocate a black image, reporting allocation failure instead of aborting.
    pub fn try_new(width: usize, height: usize) -> ContourResult<Self> {
        let len = pixel_count(width, height)?;
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|_| ContourError::Allocation {
                what: "pixel buffer",
                bytes: len.saturating_mul(3),
            })?;
        pixels.resize(len, Rgb([0, 0, 0]));

        Ok(Self { width, height, pixels })
    }

    /// Create an image where every pixel has the same color.
    ///
    /// # Panics
    /// Panics if `width * height` overflows `usize`. Use [`Image::try_new`]
    /// for sizes that come from untrusted input.
    pub fn filled(width: usize, height: usize, color: Rgb<u8>) -> Self {
        let len = width
            .checked_mul(height)
            .unwrap_or_else(|| panic!("{width}x{height} image overflows the address space"));
        Self {
            width,
            height,
            pixels: vec![color; len],
        }
    }

    /// Wrap existing row-major pixel data.
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<Rgb<u8>>) -> ContourResult<Self> {
        let expected = pixel_count(width, height)?;
        if pixels.len() != expected {
            return Err(ContourError::InvalidDimensions(format!(
                "{}x{} image needs {} pixels, got {}",
                width,
                height,
                expected,
                pixels.len()
            )));
        }

        Ok(Self { width, height, pixels })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)`
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Pixel at `(x, y)`. Panics when out of bounds.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Rgb<u8> {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        self.pixels[self.index(x, y)]
    }

    #[inline]
    pub fn put(&mut self, x: usize, y: usize, color: Rgb<u8>) {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        let idx = self.index(x, y);
        self.pixels[idx] = color;
    }

    /// One row of pixels.
    pub fn row(&self, y: usize) -> &[Rgb<u8>] {
        let start = y * self.width;
        &self.pixels[start..start + self.width]
    }

    pub fn pixels(&self) -> &[Rgb<u8>] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Rgb<u8>] {
        &mut self.pixels
    }

    /// Convert from the `image` crate's buffer type.
    pub fn from_rgb_image(img: RgbImage) -> Self {
        let width = img.width() as usize;
        let height = img.height() as usize;
        let pixels = img.pixels().copied().collect();
        Self { width, height, pixels }
    }

    /// Convert into the `image` crate's buffer type for encoding.
    pub fn to_rgb_image(&self) -> ContourResult<RgbImage> {
        let width = u32::try_from(self.width)
            .map_err(|_| ContourError::InvalidDimensions(format!("width {} exceeds u32", self.width)))?;
        let height = u32::try_from(self.height)
            .map_err(|_| ContourError::InvalidDimensions(format!("height {} exceeds u32", self.height)))?;

        let raw: Vec<u8> = self.pixels.iter().flat_map(|p| p.0).collect();
        RgbImage::from_raw(width, height, raw).ok_or_else(|| {
            ContourError::InvalidDimensions(format!("{}x{} buffer size mismatch", width, height))
        })
    }
}

fn pixel_count(width: usize, height: usize) -> ContourResult<usize> {
    width.checked_mul(height).ok_or_else(|| {
        ContourError::InvalidDimensions(format!("{}x{} overflows the address space", width, height))
    })
}
