//! Color sampling at normalized image coordinates.
//!
//! `u` runs along x and `v` along y, both in `[0, 1]`. They are mapped onto
//! pixel centers so that `(0, 0)` is the top-left pixel and `(1, 1)` the
//! bottom-right one.

use contour_common::{Image, InterpolationMethod, Rgb};

/// Sample `image` at `(u, v)` with the given kernel.
pub fn sample(image: &Image, u: f32, v: f32, method: InterpolationMethod) -> Rgb<u8> {
    match method {
        InterpolationMethod::Nearest => sample_nearest(image, u, v),
        InterpolationMethod::Bilinear => sample_bilinear(image, u, v),
        InterpolationMethod::Bicubic => sample_bicubic(image, u, v),
    }
}

/// Map normalized coordinates onto continuous pixel coordinates.
#[inline]
fn to_pixel_space(image: &Image, u: f32, v: f32) -> (f32, f32) {
    let u = if u.is_nan() { 0.0 } else { u.clamp(0.0, 1.0) };
    let v = if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
    (
        u * (image.width().saturating_sub(1)) as f32,
        v * (image.height().saturating_sub(1)) as f32,
    )
}

#[inline]
fn to_channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Nearest neighbor sampling.
pub fn sample_nearest(image: &Image, u: f32, v: f32) -> Rgb<u8> {
    if image.is_empty() {
        return Rgb([0, 0, 0]);
    }

    let (x, y) = to_pixel_space(image, u, v);
    let col = (x.round() as usize).min(image.width() - 1);
    let row = (y.round() as usize).min(image.height() - 1);
    image.get(col, row)
}

/// Bilinear sampling over the 2x2 neighbourhood.
pub fn sample_bilinear(image: &Image, u: f32, v: f32) -> Rgb<u8> {
    if image.is_empty() {
        return Rgb([0, 0, 0]);
    }

    let (x, y) = to_pixel_space(image, u, v);
    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let x1 = (x0 + 1).min(image.width() - 1);
    let y1 = (y0 + 1).min(image.height() - 1);
    let xf = x - x0 as f32;
    let yf = y - y0 as f32;

    let p00 = image.get(x0, y0);
    let p10 = image.get(x1, y0);
    let p01 = image.get(x0, y1);
    let p11 = image.get(x1, y1);

    let mut out = [0u8; 3];
    for (c, slot) in out.iter_mut().enumerate() {
        let top = p00[c] as f32 * (1.0 - xf) + p10[c] as f32 * xf;
        let bottom = p01[c] as f32 * (1.0 - xf) + p11[c] as f32 * xf;
        *slot = to_channel(top * (1.0 - yf) + bottom * yf);
    }

    Rgb(out)
}

/// Bicubic (Catmull-Rom) sampling over the 4x4 neighbourhood.
///
/// Neighbours outside the image are clamped to the nearest edge pixel.
pub fn sample_bicubic(image: &Image, u: f32, v: f32) -> Rgb<u8> {
    if image.is_empty() {
        return Rgb([0, 0, 0]);
    }

    let (x, y) = to_pixel_space(image, u, v);
    let xi = x.floor() as i64;
    let yi = y.floor() as i64;
    let xf = x - xi as f32;
    let yf = y - yi as f32;

    let max_x = image.width() as i64 - 1;
    let max_y = image.height() as i64 - 1;

    // 4x4 neighbourhood, one row of channel triples at a time
    let mut rows = [[[0.0f32; 3]; 4]; 4];
    for (j, row) in rows.iter_mut().enumerate() {
        let py = (yi + j as i64 - 1).clamp(0, max_y) as usize;
        for (i, texel) in row.iter_mut().enumerate() {
            let px = (xi + i as i64 - 1).clamp(0, max_x) as usize;
            let pixel = image.get(px, py);
            *texel = [pixel[0] as f32, pixel[1] as f32, pixel[2] as f32];
        }
    }

    let mut out = [0u8; 3];
    for (c, slot) in out.iter_mut().enumerate() {
        let mut column = [0.0f32; 4];
        for (j, value) in column.iter_mut().enumerate() {
            *value = cubic_1d(rows[j][0][c], rows[j][1][c], rows[j][2][c], rows[j][3][c], xf);
        }
        *slot = to_channel(cubic_1d(column[0], column[1], column[2], column[3], yf));
    }

    Rgb(out)
}

/// 1D cubic interpolation using Catmull-Rom spline.
#[inline]
fn cubic_1d(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
    let t2 = t * t;
    let t3 = t2 * t;

    let a = -0.5 * p0 + 1.5 * p1 - 1.5 * p2 + 0.5 * p3;
    let b = p0 - 2.5 * p1 + 2.0 * p2 - 0.5 * p3;
    let c = -0.5 * p0 + 0.5 * p2;
    let d = p1;

    a * t3 + b * t2 + c * t + d
}
