//! Tests for pixel-buffer load/store.

use contour_common::{ContourError, Image, Rgb};
use raster::{load, store};
use std::io::Write;
use test_utils::{checkerboard_image, gradient_image, temp_output_path};

// ============================================================================
// PPM round trips
// ============================================================================

#[test]
fn test_store_ppm_writes_binary_pixmap() {
    let (_dir, path) = temp_output_path("out.ppm");
    let img = gradient_image(16, 9);

    store(&img, &path).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..2], b"P6", "PPM output should be a binary pixmap");
    // Header + 3 bytes per pixel
    assert!(bytes.len() >= 16 * 9 * 3);
}

#[test]
fn test_ppm_round_trip_is_lossless() {
    let (_dir, path) = temp_output_path("board.ppm");
    let img = checkerboard_image(24, 16, 4);

    store(&img, &path).unwrap();
    let loaded = load(&path).unwrap();

    assert_eq!(loaded.dimensions(), (24, 16));
    assert_eq!(loaded, img);
}

#[test]
fn test_load_hand_written_p6() {
    let (_dir, path) = temp_output_path("tiny.ppm");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(b"P6\n2 1\n255\n").unwrap();
    file.write_all(&[255, 0, 0, 0, 0, 255]).unwrap();
    drop(file);

    let img = load(&path).unwrap();
    assert_eq!(img.dimensions(), (2, 1));
    assert_eq!(img.get(0, 0), Rgb([255, 0, 0]));
    assert_eq!(img.get(1, 0), Rgb([0, 0, 255]));
}

// ============================================================================
// Other formats and failures
// ============================================================================

#[test]
fn test_png_round_trip() {
    let (_dir, path) = temp_output_path("out.png");
    let img = Image::filled(5, 5, Rgb([1, 2, 3]));

    store(&img, &path).unwrap();
    assert_eq!(load(&path).unwrap(), img);
}

#[test]
fn test_load_missing_file_is_decode_error() {
    let (_dir, path) = temp_output_path("missing.ppm");
    let err = load(&path).unwrap_err();
    assert!(matches!(err, ContourError::Decode { .. }));
}

#[test]
fn test_load_garbage_is_decode_error() {
    let (_dir, path) = temp_output_path("garbage.ppm");
    std::fs::write(&path, b"definitely not an image").unwrap();

    let err = load(&path).unwrap_err();
    assert!(matches!(err, ContourError::Decode { .. }));
    assert!(err.is_input_error());
}

#[test]
fn test_store_unknown_extension_is_encode_error() {
    let (_dir, path) = temp_output_path("out.unknownext");
    let img = Image::filled(2, 2, Rgb([0, 0, 0]));

    let err = store(&img, &path).unwrap_err();
    assert!(matches!(err, ContourError::Encode { .. }));
}
