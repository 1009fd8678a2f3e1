//! Shared test utilities for the sharp-image test suite.
//!
//! Builds small synthetic images in memory so tests never depend on fixture
//! files, and exposes the magic-byte signatures used to check encodings.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let bytes = encode_test_image(ImageFormat::Png, 64, 48);
//! let loaded = transformer.load(&bytes).unwrap();
//! ```

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

/// JPEG start-of-image marker.
pub const JPEG_SIGNATURE: &[u8] = &[0xFF, 0xD8, 0xFF];

/// PNG file signature.
pub const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Gradient pixels, so resizes and encodes have real content to work on.
pub fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}

/// Encode a gradient of the given size in `format`.
///
/// JPEG gets RGB8; every other format gets RGBA8, which all of the enabled
/// encoders accept.
pub fn encode_test_image(format: ImageFormat, width: u32, height: u32) -> Vec<u8> {
    let rgb = gradient(width, height);
    let img = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(rgb),
        _ => DynamicImage::ImageRgba8(DynamicImage::ImageRgb8(rgb).to_rgba8()),
    };
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, format).unwrap();
    buffer.into_inner()
}

/// Big-endian TIFF block with a single IFD entry: Orientation = 6 (rotate 90° CW).
pub const ORIENTATION_6_EXIF: &[u8] = &[
    b'M', b'M', 0x00, 0x2A, 0x00, 0x00, 0x00, 0x08, // header, IFD0 at offset 8
    0x00, 0x01, // one entry
    0x01, 0x12, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01, 0x00, 0x06, 0x00, 0x00, // orientation
    0x00, 0x00, 0x00, 0x00, // no next IFD
];

/// Insert an APP1 `Exif` segment carrying `tiff` right after the JPEG SOI marker.
pub fn with_exif_segment(jpeg: &[u8], tiff: &[u8]) -> Vec<u8> {
    let length = (2 + 6 + tiff.len()) as u16;
    let mut out = Vec::with_capacity(jpeg.len() + length as usize + 2);
    out.extend_from_slice(&jpeg[..2]);
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&length.to_be_bytes());
    out.extend_from_slice(b"Exif\0\0");
    out.extend_from_slice(tiff);
    out.extend_from_slice(&jpeg[2..]);
    out
}

/// Whether `bytes` contain an EXIF block that ends with `tiff`.
pub fn contains_exif(bytes: &[u8], tiff: &[u8]) -> bool {
    let mut needle = b"Exif\0\0".to_vec();
    needle.extend_from_slice(tiff);
    bytes.windows(needle.len()).any(|w| w == needle.as_slice())
}

/// A PNG gradient with `profile` embedded as its ICC profile.
pub fn png_with_icc(width: u32, height: u32, profile: &[u8]) -> Vec<u8> {
    use image::ImageEncoder;
    use image::codecs::png::PngEncoder;

    let rgb = gradient(width, height);
    let mut buffer = Vec::new();
    let mut encoder = PngEncoder::new(&mut buffer);
    encoder.set_icc_profile(profile.to_vec()).unwrap();
    encoder
        .write_image(rgb.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
    buffer
}

/// Arbitrary bytes standing in for an ICC profile.
pub fn fake_icc_profile() -> Vec<u8> {
    (0..512u32).map(|i| (i * 7 % 251) as u8).collect()
}
