//! Shared test utilities: synthetic source images.
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! create_test_jpeg(&tmp.path().join("a.jpg"), 800, 600);
//! std::fs::write(&path, jpeg_bytes_with_orientation(40, 20, 6)).unwrap();
//! std::fs::write(&path, png_bytes_with_orientation(40, 20, 6)).unwrap();
//! ```

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, Rgb, RgbImage};
use std::path::Path;

/// Gradient fill so encoders have something non-trivial to compress.
fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 128]))
}

fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = gradient(width, height);
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, 90)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    bytes
}

/// Write a baseline JPEG without metadata.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    std::fs::write(path, jpeg_bytes(width, height)).unwrap();
}

/// Write a PNG. The format comes from the content, not from `path`.
pub fn create_test_png(path: &Path, width: u32, height: u32) {
    let img = gradient(width, height);
    let mut bytes = Vec::new();
    image::codecs::png::PngEncoder::new(&mut bytes)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    std::fs::write(path, bytes).unwrap();
}

/// Little-endian TIFF block with a single IFD0 orientation entry, the
/// payload of a JPEG APP1 segment or a PNG `eXIf` chunk.
fn orientation_tiff(orientation: u16) -> Vec<u8> {
    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"II\x2A\x00");
    tiff.extend_from_slice(&8u32.to_le_bytes());
    tiff.extend_from_slice(&1u16.to_le_bytes());
    tiff.extend_from_slice(&0x0112u16.to_le_bytes());
    tiff.extend_from_slice(&3u16.to_le_bytes());
    tiff.extend_from_slice(&1u32.to_le_bytes());
    tiff.extend_from_slice(&orientation.to_le_bytes());
    tiff.extend_from_slice(&[0, 0]);
    tiff.extend_from_slice(&0u32.to_le_bytes());
    tiff
}

/// JPEG bytes carrying an EXIF orientation tag.
///
/// `orientation == 0` produces a JPEG without any EXIF segment. Values
/// outside 1-8 are written as-is to exercise malformed tags.
pub fn jpeg_bytes_with_orientation(width: u32, height: u32, orientation: u16) -> Vec<u8> {
    let jpeg = jpeg_bytes(width, height);
    if orientation == 0 {
        return jpeg;
    }

    let mut payload = b"Exif\0\0".to_vec();
    payload.extend_from_slice(&orientation_tiff(orientation));

    let mut out = Vec::with_capacity(jpeg.len() + payload.len() + 4);
    out.extend_from_slice(&jpeg[..2]);
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
    out.extend_from_slice(&payload);
    out.extend_from_slice(&jpeg[2..]);
    out
}

/// PNG chunk checksum (CRC-32/ISO-HDLC over type and data).
fn chunk_crc(data: &[u8]) -> u32 {
    let mut crc = 0xFFFF_FFFFu32;
    for &byte in data {
        crc ^= u32::from(byte);
        for _ in 0..8 {
            crc = if crc & 1 == 1 {
                (crc >> 1) ^ 0xEDB8_8320
            } else {
                crc >> 1
            };
        }
    }
    !crc
}

/// PNG bytes with an `eXIf` chunk holding the orientation tag, placed right
/// after `IHDR`.
pub fn png_bytes_with_orientation(width: u32, height: u32, orientation: u16) -> Vec<u8> {
    let mut png = Vec::new();
    image::codecs::png::PngEncoder::new(&mut png)
        .write_image(gradient(width, height).as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();

    let tiff = orientation_tiff(orientation);
    let mut typed = b"eXIf".to_vec();
    typed.extend_from_slice(&tiff);

    // 8-byte signature + IHDR (length, type, 13 bytes of data, crc)
    let ihdr_end = 8 + 4 + 4 + 13 + 4;
    let mut out = png[..ihdr_end].to_vec();
    out.extend_from_slice(&(tiff.len() as u32).to_be_bytes());
    out.extend_from_slice(&typed);
    out.extend_from_slice(&chunk_crc(&typed).to_be_bytes());
    out.extend_from_slice(&png[ihdr_end..]);
    out
}

/// Black RGB image with a single pure red pixel at `marker`.
pub fn marker_image(width: u32, height: u32, marker: (u32, u32)) -> DynamicImage {
    let mut img = RgbImage::new(width, height);
    img.put_pixel(marker.0, marker.1, Rgb([255, 0, 0]));
    DynamicImage::ImageRgb8(img)
}
