//! Production codec built on the `image` crate, with libwebp (via the
//! `webp` crate) for lossy WebP output.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG) | `image::ImageReader` with content sniffing |
//! | EXIF orientation | decoder's EXIF block (JPEG, PNG `eXIf`) parsed by `rexif` |
//! | Encode → WebP | `webp::Encoder` (lossy, libwebp) |
//! | Encode → AVIF | `image::codecs::avif::AvifEncoder` (rav1e, speed 6) |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` |
//! | Encode → PNG | `image::codecs::png::PngEncoder` (lossless) |
//!
//! Each source file is read into memory once and dropped as soon as the
//! decoded image is built; output files are written through a `BufWriter`
//! that is closed before `encode` returns.

use super::codec::{CodecError, DecodedImage, ImageCodec};
use super::orientation::read_orientation;
use super::params::{EncodeParams, OutputFormat};
use image::codecs::avif::AvifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ImageDecoder};
use std::io::{BufWriter, Cursor, Write};
use std::path::Path;

/// Largest width or height libwebp accepts.
const WEBP_MAX_DIMENSION: u32 = 16383;

/// AVIF encoder speed (1 = slowest/best, 10 = fastest).
const AVIF_SPEED: u8 = 6;

/// Production codec. Stateless, so one instance serves every worker.
pub struct RustCodec;

impl RustCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustCodec {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode in-memory file contents, sniffing the format from the bytes.
///
/// Also returns the raw EXIF block the container carries (JPEG APP1, PNG
/// `eXIf`), if any.
fn decode_bytes(
    bytes: &[u8],
    path: &Path,
) -> Result<(DynamicImage, Option<Vec<u8>>), CodecError> {
    let decode_error =
        |e: image::ImageError| CodecError::Decode(format!("{}: {}", path.display(), e));
    let mut decoder = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(CodecError::Io)?
        .into_decoder()
        .map_err(decode_error)?;
    let exif = decoder.exif_metadata().ok().flatten();
    let pixels = DynamicImage::from_decoder(decoder).map_err(decode_error)?;
    Ok((pixels, exif))
}

fn create_writer(path: &Path) -> Result<BufWriter<std::fs::File>, CodecError> {
    Ok(BufWriter::new(std::fs::File::create(path)?))
}

/// Encode and save as lossy WebP.
fn save_webp(img: &DynamicImage, path: &Path, quality: u8) -> Result<(), CodecError> {
    if img.width() > WEBP_MAX_DIMENSION || img.height() > WEBP_MAX_DIMENSION {
        return Err(CodecError::Encode(format!(
            "{}x{} exceeds the WebP limit of {WEBP_MAX_DIMENSION}px",
            img.width(),
            img.height()
        )));
    }
    // libwebp only takes 8-bit RGB/RGBA buffers
    let converted;
    let img = match img {
        DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => img,
        other if other.color().has_alpha() => {
            converted = DynamicImage::ImageRgba8(other.to_rgba8());
            &converted
        }
        other => {
            converted = DynamicImage::ImageRgb8(other.to_rgb8());
            &converted
        }
    };
    let encoder = webp::Encoder::from_image(img)
        .map_err(|e| CodecError::Encode(format!("WebP encoder: {e}")))?;
    let encoded = encoder.encode(f32::from(quality));
    let mut writer = create_writer(path)?;
    writer.write_all(&encoded)?;
    writer.flush()?;
    Ok(())
}

/// Encode and save as AVIF using rav1e.
fn save_avif(img: &DynamicImage, path: &Path, quality: u8) -> Result<(), CodecError> {
    let writer = create_writer(path)?;
    let encoder = AvifEncoder::new_with_speed_quality(writer, AVIF_SPEED, quality.max(1));
    img.write_with_encoder(encoder)
        .map_err(|e| CodecError::Encode(format!("AVIF: {e}")))
}

fn save_jpeg(img: &DynamicImage, path: &Path, quality: u8) -> Result<(), CodecError> {
    let writer = create_writer(path)?;
    let encoder = JpegEncoder::new_with_quality(writer, quality.max(1));
    // JPEG has no alpha channel
    DynamicImage::ImageRgb8(img.to_rgb8())
        .write_with_encoder(encoder)
        .map_err(|e| CodecError::Encode(format!("JPEG: {e}")))
}

fn save_png(img: &DynamicImage, path: &Path) -> Result<(), CodecError> {
    let writer = create_writer(path)?;
    let encoder = PngEncoder::new(writer);
    img.write_with_encoder(encoder)
        .map_err(|e| CodecError::Encode(format!("PNG: {e}")))
}

impl ImageCodec for RustCodec {
    fn decode(&self, path: &Path) -> Result<DecodedImage, CodecError> {
        let bytes = std::fs::read(path)?;
        let (pixels, exif) = decode_bytes(&bytes, path)?;
        let orientation = exif
            .as_deref()
            .and_then(read_orientation)
            .or_else(|| read_orientation(&bytes));
        Ok(DecodedImage {
            pixels,
            orientation,
        })
    }

    fn encode(&self, image: &DynamicImage, params: &EncodeParams) -> Result<(), CodecError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(CodecError::Encode(format!(
                "refusing to write empty {}x{} image to {}",
                image.width(),
                image.height(),
                params.output.display()
            )));
        }
        let quality = params.quality.value();
        match params.format {
            OutputFormat::Webp => save_webp(image, &params.output, quality),
            OutputFormat::Avif => save_avif(image, &params.output, quality),
            OutputFormat::Jpeg => save_jpeg(image, &params.output, quality),
            OutputFormat::Png => save_png(image, &params.output),
        }
    }
}
