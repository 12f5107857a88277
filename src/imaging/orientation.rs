//! EXIF orientation handling.
//!
//! Cameras store "which way is up" in EXIF tag 274 instead of rotating the
//! pixels. Generated variants are re-encoded without metadata, so the
//! rotation has to be baked into the pixels or browsers will show them
//! sideways.
//!
//! | Tag | Meaning | Transform (clockwise rotations) |
//! |---|---|---|
//! | 1 | normal | none |
//! | 2 | mirrored | flip horizontal |
//! | 3 | upside down | rotate 180 |
//! | 4 | mirrored, upside down | flip vertical |
//! | 5 | transposed | rotate 270, flip vertical |
//! | 6 | rotated | rotate 90 |
//! | 7 | transversed | rotate 90, flip vertical |
//! | 8 | rotated | rotate 270 |
//!
//! Anything missing, malformed, or out of range is treated as "normal".

use image::DynamicImage;
use rexif::{ExifTag, TagValue};

/// The eight EXIF orientations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Normal,
    FlipHorizontal,
    Rotate180,
    FlipVertical,
    Transpose,
    Rotate90,
    Transverse,
    Rotate270,
}

impl Orientation {
    /// Map a raw tag value (1–8) to an orientation.
    pub fn from_exif(value: u32) -> Option<Self> {
        match value {
            1 => Some(Self::Normal),
            2 => Some(Self::FlipHorizontal),
            3 => Some(Self::Rotate180),
            4 => Some(Self::FlipVertical),
            5 => Some(Self::Transpose),
            6 => Some(Self::Rotate90),
            7 => Some(Self::Transverse),
            8 => Some(Self::Rotate270),
            _ => None,
        }
    }

    /// Interpret a decoded tag value. Writers disagree on the storage type
    /// (SHORT per the standard, but BYTE, LONG and even ASCII show up).
    pub fn from_tag_value(value: &TagValue) -> Option<Self> {
        let raw = match value {
            TagValue::U16(values) => values.first().copied().map(u32::from),
            TagValue::U8(values) => values.first().copied().map(u32::from),
            TagValue::U32(values) => values.first().copied(),
            TagValue::Ascii(text) => text.trim().parse::<u32>().ok(),
            _ => None,
        }?;
        Self::from_exif(raw)
    }

    /// Apply the transform that makes the image display upright.
    pub fn apply(self, image: DynamicImage) -> DynamicImage {
        match self {
            Self::Normal => image,
            Self::FlipHorizontal => image.fliph(),
            Self::Rotate180 => image.rotate180(),
            Self::FlipVertical => image.flipv(),
            Self::Transpose => image.rotate270().flipv(),
            Self::Rotate90 => image.rotate90(),
            Self::Transverse => image.rotate90().flipv(),
            Self::Rotate270 => image.rotate270(),
        }
    }
}

/// Read the orientation tag from a JPEG file or a bare TIFF/EXIF block.
///
/// Never fails: files without EXIF, with broken EXIF, or with a bogus
/// orientation value all yield `None`.
pub fn read_orientation(bytes: &[u8]) -> Option<Orientation> {
    let (exif, _warnings) = rexif::parse_buffer_quiet(bytes);
    let exif = exif.ok()?;
    exif.entries
        .iter()
        .find(|entry| entry.tag == ExifTag::Orientation)
        .and_then(|entry| Orientation::from_tag_value(&entry.value))
}

/// Rotate/mirror an image according to its EXIF orientation.
///
/// `None` (no tag, malformed tag) returns the image untouched.
pub fn normalize_orientation(
    image: DynamicImage,
    orientation: Option<Orientation>,
) -> DynamicImage {
    match orientation {
        Some(orientation) => orientation.apply(image),
        None => image,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{
        jpeg_bytes_with_orientation, marker_image, png_bytes_with_orientation,
    };
    use image::GenericImageView;

    /// Position of the red marker pixel in a transformed image.
    fn marker_position(image: &DynamicImage) -> (u32, u32) {
        image
            .pixels()
            .find(|(_, _, p)| p.0[0] == 255)
            .map(|(x, y, _)| (x, y))
            .expect("marker pixel missing")
    }

    #[test]
    fn from_exif_maps_all_eight_values() {
        let all: Vec<_> = (1..=8).map(|v| Orientation::from_exif(v).unwrap()).collect();
        assert_eq!(
            all,
            vec![
                Orientation::Normal,
                Orientation::FlipHorizontal,
                Orientation::Rotate180,
                Orientation::FlipVertical,
                Orientation::Transpose,
                Orientation::Rotate90,
                Orientation::Transverse,
                Orientation::Rotate270,
            ]
        );
    }

    #[test]
    fn from_exif_rejects_out_of_range() {
        assert_eq!(Orientation::from_exif(0), None);
        assert_eq!(Orientation::from_exif(9), None);
        assert_eq!(Orientation::from_exif(u32::MAX), None);
    }

    #[test]
    fn from_tag_value_accepts_common_storage_types() {
        assert_eq!(
            Orientation::from_tag_value(&TagValue::U16(vec![6])),
            Some(Orientation::Rotate90)
        );
        assert_eq!(
            Orientation::from_tag_value(&TagValue::U8(vec![3])),
            Some(Orientation::Rotate180)
        );
        assert_eq!(
            Orientation::from_tag_value(&TagValue::U32(vec![8])),
            Some(Orientation::Rotate270)
        );
        assert_eq!(
            Orientation::from_tag_value(&TagValue::Ascii("2".to_string())),
            Some(Orientation::FlipHorizontal)
        );
    }

    #[test]
    fn from_tag_value_rejects_malformed() {
        assert_eq!(Orientation::from_tag_value(&TagValue::U16(vec![])), None);
        assert_eq!(Orientation::from_tag_value(&TagValue::U16(vec![42])), None);
        assert_eq!(
            Orientation::from_tag_value(&TagValue::Ascii("up".to_string())),
            None
        );
        assert_eq!(Orientation::from_tag_value(&TagValue::F32(vec![6.0])), None);
    }

    #[test]
    fn each_orientation_moves_the_marker_correctly() {
        // 3x2 image, marker in the top-right corner
        let expected = [
            (1, (2, 0), (3, 2)),
            (2, (0, 0), (3, 2)),
            (3, (0, 1), (3, 2)),
            (4, (2, 1), (3, 2)),
            (5, (0, 2), (2, 3)),
            (6, (1, 2), (2, 3)),
            (7, (1, 0), (2, 3)),
            (8, (0, 0), (2, 3)),
        ];
        for (tag, position, dims) in expected {
            let orientation = Orientation::from_exif(tag).unwrap();
            let out = normalize_orientation(marker_image(3, 2, (2, 0)), Some(orientation));
            assert_eq!(out.dimensions(), dims, "orientation {tag}");
            assert_eq!(marker_position(&out), position, "orientation {tag}");
        }
    }

    #[test]
    fn missing_orientation_returns_image_unchanged() {
        let image = marker_image(4, 3, (1, 2));
        let out = normalize_orientation(image.clone(), None);
        assert_eq!(out, image);
    }

    #[test]
    fn read_orientation_from_jpeg_exif() {
        let bytes = jpeg_bytes_with_orientation(16, 8, 6);
        assert_eq!(read_orientation(&bytes), Some(Orientation::Rotate90));
    }

    #[test]
    fn read_orientation_out_of_range_is_none() {
        let bytes = jpeg_bytes_with_orientation(16, 8, 12);
        assert_eq!(read_orientation(&bytes), None);
    }

    #[test]
    fn read_orientation_without_exif_is_none() {
        let bytes = jpeg_bytes_with_orientation(16, 8, 0);
        assert_eq!(read_orientation(&bytes), None);
        assert_eq!(read_orientation(b"definitely not an image"), None);
        assert_eq!(read_orientation(&[]), None);
    }

    #[test]
    fn orientation_segment_follows_soi() {
        let bytes = jpeg_bytes_with_orientation(8, 8, 3);
        assert_eq!(&bytes[..4], &[0xFF, 0xD8, 0xFF, 0xE1]);
        assert_eq!(&bytes[6..12], b"Exif\0\0");
        assert!(image::load_from_memory(&bytes).is_ok());
    }

    #[test]
    fn read_orientation_from_bare_exif_block() {
        // JPEG APP1 payload minus the "Exif\0\0" prefix, as decoders hand it out
        let bytes = jpeg_bytes_with_orientation(8, 8, 8);
        let block_len = u16::from_be_bytes([bytes[4], bytes[5]]) as usize - 2 - 6;
        let block = &bytes[12..12 + block_len];
        assert_eq!(&block[..4], b"II\x2A\x00");
        assert_eq!(read_orientation(block), Some(Orientation::Rotate270));
    }

    #[test]
    fn png_with_exif_chunk_still_decodes() {
        let bytes = png_bytes_with_orientation(12, 6, 6);
        let image = image::load_from_memory(&bytes).unwrap();
        assert_eq!(image.dimensions(), (12, 6));
    }
}
