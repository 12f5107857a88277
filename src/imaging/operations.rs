//! High-level image operations.
//!
//! These functions combine the [calculations](super::calculations) with pixel
//! work on an already-decoded source. They never touch the filesystem, which
//! keeps decode and encode failures in the [codec](super::codec) and geometry
//! failures here.

use super::calculations::{ResizeError, compute_target_size, fit_within};
use super::codec::DecodedImage;
use super::orientation::normalize_orientation;
use image::DynamicImage;
use image::imageops::FilterType;

/// Resampling filter for every resize.
const FILTER: FilterType = FilterType::Lanczos3;

/// Produce one responsive variant at the given target width.
///
/// Resizes first, then applies EXIF orientation, so a source tagged as
/// rotated yields an output with swapped dimensions.
pub fn render_variant(
    source: &DecodedImage,
    target_width: u32,
) -> Result<DynamicImage, ResizeError> {
    let (width, height) =
        compute_target_size(source.dimensions().as_tuple(), Some(target_width), None)?;
    let resized = source.pixels.resize_exact(width, height, FILTER);
    Ok(normalize_orientation(resized, source.orientation))
}

/// Produce the thumbnail: shrink to fit `bounds`, then apply orientation.
pub fn render_thumbnail(source: &DecodedImage, bounds: (u32, u32)) -> DynamicImage {
    let original = source.dimensions().as_tuple();
    let (width, height) = fit_within(original, bounds);
    let fitted = if (width, height) == original {
        source.pixels.clone()
    } else {
        source.pixels.resize_exact(width, height, FILTER)
    };
    normalize_orientation(fitted, source.orientation)
}
