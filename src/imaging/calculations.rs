//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResizeError {
    #[error("destination width or height is mandatory")]
    MissingTarget,
    #[error("cannot scale a degenerate {width}x{height} source image")]
    DegenerateSource { width: u32, height: u32 },
    #[error("destination dimension must be non-zero")]
    DegenerateTarget,
}

/// Calculate the output size for a variant from a target width or height.
///
/// Only one axis is rescaled: the requested dimension is returned as given
/// and the other one is derived from the source's matching dimension. When
/// both targets are supplied the width wins.
///
/// The scale factor is always `min(target, source) / max(target, source)`,
/// so it never exceeds 1. For a shrink this is the usual `target / source`.
/// For an enlargement it is the *inverse* fraction, which squashes the
/// derived axis instead of growing it. Output names and sizes published by
/// earlier runs depend on this, so it is kept as is.
///
/// Both dimensions are truncated, not rounded.
///
/// # Examples
/// ```
/// # use respimage::imaging::compute_target_size;
/// // 800x600 → width 320 → 320x240
/// assert_eq!(compute_target_size((800, 600), Some(320), None), Ok((320, 240)));
///
/// // Enlarging 200x100 to width 400 halves the height instead of doubling it
/// assert_eq!(compute_target_size((200, 100), Some(400), None), Ok((400, 50)));
/// ```
pub fn compute_target_size(
    source: (u32, u32),
    target_width: Option<u32>,
    target_height: Option<u32>,
) -> Result<(u32, u32), ResizeError> {
    let (src_w, src_h) = source;

    if target_width.is_none() && target_height.is_none() {
        return Err(ResizeError::MissingTarget);
    }
    if src_w == 0 || src_h == 0 {
        return Err(ResizeError::DegenerateSource {
            width: src_w,
            height: src_h,
        });
    }

    match (target_width, target_height) {
        (Some(0), _) | (None, Some(0)) => Err(ResizeError::DegenerateTarget),
        (Some(tw), _) => {
            let h = src_h as f64 * shrink_ratio(tw, src_w);
            Ok((tw, h as u32))
        }
        (None, Some(th)) => {
            let w = src_w as f64 * shrink_ratio(th, src_h);
            Ok((w as u32, th))
        }
        (None, None) => Err(ResizeError::MissingTarget),
    }
}

/// `target / source` when shrinking, `source / target` otherwise.
fn shrink_ratio(target: u32, source: u32) -> f64 {
    if source > target {
        target as f64 / source as f64
    } else {
        source as f64 / target as f64
    }
}

/// Calculate thumbnail dimensions that fit inside a bounding box.
///
/// Standard "fit within box" semantics: the aspect ratio is preserved, the
/// limiting side matches the box exactly, the other side is rounded and never
/// drops below 1px. Images that already fit are left at their own size
/// (thumbnails never upscale).
///
/// # Examples
/// ```
/// # use respimage::imaging::fit_within;
/// assert_eq!(fit_within((800, 600), (300, 300)), (300, 225));
/// assert_eq!(fit_within((120, 80), (300, 300)), (120, 80));
/// ```
pub fn fit_within(source: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (box_w, box_h) = bounds;

    if src_w <= box_w && src_h <= box_h {
        return source;
    }

    // Compare aspect ratios without floating point: src_w/src_h vs box_w/box_h
    if src_w as u64 * box_h as u64 >= src_h as u64 * box_w as u64 {
        // Width is the limiting side
        let h = (src_h as f64 * box_w as f64 / src_w as f64).round().max(1.0) as u32;
        (box_w, h.min(box_h))
    } else {
        // Height is the limiting side
        let w = (src_w as f64 * box_h as f64 / src_h as f64).round().max(1.0) as u32;
        (w.min(box_w), box_h)
    }
}
