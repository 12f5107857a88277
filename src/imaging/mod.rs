//! Image processing: geometry, orientation and the codec boundary.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (JPEG, PNG) |
//! | **EXIF orientation** | `rexif` |
//! | **Resize** | Lanczos3 via `DynamicImage::resize_exact` |
//! | **Encode** | `webp` (lossy WebP), `image` (AVIF, JPEG, PNG) |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Orientation**: EXIF tag 274 parsing and the eight upright transforms
//! - **Parameters**: Data structures describing an encode
//! - **Codec**: [`ImageCodec`] trait + [`RustCodec`]
//! - **Operations**: Pixel transforms combining calculations + orientation

mod calculations;
pub mod codec;
pub mod operations;
pub mod orientation;
mod params;
pub mod rust_codec;

pub use calculations::{ResizeError, compute_target_size, fit_within};
pub use codec::{CodecError, DecodedImage, Dimensions, ImageCodec};
pub use operations::{render_thumbnail, render_variant};
pub use orientation::{Orientation, normalize_orientation, read_orientation};
pub use params::{EncodeParams, OutputFormat, Quality};
pub use rust_codec::RustCodec;
