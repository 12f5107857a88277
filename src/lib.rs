//! # respimage
//!
//! Batch generator for responsive images. Point it at a directory tree and
//! every JPEG/PNG inside gets a thumbnail plus one resized variant per
//! configured breakpoint, written next to the source (or into a mirrored
//! destination tree):
//!
//! ```text
//! images/
//! ├── a.jpg
//! ├── a@thumbnail.webp
//! ├── a@sm_1x.webp
//! ├── a@sm_2x.webp
//! └── sub/
//!     ├── b.png
//!     ├── 00002@thumbnail.webp    # renamed to the traversal counter
//!     └── 00002@sm_1x.webp
//! ```
//!
//! # Architecture
//!
//! ```text
//! validate source → scan (files first, then subdirectories)
//!                     └─ per image: decode → thumbnail → N variants
//! ```
//!
//! A single corrupt image, a failed encode or a bad size never stops the
//! batch: every unit of work produces a result that ends up in the
//! [`RunReport`](pipeline::RunReport).
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `PipelineConfig`, `SizeSpec`, the stock breakpoint table, `respimage.toml` loading |
//! | [`scan`] | Recursive discovery and the shared traversal counter |
//! | [`pipeline`] | `Pipeline`: validate, scan, generate thumbnails and variants, run reports |
//! | [`naming`] | `{stem}@{tag}.{ext}` output names and output placement |
//! | [`imaging`] | Resize math, EXIF orientation, decode/encode through the `ImageCodec` trait |
//! | [`output`] | Console formatting of a finished run |
//! | [`logging`] | `tracing` subscriber: stdout plus an append or rotating log file |
//!
//! # Design Decisions
//!
//! ## Decode Once
//!
//! Each source is decoded a single time and every output is rendered from
//! that buffer. A file that can't be read therefore yields exactly one
//! failure rather than one per variant.
//!
//! ## Deterministic Counters
//!
//! Renamed outputs use a counter shared by the whole traversal, so no two
//! images get the same number even when they live in sibling directories.
//! The parallel mode finishes discovery before any work starts, which keeps
//! the numbering identical to a sequential run.
//!
//! ## In-Process Imaging
//!
//! Decoding and encoding go through the `image` crate, plus `webp` for lossy
//! WebP and `rexif` for EXIF. No external programs are spawned. `webp`
//! compiles the bundled C libwebp, so building needs a C compiler, but the
//! resulting binary has no runtime dependencies.

pub mod config;
pub mod imaging;
pub mod logging;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
