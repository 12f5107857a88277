//! Parameter types for image operations.
//!
//! These structs describe *what* to write, not *how*. They are the interface
//! between the [`pipeline`](crate::pipeline) (which decides which files to
//! create) and the [`codec`](super::codec) (which does the encoding). Keeping
//! them plain data lets tests swap in a recording codec without changing any
//! naming or geometry logic.
//!
//! ## Types
//!
//! - [`Quality`]: Encoding quality (0–100). Clamped on construction.
//! - [`OutputFormat`]: The single configurable output format (WebP by default).
//! - [`EncodeParams`]: Full specification for one output file: path, format, quality.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Quality setting for image encoding (0-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u8);

impl Quality {
    /// Thumbnails are always written at this quality.
    pub const MAX: Quality = Quality(100);

    pub fn new(value: u8) -> Self {
        Self(value.min(100))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

/// Output image format. Exactly one is configured per run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Webp,
    Avif,
    Jpeg,
    Png,
}

impl OutputFormat {
    /// File extension appended to generated names (`a@sm_1x.webp`).
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Webp => "webp",
            OutputFormat::Avif => "avif",
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Parameters for writing one generated image.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeParams {
    pub output: PathBuf,
    pub format: OutputFormat,
    pub quality: Quality,
}
