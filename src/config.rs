//! Pipeline configuration.
//!
//! A [`PipelineConfig`] is built once and handed to the
//! [`Pipeline`](crate::pipeline::Pipeline), which only ever reads it. The
//! driver binary loads it from a `respimage.toml` file wrapped in
//! [`Settings`] together with the logging options.
//!
//! ## Configuration File
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [logging]
//! level = "info"             # Overridden by RUST_LOG when set
//! file = "respimage.log"     # Omit to log to stdout only
//! rotation = "never"         # never (append) | daily | hourly
//!
//! [pipeline]
//! source = "images"          # Root directory scanned recursively
//! # dest = "public/images"   # Omit to write outputs beside each source
//! format = "webp"            # webp | avif | jpeg | png
//!
//! [pipeline.thumbnail]
//! width = 300                # Bounding box, aspect ratio is preserved
//! height = 300
//! # rename = true            # Default: renamed when any size is renamed
//!
//! [pipeline.processing]
//! parallel = false           # Process discovered files on a worker pool
//! # max_processes = 4        # Worker cap (omit for auto = CPU cores)
//!
//! [[pipeline.sizes]]
//! label = "sm"               # Breakpoint name, `name` is accepted too
//! suffix = "_1x"             # Density suffix
//! width = 320                # Target width, height is derived
//! quality = 100              # 0-100
//! rename = true              # Use the 5-digit sequence number as basename
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::OutputFormat;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File extensions treated as source images. Matching is case-sensitive:
/// `.Jpg` or `.jpeg` files are ignored.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "png", "JPG", "PNG"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// One requested output variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SizeSpec {
    /// Target width in pixels; the height is derived.
    pub width: u32,
    /// Encoding quality (0-100).
    pub quality: u8,
    /// Breakpoint name, e.g. `"sm"`.
    #[serde(alias = "name")]
    pub label: String,
    /// Density suffix, e.g. `"_1x"`.
    #[serde(default)]
    pub suffix: String,
    /// Replace the source basename with the traversal sequence number.
    #[serde(default)]
    pub rename: bool,
}

impl SizeSpec {
    pub fn new(label: &str, suffix: &str, width: u32, quality: u8) -> Self {
        Self {
            width,
            quality,
            label: label.to_string(),
            suffix: suffix.to_string(),
            rename: false,
        }
    }

    /// Same spec, but written under the sequence-number basename.
    pub fn renamed(mut self) -> Self {
        self.rename = true;
        self
    }

    /// `label` + `suffix`, the part after `@` in output names.
    pub fn tag(&self) -> String {
        format!("{}{}", self.label, self.suffix)
    }
}

/// The stock breakpoint table: phones through full-HD screens, each at
/// 1x and 2x density where it makes sense.
pub fn stock_sizes() -> Vec<SizeSpec> {
    [
        ("sm", "_1x", 320),
        ("sm", "_2x", 481),
        ("md", "_1x", 769),
        ("md", "_2x", 1025),
        ("lg", "_1x", 1201),
        ("lg", "_2x", 1440),
        ("xl", "_1x", 1920),
    ]
    .into_iter()
    .map(|(label, suffix, width)| SizeSpec::new(label, suffix, width, 100).renamed())
    .collect()
}

/// Thumbnail bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailConfig {
    pub width: u32,
    pub height: u32,
    /// Explicit rename flag. When absent, the thumbnail follows the sizes:
    /// it is renamed if any [`SizeSpec`] is.
    pub rename: Option<bool>,
}

impl ThumbnailConfig {
    pub fn bounds(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            width: 300,
            height: 300,
            rename: None,
        }
    }
}

/// How discovered images are processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// One image at a time, interleaved with discovery.
    Sequential,
    /// Discovery first, then a bounded worker pool.
    Parallel { workers: usize },
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Opt into the worker pool. Sequential processing is the default.
    pub parallel: bool,
    /// Maximum number of parallel image processing workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

impl ProcessingConfig {
    pub fn mode(&self) -> ExecutionMode {
        if self.parallel {
            ExecutionMode::Parallel {
                workers: effective_threads(self),
            }
        } else {
            ExecutionMode::Sequential
        }
    }
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

/// Everything the pipeline needs to know about a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Root directory scanned for source images.
    pub source: PathBuf,
    /// Variants generated for every source image, in write order.
    pub sizes: Vec<SizeSpec>,
    /// Separate output tree mirroring `source`. `None` writes beside sources.
    pub dest: Option<PathBuf>,
    /// Output format for variants and thumbnails.
    pub format: OutputFormat,
    pub thumbnail: ThumbnailConfig,
    pub processing: ProcessingConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new("images", stock_sizes())
    }
}

impl PipelineConfig {
    pub fn new(source: impl Into<PathBuf>, sizes: Vec<SizeSpec>) -> Self {
        Self {
            source: source.into(),
            sizes,
            dest: None,
            format: OutputFormat::default(),
            thumbnail: ThumbnailConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }

    pub fn with_dest(mut self, dest: impl Into<PathBuf>) -> Self {
        self.dest = Some(dest.into());
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_thumbnail(mut self, thumbnail: ThumbnailConfig) -> Self {
        self.thumbnail = thumbnail;
        self
    }

    pub fn with_processing(mut self, processing: ProcessingConfig) -> Self {
        self.processing = processing;
        self
    }

    /// Whether the thumbnail is written under the sequence-number basename.
    pub fn renames_thumbnail(&self) -> bool {
        self.thumbnail
            .rename
            .unwrap_or_else(|| self.sizes.iter().any(|s| s.rename))
    }

    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut tags = HashSet::new();
        for spec in &self.sizes {
            if spec.width == 0 {
                return Err(ConfigError::Validation(format!(
                    "size '{}' must have a non-zero width",
                    spec.tag()
                )));
            }
            if spec.quality > 100 {
                return Err(ConfigError::Validation(format!(
                    "size '{}' quality must be 0-100",
                    spec.tag()
                )));
            }
            if spec.tag().contains(['/', '\\']) {
                return Err(ConfigError::Validation(format!(
                    "size '{}' label and suffix must not contain path separators",
                    spec.tag()
                )));
            }
            if !tags.insert(spec.tag()) {
                return Err(ConfigError::Validation(format!(
                    "size '{}' is listed twice and would overwrite its own output",
                    spec.tag()
                )));
            }
        }
        if self.thumbnail.width == 0 || self.thumbnail.height == 0 {
            return Err(ConfigError::Validation(
                "thumbnail width and height must be non-zero".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Contents of a `respimage.toml` file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub logging: LoggingConfig,
    pub pipeline: PipelineConfig,
}

/// Load settings from `path`.
///
/// Returns stock defaults if the file doesn't exist. Parse and validation
/// errors are reported, never silently replaced by defaults.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    if !path.exists() {
        return Ok(Settings::default());
    }
    let content = fs::read_to_string(path)?;
    let settings: Settings = toml::from_str(&content)?;
    settings.pipeline.validate()?;
    Ok(settings)
}
