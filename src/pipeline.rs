//! Responsive image generation.
//!
//! A [`Pipeline`] walks the configured source tree and, for every qualifying
//! image, writes one thumbnail plus one variant per [`SizeSpec`]:
//!
//! ```text
//! images/
//! ├── a.jpg                   # 800x600 source
//! ├── a@thumbnail.webp        # fits 300x300 box → 300x225, quality 100
//! ├── a@sm_1x.webp            # width 320 → 320x240
//! └── sub/
//!     ├── b.png
//!     ├── b@thumbnail.webp
//!     └── b@sm_1x.webp
//! ```
//!
//! ## Failure Handling
//!
//! Nothing below the run level is fatal. Each source is decoded once; a
//! decode failure is recorded as a single [`Unit::Decode`] outcome and the
//! image is skipped. Thumbnail and variant failures are recorded per unit and
//! the remaining units still run. Only a missing source root or an unreadable
//! directory ends the run early, and even then [`Pipeline::execute`] returns
//! a [`RunReport`] instead of an error.
//!
//! ## Execution Modes
//!
//! - **Sequential** (default): each image is generated as soon as the scan
//!   finds it.
//! - **Parallel**: the scan completes first, assigning counters in discovery
//!   order, then a bounded [rayon](https://docs.rs/rayon) pool generates the
//!   images. Output names are identical to the sequential mode.

use crate::config::{ExecutionMode, PipelineConfig, SizeSpec};
use crate::imaging::{
    CodecError, DecodedImage, Dimensions, EncodeParams, ImageCodec, Quality, ResizeError,
    RustCodec, render_thumbnail, render_variant,
};
use crate::naming::{self, Placement, THUMBNAIL_TAG};
use crate::scan::{self, DiscoveredFile, ScanReport, Sequence};
use image::DynamicImage;
use rayon::prelude::*;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Run-level failure. Ends the run but is reported, never propagated.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Source directory not found: {0}")]
    SourceNotFound(PathBuf),
    #[error("Scan failed: {0}")]
    Scan(#[from] walkdir::Error),
    #[error("Cannot start worker pool: {0}")]
    WorkerPool(String),
}

/// Why a single unit of work failed.
#[derive(Error, Debug)]
pub enum UnitError {
    #[error(transparent)]
    Resize(#[from] ResizeError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("cannot create {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One unit of work within an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unit {
    /// Reading the source.
    Decode,
    Thumbnail,
    /// A [`SizeSpec`] variant, identified by its tag (`sm_1x`).
    Variant { tag: String },
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Decode => write!(f, "decode"),
            Unit::Thumbnail => write!(f, "{THUMBNAIL_TAG}"),
            Unit::Variant { tag } => write!(f, "{tag}"),
        }
    }
}

/// Result of one unit. `output` is `None` for [`Unit::Decode`].
#[derive(Debug)]
pub struct UnitOutcome {
    pub unit: Unit,
    pub output: Option<PathBuf>,
    /// Dimensions of the written file.
    pub result: Result<Dimensions, UnitError>,
}

impl UnitOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Everything that happened to one source image.
#[derive(Debug)]
pub struct ImageReport {
    pub source: PathBuf,
    pub counter: u32,
    pub outcomes: Vec<UnitOutcome>,
}

impl ImageReport {
    pub fn failures(&self) -> impl Iterator<Item = &UnitOutcome> {
        self.outcomes.iter().filter(|o| !o.is_ok())
    }

    pub fn is_ok(&self) -> bool {
        self.outcomes.iter().all(UnitOutcome::is_ok)
    }
}

/// Aggregate of a whole [`Pipeline::execute`] run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Processed images, in discovery order.
    pub images: Vec<ImageReport>,
    /// Directories visited below the source root.
    pub subdirectories: Vec<PathBuf>,
    /// Set when the run ended early.
    pub error: Option<PipelineError>,
}

impl RunReport {
    /// Every failed unit with the image it belongs to.
    pub fn failures(&self) -> impl Iterator<Item = (&ImageReport, &UnitOutcome)> {
        self.images
            .iter()
            .flat_map(|image| image.failures().map(move |outcome| (image, outcome)))
    }

    /// Paths of every successfully written file.
    pub fn written(&self) -> impl Iterator<Item = &Path> {
        self.images
            .iter()
            .flat_map(|image| image.outcomes.iter())
            .filter(|o| o.is_ok())
            .filter_map(|o| o.output.as_deref())
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.failures().next().is_none()
    }
}

/// Batch generator over one source tree.
///
/// The configuration is fixed at construction and only read afterwards.
pub struct Pipeline<C: ImageCodec = RustCodec> {
    codec: C,
    config: PipelineConfig,
    placement: Placement,
}

impl Pipeline<RustCodec> {
    pub fn new(config: PipelineConfig) -> Self {
        Self::with_codec(RustCodec::new(), config)
    }
}

impl<C: ImageCodec> Pipeline<C> {
    pub fn with_codec(codec: C, config: PipelineConfig) -> Self {
        let placement = Placement::from_config(&config);
        Self {
            codec,
            config,
            placement,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Fail unless the source root is an existing directory.
    pub fn validate_source(&self) -> Result<(), PipelineError> {
        if self.config.source.is_dir() {
            Ok(())
        } else {
            Err(PipelineError::SourceNotFound(self.config.source.clone()))
        }
    }

    /// Validate, scan and generate the whole tree.
    ///
    /// Always returns a report and always logs the completion message.
    pub fn execute(&self) -> RunReport {
        let mut report = RunReport::default();

        if let Err(e) = self.run(&mut report) {
            error!(source = %self.config.source.display(), "{e}");
            report.error = Some(e);
        }

        info!(
            images = report.images.len(),
            failures = report.failures().count(),
            "images generated"
        );
        report
    }

    fn run(&self, report: &mut RunReport) -> Result<(), PipelineError> {
        self.validate_source()?;
        info!(
            source = %self.config.source.display(),
            sizes = self.config.sizes.len(),
            format = %self.config.format,
            "scanning"
        );

        let sequence = Sequence::default();
        let source = self.config.source.as_path();
        let scanned = match self.config.processing.mode() {
            ExecutionMode::Sequential => self.scan(source, &sequence, &mut report.images)?,
            ExecutionMode::Parallel { workers } => {
                self.scan_parallel(source, &sequence, workers, &mut report.images)?
            }
        };
        report.subdirectories = scanned.subdirectories;
        Ok(())
    }

    /// Walk `directory` and generate every image as soon as it is found.
    ///
    /// Reports of images generated before a scan error are kept in `reports`.
    pub fn scan(
        &self,
        directory: &Path,
        sequence: &Sequence,
        reports: &mut Vec<ImageReport>,
    ) -> Result<ScanReport, PipelineError> {
        let scanned = scan::scan(directory, sequence, |file| {
            reports.push(self.generate_variants(&file.path, file.counter));
        })?;
        Ok(scanned)
    }

    /// Discover everything under `directory` first, then generate on a
    /// pool of `workers` threads. Reports keep discovery order.
    pub fn scan_parallel(
        &self,
        directory: &Path,
        sequence: &Sequence,
        workers: usize,
        reports: &mut Vec<ImageReport>,
    ) -> Result<ScanReport, PipelineError> {
        let mut discovered: Vec<DiscoveredFile> = Vec::new();
        let scanned = scan::scan(directory, sequence, |file| discovered.push(file))?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| PipelineError::WorkerPool(e.to_string()))?;
        debug!(workers, files = discovered.len(), "worker pool started");

        let generated: Vec<ImageReport> = pool.install(|| {
            discovered
                .par_iter()
                .map(|file| self.generate_variants(&file.path, file.counter))
                .collect()
        });
        reports.extend(generated);
        Ok(scanned)
    }

    /// Thumbnail plus every configured variant for one source image.
    pub fn generate_variants(&self, source: &Path, counter: u32) -> ImageReport {
        info!(source = %source.display(), counter, "generating variants");

        let image = match self.codec.decode(source) {
            Ok(image) => image,
            Err(e) => {
                error!(source = %source.display(), "cannot read image: {e}");
                return ImageReport {
                    source: source.to_path_buf(),
                    counter,
                    outcomes: vec![UnitOutcome {
                        unit: Unit::Decode,
                        output: None,
                        result: Err(e.into()),
                    }],
                };
            }
        };

        let mut outcomes = Vec::with_capacity(self.config.sizes.len() + 1);
        outcomes.push(self.generate_thumbnail(source, &image, counter));
        for spec in &self.config.sizes {
            outcomes.push(self.generate_variant(source, &image, counter, spec));
        }

        ImageReport {
            source: source.to_path_buf(),
            counter,
            outcomes,
        }
    }

    /// Fit `image` in the thumbnail box and write it at maximum quality.
    pub fn generate_thumbnail(
        &self,
        source: &Path,
        image: &DecodedImage,
        counter: u32,
    ) -> UnitOutcome {
        let rename = self.config.renames_thumbnail();
        let output = self.output_path(source, counter, rename, THUMBNAIL_TAG);
        let pixels = render_thumbnail(image, self.config.thumbnail.bounds());
        let result = self.write(&pixels, &output, Quality::MAX);
        self.outcome(source, Unit::Thumbnail, output, result)
    }

    /// Resize `image` to `spec.width` and write it at `spec.quality`.
    pub fn generate_variant(
        &self,
        source: &Path,
        image: &DecodedImage,
        counter: u32,
        spec: &SizeSpec,
    ) -> UnitOutcome {
        let tag = spec.tag();
        let output = self.output_path(source, counter, spec.rename, &tag);
        let result = render_variant(image, spec.width)
            .map_err(UnitError::from)
            .and_then(|pixels| self.write(&pixels, &output, Quality::new(spec.quality)));
        self.outcome(source, Unit::Variant { tag }, output, result)
    }

    /// Full output path for one unit of `source`.
    pub fn output_path(&self, source: &Path, counter: u32, rename: bool, tag: &str) -> PathBuf {
        let stem = naming::output_stem(source, counter, rename);
        self.placement
            .output_dir(source)
            .join(naming::output_file_name(&stem, tag, self.config.format))
    }

    fn write(
        &self,
        pixels: &DynamicImage,
        output: &Path,
        quality: Quality,
    ) -> Result<Dimensions, UnitError> {
        if let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| UnitError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        self.codec.encode(
            pixels,
            &EncodeParams {
                output: output.to_path_buf(),
                format: self.config.format,
                quality,
            },
        )?;
        Ok(Dimensions::of(pixels))
    }

    fn outcome(
        &self,
        source: &Path,
        unit: Unit,
        output: PathBuf,
        result: Result<Dimensions, UnitError>,
    ) -> UnitOutcome {
        match &result {
            Ok(dims) => debug!(
                output = %output.display(),
                width = dims.width,
                height = dims.height,
                "wrote {unit}"
            ),
            Err(e) => warn!(source = %source.display(), "{unit} failed: {e}"),
        }
        UnitOutcome {
            unit,
            output: Some(output),
            result,
        }
    }
}
