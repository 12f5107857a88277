//! Output file naming.
//!
//! Every generated file is named `{stem}@{tag}.{ext}`:
//!
//! - `stem` is the source file name without its extension, or the 5-digit
//!   zero-padded sequence number when renaming is requested
//!   (`holiday.jpg` → `holiday` or `00042`).
//! - `tag` is the size label plus suffix (`sm_1x`), or `thumbnail`.
//! - `ext` is the configured output format.
//!
//! ```text
//! photos/
//! ├── holiday.jpg
//! ├── holiday@thumbnail.webp
//! ├── holiday@sm_1x.webp
//! ├── holiday@sm_2x.webp
//! └── 00002@md_1x.webp          # size with rename = true
//! ```
//!
//! Outputs land in the source's own directory unless a destination tree is
//! configured, in which case the source's path relative to the root is
//! recreated under it.

use crate::config::PipelineConfig;
use crate::imaging::OutputFormat;
use std::path::{Path, PathBuf};

/// Tag used for the per-image thumbnail.
pub const THUMBNAIL_TAG: &str = "thumbnail";

/// Where generated files are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// Next to the source image.
    BesideSource,
    /// Under `dest`, mirroring each source's position below `root`.
    Mirror { root: PathBuf, dest: PathBuf },
}

impl Placement {
    pub fn from_config(config: &PipelineConfig) -> Self {
        match &config.dest {
            Some(dest) => Placement::Mirror {
                root: config.source.clone(),
                dest: dest.clone(),
            },
            None => Placement::BesideSource,
        }
    }

    /// Directory that receives the outputs of `source`.
    pub fn output_dir(&self, source: &Path) -> PathBuf {
        let parent = source.parent().unwrap_or(Path::new(""));
        match self {
            Placement::BesideSource => parent.to_path_buf(),
            Placement::Mirror { root, dest } => match parent.strip_prefix(root) {
                Ok(relative) => dest.join(relative),
                Err(_) => dest.clone(),
            },
        }
    }
}

/// Zero-padded basename for renamed outputs.
pub fn sequence_name(counter: u32) -> String {
    format!("{counter:05}")
}

/// Basename shared by all outputs of one source.
pub fn output_stem(source: &Path, counter: u32, rename: bool) -> String {
    if rename {
        return sequence_name(counter);
    }
    source
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| sequence_name(counter))
}

/// `{stem}@{tag}.{ext}`
pub fn output_file_name(stem: &str, tag: &str, format: OutputFormat) -> String {
    format!("{stem}@{tag}.{}", format.extension())
}
