//! Source image discovery.
//!
//! Walks the source tree depth-first. Within each directory the image files
//! are visited first, in file name order, and only then are subdirectories
//! descended into, also in name order:
//!
//! ```text
//! images/
//! ├── b.jpg        # 1
//! ├── d.PNG        # 2
//! ├── notes.txt    # ignored
//! ├── alpha/
//! │   └── c.png    # 3
//! └── beta/
//!     ├── a.JPG    # 4
//!     └── e.Jpg    # ignored (mixed case)
//! ```
//!
//! Each qualifying file receives the next value of a [`Sequence`] shared by
//! the whole traversal, so sibling directories never hand out the same
//! number twice.
//!
//! Symbolic links are followed: a linked file counts as an image under the
//! link's own path, and a linked directory is descended into. Link cycles
//! surface as a scan error.

use crate::config::IMAGE_EXTENSIONS;
use std::cmp::Ordering as CmpOrdering;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use walkdir::{DirEntry, WalkDir};

/// Monotonic traversal counter.
///
/// Atomic so a single instance can be shared by reference with workers.
#[derive(Debug)]
pub struct Sequence(AtomicU32);

impl Sequence {
    pub fn starting_at(first: u32) -> Self {
        Self(AtomicU32::new(first))
    }

    /// Take the current value and advance.
    pub fn next(&self) -> u32 {
        self.0.fetch_add(1, Ordering::SeqCst)
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

/// A qualifying source image and the counter value it was discovered with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    pub path: PathBuf,
    pub counter: u32,
}

/// Bookkeeping from one traversal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Every directory below the root, in visit order.
    pub subdirectories: Vec<PathBuf>,
    /// Qualifying image files, in visit order.
    pub files: Vec<PathBuf>,
}

/// Whether `path` has one of the recognized image extensions.
///
/// Case-sensitive: `a.jpg` and `a.JPG` qualify, `a.Jpg` and `a.jpeg` don't.
pub fn is_image_candidate(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext))
}

/// Files before directories, then by name.
fn files_first(a: &DirEntry, b: &DirEntry) -> CmpOrdering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

/// Traverse `root`, handing every qualifying file to `on_file` as soon as it
/// is found.
///
/// Stops at the first unreadable directory entry; files already handed out
/// stay handed out.
pub fn scan(
    root: &Path,
    sequence: &Sequence,
    mut on_file: impl FnMut(DiscoveredFile),
) -> Result<ScanReport, walkdir::Error> {
    let mut report = ScanReport::default();

    let walker = WalkDir::new(root)
        .follow_links(true)
        .min_depth(1)
        .sort_by(files_first);

    for entry in walker {
        let entry = entry?;
        let path = entry.path();

        if entry.file_type().is_dir() {
            report.subdirectories.push(path.to_path_buf());
        } else if entry.file_type().is_file() && is_image_candidate(path) {
            report.files.push(path.to_path_buf());
            on_file(DiscoveredFile {
                path: path.to_path_buf(),
                counter: sequence.next(),
            });
        }
    }

    Ok(report)
}
