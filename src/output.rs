//! Console output for a finished run.
//!
//! Each image leads with its discovery counter and file name, followed by
//! indented context: the source path relative to the root and one line per
//! unit of work.
//!
//! ```text
//! 001 a.jpg
//!     Source: a.jpg
//!     thumbnail: 300x225 → a@thumbnail.webp
//!     sm_1x: 320x240 → a@sm_1x.webp
//! 002 broken.jpg
//!     Source: sub/broken.jpg
//!     decode: failed (Decode failed: invalid JPEG marker)
//!
//! Generated 2 files from 2 images, 1 failure
//! ```
//!
//! [`format_run_report`] is pure and returns lines; [`print_run_report`]
//! writes them to stdout.

use crate::pipeline::{ImageReport, RunReport, UnitOutcome};
use std::path::Path;

/// Format a counter as 3-digit zero-padded.
fn format_index(counter: u32) -> String {
    format!("{:0>3}", counter)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn display_relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{count} {word}")
    } else {
        format!("{count} {word}s")
    }
}

/// One line for a unit of work.
fn outcome_line(outcome: &UnitOutcome) -> String {
    match (&outcome.result, &outcome.output) {
        (Ok(dims), Some(output)) => format!(
            "{}{}: {}x{} → {}",
            indent(1),
            outcome.unit,
            dims.width,
            dims.height,
            file_name(output)
        ),
        (Ok(dims), None) => {
            format!("{}{}: {}x{}", indent(1), outcome.unit, dims.width, dims.height)
        }
        (Err(e), _) => format!("{}{}: failed ({})", indent(1), outcome.unit, e),
    }
}

/// Display lines for a single image.
pub fn format_image_report(image: &ImageReport, root: &Path) -> Vec<String> {
    let mut lines = vec![
        format!("{} {}", format_index(image.counter), file_name(&image.source)),
        format!("{}Source: {}", indent(1), display_relative(&image.source, root)),
    ];
    lines.extend(image.outcomes.iter().map(outcome_line));
    lines
}

/// Display lines for a whole run: every image, then a summary.
pub fn format_run_report(report: &RunReport, root: &Path) -> Vec<String> {
    let mut lines: Vec<String> = report
        .images
        .iter()
        .flat_map(|image| format_image_report(image, root))
        .collect();

    if let Some(error) = &report.error {
        lines.push(format!("Error: {error}"));
    }

    if !lines.is_empty() {
        lines.push(String::new());
    }

    let failures = report.failures().count();
    let mut summary = format!(
        "Generated {} from {}",
        plural(report.written().count(), "file"),
        plural(report.images.len(), "image")
    );
    if failures > 0 {
        summary.push_str(&format!(", {}", plural(failures, "failure")));
    }
    lines.push(summary);
    lines
}

/// Print run output to stdout.
pub fn print_run_report(report: &RunReport, root: &Path) {
    for line in format_run_report(report, root) {
        println!("{}", line);
    }
}
