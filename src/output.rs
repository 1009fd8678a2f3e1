//! CLI output formatting.
//!
//! Every function here is pure: it builds lines or paths and leaves printing
//! and writing to `main`. Results are listed with a positional index, the
//! request name when there is one, and the file they were written to:
//!
//! ```text
//! photo.jpg: jpeg 1000x800
//! 001 thumb → out/thumb.jpg (jpeg, 4312 bytes)
//! 002 → out/002.jpg (jpeg, 18022 bytes)
//! ```

use crate::imaging::{Metadata, OutputFormat};
use crate::transform::TransformResult;
use std::path::{Path, PathBuf};

/// One-line summary of a loaded image.
pub fn format_metadata(source: &Path, metadata: &Metadata) -> String {
    format!(
        "{}: {} {}x{}",
        source.display(),
        metadata.format,
        metadata.width,
        metadata.height
    )
}

/// One line per written result: index, optional name, destination, size.
pub fn format_result(index: usize, result: &TransformResult, destination: &Path) -> String {
    let label = match &result.name {
        Some(name) => format!("{:03} {}", index, name),
        None => format!("{:03}", index),
    };
    format!(
        "{} → {} ({}, {} bytes)",
        label,
        destination.display(),
        result.format,
        result.image.len()
    )
}

/// File name for a batch result: its name if given, else its 1-based index.
pub fn batch_file_name(index: usize, result: &TransformResult) -> String {
    let stem = match result.name.as_deref() {
        Some(name) if is_safe_file_stem(name) => name.to_string(),
        _ => format!("{:03}", index),
    };
    format!("{}.{}", stem, result.format.extension())
}

/// Names that would escape the output directory or be empty fall back to the index.
fn is_safe_file_stem(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
}

/// Output path next to `input`: `<stem>-<suffix>.<ext>`.
pub fn derived_path(input: &Path, suffix: &str, format: OutputFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    input.with_file_name(format!("{}-{}.{}", stem, suffix, format.extension()))
}
