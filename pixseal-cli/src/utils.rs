//! Common utility functions shared across CLI commands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};

/// Build the sealed-image output path from the input path.
///
/// Transforms `image.png` into `image.sealed.png`.
pub fn build_output_path(image: &Path) -> PathBuf {
    image.with_extension("sealed.png")
}

/// Build the sidecar path for a sealed image.
///
/// Transforms `image.sealed.png` into `image.sealed.png.pixseal.json`.
pub fn build_sidecar_path(output: &Path) -> PathBuf {
    let mut name = output.as_os_str().to_os_string();
    name.push(".pixseal.json");
    PathBuf::from(name)
}

/// Resolve the metadata payload from the inline or file argument.
///
/// The payload stays opaque bytes; nothing here parses or validates it.
pub fn load_metadata(
    inline: Option<String>,
    file: Option<PathBuf>,
) -> Result<Option<Vec<u8>>> {
    match (inline, file) {
        (Some(text), None) => Ok(Some(text.into_bytes())),
        (None, Some(path)) => {
            let bytes = std::fs::read(&path)
                .with_context(|| format!("Failed to read metadata file: {}", path.display()))?;
            Ok(Some(bytes))
        }
        (None, None) => Ok(None),
        // clap's conflicts_with rules this out.
        (Some(_), Some(_)) => unreachable!("inline metadata conflicts with metadata file"),
    }
}

/// Format a Unix timestamp (seconds) as a human-readable UTC string.
pub fn format_timestamp(timestamp_secs: u32) -> String {
    match Utc.timestamp_opt(i64::from(timestamp_secs), 0) {
        chrono::LocalResult::Single(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        _ => format!("{timestamp_secs}s"),
    }
}
