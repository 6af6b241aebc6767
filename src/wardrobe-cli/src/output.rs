//! Output file checks and writing

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Make sure `path` can be written before any scanning starts
pub fn check_target(path: &Path, overwrite: bool) -> Result<()> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    if !parent.is_dir() {
        bail!("Output directory '{}' does not exist.", parent.display());
    }

    if path.is_dir() {
        bail!("Output file '{}' is a directory.", path.display());
    }

    if path.exists() && !overwrite {
        bail!(
            "Output file '{}' already exists and flag --overwrite not set.",
            path.display()
        );
    }

    Ok(())
}

/// Serialize a document and write it to `path`
pub fn write_json(path: &Path, document: &Value, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(document)?
    } else {
        serde_json::to_string(document)?
    };

    fs::write(path, text)
        .with_context(|| format!("Failed to write contents to '{}'", path.display()))
}
