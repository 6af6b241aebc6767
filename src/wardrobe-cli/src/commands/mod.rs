//! Command handlers for wardrobe-fetch
//!
//! Each subcommand has its own module with a `run` entry point.

pub mod fetch;
pub mod list;
pub mod pak_info;
pub mod show_config;

use anyhow::{bail, Result};
use std::path::Path;
use wardrobe::Source;

/// Resolve an input path to a source that can be scanned
pub fn open_source(input: &Path) -> Result<Source> {
    if !input.exists() {
        bail!("Asset source '{}' does not exist.", input.display());
    }

    let source = Source::from_path(input);
    if !source.exists() {
        bail!(
            "Asset source '{}' is not a directory, .zip or .pak file.",
            input.display()
        );
    }

    Ok(source)
}
