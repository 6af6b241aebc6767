//! List command handler

use anyhow::{Context, Result};
use std::path::Path;
use wardrobe::{ExtensionFilter, RawItem, Source};

/// Print the asset path of every matching file in a source
pub fn run(input: &Path, all: bool) -> Result<()> {
    let source = super::open_source(input)?;

    let paths = collect_paths(&source, all)?;
    for path in &paths {
        println!("{}", path);
    }
    eprintln!("{} file(s) in {}", paths.len(), source);

    Ok(())
}

fn collect_paths(source: &Source, all: bool) -> Result<Vec<String>> {
    let filter = if all {
        ExtensionFilter::all()
    } else {
        ExtensionFilter::wearables()
    };

    let items = source
        .fetch(filter)
        .with_context(|| format!("Failed to read {}", source))?;

    let mut paths = Vec::new();
    for item in items {
        match item {
            Ok(RawItem { path, .. }) => paths.push(path),
            Err(e) => tracing::warn!("{}", e),
        }
    }
    Ok(paths)
}
