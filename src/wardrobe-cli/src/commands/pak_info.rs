//! Pak info command handler

use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::path::Path;
use wardrobe::PakReader;

pub fn run(input: &Path, entries: bool, json: bool) -> Result<()> {
    let reader = PakReader::open(input)
        .with_context(|| format!("Failed to open pak file {}", input.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary(&reader, entries))?);
        return Ok(());
    }

    println!("File: {}", reader.path().display());
    println!("Entries: {}", reader.entries().len());

    if reader.metadata().is_empty() {
        println!("Metadata: (none)");
    } else {
        println!("Metadata:");
        for (key, value) in reader.metadata() {
            println!("  {}: {}", key, value);
        }
    }

    if entries {
        println!();
        println!("{:>12} {:>10}  Path", "Offset", "Length");
        for entry in reader.entries() {
            println!("{:>12} {:>10}  {}", entry.offset, entry.length, entry.path);
        }
    }

    Ok(())
}

fn summary(reader: &PakReader, entries: bool) -> Value {
    let mut summary = json!({
        "file": reader.path().display().to_string(),
        "metadata": reader.metadata(),
        "entry_count": reader.entries().len(),
    });

    if entries {
        summary["entries"] = reader
            .entries()
            .iter()
            .map(|e| json!({"path": e.path, "offset": e.offset, "length": e.length}))
            .collect();
    }

    summary
}
