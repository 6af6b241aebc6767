//! Fetch command handler
//!
//! Scans a mod source for wearables and writes either the merged object or
//! a JSON patch.

use anyhow::{Context, Result};
use wardrobe::{Aggregator, ConvertOptions, ExtensionFilter, WearableType};

use crate::cli::FetchArgs;
use crate::config::Config;
use crate::output;

pub fn run(args: &FetchArgs, config: &Config) -> Result<()> {
    let source = super::open_source(&args.input)?;

    output::check_target(&args.output, args.overwrite)?;

    let options = ConvertOptions {
        parameters: config.merged_parameters(&args.parameters),
        fix_color_keys: args.fix_color_keys || config.fix_color_keys,
    };

    println!("Scanning {}...", source);

    let wardrobe = Aggregator::new(options)
        .names_only(args.names_only)
        .collect(&source, ExtensionFilter::wearables())
        .with_context(|| format!("Failed to read {}", source))?;

    let document = if args.patch {
        wardrobe.to_patch()?
    } else {
        wardrobe.to_object()
    };

    output::write_json(&args.output, &document, args.format || config.pretty)?;

    for kind in WearableType::ALL {
        println!("  {:<6} {}", kind.key(), wardrobe.get(kind).len());
    }
    if !wardrobe.skipped().is_empty() {
        eprintln!("Skipped {} file(s):", wardrobe.skipped().len());
        for skipped in wardrobe.skipped() {
            eprintln!("  {}: {}", skipped.path, skipped.reason);
        }
    }

    println!(
        "Wrote {} {} to {}",
        wardrobe.len(),
        if args.patch { "patch operations" } else { "wearables" },
        args.output.display()
    );

    Ok(())
}
