//! CLI argument definitions for wardrobe-fetch

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "wardrobe-fetch")]
#[command(about = "Builds Wardrobe wearable lists from Starbound mod assets")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file to read defaults from (default: <config dir>/wardrobe-fetch/config.toml)
    #[arg(long, global = true, env = "WARDROBE_FETCH_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Find wearables in a mod and write them as JSON
    #[command(visible_alias = "f")]
    Fetch(FetchArgs),

    /// List wearable asset paths found in a mod
    #[command(visible_alias = "l")]
    List {
        /// Asset directory, .zip or .pak file
        input: PathBuf,

        /// List every file, not just wearables
        #[arg(short, long)]
        all: bool,
    },

    /// Show metadata and entries of a .pak file
    PakInfo {
        /// Path to .pak file
        input: PathBuf,

        /// List every entry with its offset and length
        #[arg(short, long)]
        entries: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the configuration in effect
    Config,
}

#[derive(Args, Debug)]
#[allow(clippy::struct_excessive_bools)]
pub struct FetchArgs {
    /// Asset directory, .zip or .pak file to search in
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output file
    #[arg(short, long)]
    pub output: PathBuf,

    /// Create a patch (wearables.json.patch) instead of a normal file (wearables.json)
    #[arg(short, long)]
    pub patch: bool,

    /// Overwrite the output file if it already exists
    #[arg(long)]
    pub overwrite: bool,

    /// Format (pretty-print) the JSON
    #[arg(short, long)]
    pub format: bool,

    /// Only record each wearable's item name
    #[arg(long)]
    pub names_only: bool,

    /// Extra item field to copy when present (repeatable, e.g. --param tags)
    #[arg(long = "param", value_name = "NAME")]
    pub parameters: Vec<String>,

    /// Prefix color option keys with '#'
    #[arg(long)]
    pub fix_color_keys: bool,
}
