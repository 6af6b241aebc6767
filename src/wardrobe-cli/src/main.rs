mod cli;
mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::Parser;
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Fetch(args) => {
            let config = Config::load(cli.config.as_deref())?;
            commands::fetch::run(&args, &config)?;
        }

        Commands::List { input, all } => {
            commands::list::run(&input, all)?;
        }

        Commands::PakInfo {
            input,
            entries,
            json,
        } => {
            commands::pak_info::run(&input, entries, json)?;
        }

        Commands::Config => {
            let config = Config::load(cli.config.as_deref())?;
            commands::show_config::run(cli.config.as_deref(), &config)?;
        }
    }

    Ok(())
}

/// Log to stderr; RUST_LOG overrides the default filter
fn init_logging(verbose: bool) {
    let default = if verbose {
        "wardrobe=debug,wardrobe_fetch=debug"
    } else {
        "wardrobe=info,wardrobe_fetch=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}
