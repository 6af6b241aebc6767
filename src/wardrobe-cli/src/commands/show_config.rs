//! Config command handler

use anyhow::Result;
use std::path::Path;

use crate::config::Config;

/// Display the configuration in effect and where it came from
pub fn run(explicit: Option<&Path>, config: &Config) -> Result<()> {
    match explicit {
        Some(path) => println!("Config file: {}", path.display()),
        None => match Config::config_path() {
            Ok(path) if path.exists() => println!("Config file: {}", path.display()),
            Ok(path) => println!("Config file: {} (not found, using defaults)", path.display()),
            Err(_) => println!("Config file: (no config directory, using defaults)"),
        },
    }

    println!();
    print!("{}", toml::to_string_pretty(config)?);

    Ok(())
}
