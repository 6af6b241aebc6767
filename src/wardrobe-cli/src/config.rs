//! Configuration for wardrobe-fetch
//!
//! Defaults are read from `config.toml`; command-line flags take precedence.
//! The file is never written by the tool.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Extra item fields to copy into each wearable (e.g. "tags")
    pub parameters: Vec<String>,
    /// Prefix color option keys with '#'
    pub fix_color_keys: bool,
    /// Pretty-print output JSON
    pub pretty: bool,
}

impl Config {
    /// Get the path to the default config file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("wardrobe-fetch");

        Ok(config_dir.join("config.toml"))
    }

    /// Load configuration
    ///
    /// An explicit path must exist. The default file is optional; if it is
    /// missing the defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default = Self::config_path()?;
                if !default.exists() {
                    return Ok(Config::default());
                }
                default
            }
        };

        let contents = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file {}", config_path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Config parameters followed by `extra`, without duplicates
    pub fn merged_parameters(&self, extra: &[String]) -> Vec<String> {
        let mut merged: Vec<String> = Vec::with_capacity(self.parameters.len() + extra.len());
        for name in self.parameters.iter().chain(extra) {
            if !merged.contains(name) {
                merged.push(name.clone());
            }
        }
        merged
    }
}
