//! Subcommands and the configuration loading they share.

pub mod batch;
pub mod classify;
pub mod config;
pub mod extract;

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, warn};

use skuparse_core::{ParserConfig, SkuParser};

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// One `name: value` line per column
    Text,
    /// JSON output
    Json,
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("skuparse")
        .join("config.json")
}

/// Configuration from `--config`, else the default file, else an empty one.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<ParserConfig> {
    if let Some(path) = config_path {
        return ParserConfig::from_file(Path::new(path))
            .with_context(|| format!("Failed to load configuration from {}", path));
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Using configuration at {}", path.display());
        ParserConfig::from_file(&path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))
    } else {
        warn!(
            "No configuration file at {}, nothing will be recognized",
            path.display()
        );
        Ok(ParserConfig::default())
    }
}

pub fn load_parser(config_path: Option<&str>) -> anyhow::Result<SkuParser> {
    let config = load_config(config_path)?;
    SkuParser::from_config(&config).context("Invalid configuration")
}
